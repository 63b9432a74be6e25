// Model exports
pub mod account;
pub mod domain;
pub mod requests;
pub mod responses;

pub use account::{DeletionResult, MatchRecord, Profile, Session, User};
pub use domain::{
    Candidate, CandidateRole, CardPresentation, CommitOutcome, CommittedSwipe, DeckStatus,
    DragState, HapticIntensity, SwipeCommand, SwipeDecision,
};
pub use requests::{CreateDeckRequest, DragPhase, DragRequest, SwipeRequest};
pub use responses::{
    CreateDeckResponse, DeleteAccountResponse, DragResponse, ErrorResponse, HealthResponse,
    MatchesResponse, SwipeResponse,
};
