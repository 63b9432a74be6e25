// Core engine exports
pub mod deck;
pub mod decision;
pub mod gesture;
pub mod haptics;
pub mod session;
pub mod source;
pub mod trigger;

pub use deck::{CardStack, DeckSettings, DeckSnapshot, Release, EXHAUSTION_LAPS};
pub use decision::{classify, classify_with, SwipeDecisionEngine, SwipeThresholds};
pub use gesture::GestureTracker;
pub use haptics::{ChannelHaptics, HapticCapability, HapticError, HapticFeedback, HapticIntentLog};
pub use session::{DeckSession, Interaction};
pub use source::{CandidateSource, SourceError, StaticCandidates};
pub use trigger::{PendingSwipe, SwipeAnimation, SwipeTimings, TriggerOutcome};
