// Service exports
pub mod auth;
pub mod backend;
pub mod postgres;
pub mod sessions;

pub use auth::{AuthError, Claims, TokenVerifier};
pub use backend::{AccountDeletion, AuthProvider, BackendClient, BackendError, ProfileStore};
pub use postgres::{LedgerDecision, LedgerError, SwipeLedger};
pub use sessions::SessionStore;
