use crate::core::{DeckSnapshot, Release, TriggerOutcome};
use crate::models::account::MatchRecord;
use crate::models::domain::HapticIntensity;
use serde::{Deserialize, Serialize};

/// Response for deck creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeckResponse {
    pub session_id: uuid::Uuid,
    pub deck: DeckSnapshot,
}

/// Response for a drag lifecycle event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResponse {
    /// False when the event was out of order or the card was busy
    pub accepted: bool,
    pub release: Option<Release>,
    pub haptics: Vec<HapticIntensity>,
    pub deck: DeckSnapshot,
}

/// Response for a button swipe
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub result: TriggerOutcome,
    pub haptics: Vec<HapticIntensity>,
    pub deck: DeckSnapshot,
}

/// Liked candidates for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesResponse {
    pub user_id: String,
    pub matches: Vec<MatchRecord>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}

/// Account deletion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
}
