use crate::models::domain::{CandidateRole, SwipeCommand};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to open a deck session
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeckRequest {
    #[validate(range(min = 1, max = 500))]
    #[serde(default)]
    pub deck_size: Option<u16>,
    /// Only show founders or only investors
    #[serde(default)]
    pub role: Option<CandidateRole>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    Start,
    Move,
    End,
}

/// One drag lifecycle event from the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragRequest {
    pub phase: DragPhase,
    #[serde(default = "zero")]
    pub offset: Vec2,
    #[serde(default = "zero")]
    pub velocity: Vec2,
}

fn zero() -> Vec2 {
    Vec2::ZERO
}

/// Button-driven swipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeRequest {
    pub direction: SwipeCommand,
}
