use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Which side of the marketplace a candidate is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateRole {
    Founder,
    Investor,
}

impl CandidateRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Founder => "founder",
            Self::Investor => "investor",
        }
    }
}

/// A profile shown on a card.
///
/// The deck treats candidates as immutable tokens: it never creates or
/// destroys them, it only moves a cursor over the sequence it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub role: CandidateRole,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Transient drag state for the card currently under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragState {
    pub offset: Vec2,
    pub velocity: Vec2,
    pub active: bool,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            active: false,
        }
    }
}

/// Horizontal range over which the card tilts
const ROTATION_DOMAIN: f64 = 200.0;
const MAX_ROTATION_DEG: f64 = 25.0;
/// Cards stay fully opaque up to this horizontal distance, then fade out by `ROTATION_DOMAIN`
const FADE_START: f64 = 150.0;

/// Cosmetic values derived from the drag offset.
///
/// These never feed into a decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPresentation {
    pub rotation_deg: f64,
    pub opacity: f64,
}

impl DragState {
    pub fn presentation(&self) -> CardPresentation {
        let x = if self.offset.x.is_finite() { self.offset.x } else { 0.0 };
        let t = (x / ROTATION_DOMAIN).clamp(-1.0, 1.0);
        let distance = x.abs();
        let opacity = if distance <= FADE_START {
            1.0
        } else {
            (1.0 - (distance - FADE_START) / (ROTATION_DOMAIN - FADE_START)).max(0.0)
        };

        CardPresentation {
            rotation_deg: t * MAX_ROTATION_DEG,
            opacity,
        }
    }
}

/// Outcome of one gesture or one programmatic swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDecision {
    Pass,
    Like,
    #[serde(rename = "superlike")]
    SuperLike,
    Cancel,
}

impl SwipeDecision {
    /// Like and super-like both count towards the match counter
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Like | Self::SuperLike)
    }

    /// Whether committing this decision moves the deck forward
    pub fn advances(&self) -> bool {
        !matches!(self, Self::Cancel)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Like => "like",
            Self::SuperLike => "superlike",
            Self::Cancel => "cancel",
        }
    }
}

/// Button-driven swipe, equivalent to a gesture whose direction is known up front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeCommand {
    Left,
    Right,
    Up,
}

impl SwipeCommand {
    pub fn decision(&self) -> SwipeDecision {
        match self {
            Self::Left => SwipeDecision::Pass,
            Self::Right => SwipeDecision::Like,
            Self::Up => SwipeDecision::SuperLike,
        }
    }

    /// Off-stage displacement the card animates to, given the exit distance
    pub fn exit_offset(&self, distance: f64) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-distance, 0.0),
            Self::Right => Vec2::new(distance, 0.0),
            Self::Up => Vec2::new(0.0, -distance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticIntensity {
    Light,
    Medium,
    Heavy,
}

/// What the deck is currently showing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DeckStatus {
    Active {
        cursor: usize,
        current: Candidate,
        next: Candidate,
    },
    Exhausted {
        cursor: usize,
    },
}

impl DeckStatus {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Result of a commit that changed deck state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub decision: SwipeDecision,
    pub candidate_id: String,
    pub cursor: usize,
    pub match_count: u64,
    pub exhausted: bool,
}

/// A committed swipe attributed to a user, handed to the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommittedSwipe {
    pub user_id: String,
    pub candidate_id: String,
    pub decision: SwipeDecision,
    pub decided_at: chrono::DateTime<chrono::Utc>,
}
