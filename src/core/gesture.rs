use crate::core::decision::SwipeDecisionEngine;
use crate::core::haptics::HapticFeedback;
use crate::models::{DragState, HapticIntensity, SwipeDecision};
use kurbo::Vec2;

/// Travel (dp) past which a held drag gives a single medium pulse
pub const HAPTIC_THRESHOLD: f64 = 100.0;

/// Turns a pointer/touch drag into [`DragState`] for one card.
///
/// Lifecycle per gesture: one `on_drag_start`, any number of `on_drag_move`,
/// one `on_drag_end`. Out-of-order events are ignored rather than trusted.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: DragState,
    haptic_threshold: f64,
    /// Set once the medium pulse fired in the current gesture
    threshold_latched: bool,
    engine: SwipeDecisionEngine,
    haptics: HapticFeedback,
}

impl GestureTracker {
    pub fn new(engine: SwipeDecisionEngine, haptics: HapticFeedback, haptic_threshold: f64) -> Self {
        Self {
            state: DragState::default(),
            haptic_threshold,
            threshold_latched: false,
            engine,
            haptics,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Begin a gesture. Returns `false` if one is already in progress.
    pub fn on_drag_start(&mut self) -> bool {
        if self.state.active {
            tracing::debug!("Ignoring drag start while a drag is already active");
            return false;
        }

        self.state = DragState {
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            active: true,
        };
        self.threshold_latched = false;
        self.haptics.pulse(HapticIntensity::Light);
        true
    }

    /// Track the pointer. Returns `false` when no gesture is active.
    pub fn on_drag_move(&mut self, offset: Vec2) -> bool {
        if !self.state.active {
            return false;
        }

        self.state.offset = offset;

        let past_threshold =
            offset.x.abs() > self.haptic_threshold || offset.y.abs() > self.haptic_threshold;
        if past_threshold && !self.threshold_latched {
            self.threshold_latched = true;
            self.haptics.pulse(HapticIntensity::Medium);
        }
        true
    }

    /// Finish the gesture and hand the release to the decision engine.
    ///
    /// Returns `None` when no gesture was active. A `Cancel` springs the
    /// card back to the origin.
    pub fn on_drag_end(&mut self, offset: Vec2, velocity: Vec2) -> Option<SwipeDecision> {
        if !self.state.active {
            tracing::debug!("Ignoring drag end without an active drag");
            return None;
        }

        self.state.active = false;
        self.state.offset = offset;
        self.state.velocity = velocity;

        let decision = self.engine.resolve(offset, velocity);
        if decision == SwipeDecision::Cancel {
            self.state.offset = Vec2::ZERO;
            self.state.velocity = Vec2::ZERO;
        }

        Some(decision)
    }

    /// Move the card to a given offset outside of a gesture (programmatic animation)
    pub(crate) fn place(&mut self, offset: Vec2) {
        self.state.offset = offset;
        self.state.velocity = Vec2::ZERO;
    }

    /// Forget everything about the previous card
    pub fn reset(&mut self) {
        self.state = DragState::default();
        self.threshold_latched = false;
    }
}
