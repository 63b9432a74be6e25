use crate::core::haptics::HapticFeedback;
use crate::models::{HapticIntensity, SwipeDecision};
use kurbo::Vec2;

/// Horizontal or vertical travel (dp) that commits a swipe on release
pub const DISTANCE_THRESHOLD: f64 = 150.0;

/// Release velocity (dp/s) that commits a swipe regardless of distance
pub const VELOCITY_THRESHOLD: f64 = 500.0;

/// Thresholds used to resolve a released drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThresholds {
    pub distance: f64,
    pub velocity: f64,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            distance: DISTANCE_THRESHOLD,
            velocity: VELOCITY_THRESHOLD,
        }
    }
}

/// Classify a released drag with the default thresholds
///
/// Upward intent wins over horizontal, then right over left:
///
/// ```
/// use kurbo::Vec2;
/// use pitchflic_deck::core::classify;
/// use pitchflic_deck::models::SwipeDecision;
///
/// let decision = classify(Vec2::new(200.0, -200.0), Vec2::ZERO);
/// assert_eq!(decision, SwipeDecision::SuperLike);
/// ```
#[inline]
pub fn classify(offset: Vec2, velocity: Vec2) -> SwipeDecision {
    classify_with(&SwipeThresholds::default(), offset, velocity)
}

/// Classify a released drag.
///
/// Total over `f64`: any non-finite component resolves to `Cancel`.
#[inline]
pub fn classify_with(thresholds: &SwipeThresholds, offset: Vec2, velocity: Vec2) -> SwipeDecision {
    if !offset.is_finite() || !velocity.is_finite() {
        return SwipeDecision::Cancel;
    }

    let distance = thresholds.distance;
    let speed = thresholds.velocity;

    let right = offset.x > distance || velocity.x > speed;
    let left = offset.x < -distance || velocity.x < -speed;
    let up = offset.y < -distance || velocity.y < -speed;

    if up {
        SwipeDecision::SuperLike
    } else if right {
        SwipeDecision::Like
    } else if left {
        SwipeDecision::Pass
    } else {
        SwipeDecision::Cancel
    }
}

/// Resolves released drags and plays the matching feedback.
///
/// The engine only returns a decision. Advancing the deck is the caller's job.
#[derive(Debug, Clone)]
pub struct SwipeDecisionEngine {
    thresholds: SwipeThresholds,
    haptics: HapticFeedback,
}

impl SwipeDecisionEngine {
    pub fn new(thresholds: SwipeThresholds, haptics: HapticFeedback) -> Self {
        Self { thresholds, haptics }
    }

    pub fn thresholds(&self) -> &SwipeThresholds {
        &self.thresholds
    }

    /// Classify, then fire a heavy pulse for a commit or a light one for a spring-back
    pub fn resolve(&self, offset: Vec2, velocity: Vec2) -> SwipeDecision {
        let decision = classify_with(&self.thresholds, offset, velocity);

        match decision {
            SwipeDecision::Cancel => self.haptics.pulse(HapticIntensity::Light),
            _ => self.haptics.pulse(HapticIntensity::Heavy),
        }

        tracing::debug!(
            "Resolved drag offset=({:.1}, {:.1}) velocity=({:.1}, {:.1}) -> {}",
            offset.x,
            offset.y,
            velocity.x,
            velocity.y,
            decision.as_str()
        );

        decision
    }
}

impl Default for SwipeDecisionEngine {
    fn default() -> Self {
        Self::new(SwipeThresholds::default(), HapticFeedback::disabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::haptics::HapticIntentLog;
    use std::sync::Arc;

    #[test]
    fn test_distance_only() {
        assert_eq!(classify(Vec2::new(151.0, 0.0), Vec2::ZERO), SwipeDecision::Like);
        assert_eq!(classify(Vec2::new(-151.0, 0.0), Vec2::ZERO), SwipeDecision::Pass);
        assert_eq!(classify(Vec2::new(0.0, -151.0), Vec2::ZERO), SwipeDecision::SuperLike);
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        assert_eq!(classify(Vec2::new(150.0, 0.0), Vec2::ZERO), SwipeDecision::Cancel);
        assert_eq!(classify(Vec2::new(-150.0, 0.0), Vec2::ZERO), SwipeDecision::Cancel);
        assert_eq!(classify(Vec2::new(0.0, -150.0), Vec2::ZERO), SwipeDecision::Cancel);
        assert_eq!(classify(Vec2::ZERO, Vec2::new(500.0, 0.0)), SwipeDecision::Cancel);
    }

    #[test]
    fn test_downward_drag_never_commits() {
        assert_eq!(classify(Vec2::new(0.0, 400.0), Vec2::new(0.0, 2000.0)), SwipeDecision::Cancel);
    }

    #[test]
    fn test_velocity_overrides_distance() {
        assert_eq!(classify(Vec2::ZERO, Vec2::new(600.0, 0.0)), SwipeDecision::Like);
        assert_eq!(classify(Vec2::ZERO, Vec2::new(-600.0, 0.0)), SwipeDecision::Pass);
        assert_eq!(classify(Vec2::ZERO, Vec2::new(0.0, -600.0)), SwipeDecision::SuperLike);
        // A fast flick back against the drag direction still wins on velocity
        assert_eq!(classify(Vec2::new(-100.0, 0.0), Vec2::new(700.0, 0.0)), SwipeDecision::Like);
    }

    #[test]
    fn test_up_beats_right_and_right_beats_left() {
        assert_eq!(classify(Vec2::new(200.0, -200.0), Vec2::ZERO), SwipeDecision::SuperLike);
        assert_eq!(classify(Vec2::new(-200.0, -200.0), Vec2::ZERO), SwipeDecision::SuperLike);
        // Both horizontal conditions true at once: right wins
        assert_eq!(classify(Vec2::new(-200.0, 0.0), Vec2::new(600.0, 0.0)), SwipeDecision::Like);
    }

    #[test]
    fn test_non_finite_input_cancels() {
        assert_eq!(classify(Vec2::new(f64::NAN, 0.0), Vec2::ZERO), SwipeDecision::Cancel);
        assert_eq!(classify(Vec2::ZERO, Vec2::new(0.0, f64::NAN)), SwipeDecision::Cancel);
        assert_eq!(classify(Vec2::new(f64::INFINITY, 0.0), Vec2::ZERO), SwipeDecision::Cancel);
        assert_eq!(
            classify(Vec2::ZERO, Vec2::new(f64::NEG_INFINITY, 0.0)),
            SwipeDecision::Cancel
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = SwipeThresholds { distance: 50.0, velocity: 100.0 };
        assert_eq!(
            classify_with(&thresholds, Vec2::new(60.0, 0.0), Vec2::ZERO),
            SwipeDecision::Like
        );
        assert_eq!(
            classify_with(&thresholds, Vec2::ZERO, Vec2::new(-150.0, 0.0)),
            SwipeDecision::Pass
        );
    }

    #[test]
    fn test_resolve_plays_feedback() {
        let log = Arc::new(HapticIntentLog::new());
        let engine = SwipeDecisionEngine::new(SwipeThresholds::default(), HapticFeedback::new(log.clone()));

        assert_eq!(engine.resolve(Vec2::new(300.0, 0.0), Vec2::ZERO), SwipeDecision::Like);
        assert_eq!(engine.resolve(Vec2::new(20.0, 0.0), Vec2::ZERO), SwipeDecision::Cancel);

        assert_eq!(log.drain(), vec![HapticIntensity::Heavy, HapticIntensity::Light]);
    }
}
