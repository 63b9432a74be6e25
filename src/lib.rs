//! PitchFlic Deck - swipe deck engine for the PitchFlic founder/investor app
//!
//! The [`core`] module holds the interaction engine: drag tracking, swipe
//! classification, button-triggered swipes with a settle delay, and the card
//! stack that counts matches. The service layer hosts one deck per session
//! behind an HTTP API.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{classify, CardStack, DeckSession, DeckSettings, GestureTracker, SwipeDecisionEngine};
pub use crate::models::{Candidate, CandidateRole, HapticIntensity, SwipeCommand, SwipeDecision};

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[test]
    fn test_library_exports() {
        assert_eq!(classify(Vec2::new(151.0, 0.0), Vec2::ZERO), SwipeDecision::Like);
        assert_eq!(SwipeCommand::Up.decision(), SwipeDecision::SuperLike);
    }
}
