use crate::models::{SwipeCommand, SwipeDecision};
use kurbo::Vec2;
use serde::Serialize;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Off-stage displacement (dp) for button-driven exits
pub const EXIT_OFFSET: f64 = 400.0;

/// Length of the exit tween
pub const ANIMATION_DURATION: Duration = Duration::from_millis(500);

/// Delay before a button-driven swipe commits; longer than the tween so the exit can finish
pub const SETTLE_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeTimings {
    pub exit_offset: f64,
    pub animation: Duration,
    pub settle_delay: Duration,
}

impl Default for SwipeTimings {
    fn default() -> Self {
        Self {
            exit_offset: EXIT_OFFSET,
            animation: ANIMATION_DURATION,
            settle_delay: SETTLE_DELAY,
        }
    }
}

/// Exit animation the client should play for an accepted command
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeAnimation {
    pub command: SwipeCommand,
    pub decision: SwipeDecision,
    pub from: Vec2,
    pub to: Vec2,
    pub duration_ms: u64,
    pub settle_ms: u64,
}

impl SwipeAnimation {
    pub fn plan(command: SwipeCommand, timings: &SwipeTimings) -> Self {
        Self {
            command,
            decision: command.decision(),
            from: Vec2::ZERO,
            to: command.exit_offset(timings.exit_offset),
            duration_ms: timings.animation.as_millis() as u64,
            settle_ms: timings.settle_delay.as_millis() as u64,
        }
    }
}

/// Why a programmatic swipe was or wasn't accepted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum TriggerOutcome {
    /// Accepted; commit follows after the settle delay
    Scheduled {
        epoch: u64,
        animation: SwipeAnimation,
    },
    /// Another programmatic swipe is still settling on this card
    AlreadyPending,
    /// The card is being dragged
    DragInProgress,
    Exhausted,
}

impl TriggerOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled { .. })
    }
}

/// A programmatic swipe waiting out its settle delay.
///
/// Owns the timer task: dropping the pending swipe aborts it, so a card that
/// is replaced or torn down can never be committed twice.
#[derive(Debug)]
pub struct PendingSwipe {
    pub(crate) command: SwipeCommand,
    pub(crate) epoch: u64,
    timer: Option<AbortHandle>,
}

impl PendingSwipe {
    pub(crate) fn new(command: SwipeCommand, epoch: u64) -> Self {
        Self {
            command,
            epoch,
            timer: None,
        }
    }

    pub fn command(&self) -> SwipeCommand {
        self.command
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn arm(&mut self, timer: AbortHandle) {
        if let Some(previous) = self.timer.replace(timer) {
            previous.abort();
        }
    }

    /// Release the timer without aborting it, used by the timer itself when it fires
    pub(crate) fn disarm(&mut self) {
        self.timer = None;
    }
}

impl Drop for PendingSwipe {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            tracing::debug!("Cancelling pending {:?} swipe for card epoch {}", self.command, self.epoch);
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = SwipeTimings::default();
        assert_eq!(timings.exit_offset, 400.0);
        assert_eq!(timings.animation, Duration::from_millis(500));
        assert_eq!(timings.settle_delay, Duration::from_millis(600));
        assert!(timings.settle_delay > timings.animation);
    }

    #[test]
    fn test_animation_plan() {
        let plan = SwipeAnimation::plan(SwipeCommand::Up, &SwipeTimings::default());
        assert_eq!(plan.decision, SwipeDecision::SuperLike);
        assert_eq!(plan.from, Vec2::ZERO);
        assert_eq!(plan.to, Vec2::new(0.0, -400.0));
        assert_eq!(plan.duration_ms, 500);
        assert_eq!(plan.settle_ms, 600);
    }

    #[tokio::test]
    async fn test_dropping_pending_aborts_timer() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });

        let mut pending = PendingSwipe::new(SwipeCommand::Right, 0);
        pending.arm(task.abort_handle());
        drop(pending);

        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_disarmed_pending_leaves_timer_running() {
        let task = tokio::spawn(async { 7 });

        let mut pending = PendingSwipe::new(SwipeCommand::Left, 3);
        pending.arm(task.abort_handle());
        pending.disarm();
        drop(pending);

        assert_eq!(task.await.unwrap(), 7);
    }
}
