use crate::core::deck::{CardStack, DeckSettings, DeckSnapshot, Release};
use crate::core::haptics::{HapticFeedback, HapticIntentLog};
use crate::core::trigger::TriggerOutcome;
use crate::models::{Candidate, CommitOutcome, CommittedSwipe, HapticIntensity, SwipeCommand};
use kurbo::Vec2;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use uuid::Uuid;

/// What one call on a deck produced.
///
/// `haptics` and `deck` are captured under the same lock as the call, so
/// concurrent requests never see each other's intents.
#[derive(Debug, Clone)]
pub struct Interaction<T> {
    pub result: T,
    pub haptics: Vec<HapticIntensity>,
    pub deck: DeckSnapshot,
}

/// One user's deck, driven from request handlers and settle timers.
///
/// The stack lock is only held for synchronous work. Settle timers keep a
/// weak reference, so dropping the session tears the deck down and aborts
/// anything still settling.
pub struct DeckSession {
    id: Uuid,
    user_id: Option<String>,
    stack: Arc<Mutex<CardStack>>,
    intents: Arc<HapticIntentLog>,
    ledger: Option<UnboundedSender<CommittedSwipe>>,
    /// Set on teardown; a closed deck reports nothing to the ledger
    closed: Arc<AtomicBool>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl DeckSession {
    pub fn new(
        user_id: Option<String>,
        candidates: Vec<Candidate>,
        settings: DeckSettings,
        ledger: Option<UnboundedSender<CommittedSwipe>>,
    ) -> Self {
        let intents = Arc::new(HapticIntentLog::new());
        let haptics = HapticFeedback::new(intents.clone());
        let stack = CardStack::new(candidates, settings, haptics);

        Self {
            id: Uuid::new_v4(),
            user_id,
            stack: Arc::new(Mutex::new(stack)),
            intents,
            ledger,
            closed: Arc::new(AtomicBool::new(false)),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether `user_id` may drive this deck. Anonymous decks are open to anyone.
    pub fn is_owned_by(&self, user_id: Option<&str>) -> bool {
        match self.user_id.as_deref() {
            Some(owner) => user_id == Some(owner),
            None => true,
        }
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> DeckSnapshot {
        self.stack.lock().await.snapshot()
    }

    pub async fn candidate(&self, candidate_id: &str) -> Option<Candidate> {
        self.stack.lock().await.candidate(candidate_id).cloned()
    }

    fn finish<T>(&self, stack: &CardStack, result: T) -> Interaction<T> {
        Interaction {
            result,
            haptics: self.intents.drain(),
            deck: stack.snapshot(),
        }
    }

    pub async fn drag_start(&self) -> Interaction<bool> {
        let mut stack = self.stack.lock().await;
        let accepted = stack.drag_start();
        self.finish(&stack, accepted)
    }

    pub async fn drag_move(&self, offset: Vec2) -> Interaction<bool> {
        let mut stack = self.stack.lock().await;
        let accepted = stack.drag_move(offset);
        self.finish(&stack, accepted)
    }

    pub async fn drag_end(&self, offset: Vec2, velocity: Vec2) -> Interaction<Option<Release>> {
        let mut stack = self.stack.lock().await;
        let release = stack.drag_end(offset, velocity);
        if let Some(commit) = release.as_ref().and_then(|r| r.commit.as_ref()) {
            if !self.is_closed() {
                report(&self.ledger, self.user_id.as_deref(), commit);
            }
        }
        self.finish(&stack, release)
    }

    /// Trigger a button swipe; the commit lands after the settle delay
    pub async fn swipe(&self, command: SwipeCommand) -> Interaction<TriggerOutcome> {
        let mut stack = self.stack.lock().await;
        let outcome = stack.begin_swipe(command);

        let epoch = match outcome {
            TriggerOutcome::Scheduled { epoch, .. } => epoch,
            _ => {
                tracing::debug!("Swipe {:?} on deck {} not scheduled: {:?}", command, self.id, outcome);
                return self.finish(&stack, outcome);
            }
        };

        let settle_delay = stack.timings().settle_delay;
        let weak_stack = Arc::downgrade(&self.stack);
        let ledger = self.ledger.clone();
        let closed = self.closed.clone();
        let user_id = self.user_id.clone();
        let deck_id = self.id;

        let timer = tokio::spawn(async move {
            tokio::time::sleep(settle_delay).await;

            let Some(stack) = weak_stack.upgrade() else {
                return;
            };
            let committed = stack.lock().await.complete_swipe(epoch);

            if let Some(commit) = committed {
                tracing::debug!(
                    "Deck {} settled {} on {}",
                    deck_id,
                    commit.decision.as_str(),
                    commit.candidate_id
                );
                if !closed.load(Ordering::Acquire) {
                    report(&ledger, user_id.as_deref(), &commit);
                }
            }
        });
        stack.arm_pending(epoch, timer.abort_handle());

        self.finish(&stack, outcome)
    }

    /// Cancel anything in flight and stop reporting; used on teardown
    pub async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if self.stack.lock().await.cancel_pending() {
            tracing::debug!("Deck {} closed with a swipe still settling", self.id);
        }
    }
}

impl std::fmt::Debug for DeckSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckSession")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

fn report(
    ledger: &Option<UnboundedSender<CommittedSwipe>>,
    user_id: Option<&str>,
    commit: &CommitOutcome,
) {
    let (Some(ledger), Some(user_id)) = (ledger, user_id) else {
        return;
    };

    let swipe = CommittedSwipe {
        user_id: user_id.to_string(),
        candidate_id: commit.candidate_id.clone(),
        decision: commit.decision,
        decided_at: chrono::Utc::now(),
    };

    if ledger.send(swipe).is_err() {
        tracing::warn!("Swipe ledger is closed, dropping decision for {}", user_id);
    }
}
