use crate::core::decision::{SwipeDecisionEngine, SwipeThresholds};
use crate::core::gesture::{GestureTracker, HAPTIC_THRESHOLD};
use crate::core::haptics::HapticFeedback;
use crate::core::source::CandidateSource;
use crate::core::trigger::{PendingSwipe, SwipeAnimation, SwipeTimings, TriggerOutcome};
use crate::models::{
    Candidate, CardPresentation, CommitOutcome, DeckStatus, DragState, HapticIntensity,
    SwipeCommand, SwipeDecision,
};
use kurbo::Vec2;
use serde::Serialize;
use tokio::task::AbortHandle;

/// How many times the deck is shown before it reports exhaustion.
///
/// The deck deliberately cycles the candidate list twice; whether a single
/// pass is the intended product behaviour is still open.
pub const EXHAUSTION_LAPS: usize = 2;

/// Tunables for one deck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckSettings {
    pub thresholds: SwipeThresholds,
    pub haptic_threshold: f64,
    pub timings: SwipeTimings,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            thresholds: SwipeThresholds::default(),
            haptic_threshold: HAPTIC_THRESHOLD,
            timings: SwipeTimings::default(),
        }
    }
}

/// Result of releasing a drag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Release {
    pub decision: SwipeDecision,
    /// Present when the decision advanced the deck
    pub commit: Option<CommitOutcome>,
}

/// Serializable view of a deck
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSnapshot {
    pub status: DeckStatus,
    pub cursor: usize,
    pub match_count: u64,
    pub deck_size: usize,
    pub drag: DragState,
    pub presentation: CardPresentation,
    pub pending: Option<SwipeCommand>,
}

/// Owns the candidate queue, the cursor and the match counter.
///
/// Two cards are visible at a time: `current` at `cursor % len` and `next`
/// right behind it. Every state change goes through [`CardStack::commit`].
#[derive(Debug)]
pub struct CardStack {
    candidates: Vec<Candidate>,
    cursor: usize,
    match_count: u64,
    /// Bumped whenever the top card is replaced
    epoch: u64,
    tracker: GestureTracker,
    pending: Option<PendingSwipe>,
    timings: SwipeTimings,
    haptics: HapticFeedback,
}

impl CardStack {
    pub fn new(candidates: Vec<Candidate>, settings: DeckSettings, haptics: HapticFeedback) -> Self {
        let engine = SwipeDecisionEngine::new(settings.thresholds, haptics.clone());
        let tracker = GestureTracker::new(engine, haptics.clone(), settings.haptic_threshold);

        Self {
            candidates,
            cursor: 0,
            match_count: 0,
            epoch: 0,
            tracker,
            pending: None,
            timings: settings.timings,
            haptics,
        }
    }

    /// Build a deck from the first `size` candidates a source yields
    pub fn from_source<S: CandidateSource>(
        source: &mut S,
        size: usize,
        settings: DeckSettings,
        haptics: HapticFeedback,
    ) -> Self {
        Self::new(source.next(size), settings, haptics)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn match_count(&self) -> u64 {
        self.match_count
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn drag(&self) -> &DragState {
        self.tracker.state()
    }

    pub fn pending(&self) -> Option<&PendingSwipe> {
        self.pending.as_ref()
    }

    /// Cursor value at which the deck is exhausted
    pub fn exhaustion_bound(&self) -> usize {
        self.candidates.len() * EXHAUSTION_LAPS
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.exhaustion_bound()
    }

    pub fn current(&self) -> Option<&Candidate> {
        self.card_at(self.cursor)
    }

    pub fn next_up(&self) -> Option<&Candidate> {
        self.card_at(self.cursor + 1)
    }

    fn card_at(&self, position: usize) -> Option<&Candidate> {
        if self.is_exhausted() {
            return None;
        }
        self.candidates.get(position % self.candidates.len())
    }

    pub fn status(&self) -> DeckStatus {
        match (self.current(), self.next_up()) {
            (Some(current), Some(next)) => DeckStatus::Active {
                cursor: self.cursor,
                current: current.clone(),
                next: next.clone(),
            },
            _ => DeckStatus::Exhausted { cursor: self.cursor },
        }
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            status: self.status(),
            cursor: self.cursor,
            match_count: self.match_count,
            deck_size: self.candidates.len(),
            drag: *self.tracker.state(),
            presentation: self.tracker.state().presentation(),
            pending: self.pending.as_ref().map(PendingSwipe::command),
        }
    }

    /// Look up a candidate for the detail view. Never moves the cursor.
    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Start dragging the top card.
    ///
    /// Refused while the deck is exhausted or a button swipe is settling.
    pub fn drag_start(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        if let Some(pending) = &self.pending {
            tracing::debug!("Ignoring drag start, {:?} swipe still settling", pending.command());
            return false;
        }
        self.tracker.on_drag_start()
    }

    pub fn drag_move(&mut self, offset: Vec2) -> bool {
        self.tracker.on_drag_move(offset)
    }

    /// Release the drag and commit whatever the decision engine resolves
    pub fn drag_end(&mut self, offset: Vec2, velocity: Vec2) -> Option<Release> {
        let decision = self.tracker.on_drag_end(offset, velocity)?;
        let commit = self.commit(decision);
        Some(Release { decision, commit })
    }

    /// Apply a decision to the deck.
    ///
    /// `Like` and `SuperLike` count a match; every decision except `Cancel`
    /// advances the cursor. Returns `None` when nothing changed.
    pub fn commit(&mut self, decision: SwipeDecision) -> Option<CommitOutcome> {
        if !decision.advances() {
            return None;
        }

        let candidate_id = match self.current() {
            Some(candidate) => candidate.id.clone(),
            None => {
                tracing::debug!("Ignoring {} on an exhausted deck", decision.as_str());
                return None;
            }
        };

        if decision.is_match() {
            self.match_count += 1;
        }
        self.cursor += 1;
        self.replace_top_card();

        let exhausted = self.is_exhausted();
        if exhausted {
            tracing::info!(
                "Deck exhausted after {} swipes ({} matches)",
                self.cursor,
                self.match_count
            );
        }

        Some(CommitOutcome {
            decision,
            candidate_id,
            cursor: self.cursor,
            match_count: self.match_count,
            exhausted,
        })
    }

    fn replace_top_card(&mut self) {
        self.epoch += 1;
        self.tracker.reset();
        // Dropping a pending swipe aborts its timer
        self.pending = None;
    }

    /// Accept a button-driven swipe for the top card.
    ///
    /// The card snaps back to the origin and is placed at its exit offset;
    /// the commit itself happens in [`CardStack::complete_swipe`] once the
    /// settle delay has elapsed. First caller wins.
    pub fn begin_swipe(&mut self, command: SwipeCommand) -> TriggerOutcome {
        if self.is_exhausted() {
            return TriggerOutcome::Exhausted;
        }
        if self.pending.is_some() {
            return TriggerOutcome::AlreadyPending;
        }
        if self.tracker.is_active() {
            return TriggerOutcome::DragInProgress;
        }

        let animation = SwipeAnimation::plan(command, &self.timings);
        self.tracker.place(animation.from);
        self.tracker.place(animation.to);
        self.pending = Some(PendingSwipe::new(command, self.epoch));
        self.haptics.pulse(HapticIntensity::Heavy);

        TriggerOutcome::Scheduled {
            epoch: self.epoch,
            animation,
        }
    }

    /// Hand the settle timer to the pending swipe so it can be cancelled.
    ///
    /// A timer for a card that is no longer on top is aborted straight away.
    pub fn arm_pending(&mut self, epoch: u64, timer: AbortHandle) {
        match self.pending.as_mut() {
            Some(pending) if pending.epoch() == epoch => pending.arm(timer),
            _ => timer.abort(),
        }
    }

    /// Commit a settled button swipe, if it still belongs to the top card
    pub fn complete_swipe(&mut self, epoch: u64) -> Option<CommitOutcome> {
        match self.pending.take() {
            Some(mut pending) if pending.epoch() == epoch => {
                pending.disarm();
                self.commit(pending.command().decision())
            }
            other => {
                tracing::debug!("Dropping stale swipe completion for card epoch {}", epoch);
                self.pending = other;
                None
            }
        }
    }

    /// Drop any settling swipe and return the card to rest
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(_) => {
                self.tracker.reset();
                true
            }
            None => false,
        }
    }

    pub fn timings(&self) -> &SwipeTimings {
        &self.timings
    }
}
