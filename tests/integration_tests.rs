// Integration tests for deck sessions and settle timers

use kurbo::Vec2;
use pitchflic_deck::core::{
    CardStack, ChannelHaptics, DeckSession, DeckSettings, HapticFeedback, StaticCandidates,
    SwipeTimings, TriggerOutcome,
};
use pitchflic_deck::models::{
    Candidate, CandidateRole, HapticIntensity, SwipeCommand, SwipeDecision,
};
use pitchflic_deck::services::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn create_candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| Candidate {
            id: format!("cand-{}", i),
            name: format!("Candidate {}", i),
            role: if i % 2 == 0 { CandidateRole::Founder } else { CandidateRole::Investor },
            headline: String::new(),
            company: None,
            stage: None,
            location: None,
            image_url: None,
            tags: vec![],
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_integration_button_swipe_right() {
    let session = DeckSession::new(None, create_candidates(4), DeckSettings::default(), None);

    let outcome = session.swipe(SwipeCommand::Right).await;
    assert_eq!(outcome.haptics, vec![HapticIntensity::Heavy]);
    match &outcome.result {
        TriggerOutcome::Scheduled { animation, .. } => {
            assert_eq!(animation.from, Vec2::ZERO);
            assert_eq!(animation.to, Vec2::new(400.0, 0.0));
            assert_eq!(animation.duration_ms, 500);
            assert_eq!(animation.settle_ms, 600);
        }
        other => panic!("expected a scheduled swipe, got {:?}", other),
    }
    // While settling the card sits at its exit offset
    let settling = outcome.deck;
    assert_eq!(settling.drag.offset, Vec2::new(400.0, 0.0));
    assert_eq!(settling.pending, Some(SwipeCommand::Right));

    tokio::time::sleep(Duration::from_millis(601)).await;

    let settled = session.snapshot().await;
    assert_eq!(settled.cursor, 1);
    assert_eq!(settled.match_count, 1);
    assert_eq!(settled.pending, None);
    assert_eq!(settled.drag.offset, Vec2::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_integration_double_trigger_commits_once() {
    let session = DeckSession::new(None, create_candidates(4), DeckSettings::default(), None);

    assert!(session.swipe(SwipeCommand::Up).await.result.is_scheduled());
    assert_eq!(session.swipe(SwipeCommand::Left).await.result, TriggerOutcome::AlreadyPending);
    assert_eq!(session.swipe(SwipeCommand::Up).await.result, TriggerOutcome::AlreadyPending);

    tokio::time::sleep(Duration::from_secs(3)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.cursor, 1);
    assert_eq!(snapshot.match_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_integration_drag_blocked_while_settling() {
    let session = DeckSession::new(None, create_candidates(4), DeckSettings::default(), None);

    session.swipe(SwipeCommand::Left).await;
    assert!(!session.drag_start().await.result);
    assert!(session.drag_end(Vec2::new(300.0, 0.0), Vec2::ZERO).await.result.is_none());

    tokio::time::sleep(Duration::from_millis(700)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.cursor, 1);
    assert_eq!(snapshot.match_count, 0);
    assert!(session.drag_start().await.result);
}

#[tokio::test(start_paused = true)]
async fn test_integration_trigger_rejected_during_drag() {
    let session = DeckSession::new(None, create_candidates(4), DeckSettings::default(), None);

    assert!(session.drag_start().await.result);
    assert_eq!(session.swipe(SwipeCommand::Right).await.result, TriggerOutcome::DragInProgress);

    let release = session.drag_end(Vec2::new(-160.0, 0.0), Vec2::ZERO).await.result.unwrap();
    assert_eq!(release.decision, SwipeDecision::Pass);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.cursor, 1);
    assert_eq!(snapshot.match_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_integration_swipe_on_exhausted_deck() {
    let session = DeckSession::new(None, create_candidates(1), DeckSettings::default(), None);

    for _ in 0..2 {
        assert!(session.swipe(SwipeCommand::Right).await.result.is_scheduled());
        tokio::time::sleep(Duration::from_millis(650)).await;
    }

    let snapshot = session.snapshot().await;
    assert!(snapshot.status.is_exhausted());
    assert_eq!(snapshot.match_count, 2);
    assert_eq!(session.swipe(SwipeCommand::Right).await.result, TriggerOutcome::Exhausted);
}

#[tokio::test(start_paused = true)]
async fn test_integration_custom_timings() {
    let settings = DeckSettings {
        timings: SwipeTimings {
            exit_offset: 600.0,
            animation: Duration::from_millis(200),
            settle_delay: Duration::from_millis(250),
        },
        ..DeckSettings::default()
    };
    let session = DeckSession::new(None, create_candidates(3), settings, None);

    session.swipe(SwipeCommand::Up).await;
    assert_eq!(session.snapshot().await.drag.offset, Vec2::new(0.0, -600.0));

    tokio::time::sleep(Duration::from_millis(260)).await;
    assert_eq!(session.snapshot().await.cursor, 1);
}

#[tokio::test(start_paused = true)]
async fn test_integration_store_teardown_cancels_timer() {
    let store = SessionStore::new(16, 60);
    let session = store
        .insert(DeckSession::new(None, create_candidates(3), DeckSettings::default(), None))
        .await;
    let id = session.id();

    session.swipe(SwipeCommand::Right).await;
    assert!(store.remove(&id).await);

    tokio::time::sleep(Duration::from_secs(2)).await;

    // Our handle outlives the store entry, but the swipe never lands
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.cursor, 0);
    assert_eq!(snapshot.match_count, 0);
    assert_eq!(snapshot.pending, None);
}

#[tokio::test(start_paused = true)]
async fn test_integration_dropped_session_never_commits() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let session = DeckSession::new(
        Some("founder-1".to_string()),
        create_candidates(3),
        DeckSettings::default(),
        Some(tx),
    );

    session.swipe(SwipeCommand::Right).await;
    drop(session);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_err!(rx.try_recv());
}

#[tokio::test]
async fn test_integration_channel_haptics() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let haptics = HapticFeedback::new(Arc::new(ChannelHaptics::new(tx)));
    let mut deck = CardStack::new(create_candidates(2), DeckSettings::default(), haptics);

    deck.drag_start();
    deck.drag_move(Vec2::new(0.0, -140.0));
    deck.drag_end(Vec2::new(0.0, -180.0), Vec2::ZERO);

    let mut played = vec![];
    while let Ok(intensity) = rx.try_recv() {
        played.push(intensity);
    }
    assert_eq!(
        played,
        vec![HapticIntensity::Light, HapticIntensity::Medium, HapticIntensity::Heavy]
    );
    assert_eq!(deck.match_count(), 1);
}

#[test]
fn test_integration_fixture_validation() {
    assert_ok!(StaticCandidates::from_toml_str(
        r#"
        [[candidates]]
        id = "a"
        name = "Ada"
        role = "founder"
        "#
    ));

    assert_err!(StaticCandidates::from_toml_str(
        r#"
        [[candidates]]
        id = "a"
        name = "Ada"
        role = "founder"

        [[candidates]]
        id = "a"
        name = "Again"
        role = "investor"
        "#
    ));

    assert_err!(StaticCandidates::from_toml_str(
        r#"
        [[candidates]]
        id = "a"
        name = "Ada"
        role = "advisor"
        "#
    ));
}
