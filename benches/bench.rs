// Criterion benchmarks for the PitchFlic deck engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kurbo::Vec2;
use pitchflic_deck::core::{classify, CardStack, DeckSettings, HapticFeedback, HapticIntentLog};
use pitchflic_deck::models::{Candidate, CandidateRole, SwipeDecision};
use std::sync::Arc;

fn create_candidate(id: usize) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("Candidate {}", id),
        role: if id % 2 == 0 { CandidateRole::Founder } else { CandidateRole::Investor },
        headline: "Raising a seed round".to_string(),
        company: Some(format!("Company {}", id)),
        stage: Some("Seed".to_string()),
        location: None,
        image_url: None,
        tags: vec!["AI".to_string(), "Fintech".to_string()],
    }
}

fn bench_classify(c: &mut Criterion) {
    let releases = [
        (Vec2::new(40.0, 10.0), Vec2::new(120.0, 0.0)),
        (Vec2::new(180.0, 0.0), Vec2::ZERO),
        (Vec2::new(-20.0, 0.0), Vec2::new(-900.0, 0.0)),
        (Vec2::new(200.0, -200.0), Vec2::ZERO),
    ];

    c.bench_function("classify_release", |b| {
        b.iter(|| {
            for (offset, velocity) in &releases {
                black_box(classify(black_box(*offset), black_box(*velocity)));
            }
        });
    });
}

fn bench_gesture(c: &mut Criterion) {
    let candidates: Vec<Candidate> = (0..50).map(create_candidate).collect();

    c.bench_function("drag_gesture_60_moves", |b| {
        b.iter(|| {
            let log = Arc::new(HapticIntentLog::new());
            let mut deck = CardStack::new(
                candidates.clone(),
                DeckSettings::default(),
                HapticFeedback::new(log.clone()),
            );

            deck.drag_start();
            for step in 0..60 {
                deck.drag_move(Vec2::new(step as f64 * 4.0, -(step as f64)));
            }
            black_box(deck.drag_end(Vec2::new(240.0, -60.0), Vec2::new(700.0, -50.0)));
            black_box(log.drain())
        });
    });
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_until_exhausted");

    for deck_size in [10, 100, 1000].iter() {
        let candidates: Vec<Candidate> = (0..*deck_size).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("commit", deck_size),
            deck_size,
            |b, _| {
                b.iter(|| {
                    let mut deck = CardStack::new(
                        candidates.clone(),
                        DeckSettings::default(),
                        HapticFeedback::disabled(),
                    );
                    let mut turn = 0usize;
                    while !deck.is_exhausted() {
                        let decision = if turn % 3 == 0 { SwipeDecision::Like } else { SwipeDecision::Pass };
                        black_box(deck.commit(decision));
                        turn += 1;
                    }
                    black_box(deck.match_count())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_gesture, bench_commit);

criterion_main!(benches);
