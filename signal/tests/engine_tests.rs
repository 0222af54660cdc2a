use std::sync::Arc;

use market::types::{Instrument, Tick};
use signal::config::EngineConfig;
use signal::engine::SignalEngine;
use signal::types::EngineError;
use store::model::RecommendedAction;

use mock_store::InMemoryMomentStore;

fn instrument() -> Instrument {
    Instrument::new("UK-BL-MAR-25")
}

fn tick(ts_ms: u64, price: f64) -> Tick {
    Tick {
        instrument: instrument(),
        ts_ms,
        price,
        volume: 10.0,
        best_bid: Some(price - 0.25),
        best_ask: Some(price + 0.25),
    }
}

fn engine_with_store() -> (SignalEngine<InMemoryMomentStore>, Arc<InMemoryMomentStore>) {
    let store = Arc::new(InMemoryMomentStore::default());
    let engine = SignalEngine::new(instrument(), EngineConfig::default(), Arc::clone(&store));
    (engine, store)
}

#[tokio::test]
async fn one_tick_writes_all_four_records() {
    let (mut engine, store) = engine_with_store();

    let signal = engine.on_tick(&tick(1_000, 100.0)).await.unwrap();

    let tables = store.tables.lock().await;

    assert_eq!(tables.moments.len(), 1);
    assert_eq!(tables.emas.len(), 1);
    assert_eq!(tables.spreads.len(), 1);
    assert_eq!(tables.signals.len(), 1);

    // First tick seeds the recurrence: momentum zero, neutral hold.
    assert_eq!(signal.momentum, 0.0);
    assert_eq!(signal.recommended_action, RecommendedAction::Hold);
    assert_eq!(tables.spreads[0].spread, Some(0.5));
}

#[tokio::test]
async fn momentum_matches_short_minus_long_in_every_row() {
    let (mut engine, store) = engine_with_store();

    for (i, price) in [100.0, 101.0, 102.5, 101.5, 103.0].into_iter().enumerate() {
        engine.on_tick(&tick(i as u64 * 1_000, price)).await.unwrap();
    }

    let tables = store.tables.lock().await;

    assert_eq!(tables.emas.len(), 5);
    for row in &tables.emas {
        assert_eq!(row.momentum, row.ema_short - row.ema_long);
    }
}

#[tokio::test]
async fn invalid_tick_persists_nothing() {
    let (mut engine, store) = engine_with_store();

    let bad = Tick {
        price: -1.0,
        ..tick(1_000, 100.0)
    };

    let err = engine.on_tick(&bad).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTick(_)));

    let tables = store.tables.lock().await;
    assert!(tables.moments.is_empty());
    assert!(tables.emas.is_empty());
    assert!(tables.spreads.is_empty());
    assert!(tables.signals.is_empty());
}

#[tokio::test]
async fn zero_price_is_recorded_but_rejected_by_the_ema() {
    let (mut engine, store) = engine_with_store();

    let flat = Tick {
        price: 0.0,
        ..tick(1_000, 100.0)
    };

    let err = engine.on_tick(&flat).await.unwrap_err();
    assert!(matches!(err, EngineError::Pulse(_)));

    // The moment was already persisted (append-only, no rollback); nothing
    // downstream of the EMA ran.
    let tables = store.tables.lock().await;
    assert_eq!(tables.moments.len(), 1);
    assert!(tables.emas.is_empty());
    assert!(tables.signals.is_empty());
}

#[tokio::test]
async fn replayed_tick_appends_a_second_row() {
    let (mut engine, store) = engine_with_store();
    let t = tick(1_000, 100.0);

    engine.on_tick(&t).await.unwrap();
    engine.on_tick(&t).await.unwrap();

    let tables = store.tables.lock().await;
    assert_eq!(tables.moments.len(), 2);
    assert_ne!(tables.moments[0].id, tables.moments[1].id);
}

#[tokio::test]
async fn crossed_book_flows_through_without_error() {
    let (mut engine, store) = engine_with_store();

    let crossed = Tick {
        best_bid: Some(100.50),
        best_ask: Some(100.00),
        ..tick(1_000, 100.25)
    };

    engine.on_tick(&crossed).await.unwrap();

    let tables = store.tables.lock().await;
    assert!(tables.spreads[0].crossed);
    assert_eq!(tables.spreads[0].spread, Some(-0.5));
    assert_eq!(tables.signals.len(), 1);
}

#[tokio::test]
async fn resume_continues_the_recurrence_from_storage() {
    let store = Arc::new(InMemoryMomentStore::default());
    let config = EngineConfig::default();

    // Uninterrupted reference run.
    let mut reference =
        SignalEngine::new(instrument(), config.clone(), Arc::clone(&store));
    for (i, price) in [100.0, 101.0, 102.0].into_iter().enumerate() {
        reference.on_tick(&tick(i as u64 * 1_000, price)).await.unwrap();
    }
    let expected = reference.on_tick(&tick(3_000, 103.0)).await.unwrap();

    // Crash after three ticks, resume, replay the fourth.
    let store2 = Arc::new(InMemoryMomentStore::default());
    let mut before_crash =
        SignalEngine::new(instrument(), config.clone(), Arc::clone(&store2));
    for (i, price) in [100.0, 101.0, 102.0].into_iter().enumerate() {
        before_crash.on_tick(&tick(i as u64 * 1_000, price)).await.unwrap();
    }
    drop(before_crash);

    let mut resumed = SignalEngine::resume(instrument(), config, Arc::clone(&store2))
        .await
        .unwrap();
    let actual = resumed.on_tick(&tick(3_000, 103.0)).await.unwrap();

    assert_eq!(actual.momentum, expected.momentum);
    assert_eq!(actual.signal_strength, expected.signal_strength);
    assert_eq!(actual.recommended_action, expected.recommended_action);
}

#[tokio::test]
async fn store_failure_surfaces_without_retry() {
    let (mut engine, store) = engine_with_store();

    store.set_failing(true);

    let err = engine.on_tick(&tick(1_000, 100.0)).await.unwrap_err();
    assert!(matches!(err, EngineError::Store(_)));

    store.set_failing(false);
    let tables = store.tables.lock().await;
    assert!(tables.moments.is_empty());
}
