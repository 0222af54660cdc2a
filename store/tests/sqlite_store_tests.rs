use sqlx::SqlitePool;

use market::pulse::momentum::MomentumReading;
use market::pulse::spread::SpreadReading;
use market::types::{Instrument, Tick};
use store::model::{RecommendedAction, SignalDraft};
use store::store::MomentStore;
use store::store::sqlite_store::SqliteMomentStore;

fn instrument() -> Instrument {
    Instrument::new("UK-BL-MAR-25")
}

fn sample_tick() -> Tick {
    Tick {
        instrument: instrument(),
        ts_ms: 1_000,
        price: 100.25,
        volume: 42.0,
        best_bid: Some(100.00),
        best_ask: Some(100.50),
    }
}

fn sample_ema(ts_ms: u64) -> MomentumReading {
    MomentumReading {
        ts_ms,
        price: 100.25,
        ema_short: 100.3,
        ema_long: 100.1,
        momentum: 100.3 - 100.1,
    }
}

fn sample_spread() -> SpreadReading {
    SpreadReading {
        ts_ms: 1_000,
        best_bid: Some(100.00),
        best_ask: Some(100.50),
        spread: Some(0.50),
        spread_percentage: Some(0.50),
        volume: Some(42.0),
        crossed: false,
    }
}

fn sample_draft(strength: f64, action: RecommendedAction) -> SignalDraft {
    SignalDraft {
        ts_ms: 1_000,
        price: 100.25,
        momentum: 0.2,
        spread: Some(0.50),
        spread_percentage: Some(0.50),
        signal_strength: strength,
        recommended_action: action,
    }
}

async fn store_with_schema(pool: SqlitePool) -> SqliteMomentStore {
    let store = SqliteMomentStore::from_pool(pool);
    store.init_schema().await.expect("schema init");
    store
}

#[sqlx::test]
async fn moment_insert_assigns_monotonic_ids(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool).await;

    let first = store.insert_moment(&sample_tick()).await?;
    let second = store.insert_moment(&sample_tick()).await?;

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.price, 100.25);
    assert_eq!(first.best_bid, Some(100.00));

    Ok(())
}

#[sqlx::test]
async fn replayed_tick_lands_as_a_new_row(pool: SqlitePool) -> anyhow::Result<()> {
    // The store never deduplicates: the engine has no dedup responsibility
    // and ids come from the storage layer.
    let store = store_with_schema(pool).await;
    let tick = sample_tick();

    let a = store.insert_moment(&tick).await?;
    let b = store.insert_moment(&tick).await?;

    assert_ne!(a.id, b.id);
    assert_eq!(a.ts_ms, b.ts_ms);

    Ok(())
}

#[sqlx::test]
async fn latest_ema_returns_the_most_recent_row(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool).await;
    let inst = instrument();

    assert!(store.latest_ema(&inst).await?.is_none());

    store.insert_ema(&inst, &sample_ema(1_000)).await?;
    store.insert_ema(&inst, &sample_ema(2_000)).await?;
    let last = store.insert_ema(&inst, &sample_ema(3_000)).await?;

    let loaded = store.latest_ema(&inst).await?.expect("row present");

    assert_eq!(loaded.id, last.id);
    assert_eq!(loaded.ts_ms, 3_000);
    assert_eq!(loaded.ema_short, 100.3);
    assert_eq!(loaded.ema_long, 100.1);
    assert_eq!(loaded.momentum, loaded.ema_short - loaded.ema_long);

    Ok(())
}

#[sqlx::test]
async fn latest_ema_is_scoped_per_instrument(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool).await;
    let a = Instrument::new("UK-BL-MAR-25");
    let b = Instrument::new("NL-BL-MAR-25");

    store.insert_ema(&a, &sample_ema(1_000)).await?;

    assert!(store.latest_ema(&a).await?.is_some());
    assert!(store.latest_ema(&b).await?.is_none());

    Ok(())
}

#[sqlx::test]
async fn spread_round_trips_null_fields_and_crossed_flag(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool).await;
    let inst = instrument();

    let half_formed = SpreadReading {
        best_ask: None,
        spread: None,
        spread_percentage: None,
        ..sample_spread()
    };
    let stored = store.insert_spread(&inst, &half_formed).await?;
    assert_eq!(stored.spread, None);
    assert_eq!(stored.spread_percentage, None);
    assert!(!stored.crossed);

    let crossed = SpreadReading {
        best_bid: Some(100.50),
        best_ask: Some(100.00),
        spread: Some(-0.50),
        spread_percentage: Some(-0.50),
        crossed: true,
        ..sample_spread()
    };
    let stored = store.insert_spread(&inst, &crossed).await?;
    assert_eq!(stored.spread, Some(-0.50));
    assert!(stored.crossed);

    Ok(())
}

#[sqlx::test]
async fn recent_signals_returns_newest_first_with_limit(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool).await;
    let inst = instrument();

    store
        .insert_signal(&inst, &sample_draft(35.0, RecommendedAction::Sell))
        .await?;
    store
        .insert_signal(&inst, &sample_draft(50.0, RecommendedAction::Hold))
        .await?;
    store
        .insert_signal(&inst, &sample_draft(65.0, RecommendedAction::Buy))
        .await?;

    let signals = store.recent_signals(&inst, 2).await?;

    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0].recommended_action, RecommendedAction::Buy);
    assert_eq!(signals[0].signal_strength, 65.0);
    assert_eq!(signals[1].recommended_action, RecommendedAction::Hold);
    assert!(signals[0].id > signals[1].id);

    Ok(())
}
