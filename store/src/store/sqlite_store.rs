//! SqliteMomentStore
//! --------------------
//! SQLite-backed implementation of the `MomentStore` trait. It owns:
//!
//!  - schema creation on startup (four append-only tables)
//!  - the insert-only write surface used by the signal engine
//!  - the small read surface collaborators need (`latest_ema` for crash
//!    recovery, `recent_signals` for strategy bots)
//!
//! Row ids come from SQLite's rowid allocation; the engine never supplies
//! one, so replayed inserts always land as new rows.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use market::pulse::momentum::MomentumReading;
use market::pulse::spread::SpreadReading;
use market::types::{Instrument, Tick};

use super::MomentStore;
use crate::model::{
    EmaCalculation, PriceMoment, RecommendedAction, SignalDraft, SpreadAnalysis, TradingSignal,
};

pub struct SqliteMomentStore {
    pool: SqlitePool,
}

impl SqliteMomentStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `path` and ensure the schema exists.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(path).await?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    /// Create the four engine tables if they do not exist. Idempotent.
    pub async fn init_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS price_moments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                instrument TEXT NOT NULL,
                ts_ms INTEGER NOT NULL,
                price REAL NOT NULL,
                volume REAL NOT NULL,
                best_bid REAL,
                best_ask REAL
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ema_calculations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                instrument TEXT NOT NULL,
                ts_ms INTEGER NOT NULL,
                price REAL NOT NULL,
                ema_short REAL NOT NULL,
                ema_long REAL NOT NULL,
                momentum REAL NOT NULL
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS spread_analyses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                instrument TEXT NOT NULL,
                ts_ms INTEGER NOT NULL,
                best_bid REAL,
                best_ask REAL,
                spread REAL,
                spread_percentage REAL,
                volume REAL,
                crossed INTEGER NOT NULL DEFAULT 0
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trading_signals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                instrument TEXT NOT NULL,
                ts_ms INTEGER NOT NULL,
                price REAL NOT NULL,
                momentum REAL NOT NULL,
                spread REAL,
                spread_percentage REAL,
                signal_strength REAL NOT NULL,
                recommended_action TEXT NOT NULL
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl MomentStore for SqliteMomentStore {
    async fn insert_moment(&self, tick: &Tick) -> anyhow::Result<PriceMoment> {
        let result = sqlx::query(
            r#"
            INSERT INTO price_moments (instrument, ts_ms, price, volume, best_bid, best_ask)
            VALUES (?, ?, ?, ?, ?, ?);
        "#,
        )
        .bind(tick.instrument.as_str())
        .bind(tick.ts_ms as i64)
        .bind(tick.price)
        .bind(tick.volume)
        .bind(tick.best_bid)
        .bind(tick.best_ask)
        .execute(&self.pool)
        .await?;

        Ok(PriceMoment {
            id: result.last_insert_rowid(),
            instrument: tick.instrument.as_str().to_string(),
            ts_ms: tick.ts_ms,
            price: tick.price,
            volume: tick.volume,
            best_bid: tick.best_bid,
            best_ask: tick.best_ask,
        })
    }

    async fn insert_ema(
        &self,
        instrument: &Instrument,
        reading: &MomentumReading,
    ) -> anyhow::Result<EmaCalculation> {
        let result = sqlx::query(
            r#"
            INSERT INTO ema_calculations (instrument, ts_ms, price, ema_short, ema_long, momentum)
            VALUES (?, ?, ?, ?, ?, ?);
        "#,
        )
        .bind(instrument.as_str())
        .bind(reading.ts_ms as i64)
        .bind(reading.price)
        .bind(reading.ema_short)
        .bind(reading.ema_long)
        .bind(reading.momentum)
        .execute(&self.pool)
        .await?;

        Ok(EmaCalculation {
            id: result.last_insert_rowid(),
            instrument: instrument.as_str().to_string(),
            ts_ms: reading.ts_ms,
            price: reading.price,
            ema_short: reading.ema_short,
            ema_long: reading.ema_long,
            momentum: reading.momentum,
        })
    }

    async fn insert_spread(
        &self,
        instrument: &Instrument,
        reading: &SpreadReading,
    ) -> anyhow::Result<SpreadAnalysis> {
        let result = sqlx::query(
            r#"
            INSERT INTO spread_analyses (
                instrument, ts_ms, best_bid, best_ask,
                spread, spread_percentage, volume, crossed
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?);
        "#,
        )
        .bind(instrument.as_str())
        .bind(reading.ts_ms as i64)
        .bind(reading.best_bid)
        .bind(reading.best_ask)
        .bind(reading.spread)
        .bind(reading.spread_percentage)
        .bind(reading.volume)
        .bind(reading.crossed)
        .execute(&self.pool)
        .await?;

        Ok(SpreadAnalysis {
            id: result.last_insert_rowid(),
            instrument: instrument.as_str().to_string(),
            ts_ms: reading.ts_ms,
            best_bid: reading.best_bid,
            best_ask: reading.best_ask,
            spread: reading.spread,
            spread_percentage: reading.spread_percentage,
            volume: reading.volume,
            crossed: reading.crossed,
        })
    }

    async fn insert_signal(
        &self,
        instrument: &Instrument,
        draft: &SignalDraft,
    ) -> anyhow::Result<TradingSignal> {
        let result = sqlx::query(
            r#"
            INSERT INTO trading_signals (
                instrument, ts_ms, price, momentum,
                spread, spread_percentage, signal_strength, recommended_action
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?);
        "#,
        )
        .bind(instrument.as_str())
        .bind(draft.ts_ms as i64)
        .bind(draft.price)
        .bind(draft.momentum)
        .bind(draft.spread)
        .bind(draft.spread_percentage)
        .bind(draft.signal_strength)
        .bind(draft.recommended_action.to_string())
        .execute(&self.pool)
        .await?;

        Ok(TradingSignal {
            id: result.last_insert_rowid(),
            instrument: instrument.as_str().to_string(),
            ts_ms: draft.ts_ms,
            price: draft.price,
            momentum: draft.momentum,
            spread: draft.spread,
            spread_percentage: draft.spread_percentage,
            signal_strength: draft.signal_strength,
            recommended_action: draft.recommended_action,
        })
    }

    async fn latest_ema(&self, instrument: &Instrument) -> anyhow::Result<Option<EmaCalculation>> {
        let row = sqlx::query(
            r#"
            SELECT id, instrument, ts_ms, price, ema_short, ema_long, momentum
            FROM ema_calculations
            WHERE instrument = ?
            ORDER BY id DESC
            LIMIT 1;
        "#,
        )
        .bind(instrument.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        Ok(Some(EmaCalculation {
            id: row.get("id"),
            instrument: row.get("instrument"),
            ts_ms: row.get::<i64, _>("ts_ms") as u64,
            price: row.get("price"),
            ema_short: row.get("ema_short"),
            ema_long: row.get("ema_long"),
            momentum: row.get("momentum"),
        }))
    }

    async fn recent_signals(
        &self,
        instrument: &Instrument,
        limit: u32,
    ) -> anyhow::Result<Vec<TradingSignal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, instrument, ts_ms, price, momentum,
                   spread, spread_percentage, signal_strength, recommended_action
            FROM trading_signals
            WHERE instrument = ?
            ORDER BY id DESC
            LIMIT ?;
        "#,
        )
        .bind(instrument.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut signals = Vec::with_capacity(rows.len());

        for row in rows {
            let action_str: String = row.get("recommended_action");
            let recommended_action = RecommendedAction::from_str(&action_str)?;

            signals.push(TradingSignal {
                id: row.get("id"),
                instrument: row.get("instrument"),
                ts_ms: row.get::<i64, _>("ts_ms") as u64,
                price: row.get("price"),
                momentum: row.get("momentum"),
                spread: row.get("spread"),
                spread_percentage: row.get("spread_percentage"),
                signal_strength: row.get("signal_strength"),
                recommended_action,
            });
        }

        Ok(signals)
    }
}
