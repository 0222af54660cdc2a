//! Drift-compensated feed poller.
//!
//! Samples the exchange order log in fixed, contiguous windows that trail
//! real time by a base drift, so each query only sees windows the exchange
//! has finished filling. The sleep between cycles is corrected by the
//! measured drift error each cycle to keep the lag constant.

use chrono::{DateTime, Duration as TimeDelta, Utc};
use tokio::sync::mpsc::Sender;
use tokio::time::{Duration, sleep};
use tracing::{debug, info};

use super::sampler::sample_window;
use super::{FeedError, OrderSource};
use crate::types::{Instrument, Tick};

/// Feed poller configuration.
#[derive(Clone, Copy, Debug)]
pub struct PollerConfig {
    /// Width of each sample window.
    pub sample_interval_ms: u64,
    /// Target lag between real time and the window being sampled. Must
    /// exceed the sample interval or windows would be queried before they
    /// close.
    pub base_drift_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 1_000,
            base_drift_ms: 1_100,
        }
    }
}

/// Run the polling loop for one instrument, emitting one tick per non-empty
/// sample window into `tick_tx`.
///
/// The channel is bounded; a slow consumer blocks this loop rather than
/// losing windows. Fetch errors surface to the caller unmodified; the
/// caller owns any retry decision.
pub async fn run_exchange_feed<S: OrderSource>(
    source: S,
    instrument: Instrument,
    config: PollerConfig,
    tick_tx: Sender<Tick>,
) -> Result<(), FeedError> {
    let interval = TimeDelta::milliseconds(config.sample_interval_ms as i64);

    let mut start = Utc::now() - TimeDelta::milliseconds(config.base_drift_ms as i64);
    let mut end = start + interval;

    info!(
        instrument = %instrument,
        window_ms = config.sample_interval_ms,
        drift_ms = config.base_drift_ms,
        "exchange feed poller started"
    );

    loop {
        let orders = source.fetch_orders(&instrument, start, end).await?;

        match sample_window(&instrument, &orders) {
            Some(tick) => {
                debug!(
                    instrument = %instrument,
                    orders = orders.len(),
                    price = tick.price,
                    volume = tick.volume,
                    "window sampled"
                );

                if tick_tx.send(tick).await.is_err() {
                    return Err(FeedError::ChannelClosed);
                }
            }
            None => {
                debug!(instrument = %instrument, "no orders in window");
            }
        }

        let now = Utc::now();
        start = end;
        end = start + interval;

        sleep(adjusted_sleep(now, start, &config)).await;
    }
}

/// Sleep needed before querying the window starting at `window_start`.
///
/// The drift error is how far real time has already run ahead of the window
/// start; sleeping `base_drift - 2 * error` re-centers the next cycle on the
/// target lag. Clamped at zero when the loop has fallen behind.
fn adjusted_sleep(
    now: DateTime<Utc>,
    window_start: DateTime<Utc>,
    config: &PollerConfig,
) -> Duration {
    let drift_error_ms = (now - window_start).num_milliseconds();
    let adjusted_ms = config.base_drift_ms as i64 - 2 * drift_error_ms;

    Duration::from_millis(adjusted_ms.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn config() -> PollerConfig {
        PollerConfig {
            sample_interval_ms: 1_000,
            base_drift_ms: 1_100,
        }
    }

    #[test]
    fn on_schedule_sleeps_close_to_base_drift() {
        // Real time exactly at the window start: full drift ahead.
        let d = adjusted_sleep(at(10_000), at(10_000), &config());
        assert_eq!(d, Duration::from_millis(1_100));
    }

    #[test]
    fn running_late_shrinks_the_sleep() {
        // 300ms behind: sleep shrinks by twice the error.
        let d = adjusted_sleep(at(10_300), at(10_000), &config());
        assert_eq!(d, Duration::from_millis(500));
    }

    #[test]
    fn badly_behind_clamps_to_zero() {
        let d = adjusted_sleep(at(12_000), at(10_000), &config());
        assert_eq!(d, Duration::from_millis(0));
    }

    #[test]
    fn running_early_stretches_the_sleep() {
        let d = adjusted_sleep(at(9_900), at(10_000), &config());
        assert_eq!(d, Duration::from_millis(1_300));
    }
}
