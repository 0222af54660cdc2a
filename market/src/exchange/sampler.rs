//! Collapses one window of exchange orders into a single normalized tick.
//!
//! Sampling rules:
//! - best bid = highest-priced limit buy in the window
//! - best ask = lowest-priced limit sell in the window
//! - market orders are assumed to fill at the touch on their own side
//! - sample price = volume-weighted average over priced orders
//! - sample volume = total quantity in the window
//!
//! An empty window produces no tick. A side with no limit orders yields
//! `None` for that touch rather than a zero sentinel, so downstream spread
//! analysis can tell "no book" from "free".

use crate::types::{Instrument, Tick};

use super::types::{OrderRecord, OrderSide, OrderType};

/// Best limit prices in the window, if present.
pub fn best_bid_and_ask(orders: &[OrderRecord]) -> (Option<f64>, Option<f64>) {
    let mut best_bid: Option<f64> = None;
    let mut best_ask: Option<f64> = None;

    for order in orders {
        if order.order_type != OrderType::Limit {
            continue;
        }
        let Some(price) = order.price else { continue };

        match order.side {
            OrderSide::Buy => {
                best_bid = Some(best_bid.map_or(price, |b: f64| b.max(price)));
            }
            OrderSide::Sell => {
                best_ask = Some(best_ask.map_or(price, |a: f64| a.min(price)));
            }
        }
    }

    (best_bid, best_ask)
}

/// Collapse a sorted order window into one tick.
///
/// Returns `None` when the window carries no volume. The tick timestamp is
/// the placement time of the first order in the window.
pub fn sample_window(instrument: &Instrument, orders: &[OrderRecord]) -> Option<Tick> {
    let first = orders.first()?;

    let (best_bid, best_ask) = best_bid_and_ask(orders);

    let mut volume = 0.0;
    let mut notional = 0.0;

    for order in orders {
        volume += order.quantity;

        let effective = match order.order_type {
            OrderType::Limit => order.price,
            OrderType::Market => match order.side {
                OrderSide::Buy => best_bid,
                OrderSide::Sell => best_ask,
            },
        };

        if let Some(price) = effective {
            notional += price * order.quantity;
        }
    }

    if volume <= 0.0 {
        return None;
    }

    Some(Tick {
        instrument: instrument.clone(),
        ts_ms: first.placed_at.timestamp_millis() as u64,
        price: notional / volume,
        volume,
        best_bid,
        best_ask,
    })
}
