//! Tick — the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Rounds a price to 5 decimal digits, matching 5-digit FX quoting.
pub fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// A single bid/ask quote for a currency pair.
///
/// Timestamps are non-decreasing by feed precondition; the engine does not
/// validate or re-sort. Prices are rounded to 5 decimals at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub pair: String,
    pub timestamp: NaiveDateTime,
    pub bid: f64,
    pub ask: f64,
}

impl Tick {
    pub fn new(pair: impl Into<String>, timestamp: NaiveDateTime, bid: f64, ask: f64) -> Self {
        Self {
            pair: pair.into(),
            timestamp,
            bid: round5(bid),
            ask: round5(ask),
        }
    }

    /// Quoted spread, rounded to 5 decimals.
    pub fn spread(&self) -> f64 {
        round5(self.ask - self.bid)
    }
}
