//! Order simulation — hypothetical buy and sell orders at one reference tick.

use crate::domain::{round5, Outcome, SideState, Tick};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A pip is 1e-4 of a quoted price.
const PIP: f64 = 1e-4;

/// One reference tick plus the four threshold prices derived from it, and
/// the resolution state of the hypothetical buy and sell orders.
///
/// Thresholds are rounded to 5 decimals; the raw target distance is kept
/// unrounded for the spread gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSimulation {
    tick: Tick,
    target_distance: f64,
    sell_limit: f64,
    sell_stop: f64,
    buy_limit: f64,
    buy_stop: f64,
    buy: SideState,
    sell: SideState,
}

impl OrderSimulation {
    pub fn new(tick: Tick, target_pips: f64, stop_pips: f64) -> Self {
        let target_distance = target_pips * PIP;
        let stop_distance = stop_pips * PIP;
        Self {
            sell_limit: round5(tick.bid - target_distance),
            sell_stop: round5(tick.bid + stop_distance),
            buy_limit: round5(tick.ask + target_distance),
            buy_stop: round5(tick.ask - stop_distance),
            target_distance,
            tick,
            buy: SideState::Unresolved,
            sell: SideState::Unresolved,
        }
    }

    pub fn tick(&self) -> &Tick {
        &self.tick
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.tick.timestamp
    }

    pub fn target_distance(&self) -> f64 {
        self.target_distance
    }

    pub fn sell_limit(&self) -> f64 {
        self.sell_limit
    }

    pub fn sell_stop(&self) -> f64 {
        self.sell_stop
    }

    pub fn buy_limit(&self) -> f64 {
        self.buy_limit
    }

    pub fn buy_stop(&self) -> f64 {
        self.buy_stop
    }

    pub fn buy(&self) -> &SideState {
        &self.buy
    }

    pub fn sell(&self) -> &SideState {
        &self.sell
    }

    /// True once both sides are resolved.
    pub fn is_resolved(&self) -> bool {
        self.buy.is_resolved() && self.sell.is_resolved()
    }

    /// Evaluates one later tick against both unresolved sides.
    ///
    /// Boundaries are inclusive, and on each side the limit check runs
    /// strictly before the stop check. The ordering is a tie-break that
    /// must hold even though the two conditions are not expected to overlap
    /// in valid input.
    ///
    /// Returns true once both sides are resolved, so the caller can stop
    /// scanning further candidates.
    pub fn compare(&mut self, candidate: &Tick) -> bool {
        if !self.sell.is_resolved() {
            if candidate.ask <= self.sell_limit {
                self.sell = SideState::Resolved {
                    outcome: Outcome::Limit,
                    concluding: Some(candidate.clone()),
                };
            } else if candidate.ask >= self.sell_stop {
                self.sell = SideState::Resolved {
                    outcome: Outcome::Stop,
                    concluding: Some(candidate.clone()),
                };
            }
        }

        if !self.buy.is_resolved() {
            if candidate.bid >= self.buy_limit {
                self.buy = SideState::Resolved {
                    outcome: Outcome::Limit,
                    concluding: Some(candidate.clone()),
                };
            } else if candidate.bid <= self.buy_stop {
                self.buy = SideState::Resolved {
                    outcome: Outcome::Stop,
                    concluding: Some(candidate.clone()),
                };
            }
        }

        self.is_resolved()
    }

    /// Force-resolves any still-unresolved side with `outcome` and no
    /// concluding tick. Sides already resolved are left untouched.
    pub fn conclude(&mut self, outcome: Outcome) {
        if !self.buy.is_resolved() {
            self.buy = SideState::Resolved {
                outcome,
                concluding: None,
            };
        }
        if !self.sell.is_resolved() {
            self.sell = SideState::Resolved {
                outcome,
                concluding: None,
            };
        }
    }
}
