//! Outcome tally — fixed-category counters for the run-level summary.

use super::simulation::OrderSimulation;
use crate::domain::Outcome;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Running counts of finalized simulation outcomes.
///
/// The category set is closed, so this is a plain struct rather than a
/// string-keyed map: the sum invariant (`out_of_sample + spread_limit +
/// in_sample == total finalized`) holds by construction of `record`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub buy_stop: u64,
    pub buy_limit: u64,
    pub buy_window: u64,
    pub sell_stop: u64,
    pub sell_limit: u64,
    pub sell_window: u64,
    pub out_of_sample: u64,
    pub in_sample: u64,
    pub spread_limit: u64,
    pub double_stop: u64,
    pub double_limit: u64,
}

impl OutcomeTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies one finalized simulation.
    ///
    /// Sampling and spread-filter states are mirrored on both sides by
    /// construction, so the buy side alone selects between
    /// `out_of_sample`/`spread_limit`/`in_sample`; per-side and
    /// co-occurrence counters only move for in-sample simulations.
    pub fn record(&mut self, sim: &OrderSimulation) {
        let (Some(buy), Some(sell)) = (sim.buy().outcome(), sim.sell().outcome()) else {
            debug_assert!(false, "record called on an unfinalized simulation");
            return;
        };

        match buy {
            Outcome::NotInSample => self.out_of_sample += 1,
            Outcome::SpreadLimit => self.spread_limit += 1,
            _ => {
                self.in_sample += 1;
                match buy {
                    Outcome::Limit => self.buy_limit += 1,
                    Outcome::Stop => self.buy_stop += 1,
                    Outcome::Window => self.buy_window += 1,
                    _ => {}
                }
                match sell {
                    Outcome::Limit => self.sell_limit += 1,
                    Outcome::Stop => self.sell_stop += 1,
                    Outcome::Window => self.sell_window += 1,
                    _ => {}
                }
                if buy == Outcome::Stop && sell == Outcome::Stop {
                    self.double_stop += 1;
                }
                if buy == Outcome::Limit && sell == Outcome::Limit {
                    self.double_limit += 1;
                }
            }
        }
    }

    /// Total finalized simulations recorded so far.
    pub fn total(&self) -> u64 {
        self.out_of_sample + self.spread_limit + self.in_sample
    }
}

/// One summary row for a completed run: configuration, tally snapshot,
/// and provenance (version tag, start time, wall-clock seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub target_pips: f64,
    pub stop_pips: f64,
    pub window_length: f64,
    pub tally: OutcomeTally,
    pub version_tag: String,
    pub run_start: NaiveDateTime,
    pub elapsed_seconds: f64,
}
