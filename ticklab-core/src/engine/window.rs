//! Sliding time window — buffers in-flight simulations and finalizes the
//! oldest once its horizon elapses.

use super::simulation::OrderSimulation;
use super::tally::OutcomeTally;
use crate::domain::{Outcome, Tick};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Per-run labeling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelParams {
    /// Take-profit distance in pips.
    pub target_pips: f64,
    /// Stop-loss distance in pips.
    pub stop_pips: f64,
    /// Lookahead horizon in seconds.
    pub window_length: f64,
    /// Minimum gap in seconds between consecutive simulations actually
    /// scanned for touches.
    pub sampling_seconds: f64,
    /// Quotes with spread at or above this fraction of the target distance
    /// are excluded as noise.
    pub spread_target_ratio: f64,
}

fn seconds_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    }
}

/// Ordered buffer of in-flight simulations plus the sampling clock and the
/// run tally.
///
/// Insertion order equals time order by the feed precondition, so eviction
/// is always from the front. Memory stays proportional to the number of
/// ticks inside one horizon, not the dataset size.
#[derive(Debug)]
pub struct SlidingWindow {
    params: LabelParams,
    buffer: VecDeque<OrderSimulation>,
    last_sampled: Option<NaiveDateTime>,
    tally: OutcomeTally,
}

impl SlidingWindow {
    pub fn new(params: LabelParams) -> Self {
        Self {
            params,
            buffer: VecDeque::new(),
            last_sampled: None,
            tally: OutcomeTally::new(),
        }
    }

    /// Absorbs one tick: appends a new simulation for it, then finalizes
    /// every front simulation whose horizon has fully elapsed.
    ///
    /// Returns the finalized simulations in reference-timestamp order
    /// (usually zero or one; more after a gap in the feed).
    pub fn ingest(&mut self, tick: Tick) -> Vec<OrderSimulation> {
        self.buffer.push_back(OrderSimulation::new(
            tick,
            self.params.target_pips,
            self.params.stop_pips,
        ));

        let mut finalized = Vec::new();
        while self.front_closed() {
            finalized.push(self.process_front());
        }
        finalized
    }

    fn front_closed(&self) -> bool {
        match (self.buffer.front(), self.buffer.back()) {
            (Some(front), Some(back)) => {
                seconds_between(front.timestamp(), back.timestamp()) >= self.params.window_length
            }
            _ => false,
        }
    }

    /// Finalizes the front simulation: sampling gate, spread gate, then a
    /// chronological scan over the remaining buffered ticks.
    fn process_front(&mut self) -> OrderSimulation {
        let mut sim = self
            .buffer
            .pop_front()
            .expect("front_closed guarantees a non-empty buffer");

        if self.past_sampling_gap(sim.timestamp()) {
            self.last_sampled = Some(sim.timestamp());
            if sim.tick().spread() >= self.params.spread_target_ratio * sim.target_distance() {
                sim.conclude(Outcome::SpreadLimit);
            } else {
                for candidate in &self.buffer {
                    if sim.compare(candidate.tick()) {
                        break;
                    }
                }
                // No touch within the horizon on a side means timeout.
                sim.conclude(Outcome::Window);
            }
        } else {
            sim.conclude(Outcome::NotInSample);
        }

        self.tally.record(&sim);
        sim
    }

    fn past_sampling_gap(&self, timestamp: NaiveDateTime) -> bool {
        match self.last_sampled {
            None => true,
            Some(last) => seconds_between(last, timestamp) >= self.params.sampling_seconds,
        }
    }

    /// Number of simulations currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn params(&self) -> &LabelParams {
        &self.params
    }

    pub fn tally(&self) -> &OutcomeTally {
        &self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn params() -> LabelParams {
        LabelParams {
            target_pips: 5.0,
            stop_pips: 5.0,
            window_length: 10.0,
            sampling_seconds: 0.0,
            spread_target_ratio: 0.5,
        }
    }

    fn tick(offset_secs: i64, bid: f64, ask: f64) -> Tick {
        let ts = NaiveDateTime::default() + Duration::seconds(offset_secs);
        Tick::new("EURGBP", ts, bid, ask)
    }

    #[test]
    fn nothing_finalizes_before_horizon() {
        let mut window = SlidingWindow::new(params());
        assert!(window.ingest(tick(0, 1.30000, 1.30002)).is_empty());
        assert!(window.ingest(tick(5, 1.30000, 1.30002)).is_empty());
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn front_finalizes_exactly_at_horizon() {
        let mut window = SlidingWindow::new(params());
        window.ingest(tick(0, 1.30000, 1.30002));
        let done = window.ingest(tick(10, 1.30000, 1.30002));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].buy().outcome(), Some(Outcome::Window));
        assert_eq!(done[0].sell().outcome(), Some(Outcome::Window));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn feed_gap_finalizes_multiple_fronts() {
        let mut window = SlidingWindow::new(params());
        window.ingest(tick(0, 1.30000, 1.30002));
        window.ingest(tick(1, 1.30000, 1.30002));
        window.ingest(tick(2, 1.30000, 1.30002));
        let done = window.ingest(tick(30, 1.30000, 1.30002));
        assert_eq!(done.len(), 3);
        assert!(done[0].timestamp() < done[1].timestamp());
        assert!(done[1].timestamp() < done[2].timestamp());
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn touch_inside_horizon_resolves_before_timeout() {
        // Wide stop distance keeps the buy stop out of reach of the
        // sell-limit touch below.
        let mut window = SlidingWindow::new(LabelParams {
            stop_pips: 20.0,
            ..params()
        });
        window.ingest(tick(0, 1.30000, 1.30002));
        // Sell limit touch at +1s, well inside the horizon.
        window.ingest(tick(1, 1.29940, 1.29950));
        let done = window.ingest(tick(10, 1.30000, 1.30002));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].sell().outcome(), Some(Outcome::Limit));
        // Buy never touched anything, so it times out.
        assert_eq!(done[0].buy().outcome(), Some(Outcome::Window));
    }

    #[test]
    fn first_finalization_always_samples() {
        let mut window = SlidingWindow::new(LabelParams {
            sampling_seconds: 3600.0,
            ..params()
        });
        window.ingest(tick(0, 1.30000, 1.30002));
        let done = window.ingest(tick(10, 1.30000, 1.30002));
        assert_eq!(done[0].buy().outcome(), Some(Outcome::Window));
        assert_eq!(window.tally().in_sample, 1);
    }

    #[test]
    fn sampling_gap_forces_not_in_sample_even_with_touch() {
        let mut window = SlidingWindow::new(LabelParams {
            sampling_seconds: 5.0,
            ..params()
        });
        window.ingest(tick(0, 1.30000, 1.30002));
        window.ingest(tick(1, 1.30000, 1.30002));
        // This tick touches the t=1 simulation's sell limit, were it scanned.
        window.ingest(tick(2, 1.29940, 1.29950));
        let done = window.ingest(tick(11, 1.30000, 1.30002));
        // Front at t=0 sampled and scanned; front at t=1 is within the 5s
        // sampling gap, so the would-be touch never happens.
        assert_eq!(done.len(), 2);
        let skipped = &done[1];
        assert_eq!(skipped.timestamp(), tick(1, 0.0, 0.0).timestamp);
        assert_eq!(skipped.buy().outcome(), Some(Outcome::NotInSample));
        assert_eq!(skipped.sell().outcome(), Some(Outcome::NotInSample));
        assert_eq!(window.tally().out_of_sample, 1);
        assert_eq!(window.tally().in_sample, 1);
    }

    #[test]
    fn wide_spread_skips_scan_entirely() {
        let mut window = SlidingWindow::new(params());
        // Spread 0.00030 >= 0.5 * 0.0005 = 0.00025, so the simulation is
        // excluded even though a sell-limit touch follows immediately.
        window.ingest(tick(0, 1.30000, 1.30030));
        window.ingest(tick(1, 1.29940, 1.29950));
        let done = window.ingest(tick(10, 1.30000, 1.30002));
        assert_eq!(done[0].buy().outcome(), Some(Outcome::SpreadLimit));
        assert_eq!(done[0].sell().outcome(), Some(Outcome::SpreadLimit));
        assert_eq!(window.tally().spread_limit, 1);
    }

    #[test]
    fn buffer_population_stays_bounded() {
        let mut window = SlidingWindow::new(params());
        // 2s spacing against a 10s horizon: at most 6 ticks ever coexist.
        let mut peak = 0;
        for i in 0..500 {
            window.ingest(tick(i * 2, 1.30000, 1.30002));
            peak = peak.max(window.len());
        }
        assert!(peak <= 6, "peak buffered population was {peak}");
    }

    #[test]
    fn tally_total_matches_finalized_count() {
        let mut window = SlidingWindow::new(params());
        let mut finalized = 0;
        for i in 0..100 {
            finalized += window.ingest(tick(i, 1.30000, 1.30002)).len();
        }
        assert_eq!(window.tally().total(), finalized as u64);
    }
}
