//! Append-only label and summary writers.
//!
//! Label rows go to a per-run file opened once and buffered; summary rows
//! go to a shared file with open-append-close per row, serialized behind a
//! lock so parallel sweep runs interleave whole rows. Neither writer
//! deduplicates; idempotency is the runner's skip-if-output-exists check.

use crate::domain::{Outcome, SideState};
use crate::engine::{OrderSimulation, RunSummary};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Output timestamp format for label and summary rows.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to open {path} for append: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to append to {path}: {source}")]
    Append {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-run label output: one row per finalized simulation.
pub struct LabelWriter {
    path: PathBuf,
    out: BufWriter<File>,
    rows_written: u64,
}

impl LabelWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| WriteError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            out: BufWriter::new(file),
            path,
            rows_written: 0,
        })
    }

    /// Appends one finalized simulation as a label row:
    /// `pair,timestamp,bid,ask,buy_concluding_timestamp,buy_limit,buy_stop,
    /// buy_conclusion,sell_concluding_timestamp,sell_limit,sell_stop,
    /// sell_conclusion`.
    pub fn append(&mut self, sim: &OrderSimulation) -> Result<(), WriteError> {
        let tick = sim.tick();
        let (buy_ts, buy_conclusion) = side_fields(sim.buy());
        let (sell_ts, sell_conclusion) = side_fields(sim.sell());

        writeln!(
            self.out,
            "{},{},{:.5},{:.5},{},{:.5},{:.5},{},{},{:.5},{:.5},{}",
            tick.pair,
            tick.timestamp.format(OUTPUT_TIMESTAMP_FORMAT),
            tick.bid,
            tick.ask,
            buy_ts,
            sim.buy_limit(),
            sim.buy_stop(),
            buy_conclusion,
            sell_ts,
            sim.sell_limit(),
            sim.sell_stop(),
            sell_conclusion,
        )
        .map_err(|source| WriteError::Append {
            path: self.path.clone(),
            source,
        })?;

        self.rows_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), WriteError> {
        self.out.flush().map_err(|source| WriteError::Append {
            path: self.path.clone(),
            source,
        })
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Concluding timestamp (empty when force-concluded) and wire-name
/// conclusion for one side of a finalized simulation.
fn side_fields(state: &SideState) -> (String, &'static str) {
    let timestamp = state
        .concluding()
        .map(|tick| tick.timestamp.format(OUTPUT_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();
    let conclusion = state.outcome().map(Outcome::as_str).unwrap_or("");
    (timestamp, conclusion)
}

/// Shared summary output: one row per completed run.
///
/// Appends are serialized by an internal lock so the writer can be shared
/// by reference across parallel sweep workers.
pub struct SummaryWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SummaryWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one summary row:
    /// `target_pips,stop_pips,window_length,buy_stop,buy_limit,buy_window,
    /// sell_stop,sell_limit,sell_window,out_of_sample,spread_limit,
    /// in_sample,double_stop,double_limit,version_tag,run_start_time,
    /// elapsed_seconds`.
    pub fn append(&self, summary: &RunSummary) -> Result<(), WriteError> {
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| WriteError::Open {
                path: self.path.clone(),
                source,
            })?;

        let tally = &summary.tally;
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{:.3}",
            summary.target_pips,
            summary.stop_pips,
            summary.window_length,
            tally.buy_stop,
            tally.buy_limit,
            tally.buy_window,
            tally.sell_stop,
            tally.sell_limit,
            tally.sell_window,
            tally.out_of_sample,
            tally.spread_limit,
            tally.in_sample,
            tally.double_stop,
            tally.double_limit,
            summary.version_tag,
            summary.run_start.format(OUTPUT_TIMESTAMP_FORMAT),
            summary.elapsed_seconds,
        )
        .map_err(|source| WriteError::Append {
            path: self.path.clone(),
            source,
        })
    }
}
