//! Single-run entry point — wires feed, window, and writers together.
//!
//! A run either completes, fails fast on the first error, or is skipped
//! outright because its output already exists. There are no retries.

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use ticklab_core::data::feed::FeedError;
use ticklab_core::data::writer::WriteError;
use ticklab_core::data::{LabelWriter, SummaryWriter, TickFeed};
use ticklab_core::engine::{OutcomeTally, RunSummary, SlidingWindow};

use crate::config::RunConfig;

/// Errors from a single labeling run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("write error: {0}")]
    Write(#[from] WriteError),
}

/// Result of one labeling run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub config: RunConfig,
    pub labels_path: PathBuf,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed {
        tally: OutcomeTally,
        rows_written: u64,
        elapsed_seconds: f64,
    },
    /// Output for this configuration already existed; nothing was read or
    /// written.
    SkippedExisting,
}

impl RunReport {
    pub fn skipped(&self) -> bool {
        matches!(self.outcome, RunOutcome::SkippedExisting)
    }

    /// True when the run completed and labeled at least one tick. A
    /// completed run with zero rows means the window never closed,
    /// typically because the feed is shorter than the window length.
    pub fn produced_output(&self) -> bool {
        matches!(
            self.outcome,
            RunOutcome::Completed { rows_written, .. } if rows_written > 0
        )
    }
}

/// Runs one labeling pass for `config` under `base_dir`.
///
/// Skips idempotently when the labels file already exists, so a restarted
/// sweep never double-processes a combination. On error the partial labels
/// file is removed: no partial output is treated as valid.
pub fn run_labeling(
    config: &RunConfig,
    base_dir: &Path,
    version_tag: &str,
    summary: &SummaryWriter,
) -> Result<RunReport, RunError> {
    let paths = config.paths(base_dir, version_tag);

    if paths.labels.exists() {
        log::info!("output file already exists, skipping {}", config.grid_label());
        return Ok(RunReport {
            config: config.clone(),
            labels_path: paths.labels,
            outcome: RunOutcome::SkippedExisting,
        });
    }

    log::info!("processing {}", config.grid_label());
    log::debug!("run fingerprint {}", config.fingerprint());
    let run_start = chrono::Local::now().naive_local();
    let started = Instant::now();

    let result = label_feed(config, &paths.feed, &paths.labels);
    let (tally, rows_written) = match result {
        Ok(outputs) => outputs,
        Err(err) => {
            // A half-written labels file would make the next rerun skip
            // this combination as already done.
            let _ = std::fs::remove_file(&paths.labels);
            return Err(err);
        }
    };

    let elapsed_seconds = started.elapsed().as_secs_f64();
    summary.append(&RunSummary {
        target_pips: config.target_pips,
        stop_pips: config.stop_pips,
        window_length: config.window_length,
        tally: tally.clone(),
        version_tag: version_tag.to_string(),
        run_start,
        elapsed_seconds,
    })?;

    if rows_written == 0 {
        log::warn!(
            "{}: no ticks labeled. The window never closed; the feed may be \
             shorter than the window length",
            config.grid_label()
        );
    } else {
        log::info!(
            "{}: labeled {} ticks in {:.1}s",
            config.grid_label(),
            rows_written,
            elapsed_seconds
        );
    }

    Ok(RunReport {
        config: config.clone(),
        labels_path: paths.labels,
        outcome: RunOutcome::Completed {
            tally,
            rows_written,
            elapsed_seconds,
        },
    })
}

/// Streams the feed through a fresh window, appending finalized rows.
fn label_feed(
    config: &RunConfig,
    feed_path: &Path,
    labels_path: &Path,
) -> Result<(OutcomeTally, u64), RunError> {
    let feed = TickFeed::open(feed_path)?;
    let mut window = SlidingWindow::new(config.params());
    let mut writer = LabelWriter::create(labels_path)?;

    for tick in feed {
        for sim in window.ingest(tick?) {
            writer.append(&sim)?;
        }
    }
    writer.flush()?;

    Ok((window.tally().clone(), writer.rows_written()))
}
