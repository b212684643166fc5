//! Parameter sweep — one independent labeling run per grid combination.
//!
//! Combinations share nothing but the append-only summary sink, so they
//! distribute across rayon workers with no coordination beyond each run's
//! own skip-if-output-exists check. A failed combination is logged and the
//! sweep moves on.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use ticklab_core::data::SummaryWriter;

use crate::bootstrap;
use crate::config::{RunConfig, SweepConfig};
use crate::runner::{run_labeling, RunReport};
use crate::version::version_tag;

/// Sweep executor over a data tree rooted at `base_dir`.
pub struct Sweep {
    base_dir: PathBuf,
    parallel: bool,
}

impl Sweep {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Runs every combination in the grid.
    ///
    /// The output directories are created up front; the shared summary
    /// writer serializes appends internally.
    pub fn run(&self, config: &SweepConfig) -> Result<SweepReport> {
        bootstrap::create_local_directories(&self.base_dir)
            .context("failed to create output directories")?;

        let tag = version_tag();
        let configs = config.expand();
        if configs.is_empty() {
            anyhow::bail!("sweep grid is empty");
        }
        let total = configs.len();
        log::info!(
            "sweep of {} combinations for {}-{}-{} (version {})",
            total,
            config.pair,
            config.year,
            config.month,
            tag
        );

        // Any combination's summary path works: the grid shares one sink.
        let summary_path = configs[0].paths(&self.base_dir, &tag).summary;
        let summary = SummaryWriter::new(summary_path);
        let started = Instant::now();

        let outcomes: Vec<(RunConfig, Result<RunReport, crate::runner::RunError>)> =
            if self.parallel {
                configs
                    .into_par_iter()
                    .map(|c| {
                        let report = run_labeling(&c, &self.base_dir, &tag, &summary);
                        (c, report)
                    })
                    .collect()
            } else {
                configs
                    .into_iter()
                    .map(|c| {
                        let report = run_labeling(&c, &self.base_dir, &tag, &summary);
                        (c, report)
                    })
                    .collect()
            };

        let mut report = SweepReport {
            total,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            ..SweepReport::default()
        };
        for (config, outcome) in outcomes {
            match outcome {
                Ok(run) if run.skipped() => {
                    report.skipped += 1;
                    report.reports.push(run);
                }
                Ok(run) => {
                    report.completed += 1;
                    report.reports.push(run);
                }
                Err(err) => {
                    log::error!("{} failed: {err}", config.grid_label());
                    report.failed += 1;
                    report.errors.push((config.grid_label(), err.to_string()));
                }
            }
        }

        log::info!(
            "sweep finished: {} completed, {} skipped, {} failed in {:.1}s",
            report.completed,
            report.skipped,
            report.failed,
            report.elapsed_seconds
        );
        Ok(report)
    }
}

/// Accounting for a completed sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub elapsed_seconds: f64,
    pub reports: Vec<RunReport>,
    /// Grid label and error text for each failed combination.
    pub errors: Vec<(String, String)>,
}

impl SweepReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
