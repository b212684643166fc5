//! TickLab CLI — labeling runs, sweeps, and data management commands.
//!
//! Commands:
//! - `run` — execute a single labeling run from flags
//! - `sweep` — execute a full parameter sweep from a TOML config file
//! - `bootstrap` — create the local data directory tree
//! - `sync` — upload/download registered files to/from blob storage
//! - `count` — report the row count of a tick feed (full scan)
//! - `synth` — generate a synthetic tick feed for testing

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ticklab_core::data::synthetic::{generate, write_feed_csv, SyntheticSpec};
use ticklab_core::data::{SummaryWriter, TickFeed};
use ticklab_runner::bootstrap::create_local_directories;
use ticklab_runner::runner::{run_labeling, RunOutcome, RunReport};
use ticklab_runner::storage::{
    registered_target_files, sync_registered, HttpBlobStore, SyncDirection,
    REGISTERED_DATA_FILES,
};
use ticklab_runner::{version_tag, RunConfig, Sweep, SweepConfig, SweepReport};

#[derive(Parser)]
#[command(
    name = "ticklab",
    about = "TickLab CLI — first-touch labeling of FX tick streams"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a single labeling run.
    Run {
        /// Currency pair, e.g. EURGBP.
        #[arg(long)]
        pair: String,

        /// Feed year, e.g. 2017.
        #[arg(long)]
        year: String,

        /// Feed month, e.g. 10.
        #[arg(long)]
        month: String,

        /// Take-profit distance in pips.
        #[arg(long)]
        target: f64,

        /// Stop-loss distance in pips.
        #[arg(long)]
        stop: f64,

        /// Lookahead horizon in seconds.
        #[arg(long)]
        window: f64,

        /// Spread filter as a fraction of the target distance.
        #[arg(long, default_value_t = 0.5)]
        spread_target_ratio: f64,

        /// Minimum gap in seconds between scanned simulations.
        #[arg(long, default_value_t = 1.0)]
        sampling_seconds: f64,

        /// Use the production data tree instead of dummy.
        #[arg(long, default_value_t = false)]
        production: bool,

        /// Data tree root. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Execute a full parameter sweep from a TOML config file.
    Sweep {
        /// Path to a TOML sweep config.
        #[arg(long)]
        config: PathBuf,

        /// Run combinations one at a time instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Data tree root. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Create the local data directory tree.
    Bootstrap {
        /// Data tree root. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Transfer registered data files to or from blob storage.
    Sync {
        /// Transfer direction: upload or download.
        #[arg(long)]
        direction: String,

        /// Bucket name.
        #[arg(long)]
        bucket: String,

        /// Files to transfer, relative to the data root. Defaults to the
        /// registered data files.
        files: Vec<String>,

        /// Sweep config whose label outputs should be transferred instead
        /// of the registered data files.
        #[arg(long, conflicts_with = "files")]
        targets_config: Option<PathBuf>,

        /// Data tree root. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Report the row count of a tick feed (full scan).
    Count {
        /// Feed file to scan.
        file: PathBuf,
    },
    /// Generate a synthetic tick feed.
    Synth {
        /// Output file.
        #[arg(long)]
        out: PathBuf,

        /// Currency pair label.
        #[arg(long, default_value = "EURGBP")]
        pair: String,

        /// Number of ticks to generate.
        #[arg(long, default_value_t = 10_000)]
        ticks: usize,

        /// Milliseconds between ticks.
        #[arg(long, default_value_t = 250)]
        interval_ms: i64,

        /// Feed start timestamp, `YYYYmmdd HH:MM:SS`.
        #[arg(long)]
        start: Option<String>,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pair,
            year,
            month,
            target,
            stop,
            window,
            spread_target_ratio,
            sampling_seconds,
            production,
            data_dir,
        } => {
            let config = RunConfig {
                pair,
                year,
                month,
                target_pips: target,
                stop_pips: stop,
                window_length: window,
                spread_target_ratio,
                sampling_seconds,
                production,
            };
            run_single(&config, &data_dir)
        }
        Commands::Sweep {
            config,
            sequential,
            data_dir,
        } => run_sweep(&config, sequential, &data_dir),
        Commands::Bootstrap { data_dir } => {
            let created = create_local_directories(&data_dir)
                .context("failed to create data directories")?;
            for dir in created {
                println!("ensured {}", dir.display());
            }
            Ok(())
        }
        Commands::Sync {
            direction,
            bucket,
            files,
            targets_config,
            data_dir,
        } => run_sync(&direction, &bucket, files, targets_config, &data_dir),
        Commands::Count { file } => {
            let rows = TickFeed::count_rows(&file)
                .with_context(|| format!("failed to scan {}", file.display()))?;
            println!("{}: {rows} rows", file.display());
            Ok(())
        }
        Commands::Synth {
            out,
            pair,
            ticks,
            interval_ms,
            start,
            seed,
        } => run_synth(out, pair, ticks, interval_ms, start, seed),
    }
}

fn run_single(config: &RunConfig, data_dir: &std::path::Path) -> Result<()> {
    create_local_directories(data_dir).context("failed to create data directories")?;
    let tag = version_tag();
    let summary = SummaryWriter::new(config.paths(data_dir, &tag).summary);

    let report = run_labeling(config, data_dir, &tag, &summary)?;
    print_run_summary(&report);
    Ok(())
}

fn run_sweep(config_path: &std::path::Path, sequential: bool, data_dir: &std::path::Path) -> Result<()> {
    let config = SweepConfig::from_file(config_path)
        .with_context(|| format!("failed to load sweep config {}", config_path.display()))?;

    let report = Sweep::new(data_dir)
        .with_parallelism(!sequential)
        .run(&config)?;
    print_sweep_summary(&report);

    if !report.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_sync(
    direction: &str,
    bucket: &str,
    files: Vec<String>,
    targets_config: Option<PathBuf>,
    data_dir: &std::path::Path,
) -> Result<()> {
    let direction = match direction {
        "upload" => SyncDirection::Upload,
        "download" => SyncDirection::Download,
        other => bail!("unknown direction '{other}'. Valid: upload, download"),
    };

    let store = HttpBlobStore::new()?;
    let target_files: Vec<String>;
    let file_refs: Vec<&str> = if let Some(path) = targets_config {
        let sweep = SweepConfig::from_file(&path)
            .with_context(|| format!("failed to load sweep config {}", path.display()))?;
        target_files = registered_target_files(&sweep, &version_tag());
        target_files.iter().map(String::as_str).collect()
    } else if files.is_empty() {
        REGISTERED_DATA_FILES.to_vec()
    } else {
        files.iter().map(String::as_str).collect()
    };

    let summary = sync_registered(&store, bucket, data_dir, &file_refs, direction);
    println!(
        "synced {}/{} files ({} failed)",
        summary.succeeded, summary.total, summary.failed
    );

    if !summary.all_succeeded() {
        for (file, err) in &summary.errors {
            eprintln!("Error for {file}: {err}");
        }
        std::process::exit(1);
    }
    Ok(())
}

fn run_synth(
    out: PathBuf,
    pair: String,
    ticks: usize,
    interval_ms: i64,
    start: Option<String>,
    seed: u64,
) -> Result<()> {
    let start = start
        .as_deref()
        .map(|s| NaiveDateTime::parse_from_str(s, "%Y%m%d %H:%M:%S"))
        .transpose()
        .context("invalid --start, expected `YYYYmmdd HH:MM:SS`")?
        .unwrap_or_default();

    let spec = SyntheticSpec {
        pair,
        start,
        ticks,
        interval_ms,
        seed,
        ..Default::default()
    };
    let generated = generate(&spec);
    write_feed_csv(&out, &generated)?;
    println!("wrote {} ticks to {}", generated.len(), out.display());
    Ok(())
}

fn print_run_summary(report: &RunReport) {
    println!();
    println!("=== Labeling Run ===");
    println!("Pair:           {}", report.config.pair);
    println!(
        "Period:         {}-{}",
        report.config.year, report.config.month
    );
    println!(
        "Grid point:     target {} / stop {} / window {}s",
        report.config.target_pips, report.config.stop_pips, report.config.window_length
    );
    match &report.outcome {
        RunOutcome::SkippedExisting => {
            println!("Outcome:        skipped (output already exists)");
            println!("Labels:         {}", report.labels_path.display());
        }
        RunOutcome::Completed {
            tally,
            rows_written,
            elapsed_seconds,
        } => {
            println!("Labeled ticks:  {rows_written}");
            println!("Elapsed:        {elapsed_seconds:.1}s");
            println!("Labels:         {}", report.labels_path.display());
            println!();
            println!("--- Outcomes ---");
            println!("In sample:      {}", tally.in_sample);
            println!("Out of sample:  {}", tally.out_of_sample);
            println!("Spread limit:   {}", tally.spread_limit);
            println!(
                "Buy  l/s/w:     {}/{}/{}",
                tally.buy_limit, tally.buy_stop, tally.buy_window
            );
            println!(
                "Sell l/s/w:     {}/{}/{}",
                tally.sell_limit, tally.sell_stop, tally.sell_window
            );
            println!(
                "Double l/s:     {}/{}",
                tally.double_limit, tally.double_stop
            );
            if *rows_written == 0 {
                println!();
                println!(
                    "WARNING: no ticks labeled. The window never closed; the feed \
                     may be shorter than the window length."
                );
            }
        }
    }
    println!();
}

fn print_sweep_summary(report: &SweepReport) {
    println!();
    println!("=== Sweep Result ===");
    println!("Combinations:   {}", report.total);
    println!("Completed:      {}", report.completed);
    println!("Skipped:        {}", report.skipped);
    println!("Failed:         {}", report.failed);
    println!("Elapsed:        {:.1}s", report.elapsed_seconds);
    for (label, err) in &report.errors {
        println!("FAILED {label}: {err}");
    }
    println!();
}
