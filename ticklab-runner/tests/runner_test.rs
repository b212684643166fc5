//! Single-run behavior: completion, idempotent skip, zero-output
//! diagnostics, and fatal-error cleanup.

use std::path::Path;

use ticklab_core::data::synthetic::{generate, write_feed_csv, SyntheticSpec};
use ticklab_core::data::SummaryWriter;
use ticklab_runner::bootstrap::create_local_directories;
use ticklab_runner::runner::{run_labeling, RunError, RunOutcome};
use ticklab_runner::RunConfig;

fn config(window_length: f64) -> RunConfig {
    RunConfig {
        pair: "EURGBP".into(),
        year: "2017".into(),
        month: "10".into(),
        target_pips: 5.0,
        stop_pips: 5.0,
        window_length,
        spread_target_ratio: 0.5,
        sampling_seconds: 1.0,
        production: false,
    }
}

/// Creates the data tree and writes a synthetic feed covering `ticks`
/// quotes at 250ms spacing.
fn seed_feed(base: &Path, ticks: usize) {
    create_local_directories(base).unwrap();
    let feed = generate(&SyntheticSpec {
        ticks,
        ..Default::default()
    });
    write_feed_csv(base.join("dummy/raw_true_fx/EURGBP-2017-10.csv"), &feed).unwrap();
}

fn summary_lines(base: &Path) -> Vec<String> {
    let path = base.join("dummy/outcome_data/outcome_data.csv");
    if !path.exists() {
        return Vec::new();
    }
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn completed_run_writes_labels_and_summary() {
    let base = tempfile::tempdir().unwrap();
    // 400 ticks at 250ms = 100s of data against a 10s window.
    seed_feed(base.path(), 400);
    let config = config(10.0);
    let summary = SummaryWriter::new(base.path().join("dummy/outcome_data/outcome_data.csv"));

    let report = run_labeling(&config, base.path(), "testtag", &summary).unwrap();

    let RunOutcome::Completed {
        tally,
        rows_written,
        ..
    } = &report.outcome
    else {
        panic!("expected completion, got {:?}", report.outcome);
    };
    assert!(*rows_written > 0);
    assert!(report.produced_output());
    assert_eq!(tally.total(), *rows_written);
    assert!(report.labels_path.exists());
    assert!(report
        .labels_path
        .to_string_lossy()
        .ends_with("EURGBP-2017-10_5_5_10_testtag.csv"));

    let labels = std::fs::read_to_string(&report.labels_path).unwrap();
    assert_eq!(labels.lines().count() as u64, *rows_written);

    let lines = summary_lines(base.path());
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].split(',').count(), 17);
    assert!(lines[0].contains("testtag"));
}

#[test]
fn rerun_is_an_idempotent_skip() {
    let base = tempfile::tempdir().unwrap();
    seed_feed(base.path(), 400);
    let config = config(10.0);
    let summary = SummaryWriter::new(base.path().join("dummy/outcome_data/outcome_data.csv"));

    let first = run_labeling(&config, base.path(), "testtag", &summary).unwrap();
    let bytes_after_first = std::fs::read(&first.labels_path).unwrap();

    let second = run_labeling(&config, base.path(), "testtag", &summary).unwrap();
    assert!(second.skipped());
    assert!(matches!(second.outcome, RunOutcome::SkippedExisting));

    // Output is untouched and no second summary row was appended.
    assert_eq!(std::fs::read(&first.labels_path).unwrap(), bytes_after_first);
    assert_eq!(summary_lines(base.path()).len(), 1);
}

#[test]
fn zero_output_run_completes_without_error() {
    let base = tempfile::tempdir().unwrap();
    // 10 ticks at 250ms = 2.5s of data; a 3600s window never closes.
    seed_feed(base.path(), 10);
    let config = config(3600.0);
    let summary = SummaryWriter::new(base.path().join("dummy/outcome_data/outcome_data.csv"));

    let report = run_labeling(&config, base.path(), "testtag", &summary).unwrap();
    assert!(!report.skipped());
    assert!(!report.produced_output());
    let RunOutcome::Completed { rows_written, .. } = report.outcome else {
        panic!("expected completion");
    };
    assert_eq!(rows_written, 0);
    // The summary row is still appended for the empty run.
    assert_eq!(summary_lines(base.path()).len(), 1);
}

#[test]
fn missing_feed_is_fatal_at_open() {
    let base = tempfile::tempdir().unwrap();
    create_local_directories(base.path()).unwrap();
    let config = config(10.0);
    let summary = SummaryWriter::new(base.path().join("dummy/outcome_data/outcome_data.csv"));

    let err = run_labeling(&config, base.path(), "testtag", &summary).unwrap_err();
    assert!(matches!(err, RunError::Feed(_)));
    assert!(summary_lines(base.path()).is_empty());
}

#[test]
fn parse_error_aborts_and_removes_partial_output() {
    let base = tempfile::tempdir().unwrap();
    create_local_directories(base.path()).unwrap();

    // 60s of good quotes, then a corrupt row.
    let mut rows = String::new();
    for i in 0..60 {
        rows.push_str(&format!(
            "EURGBP,20171001 21:00:{:02}.000,0.88782,0.88797\n",
            i
        ));
    }
    rows.push_str("EURGBP,20171001 21:01:00.000,garbage,0.88797\n");
    std::fs::write(base.path().join("dummy/raw_true_fx/EURGBP-2017-10.csv"), rows).unwrap();

    let config = config(10.0);
    let summary = SummaryWriter::new(base.path().join("dummy/outcome_data/outcome_data.csv"));
    let labels_path = config.paths(base.path(), "testtag").labels;

    let err = run_labeling(&config, base.path(), "testtag", &summary).unwrap_err();
    assert!(matches!(err, RunError::Feed(_)));
    // Partial labels were discarded so a rerun will not be skipped.
    assert!(!labels_path.exists());
    assert!(summary_lines(base.path()).is_empty());
}
