//! Streaming tick feed — lazy, forward-only CSV reader.
//!
//! Rows are `pair,timestamp,bid,ask` with no header. Any row that fails
//! numeric or timestamp conversion aborts the whole run: a corrupt file
//! invalidates the entire labeled output, so there is no row-level
//! recovery.

use crate::domain::Tick;
use chrono::NaiveDateTime;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Input timestamp format: date + time with sub-second fraction.
pub const FEED_TIMESTAMP_FORMAT: &str = "%Y%m%d %H:%M:%S%.f";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to open tick feed {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error at line {line}: {source}")]
    Csv { line: u64, source: csv::Error },

    #[error("line {line}: expected 4 fields `pair,timestamp,bid,ask`, got {count}")]
    FieldCount { line: u64, count: usize },

    #[error("line {line}: invalid {field} `{value}`")]
    Parse {
        line: u64,
        field: &'static str,
        value: String,
    },
}

/// Lazy iterator over a tick feed file.
///
/// The file handle is scoped to this value and released when it drops,
/// including on the fatal-parse-error path.
pub struct TickFeed {
    records: csv::StringRecordsIntoIter<File>,
    line: u64,
}

impl std::fmt::Debug for TickFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickFeed").field("line", &self.line).finish_non_exhaustive()
    }
}

impl TickFeed {
    /// Opens the feed once. Missing or unreadable files fail here, before
    /// any engine state exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FeedError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(file);
        Ok(Self {
            records: reader.into_records(),
            line: 0,
        })
    }

    /// Diagnostic full-scan row count. Not used on the hot path.
    pub fn count_rows(path: impl AsRef<Path>) -> Result<u64, FeedError> {
        let feed = Self::open(path)?;
        let mut count = 0u64;
        for record in feed.records {
            record.map_err(|source| FeedError::Csv {
                line: count + 1,
                source,
            })?;
            count += 1;
        }
        Ok(count)
    }

    fn parse_record(
        &self,
        record: Result<csv::StringRecord, csv::Error>,
    ) -> Result<Tick, FeedError> {
        let line = self.line;
        let record = record.map_err(|source| FeedError::Csv { line, source })?;

        if record.len() != 4 {
            return Err(FeedError::FieldCount {
                line,
                count: record.len(),
            });
        }

        let timestamp = NaiveDateTime::parse_from_str(&record[1], FEED_TIMESTAMP_FORMAT)
            .map_err(|_| FeedError::Parse {
                line,
                field: "timestamp",
                value: record[1].to_string(),
            })?;
        let bid: f64 = record[2].parse().map_err(|_| FeedError::Parse {
            line,
            field: "bid",
            value: record[2].to_string(),
        })?;
        let ask: f64 = record[3].parse().map_err(|_| FeedError::Parse {
            line,
            field: "ask",
            value: record[3].to_string(),
        })?;

        Ok(Tick::new(&record[0], timestamp, bid, ask))
    }
}

impl Iterator for TickFeed {
    type Item = Result<Tick, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.line += 1;
        Some(self.parse_record(record))
    }
}
