//! Blob storage sync — bulk transfer of registered data files to and from
//! remote object storage.
//!
//! One trait at the seam, one HTTP implementation, and an orchestrator
//! that walks a file manifest and reports per-file results.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("transfer of {object} failed: {source}")]
    Transfer {
        object: String,
        source: reqwest::Error,
    },

    #[error("server returned {status} for {object}")]
    Status { status: u16, object: String },
}

/// Remote object storage at its interface: whole-file upload and download.
pub trait BlobStore {
    fn upload(&self, bucket: &str, local: &Path, remote: &str) -> Result<(), StorageError>;
    fn download(&self, bucket: &str, remote: &str, local: &Path) -> Result<(), StorageError>;
}

/// Blob store over a path-style HTTP object endpoint
/// (`{endpoint}/{bucket}/{object}`, PUT to upload, GET to download).
pub struct HttpBlobStore {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpBlobStore {
    pub const DEFAULT_ENDPOINT: &'static str = "https://storage.googleapis.com";

    pub fn new() -> Result<Self, StorageError> {
        Self::with_endpoint(Self::DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, StorageError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(StorageError::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn object_url(&self, bucket: &str, remote: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, remote)
    }
}

impl BlobStore for HttpBlobStore {
    fn upload(&self, bucket: &str, local: &Path, remote: &str) -> Result<(), StorageError> {
        let body = std::fs::read(local).map_err(|source| StorageError::Io {
            path: local.to_path_buf(),
            source,
        })?;
        let url = self.object_url(bucket, remote);
        let response = self
            .client
            .put(&url)
            .body(body)
            .send()
            .map_err(|source| StorageError::Transfer {
                object: remote.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(StorageError::Status {
                status: response.status().as_u16(),
                object: remote.to_string(),
            });
        }
        log::info!("uploaded {} to {}", local.display(), remote);
        Ok(())
    }

    fn download(&self, bucket: &str, remote: &str, local: &Path) -> Result<(), StorageError> {
        let url = self.object_url(bucket, remote);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| StorageError::Transfer {
                object: remote.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(StorageError::Status {
                status: response.status().as_u16(),
                object: remote.to_string(),
            });
        }
        let bytes = response.bytes().map_err(|source| StorageError::Transfer {
            object: remote.to_string(),
            source,
        })?;
        std::fs::write(local, &bytes).map_err(|source| StorageError::Io {
            path: local.to_path_buf(),
            source,
        })?;
        log::info!("downloaded {} to {}", remote, local.display());
        Ok(())
    }
}

/// Transfer direction for a registered-file sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    Upload,
    Download,
}

/// Raw feed files registered for sync, relative to the data tree root.
pub const REGISTERED_DATA_FILES: &[&str] = &[
    "dummy/raw_true_fx/dummy_25.csv",
    "dummy/raw_true_fx/debug_set.csv",
    "dummy/raw_true_fx/dummy_hour.csv",
    "dummy/raw_true_fx/dummy_two_minutes.csv",
    "production/outcome_data/outcome_data.csv",
    "production/raw_true_fx/EURGBP-2017-10.csv",
];

/// Label outputs for every combination of a sweep, relative to the data
/// tree root. Derived from the grid rather than hand-maintained.
pub fn registered_target_files(
    config: &crate::config::SweepConfig,
    version_tag: &str,
) -> Vec<String> {
    let environment = if config.production {
        "production"
    } else {
        "dummy"
    };
    config
        .expand()
        .iter()
        .map(|run| {
            format!(
                "{environment}/targets/{}-{}-{}_{}_{}_{}_{}.csv",
                run.pair,
                run.year,
                run.month,
                run.target_pips,
                run.stop_pips,
                run.window_length as i64,
                version_tag
            )
        })
        .collect()
}

/// Per-file accounting for one sync pass.
#[derive(Debug)]
pub struct SyncSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, StorageError)>,
}

impl SyncSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Transfers each registered file between `{data_root}/{file}` locally and
/// `{file}` in the bucket. Failures are collected per file; the pass keeps
/// going.
pub fn sync_registered(
    store: &dyn BlobStore,
    bucket: &str,
    data_root: &Path,
    files: &[&str],
    direction: SyncDirection,
) -> SyncSummary {
    let mut summary = SyncSummary {
        total: files.len(),
        succeeded: 0,
        failed: 0,
        errors: Vec::new(),
    };

    for file in files {
        let local = data_root.join(file);
        let result = match direction {
            SyncDirection::Upload => store.upload(bucket, &local, file),
            SyncDirection::Download => store.download(bucket, file, &local),
        };
        match result {
            Ok(()) => summary.succeeded += 1,
            Err(err) => {
                log::error!("sync of {file} failed: {err}");
                summary.failed += 1;
                summary.errors.push((file.to_string(), err));
            }
        }
    }

    summary
}
