//! TickLab Runner — run orchestration on top of `ticklab-core`.
//!
//! This crate provides:
//! - TOML-loadable run and sweep configuration with derived output paths
//! - A single-run entry point with idempotent skip-if-output-exists
//! - A rayon parameter sweep over (window, target, stop) grids
//! - Local directory bootstrap for the data tree
//! - Blob storage sync for registered data files
//! - Version stamping from the git revision

pub mod bootstrap;
pub mod config;
pub mod runner;
pub mod storage;
pub mod sweep;
pub mod version;

pub use config::{ConfigError, RunConfig, RunPaths, StopLimitPair, SweepConfig};
pub use runner::{run_labeling, RunError, RunOutcome, RunReport};
pub use storage::{BlobStore, HttpBlobStore, StorageError, SyncDirection, SyncSummary};
pub use sweep::{Sweep, SweepReport};
pub use version::version_tag;
