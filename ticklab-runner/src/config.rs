//! Serializable run and sweep configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use ticklab_core::engine::LabelParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("sweep grid is empty: {0}")]
    EmptyGrid(&'static str),
}

/// Configuration for a single labeling run — one (target, stop, window)
/// combination against one pair/month feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub pair: String,
    pub year: String,
    pub month: String,
    pub target_pips: f64,
    pub stop_pips: f64,
    /// Lookahead horizon in seconds.
    pub window_length: f64,
    pub spread_target_ratio: f64,
    pub sampling_seconds: f64,
    /// Selects the production or dummy data tree.
    pub production: bool,
}

impl RunConfig {
    /// Engine parameters for this run.
    pub fn params(&self) -> LabelParams {
        LabelParams {
            target_pips: self.target_pips,
            stop_pips: self.stop_pips,
            window_length: self.window_length,
            sampling_seconds: self.sampling_seconds,
            spread_target_ratio: self.spread_target_ratio,
        }
    }

    /// Deterministic content hash of this configuration, for logs and
    /// reports. Two identical configs always hash the same.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("RunConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Short human label for progress logs, e.g. `wl:3600 sl_pair: 5_5`.
    pub fn grid_label(&self) -> String {
        format!(
            "wl:{} sl_pair: {}_{}",
            self.window_length, self.target_pips, self.stop_pips
        )
    }

    /// Output and input locations for this run under `base_dir`.
    pub fn paths(&self, base_dir: &Path, version_tag: &str) -> RunPaths {
        let data_dir = base_dir.join(if self.production {
            "production"
        } else {
            "dummy"
        });
        let stem = format!("{}-{}-{}", self.pair, self.year, self.month);
        RunPaths {
            feed: data_dir.join("raw_true_fx").join(format!("{stem}.csv")),
            labels: data_dir.join("targets").join(format!(
                "{stem}_{}_{}_{}_{}.csv",
                self.target_pips, self.stop_pips, self.window_length as i64, version_tag
            )),
            summary: data_dir.join("outcome_data").join("outcome_data.csv"),
            data_dir,
        }
    }
}

/// Filesystem locations derived from a [`RunConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub data_dir: PathBuf,
    /// Input tick feed.
    pub feed: PathBuf,
    /// Per-run label output; its existence makes a rerun a no-op.
    pub labels: PathBuf,
    /// Shared summary sink appended by every run.
    pub summary: PathBuf,
}

/// One (stop, limit) distance pair of the sweep grid, in pips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLimitPair {
    pub stop: f64,
    pub limit: f64,
}

/// Sweep configuration: the full grid for one pair/month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub pair: String,
    pub year: String,
    pub month: String,
    #[serde(default)]
    pub production: bool,
    #[serde(default = "default_spread_target_ratio")]
    pub spread_target_ratio: f64,
    #[serde(default = "default_sampling_seconds")]
    pub sampling_seconds: f64,
    pub window_lengths: Vec<f64>,
    #[serde(rename = "stop_limit")]
    pub stop_limit_pairs: Vec<StopLimitPair>,
}

fn default_spread_target_ratio() -> f64 {
    0.5
}

fn default_sampling_seconds() -> f64 {
    1.0
}

impl SweepConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if config.window_lengths.is_empty() {
            return Err(ConfigError::EmptyGrid("window_lengths"));
        }
        if config.stop_limit_pairs.is_empty() {
            return Err(ConfigError::EmptyGrid("stop_limit"));
        }
        Ok(config)
    }

    /// Total number of combinations in the grid.
    pub fn size(&self) -> usize {
        self.window_lengths.len() * self.stop_limit_pairs.len()
    }

    /// Expands the grid into one [`RunConfig`] per combination, window
    /// lengths outermost.
    pub fn expand(&self) -> Vec<RunConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &window_length in &self.window_lengths {
            for pair in &self.stop_limit_pairs {
                configs.push(RunConfig {
                    pair: self.pair.clone(),
                    year: self.year.clone(),
                    month: self.month.clone(),
                    target_pips: pair.limit,
                    stop_pips: pair.stop,
                    window_length,
                    spread_target_ratio: self.spread_target_ratio,
                    sampling_seconds: self.sampling_seconds,
                    production: self.production,
                });
            }
        }
        configs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run_config() -> RunConfig {
        RunConfig {
            pair: "EURGBP".into(),
            year: "2017".into(),
            month: "10".into(),
            target_pips: 5.0,
            stop_pips: 3.0,
            window_length: 4500.0,
            spread_target_ratio: 0.5,
            sampling_seconds: 1.0,
            production: true,
        }
    }

    #[test]
    fn paths_follow_the_data_tree_layout() {
        let paths = sample_run_config().paths(Path::new("data"), "72f3431");
        assert_eq!(
            paths.feed,
            Path::new("data/production/raw_true_fx/EURGBP-2017-10.csv")
        );
        // Window length is rendered as a whole number of seconds.
        assert_eq!(
            paths.labels,
            Path::new("data/production/targets/EURGBP-2017-10_5_3_4500_72f3431.csv")
        );
        assert_eq!(
            paths.summary,
            Path::new("data/production/outcome_data/outcome_data.csv")
        );
    }

    #[test]
    fn dummy_mode_uses_the_dummy_tree() {
        let config = RunConfig {
            production: false,
            ..sample_run_config()
        };
        let paths = config.paths(Path::new("data"), "dev");
        assert!(paths.feed.starts_with("data/dummy"));
    }

    #[test]
    fn fingerprint_is_deterministic_and_parameter_sensitive() {
        let config = sample_run_config();
        assert_eq!(config.fingerprint(), config.fingerprint());

        let other = RunConfig {
            target_pips: 6.0,
            ..sample_run_config()
        };
        assert_ne!(config.fingerprint(), other.fingerprint());
    }

    #[test]
    fn sweep_config_parses_from_toml() {
        let config = SweepConfig::from_toml(
            r#"
            pair = "EURGBP"
            year = "2017"
            month = "10"
            production = true
            window_lengths = [1800.0, 2700.0, 3600.0]

            [[stop_limit]]
            stop = 5.0
            limit = 5.0

            [[stop_limit]]
            stop = 3.0
            limit = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.size(), 6);
        assert_eq!(config.spread_target_ratio, 0.5);
        assert_eq!(config.sampling_seconds, 1.0);

        let configs = config.expand();
        assert_eq!(configs.len(), 6);
        assert_eq!(configs[0].window_length, 1800.0);
        assert_eq!(configs[0].target_pips, 5.0);
        assert_eq!(configs[1].stop_pips, 3.0);
        // Window lengths are the outer loop.
        assert_eq!(configs[2].window_length, 2700.0);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let err = SweepConfig::from_toml(
            r#"
            pair = "EURGBP"
            year = "2017"
            month = "10"
            window_lengths = []

            [[stop_limit]]
            stop = 5.0
            limit = 5.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGrid("window_lengths")));
    }
}
