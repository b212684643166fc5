//! Outcome categories and per-side resolution state.

use super::tick::Tick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How one side of a simulation concluded.
///
/// The set is closed: every finalized side carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Take-profit threshold touched.
    Limit,
    /// Stop-loss threshold touched.
    Stop,
    /// Time horizon elapsed with no touch.
    Window,
    /// Reference tick's spread exceeded the configured ratio of the target
    /// distance; excluded without scanning.
    SpreadLimit,
    /// Skipped by the sampling gate; excluded without scanning.
    NotInSample,
}

impl Outcome {
    /// Wire name used in output rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Limit => "limit",
            Outcome::Stop => "stop",
            Outcome::Window => "window",
            Outcome::SpreadLimit => "spread_limit",
            Outcome::NotInSample => "not_in_sample",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution state of one side (buy or sell) of a simulation.
///
/// Append-only: a side moves from `Unresolved` to `Resolved` at most once
/// and never changes afterwards. Touch resolutions carry a snapshot of the
/// concluding tick; forced conclusions (window/sampling/spread) carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SideState {
    Unresolved,
    Resolved {
        outcome: Outcome,
        concluding: Option<Tick>,
    },
}

impl SideState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, SideState::Resolved { .. })
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            SideState::Unresolved => None,
            SideState::Resolved { outcome, .. } => Some(*outcome),
        }
    }

    /// The tick that triggered a touch resolution, if any.
    pub fn concluding(&self) -> Option<&Tick> {
        match self {
            SideState::Unresolved => None,
            SideState::Resolved { concluding, .. } => concluding.as_ref(),
        }
    }
}
