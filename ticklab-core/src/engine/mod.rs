//! Labeling engine — order simulation, sliding window, outcome tally.

mod simulation;
mod tally;
mod window;

pub use simulation::OrderSimulation;
pub use tally::{OutcomeTally, RunSummary};
pub use window::{LabelParams, SlidingWindow};
