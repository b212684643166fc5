//! Domain types shared across the engine.

mod outcome;
mod tick;

pub use outcome::{Outcome, SideState};
pub use tick::{round5, Tick};
