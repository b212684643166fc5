//! TickLab Core — tick domain types, feed, and the windowed labeling engine.
//!
//! This crate contains the heart of the labeler:
//! - Domain types (ticks, outcome categories, per-side resolution state)
//! - Streaming CSV tick feed with fatal parse errors
//! - Order simulation with first-touch threshold evaluation
//! - Sliding time window with sampling and spread gates
//! - Fixed-category outcome tally
//! - Append-only label and summary writers

pub mod data;
pub mod domain;
pub mod engine;
