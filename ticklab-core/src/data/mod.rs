//! Tick feed input, label/summary output, synthetic feeds.

pub mod feed;
pub mod synthetic;
pub mod writer;

pub use feed::{FeedError, TickFeed};
pub use writer::{LabelWriter, SummaryWriter, WriteError};
