//! Collector orchestration module.

mod collector;
mod stats;

pub use collector::Collector;
pub use stats::CollectorStats;
