//! Analysis modules.
//!
//! Reading result files and reducing them to per-size statistics.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;
pub use stats::Stats;
