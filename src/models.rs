//! Data models for the benchmark reporter.
//!
//! This module contains the core data structures shared by the
//! aggregator and the chart reporter.

use crate::analysis::Stats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Problem size of one benchmark run.
pub type Size = u32;

/// Benchmark workload a result group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Matrix multiplication workload.
    MatrixMultiplication,
    /// Randomized quicksort workload.
    Quicksort,
}

impl GroupKind {
    /// Classify a group by name: anything mentioning `sort` is a quicksort group.
    pub fn of(group: &str) -> Self {
        if group.contains("sort") {
            GroupKind::Quicksort
        } else {
            GroupKind::MatrixMultiplication
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::MatrixMultiplication => write!(f, "Matrix Multiplication"),
            GroupKind::Quicksort => write!(f, "Quicksort"),
        }
    }
}

/// Measured (or derived) timing component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    /// First column: allocation / mapping time.
    Allocation,
    /// Second column: multiplication or sort time.
    Compute,
    /// Allocation plus compute.
    Total,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Allocation => write!(f, "allocation"),
            Quantity::Compute => write!(f, "compute"),
            Quantity::Total => write!(f, "total"),
        }
    }
}

/// Y axis scale of a chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Linear axis (default)
    #[default]
    Linear,
    /// Base-10 logarithmic axis
    Log,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Linear => write!(f, "linear"),
            Scale::Log => write!(f, "log"),
        }
    }
}

/// Lookup key of an aggregate point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AggregateKey {
    /// Result group name.
    pub group: String,
    /// Problem size extracted from the file name.
    pub size: Size,
}

impl AggregateKey {
    pub fn new(group: &str, size: Size) -> Self {
        Self {
            group: group.to_string(),
            size,
        }
    }
}

/// Result of the aggregation pass.
///
/// Holds one table per measured quantity. Once returned by the aggregator
/// it is only read.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    /// Allocation statistics per (group, size).
    pub allocation: BTreeMap<AggregateKey, Stats>,
    /// Compute statistics per (group, size).
    pub compute: BTreeMap<AggregateKey, Stats>,
    /// Number of result files read.
    pub files_read: usize,
}

impl Aggregates {
    /// Store both statistics under `key`. Returns true if an earlier entry was replaced.
    pub fn insert(&mut self, key: AggregateKey, allocation: Stats, compute: Stats) -> bool {
        let replaced = self.allocation.insert(key.clone(), allocation).is_some();
        self.compute.insert(key, compute);
        replaced
    }

    /// Look up a quantity. `Total` is derived from the two measured tables.
    pub fn get(&self, group: &str, size: Size, quantity: Quantity) -> Option<Stats> {
        let key = AggregateKey::new(group, size);
        match quantity {
            Quantity::Allocation => self.allocation.get(&key).copied(),
            Quantity::Compute => self.compute.get(&key).copied(),
            Quantity::Total => {
                let allocation = self.allocation.get(&key)?;
                let compute = self.compute.get(&key)?;
                Some(allocation.combine(compute))
            }
        }
    }

    /// Sizes recorded for a group, ascending.
    pub fn sizes_of(&self, group: &str) -> Vec<Size> {
        self.allocation
            .keys()
            .filter(|k| k.group == group)
            .map(|k| k.size)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.allocation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocation.is_empty()
    }
}

/// One plotted point: mean with a symmetric error of one standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub size: Size,
    pub mean: f64,
    pub std_dev: f64,
}

/// Everything needed to draw (and export) one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Chart title.
    pub title: String,
    /// Result group the data comes from.
    pub group: String,
    /// Plotted quantity.
    pub quantity: Quantity,
    /// Output file name without extension (`alloc`, `mult`, `sort`, `total`).
    pub stem: String,
    /// Y axis scale.
    pub scale: Scale,
    /// Points in ascending size order.
    pub points: Vec<ChartPoint>,
}

/// Metadata and results of a reporting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Date and time the charts were generated.
    pub generated_at: DateTime<Utc>,
    /// Results root that was read.
    pub results_dir: String,
    /// Graphs root that was written.
    pub graphs_dir: String,
    /// Number of result files aggregated.
    pub files_read: usize,
    /// Paths of the chart images written.
    pub charts: Vec<String>,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
    /// Series of every chart, in rendering order.
    pub series: Vec<ChartSeries>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, std_dev: f64) -> Stats {
        Stats { mean, std_dev }
    }

    #[test]
    fn test_group_kind() {
        assert_eq!(GroupKind::of("demand"), GroupKind::MatrixMultiplication);
        assert_eq!(GroupKind::of("pre"), GroupKind::MatrixMultiplication);
        assert_eq!(GroupKind::of("demand_sort"), GroupKind::Quicksort);
        assert_eq!(GroupKind::of("sorted"), GroupKind::Quicksort);
    }

    #[test]
    fn test_aggregates_lookup() {
        let mut aggregates = Aggregates::default();
        let replaced = aggregates.insert(
            AggregateKey::new("demand", 64),
            stats(10.0, 3.0),
            stats(20.0, 4.0),
        );
        assert!(!replaced);

        let alloc = aggregates.get("demand", 64, Quantity::Allocation).unwrap();
        assert_eq!(alloc.mean, 10.0);

        let total = aggregates.get("demand", 64, Quantity::Total).unwrap();
        assert_eq!(total.mean, 30.0);
        assert!((total.std_dev - 5.0).abs() < 1e-12);

        assert!(aggregates.get("demand", 128, Quantity::Compute).is_none());
        assert!(aggregates.get("pre", 64, Quantity::Total).is_none());
    }

    #[test]
    fn test_aggregates_last_write_wins() {
        let mut aggregates = Aggregates::default();
        aggregates.insert(AggregateKey::new("pre", 256), stats(1.0, 0.0), stats(1.0, 0.0));
        let replaced =
            aggregates.insert(AggregateKey::new("pre", 256), stats(7.0, 0.0), stats(9.0, 0.0));

        assert!(replaced);
        assert_eq!(aggregates.len(), 1);
        assert_eq!(
            aggregates.get("pre", 256, Quantity::Compute).unwrap().mean,
            9.0
        );
    }

    #[test]
    fn test_sizes_of_sorted() {
        let mut aggregates = Aggregates::default();
        for size in [512, 64, 256] {
            aggregates.insert(AggregateKey::new("pre", size), stats(1.0, 0.0), stats(1.0, 0.0));
        }
        aggregates.insert(AggregateKey::new("demand", 128), stats(1.0, 0.0), stats(1.0, 0.0));

        assert_eq!(aggregates.sizes_of("pre"), vec![64, 256, 512]);
        assert_eq!(aggregates.sizes_of("demand"), vec![128]);
        assert!(aggregates.sizes_of("pre_sort").is_empty());
    }

    #[test]
    fn test_scale_display() {
        assert_eq!(Scale::Linear.to_string(), "linear");
        assert_eq!(Scale::Log.to_string(), "log");
        assert_eq!(Scale::default(), Scale::Linear);
    }
}
