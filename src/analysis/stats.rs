//! Summary statistics over timing samples.

use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
}

impl Stats {
    /// Statistics of an empty sample set: both values are NaN.
    pub const UNDEFINED: Stats = Stats {
        mean: f64::NAN,
        std_dev: f64::NAN,
    };

    /// Compute statistics over `samples`. An empty set yields [`Stats::UNDEFINED`].
    ///
    /// The standard deviation uses the population definition (divide by N).
    pub fn from_samples(samples: &[u64]) -> Self {
        if samples.is_empty() {
            return Self::UNDEFINED;
        }

        let n = samples.len() as f64;
        let sum: u128 = samples.iter().map(|v| u128::from(*v)).sum();
        let mean = sum as f64 / n;

        let variance = samples
            .iter()
            .map(|v| (*v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }

    /// Whether the statistics come from at least one sample.
    pub fn is_defined(&self) -> bool {
        !self.mean.is_nan()
    }

    /// Sum of two independent quantities.
    ///
    /// Means add; standard deviations add in quadrature.
    pub fn combine(&self, other: &Stats) -> Stats {
        Stats {
            mean: self.mean + other.mean,
            std_dev: self.std_dev.hypot(other.std_dev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_stats() {
        let stats = Stats::from_samples(&[10, 20, 30]);
        assert_eq!(stats.mean, 20.0);
        // sqrt(200 / 3)
        assert!((stats.std_dev - 8.16496580927726).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample() {
        let stats = Stats::from_samples(&[42]);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_empty_samples() {
        let stats = Stats::from_samples(&[]);
        assert!(stats.mean.is_nan());
        assert!(stats.std_dev.is_nan());
        assert!(!stats.is_defined());
        assert!(Stats::from_samples(&[0]).is_defined());

        // Undefined stays undefined when combined
        assert!(!stats.combine(&Stats::from_samples(&[1])).is_defined());
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        let stats = Stats::from_samples(&[u64::MAX, u64::MAX]);
        assert_eq!(stats.mean, u64::MAX as f64);
    }

    #[test]
    fn test_combine() {
        let a = Stats::from_samples(&[10, 20, 30]);
        let b = Stats::from_samples(&[1, 2, 3, 4]);
        let total = a.combine(&b);

        assert_eq!(total.mean, a.mean + b.mean);
        let expected = (a.std_dev.powi(2) + b.std_dev.powi(2)).sqrt();
        assert!((total.std_dev - expected).abs() < 1e-12);
    }
}
