//! Accumulated Monte Carlo outcomes and their histogram.

use serde::{Deserialize, Serialize};

/// One scalar resolution outcome per Monte Carlo iteration.
///
/// Owned exclusively by the driver for the duration of a run. Partial
/// distributions from parallel workers merge by concatenation; all summary
/// statistics are order-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDistribution {
    values: Vec<f64>,
}

impl OutcomeDistribution {
    /// Create an empty distribution.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Create an empty distribution with reserved capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append one outcome.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Merge another distribution by concatenation.
    pub fn merge(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// Number of accumulated outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the distribution is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The accumulated outcomes, in insertion order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Raw sample mean; 0 for an empty distribution.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Raw sample standard deviation (population); 0 for fewer than two
    /// entries.
    #[must_use]
    pub fn stddev(&self) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.values.len() as f64;
        var.sqrt()
    }

    /// Histogram of the outcomes restricted to `[lo, hi)` with `bins` equal
    /// bins. Entries outside the window are dropped (that is the point of
    /// the 5-sigma window: far outliers do not distort the fit).
    #[must_use]
    pub fn histogram(&self, lo: f64, hi: f64, bins: usize) -> Histogram {
        let mut counts = vec![0u64; bins];
        let width = (hi - lo) / bins as f64;
        if width > 0.0 {
            for &v in &self.values {
                if v >= lo && v < hi {
                    let bin = ((v - lo) / width) as usize;
                    // Right edge can round up on the last bin.
                    let bin = bin.min(bins - 1);
                    counts[bin] += 1;
                }
            }
        }
        Histogram { lo, hi, counts }
    }
}

impl From<Vec<f64>> for OutcomeDistribution {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Equal-width histogram over a fixed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Lower window edge (inclusive).
    pub lo: f64,
    /// Upper window edge (exclusive).
    pub hi: f64,
    /// Entry counts per bin.
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Width of one bin.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.counts.len() as f64
    }

    /// Centre of bin `i`.
    #[must_use]
    pub fn bin_center(&self, i: usize) -> f64 {
        self.lo + (i as f64 + 0.5) * self.bin_width()
    }

    /// Total number of entries inside the window.
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }
}
