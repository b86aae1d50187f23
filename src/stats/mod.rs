//! Outcome accumulation and summary statistics.
//!
//! The Monte Carlo driver fills an [`OutcomeDistribution`]; [`summarize`]
//! reduces it to a centre ± width via a Gaussian fit over a 5-sigma window,
//! falling back to raw sample moments when the fit cannot converge.

pub mod distribution;
pub mod fit;
pub mod summary;

pub use distribution::{Histogram, OutcomeDistribution};
pub use fit::{fit_gaussian, GaussianFit};
pub use summary::{
    summarize, summarize_binned, summarize_with_histogram, Estimate, ResolutionSummary,
};
