//! Run configuration with YAML schema and validation.
//!
//! Every knob of a run is data: schema validation via serde, range checks
//! via validator, semantic checks beyond the schema, and a builder for
//! programmatic construction. Defaults match the historical estimator.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::driver::DEFAULT_ITERATIONS;
use crate::error::{TelError, TelResult};
use crate::stats::summary::DEFAULT_BINS;

/// Top-level run configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Reproducibility settings.
    #[validate(nested)]
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Monte Carlo settings.
    #[validate(nested)]
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,

    /// Summary extraction settings.
    #[validate(nested)]
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Result artifact settings.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl RunConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the YAML does not
    /// match the schema, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> TelResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> TelResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;

        config.validate()?;
        config.validate_semantic()?;

        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Semantic constraints beyond the schema.
    fn validate_semantic(&self) -> TelResult<()> {
        // A distribution this small cannot support a meaningful fit.
        if self.monte_carlo.iterations < 100 {
            return Err(TelError::config(format!(
                "Monte Carlo requires at least 100 iterations, got {}",
                self.monte_carlo.iterations
            )));
        }
        if self.monte_carlo.workers == 0 {
            return Err(TelError::config("worker count must be at least 1"));
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            reproducibility: ReproducibilityConfig::default(),
            monte_carlo: MonteCarloConfig::default(),
            summary: SummaryConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    seed: Option<u64>,
    iterations: Option<usize>,
    workers: Option<usize>,
    bins: Option<usize>,
    directory: Option<String>,
}

impl RunConfigBuilder {
    /// Set the master seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the Monte Carlo iteration count.
    #[must_use]
    pub const fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Set the worker count (1 = sequential).
    #[must_use]
    pub const fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the histogram bin count.
    #[must_use]
    pub const fn bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins);
        self
    }

    /// Set the artifact output directory.
    #[must_use]
    pub fn directory<S: Into<String>>(mut self, directory: S) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> RunConfig {
        let mut config = RunConfig::default();

        if let Some(seed) = self.seed {
            config.reproducibility.seed = Some(seed);
        }
        if let Some(iterations) = self.iterations {
            config.monte_carlo.iterations = iterations;
        }
        if let Some(workers) = self.workers {
            config.monte_carlo.workers = workers;
        }
        if let Some(bins) = self.bins {
            config.summary.bins = bins;
        }
        if let Some(directory) = self.directory {
            config.output.directory = directory;
        }

        config
    }
}

/// Reproducibility settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReproducibilityConfig {
    /// Master seed for all randomness. `None` seeds from entropy; the
    /// chosen seed is logged so the run can be replayed.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Monte Carlo settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MonteCarloConfig {
    /// Number of iterations.
    #[validate(range(min = 1))]
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Worker threads; 1 runs on the calling thread.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

const fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

const fn default_workers() -> usize {
    1
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            workers: default_workers(),
        }
    }
}

/// Summary extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SummaryConfig {
    /// Histogram bins inside the fit window.
    #[validate(range(min = 4))]
    #[serde(default = "default_bins")]
    pub bins: usize,
}

const fn default_bins() -> usize {
    DEFAULT_BINS
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
        }
    }
}

/// Result artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the JSON artifacts.
    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_directory() -> String {
    "output".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}
