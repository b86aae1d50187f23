//! Error types for telesim.
//!
//! All fallible operations return `Result<T, TelError>` instead of panicking.
//! Configuration and sampling errors terminate a run immediately with full
//! context; a failed Gaussian fit is the only locally recovered condition
//! (see [`crate::stats::summarize`]).

use thiserror::Error;

use crate::model::Realization;

/// Result type alias for telesim operations.
pub type TelResult<T> = Result<T, TelError>;

/// Unified error type for all telesim operations.
#[derive(Debug, Error)]
pub enum TelError {
    // ===== Configuration-construction errors =====
    /// A detector plane violated its construction invariants.
    #[error("invalid plane: {reason}")]
    InvalidPlane {
        /// Which invariant was violated.
        reason: String,
    },

    /// The target plane index is outside the plane sequence.
    #[error("invalid target plane {index} for a telescope with {planes} planes")]
    InvalidTarget {
        /// Requested index.
        index: usize,
        /// Number of planes in the configuration.
        planes: usize,
    },

    /// An uncertain parameter has a negative sigma or non-finite values.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Which constraint was violated.
        reason: String,
    },

    // ===== Run-time errors =====
    /// The resolution oracle could not produce a value.
    #[error("oracle failure: {reason}")]
    Oracle {
        /// Why the oracle refused the geometry.
        reason: String,
    },

    /// A Monte Carlo run aborted because the oracle failed for one
    /// realization. Carries the iteration index and the realization that
    /// triggered the failure; no partial result is salvaged.
    #[error(
        "oracle failed at iteration {iteration}: {reason} \
         (beam {beam:.4} GeV, {planes} planes)"
    )]
    RunAborted {
        /// Zero-based index of the failing iteration.
        iteration: usize,
        /// The oracle's failure reason.
        reason: String,
        /// Sampled beam energy of the offending realization.
        beam: f64,
        /// Plane count of the offending realization.
        planes: usize,
        /// The full realization, for post-mortem inspection.
        realization: Box<Realization>,
    },

    /// The Gaussian fit did not converge. Recoverable: the summarizer falls
    /// back to raw sample moments and flags the result.
    #[error("Gaussian fit failed: {reason}")]
    FitFailure {
        /// Why the fit could not converge.
        reason: String,
    },

    /// Unrecognized mode selector. Rejected before any sampler, driver or
    /// output state is constructed.
    #[error("invalid mode {0}: run with mode 0 to list the available modes")]
    InvalidMode(i32),

    // ===== Ambient errors =====
    /// Invalid configuration parameter.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result artifact serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TelError {
    /// Create an invalid-plane error with a reason.
    #[must_use]
    pub fn invalid_plane(reason: impl Into<String>) -> Self {
        Self::InvalidPlane {
            reason: reason.into(),
        }
    }

    /// Create an invalid-parameter error with a reason.
    #[must_use]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create an oracle failure with a reason.
    #[must_use]
    pub fn oracle(reason: impl Into<String>) -> Self {
        Self::Oracle {
            reason: reason.into(),
        }
    }

    /// Create a fit failure with a reason.
    #[must_use]
    pub fn fit(reason: impl Into<String>) -> Self {
        Self::FitFailure {
            reason: reason.into(),
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is fatal to a run. Fit failures are recovered
    /// locally by the summarizer; everything else terminates the run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::FitFailure { .. })
    }
}
