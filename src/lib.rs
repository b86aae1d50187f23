//! # telesim
//!
//! Beam-telescope pointing resolution estimation with Monte Carlo
//! uncertainty propagation.
//!
//! A tracking telescope is an ordered set of detector planes along the beam
//! axis. Each plane carries a material budget (X/X₀) and, if it measures,
//! an intrinsic position resolution. telesim estimates the track pointing
//! resolution at a chosen plane (typically the device under test) and
//! propagates the uncertainties of the inputs — plane positions, material
//! budgets, intrinsic resolutions, beam energy — through that estimate by
//! drawing randomized realizations of the whole geometry.
//!
//! ## Example
//!
//! ```rust
//! use telesim::prelude::*;
//!
//! let config = TelescopeConfiguration::builder()
//!     .measurement_plane(
//!         UncertainParameter::fixed(0.0),
//!         UncertainParameter::fixed(4.0e-2),
//!         UncertainParameter::fixed(4.0e-3),
//!     )
//!     .measurement_plane(
//!         UncertainParameter::fixed(100.0),
//!         UncertainParameter::fixed(4.0e-2),
//!         UncertainParameter::fixed(4.0e-3),
//!     )
//!     .scatterer_plane(
//!         UncertainParameter::fixed(50.0),
//!         UncertainParameter::fixed(1.0e-2),
//!     )
//!     .beam_energy(UncertainParameter::fixed(120.0))
//!     .target_plane(2)
//!     .build()
//!     .unwrap();
//!
//! let oracle = AnalyticOracle::default();
//! let driver = MonteCarloDriver::with_iterations(1000);
//! let mut rng = SimRng::new(42);
//! let dist = driver.run(&config, &oracle, &mut rng).unwrap();
//! assert_eq!(dist.len(), 1000);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Numerical code choices are intentional
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop // Sometimes range loops are clearer
)]

pub mod cli;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod model;
pub mod oracle;
pub mod sampler;
pub mod scenarios;
pub mod stats;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{RunConfig, RunConfigBuilder};
    pub use crate::driver::{MaterialScan, MonteCarloDriver, ScanPoint};
    pub use crate::engine::rng::SimRng;
    pub use crate::error::{TelError, TelResult};
    pub use crate::model::{
        Plane, Realization, TelescopeConfiguration, UncertainParameter,
    };
    pub use crate::oracle::{AnalyticOracle, ResolutionOracle};
    pub use crate::sampler::GeometrySampler;
    pub use crate::stats::{summarize, Estimate, OutcomeDistribution, ResolutionSummary};
}

/// Re-export for public API
pub use error::{TelError, TelResult};
