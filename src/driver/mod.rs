//! Estimation drivers.
//!
//! Two thin strategies over the same oracle contract: [`MonteCarloDriver`]
//! propagates input uncertainties by randomized sampling, [`MaterialScan`]
//! sweeps one nominal parameter deterministically. Both consume the shared
//! [`crate::model::TelescopeConfiguration`] / [`crate::model::Realization`]
//! abstractions; geometry tables exist exactly once.

pub mod monte_carlo;
pub mod scan;

pub use monte_carlo::{MonteCarloDriver, DEFAULT_ITERATIONS};
pub use scan::{MaterialScan, ScanPoint};
