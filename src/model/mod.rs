//! Telescope geometry model.
//!
//! Pure data with validation at construction. A [`TelescopeConfiguration`]
//! describes the nominal geometry with uncertainties; a [`Realization`] is
//! one concrete draw of it, consumed by a resolution oracle.

pub mod plane;
pub mod telescope;

pub use plane::{Plane, UncertainParameter};
pub use telescope::{
    PlaneSpec, Realization, TelescopeConfiguration, TelescopeConfigurationBuilder,
};
