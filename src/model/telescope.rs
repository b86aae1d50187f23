//! Telescope configuration and realizations.

use serde::{Deserialize, Serialize};

use crate::error::{TelError, TelResult};
use crate::model::plane::{Plane, UncertainParameter};

/// The uncertain description of one plane in a telescope.
///
/// Position and material budget are always present; a measuring plane
/// additionally carries an uncertain intrinsic resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneSpec {
    /// Location along the beam axis (mm).
    pub position: UncertainParameter,
    /// Material budget X/X₀.
    pub material_budget: UncertainParameter,
    /// Intrinsic resolution (mm); `None` for a pure scatterer.
    pub resolution: Option<UncertainParameter>,
}

impl PlaneSpec {
    /// Spec for a measuring plane.
    #[must_use]
    pub const fn measurement(
        position: UncertainParameter,
        material_budget: UncertainParameter,
        resolution: UncertainParameter,
    ) -> Self {
        Self {
            position,
            material_budget,
            resolution: Some(resolution),
        }
    }

    /// Spec for a pure scatterer plane.
    #[must_use]
    pub const fn scatterer(
        position: UncertainParameter,
        material_budget: UncertainParameter,
    ) -> Self {
        Self {
            position,
            material_budget,
            resolution: None,
        }
    }

    /// Resolve this spec at its nominal values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlane` if the nominal values violate plane invariants.
    pub fn realize_nominal(&self) -> TelResult<Plane> {
        match self.resolution {
            Some(res) => {
                Plane::measurement(self.position.nominal, self.material_budget.nominal, res.nominal)
            }
            None => Plane::scatterer(self.position.nominal, self.material_budget.nominal),
        }
    }
}

/// Ordered description of a full telescope with uncertainties.
///
/// Insertion order is the physical ordering along the beam axis and is
/// preserved through sampling and evaluation. Immutable after construction;
/// the geometry sampler consumes it on every iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopeConfiguration {
    planes: Vec<PlaneSpec>,
    beam_energy: UncertainParameter,
    target_plane: usize,
}

impl TelescopeConfiguration {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> TelescopeConfigurationBuilder {
        TelescopeConfigurationBuilder::default()
    }

    /// The ordered plane specs.
    #[must_use]
    pub fn planes(&self) -> &[PlaneSpec] {
        &self.planes
    }

    /// The uncertain beam energy (GeV).
    #[must_use]
    pub const fn beam_energy(&self) -> UncertainParameter {
        self.beam_energy
    }

    /// Index of the plane at which the resolution is evaluated.
    #[must_use]
    pub const fn target_plane(&self) -> usize {
        self.target_plane
    }

    /// Resolve every parameter at its nominal value (the scan path).
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlane` if any nominal violates plane invariants.
    pub fn realize_nominal(&self) -> TelResult<Realization> {
        let planes = self
            .planes
            .iter()
            .map(PlaneSpec::realize_nominal)
            .collect::<TelResult<Vec<_>>>()?;
        Ok(Realization {
            planes,
            beam_energy: self.beam_energy.nominal,
        })
    }

    /// A copy of this configuration with the target plane's nominal material
    /// budget replaced. Used by the scan driver; everything else is shared.
    #[must_use]
    pub fn with_target_budget(&self, budget: f64) -> Self {
        let mut copy = self.clone();
        copy.planes[self.target_plane].material_budget = UncertainParameter {
            nominal: budget,
            sigma: copy.planes[self.target_plane].material_budget.sigma,
        };
        copy
    }
}

/// Builder for [`TelescopeConfiguration`].
#[derive(Debug, Default)]
pub struct TelescopeConfigurationBuilder {
    planes: Vec<PlaneSpec>,
    beam_energy: Option<UncertainParameter>,
    target_plane: Option<usize>,
}

impl TelescopeConfigurationBuilder {
    /// Append a measuring plane. Order of calls is beam-axis order.
    #[must_use]
    pub fn measurement_plane(
        mut self,
        position: UncertainParameter,
        material_budget: UncertainParameter,
        resolution: UncertainParameter,
    ) -> Self {
        self.planes
            .push(PlaneSpec::measurement(position, material_budget, resolution));
        self
    }

    /// Append a pure scatterer plane (e.g. the device under test).
    #[must_use]
    pub fn scatterer_plane(
        mut self,
        position: UncertainParameter,
        material_budget: UncertainParameter,
    ) -> Self {
        self.planes
            .push(PlaneSpec::scatterer(position, material_budget));
        self
    }

    /// Append an already-built spec.
    #[must_use]
    pub fn plane(mut self, spec: PlaneSpec) -> Self {
        self.planes.push(spec);
        self
    }

    /// Set the beam energy (GeV).
    #[must_use]
    pub const fn beam_energy(mut self, energy: UncertainParameter) -> Self {
        self.beam_energy = Some(energy);
        self
    }

    /// Set the plane index at which the resolution is evaluated.
    #[must_use]
    pub const fn target_plane(mut self, index: usize) -> Self {
        self.target_plane = Some(index);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` if the target index is out of bounds,
    /// `InvalidPlane` if any nominal plane violates its invariants, and
    /// `Config` if the beam energy or target plane is missing.
    pub fn build(self) -> TelResult<TelescopeConfiguration> {
        let beam_energy = self
            .beam_energy
            .ok_or_else(|| TelError::config("beam energy is required"))?;
        let target_plane = self
            .target_plane
            .ok_or_else(|| TelError::config("target plane index is required"))?;

        if target_plane >= self.planes.len() {
            return Err(TelError::InvalidTarget {
                index: target_plane,
                planes: self.planes.len(),
            });
        }

        let config = TelescopeConfiguration {
            planes: self.planes,
            beam_energy,
            target_plane,
        };

        // Nominal values must themselves form a valid telescope.
        config.realize_nominal()?;

        Ok(config)
    }
}

/// One concrete, fully-resolved telescope plus beam energy.
///
/// Ephemeral: created and discarded per Monte Carlo iteration or scan step,
/// never shared across iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realization {
    /// Planes in the configuration's order.
    pub planes: Vec<Plane>,
    /// Sampled beam energy (GeV).
    pub beam_energy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_plane_config() -> TelescopeConfiguration {
        TelescopeConfiguration::builder()
            .measurement_plane(
                UncertainParameter::fixed(0.0),
                UncertainParameter::fixed(4.0e-2),
                UncertainParameter::fixed(4.0e-3),
            )
            .scatterer_plane(
                UncertainParameter::fixed(105.0),
                UncertainParameter::fixed(1.025e-2),
            )
            .beam_energy(UncertainParameter::fixed(120.0))
            .target_plane(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_preserves_order() {
        let config = two_plane_config();
        assert_eq!(config.planes().len(), 2);
        assert!((config.planes()[0].position.nominal - 0.0).abs() < f64::EPSILON);
        assert!((config.planes()[1].position.nominal - 105.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_target_out_of_bounds() {
        let result = TelescopeConfiguration::builder()
            .measurement_plane(
                UncertainParameter::fixed(0.0),
                UncertainParameter::fixed(4.0e-2),
                UncertainParameter::fixed(4.0e-3),
            )
            .beam_energy(UncertainParameter::fixed(120.0))
            .target_plane(7)
            .build();
        assert!(matches!(
            result,
            Err(TelError::InvalidTarget { index: 7, planes: 1 })
        ));
    }

    #[test]
    fn test_missing_beam_energy() {
        let result = TelescopeConfiguration::builder()
            .scatterer_plane(
                UncertainParameter::fixed(0.0),
                UncertainParameter::fixed(0.01),
            )
            .target_plane(0)
            .build();
        assert!(matches!(result, Err(TelError::Config { .. })));
    }

    #[test]
    fn test_invalid_nominal_rejected_at_build() {
        let result = TelescopeConfiguration::builder()
            .scatterer_plane(
                UncertainParameter::fixed(0.0),
                UncertainParameter::fixed(-0.01),
            )
            .beam_energy(UncertainParameter::fixed(120.0))
            .target_plane(0)
            .build();
        assert!(matches!(result, Err(TelError::InvalidPlane { .. })));
    }

    #[test]
    fn test_realize_nominal() {
        let config = two_plane_config();
        let realization = config.realize_nominal().unwrap();
        assert_eq!(realization.planes.len(), 2);
        assert!(realization.planes[0].is_measurement());
        assert!(!realization.planes[1].is_measurement());
        assert!((realization.beam_energy - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_target_budget() {
        let config = two_plane_config();
        let swept = config.with_target_budget(0.5);
        assert!((swept.planes()[1].material_budget.nominal - 0.5).abs() < f64::EPSILON);
        // Original untouched.
        assert!((config.planes()[1].material_budget.nominal - 1.025e-2).abs() < f64::EPSILON);
    }
}
