//! Detector planes and uncertain scalar parameters.

use serde::{Deserialize, Serialize};

use crate::error::{TelError, TelResult};

/// A scalar with a central value and a standard deviation.
///
/// `sigma = 0` means the parameter is fixed and never randomized. Used for
/// plane positions, material budgets, intrinsic resolutions and the beam
/// energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertainParameter {
    /// Central value.
    pub nominal: f64,
    /// Standard deviation; 0 for a fixed parameter.
    pub sigma: f64,
}

impl UncertainParameter {
    /// Create a parameter with an uncertainty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `sigma` is negative or either value is
    /// not finite.
    pub fn new(nominal: f64, sigma: f64) -> TelResult<Self> {
        if !nominal.is_finite() || !sigma.is_finite() {
            return Err(TelError::invalid_parameter(format!(
                "nominal {nominal} and sigma {sigma} must be finite"
            )));
        }
        if sigma < 0.0 {
            return Err(TelError::invalid_parameter(format!(
                "sigma must be >= 0, got {sigma}"
            )));
        }
        Ok(Self { nominal, sigma })
    }

    /// Create a fixed (non-randomized) parameter.
    ///
    /// # Panics
    ///
    /// Never panics for finite input; non-finite nominals are clamped out by
    /// the telescope builder validation instead.
    #[must_use]
    pub const fn fixed(nominal: f64) -> Self {
        Self {
            nominal,
            sigma: 0.0,
        }
    }

    /// Whether this parameter is randomized at all.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.sigma == 0.0
    }
}

/// One concrete detector or scatterer location along the beam axis.
///
/// Invariants are enforced at construction: the material budget is
/// non-negative, and a plane either measures with a non-negative intrinsic
/// resolution or is a pure scatterer with none. A measuring plane without a
/// resolution is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Location along the beam axis (mm).
    position: f64,
    /// Material budget X/X₀ traversed at this plane.
    material_budget: f64,
    /// Intrinsic measurement resolution (mm); `None` for a pure scatterer.
    resolution: Option<f64>,
}

impl Plane {
    /// Create a measuring plane.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlane` if the material budget or the intrinsic
    /// resolution is negative, or any value is not finite.
    pub fn measurement(position: f64, material_budget: f64, resolution: f64) -> TelResult<Self> {
        Self::validate_common(position, material_budget)?;
        if !resolution.is_finite() {
            return Err(TelError::invalid_plane(format!(
                "intrinsic resolution must be finite, got {resolution}"
            )));
        }
        if resolution < 0.0 {
            return Err(TelError::invalid_plane(format!(
                "intrinsic resolution must be >= 0, got {resolution}"
            )));
        }
        Ok(Self {
            position,
            material_budget,
            resolution: Some(resolution),
        })
    }

    /// Create a pure scatterer plane (material only, no measurement).
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlane` if the material budget is negative or any
    /// value is not finite.
    pub fn scatterer(position: f64, material_budget: f64) -> TelResult<Self> {
        Self::validate_common(position, material_budget)?;
        Ok(Self {
            position,
            material_budget,
            resolution: None,
        })
    }

    fn validate_common(position: f64, material_budget: f64) -> TelResult<()> {
        if !position.is_finite() || !material_budget.is_finite() {
            return Err(TelError::invalid_plane(format!(
                "position {position} and material budget {material_budget} must be finite"
            )));
        }
        if material_budget < 0.0 {
            return Err(TelError::invalid_plane(format!(
                "material budget must be >= 0, got {material_budget}"
            )));
        }
        Ok(())
    }

    /// Location along the beam axis.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Material budget X/X₀.
    #[must_use]
    pub const fn material_budget(&self) -> f64 {
        self.material_budget
    }

    /// Intrinsic resolution, if the plane measures.
    #[must_use]
    pub const fn resolution(&self) -> Option<f64> {
        self.resolution
    }

    /// Whether the plane records a position measurement.
    #[must_use]
    pub const fn is_measurement(&self) -> bool {
        self.resolution.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_parameter() {
        let p = UncertainParameter::fixed(105.0);
        assert!(p.is_fixed());
        assert!((p.nominal - 105.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_sigma_rejected() {
        let p = UncertainParameter::new(1.0, -0.1);
        assert!(matches!(p, Err(TelError::InvalidParameter { .. })));
    }

    #[test]
    fn test_non_finite_parameter_rejected() {
        assert!(UncertainParameter::new(f64::NAN, 0.1).is_err());
        assert!(UncertainParameter::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_measurement_plane() {
        let p = Plane::measurement(21.5, 4.0e-2, 4.0e-3).unwrap();
        assert!(p.is_measurement());
        assert_eq!(p.resolution(), Some(4.0e-3));
    }

    #[test]
    fn test_scatterer_has_no_resolution() {
        let p = Plane::scatterer(105.0, 1.025e-2).unwrap();
        assert!(!p.is_measurement());
        assert_eq!(p.resolution(), None);
    }

    #[test]
    fn test_negative_budget_rejected() {
        let p = Plane::scatterer(105.0, -0.01);
        assert!(matches!(p, Err(TelError::InvalidPlane { .. })));

        let p = Plane::measurement(0.0, -0.01, 4.0e-3);
        assert!(matches!(p, Err(TelError::InvalidPlane { .. })));
    }

    #[test]
    fn test_negative_resolution_rejected() {
        let p = Plane::measurement(0.0, 4.0e-2, -1e-3);
        assert!(matches!(p, Err(TelError::InvalidPlane { .. })));
    }

    #[test]
    fn test_zero_budget_allowed() {
        // A massless marker plane is legal.
        let p = Plane::measurement(0.0, 0.0, 4.0e-3);
        assert!(p.is_ok());
    }

    #[test]
    fn test_non_finite_plane_rejected() {
        assert!(Plane::scatterer(f64::NAN, 0.01).is_err());
        assert!(Plane::measurement(0.0, 0.01, f64::NAN).is_err());
    }
}
