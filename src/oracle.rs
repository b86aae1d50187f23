//! Resolution oracle contract and a self-contained analytic implementation.
//!
//! The oracle is the external collaborator of the estimators: given an
//! ordered plane sequence, a beam energy and a target index, it returns the
//! extrapolated track pointing resolution at that plane. The contract
//! requires a *pure* function of its inputs — repeated calls with identical
//! realizations must return identical values — because the Monte Carlo
//! driver's statistical validity depends on it.
//!
//! [`AnalyticOracle`] is a closed-form estimator kept deliberately simple:
//! a weighted straight-line extrapolation from the measuring planes plus a
//! Highland multiple-scattering term for upstream material. It exists so the
//! binary and tests are self-contained; a full track-fit engine can be
//! plugged in behind the same trait.

use crate::error::{TelError, TelResult};
use crate::model::Plane;

/// Deterministic mapping from a realization to a scalar resolution.
///
/// Implementations must be pure: no hidden state, no randomness. The
/// returned value is non-negative; its unit follows the unit of the plane
/// intrinsic resolutions (mm in the bundled geometries).
pub trait ResolutionOracle {
    /// Resolution at `target`, in the unit of the intrinsic resolutions.
    ///
    /// # Errors
    ///
    /// Returns `Oracle` for degenerate geometry the implementation cannot
    /// evaluate (too few measuring planes, non-positive beam energy, ...).
    fn resolution(&self, planes: &[Plane], beam_energy: f64, target: usize) -> TelResult<f64>;
}

/// Highland multiple-scattering angle for one plane (radians).
///
/// `theta0 = 13.6 MeV / (beta c p) * sqrt(x) * (1 + 0.038 ln x)` with the
/// thin-target correction clamped at zero for vanishing budgets. Momentum is
/// approximated by the beam energy (relativistic beam).
fn highland_angle(material_budget: f64, beam_energy: f64) -> f64 {
    if material_budget <= 0.0 {
        return 0.0;
    }
    let correction = 1.0 + 0.038 * material_budget.ln();
    if correction <= 0.0 {
        return 0.0;
    }
    13.6e-3 / beam_energy * material_budget.sqrt() * correction
}

/// Closed-form pointing resolution estimator.
///
/// Every measuring plane gets an effective variance at the target: its
/// intrinsic resolution plus the lever-arm deflections from multiple
/// scattering in all material between it and the target (the target's own
/// budget included, which is what makes a budget sweep meaningful). A
/// weighted least-squares straight line over those effective variances is
/// then extrapolated to the target position. Scattering correlations
/// between planes sharing material are neglected; that is the price of a
/// closed form.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticOracle;

impl AnalyticOracle {
    /// Create the estimator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ResolutionOracle for AnalyticOracle {
    fn resolution(&self, planes: &[Plane], beam_energy: f64, target: usize) -> TelResult<f64> {
        let target_plane = planes.get(target).ok_or_else(|| {
            TelError::oracle(format!(
                "target index {target} out of range for {} planes",
                planes.len()
            ))
        })?;

        if !beam_energy.is_finite() || beam_energy <= 0.0 {
            return Err(TelError::oracle(format!(
                "beam energy must be positive, got {beam_energy}"
            )));
        }

        let z_target = target_plane.position();

        // Effective variance of each measuring plane at the target: its
        // intrinsic resolution plus scattering deflections from material
        // between it and the target. For an upstream plane the deflection
        // accumulates from the scatterer to the target; for a downstream
        // plane it accumulates from the scatterer to the measurement, the
        // target's own material included.
        let mut measurements: Vec<(f64, f64)> = Vec::with_capacity(planes.len());
        for (i, plane) in planes.iter().enumerate() {
            if i == target {
                continue;
            }
            let Some(res) = plane.resolution() else {
                continue;
            };
            if res <= 0.0 {
                return Err(TelError::oracle(format!(
                    "plane {i} has non-positive intrinsic resolution {res}"
                )));
            }

            let z_i = plane.position();
            let mut var_i = res * res;
            for (j, other) in planes.iter().enumerate() {
                if j == i {
                    continue;
                }
                let z_j = other.position();
                let arm = if z_i < z_target && z_i < z_j && z_j <= z_target {
                    z_target - z_j
                } else if z_i > z_target && z_target <= z_j && z_j < z_i {
                    z_i - z_j
                } else {
                    continue;
                };
                let theta = highland_angle(other.material_budget(), beam_energy);
                var_i += theta * theta * arm * arm;
            }
            measurements.push((z_i, 1.0 / var_i));
        }

        if measurements.len() < 2 {
            return Err(TelError::oracle(format!(
                "degenerate geometry: need at least two measuring planes, found {}",
                measurements.len()
            )));
        }

        let sum_w: f64 = measurements.iter().map(|(_, w)| w).sum();
        let z_mean = measurements.iter().map(|(z, w)| w * z).sum::<f64>() / sum_w;
        let sum_wzz: f64 = measurements
            .iter()
            .map(|(z, w)| w * (z - z_mean) * (z - z_mean))
            .sum();

        if sum_wzz <= 0.0 {
            return Err(TelError::oracle(
                "degenerate geometry: measuring planes are co-located",
            ));
        }

        let dz = z_target - z_mean;
        let resolution = (1.0 / sum_w + dz * dz / sum_wzz).sqrt();
        if !resolution.is_finite() {
            return Err(TelError::oracle(format!(
                "non-finite resolution for beam energy {beam_energy}"
            )));
        }
        Ok(resolution)
    }
}

/// Oracle returning a fixed value for every realization.
///
/// Test fixture for driver behaviour independent of any physics.
#[derive(Debug, Clone, Copy)]
pub struct ConstantOracle(pub f64);

impl ResolutionOracle for ConstantOracle {
    fn resolution(&self, _planes: &[Plane], _beam_energy: f64, _target: usize) -> TelResult<f64> {
        Ok(self.0)
    }
}
