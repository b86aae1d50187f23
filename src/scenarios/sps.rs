//! CERN SPS H6B Timepix3 telescope benches (November 2018).
//!
//! Seven (or six) Timepix3 planes around a device under test at z = 105 mm.
//! The beam energy at the SPS is taken as exact.

use crate::error::TelResult;
use crate::model::{TelescopeConfiguration, UncertainParameter};

/// Telescope plane positions along the beam axis (mm). Seven-plane benches
/// use the full table, six-plane benches drop the last entry.
const Z_TEL: [f64; 7] = [0.0, 21.5, 43.5, 186.5, 208.0, 231.5, 336.5];

/// Device under test position (mm), between the third and fourth plane.
const Z_DUT: f64 = 105.0;

/// Survey uncertainty on every z position (mm).
const ERR_Z: f64 = 1.0;

/// Timepix3 material budget X/X₀ and its uncertainty.
const X_TPX3: f64 = 4.0e-2;
const ERR_X_TPX3: f64 = 0.5e-2;

/// Timepix3 intrinsic resolution (mm) and its uncertainty.
const RES_TPX3: f64 = 4.0e-3;
const ERR_RES_TPX3: f64 = 0.2e-3;

/// Uncertainty on the device-under-test material budget.
const ERR_X_DUT: f64 = 0.5e-2;

/// SPS H6B beam energy (GeV), treated as exact.
const EBEAM: f64 = 120.0;

/// ATLASpix material budget X/X₀ (100 um thickness).
pub const X_DUT_APX: f64 = 1.025e-2;

/// CLICpix2 material budget X/X₀.
pub const X_DUT_CP2: f64 = 2.4e-2;

/// The plane index of the device under test in beam-axis order.
pub const TARGET_PLANE: usize = 3;

/// Build an SPS bench configuration.
///
/// The device under test sits in physical slot 3, so the resolution is
/// evaluated there.
///
/// # Errors
///
/// Returns an error if any embedded constant violates a model invariant;
/// this indicates a programming mistake in the tables.
pub fn configuration(seven_planes: bool, dut_budget: f64) -> TelResult<TelescopeConfiguration> {
    let planes = if seven_planes { 7 } else { 6 };
    let mut builder = TelescopeConfiguration::builder();

    let mut dut_inserted = false;
    for &z in &Z_TEL[..planes] {
        if !dut_inserted && z > Z_DUT {
            builder = builder.scatterer_plane(
                UncertainParameter::new(Z_DUT, ERR_Z)?,
                UncertainParameter::new(dut_budget, ERR_X_DUT)?,
            );
            dut_inserted = true;
        }
        builder = builder.measurement_plane(
            UncertainParameter::new(z, ERR_Z)?,
            UncertainParameter::new(X_TPX3, ERR_X_TPX3)?,
            UncertainParameter::new(RES_TPX3, ERR_RES_TPX3)?,
        );
    }

    builder
        .beam_energy(UncertainParameter::fixed(EBEAM))
        .target_plane(TARGET_PLANE)
        .build()
}
