//! DESY-II Mimosa26 telescope benches (June and July 2019).
//!
//! Six Mimosa26 planes around a device under test, optionally followed by a
//! Timepix3 timing plane downstream. The DESY-II beam energy carries a 2 %
//! spread.

use crate::error::TelResult;
use crate::model::{TelescopeConfiguration, UncertainParameter};

/// June 2019 survey: Mimosa26 positions (mm), DUT and Timepix3 positions.
const Z_TEL_JUNE: [f64; 6] = [0.0, 153.0, 305.0, 344.0, 456.0, 576.0];
const Z_DUT_JUNE: f64 = 333.0;
const Z_TPX3_JUNE: f64 = 666.0;

/// July 2019 survey.
const Z_TEL_JULY: [f64; 6] = [0.0, 153.0, 305.0, 345.0, 455.0, 565.0];
const Z_DUT_JULY: f64 = 331.0;
const Z_TPX3_JULY: f64 = 629.0;

/// Survey uncertainty on every z position (mm).
const ERR_Z: f64 = 1.0;

/// Mimosa26 material budget X/X₀ and intrinsic resolution (mm).
const X_M26: f64 = 0.075e-2;
const ERR_X_M26: f64 = 0.01e-2;
const RES_M26: f64 = 3.2e-3;
const ERR_RES_M26: f64 = 0.1e-3;

/// Timepix3 timing plane material budget X/X₀ and intrinsic resolution (mm).
const X_TPX3: f64 = 3.8e-2;
const ERR_X_TPX3: f64 = 0.5e-2;
const RES_TPX3: f64 = 12.75e-3;
const ERR_RES_TPX3: f64 = 0.01e-3;

/// Uncertainty on the device-under-test material budget.
const ERR_X_DUT: f64 = 0.5e-2;

/// DESY-II beam energy (GeV) with its 2 % spread.
const EBEAM: f64 = 5.42;

/// ATLASpix material budget X/X₀ (100 um thickness).
pub const X_DUT_APX: f64 = 1.025e-2;

/// CLICpix2 material budget X/X₀.
pub const X_DUT_CP2: f64 = 2.4e-2;

/// The plane index of the device under test in beam-axis order.
pub const TARGET_PLANE: usize = 3;

/// Survey period of a DESY bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Survey {
    June2019,
    July2019,
}

/// Build a DESY bench configuration.
///
/// The device under test sits in physical slot 3; `with_tpx3` appends the
/// Timepix3 timing plane downstream of the last Mimosa26.
///
/// # Errors
///
/// Returns an error if any embedded constant violates a model invariant;
/// this indicates a programming mistake in the tables.
pub fn configuration(
    survey: Survey,
    with_tpx3: bool,
    dut_budget: f64,
) -> TelResult<TelescopeConfiguration> {
    let (z_tel, z_dut, z_tpx3) = match survey {
        Survey::June2019 => (&Z_TEL_JUNE, Z_DUT_JUNE, Z_TPX3_JUNE),
        Survey::July2019 => (&Z_TEL_JULY, Z_DUT_JULY, Z_TPX3_JULY),
    };

    let mut builder = TelescopeConfiguration::builder();
    let mut dut_inserted = false;
    for &z in z_tel {
        if !dut_inserted && z > z_dut {
            builder = builder.scatterer_plane(
                UncertainParameter::new(z_dut, ERR_Z)?,
                UncertainParameter::new(dut_budget, ERR_X_DUT)?,
            );
            dut_inserted = true;
        }
        builder = builder.measurement_plane(
            UncertainParameter::new(z, ERR_Z)?,
            UncertainParameter::new(X_M26, ERR_X_M26)?,
            UncertainParameter::new(RES_M26, ERR_RES_M26)?,
        );
    }

    if with_tpx3 {
        builder = builder.measurement_plane(
            UncertainParameter::new(z_tpx3, ERR_Z)?,
            UncertainParameter::new(X_TPX3, ERR_X_TPX3)?,
            UncertainParameter::new(RES_TPX3, ERR_RES_TPX3)?,
        );
    }

    builder
        .beam_energy(UncertainParameter::new(EBEAM, EBEAM * 0.02)?)
        .target_plane(TARGET_PLANE)
        .build()
}
