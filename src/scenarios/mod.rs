//! Embedded bench geometries, keyed by mode number.
//!
//! The mode is validated up front: an unknown number fails before any
//! sampler, driver, or output state exists. Geometry tables live exactly
//! once, in [`sps`] and [`desy`], and are shared by the Monte Carlo and
//! scan paths.

pub mod desy;
pub mod sps;

use crate::error::{TelError, TelResult};
use crate::model::TelescopeConfiguration;

use desy::Survey;

/// Relative half-width of the default material-budget sweep.
const SCAN_VARY: f64 = 0.1;

/// Step of the default material-budget sweep (absolute X/X₀).
const SCAN_STEP: f64 = 1.0e-4;

/// One supported bench setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// SPS, 7 Timepix3 planes, ATLASpix device under test.
    SpsApx7,
    /// SPS, 6 Timepix3 planes, ATLASpix device under test.
    SpsApx6,
    /// SPS, 7 Timepix3 planes, CLICpix2 device under test.
    SpsCp27,
    /// SPS, 6 Timepix3 planes, CLICpix2 device under test.
    SpsCp26,
    /// DESY June 2019, 6 Mimosa26 planes, ATLASpix device under test.
    DesyJuneApx,
    /// DESY June 2019, 6 Mimosa26 + Timepix3, ATLASpix device under test.
    DesyJuneApxTpx3,
    /// DESY June 2019, 6 Mimosa26 planes, CLICpix2 device under test.
    DesyJuneCp2,
    /// DESY June 2019, 6 Mimosa26 + Timepix3, CLICpix2 device under test.
    DesyJuneCp2Tpx3,
    /// DESY July 2019, 6 Mimosa26 planes, ATLASpix device under test.
    DesyJulyApx,
    /// DESY July 2019, 6 Mimosa26 + Timepix3, ATLASpix device under test.
    DesyJulyApxTpx3,
}

impl TryFrom<i32> for Mode {
    type Error = TelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::SpsApx7),
            2 => Ok(Self::SpsApx6),
            3 => Ok(Self::SpsCp27),
            4 => Ok(Self::SpsCp26),
            5 => Ok(Self::DesyJuneApx),
            6 => Ok(Self::DesyJuneApxTpx3),
            7 => Ok(Self::DesyJuneCp2),
            8 => Ok(Self::DesyJuneCp2Tpx3),
            9 => Ok(Self::DesyJulyApx),
            10 => Ok(Self::DesyJulyApxTpx3),
            other => Err(TelError::InvalidMode(other)),
        }
    }
}

impl Mode {
    /// All modes, in menu order.
    pub const ALL: [Self; 10] = [
        Self::SpsApx7,
        Self::SpsApx6,
        Self::SpsCp27,
        Self::SpsCp26,
        Self::DesyJuneApx,
        Self::DesyJuneApxTpx3,
        Self::DesyJuneCp2,
        Self::DesyJuneCp2Tpx3,
        Self::DesyJulyApx,
        Self::DesyJulyApxTpx3,
    ];

    /// The menu number.
    #[must_use]
    pub const fn number(self) -> i32 {
        match self {
            Self::SpsApx7 => 1,
            Self::SpsApx6 => 2,
            Self::SpsCp27 => 3,
            Self::SpsCp26 => 4,
            Self::DesyJuneApx => 5,
            Self::DesyJuneApxTpx3 => 6,
            Self::DesyJuneCp2 => 7,
            Self::DesyJuneCp2Tpx3 => 8,
            Self::DesyJulyApx => 9,
            Self::DesyJulyApxTpx3 => 10,
        }
    }

    /// One-line menu description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SpsApx7 => "SPS: 7 Timepix3 planes, DUT = APX",
            Self::SpsApx6 => "SPS: 6 Timepix3 planes, DUT = APX",
            Self::SpsCp27 => "SPS: 7 Timepix3 planes, DUT = CP2",
            Self::SpsCp26 => "SPS: 6 Timepix3 planes, DUT = CP2",
            Self::DesyJuneApx => "DESY (June 2019): 6 Mimosa26, DUT = APX",
            Self::DesyJuneApxTpx3 => "DESY (June 2019): 6 Mimosa26 + Timepix3, DUT = APX",
            Self::DesyJuneCp2 => "DESY (June 2019): 6 Mimosa26, DUT = CP2",
            Self::DesyJuneCp2Tpx3 => "DESY (June 2019): 6 Mimosa26 + Timepix3, DUT = CP2",
            Self::DesyJulyApx => "DESY (July 2019): 6 Mimosa26, DUT = APX",
            Self::DesyJulyApxTpx3 => "DESY (July 2019): 6 Mimosa26 + Timepix3, DUT = APX",
        }
    }

    /// Title recorded in the result artifact.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::SpsApx7 => "APX: Res. at DUT (7 planes)",
            Self::SpsApx6 => "APX: Res. at DUT (6 planes)",
            Self::SpsCp27 => "CP2: Res. at DUT (7 planes)",
            Self::SpsCp26 => "CP2: Res. at DUT (6 planes)",
            Self::DesyJuneApx | Self::DesyJulyApx => "APX: Res. at DUT (M26)",
            Self::DesyJuneApxTpx3 | Self::DesyJulyApxTpx3 => "APX: Res. at DUT (M26+TPX3)",
            Self::DesyJuneCp2 => "CP2: Res. at DUT (M26)",
            Self::DesyJuneCp2Tpx3 => "CP2: Res. at DUT (M26+TPX3)",
        }
    }

    /// File stem of the result artifact.
    #[must_use]
    pub const fn artifact_stem(self) -> &'static str {
        match self {
            Self::SpsApx7 => "sps-resolution-nov2018_apx_7planes",
            Self::SpsApx6 => "sps-resolution-nov2018_apx_6planes",
            Self::SpsCp27 => "sps-resolution-nov2018_cp2_7planes",
            Self::SpsCp26 => "sps-resolution-nov2018_cp2_6planes",
            Self::DesyJuneApx => "desy-resolution-june2019_apx_m26",
            Self::DesyJuneApxTpx3 => "desy-resolution-june2019_apx_m26-tpx3",
            Self::DesyJuneCp2 => "desy-resolution-june2019_cp2_m26",
            Self::DesyJuneCp2Tpx3 => "desy-resolution-june2019_cp2_m26-tpx3",
            Self::DesyJulyApx => "desy-resolution-july2019_apx_m26",
            Self::DesyJulyApxTpx3 => "desy-resolution-july2019_apx_m26-tpx3",
        }
    }

    /// Nominal material budget of this mode's device under test.
    #[must_use]
    pub const fn dut_budget(self) -> f64 {
        match self {
            Self::SpsApx7 | Self::SpsApx6 => sps::X_DUT_APX,
            Self::SpsCp27 | Self::SpsCp26 => sps::X_DUT_CP2,
            Self::DesyJuneCp2 | Self::DesyJuneCp2Tpx3 => desy::X_DUT_CP2,
            Self::DesyJuneApx
            | Self::DesyJuneApxTpx3
            | Self::DesyJulyApx
            | Self::DesyJulyApxTpx3 => desy::X_DUT_APX,
        }
    }

    /// Build this mode's telescope configuration.
    ///
    /// # Errors
    ///
    /// Only if the embedded tables are internally inconsistent.
    pub fn configuration(self) -> TelResult<TelescopeConfiguration> {
        match self {
            Self::SpsApx7 => sps::configuration(true, sps::X_DUT_APX),
            Self::SpsApx6 => sps::configuration(false, sps::X_DUT_APX),
            Self::SpsCp27 => sps::configuration(true, sps::X_DUT_CP2),
            Self::SpsCp26 => sps::configuration(false, sps::X_DUT_CP2),
            Self::DesyJuneApx => desy::configuration(Survey::June2019, false, desy::X_DUT_APX),
            Self::DesyJuneApxTpx3 => {
                desy::configuration(Survey::June2019, true, desy::X_DUT_APX)
            }
            Self::DesyJuneCp2 => desy::configuration(Survey::June2019, false, desy::X_DUT_CP2),
            Self::DesyJuneCp2Tpx3 => {
                desy::configuration(Survey::June2019, true, desy::X_DUT_CP2)
            }
            Self::DesyJulyApx => desy::configuration(Survey::July2019, false, desy::X_DUT_APX),
            Self::DesyJulyApxTpx3 => {
                desy::configuration(Survey::July2019, true, desy::X_DUT_APX)
            }
        }
    }

    /// Default sweep for the scan driver: nominal DUT budget ± 10 % in
    /// steps of 1e-4.
    #[must_use]
    pub fn default_scan_range(self) -> (f64, f64, f64) {
        let nominal = self.dut_budget();
        (
            nominal * (1.0 - SCAN_VARY),
            nominal * (1.0 + SCAN_VARY),
            SCAN_STEP,
        )
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.number(), self.description())
    }
}
