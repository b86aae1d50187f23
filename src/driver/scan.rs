//! Deterministic material-budget scan.
//!
//! Sweeps the target plane's nominal material budget over a half-open range
//! and evaluates the oracle on the nominal realization at every step. No
//! randomness is involved; the scan depends only on the immutable base
//! configuration, so it can be recreated and replayed at will.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{TelError, TelResult};
use crate::model::TelescopeConfiguration;
use crate::oracle::ResolutionOracle;

/// One evaluated scan step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanPoint {
    /// Material budget X/X₀ placed at the target plane.
    pub budget: f64,
    /// Oracle resolution at that budget (mm).
    pub resolution: f64,
}

/// Lazy iterator over a material-budget sweep.
///
/// Yields `ScanPoint`s for budgets `from + i * step` while they stay below
/// `to` (the range is half-open, `to` itself is never evaluated). Each step
/// clones the base configuration with the swept budget substituted and
/// evaluates the oracle on the nominal realization.
#[derive(Debug)]
pub struct MaterialScan<'a, O> {
    config: &'a TelescopeConfiguration,
    oracle: &'a O,
    from: f64,
    to: f64,
    step: f64,
    index: usize,
}

impl<'a, O: ResolutionOracle> MaterialScan<'a, O> {
    /// Set up a scan over `[from, to)` with the given step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the step is not a positive finite
    /// number or either bound is not finite.
    pub fn new(
        config: &'a TelescopeConfiguration,
        oracle: &'a O,
        from: f64,
        to: f64,
        step: f64,
    ) -> TelResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(TelError::invalid_parameter(format!(
                "scan step must be positive and finite, got {step}"
            )));
        }
        if !from.is_finite() || !to.is_finite() {
            return Err(TelError::invalid_parameter(format!(
                "scan bounds must be finite, got [{from}, {to})"
            )));
        }
        Ok(Self {
            config,
            oracle,
            from,
            to,
            step,
            index: 0,
        })
    }

    /// Rewind to the first step.
    pub fn restart(&mut self) {
        self.index = 0;
    }

    fn evaluate(&self, budget: f64) -> TelResult<ScanPoint> {
        let swept = self.config.with_target_budget(budget);
        let realization = swept.realize_nominal()?;
        let resolution = self.oracle.resolution(
            &realization.planes,
            realization.beam_energy,
            swept.target_plane(),
        )?;
        trace!(budget, resolution, "scan step");
        Ok(ScanPoint { budget, resolution })
    }
}

impl<O: ResolutionOracle> Iterator for MaterialScan<'_, O> {
    type Item = TelResult<ScanPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        // Budgets derive from the step index, not a running sum, so long
        // scans do not accumulate rounding drift.
        let budget = self.step.mul_add(self.index as f64, self.from);
        if budget >= self.to {
            return None;
        }
        self.index += 1;
        Some(self.evaluate(budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UncertainParameter;
    use crate::oracle::{AnalyticOracle, ConstantOracle};

    fn config_with_dut() -> TelescopeConfiguration {
        let z_tel = [0.0, 21.5, 43.5, 186.5, 208.0, 231.5];
        let mut builder = TelescopeConfiguration::builder();
        for (i, &z) in z_tel.iter().enumerate() {
            builder = builder.measurement_plane(
                UncertainParameter::fixed(z),
                UncertainParameter::fixed(4.0e-2),
                UncertainParameter::fixed(4.0e-3),
            );
            if i == 2 {
                builder = builder.scatterer_plane(
                    UncertainParameter::fixed(105.0),
                    UncertainParameter::fixed(1.025e-2),
                );
            }
        }
        builder
            .beam_energy(UncertainParameter::fixed(120.0))
            .target_plane(3)
            .build()
            .unwrap()
    }

    #[test]
    fn test_half_open_range() {
        let config = config_with_dut();
        let oracle = ConstantOracle(1.0);
        let scan = MaterialScan::new(&config, &oracle, 0.0, 1.0, 0.25).unwrap();

        let budgets: Vec<f64> = scan.map(|p| p.unwrap().budget).collect();
        assert_eq!(budgets, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_empty_range_yields_nothing() {
        let config = config_with_dut();
        let oracle = ConstantOracle(1.0);
        let mut scan = MaterialScan::new(&config, &oracle, 0.5, 0.5, 0.1).unwrap();
        assert!(scan.next().is_none());
    }

    #[test]
    fn test_invalid_step_rejected() {
        let config = config_with_dut();
        let oracle = ConstantOracle(1.0);
        assert!(MaterialScan::new(&config, &oracle, 0.0, 1.0, 0.0).is_err());
        assert!(MaterialScan::new(&config, &oracle, 0.0, 1.0, -0.1).is_err());
        assert!(MaterialScan::new(&config, &oracle, 0.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_resolution_grows_with_budget() {
        let config = config_with_dut();
        let oracle = AnalyticOracle::new();
        let scan = MaterialScan::new(&config, &oracle, 0.5e-2, 5.0e-2, 0.5e-2).unwrap();

        let resolutions: Vec<f64> = scan.map(|p| p.unwrap().resolution).collect();
        assert!(resolutions.windows(2).all(|w| w[1] > w[0]),
            "more material at the scattering plane must degrade the resolution: {resolutions:?}");
    }

    #[test]
    fn test_restart_replays_identically() {
        let config = config_with_dut();
        let oracle = AnalyticOracle::new();
        let mut scan = MaterialScan::new(&config, &oracle, 0.9e-2, 1.2e-2, 1.0e-4).unwrap();

        let first: Vec<ScanPoint> = scan.by_ref().map(|p| p.unwrap()).collect();
        scan.restart();
        let second: Vec<ScanPoint> = scan.map(|p| p.unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_base_configuration_untouched() {
        let config = config_with_dut();
        let oracle = ConstantOracle(1.0);
        let scan = MaterialScan::new(&config, &oracle, 0.0, 0.5, 0.1).unwrap();
        let count = scan.count();
        assert_eq!(count, 5);
        assert!((config.planes()[3].material_budget.nominal - 1.025e-2).abs() < f64::EPSILON);
    }
}
