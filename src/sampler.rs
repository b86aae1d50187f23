//! Geometry sampler: one randomized realization per call.
//!
//! Every uncertain parameter in a [`TelescopeConfiguration`] is drawn once
//! and independently from a normal distribution with the parameter's nominal
//! mean and sigma. A zero sigma degenerates to the nominal value, so fixed
//! parameters need no special-casing. Plane order is preserved exactly.

use tracing::trace;

use crate::engine::rng::SimRng;
use crate::error::TelResult;
use crate::model::{Plane, Realization, TelescopeConfiguration};

/// Stateless sampler over telescope configurations.
///
/// The random generator is an explicit capability; the sampler touches no
/// other shared state.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometrySampler;

impl GeometrySampler {
    /// Create a sampler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Draw one realization of the full plane sequence plus beam energy.
    ///
    /// Scatterer planes are sampled for position and material budget only;
    /// measuring planes additionally sample their intrinsic resolution.
    /// Material-budget draws are censored at zero: the bundled benches put
    /// some nominal budgets only two sigma above the physical bound, and a
    /// sub-zero amount of material is not a geometry, just the tail of the
    /// input uncertainty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlane` if a draw lands outside the plane invariants
    /// (e.g. a negative intrinsic resolution from a wide sigma).
    pub fn sample(
        &self,
        config: &TelescopeConfiguration,
        rng: &mut SimRng,
    ) -> TelResult<Realization> {
        let mut planes = Vec::with_capacity(config.planes().len());

        for spec in config.planes() {
            let position = rng.gen_normal(spec.position.nominal, spec.position.sigma);
            let budget = rng
                .gen_normal(spec.material_budget.nominal, spec.material_budget.sigma)
                .max(0.0);

            let plane = match spec.resolution {
                Some(res) => {
                    let resolution = rng.gen_normal(res.nominal, res.sigma);
                    Plane::measurement(position, budget, resolution)?
                }
                None => Plane::scatterer(position, budget)?,
            };
            planes.push(plane);
        }

        let beam_energy = rng.gen_normal(
            config.beam_energy().nominal,
            config.beam_energy().sigma,
        );

        trace!(beam_energy, planes = planes.len(), "sampled realization");

        Ok(Realization {
            planes,
            beam_energy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UncertainParameter;

    fn fixed_config() -> TelescopeConfiguration {
        TelescopeConfiguration::builder()
            .measurement_plane(
                UncertainParameter::fixed(0.0),
                UncertainParameter::fixed(4.0e-2),
                UncertainParameter::fixed(4.0e-3),
            )
            .measurement_plane(
                UncertainParameter::fixed(21.5),
                UncertainParameter::fixed(4.0e-2),
                UncertainParameter::fixed(4.0e-3),
            )
            .scatterer_plane(
                UncertainParameter::fixed(105.0),
                UncertainParameter::fixed(1.025e-2),
            )
            .beam_energy(UncertainParameter::fixed(120.0))
            .target_plane(2)
            .build()
            .unwrap()
    }

    fn uncertain_config() -> TelescopeConfiguration {
        TelescopeConfiguration::builder()
            .measurement_plane(
                UncertainParameter::new(0.0, 1.0).unwrap(),
                UncertainParameter::new(4.0e-2, 0.5e-2).unwrap(),
                UncertainParameter::new(4.0e-3, 0.2e-3).unwrap(),
            )
            .scatterer_plane(
                UncertainParameter::new(105.0, 1.0).unwrap(),
                UncertainParameter::new(1.025e-2, 0.1e-2).unwrap(),
            )
            .beam_energy(UncertainParameter::new(120.0, 2.4).unwrap())
            .target_plane(1)
            .build()
            .unwrap()
    }

    /// All-sigma-zero configurations sample to their nominals, every call.
    #[test]
    fn test_zero_sigma_samples_nominals() {
        let config = fixed_config();
        let sampler = GeometrySampler::new();
        let mut rng = SimRng::new(42);

        for _ in 0..50 {
            let r = sampler.sample(&config, &mut rng).unwrap();
            assert!((r.planes[0].position() - 0.0).abs() < 1e-12);
            assert!((r.planes[1].position() - 21.5).abs() < 1e-12);
            assert!((r.planes[2].material_budget() - 1.025e-2).abs() < 1e-12);
            assert!((r.beam_energy - 120.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_order_preserved() {
        let config = uncertain_config();
        let sampler = GeometrySampler::new();
        let mut rng = SimRng::new(42);

        let r = sampler.sample(&config, &mut rng).unwrap();
        assert_eq!(r.planes.len(), 2);
        assert!(r.planes[0].is_measurement());
        assert!(!r.planes[1].is_measurement());
    }

    #[test]
    fn test_scatterer_never_gains_resolution() {
        let config = uncertain_config();
        let sampler = GeometrySampler::new();
        let mut rng = SimRng::new(7);

        for _ in 0..100 {
            let r = sampler.sample(&config, &mut rng).unwrap();
            assert_eq!(r.planes[1].resolution(), None);
        }
    }

    #[test]
    fn test_sampling_is_seeded() {
        let config = uncertain_config();
        let sampler = GeometrySampler::new();

        let mut rng1 = SimRng::new(42);
        let mut rng2 = SimRng::new(42);
        let r1 = sampler.sample(&config, &mut rng1).unwrap();
        let r2 = sampler.sample(&config, &mut rng2).unwrap();
        assert_eq!(r1, r2);

        let mut rng3 = SimRng::new(43);
        let r3 = sampler.sample(&config, &mut rng3).unwrap();
        assert_ne!(r1, r3);
    }

    /// Budget draws below the physical bound censor to zero instead of
    /// producing an invalid plane.
    #[test]
    fn test_budget_draws_censor_at_zero() {
        let config = TelescopeConfiguration::builder()
            .scatterer_plane(
                UncertainParameter::fixed(0.0),
                UncertainParameter::new(1.0e-4, 10.0).unwrap(),
            )
            .beam_energy(UncertainParameter::fixed(120.0))
            .target_plane(0)
            .build()
            .unwrap();
        let sampler = GeometrySampler::new();
        let mut rng = SimRng::new(42);

        let mut saw_censored = false;
        for _ in 0..100 {
            let r = sampler.sample(&config, &mut rng).unwrap();
            let budget = r.planes[0].material_budget();
            assert!(budget >= 0.0);
            if budget == 0.0 {
                saw_censored = true;
            }
        }
        assert!(saw_censored, "sigma >> nominal must hit the bound");
    }

    /// A wide resolution sigma can draw below zero; that still surfaces as
    /// an invalid plane, there is no sensible censoring for it.
    #[test]
    fn test_negative_resolution_draw_is_an_error() {
        let config = TelescopeConfiguration::builder()
            .measurement_plane(
                UncertainParameter::fixed(0.0),
                UncertainParameter::fixed(4.0e-2),
                UncertainParameter::new(1.0e-4, 10.0).unwrap(),
            )
            .beam_energy(UncertainParameter::fixed(120.0))
            .target_plane(0)
            .build()
            .unwrap();
        let sampler = GeometrySampler::new();
        let mut rng = SimRng::new(42);

        let mut saw_error = false;
        for _ in 0..100 {
            if sampler.sample(&config, &mut rng).is_err() {
                saw_error = true;
                break;
            }
        }
        assert!(saw_error, "sigma >> nominal must eventually draw negative");
    }
}
