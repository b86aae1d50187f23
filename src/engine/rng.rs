//! Deterministic random number generation.
//!
//! Implements PCG (Permuted Congruential Generator) with partitioned seeds
//! for reproducible parallel execution.
//!
//! # Reproducibility Guarantee
//!
//! Given the same master seed, all random number sequences will be
//! bitwise-identical across:
//! - Different runs
//! - Different platforms
//! - Different worker counts (via partitioning)
//!
//! The generator is always passed as an explicit `&mut SimRng` capability,
//! never held in ambient global state.

use rand::prelude::*;
use rand_pcg::Pcg64;

/// Multiplier for deriving independent streams from a master seed.
const STREAM_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic, reproducible random number generator.
///
/// Based on PCG (Permuted Congruential Generator) which provides:
/// - Excellent statistical properties
/// - Fast generation
/// - Predictable sequences from seed
/// - Independent streams via partitioning
#[derive(Debug, Clone)]
pub struct SimRng {
    /// Master seed for reproducibility.
    master_seed: u64,
    /// Current stream index for partitioning.
    stream: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl SimRng {
    /// Create a new RNG with the given master seed.
    #[must_use]
    pub fn new(master_seed: u64) -> Self {
        let rng = Pcg64::seed_from_u64(master_seed);
        Self {
            master_seed,
            stream: 0,
            rng,
        }
    }

    /// Create an RNG seeded from operating-system entropy.
    ///
    /// Matches the historical unseeded behaviour of the estimator; runs are
    /// not reproducible unless the returned master seed is recorded.
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::new(seed)
    }

    /// Get the master seed.
    #[must_use]
    pub const fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Get current stream index.
    #[must_use]
    pub const fn stream(&self) -> u64 {
        self.stream
    }

    /// Create partitioned RNGs for parallel execution.
    ///
    /// Each partition gets an independent stream derived from the master seed,
    /// ensuring reproducibility regardless of execution order.
    #[must_use]
    pub fn partition(&mut self, n: usize) -> Vec<Self> {
        let partitions: Vec<Self> = (0..n)
            .map(|i| {
                let stream = self.stream + i as u64;
                Self {
                    master_seed: self.master_seed,
                    stream,
                    rng: Pcg64::seed_from_u64(Self::derive_seed(self.master_seed, stream)),
                }
            })
            .collect();

        self.stream += n as u64;
        partitions
    }

    /// Derive the seed for one independent stream of a master seed.
    ///
    /// Used by the parallel Monte Carlo driver to give every iteration its
    /// own generator so that results do not depend on worker scheduling.
    #[must_use]
    pub fn derive_seed(master_seed: u64, stream: u64) -> u64 {
        master_seed.wrapping_add(stream.wrapping_mul(STREAM_MULTIPLIER))
    }

    /// Create the generator for one independent stream of a master seed.
    #[must_use]
    pub fn for_stream(master_seed: u64, stream: u64) -> Self {
        Self {
            master_seed,
            stream,
            rng: Pcg64::seed_from_u64(Self::derive_seed(master_seed, stream)),
        }
    }

    /// Generate a random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Generate a standard normal sample using Box-Muller transform.
    pub fn gen_standard_normal(&mut self) -> f64 {
        // Box-Muller transform
        let u1 = self.gen_f64();
        let u2 = self.gen_f64();

        // Avoid log(0)
        let u1 = if u1 < f64::EPSILON { f64::EPSILON } else { u1 };

        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Generate a normal sample with given mean and std.
    ///
    /// A zero-width normal is a point mass: `std = 0` returns `mean` exactly,
    /// which is what makes fixed parameters sample deterministically without
    /// special-casing in the geometry sampler.
    pub fn gen_normal(&mut self, mean: f64, std: f64) -> f64 {
        mean + std * self.gen_standard_normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Property: Same seed produces same sequence.
    #[test]
    fn test_reproducibility() {
        let mut rng1 = SimRng::new(42);
        let mut rng2 = SimRng::new(42);

        let seq1: Vec<f64> = (0..100).map(|_| rng1.gen_f64()).collect();
        let seq2: Vec<f64> = (0..100).map(|_| rng2.gen_f64()).collect();

        assert_eq!(seq1, seq2, "Same seed must produce identical sequences");
    }

    /// Property: Different seeds produce different sequences.
    #[test]
    fn test_different_seeds() {
        let mut rng1 = SimRng::new(42);
        let mut rng2 = SimRng::new(43);

        let seq1: Vec<f64> = (0..100).map(|_| rng1.gen_f64()).collect();
        let seq2: Vec<f64> = (0..100).map(|_| rng2.gen_f64()).collect();

        assert_ne!(
            seq1, seq2,
            "Different seeds must produce different sequences"
        );
    }

    /// Property: Partitions are independent.
    #[test]
    fn test_partition_independence() {
        let mut rng = SimRng::new(42);
        let mut partitions = rng.partition(4);

        let seqs: Vec<Vec<f64>> = partitions
            .iter_mut()
            .map(|p| (0..10).map(|_| p.gen_f64()).collect())
            .collect();

        for i in 0..seqs.len() {
            for j in (i + 1)..seqs.len() {
                assert_ne!(seqs[i], seqs[j], "Partitions must be independent");
            }
        }
    }

    /// Property: Partitions are reproducible.
    #[test]
    fn test_partition_reproducibility() {
        let mut rng1 = SimRng::new(42);
        let mut rng2 = SimRng::new(42);

        let mut partitions1 = rng1.partition(4);
        let mut partitions2 = rng2.partition(4);

        for (p1, p2) in partitions1.iter_mut().zip(partitions2.iter_mut()) {
            let seq1: Vec<f64> = (0..10).map(|_| p1.gen_f64()).collect();
            let seq2: Vec<f64> = (0..10).map(|_| p2.gen_f64()).collect();
            assert_eq!(seq1, seq2, "Partition sequences must be reproducible");
        }
    }

    /// Property: per-stream derivation matches partitioning.
    #[test]
    fn test_for_stream_matches_partition() {
        let mut rng = SimRng::new(7);
        let mut partitions = rng.partition(3);

        for (stream, part) in partitions.iter_mut().enumerate() {
            let mut derived = SimRng::for_stream(7, stream as u64);
            let a: Vec<f64> = (0..10).map(|_| part.gen_f64()).collect();
            let b: Vec<f64> = (0..10).map(|_| derived.gen_f64()).collect();
            assert_eq!(a, b, "for_stream must reproduce partition {stream}");
        }
    }

    /// Property: Normal distribution has correct moments.
    #[test]
    fn test_normal_distribution() {
        let mut rng = SimRng::new(42);
        let n = 10000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gen_standard_normal()).collect();

        let mean: f64 = samples.iter().sum::<f64>() / n as f64;
        let variance: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 0.1, "Mean {mean} too far from 0");
        assert!(
            (variance - 1.0).abs() < 0.1,
            "Variance {variance} too far from 1"
        );
    }

    /// A zero-width normal must return the mean exactly, every time.
    #[test]
    fn test_gen_normal_zero_sigma_is_point_mass() {
        let mut rng = SimRng::new(42);
        for _ in 0..100 {
            let v = rng.gen_normal(105.0, 0.0);
            assert!(
                (v - 105.0).abs() < 1e-12,
                "gen_normal with std=0 must return mean exactly, got {v}"
            );
        }
    }

    #[test]
    fn test_gen_normal_scales_sigma() {
        let mut rng = SimRng::new(42);
        let samples: Vec<f64> = (0..10000).map(|_| rng.gen_normal(0.0, 10.0)).collect();
        let mean: f64 = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance: f64 =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(
            (variance - 100.0).abs() < 15.0,
            "Variance {variance} not close to 100"
        );
    }

    #[test]
    fn test_standard_normal_is_finite() {
        let mut rng = SimRng::new(12345);
        for _ in 0..50000 {
            let v = rng.gen_standard_normal();
            assert!(v.is_finite(), "non-finite normal sample: {v}");
        }
    }

    #[test]
    fn test_from_entropy_records_seed() {
        let rng = SimRng::from_entropy();
        // The seed must be recoverable so a run can be replayed.
        let mut replay = SimRng::new(rng.master_seed());
        let mut original = rng.clone();
        assert_eq!(replay.gen_f64(), original.gen_f64());
    }

    #[test]
    fn test_partition_stream_increment() {
        let mut rng = SimRng::new(42);
        assert_eq!(rng.stream(), 0);

        let _ = rng.partition(4);
        assert_eq!(rng.stream(), 4);

        let _ = rng.partition(3);
        assert_eq!(rng.stream(), 7);
    }
}
