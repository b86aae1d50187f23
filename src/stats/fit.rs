//! Gaussian fit by damped nonlinear least squares.
//!
//! Fits `A * exp(-(x - mu)^2 / (2 sigma^2))` to histogram bin counts with a
//! Levenberg-Marquardt iteration. The normal equations are a fixed 3x3
//! system, solved directly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TelError, TelResult};
use crate::stats::distribution::Histogram;

/// Maximum Levenberg-Marquardt iterations before declaring non-convergence.
const MAX_ITERATIONS: usize = 200;

/// Relative cost-change threshold for convergence.
const COST_TOLERANCE: f64 = 1e-12;

/// Fitted Gaussian parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianFit {
    /// Peak amplitude.
    pub amplitude: f64,
    /// Location parameter (the reported centre).
    pub center: f64,
    /// Scale parameter (the reported width), always positive.
    pub width: f64,
    /// Final sum of squared residuals.
    pub residual: f64,
    /// Iterations used.
    pub iterations: usize,
}

/// Fit a Gaussian to a histogram.
///
/// Initial guesses come from the caller (typically the raw sample moments).
///
/// # Errors
///
/// Returns `FitFailure` if the histogram has fewer than four populated bins,
/// the initial width is not positive, the normal equations become singular,
/// or the iteration does not converge.
pub fn fit_gaussian(histogram: &Histogram, mean: f64, stddev: f64) -> TelResult<GaussianFit> {
    let populated = histogram.counts.iter().filter(|&&c| c > 0).count();
    if populated < 4 {
        return Err(TelError::fit(format!(
            "only {populated} populated bins, need at least 4"
        )));
    }
    if stddev <= 0.0 || !stddev.is_finite() {
        return Err(TelError::fit(format!(
            "initial width must be positive, got {stddev}"
        )));
    }

    let xs: Vec<f64> = (0..histogram.counts.len())
        .map(|i| histogram.bin_center(i))
        .collect();
    let ys: Vec<f64> = histogram.counts.iter().map(|&c| c as f64).collect();

    let peak = ys.iter().copied().fold(0.0f64, f64::max);
    let mut params = [peak, mean, stddev];
    let mut cost = residual_cost(&xs, &ys, &params);
    let mut lambda = 1e-3;

    for iteration in 0..MAX_ITERATIONS {
        let (jtj, jtr) = normal_equations(&xs, &ys, &params);

        // Damped normal matrix: JtJ + lambda * diag(JtJ).
        let mut damped = jtj;
        for d in 0..3 {
            damped[d][d] *= 1.0 + lambda;
        }

        let Some(step) = solve3(damped, jtr) else {
            return Err(TelError::fit("singular normal equations"));
        };

        let candidate = [
            params[0] - step[0],
            params[1] - step[1],
            params[2] - step[2],
        ];
        let candidate_cost = residual_cost(&xs, &ys, &candidate);

        if candidate_cost.is_finite() && candidate_cost < cost {
            let improvement = (cost - candidate_cost) / cost.max(f64::MIN_POSITIVE);
            params = candidate;
            cost = candidate_cost;
            lambda = (lambda * 0.3).max(1e-12);

            if improvement < COST_TOLERANCE {
                return finish(params, cost, iteration + 1);
            }
        } else {
            lambda *= 10.0;
            if lambda > 1e12 {
                return Err(TelError::fit("no descent direction found"));
            }
        }
    }

    Err(TelError::fit(format!(
        "no convergence after {MAX_ITERATIONS} iterations"
    )))
}

fn finish(params: [f64; 3], cost: f64, iterations: usize) -> TelResult<GaussianFit> {
    let [amplitude, center, width] = params;
    if !center.is_finite() || !width.is_finite() || width.abs() <= 0.0 {
        return Err(TelError::fit(format!(
            "degenerate fit result: center {center}, width {width}"
        )));
    }
    debug!(center, width, iterations, "Gaussian fit converged");
    Ok(GaussianFit {
        amplitude,
        center,
        // The model is symmetric in the sign of sigma.
        width: width.abs(),
        residual: cost,
        iterations,
    })
}

/// Model value and partial derivatives at one point.
fn model(x: f64, params: &[f64; 3]) -> (f64, [f64; 3]) {
    let [a, mu, sigma] = *params;
    let d = x - mu;
    let e = (-d * d / (2.0 * sigma * sigma)).exp();
    let value = a * e;
    let grad = [
        e,
        a * e * d / (sigma * sigma),
        a * e * d * d / (sigma * sigma * sigma),
    ];
    (value, grad)
}

fn residual_cost(xs: &[f64], ys: &[f64], params: &[f64; 3]) -> f64 {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let (v, _) = model(x, params);
            (v - y) * (v - y)
        })
        .sum()
}

/// Accumulate `J^T J` and `J^T r` over all bins.
fn normal_equations(xs: &[f64], ys: &[f64], params: &[f64; 3]) -> ([[f64; 3]; 3], [f64; 3]) {
    let mut jtj = [[0.0f64; 3]; 3];
    let mut jtr = [0.0f64; 3];

    for (&x, &y) in xs.iter().zip(ys) {
        let (v, grad) = model(x, params);
        let r = v - y;
        for i in 0..3 {
            jtr[i] += grad[i] * r;
            for j in 0..3 {
                jtj[i][j] += grad[i] * grad[j];
            }
        }
    }

    (jtj, jtr)
}

/// Solve a 3x3 linear system with partial pivoting. `None` if singular.
fn solve3(mut a: [[f64; 3]; 3], mut b: [f64; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let pivot_row = (col..3)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;
        if a[pivot_row][col].abs() < 1e-300 {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..3 {
            let factor = a[row][col] / a[col][col];
            for k in col..3 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; 3];
    for row in (0..3).rev() {
        let mut sum = b[row];
        for k in (row + 1)..3 {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
