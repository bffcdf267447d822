//! # Value at Risk
//!
//! $$
//! \tilde z = z + (z^2-1)\frac{S}{6} + (z^3-3z)\frac{K-3}{24} - (2z^3-5z)\frac{S^2}{36}
//! $$
//!
//! Historic, Gaussian and Cornish-Fisher VaR plus historic CVaR. Levels are
//! given in percent (`5.0` is the 5% tail) and losses are reported as
//! positive numbers.

use ndarray::ArrayView1;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

use super::moments::kurtosis;
use super::moments::mean;
use super::moments::skewness;
use super::moments::std_dev;

/// Percentile with linear interpolation between order statistics.
pub fn percentile(r: ArrayView1<f64>, level: f64) -> f64 {
  let mut sorted: Vec<f64> = r.to_vec();
  if sorted.is_empty() {
    return f64::NAN;
  }
  sorted.sort_by(|a, b| a.total_cmp(b));

  let pos = (sorted.len() - 1) as f64 * (level / 100.0).clamp(0.0, 1.0);
  let lo = pos.floor() as usize;
  let hi = pos.ceil() as usize;
  let frac = pos - lo as f64;
  sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// The loss such that `level` percent of returns fall below its negation.
pub fn var_historic(r: ArrayView1<f64>, level: f64) -> f64 {
  -percentile(r, level)
}

/// Mean loss over the returns at or beyond the historic VaR.
pub fn cvar_historic(r: ArrayView1<f64>, level: f64) -> f64 {
  let cutoff = -var_historic(r, level);
  let tail: Vec<f64> = r.iter().copied().filter(|x| *x <= cutoff).collect();
  if tail.is_empty() {
    return f64::NAN;
  }
  -(tail.iter().sum::<f64>() / tail.len() as f64)
}

fn standard_normal_quantile(p: f64) -> f64 {
  Normal::standard().inverse_cdf(p)
}

/// Quantile `z` adjusted for observed skewness and raw kurtosis.
pub fn cornish_fisher_z(z: f64, s: f64, k: f64) -> f64 {
  z + (z.powi(2) - 1.0) * s / 6.0 + (z.powi(3) - 3.0 * z) * (k - 3.0) / 24.0
    - (2.0 * z.powi(3) - 5.0 * z) * s.powi(2) / 36.0
}

/// Parametric VaR; `modified` applies the Cornish-Fisher adjustment.
pub fn var_gaussian(r: ArrayView1<f64>, level: f64, modified: bool) -> f64 {
  let mut z = standard_normal_quantile(level / 100.0);
  if modified {
    z = cornish_fisher_z(z, skewness(r), kurtosis(r));
  }
  -(mean(r) + z * std_dev(r, 0))
}
