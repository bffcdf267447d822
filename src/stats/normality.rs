//! # Normality
//!
//! $$
//! JB = \frac{n}{6}\left(S^2 + \frac{(K-3)^2}{4}\right) \sim \chi^2_2
//! $$
//!
use ndarray::ArrayView1;
use statrs::distribution::ChiSquared;
use statrs::distribution::ContinuousCDF;

use super::moments::kurtosis;
use super::moments::skewness;

/// Result of the Jarque-Bera normality test.
#[derive(Debug, Clone, Copy)]
pub struct JarqueBeraResult {
  /// JB test statistic.
  pub statistic: f64,
  /// p-value under chi-square(2) asymptotics.
  pub p_value: f64,
  pub skewness: f64,
  /// Sample excess kurtosis.
  pub excess_kurtosis: f64,
}

/// Jarque-Bera test for normality.
///
/// A constant (zero-variance) sample is reported with an infinite statistic
/// and zero p-value.
pub fn jarque_bera(r: ArrayView1<f64>) -> JarqueBeraResult {
  let n = r.len() as f64;
  let s = skewness(r);
  let excess_kurtosis = kurtosis(r) - 3.0;

  if !s.is_finite() || !excess_kurtosis.is_finite() {
    return JarqueBeraResult {
      statistic: f64::INFINITY,
      p_value: 0.0,
      skewness: 0.0,
      excess_kurtosis: f64::INFINITY,
    };
  }

  let statistic = (n / 6.0) * (s * s + 0.25 * excess_kurtosis * excess_kurtosis);
  let p_value = match ChiSquared::new(2.0) {
    Ok(chi2) => (1.0 - chi2.cdf(statistic)).clamp(0.0, 1.0),
    Err(_) => f64::NAN,
  };

  JarqueBeraResult {
    statistic,
    p_value,
    skewness: s,
    excess_kurtosis,
  }
}

/// `true` when normality is not rejected at `level` (e.g. `0.01`).
pub fn is_normal(r: ArrayView1<f64>, level: f64) -> bool {
  jarque_bera(r).p_value > level
}
