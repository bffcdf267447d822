//! # Moments
//!
//! $$
//! S = \frac{\mathbb E[(R-\mathbb E R)^3]}{\sigma_R^3},\qquad
//! K = \frac{\mathbb E[(R-\mathbb E R)^4]}{\sigma_R^4}
//! $$
//!
//! Sample moments of a return series. Empty input yields `NaN`, as with the
//! usual dataframe reductions.

use ndarray::ArrayView1;

pub fn mean(r: ArrayView1<f64>) -> f64 {
  r.mean().unwrap_or(f64::NAN)
}

fn central_moment(r: ArrayView1<f64>, k: i32) -> f64 {
  let m = mean(r);
  r.iter().map(|x| (x - m).powi(k)).sum::<f64>() / r.len() as f64
}

/// Standard deviation with `ddof` degrees of freedom removed.
pub fn std_dev(r: ArrayView1<f64>, ddof: usize) -> f64 {
  if r.len() <= ddof {
    return f64::NAN;
  }
  let m = mean(r);
  let ss = r.iter().map(|x| (x - m).powi(2)).sum::<f64>();
  (ss / (r.len() - ddof) as f64).sqrt()
}

/// Population standard deviation of the strictly negative observations.
pub fn semideviation(r: ArrayView1<f64>) -> f64 {
  let negative: Vec<f64> = r.iter().copied().filter(|x| *x < 0.0).collect();
  std_dev(ArrayView1::from(&negative[..]), 0)
}

/// Skewness using the population standard deviation.
pub fn skewness(r: ArrayView1<f64>) -> f64 {
  central_moment(r, 3) / std_dev(r, 0).powi(3)
}

/// Raw (non-excess) kurtosis; a normal sample sits near 3.
pub fn kurtosis(r: ArrayView1<f64>) -> f64 {
  central_moment(r, 4) / std_dev(r, 0).powi(4)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn std_dev_respects_ddof() {
    let r = array![1.0, 2.0, 3.0, 4.0];
    assert_abs_diff_eq!(std_dev(r.view(), 0), 1.25f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(std_dev(r.view(), 1), (5.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    assert!(std_dev(array![1.0].view(), 1).is_nan());
  }

  #[test]
  fn symmetric_sample_has_zero_skew() {
    let r = array![-0.02, -0.01, 0.0, 0.01, 0.02];
    assert_abs_diff_eq!(skewness(r.view()), 0.0, epsilon = 1e-12);
  }

  #[test]
  fn right_tail_gives_positive_skew() {
    let r = array![-0.01, -0.01, -0.01, -0.01, 0.10];
    assert!(skewness(r.view()) > 1.0);
  }

  #[test]
  fn two_point_sample_has_unit_kurtosis() {
    // Symmetric two-point distribution: E[d^4] = sigma^4.
    let r = array![-1.0, 1.0, -1.0, 1.0];
    assert_abs_diff_eq!(kurtosis(r.view()), 1.0, epsilon = 1e-12);
  }

  #[test]
  fn semideviation_ignores_gains() {
    let r = array![0.05, -0.02, 0.07, -0.04, 0.0];
    assert_abs_diff_eq!(semideviation(r.view()), 0.01, epsilon = 1e-12);
  }
}
