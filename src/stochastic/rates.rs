//! # Rate Conventions
//!
//! $$
//! r_{inst} = \ln(1 + r_{ann}),\qquad r_{ann} = e^{r_{inst}} - 1
//! $$
//!

/// Annually compounded rate to continuously compounded (instantaneous) rate.
pub fn ann_to_inst(r: f64) -> f64 {
  r.ln_1p()
}

/// Continuously compounded (instantaneous) rate to annually compounded rate.
pub fn inst_to_ann(r: f64) -> f64 {
  r.exp_m1()
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn conversions_are_inverse() {
    for r in [-0.02, 0.0, 0.03, 0.25] {
      assert_abs_diff_eq!(inst_to_ann(ann_to_inst(r)), r, epsilon = 1e-15);
    }
  }

  #[test]
  fn instantaneous_rate_is_lower_for_positive_rates() {
    assert!(ann_to_inst(0.05) < 0.05);
    assert_abs_diff_eq!(ann_to_inst(0.05), 1.05f64.ln(), epsilon = 1e-15);
  }
}
