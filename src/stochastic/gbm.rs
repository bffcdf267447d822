use impl_new_derive::ImplNew;
use ndarray::Array2;
use ndarray::Axis;
use ndarray::s;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Normal;
use tracing::debug;

use crate::error::Result;
use crate::error::RiskKitError;

/// Geometric Brownian motion on a discrete monthly-style grid.
///
/// Gross period returns are drawn from
/// N((1 + mu)^dt, sigma * sqrt(dt)); rows are time steps, columns scenarios.
#[derive(ImplNew, Clone, Debug)]
pub struct Gbm {
  pub n_years: f64,
  pub n_scenarios: usize,
  /// Annual expected return.
  pub mu: f64,
  /// Annual volatility.
  pub sigma: f64,
  pub steps_per_year: usize,
  pub s0: f64,
  /// Return price paths when `true`, net period returns otherwise.
  pub prices: bool,
}

impl Default for Gbm {
  fn default() -> Self {
    Self {
      n_years: 10.0,
      n_scenarios: 1000,
      mu: 0.07,
      sigma: 0.15,
      steps_per_year: 12,
      s0: 100.0,
      prices: true,
    }
  }
}

impl Gbm {
  pub fn n_steps(&self) -> usize {
    (self.n_years * self.steps_per_year as f64) as usize + 1
  }

  pub fn dt(&self) -> f64 {
    1.0 / self.steps_per_year as f64
  }

  /// Sample `n_steps x n_scenarios` paths; the first row is the start value
  /// (prices) or zero (returns).
  pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Array2<f64>> {
    if self.steps_per_year == 0 || self.n_years < 0.0 {
      return Err(RiskKitError::invalid(
        "GBM needs a positive step frequency and a non-negative horizon",
      ));
    }

    let dt = self.dt();
    let n_steps = self.n_steps();
    debug!(n_steps, n_scenarios = self.n_scenarios, "sampling GBM");

    let dist = Normal::new((1.0 + self.mu).powf(dt), self.sigma * dt.sqrt())
      .map_err(|e| RiskKitError::Distribution(e.to_string()))?;
    let mut gross = Array2::random_using((n_steps, self.n_scenarios), dist, rng);
    gross.slice_mut(s![0, ..]).fill(1.0);

    if self.prices {
      gross.accumulate_axis_inplace(Axis(0), |prev, cur| *cur *= *prev);
      Ok(gross * self.s0)
    } else {
      Ok(gross - 1.0)
    }
  }
}
