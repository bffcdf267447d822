use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Normal;
use tracing::debug;

use super::rates::ann_to_inst;
use super::rates::inst_to_ann;
use crate::error::Result;
use crate::error::RiskKitError;

/// Cox-Ingersoll-Ross (CIR) short rate with model-implied zero-coupon prices.
/// dr(t) = a(b - r(t))dt + sigma * sqrt(r(t))dW(t)
///
/// `b` and `r0` are annualized rates; the recursion runs on their
/// instantaneous equivalents and the simulated rates are reported annualized
/// again. Negative Euler updates are reflected (`|r|`).
#[derive(ImplNew, Clone, Debug)]
pub struct Cir {
  pub n_years: f64,
  pub n_scenarios: usize,
  /// Speed of mean reversion.
  pub a: f64,
  /// Long-run mean (annualized).
  pub b: f64,
  pub sigma: f64,
  pub steps_per_year: usize,
  /// Starting rate (annualized); defaults to `b`.
  pub r0: Option<f64>,
}

impl Default for Cir {
  fn default() -> Self {
    Self {
      n_years: 10.0,
      n_scenarios: 1,
      a: 0.05,
      b: 0.03,
      sigma: 0.05,
      steps_per_year: 12,
      r0: None,
    }
  }
}

/// Instantaneous short rate of every scenario at one step.
#[derive(Clone, Debug, PartialEq)]
pub struct CirState {
  pub step: usize,
  pub rates: Array1<f64>,
}

/// Simulated paths, rows are time steps and columns scenarios.
#[derive(Clone, Debug, PartialEq)]
pub struct RateSimulation {
  /// Annualized short rate.
  pub rates: Array2<f64>,
  /// Price of the zero-coupon bond maturing at the horizon.
  pub prices: Array2<f64>,
}

impl Cir {
  pub fn n_steps(&self) -> usize {
    (self.n_years * self.steps_per_year as f64) as usize + 1
  }

  pub fn dt(&self) -> f64 {
    1.0 / self.steps_per_year as f64
  }

  fn b_inst(&self) -> f64 {
    ann_to_inst(self.b)
  }

  pub fn initial_state(&self) -> CirState {
    let r0 = ann_to_inst(self.r0.unwrap_or(self.b));
    CirState {
      step: 0,
      rates: Array1::from_elem(self.n_scenarios, r0),
    }
  }

  /// One Euler step with shocks already scaled by `sqrt(dt)`.
  pub fn advance(&self, state: &CirState, shocks: ArrayView1<f64>) -> CirState {
    let dt = self.dt();
    let b = self.b_inst();
    let rates = state
      .rates
      .iter()
      .zip(shocks.iter())
      .map(|(&r, &z)| (r + self.a * (b - r) * dt + self.sigma * r.sqrt() * z).abs())
      .collect();
    CirState {
      step: state.step + 1,
      rates,
    }
  }

  /// Closed-form CIR discount bond price for instantaneous rate `r` and
  /// time to maturity `ttm` in years.
  pub fn zero_coupon_price(&self, ttm: f64, r: f64) -> f64 {
    let (a, b, sigma) = (self.a, self.b_inst(), self.sigma);

    if sigma == 0.0 {
      // Deterministic limit: exp(-b(ttm - B) - B r) with B = (1 - e^{-a ttm}) / a.
      let big_b = -(-a * ttm).exp_m1() / a;
      return (-b * (ttm - big_b) - big_b * r).exp();
    }

    let h = (a * a + 2.0 * sigma * sigma).sqrt();
    let growth = (h * ttm).exp_m1();
    let denom = 2.0 * h + (h + a) * growth;
    let big_a = ((2.0 * h * ((h + a) * ttm / 2.0).exp()) / denom).powf(2.0 * a * b / (sigma * sigma));
    let big_b = 2.0 * growth / denom;
    big_a * (-big_b * r).exp()
  }

  fn validate(&self) -> Result<()> {
    if self.steps_per_year == 0 || self.n_years < 0.0 {
      return Err(RiskKitError::invalid(
        "CIR needs a positive step frequency and a non-negative horizon",
      ));
    }
    if self.a <= 0.0 || self.sigma < 0.0 {
      return Err(RiskKitError::invalid(format!(
        "CIR needs a > 0 and sigma >= 0, got a = {}, sigma = {}",
        self.a, self.sigma
      )));
    }
    Ok(())
  }

  /// Run the recursion on pre-drawn shocks (`n_steps x n_scenarios`, row 0 unused).
  pub fn simulate(&self, shocks: ArrayView2<f64>) -> Result<RateSimulation> {
    self.validate()?;
    let n_steps = self.n_steps();
    if shocks.dim() != (n_steps, self.n_scenarios) {
      return Err(RiskKitError::shape(
        "CIR shocks",
        n_steps * self.n_scenarios,
        shocks.len(),
      ));
    }

    let dt = self.dt();
    let mut rates = Array2::zeros((n_steps, self.n_scenarios));
    let mut prices = Array2::zeros((n_steps, self.n_scenarios));

    let mut state = self.initial_state();
    for t in 0..n_steps {
      if t > 0 {
        state = self.advance(&state, shocks.row(t));
      }
      let ttm = self.n_years - t as f64 * dt;
      for (j, &r) in state.rates.iter().enumerate() {
        rates[[t, j]] = inst_to_ann(r);
        prices[[t, j]] = self.zero_coupon_price(ttm, r);
      }
    }

    Ok(RateSimulation { rates, prices })
  }

  /// Draw normal shocks from `rng` and simulate.
  pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RateSimulation> {
    self.validate()?;
    let n_steps = self.n_steps();
    debug!(n_steps, n_scenarios = self.n_scenarios, "sampling CIR");

    let dist = Normal::new(0.0, self.dt().sqrt())
      .map_err(|e| RiskKitError::Distribution(e.to_string()))?;
    let shocks = Array2::random_using((n_steps, self.n_scenarios), dist, rng);
    self.simulate(shocks.view())
  }
}
