//! # Frontier Optimizers
//!
//! $$
//! \min_{\mathbf w\in\Delta}\ \sqrt{\mathbf w^\top\Sigma\mathbf w}\quad\text{s.t.}\quad \mathbf w^\top\mu = r^\*,
//! \qquad
//! \max_{\mathbf w\in\Delta}\ \frac{\mathbf w^\top\mu - r_f}{\sqrt{\mathbf w^\top\Sigma\mathbf w}}
//! $$
//!
//! Long-only optimizers on the simplex $\Delta=\{\mathbf w\ge 0,\ \sum w_i = 1\}$.
//!
//! The simplex is reached through the map $w_i = x_i^2/\sum_j x_j^2$, which
//! keeps every candidate feasible for the bounds and the budget constraint and
//! lets Nelder-Mead work unconstrained. The target-return equality is handled
//! by an augmented-Lagrangian outer loop.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::core::State;
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use ndarray_stats::QuantileExt;
use tracing::debug;
use tracing::warn;

use super::math::quadratic_form;
use super::types::Covariance;
use super::types::ExpectedReturns;
use crate::error::Result;
use crate::error::RiskKitError;

/// Cost assigned to portfolios with no measurable risk in the Sharpe objective.
const ZERO_VOL_COST: f64 = 1e10;

/// Solver settings shared by every optimizer.
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
  /// Iteration budget of one Nelder-Mead run.
  pub max_iters: u64,
  /// Nelder-Mead stops when the standard deviation of simplex costs falls below this.
  pub sd_tolerance: f64,
  /// Largest accepted `|w·μ - target|`.
  pub constraint_tolerance: f64,
  /// Augmented-Lagrangian updates (and Nelder-Mead restarts) before giving up.
  pub max_outer_iters: usize,
  /// Starting quadratic penalty on the return constraint.
  pub initial_penalty: f64,
}

impl Default for OptimizerConfig {
  fn default() -> Self {
    Self {
      max_iters: 20_000,
      sd_tolerance: 1e-13,
      constraint_tolerance: 1e-6,
      max_outer_iters: 30,
      initial_penalty: 1e3,
    }
  }
}

fn simplex_weights(x: &[f64]) -> Array1<f64> {
  let total: f64 = x.iter().map(|v| v * v).sum();
  if total < 1e-300 {
    return Array1::from_elem(x.len(), 1.0 / x.len() as f64);
  }
  x.iter().map(|v| v * v / total).collect()
}

fn vol(w: &Array1<f64>, cov: &Covariance) -> f64 {
  quadratic_form(w.view(), cov).max(0.0).sqrt()
}

/// Rescale `x` to unit norm; the weight map is invariant to scale.
fn normalize(x: &mut [f64]) {
  let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
  if norm > 1e-150 {
    x.iter_mut().for_each(|v| *v /= norm);
  }
}

/// Simplex of `n + 1` vertices around `x0`.
fn simplex_around(x0: &[f64]) -> Vec<Vec<f64>> {
  let mut simplex = Vec::with_capacity(x0.len() + 1);
  simplex.push(x0.to_vec());
  for i in 0..x0.len() {
    let mut point = x0.to_vec();
    point[i] += 0.25 * x0[i].abs().max(0.1);
    simplex.push(point);
  }
  simplex
}

struct TargetReturnCost {
  mu: Array1<f64>,
  cov: Covariance,
  target: f64,
  lambda: f64,
  penalty: f64,
}

impl CostFunction for TargetReturnCost {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
    let w = simplex_weights(x);
    let h = w.dot(&self.mu) - self.target;
    Ok(vol(&w, &self.cov) + self.lambda * h + 0.5 * self.penalty * h * h)
  }
}

struct NegativeSharpeCost {
  mu: Array1<f64>,
  cov: Covariance,
  riskfree_rate: f64,
}

impl CostFunction for NegativeSharpeCost {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
    let w = simplex_weights(x);
    let sigma = vol(&w, &self.cov);
    if sigma < 1e-15 {
      return Ok(ZERO_VOL_COST);
    }
    Ok(-(w.dot(&self.mu) - self.riskfree_rate) / sigma)
  }
}

/// Outcome of one Nelder-Mead run.
struct Solve {
  x: Vec<f64>,
  cost: f64,
  iters: u64,
  converged: bool,
}

/// Long-only mean-variance optimizer.
#[derive(Clone, Debug, Default)]
pub struct FrontierOptimizer {
  config: OptimizerConfig,
}

impl FrontierOptimizer {
  pub fn new(config: OptimizerConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &OptimizerConfig {
    &self.config
  }

  fn run<C>(&self, cost: C, x0: &[f64]) -> Result<Solve>
  where
    C: CostFunction<Param = Vec<f64>, Output = f64>,
  {
    let solver = NelderMead::new(simplex_around(x0)).with_sd_tolerance(self.config.sd_tolerance)?;
    let max_iters = self.config.max_iters;
    let res = Executor::new(cost, solver)
      .configure(|state| state.max_iters(max_iters))
      .run()?;

    let iters = res.state.get_iter();
    let cost = res.state.get_best_cost();
    let mut x = res.state.best_param.unwrap_or_else(|| x0.to_vec());
    normalize(&mut x);
    Ok(Solve {
      x,
      cost,
      iters,
      converged: iters < max_iters,
    })
  }

  /// Minimum-volatility weights whose expected return equals `target_return`.
  ///
  /// Starts from equal weights. Returns [`RiskKitError::NonConvergence`] when
  /// the solver exhausts its budget or leaves the return constraint violated
  /// beyond `constraint_tolerance`.
  pub fn minimize_vol(
    &self,
    target_return: f64,
    er: &ExpectedReturns,
    cov: &Covariance,
  ) -> Result<Array1<f64>> {
    cov.ensure_aligned(er)?;
    let (lo, hi) = return_range(er)?;
    let tol = self.config.constraint_tolerance;
    if target_return < lo - tol || target_return > hi + tol {
      return Err(RiskKitError::invalid(format!(
        "target return {target_return} outside attainable range [{lo}, {hi}]"
      )));
    }

    let mu = er.values();
    let mut x = vec![1.0; er.len()];
    let mut lambda = 0.0;
    let mut penalty = self.config.initial_penalty;
    let mut previous = f64::INFINITY;
    let mut iterations = 0;
    let mut residual = f64::INFINITY;

    for outer in 0..self.config.max_outer_iters {
      let cost = TargetReturnCost {
        mu: mu.clone(),
        cov: cov.clone(),
        target: target_return,
        lambda,
        penalty,
      };
      let solve = self.run(cost, &x)?;
      iterations += solve.iters;
      x = solve.x;

      let w = simplex_weights(&x);
      let h = w.dot(mu) - target_return;
      residual = h.abs();

      if residual <= tol && solve.converged {
        debug!(
          target_return,
          outer, iterations, residual, "minimum-volatility portfolio found"
        );
        return Ok(w);
      }

      lambda += penalty * h;
      if residual > 0.25 * previous {
        penalty = (penalty * 10.0).min(1e12);
      }
      previous = residual;
    }

    warn!(target_return, iterations, residual, "minimize_vol did not converge");
    Err(RiskKitError::NonConvergence {
      iterations,
      residual,
    })
  }

  /// Weights along the frontier for `n_points` targets evenly spaced between
  /// the lowest and highest expected return, both included.
  ///
  /// With a single asset every target coincides and every entry is `[1.0]`.
  pub fn optimal_weights<'a>(
    &'a self,
    n_points: usize,
    er: &'a ExpectedReturns,
    cov: &'a Covariance,
  ) -> Result<FrontierWeights<'a>> {
    cov.ensure_aligned(er)?;
    let (lo, hi) = return_range(er)?;
    let targets = Array1::linspace(lo, hi, n_points).to_vec();
    Ok(FrontierWeights {
      optimizer: self,
      er,
      cov,
      targets: targets.into_iter(),
    })
  }

  /// Maximum Sharpe ratio weights for `riskfree_rate`, starting from equal weights.
  pub fn msr(
    &self,
    riskfree_rate: f64,
    er: &ExpectedReturns,
    cov: &Covariance,
  ) -> Result<Array1<f64>> {
    cov.ensure_aligned(er)?;
    if er.is_empty() {
      return Err(RiskKitError::invalid("no assets to allocate"));
    }

    let mut x = vec![1.0; er.len()];
    let mut iterations = 0;
    let mut best = f64::INFINITY;
    let mut residual = f64::INFINITY;
    for restart in 0..self.config.max_outer_iters {
      let cost = NegativeSharpeCost {
        mu: er.values().clone(),
        cov: cov.clone(),
        riskfree_rate,
      };
      let solve = self.run(cost, &x)?;
      iterations += solve.iters;
      x = solve.x;
      if solve.converged {
        debug!(riskfree_rate, restart, iterations, "maximum Sharpe portfolio found");
        return Ok(simplex_weights(&x));
      }
      residual = (best - solve.cost).abs();
      best = solve.cost;
    }

    warn!(riskfree_rate, iterations, residual, "msr did not converge");
    Err(RiskKitError::NonConvergence {
      iterations,
      residual,
    })
  }

  /// Global minimum variance weights.
  ///
  /// With identical expected returns and a zero risk-free rate, maximizing
  /// the Sharpe ratio is the same as minimizing volatility.
  pub fn gmv(&self, cov: &Covariance) -> Result<Array1<f64>> {
    let er = ExpectedReturns::uniform(cov.assets().to_vec(), 1.0);
    self.msr(0.0, &er, cov)
  }
}

fn return_range(er: &ExpectedReturns) -> Result<(f64, f64)> {
  let values = er.values();
  let lo = *values
    .min()
    .map_err(|e| RiskKitError::invalid(format!("expected returns: {e}")))?;
  let hi = *values
    .max()
    .map_err(|e| RiskKitError::invalid(format!("expected returns: {e}")))?;
  Ok((lo, hi))
}

/// Lazily solved frontier weights, one per target return.
pub struct FrontierWeights<'a> {
  optimizer: &'a FrontierOptimizer,
  er: &'a ExpectedReturns,
  cov: &'a Covariance,
  targets: std::vec::IntoIter<f64>,
}

impl Iterator for FrontierWeights<'_> {
  type Item = Result<Array1<f64>>;

  fn next(&mut self) -> Option<Self::Item> {
    let target = self.targets.next()?;
    Some(self.optimizer.minimize_vol(target, self.er, self.cov))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.targets.size_hint()
  }
}

impl ExactSizeIterator for FrontierWeights<'_> {}

/// [`FrontierOptimizer::minimize_vol`] with default settings.
pub fn minimize_vol(
  target_return: f64,
  er: &ExpectedReturns,
  cov: &Covariance,
) -> Result<Array1<f64>> {
  FrontierOptimizer::default().minimize_vol(target_return, er, cov)
}

/// Frontier weights with default settings, collected eagerly.
pub fn optimal_weights(
  n_points: usize,
  er: &ExpectedReturns,
  cov: &Covariance,
) -> Result<Vec<Array1<f64>>> {
  FrontierOptimizer::default()
    .optimal_weights(n_points, er, cov)?
    .collect()
}

/// [`FrontierOptimizer::msr`] with default settings.
pub fn msr(riskfree_rate: f64, er: &ExpectedReturns, cov: &Covariance) -> Result<Array1<f64>> {
  FrontierOptimizer::default().msr(riskfree_rate, er, cov)
}

/// [`FrontierOptimizer::gmv`] with default settings.
pub fn gmv(cov: &Covariance) -> Result<Array1<f64>> {
  FrontierOptimizer::default().gmv(cov)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;
  use tracing_test::traced_test;

  use super::*;
  use crate::portfolio::math::portfolio_return;
  use crate::portfolio::math::portfolio_vol;

  fn three_assets() -> (ExpectedReturns, Covariance) {
    let er = ExpectedReturns::from_values(array![0.06, 0.10, 0.14]);
    let cov = Covariance::from_matrix(array![
      [0.010, 0.002, 0.001],
      [0.002, 0.030, 0.006],
      [0.001, 0.006, 0.060]
    ])
    .unwrap();
    (er, cov)
  }

  fn assert_on_simplex(w: &Array1<f64>) {
    assert_abs_diff_eq!(w.sum(), 1.0, epsilon = 1e-12);
    assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
  }

  #[test]
  fn minimize_vol_hits_interior_targets() {
    let (er, cov) = three_assets();
    for target in [0.07, 0.09, 0.11, 0.13] {
      let w = minimize_vol(target, &er, &cov).unwrap();
      assert_on_simplex(&w);
      assert_abs_diff_eq!(portfolio_return(w.view(), &er).unwrap(), target, epsilon = 1e-5);
    }
  }

  #[test]
  fn minimize_vol_on_two_assets_is_pinned_by_return() {
    // With two assets the return constraint alone fixes the weights.
    let er = ExpectedReturns::from_values(array![0.05, 0.15]);
    let cov = Covariance::from_matrix(array![[0.02, 0.0], [0.0, 0.05]]).unwrap();
    let w = minimize_vol(0.12, &er, &cov).unwrap();
    assert_abs_diff_eq!(w[0], 0.3, epsilon = 1e-4);
    assert_abs_diff_eq!(w[1], 0.7, epsilon = 1e-4);
  }

  #[test]
  fn minimize_vol_beats_equal_weights_at_same_return() {
    let (er, cov) = three_assets();
    let ew = Array1::from_elem(3, 1.0 / 3.0);
    let target = portfolio_return(ew.view(), &er).unwrap();
    let w = minimize_vol(target, &er, &cov).unwrap();
    assert!(portfolio_vol(w.view(), &cov).unwrap() <= portfolio_vol(ew.view(), &cov).unwrap() + 1e-9);
  }

  #[test]
  fn unattainable_target_is_rejected() {
    let (er, cov) = three_assets();
    assert!(matches!(
      minimize_vol(0.20, &er, &cov),
      Err(RiskKitError::InvalidInput(_))
    ));
  }

  #[test]
  fn misaligned_inputs_fail_before_solving() {
    let er = ExpectedReturns::from_values(array![0.06, 0.10]);
    let (_, cov) = three_assets();
    assert!(matches!(
      minimize_vol(0.08, &er, &cov),
      Err(RiskKitError::ShapeMismatch { .. })
    ));
  }

  #[test]
  #[traced_test]
  fn exhausted_budget_is_reported_as_non_convergence() {
    let (er, cov) = three_assets();
    let optimizer = FrontierOptimizer::new(OptimizerConfig {
      max_iters: 3,
      max_outer_iters: 2,
      ..OptimizerConfig::default()
    });
    let err = optimizer.minimize_vol(0.09, &er, &cov).unwrap_err();
    assert!(matches!(err, RiskKitError::NonConvergence { .. }));
    assert!(logs_contain("minimize_vol did not converge"));
  }

  #[test]
  #[traced_test]
  fn msr_non_convergence_reports_cost_change_between_restarts() {
    let (er, cov) = three_assets();
    let optimizer = FrontierOptimizer::new(OptimizerConfig {
      max_iters: 3,
      max_outer_iters: 2,
      ..OptimizerConfig::default()
    });
    match optimizer.msr(0.02, &er, &cov) {
      Err(RiskKitError::NonConvergence {
        iterations,
        residual,
      }) => {
        assert!(iterations > 0);
        assert!(residual.is_finite());
      }
      other => panic!("expected non-convergence, got {other:?}"),
    }
    assert!(logs_contain("msr did not converge"));
  }

  #[test]
  fn cost_volatility_agrees_with_portfolio_vol() {
    let (er, cov) = three_assets();
    let x = [0.3, 1.2, -0.7];
    let w = simplex_weights(&x);
    assert_on_simplex(&w);
    assert_abs_diff_eq!(vol(&w, &cov), portfolio_vol(w.view(), &cov).unwrap(), epsilon = 1e-15);

    let cost = NegativeSharpeCost {
      mu: er.values().clone(),
      cov: cov.clone(),
      riskfree_rate: 0.02,
    };
    let sharpe = (portfolio_return(w.view(), &er).unwrap() - 0.02) / portfolio_vol(w.view(), &cov).unwrap();
    assert_abs_diff_eq!(cost.cost(&x.to_vec()).unwrap(), -sharpe, epsilon = 1e-12);
  }

  #[test]
  fn frontier_has_requested_length_and_endpoints() {
    let (er, cov) = three_assets();
    let optimizer = FrontierOptimizer::default();
    let frontier = optimizer.optimal_weights(5, &er, &cov).unwrap();
    assert_eq!(frontier.len(), 5);

    let weights: Vec<Array1<f64>> = frontier.collect::<Result<_>>().unwrap();
    let rets: Vec<f64> = weights
      .iter()
      .map(|w| portfolio_return(w.view(), &er).unwrap())
      .collect();
    for (r, target) in rets.iter().zip([0.06, 0.08, 0.10, 0.12, 0.14]) {
      assert_abs_diff_eq!(*r, target, epsilon = 1e-5);
    }
    assert_abs_diff_eq!(weights[4][2], 1.0, epsilon = 1e-3);
  }

  #[test]
  fn single_asset_frontier_degenerates_to_one_point() {
    let er = ExpectedReturns::from_values(array![0.08]);
    let cov = Covariance::from_matrix(array![[0.04]]).unwrap();
    let weights = optimal_weights(3, &er, &cov).unwrap();
    assert_eq!(weights.len(), 3);
    for w in weights {
      assert_eq!(w, array![1.0]);
    }
  }

  #[test]
  fn msr_matches_tangency_portfolio() {
    // Uncorrelated assets: w ∝ Σ⁻¹(μ - rf) = [2, 4].
    let er = ExpectedReturns::from_values(array![0.10, 0.06]);
    let cov = Covariance::from_matrix(array![[0.04, 0.0], [0.0, 0.01]]).unwrap();
    let w = msr(0.02, &er, &cov).unwrap();
    assert_on_simplex(&w);
    assert_abs_diff_eq!(w[0], 1.0 / 3.0, epsilon = 1e-4);
    assert_abs_diff_eq!(w[1], 2.0 / 3.0, epsilon = 1e-4);
  }

  #[test]
  fn gmv_is_inverse_variance_for_uncorrelated_assets() {
    let cov = Covariance::from_matrix(array![[0.04, 0.0], [0.0, 0.01]]).unwrap();
    let w = gmv(&cov).unwrap();
    assert_abs_diff_eq!(w[0], 0.2, epsilon = 1e-4);
    assert_abs_diff_eq!(w[1], 0.8, epsilon = 1e-4);
  }
}
