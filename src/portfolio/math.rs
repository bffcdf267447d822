//! # Portfolio Math
//!
//! $$
//! \mu_p = \mathbf w^\top\mu,\qquad \sigma_p = \sqrt{\mathbf w^\top\Sigma\mathbf w}
//! $$
//!
//! Weights are column vectors throughout.

use ndarray::Array1;
use ndarray::ArrayView1;

use super::types::Covariance;
use super::types::ExpectedReturns;
use super::types::FrontierPoint;
use crate::error::Result;
use crate::error::RiskKitError;

pub fn portfolio_return(weights: ArrayView1<f64>, er: &ExpectedReturns) -> Result<f64> {
  if weights.len() != er.len() {
    return Err(RiskKitError::shape("weights vs expected returns", er.len(), weights.len()));
  }
  Ok(weights.dot(er.values()))
}

pub fn portfolio_vol(weights: ArrayView1<f64>, cov: &Covariance) -> Result<f64> {
  if weights.len() != cov.dim() {
    return Err(RiskKitError::shape("weights vs covariance", cov.dim(), weights.len()));
  }
  Ok(quadratic_form(weights, cov).max(0.0).sqrt())
}

pub(crate) fn quadratic_form(weights: ArrayView1<f64>, cov: &Covariance) -> f64 {
  weights.dot(&cov.matrix().dot(&weights))
}

/// Frontier of a two-asset universe traced by `(w, 1 - w)`, `w` evenly in `[0, 1]`.
pub fn two_asset_frontier(
  n_points: usize,
  er: &ExpectedReturns,
  cov: &Covariance,
) -> Result<Vec<FrontierPoint>> {
  if er.len() != 2 {
    return Err(RiskKitError::shape("two-asset frontier expected returns", 2, er.len()));
  }
  cov.ensure_aligned(er)?;

  Array1::linspace(0.0, 1.0, n_points)
    .iter()
    .map(|&w| FrontierPoint::evaluate(ndarray::array![w, 1.0 - w], er, cov))
    .collect()
}
