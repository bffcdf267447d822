//! # Portfolio Types
//!
//! $$
//! \mu\in\mathbb R^n,\qquad \Sigma\in\mathbb R^{n\times n},\ \Sigma=\Sigma^\top\succeq 0
//! $$
//!
//! Expected-return vectors and covariance matrices labelled by asset, and the
//! `(weights, return, volatility)` triple used for frontier tables.

use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use super::math::portfolio_return;
use super::math::portfolio_vol;
use crate::error::Result;
use crate::error::RiskKitError;
use crate::stats::annualize::annualize_rets;
use crate::series::Table;

const SYMMETRY_TOLERANCE: f64 = 1e-10;

fn positions(assets: &[String], names: &[&str]) -> Result<Vec<usize>> {
  names
    .iter()
    .map(|name| {
      assets
        .iter()
        .position(|a| a == name)
        .ok_or_else(|| RiskKitError::invalid(format!("unknown asset '{name}'")))
    })
    .collect()
}

/// Expected per-period return of each asset.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpectedReturns {
  assets: Vec<String>,
  values: Array1<f64>,
}

impl ExpectedReturns {
  pub fn new(assets: Vec<String>, values: Array1<f64>) -> Result<Self> {
    if assets.len() != values.len() {
      return Err(RiskKitError::shape(
        "expected returns",
        assets.len(),
        values.len(),
      ));
    }
    Ok(Self { assets, values })
  }

  /// Unlabelled vector; assets are named `asset_0`, `asset_1`, ...
  pub fn from_values(values: Array1<f64>) -> Self {
    let assets = (0..values.len()).map(|i| format!("asset_{i}")).collect();
    Self { assets, values }
  }

  /// Annualized compounded return of every column of `table`.
  pub fn annualized(table: &Table, periods_per_year: f64) -> Self {
    let values = table
      .values()
      .columns()
      .into_iter()
      .map(|c| annualize_rets(c, periods_per_year))
      .collect();
    Self {
      assets: table.columns().to_vec(),
      values,
    }
  }

  /// Same value for every asset.
  pub fn uniform(assets: Vec<String>, value: f64) -> Self {
    let values = Array1::from_elem(assets.len(), value);
    Self { assets, values }
  }

  pub fn assets(&self) -> &[String] {
    &self.assets
  }

  pub fn values(&self) -> &Array1<f64> {
    &self.values
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn select(&self, names: &[&str]) -> Result<Self> {
    let idx = positions(&self.assets, names)?;
    Ok(Self {
      assets: names.iter().map(|s| s.to_string()).collect(),
      values: self.values.select(Axis(0), &idx),
    })
  }
}

/// Symmetric covariance matrix labelled by asset.
#[derive(Clone, Debug, PartialEq)]
pub struct Covariance {
  assets: Vec<String>,
  matrix: Array2<f64>,
}

impl Covariance {
  pub fn new(assets: Vec<String>, matrix: Array2<f64>) -> Result<Self> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
      return Err(RiskKitError::shape("covariance columns", rows, cols));
    }
    if assets.len() != rows {
      return Err(RiskKitError::shape("covariance rows", assets.len(), rows));
    }
    for i in 0..rows {
      for j in (i + 1)..cols {
        let (a, b) = (matrix[[i, j]], matrix[[j, i]]);
        if (a - b).abs() > SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0) {
          return Err(RiskKitError::invalid(format!(
            "covariance is not symmetric at ({}, {})",
            assets[i], assets[j]
          )));
        }
      }
    }
    Ok(Self { assets, matrix })
  }

  /// Unlabelled matrix; assets are named `asset_0`, `asset_1`, ...
  pub fn from_matrix(matrix: Array2<f64>) -> Result<Self> {
    let assets = (0..matrix.nrows()).map(|i| format!("asset_{i}")).collect();
    Self::new(assets, matrix)
  }

  /// Sample covariance (ddof 1) of the columns of `table`.
  pub fn sample(table: &Table) -> Result<Self> {
    let x = table.values();
    let n = x.nrows();
    if n < 2 {
      return Err(RiskKitError::invalid(
        "sample covariance needs at least two rows",
      ));
    }
    let means = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(x.ncols()));
    let centered = x - &means.insert_axis(Axis(0));
    let matrix = centered.t().dot(&centered) / (n - 1) as f64;
    Self::new(table.columns().to_vec(), matrix)
  }

  pub fn assets(&self) -> &[String] {
    &self.assets
  }

  pub fn matrix(&self) -> &Array2<f64> {
    &self.matrix
  }

  pub fn dim(&self) -> usize {
    self.matrix.nrows()
  }

  pub fn select(&self, names: &[&str]) -> Result<Self> {
    let idx = positions(&self.assets, names)?;
    Ok(Self {
      assets: names.iter().map(|s| s.to_string()).collect(),
      matrix: self.matrix.select(Axis(0), &idx).select(Axis(1), &idx),
    })
  }

  /// Check that `er` describes the same assets, in the same order.
  pub fn ensure_aligned(&self, er: &ExpectedReturns) -> Result<()> {
    if er.len() != self.dim() {
      return Err(RiskKitError::shape(
        "covariance dimension vs expected returns",
        er.len(),
        self.dim(),
      ));
    }
    if let Some((a, b)) = er
      .assets()
      .iter()
      .zip(self.assets.iter())
      .find(|(a, b)| a != b)
    {
      return Err(RiskKitError::invalid(format!(
        "asset order differs between expected returns ('{a}') and covariance ('{b}')"
      )));
    }
    Ok(())
  }
}

/// A portfolio and its model return and volatility.
#[derive(Clone, Debug, PartialEq)]
pub struct FrontierPoint {
  pub weights: Array1<f64>,
  pub ret: f64,
  pub vol: f64,
}

impl FrontierPoint {
  pub fn evaluate(weights: Array1<f64>, er: &ExpectedReturns, cov: &Covariance) -> Result<Self> {
    let ret = portfolio_return(weights.view(), er)?;
    let vol = portfolio_vol(weights.view(), cov)?;
    Ok(Self { weights, ret, vol })
  }

  /// `(ret - riskfree_rate) / vol`.
  pub fn sharpe(&self, riskfree_rate: f64) -> f64 {
    (self.ret - riskfree_rate) / self.vol
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;
  use crate::series::Period;

  fn names(n: &[&str]) -> Vec<String> {
    n.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn expected_returns_length_must_match_assets() {
    let err = ExpectedReturns::new(names(&["a", "b"]), array![0.1]).unwrap_err();
    assert!(matches!(err, RiskKitError::ShapeMismatch { .. }));
  }

  #[test]
  fn covariance_must_be_square_and_symmetric() {
    assert!(Covariance::from_matrix(array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).is_err());
    assert!(Covariance::from_matrix(array![[1.0, 0.2], [0.3, 1.0]]).is_err());
    assert!(Covariance::from_matrix(array![[1.0, 0.2], [0.2, 1.0]]).is_ok());
  }

  #[test]
  fn misaligned_inputs_are_rejected() {
    let er = ExpectedReturns::new(names(&["a", "b"]), array![0.1, 0.2]).unwrap();
    let cov = Covariance::new(names(&["b", "a"]), array![[1.0, 0.0], [0.0, 1.0]]).unwrap();
    assert!(cov.ensure_aligned(&er).is_err());
    let cov3 = Covariance::from_matrix(Array2::eye(3)).unwrap();
    assert!(matches!(
      cov3.ensure_aligned(&er),
      Err(RiskKitError::ShapeMismatch { .. })
    ));
  }

  #[test]
  fn sample_covariance_uses_ddof_one() {
    let t = Table::new(
      names(&["x", "y"]),
      Period::new(2000, 1).unwrap(),
      array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]],
    )
    .unwrap();
    let cov = Covariance::sample(&t).unwrap();
    assert_abs_diff_eq!(cov.matrix()[[0, 0]], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cov.matrix()[[0, 1]], 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cov.matrix()[[1, 1]], 4.0, epsilon = 1e-12);
  }

  #[test]
  fn select_reorders_consistently() {
    let er = ExpectedReturns::new(names(&["a", "b", "c"]), array![0.1, 0.2, 0.3]).unwrap();
    let cov = Covariance::new(
      names(&["a", "b", "c"]),
      array![[1.0, 0.1, 0.2], [0.1, 2.0, 0.3], [0.2, 0.3, 3.0]],
    )
    .unwrap();
    let er2 = er.select(&["c", "a"]).unwrap();
    let cov2 = cov.select(&["c", "a"]).unwrap();
    assert_eq!(er2.values(), &array![0.3, 0.1]);
    assert_eq!(cov2.matrix(), &array![[3.0, 0.2], [0.2, 1.0]]);
    assert!(cov2.ensure_aligned(&er2).is_ok());
  }
}
