//! # Errors
//!
//! $$
//! f:\text{inputs}\to\text{Result}\langle\text{value},\ \text{RiskKitError}\rangle
//! $$
//!
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RiskKitError>;

/// Every failure surfaced by the library.
#[derive(Debug, Error)]
pub enum RiskKitError {
  /// Two inputs that must agree in size do not.
  #[error("shape mismatch in {what}: expected {expected}, found {found}")]
  ShapeMismatch {
    what: String,
    expected: usize,
    found: usize,
  },

  /// A parameter is out of its domain.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// The optimizer stopped without meeting its termination criterion
  /// or without satisfying the equality constraint.
  ///
  /// `residual` is `|w·μ - target|` for target-return solves and the change
  /// in best cost over the last restart for the Sharpe solve.
  #[error("optimizer did not converge after {iterations} iterations (residual {residual:e})")]
  NonConvergence { iterations: u64, residual: f64 },

  /// The formula is undefined for the supplied values.
  #[error("degenerate input: {0}")]
  Degenerate(String),

  /// Error raised from inside the argmin executor.
  #[error("solver error: {0}")]
  Solver(#[from] anyhow::Error),

  #[error("invalid distribution parameters: {0}")]
  Distribution(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Csv(#[from] csv::Error),
}

impl RiskKitError {
  pub(crate) fn shape(what: impl Into<String>, expected: usize, found: usize) -> Self {
    Self::ShapeMismatch {
      what: what.into(),
      expected,
      found,
    }
  }

  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidInput(msg.into())
  }
}
