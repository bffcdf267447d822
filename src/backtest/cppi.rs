//! # CPPI
//!
//! $$
//! c_t = \frac{A_t - F_t}{A_t},\quad w_t = \min(\max(m\,c_t, 0), 1),\quad
//! A_{t+1} = A_t w_t (1 + r^{risky}_t) + A_t (1 - w_t)(1 + r^{safe}_t)
//! $$
//!
//! Constant Proportion Portfolio Insurance backtest. Every column of the risky
//! table is simulated independently with the same parameters.

use ndarray::Array2;
use ndarray::Axis;
use tracing::debug;
use tracing::warn;

use crate::error::Result;
use crate::error::RiskKitError;
use crate::series::Returns;
use crate::series::Table;

/// Column name given to a single risky series.
pub const SERIES_COLUMN: &str = "R";

#[derive(Clone, Debug)]
pub struct CppiConfig {
  /// Cushion multiplier `m`.
  pub multiplier: f64,
  /// Starting account value.
  pub start: f64,
  /// Protected floor as a fraction of `start`.
  pub floor: f64,
  /// Annual rate used for the safe asset when no safe returns are supplied.
  pub riskfree_rate: f64,
  /// Maximum drawdown; when set the floor trails the running peak.
  pub drawdown: Option<f64>,
}

impl Default for CppiConfig {
  fn default() -> Self {
    Self {
      multiplier: 3.0,
      start: 1000.0,
      floor: 0.8,
      riskfree_rate: 0.03,
      drawdown: None,
    }
  }
}

/// Per-column state carried between periods.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CppiState {
  pub account: f64,
  pub peak: f64,
  pub floor: f64,
}

/// What one period records into the history tables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CppiStep {
  /// Account value at the end of the period.
  pub account: f64,
  pub cushion: f64,
  pub risky_weight: f64,
}

impl CppiConfig {
  pub fn initial_state(&self) -> CppiState {
    CppiState {
      account: self.start,
      peak: self.start,
      floor: self.start * self.floor,
    }
  }

  /// Advance one period given the risky and safe returns of that period.
  ///
  /// Fails with [`RiskKitError::Degenerate`] when the account entering the
  /// period is not positive, as the cushion is then undefined.
  pub fn step(&self, state: CppiState, risky: f64, safe: f64) -> Result<(CppiState, CppiStep)> {
    if state.account <= 0.0 {
      return Err(RiskKitError::Degenerate(format!(
        "CPPI account value {} is not positive",
        state.account
      )));
    }

    let (peak, floor) = match self.drawdown {
      Some(dd) => {
        let peak = state.peak.max(state.account);
        (peak, peak * (1.0 - dd))
      }
      None => (state.peak, state.floor),
    };

    let cushion = (state.account - floor) / state.account;
    let risky_weight = (self.multiplier * cushion).clamp(0.0, 1.0);
    let risky_alloc = state.account * risky_weight;
    let safe_alloc = state.account * (1.0 - risky_weight);
    let account = risky_alloc * (1.0 + risky) + safe_alloc * (1.0 + safe);

    Ok((
      CppiState {
        account,
        peak,
        floor,
      },
      CppiStep {
        account,
        cushion,
        risky_weight,
      },
    ))
  }

  fn validate(&self) -> Result<()> {
    if !(self.start > 0.0) {
      return Err(RiskKitError::invalid(format!(
        "CPPI start value must be positive, got {}",
        self.start
      )));
    }
    if let Some(dd) = self.drawdown {
      if !(0.0..1.0).contains(&dd) {
        return Err(RiskKitError::invalid(format!(
          "CPPI drawdown limit must lie in [0, 1), got {dd}"
        )));
      }
    }
    Ok(())
  }
}

/// Histories and inputs of one CPPI run; all tables share the risky index and columns.
#[derive(Clone, Debug)]
pub struct CppiBacktest {
  /// Account value after each period.
  pub wealth: Table,
  /// Buy-and-hold value of the risky asset alone.
  pub risky_wealth: Table,
  /// Cushion entering each period.
  pub risk_budget: Table,
  /// Risky weight held during each period.
  pub risky_allocation: Table,
  pub multiplier: f64,
  pub start: f64,
  pub floor: f64,
  pub risky_returns: Table,
  pub safe_returns: Table,
}

/// Run a CPPI backtest over `risky` returns.
///
/// Without `safe` returns the safe asset earns `riskfree_rate / 12` every
/// period (monthly data).
pub fn run_cppi<'a>(
  risky: impl Into<Returns<'a>>,
  safe: Option<&Table>,
  config: &CppiConfig,
) -> Result<CppiBacktest> {
  config.validate()?;

  let risky = match risky.into() {
    Returns::Series(s) => {
      let mut s = s.clone();
      s.name = SERIES_COLUMN.to_string();
      s.to_table()
    }
    Returns::Table(t) => t.clone(),
  };

  let safe = match safe {
    Some(t) => {
      if t.values().dim() != risky.values().dim() {
        return Err(RiskKitError::shape(
          "safe returns cells",
          risky.values().len(),
          t.values().len(),
        ));
      }
      t.clone()
    }
    None => Table::like(
      &risky,
      Array2::from_elem(risky.values().dim(), config.riskfree_rate / 12.0),
    )?,
  };

  let (n_steps, n_cols) = risky.values().dim();
  debug!(n_steps, n_cols, multiplier = config.multiplier, "running CPPI backtest");

  let mut wealth = Array2::zeros((n_steps, n_cols));
  let mut cushion = Array2::zeros((n_steps, n_cols));
  let mut weight = Array2::zeros((n_steps, n_cols));

  for j in 0..n_cols {
    let mut state = config.initial_state();
    for t in 0..n_steps {
      let (next, step) = config
        .step(state, risky.values()[[t, j]], safe.values()[[t, j]])
        .inspect_err(|_| {
          warn!(
            column = %risky.columns()[j],
            step = t,
            "CPPI account exhausted"
          )
        })?;
      wealth[[t, j]] = step.account;
      cushion[[t, j]] = step.cushion;
      weight[[t, j]] = step.risky_weight;
      state = next;
    }
  }

  let mut risky_wealth = risky.values().mapv(|r| 1.0 + r);
  risky_wealth.accumulate_axis_inplace(Axis(0), |prev, cur| *cur *= *prev);
  risky_wealth *= config.start;

  Ok(CppiBacktest {
    wealth: Table::like(&risky, wealth)?,
    risky_wealth: Table::like(&risky, risky_wealth)?,
    risk_budget: Table::like(&risky, cushion)?,
    risky_allocation: Table::like(&risky, weight)?,
    multiplier: config.multiplier,
    start: config.start,
    floor: config.floor,
    risky_returns: risky,
    safe_returns: safe,
  })
}
