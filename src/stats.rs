//! # Stats
//!
//! $$
//! \mathcal S : \{r_t\}_{t=1}^n \mapsto \mathbb R
//! $$
//!
//! Risk statistics over return series. The submodules work on a single
//! `ArrayView1<f64>`; the functions re-exported here accept a
//! [`Series`](crate::series::Series) or a [`Table`](crate::series::Table)
//! and apply the single-series statistic to every column of a table.
//!
//! | Function            | Result                                              |
//! |---------------------|-----------------------------------------------------|
//! | [`semideviation`]   | std of negative returns                             |
//! | [`skewness`]        | third standardized moment                           |
//! | [`kurtosis`]        | fourth standardized moment (raw)                    |
//! | [`is_normal`]       | Jarque-Bera verdict                                 |
//! | [`var_historic`]    | empirical VaR                                       |
//! | [`cvar_historic`]   | empirical expected shortfall                        |
//! | [`var_gaussian`]    | parametric / Cornish-Fisher VaR                     |
//! | [`annualize_rets`]  | compounded annual return                            |
//! | [`annualize_vol`]   | annual volatility                                   |
//! | [`sharpe_ratio`]    | annual Sharpe ratio                                 |
//! | [`max_drawdown`]    | deepest drawdown                                    |

pub mod annualize;
pub mod drawdown;
pub mod moments;
pub mod normality;
pub mod risk;
pub mod summary;

pub use drawdown::Drawdown;
pub use summary::summary_stats;
pub use summary::SummaryRow;
pub use summary::SummaryStats;

use crate::series::Returns;
use crate::series::Series;
use crate::series::Statistic;

/// Wealth index, peaks and drawdown of a single series.
pub fn drawdown(r: &Series) -> Drawdown {
  drawdown::drawdown(r.values.view())
}

pub fn max_drawdown<'a>(r: impl Into<Returns<'a>>) -> Statistic {
  r.into().aggregate(drawdown::max_drawdown)
}

pub fn semideviation<'a>(r: impl Into<Returns<'a>>) -> Statistic {
  r.into().aggregate(moments::semideviation)
}

pub fn skewness<'a>(r: impl Into<Returns<'a>>) -> Statistic {
  r.into().aggregate(moments::skewness)
}

pub fn kurtosis<'a>(r: impl Into<Returns<'a>>) -> Statistic {
  r.into().aggregate(moments::kurtosis)
}

/// Jarque-Bera test at `level`; `true` where normality is accepted.
pub fn is_normal<'a>(r: impl Into<Returns<'a>>, level: f64) -> Statistic<bool> {
  r.into().aggregate(|c| normality::is_normal(c, level))
}

/// Historic VaR, `level` in percent.
pub fn var_historic<'a>(r: impl Into<Returns<'a>>, level: f64) -> Statistic {
  r.into().aggregate(|c| risk::var_historic(c, level))
}

/// Historic CVaR, `level` in percent.
pub fn cvar_historic<'a>(r: impl Into<Returns<'a>>, level: f64) -> Statistic {
  r.into().aggregate(|c| risk::cvar_historic(c, level))
}

/// Gaussian VaR, Cornish-Fisher adjusted when `modified` is set.
pub fn var_gaussian<'a>(r: impl Into<Returns<'a>>, level: f64, modified: bool) -> Statistic {
  r.into().aggregate(|c| risk::var_gaussian(c, level, modified))
}

pub fn annualize_rets<'a>(r: impl Into<Returns<'a>>, periods_per_year: f64) -> Statistic {
  r.into().aggregate(|c| annualize::annualize_rets(c, periods_per_year))
}

pub fn annualize_vol<'a>(r: impl Into<Returns<'a>>, periods_per_year: f64) -> Statistic {
  r.into().aggregate(|c| annualize::annualize_vol(c, periods_per_year))
}

pub fn sharpe_ratio<'a>(
  r: impl Into<Returns<'a>>,
  riskfree_rate: f64,
  periods_per_year: f64,
) -> Statistic {
  r.into().aggregate(|c| annualize::sharpe_ratio(c, riskfree_rate, periods_per_year))
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;
  use crate::error::RiskKitError;
  use crate::series::Period;
  use crate::series::Shape;
  use crate::series::Table;

  fn table() -> Table {
    Table::new(
      vec!["small_cap".into(), "large_cap".into()],
      Period::new(1990, 1).unwrap(),
      array![
        [0.04, 0.01],
        [-0.06, -0.02],
        [0.05, 0.015],
        [-0.03, 0.0],
        [0.02, 0.01]
      ],
    )
    .unwrap()
  }

  #[test]
  fn table_statistics_are_per_column() {
    let t = table();
    let sd = semideviation(&t);
    assert_eq!(sd.shape(), Shape::Table);
    assert_abs_diff_eq!(*sd.get("small_cap").unwrap(), 0.015, epsilon = 1e-12);
    assert!(sd.get("missing").is_none());
  }

  #[test]
  fn series_statistics_match_table_column() {
    let t = table();
    let s = t.series("large_cap").unwrap();
    let from_series = var_gaussian(&s, 5.0, true).scalar().unwrap();
    let from_table = *var_gaussian(&t, 5.0, true).get("large_cap").unwrap();
    assert_abs_diff_eq!(from_series, from_table, epsilon = 1e-15);
  }

  #[test]
  fn asking_scalar_of_table_statistic_fails() {
    let t = table();
    assert!(matches!(
      skewness(&t).scalar(),
      Err(RiskKitError::ShapeMismatch { .. })
    ));
    assert!(matches!(
      kurtosis(&t.series("small_cap").unwrap()).per_column(),
      Err(RiskKitError::ShapeMismatch { .. })
    ));
  }

  #[test]
  fn is_normal_yields_verdict_per_column() {
    let verdicts = is_normal(&table(), 0.01).per_column().unwrap();
    assert_eq!(verdicts.len(), 2);
  }
}
