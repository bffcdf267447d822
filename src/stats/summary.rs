//! # Summary Statistics
//!
//! $$
//! \text{row}_j = \big(R_{ann}, \sigma_{ann}, S, K, \mathrm{VaR}^{CF}_{5\%}, \mathrm{CVaR}^{hist}_{5\%}, SR, \min_t D_t\big)
//! $$
//!
use std::fmt::Display;

use ndarray::ArrayView1;

use super::annualize::annualize_rets;
use super::annualize::annualize_vol;
use super::annualize::sharpe_ratio;
use super::drawdown::max_drawdown;
use super::moments::kurtosis;
use super::moments::skewness;
use super::risk::cvar_historic;
use super::risk::var_gaussian;
use crate::series::Table;

/// Periods per year assumed by [`summary_stats`] (monthly data).
pub const MONTHLY: f64 = 12.0;

/// Aggregated risk/return figures for one column.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
  pub name: String,
  pub annualized_return: f64,
  pub annualized_vol: f64,
  pub skewness: f64,
  pub kurtosis: f64,
  /// Cornish-Fisher VaR at 5%.
  pub cornish_fisher_var5: f64,
  /// Historic CVaR at 5%.
  pub historic_cvar5: f64,
  pub sharpe_ratio: f64,
  pub max_drawdown: f64,
}

impl SummaryRow {
  pub fn of(name: &str, r: ArrayView1<f64>, riskfree_rate: f64) -> Self {
    Self {
      name: name.to_string(),
      annualized_return: annualize_rets(r, MONTHLY),
      annualized_vol: annualize_vol(r, MONTHLY),
      skewness: skewness(r),
      kurtosis: kurtosis(r),
      cornish_fisher_var5: var_gaussian(r, 5.0, true),
      historic_cvar5: cvar_historic(r, 5.0),
      sharpe_ratio: sharpe_ratio(r, riskfree_rate, MONTHLY),
      max_drawdown: max_drawdown(r),
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummaryStats {
  pub rows: Vec<SummaryRow>,
}

impl SummaryStats {
  pub fn get(&self, name: &str) -> Option<&SummaryRow> {
    self.rows.iter().find(|r| r.name == name)
  }
}

impl Display for SummaryStats {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(
      f,
      "{:<16} {:>10} {:>10} {:>9} {:>9} {:>10} {:>10} {:>8} {:>10}",
      "", "ann. ret", "ann. vol", "skew", "kurt", "CF VaR 5%", "CVaR 5%", "sharpe", "max dd"
    )?;
    for r in &self.rows {
      writeln!(
        f,
        "{:<16} {:>10.4} {:>10.4} {:>9.4} {:>9.4} {:>10.4} {:>10.4} {:>8.4} {:>10.4}",
        r.name,
        r.annualized_return,
        r.annualized_vol,
        r.skewness,
        r.kurtosis,
        r.cornish_fisher_var5,
        r.historic_cvar5,
        r.sharpe_ratio,
        r.max_drawdown
      )?;
    }
    Ok(())
  }
}

/// Summary figures for every column of a monthly return table.
pub fn summary_stats(r: &Table, riskfree_rate: f64) -> SummaryStats {
  let rows = r
    .columns()
    .iter()
    .zip(r.values().columns())
    .map(|(name, col)| SummaryRow::of(name, col, riskfree_rate))
    .collect();
  SummaryStats { rows }
}
