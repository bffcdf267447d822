//! # Annualization
//!
//! $$
//! R_{ann} = \Big(\prod_{t=1}^{n}(1+r_t)\Big)^{p/n} - 1,\qquad
//! \sigma_{ann} = \sigma\sqrt{p}
//! $$
//!
use ndarray::ArrayView1;

use super::moments::std_dev;

/// Compounded growth scaled to `periods_per_year`.
pub fn annualize_rets(r: ArrayView1<f64>, periods_per_year: f64) -> f64 {
  let growth: f64 = r.iter().map(|x| 1.0 + x).product();
  growth.powf(periods_per_year / r.len() as f64) - 1.0
}

/// Sample volatility (ddof 1) scaled by the square root of time.
pub fn annualize_vol(r: ArrayView1<f64>, periods_per_year: f64) -> f64 {
  std_dev(r, 1) * periods_per_year.sqrt()
}

/// Annualized excess return over annualized volatility.
pub fn sharpe_ratio(r: ArrayView1<f64>, riskfree_rate: f64, periods_per_year: f64) -> f64 {
  let rf_per_period = (1.0 + riskfree_rate).powf(1.0 / periods_per_year) - 1.0;
  let excess = r.mapv(|x| x - rf_per_period);
  annualize_rets(excess.view(), periods_per_year) / annualize_vol(r, periods_per_year)
}
