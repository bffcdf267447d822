//! # Drawdown
//!
//! $$
//! W_t = 1000\prod_{s\le t}(1+r_s),\quad P_t=\max_{s\le t}W_s,\quad D_t=\frac{W_t-P_t}{P_t}
//! $$
//!

use ndarray::Array1;
use ndarray::ArrayView1;

/// Starting wealth of the drawdown wealth index.
pub const WEALTH_START: f64 = 1000.0;

/// Wealth index, running peaks and drawdown of a return series.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawdown {
  pub wealth: Array1<f64>,
  pub peaks: Array1<f64>,
  pub drawdown: Array1<f64>,
}

impl Drawdown {
  /// Deepest drawdown (most negative value), `0.0` for an empty series.
  pub fn max_drawdown(&self) -> f64 {
    self.drawdown.iter().copied().fold(0.0, f64::min)
  }
}

pub fn drawdown(r: ArrayView1<f64>) -> Drawdown {
  let mut wealth = Array1::zeros(r.len());
  let mut peaks = Array1::zeros(r.len());
  let mut drawdown = Array1::zeros(r.len());

  let mut w = WEALTH_START;
  let mut peak = f64::NEG_INFINITY;
  for (t, ret) in r.iter().enumerate() {
    w *= 1.0 + ret;
    peak = peak.max(w);
    wealth[t] = w;
    peaks[t] = peak;
    drawdown[t] = (w - peak) / peak;
  }

  Drawdown {
    wealth,
    peaks,
    drawdown,
  }
}

pub fn max_drawdown(r: ArrayView1<f64>) -> f64 {
  drawdown(r).max_drawdown()
}
