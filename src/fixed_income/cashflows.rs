use ndarray::Array1;
use ndarray::ArrayView1;

use crate::error::Result;
use crate::error::RiskKitError;

/// Ordered `(time, amount)` pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct CashFlows {
  times: Array1<f64>,
  amounts: Array1<f64>,
}

impl CashFlows {
  pub fn new(times: Array1<f64>, amounts: Array1<f64>) -> Result<Self> {
    if times.len() != amounts.len() {
      return Err(RiskKitError::shape("cash flow amounts", times.len(), amounts.len()));
    }
    if times.is_empty() {
      return Err(RiskKitError::invalid("no cash flows provided"));
    }
    if times.windows(2).into_iter().any(|w| w[1] <= w[0]) {
      return Err(RiskKitError::invalid("cash flow times must be strictly increasing"));
    }
    Ok(Self { times, amounts })
  }

  /// One payment of `amount` at time `t`.
  pub fn single(t: f64, amount: f64) -> Self {
    Self {
      times: Array1::from_elem(1, t),
      amounts: Array1::from_elem(1, amount),
    }
  }

  pub fn times(&self) -> ArrayView1<'_, f64> {
    self.times.view()
  }

  pub fn amounts(&self) -> ArrayView1<'_, f64> {
    self.amounts.view()
  }

  pub fn len(&self) -> usize {
    self.times.len()
  }

  pub fn is_empty(&self) -> bool {
    self.times.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
    self.times.iter().copied().zip(self.amounts.iter().copied())
  }

  /// Present value of each flow at rate `r`.
  pub fn discounted(&self, r: f64) -> Array1<f64> {
    self.iter().map(|(t, cf)| discount(t, r) * cf).collect()
  }
}

/// Price of a pure discount bond paying 1 at time `t`.
pub fn discount(t: f64, r: f64) -> f64 {
  (1.0 + r).powf(-t)
}

/// Present value of a sequence of cash flows.
pub fn pv(flows: &CashFlows, r: f64) -> f64 {
  flows.discounted(r).sum()
}

/// `pv(assets) / pv(liabilities)`.
pub fn funding_ratio(assets: &CashFlows, liabilities: &CashFlows, r: f64) -> Result<f64> {
  let liab = pv(liabilities, r);
  if liab == 0.0 {
    return Err(RiskKitError::Degenerate(
      "liabilities have zero present value".to_string(),
    ));
  }
  Ok(pv(assets, r) / liab)
}
