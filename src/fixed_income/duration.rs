use tracing::warn;

use super::cashflows::CashFlows;
use crate::error::Result;
use crate::error::RiskKitError;

/// Present-value weighted average time of the flows, in the flows' time unit.
pub fn macaulay_duration(flows: &CashFlows, discount_rate: f64) -> Result<f64> {
  let discounted = flows.discounted(discount_rate);
  let price = discounted.sum();
  if price == 0.0 || !price.is_finite() {
    return Err(RiskKitError::Degenerate(format!(
      "cash flows have present value {price}"
    )));
  }
  let weighted = flows
    .times()
    .iter()
    .zip(discounted.iter())
    .map(|(t, d)| t * d)
    .sum::<f64>();
  Ok(weighted / price)
}

/// Weight in `short` that, with the remainder in `long`, matches the
/// duration of `target`:
///
/// $$
/// w_s = \frac{D_l - D_t}{D_l - D_s}
/// $$
pub fn match_durations(
  target: &CashFlows,
  short: &CashFlows,
  long: &CashFlows,
  discount_rate: f64,
) -> Result<f64> {
  let d_t = macaulay_duration(target, discount_rate)?;
  let d_s = macaulay_duration(short, discount_rate)?;
  let d_l = macaulay_duration(long, discount_rate)?;
  if d_l == d_s {
    warn!(duration = d_s, "short and long durations coincide");
    return Err(RiskKitError::Degenerate(format!(
      "short and long instruments share duration {d_s}"
    )));
  }
  Ok((d_l - d_t) / (d_l - d_s))
}
