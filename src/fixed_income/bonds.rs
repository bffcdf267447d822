use ndarray::Array1;

use super::cashflows::pv;
use super::cashflows::CashFlows;
use crate::error::Result;
use crate::error::RiskKitError;

/// Plain fixed-coupon bond.
#[derive(Clone, Debug)]
pub struct BondSpec {
  /// Years to maturity.
  pub maturity: f64,
  pub principal: f64,
  /// Annual coupon rate.
  pub coupon_rate: f64,
  pub coupons_per_year: u32,
}

impl Default for BondSpec {
  fn default() -> Self {
    Self {
      maturity: 10.0,
      principal: 100.0,
      coupon_rate: 0.03,
      coupons_per_year: 12,
    }
  }
}

impl BondSpec {
  pub fn new(maturity: f64) -> Self {
    Self {
      maturity,
      ..Self::default()
    }
  }

  pub fn n_coupons(&self) -> usize {
    (self.maturity * self.coupons_per_year as f64).round() as usize
  }

  pub fn coupon_amount(&self) -> f64 {
    self.principal * self.coupon_rate / self.coupons_per_year as f64
  }

  fn validate(&self) -> Result<()> {
    if self.coupons_per_year == 0 || self.n_coupons() == 0 {
      return Err(RiskKitError::invalid(format!(
        "bond with maturity {} and {} coupons per year pays nothing",
        self.maturity, self.coupons_per_year
      )));
    }
    Ok(())
  }
}

/// Coupon at every coupon period `1..=n`, principal added to the last one.
pub fn bond_cash_flows(spec: &BondSpec) -> Result<CashFlows> {
  spec.validate()?;
  let n = spec.n_coupons();
  let times = Array1::range(1.0, n as f64 + 1.0, 1.0);
  let mut amounts = Array1::from_elem(n, spec.coupon_amount());
  amounts[n - 1] += spec.principal;
  CashFlows::new(times, amounts)
}

/// Price by discounting the cash flows at `discount_rate / coupons_per_year`
/// per coupon period.
pub fn bond_price(spec: &BondSpec, discount_rate: f64) -> Result<f64> {
  let flows = bond_cash_flows(spec)?;
  Ok(pv(&flows, discount_rate / spec.coupons_per_year as f64))
}

/// Annuity plus principal closed form of [`bond_price`].
pub fn closed_form_bond_price(spec: &BondSpec, discount_rate: f64) -> Result<f64> {
  spec.validate()?;
  let n = spec.n_coupons() as f64;
  let y = discount_rate / spec.coupons_per_year as f64;
  let c = spec.coupon_amount();
  if y == 0.0 {
    return Ok(c * n + spec.principal);
  }
  let principal_df = (1.0 + y).powf(-n);
  Ok(c * (1.0 - principal_df) / y + spec.principal * principal_df)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn cash_flows_carry_principal_at_maturity() -> anyhow::Result<()> {
    let spec = BondSpec {
      maturity: 3.0,
      principal: 100.0,
      coupon_rate: 0.03,
      coupons_per_year: 2,
    };
    let flows = bond_cash_flows(&spec)?;
    assert_eq!(flows.len(), 6);
    assert_eq!(flows.times().to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_abs_diff_eq!(flows.amounts()[0], 1.5, epsilon = 1e-15);
    assert_abs_diff_eq!(flows.amounts()[5], 101.5, epsilon = 1e-12);
    Ok(())
  }

  #[test]
  fn pv_price_matches_closed_form() -> anyhow::Result<()> {
    for (maturity, coupon, cpy, rate) in [
      (10.0, 0.03, 12, 0.04),
      (20.0, 0.05, 2, 0.02),
      (5.0, 0.0, 1, 0.03),
      (3.0, 0.04, 4, 0.0),
    ] {
      let spec = BondSpec {
        maturity,
        principal: 100.0,
        coupon_rate: coupon,
        coupons_per_year: cpy,
      };
      assert_abs_diff_eq!(
        bond_price(&spec, rate)?,
        closed_form_bond_price(&spec, rate)?,
        epsilon = 1e-9
      );
    }
    Ok(())
  }

  #[test]
  fn par_bond_prices_at_principal() -> anyhow::Result<()> {
    let spec = BondSpec::new(20.0);
    assert_abs_diff_eq!(bond_price(&spec, 0.03)?, 100.0, epsilon = 1e-9);
    assert!(bond_price(&spec, 0.05)? < 100.0);
    assert!(bond_price(&spec, 0.02)? > 100.0);
    Ok(())
  }

  #[test]
  fn zero_coupon_count_is_invalid() {
    let spec = BondSpec {
      maturity: 0.01,
      coupons_per_year: 2,
      ..BondSpec::default()
    };
    assert!(matches!(bond_cash_flows(&spec), Err(RiskKitError::InvalidInput(_))));
  }
}
