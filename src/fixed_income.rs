//! # Fixed Income
//!
//! $$
//! PV = \sum_i \frac{CF_i}{(1+r)^{t_i}},\qquad
//! D_{mac} = \frac{\sum_i t_i\,PV(CF_i)}{PV}
//! $$
//!
//! Cash-flow present values, coupon bonds, Macaulay duration and
//! duration matching. Times are expressed in periods of whatever the rate
//! is quoted per (coupon periods for bonds).

pub mod bonds;
pub mod cashflows;
pub mod duration;

pub use bonds::bond_cash_flows;
pub use bonds::bond_price;
pub use bonds::closed_form_bond_price;
pub use bonds::BondSpec;
pub use cashflows::discount;
pub use cashflows::funding_ratio;
pub use cashflows::pv;
pub use cashflows::CashFlows;
pub use duration::macaulay_duration;
pub use duration::match_durations;
