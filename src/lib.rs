//! # risk-kit
//!
//! $$
//! \max_{\mathbf w}\ \frac{\mathbf w^\top\mu - r_f}{\sqrt{\mathbf w^\top\Sigma\mathbf w}}
//! \quad\text{s.t.}\quad \mathbf 1^\top\mathbf w = 1,\ 0 \le w_i \le 1
//! $$
//!
//! Quantitative finance formulas for exploratory portfolio analysis.
//!
//! | Module           | Description                                                         |
//! |------------------|---------------------------------------------------------------------|
//! | [`series`]       | Monthly-indexed return series and tables.                           |
//! | [`stats`]        | Drawdown, moments, VaR/CVaR, normality and annualized statistics.   |
//! | [`portfolio`]    | Portfolio return/volatility, efficient frontier, MSR and GMV.       |
//! | [`backtest`]     | Constant proportion portfolio insurance.                            |
//! | [`stochastic`]   | GBM price paths and CIR short rates with zero-coupon prices.        |
//! | [`fixed_income`] | Present values, coupon bonds, Macaulay duration, duration matching. |
//! | [`data`]         | Loaders for the flat-file return tables.                            |
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod backtest;
pub mod data;
pub mod error;
pub mod fixed_income;
pub mod portfolio;
pub mod series;
pub mod stats;
pub mod stochastic;

pub use error::Result;
pub use error::RiskKitError;
