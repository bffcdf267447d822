//! # Backtest
//!
//! $$
//! A_{t+1} = T(A_t, r_t)
//! $$
//!
//! Discrete-time strategy backtests driven by return tables.

pub mod cppi;

pub use cppi::run_cppi;
pub use cppi::CppiBacktest;
pub use cppi::CppiConfig;
pub use cppi::CppiState;
pub use cppi::CppiStep;
