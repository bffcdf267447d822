//! # Portfolio
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! Mean-variance portfolio construction: portfolio return and volatility,
//! the long-only efficient frontier, maximum Sharpe ratio and global minimum
//! variance portfolios.

pub mod frontier;
pub mod math;
pub mod optimizers;
pub mod types;

pub use frontier::efficient_frontier;
pub use frontier::CapitalMarketLine;
pub use frontier::Frontier;
pub use frontier::FrontierMarkers;
pub use math::portfolio_return;
pub use math::portfolio_vol;
pub use math::two_asset_frontier;
pub use optimizers::gmv;
pub use optimizers::minimize_vol;
pub use optimizers::msr;
pub use optimizers::optimal_weights;
pub use optimizers::FrontierOptimizer;
pub use optimizers::FrontierWeights;
pub use optimizers::OptimizerConfig;
pub use types::Covariance;
pub use types::ExpectedReturns;
pub use types::FrontierPoint;
