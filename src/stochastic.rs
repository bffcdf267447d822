//! # Stochastic
//!
//! $$
//! dS_t = \mu S_t dt + \sigma S_t dW_t,\qquad
//! dr_t = a(b - r_t)dt + \sigma\sqrt{r_t}\,dW_t
//! $$
//!
//! Discrete-time scenario generators for asset prices and short rates.
//!
//! | Module    | Description                                                        |
//! |-----------|--------------------------------------------------------------------|
//! | [`gbm`]   | Geometric Brownian motion price or return paths.                   |
//! | [`cir`]   | Cox-Ingersoll-Ross short rate and zero-coupon bond price paths.     |
//! | [`rates`] | Annual and instantaneous rate conversions.                         |
//!
//! Every sampler draws from a caller-supplied [`rand::Rng`], so a seeded
//! generator reproduces a run exactly.

pub mod cir;
pub mod gbm;
pub mod rates;

pub use cir::Cir;
pub use cir::CirState;
pub use cir::RateSimulation;
pub use gbm::Gbm;
