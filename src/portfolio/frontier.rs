//! # Efficient Frontier
//!
//! $$
//! \mathcal F = \{(\sigma_p(\mathbf w^\*(r)),\ r) : r\in[\min\mu,\max\mu]\}
//! $$
//!
//! Numeric tables behind a frontier chart: the sampled frontier plus the
//! optional GMV, equal-weight and capital-market-line markers.

use ndarray::Array1;

use super::optimizers::FrontierOptimizer;
use super::types::Covariance;
use super::types::ExpectedReturns;
use super::types::FrontierPoint;
use crate::error::Result;

/// Which markers to compute alongside the frontier.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrontierMarkers {
  pub gmv: bool,
  pub equal_weight: bool,
  /// Risk-free rate of the capital market line; `None` skips it.
  pub cml: Option<f64>,
}

/// Line from the risk-free asset `(0, riskfree_rate)` through the MSR portfolio.
#[derive(Clone, Debug, PartialEq)]
pub struct CapitalMarketLine {
  pub riskfree_rate: f64,
  pub msr: FrontierPoint,
}

impl CapitalMarketLine {
  /// `(vol, ret)` of both ends of the line.
  pub fn endpoints(&self) -> [(f64, f64); 2] {
    [(0.0, self.riskfree_rate), (self.msr.vol, self.msr.ret)]
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frontier {
  pub points: Vec<FrontierPoint>,
  pub gmv: Option<FrontierPoint>,
  pub equal_weight: Option<FrontierPoint>,
  pub cml: Option<CapitalMarketLine>,
}

impl FrontierOptimizer {
  pub fn efficient_frontier(
    &self,
    n_points: usize,
    er: &ExpectedReturns,
    cov: &Covariance,
    markers: FrontierMarkers,
  ) -> Result<Frontier> {
    let points = self
      .optimal_weights(n_points, er, cov)?
      .map(|w| FrontierPoint::evaluate(w?, er, cov))
      .collect::<Result<Vec<_>>>()?;

    let gmv = if markers.gmv {
      Some(FrontierPoint::evaluate(self.gmv(cov)?, er, cov)?)
    } else {
      None
    };

    let equal_weight = if markers.equal_weight {
      let n = er.len();
      Some(FrontierPoint::evaluate(
        Array1::from_elem(n, 1.0 / n as f64),
        er,
        cov,
      )?)
    } else {
      None
    };

    let cml = match markers.cml {
      Some(riskfree_rate) => Some(CapitalMarketLine {
        riskfree_rate,
        msr: FrontierPoint::evaluate(self.msr(riskfree_rate, er, cov)?, er, cov)?,
      }),
      None => None,
    };

    Ok(Frontier {
      points,
      gmv,
      equal_weight,
      cml,
    })
  }
}

/// [`FrontierOptimizer::efficient_frontier`] with default settings.
pub fn efficient_frontier(
  n_points: usize,
  er: &ExpectedReturns,
  cov: &Covariance,
  markers: FrontierMarkers,
) -> Result<Frontier> {
  FrontierOptimizer::default().efficient_frontier(n_points, er, cov, markers)
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  fn inputs() -> (ExpectedReturns, Covariance) {
    let er = ExpectedReturns::from_values(array![0.04, 0.09, 0.12]);
    let cov = Covariance::from_matrix(array![
      [0.005, 0.001, 0.0],
      [0.001, 0.020, 0.004],
      [0.0, 0.004, 0.050]
    ])
    .unwrap();
    (er, cov)
  }

  #[test]
  fn frontier_without_markers() {
    let (er, cov) = inputs();
    let f = efficient_frontier(4, &er, &cov, FrontierMarkers::default()).unwrap();
    assert_eq!(f.points.len(), 4);
    assert!(f.gmv.is_none() && f.equal_weight.is_none() && f.cml.is_none());
    assert!(f.points.windows(2).all(|p| p[1].ret > p[0].ret));
  }

  #[test]
  fn markers_sit_on_or_inside_the_frontier() {
    let (er, cov) = inputs();
    let markers = FrontierMarkers {
      gmv: true,
      equal_weight: true,
      cml: Some(0.02),
    };
    let f = efficient_frontier(6, &er, &cov, markers).unwrap();

    let gmv = f.gmv.unwrap();
    for p in &f.points {
      assert!(gmv.vol <= p.vol + 1e-6);
    }

    let ew = f.equal_weight.unwrap();
    assert_abs_diff_eq!(ew.ret, (0.04 + 0.09 + 0.12) / 3.0, epsilon = 1e-12);
    assert!(gmv.vol <= ew.vol);

    let cml = f.cml.unwrap();
    assert_eq!(cml.endpoints()[0], (0.0, 0.02));
    for p in &f.points {
      assert!(cml.msr.sharpe(0.02) >= p.sharpe(0.02) - 1e-6);
    }
  }
}
