//! Vasicek short-rate model.
//!
//! dr(t) = a (b - r(t)) dt + sigma dW(t)

use impl_new_derive::ImplNew;
use nalgebra::DVector;
use ndarray::Array2;

use crate::error::ShortRateError;
use crate::model::euler_maruyama;
use crate::model::SimulationConfig;

/// Vasicek parameters, in the stable order `(a, b, sigma)`.
#[derive(ImplNew, Clone, Copy, Debug, PartialEq)]
pub struct VasicekParams {
  /// Mean-reversion speed.
  pub a: f64,
  /// Long-run mean level.
  pub b: f64,
  /// Volatility.
  pub sigma: f64,
}

impl VasicekParams {
  /// Whether the raw values describe a mean-reverting model with positive
  /// volatility. Calibration never clamps, so a fitted set can be
  /// inadmissible while still being the least-squares optimum.
  pub fn is_admissible(&self) -> bool {
    self.a > 0.0 && self.sigma > 0.0
  }
}

impl From<VasicekParams> for DVector<f64> {
  fn from(p: VasicekParams) -> Self {
    DVector::from_vec(vec![p.a, p.b, p.sigma])
  }
}

impl From<DVector<f64>> for VasicekParams {
  fn from(v: DVector<f64>) -> Self {
    VasicekParams {
      a: v[0],
      b: v[1],
      sigma: v[2],
    }
  }
}

/// Vasicek model instance: immutable parameters plus the initial rate.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct Vasicek {
  pub params: VasicekParams,
  /// Initial short rate, broadcast into row 0 of every ensemble.
  pub r0: f64,
}

impl Vasicek {
  /// Simulates a path ensemble of shape `(floor(T / dt) + 1, n_paths)`.
  pub fn simulate(&self, cfg: &SimulationConfig) -> Result<Array2<f64>, ShortRateError> {
    let VasicekParams { a, b, sigma } = self.params;
    euler_maruyama(move |r| a * (b - r), sigma, self.r0, cfg)
  }
}
