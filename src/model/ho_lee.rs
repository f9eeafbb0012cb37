//! Ho-Lee short-rate model.
//!
//! dr(t) = theta dt + sigma dW(t)

use impl_new_derive::ImplNew;
use nalgebra::DVector;
use ndarray::Array2;

use crate::error::ShortRateError;
use crate::model::euler_maruyama;
use crate::model::SimulationConfig;

/// Ho-Lee parameters, in the stable order `(theta, sigma)`.
#[derive(ImplNew, Clone, Copy, Debug, PartialEq)]
pub struct HoLeeParams {
  /// Drift rate.
  pub theta: f64,
  /// Volatility.
  pub sigma: f64,
}

impl HoLeeParams {
  /// Whether the raw values carry a positive volatility; see
  /// [`crate::model::vasicek::VasicekParams::is_admissible`].
  pub fn is_admissible(&self) -> bool {
    self.sigma > 0.0
  }
}

impl From<HoLeeParams> for DVector<f64> {
  fn from(p: HoLeeParams) -> Self {
    DVector::from_vec(vec![p.theta, p.sigma])
  }
}

impl From<DVector<f64>> for HoLeeParams {
  fn from(v: DVector<f64>) -> Self {
    HoLeeParams {
      theta: v[0],
      sigma: v[1],
    }
  }
}

/// Ho-Lee model instance: immutable parameters plus the initial rate.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct HoLee {
  pub params: HoLeeParams,
  /// Initial short rate, broadcast into row 0 of every ensemble.
  pub r0: f64,
}

impl HoLee {
  /// Simulates a path ensemble of shape `(floor(T / dt) + 1, n_paths)`.
  pub fn simulate(&self, cfg: &SimulationConfig) -> Result<Array2<f64>, ShortRateError> {
    let HoLeeParams { theta, sigma } = self.params;
    euler_maruyama(move |_| theta, sigma, self.r0, cfg)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;
  use crate::model::Scheme;

  const DT: f64 = 1.0 / 252.0;

  #[test]
  fn ensemble_shape_and_initial_row() {
    let model = HoLee::new(HoLeeParams::new(0.001, 0.02), 0.03);
    let cfg = SimulationConfig::new(1.0, DT, 5, Scheme::EulerMaruyama, Some(42));
    let paths = model.simulate(&cfg).unwrap();

    assert_eq!(paths.dim(), (253, 5));
    assert!(paths.row(0).iter().all(|r| *r == 0.03));
  }

  #[test]
  fn fixed_seed_reproduces_the_ensemble() {
    let model = HoLee::new(HoLeeParams::new(0.001, 0.02), 0.03);
    let cfg = SimulationConfig::new(1.0, DT, 8, Scheme::EulerMaruyama, Some(42));

    assert_eq!(model.simulate(&cfg).unwrap(), model.simulate(&cfg).unwrap());
  }

  #[test]
  fn zero_volatility_is_a_straight_line() {
    let (theta, r0) = (0.004, 0.03);
    let model = HoLee::new(HoLeeParams::new(theta, 0.0), r0);
    let cfg = SimulationConfig::new(2.0, 0.25, 3, Scheme::EulerMaruyama, None);
    let paths = model.simulate(&cfg).unwrap();

    assert_eq!(paths.dim(), (9, 3));
    for (i, row) in paths.rows().into_iter().enumerate() {
      let t = i as f64 * 0.25;
      for r in row {
        assert_abs_diff_eq!(*r, r0 + theta * t, epsilon = 1e-12);
      }
    }
  }
}
