//! Short-rate models and their Monte Carlo path simulator.
//!
//! Each model owns an immutable parameter set plus the initial short rate
//! and produces a fresh path ensemble on every `simulate` call. The ensemble
//! is an `Array2<f64>` of shape `(floor(T / dt) + 1, n_paths)` whose first
//! row is the initial rate broadcast across all paths.

use impl_new_derive::ImplNew;
use ndarray::Array2;
use ndarray::Axis;
use ndarray::Zip;

use crate::error::ShortRateError;
use crate::noise::WienerGrid;

pub mod ho_lee;
pub mod vasicek;

/// Discretization scheme for the short-rate SDE.
///
/// Closed set; Euler-Maruyama is the only scheme implemented today.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scheme {
  #[default]
  EulerMaruyama,
}

/// Run configuration for a Monte Carlo simulation.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct SimulationConfig {
  /// Horizon, in the same time unit as `dt`.
  pub t: f64,
  /// Time step.
  pub dt: f64,
  /// Number of independent paths.
  pub n_paths: usize,
  /// Discretization scheme.
  pub scheme: Scheme,
  /// Seed for the noise grid; `None` uses the thread RNG.
  pub seed: Option<u64>,
}

impl SimulationConfig {
  /// Number of time steps, truncating a trailing partial step.
  pub fn n_steps(&self) -> usize {
    (self.t / self.dt) as usize
  }

  pub(crate) fn validate(&self) -> Result<(), ShortRateError> {
    if !(self.dt.is_finite() && self.dt > 0.0) {
      return Err(ShortRateError::InvalidTimeStep(self.dt));
    }
    if !(self.t.is_finite() && self.t > 0.0) {
      return Err(ShortRateError::InvalidHorizon(self.t));
    }
    if self.n_paths == 0 {
      return Err(ShortRateError::InvalidPathCount);
    }
    Ok(())
  }
}

/// Folds a precomputed Wiener grid through the Euler-Maruyama recurrence
///
/// r[t+1] = r[t] + drift(r[t]) * dt + sigma * dW[t]
///
/// All randomness is drawn up front, so the recurrence is a deterministic
/// fold given the seed. Time is sequential; paths run in parallel.
pub(crate) fn euler_maruyama(
  drift: impl Fn(f64) -> f64 + Sync,
  sigma: f64,
  r0: f64,
  cfg: &SimulationConfig,
) -> Result<Array2<f64>, ShortRateError> {
  cfg.validate()?;
  if !r0.is_finite() {
    return Err(ShortRateError::NonFiniteInitialRate(r0));
  }

  let n_steps = cfg.n_steps();
  let dt = cfg.dt;
  let dw = WienerGrid::new(n_steps, cfg.n_paths, dt).sample(cfg.seed);

  let mut paths = Array2::<f64>::zeros((n_steps + 1, cfg.n_paths));
  paths.row_mut(0).fill(r0);

  match cfg.scheme {
    Scheme::EulerMaruyama => {
      Zip::from(paths.lanes_mut(Axis(0)))
        .and(dw.lanes(Axis(0)))
        .par_for_each(|mut path, dw| {
          for i in 0..n_steps {
            path[i + 1] = path[i] + drift(path[i]) * dt + sigma * dw[i];
          }
        });
    }
  }

  Ok(paths)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_rejects_bad_inputs() {
    let cfg = SimulationConfig::new(1.0, 0.0, 5, Scheme::EulerMaruyama, None);
    assert!(matches!(
      cfg.validate(),
      Err(ShortRateError::InvalidTimeStep(_))
    ));

    let cfg = SimulationConfig::new(-1.0, 0.1, 5, Scheme::EulerMaruyama, None);
    assert!(matches!(
      cfg.validate(),
      Err(ShortRateError::InvalidHorizon(_))
    ));

    let cfg = SimulationConfig::new(1.0, 0.1, 0, Scheme::EulerMaruyama, None);
    assert!(matches!(
      cfg.validate(),
      Err(ShortRateError::InvalidPathCount)
    ));
  }

  #[test]
  fn step_count_truncates_partial_steps() {
    let cfg = SimulationConfig::new(1.0, 0.4, 1, Scheme::EulerMaruyama, None);
    assert_eq!(cfg.n_steps(), 2);

    let cfg = SimulationConfig::new(1.0, 1.0 / 252.0, 1, Scheme::EulerMaruyama, None);
    assert_eq!(cfg.n_steps(), 252);
  }

  #[test]
  fn non_finite_initial_rate_is_rejected() {
    let cfg = SimulationConfig::new(1.0, 0.1, 2, Scheme::EulerMaruyama, Some(1));
    let result = euler_maruyama(|r| -r, 0.1, f64::NAN, &cfg);
    assert!(matches!(
      result,
      Err(ShortRateError::NonFiniteInitialRate(_))
    ));
  }
}
