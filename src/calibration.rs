//! Nonlinear least-squares calibration of short-rate models.
//!
//! Both calibrators regress the observed rate changes on the model's
//! Euler-discretized drift and minimize with Levenberg-Marquardt. Residuals
//! are divided by `sigma + EPSILON`, which makes the regression
//! self-weighting: the volatility parameter is resolved jointly with the
//! drift parameters instead of being estimated afterwards.
//!
//! Solver non-convergence is recoverable: the best iterate is always
//! returned for well-formed, finite input, and its status is exposed
//! through [`FitDiagnostics`].

use levenberg_marquardt::TerminationReason;
use ndarray::Array1;

use crate::error::ShortRateError;

pub mod ho_lee;
pub mod vasicek;

/// Residual denominator regularizer, guarding against division by zero as
/// `sigma` passes through zero during optimization. The value is fixed;
/// calibration-output parity depends on it.
pub const EPSILON: f64 = 1e-6;

/// A fitted parameter set plus solver diagnostics.
#[derive(Debug)]
pub struct Fit<P> {
  /// Raw fitted parameters, never clamped. Negative volatility or
  /// mean-reversion speed is possible; check `is_admissible` on the
  /// parameter set.
  pub params: P,
  pub diagnostics: FitDiagnostics,
}

/// Solver status for a single calibration run.
#[derive(Debug)]
pub struct FitDiagnostics {
  /// Whether the solver met one of its convergence criteria.
  pub converged: bool,
  /// Raw termination reason; `None` when the solver was not invoked
  /// (underdetermined series).
  pub termination: Option<TerminationReason>,
  /// Final objective value, half the squared residual norm.
  pub objective: f64,
  /// Euclidean norm of the final residual vector.
  pub residual_norm: f64,
  /// Number of residual evaluations spent by the solver.
  pub evaluations: usize,
  /// The input series has zero variance. The fit still succeeds, but the
  /// volatility estimate is unreliable and the regularized denominator is
  /// close to degenerate.
  pub degenerate_series: bool,
  /// The series yields fewer residuals than parameters, so the solver was
  /// skipped and the initial guess returned.
  pub underdetermined: bool,
}

pub(crate) fn validate_input(rates: &Array1<f64>, dt: f64) -> Result<(), ShortRateError> {
  if rates.len() < 2 {
    return Err(ShortRateError::SeriesTooShort(rates.len()));
  }
  if let Some(idx) = rates.iter().position(|r| !r.is_finite()) {
    return Err(ShortRateError::NonFiniteObservation(idx));
  }
  if !(dt.is_finite() && dt > 0.0) {
    return Err(ShortRateError::InvalidTimeStep(dt));
  }
  Ok(())
}

pub(crate) fn is_degenerate(rates: &Array1<f64>) -> bool {
  rates.iter().all(|r| *r == rates[0])
}

#[cfg(test)]
mod tests {
  use ndarray::array;
  use ndarray::Array1;

  use super::*;

  #[test]
  fn validation_catches_malformed_input() {
    assert_eq!(
      validate_input(&array![0.03], 0.1),
      Err(ShortRateError::SeriesTooShort(1))
    );
    assert_eq!(
      validate_input(&array![0.03, f64::NAN, 0.031], 0.1),
      Err(ShortRateError::NonFiniteObservation(1))
    );
    assert_eq!(
      validate_input(&array![0.03, 0.031], -0.1),
      Err(ShortRateError::InvalidTimeStep(-0.1))
    );
    assert_eq!(validate_input(&array![0.03, 0.031], 0.1), Ok(()));
  }

  #[test]
  fn constant_series_is_degenerate() {
    assert!(is_degenerate(&Array1::from_elem(8, 0.03)));
    assert!(!is_degenerate(&array![0.03, 0.031]));
  }
}
