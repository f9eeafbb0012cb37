//! Ho-Lee calibrator.
//!
//! Fits `(theta, sigma)` to observed rate changes by least squares on
//!
//! ((r[i] - r[i-1]) - theta dt) / (sigma + EPSILON)
//!
//! Same shape as the Vasicek calibrator without the mean-reversion term.

use impl_new_derive::ImplNew;
use levenberg_marquardt::LeastSquaresProblem;
use levenberg_marquardt::LevenbergMarquardt;
use nalgebra::DMatrix;
use nalgebra::DVector;
use nalgebra::Dyn;
use nalgebra::Owned;
use ndarray::Array1;
use tracing::debug;
use tracing::warn;

use crate::calibration::is_degenerate;
use crate::calibration::validate_input;
use crate::calibration::Fit;
use crate::calibration::FitDiagnostics;
use crate::calibration::EPSILON;
use crate::error::ShortRateError;
use crate::model::ho_lee::HoLeeParams;

/// Default initial guess for the drift rate.
const THETA0: f64 = 0.001;
/// Default initial guess for the volatility.
const SIGMA0: f64 = 0.01;

/// Fits Ho-Lee parameters to an observed rate series.
#[derive(ImplNew, Clone, Debug)]
pub struct HoLeeCalibrator {
  /// Initial guess override; when `None`, `theta = 0.001`, `sigma = 0.01`.
  pub params: Option<HoLeeParams>,
  /// Observed rate series, one value per `dt`.
  pub rates: Array1<f64>,
  /// Sampling interval of `rates`.
  pub dt: f64,
}

impl HoLeeCalibrator {
  pub fn calibrate(&self) -> Result<Fit<HoLeeParams>, ShortRateError> {
    validate_input(&self.rates, self.dt)?;

    let degenerate = is_degenerate(&self.rates);
    if degenerate {
      warn!("rate series has zero variance; the volatility estimate will be unreliable");
    }

    let initial = self
      .params
      .unwrap_or_else(|| HoLeeParams::new(THETA0, SIGMA0));

    let problem = HoLeeProblem {
      params: initial,
      rates: self.rates.clone(),
      dt: self.dt,
    };

    // One residual per transition; Levenberg-Marquardt needs at least as
    // many residuals as parameters.
    if self.rates.len() - 1 < 2 {
      warn!("series yields fewer residuals than parameters; returning the initial guess");
      let residual_norm = problem.residuals().map(|r| r.norm()).unwrap_or(f64::NAN);
      return Ok(Fit {
        params: initial,
        diagnostics: FitDiagnostics {
          converged: false,
          termination: None,
          objective: 0.5 * residual_norm * residual_norm,
          residual_norm,
          evaluations: 0,
          degenerate_series: degenerate,
          underdetermined: true,
        },
      });
    }

    let (problem, report) = LevenbergMarquardt::new().minimize(problem);
    let params = problem.params;
    let converged = report.termination.was_successful();

    if !converged {
      warn!(
        termination = ?report.termination,
        "solver stopped before converging; returning the best iterate"
      );
    }
    if !params.is_admissible() {
      warn!(
        sigma = params.sigma,
        "fitted parameters are not admissible (non-positive sigma)"
      );
    }

    let residual_norm = problem.residuals().map(|r| r.norm()).unwrap_or(f64::NAN);
    debug!(
      theta = params.theta,
      sigma = params.sigma,
      evaluations = report.number_of_evaluations,
      "ho-lee calibration finished"
    );

    Ok(Fit {
      params,
      diagnostics: FitDiagnostics {
        converged,
        termination: Some(report.termination),
        objective: report.objective_function,
        residual_norm,
        evaluations: report.number_of_evaluations,
        degenerate_series: degenerate,
        underdetermined: false,
      },
    })
  }
}

#[derive(Clone)]
struct HoLeeProblem {
  params: HoLeeParams,
  rates: Array1<f64>,
  dt: f64,
}

impl LeastSquaresProblem<f64, Dyn, Dyn> for HoLeeProblem {
  type JacobianStorage = Owned<f64, Dyn, Dyn>;
  type ParameterStorage = Owned<f64, Dyn>;
  type ResidualStorage = Owned<f64, Dyn>;

  fn set_params(&mut self, params: &DVector<f64>) {
    self.params = HoLeeParams::from(params.clone());
  }

  fn params(&self) -> DVector<f64> {
    self.params.into()
  }

  fn residuals(&self) -> Option<DVector<f64>> {
    let HoLeeParams { theta, sigma } = self.params;
    let denom = sigma + EPSILON;
    Some(DVector::from_fn(self.rates.len() - 1, |i, _| {
      let dr = self.rates[i + 1] - self.rates[i];
      (dr - theta * self.dt) / denom
    }))
  }

  fn jacobian(&self) -> Option<DMatrix<f64>> {
    let HoLeeParams { theta, sigma } = self.params;
    let denom = sigma + EPSILON;
    Some(DMatrix::from_fn(self.rates.len() - 1, 2, |i, j| match j {
      0 => -self.dt / denom,
      _ => {
        let dr = self.rates[i + 1] - self.rates[i];
        -(dr - theta * self.dt) / (denom * denom)
      }
    }))
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;
  use crate::model::ho_lee::HoLee;
  use crate::model::Scheme;
  use crate::model::SimulationConfig;

  const DT: f64 = 1.0 / 252.0;

  #[test]
  fn rejects_malformed_input_before_solving() {
    let nan = HoLeeCalibrator::new(None, array![0.03, f64::INFINITY, 0.031], DT);
    assert_eq!(
      nan.calibrate().unwrap_err(),
      ShortRateError::NonFiniteObservation(1)
    );

    let short = HoLeeCalibrator::new(None, array![0.03], DT);
    assert_eq!(
      short.calibrate().unwrap_err(),
      ShortRateError::SeriesTooShort(1)
    );
  }

  #[test]
  fn calibrates_the_reference_scenario() {
    let rates = array![0.03, 0.031, 0.0295, 0.032, 0.0305];
    let fit = HoLeeCalibrator::new(None, rates, DT).calibrate().unwrap();

    assert!(fit.params.theta.is_finite() && fit.params.sigma.is_finite());
    assert!(!fit.diagnostics.underdetermined);
  }

  #[test]
  fn recovers_drift_from_synthetic_data() {
    let true_params = HoLeeParams::new(0.01, 0.0005);
    let model = HoLee::new(true_params, 0.03);
    let cfg = SimulationConfig::new(4.0, DT, 1, Scheme::EulerMaruyama, Some(11));
    let rates = model.simulate(&cfg).unwrap().column(0).to_owned();

    let fit = HoLeeCalibrator::new(None, rates, DT).calibrate().unwrap();
    assert_relative_eq!(fit.params.theta, true_params.theta, max_relative = 0.1);
    assert!(fit.params.sigma.is_finite());
  }

  #[test]
  fn length_two_series_returns_a_best_effort_fit() {
    let fit = HoLeeCalibrator::new(None, array![0.03, 0.031], DT)
      .calibrate()
      .unwrap();

    assert!(fit.diagnostics.underdetermined);
    assert!(!fit.diagnostics.converged);
    assert!(fit.params.theta.is_finite() && fit.params.sigma.is_finite());
  }
}
