//! Vasicek calibrator.
//!
//! Fits `(a, b, sigma)` to observed rate changes by least squares on
//!
//! ((r[i] - r[i-1]) - a (b - r[i-1]) dt) / (sigma + EPSILON)
//!
//! No bounds are imposed; the optimizer may return negative `a` (mean
//! diverging dynamics) or negative `sigma`, and the raw values are passed
//! through unchanged.

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
use crate::model::vasicek::VasicekParams;

/// Default initial guess for the mean-reversion speed.
const A0: f64 = 0.1;
/// Default initial guess for the volatility.
const SIGMA0: f64 = 0.01;

/// Fits Vasicek parameters to an observed rate series.
#[derive(ImplNew, Clone, Debug)]
pub struct VasicekCalibrator {
  /// Initial guess override; when `None`, `a = 0.1`, `b = mean(rates)`,
  /// `sigma = 0.01`.
  pub params: Option<VasicekParams>,
  /// Observed rate series, one value per `dt`.
  pub rates: Array1<f64>,
  /// Sampling interval of `rates`.
  pub dt: f64,
}

impl VasicekCalibrator {
  pub fn calibrate(&self) -> Result<Fit<VasicekParams>, ShortRateError> {
    validate_input(&self.rates, self.dt)?;

    let degenerate = is_degenerate(&self.rates);
    if degenerate {
      warn!("rate series has zero variance; the volatility estimate will be unreliable");
    }

    let initial = self.params.unwrap_or_else(|| {
      let mean = self.rates.mean().unwrap_or(0.0);
      VasicekParams::new(A0, mean, SIGMA0)
    });

    let problem = VasicekProblem {
      params: initial,
      rates: self.rates.clone(),
      dt: self.dt,
    };

    // One residual per transition; Levenberg-Marquardt needs at least as
    // many residuals as parameters.
    if self.rates.len() - 1 < 3 {
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
        a = params.a,
        sigma = params.sigma,
        "fitted parameters are not admissible (non-positive a or sigma)"
      );
    }

    let residual_norm = problem.residuals().map(|r| r.norm()).unwrap_or(f64::NAN);
    debug!(
      a = params.a,
      b = params.b,
      sigma = params.sigma,
      evaluations = report.number_of_evaluations,
      "vasicek calibration finished"
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
struct VasicekProblem {
  params: VasicekParams,
  rates: Array1<f64>,
  dt: f64,
}

impl LeastSquaresProblem<f64, Dyn, Dyn> for VasicekProblem {
  type JacobianStorage = Owned<f64, Dyn, Dyn>;
  type ParameterStorage = Owned<f64, Dyn>;
  type ResidualStorage = Owned<f64, Dyn>;

  fn set_params(&mut self, params: &DVector<f64>) {
    self.params = VasicekParams::from(params.clone());
  }

  fn params(&self) -> DVector<f64> {
    self.params.into()
  }

  fn residuals(&self) -> Option<DVector<f64>> {
    let VasicekParams { a, b, sigma } = self.params;
    let denom = sigma + EPSILON;
    Some(DVector::from_fn(self.rates.len() - 1, |i, _| {
      let r_lag = self.rates[i];
      let dr = self.rates[i + 1] - r_lag;
      (dr - a * (b - r_lag) * self.dt) / denom
    }))
  }

  fn jacobian(&self) -> Option<DMatrix<f64>> {
    let VasicekParams { a, b, sigma } = self.params;
    let denom = sigma + EPSILON;
    Some(DMatrix::from_fn(self.rates.len() - 1, 3, |i, j| {
      let r_lag = self.rates[i];
      match j {
        0 => -(b - r_lag) * self.dt / denom,
        1 => -a * self.dt / denom,
        _ => {
          let dr = self.rates[i + 1] - r_lag;
          -(dr - a * (b - r_lag) * self.dt) / (denom * denom)
        }
      }
    }))
  }
}
