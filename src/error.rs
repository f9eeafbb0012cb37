use thiserror::Error;

/// Input-validation errors.
///
/// All variants are detected before any solver iteration or simulation loop
/// runs. Solver non-convergence is not an error: the best available iterate
/// is returned together with [`crate::calibration::FitDiagnostics`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShortRateError {
  /// A rate series needs at least one transition to fit against.
  #[error("rate series must contain at least 2 observations, got {0}")]
  SeriesTooShort(usize),

  /// NaN or infinity in the observed series.
  #[error("rate series contains a non-finite value at index {0}")]
  NonFiniteObservation(usize),

  #[error("time step dt must be positive and finite, got {0}")]
  InvalidTimeStep(f64),

  #[error("simulation horizon T must be positive and finite, got {0}")]
  InvalidHorizon(f64),

  #[error("path count must be at least 1")]
  InvalidPathCount,

  #[error("initial short rate must be finite, got {0}")]
  NonFiniteInitialRate(f64),
}
