//! # Short-Rate Model Calibration & Simulation
//!
//! `shortrate_rs` calibrates and simulates two short-rate interest models,
//! Vasicek and Ho-Lee, from historical spot-rate series.
//!
//! ## Modules
//!
//! | Module          | Description                                                               |
//! |-----------------|---------------------------------------------------------------------------|
//! | [`model`]       | Vasicek and Ho-Lee models with an Euler-Maruyama path simulator.          |
//! | [`calibration`] | Nonlinear least-squares calibrators (Levenberg-Marquardt) for both models. |
//! | [`noise`]       | Seeded Wiener-increment grids shared by the simulators.                   |
//! | [`error`]       | Input-validation error taxonomy.                                          |
//!
//! Data flow: observed rate series → calibrator → fitted parameters → model →
//! path ensemble. The simulator draws its entire noise grid before the time
//! recurrence starts, so a fixed seed reproduces an ensemble bit for bit.
//!
//! ## Parallelism
//!
//! Paths are independent once the noise grid is fixed, so the simulators run
//! the path dimension in parallel via `rayon`. The time dimension is a
//! strictly sequential fold.
//!
//! ## Example Usage
//!
//! ```rust
//! use ndarray::array;
//! use shortrate_rs::calibration::vasicek::VasicekCalibrator;
//! use shortrate_rs::model::vasicek::Vasicek;
//! use shortrate_rs::model::Scheme;
//! use shortrate_rs::model::SimulationConfig;
//!
//! let rates = array![0.03, 0.031, 0.0295, 0.032, 0.0305];
//! let fit = VasicekCalibrator::new(None, rates, 1.0 / 252.0).calibrate()?;
//! let model = Vasicek::new(fit.params, 0.03);
//! let cfg = SimulationConfig::new(1.0, 1.0 / 252.0, 100, Scheme::EulerMaruyama, Some(42));
//! let paths = model.simulate(&cfg)?;
//! assert_eq!(paths.nrows(), 253);
//! # Ok::<(), shortrate_rs::error::ShortRateError>(())
//! ```

pub mod calibration;
pub mod error;
pub mod model;
pub mod noise;

pub use calibration::ho_lee::HoLeeCalibrator;
pub use calibration::vasicek::VasicekCalibrator;
pub use calibration::Fit;
pub use calibration::FitDiagnostics;
pub use error::ShortRateError;
pub use model::ho_lee::HoLee;
pub use model::ho_lee::HoLeeParams;
pub use model::vasicek::Vasicek;
pub use model::vasicek::VasicekParams;
pub use model::Scheme;
pub use model::SimulationConfig;
