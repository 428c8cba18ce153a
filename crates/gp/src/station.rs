//! Per-station Gaussian-process models.
//!
//! Station models describe noise and drift that is independent between
//! stations. Their kernels and bases act on observation times only; the
//! block assembly in [`crate::blocks`] places each station's evaluation
//! into the network-wide index space.

use ndarray::{Array2, ArrayView1};

use crate::error::GpError;

/// Days per year used by the seasonal basis.
const DAYS_PER_YEAR: f64 = 365.25;

/// A station covariance/basis model, resolved from its registry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationModel {
    /// White noise: `wn`. One parameter `sigma`.
    Wn,
    /// First-order Gauss-Markov: `fogm`. Parameters `(sigma, tau)`.
    Fogm,
    /// Squared-exponential in time: `se`. Parameters `(sigma, tau)`.
    Se,
    /// Constant offset basis column: `p0`. No parameters.
    P0,
    /// Constant and linear trend basis columns: `p1`. No parameters.
    P1,
    /// Annual and semiannual sinusoid basis columns: `per`. No parameters.
    Per,
}

impl StationModel {
    /// Resolves a registry name to a model.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnknownModel`] for unregistered names.
    pub fn parse(name: &str) -> Result<Self, GpError> {
        match name {
            "wn" => Ok(StationModel::Wn),
            "fogm" => Ok(StationModel::Fogm),
            "se" => Ok(StationModel::Se),
            "p0" => Ok(StationModel::P0),
            "p1" => Ok(StationModel::P1),
            "per" => Ok(StationModel::Per),
            _ => Err(GpError::UnknownModel {
                kind: "station",
                name: name.to_string(),
            }),
        }
    }

    /// Returns the registry name of this model.
    pub fn name(&self) -> &'static str {
        match self {
            StationModel::Wn => "wn",
            StationModel::Fogm => "fogm",
            StationModel::Se => "se",
            StationModel::P0 => "p0",
            StationModel::P1 => "p1",
            StationModel::Per => "per",
        }
    }

    /// Returns the number of hyperparameters this model consumes.
    pub fn n_params(&self) -> usize {
        match self {
            StationModel::Wn => 1,
            StationModel::Fogm | StationModel::Se => 2,
            StationModel::P0 | StationModel::P1 | StationModel::Per => 0,
        }
    }

    /// Returns the number of basis columns this model contributes per
    /// station.
    pub fn n_basis(&self) -> usize {
        match self {
            StationModel::Wn | StationModel::Fogm | StationModel::Se => 0,
            StationModel::P0 => 1,
            StationModel::P1 => 2,
            StationModel::Per => 4,
        }
    }

    /// Evaluates the temporal covariance between two epoch sets.
    pub(crate) fn covariance(
        &self,
        params: &[f64],
        t1: ArrayView1<'_, f64>,
        t2: ArrayView1<'_, f64>,
    ) -> Array2<f64> {
        let mut cov = Array2::zeros((t1.len(), t2.len()));
        match self {
            StationModel::Wn => {
                let var = params[0] * params[0];
                for (a, &u) in t1.iter().enumerate() {
                    for (b, &v) in t2.iter().enumerate() {
                        if u == v {
                            cov[[a, b]] = var;
                        }
                    }
                }
            }
            StationModel::Fogm => {
                let (var, tau) = (params[0] * params[0], params[1]);
                for (a, &u) in t1.iter().enumerate() {
                    for (b, &v) in t2.iter().enumerate() {
                        cov[[a, b]] = var * (-(u - v).abs() / tau).exp();
                    }
                }
            }
            StationModel::Se => {
                let (var, tau) = (params[0] * params[0], params[1]);
                for (a, &u) in t1.iter().enumerate() {
                    for (b, &v) in t2.iter().enumerate() {
                        let dt = u - v;
                        cov[[a, b]] = var * (-dt * dt / (2.0 * tau * tau)).exp();
                    }
                }
            }
            StationModel::P0 | StationModel::P1 | StationModel::Per => {}
        }
        cov
    }

    /// Evaluates the basis columns at an epoch set.
    ///
    /// The linear trend of `p1` is centred on the mean of `t`; centring
    /// changes the conditioning of the trend columns, not their span.
    pub(crate) fn basis(&self, _params: &[f64], t: ArrayView1<'_, f64>) -> Array2<f64> {
        let n = t.len();
        match self {
            StationModel::Wn | StationModel::Fogm | StationModel::Se => Array2::zeros((n, 0)),
            StationModel::P0 => Array2::ones((n, 1)),
            StationModel::P1 => {
                let center = t.iter().sum::<f64>() / n.max(1) as f64;
                let mut p = Array2::ones((n, 2));
                for (i, &ti) in t.iter().enumerate() {
                    p[[i, 1]] = ti - center;
                }
                p
            }
            StationModel::Per => {
                let mut p = Array2::zeros((n, 4));
                for (i, &ti) in t.iter().enumerate() {
                    let annual = 2.0 * std::f64::consts::PI * ti / DAYS_PER_YEAR;
                    p[[i, 0]] = annual.sin();
                    p[[i, 1]] = annual.cos();
                    p[[i, 2]] = (2.0 * annual).sin();
                    p[[i, 3]] = (2.0 * annual).cos();
                }
                p
            }
        }
    }
}
