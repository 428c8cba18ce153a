//! Network Gaussian-process models.
//!
//! Network models describe signal that is correlated across the whole
//! station network. Their kernels act on flattened (t, x0, x1)
//! coordinates, separable into a temporal and a spatial factor. None of
//! the current network models carries basis (trend) columns.

use ndarray::{Array2, ArrayView2};

use crate::error::GpError;

/// A network covariance model, resolved from its registry name.
///
/// Each variant consumes a fixed-size slice of the hyperparameter vector;
/// see [`NetworkModel::n_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkModel {
    /// Squared-exponential in time and space: `se-se`.
    ///
    /// Parameters `(sigma, tau, ell)`: amplitude, temporal length scale,
    /// spatial length scale.
    SeSe,
    /// Exponential in time, squared-exponential in space: `exp-se`.
    ///
    /// Parameters `(sigma, tau, ell)`. The exponential temporal factor
    /// gives Markovian (first-order Gauss-Markov) time correlation.
    ExpSe,
}

impl NetworkModel {
    /// Resolves a registry name to a model.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnknownModel`] for unregistered names.
    pub fn parse(name: &str) -> Result<Self, GpError> {
        match name {
            "se-se" => Ok(NetworkModel::SeSe),
            "exp-se" => Ok(NetworkModel::ExpSe),
            _ => Err(GpError::UnknownModel {
                kind: "network",
                name: name.to_string(),
            }),
        }
    }

    /// Returns the registry name of this model.
    pub fn name(&self) -> &'static str {
        match self {
            NetworkModel::SeSe => "se-se",
            NetworkModel::ExpSe => "exp-se",
        }
    }

    /// Returns the number of hyperparameters this model consumes.
    pub fn n_params(&self) -> usize {
        match self {
            NetworkModel::SeSe | NetworkModel::ExpSe => 3,
        }
    }

    /// Returns the number of basis columns this model contributes.
    pub fn n_basis(&self) -> usize {
        match self {
            NetworkModel::SeSe | NetworkModel::ExpSe => 0,
        }
    }

    /// Evaluates the covariance between two flattened coordinate sets.
    ///
    /// `z1` and `z2` are `(n, 3)` arrays of (t, x0, x1) rows; `params` has
    /// length [`n_params`](Self::n_params).
    pub(crate) fn covariance(
        &self,
        params: &[f64],
        z1: ArrayView2<'_, f64>,
        z2: ArrayView2<'_, f64>,
    ) -> Array2<f64> {
        let (sigma, tau, ell) = (params[0], params[1], params[2]);
        let var = sigma * sigma;
        let mut cov = Array2::zeros((z1.nrows(), z2.nrows()));
        for (a, r1) in z1.rows().into_iter().enumerate() {
            for (b, r2) in z2.rows().into_iter().enumerate() {
                let dt = r1[0] - r2[0];
                let dx0 = r1[1] - r2[1];
                let dx1 = r1[2] - r2[2];
                let space = (-(dx0 * dx0 + dx1 * dx1) / (2.0 * ell * ell)).exp();
                let time = match self {
                    NetworkModel::SeSe => (-dt * dt / (2.0 * tau * tau)).exp(),
                    NetworkModel::ExpSe => (-dt.abs() / tau).exp(),
                };
                cov[[a, b]] = var * time * space;
            }
        }
        cov
    }

    /// Evaluates the basis columns at a flattened coordinate set.
    pub(crate) fn basis(&self, _params: &[f64], z: ArrayView2<'_, f64>) -> Array2<f64> {
        Array2::zeros((z.nrows(), self.n_basis()))
    }
}
