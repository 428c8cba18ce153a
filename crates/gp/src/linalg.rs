//! Dense symmetric linear algebra for covariance matrices.
//!
//! This module is the single bridge between `ndarray` (the data layer)
//! and `nalgebra` (the factorization backend): a covariance matrix is
//! copied into a `nalgebra::DMatrix`, factored once, and every solve and
//! determinant query runs against that factorization.

use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2};

use crate::error::GpError;

/// Cholesky factorization `sigma = L * L^T` of a covariance matrix.
#[derive(Debug)]
pub struct CholFactor {
    chol: Cholesky<f64, Dyn>,
    n: usize,
}

impl CholFactor {
    /// Factors a symmetric positive-definite matrix.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::NotPositiveDefinite`] when the factorization
    /// fails. During hyperparameter search this is an explorable
    /// condition, not a crash; callers decide whether to recover.
    pub fn new(sigma: &Array2<f64>) -> Result<Self, GpError> {
        let (n, m) = sigma.dim();
        if n != m {
            return Err(GpError::ShapeMismatch {
                details: format!("covariance matrix is {n} x {m}, expected square"),
            });
        }

        let dense = DMatrix::from_fn(n, n, |i, j| sigma[[i, j]]);
        let chol = Cholesky::new(dense).ok_or(GpError::NotPositiveDefinite { n })?;
        Ok(Self { chol, n })
    }

    /// Returns the matrix dimension.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Returns `ln det(sigma)`.
    pub fn log_det(&self) -> f64 {
        // The factor's diagonal is strictly positive after a successful
        // factorization; the upper triangle of l_dirty is never read.
        let l = self.chol.l_dirty();
        2.0 * (0..self.n).map(|i| l[(i, i)].ln()).sum::<f64>()
    }

    /// Computes `L^-1 * v` (forward substitution).
    pub fn whiten_vec(&self, v: &Array1<f64>) -> Result<Array1<f64>, GpError> {
        let rhs = DVector::from_fn(v.len(), |i, _| v[i]);
        let sol = self
            .chol
            .l_dirty()
            .solve_lower_triangular(&rhs)
            .ok_or(GpError::NotPositiveDefinite { n: self.n })?;
        Ok(Array1::from_iter(sol.iter().copied()))
    }

    /// Computes `L^-1 * m` column-wise.
    pub fn whiten_mat(&self, m: &Array2<f64>) -> Result<Array2<f64>, GpError> {
        let (rows, cols) = m.dim();
        let rhs = DMatrix::from_fn(rows, cols, |i, j| m[[i, j]]);
        let sol = self
            .chol
            .l_dirty()
            .solve_lower_triangular(&rhs)
            .ok_or(GpError::NotPositiveDefinite { n: self.n })?;
        Ok(Array2::from_shape_fn((rows, cols), |(i, j)| sol[(i, j)]))
    }

    /// Computes `sigma^-1 * v`.
    pub fn solve_vec(&self, v: &Array1<f64>) -> Array1<f64> {
        let rhs = DVector::from_fn(v.len(), |i, _| v[i]);
        let sol = self.chol.solve(&rhs);
        Array1::from_iter(sol.iter().copied())
    }

    /// Computes `sigma^-1 * m` column-wise.
    pub fn solve_mat(&self, m: &Array2<f64>) -> Array2<f64> {
        let (rows, cols) = m.dim();
        let rhs = DMatrix::from_fn(rows, cols, |i, j| m[[i, j]]);
        let sol = self.chol.solve(&rhs);
        Array2::from_shape_fn((rows, cols), |(i, j)| sol[(i, j)])
    }

    /// Computes `L * v`, turning independent standard normal draws into a
    /// draw from `N(0, sigma)`.
    pub fn unwhiten_vec(&self, v: &Array1<f64>) -> Array1<f64> {
        let l = self.chol.l_dirty();
        let mut out = Array1::zeros(self.n);
        for i in 0..self.n {
            let mut sum = 0.0;
            for j in 0..=i {
                sum += l[(i, j)] * v[j];
            }
            out[i] = sum;
        }
        out
    }
}
