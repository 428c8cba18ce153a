//! Restricted log-likelihood of a zero-mean Gaussian with nuisance trend.
//!
//! The trend coefficients multiplying the basis columns are given an
//! improper uniform prior and marginalized out, which is what makes the
//! estimate *restricted* maximum likelihood rather than plain maximum
//! likelihood.

use ndarray::{Array1, Array2};
use tellus_gp::{CholFactor, GpError};

/// Evaluates the restricted log-likelihood of observing `d` under
/// `N(0, sigma)` with nuisance basis `p`.
///
/// With `n` observations, `m` basis columns, `a = L^-1 d` and
/// `B = L^-1 P` (where `sigma = L L^T`), the closed form is
///
/// ```text
/// ll = -1/2 [ (n - m) ln 2pi + ln|sigma| + ln|B^T B|
///             + a.a - b.b ]          with b = Lm^-1 B^T a,
/// ```
///
/// where `Lm` is the Cholesky factor of `B^T B = P^T sigma^-1 P`.
///
/// # Errors
///
/// Returns [`GpError::NotPositiveDefinite`] when `sigma` or the projected
/// basis Gram matrix cannot be factored, and [`GpError::ShapeMismatch`]
/// when dimensions disagree or `m >= n` leaves no degrees of freedom.
pub fn restricted_log_likelihood(
    d: &Array1<f64>,
    sigma: &Array2<f64>,
    p: &Array2<f64>,
) -> Result<f64, GpError> {
    let n = d.len();
    let m = p.ncols();

    if sigma.dim() != (n, n) || p.nrows() != n {
        return Err(GpError::ShapeMismatch {
            details: format!(
                "data length {n}, covariance {:?}, basis {:?}",
                sigma.dim(),
                p.dim()
            ),
        });
    }
    if m >= n {
        return Err(GpError::ShapeMismatch {
            details: format!("{m} basis columns leave no degrees of freedom for {n} observations"),
        });
    }

    let ln_2pi = (2.0 * std::f64::consts::PI).ln();
    let chol = CholFactor::new(sigma)?;
    let a = chol.whiten_vec(d)?;

    if m == 0 {
        return Ok(-0.5 * (n as f64 * ln_2pi + chol.log_det() + a.dot(&a)));
    }

    let b_mat = chol.whiten_mat(p)?;
    let gram = b_mat.t().dot(&b_mat);
    let chol_gram = CholFactor::new(&gram)?;
    let b = chol_gram.whiten_vec(&b_mat.t().dot(&a))?;

    Ok(-0.5
        * ((n - m) as f64 * ln_2pi
            + chol.log_det()
            + chol_gram.log_det()
            + a.dot(&a)
            - b.dot(&b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const LN_2PI: f64 = 1.8378770664093453;

    #[test]
    fn identity_covariance_no_basis() {
        // ll = -1/2 (n ln 2pi + d.d)
        let d = array![1.0, -2.0, 0.5];
        let sigma = Array2::eye(3);
        let p = Array2::zeros((3, 0));
        let ll = restricted_log_likelihood(&d, &sigma, &p).unwrap();
        let expected = -0.5 * (3.0 * LN_2PI + 5.25);
        assert!(
            (ll - expected).abs() < 1e-12,
            "ll = {ll}, expected = {expected}"
        );
    }

    #[test]
    fn scaled_identity_no_basis() {
        let d = array![1.0, -2.0];
        let sigma = Array2::eye(2) * 4.0;
        let p = Array2::zeros((2, 0));
        let ll = restricted_log_likelihood(&d, &sigma, &p).unwrap();
        let expected = -0.5 * (2.0 * LN_2PI + 2.0 * 4.0_f64.ln() + 5.0 / 4.0);
        assert!((ll - expected).abs() < 1e-12);
    }

    #[test]
    fn constant_basis_marginalization() {
        // Identity covariance with a constant basis column: the closed
        // form reduces to the residual about the mean plus ln n.
        let d = array![1.0, 2.0, 3.0];
        let n = 3.0;
        let sigma = Array2::eye(3);
        let p = Array2::ones((3, 1));
        let ll = restricted_log_likelihood(&d, &sigma, &p).unwrap();

        // a.a = 14, b.b = (sum d)^2 / n = 12, |B^T B| = n.
        let expected = -0.5 * ((n - 1.0) * LN_2PI + n.ln() + 14.0 - 12.0);
        assert!(
            (ll - expected).abs() < 1e-12,
            "ll = {ll}, expected = {expected}"
        );
    }

    #[test]
    fn basis_invariant_to_data_shift_along_basis() {
        // Marginalizing the trend makes the likelihood invariant to
        // adding any multiple of a basis column to the data.
        let d = array![0.3, -0.7, 1.1, 0.2];
        let shifted = d.mapv(|v| v + 42.0);
        let sigma = Array2::eye(4) * 1.7;
        let p = Array2::ones((4, 1));

        let ll = restricted_log_likelihood(&d, &sigma, &p).unwrap();
        let ll_shifted = restricted_log_likelihood(&shifted, &sigma, &p).unwrap();
        assert!(
            (ll - ll_shifted).abs() < 1e-9,
            "ll = {ll}, shifted = {ll_shifted}"
        );
    }

    #[test]
    fn indefinite_covariance_is_err() {
        let d = array![1.0, 1.0];
        let sigma = array![[1.0, 2.0], [2.0, 1.0]];
        let p = Array2::zeros((2, 0));
        let err = restricted_log_likelihood(&d, &sigma, &p).unwrap_err();
        assert!(matches!(err, GpError::NotPositiveDefinite { .. }));
    }

    #[test]
    fn too_many_basis_columns_is_err() {
        let d = array![1.0, 1.0];
        let sigma = Array2::eye(2);
        let p = Array2::ones((2, 2));
        let err = restricted_log_likelihood(&d, &sigma, &p).unwrap_err();
        assert!(matches!(err, GpError::ShapeMismatch { .. }));
    }

    #[test]
    fn shape_mismatch_is_err() {
        let d = array![1.0, 1.0];
        let sigma = Array2::eye(3);
        let p = Array2::zeros((2, 0));
        let err = restricted_log_likelihood(&d, &sigma, &p).unwrap_err();
        assert!(matches!(err, GpError::ShapeMismatch { .. }));
    }

    #[test]
    fn better_scale_has_higher_likelihood() {
        // Data drawn with unit scale: sigma = I should beat sigma = 100 I.
        let d = array![0.5, -0.3, 0.8, -1.1, 0.2];
        let p = Array2::zeros((5, 0));
        let good = restricted_log_likelihood(&d, &Array2::eye(5), &p).unwrap();
        let bad = restricted_log_likelihood(&d, &(Array2::eye(5) * 100.0), &p).unwrap();
        assert!(good > bad);
    }
}
