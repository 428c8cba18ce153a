//! Iterative data-editing outlier detection.
//!
//! The statistic is a leave-outliers-out standardized residual: the
//! zero-mean Gaussian process with the supplied covariance and trend
//! basis is fitted to the current inliers (with observation noise on the
//! inlier block), predicted at every unmasked point, and a point is an
//! outlier when its residual, normalized by its own standard deviation,
//! exceeds `tol` times the root-mean-square normalized residual of the
//! inliers. The edit is repeated until the outlier set stops changing.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

use tellus_gp::CholFactor;

use crate::error::AutocleanError;

/// Iteration cap for the edit loop; reaching it is logged, not an error.
const MAX_ITERATIONS: usize = 50;

/// Flags outliers among unmasked observations.
///
/// `d` and `sd` are the unmasked data and standard deviations, `sigma`
/// the prior covariance of signal plus station noise (no observation
/// noise on the diagonal), and `p` the trend basis. Returns flat indices
/// into the unmasked subset, ascending.
///
/// # Errors
///
/// Returns [`AutocleanError::UnderdeterminedFit`] when there are no more
/// observations than basis columns, and propagates factorization
/// failures as [`AutocleanError::Gp`].
pub(crate) fn detect_outliers(
    d: &Array1<f64>,
    sd: &Array1<f64>,
    sigma: &Array2<f64>,
    p: &Array2<f64>,
    tol: f64,
) -> Result<Vec<usize>, AutocleanError> {
    let n = d.len();
    let m = p.ncols();
    if n <= m {
        return Err(AutocleanError::UnderdeterminedFit {
            n_basis: m,
            n_obs: n,
        });
    }

    let mut out = vec![false; n];
    let mut iteration = 0;

    loop {
        let inliers: Vec<usize> = (0..n).filter(|&i| !out[i]).collect();

        let fit = fit_at_all_points(d, sd, sigma, p, &inliers)?;

        // Residuals normalized by each point's own standard deviation,
        // scaled against the inlier rms.
        let res: Vec<f64> = (0..n).map(|i| (fit[i] - d[i]).abs() / sd[i]).collect();
        let rms = (inliers.iter().map(|&i| res[i] * res[i]).sum::<f64>()
            / inliers.len() as f64)
            .sqrt();
        if rms == 0.0 {
            debug!("edit loop: perfect fit after {iteration} iteration(s)");
            break;
        }

        let mut new_out: Vec<bool> = res.iter().map(|&r| r > tol * rms).collect();
        if new_out == out {
            break;
        }

        let n_inliers = new_out.iter().filter(|&&o| !o).count();
        if n_inliers <= m {
            // Degenerate edit (tiny tolerance): keep the m + 1
            // best-fitting points as inliers so the trend stays
            // determined, flag the rest, and stop.
            warn!(
                "edit would leave {n_inliers} inliers for {m} trend columns; \
                 keeping the {} best-fitting points",
                m + 1
            );
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| res[a].total_cmp(&res[b]));
            new_out = vec![true; n];
            for &i in order.iter().take(m + 1) {
                new_out[i] = false;
            }
            out = new_out;
            break;
        }

        out = new_out;
        iteration += 1;
        debug!(
            "edit iteration {iteration}: {} outlier(s)",
            out.iter().filter(|&&o| o).count()
        );
        if iteration == MAX_ITERATIONS {
            warn!("edit loop reached {MAX_ITERATIONS} iterations without converging");
            break;
        }
    }

    Ok((0..n).filter(|&i| out[i]).collect())
}

/// Fits the process to the inlier subset and predicts at all points.
///
/// Solves the basis-augmented Gaussian regression on the inliers:
/// `v2 = (P_i^T K^-1 P_i)^-1 P_i^T K^-1 d_i`, `v1 = K^-1 (d_i - P_i v2)`
/// with `K = sigma[i, i] + diag(sd_i^2)`, then evaluates
/// `fit = sigma[:, i] v1 + P v2`.
fn fit_at_all_points(
    d: &Array1<f64>,
    sd: &Array1<f64>,
    sigma: &Array2<f64>,
    p: &Array2<f64>,
    inliers: &[usize],
) -> Result<Array1<f64>, AutocleanError> {
    let m = p.ncols();

    let d_i = Array1::from_iter(inliers.iter().map(|&i| d[i]));
    let p_i = p.select(Axis(0), inliers);
    let mut k = sigma.select(Axis(0), inliers).select(Axis(1), inliers);
    for (a, &i) in inliers.iter().enumerate() {
        k[[a, a]] += sd[i] * sd[i];
    }

    let chol = CholFactor::new(&k)?;

    let (v1, v2) = if m == 0 {
        (chol.solve_vec(&d_i), Array1::zeros(0))
    } else {
        let k_inv_p = chol.solve_mat(&p_i);
        let gram = p_i.t().dot(&k_inv_p);
        let chol_gram = CholFactor::new(&gram)?;
        let v2 = chol_gram.solve_vec(&p_i.t().dot(&chol.solve_vec(&d_i)));
        let v1 = chol.solve_vec(&(&d_i - &p_i.dot(&v2)));
        (v1, v2)
    };

    let sigma_cols = sigma.select(Axis(1), inliers);
    let mut fit = sigma_cols.dot(&v1);
    if m > 0 {
        fit += &p.dot(&v2);
    }
    Ok(fit)
}
