//! Nelder-Mead optimizer for REML hyperparameter estimation.
//!
//! Wraps the `argmin` crate to minimize the negative restricted
//! log-likelihood over log-transformed free hyperparameters. The log
//! transform enforces positivity without explicit box constraints: the
//! simplex explores `theta = ln(param)` unconstrained and the result is
//! exponentiated back.
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor};
use argmin::solver::neldermead::NelderMead;
use ndarray::{Array1, Array2};
use tracing::{debug, info, warn};

use tellus_gp::{
    GpError, NetworkComposite, NetworkModel, StationComposite, StationModel, flatten_grid,
    gather_rows, gather_values, hstack_basis, missing_mask, station_covariance_and_basis,
    unmasked_positions,
};
use tellus_series::ObservationSet;

use crate::error::RemlError;
use crate::fit::RemlFit;
use crate::likelihood::restricted_log_likelihood;
use crate::params::ParamSpace;
use crate::spec::RemlSpec;

/// Simplex step in log space: each non-origin vertex perturbs one free
/// parameter by a quarter e-fold.
const SIMPLEX_STEP: f64 = 0.25;

/// Differentiation orders: values, not derivatives.
const DIFF_NETWORK: [usize; 3] = [0, 0, 0];

/// Fits REML hyperparameters to an observation set.
///
/// This is the full pipeline:
/// 1. Resolve models and validate the configuration
/// 2. Flatten coordinates, gather unmasked observations
/// 3. Optimize the restricted log-likelihood over log-free-parameters
///    via Nelder-Mead
/// 4. Re-evaluate at the optimum (failures here are fatal)
pub(crate) fn fit_reml(spec: &RemlSpec, data: &ObservationSet) -> Result<RemlFit, RemlError> {
    // 1. Resolve the registries and check the parameter slices up front,
    // so configuration errors surface before any optimization.
    let network_models = NetworkComposite::resolve_models(spec.network())?;
    let station_models = StationComposite::resolve_models(spec.station())?;
    NetworkComposite::new(&network_models, spec.network().params())?;
    StationComposite::new(&station_models, spec.station().params())?;

    let space = ParamSpace::new(
        spec.network().params(),
        spec.network_fixed(),
        spec.station().params(),
        spec.station_fixed(),
    )?;

    // 2. Flatten the (time, station) grid and gather unmasked entries.
    let mask = missing_mask(data.sd());
    let positions = unmasked_positions(&mask);
    if positions.is_empty() {
        return Err(RemlError::NoObservations);
    }
    let z = flatten_grid(data.t(), data.x());
    let problem = RemlProblem {
        network_models,
        station_models,
        t: data.t().clone(),
        mask,
        zu: gather_rows(&z, &positions, data.nx()),
        d: gather_values(data.d(), &positions),
        sd: gather_values(data.sd(), &positions),
    };

    // 3. Nothing free: a single evaluation, and failure is fatal.
    if space.n_free() == 0 {
        let full = space.with_free(&[]);
        let (net, sta) = space.split(&full);
        let ll = problem.log_likelihood(net, sta).map_err(fatal)?;
        return Ok(RemlFit::new(net.to_vec(), sta.to_vec(), ll));
    }

    // 4. Build the simplex around the log of the starting point.
    let x0: Vec<f64> = space.free_values().iter().map(|v| v.ln()).collect();
    let dim = x0.len();
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(x0.clone());
    for i in 0..dim {
        let mut vertex = x0.clone();
        vertex[i] += SIMPLEX_STEP;
        simplex.push(vertex);
    }

    // 5. Run Nelder-Mead on the negated objective.
    let cost = RemlCost {
        problem: &problem,
        space: &space,
    };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(1e-8)
        .map_err(|_| RemlError::OptimizationFailed)?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(1000))
        .run()
        .map_err(|_| RemlError::OptimizationFailed)?;

    let best_theta = result
        .state()
        .best_param
        .as_ref()
        .ok_or(RemlError::OptimizationFailed)?;

    // 6. Exponentiate back and re-evaluate at the optimum. A numerical
    // failure here means the accepted point is unusable, which is an
    // error rather than an explorable trial.
    let opt: Vec<f64> = best_theta.iter().map(|t| t.exp()).collect();
    let full = space.with_free(&opt);
    let (net, sta) = space.split(&full);
    let ll = problem.log_likelihood(net, sta).map_err(fatal)?;
    if !ll.is_finite() {
        return Err(RemlError::Numerical {
            details: format!("log likelihood at the optimum is {ll}"),
        });
    }

    info!(
        "optimal hyperparameters: network {:?}, station {:?}, log likelihood {:.8e}",
        net, sta, ll
    );
    Ok(RemlFit::new(net.to_vec(), sta.to_vec(), ll))
}

/// Maps a terminal evaluation failure into [`RemlError::Numerical`].
fn fatal(err: GpError) -> RemlError {
    RemlError::Numerical {
        details: err.to_string(),
    }
}

/// The fixed data of one REML problem: resolved models plus the gathered
/// unmasked observations.
struct RemlProblem {
    network_models: Vec<NetworkModel>,
    station_models: Vec<StationModel>,
    /// Shared observation epochs.
    t: Array1<f64>,
    /// Missingness mask over the full (Nt, Nx) grid.
    mask: Array2<bool>,
    /// Unmasked flattened coordinates, `(n, 3)`.
    zu: Array2<f64>,
    /// Unmasked displacements.
    d: Array1<f64>,
    /// Unmasked standard deviations.
    sd: Array1<f64>,
}

impl RemlProblem {
    /// Builds the combined covariance and basis for one parameter vector
    /// and evaluates the restricted log-likelihood.
    fn log_likelihood(&self, net_params: &[f64], sta_params: &[f64]) -> Result<f64, GpError> {
        let net_gp = NetworkComposite::new(&self.network_models, net_params)?;
        let sta_gp = StationComposite::new(&self.station_models, sta_params)?;

        // Station process: block covariance plus block basis columns.
        let (sta_blocks, sta_p) = station_covariance_and_basis(&sta_gp, &self.t, &self.mask)?;

        // Total covariance: network + station blocks + observation noise.
        let mut sigma =
            net_gp.covariance(self.zu.view(), self.zu.view(), &DIFF_NETWORK, &DIFF_NETWORK)?;
        sta_blocks.add_to(&mut sigma)?;
        for (i, &s) in self.sd.iter().enumerate() {
            sigma[[i, i]] += s * s;
        }

        let net_p = net_gp.basis(self.zu.view(), &DIFF_NETWORK)?;
        let p = hstack_basis(self.d.len(), &[sta_p, net_p])?;

        restricted_log_likelihood(&self.d, &sigma, &p)
    }
}

/// Cost function for argmin: negative restricted log-likelihood over
/// log-transformed free parameters.
struct RemlCost<'a> {
    problem: &'a RemlProblem,
    space: &'a ParamSpace,
}

impl CostFunction for RemlCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let free: Vec<f64> = theta.iter().map(|t| t.exp()).collect();
        let full = self.space.with_free(&free);
        let (net, sta) = self.space.split(&full);

        match self.problem.log_likelihood(net, sta) {
            Ok(ll) if ll.is_finite() => {
                debug!("trial hyperparameters {free:?}: log likelihood {ll:.8e}");
                Ok(-ll)
            }
            Ok(ll) => {
                warn!("trial hyperparameters {free:?}: non-finite log likelihood {ll}");
                Ok(f64::MAX)
            }
            Err(err) => {
                // Recovered: an indefinite covariance at a trial point
                // steers the simplex away instead of aborting the fit.
                warn!("trial hyperparameters {free:?}: {err}");
                Ok(f64::MAX)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tellus_gp::ModelSpec;

    fn flat_set(nt: usize, nx: usize, d: Array2<f64>, sd: Array2<f64>) -> ObservationSet {
        let t = Array1::from_iter((0..nt).map(|i| i as f64));
        let x = Array2::from_shape_fn((nx, 2), |(j, c)| if c == 0 { j as f64 } else { 0.0 });
        ObservationSet::new(t, x, d, sd).unwrap()
    }

    #[test]
    fn all_fixed_is_single_evaluation() {
        let d = array![[0.1, -0.2], [0.0, 0.3], [0.2, -0.1]];
        let sd = Array2::from_elem((3, 2), 1.0);
        let data = flat_set(3, 2, d, sd);

        let spec = RemlSpec::new(
            ModelSpec::new(["se-se"], vec![1.0, 1.0, 1.0]),
            ModelSpec::new(["wn"], vec![0.5]),
        )
        .with_network_fixed(vec![0, 1, 2])
        .with_station_fixed(vec![0]);

        let fit = fit_reml(&spec, &data).unwrap();
        assert_eq!(fit.network_params(), &[1.0, 1.0, 1.0]);
        assert_eq!(fit.station_params(), &[0.5]);
        assert!(fit.log_likelihood().is_finite());
    }

    #[test]
    fn no_observations_is_err() {
        let d = Array2::from_elem((2, 1), f64::NAN);
        let sd = Array2::from_elem((2, 1), f64::INFINITY);
        let data = flat_set(2, 1, d, sd);

        let spec = RemlSpec::new(
            ModelSpec::new(["se-se"], vec![1.0, 1.0, 1.0]),
            ModelSpec::new(["wn"], vec![0.5]),
        );
        let err = fit_reml(&spec, &data).unwrap_err();
        assert!(matches!(err, RemlError::NoObservations));
    }

    #[test]
    fn unknown_model_is_err_before_optimization() {
        let d = array![[0.1]];
        let sd = array![[1.0]];
        let data = flat_set(1, 1, d, sd);

        let spec = RemlSpec::new(
            ModelSpec::new(["se-matern"], vec![1.0]),
            ModelSpec::new(["wn"], vec![0.5]),
        );
        let err = fit_reml(&spec, &data).unwrap_err();
        assert!(matches!(err, RemlError::Gp(GpError::UnknownModel { .. })));
    }
}
