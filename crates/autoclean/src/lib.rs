//! # tellus-autoclean
//!
//! Data-editing outlier detection for station displacement time series.
//!
//! Given a composite network/station Gaussian process with **fixed**
//! hyperparameters (typically the output of a REML fit), autoclean flags
//! observations that are abnormally inconsistent with the process and
//! masks them: the returned observation set is a copy of the input with
//! `d = NaN` and `sd = +inf` at every flagged (epoch, station) position.
//! Already-missing entries are never re-flagged and the input is never
//! mutated.
//!
//! ```ignore
//! let spec = AutocleanSpec::new(
//!     ModelSpec::new(["se-se"], vec![1.0, 30.0, 100.0]),
//!     ModelSpec::new(["fogm", "p1"], vec![0.5, 50.0]),
//!     3.0,
//! );
//! let cleaned = spec.run(&observations)?;
//! ```

mod error;
mod outliers;

pub use error::AutocleanError;

use tracing::{info, warn};

use tellus_gp::{
    ModelSpec, NetworkComposite, StationComposite, flatten_grid, gather_rows, gather_values,
    hstack_basis, missing_mask, station_covariance_and_basis, unmasked_positions,
};
use tellus_series::ObservationSet;

/// Differentiation orders: values, not derivatives.
const DIFF_NETWORK: [usize; 3] = [0, 0, 0];

/// An outlier-editing problem: a network model, a station model, and the
/// rejection tolerance.
///
/// `tol` scales the rejection threshold of the standardized-residual
/// test; larger values are more permissive. A non-positive `tol`
/// disables editing entirely.
#[derive(Debug, Clone)]
pub struct AutocleanSpec {
    network: ModelSpec,
    station: ModelSpec,
    tol: f64,
}

impl AutocleanSpec {
    /// Creates a new `AutocleanSpec`.
    pub fn new(network: ModelSpec, station: ModelSpec, tol: f64) -> Self {
        Self {
            network,
            station,
            tol,
        }
    }

    /// Returns the network model spec.
    pub fn network(&self) -> &ModelSpec {
        &self.network
    }

    /// Returns the station model spec.
    pub fn station(&self) -> &ModelSpec {
        &self.station
    }

    /// Returns the rejection tolerance.
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Returns a cleaned copy of the observation set.
    ///
    /// Hyperparameters are used exactly as supplied — they are never
    /// optimized here. The combined covariance for detection is the
    /// station blocks plus the network covariance; observation noise is
    /// handled separately inside the detector through `sd`.
    ///
    /// # Errors
    ///
    /// Returns [`AutocleanError::Gp`] for unknown models,
    /// parameter-count mismatches, or factorization failures (all fatal
    /// here, unlike REML trial points), and
    /// [`AutocleanError::UnderdeterminedFit`] when the trend basis has as
    /// many columns as there are unmasked observations.
    pub fn run(&self, data: &ObservationSet) -> Result<ObservationSet, AutocleanError> {
        if self.tol <= 0.0 {
            warn!("tolerance {} disables outlier editing", self.tol);
            return Ok(data.clone());
        }

        let net_gp = NetworkComposite::from_spec(&self.network)?;
        let sta_gp = StationComposite::from_spec(&self.station)?;

        let mask = missing_mask(data.sd());
        let positions = unmasked_positions(&mask);
        if positions.is_empty() {
            return Ok(data.clone());
        }

        let z = flatten_grid(data.t(), data.x());
        let zu = gather_rows(&z, &positions, data.nx());
        let du = gather_values(data.d(), &positions);
        let sdu = gather_values(data.sd(), &positions);

        // Combined prior covariance and trend basis over the unmasked
        // observations.
        let (sta_blocks, sta_p) = station_covariance_and_basis(&sta_gp, data.t(), &mask)?;
        let mut sigma = net_gp.covariance(zu.view(), zu.view(), &DIFF_NETWORK, &DIFF_NETWORK)?;
        sta_blocks.add_to(&mut sigma)?;
        let net_p = net_gp.basis(zu.view(), &DIFF_NETWORK)?;
        let p = hstack_basis(du.len(), &[sta_p, net_p])?;

        let flagged = outliers::detect_outliers(&du, &sdu, &sigma, &p, self.tol)?;
        info!(
            "flagged {} of {} unmasked observations",
            flagged.len(),
            positions.len()
        );

        // Map flat unmasked indices back to (epoch, station) positions
        // and mask them in copies of the input arrays.
        let mut d = data.d().clone();
        let mut sd = data.sd().clone();
        for &k in &flagged {
            let (i, j) = positions[k];
            d[[i, j]] = f64::NAN;
            sd[[i, j]] = f64::INFINITY;
        }

        Ok(ObservationSet::new(
            data.t().clone(),
            data.x().clone(),
            d,
            sd,
        )?)
    }
}
