//! Fitted REML results.

/// Fitted hyperparameters produced by [`RemlSpec::fit()`](crate::RemlSpec::fit).
///
/// Contains the full parameter vectors (fitted free entries merged with
/// the supplied fixed entries) for the network and station processes,
/// plus the restricted log-likelihood achieved at that point.
#[derive(Debug, Clone)]
pub struct RemlFit {
    network_params: Vec<f64>,
    station_params: Vec<f64>,
    log_likelihood: f64,
}

impl RemlFit {
    /// Creates a new `RemlFit` (crate-internal constructor).
    pub(crate) fn new(
        network_params: Vec<f64>,
        station_params: Vec<f64>,
        log_likelihood: f64,
    ) -> Self {
        Self {
            network_params,
            station_params,
            log_likelihood,
        }
    }

    /// Returns the fitted network hyperparameters.
    pub fn network_params(&self) -> &[f64] {
        &self.network_params
    }

    /// Returns the fitted station hyperparameters.
    pub fn station_params(&self) -> &[f64] {
        &self.station_params
    }

    /// Returns the maximised restricted log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }
}
