//! REML estimation problem specification (unfitted).

use tellus_gp::ModelSpec;
use tellus_series::ObservationSet;

use crate::error::RemlError;
use crate::fit::RemlFit;

/// An unfitted REML estimation problem: a network model, a station model,
/// and the subsets of their hyperparameters to hold fixed.
///
/// Create a spec with [`RemlSpec::new()`], optionally pin parameters with
/// [`with_network_fixed`](Self::with_network_fixed) /
/// [`with_station_fixed`](Self::with_station_fixed), then call
/// [`fit()`](Self::fit) to obtain a [`RemlFit`].
///
/// The supplied parameter vectors double as the optimizer's starting
/// point; every free entry must be strictly positive because the search
/// runs in log space.
#[derive(Debug, Clone)]
pub struct RemlSpec {
    network: ModelSpec,
    network_fixed: Vec<usize>,
    station: ModelSpec,
    station_fixed: Vec<usize>,
}

impl RemlSpec {
    /// Creates a new spec with every hyperparameter free.
    pub fn new(network: ModelSpec, station: ModelSpec) -> Self {
        Self {
            network,
            network_fixed: Vec::new(),
            station,
            station_fixed: Vec::new(),
        }
    }

    /// Holds the given network parameter indices at their supplied
    /// values.
    pub fn with_network_fixed(mut self, fixed: Vec<usize>) -> Self {
        self.network_fixed = fixed;
        self
    }

    /// Holds the given station parameter indices at their supplied
    /// values.
    ///
    /// Indices are into the station parameter vector; the offset by the
    /// network parameter count is applied internally.
    pub fn with_station_fixed(mut self, fixed: Vec<usize>) -> Self {
        self.station_fixed = fixed;
        self
    }

    /// Returns the network model spec.
    pub fn network(&self) -> &ModelSpec {
        &self.network
    }

    /// Returns the fixed network parameter indices.
    pub fn network_fixed(&self) -> &[usize] {
        &self.network_fixed
    }

    /// Returns the station model spec.
    pub fn station(&self) -> &ModelSpec {
        &self.station
    }

    /// Returns the fixed station parameter indices.
    pub fn station_fixed(&self) -> &[usize] {
        &self.station_fixed
    }

    /// Fits the free hyperparameters to an observation set by restricted
    /// maximum likelihood.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`RemlError::Gp`] | unknown model name or parameter-count mismatch |
    /// | [`RemlError::FixedIndexOutOfRange`] | fixed index beyond its vector |
    /// | [`RemlError::DuplicateFixedIndex`] | fixed index listed twice |
    /// | [`RemlError::NonPositiveFreeParameter`] | free start not positive |
    /// | [`RemlError::NoObservations`] | every entry masked |
    /// | [`RemlError::OptimizationFailed`] | optimizer returns no point |
    /// | [`RemlError::Numerical`] | likelihood fails at the optimum |
    pub fn fit(&self, data: &ObservationSet) -> Result<RemlFit, RemlError> {
        crate::optimizer::fit_reml(self, data)
    }
}
