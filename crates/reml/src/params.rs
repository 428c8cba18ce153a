//! Concatenated network/station hyperparameter space with fixed and free
//! subsets.
//!
//! Network parameters come first, station parameters follow; station
//! fixed indices are offset by the network parameter count. The free
//! subset (complement of the fixed set) is what the optimizer varies.
//!
//! **Not part of the public API.**

use crate::error::RemlError;

/// The concatenated parameter vector and its free-index bookkeeping.
#[derive(Debug)]
pub(crate) struct ParamSpace {
    /// Full concatenated vector: network then station.
    params: Vec<f64>,
    /// Number of leading network parameters.
    n_network: usize,
    /// Indices into `params` that the optimizer varies, ascending.
    free: Vec<usize>,
}

impl ParamSpace {
    /// Builds the parameter space, validating the fixed-index sets.
    ///
    /// Free starting values must be strictly positive because the
    /// optimizer works in log space.
    pub(crate) fn new(
        network_params: &[f64],
        network_fixed: &[usize],
        station_params: &[f64],
        station_fixed: &[usize],
    ) -> Result<Self, RemlError> {
        validate_fixed(network_fixed, network_params.len(), "network")?;
        validate_fixed(station_fixed, station_params.len(), "station")?;

        let n_network = network_params.len();
        let params: Vec<f64> = network_params
            .iter()
            .chain(station_params.iter())
            .copied()
            .collect();

        let mut fixed: Vec<usize> = network_fixed
            .iter()
            .copied()
            .chain(station_fixed.iter().map(|&i| i + n_network))
            .collect();
        fixed.sort_unstable();

        let free: Vec<usize> = (0..params.len()).filter(|i| !fixed.contains(i)).collect();

        for &i in &free {
            if params[i] <= 0.0 || !params[i].is_finite() {
                return Err(RemlError::NonPositiveFreeParameter {
                    index: i,
                    value: params[i],
                });
            }
        }

        Ok(Self {
            params,
            n_network,
            free,
        })
    }

    /// Returns the number of free parameters.
    pub(crate) fn n_free(&self) -> usize {
        self.free.len()
    }

    /// Returns the current values of the free parameters.
    pub(crate) fn free_values(&self) -> Vec<f64> {
        self.free.iter().map(|&i| self.params[i]).collect()
    }

    /// Returns the full vector with the free entries overwritten by
    /// `values`; fixed entries keep their supplied values.
    pub(crate) fn with_free(&self, values: &[f64]) -> Vec<f64> {
        let mut full = self.params.clone();
        for (&i, &v) in self.free.iter().zip(values.iter()) {
            full[i] = v;
        }
        full
    }

    /// Splits a full vector back into (network, station) parts.
    pub(crate) fn split<'a>(&self, full: &'a [f64]) -> (&'a [f64], &'a [f64]) {
        full.split_at(self.n_network)
    }
}

/// Validates one part's fixed-index set: in range, no duplicates.
fn validate_fixed(fixed: &[usize], len: usize, part: &'static str) -> Result<(), RemlError> {
    for (k, &i) in fixed.iter().enumerate() {
        if i >= len {
            return Err(RemlError::FixedIndexOutOfRange {
                index: i,
                len,
                part,
            });
        }
        if fixed[..k].contains(&i) {
            return Err(RemlError::DuplicateFixedIndex { index: i, part });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_split_round_trip() {
        // All parameters free, empty fixed sets: concat then split is the
        // identity.
        let network = [1.0, 2.0, 3.0];
        let station = [4.0, 5.0];
        let space = ParamSpace::new(&network, &[], &station, &[]).unwrap();

        assert_eq!(space.n_free(), 5);
        let full = space.with_free(&space.free_values());
        let (net, sta) = space.split(&full);
        assert_eq!(net, &network);
        assert_eq!(sta, &station);
    }

    #[test]
    fn station_fixed_indices_are_offset() {
        let space = ParamSpace::new(&[1.0, 2.0], &[0], &[3.0, 4.0], &[1]).unwrap();
        // Fixed: network 0 and station 1 (global index 3). Free: 1 and 2.
        assert_eq!(space.n_free(), 2);
        assert_eq!(space.free_values(), vec![2.0, 3.0]);

        let full = space.with_free(&[20.0, 30.0]);
        assert_eq!(full, vec![1.0, 20.0, 30.0, 4.0]);
    }

    #[test]
    fn fixed_entries_keep_supplied_values() {
        let space = ParamSpace::new(&[1.0], &[0], &[-5.0], &[0]).unwrap();
        // Everything fixed: negative supplied values are allowed because
        // nothing is optimised.
        assert_eq!(space.n_free(), 0);
        let full = space.with_free(&[]);
        assert_eq!(full, vec![1.0, -5.0]);
    }

    #[test]
    fn out_of_range_fixed_index() {
        let err = ParamSpace::new(&[1.0], &[1], &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            RemlError::FixedIndexOutOfRange {
                index: 1,
                len: 1,
                part: "network"
            }
        ));
    }

    #[test]
    fn duplicate_fixed_index() {
        let err = ParamSpace::new(&[1.0, 2.0], &[], &[3.0], &[0, 0]).unwrap_err();
        assert!(matches!(
            err,
            RemlError::DuplicateFixedIndex {
                index: 0,
                part: "station"
            }
        ));
    }

    #[test]
    fn non_positive_free_start() {
        let err = ParamSpace::new(&[0.0], &[], &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            RemlError::NonPositiveFreeParameter { index: 0, .. }
        ));
    }

    #[test]
    fn non_positive_fixed_start_is_allowed() {
        // A fixed parameter never enters log space.
        let space = ParamSpace::new(&[-1.0], &[0], &[2.0], &[]).unwrap();
        assert_eq!(space.free_values(), vec![2.0]);
    }
}
