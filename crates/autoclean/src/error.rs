//! Error types for the tellus-autoclean crate.

use tellus_gp::GpError;
use tellus_series::SeriesError;

/// Error type for all fallible operations in the tellus-autoclean crate.
///
/// Unlike the REML objective, autoclean has no explorable trial points:
/// any covariance construction or factorization failure here indicates an
/// ill-posed model configuration and propagates to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AutocleanError {
    /// Returned when the trend fit is underdetermined from the start.
    #[error("cannot fit trend: {n_basis} basis columns with only {n_obs} unmasked observations")]
    UnderdeterminedFit {
        /// Number of basis columns.
        n_basis: usize,
        /// Number of unmasked observations.
        n_obs: usize,
    },

    /// A configuration or factorization error from the process builder.
    #[error(transparent)]
    Gp(#[from] GpError),

    /// A validation error while rebuilding the cleaned observation set.
    #[error(transparent)]
    Series(#[from] SeriesError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_underdetermined_fit() {
        let err = AutocleanError::UnderdeterminedFit {
            n_basis: 4,
            n_obs: 3,
        };
        assert_eq!(
            err.to_string(),
            "cannot fit trend: 4 basis columns with only 3 unmasked observations"
        );
    }

    #[test]
    fn error_from_gp() {
        let err: AutocleanError = GpError::NotPositiveDefinite { n: 5 }.into();
        assert!(err.to_string().contains("not positive definite"));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<AutocleanError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<AutocleanError>();
    }
}
