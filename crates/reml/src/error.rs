//! Error types for the tellus-reml crate.

use tellus_gp::GpError;

/// Error type for all fallible operations in the tellus-reml crate.
///
/// Covers configuration failures on the parameter space, model-registry
/// errors, and terminal numerical failures. Numerical failures on
/// individual optimizer trial points are recovered internally and never
/// surface as errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemlError {
    /// Returned when a fixed-parameter index is out of range.
    #[error("fixed index {index} is out of range for {len} {part} parameters")]
    FixedIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the parameter vector it indexes.
        len: usize,
        /// Which part: `"network"` or `"station"`.
        part: &'static str,
    },

    /// Returned when a fixed-parameter index is listed more than once.
    #[error("fixed index {index} of the {part} parameters appears more than once")]
    DuplicateFixedIndex {
        /// The duplicated index.
        index: usize,
        /// Which part: `"network"` or `"station"`.
        part: &'static str,
    },

    /// Returned when a free starting value cannot be optimised in log
    /// space.
    #[error("free parameter {index} must be strictly positive, got {value}")]
    NonPositiveFreeParameter {
        /// Index into the concatenated parameter vector.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when every observation in the set is masked.
    #[error("observation set contains no unmasked observations")]
    NoObservations,

    /// Returned when the optimizer terminates without a usable point.
    #[error("optimisation failed to converge")]
    OptimizationFailed,

    /// Returned when the likelihood cannot be evaluated at the optimum.
    ///
    /// Failures at trial points during the search are recovered; a
    /// failure at the accepted optimum indicates an ill-posed model.
    #[error("numerical failure at the optimum: {details}")]
    Numerical {
        /// Description of the failure.
        details: String,
    },

    /// A configuration error from the process builder.
    #[error(transparent)]
    Gp(#[from] GpError),
}
