//! Error types for the tellus-gp crate.

/// Error type for all fallible operations in the tellus-gp crate.
///
/// Covers model-registry configuration failures and numerical failures in
/// the dense symmetric factorizations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GpError {
    /// Returned when a model name is not present in the registry.
    #[error("unknown {kind} model \"{name}\"")]
    UnknownModel {
        /// Registry kind: `"network"` or `"station"`.
        kind: &'static str,
        /// The unrecognised model name.
        name: String,
    },

    /// Returned when a parameter vector does not match the total slice
    /// width of the named models.
    #[error("parameter vector for [{models}] has length {got}, expected {expected}")]
    ParameterCount {
        /// Comma-joined model names.
        models: String,
        /// Sum of the per-model parameter counts.
        expected: usize,
        /// Length of the supplied parameter vector.
        got: usize,
    },

    /// Returned when a nonzero differentiation order is requested.
    ///
    /// The order-selection interface exists for forward compatibility;
    /// every current kernel implements order zero only.
    #[error("derivative order {order:?} is not supported (only order zero is implemented)")]
    UnsupportedDerivative {
        /// The requested differentiation orders.
        order: Vec<usize>,
    },

    /// Returned when a covariance matrix fails the Cholesky factorization.
    #[error("covariance matrix of dimension {n} is not positive definite")]
    NotPositiveDefinite {
        /// Matrix dimension.
        n: usize,
    },

    /// Returned when array dimensions are inconsistent.
    #[error("shape mismatch: {details}")]
    ShapeMismatch {
        /// Description of the mismatched shapes.
        details: String,
    },
}
