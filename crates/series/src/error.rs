//! Error types for the tellus-series crate.

/// Error type for all fallible operations in the tellus-series crate.
///
/// Covers validation failures on station records and assembled
/// observation sets.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SeriesError {
    /// Returned when one or more validation checks fail.
    #[error("validation failed with {count} error(s): {details}")]
    Validation {
        /// Number of individual violations found.
        count: usize,
        /// Semicolon-joined description of every violation.
        details: String,
    },

    /// Returned when an observation set is assembled from zero records.
    #[error("no station records supplied")]
    NoRecords,

    /// Returned when records carry incompatible physical units.
    #[error("records disagree on units: {details}")]
    InconsistentUnits {
        /// Description of the disagreeing exponents.
        details: String,
    },
}
