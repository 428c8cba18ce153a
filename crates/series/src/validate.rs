//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`SeriesError::Validation`], plus standalone helpers that
//! check common invariants on displacement data arrays.

use crate::error::SeriesError;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`SeriesError::Validation`].
///
/// Create a collector, push zero or more error messages, then call
/// [`finish`](Self::finish) to obtain `Ok(())` when everything is valid or a
/// single `Err` that summarises every violation.
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns `true` when no errors have been recorded.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(SeriesError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), SeriesError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SeriesError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Standalone validation helpers
// ---------------------------------------------------------------------------

/// Check that every array in `lengths` matches `time_len`.
///
/// Each entry pairs an array name with its length.
pub(crate) fn validate_lengths(time_len: usize, lengths: &[(&str, usize)]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for &(name, len) in lengths {
        if len != time_len {
            c.push(format!("{name} length {len} != time length {time_len}"));
        }
    }

    c
}

/// Check that observation epochs are strictly ascending.
///
/// Records one message per out-of-order pair.
pub(crate) fn validate_time_ascending(time: &[i64]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, pair) in time.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            c.push(format!(
                "time not strictly ascending at index {}: {} followed by {}",
                i + 1,
                pair[0],
                pair[1],
            ));
        }
    }

    c
}

/// Check that every standard deviation is strictly positive or `+inf`.
///
/// A standard deviation of `+inf` marks a missing observation; anything
/// else must be a positive finite value. NaN and non-positive values are
/// violations.
pub(crate) fn validate_std_devs(name: &str, sd: &[f64]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, &val) in sd.iter().enumerate() {
        if val.is_nan() {
            c.push(format!("{name} is NaN at index {i}"));
        } else if val <= 0.0 {
            c.push(format!("{name} must be positive at index {i}: {val}"));
        }
    }

    c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
