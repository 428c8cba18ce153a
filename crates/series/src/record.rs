//! Single-station displacement record.

use crate::error::SeriesError;
use crate::validate;

/// Displacement time series for a single GPS station, as produced by a
/// file-format parser.
///
/// Times are Modified Julian Date day numbers. Displacements and standard
/// deviations are in units of `meters^space_exponent * days^time_exponent`;
/// unit harmonisation across records is the caller's responsibility. A
/// standard deviation of `+inf` marks a missing observation at that epoch.
#[derive(Debug, Clone)]
pub struct StationRecord {
    /// Station identifier (e.g. a 4-character code).
    id: String,
    /// Station longitude in degrees east.
    longitude: f64,
    /// Station latitude in degrees north.
    latitude: f64,
    /// Observation epochs in Modified Julian Date, strictly ascending.
    time: Vec<i64>,
    /// Easting displacements.
    east: Vec<f64>,
    /// Northing displacements.
    north: Vec<f64>,
    /// Vertical displacements.
    vertical: Vec<f64>,
    /// Easting standard deviations.
    east_std_dev: Vec<f64>,
    /// Northing standard deviations.
    north_std_dev: Vec<f64>,
    /// Vertical standard deviations.
    vertical_std_dev: Vec<f64>,
    /// Exponent of the spatial unit (meters).
    space_exponent: i32,
    /// Exponent of the temporal unit (days).
    time_exponent: i32,
}

impl StationRecord {
    /// Creates a new `StationRecord` after validating inputs.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if any of the following checks
    /// fail:
    /// - Array lengths do not match the time array
    /// - Epochs are not strictly ascending
    /// - Longitude or latitude is not finite
    /// - Any standard deviation is NaN or non-positive (`+inf` is allowed)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        longitude: f64,
        latitude: f64,
        time: Vec<i64>,
        east: Vec<f64>,
        north: Vec<f64>,
        vertical: Vec<f64>,
        east_std_dev: Vec<f64>,
        north_std_dev: Vec<f64>,
        vertical_std_dev: Vec<f64>,
        space_exponent: i32,
        time_exponent: i32,
    ) -> Result<Self, SeriesError> {
        let id = id.into();

        let mut c = validate::validate_lengths(
            time.len(),
            &[
                ("east", east.len()),
                ("north", north.len()),
                ("vertical", vertical.len()),
                ("east_std_dev", east_std_dev.len()),
                ("north_std_dev", north_std_dev.len()),
                ("vertical_std_dev", vertical_std_dev.len()),
            ],
        );

        if !longitude.is_finite() {
            c.push(format!("longitude is not finite: {longitude}"));
        }
        if !latitude.is_finite() {
            c.push(format!("latitude is not finite: {latitude}"));
        }
        c.finish()?;

        validate::validate_time_ascending(&time).finish()?;
        validate::validate_std_devs("east_std_dev", &east_std_dev).finish()?;
        validate::validate_std_devs("north_std_dev", &north_std_dev).finish()?;
        validate::validate_std_devs("vertical_std_dev", &vertical_std_dev).finish()?;

        Ok(Self {
            id,
            longitude,
            latitude,
            time,
            east,
            north,
            vertical,
            east_std_dev,
            north_std_dev,
            vertical_std_dev,
            space_exponent,
            time_exponent,
        })
    }

    /// Returns the station identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the station longitude in degrees east.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the station latitude in degrees north.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the observation epochs in Modified Julian Date.
    pub fn time(&self) -> &[i64] {
        &self.time
    }

    /// Returns the easting displacements.
    pub fn east(&self) -> &[f64] {
        &self.east
    }

    /// Returns the northing displacements.
    pub fn north(&self) -> &[f64] {
        &self.north
    }

    /// Returns the vertical displacements.
    pub fn vertical(&self) -> &[f64] {
        &self.vertical
    }

    /// Returns the easting standard deviations.
    pub fn east_std_dev(&self) -> &[f64] {
        &self.east_std_dev
    }

    /// Returns the northing standard deviations.
    pub fn north_std_dev(&self) -> &[f64] {
        &self.north_std_dev
    }

    /// Returns the vertical standard deviations.
    pub fn vertical_std_dev(&self) -> &[f64] {
        &self.vertical_std_dev
    }

    /// Returns the exponent of the spatial unit.
    pub fn space_exponent(&self) -> i32 {
        self.space_exponent
    }

    /// Returns the exponent of the temporal unit.
    pub fn time_exponent(&self) -> i32 {
        self.time_exponent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> StationRecord {
        StationRecord::new(
            "ABCD",
            -84.0,
            43.0,
            vec![55000, 55001, 55002],
            vec![0.001, 0.002, 0.003],
            vec![-0.001, 0.0, 0.001],
            vec![0.01, f64::NAN, 0.0],
            vec![0.001, 0.001, 0.001],
            vec![0.001, 0.001, 0.001],
            vec![0.003, f64::INFINITY, 0.003],
            1,
            0,
        )
        .unwrap()
    }

    #[test]
    fn record_round_trip() {
        let rec = valid_record();
        assert_eq!(rec.id(), "ABCD");
        assert_eq!(rec.longitude(), -84.0);
        assert_eq!(rec.latitude(), 43.0);
        assert_eq!(rec.time(), &[55000, 55001, 55002]);
        assert_eq!(rec.east(), &[0.001, 0.002, 0.003]);
        assert_eq!(rec.space_exponent(), 1);
        assert_eq!(rec.time_exponent(), 0);
    }

    #[test]
    fn record_allows_missing_marker() {
        // NaN displacement paired with infinite std dev is a valid gap.
        let rec = valid_record();
        assert!(rec.vertical()[1].is_nan());
        assert!(rec.vertical_std_dev()[1].is_infinite());
    }

    #[test]
    fn record_length_mismatch() {
        let err = StationRecord::new(
            "ABCD",
            0.0,
            0.0,
            vec![55000, 55001],
            vec![0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            1,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::Validation { .. }));
        assert!(err.to_string().contains("east length 1 != time length 2"));
    }

    #[test]
    fn record_time_not_ascending() {
        let err = StationRecord::new(
            "ABCD",
            0.0,
            0.0,
            vec![55001, 55000],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            1,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::Validation { .. }));
    }

    #[test]
    fn record_non_finite_position() {
        let err = StationRecord::new(
            "ABCD",
            f64::NAN,
            0.0,
            vec![55000],
            vec![0.0],
            vec![0.0],
            vec![0.0],
            vec![1.0],
            vec![1.0],
            vec![1.0],
            1,
            0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("longitude is not finite"));
    }

    #[test]
    fn record_negative_std_dev() {
        let err = StationRecord::new(
            "ABCD",
            0.0,
            0.0,
            vec![55000],
            vec![0.0],
            vec![0.0],
            vec![0.0],
            vec![-1.0],
            vec![1.0],
            vec![1.0],
            1,
            0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("east_std_dev must be positive"));
    }
}
