//! Single-component observation set over a station network.

use std::collections::BTreeSet;

use ndarray::{Array1, Array2};

use crate::error::SeriesError;
use crate::record::StationRecord;
use crate::validate::ValidationCollector;

/// One displacement component of a station record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Easting displacement.
    East,
    /// Northing displacement.
    North,
    /// Vertical displacement.
    Vertical,
}

impl Component {
    /// Returns the displacement and standard-deviation arrays of this
    /// component from a record.
    fn arrays<'a>(&self, rec: &'a StationRecord) -> (&'a [f64], &'a [f64]) {
        match self {
            Component::East => (rec.east(), rec.east_std_dev()),
            Component::North => (rec.north(), rec.north_std_dev()),
            Component::Vertical => (rec.vertical(), rec.vertical_std_dev()),
        }
    }
}

/// Observations of one displacement component across a network of stations.
///
/// Holds `Nt` shared epochs, `Nx` station positions, and `Nt x Nx` matrices
/// of displacements `d` and standard deviations `sd`. A standard deviation
/// of `+inf` marks a missing observation at that (epoch, station) pair; the
/// displacement there is NaN. This infinity convention is the only
/// missingness marker — there is no companion mask array.
#[derive(Debug, Clone)]
pub struct ObservationSet {
    /// Observation epochs, strictly ascending (MJD days).
    t: Array1<f64>,
    /// Station positions, one `(x0, x1)` row per station.
    x: Array2<f64>,
    /// Displacements, shape `(Nt, Nx)`.
    d: Array2<f64>,
    /// Standard deviations, shape `(Nt, Nx)`; `+inf` marks a gap.
    sd: Array2<f64>,
}

impl ObservationSet {
    /// Creates a new `ObservationSet` after validating inputs.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if any of the following checks
    /// fail:
    /// - `t` or `x` is empty, or `x` does not have two columns
    /// - `d` and `sd` do not both have shape `(t.len(), x.nrows())`
    /// - `t` is not strictly ascending or contains non-finite values
    /// - Any position coordinate is not finite
    /// - Any `sd` entry is NaN or non-positive (`+inf` is allowed)
    /// - Any `d` entry is non-finite where `sd` is finite
    pub fn new(
        t: Array1<f64>,
        x: Array2<f64>,
        d: Array2<f64>,
        sd: Array2<f64>,
    ) -> Result<Self, SeriesError> {
        let nt = t.len();
        let nx = x.nrows();
        let mut c = ValidationCollector::new();

        if nt == 0 {
            c.push("time array is empty");
        }
        if nx == 0 {
            c.push("position array is empty");
        }
        if x.ncols() != 2 {
            c.push(format!("position array has {} columns, expected 2", x.ncols()));
        }
        if d.dim() != (nt, nx) {
            c.push(format!(
                "displacement shape {:?} != expected ({nt}, {nx})",
                d.dim()
            ));
        }
        if sd.dim() != (nt, nx) {
            c.push(format!(
                "std dev shape {:?} != expected ({nt}, {nx})",
                sd.dim()
            ));
        }
        c.finish()?;

        let mut c = ValidationCollector::new();
        for (i, pair) in t.as_slice().unwrap_or(&[]).windows(2).enumerate() {
            if pair[1] <= pair[0] {
                c.push(format!(
                    "time not strictly ascending at index {}: {} followed by {}",
                    i + 1,
                    pair[0],
                    pair[1],
                ));
            }
        }
        for (i, &val) in t.iter().enumerate() {
            if !val.is_finite() {
                c.push(format!("time is not finite at index {i}: {val}"));
            }
        }
        for (i, row) in x.rows().into_iter().enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                c.push(format!("position {i} is not finite"));
            }
        }
        for ((i, j), &s) in sd.indexed_iter() {
            if s.is_nan() {
                c.push(format!("sd is NaN at ({i}, {j})"));
            } else if s <= 0.0 {
                c.push(format!("sd must be positive at ({i}, {j}): {s}"));
            } else if s.is_finite() && !d[[i, j]].is_finite() {
                c.push(format!(
                    "displacement at ({i}, {j}) is not finite but sd is finite"
                ));
            }
        }
        c.finish()?;

        Ok(Self { t, x, d, sd })
    }

    /// Assembles one component of a set of station records onto the union
    /// time grid.
    ///
    /// Epochs a station never observed become gaps (`d = NaN`, `sd = +inf`);
    /// gaps already present in a record are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::NoRecords`] for an empty record slice,
    /// [`SeriesError::InconsistentUnits`] if records disagree on unit
    /// exponents, and [`SeriesError::Validation`] for duplicate station ids.
    pub fn from_records(
        records: &[StationRecord],
        component: Component,
    ) -> Result<Self, SeriesError> {
        let first = records.first().ok_or(SeriesError::NoRecords)?;

        let mut c = ValidationCollector::new();
        for (i, rec) in records.iter().enumerate() {
            for other in &records[i + 1..] {
                if rec.id() == other.id() {
                    c.push(format!("duplicate station id \"{}\"", rec.id()));
                }
            }
        }
        c.finish()?;

        for rec in records {
            if rec.space_exponent() != first.space_exponent()
                || rec.time_exponent() != first.time_exponent()
            {
                return Err(SeriesError::InconsistentUnits {
                    details: format!(
                        "{} has exponents ({}, {}), {} has ({}, {})",
                        rec.id(),
                        rec.space_exponent(),
                        rec.time_exponent(),
                        first.id(),
                        first.space_exponent(),
                        first.time_exponent(),
                    ),
                });
            }
        }

        // Union of all observation epochs, ascending.
        let epochs: BTreeSet<i64> = records
            .iter()
            .flat_map(|rec| rec.time().iter().copied())
            .collect();
        let epochs: Vec<i64> = epochs.into_iter().collect();
        let nt = epochs.len();
        let nx = records.len();

        let t = Array1::from_iter(epochs.iter().map(|&mjd| mjd as f64));
        let mut x = Array2::zeros((nx, 2));
        let mut d = Array2::from_elem((nt, nx), f64::NAN);
        let mut sd = Array2::from_elem((nt, nx), f64::INFINITY);

        for (j, rec) in records.iter().enumerate() {
            x[[j, 0]] = rec.longitude();
            x[[j, 1]] = rec.latitude();

            let (vals, sds) = component.arrays(rec);
            for (k, &mjd) in rec.time().iter().enumerate() {
                // Epochs are drawn from the union grid, so the lookup
                // cannot fail.
                if let Ok(i) = epochs.binary_search(&mjd) {
                    d[[i, j]] = vals[k];
                    sd[[i, j]] = sds[k];
                }
            }
        }

        Self::new(t, x, d, sd)
    }

    /// Returns the number of epochs `Nt`.
    pub fn nt(&self) -> usize {
        self.t.len()
    }

    /// Returns the number of stations `Nx`.
    pub fn nx(&self) -> usize {
        self.x.nrows()
    }

    /// Returns the observation epochs.
    pub fn t(&self) -> &Array1<f64> {
        &self.t
    }

    /// Returns the station positions, shape `(Nx, 2)`.
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Returns the displacements, shape `(Nt, Nx)`.
    pub fn d(&self) -> &Array2<f64> {
        &self.d
    }

    /// Returns the standard deviations, shape `(Nt, Nx)`.
    pub fn sd(&self) -> &Array2<f64> {
        &self.sd
    }

    /// Returns `true` when the observation at `(epoch, station)` is missing.
    pub fn is_missing(&self, i: usize, j: usize) -> bool {
        self.sd[[i, j]].is_infinite()
    }

    /// Returns the number of missing (epoch, station) pairs.
    pub fn n_missing(&self) -> usize {
        self.sd.iter().filter(|s| s.is_infinite()).count()
    }

    /// Returns the number of observed (epoch, station) pairs.
    pub fn n_observed(&self) -> usize {
        self.nt() * self.nx() - self.n_missing()
    }
}
