//! Three-component station network bundle.

use ndarray::{Array1, Array2, Array3, Axis, stack};

use crate::error::SeriesError;
use crate::record::StationRecord;
use crate::set::{Component, ObservationSet};

/// All three displacement components for one network of stations, on a
/// shared time grid.
///
/// This is the shape consumed by interactive viewers: displacements as an
/// `(Nt, Nx, 3)` array in (east, north, vertical) component order, with
/// NaN displacements and infinite standard deviations at gaps.
#[derive(Debug, Clone)]
pub struct StationNetwork {
    /// Station identifiers, parallel to the station axis.
    ids: Vec<String>,
    /// Easting observations.
    east: ObservationSet,
    /// Northing observations.
    north: ObservationSet,
    /// Vertical observations.
    vertical: ObservationSet,
    /// Exponent of the spatial unit shared by all records.
    space_exponent: i32,
    /// Exponent of the temporal unit shared by all records.
    time_exponent: i32,
}

impl StationNetwork {
    /// Assembles all three components of a set of station records onto the
    /// union time grid.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`ObservationSet::from_records`].
    pub fn from_records(records: &[StationRecord]) -> Result<Self, SeriesError> {
        let first = records.first().ok_or(SeriesError::NoRecords)?;
        let space_exponent = first.space_exponent();
        let time_exponent = first.time_exponent();

        Ok(Self {
            ids: records.iter().map(|rec| rec.id().to_string()).collect(),
            east: ObservationSet::from_records(records, Component::East)?,
            north: ObservationSet::from_records(records, Component::North)?,
            vertical: ObservationSet::from_records(records, Component::Vertical)?,
            space_exponent,
            time_exponent,
        })
    }

    /// Returns the station identifiers.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Returns the shared observation epochs.
    pub fn t(&self) -> &Array1<f64> {
        self.east.t()
    }

    /// Returns the station positions, shape `(Nx, 2)`.
    pub fn x(&self) -> &Array2<f64> {
        self.east.x()
    }

    /// Returns the easting observations.
    pub fn east(&self) -> &ObservationSet {
        &self.east
    }

    /// Returns the northing observations.
    pub fn north(&self) -> &ObservationSet {
        &self.north
    }

    /// Returns the vertical observations.
    pub fn vertical(&self) -> &ObservationSet {
        &self.vertical
    }

    /// Returns one component of the network.
    pub fn component(&self, component: Component) -> &ObservationSet {
        match component {
            Component::East => &self.east,
            Component::North => &self.north,
            Component::Vertical => &self.vertical,
        }
    }

    /// Returns the exponent of the spatial unit.
    pub fn space_exponent(&self) -> i32 {
        self.space_exponent
    }

    /// Returns the exponent of the temporal unit.
    pub fn time_exponent(&self) -> i32 {
        self.time_exponent
    }

    /// Returns displacements stacked as `(Nt, Nx, 3)` in (east, north,
    /// vertical) order. Gaps are NaN.
    pub fn displacements(&self) -> Array3<f64> {
        // All three components share one (Nt, Nx) grid by construction.
        stack(
            Axis(2),
            &[
                self.east.d().view(),
                self.north.d().view(),
                self.vertical.d().view(),
            ],
        )
        .unwrap()
    }

    /// Returns standard deviations stacked as `(Nt, Nx, 3)` in (east,
    /// north, vertical) order. Gaps are `+inf`.
    pub fn std_devs(&self) -> Array3<f64> {
        stack(
            Axis(2),
            &[
                self.east.sd().view(),
                self.north.sd().view(),
                self.vertical.sd().view(),
            ],
        )
        .unwrap()
    }
}
