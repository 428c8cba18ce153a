//! Tellus series: data model for GPS station displacement time series.
//!
//! Station records parsed from heterogeneous file formats are assembled
//! onto a shared time grid as [`ObservationSet`]s (one displacement
//! component at a time) or a three-component [`StationNetwork`]. Missing
//! observations are marked by an infinite standard deviation paired with a
//! NaN displacement; downstream modelling crates rely on exactly this
//! convention.

mod error;
mod network;
mod record;
mod set;

pub(crate) mod validate;

pub use error::SeriesError;
pub use network::StationNetwork;
pub use record::StationRecord;
pub use set::{Component, ObservationSet};
