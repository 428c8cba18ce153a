//! # tellus-gp
//!
//! Composite Gaussian-process construction for station displacement
//! fields: a **network process** (signal correlated across all stations,
//! kernels over flattened (t, x0, x1) coordinates) plus a **station
//! process** (per-station noise and drift, block structured and
//! independent between stations). The two combine additively: total
//! covariance = station blocks + network covariance, total basis =
//! station block columns | network columns.
//!
//! ## Model registries
//!
//! | Registry | Name | Parameters | Basis columns |
//! |----------|------|------------|---------------|
//! | network  | `se-se`  | sigma, tau, ell | 0 |
//! | network  | `exp-se` | sigma, tau, ell | 0 |
//! | station  | `wn`     | sigma           | 0 |
//! | station  | `fogm`   | sigma, tau      | 0 |
//! | station  | `se`     | sigma, tau      | 0 |
//! | station  | `p0`     | —               | 1 |
//! | station  | `p1`     | —               | 2 |
//! | station  | `per`    | —               | 4 |
//!
//! Composites are additive superpositions of the named models, each
//! consuming its own slice of one flat hyperparameter vector.

mod blocks;
mod composite;
mod coords;
mod error;
mod linalg;
mod network;
mod station;

pub use blocks::{StationBlocks, station_covariance_and_basis};
pub use composite::{ModelSpec, NetworkComposite, StationComposite, hstack_basis};
pub use coords::{flatten_grid, gather_rows, gather_values, missing_mask, unmasked_positions};
pub use error::GpError;
pub use linalg::CholFactor;
pub use network::NetworkModel;
pub use station::StationModel;
