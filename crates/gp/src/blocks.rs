//! Station-process block assembly over the unmasked index space.
//!
//! Each station's temporal covariance is independent of every other
//! station, so the station process over the whole network is block
//! diagonal under a station-major permutation of the time-major unmasked
//! ordering. [`StationBlocks`] stores only the per-station blocks and the
//! unmasked rows they occupy, never materializing the cross-station
//! zeros.

use ndarray::{Array1, Array2};

use crate::composite::StationComposite;
use crate::coords::unmasked_positions;
use crate::error::GpError;

/// Sparse block-diagonal station covariance over the unmasked
/// observations.
#[derive(Debug, Clone)]
pub struct StationBlocks {
    /// Total number of unmasked observations.
    n: usize,
    /// Per-station `(rows, block)` pairs: `rows` are time-major unmasked
    /// flat indices, `block` the covariance over that station's epochs.
    blocks: Vec<(Vec<usize>, Array2<f64>)>,
}

impl StationBlocks {
    /// Returns the dimension of the (square) assembled matrix.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Scatter-adds the blocks into a dense `n x n` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::ShapeMismatch`] when `sigma` is not `n x n`.
    pub fn add_to(&self, sigma: &mut Array2<f64>) -> Result<(), GpError> {
        if sigma.dim() != (self.n, self.n) {
            return Err(GpError::ShapeMismatch {
                details: format!(
                    "target matrix is {:?}, station blocks need ({}, {})",
                    sigma.dim(),
                    self.n,
                    self.n
                ),
            });
        }

        for (rows, block) in &self.blocks {
            for (a, &ia) in rows.iter().enumerate() {
                for (b, &ib) in rows.iter().enumerate() {
                    sigma[[ia, ib]] += block[[a, b]];
                }
            }
        }
        Ok(())
    }

    /// Assembles the blocks into a dense matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut sigma = Array2::zeros((self.n, self.n));
        // Shapes match by construction.
        let _ = self.add_to(&mut sigma);
        sigma
    }
}

/// Evaluates the station process over every station's unmasked epochs.
///
/// Returns the block covariance and the block-column basis matrix.
/// Each station contributes one covariance block over its own unmasked
/// epochs and one group of basis columns that is zero on every other
/// station's rows; stations with no unmasked observations contribute
/// neither (an all-zero basis column would make the trend fit singular).
///
/// # Errors
///
/// Returns [`GpError::UnsupportedDerivative`] from kernel evaluation and
/// [`GpError::ShapeMismatch`] when `mask` has more epochs than `t`.
pub fn station_covariance_and_basis(
    gp: &StationComposite,
    t: &Array1<f64>,
    mask: &Array2<bool>,
) -> Result<(StationBlocks, Array2<f64>), GpError> {
    let (nt, nx) = mask.dim();
    if nt != t.len() {
        return Err(GpError::ShapeMismatch {
            details: format!("mask has {nt} epochs, time array has {}", t.len()),
        });
    }

    let positions = unmasked_positions(mask);
    let n = positions.len();
    let nb = gp.n_basis();

    // Unmasked rows belonging to each station, in time-major order.
    let mut station_rows: Vec<Vec<usize>> = vec![Vec::new(); nx];
    for (row, &(_, j)) in positions.iter().enumerate() {
        station_rows[j].push(row);
    }
    let n_active = station_rows.iter().filter(|rows| !rows.is_empty()).count();

    let mut blocks = Vec::with_capacity(n_active);
    let mut p = Array2::zeros((n, n_active * nb));
    let mut col_offset = 0;

    for rows in station_rows {
        if rows.is_empty() {
            continue;
        }
        let times = Array1::from_iter(rows.iter().map(|&r| t[positions[r].0]));

        let block = gp.covariance(times.view(), times.view(), &[0], &[0])?;
        let basis = gp.basis(times.view(), &[0])?;
        for (a, &row) in rows.iter().enumerate() {
            for c in 0..nb {
                p[[row, col_offset + c]] = basis[[a, c]];
            }
        }

        blocks.push((rows, block));
        col_offset += nb;
    }

    Ok((StationBlocks { n, blocks }, p))
}
