//! Flattened spatiotemporal coordinates and the missingness mask.
//!
//! Kernel evaluation operates on a flat list of (t, x0, x1) coordinates
//! built from the outer product of the time grid and the station
//! positions, raveled in time-major order: flat index
//! `i = time_idx * Nx + station_idx`. The same ordering is used for the
//! unmasked-observation gather, so flat indices into the unmasked subset
//! can be mapped back to (epoch, station) pairs.

use ndarray::{Array1, Array2};

/// Builds the flat `(Nt * Nx, 3)` coordinate array from `Nt` times and
/// `Nx` station positions, time-major.
pub fn flatten_grid(t: &Array1<f64>, x: &Array2<f64>) -> Array2<f64> {
    let nt = t.len();
    let nx = x.nrows();
    let mut z = Array2::zeros((nt * nx, 3));
    for i in 0..nt {
        for j in 0..nx {
            let row = i * nx + j;
            z[[row, 0]] = t[i];
            z[[row, 1]] = x[[j, 0]];
            z[[row, 2]] = x[[j, 1]];
        }
    }
    z
}

/// Returns the missingness mask: `true` where `sd` is infinite.
pub fn missing_mask(sd: &Array2<f64>) -> Array2<bool> {
    sd.mapv(|s| s.is_infinite())
}

/// Returns the (epoch, station) pairs of unmasked entries in time-major
/// order.
///
/// The position of a pair in the returned vector is its flat index into
/// the unmasked subset; indexing into the vector is the inverse of the
/// unmasked-coordinate gather.
pub fn unmasked_positions(mask: &Array2<bool>) -> Vec<(usize, usize)> {
    let mut positions = Vec::new();
    for ((i, j), &missing) in mask.indexed_iter() {
        if !missing {
            positions.push((i, j));
        }
    }
    positions
}

/// Gathers the rows of `z` at the flat grid indices of `positions`.
///
/// `nx` is the number of stations, fixing the time-major flat index
/// `i * nx + j` of each (epoch, station) pair.
pub fn gather_rows(z: &Array2<f64>, positions: &[(usize, usize)], nx: usize) -> Array2<f64> {
    let mut out = Array2::zeros((positions.len(), z.ncols()));
    for (row, &(i, j)) in positions.iter().enumerate() {
        out.row_mut(row).assign(&z.row(i * nx + j));
    }
    out
}

/// Gathers the entries of a `(Nt, Nx)` matrix at `positions` into a flat
/// vector.
pub fn gather_values(m: &Array2<f64>, positions: &[(usize, usize)]) -> Array1<f64> {
    Array1::from_iter(positions.iter().map(|&(i, j)| m[[i, j]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn flatten_grid_time_major() {
        let t = array![10.0, 20.0];
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let z = flatten_grid(&t, &x);

        assert_eq!(z.dim(), (6, 3));
        // Flat index i = time_idx * Nx + station_idx.
        assert_eq!(z.row(0).to_vec(), vec![10.0, 1.0, 2.0]);
        assert_eq!(z.row(2).to_vec(), vec![10.0, 5.0, 6.0]);
        assert_eq!(z.row(3).to_vec(), vec![20.0, 1.0, 2.0]);
        assert_eq!(z.row(5).to_vec(), vec![20.0, 5.0, 6.0]);
    }

    #[test]
    fn missing_mask_marks_infinite() {
        let sd = array![[1.0, f64::INFINITY], [0.5, 2.0]];
        let mask = missing_mask(&sd);
        assert!(!mask[[0, 0]]);
        assert!(mask[[0, 1]]);
        assert!(!mask[[1, 0]]);
    }

    #[test]
    fn unmasked_positions_time_major_order() {
        let sd = array![[1.0, f64::INFINITY], [0.5, 2.0]];
        let mask = missing_mask(&sd);
        let positions = unmasked_positions(&mask);
        assert_eq!(positions, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn gather_rows_follows_positions() {
        let t = array![10.0, 20.0];
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let z = flatten_grid(&t, &x);
        let zu = gather_rows(&z, &[(0, 1), (1, 0)], 2);

        assert_eq!(zu.dim(), (2, 3));
        assert_eq!(zu.row(0).to_vec(), vec![10.0, 3.0, 4.0]);
        assert_eq!(zu.row(1).to_vec(), vec![20.0, 1.0, 2.0]);
    }

    #[test]
    fn gather_values_follows_positions() {
        let d = array![[1.0, 2.0], [3.0, 4.0]];
        let v = gather_values(&d, &[(0, 0), (1, 1)]);
        assert_eq!(v.to_vec(), vec![1.0, 4.0]);
    }
}
