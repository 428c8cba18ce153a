//! Integration tests assembling a full composite process over a masked
//! station grid.

use ndarray::{Array1, Array2, array};
use tellus_gp::{
    CholFactor, ModelSpec, NetworkComposite, StationComposite, flatten_grid, gather_rows,
    hstack_basis, missing_mask, station_covariance_and_basis, unmasked_positions,
};

const DIFF3: [usize; 3] = [0, 0, 0];

fn grid() -> (Array1<f64>, Array2<f64>, Array2<f64>) {
    let t = Array1::from_iter((0..5).map(|i| i as f64));
    let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
    // Two gaps: (epoch 1, station 2) and (epoch 3, station 0).
    let mut sd = Array2::from_elem((5, 3), 0.01);
    sd[[1, 2]] = f64::INFINITY;
    sd[[3, 0]] = f64::INFINITY;
    (t, x, sd)
}

#[test]
fn combined_covariance_is_positive_definite() {
    let (t, x, sd) = grid();
    let mask = missing_mask(&sd);
    let positions = unmasked_positions(&mask);
    assert_eq!(positions.len(), 13);

    let net = NetworkComposite::from_spec(&ModelSpec::new(["se-se"], vec![0.02, 2.0, 1.5]))
        .unwrap();
    let sta = StationComposite::from_spec(&ModelSpec::new(["fogm"], vec![0.01, 3.0])).unwrap();

    let z = flatten_grid(&t, &x);
    let zu = gather_rows(&z, &positions, 3);
    let mut sigma = net.covariance(zu.view(), zu.view(), &DIFF3, &DIFF3).unwrap();
    let (blocks, _) = station_covariance_and_basis(&sta, &t, &mask).unwrap();
    blocks.add_to(&mut sigma).unwrap();

    // A small nugget on the diagonal stands in for observation noise.
    for i in 0..sigma.nrows() {
        sigma[[i, i]] += 1e-6;
    }
    let chol = CholFactor::new(&sigma).unwrap();
    assert_eq!(chol.dim(), 13);
    assert!(chol.log_det().is_finite());
}

#[test]
fn station_blocks_never_couple_distinct_stations() {
    let (t, _x, sd) = grid();
    let mask = missing_mask(&sd);
    let positions = unmasked_positions(&mask);

    let sta = StationComposite::from_spec(&ModelSpec::new(["fogm"], vec![0.01, 3.0])).unwrap();
    let (blocks, _) = station_covariance_and_basis(&sta, &t, &mask).unwrap();
    let sigma = blocks.to_dense();

    for (a, &(_, ja)) in positions.iter().enumerate() {
        for (b, &(_, jb)) in positions.iter().enumerate() {
            if ja != jb {
                assert_eq!(sigma[[a, b]], 0.0, "stations {ja} and {jb} coupled");
            }
        }
    }
}

#[test]
fn full_basis_combines_station_and_network_columns() {
    let (t, x, sd) = grid();
    let mask = missing_mask(&sd);
    let positions = unmasked_positions(&mask);

    let net = NetworkComposite::from_spec(&ModelSpec::new(["se-se"], vec![0.02, 2.0, 1.5]))
        .unwrap();
    let sta = StationComposite::from_spec(&ModelSpec::new(["fogm", "p1"], vec![0.01, 3.0]))
        .unwrap();

    let z = flatten_grid(&t, &x);
    let zu = gather_rows(&z, &positions, 3);
    let (_, sta_p) = station_covariance_and_basis(&sta, &t, &mask).unwrap();
    let net_p = net.basis(zu.view(), &DIFF3).unwrap();
    let p = hstack_basis(positions.len(), &[sta_p, net_p]).unwrap();

    // Three stations with data, two p1 columns each, no network columns.
    assert_eq!(p.dim(), (13, 6));

    // Each station's columns are zero on other stations' rows.
    for (row, &(_, j)) in positions.iter().enumerate() {
        for station in 0..3 {
            for c in 0..2 {
                let col = station * 2 + c;
                if station != j {
                    assert_eq!(p[[row, col]], 0.0, "row {row}, col {col}");
                }
            }
        }
    }
}

#[test]
fn flat_index_invariant() {
    // Raveled index i = time_idx * Nx + station_idx.
    let t = array![10.0, 20.0, 30.0];
    let x = array![[1.0, 2.0], [3.0, 4.0]];
    let z = flatten_grid(&t, &x);

    for (i, &ti) in t.iter().enumerate() {
        for j in 0..2 {
            let row = z.row(i * 2 + j);
            assert_eq!(row[0], ti);
            assert_eq!(row[1], x[[j, 0]]);
            assert_eq!(row[2], x[[j, 1]]);
        }
    }
}
