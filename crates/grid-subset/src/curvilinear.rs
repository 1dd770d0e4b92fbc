//! Curvilinear-grid reconciliation.
//!
//! Ocean models on a displaced-pole grid store longitude and latitude as full
//! 2-D fields whose column-to-longitude mapping varies row by row. To address
//! such a grid like a sorted one, a per-row permutation ("transform matrix")
//! is recorded once from the longitude field and then applied to every data
//! array read for that grid, so data and sorted coordinates stay paired.

use crate::error::{Result, SliceError};
use ndarray::{Array2, ArrayD};

/// Row-wise argsort of a 2-D longitude field.
///
/// Each output row holds the column ordering that makes that row of
/// longitudes ascending. A single global sort would be wrong here: on a
/// curvilinear grid every row can order its columns differently.
pub fn transform_matrix(lon: &Array2<f64>) -> Array2<usize> {
    let (rows, cols) = lon.dim();
    let mut matrix = Array2::zeros((rows, cols));
    for (i, row) in lon.rows().into_iter().enumerate() {
        let mut order: Vec<usize> = (0..cols).collect();
        order.sort_by(|&a, &b| {
            row[a]
                .partial_cmp(&row[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (j, &src) in order.iter().enumerate() {
            matrix[(i, j)] = src;
        }
    }
    matrix
}

/// Sort a curvilinear coordinate pair row-wise by longitude.
///
/// The same permutation is applied to both fields, so the element-to-element
/// correspondence (one physical grid cell) is preserved.
pub fn sort_coordinates(lon: &Array2<f64>, lat: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    let matrix = transform_matrix(lon);
    (permute_rows(lon, &matrix), permute_rows(lat, &matrix))
}

/// Sorted coordinates with one wrap-around column appended.
///
/// The extra column repeats column 0 with longitude shifted by a full
/// revolution and latitude unchanged, giving plotting and selection a
/// seamless frame across the grid's date-line equivalent.
pub fn cycle_coordinates(lon: &Array2<f64>, lat: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    let (sorted_lon, sorted_lat) = sort_coordinates(lon, lat);
    let (rows, cols) = sorted_lon.dim();
    let mut lon_p = Array2::zeros((rows, cols + 1));
    let mut lat_p = Array2::zeros((rows, cols + 1));
    for i in 0..rows {
        for j in 0..cols {
            lon_p[(i, j)] = sorted_lon[(i, j)];
            lat_p[(i, j)] = sorted_lat[(i, j)];
        }
        lon_p[(i, cols)] = sorted_lon[(i, 0)] + 360.0;
        lat_p[(i, cols)] = sorted_lat[(i, 0)];
    }
    (lon_p, lat_p)
}

/// Apply a recorded transform to a data array whose two trailing axes are the
/// grid's (row, column) pair.
///
/// Every data array read for a curvilinear grid must pass through this before
/// being paired with the sorted coordinates.
pub fn apply_transform(data: &ArrayD<f64>, matrix: &Array2<usize>) -> Result<ArrayD<f64>> {
    let (rows, cols) = matrix.dim();
    let shape = data.shape();
    if data.ndim() < 2 || shape[data.ndim() - 2] != rows || shape[data.ndim() - 1] != cols {
        return Err(SliceError::TransformShape {
            expected_rows: rows,
            expected_cols: cols,
            got: shape.to_vec(),
        });
    }

    let standard = data.as_standard_layout();
    let flat = standard
        .as_slice()
        .expect("standard layout array is contiguous");
    let outer: usize = shape[..data.ndim() - 2].iter().product();
    let mut out = vec![0.0; flat.len()];
    for block in 0..outer {
        for i in 0..rows {
            let base = (block * rows + i) * cols;
            for j in 0..cols {
                out[base + j] = flat[base + matrix[(i, j)]];
            }
        }
    }
    Ok(ArrayD::from_shape_vec(data.raw_dim(), out)
        .expect("output shape matches input shape"))
}

fn permute_rows(field: &Array2<f64>, matrix: &Array2<usize>) -> Array2<f64> {
    let (rows, cols) = field.dim();
    let mut out = Array2::zeros((rows, cols));
    for i in 0..rows {
        for j in 0..cols {
            out[(i, j)] = field[(i, matrix[(i, j)])];
        }
    }
    out
}
