//! Nearest-index lookup along coordinate axes.

use crate::calendar::Date360;
use ndarray::Array2;

/// Index of the coordinate value closest to `target`, or `None` on an empty
/// axis. Ties resolve to the earlier index.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = (*a - target).abs();
            let db = (*b - target).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

/// Index of the time step closest to `target`, or `None` on an empty axis.
pub fn nearest_time_index(times: &[Date360], target: Date360) -> Option<usize> {
    times
        .iter()
        .enumerate()
        .min_by_key(|(_, t)| t.days_between(&target))
        .map(|(i, _)| i)
}

/// `(row, column)` of the grid cell closest to a point, for grids whose
/// longitude and latitude are full 2-D fields.
///
/// Distance is squared degrees in coordinate space, which is adequate for
/// picking a cell on the grids this targets; it is not a geodesic.
pub fn nearest_grid_index(
    lon: &Array2<f64>,
    lat: &Array2<f64>,
    target_lon: f64,
    target_lat: f64,
) -> Option<(usize, usize)> {
    if lon.dim() != lat.dim() || lon.is_empty() {
        return None;
    }
    let (rows, cols) = lon.dim();
    let mut best = (0, 0);
    let mut best_dist = f64::INFINITY;
    for i in 0..rows {
        for j in 0..cols {
            let d_lon = lon[(i, j)] - target_lon;
            let d_lat = lat[(i, j)] - target_lat;
            let dist = d_lon * d_lon + d_lat * d_lat;
            if dist < best_dist {
                best_dist = dist;
                best = (i, j);
            }
        }
    }
    Some(best)
}
