//! Unit conversion and cell-geometry helpers.

use crate::bounds::guess_bounds;
use ndarray::{Array2, ArrayD};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const KELVIN_OFFSET: f64 = 273.15;

/// Convert a temperature from Kelvin to degrees Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Convert a whole field from Kelvin to degrees Celsius in place.
pub fn kelvin_to_celsius_field(field: &mut ArrayD<f64>) {
    field.mapv_inplace(|v| v - KELVIN_OFFSET);
}

/// Area in m^2 of one cell on a regular lon-lat grid, between latitudes
/// `lat1` and `lat2` (degrees), with `n_lon` longitude divisions.
pub fn cell_area(n_lon: usize, lat1: f64, lat2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    2.0 * std::f64::consts::PI * EARTH_RADIUS_M * EARTH_RADIUS_M
        * (lat1_rad.sin() - lat2_rad.sin()).abs()
        / n_lon as f64
}

/// Per-cell area matrix (lat x lon) for a regular grid, using guessed
/// latitude bounds. `None` when the latitude axis is too short to bound.
pub fn surface_matrix(lon: &[f64], lat: &[f64]) -> Option<Array2<f64>> {
    let lat_bounds = guess_bounds(lat)?;
    let (n_j, n_i) = (lat.len(), lon.len());
    let mut surface = Array2::zeros((n_j, n_i));
    for j in 0..n_j {
        let area = cell_area(n_i, lat_bounds[j], lat_bounds[j + 1]);
        for i in 0..n_i {
            surface[(j, i)] = area;
        }
    }
    Some(surface)
}
