//! Coordinate frame owned by a model dataset.

use ndarray::{Array1, Array2};
use paleo_common::Date360;

/// A coordinate-center field: separable 1-D axis or full 2-D curvilinear grid.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordField {
    Centers(Array1<f64>),
    Grid(Array2<f64>),
}

impl CoordField {
    /// 1-D centers, when the field is separable.
    pub fn as_centers(&self) -> Option<&Array1<f64>> {
        match self {
            CoordField::Centers(c) => Some(c),
            CoordField::Grid(_) => None,
        }
    }

    pub fn as_grid(&self) -> Option<&Array2<f64>> {
        match self {
            CoordField::Centers(_) => None,
            CoordField::Grid(g) => Some(g),
        }
    }

    /// Smallest coordinate value in the field.
    pub fn min(&self) -> Option<f64> {
        self.iter_all().fold(None, |acc, v| match acc {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        })
    }

    /// Largest coordinate value in the field.
    pub fn max(&self) -> Option<f64> {
        self.iter_all().fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }

    fn iter_all(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            CoordField::Centers(c) => Box::new(c.iter().copied()),
            CoordField::Grid(g) => Box::new(g.iter().copied()),
        }
    }
}

/// Coordinate metadata for one dataset stream.
///
/// Populated once when the dataset imports its coordinates and immutable from
/// then on; every [`crate::GeoSlice`] carries its own copy that is cropped in
/// lock-step with the data.
///
/// After import, `lon` and `lat` are monotonic non-decreasing along their
/// addressed axis; for curvilinear grids the reconciler's sort established
/// that and `transform` records the permutation needed to bring raw file
/// data into the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateFrame {
    /// First year of the declared range, inclusive.
    pub start_year: i32,
    /// Last year of the declared range, inclusive.
    pub end_year: i32,
    /// Imported month numbers in order, or `None` for annual streams.
    pub months: Option<Vec<u32>>,

    pub lon: Option<CoordField>,
    pub lat: Option<CoordField>,
    pub z: Option<CoordField>,

    /// Cell-edge arrays, one longer than the centers.
    pub lon_bounds: Option<Array1<f64>>,
    pub lat_bounds: Option<Array1<f64>>,
    pub z_bounds: Option<Array1<f64>>,

    /// Cycled ("periodic") curvilinear variants with the wrap-around column.
    pub lon_cycled: Option<Array2<f64>>,
    pub lat_cycled: Option<Array2<f64>>,

    /// Row-wise permutation recorded by the grid reconciler.
    pub transform: Option<Array2<usize>>,

    /// Time steps covered by the declared range and month subset.
    pub time: Option<Vec<Date360>>,
}

impl CoordinateFrame {
    /// An empty frame for the declared time range; coordinate fields are
    /// filled in by the dataset's coordinate import.
    pub fn new(start_year: i32, end_year: i32, months: Option<Vec<u32>>) -> Self {
        Self {
            start_year,
            end_year,
            months,
            lon: None,
            lat: None,
            z: None,
            lon_bounds: None,
            lat_bounds: None,
            z_bounds: None,
            lon_cycled: None,
            lat_cycled: None,
            transform: None,
            time: None,
        }
    }

    /// Whether this frame describes a curvilinear grid.
    pub fn is_curvilinear(&self) -> bool {
        matches!(self.lon, Some(CoordField::Grid(_)))
    }
}
