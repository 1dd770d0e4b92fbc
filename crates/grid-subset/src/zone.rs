//! Region-of-interest filters.

use crate::error::Result;
use crate::frame::CoordinateFrame;
use crate::slice::GeoSlice;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A lon/lat/depth bounding box, each side independently unbounded.
///
/// Built either from explicit bounds or from a coordinate source via
/// [`ZoneBox::from_frame`]; both entry points leave the box fully populated
/// before its first `compact`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneBox {
    pub lon_min: Option<f64>,
    pub lon_max: Option<f64>,
    pub lat_min: Option<f64>,
    pub lat_max: Option<f64>,
    pub z_min: Option<f64>,
    pub z_max: Option<f64>,
}

impl ZoneBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// A box spanning the full extent of a coordinate source.
    pub fn from_frame(frame: &CoordinateFrame) -> Self {
        Self::new().fill_from(frame)
    }

    /// Default any unset bound to the source's extent on that side.
    pub fn fill_from(mut self, frame: &CoordinateFrame) -> Self {
        if let Some(lon) = &frame.lon {
            self.lon_min = self.lon_min.or_else(|| lon.min());
            self.lon_max = self.lon_max.or_else(|| lon.max());
        }
        if let Some(lat) = &frame.lat {
            self.lat_min = self.lat_min.or_else(|| lat.min());
            self.lat_max = self.lat_max.or_else(|| lat.max());
        }
        if let Some(z) = &frame.z {
            self.z_min = self.z_min.or_else(|| z.min());
            self.z_max = self.z_max.or_else(|| z.max());
        }
        self
    }

    pub fn lon(mut self, min: impl Into<Option<f64>>, max: impl Into<Option<f64>>) -> Self {
        self.lon_min = min.into();
        self.lon_max = max.into();
        self
    }

    pub fn lat(mut self, min: impl Into<Option<f64>>, max: impl Into<Option<f64>>) -> Self {
        self.lat_min = min.into();
        self.lat_max = max.into();
        self
    }

    pub fn z(mut self, min: impl Into<Option<f64>>, max: impl Into<Option<f64>>) -> Self {
        self.z_min = min.into();
        self.z_max = max.into();
        self
    }
}

/// A region of interest applied to a slice.
///
/// `Zone::None` is the explicit no-op sentinel; construct it fresh per call
/// rather than sharing one instance between call sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Zone {
    /// Identity: the slice passes through untouched.
    #[default]
    None,
    /// Bounding-box filter on lon/lat/z.
    Box(ZoneBox),
}

impl Zone {
    /// Apply this zone's spatial filter to a slice.
    ///
    /// Bounded axes have out-of-range positions dropped (shape-changing) and
    /// the slice's coordinate metadata is re-fitted to the surviving data. A
    /// bound on an axis the slice does not address by coordinate is skipped
    /// with a warning rather than failing the call.
    pub fn compact(&self, slice: &mut GeoSlice) -> Result<()> {
        let zone_box = match self {
            Zone::None => return Ok(()),
            Zone::Box(b) => b,
        };
        let bounds = [
            ("lon", zone_box.lon_min, zone_box.lon_max),
            ("lat", zone_box.lat_min, zone_box.lat_max),
            ("z", zone_box.z_min, zone_box.z_max),
        ];
        for (axis, min, max) in bounds {
            if min.is_none() && max.is_none() {
                continue;
            }
            if slice.data().coord_values(axis).is_none() {
                warn!(axis, "zone bound skipped: slice has no such coordinate axis");
                continue;
            }
            slice.compact_axis(axis, min, max)?;
        }
        slice.fit_coordinates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{AxisLabel, GeoArray};
    use ndarray::ArrayD;

    fn global_slice() -> GeoSlice {
        let lon: Vec<f64> = (0..36).map(|i| i as f64 * 10.0).collect();
        let lat: Vec<f64> = (0..18).map(|j| -85.0 + j as f64 * 10.0).collect();
        let values = ArrayD::from_shape_vec(
            ndarray::IxDyn(&[18, 36]),
            (0..18 * 36).map(|v| v as f64).collect(),
        )
        .unwrap();
        let data = GeoArray::new(
            values,
            vec![
                AxisLabel::values("lat", lat.clone()),
                AxisLabel::values("lon", lon.clone()),
            ],
        )
        .unwrap();
        let mut frame = CoordinateFrame::new(1850, 1900, None);
        frame.lon = Some(crate::frame::CoordField::Centers(ndarray::Array1::from_vec(
            lon,
        )));
        frame.lat = Some(crate::frame::CoordField::Centers(ndarray::Array1::from_vec(
            lat,
        )));
        GeoSlice::new(data, &frame)
    }

    #[test]
    fn test_none_zone_is_identity() {
        let mut slice = global_slice();
        let before = slice.clone();
        Zone::None.compact(&mut slice).unwrap();
        assert_eq!(slice, before);
    }

    #[test]
    fn test_box_retains_bounded_columns() {
        let mut slice = global_slice();
        let zone = Zone::Box(ZoneBox::new().lon(100.0, 200.0));
        zone.compact(&mut slice).unwrap();

        // Eleven grid columns satisfy 100 <= lon <= 200.
        assert_eq!(slice.data().shape(), &[18, 11]);
        let lon = slice.data().coord_values("lon").unwrap();
        assert_eq!(lon.len(), 11);
        assert_eq!(lon[0], 100.0);
        assert_eq!(lon[10], 200.0);
        // Frame stays synchronized with the data.
        let frame_lon = slice.frame().lon.as_ref().unwrap().as_centers().unwrap();
        assert_eq!(frame_lon.as_slice().unwrap(), lon);
        assert_eq!(slice.frame().lon_bounds.as_ref().unwrap().len(), 12);
    }

    #[test]
    fn test_box_filters_multiple_axes() {
        let mut slice = global_slice();
        let zone = Zone::Box(ZoneBox::new().lon(0.0, 90.0).lat(None, 0.0));
        zone.compact(&mut slice).unwrap();
        assert_eq!(slice.data().shape(), &[9, 10]);
        assert!(slice
            .data()
            .coord_values("lat")
            .unwrap()
            .iter()
            .all(|&v| v <= 0.0));
    }

    #[test]
    fn test_box_from_frame_defaults_to_extent() {
        let slice = global_slice();
        let zone_box = ZoneBox::from_frame(slice.frame());
        assert_eq!(zone_box.lon_min, Some(0.0));
        assert_eq!(zone_box.lon_max, Some(350.0));
        assert_eq!(zone_box.lat_min, Some(-85.0));
        assert_eq!(zone_box.lat_max, Some(85.0));
        assert_eq!(zone_box.z_min, None);

        // Partially specified boxes keep their explicit bounds.
        let partial = ZoneBox::new().lon(50.0, None).fill_from(slice.frame());
        assert_eq!(partial.lon_min, Some(50.0));
        assert_eq!(partial.lon_max, Some(350.0));
    }

    #[test]
    fn test_bound_on_absent_axis_is_skipped() {
        let mut slice = global_slice();
        let zone = Zone::Box(ZoneBox::new().z(0.0, 500.0));
        let before = slice.clone();
        zone.compact(&mut slice).unwrap();
        assert_eq!(slice.data().shape(), before.data().shape());
    }
}
