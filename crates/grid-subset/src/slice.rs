//! Coordinate-consistent slices of model fields.

use crate::array::{AxisCoords, GeoArray};
use crate::error::{Result, SliceError};
use crate::frame::{CoordField, CoordinateFrame};
use ndarray::Array1;
use paleo_common::{guess_bounds, nearest_index, nearest_time_index, Date360};
use tracing::debug;

/// How a deferred axis selection resolves its value to an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Closest coordinate wins.
    Nearest,
    /// The coordinate must match exactly (within float equality).
    Exact,
}

/// A deferred selection along a numeric axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selector {
    pub mode: SelectMode,
    pub value: f64,
}

impl Selector {
    pub fn nearest(value: f64) -> Self {
        Self {
            mode: SelectMode::Nearest,
            value,
        }
    }

    pub fn exact(value: f64) -> Self {
        Self {
            mode: SelectMode::Exact,
            value,
        }
    }
}

/// A deferred selection along the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSelector {
    pub mode: SelectMode,
    pub value: Date360,
}

impl TimeSelector {
    pub fn nearest(value: Date360) -> Self {
        Self {
            mode: SelectMode::Nearest,
            value,
        }
    }

    pub fn exact(value: Date360) -> Self {
        Self {
            mode: SelectMode::Exact,
            value,
        }
    }
}

/// One model field paired with its coordinate metadata.
///
/// Every cropping operation goes through this type, which updates the data
/// and the frame together; data and coordinates can therefore never
/// desynchronize in length.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoSlice {
    data: GeoArray,
    frame: CoordinateFrame,
}

impl GeoSlice {
    /// Wrap a raw field with a copy of its dataset's coordinate frame.
    pub fn new(data: GeoArray, frame: &CoordinateFrame) -> Self {
        Self {
            data,
            frame: frame.clone(),
        }
    }

    pub fn data(&self) -> &GeoArray {
        &self.data
    }

    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    pub fn into_parts(self) -> (GeoArray, CoordinateFrame) {
        (self.data, self.frame)
    }

    /// Restrict the time axis to `[start-01-01, end-12-30]`, inclusive.
    pub fn crop_years(&mut self, start: i32, end: i32) -> Result<()> {
        let from = Date360::new(start, 1, 1).expect("fixed calendar day");
        let to = Date360::new(end, 12, 30).expect("fixed calendar day");
        self.data
            .retain_by_times("t", |t| (from..=to).contains(t))?;
        self.frame.start_year = start;
        self.frame.end_year = end;
        self.fit_coordinates()
    }

    /// Restrict the time axis to the given month numbers.
    pub fn crop_months(&mut self, months: &[u32]) -> Result<()> {
        self.data
            .retain_by_times("t", |t| months.contains(&t.month()))?;
        self.frame.months = Some(months.to_vec());
        self.fit_coordinates()
    }

    /// Drop positions of a named axis whose coordinate falls outside
    /// `[min, max]` (either side unbounded when `None`).
    pub fn compact_axis(&mut self, axis: &str, min: Option<f64>, max: Option<f64>) -> Result<()> {
        if min.is_none() && max.is_none() {
            return Ok(());
        }
        self.data.retain_by_values(axis, |v| {
            min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m)
        })?;
        debug!(axis, ?min, ?max, "compacted axis to zone bounds");
        Ok(())
    }

    /// Resolve a deferred selection along a numeric axis, reducing the slice
    /// to the chosen position and dropping the axis.
    pub fn select(&mut self, axis: &str, selector: Selector) -> Result<()> {
        let coords = self
            .data
            .coord_values(axis)
            .ok_or_else(|| match self.data.axis(axis) {
                None => SliceError::AxisMissing(axis.to_string()),
                Some(_) => SliceError::NoCoordinates {
                    axis: axis.to_string(),
                },
            })?;
        let index = match selector.mode {
            SelectMode::Nearest => {
                nearest_index(coords, selector.value).ok_or(SliceError::EmptyAxis {
                    axis: axis.to_string(),
                })?
            }
            SelectMode::Exact => coords
                .iter()
                .position(|&v| v == selector.value)
                .ok_or_else(|| SliceError::NoExactMatch {
                    axis: axis.to_string(),
                    value: selector.value.to_string(),
                })?,
        };
        self.data.collapse(axis, index)?;
        self.clear_frame_axis(axis);
        Ok(())
    }

    /// Resolve a deferred selection along the time axis.
    pub fn select_time(&mut self, selector: TimeSelector) -> Result<()> {
        let times = self
            .data
            .times("t")
            .ok_or_else(|| match self.data.axis("t") {
                None => SliceError::AxisMissing("t".to_string()),
                Some(_) => SliceError::NoCoordinates {
                    axis: "t".to_string(),
                },
            })?;
        let index = match selector.mode {
            SelectMode::Nearest => {
                nearest_time_index(times, selector.value).ok_or(SliceError::EmptyAxis {
                    axis: "t".to_string(),
                })?
            }
            SelectMode::Exact => times
                .iter()
                .position(|t| *t == selector.value)
                .ok_or_else(|| SliceError::NoExactMatch {
                    axis: "t".to_string(),
                    value: selector.value.to_string(),
                })?,
        };
        self.data.collapse("t", index)?;
        self.frame.time = None;
        Ok(())
    }

    /// Re-derive the frame's coordinate arrays from the data's surviving
    /// axes, so centers, bounds and time stay length-consistent with the
    /// field after any reduction.
    pub fn fit_coordinates(&mut self) -> Result<()> {
        if let Some(coords) = self.data.coord_values("lon") {
            self.frame.lon = Some(CoordField::Centers(Array1::from_vec(coords.to_vec())));
            self.frame.lon_bounds = guess_bounds(coords);
        }
        if let Some(coords) = self.data.coord_values("lat") {
            self.frame.lat = Some(CoordField::Centers(Array1::from_vec(coords.to_vec())));
            self.frame.lat_bounds = guess_bounds(coords);
        }
        if let Some(coords) = self.data.coord_values("z") {
            self.frame.z = Some(CoordField::Centers(Array1::from_vec(coords.to_vec())));
            self.frame.z_bounds = guess_bounds(coords);
        }
        if let Some(times) = self.data.times("t") {
            self.frame.time = Some(times.to_vec());
        } else if !self.data.has_axis("t") {
            self.frame.time = None;
        }
        self.check_consistency()
    }

    /// Verify that every coordinate-carrying axis matches its data length.
    fn check_consistency(&self) -> Result<()> {
        for (dim, axis) in self.data.shape().iter().zip(self.data.axes()) {
            let coord_len = match &axis.coords {
                AxisCoords::Values(v) => Some(v.len()),
                AxisCoords::Times(t) => Some(t.len()),
                AxisCoords::Index => None,
            };
            if let Some(len) = coord_len {
                if len != *dim {
                    return Err(SliceError::ShapeMismatch {
                        axis: axis.name.clone(),
                        data_len: *dim,
                        coord_len: len,
                    });
                }
            }
        }
        Ok(())
    }

    /// After an axis collapses to a single position, the frame no longer
    /// carries that axis.
    fn clear_frame_axis(&mut self, axis: &str) {
        match axis {
            "lon" => {
                self.frame.lon = None;
                self.frame.lon_bounds = None;
                self.frame.lon_cycled = None;
            }
            "lat" => {
                self.frame.lat = None;
                self.frame.lat_bounds = None;
                self.frame.lat_cycled = None;
            }
            "z" => {
                self.frame.z = None;
                self.frame.z_bounds = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::AxisLabel;
    use ndarray::ArrayD;

    fn monthly_slice(start: i32, end: i32) -> GeoSlice {
        let times: Vec<Date360> = (start..=end)
            .flat_map(|y| (1..=12).map(move |m| Date360::new(y, m, 1).unwrap()))
            .collect();
        let lon: Vec<f64> = (0..4).map(|i| i as f64 * 90.0).collect();
        let n = times.len() * lon.len();
        let values =
            ArrayD::from_shape_vec(ndarray::IxDyn(&[times.len(), lon.len()]), vec![1.0; n])
                .unwrap();
        let data = GeoArray::new(
            values,
            vec![
                AxisLabel::times("t", times.clone()),
                AxisLabel::values("lon", lon),
            ],
        )
        .unwrap();
        let mut frame = CoordinateFrame::new(start, end, Some((1..=12).collect()));
        frame.time = Some(times);
        GeoSlice::new(data, &frame)
    }

    #[test]
    fn test_crop_years_narrows_time_axis() {
        let mut slice = monthly_slice(1850, 1859);
        slice.crop_years(1852, 1853).unwrap();
        let times = slice.data().times("t").unwrap();
        assert_eq!(times.len(), 24);
        assert_eq!(times[0].year(), 1852);
        assert_eq!(times[23].year(), 1853);
        assert_eq!(slice.frame().time.as_ref().unwrap().len(), 24);
        assert_eq!(slice.frame().start_year, 1852);
        assert_eq!(slice.frame().end_year, 1853);
    }

    #[test]
    fn test_crop_months_filters_all_years() {
        let mut slice = monthly_slice(1850, 1852);
        slice.crop_months(&[1]).unwrap();
        let times = slice.data().times("t").unwrap();
        assert_eq!(times.len(), 3);
        assert!(times.iter().all(|t| t.month() == 1));
    }

    #[test]
    fn test_select_nearest_collapses_axis() {
        let mut slice = monthly_slice(1850, 1850);
        slice.select("lon", Selector::nearest(100.0)).unwrap();
        assert!(!slice.data().has_axis("lon"));
        assert!(slice.frame().lon.is_none());
        assert!(slice.frame().lon_bounds.is_none());
        assert_eq!(slice.data().shape(), &[12]);
    }

    #[test]
    fn test_select_exact_requires_match() {
        let mut slice = monthly_slice(1850, 1850);
        assert!(matches!(
            slice.select("lon", Selector::exact(100.0)),
            Err(SliceError::NoExactMatch { .. })
        ));
        slice.select("lon", Selector::exact(90.0)).unwrap();
        assert!(!slice.data().has_axis("lon"));
    }

    #[test]
    fn test_select_missing_axis_is_fatal() {
        let mut slice = monthly_slice(1850, 1850);
        assert!(matches!(
            slice.select("z", Selector::nearest(0.0)),
            Err(SliceError::AxisMissing(_))
        ));
    }

    #[test]
    fn test_fit_coordinates_rederives_bounds() {
        let mut slice = monthly_slice(1850, 1850);
        slice.compact_axis("lon", Some(90.0), Some(270.0)).unwrap();
        slice.fit_coordinates().unwrap();
        let lon = slice.frame().lon.as_ref().unwrap().as_centers().unwrap();
        assert_eq!(lon.len(), 3);
        assert_eq!(slice.frame().lon_bounds.as_ref().unwrap().len(), 4);
    }
}
