//! Minimal labeled N-D array container.
//!
//! The slicing engine needs label-based axis addressing and shape-changing
//! position filters over the raw model fields. This container carries an
//! [`ndarray::ArrayD`] together with one [`AxisLabel`] per axis and keeps the
//! two in sync through every operation.
//!
//! Canonical axis names after descriptor renaming are `t`, `z`, `lat`, `lon`.

use crate::error::{Result, SliceError};
use ndarray::{ArrayD, Axis};
use paleo_common::Date360;

/// Coordinate values attached to one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisCoords {
    /// Numeric coordinate centers (degrees, metres, level numbers...).
    Values(Vec<f64>),
    /// Time steps in the 360-day model calendar.
    Times(Vec<Date360>),
    /// Pure index axis with no coordinate concept (e.g. an ensemble or
    /// curvilinear grid dimension addressed only by position).
    Index,
}

impl AxisCoords {
    fn len(&self) -> Option<usize> {
        match self {
            AxisCoords::Values(v) => Some(v.len()),
            AxisCoords::Times(t) => Some(t.len()),
            AxisCoords::Index => None,
        }
    }

    fn take(&self, indices: &[usize]) -> AxisCoords {
        match self {
            AxisCoords::Values(v) => {
                AxisCoords::Values(indices.iter().map(|&i| v[i]).collect())
            }
            AxisCoords::Times(t) => AxisCoords::Times(indices.iter().map(|&i| t[i]).collect()),
            AxisCoords::Index => AxisCoords::Index,
        }
    }
}

/// One labeled axis of a [`GeoArray`].
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub name: String,
    pub coords: AxisCoords,
}

impl AxisLabel {
    pub fn values(name: impl Into<String>, coords: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            coords: AxisCoords::Values(coords),
        }
    }

    pub fn times(name: impl Into<String>, coords: Vec<Date360>) -> Self {
        Self {
            name: name.into(),
            coords: AxisCoords::Times(coords),
        }
    }

    pub fn index(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coords: AxisCoords::Index,
        }
    }
}

/// A raw model field with labeled, coordinate-carrying axes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoArray {
    values: ArrayD<f64>,
    axes: Vec<AxisLabel>,
}

impl GeoArray {
    /// Wrap an array, validating that the labels match its shape.
    pub fn new(values: ArrayD<f64>, axes: Vec<AxisLabel>) -> Result<Self> {
        if values.ndim() != axes.len() {
            return Err(SliceError::RankMismatch {
                rank: values.ndim(),
                labels: axes.len(),
            });
        }
        for (dim, axis) in values.shape().iter().zip(&axes) {
            if let Some(len) = axis.coords.len() {
                if len != *dim {
                    return Err(SliceError::ShapeMismatch {
                        axis: axis.name.clone(),
                        data_len: *dim,
                        coord_len: len,
                    });
                }
            }
        }
        Ok(Self { values, axes })
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn axes(&self) -> &[AxisLabel] {
        &self.axes
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn has_axis(&self, name: &str) -> bool {
        self.axis_position(name).is_some()
    }

    /// Position of a named axis within the array's shape.
    pub fn axis_position(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.name == name)
    }

    pub fn axis(&self, name: &str) -> Option<&AxisLabel> {
        self.axes.iter().find(|a| a.name == name)
    }

    /// Numeric coordinates of a named axis, if it carries any.
    pub fn coord_values(&self, name: &str) -> Option<&[f64]> {
        match &self.axis(name)?.coords {
            AxisCoords::Values(v) => Some(v),
            _ => None,
        }
    }

    /// Time coordinates of a named axis, if it carries any.
    pub fn times(&self, name: &str) -> Option<&[Date360]> {
        match &self.axis(name)?.coords {
            AxisCoords::Times(t) => Some(t),
            _ => None,
        }
    }

    /// Retain only the given positions along a named axis.
    ///
    /// Positions are removed, not masked: the array's shape changes and the
    /// axis coordinates shrink with it.
    pub fn select(&mut self, name: &str, indices: &[usize]) -> Result<()> {
        let pos = self
            .axis_position(name)
            .ok_or_else(|| SliceError::AxisMissing(name.to_string()))?;
        self.values = self.values.select(Axis(pos), indices);
        self.axes[pos].coords = self.axes[pos].coords.take(indices);
        Ok(())
    }

    /// Retain positions whose numeric coordinate satisfies the predicate.
    pub fn retain_by_values<F: Fn(f64) -> bool>(&mut self, name: &str, pred: F) -> Result<()> {
        let coords = self
            .coord_values(name)
            .ok_or_else(|| SliceError::NoCoordinates {
                axis: name.to_string(),
            })?;
        let keep: Vec<usize> = coords
            .iter()
            .enumerate()
            .filter(|(_, &v)| pred(v))
            .map(|(i, _)| i)
            .collect();
        self.select(name, &keep)
    }

    /// Retain positions whose time coordinate satisfies the predicate.
    pub fn retain_by_times<F: Fn(&Date360) -> bool>(&mut self, name: &str, pred: F) -> Result<()> {
        let times = self.times(name).ok_or_else(|| SliceError::NoCoordinates {
            axis: name.to_string(),
        })?;
        let keep: Vec<usize> = times
            .iter()
            .enumerate()
            .filter(|(_, t)| pred(t))
            .map(|(i, _)| i)
            .collect();
        self.select(name, &keep)
    }

    /// Reduce a named axis to a single position and drop the axis.
    pub fn collapse(&mut self, name: &str, index: usize) -> Result<()> {
        let pos = self
            .axis_position(name)
            .ok_or_else(|| SliceError::AxisMissing(name.to_string()))?;
        self.values = self.values.index_axis(Axis(pos), index).to_owned();
        self.axes.remove(pos);
        Ok(())
    }

    /// Rename an axis. A no-op when the source name is absent.
    pub fn rename_axis(&mut self, from: &str, to: &str) {
        if let Some(pos) = self.axis_position(from) {
            self.axes[pos].name = to.to_string();
        }
    }

    /// Apply a scalar function to every value (unit conversion).
    pub fn map_values<F: Fn(f64) -> f64>(&mut self, f: F) {
        self.values.mapv_inplace(f);
    }

    /// Permute this array's two trailing axes with a recorded curvilinear
    /// transform (see [`crate::curvilinear`]).
    pub fn apply_transform(&mut self, matrix: &ndarray::Array2<usize>) -> Result<()> {
        self.values = crate::curvilinear::apply_transform(&self.values, matrix)?;
        Ok(())
    }
}
