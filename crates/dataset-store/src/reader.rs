//! NetCDF file access.
//!
//! Thin wrappers over the `netcdf` crate that read coordinate variables and
//! data fields into `ndarray` containers. Loads are eager and synchronous:
//! deferring disk reads is a performance property of other tooling, not part
//! of this crate's contract.

use crate::error::{Result, StoreError};
use ndarray::{Array1, Array2, ArrayD, IxDyn};
use paleo_common::Date360;
use std::path::Path;

/// A data variable read from one file: raw values plus dimension names.
#[derive(Debug, Clone)]
pub(crate) struct RawField {
    pub values: ArrayD<f64>,
    pub dims: Vec<String>,
}

pub(crate) fn open(path: &Path) -> Result<netcdf::File> {
    Ok(netcdf::open(path)?)
}

fn variable<'f>(
    file: &'f netcdf::File,
    name: &str,
    path: &Path,
) -> Result<netcdf::Variable<'f>> {
    file.variable(name).ok_or_else(|| StoreError::VariableNotFound {
        variable: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Read a 1-D coordinate variable.
pub(crate) fn read_1d(file: &netcdf::File, name: &str, path: &Path) -> Result<Array1<f64>> {
    let var = variable(file, name, path)?;
    Ok(Array1::from_vec(var.get_values::<f64, _>(..)?))
}

/// Read a 2-D coordinate field (curvilinear grids).
pub(crate) fn read_2d(file: &netcdf::File, name: &str, path: &Path) -> Result<Array2<f64>> {
    let var = variable(file, name, path)?;
    let dims = var.dimensions();
    let (rows, cols) = match dims {
        [r, c] => (r.len(), c.len()),
        _ => {
            return Err(StoreError::VariableNotFound {
                variable: format!("{name} (expected 2-D)"),
                path: path.to_path_buf(),
            })
        }
    };
    let values = var.get_values::<f64, _>(..)?;
    Ok(Array2::from_shape_vec((rows, cols), values)
        .expect("variable values match its dimensions"))
}

/// Read a full data variable with its dimension names.
pub(crate) fn read_field(file: &netcdf::File, name: &str, path: &Path) -> Result<RawField> {
    let var = variable(file, name, path)?;
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let dims: Vec<String> = var
        .dimensions()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    let values = var.get_values::<f64, _>(..)?;
    let values = ArrayD::from_shape_vec(IxDyn(&shape), values)
        .expect("variable values match its dimensions");
    Ok(RawField { values, dims })
}

/// Numeric coordinates for a dimension, when the file carries a same-named
/// 1-D coordinate variable.
pub(crate) fn coord_if_present(file: &netcdf::File, name: &str) -> Option<Vec<f64>> {
    let var = file.variable(name)?;
    if var.dimensions().len() != 1 {
        return None;
    }
    var.get_values::<f64, _>(..).ok()
}

/// Read and decode a time coordinate on the 360-day model calendar.
///
/// The units attribute must have the CF `days since Y-M-D[ ...]` shape.
pub(crate) fn read_time_axis(
    file: &netcdf::File,
    name: &str,
    path: &Path,
) -> Result<Vec<Date360>> {
    let var = variable(file, name, path)?;
    let units = var
        .attribute("units")
        .and_then(|a| match a.value() {
            Ok(netcdf::AttributeValue::Str(s)) => Some(s),
            _ => None,
        })
        .unwrap_or_default();
    let base = parse_time_units(&units).ok_or_else(|| StoreError::TimeUnits {
        units: units.clone(),
        path: path.to_path_buf(),
    })?;
    let values = var.get_values::<f64, _>(..)?;
    Ok(values
        .into_iter()
        .map(|d| Date360::from_epoch_days(base.epoch_days() + d.round() as i64))
        .collect())
}

/// Parse `days since Y-M-D[ hh:mm:ss]` into the reference date.
fn parse_time_units(units: &str) -> Option<Date360> {
    let mut words = units.split_whitespace();
    match words.next()? {
        "day" | "days" => {}
        _ => return None,
    }
    if words.next()? != "since" {
        return None;
    }
    let date = words.next()?;
    let mut parts = date.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    Date360::new(year, month, day).ok()
}
