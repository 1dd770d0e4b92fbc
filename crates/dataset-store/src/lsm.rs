//! Land-sea masks.
//!
//! Masks live in their own path table, keyed by mask name. A mask file
//! carries the grid's coordinates, a 2-D land-sea flag (1 over land), the
//! bathymetry depth field and the model level field.

use crate::catalog::ExperimentCatalog;
use crate::error::{Result, StoreError};
use crate::reader;
use ndarray::{Array1, Array2, Array3};
use std::path::PathBuf;
use tracing::debug;

/// A loaded land-sea mask.
#[derive(Debug, Clone)]
pub struct LandSeaMask {
    pub lon: Array1<f64>,
    pub lat: Array1<f64>,
    /// Local bathymetry depth per cell, metres.
    pub depth: Array2<f64>,
    /// Deepest model level per cell.
    pub level: Array2<f64>,
    /// Land-sea flag: 1 over land, 0 over ocean.
    pub lsm: Array2<f64>,
}

impl LandSeaMask {
    /// Load a mask by name from the mask path table.
    ///
    /// The table's path field is the mask file itself, not a prefix.
    pub fn load(catalog: &ExperimentCatalog, name: &str) -> Result<Self> {
        let entry = catalog.get(name)?;
        let path = PathBuf::from(&entry.root);
        if !path.is_file() {
            return Err(StoreError::MissingFiles { paths: vec![path] });
        }
        let file = reader::open(&path)?;

        let mask = Self {
            lon: reader::read_1d(&file, "longitude", &path)?,
            lat: reader::read_1d(&file, "latitude", &path)?,
            depth: read_2d_field(&file, "depthdepth", &path)?,
            level: read_2d_field(&file, "depthlevel", &path)?,
            lsm: read_2d_field(&file, "lsm", &path)?,
        };
        debug!(name, path = %path.display(), "loaded land-sea mask");
        Ok(mask)
    }

    /// Ocean mask: 1 over ocean, 0 over land.
    pub fn mask2d(&self) -> Array2<f64> {
        self.lsm.mapv(|v| 1.0 - v)
    }

    /// Depth-thresholded 3-D mask: one boolean layer per requested vertical
    /// level, `true` (masked) where the local bathymetry is shallower than
    /// that level.
    pub fn level_mask(&self, levels: &[f64]) -> Array3<bool> {
        let (rows, cols) = self.depth.dim();
        let mut mask = Array3::from_elem((levels.len(), rows, cols), false);
        for (k, &level) in levels.iter().enumerate() {
            for i in 0..rows {
                for j in 0..cols {
                    mask[(k, i, j)] = self.depth[(i, j)] < level;
                }
            }
        }
        mask
    }
}

/// Read a 2-D field, tolerating a leading singleton record dimension.
fn read_2d_field(
    file: &netcdf::File,
    name: &str,
    path: &std::path::Path,
) -> Result<Array2<f64>> {
    let field = reader::read_field(file, name, path)?;
    let shape = field.values.shape().to_vec();
    let trailing: Vec<usize> = shape
        .iter()
        .copied()
        .filter(|&len| len > 1)
        .collect();
    match trailing.as_slice() {
        [rows, cols] => {
            let flat: Vec<f64> = field.values.iter().copied().collect();
            Ok(Array2::from_shape_vec((*rows, *cols), flat)
                .expect("field values match its dimensions"))
        }
        _ => Err(StoreError::VariableNotFound {
            variable: format!("{name} (expected 2-D)"),
            path: path.to_path_buf(),
        }),
    }
}
