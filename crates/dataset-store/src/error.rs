//! Error types for dataset access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving, opening and reading model output.
///
/// Construction-time failures (unknown experiment, missing files, invalid
/// year range) are unrecoverable and abort dataset construction. Per-call
/// truncation skips never surface here; they are reported through
/// [`grid_subset::Truncation`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The experiment id is not registered in the path table.
    #[error("experiment not registered in path table: {0}")]
    UnknownExperiment(String),

    /// One or more expected data files are absent. Every missing path is
    /// listed so a single failure diagnoses the whole gap.
    #[error("missing data files:{}", format_paths(.paths))]
    MissingFiles { paths: Vec<PathBuf> },

    /// The requested year range is not contained in the file's coverage.
    #[error(
        "requested years [{requested_start}, {requested_end}] outside available \
         coverage [{available_start}, {available_end}]"
    )]
    RangeError {
        requested_start: i32,
        requested_end: i32,
        available_start: i32,
        available_end: i32,
    },

    /// A path table could not be read.
    #[error("failed to read path table {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A path table record does not have the `experiment;path;aux` shape.
    #[error("malformed record at {path}:{line}: expected 'experiment;path;aux'")]
    CatalogParse { path: PathBuf, line: usize },

    /// The stream's variable table has no entry under this name.
    #[error("unknown variable for this stream: {0}")]
    UnknownVariable(String),

    /// A data or coordinate variable is absent from a file.
    #[error("variable '{variable}' missing from {path}")]
    VariableNotFound { variable: String, path: PathBuf },

    /// The time coordinate's units could not be interpreted.
    #[error("cannot decode time units '{units}' in {path}")]
    TimeUnits { units: String, path: PathBuf },

    /// A monthly file layout was opened without a month selection.
    #[error("stream '{stream}' stores one file per month and needs a month selection")]
    MonthsRequired { stream: String },

    /// A stream or variable table failed to parse.
    #[error("stream table error: {0}")]
    Table(#[from] serde_yaml::Error),

    #[error("calendar error: {0}")]
    Calendar(#[from] paleo_common::CalendarError),

    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Slice(#[from] grid_subset::SliceError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("\n  {}", p.display()))
        .collect()
}

/// Result type for dataset-store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
