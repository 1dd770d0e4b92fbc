//! Error types for the subsetting engine.

use thiserror::Error;

/// Errors that can occur while slicing labeled arrays.
///
/// These are the fatal failures of the engine; recoverable truncation skips
/// are reported through [`crate::assemble::Truncation`] instead.
#[derive(Error, Debug)]
pub enum SliceError {
    /// A selection or filter addressed an axis the array does not carry.
    #[error("axis not present in slice: {0}")]
    AxisMissing(String),

    /// A selection needs coordinate values the axis does not carry.
    #[error("axis '{axis}' carries no coordinate values to select on")]
    NoCoordinates { axis: String },

    /// Coordinate metadata does not match the data shape.
    #[error("axis '{axis}' has {data_len} data positions but {coord_len} coordinates")]
    ShapeMismatch {
        axis: String,
        data_len: usize,
        coord_len: usize,
    },

    /// Axis count does not match the array rank.
    #[error("array of rank {rank} labeled with {labels} axes")]
    RankMismatch { rank: usize, labels: usize },

    /// An exact-match selection found no matching coordinate.
    #[error("no exact match for {value} on axis '{axis}'")]
    NoExactMatch { axis: String, value: String },

    /// A selection was made against an empty axis.
    #[error("axis '{axis}' is empty")]
    EmptyAxis { axis: String },

    /// A curvilinear transform was applied to data of the wrong shape.
    #[error("transform matrix is {expected_rows}x{expected_cols} but data trailing axes are {got:?}")]
    TransformShape {
        expected_rows: usize,
        expected_cols: usize,
        got: Vec<usize>,
    },
}

/// Result type for subsetting operations.
pub type Result<T> = std::result::Result<T, SliceError>;
