//! Coordinate reconciliation and subsetting for gridded climate-model output.
//!
//! The engine takes a raw model field, pairs it with its dataset's
//! coordinate metadata, and applies region-of-interest filtering, year and
//! month truncation, and deferred nearest-index selections while keeping the
//! data and every coordinate array consistent in length and ordering.
//!
//! # Example
//!
//! ```ignore
//! use grid_subset::{assemble, Selector, SliceRequest, Zone, ZoneBox};
//!
//! let request = SliceRequest::new()
//!     .zone(Zone::Box(ZoneBox::new().lon(100.0, 200.0)))
//!     .start_year(1860)
//!     .select_z(Selector::nearest(50.0));
//! let assembled = assemble(dataset.frame(), raw, &request)?;
//! assert!(assembled.years.was_applied());
//! ```

pub mod array;
pub mod assemble;
pub mod curvilinear;
pub mod error;
pub mod frame;
pub mod slice;
pub mod zone;

pub use array::{AxisCoords, AxisLabel, GeoArray};
pub use assemble::{assemble, Assembled, SkipReason, SliceRequest, Truncation};
pub use curvilinear::{apply_transform, cycle_coordinates, sort_coordinates, transform_matrix};
pub use error::{Result, SliceError};
pub use frame::{CoordField, CoordinateFrame};
pub use slice::{GeoSlice, SelectMode, Selector, TimeSelector};
pub use zone::{Zone, ZoneBox};
