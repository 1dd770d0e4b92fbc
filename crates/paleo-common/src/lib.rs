//! Common types and utilities shared across all paleocube crates.

pub mod bounds;
pub mod calendar;
pub mod index;
pub mod stats;
pub mod units;

pub use bounds::{guess_bounds, staggered_bounds};
pub use calendar::{
    month_code, month_number, months_to_numbers, CalendarError, Date360, MonthSelection,
    MONTH_CODES,
};
pub use index::{nearest_grid_index, nearest_index, nearest_time_index};
pub use stats::running_mean;
pub use units::{
    cell_area, kelvin_to_celsius, kelvin_to_celsius_field, surface_matrix, EARTH_RADIUS_M,
};
