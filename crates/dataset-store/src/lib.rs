//! Dataset access for paleoclimate model output.
//!
//! This crate resolves experiment ids to on-disk file sets through injected
//! path tables, reads NetCDF fields and coordinate variables, and serves
//! coordinate-consistent slices through the `grid-subset` engine.
//!
//! # Example
//!
//! ```ignore
//! use dataset_store::{hadcm3, ExperimentCatalog, ModelDataset, StoreConfig};
//! use grid_subset::{SliceRequest, Zone, ZoneBox};
//! use paleo_common::MonthSelection;
//!
//! let config = StoreConfig::from_env();
//! let catalog = ExperimentCatalog::load(&config.series_table)?;
//! let dataset = ModelDataset::open(
//!     &catalog, "xpabc", 1850, 1900,
//!     MonthSelection::Full, hadcm3::sst_series(),
//! )?;
//! let tropics = SliceRequest::new()
//!     .zone(Zone::Box(ZoneBox::new().lat(-23.5, 23.5)))
//!     .start_year(1860);
//! let sst = dataset.fetch("sst", &tropics)?;
//! ```

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod descriptor;
pub mod error;
pub mod hadcm3;
pub mod layout;
pub mod lsm;
pub mod noresm;
mod reader;

pub use catalog::{CatalogEntry, ExperimentCatalog};
pub use config::StoreConfig;
pub use dataset::ModelDataset;
pub use descriptor::{
    AxisSpec, BoundsPolicy, GridKind, StreamSpec, UnitConversion, VariableDescriptor,
};
pub use error::{Result, StoreError};
pub use layout::FileLayout;
pub use lsm::LandSeaMask;
