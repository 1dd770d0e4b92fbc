//! Built-in stream table for the curvilinear ocean-model family.
//!
//! This family writes history files named `{stem}{year:04}-{month:02}.nc`
//! and stores its longitude/latitude as full 2-D fields in a separate
//! grid-definition file, registered as the catalog entry's aux path. The
//! dataset engine reconciles that grid by row-wise sorting and records the
//! permutation every data read must pass through.

use crate::descriptor::{GridKind, StreamSpec, VariableDescriptor};
use crate::layout::FileLayout;

/// Curvilinear ocean monthly history stream.
///
/// Variables: `sst`, `salinity`.
pub fn ocean_history() -> StreamSpec {
    StreamSpec {
        name: "ocean-history".to_string(),
        stem: "ocn/hist/{experiment}.micom.hm.".to_string(),
        layout: FileLayout::HistoryMonths,
        grid: GridKind::Curvilinear {
            lon_var: "plon".to_string(),
            lat_var: "plat".to_string(),
            z_var: "depth".to_string(),
        },
        time_var: Some("time".to_string()),
        variables: vec![
            VariableDescriptor::new("sst", "sst"),
            VariableDescriptor::new("salinity", "sss"),
        ],
    }
}
