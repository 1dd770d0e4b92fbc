//! Built-in stream tables for the Unified-Model archive family.
//!
//! These are data, not code: each constructor returns the declarative
//! description of one output stream and its physical quantities. Archive
//! streams store one file per month per year under the experiment's archive
//! root; time-series streams store one file per variable.

use crate::descriptor::{AxisSpec, GridKind, StreamSpec, UnitConversion, VariableDescriptor};
use crate::layout::FileLayout;

/// Ocean monthly archive stream (tracer grid plus staggered velocity grid).
///
/// Variables: `sst`, `temperature`, `salinity`.
pub fn ocean_monthly() -> StreamSpec {
    StreamSpec {
        name: "ocean-monthly".to_string(),
        stem: "pf/{experiment}o#pf".to_string(),
        layout: FileLayout::ArchiveMonths,
        grid: GridKind::Regular {
            lon: AxisSpec::staggered("longitude", "longitude_1"),
            lat: AxisSpec::staggered("latitude", "latitude_1"),
            z: Some(AxisSpec::staggered("depth", "depth_1")),
        },
        time_var: None,
        variables: vec![
            VariableDescriptor::new("sst", "temp_mm_uo")
                .squeeze("unspecified")
                .convert(UnitConversion::KelvinToCelsius),
            VariableDescriptor::new("temperature", "temp_mm_dpth")
                .rename("depth_1", "z")
                .convert(UnitConversion::KelvinToCelsius),
            VariableDescriptor::new("salinity", "salinity_mm_dpth").rename("depth_1", "z"),
        ],
    }
}

/// Atmosphere surface monthly archive stream.
///
/// Variables: `temperature`, `precip`.
pub fn atmos_surface_monthly() -> StreamSpec {
    StreamSpec {
        name: "atmos-surface-monthly".to_string(),
        stem: "pd/{experiment}a#pd".to_string(),
        layout: FileLayout::ArchiveMonths,
        grid: GridKind::Regular {
            lon: AxisSpec::staggered("longitude", "longitude_1"),
            lat: AxisSpec::staggered("latitude", "latitude_1"),
            z: Some(AxisSpec::guessed("level6")),
        },
        time_var: None,
        variables: vec![
            VariableDescriptor::new("temperature", "temp_mm_srf")
                .squeeze("surface")
                .convert(UnitConversion::KelvinToCelsius),
            VariableDescriptor::new("precip", "precip_mm_srf").squeeze("surface"),
        ],
    }
}

/// Monthly sea-surface temperature time series.
pub fn sst_series() -> StreamSpec {
    surface_series(
        "sst-monthly",
        "oceansurftemppf.monthly",
        vec![VariableDescriptor::new("sst", "temp_mm_uo")
            .squeeze("unspecified")
            .convert(UnitConversion::KelvinToCelsius)],
    )
}

/// Monthly 1.5 m air temperature time series.
pub fn surface_temp_series() -> StreamSpec {
    surface_series(
        "surface-temperature-monthly",
        "tempsurf.monthly",
        vec![VariableDescriptor::new("temperature", "temp_mm_srf")
            .squeeze("surface")
            .convert(UnitConversion::KelvinToCelsius)],
    )
}

/// Monthly precipitation time series.
pub fn precip_series() -> StreamSpec {
    surface_series(
        "precip-monthly",
        "precip.monthly",
        vec![VariableDescriptor::new("precip", "precip_mm_srf").squeeze("surface")],
    )
}

/// Monthly mean-sea-level pressure time series.
pub fn mslp_series() -> StreamSpec {
    surface_series(
        "mslp-monthly",
        "mslp.monthly",
        vec![VariableDescriptor::new("mslp", "p_mm_msl").squeeze("msl")],
    )
}

/// Monthly relative humidity at 2 m time series.
pub fn humidity_series() -> StreamSpec {
    surface_series(
        "humidity-monthly",
        "rh2m.monthly",
        vec![VariableDescriptor::new("humidity", "rh_mm_1_5m").squeeze("ht")],
    )
}

/// Monthly ocean mixed-layer depth time series.
pub fn mixed_layer_series() -> StreamSpec {
    surface_series(
        "mixed-layer-monthly",
        "oceanmixedpf.monthly",
        vec![VariableDescriptor::new("mld", "mixLyrDpth_mm_uo").squeeze("unspecified")],
    )
}

/// Monthly 10 m wind time series on the staggered velocity grid.
///
/// Variables: `u_wind`, `v_wind` (stored as two sibling streams in the
/// archive; both components are exposed here for the common case of files
/// merged per experiment).
pub fn wind10m_series() -> StreamSpec {
    StreamSpec {
        name: "wind10m-monthly".to_string(),
        stem: "u10m.monthly".to_string(),
        layout: FileLayout::TimeSeries,
        grid: GridKind::Regular {
            lon: AxisSpec::guessed("longitude_1"),
            lat: AxisSpec::guessed("latitude_1"),
            z: None,
        },
        time_var: Some("t".to_string()),
        variables: vec![
            VariableDescriptor::new("u_wind", "u_mm_10m").squeeze("ht"),
            VariableDescriptor::new("v_wind", "v_mm_10m").squeeze("ht"),
        ],
    }
}

/// Annual ocean temperature time series with a full depth axis.
pub fn ocean_temp_annual() -> StreamSpec {
    StreamSpec {
        name: "ocean-temperature-annual".to_string(),
        stem: "oceantemppg.annual".to_string(),
        layout: FileLayout::TimeSeries,
        grid: GridKind::Regular {
            lon: AxisSpec::guessed("longitude"),
            lat: AxisSpec::guessed("latitude"),
            z: Some(AxisSpec::guessed("depth_1")),
        },
        time_var: Some("t".to_string()),
        variables: vec![VariableDescriptor::new("temperature", "temp_ym_dpth")
            .rename("depth_1", "z")
            .convert(UnitConversion::KelvinToCelsius)],
    }
}

/// Annual ocean salinity time series with a full depth axis.
pub fn ocean_salinity_annual() -> StreamSpec {
    StreamSpec {
        name: "ocean-salinity-annual".to_string(),
        stem: "oceansalipg.annual".to_string(),
        layout: FileLayout::TimeSeries,
        grid: GridKind::Regular {
            lon: AxisSpec::guessed("longitude"),
            lat: AxisSpec::guessed("latitude"),
            z: Some(AxisSpec::guessed("depth_1")),
        },
        time_var: Some("t".to_string()),
        variables: vec![
            VariableDescriptor::new("salinity", "salinity_ym_dpth").rename("depth_1", "z")
        ],
    }
}

/// Monthly soil moisture time series on soil levels.
pub fn soil_moisture_series() -> StreamSpec {
    StreamSpec {
        name: "soil-moisture-monthly".to_string(),
        stem: "sm.monthly".to_string(),
        layout: FileLayout::TimeSeries,
        grid: GridKind::Regular {
            lon: AxisSpec::guessed("longitude"),
            lat: AxisSpec::guessed("latitude"),
            z: Some(AxisSpec::guessed("level6")),
        },
        time_var: Some("t".to_string()),
        variables: vec![
            VariableDescriptor::new("moisture", "sm_mm_soil").rename("level6", "z")
        ],
    }
}

/// A surface-only monthly time-series stream on the tracer grid.
fn surface_series(name: &str, stem: &str, variables: Vec<VariableDescriptor>) -> StreamSpec {
    StreamSpec {
        name: name.to_string(),
        stem: stem.to_string(),
        layout: FileLayout::TimeSeries,
        grid: GridKind::Regular {
            lon: AxisSpec::guessed("longitude"),
            lat: AxisSpec::guessed("latitude"),
            z: None,
        },
        time_var: Some("t".to_string()),
        variables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stream_has_variables() {
        let streams = [
            ocean_monthly(),
            atmos_surface_monthly(),
            sst_series(),
            surface_temp_series(),
            precip_series(),
            mslp_series(),
            humidity_series(),
            mixed_layer_series(),
            wind10m_series(),
            ocean_temp_annual(),
            ocean_salinity_annual(),
            soil_moisture_series(),
        ];
        for stream in &streams {
            assert!(
                !stream.variables.is_empty(),
                "stream {} has no variables",
                stream.name
            );
        }
    }

    #[test]
    fn test_ocean_monthly_uses_staggered_bounds() {
        let stream = ocean_monthly();
        match &stream.grid {
            GridKind::Regular { lon, .. } => {
                assert_eq!(
                    lon.bounds,
                    crate::descriptor::BoundsPolicy::Stagger("longitude_1".to_string())
                );
            }
            _ => panic!("expected regular grid"),
        }
        assert_eq!(stream.resolve_stem("xpabc"), "pf/xpabco#pf");
    }

    #[test]
    fn test_variable_lookup() {
        let stream = ocean_monthly();
        assert!(stream.variable("sst").is_some());
        assert!(stream.variable("does-not-exist").is_none());
    }
}
