//! Declarative stream and variable descriptors.
//!
//! One generic dataset engine is parameterized by these records instead of a
//! class per physical variable: each variable is a table entry naming its
//! file variable, the singleton dimensions to squeeze away, an axis rename
//! map onto the canonical `t`/`z`/`lat`/`lon` names, and an optional unit
//! conversion. Tables can be written in Rust (see the `hadcm3` and `noresm`
//! modules) or loaded from YAML.

use crate::error::Result;
use crate::layout::FileLayout;
use grid_subset::GeoArray;
use paleo_common::kelvin_to_celsius;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unit conversion applied to a variable after reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitConversion {
    KelvinToCelsius,
}

impl UnitConversion {
    pub fn apply(&self, array: &mut GeoArray) {
        match self {
            UnitConversion::KelvinToCelsius => array.map_values(kelvin_to_celsius),
        }
    }
}

/// One physical quantity of a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// Accessor name, e.g. `sst`.
    pub name: String,
    /// NetCDF variable name, e.g. `temp_mm_uo`.
    pub var_name: String,
    /// Singleton dimensions dropped after reading (`surface`, `toa`...).
    #[serde(default)]
    pub squeeze: Vec<String>,
    /// Axis renames applied on top of the standard map
    /// (`depth_1 -> z`, `longitude_1 -> lon`, ...).
    #[serde(default)]
    pub rename: HashMap<String, String>,
    /// Optional unit conversion.
    #[serde(default)]
    pub convert: Option<UnitConversion>,
}

impl VariableDescriptor {
    pub fn new(name: impl Into<String>, var_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_name: var_name.into(),
            squeeze: Vec::new(),
            rename: HashMap::new(),
            convert: None,
        }
    }

    pub fn squeeze(mut self, dim: impl Into<String>) -> Self {
        self.squeeze.push(dim.into());
        self
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename.insert(from.into(), to.into());
        self
    }

    pub fn convert(mut self, conversion: UnitConversion) -> Self {
        self.convert = Some(conversion);
        self
    }
}

/// How cell edges are derived for one coordinate axis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Uniform-spacing bounds guessed from the centers.
    #[default]
    Guess,
    /// Edges taken from the named staggered (velocity-grid) variable, with
    /// one extrapolated final edge.
    Stagger(String),
}

/// One coordinate axis of a regular grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Coordinate variable name in the sample file.
    pub var: String,
    #[serde(default)]
    pub bounds: BoundsPolicy,
}

impl AxisSpec {
    pub fn guessed(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            bounds: BoundsPolicy::Guess,
        }
    }

    pub fn staggered(var: impl Into<String>, stagger_var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            bounds: BoundsPolicy::Stagger(stagger_var.into()),
        }
    }
}

/// The coordinate geometry of a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GridKind {
    /// Separable 1-D axes read straight from a sample file.
    Regular {
        lon: AxisSpec,
        lat: AxisSpec,
        #[serde(default)]
        z: Option<AxisSpec>,
    },
    /// Full 2-D lon/lat fields read from a grid-definition file (the
    /// catalog's aux path) and reconciled by sorting.
    Curvilinear {
        lon_var: String,
        lat_var: String,
        z_var: String,
    },
}

/// A complete stream description: where its files live, what its grid looks
/// like, and which variables it provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSpec {
    /// Stream name for diagnostics, e.g. `ocean-monthly`.
    pub name: String,
    /// File-name stem; `{experiment}` is substituted at resolution time.
    pub stem: String,
    pub layout: FileLayout,
    pub grid: GridKind,
    /// Name of the time coordinate in the data files, where one exists.
    #[serde(default)]
    pub time_var: Option<String>,
    pub variables: Vec<VariableDescriptor>,
}

impl StreamSpec {
    /// The stem with the experiment id substituted.
    pub fn resolve_stem(&self, experiment: &str) -> String {
        self.stem.replace("{experiment}", experiment)
    }

    /// Find a variable descriptor by accessor name.
    pub fn variable(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Load a stream description from YAML.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
