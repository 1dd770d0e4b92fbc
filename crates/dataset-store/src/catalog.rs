//! Experiment-to-path lookup tables.

use crate::error::{Result, StoreError};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One record of a path table.
///
/// `root` is a path *prefix*: stream file names are concatenated onto it
/// verbatim, so it may or may not end in a separator. The trailing `aux`
/// field is free-form; the curvilinear model family stores its
/// grid-definition file path there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub experiment: String,
    pub root: String,
    pub aux: String,
}

/// A loaded experiment-to-path table.
#[derive(Debug, Clone, Default)]
pub struct ExperimentCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl ExperimentCatalog {
    /// Load a semicolon-delimited table: one `experiment;path;aux` record per
    /// line, blank lines ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;

        let mut entries = HashMap::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.splitn(3, ';');
            let (experiment, root, aux) = match (fields.next(), fields.next(), fields.next()) {
                (Some(e), Some(r), Some(a)) => (e, r, a),
                _ => {
                    return Err(StoreError::CatalogParse {
                        path: path.to_path_buf(),
                        line: i + 1,
                    })
                }
            };
            entries.insert(
                experiment.to_string(),
                CatalogEntry {
                    experiment: experiment.to_string(),
                    root: root.to_string(),
                    aux: aux.trim_end().to_string(),
                },
            );
        }
        debug!(path = %path.display(), entries = entries.len(), "loaded path table");
        Ok(Self { entries })
    }

    /// Build a catalog directly from entries (test doubles, generated tables).
    pub fn from_entries(records: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: records
                .into_iter()
                .map(|e| (e.experiment.clone(), e))
                .collect(),
        }
    }

    /// Look up an experiment; an unregistered id is a configuration error.
    pub fn get(&self, experiment: &str) -> Result<&CatalogEntry> {
        self.entries
            .get(experiment)
            .ok_or_else(|| StoreError::UnknownExperiment(experiment.to_string()))
    }

    pub fn contains(&self, experiment: &str) -> bool {
        self.entries.contains_key(experiment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
