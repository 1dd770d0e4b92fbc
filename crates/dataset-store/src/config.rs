//! Store configuration.
//!
//! The three path tables are injected through this struct rather than loaded
//! from fixed process-wide locations, so tests can point the store at
//! fixtures without touching the real archive.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Locations of the experiment path tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Table for archive streams (one file per month per year).
    pub archive_table: PathBuf,
    /// Table for time-series streams (one file per variable).
    pub series_table: PathBuf,
    /// Table for land-sea masks.
    pub mask_table: PathBuf,
}

impl StoreConfig {
    pub fn new(
        archive_table: impl Into<PathBuf>,
        series_table: impl Into<PathBuf>,
        mask_table: impl Into<PathBuf>,
    ) -> Self {
        Self {
            archive_table: archive_table.into(),
            series_table: series_table.into(),
            mask_table: mask_table.into(),
        }
    }

    /// Conventional table names under one directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            archive_table: dir.join("archive_paths.txt"),
            series_table: dir.join("series_paths.txt"),
            mask_table: dir.join("mask_paths.txt"),
        }
    }

    /// Load table locations from environment variables, falling back to the
    /// conventional names in the current directory.
    pub fn from_env() -> Self {
        let mut config = Self::from_dir(".");
        if let Ok(val) = std::env::var("PALEO_ARCHIVE_TABLE") {
            config.archive_table = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PALEO_SERIES_TABLE") {
            config.series_table = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PALEO_MASK_TABLE") {
            config.mask_table = PathBuf::from(val);
        }
        config
    }

    /// Check that every configured table exists.
    pub fn validate(&self) -> Result<(), String> {
        for (name, path) in [
            ("archive_table", &self.archive_table),
            ("series_table", &self.series_table),
            ("mask_table", &self.mask_table),
        ] {
            if !path.is_file() {
                return Err(format!("{name} does not exist: {}", path.display()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir_uses_conventional_names() {
        let config = StoreConfig::from_dir("/data/tables");
        assert_eq!(
            config.archive_table,
            PathBuf::from("/data/tables/archive_paths.txt")
        );
        assert_eq!(
            config.series_table,
            PathBuf::from("/data/tables/series_paths.txt")
        );
        assert_eq!(
            config.mask_table,
            PathBuf::from("/data/tables/mask_paths.txt")
        );
    }

    #[test]
    fn test_validate_rejects_missing_tables() {
        let config = StoreConfig::from_dir("/nonexistent");
        assert!(config.validate().is_err());
    }
}
