//! On-disk file naming for the supported model families.
//!
//! File names are produced by concatenating onto the catalog's root prefix,
//! not by joining path components: stream stems routinely contain their own
//! subdirectories (`pf/xpabco#pf`) and roots need not end in a separator.

use crate::error::{Result, StoreError};
use paleo_common::month_code;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a stream's files are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileLayout {
    /// One file per month per year: `{root}{stem}{year:09}{code}+.nc`,
    /// with the two-letter month code.
    ArchiveMonths,
    /// One file per month per year, alternate family:
    /// `{root}{stem}{year:04}-{month:02}.nc`.
    HistoryMonths,
    /// One file per variable: `{root}{experiment}.{stem}.nc`.
    TimeSeries,
}

/// Path of one archive-month file.
pub fn archive_month_file(root: &str, stem: &str, year: i32, month: u32) -> Result<PathBuf> {
    let code = month_code(month).ok_or(StoreError::Calendar(
        paleo_common::CalendarError::UnknownMonth(month.to_string()),
    ))?;
    Ok(PathBuf::from(format!("{root}{stem}{year:09}{code}+.nc")))
}

/// Path of one history-month file.
pub fn history_month_file(root: &str, stem: &str, year: i32, month: u32) -> PathBuf {
    PathBuf::from(format!("{root}{stem}{year:04}-{month:02}.nc"))
}

/// Path of a time-series variable file.
pub fn series_file(root: &str, experiment: &str, stem: &str) -> PathBuf {
    PathBuf::from(format!("{root}{experiment}.{stem}.nc"))
}

impl FileLayout {
    /// The full expected path list for a year range and month subset, in
    /// year-major, month-minor order.
    pub fn month_paths(
        &self,
        root: &str,
        stem: &str,
        start_year: i32,
        end_year: i32,
        months: &[u32],
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(
            (end_year - start_year + 1).max(0) as usize * months.len(),
        );
        for year in start_year..=end_year {
            for &month in months {
                let path = match self {
                    FileLayout::ArchiveMonths => archive_month_file(root, stem, year, month)?,
                    FileLayout::HistoryMonths => history_month_file(root, stem, year, month),
                    FileLayout::TimeSeries => {
                        // A series stream has no per-month files.
                        continue;
                    }
                };
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
