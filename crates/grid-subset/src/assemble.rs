//! The slice assembler: one entry point that turns a raw field into a
//! finalized, coordinate-consistent [`GeoSlice`].
//!
//! Assembly order is fixed: wrap, zone compaction, year truncation, month
//! truncation, deferred axis selections, coordinate re-fit. Spatial
//! compaction runs first because it never invalidates time metadata.

use crate::error::Result;
use crate::frame::CoordinateFrame;
use crate::slice::{GeoSlice, Selector, TimeSelector};
use crate::zone::Zone;
use crate::GeoArray;
use tracing::{debug, warn};

/// Why a requested truncation was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The new start year precedes the imported range.
    StartBeforeImported { requested: i32, imported: i32 },
    /// The new end year exceeds the imported range.
    EndAfterImported { requested: i32, imported: i32 },
    /// The slice carries no time axis to truncate.
    NoTimeAxis,
    /// The stream was imported without a month axis.
    NoMonthAxis,
    /// The request names months outside the imported set.
    MonthsNotImported { missing: Vec<u32> },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::StartBeforeImported {
                requested,
                imported,
            } => write!(
                f,
                "new start year {requested} precedes imported start year {imported}"
            ),
            SkipReason::EndAfterImported {
                requested,
                imported,
            } => write!(
                f,
                "new end year {requested} exceeds imported end year {imported}"
            ),
            SkipReason::NoTimeAxis => write!(f, "slice carries no time axis"),
            SkipReason::NoMonthAxis => {
                write!(f, "month truncation is not available for this stream")
            }
            SkipReason::MonthsNotImported { missing } => {
                write!(f, "requested months {missing:?} were not imported")
            }
        }
    }
}

/// Outcome of one optional truncation step.
///
/// Truncation failures are recoverable by design: the step is skipped
/// entirely (never partially applied), the reason is recorded here, and the
/// assembler still returns a slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Truncation {
    /// The caller did not request this truncation.
    NotRequested,
    /// The truncation was applied in full.
    Applied,
    /// The truncation was skipped, with the reason.
    Skipped(SkipReason),
}

impl Truncation {
    pub fn was_applied(&self) -> bool {
        matches!(self, Truncation::Applied)
    }

    pub fn was_skipped(&self) -> bool {
        matches!(self, Truncation::Skipped(_))
    }
}

/// Everything a caller may ask of the assembler beyond the raw field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceRequest {
    pub zone: Zone,
    pub lon: Option<Selector>,
    pub lat: Option<Selector>,
    pub z: Option<Selector>,
    pub t: Option<TimeSelector>,
    pub new_start_year: Option<i32>,
    pub new_end_year: Option<i32>,
    pub new_months: Option<Vec<u32>>,
}

impl SliceRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn select_lon(mut self, selector: Selector) -> Self {
        self.lon = Some(selector);
        self
    }

    pub fn select_lat(mut self, selector: Selector) -> Self {
        self.lat = Some(selector);
        self
    }

    pub fn select_z(mut self, selector: Selector) -> Self {
        self.z = Some(selector);
        self
    }

    pub fn select_t(mut self, selector: TimeSelector) -> Self {
        self.t = Some(selector);
        self
    }

    pub fn start_year(mut self, year: i32) -> Self {
        self.new_start_year = Some(year);
        self
    }

    pub fn end_year(mut self, year: i32) -> Self {
        self.new_end_year = Some(year);
        self
    }

    pub fn months(mut self, months: Vec<u32>) -> Self {
        self.new_months = Some(months);
        self
    }
}

/// The assembler's product: the slice plus the explicit truncation outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    pub slice: GeoSlice,
    pub years: Truncation,
    pub months: Truncation,
}

/// Assemble a finalized slice from a raw field.
///
/// Truncation violations degrade to skips with a recorded reason; selection
/// on an absent axis is fatal. The year-bound convention: a new start year
/// equal to the imported one is a silent no-op, only a start year *before*
/// the imported range (or an end year after it) is rejected.
pub fn assemble(
    frame: &CoordinateFrame,
    raw: GeoArray,
    request: &SliceRequest,
) -> Result<Assembled> {
    let mut slice = GeoSlice::new(raw, frame);

    request.zone.compact(&mut slice)?;

    let years = truncate_years(&mut slice, frame, request)?;
    let months = truncate_months(&mut slice, frame, request)?;

    if let Some(selector) = request.lon {
        slice.select("lon", selector)?;
    }
    if let Some(selector) = request.lat {
        slice.select("lat", selector)?;
    }
    if let Some(selector) = request.z {
        slice.select("z", selector)?;
    }
    if let Some(selector) = request.t {
        slice.select_time(selector)?;
    }

    slice.fit_coordinates()?;

    Ok(Assembled {
        slice,
        years,
        months,
    })
}

fn truncate_years(
    slice: &mut GeoSlice,
    frame: &CoordinateFrame,
    request: &SliceRequest,
) -> Result<Truncation> {
    if request.new_start_year.is_none() && request.new_end_year.is_none() {
        return Ok(Truncation::NotRequested);
    }
    let start = request.new_start_year.unwrap_or(frame.start_year);
    let end = request.new_end_year.unwrap_or(frame.end_year);

    if start < frame.start_year {
        let reason = SkipReason::StartBeforeImported {
            requested: start,
            imported: frame.start_year,
        };
        warn!(%reason, "year truncation skipped");
        return Ok(Truncation::Skipped(reason));
    }
    if end > frame.end_year {
        let reason = SkipReason::EndAfterImported {
            requested: end,
            imported: frame.end_year,
        };
        warn!(%reason, "year truncation skipped");
        return Ok(Truncation::Skipped(reason));
    }
    if slice.data().times("t").is_none() {
        warn!("year truncation skipped: slice carries no time axis");
        return Ok(Truncation::Skipped(SkipReason::NoTimeAxis));
    }

    slice.crop_years(start, end)?;
    debug!(start, end, "truncated slice to new year range");
    Ok(Truncation::Applied)
}

fn truncate_months(
    slice: &mut GeoSlice,
    frame: &CoordinateFrame,
    request: &SliceRequest,
) -> Result<Truncation> {
    let requested = match &request.new_months {
        None => return Ok(Truncation::NotRequested),
        Some(months) => months,
    };
    let imported = match &frame.months {
        None => {
            warn!("month truncation skipped: stream has no month axis");
            return Ok(Truncation::Skipped(SkipReason::NoMonthAxis));
        }
        Some(months) => months,
    };
    let missing: Vec<u32> = requested
        .iter()
        .copied()
        .filter(|m| !imported.contains(m))
        .collect();
    if !missing.is_empty() {
        let reason = SkipReason::MonthsNotImported { missing };
        warn!(%reason, "month truncation skipped");
        return Ok(Truncation::Skipped(reason));
    }
    if slice.data().times("t").is_none() {
        warn!("month truncation skipped: slice carries no time axis");
        return Ok(Truncation::Skipped(SkipReason::NoTimeAxis));
    }

    slice.crop_months(requested)?;
    debug!(months = ?requested, "truncated slice to month subset");
    Ok(Truncation::Applied)
}
