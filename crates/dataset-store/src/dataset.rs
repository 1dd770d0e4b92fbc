//! The model-dataset engine.
//!
//! One [`ModelDataset`] instance covers one (experiment, stream) pair: it
//! resolves the stream's file set at construction, imports coordinate
//! metadata once, and serves coordinate-consistent slices on demand. The
//! dataset itself is a long-lived coordinate/path cache; every fetch opens
//! fresh file handles and returns a new slice.

use crate::catalog::ExperimentCatalog;
use crate::descriptor::{AxisSpec, BoundsPolicy, GridKind, StreamSpec, VariableDescriptor};
use crate::error::{Result, StoreError};
use crate::layout::{series_file, FileLayout};
use crate::reader;
use grid_subset::{
    assemble, cycle_coordinates, sort_coordinates, transform_matrix, Assembled, AxisLabel,
    CoordField, CoordinateFrame, GeoArray, SliceRequest,
};
use ndarray::{ArrayD, Axis};
use paleo_common::{guess_bounds, staggered_bounds, Date360, MonthSelection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Dimension names treated as the record/time dimension in monthly files.
const TIME_DIM_CANDIDATES: [&str; 2] = ["t", "time"];

/// Renames applied to every field after its descriptor's own rename map.
const STANDARD_RENAMES: [(&str, &str); 7] = [
    ("longitude", "lon"),
    ("longitude_1", "lon"),
    ("latitude", "lat"),
    ("latitude_1", "lat"),
    ("depth", "z"),
    ("depth_1", "z"),
    ("time", "t"),
];

/// One experiment/stream pair, opened and coordinate-complete.
#[derive(Debug)]
pub struct ModelDataset {
    experiment: String,
    stream: StreamSpec,
    root: String,
    aux: String,
    paths: Vec<PathBuf>,
    series_path: Option<PathBuf>,
    frame: CoordinateFrame,
}

impl ModelDataset {
    /// Resolve, verify and open a dataset.
    ///
    /// Fails fast: an unregistered experiment, any missing file (all missing
    /// paths are enumerated) or a year range outside the file coverage abort
    /// construction.
    pub fn open(
        catalog: &ExperimentCatalog,
        experiment: &str,
        start_year: i32,
        end_year: i32,
        months: MonthSelection,
        stream: StreamSpec,
    ) -> Result<Self> {
        let month_numbers = months.resolve()?;
        let entry = catalog.get(experiment)?;

        let mut dataset = Self {
            experiment: experiment.to_string(),
            root: entry.root.clone(),
            aux: entry.aux.clone(),
            paths: Vec::new(),
            series_path: None,
            frame: CoordinateFrame::new(start_year, end_year, month_numbers),
            stream,
        };
        dataset.import_data()?;
        dataset.import_coordinates()?;

        info!(
            experiment,
            stream = %dataset.stream.name,
            start_year,
            end_year,
            files = dataset.paths.len().max(1),
            "opened model dataset"
        );
        Ok(dataset)
    }

    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    pub fn stream(&self) -> &StreamSpec {
        &self.stream
    }

    /// The coordinate frame imported at construction.
    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    /// The resolved monthly file list (empty for time-series streams).
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Read one variable and assemble it into a finalized slice.
    pub fn fetch(&self, variable: &str, request: &SliceRequest) -> Result<Assembled> {
        let descriptor = self
            .stream
            .variable(variable)
            .ok_or_else(|| StoreError::UnknownVariable(variable.to_string()))?
            .clone();
        debug!(variable, experiment = %self.experiment, "fetching variable");

        let raw = match self.stream.layout {
            FileLayout::TimeSeries => self.read_series(&descriptor)?,
            FileLayout::ArchiveMonths | FileLayout::HistoryMonths => {
                self.read_monthly(&descriptor)?
            }
        };
        Ok(assemble(&self.frame, raw, request)?)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Resolve the on-disk file set and verify every expected file exists.
    fn import_data(&mut self) -> Result<()> {
        let stem = self.stream.resolve_stem(&self.experiment);
        match self.stream.layout {
            FileLayout::ArchiveMonths | FileLayout::HistoryMonths => {
                let months = self
                    .frame
                    .months
                    .clone()
                    .ok_or_else(|| StoreError::MonthsRequired {
                        stream: self.stream.name.clone(),
                    })?;
                self.paths = self.stream.layout.month_paths(
                    &self.root,
                    &stem,
                    self.frame.start_year,
                    self.frame.end_year,
                    &months,
                )?;
                let missing: Vec<PathBuf> = self
                    .paths
                    .iter()
                    .filter(|p| !p.is_file())
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    return Err(StoreError::MissingFiles { paths: missing });
                }
                debug!(
                    stream = %self.stream.name,
                    files = self.paths.len(),
                    "resolved monthly file set"
                );
            }
            FileLayout::TimeSeries => {
                let path = series_file(&self.root, &self.experiment, &stem);
                if !path.is_file() {
                    return Err(StoreError::MissingFiles { paths: vec![path] });
                }
                self.series_path = Some(path);
            }
        }
        Ok(())
    }

    /// Populate the coordinate frame from a sample file (regular grids) or
    /// the grid-definition file (curvilinear grids), then build or restrict
    /// the time axis.
    fn import_coordinates(&mut self) -> Result<()> {
        let sample_path = self.sample_path().to_path_buf();
        let sample = reader::open(&sample_path)?;

        match self.stream.grid.clone() {
            GridKind::Regular { lon, lat, z } => {
                let (centers, bounds) = read_axis(&sample, &lon, &sample_path)?;
                self.frame.lon = Some(CoordField::Centers(centers));
                self.frame.lon_bounds = bounds;

                let (centers, bounds) = read_axis(&sample, &lat, &sample_path)?;
                self.frame.lat = Some(CoordField::Centers(centers));
                self.frame.lat_bounds = bounds;

                if let Some(z) = z {
                    let (centers, bounds) = read_axis(&sample, &z, &sample_path)?;
                    self.frame.z = Some(CoordField::Centers(centers));
                    self.frame.z_bounds = bounds;
                }
            }
            GridKind::Curvilinear {
                lon_var,
                lat_var,
                z_var,
            } => {
                let grid_path = PathBuf::from(&self.aux);
                if !grid_path.is_file() {
                    return Err(StoreError::MissingFiles {
                        paths: vec![grid_path],
                    });
                }
                let grid = reader::open(&grid_path)?;
                let raw_lon = reader::read_2d(&grid, &lon_var, &grid_path)?;
                let raw_lat = reader::read_2d(&grid, &lat_var, &grid_path)?;

                let (sorted_lon, sorted_lat) = sort_coordinates(&raw_lon, &raw_lat);
                let (lon_cycled, lat_cycled) = cycle_coordinates(&raw_lon, &raw_lat);
                self.frame.transform = Some(transform_matrix(&raw_lon));
                self.frame.lon = Some(CoordField::Grid(sorted_lon));
                self.frame.lat = Some(CoordField::Grid(sorted_lat));
                self.frame.lon_cycled = Some(lon_cycled);
                self.frame.lat_cycled = Some(lat_cycled);

                let mut z = reader::read_1d(&sample, &z_var, &sample_path)?.to_vec();
                z.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                self.frame.z_bounds = guess_bounds(&z);
                self.frame.z = Some(CoordField::Centers(ndarray::Array1::from_vec(z)));
            }
        }

        self.frame.time = Some(match self.stream.layout {
            FileLayout::TimeSeries => self.restricted_series_times(&sample, &sample_path)?,
            FileLayout::ArchiveMonths | FileLayout::HistoryMonths => self.synthetic_times(),
        });
        debug!(stream = %self.stream.name, "imported coordinates");
        Ok(())
    }

    fn sample_path(&self) -> &Path {
        match &self.series_path {
            Some(path) => path,
            // import_data guarantees a non-empty path list for monthly layouts.
            None => &self.paths[0],
        }
    }

    /// One time step per declared (year, month) pair, on the model calendar.
    fn synthetic_times(&self) -> Vec<Date360> {
        let months = self.frame.months.as_deref().unwrap_or(&[]);
        (self.frame.start_year..=self.frame.end_year)
            .flat_map(|year| {
                months.iter().map(move |&month| {
                    Date360::new(year, month, 1).expect("month from validated selection")
                })
            })
            .collect()
    }

    /// Read the series file's time axis, validate coverage, and restrict it
    /// to `[start-01-01, end-12-30]` and the month subset.
    fn restricted_series_times(
        &self,
        file: &netcdf::File,
        path: &Path,
    ) -> Result<Vec<Date360>> {
        let time_var = self.time_var();
        let times = reader::read_time_axis(file, time_var, path)?;

        let available_start = times.iter().map(|t| t.year()).min();
        let available_end = times.iter().map(|t| t.year()).max();
        let (available_start, available_end) = match (available_start, available_end) {
            (Some(s), Some(e)) => (s, e),
            _ => (i32::MAX, i32::MIN),
        };
        if self.frame.start_year < available_start || self.frame.end_year > available_end {
            return Err(StoreError::RangeError {
                requested_start: self.frame.start_year,
                requested_end: self.frame.end_year,
                available_start,
                available_end,
            });
        }

        Ok(self.restrict_to_window(times))
    }

    fn restrict_to_window(&self, times: Vec<Date360>) -> Vec<Date360> {
        let from = Date360::new(self.frame.start_year, 1, 1).expect("fixed calendar day");
        let to = Date360::new(self.frame.end_year, 12, 30).expect("fixed calendar day");
        times
            .into_iter()
            .filter(|t| (from..=to).contains(t))
            .filter(|t| match &self.frame.months {
                Some(months) => months.contains(&t.month()),
                None => true,
            })
            .collect()
    }

    fn time_var(&self) -> &str {
        self.stream.time_var.as_deref().unwrap_or("t")
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Read a variable from a time-series file and restrict its time axis to
    /// the declared window and month subset.
    fn read_series(&self, descriptor: &VariableDescriptor) -> Result<GeoArray> {
        let path = match &self.series_path {
            Some(path) => path.clone(),
            None => unreachable!("series layout always has a series path"),
        };
        let file = reader::open(&path)?;
        let time_var = self.time_var().to_string();
        let times = reader::read_time_axis(&file, &time_var, &path)?;

        let field = reader::read_field(&file, &descriptor.var_name, &path)?;
        let axes = label_axes(&file, &field.dims, Some((time_var.as_str(), times.as_slice())));
        let mut array = GeoArray::new(field.values, axes)?;
        self.finish_field(&mut array, descriptor)?;

        let from = Date360::new(self.frame.start_year, 1, 1).expect("fixed calendar day");
        let to = Date360::new(self.frame.end_year, 12, 30).expect("fixed calendar day");
        let months = self.frame.months.clone();
        array.retain_by_times("t", |t| {
            (from..=to).contains(t)
                && months.as_ref().map_or(true, |m| m.contains(&t.month()))
        })?;
        Ok(array)
    }

    /// Read a variable from every monthly file and concatenate along a new
    /// leading time axis.
    fn read_monthly(&self, descriptor: &VariableDescriptor) -> Result<GeoArray> {
        let mut blocks: Vec<ArrayD<f64>> = Vec::with_capacity(self.paths.len());
        let mut space_axes: Option<Vec<AxisLabel>> = None;

        for path in &self.paths {
            let file = reader::open(path)?;
            let mut field = reader::read_field(&file, &descriptor.var_name, path)?;

            // Monthly files carry the record dimension with a single entry;
            // drop it before stacking.
            for candidate in TIME_DIM_CANDIDATES {
                if let Some(pos) = field.dims.iter().position(|d| d == candidate) {
                    if field.values.shape()[pos] == 1 {
                        field.values = field.values.index_axis(Axis(pos), 0).to_owned();
                        field.dims.remove(pos);
                    }
                }
            }

            if space_axes.is_none() {
                space_axes = Some(label_axes(&file, &field.dims, None));
            }
            blocks.push(field.values);
        }

        let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
        let stacked = ndarray::stack(Axis(0), &views)?;

        let times = self
            .frame
            .time
            .clone()
            .unwrap_or_default();
        let mut axes = vec![AxisLabel::times("t", times)];
        axes.extend(space_axes.unwrap_or_default());
        let mut array = GeoArray::new(stacked, axes)?;
        self.finish_field(&mut array, descriptor)?;
        Ok(array)
    }

    /// Squeeze, rename, transform and convert a freshly read field.
    fn finish_field(&self, array: &mut GeoArray, descriptor: &VariableDescriptor) -> Result<()> {
        for dim in &descriptor.squeeze {
            if array.has_axis(dim) {
                array.collapse(dim, 0)?;
            }
        }
        for (from, to) in &descriptor.rename {
            array.rename_axis(from, to);
        }
        for (from, to) in STANDARD_RENAMES {
            array.rename_axis(from, to);
        }
        if let Some(matrix) = &self.frame.transform {
            array.apply_transform(matrix)?;
        }
        if let Some(conversion) = descriptor.convert {
            conversion.apply(array);
        }
        Ok(())
    }
}

/// Read one regular-grid axis with its bounds policy.
fn read_axis(
    file: &netcdf::File,
    spec: &AxisSpec,
    path: &Path,
) -> Result<(ndarray::Array1<f64>, Option<ndarray::Array1<f64>>)> {
    let centers = reader::read_1d(file, &spec.var, path)?;
    let bounds = match &spec.bounds {
        BoundsPolicy::Guess => centers.as_slice().and_then(|c| guess_bounds(c)),
        BoundsPolicy::Stagger(stagger_var) => {
            let staggered = reader::read_1d(file, stagger_var, path)?;
            staggered.as_slice().and_then(|s| staggered_bounds(s))
        }
    };
    Ok((centers, bounds))
}

/// Label a field's dimensions with coordinates from the file.
fn label_axes(
    file: &netcdf::File,
    dims: &[String],
    time: Option<(&str, &[Date360])>,
) -> Vec<AxisLabel> {
    dims.iter()
        .map(|dim| {
            if let Some((time_var, times)) = time {
                if dim == time_var {
                    return AxisLabel::times(dim.clone(), times.to_vec());
                }
            }
            match reader::coord_if_present(file, dim) {
                Some(coords) => AxisLabel::values(dim.clone(), coords),
                None => AxisLabel::index(dim.clone()),
            }
        })
        .collect()
}
