//! Integration tests: write small NetCDF fixtures and drive the full
//! open/fetch pipeline over them.

use dataset_store::{hadcm3, noresm, CatalogEntry, ExperimentCatalog, ModelDataset, StoreError};
use grid_subset::{CoordField, Selector, SliceRequest, Zone, ZoneBox};
use paleo_common::{Date360, MonthSelection};
use std::path::Path;

const LATS: [f64; 3] = [-30.0, 0.0, 30.0];
const LONS: [f64; 4] = [0.0, 10.0, 20.0, 30.0];

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Surface temperature in Kelvin, decodable from its indices.
fn sample_value(time: usize, lat: usize, lon: usize) -> f64 {
    273.15 + time as f64 + lat as f64 * 0.1 + lon as f64 * 0.01
}

/// Write `{root}xpabc.tempsurf.monthly.nc` covering 1850-1851, monthly.
fn write_series_file(root: &Path) {
    let path = root.join("xpabc.tempsurf.monthly.nc");
    let mut file = netcdf::create(&path).expect("create series file");

    let n_time = 24;
    file.add_dimension("t", n_time).unwrap();
    file.add_dimension("surface", 1).unwrap();
    file.add_dimension("latitude", LATS.len()).unwrap();
    file.add_dimension("longitude", LONS.len()).unwrap();

    let days: Vec<f64> = (0..n_time).map(|i| (i * 30) as f64).collect();
    let mut t_var = file.add_variable::<f64>("t", &["t"]).unwrap();
    t_var.put_values(&days, ..).unwrap();
    t_var
        .put_attribute("units", "days since 1850-01-01".to_string())
        .unwrap();

    let mut lat_var = file.add_variable::<f64>("latitude", &["latitude"]).unwrap();
    lat_var.put_values(&LATS, ..).unwrap();
    let mut lon_var = file
        .add_variable::<f64>("longitude", &["longitude"])
        .unwrap();
    lon_var.put_values(&LONS, ..).unwrap();

    let mut values = Vec::with_capacity(n_time * LATS.len() * LONS.len());
    for time in 0..n_time {
        for lat in 0..LATS.len() {
            for lon in 0..LONS.len() {
                values.push(sample_value(time, lat, lon));
            }
        }
    }
    let mut data_var = file
        .add_variable::<f64>("temp_mm_srf", &["t", "surface", "latitude", "longitude"])
        .unwrap();
    data_var.put_values(&values, ..).unwrap();
}

fn series_catalog(root: &Path) -> ExperimentCatalog {
    ExperimentCatalog::from_entries([CatalogEntry {
        experiment: "xpabc".to_string(),
        root: format!("{}/", root.display()),
        aux: String::new(),
    }])
}

#[test]
fn series_open_imports_coordinates_and_time() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    write_series_file(dir.path());
    let catalog = series_catalog(dir.path());

    let dataset = ModelDataset::open(
        &catalog,
        "xpabc",
        1850,
        1851,
        MonthSelection::Full,
        hadcm3::surface_temp_series(),
    )
    .unwrap();

    let frame = dataset.frame();
    match frame.lon.as_ref().unwrap() {
        CoordField::Centers(lon) => assert_eq!(lon.as_slice().unwrap(), &LONS),
        other => panic!("expected 1-D centers, got {other:?}"),
    }
    // Guessed bounds: one more edge than centers.
    assert_eq!(frame.lon_bounds.as_ref().unwrap().len(), LONS.len() + 1);
    assert_eq!(frame.lat_bounds.as_ref().unwrap().len(), LATS.len() + 1);
    let time = frame.time.as_ref().unwrap();
    assert_eq!(time.len(), 24);
    assert_eq!(time[0], Date360::new(1850, 1, 1).unwrap());
    assert_eq!(time[23], Date360::new(1851, 12, 1).unwrap());
}

#[test]
fn series_year_range_outside_coverage_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_series_file(dir.path());
    let catalog = series_catalog(dir.path());

    let result = ModelDataset::open(
        &catalog,
        "xpabc",
        1840,
        1851,
        MonthSelection::Full,
        hadcm3::surface_temp_series(),
    );
    match result {
        Err(StoreError::RangeError {
            available_start,
            available_end,
            ..
        }) => {
            assert_eq!(available_start, 1850);
            assert_eq!(available_end, 1851);
        }
        other => panic!("expected RangeError, got {other:?}"),
    }
}

#[test]
fn series_fetch_assembles_a_consistent_slice() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    write_series_file(dir.path());
    let catalog = series_catalog(dir.path());

    let dataset = ModelDataset::open(
        &catalog,
        "xpabc",
        1850,
        1851,
        MonthSelection::Full,
        hadcm3::surface_temp_series(),
    )
    .unwrap();

    let request = SliceRequest::new()
        .zone(Zone::Box(ZoneBox::new().lon(10.0, 20.0)))
        .start_year(1851)
        .months(vec![1]);
    let assembled = dataset.fetch("temperature", &request).unwrap();

    assert!(assembled.years.was_applied());
    assert!(assembled.months.was_applied());

    let slice = assembled.slice;
    // One time step (1851-01), all three latitudes, two bounded longitudes;
    // the surface dimension was squeezed away.
    assert_eq!(slice.data().shape(), &[1, 3, 2]);
    assert_eq!(slice.data().coord_values("lon").unwrap(), &[10.0, 20.0]);
    let times = slice.data().times("t").unwrap();
    assert_eq!(times, &[Date360::new(1851, 1, 1).unwrap()]);

    // 1851-01 is time index 12; Kelvin converted to Celsius.
    let expected = sample_value(12, 1, 2) - 273.15;
    let got = slice.data().values()[[0, 1, 1]];
    assert!((got - expected).abs() < 1e-9);

    // Frame stays synchronized with the cropped data.
    let frame_lon = match slice.frame().lon.as_ref().unwrap() {
        CoordField::Centers(lon) => lon,
        other => panic!("expected centers, got {other:?}"),
    };
    assert_eq!(frame_lon.as_slice().unwrap(), &[10.0, 20.0]);
    assert_eq!(slice.frame().lon_bounds.as_ref().unwrap().len(), 3);
}

#[test]
fn series_fetch_unknown_variable_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_series_file(dir.path());
    let catalog = series_catalog(dir.path());

    let dataset = ModelDataset::open(
        &catalog,
        "xpabc",
        1850,
        1851,
        MonthSelection::Full,
        hadcm3::surface_temp_series(),
    )
    .unwrap();
    assert!(matches!(
        dataset.fetch("salinity", &SliceRequest::new()),
        Err(StoreError::UnknownVariable(_))
    ));
}

// ----------------------------------------------------------------------
// Curvilinear family
// ----------------------------------------------------------------------

/// A 2 x 3 curvilinear grid whose rows order their columns differently.
const PLON: [[f64; 3]; 2] = [[30.0, 10.0, 20.0], [5.0, 25.0, 15.0]];
const PLAT: [[f64; 3]; 2] = [[61.0, 62.0, 63.0], [71.0, 72.0, 73.0]];

fn write_curvilinear_fixture(root: &Path) -> std::path::PathBuf {
    // Grid-definition file.
    let grid_path = root.join("grid.nc");
    {
        let mut file = netcdf::create(&grid_path).expect("create grid file");
        file.add_dimension("y", 2).unwrap();
        file.add_dimension("x", 3).unwrap();
        let flat_lon: Vec<f64> = PLON.iter().flatten().copied().collect();
        let flat_lat: Vec<f64> = PLAT.iter().flatten().copied().collect();
        let mut lon_var = file.add_variable::<f64>("plon", &["y", "x"]).unwrap();
        lon_var.put_values(&flat_lon, ..).unwrap();
        let mut lat_var = file.add_variable::<f64>("plat", &["y", "x"]).unwrap();
        lat_var.put_values(&flat_lat, ..).unwrap();
    }

    // Two monthly history files; sst equals the raw (unsorted) longitude.
    std::fs::create_dir_all(root.join("ocn/hist")).unwrap();
    for month in 1..=2 {
        let path = root.join(format!("ocn/hist/n1850.micom.hm.0401-{month:02}.nc"));
        let mut file = netcdf::create(&path).expect("create history file");
        file.add_dimension("time", 1).unwrap();
        file.add_dimension("depth", 2).unwrap();
        file.add_dimension("y", 2).unwrap();
        file.add_dimension("x", 3).unwrap();
        let mut depth_var = file.add_variable::<f64>("depth", &["depth"]).unwrap();
        depth_var.put_values(&[50.0, 5.0], ..).unwrap();
        let flat_lon: Vec<f64> = PLON.iter().flatten().copied().collect();
        let mut sst_var = file
            .add_variable::<f64>("sst", &["time", "y", "x"])
            .unwrap();
        sst_var.put_values(&flat_lon, ..).unwrap();
    }
    grid_path
}

#[test]
fn curvilinear_open_reconciles_the_grid() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let grid_path = write_curvilinear_fixture(dir.path());
    let catalog = ExperimentCatalog::from_entries([CatalogEntry {
        experiment: "n1850".to_string(),
        root: format!("{}/", dir.path().display()),
        aux: grid_path.display().to_string(),
    }]);

    let dataset = ModelDataset::open(
        &catalog,
        "n1850",
        401,
        401,
        MonthSelection::Months(vec!["ja".into(), "fb".into()]),
        noresm::ocean_history(),
    )
    .unwrap();

    let frame = dataset.frame();
    // Sorted rows are non-decreasing.
    let lon = match frame.lon.as_ref().unwrap() {
        CoordField::Grid(lon) => lon,
        other => panic!("expected 2-D grid, got {other:?}"),
    };
    for row in lon.rows() {
        let row = row.to_vec();
        for w in row.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }
    // Cycled variant carries the wrap column.
    let lon_cycled = frame.lon_cycled.as_ref().unwrap();
    assert_eq!(lon_cycled.dim(), (2, 4));
    assert!((lon_cycled[(0, 3)] - (lon_cycled[(0, 0)] + 360.0)).abs() < 1e-12);
    // Depth sorted ascending.
    let z = match frame.z.as_ref().unwrap() {
        CoordField::Centers(z) => z,
        other => panic!("expected centers, got {other:?}"),
    };
    assert_eq!(z.as_slice().unwrap(), &[5.0, 50.0]);
    assert!(frame.transform.is_some());
}

#[test]
fn curvilinear_fetch_routes_data_through_the_transform() {
    let dir = tempfile::tempdir().expect("tempdir");
    let grid_path = write_curvilinear_fixture(dir.path());
    let catalog = ExperimentCatalog::from_entries([CatalogEntry {
        experiment: "n1850".to_string(),
        root: format!("{}/", dir.path().display()),
        aux: grid_path.display().to_string(),
    }]);

    let dataset = ModelDataset::open(
        &catalog,
        "n1850",
        401,
        401,
        MonthSelection::Months(vec!["ja".into(), "fb".into()]),
        noresm::ocean_history(),
    )
    .unwrap();

    let assembled = dataset.fetch("sst", &SliceRequest::new()).unwrap();
    let slice = assembled.slice;
    assert_eq!(slice.data().shape(), &[2, 2, 3]);

    // The data was the raw longitude field, so after the transform it must
    // equal the sorted longitude grid for every time step.
    let lon = match slice.frame().lon.as_ref().unwrap() {
        CoordField::Grid(lon) => lon.clone(),
        other => panic!("expected 2-D grid, got {other:?}"),
    };
    for time in 0..2 {
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(slice.data().values()[[time, i, j]], lon[(i, j)]);
            }
        }
    }

    // Time axis synthesized from the declared range and months.
    let times = slice.data().times("t").unwrap();
    assert_eq!(
        times,
        &[
            Date360::new(401, 1, 1).unwrap(),
            Date360::new(401, 2, 1).unwrap(),
        ]
    );
}

#[test]
fn curvilinear_time_selection_reduces_to_one_map() {
    let dir = tempfile::tempdir().expect("tempdir");
    let grid_path = write_curvilinear_fixture(dir.path());
    let catalog = ExperimentCatalog::from_entries([CatalogEntry {
        experiment: "n1850".to_string(),
        root: format!("{}/", dir.path().display()),
        aux: grid_path.display().to_string(),
    }]);

    let dataset = ModelDataset::open(
        &catalog,
        "n1850",
        401,
        401,
        MonthSelection::Months(vec!["ja".into(), "fb".into()]),
        noresm::ocean_history(),
    )
    .unwrap();

    let request = SliceRequest::new().select_t(grid_subset::TimeSelector::nearest(
        Date360::new(401, 2, 5).unwrap(),
    ));
    let assembled = dataset.fetch("sst", &request).unwrap();
    assert_eq!(assembled.slice.data().shape(), &[2, 3]);
    assert!(assembled.slice.frame().time.is_none());
}

// Selector on an axis the stream never carries stays fatal end-to-end.
#[test]
fn selection_on_missing_axis_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_series_file(dir.path());
    let catalog = series_catalog(dir.path());

    let dataset = ModelDataset::open(
        &catalog,
        "xpabc",
        1850,
        1851,
        MonthSelection::Full,
        hadcm3::surface_temp_series(),
    )
    .unwrap();

    let request = SliceRequest::new().select_z(Selector::nearest(100.0));
    assert!(matches!(
        dataset.fetch("temperature", &request),
        Err(StoreError::Slice(_))
    ));
}
