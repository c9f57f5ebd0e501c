//! High-level conversion entry points.
//!
//! One pipeline per processor dialect, all following the same shape:
//! read sidecars, resolve metadata, decode rasters, assemble the product,
//! write the container. Used by the CLI; embeddable directly.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::info;

use crate::core::assemble::{Product, assemble};
use crate::core::footprint::FootprintPolygon;
use crate::core::resolve::{
    self, DateConvention, ResolveError, parse_acquisition_date, temporal_baseline,
};
use crate::error::Result;
use crate::io::writers::write_product;
use crate::io::{
    GridReader, RawRaster, read_flat_keyvalue, read_keyvalue_table, read_plane_f32,
    read_plane_i16, read_processing_tree, read_raster_properties,
};
use crate::types::{AttributeMap, AttributeValue, BandRole, GeoTransform, SampleLayout};

/// Caller-supplied metadata that beats every sidecar source. Only fields
/// that are `Some` participate; `processing_type` always does.
#[derive(Debug, Clone)]
pub struct SceneOverrides {
    pub mission: Option<String>,
    pub processing_type: String,
    pub beam_mode: Option<String>,
    pub frame: Option<i64>,
    pub polarization: Option<String>,
    pub flight_direction: Option<String>,
    pub look_direction: Option<String>,
    pub processing_software: Option<String>,
    pub processing_software_version: Option<String>,
    pub processing_atmos_correct_method: Option<String>,
    pub processing_facility: Option<String>,
}

impl Default for SceneOverrides {
    fn default() -> Self {
        SceneOverrides {
            mission: None,
            processing_type: "INTERFEROGRAM".to_string(),
            beam_mode: None,
            frame: None,
            polarization: None,
            flight_direction: None,
            look_direction: None,
            processing_software: None,
            processing_software_version: None,
            processing_atmos_correct_method: None,
            processing_facility: None,
        }
    }
}

impl SceneOverrides {
    fn to_attribute_map(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        map.insert(
            "processing_type".to_string(),
            AttributeValue::from(self.processing_type.as_str()),
        );
        let optional: [(&str, &Option<String>); 9] = [
            ("mission", &self.mission),
            ("beam_mode", &self.beam_mode),
            ("polarization", &self.polarization),
            ("flight_direction", &self.flight_direction),
            ("look_direction", &self.look_direction),
            ("processing_software", &self.processing_software),
            (
                "processing_software_version",
                &self.processing_software_version,
            ),
            (
                "processing_atmos_correct_method",
                &self.processing_atmos_correct_method,
            ),
            ("processing_facility", &self.processing_facility),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                map.insert(key.to_string(), AttributeValue::from(value.as_str()));
            }
        }
        if let Some(frame) = self.frame {
            map.insert("frame".to_string(), AttributeValue::Int(frame));
        }
        map
    }
}

/// Inputs of a ROI_PAC conversion. Raster paths left `None` resolve to
/// the standard `geo_<first>-<last>.*` names under `work_dir`.
#[derive(Debug, Clone)]
pub struct RoipacJob {
    pub rsc1: PathBuf,
    pub rsc2: PathBuf,
    pub beam_swath: String,
    pub baseline_rsc: Option<PathBuf>,
    pub unwrapped: Option<PathBuf>,
    pub wrapped: Option<PathBuf>,
    pub correlation: Option<PathBuf>,
    pub incidence: Option<PathBuf>,
    pub dem: Option<PathBuf>,
    pub work_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Inputs of a GMTSAR conversion. The geocoded grids carry their own
/// geotransform, so only the PRM sidecars and the footprint are needed
/// beyond the raster paths.
#[derive(Debug, Clone)]
pub struct GmtsarJob {
    pub prm1: PathBuf,
    pub prm2: PathBuf,
    pub relative_orbit: i64,
    pub footprint: String,
    pub beam_swath: String,
    pub wrapped: PathBuf,
    pub unwrapped: PathBuf,
    pub filtered: PathBuf,
    pub correlation: PathBuf,
    pub output_dir: PathBuf,
}

/// Inputs of an ISCE conversion. The footprint either arrives as WKT or
/// is recovered (low confidence) from the processing log.
#[derive(Debug, Clone)]
pub struct IsceJob {
    pub raster_xml: PathBuf,
    pub wrapped: PathBuf,
    pub unwrapped: PathBuf,
    pub correlation: PathBuf,
    pub los: PathBuf,
    pub proc_xml: PathBuf,
    pub processing_log: PathBuf,
    pub footprint: Option<String>,
    pub beam_swath: String,
    pub output_dir: PathBuf,
}

fn rsc_path(raster: &Path) -> PathBuf {
    PathBuf::from(format!("{}.rsc", raster.display()))
}

fn rsc_dimensions(rsc: &AttributeMap) -> std::result::Result<(usize, usize), ResolveError> {
    let length = resolve::require_int(rsc, "FILE_LENGTH")? as usize;
    let width = resolve::require_int(rsc, "WIDTH")? as usize;
    Ok((length, width))
}

fn rsc_geotransform(rsc: &AttributeMap) -> std::result::Result<GeoTransform, ResolveError> {
    Ok(GeoTransform {
        x_first: resolve::require_float(rsc, "X_FIRST")?,
        x_step: resolve::require_float(rsc, "X_STEP")?,
        y_first: resolve::require_float(rsc, "Y_FIRST")?,
        y_step: resolve::require_float(rsc, "Y_STEP")?,
    })
}

fn corner(rsc: &AttributeMap, n: usize) -> std::result::Result<(f64, f64), ResolveError> {
    Ok((
        resolve::require_float(rsc, &format!("LON_REF{n}"))?,
        resolve::require_float(rsc, &format!("LAT_REF{n}"))?,
    ))
}

// Decode one interleaved raster using the dimensions from its own rsc.
fn decode_with_own_rsc(
    path: &Path,
    layout: SampleLayout,
) -> Result<(Array2<f32>, Array2<f32>, AttributeMap)> {
    let rsc = read_keyvalue_table(rsc_path(path))?;
    let (length, width) = rsc_dimensions(&rsc)?;
    let raster = RawRaster::from_file(path, length, width, layout)?;
    let (a, b) = raster.decode()?;
    Ok((a, b, rsc))
}

fn finalize(product: &Product, output_dir: &Path) -> Result<PathBuf> {
    let stem = resolve::product_stem(&product.attrs)?;
    let destination = output_dir.join(format!("{stem}.h5"));
    write_product(product, &destination)?;
    info!("Container written: {:?}", destination);
    Ok(destination)
}

fn insert_if_present(
    derived: &mut AttributeMap,
    key: &str,
    source: &AttributeMap,
    source_key: &str,
) {
    if let Some(value) = source.get(source_key) {
        derived.insert(key.to_string(), value.clone());
    }
}

/// Convert a ROI_PAC scene into an archival container; returns the path
/// of the container written.
pub fn convert_roipac(job: &RoipacJob, overrides: &SceneOverrides) -> Result<PathBuf> {
    let rsc_master = read_keyvalue_table(&job.rsc1)?;
    let rsc_slave = read_keyvalue_table(&job.rsc2)?;

    let first_date = parse_acquisition_date(
        "DATE",
        resolve::require_str(&rsc_master, "DATE")?,
        DateConvention::CompactYmd,
    )?;
    let last_date = parse_acquisition_date(
        "DATE",
        resolve::require_str(&rsc_slave, "DATE")?,
        DateConvention::CompactYmd,
    )?;
    let (c1, c2) = (
        first_date.format("%y%m%d").to_string(),
        last_date.format("%y%m%d").to_string(),
    );

    let baseline_path = job
        .baseline_rsc
        .clone()
        .unwrap_or_else(|| job.work_dir.join(format!("{c1}_{c2}_baseline.rsc")));
    let rsc_baseline = read_keyvalue_table(&baseline_path)?;

    // Standard output names from the processing run, overridable per file
    let geo_root = job.work_dir.join(format!("geo_{c1}-{c2}"));
    let with_ext = |ext: &str| PathBuf::from(format!("{}.{ext}", geo_root.display()));
    let unw_path = job.unwrapped.clone().unwrap_or_else(|| with_ext("unw"));
    let int_path = job.wrapped.clone().unwrap_or_else(|| with_ext("int"));
    let cor_path = job.correlation.clone().unwrap_or_else(|| with_ext("cor"));
    let inc_path = job
        .incidence
        .clone()
        .unwrap_or_else(|| job.work_dir.join("geo_incidence.unw"));
    let dem_path = job
        .dem
        .clone()
        .unwrap_or_else(|| job.work_dir.join("../DEM/roipac.dem"));

    let (_unw_amp, unw_phase, _) =
        decode_with_own_rsc(&unw_path, SampleLayout::InterleavedFloat32Pairs)?;
    let (_int_amp, int_phase, wrap_rsc) = decode_with_own_rsc(&int_path, SampleLayout::Complex64)?;
    let (_cor_amp, cor_phase, _) =
        decode_with_own_rsc(&cor_path, SampleLayout::InterleavedFloat32Pairs)?;
    // The incidence product stores the angle in its amplitude rows
    let (inc_angle, _inc_phase, _) =
        decode_with_own_rsc(&inc_path, SampleLayout::InterleavedFloat32Pairs)?;
    let dem_rsc = read_keyvalue_table(rsc_path(&dem_path))?;
    let (dem_length, dem_width) = rsc_dimensions(&dem_rsc)?;
    let dem = read_plane_i16(&dem_path, dem_length, dem_width)?;

    let geo = rsc_geotransform(&wrap_rsc)?;
    let footprint = FootprintPolygon::from_corners(
        corner(&wrap_rsc, 1)?,
        corner(&wrap_rsc, 3)?,
        corner(&wrap_rsc, 4)?,
        corner(&wrap_rsc, 2)?,
    );

    let mut derived = AttributeMap::new();
    derived.insert(
        "mission".to_string(),
        AttributeValue::from(resolve::require_str(&rsc_master, "PLATFORM")?),
    );
    derived.insert(
        "beam_swath".to_string(),
        AttributeValue::from(job.beam_swath.as_str()),
    );
    derived.insert(
        "relative_orbit".to_string(),
        AttributeValue::Int(resolve::require_int(&rsc_master, "TRACK")?),
    );
    derived.insert("first_date".to_string(), AttributeValue::Date(first_date));
    derived.insert("last_date".to_string(), AttributeValue::Date(last_date));
    derived.insert(
        "temporal_baseline".to_string(),
        AttributeValue::Int(temporal_baseline(first_date, last_date)),
    );
    if let Some(frame) = rsc_master.get("FIRST_FRAME").and_then(AttributeValue::to_int) {
        derived.insert("frame".to_string(), AttributeValue::Int(frame));
    }
    if let Some(direction) = rsc_master.get("ORBIT_DIRECTION").and_then(|v| v.as_str()) {
        derived.insert(
            "flight_direction".to_string(),
            AttributeValue::from(direction.to_uppercase()),
        );
    }
    if let Some(side) = rsc_master.get("ANTENNA_SIDE").and_then(AttributeValue::to_int) {
        derived.insert(
            "look_direction".to_string(),
            AttributeValue::from(resolve::look_direction_from_antenna_side(side)),
        );
    }
    insert_if_present(&mut derived, "polarization", &rsc_master, "POLARIZATION");
    if let Some(prf) = rsc_master.get("PRF").and_then(AttributeValue::to_float) {
        derived.insert("prf".to_string(), AttributeValue::Float(prf));
    }
    for (prefix, rsc) in [("master", &rsc_master), ("slave", &rsc_slave)] {
        insert_if_present(&mut derived, &format!("{prefix}_platform"), rsc, "PLATFORM");
        if let Some(orbit) = rsc.get("ORBIT_NUMBER").and_then(AttributeValue::to_int) {
            derived.insert(
                format!("{prefix}_absolute_orbit"),
                AttributeValue::Int(orbit),
            );
        }
        let doppler: Vec<&str> = (0..4)
            .filter_map(|i| rsc.get(&format!("DOPPLER_RANGE{i}")).and_then(|v| v.as_str()))
            .collect();
        if doppler.len() == 4 {
            derived.insert(
                format!("{prefix}_doppler"),
                AttributeValue::from(doppler.join(", ")),
            );
        }
    }
    let baseline_perp = (resolve::require_float(&rsc_baseline, "P_BASELINE_TOP_HDR")?
        + resolve::require_float(&rsc_baseline, "P_BASELINE_BOTTOM_HDR")?)
        / 2.0;
    derived.insert(
        "baseline_perp".to_string(),
        AttributeValue::Float(baseline_perp),
    );
    derived.insert("processing_dem".to_string(), AttributeValue::from("SRTM"));
    derived.insert(
        "history".to_string(),
        AttributeValue::from(resolve::history_stamp()),
    );

    // Raw wrapped-raster and baseline sidecars ride along wholesale, as
    // lower-precedence sources under the derived fields
    let mut attrs = resolve::resolve(
        &[&wrap_rsc, &rsc_baseline, &derived],
        &overrides.to_attribute_map(),
    )?;
    resolve::augment_with_raster_stats(&mut attrs, &cor_phase);

    let mut bands = BTreeMap::new();
    bands.insert(BandRole::UnwrappedInterferogram, unw_phase);
    bands.insert(BandRole::WrappedInterferogram, int_phase);
    bands.insert(BandRole::Correlation, cor_phase);
    bands.insert(BandRole::IncidenceAngle, inc_angle);
    bands.insert(BandRole::DigitalElevationModel, dem);

    let product = assemble(bands, geo, attrs, footprint)?;
    finalize(&product, &job.output_dir)
}

/// Convert a GMTSAR scene into an archival container; returns the path
/// of the container written.
pub fn convert_gmtsar(job: &GmtsarJob, overrides: &SceneOverrides) -> Result<PathBuf> {
    let prm_master = read_flat_keyvalue(&job.prm1)?;
    let prm_slave = read_flat_keyvalue(&job.prm2)?;

    let first_date = parse_acquisition_date(
        "SC_clock_start",
        resolve::require_str(&prm_master, "SC_clock_start")?,
        DateConvention::YearDayOfYear,
    )?;
    let last_date = parse_acquisition_date(
        "SC_clock_start",
        resolve::require_str(&prm_slave, "SC_clock_start")?,
        DateConvention::YearDayOfYear,
    )?;

    let footprint = FootprintPolygon::from_wkt(&job.footprint)?;

    let wrapped_grid = GridReader::open(&job.wrapped)?;
    let geo = wrapped_grid.geo_transform();
    let (length, width) = (wrapped_grid.length(), wrapped_grid.width());
    let wrapped = wrapped_grid.read_plane()?;
    let unwrapped = GridReader::open(&job.unwrapped)?.read_plane()?;
    let filtered = GridReader::open(&job.filtered)?.read_plane()?;
    let correlation = GridReader::open(&job.correlation)?.read_plane()?;

    let mut derived = AttributeMap::new();
    // A mission override always wins; otherwise map the spacecraft id
    if overrides.mission.is_none() {
        let id = resolve::require_str(&prm_master, "SC_identity")?;
        let mission = resolve::mission_from_spacecraft_id(id)
            .ok_or_else(|| ResolveError::MissingSourceField("mission".to_string()))?;
        derived.insert("mission".to_string(), AttributeValue::from(mission));
    }
    derived.insert(
        "beam_swath".to_string(),
        AttributeValue::from(job.beam_swath.as_str()),
    );
    derived.insert(
        "relative_orbit".to_string(),
        AttributeValue::Int(job.relative_orbit),
    );
    derived.insert("first_date".to_string(), AttributeValue::Date(first_date));
    derived.insert("last_date".to_string(), AttributeValue::Date(last_date));
    derived.insert(
        "temporal_baseline".to_string(),
        AttributeValue::Int(temporal_baseline(first_date, last_date)),
    );
    let flight = prm_master
        .get("orbdir")
        .and_then(|v| v.as_str())
        .unwrap_or("A");
    derived.insert(
        "flight_direction".to_string(),
        AttributeValue::from(flight),
    );
    derived.insert("look_direction".to_string(), AttributeValue::from("R"));
    derived.insert(
        "prf".to_string(),
        AttributeValue::Float(resolve::require_float(&prm_master, "PRF")?),
    );
    derived.insert(
        "wavelength".to_string(),
        AttributeValue::Float(resolve::require_float(&prm_master, "radar_wavelength")?),
    );
    let mission_name = overrides
        .mission
        .clone()
        .or_else(|| derived.get("mission").map(|v| v.to_string()))
        .unwrap_or_default();
    derived.insert(
        "master_platform".to_string(),
        AttributeValue::from(mission_name.as_str()),
    );
    derived.insert(
        "slave_platform".to_string(),
        AttributeValue::from(mission_name.as_str()),
    );
    insert_if_present(&mut derived, "master_doppler", &prm_master, "fd1");
    insert_if_present(&mut derived, "slave_doppler", &prm_slave, "fd1");
    derived.insert(
        "baseline_perp".to_string(),
        AttributeValue::Float(resolve::require_float(&prm_slave, "baseline_center")?),
    );
    derived.insert("processing_dem".to_string(), AttributeValue::from("SRTM1"));
    derived.insert(
        "history".to_string(),
        AttributeValue::from(resolve::history_stamp()),
    );
    let software = overrides.processing_software.as_deref().unwrap_or("GMTSAR");
    let version = overrides
        .processing_software_version
        .as_deref()
        .unwrap_or("");
    let facility = overrides.processing_facility.as_deref().unwrap_or("");
    derived.insert(
        "description".to_string(),
        AttributeValue::from(format!(
            "Interferogram generated with {software} version {version} by {facility}"
        )),
    );
    // Grid geometry rides along in the legacy upper-case keys
    derived.insert("X_FIRST".to_string(), AttributeValue::Float(geo.x_first));
    derived.insert("X_STEP".to_string(), AttributeValue::Float(geo.x_step));
    derived.insert("X_UNIT".to_string(), AttributeValue::from("degrees"));
    derived.insert("Y_FIRST".to_string(), AttributeValue::Float(geo.y_first));
    derived.insert("Y_STEP".to_string(), AttributeValue::Float(geo.y_step));
    derived.insert("Y_UNIT".to_string(), AttributeValue::from("degrees"));
    derived.insert(
        "FILE_LENGTH".to_string(),
        AttributeValue::Int(length as i64),
    );
    derived.insert("WIDTH".to_string(), AttributeValue::Int(width as i64));

    let mut attrs = resolve::resolve(&[&derived], &overrides.to_attribute_map())?;
    resolve::augment_with_raster_stats(&mut attrs, &correlation);

    let mut bands = BTreeMap::new();
    bands.insert(BandRole::WrappedInterferogram, wrapped);
    bands.insert(BandRole::UnwrappedInterferogram, unwrapped);
    bands.insert(BandRole::WrappedFilteredInterferogram, filtered);
    bands.insert(BandRole::Correlation, correlation);

    let product = assemble(bands, geo, attrs, footprint)?;
    finalize(&product, &job.output_dir)
}

/// Convert an ISCE scene into an archival container; returns the path of
/// the container written.
pub fn convert_isce(job: &IsceJob, overrides: &SceneOverrides) -> Result<PathBuf> {
    let props = read_raster_properties(&job.raster_xml)?;
    let grid = crate::io::isce::grid_from_properties(&props)?;
    let (length, width) = (grid.length, grid.width);
    let proc = read_processing_tree(&job.proc_xml)?;

    let first_date = parse_acquisition_date(
        "master/frame/SENSING_START",
        resolve::require_str(&proc, "master/frame/SENSING_START")?,
        DateConvention::IsoTimestamp,
    )?;
    let last_date = parse_acquisition_date(
        "slave/frame/SENSING_START",
        resolve::require_str(&proc, "slave/frame/SENSING_START")?,
        DateConvention::IsoTimestamp,
    )?;

    let footprint = match &job.footprint {
        Some(wkt) => FootprintPolygon::from_wkt(wkt)?,
        None => FootprintPolygon::from_processing_log(&job.processing_log)?,
    };

    let wrapped_raster =
        RawRaster::from_file(&job.wrapped, length, width, SampleLayout::Complex64)?;
    let (_int_amp, int_phase) = wrapped_raster.decode()?;
    let unw_raster = RawRaster::from_file(
        &job.unwrapped,
        length,
        width,
        SampleLayout::InterleavedFloat32Pairs,
    )?;
    let (_unw_amp, unw_phase) = unw_raster.decode()?;
    let los_raster = RawRaster::from_file(
        &job.los,
        length,
        width,
        SampleLayout::InterleavedFloat32Pairs,
    )?;
    // Line-of-sight product: the archive keeps its second plane
    let (_los_first, los_angle) = los_raster.decode()?;
    let correlation = read_plane_f32(&job.correlation, length, width)?;

    let mut mission = resolve::require_str(&proc, "master/platform/MISSION")?.to_string();
    let relative_orbit = match proc
        .get("master/frame/TRACK_NUMBER")
        .and_then(AttributeValue::to_int)
    {
        Some(track) => track,
        None => {
            let absolute = resolve::require_int(&proc, "master/frame/ORBIT_NUMBER")?;
            let (short_mission, relative) = resolve::csk_relative_orbit(&mission, absolute)
                .ok_or_else(|| ResolveError::MissingSourceField("relative_orbit".to_string()))?;
            mission = short_mission;
            relative
        }
    };

    let mut derived = AttributeMap::new();
    derived.insert("mission".to_string(), AttributeValue::from(mission.as_str()));
    derived.insert(
        "beam_swath".to_string(),
        AttributeValue::from(job.beam_swath.as_str()),
    );
    derived.insert(
        "relative_orbit".to_string(),
        AttributeValue::Int(relative_orbit),
    );
    derived.insert("first_date".to_string(), AttributeValue::Date(first_date));
    derived.insert("last_date".to_string(), AttributeValue::Date(last_date));
    derived.insert(
        "temporal_baseline".to_string(),
        AttributeValue::Int(temporal_baseline(first_date, last_date)),
    );
    derived.insert("frame".to_string(), AttributeValue::Int(0));
    insert_if_present(
        &mut derived,
        "flight_direction",
        &proc,
        "master/frame/PASS_DIRECTION",
    );
    if let Some(side) = proc.get("master/lookSide").and_then(AttributeValue::to_int) {
        derived.insert(
            "look_direction".to_string(),
            AttributeValue::from(resolve::look_direction_from_antenna_side(side)),
        );
    }
    if let Some(wavelength) = proc
        .get("master/wavelength")
        .and_then(AttributeValue::to_float)
    {
        derived.insert("wavelength".to_string(), AttributeValue::Float(wavelength));
    }
    insert_if_present(
        &mut derived,
        "polarization",
        &proc,
        "master/frame/POLARIZATION",
    );
    if let Some(prf) = proc.get("master/prf").and_then(AttributeValue::to_float) {
        derived.insert("prf".to_string(), AttributeValue::Float(prf));
    }
    for (prefix, platform_key, orbit_key, start_key, stop_key) in [
        (
            "master",
            "master/platform/MISSION",
            "master/frame/ORBIT_NUMBER",
            "master/frame/SENSING_START",
            "master/frame/SENSING_STOP",
        ),
        (
            "slave",
            "slave/platform/MISSION",
            "slave/frame/ORBIT_NUMBER",
            "slave/frame/SENSING_START",
            "slave/frame/SENSING_STOP",
        ),
    ] {
        insert_if_present(&mut derived, &format!("{prefix}_platform"), &proc, platform_key);
        if let Some(orbit) = proc.get(orbit_key).and_then(AttributeValue::to_int) {
            derived.insert(
                format!("{prefix}_absolute_orbit"),
                AttributeValue::Int(orbit),
            );
        }
        insert_if_present(&mut derived, &format!("{prefix}_sensing_start"), &proc, start_key);
        insert_if_present(&mut derived, &format!("{prefix}_sensing_stop"), &proc, stop_key);
    }
    derived.insert("width".to_string(), AttributeValue::Int(width as i64));
    derived.insert("length".to_string(), AttributeValue::Int(length as i64));
    derived.insert("xstep".to_string(), AttributeValue::Float(grid.geo.x_step));
    derived.insert("ystep".to_string(), AttributeValue::Float(grid.geo.y_step));
    derived.insert("ellipsoid".to_string(), AttributeValue::from("WGS84"));
    if let Some(baseline) = proc
        .get("baseline/perp_baseline_top")
        .and_then(AttributeValue::to_float)
    {
        derived.insert("baseline_perp".to_string(), AttributeValue::Float(baseline));
    }
    derived.insert("processing_dem".to_string(), AttributeValue::from("SRTM1"));
    derived.insert(
        "history".to_string(),
        AttributeValue::from(resolve::history_stamp()),
    );

    let mut attrs = resolve::resolve(&[&derived], &overrides.to_attribute_map())?;
    resolve::augment_with_raster_stats(&mut attrs, &correlation);

    let mut bands = BTreeMap::new();
    bands.insert(BandRole::WrappedInterferogram, int_phase);
    bands.insert(BandRole::UnwrappedInterferogram, unw_phase);
    bands.insert(BandRole::Correlation, correlation);
    bands.insert(BandRole::IncidenceAngle, los_angle);

    let product = assemble(bands, grid.geo, attrs, footprint)?;
    finalize(&product, &job.output_dir)
}
