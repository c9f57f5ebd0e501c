use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use hdf5::types::VarLenUnicode;
use ndarray::arr2;

use insarchive::api::{IsceJob, SceneOverrides, convert_isce};
use insarchive::io::writers::GEOCODE_GROUP;

fn write_f32(path: &Path, samples: &[f32]) {
    let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_le_bytes()).collect();
    fs::write(path, bytes).unwrap();
}

const RASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<imageFile>
  <property name="WIDTH"><value>3</value></property>
  <property name="LENGTH"><value>2</value></property>
  <component name="Coordinate1">
    <property name="startingValue"><value>-156.2</value></property>
    <property name="delta"><value>0.001</value></property>
    <property name="size"><value>3</value></property>
  </component>
  <component name="Coordinate2">
    <property name="startingValue"><value>19.5</value></property>
    <property name="delta"><value>-0.001</value></property>
    <property name="size"><value>2</value></property>
  </component>
</imageFile>
"#;

const PROC_XML: &str = r#"<insarProc>
  <master>
    <platform><MISSION>b'ENVISAT'</MISSION></platform>
    <frame>
      <SENSING_START>2010-01-15 09:30:01.500000</SENSING_START>
      <SENSING_STOP>2010-01-15 09:30:16.700000</SENSING_STOP>
      <TRACK_NUMBER>201</TRACK_NUMBER>
      <ORBIT_NUMBER>41234</ORBIT_NUMBER>
      <PASS_DIRECTION>DESCENDING</PASS_DIRECTION>
      <POLARIZATION>VV</POLARIZATION>
    </frame>
    <lookSide>-1</lookSide>
    <wavelength>0.0562356</wavelength>
    <prf>1652.4</prf>
  </master>
  <slave>
    <platform><MISSION>b'ENVISAT'</MISSION></platform>
    <frame>
      <SENSING_START>2010-02-19 09:30:00.200000</SENSING_START>
      <SENSING_STOP>2010-02-19 09:30:15.400000</SENSING_STOP>
      <ORBIT_NUMBER>41735</ORBIT_NUMBER>
    </frame>
  </slave>
  <baseline><perp_baseline_top>132.8</perp_baseline_top></baseline>
</insarProc>
"#;

const ISCE_LOG: &str = "\
2010-03-01 INFO contrib.frameUtils.FrameInfoExtractor - nearEarlyCorner Lat: 19.5\n\
2010-03-01 INFO lon: -156.2\n\
2010-03-01 INFO contrib.frameUtils.FrameInfoExtractor - farEarlyCorner Lat: 19.5\n\
2010-03-01 INFO lon: -156.197\n\
2010-03-01 INFO contrib.frameUtils.FrameInfoExtractor - nearLateCorner Lat: 19.498\n\
2010-03-01 INFO lon: -156.2\n\
2010-03-01 INFO contrib.frameUtils.FrameInfoExtractor - farLateCorner Lat: 19.498\n\
2010-03-01 INFO lon: -156.197\n";

#[test]
fn isce_scene_converts_with_log_footprint() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path();

    fs::write(work.join("filt_topophase.flat.geo.xml"), RASTER_XML).unwrap();
    fs::write(work.join("insarProc.xml"), PROC_XML).unwrap();
    fs::write(work.join("isce.log"), ISCE_LOG).unwrap();

    // wrapped: 2x3 complex64 samples
    write_f32(
        &work.join("filt_topophase.flat.geo"),
        &[
            1.0, 0.0, 0.0, 1.0, -1.0, 0.0, //
            0.0, -1.0, 1.0, 1.0, 2.0, 0.0,
        ],
    );
    // unwrapped: amplitude rows interleaved with phase rows
    write_f32(
        &work.join("filt_topophase.flat.unw.geo"),
        &[
            9.0, 9.0, 9.0, 1.0, 2.0, 3.0, //
            9.0, 9.0, 9.0, 4.0, 5.0, 6.0,
        ],
    );
    // line of sight: second plane is archived
    write_f32(
        &work.join("los.rdr.geo"),
        &[
            0.0, 0.0, 0.0, 21.0, 22.0, 23.0, //
            0.0, 0.0, 0.0, 24.0, 25.0, 26.0,
        ],
    );
    // correlation: plain f32 plane
    write_f32(
        &work.join("phsig.cor.geo"),
        &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
    );

    let job = IsceJob {
        raster_xml: work.join("filt_topophase.flat.geo.xml"),
        wrapped: work.join("filt_topophase.flat.geo"),
        unwrapped: work.join("filt_topophase.flat.unw.geo"),
        correlation: work.join("phsig.cor.geo"),
        los: work.join("los.rdr.geo"),
        proc_xml: work.join("insarProc.xml"),
        processing_log: work.join("isce.log"),
        footprint: None,
        beam_swath: "IS2".to_string(),
        output_dir: work.to_path_buf(),
    };

    let written = convert_isce(&job, &SceneOverrides::default()).unwrap();
    assert_eq!(
        written.file_name().unwrap().to_str().unwrap(),
        "ENVISAT_IS2_201_0000_20100115-20100219_0035_00132.h5"
    );

    let file = hdf5::File::open(&written).unwrap();
    let group = file.group(GEOCODE_GROUP).unwrap();
    assert_eq!(group.member_names().unwrap().len(), 4);

    let unwrapped = group
        .dataset("unwrapped_interferogram")
        .unwrap()
        .read_2d::<f32>()
        .unwrap();
    assert_eq!(unwrapped, arr2(&[[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]));
    let incidence = group
        .dataset("incidence_angle")
        .unwrap()
        .read_2d::<f32>()
        .unwrap();
    assert_eq!(incidence, arr2(&[[21.0f32, 22.0, 23.0], [24.0, 25.0, 26.0]]));

    let mission = file
        .attr("mission")
        .unwrap()
        .read_scalar::<VarLenUnicode>()
        .unwrap();
    assert_eq!(mission.as_str(), "ENVISAT");
    let orbit = file
        .attr("relative_orbit")
        .unwrap()
        .read_scalar::<i64>()
        .unwrap();
    assert_eq!(orbit, 201);
    let confidence = file
        .attr("scene_footprint_confidence")
        .unwrap()
        .read_scalar::<VarLenUnicode>()
        .unwrap();
    assert_eq!(confidence.as_str(), "low");
    let coherence = file
        .attr("average_coherence")
        .unwrap()
        .read_scalar::<f64>()
        .unwrap();
    assert_relative_eq!(coherence, 0.35, epsilon = 1e-6);
    let max_coherence = file
        .attr("max_coherence")
        .unwrap()
        .read_scalar::<f64>()
        .unwrap();
    assert_relative_eq!(max_coherence, 0.6, epsilon = 1e-6);
    let ellipsoid = file
        .attr("ellipsoid")
        .unwrap()
        .read_scalar::<VarLenUnicode>()
        .unwrap();
    assert_eq!(ellipsoid.as_str(), "WGS84");
}

#[test]
fn isce_footprint_override_keeps_full_confidence() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path();

    fs::write(work.join("filt_topophase.flat.geo.xml"), RASTER_XML).unwrap();
    fs::write(work.join("insarProc.xml"), PROC_XML).unwrap();
    // no isce.log on purpose: the WKT override must make it unnecessary

    write_f32(
        &work.join("filt_topophase.flat.geo"),
        &[1.0; 12],
    );
    write_f32(&work.join("filt_topophase.flat.unw.geo"), &[1.0; 12]);
    write_f32(&work.join("los.rdr.geo"), &[1.0; 12]);
    write_f32(&work.join("phsig.cor.geo"), &[0.5; 6]);

    let job = IsceJob {
        raster_xml: work.join("filt_topophase.flat.geo.xml"),
        wrapped: work.join("filt_topophase.flat.geo"),
        unwrapped: work.join("filt_topophase.flat.unw.geo"),
        correlation: work.join("phsig.cor.geo"),
        los: work.join("los.rdr.geo"),
        proc_xml: work.join("insarProc.xml"),
        processing_log: work.join("isce.log"),
        footprint: Some(
            "POLYGON((-156.2 19.5,-156.197 19.5,-156.197 19.498,-156.2 19.498,-156.2 19.5))"
                .to_string(),
        ),
        beam_swath: "IS2".to_string(),
        output_dir: work.to_path_buf(),
    };

    let written = convert_isce(&job, &SceneOverrides::default()).unwrap();
    let file = hdf5::File::open(&written).unwrap();
    assert!(file.attr("scene_footprint_confidence").is_err());
    let footprint = file
        .attr("scene_footprint")
        .unwrap()
        .read_scalar::<VarLenUnicode>()
        .unwrap();
    assert!(footprint.as_str().contains("-156.2 19.5"));
}
