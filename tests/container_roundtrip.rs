use std::collections::BTreeMap;

use approx::assert_relative_eq;
use hdf5::types::VarLenUnicode;
use ndarray::arr2;

use insarchive::core::assemble::assemble;
use insarchive::core::footprint::FootprintPolygon;
use insarchive::io::writers::{GEOCODE_GROUP, write_product};
use insarchive::types::{AttributeMap, AttributeValue, BandRole, GeoTransform};

fn sample_product() -> insarchive::Product {
    let mut attrs = AttributeMap::new();
    attrs.insert("mission".into(), AttributeValue::from("ENVISAT"));
    attrs.insert("beam_swath".into(), AttributeValue::from("I2"));
    attrs.insert("relative_orbit".into(), AttributeValue::Int(48));
    attrs.insert(
        "first_date".into(),
        AttributeValue::Date(chrono::NaiveDate::from_ymd_opt(2007, 6, 3).unwrap()),
    );
    attrs.insert(
        "last_date".into(),
        AttributeValue::Date(chrono::NaiveDate::from_ymd_opt(2007, 7, 21).unwrap()),
    );
    attrs.insert(
        "processing_type".into(),
        AttributeValue::from("INTERFEROGRAM"),
    );
    attrs.insert("baseline_perp".into(), AttributeValue::Float(125.5));

    let mut bands = BTreeMap::new();
    bands.insert(
        BandRole::Correlation,
        arr2(&[[0.1f32, 0.2], [0.3, 0.4]]),
    );
    bands.insert(
        BandRole::UnwrappedInterferogram,
        arr2(&[[1.0f32, 2.0], [3.0, 4.0]]),
    );

    let geo = GeoTransform {
        x_first: 10.0,
        x_step: 0.01,
        y_first: 20.0,
        y_step: -0.01,
    };
    let footprint =
        FootprintPolygon::from_corners((10.0, 19.98), (10.02, 19.98), (10.02, 20.0), (10.0, 20.0));
    assemble(bands, geo, attrs, footprint).unwrap()
}

#[test]
fn product_round_trips_through_container() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("scene.h5");
    let product = sample_product();

    write_product(&product, &destination).unwrap();

    let file = hdf5::File::open(&destination).unwrap();
    let group = file.group(GEOCODE_GROUP).unwrap();

    let correlation = group
        .dataset("correlation")
        .unwrap()
        .read_2d::<f32>()
        .unwrap();
    assert_eq!(correlation, arr2(&[[0.1f32, 0.2], [0.3, 0.4]]));
    assert!(group.link_exists("unwrapped_interferogram"));
    assert!(!group.link_exists("wrapped_interferogram"));

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
    assert_eq!(orbit, 48);

    let north = file.attr("north").unwrap().read_scalar::<f64>().unwrap();
    assert_relative_eq!(north, 20.0);

    // dates serialize in their compact string form
    let first = file
        .attr("first_date")
        .unwrap()
        .read_scalar::<VarLenUnicode>()
        .unwrap();
    assert_eq!(first.as_str(), "20070603");
}

#[test]
fn rewriting_an_existing_container_skips_datasets() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("scene.h5");
    let product = sample_product();

    write_product(&product, &destination).unwrap();
    // Second pass over the same destination must leave existing entries
    // alone and still succeed
    write_product(&product, &destination).unwrap();

    let file = hdf5::File::open(&destination).unwrap();
    let group = file.group(GEOCODE_GROUP).unwrap();
    assert_eq!(group.member_names().unwrap().len(), 2);
    let correlation = group
        .dataset("correlation")
        .unwrap()
        .read_2d::<f32>()
        .unwrap();
    assert_eq!(correlation, arr2(&[[0.1f32, 0.2], [0.3, 0.4]]));
}
