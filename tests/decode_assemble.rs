use std::collections::BTreeMap;

use approx::assert_relative_eq;
use insarchive::core::assemble::assemble;
use insarchive::core::footprint::FootprintPolygon;
use insarchive::types::{AttributeMap, AttributeValue, BandRole, GeoTransform, SampleLayout};

fn mandatory_attrs() -> AttributeMap {
    insarchive::MANDATORY_FIELDS
        .iter()
        .map(|f| (f.to_string(), AttributeValue::from("x")))
        .collect()
}

#[test]
fn interleaved_decode_feeds_assembly() {
    // rows: A0=[1,2], B0=[10,20], A1=[3,4], B1=[30,40]
    let samples: [f32; 8] = [1.0, 2.0, 10.0, 20.0, 3.0, 4.0, 30.0, 40.0];
    let buffer: Vec<u8> = samples.iter().flat_map(|v| v.to_le_bytes()).collect();

    let (a, b) =
        insarchive::decode(&buffer, 2, 2, SampleLayout::InterleavedFloat32Pairs).unwrap();
    assert_eq!(a, ndarray::arr2(&[[1.0, 2.0], [3.0, 4.0]]));
    assert_eq!(b, ndarray::arr2(&[[10.0, 20.0], [30.0, 40.0]]));

    let geo = GeoTransform {
        x_first: 10.0,
        x_step: 0.01,
        y_first: 20.0,
        y_step: -0.01,
    };
    let footprint =
        FootprintPolygon::from_corners((0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0));
    let mut bands = BTreeMap::new();
    bands.insert(BandRole::UnwrappedInterferogram, b);

    let product = assemble(bands, geo, mandatory_attrs(), footprint).unwrap();
    assert_relative_eq!(product.attrs["east"].to_float().unwrap(), 10.02);
    assert_relative_eq!(product.attrs["south"].to_float().unwrap(), 19.98);
}

#[test]
fn footprint_ring_from_unit_square_corners() {
    let fp = FootprintPolygon::from_corners((0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0));
    assert_eq!(fp.ring().len(), 5);
    assert_eq!(fp.ring().first(), fp.ring().last());
}
