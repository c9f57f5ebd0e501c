//! ISCE XML sidecar readers.
//!
//! Two tree dialects: the per-raster property tree (`<property name=..>`
//! leaves with `<value>` children, plus `Coordinate1`/`Coordinate2`
//! component blocks) and the run-level processing tree (`insarProc.xml`),
//! read by element path. Both flatten into an `AttributeMap`.
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::info;

use crate::io::sidecar::SidecarError;
use crate::types::{AttributeMap, AttributeValue, GeoTransform};

/// Grid geometry of one geocoded raster, assembled from its property tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterGrid {
    pub width: usize,
    pub length: usize,
    pub geo: GeoTransform,
}

/// Parse a raster property tree into a flat map.
///
/// Leaf property names are lowercased. Properties inside the two
/// coordinate components get dotted keys (`Coordinate1.delta`); any other
/// nested structure is ignored.
pub fn parse_raster_properties(text: &str) -> Result<AttributeMap, SidecarError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut map = AttributeMap::new();
    let mut components: Vec<String> = Vec::new();
    let mut property: Option<String> = None;
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "component" => {
                        let name = name_attribute(e)?.unwrap_or_default();
                        components.push(name);
                    }
                    "property" => {
                        property = name_attribute(e)?.map(|n| n.to_lowercase());
                    }
                    "value" if property.is_some() => in_value = true,
                    _ => {}
                }
            }
            Event::End(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "component" => {
                        components.pop();
                    }
                    "property" => property = None,
                    "value" => in_value = false,
                    _ => {}
                }
            }
            Event::Text(e) => {
                if in_value {
                    if let Some(ref name) = property {
                        let txt = e.unescape()?;
                        if let Some(key) = flattened_key(&components, name) {
                            map.insert(key, AttributeValue::from(txt.trim()));
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

// Top-level properties keep their (lowercased) name; only the two
// coordinate components are flattened, everything else is dropped.
fn flattened_key(components: &[String], property: &str) -> Option<String> {
    match components {
        [] => Some(property.to_string()),
        [c] if c == "Coordinate1" || c == "Coordinate2" => Some(format!("{c}.{property}")),
        _ => None,
    }
}

fn name_attribute(e: &quick_xml::events::BytesStart<'_>) -> Result<Option<String>, SidecarError> {
    let attr = e
        .try_get_attribute("name")
        .map_err(quick_xml::Error::from)?;
    match attr {
        Some(a) => {
            let value = a.unescape_value().map_err(quick_xml::Error::from)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Read a raster property tree from disk.
pub fn read_raster_properties<P: AsRef<Path>>(path: P) -> Result<AttributeMap, SidecarError> {
    let path = path.as_ref();
    info!("Reading raster property tree: {:?}", path);
    let text = std::fs::read_to_string(path).map_err(|e| SidecarError::from(e).in_file(path))?;
    parse_raster_properties(&text).map_err(|e| e.in_file(path))
}

/// Assemble the grid geometry from a flattened property map.
/// Coordinate1 runs along longitude, Coordinate2 along latitude.
pub fn grid_from_properties(props: &AttributeMap) -> Result<RasterGrid, SidecarError> {
    let width = int_field(props, "width")? as usize;
    let length = int_field(props, "length")? as usize;
    let geo = GeoTransform {
        x_first: float_field(props, "Coordinate1.startingvalue")?,
        x_step: float_field(props, "Coordinate1.delta")?,
        y_first: float_field(props, "Coordinate2.startingvalue")?,
        y_step: float_field(props, "Coordinate2.delta")?,
    };
    Ok(RasterGrid { width, length, geo })
}

fn int_field(props: &AttributeMap, key: &'static str) -> Result<i64, SidecarError> {
    props
        .get(key)
        .and_then(AttributeValue::to_int)
        .ok_or(SidecarError::MissingField(key))
}

fn float_field(props: &AttributeMap, key: &'static str) -> Result<f64, SidecarError> {
    props
        .get(key)
        .and_then(AttributeValue::to_float)
        .ok_or(SidecarError::MissingField(key))
}

/// Element paths extracted from the processing tree. Everything else in
/// the (large) file is skipped.
const PROCESSING_FIELDS: &[&str] = &[
    "master/platform/MISSION",
    "slave/platform/MISSION",
    "master/frame/SENSING_START",
    "master/frame/SENSING_STOP",
    "slave/frame/SENSING_START",
    "slave/frame/SENSING_STOP",
    "master/frame/TRACK_NUMBER",
    "master/frame/ORBIT_NUMBER",
    "slave/frame/ORBIT_NUMBER",
    "master/frame/PASS_DIRECTION",
    "master/frame/POLARIZATION",
    "master/lookSide",
    "master/wavelength",
    "master/prf",
    "baseline/perp_baseline_top",
];

/// Parse the run-level processing tree, keyed by element path relative to
/// the document root. The first occurrence of a path wins.
pub fn parse_processing_tree(text: &str) -> Result<AttributeMap, SidecarError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut map = AttributeMap::new();
    let mut stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(e) => {
                // stack[0] is the document root; paths are relative to it
                if stack.len() > 1 {
                    let path = stack[1..].join("/");
                    if PROCESSING_FIELDS.contains(&path.as_str()) {
                        let txt = e.unescape()?;
                        map.entry(path)
                            .or_insert_with(|| AttributeValue::from(strip_bytes_repr(txt.trim())));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

/// Read the processing tree from disk.
pub fn read_processing_tree<P: AsRef<Path>>(path: P) -> Result<AttributeMap, SidecarError> {
    let path = path.as_ref();
    info!("Reading processing tree: {:?}", path);
    let text = std::fs::read_to_string(path).map_err(|e| SidecarError::from(e).in_file(path))?;
    parse_processing_tree(&text).map_err(|e| e.in_file(path))
}

// Some processing trees carry values serialized as Python bytes literals
// (`b'ENVISAT'`); strip the wrapper, keep the payload.
fn strip_bytes_repr(value: &str) -> &str {
    let v = value.strip_prefix('b').unwrap_or(value);
    v.trim_matches('\'').trim_matches('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    const RASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<imageFile>
  <property name="WIDTH"><value>4</value></property>
  <property name="LENGTH"><value>3</value></property>
  <property name="ACCESS_MODE"><value>read</value></property>
  <component name="Coordinate1">
    <factorymodule>isceobj.Image</factorymodule>
    <property name="startingValue"><value>-156.2</value></property>
    <property name="delta"><value>0.001</value></property>
    <property name="size"><value>4</value></property>
  </component>
  <component name="Coordinate2">
    <property name="startingValue"><value>19.5</value></property>
    <property name="delta"><value>-0.001</value></property>
    <property name="size"><value>3</value></property>
  </component>
  <component name="Extra">
    <property name="irrelevant"><value>1</value></property>
  </component>
</imageFile>
"#;

    #[test]
    fn property_tree_flattens_coordinates_only() {
        let map = parse_raster_properties(RASTER_XML).unwrap();
        assert_eq!(map["width"], AttributeValue::from("4"));
        assert_eq!(map["Coordinate1.delta"], AttributeValue::from("0.001"));
        assert_eq!(map["Coordinate2.startingvalue"], AttributeValue::from("19.5"));
        assert!(!map.contains_key("Extra.irrelevant"));
        assert!(!map.contains_key("irrelevant"));
    }

    #[test]
    fn grid_assembly_from_properties() {
        let map = parse_raster_properties(RASTER_XML).unwrap();
        let grid = grid_from_properties(&map).unwrap();
        assert_eq!(grid.width, 4);
        assert_eq!(grid.length, 3);
        assert_eq!(grid.geo.x_first, -156.2);
        assert_eq!(grid.geo.y_step, -0.001);
    }

    #[test]
    fn grid_assembly_reports_missing_field() {
        let err = grid_from_properties(&AttributeMap::new()).unwrap_err();
        assert!(matches!(err, SidecarError::MissingField("width")));
    }

    #[test]
    fn processing_tree_extracts_pathed_fields() {
        let xml = r#"<insarProc>
  <master>
    <platform><MISSION>b'ENVISAT'</MISSION></platform>
    <frame>
      <SENSING_START>2010-01-15 09:30:01.500000</SENSING_START>
      <TRACK_NUMBER>201</TRACK_NUMBER>
      <ORBIT_NUMBER>41234</ORBIT_NUMBER>
      <PASS_DIRECTION>'DESCENDING'</PASS_DIRECTION>
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
      <ORBIT_NUMBER>41735</ORBIT_NUMBER>
    </frame>
  </slave>
  <baseline><perp_baseline_top>132.8</perp_baseline_top></baseline>
</insarProc>"#;
        let map = parse_processing_tree(xml).unwrap();
        assert_eq!(
            map["master/platform/MISSION"],
            AttributeValue::from("ENVISAT")
        );
        assert_eq!(
            map["master/frame/PASS_DIRECTION"],
            AttributeValue::from("DESCENDING")
        );
        assert_eq!(map["master/lookSide"], AttributeValue::from("-1"));
        assert_eq!(
            map["baseline/perp_baseline_top"],
            AttributeValue::from("132.8")
        );
        assert!(!map.contains_key("master/frame/POLARIZATION/x"));
    }
}
