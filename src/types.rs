//! Shared types used across insarchive.
//! Includes the `AttributeValue`/`AttributeMap` metadata model, the
//! `SampleLayout` and `BandRole` vocabularies, and `GeoTransform`.
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Byte layout of a headerless raster file. Dimensions always come from a
/// sidecar; the file itself is a raw little-endian sample stream.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SampleLayout {
    /// `2 * length` rows of `width` f32 samples, alternating whole rows of
    /// two co-registered planes (amplitude rows, then phase rows).
    InterleavedFloat32Pairs,
    /// `length * width` complex samples, 4-byte real then 4-byte imaginary.
    Complex64,
}

impl SampleLayout {
    /// Expected byte count of a raster with this layout.
    pub fn expected_len(self, length: usize, width: usize) -> usize {
        match self {
            SampleLayout::InterleavedFloat32Pairs => 2 * length * width * 4,
            SampleLayout::Complex64 => length * width * 8,
        }
    }
}

impl std::fmt::Display for SampleLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleLayout::InterleavedFloat32Pairs => write!(f, "InterleavedFloat32Pairs"),
            SampleLayout::Complex64 => write!(f, "Complex64"),
        }
    }
}

/// Semantic role of a band inside the archival container. The dataset
/// names are fixed; archive consumers key on them.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum BandRole {
    WrappedInterferogram,
    UnwrappedInterferogram,
    WrappedFilteredInterferogram,
    Correlation,
    IncidenceAngle,
    DigitalElevationModel,
}

impl BandRole {
    /// Dataset name inside the container group.
    pub fn dataset_name(self) -> &'static str {
        match self {
            BandRole::WrappedInterferogram => "wrapped_interferogram",
            BandRole::UnwrappedInterferogram => "unwrapped_interferogram",
            BandRole::WrappedFilteredInterferogram => "wrapped_filtered_interferogram",
            BandRole::Correlation => "correlation",
            BandRole::IncidenceAngle => "incidence_angle",
            BandRole::DigitalElevationModel => "digital_elevation_model",
        }
    }
}

impl std::fmt::Display for BandRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dataset_name())
    }
}

/// One metadata value. Sidecar readers produce strings; the resolver
/// replaces or supplements them with typed values, and the container
/// writer maps each tag onto the matching HDF5 attribute type.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view, parsing string values with standard decimal syntax.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Float(v) => Some(*v as i64),
            AttributeValue::Str(s) => s.trim().parse().ok(),
            AttributeValue::Date(_) => None,
        }
    }

    /// Float view, parsing string values with standard decimal syntax.
    pub fn to_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Str(s) => s.trim().parse().ok(),
            AttributeValue::Date(_) => None,
        }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            AttributeValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Str(s) => write!(f, "{}", s),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Date(d) => write!(f, "{}", d.format("%Y%m%d")),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Str(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Str(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(d: NaiveDate) -> Self {
        AttributeValue::Date(d)
    }
}

/// Field name -> value. Iteration (and therefore attribute serialization)
/// is sorted by key, which keeps container output deterministic.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// Affine mapping from pixel indices to longitude/latitude, in degrees.
/// `y_step` is negative for north-up rasters.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct GeoTransform {
    pub x_first: f64,
    pub x_step: f64,
    pub y_first: f64,
    pub y_step: f64,
}

impl GeoTransform {
    /// Both steps must be nonzero for the mapping to be invertible.
    pub fn is_degenerate(&self) -> bool {
        self.x_step == 0.0 || self.y_step == 0.0
    }
}
