//! Metadata resolution.
//!
//! Sidecar readers hand over raw `AttributeMap`s; this module merges them
//! under a fixed precedence (caller overrides beat later sources beat
//! earlier sources), derives the computed fields (dates, baselines,
//! naming), and validates the mandatory archival set. Raster-derived
//! coherence statistics arrive in a second phase, after decoding.
use chrono::{NaiveDate, NaiveDateTime};
use ndarray::Array2;
use thiserror::Error;
use tracing::info;

use crate::types::{AttributeMap, AttributeValue};

/// Fields every archival product must carry before assembly.
pub const MANDATORY_FIELDS: [&str; 6] = [
    "mission",
    "beam_swath",
    "relative_orbit",
    "first_date",
    "last_date",
    "processing_type",
];

/// Errors encountered while resolving metadata
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("mandatory metadata field `{0}` is missing")]
    MissingMandatoryField(String),
    #[error("metadata field `{0}` absent from sources")]
    MissingSourceField(String),
    #[error("cannot parse `{value}` as a date for `{field}`")]
    UnparsableDate { field: String, value: String },
}

/// Clock-field convention of an acquisition date.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DateConvention {
    /// Two-digit year, month, day: `070603`
    CompactYmd,
    /// Year and day-of-year, fractional day ignored: `2007154.332`
    YearDayOfYear,
    /// `2010-01-15 09:30:01.500000`
    IsoTimestamp,
}

/// Parse an acquisition clock field into a calendar date.
pub fn parse_acquisition_date(
    field: &str,
    value: &str,
    convention: DateConvention,
) -> Result<NaiveDate, ResolveError> {
    let unparsable = || ResolveError::UnparsableDate {
        field: field.to_string(),
        value: value.to_string(),
    };
    let value = value.trim();
    match convention {
        DateConvention::CompactYmd => {
            NaiveDate::parse_from_str(value, "%y%m%d").map_err(|_| unparsable())
        }
        DateConvention::YearDayOfYear => {
            let prefix = value.split('.').next().unwrap_or(value);
            NaiveDate::parse_from_str(prefix, "%Y%j").map_err(|_| unparsable())
        }
        DateConvention::IsoTimestamp => {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
                .map(|dt| dt.date())
                .map_err(|_| unparsable())
        }
    }
}

/// Days between the two acquisitions, always non-negative.
pub fn temporal_baseline(first: NaiveDate, last: NaiveDate) -> i64 {
    (last - first).num_days().abs()
}

/// Merge attribute maps: later sources override earlier ones, explicit
/// overrides beat every source.
pub fn merge(sources: &[&AttributeMap], overrides: &AttributeMap) -> AttributeMap {
    let mut merged = AttributeMap::new();
    for source in sources {
        for (key, value) in source.iter() {
            merged.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in overrides.iter() {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Static resolution phase: merge all sources, then require the mandatory
/// archival fields. Raster statistics are added later via
/// [`augment_with_raster_stats`].
pub fn resolve(
    sources: &[&AttributeMap],
    overrides: &AttributeMap,
) -> Result<AttributeMap, ResolveError> {
    let merged = merge(sources, overrides);
    validate_mandatory(&merged)?;
    Ok(merged)
}

pub fn validate_mandatory(attrs: &AttributeMap) -> Result<(), ResolveError> {
    for field in MANDATORY_FIELDS {
        if !attrs.contains_key(field) {
            return Err(ResolveError::MissingMandatoryField(field.to_string()));
        }
    }
    Ok(())
}

/// Second resolution phase: coherence statistics over the decoded
/// correlation plane. The mean propagates NaN samples; the maximum
/// ignores them.
pub fn augment_with_raster_stats(attrs: &mut AttributeMap, correlation: &Array2<f32>) {
    let n = correlation.len();
    let mean = if n == 0 {
        f64::NAN
    } else {
        correlation.iter().map(|&v| v as f64).sum::<f64>() / n as f64
    };
    let max = correlation
        .iter()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, &v| {
            if acc.is_nan() || (v as f64) > acc {
                v as f64
            } else {
                acc
            }
        });
    info!("Coherence statistics: mean={:.4} max={:.4}", mean, max);
    attrs.insert("average_coherence".to_string(), AttributeValue::Float(mean));
    attrs.insert("max_coherence".to_string(), AttributeValue::Float(max));
}

/// File-name root of the archival product, derived from the resolved
/// attributes: mission, swath, zero-padded orbit/frame/baseline fields and
/// the date pair. `frame` and `baseline_perp` default to zero when a
/// dialect could not supply them.
pub fn product_stem(attrs: &AttributeMap) -> Result<String, ResolveError> {
    let mission = require_str(attrs, "mission")?;
    let swath = require_str(attrs, "beam_swath")?;
    let relative_orbit = require_int(attrs, "relative_orbit")?;
    let frame = attrs
        .get("frame")
        .and_then(AttributeValue::to_int)
        .unwrap_or(0);
    let first_date = attrs
        .get("first_date")
        .map(|v| v.to_string())
        .ok_or_else(|| ResolveError::MissingSourceField("first_date".to_string()))?;
    let last_date = attrs
        .get("last_date")
        .map(|v| v.to_string())
        .ok_or_else(|| ResolveError::MissingSourceField("last_date".to_string()))?;
    let temporal = require_int(attrs, "temporal_baseline")?;
    let baseline_perp = attrs
        .get("baseline_perp")
        .and_then(AttributeValue::to_int)
        .unwrap_or(0);
    Ok(format!(
        "{}_{}_{:03}_{:04}_{}-{}_{:04}_{:05}",
        mission, swath, relative_orbit, frame, first_date, last_date, temporal, baseline_perp
    ))
}

/// Provenance stamp recorded in the container attributes.
pub fn history_stamp() -> String {
    format!(
        "H5 file created: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.6f")
    )
}

/// GMTSAR spacecraft identity codes to mission names.
pub fn mission_from_spacecraft_id(id: &str) -> Option<&'static str> {
    match id.trim() {
        "1" | "2" => Some("ERS"),
        "3" => Some("RS1"),
        "4" => Some("ENV1"),
        "5" => Some("ALOS"),
        "7" => Some("TSX"),
        "8" => Some("CSK"),
        "9" => Some("RS2"),
        _ => None,
    }
}

/// Cosmo-SkyMed products often ship without a track number; the relative
/// orbit is recovered from the absolute orbit (237-orbit repeat cycle,
/// with a launch offset for the fourth satellite). Returns the shortened
/// mission name and the relative orbit.
pub fn csk_relative_orbit(mission: &str, absolute_orbit: i64) -> Option<(String, i64)> {
    if !mission.contains("CSK") {
        return None;
    }
    let relative = if mission == "CSKS4" {
        (absolute_orbit - 193).rem_euclid(237)
    } else {
        absolute_orbit.rem_euclid(237)
    };
    Some((mission[..3].to_string(), relative))
}

/// Antenna side convention: -1 is right-looking.
pub fn look_direction_from_antenna_side(side: i64) -> &'static str {
    if side == -1 { "R" } else { "L" }
}

pub fn require_str<'a>(attrs: &'a AttributeMap, key: &str) -> Result<&'a str, ResolveError> {
    attrs
        .get(key)
        .and_then(AttributeValue::as_str)
        .ok_or_else(|| ResolveError::MissingSourceField(key.to_string()))
}

pub fn require_int(attrs: &AttributeMap, key: &str) -> Result<i64, ResolveError> {
    attrs
        .get(key)
        .and_then(AttributeValue::to_int)
        .ok_or_else(|| ResolveError::MissingSourceField(key.to_string()))
}

pub fn require_float(attrs: &AttributeMap, key: &str) -> Result<f64, ResolveError> {
    attrs
        .get(key)
        .and_then(AttributeValue::to_float)
        .ok_or_else(|| ResolveError::MissingSourceField(key.to_string()))
}
