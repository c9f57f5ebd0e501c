//! Scene footprint construction.
//!
//! The footprint is an explicit closed ring of (lon, lat) vertices in the
//! fixed traversal near-early, far-early, far-late, near-late, back to
//! near-early. Sources: structured corner references, a WKT literal from
//! the command line, or a degraded scrape of a processing log.
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

/// Errors encountered while building a footprint
#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid footprint polygon: {0}")]
    Invalid(String),
    #[error("processing log yielded {0} corner entries, need 4")]
    CornerCount(usize),
}

/// A closed (lon, lat) ring. `low_confidence` marks rings recovered from
/// log scraping rather than structured metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintPolygon {
    ring: Vec<(f64, f64)>,
    low_confidence: bool,
}

impl FootprintPolygon {
    /// Build from the four scene corners in traversal order
    /// near-early, far-early, far-late, near-late. The closing vertex is
    /// appended here.
    pub fn from_corners(
        near_early: (f64, f64),
        far_early: (f64, f64),
        far_late: (f64, f64),
        near_late: (f64, f64),
    ) -> Self {
        FootprintPolygon {
            ring: vec![near_early, far_early, far_late, near_late, near_early],
            low_confidence: false,
        }
    }

    /// Parse a `POLYGON((lon lat, ...))` literal.
    pub fn from_wkt(wkt: &str) -> Result<Self, FootprintError> {
        let trimmed = wkt.trim();
        let upper = trimmed.to_uppercase();
        if !upper.starts_with("POLYGON") {
            return Err(FootprintError::Invalid(format!(
                "expected POLYGON literal, got `{trimmed}`"
            )));
        }
        let open = trimmed
            .find("((")
            .ok_or_else(|| FootprintError::Invalid("missing `((`".to_string()))?;
        let close = trimmed
            .rfind("))")
            .ok_or_else(|| FootprintError::Invalid("missing `))`".to_string()))?;
        if close <= open + 2 {
            return Err(FootprintError::Invalid("empty ring".to_string()));
        }
        let mut ring = Vec::new();
        for pair in trimmed[open + 2..close].split(',') {
            let mut it = pair.split_whitespace();
            let lon = it
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or_else(|| FootprintError::Invalid(format!("bad vertex `{pair}`")))?;
            let lat = it
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or_else(|| FootprintError::Invalid(format!("bad vertex `{pair}`")))?;
            ring.push((lon, lat));
        }
        Self::from_ring(ring, false)
    }

    /// Degraded fallback: scan a free-text processing log for corner
    /// marker lines. Each marker line carries the latitude after its last
    /// `:`; the line immediately following carries the longitude. The
    /// pairing convention is undocumented upstream, hence best-effort and
    /// flagged low-confidence.
    pub fn from_processing_log<P: AsRef<Path>>(path: P) -> Result<Self, FootprintError> {
        let path = path.as_ref();
        info!("Recovering footprint from processing log: {:?}", path);
        let text = fs::read_to_string(path)?;
        let lines: Vec<&str> = text.lines().collect();
        let mut corners = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if line.contains("FrameInfoExtractor") && line.contains("Corner") {
                let lat = tail_number(line);
                let lon = lines.get(i + 1).and_then(|l| tail_number(l));
                if let (Some(lat), Some(lon)) = (lat, lon) {
                    corners.push((lon, lat));
                }
            }
        }
        if corners.len() < 4 {
            return Err(FootprintError::CornerCount(corners.len()));
        }
        warn!("Footprint recovered from log lines; marking low confidence");
        // Log order is near-early, far-early, near-late, far-late; the
        // ring traversal swaps the last two.
        let ring = vec![corners[0], corners[1], corners[3], corners[2], corners[0]];
        Self::from_ring(ring, true)
    }

    fn from_ring(mut ring: Vec<(f64, f64)>, low_confidence: bool) -> Result<Self, FootprintError> {
        if ring.len() < 4 {
            return Err(FootprintError::Invalid(format!(
                "ring has {} vertices, need at least 4",
                ring.len()
            )));
        }
        if ring.first() != ring.last() {
            let first = ring[0];
            ring.push(first);
        }
        let mut distinct: Vec<(f64, f64)> = Vec::new();
        for vertex in &ring[..ring.len() - 1] {
            if !distinct.contains(vertex) {
                distinct.push(*vertex);
            }
        }
        if distinct.len() < 4 {
            return Err(FootprintError::Invalid(format!(
                "ring has {} distinct vertices, need at least 4",
                distinct.len()
            )));
        }
        Ok(FootprintPolygon {
            ring,
            low_confidence,
        })
    }

    pub fn ring(&self) -> &[(f64, f64)] {
        &self.ring
    }

    pub fn is_low_confidence(&self) -> bool {
        self.low_confidence
    }

    /// `POLYGON((lon lat, ...))` rendering, vertices in ring order.
    pub fn to_wkt(&self) -> String {
        let vertices: Vec<String> = self
            .ring
            .iter()
            .map(|(lon, lat)| format!("{lon} {lat}"))
            .collect();
        format!("POLYGON(({}))", vertices.join(","))
    }
}

// Numeric tail of a `label: value` log line.
fn tail_number(line: &str) -> Option<f64> {
    line.rsplit(':').next()?.trim().parse().ok()
}
