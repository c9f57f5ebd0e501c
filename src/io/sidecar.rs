//! Text sidecar readers.
//!
//! Two line-oriented dialects feed the resolver: GMTSAR `.PRM` files
//! (`KEY = VALUE`, split on the first `=`) and ROI_PAC `.rsc` files
//! (`KEY<whitespace>VALUE` tables). Both produce a string-keyed
//! `AttributeMap`; duplicate keys keep the last occurrence.
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::types::{AttributeMap, AttributeValue};

/// Errors encountered when reading sidecar files
#[derive(Debug, Error)]
pub enum SidecarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed sidecar line {line}: `{content}`")]
    MalformedLine { line: usize, content: String },
    #[error("missing field `{0}` in sidecar metadata")]
    MissingField(&'static str),
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<SidecarError>,
    },
}

impl SidecarError {
    pub(crate) fn in_file(self, path: &Path) -> Self {
        SidecarError::InFile {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}

/// Parse `KEY = VALUE` text, one pair per line. Blank lines and `#`
/// comments are ignored; a significant line without `=` is malformed.
pub fn parse_flat_keyvalue(text: &str) -> Result<AttributeMap, SidecarError> {
    let mut map = AttributeMap::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(SidecarError::MalformedLine {
                line: idx + 1,
                content: trimmed.to_string(),
            });
        };
        map.insert(
            key.trim().to_string(),
            AttributeValue::from(value.trim()),
        );
    }
    Ok(map)
}

/// Parse a whitespace-delimited `KEY VALUE` table. The value is the rest
/// of the line after the first whitespace run, trimmed.
pub fn parse_keyvalue_table(text: &str) -> Result<AttributeMap, SidecarError> {
    let mut map = AttributeMap::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once(char::is_whitespace) else {
            return Err(SidecarError::MalformedLine {
                line: idx + 1,
                content: trimmed.to_string(),
            });
        };
        map.insert(key.to_string(), AttributeValue::from(value.trim()));
    }
    Ok(map)
}

/// Read a GMTSAR `.PRM` sidecar.
pub fn read_flat_keyvalue<P: AsRef<Path>>(path: P) -> Result<AttributeMap, SidecarError> {
    let path = path.as_ref();
    info!("Reading key=value sidecar: {:?}", path);
    let text = fs::read_to_string(path).map_err(|e| SidecarError::from(e).in_file(path))?;
    parse_flat_keyvalue(&text).map_err(|e| e.in_file(path))
}

/// Read a ROI_PAC `.rsc` sidecar.
pub fn read_keyvalue_table<P: AsRef<Path>>(path: P) -> Result<AttributeMap, SidecarError> {
    let path = path.as_ref();
    info!("Reading rsc sidecar: {:?}", path);
    let text = fs::read_to_string(path).map_err(|e| SidecarError::from(e).in_file(path))?;
    parse_keyvalue_table(&text).map_err(|e| e.in_file(path))
}
