//! Product assembly.
//!
//! Binds decoded planes to their band roles, checks that every plane
//! shares one grid, derives the geographic bounding box, and produces the
//! single in-memory `Product` handed to the container writer. Pure
//! computation; the writer does the I/O.
use std::collections::BTreeMap;

use ndarray::Array2;
use thiserror::Error;

use crate::core::footprint::FootprintPolygon;
use crate::core::resolve::{self, ResolveError};
use crate::types::{AttributeMap, AttributeValue, BandRole, GeoTransform};

/// Errors encountered while assembling a product
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("band `{role_a}` is {rows_a}x{cols_a} but `{role_b}` is {rows_b}x{cols_b}")]
    DimensionMismatch {
        role_a: BandRole,
        rows_a: usize,
        cols_a: usize,
        role_b: BandRole,
        rows_b: usize,
        cols_b: usize,
    },
    #[error("product has no bands")]
    NoBands,
    #[error("degenerate geo transform: x_step and y_step must be nonzero")]
    DegenerateGeoTransform,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// One assembled archival unit, ready for serialization.
#[derive(Debug)]
pub struct Product {
    pub bands: BTreeMap<BandRole, Array2<f32>>,
    pub geo: GeoTransform,
    pub attrs: AttributeMap,
    pub footprint: FootprintPolygon,
}

/// Assemble bands, geometry, and resolved attributes into a `Product`.
///
/// Injects the bounding box (`north`, `south`, `east`, `west`), the
/// footprint polygon, and the low-confidence marker when the footprint
/// came from the degraded log path. The mandatory attribute set is a
/// construction-time invariant; the writer never re-checks it.
pub fn assemble(
    bands: BTreeMap<BandRole, Array2<f32>>,
    geo: GeoTransform,
    mut attrs: AttributeMap,
    footprint: FootprintPolygon,
) -> Result<Product, AssembleError> {
    if geo.is_degenerate() {
        return Err(AssembleError::DegenerateGeoTransform);
    }
    let mut planes = bands.iter();
    let Some((&first_role, first_plane)) = planes.next() else {
        return Err(AssembleError::NoBands);
    };
    let (length, width) = first_plane.dim();
    for (&role, plane) in planes {
        if plane.dim() != (length, width) {
            let (rows_b, cols_b) = plane.dim();
            return Err(AssembleError::DimensionMismatch {
                role_a: first_role,
                rows_a: length,
                cols_a: width,
                role_b: role,
                rows_b,
                cols_b,
            });
        }
    }

    let north = geo.y_first;
    let south = north + length as f64 * geo.y_step;
    let west = geo.x_first;
    let east = west + width as f64 * geo.x_step;
    attrs.insert("north".to_string(), AttributeValue::Float(north));
    attrs.insert("south".to_string(), AttributeValue::Float(south));
    attrs.insert("west".to_string(), AttributeValue::Float(west));
    attrs.insert("east".to_string(), AttributeValue::Float(east));
    attrs.insert(
        "scene_footprint".to_string(),
        AttributeValue::Str(footprint.to_wkt()),
    );
    if footprint.is_low_confidence() {
        attrs.insert(
            "scene_footprint_confidence".to_string(),
            AttributeValue::from("low"),
        );
    }

    resolve::validate_mandatory(&attrs)?;

    Ok(Product {
        bands,
        geo,
        attrs,
        footprint,
    })
}
