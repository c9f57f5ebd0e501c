#![doc = r#"
insarchive — archival HDF5 products from InSAR processor output.

This crate converts the geocoded rasters and metadata sidecars produced by
ROI_PAC, GMTSAR, and ISCE interferometric processing runs into
self-describing HDF5 containers: one group of gzip-compressed band
datasets plus a flat set of geophysical attributes on the file root. It
powers the `insarchive` CLI and can be embedded in your own Rust
applications.

Pipeline
--------
Every converter follows the same shape:

1. read the dialect's metadata sidecars (`io::sidecar`, `io::isce`);
2. resolve them into one attribute set with derived fields and mandatory
   validation (`core::resolve`, `core::footprint`);
3. decode the raw rasters into f32 planes (`io::raster`, `io::grid`);
4. assemble planes, geometry, and attributes into a `Product`
   (`core::assemble`);
5. serialize the product (`io::writers::container`).

Requirements
------------
- HDF5 and GDAL development headers and runtimes available on your system.

Quick start: convert an ISCE scene
----------------------------------
```rust,no_run
use std::path::PathBuf;
use insarchive::api::{IsceJob, SceneOverrides, convert_isce};

fn main() -> insarchive::Result<()> {
    let job = IsceJob {
        raster_xml: PathBuf::from("filt_topophase.flat.geo.xml"),
        wrapped: PathBuf::from("filt_topophase.flat.geo"),
        unwrapped: PathBuf::from("filt_topophase.flat.unw.geo"),
        correlation: PathBuf::from("phsig.cor.geo"),
        los: PathBuf::from("los.rdr.geo"),
        proc_xml: PathBuf::from("insarProc.xml"),
        processing_log: PathBuf::from("isce.log"),
        footprint: None,
        beam_swath: "IW2".to_string(),
        output_dir: PathBuf::from("."),
    };
    let written = convert_isce(&job, &SceneOverrides::default())?;
    println!("{}", written.display());
    Ok(())
}
```

Error handling
--------------
All public functions return `insarchive::Result<T>`; match on
`insarchive::Error` to handle specific stages (sidecar parsing, raster
decoding, metadata resolution, assembly, container writing). Every error
aborts the run: a partially assembled archival product is treated as
worse than none.

Useful modules
--------------
- [`api`] — high-level, per-dialect conversion entry points.
- [`types`] — the attribute model, band roles, and layouts.
- [`io`] — raster decoding, sidecar readers, container writer.
- [`core`] — metadata resolution, footprint, product assembly.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use error::{Error, Result};
pub use types::{AttributeMap, AttributeValue, BandRole, GeoTransform, SampleLayout};

// Pipeline stages
pub use crate::core::assemble::{AssembleError, Product, assemble};
pub use crate::core::footprint::{FootprintError, FootprintPolygon};
pub use crate::core::resolve::{DateConvention, MANDATORY_FIELDS, ResolveError};
pub use io::raster::{DecodeError, RawRaster, decode};
pub use io::sidecar::SidecarError;
pub use io::writers::container::{ContainerError, GEOCODE_GROUP, write_product};

// High-level API re-exports
pub use api::{
    GmtsarJob, IsceJob, RoipacJob, SceneOverrides, convert_gmtsar, convert_isce, convert_roipac,
};
