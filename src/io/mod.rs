//! I/O layer: headerless raster decoding, sidecar metadata readers,
//! the GDAL grid adapter, and the container writer.
pub mod raster;
pub use raster::{DecodeError, RawRaster, decode, read_plane_f32, read_plane_i16};

pub mod sidecar;
pub use sidecar::{SidecarError, read_flat_keyvalue, read_keyvalue_table};

pub mod isce;
pub use isce::{RasterGrid, read_processing_tree, read_raster_properties};

pub mod grid;
pub use grid::{GridError, GridReader};

pub mod writers;
