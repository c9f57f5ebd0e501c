//! Geocoded-grid reading via GDAL.
//!
//! GMTSAR emits its geocoded products as `_ll.grd` rasters; GDAL handles
//! the format, this adapter only pulls out the single band and the affine
//! geotransform the assembler needs.
use gdal::Dataset;
use gdal::errors::GdalError as GdalCrateError;
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::types::GeoTransform;

/// Errors encountered when reading grids through GDAL
#[derive(Debug, Error)]
pub enum GridError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("no raster bands in {0}")]
    NoBands(String),
    #[error("grid shape {0}x{1} does not match band buffer")]
    ShapeMismatch(usize, usize),
}

/// One opened geocoded grid
pub struct GridReader {
    dataset: Dataset,
    width: usize,
    length: usize,
    geotransform: [f64; 6],
}

impl GridReader {
    /// Open a GDAL-supported grid (NetCDF `.grd`, GeoTIFF, ...)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let path = path.as_ref();
        info!("Opening grid: {:?}", path);
        let dataset = Dataset::open(path)?;
        let (size_x, size_y) = dataset.raster_size();
        if dataset.raster_count() == 0 {
            return Err(GridError::NoBands(path.display().to_string()));
        }
        let geotransform = dataset.geo_transform()?;
        Ok(GridReader {
            dataset,
            width: size_x as usize,
            length: size_y as usize,
            geotransform,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Affine pixel-to-degree mapping of the grid. Rotation terms of the
    /// GDAL transform are not used by these products.
    pub fn geo_transform(&self) -> GeoTransform {
        GeoTransform {
            x_first: self.geotransform[0],
            x_step: self.geotransform[1],
            y_first: self.geotransform[3],
            y_step: self.geotransform[5],
        }
    }

    /// Read the first band as an f32 plane of shape (length, width).
    pub fn read_plane(&self) -> Result<Array2<f32>, GridError> {
        let band = self.dataset.rasterband(1)?;
        let window = (self.width, self.length);
        let buf = band.read_as::<f32>((0, 0), window, window, None)?;
        let data = buf.data().to_vec();
        Array2::from_shape_vec((self.length, self.width), data)
            .map_err(|_| GridError::ShapeMismatch(self.length, self.width))
    }
}
