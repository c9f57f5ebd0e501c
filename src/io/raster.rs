//! Headerless raster decoding.
//!
//! ROI_PAC-family binaries carry no header; dimensions come from the
//! sidecar and the byte stream is little-endian samples in one of two
//! layouts (`SampleLayout`). The codec itself is pure; the `read_*`
//! helpers do the file I/O, with each handle dropped before decode.
use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use num_complex::Complex;
use thiserror::Error;
use tracing::info;

use crate::types::SampleLayout;

/// Errors encountered while decoding raw rasters
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
    #[error("invalid dimensions: {length}x{width}")]
    InvalidDimensions { length: usize, width: usize },
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    fn in_file(self, path: &Path) -> Self {
        DecodeError::InFile {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}

/// An undecoded raster: the raw bytes plus the externally supplied
/// dimensions and layout tag.
#[derive(Debug, Clone)]
pub struct RawRaster {
    pub buffer: Vec<u8>,
    pub length: usize,
    pub width: usize,
    pub layout: SampleLayout,
}

impl RawRaster {
    /// Read an entire raster file into memory. The handle is released on
    /// return; validation happens at decode time.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        length: usize,
        width: usize,
        layout: SampleLayout,
    ) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        info!("Reading {} raster: {:?}", layout, path);
        let buffer = fs::read(path).map_err(|e| DecodeError::from(e).in_file(path))?;
        Ok(RawRaster {
            buffer,
            length,
            width,
            layout,
        })
    }

    /// Decode into the two co-registered planes of this layout.
    pub fn decode(&self) -> Result<(Array2<f32>, Array2<f32>), DecodeError> {
        decode(&self.buffer, self.length, self.width, self.layout)
    }
}

/// Split a raw buffer into its two planes.
///
/// `InterleavedFloat32Pairs`: row `2k` of the stream is plane A's row `k`,
/// row `2k+1` is plane B's row `k`. `Complex64`: plane A is the sample
/// magnitude, plane B the phase angle in `(-pi, pi]`.
pub fn decode(
    buffer: &[u8],
    length: usize,
    width: usize,
    layout: SampleLayout,
) -> Result<(Array2<f32>, Array2<f32>), DecodeError> {
    if length == 0 || width == 0 {
        return Err(DecodeError::InvalidDimensions { length, width });
    }
    let expected = layout.expected_len(length, width);
    if buffer.len() != expected {
        return Err(DecodeError::ShortRead {
            expected,
            actual: buffer.len(),
        });
    }

    match layout {
        SampleLayout::InterleavedFloat32Pairs => {
            let mut a = Array2::<f32>::zeros((length, width));
            let mut b = Array2::<f32>::zeros((length, width));
            let row_bytes = width * 4;
            for k in 0..length {
                let a_off = 2 * k * row_bytes;
                let b_off = (2 * k + 1) * row_bytes;
                fill_row_f32(&mut a, k, &buffer[a_off..a_off + row_bytes]);
                fill_row_f32(&mut b, k, &buffer[b_off..b_off + row_bytes]);
            }
            Ok((a, b))
        }
        SampleLayout::Complex64 => {
            let mut amp = Array2::<f32>::zeros((length, width));
            let mut phase = Array2::<f32>::zeros((length, width));
            for (idx, chunk) in buffer.chunks_exact(8).enumerate() {
                let sample = Complex::new(
                    f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                    f32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
                );
                let (i, j) = (idx / width, idx % width);
                amp[[i, j]] = sample.norm();
                phase[[i, j]] = sample.arg();
            }
            Ok((amp, phase))
        }
    }
}

fn fill_row_f32(plane: &mut Array2<f32>, row: usize, bytes: &[u8]) {
    for (j, chunk) in bytes.chunks_exact(4).enumerate() {
        plane[[row, j]] = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

/// Read a plain `length * width` f32 raster (no interleaving).
pub fn read_plane_f32<P: AsRef<Path>>(
    path: P,
    length: usize,
    width: usize,
) -> Result<Array2<f32>, DecodeError> {
    let path = path.as_ref();
    info!("Reading f32 plane: {:?}", path);
    let buffer = fs::read(path).map_err(|e| DecodeError::from(e).in_file(path))?;
    decode_plane_f32(&buffer, length, width).map_err(|e| e.in_file(path))
}

fn decode_plane_f32(
    buffer: &[u8],
    length: usize,
    width: usize,
) -> Result<Array2<f32>, DecodeError> {
    if length == 0 || width == 0 {
        return Err(DecodeError::InvalidDimensions { length, width });
    }
    let expected = length * width * 4;
    if buffer.len() != expected {
        return Err(DecodeError::ShortRead {
            expected,
            actual: buffer.len(),
        });
    }
    let samples: Vec<f32> = buffer
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Array2::from_shape_vec((length, width), samples)
        .map_err(|_| DecodeError::InvalidDimensions { length, width })
}

/// Read a `length * width` i16 raster (DEM heights), widened to f32 so the
/// plane matches the rest of the product.
pub fn read_plane_i16<P: AsRef<Path>>(
    path: P,
    length: usize,
    width: usize,
) -> Result<Array2<f32>, DecodeError> {
    let path = path.as_ref();
    info!("Reading i16 plane: {:?}", path);
    let buffer = fs::read(path).map_err(|e| DecodeError::from(e).in_file(path))?;
    if length == 0 || width == 0 {
        return Err(DecodeError::InvalidDimensions { length, width }.in_file(path));
    }
    let expected = length * width * 2;
    if buffer.len() != expected {
        return Err(DecodeError::ShortRead {
            expected,
            actual: buffer.len(),
        }
        .in_file(path));
    }
    let samples: Vec<f32> = buffer
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]) as f32)
        .collect();
    Array2::from_shape_vec((length, width), samples)
        .map_err(|_| DecodeError::InvalidDimensions { length, width }.in_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn f32_bytes(vals: &[f32]) -> Vec<u8> {
        vals.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn interleaved_rows_split_into_planes() {
        // rows: A0=[1,2], B0=[10,20], A1=[3,4], B1=[30,40]
        let buf = f32_bytes(&[1.0, 2.0, 10.0, 20.0, 3.0, 4.0, 30.0, 40.0]);
        let (a, b) = decode(&buf, 2, 2, SampleLayout::InterleavedFloat32Pairs).unwrap();
        assert_eq!(a, ndarray::arr2(&[[1.0, 2.0], [3.0, 4.0]]));
        assert_eq!(b, ndarray::arr2(&[[10.0, 20.0], [30.0, 40.0]]));
    }

    #[test]
    fn interleave_round_trip() {
        let a_src = ndarray::arr2(&[[0.5f32, -1.5, 2.0], [7.0, 8.0, 9.0]]);
        let b_src = ndarray::arr2(&[[5.0f32, 6.0, 7.5], [-2.0, 0.0, 1.0]]);
        let mut buf = Vec::new();
        for k in 0..2 {
            buf.extend(f32_bytes(&a_src.row(k).to_vec()));
            buf.extend(f32_bytes(&b_src.row(k).to_vec()));
        }
        let (a, b) = decode(&buf, 2, 3, SampleLayout::InterleavedFloat32Pairs).unwrap();
        assert_eq!(a, a_src);
        assert_eq!(b, b_src);
    }

    #[test]
    fn complex_samples_become_magnitude_and_phase() {
        let buf = f32_bytes(&[3.0, 4.0, 0.0, -1.0, -1.0, 0.0, 0.0, 0.0]);
        let (amp, phase) = decode(&buf, 2, 2, SampleLayout::Complex64).unwrap();
        assert_relative_eq!(amp[[0, 0]], 5.0);
        assert_relative_eq!(phase[[0, 0]], (4.0f32).atan2(3.0));
        assert_relative_eq!(phase[[0, 1]], -std::f32::consts::FRAC_PI_2);
        // atan2(0, -1) lands on +pi, keeping phase inside (-pi, pi]
        assert_relative_eq!(phase[[1, 0]], std::f32::consts::PI);
        assert_relative_eq!(phase[[1, 1]], 0.0);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let buf = f32_bytes(&[1.0, 2.0, 3.0]);
        let err = decode(&buf, 2, 2, SampleLayout::InterleavedFloat32Pairs).unwrap_err();
        match err {
            DecodeError::ShortRead { expected, actual } => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = decode(&[], 0, 5, SampleLayout::Complex64).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDimensions { .. }));
    }

    #[test]
    fn plain_f32_plane() {
        let buf = f32_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let plane = decode_plane_f32(&buf, 2, 3).unwrap();
        assert_eq!(plane, ndarray::arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
    }
}
