// src/image/bmp.rs

//! Minimal reader for uncompressed 1bpp Windows bitmaps.
//!
//! Only files with a `BITMAPINFOHEADER` DIB header are accepted. The first
//! palette entry must be black, so a stored 0 bit is a black pixel.

use super::raster::RasterGeometry;
use crate::utils::error::{CodecError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use std::io::{Cursor, Seek, SeekFrom};
use std::path::Path;

/// Size of the BMP file header.
pub const FILE_HEADER_BYTES: u64 = 14;
/// Size of a `BITMAPINFOHEADER`.
pub const INFO_HEADER_BYTES: u32 = 40;

const SIGNATURE: [u8; 2] = *b"BM";
const BI_RGB: u32 = 0;
const COLOR_TABLE_START: u64 = FILE_HEADER_BYTES + INFO_HEADER_BYTES as u64;

/// A 1bpp bitmap file held in memory.
#[derive(Debug, Clone)]
pub struct BmpImage {
    data: Vec<u8>,
    geometry: RasterGeometry,
}

impl BmpImage {
    /// Reads and parses a bitmap file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        debug!("BMP {:?} has length {}", path.as_ref(), data.len());
        Self::from_bytes(data)
    }

    /// Parses a bitmap from its file bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < COLOR_TABLE_START as usize + 4 {
            return Err(CodecError::InvalidBmp(format!(
                "{} bytes is shorter than the headers",
                data.len()
            )));
        }
        if data[..2] != SIGNATURE {
            return Err(CodecError::InvalidBmp("missing BM signature".into()));
        }

        let mut cursor = Cursor::new(&data[..]);
        cursor.seek(SeekFrom::Start(10))?;
        let offset = cursor.read_u32::<LittleEndian>()?;

        let dib_size = cursor.read_u32::<LittleEndian>()?;
        if dib_size != INFO_HEADER_BYTES {
            return Err(CodecError::UnsupportedBmp(format!(
                "DIB header of {} bytes is not BITMAPINFOHEADER",
                dib_size
            )));
        }

        let width = cursor.read_i32::<LittleEndian>()?;
        let height = cursor.read_i32::<LittleEndian>()?;
        let _planes = cursor.read_u16::<LittleEndian>()?;
        let bpp = cursor.read_u16::<LittleEndian>()?;
        let compression = cursor.read_u32::<LittleEndian>()?;
        debug!("dimensions: {}x{} @ {} bpp", width, height, bpp);

        if bpp != 1 {
            return Err(CodecError::UnsupportedBmp(format!(
                "{} bits per pixel, only 1bpp is supported",
                bpp
            )));
        }
        if compression != BI_RGB {
            return Err(CodecError::UnsupportedBmp(format!(
                "compression method {}, only BI_RGB is supported",
                compression
            )));
        }
        if width <= 0 {
            return Err(CodecError::InvalidBmp(format!("width {}", width)));
        }

        cursor.seek(SeekFrom::Start(COLOR_TABLE_START))?;
        let first_color = cursor.read_u32::<LittleEndian>()?;
        if first_color != 0 {
            return Err(CodecError::UnsupportedBmp(format!(
                "first palette color is {:#08x}, expected black",
                first_color
            )));
        }

        let width = width as u32;
        // Rows are padded to whole 32 bit words.
        let stride = (RasterGeometry::packed_row_bytes(width) + 3) & !3;
        debug!(
            "pixel data starts at offset {} with stride of {}",
            offset, stride
        );

        let geometry = RasterGeometry::new(width, height.unsigned_abs(), stride)
            .with_offset(offset as usize)
            .with_top_down(height < 0);
        geometry.validate(data.len())?;

        Ok(Self { data, geometry })
    }

    pub fn geometry(&self) -> &RasterGeometry {
        &self.geometry
    }

    /// The whole file; [`RasterGeometry::offset`] locates the pixel rows.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (Vec<u8>, RasterGeometry) {
        (self.data, self.geometry)
    }
}
