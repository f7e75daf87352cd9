// src/image/raster.rs

//! Geometry of a 1-bit-per-pixel raster held in a caller-owned buffer.

use crate::utils::error::{CodecError, Result};

/// Total size of one scanline buffer, margin included.
pub const LINE_BUFFER_BYTES: usize = 84;

/// Bytes reserved in front of the pixel data for the virtual column -1.
pub const MARGIN_BYTES: usize = 1;

/// Largest row stride the scanline buffers accept.
pub const MAX_STRIDE: usize = LINE_BUFFER_BYTES - MARGIN_BYTES;

/// Where the pixels of an image live inside a byte buffer and how rows are
/// ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterGeometry {
    /// Number of rows.
    pub height: u32,
    /// Number of pixels per row.
    pub width: u32,
    /// Byte offset of the first stored row.
    pub offset: usize,
    /// Bytes per stored row, padding included.
    pub stride: usize,
    /// `true` when the first stored row is the top of the image.
    pub top_down: bool,
}

impl RasterGeometry {
    /// Creates a top-down geometry starting at offset 0.
    pub fn new(width: u32, height: u32, stride: usize) -> Self {
        Self {
            height,
            width,
            offset: 0,
            stride,
            top_down: true,
        }
    }

    /// Sets the byte offset of the pixel data.
    pub fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    /// Sets the stored row order.
    pub fn with_top_down(self, top_down: bool) -> Self {
        Self { top_down, ..self }
    }

    /// Packed bytes needed for `width` pixels, without alignment padding.
    pub fn packed_row_bytes(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    /// An image without rows or columns has nothing to encode.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Checks that rows fit the scanline buffers and that `available` bytes
    /// of pixel data cover every row.
    pub fn validate(&self, available: usize) -> Result<()> {
        if self.stride > MAX_STRIDE {
            return Err(CodecError::StrideTooWide {
                stride: self.stride,
                max: MAX_STRIDE,
            });
        }
        if Self::packed_row_bytes(self.width) > self.stride {
            return Err(CodecError::WidthExceedsStride {
                width: self.width,
                stride: self.stride,
            });
        }
        let needed = self
            .offset
            .saturating_add(self.stride.saturating_mul(self.height as usize));
        if needed > available {
            return Err(CodecError::PixelDataTooShort { needed, available });
        }
        Ok(())
    }

    /// Returns the stored bytes of image row `row`, counted from the top.
    pub fn row<'a>(&self, pixels: &'a [u8], row: u32) -> Result<&'a [u8]> {
        let stored = if self.top_down {
            Some(row).filter(|&r| r < self.height)
        } else {
            self.height.checked_sub(1).and_then(|last| last.checked_sub(row))
        };
        let Some(stored) = stored else {
            return Err(CodecError::RowOutOfRange {
                row,
                height: self.height,
            });
        };
        let start = self.offset + self.stride * stored as usize;
        let end = start + self.stride;
        pixels
            .get(start..end)
            .ok_or(CodecError::PixelDataTooShort {
                needed: end,
                available: pixels.len(),
            })
    }
}
