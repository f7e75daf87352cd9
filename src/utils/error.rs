// src/utils/error.rs

//! Error type shared by the encoder, the frame builder and the BMP reader.

use std::io;
use thiserror::Error;

/// Main error type for the frame encoder library.
#[derive(Error, Debug)]
pub enum CodecError {
    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Rows are wider than the scanline buffers can hold.
    #[error("Row stride of {stride} bytes exceeds the {max} byte line buffer")]
    StrideTooWide { stride: usize, max: usize },

    /// The pixel width does not fit inside one row stride.
    #[error("Width of {width} pixels does not fit in a {stride} byte stride")]
    WidthExceedsStride { width: u32, stride: usize },

    /// The pixel buffer ends before the last row.
    #[error("Pixel data too short: need {needed} bytes, have {available}")]
    PixelDataTooShort { needed: usize, available: usize },

    /// A row index at or past the image height.
    #[error("Row {row} is outside an image of {height} rows")]
    RowOutOfRange { row: u32, height: u32 },

    /// The output capacity cannot even hold the 8 byte key preamble.
    #[error("Output capacity of {available} bytes is below the {needed} byte preamble")]
    OutputTooSmall { needed: usize, available: usize },

    /// The frame buffer cannot hold header, payload and trailer.
    #[error("Frame buffer too small: need {needed} bytes, have {available}")]
    FrameBufferTooSmall { needed: usize, available: usize },

    /// An image dimension does not fit the 16 bit header field.
    #[error("Image dimension {0} exceeds the 16 bit header field")]
    DimensionOverflow(u32),

    /// The encoded payload did not fit and bits were dropped.
    #[error("Payload truncated: {dropped_bits} bits dropped at {capacity} byte capacity")]
    PayloadTruncated { dropped_bits: usize, capacity: usize },

    /// The input is not a BMP file this encoder understands.
    #[error("Invalid BMP: {0}")]
    InvalidBmp(String),

    /// The BMP is valid but uses a feature the encoder does not support.
    #[error("Unsupported BMP: {0}")]
    UnsupportedBmp(String),
}

/// A specialized `Result` type for encoding operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        assert_eq!(
            CodecError::Io(io_error).to_string(),
            "I/O error: file not found"
        );

        assert_eq!(
            CodecError::StrideTooWide { stride: 84, max: 83 }.to_string(),
            "Row stride of 84 bytes exceeds the 83 byte line buffer"
        );
        assert_eq!(
            CodecError::InvalidBmp("missing signature".into()).to_string(),
            "Invalid BMP: missing signature"
        );
    }

    #[test]
    fn test_io_conversion() {
        fn open_missing() -> Result<Vec<u8>> {
            Ok(std::fs::read("/definitely/not/here.bmp")?)
        }
        assert!(matches!(open_missing(), Err(CodecError::Io(_))));
    }
}
