// src/frame/assemble.rs

//! Builds a complete display frame from a raster: header, encoded payload
//! and trailer in one buffer.

use super::header::{FrameHeader, HeaderSize, TRAILER};
use crate::encode::encoder::{EncodeReport, PREAMBLE_BYTES, encode_raw_image};
use crate::image::raster::RasterGeometry;
use crate::utils::error::{CodecError, Result};
use log::info;

/// Largest frame the device driver buffers by default.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 65336;

/// Compression type tag for the context-adaptive payload.
pub const DEFAULT_COMPRESSION_TYPE: u8 = 2;

/// Settings for [`assemble_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParams {
    pub header_size: HeaderSize,
    pub compression_type: u8,
    pub two_color: bool,
    pub checksum: u16,
    /// Upper bound for the whole frame; the payload gets what the header
    /// and trailer leave over.
    pub max_frame_bytes: usize,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            header_size: HeaderSize::Extended,
            compression_type: DEFAULT_COMPRESSION_TYPE,
            two_color: false,
            checksum: 0,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl FrameParams {
    pub fn with_header_size(self, header_size: HeaderSize) -> Self {
        Self { header_size, ..self }
    }

    pub fn with_compression_type(self, compression_type: u8) -> Self {
        Self {
            compression_type,
            ..self
        }
    }

    pub fn with_two_color(self, two_color: bool) -> Self {
        Self { two_color, ..self }
    }

    pub fn with_checksum(self, checksum: u16) -> Self {
        Self { checksum, ..self }
    }

    pub fn with_max_frame_bytes(self, max_frame_bytes: usize) -> Self {
        Self {
            max_frame_bytes,
            ..self
        }
    }
}

/// A finished frame and the report of the encode that produced it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub report: EncodeReport,
}

/// Encodes `pixels` and frames the result for the device.
///
/// Fails with [`CodecError::PayloadTruncated`] when the payload does not fit
/// in `params.max_frame_bytes`, since a cut bitstream would be framed with a
/// size the device cannot decode.
pub fn assemble_frame(
    pixels: &[u8],
    geometry: &RasterGeometry,
    params: &FrameParams,
) -> Result<Frame> {
    let header_len = params.header_size.bytes();
    let overhead = header_len + TRAILER.len();
    if params.max_frame_bytes < overhead + PREAMBLE_BYTES {
        return Err(CodecError::FrameBufferTooSmall {
            needed: overhead + PREAMBLE_BYTES,
            available: params.max_frame_bytes,
        });
    }
    let width = dimension(geometry.width)?;
    let height = dimension(geometry.height)?;

    let payload_capacity = params.max_frame_bytes - overhead;
    let mut bytes = vec![0u8; params.max_frame_bytes];
    let report = encode_raw_image(
        pixels,
        geometry,
        Some(&mut bytes[header_len..header_len + payload_capacity]),
        payload_capacity,
    )?;
    if report.is_truncated() {
        return Err(CodecError::PayloadTruncated {
            dropped_bits: report.dropped_bits,
            capacity: payload_capacity,
        });
    }

    let header = FrameHeader {
        payload_size: report.bytes_written,
        height,
        width,
        compression_type: params.compression_type,
        two_color: params.two_color,
        header_size: params.header_size,
        checksum: params.checksum,
    };
    let total = header.fill(&mut bytes)?;
    bytes.truncate(total);

    info!(
        "Frame assembled: {} payload bytes, {} total",
        report.bytes_written, total
    );
    Ok(Frame { bytes, report })
}

fn dimension(value: u32) -> Result<u16> {
    u16::try_from(value).map_err(|_| CodecError::DimensionOverflow(value))
}

/// Rolling diagnostic hash of a frame, printed by the tooling to compare
/// outputs.
pub fn frame_hash(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |x, &b| x.wrapping_add(x) ^ b as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = FrameParams::default();
        assert_eq!(params.header_size, HeaderSize::Extended);
        assert_eq!(params.compression_type, 2);
        assert!(!params.two_color);
        assert_eq!(params.max_frame_bytes, 65336);
    }

    #[test]
    fn test_builder_methods() {
        let params = FrameParams::default()
            .with_header_size(HeaderSize::Compact)
            .with_compression_type(5)
            .with_two_color(true)
            .with_checksum(9)
            .with_max_frame_bytes(512);
        assert_eq!(params.header_size.bytes(), 30);
        assert_eq!(params.compression_type, 5);
        assert!(params.two_color);
        assert_eq!(params.checksum, 9);
        assert_eq!(params.max_frame_bytes, 512);
    }

    #[test]
    fn test_empty_image_frame_has_no_payload() {
        let geometry = RasterGeometry::new(0, 0, 0);
        let frame = assemble_frame(&[], &geometry, &FrameParams::default()).unwrap();
        assert_eq!(frame.bytes.len(), 32 + 7);
        assert_eq!(&frame.bytes[7..9], &[0, 0]);
        assert_eq!(&frame.bytes[32..], &TRAILER);
    }

    #[test]
    fn test_too_small_frame_limit() {
        let geometry = RasterGeometry::new(8, 1, 1);
        let params = FrameParams::default().with_max_frame_bytes(46);
        assert!(matches!(
            assemble_frame(&[0], &geometry, &params),
            Err(CodecError::FrameBufferTooSmall { needed: 47, available: 46 })
        ));
    }

    #[test]
    fn test_frame_hash() {
        assert_eq!(frame_hash(&[]), 0);
        assert_eq!(frame_hash(&[0x01]), 1);
        // ((1 + 1) ^ 2) = 0, then (0 + 0) ^ 3 = 3
        assert_eq!(frame_hash(&[0x01, 0x02, 0x03]), 3);
        assert_eq!(frame_hash(&[0xFF, 0x00]), 0x1FE);
    }
}
