// src/encode/encoder.rs

//! Two-pass raw image encoder.
//!
//! The output starts with an 8 byte preamble, the entropy description
//! `03 00 06 07` followed by the packed context key table, and continues with
//! the bitstream, most significant bit first.

use super::context_model::{ContextKeyTable, ContextModel};
use super::emitter::{AdaptiveEmitter, OutputBits};
use crate::image::raster::RasterGeometry;
use crate::image::scanline::ScanlineWindow;
use crate::utils::bit_array::bytes_as_bits_mut;
use crate::utils::error::{CodecError, Result};
use log::debug;

/// Bytes in front of the bitstream.
pub const PREAMBLE_BYTES: usize = 8;

/// Fixed entropy description opening every encoded image.
pub const ENTROPY_DESCRIPTION: [u8; 4] = [0x03, 0x00, 0x06, 0x07];

/// Outcome of one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeReport {
    /// Preamble plus bitstream, rounded up to whole bytes. Zero for an
    /// empty image.
    pub bytes_written: usize,
    /// Bits of bitstream written after the preamble.
    pub bits: usize,
    /// Bits that did not fit in the output capacity.
    pub dropped_bits: usize,
    /// Carries resolved during encoding.
    pub carries: usize,
    /// Context parameters learned in the first pass.
    pub key_table: ContextKeyTable,
}

impl EncodeReport {
    /// `true` when the bitstream was cut short by the output capacity. A
    /// truncated stream cannot be decoded by the device.
    pub fn is_truncated(&self) -> bool {
        self.dropped_bits > 0
    }
}

/// Encodes a 1bpp raster.
///
/// With `output` set to `None` nothing is written and the call only measures
/// the encoded size. At most `max_output_size` bytes are produced; when the
/// bitstream does not fit, the remaining bits are dropped and the report is
/// marked truncated.
pub fn encode_raw_image(
    pixels: &[u8],
    geometry: &RasterGeometry,
    output: Option<&mut [u8]>,
    max_output_size: usize,
) -> Result<EncodeReport> {
    if geometry.is_empty() {
        return Ok(EncodeReport::default());
    }
    geometry.validate(pixels.len())?;

    let capacity = output
        .as_ref()
        .map_or(max_output_size, |buf| buf.len().min(max_output_size));
    if capacity < PREAMBLE_BYTES {
        return Err(CodecError::OutputTooSmall {
            needed: PREAMBLE_BYTES,
            available: capacity,
        });
    }
    let bit_capacity = (capacity - PREAMBLE_BYTES) * 8;

    let key_table = ContextModel::learn(geometry, pixels)?;

    let out = match output {
        Some(buf) => {
            let (preamble, payload) = buf[..capacity].split_at_mut(PREAMBLE_BYTES);
            preamble[..4].copy_from_slice(&ENTROPY_DESCRIPTION);
            preamble[4..].copy_from_slice(&key_table.to_bytes());
            payload.fill(0);
            OutputBits::new(Some(bytes_as_bits_mut(payload)), bit_capacity)
        }
        None => OutputBits::measuring(bit_capacity),
    };

    let mut emitter = AdaptiveEmitter::new(out);
    let mut window = ScanlineWindow::new(geometry.width, geometry.height);
    window.scan(geometry, pixels, |key, color| {
        emitter.encode_pixel(key_table.get(key), color)
    })?;
    let summary = emitter.finish();

    let report = EncodeReport {
        bytes_written: PREAMBLE_BYTES + summary.bits.div_ceil(8),
        bits: summary.bits,
        dropped_bits: summary.dropped_bits,
        carries: summary.carries,
        key_table,
    };
    debug!(
        "encoded {}x{} image into {} bytes",
        geometry.width, geometry.height, report.bytes_written
    );
    Ok(report)
}

/// Dry run of [`encode_raw_image`]: the size the image would take.
pub fn measure_raw_image(
    pixels: &[u8],
    geometry: &RasterGeometry,
    max_output_size: usize,
) -> Result<EncodeReport> {
    encode_raw_image(pixels, geometry, None, max_output_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_image_writes_nothing() {
        let geometry = RasterGeometry::new(0, 10, 4);
        let mut out = [0xAAu8; 16];
        let report = encode_raw_image(&[], &geometry, Some(&mut out), 16).unwrap();
        assert_eq!(report.bytes_written, 0);
        assert_eq!(out, [0xAA; 16]);

        let geometry = RasterGeometry::new(8, 0, 4);
        assert_eq!(measure_raw_image(&[], &geometry, 16).unwrap().bytes_written, 0);
    }

    #[test]
    fn test_preamble_layout() {
        let geometry = RasterGeometry::new(16, 8, 4);
        let pixels = [0xFFu8; 32];
        let mut out = [0u8; 64];
        let report = encode_raw_image(&pixels, &geometry, Some(&mut out), 64).unwrap();
        assert_eq!(&out[..4], &ENTROPY_DESCRIPTION);
        assert_eq!(&out[4..8], &report.key_table.to_bytes());
    }

    #[test]
    fn test_capacity_below_preamble() {
        let geometry = RasterGeometry::new(8, 1, 1);
        let mut out = [0u8; 7];
        assert!(matches!(
            encode_raw_image(&[0x00], &geometry, Some(&mut out), 64),
            Err(CodecError::OutputTooSmall { needed: 8, available: 7 })
        ));
    }

    #[test]
    fn test_invalid_geometry_is_reported() {
        let geometry = RasterGeometry::new(8, 4, 1);
        assert!(matches!(
            measure_raw_image(&[0u8; 3], &geometry, 64),
            Err(CodecError::PixelDataTooShort { needed: 4, available: 3 })
        ));
    }

    #[test]
    fn test_stale_output_bytes_are_cleared() {
        let geometry = RasterGeometry::new(16, 8, 4);
        let pixels = [0xFFu8; 32];
        let mut clean = [0u8; 64];
        let mut dirty = [0x5Au8; 64];
        let a = encode_raw_image(&pixels, &geometry, Some(&mut clean), 64).unwrap();
        let b = encode_raw_image(&pixels, &geometry, Some(&mut dirty), 64).unwrap();
        assert_eq!(a, b);
        assert_eq!(clean[..a.bytes_written], dirty[..b.bytes_written]);
    }
}
