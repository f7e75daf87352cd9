// src/frame/header.rs

//! Fixed device header and trailer around an encoded payload.
//!
//! Layout of the header (all other bytes are zero):
//!
//! | offset | content                                   |
//! |-------:|-------------------------------------------|
//! | 0..2   | magic `83 19`                             |
//! | 3..5   | width, little endian                      |
//! | 5..7   | height, little endian                     |
//! | 7..9   | payload size, little endian               |
//! | 22     | `0x100 - checksum`                        |
//! | 23     | compression type                          |
//! | 26     | `0x21` for two colors, `0x00` for one     |
//! | 27     | `0x84`                                    |
//! | 28..   | payload size again, see [`HeaderSize`]    |
//!
//! The 7 byte trailer follows the payload directly.

use crate::utils::error::{CodecError, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// First two bytes of every frame.
pub const HEADER_MAGIC: [u8; 2] = [0x83, 0x19];

/// Device protocol bytes closing every frame.
pub const TRAILER: [u8; 7] = [0x85, 0x05, 0x08, 0x00, 0x00, 0x01, 0x01];

const COLOR_MODE_TWO_COLORS: u8 = 0x21;
const COLOR_MODE_ONE_COLOR: u8 = 0x00;
const PAYLOAD_MARKER: u8 = 0x84;
const SIZE_FLAG: u8 = 0x80;

/// The two header sizes the device accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderSize {
    /// 30 bytes: the second size field is big endian with `0x80` or-ed into
    /// its high byte.
    Compact,
    /// 32 bytes: `80 00` followed by the big endian payload size.
    #[default]
    Extended,
}

impl HeaderSize {
    /// Size of the header in bytes.
    pub fn bytes(self) -> usize {
        match self {
            HeaderSize::Compact => 30,
            HeaderSize::Extended => 32,
        }
    }

    /// Maps a byte count back to a header size.
    pub fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            30 => Some(HeaderSize::Compact),
            32 => Some(HeaderSize::Extended),
            _ => None,
        }
    }
}

/// Field values of one frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Encoded payload size in bytes. The header fields keep its low 16 bits.
    pub payload_size: usize,
    pub height: u16,
    pub width: u16,
    /// Compression type tag understood by the device.
    pub compression_type: u8,
    /// `true` for two-color content.
    pub two_color: bool,
    pub header_size: HeaderSize,
    pub checksum: u16,
}

impl FrameHeader {
    /// Header, payload and trailer together.
    pub fn frame_size(&self) -> usize {
        self.header_size.bytes() + self.payload_size + TRAILER.len()
    }

    /// Writes the header at the start of `buffer` and the trailer behind the
    /// payload, which must already be in place. Returns the frame size.
    pub fn fill(&self, buffer: &mut [u8]) -> Result<usize> {
        let total = self.frame_size();
        if buffer.len() < total {
            return Err(CodecError::FrameBufferTooSmall {
                needed: total,
                available: buffer.len(),
            });
        }

        let header_len = self.header_size.bytes();
        let size = self.payload_size as u16;
        let header = &mut buffer[..header_len];
        header.fill(0);

        header[..2].copy_from_slice(&HEADER_MAGIC);
        LittleEndian::write_u16(&mut header[3..5], self.width);
        LittleEndian::write_u16(&mut header[5..7], self.height);
        LittleEndian::write_u16(&mut header[7..9], size);

        header[22] = 0x100u16.wrapping_sub(self.checksum) as u8;
        header[23] = self.compression_type;
        header[26] = if self.two_color {
            COLOR_MODE_TWO_COLORS
        } else {
            COLOR_MODE_ONE_COLOR
        };
        header[27] = PAYLOAD_MARKER;

        match self.header_size {
            HeaderSize::Extended => {
                header[28] = SIZE_FLAG;
                header[29] = 0x00;
                BigEndian::write_u16(&mut header[30..32], size);
            }
            HeaderSize::Compact => {
                header[28] = (size >> 8) as u8 | SIZE_FLAG;
                header[29] = size as u8;
            }
        }

        let trailer_start = header_len + self.payload_size;
        buffer[trailer_start..total].copy_from_slice(&TRAILER);
        Ok(total)
    }
}
