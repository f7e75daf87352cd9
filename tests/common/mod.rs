// tests/common/mod.rs

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

/// The 16x4 reference picture, one 4 byte padded row per entry, top row
/// first.
pub const REFERENCE_ROWS: [[u8; 4]; 4] = [
    [0xF0, 0x0F, 0x00, 0x00],
    [0xFF, 0x00, 0x00, 0x00],
    [0x3C, 0x3C, 0x00, 0x00],
    [0xAA, 0x55, 0x00, 0x00],
];

/// Known-good encoding of [`REFERENCE_ROWS`].
pub const REFERENCE_ENCODED: [u8; 19] = [
    0x03, 0x00, 0x06, 0x07, 0x72, 0x23, 0x82, 0x36, 0x06, 0x37, 0xd8, 0x4d, 0xb1, 0x69, 0x01,
    0x02, 0xe0, 0x00, 0x00,
];

pub fn top_down_pixels(rows: &[[u8; 4]]) -> Vec<u8> {
    rows.iter().flatten().copied().collect()
}

pub fn bottom_up_pixels(rows: &[[u8; 4]]) -> Vec<u8> {
    rows.iter().rev().flatten().copied().collect()
}

/// Deterministic noise, `len` bytes.
pub fn noise(len: usize, mut seed: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (seed >> 16) as u8
        })
        .collect()
}

/// Builds a 1bpp BMP file with a black/white palette. `rows` are given in
/// storage order and padded to whole 32 bit words.
pub fn build_bmp(width: i32, height: i32, rows: &[Vec<u8>]) -> Vec<u8> {
    let stride = ((width as usize).div_ceil(8) + 3) & !3;
    let offset = 62u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.write_u32::<LittleEndian>(offset + (stride * rows.len()) as u32).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(offset).unwrap();
    out.write_u32::<LittleEndian>(40).unwrap();
    out.write_i32::<LittleEndian>(width).unwrap();
    out.write_i32::<LittleEndian>(height).unwrap();
    out.write_u16::<LittleEndian>(1).unwrap();
    out.write_u16::<LittleEndian>(1).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>((stride * rows.len()) as u32).unwrap();
    out.write_i32::<LittleEndian>(2835).unwrap();
    out.write_i32::<LittleEndian>(2835).unwrap();
    out.write_u32::<LittleEndian>(2).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0x0000_0000).unwrap();
    out.write_u32::<LittleEndian>(0x00FF_FFFF).unwrap();
    for row in rows {
        let mut padded = row.clone();
        padded.resize(stride, 0);
        out.extend_from_slice(&padded);
    }
    out
}
