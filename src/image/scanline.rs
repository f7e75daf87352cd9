// src/image/scanline.rs

//! Two-line window over a raster and the 3-pixel context derived from it.
//!
//! The context of a pixel `C` is formed from three already-seen neighbors,
//! the number being the bit position inside the key:
//!
//! ```text
//! +----+----+
//! | K0 | K1 |
//! +----+----+
//! | K2 | C  |
//! +----+----+
//! ```
//!
//! Every line carries a virtual column -1 that is always zero, so pixels in
//! the first column need no special casing. The row above the first row is
//! all zero as well.

use super::raster::{MAX_STRIDE, RasterGeometry};
use crate::utils::bit_array::{bytes_as_bits, get_bit};
use crate::utils::error::Result;

/// Index of one of the eight neighbor configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextKey(u8);

impl ContextKey {
    /// Number of distinct contexts.
    pub const COUNT: usize = 8;

    /// Packs the three neighbors into a key.
    #[inline]
    pub fn from_neighbors(up_left: bool, up: bool, left: bool) -> Self {
        Self(up_left as u8 | (up as u8) << 1 | (left as u8) << 2)
    }

    /// Rebuilds a key from its index; only the low three bits are kept.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self((index & 0x07) as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pixel data of one line behind its virtual margin column.
#[derive(Debug, Clone)]
struct Scanline {
    bytes: [u8; MAX_STRIDE],
}

impl Scanline {
    fn blank() -> Self {
        Self {
            bytes: [0; MAX_STRIDE],
        }
    }

    fn load(&mut self, row: &[u8]) {
        self.bytes[..row.len()].copy_from_slice(row);
    }

    /// Column -1 is the margin and reads as zero.
    #[inline]
    fn pixel(&self, column: isize) -> bool {
        get_bit(bytes_as_bits(&self.bytes), column)
    }
}

/// The current line of a raster together with the line above it.
#[derive(Debug, Clone)]
pub struct ScanlineWindow {
    width: u32,
    height: u32,
    current: Scanline,
    previous: Scanline,
}

impl ScanlineWindow {
    /// Creates a zero-filled window for an image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            current: Scanline::blank(),
            previous: Scanline::blank(),
        }
    }

    /// Clears both lines.
    pub fn reset(&mut self) {
        self.current = Scanline::blank();
        self.previous = Scanline::blank();
    }

    /// Moves the current line up and loads `row` as the new current line.
    ///
    /// `row` must not be longer than [`MAX_STRIDE`]; bytes past its end keep
    /// their old content and are never addressed by an in-bounds pixel.
    pub fn advance(&mut self, row: &[u8]) {
        self.previous = self.current.clone();
        self.current.load(row);
    }

    /// Returns the pixel at column `x` of the current line, `false` outside
    /// the image.
    #[inline]
    pub fn get_pixel(&self, x: isize, y: isize) -> bool {
        if x >= 0 && x < self.width as isize && y >= 0 && y < self.height as isize {
            return self.current.pixel(x);
        }
        false
    }

    /// Context of the pixel at column `x` of the current line.
    #[inline]
    pub fn context_key(&self, x: isize) -> ContextKey {
        ContextKey::from_neighbors(
            self.previous.pixel(x - 1),
            self.previous.pixel(x),
            self.current.pixel(x - 1),
        )
    }

    /// Visits every pixel of `pixels` top to bottom, left to right, handing
    /// its context and value to `visit`. The window is reset first.
    pub fn scan<F>(&mut self, geometry: &RasterGeometry, pixels: &[u8], mut visit: F) -> Result<()>
    where
        F: FnMut(ContextKey, bool),
    {
        self.reset();
        for row_idx in 0..self.height {
            let row = geometry.row(pixels, row_idx)?;
            #[cfg(feature = "debug-logging")]
            log::trace!("row {}: {:02x?}", row_idx, row);
            self.advance(row);

            for col_idx in 0..self.width as isize {
                let key = self.context_key(col_idx);
                let color = self.get_pixel(col_idx, row_idx as isize);
                visit(key, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_key_bit_layout() {
        assert_eq!(ContextKey::from_neighbors(true, false, false).index(), 1);
        assert_eq!(ContextKey::from_neighbors(false, true, false).index(), 2);
        assert_eq!(ContextKey::from_neighbors(false, false, true).index(), 4);
        assert_eq!(ContextKey::from_neighbors(true, true, true).index(), 7);
        assert_eq!(ContextKey::from_index(13).index(), 5);
    }

    #[test]
    fn test_first_row_sees_blank_line_above() {
        let mut window = ScanlineWindow::new(8, 2);
        window.advance(&[0xFF]);
        assert_eq!(window.context_key(0).index(), 0);
        // Only the left neighbor is set on the first row.
        assert_eq!(window.context_key(1).index(), 4);
    }

    #[test]
    fn test_margin_column_reads_zero() {
        let mut window = ScanlineWindow::new(8, 2);
        window.advance(&[0xFF]);
        window.advance(&[0xFF]);
        assert_eq!(window.context_key(0).index(), 2);
        assert_eq!(window.context_key(3).index(), 7);
    }

    #[test]
    fn test_get_pixel_bounds() {
        let mut window = ScanlineWindow::new(4, 1);
        window.advance(&[0b1001_1000]);
        assert!(window.get_pixel(0, 0));
        assert!(!window.get_pixel(1, 0));
        assert!(window.get_pixel(3, 0));
        // Column 4 is set in the byte but lies outside the image width.
        assert!(!window.get_pixel(4, 0));
        assert!(!window.get_pixel(-1, 0));
        assert!(!window.get_pixel(0, 1));
    }

    #[test]
    fn test_scan_visits_every_pixel_in_order() {
        let geometry = RasterGeometry::new(3, 2, 1);
        let pixels = [0b1010_0000u8, 0b0100_0000];
        let mut window = ScanlineWindow::new(geometry.width, geometry.height);
        let mut seen = Vec::new();
        window
            .scan(&geometry, &pixels, |key, color| seen.push((key.index(), color)))
            .unwrap();
        assert_eq!(
            seen,
            vec![
                (0, true),
                (4, false),
                (0, true),
                (2, false),
                (1, true),
                (6, false),
            ]
        );
    }
}
