// src/encode/context_model.rs

//! First encoding pass: learns a run-length exponent and a color flag for
//! each of the eight pixel contexts.
//!
//! A streak counter grows while consecutive pixels keep their context. When
//! the context changes and the color does not, the finished streak is folded
//! into the previous context's smoothed length with `avg = (avg + streak) / 2`.
//! A color change postpones the fold: the streak simply keeps growing and the
//! previous context stays the one that will receive it.

use crate::image::raster::RasterGeometry;
use crate::image::scanline::{ContextKey, ScanlineWindow};
use crate::utils::error::Result;
use log::debug;

/// Smallest run shift a context can be assigned.
pub const MIN_RUN_SHIFT: u8 = 1;
/// Largest run shift a context can be assigned.
pub const MAX_RUN_SHIFT: u8 = 7;

/// Learned parameters of one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    /// Number of bits written on a hit, in `[1, 7]`.
    pub run_shift: u8,
    /// Flag compared against the pixel value by the emitter. It is set when
    /// zero-valued pixels outnumbered one-valued pixels in this context.
    pub color: bool,
}

impl KeyEntry {
    /// The `shift << 1 | color` nibble stored in the preamble.
    #[inline]
    pub fn nibble(self) -> u8 {
        (self.run_shift << 1) | self.color as u8
    }
}

impl Default for KeyEntry {
    fn default() -> Self {
        Self {
            run_shift: MIN_RUN_SHIFT,
            color: false,
        }
    }
}

/// The per-context parameters of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextKeyTable {
    entries: [KeyEntry; ContextKey::COUNT],
}

impl ContextKeyTable {
    pub fn new(entries: [KeyEntry; ContextKey::COUNT]) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn get(&self, key: ContextKey) -> KeyEntry {
        self.entries[key.index()]
    }

    pub fn entries(&self) -> &[KeyEntry; ContextKey::COUNT] {
        &self.entries
    }

    /// Packs two contexts per byte, the even context in the high nibble.
    pub fn to_bytes(&self) -> [u8; 4] {
        let mut packed = [0u8; 4];
        for (byte, pair) in packed.iter_mut().zip(self.entries.chunks_exact(2)) {
            *byte = pair[0].nibble() << 4 | pair[1].nibble();
        }
        packed
    }
}

/// Running statistics of the first pass.
#[derive(Debug, Clone)]
pub struct ContextModel {
    last_key: ContextKey,
    last_color: bool,
    streak: u32,
    averages: [f32; ContextKey::COUNT],
    zero_counts: [u32; ContextKey::COUNT],
    one_counts: [u32; ContextKey::COUNT],
}

impl Default for ContextModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextModel {
    pub fn new() -> Self {
        Self {
            last_key: ContextKey::from_index(0),
            last_color: false,
            streak: 0,
            averages: [0.0; ContextKey::COUNT],
            zero_counts: [0; ContextKey::COUNT],
            one_counts: [0; ContextKey::COUNT],
        }
    }

    /// Runs the whole first pass over an image.
    pub fn learn(geometry: &RasterGeometry, pixels: &[u8]) -> Result<ContextKeyTable> {
        let mut model = Self::new();
        let mut window = ScanlineWindow::new(geometry.width, geometry.height);
        window.scan(geometry, pixels, |key, color| model.observe(key, color))?;
        let table = model.finish();
        debug!("context key table: {:02x?}", table.to_bytes());
        Ok(table)
    }

    /// Accounts for one pixel.
    pub fn observe(&mut self, key: ContextKey, color: bool) {
        if key != self.last_key && color == self.last_color {
            let slot = &mut self.averages[self.last_key.index()];
            *slot = (*slot + self.streak as f32) / 2.0;
            self.streak = 1;
            self.last_key = key;
        } else {
            self.streak += 1;
        }

        self.last_color = color;
        if color {
            self.one_counts[key.index()] += 1;
        } else {
            self.zero_counts[key.index()] += 1;
        }
    }

    /// Smoothed streak length of a context so far.
    pub fn average(&self, key: ContextKey) -> f32 {
        self.averages[key.index()]
    }

    /// Reduces the statistics to the key table.
    pub fn finish(&self) -> ContextKeyTable {
        let mut entries = [KeyEntry::default(); ContextKey::COUNT];
        for (i, entry) in entries.iter_mut().enumerate() {
            let rounded = (self.averages[i] + 0.5) as i32;
            entry.run_shift = rounded.clamp(MIN_RUN_SHIFT as i32, MAX_RUN_SHIFT as i32) as u8;
            entry.color = self.zero_counts[i] > self.one_counts[i];
        }
        ContextKeyTable::new(entries)
    }
}
