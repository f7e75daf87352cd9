// src/encode/emitter.rs

//! Second encoding pass: the adaptive bit emitter.
//!
//! The emitter keeps two registers. `countdown` holds the pending code bits;
//! its top bit is the next bit to leave, and bit 8 signals a carry into bits
//! that were already written. `run_budget` is the width of the current
//! interval and stays within `0x80..=0xFF` between pixels.
//!
//! For a pixel whose context entry is `(shift, color)` the interval is split
//! at `run_budget >> shift`:
//!
//! - pixel equal to `color`: the interval shrinks to the small part and
//!   `shift` bits are written to renormalize it,
//! - otherwise the small part is added to `countdown`, the interval keeps the
//!   large part and one bit is written if it dropped below `0x80`.

use crate::encode::context_model::KeyEntry;
use crate::utils::bit_array::{Bits, get_bit, set_bit};
use log::{debug, warn};

/// Interval width at the start of every image.
pub const INITIAL_RUN_BUDGET: u32 = 0xFF;

/// Bits appended by [`AdaptiveEmitter::complete_last_bit_part`].
pub const FLUSH_BITS: usize = 8;

const CARRY_BIT: u32 = 0x100;
const TOP_BIT: u32 = 0x80;

/// Append-only bit sink with a hard capacity.
///
/// Without a buffer only the bit count is tracked, which is how dry runs
/// measure the encoded size.
pub struct OutputBits<'a> {
    buffer: Option<&'a mut Bits>,
    len: usize,
    capacity: usize,
    dropped: usize,
}

impl<'a> OutputBits<'a> {
    /// Creates a sink accepting at most `capacity` bits. A buffer shorter
    /// than `capacity` limits it further.
    pub fn new(buffer: Option<&'a mut Bits>, capacity: usize) -> Self {
        let capacity = match &buffer {
            Some(bits) => capacity.min(bits.len()),
            None => capacity,
        };
        Self {
            buffer,
            len: 0,
            capacity,
            dropped: 0,
        }
    }

    /// A sink that counts bits without storing them.
    pub fn measuring(capacity: usize) -> Self {
        Self::new(None, capacity)
    }

    /// Appends one bit. Returns `false` when the bit was dropped.
    pub fn push(&mut self, bit: bool) -> bool {
        if self.len < self.capacity {
            set_bit(self.buffer.as_deref_mut(), self.len, bit);
            self.len += 1;
            return true;
        }
        if self.dropped == 0 {
            warn!(
                "Output capacity of {} bits reached, dropping further bits",
                self.capacity
            );
        }
        self.dropped += 1;
        false
    }

    /// Adds one to the written bits read as a big-endian integer: trailing
    /// ones become zeros and the last zero becomes a one. When every bit is
    /// a one they all wrap to zero.
    pub fn propagate_carry(&mut self) {
        let Some(bits) = self.buffer.as_deref_mut() else {
            return;
        };
        let mut pos = self.len;
        while pos > 0 {
            pos -= 1;
            if !get_bit(bits, pos as isize) {
                set_bit(Some(&mut *bits), pos, true);
                return;
            }
            set_bit(Some(&mut *bits), pos, false);
        }
    }

    /// Number of bits written.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bits that did not fit.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// Counters describing a finished bitstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitterSummary {
    /// Bits written to the output.
    pub bits: usize,
    /// Bits lost to the capacity limit.
    pub dropped_bits: usize,
    /// Carries resolved into already written bits.
    pub carries: usize,
}

/// Encoder state of one image, fed pixel by pixel.
pub struct AdaptiveEmitter<'a> {
    out: OutputBits<'a>,
    run_budget: u32,
    countdown: u32,
    carries: usize,
}

impl<'a> AdaptiveEmitter<'a> {
    pub fn new(out: OutputBits<'a>) -> Self {
        Self {
            out,
            run_budget: INITIAL_RUN_BUDGET,
            countdown: 0,
            carries: 0,
        }
    }

    /// Encodes one pixel against the entry of its context.
    pub fn encode_pixel(&mut self, entry: KeyEntry, pixel: bool) {
        let reduced = self.run_budget >> entry.run_shift;

        if pixel == entry.color {
            self.run_budget = reduced;
            for _ in 0..entry.run_shift {
                self.write_next_bit();
            }
        } else {
            self.countdown += reduced;
            self.run_budget -= reduced;

            if self.countdown & CARRY_BIT != 0 {
                self.countdown &= 0xFF;
                self.out.propagate_carry();
                self.carries += 1;
            }

            if self.run_budget & TOP_BIT == 0 {
                self.write_next_bit();
            }
        }
    }

    /// Moves the top bit of `countdown` to the output and doubles the
    /// interval.
    pub fn write_next_bit(&mut self) {
        self.run_budget *= 2;
        self.out.push(self.countdown & TOP_BIT != 0);
        self.countdown = (self.countdown << 1) & 0xFF;
    }

    /// Terminates the stream with [`FLUSH_BITS`] bits, whatever the state.
    pub fn complete_last_bit_part(&mut self) {
        for _ in 0..FLUSH_BITS {
            self.write_next_bit();
        }
    }

    /// Flushes the stream and reports its counters.
    pub fn finish(mut self) -> EmitterSummary {
        self.complete_last_bit_part();
        let summary = EmitterSummary {
            bits: self.out.len(),
            dropped_bits: self.out.dropped(),
            carries: self.carries,
        };
        debug!(
            "bitstream finished: {} bits, {} dropped, {} carries",
            summary.bits, summary.dropped_bits, summary.carries
        );
        summary
    }
}
