// src/utils/bit_array.rs

//! Bit-level access to packed byte buffers, most significant bit first.
//!
//! Bit `n` lives in byte `n / 8` under the mask `0x80 >> (n % 8)`. Both
//! helpers are checked: reads outside the buffer yield `false` and writes
//! outside it are ignored.

use bitvec::prelude::*;

/// A packed bit buffer in transmission order.
pub type Bits = BitSlice<u8, Msb0>;

/// Views a byte slice as MSB-first bits.
#[inline]
pub fn bytes_as_bits(bytes: &[u8]) -> &Bits {
    BitSlice::from_slice(bytes)
}

/// Views a mutable byte slice as MSB-first bits.
#[inline]
pub fn bytes_as_bits_mut(bytes: &mut [u8]) -> &mut Bits {
    BitSlice::from_slice_mut(bytes)
}

/// Sets bit `position` of `buffer` to `value`. Does nothing without a buffer.
#[inline]
pub fn set_bit(buffer: Option<&mut Bits>, position: usize, value: bool) {
    if let Some(bits) = buffer {
        if let Some(mut bit) = bits.get_mut(position) {
            *bit = value;
        }
    }
}

/// Returns bit `position` of `buffer`. Negative positions read as `false`.
#[inline]
pub fn get_bit(buffer: &Bits, position: isize) -> bool {
    if position < 0 {
        return false;
    }
    buffer.get(position as usize).is_some_and(|bit| *bit)
}
