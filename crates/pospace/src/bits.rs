//! Big-endian bit strings
//!
//! Every value in the construction is packed most significant bit first,
//! and a byte view pads the final byte with zero bits on the right. Hash
//! inputs, metadata and the proof wire format all use this layout.

use core::fmt;

/// Capacity of a [`BitString`] in bits. The widest string ever built is a
/// table-4 hash input, `(k + 6) + 4k + 4k` bits, which stays below 512
/// for every accepted k.
pub const BIT_CAPACITY: usize = 512;

/// Read `width` (at most 64) bits starting at bit `start` of `src`.
pub fn read_bits(src: &[u8], start: usize, width: usize) -> u64 {
    debug_assert!(width <= 64);
    let mut value = 0u64;
    for pos in start..start + width {
        let bit = (src[pos / 8] >> (7 - pos % 8)) & 1;
        value = (value << 1) | u64::from(bit);
    }
    value
}

/// Write the low `width` (at most 64) bits of `value` at bit `start` of
/// `dst`. Bits outside the range are left as they are; bits inside are
/// OR-ed in, so `dst` must be zeroed there.
pub fn write_bits(dst: &mut [u8], start: usize, value: u64, width: usize) {
    debug_assert!(width <= 64);
    for i in 0..width {
        if (value >> (width - 1 - i)) & 1 == 1 {
            let pos = start + i;
            dst[pos / 8] |= 0x80 >> (pos % 8);
        }
    }
}

/// Fixed-capacity bit string, MSB first.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitString {
    bytes: [u8; BIT_CAPACITY / 8],
    len: usize,
}

impl Default for BitString {
    fn default() -> Self {
        Self::new()
    }
}

impl BitString {
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; BIT_CAPACITY / 8],
            len: 0,
        }
    }

    /// `width` low bits of `value`
    pub fn from_value(value: u64, width: usize) -> Self {
        let mut bits = Self::new();
        bits.push_value(value, width);
        bits
    }

    /// Copy `width` bits of `src` starting at bit `start`
    pub fn from_bytes(src: &[u8], start: usize, width: usize) -> Self {
        let mut bits = Self::new();
        let end = start + width;
        let mut pos = start;
        while pos < end {
            let take = (end - pos).min(64);
            bits.push_value(read_bits(src, pos, take), take);
            pos += take;
        }
        bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append the low `width` bits of `value`.
    ///
    /// # Panics
    /// When the string would exceed [`BIT_CAPACITY`].
    pub fn push_value(&mut self, value: u64, width: usize) {
        assert!(
            self.len + width <= BIT_CAPACITY,
            "bit string overflow: {} + {} bits",
            self.len,
            width
        );
        write_bits(&mut self.bytes, self.len, value, width);
        self.len += width;
    }

    pub fn append(&mut self, other: &BitString) {
        let mut pos = 0;
        while pos < other.len {
            let take = (other.len - pos).min(64);
            self.push_value(other.slice_value(pos, take), take);
            pos += take;
        }
    }

    /// `width` (at most 64) bits starting at `start`
    pub fn slice_value(&self, start: usize, width: usize) -> u64 {
        assert!(start + width <= self.len, "slice past end of bit string");
        read_bits(&self.bytes, start, width)
    }

    /// Whole string as an integer; the string must be at most 64 bits
    pub fn value(&self) -> u64 {
        self.slice_value(0, self.len)
    }

    /// Byte view, zero padded on the right to a byte boundary
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..(self.len + 7) / 8]
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({} bits, 0x", self.len)?;
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}
