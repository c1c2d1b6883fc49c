//! F1: leaf values to first-table y values
//!
//! The k-bit outputs for x = 0, 1, 2, ... sit back to back in the ChaCha8
//! keystream keyed by the plot seed, so `F1(x)` is the k bits starting at
//! keystream bit `x * k`. The top [`EXTRA_BITS`] of x are appended to give
//! a `k + EXTRA_BITS` bit y.

use crate::bits::{read_bits, BitString};
use crate::constants::{EXTRA_BITS, F1_BLOCK_SIZE_BITS, F1_KEY_TABLE_INDEX, SEED_SIZE};
use crate::error::Result;
use crate::primitives::{KeyedStream, Primitives, KEYSTREAM_BLOCK_BYTES, STREAM_KEY_BYTES};

/// Stream key for F1: the table index followed by the first 31 seed bytes
pub fn f1_key(seed: &[u8; SEED_SIZE]) -> [u8; STREAM_KEY_BYTES] {
    let mut key = [0u8; STREAM_KEY_BYTES];
    key[0] = F1_KEY_TABLE_INDEX;
    key[1..].copy_from_slice(&seed[..STREAM_KEY_BYTES - 1]);
    key
}

pub struct F1Calculator<S> {
    k: u8,
    stream: S,
}

impl<S: KeyedStream> F1Calculator<S> {
    pub fn new<P>(primitives: &P, k: u8, seed: &[u8; SEED_SIZE]) -> Result<Self>
    where
        P: Primitives<Stream = S>,
    {
        let stream = primitives.keyed_stream(&f1_key(seed))?;
        Ok(Self { k, stream })
    }

    /// F1(x): k keystream bits followed by the top EXTRA_BITS bits of x
    pub fn calculate_f(&mut self, x: u64) -> u64 {
        let k = u64::from(self.k);
        let counter_bit = x * k;
        let counter = counter_bit / F1_BLOCK_SIZE_BITS;
        let bits_before_x = (counter_bit % F1_BLOCK_SIZE_BITS) as usize;

        // the k output bits may straddle two keystream blocks
        let mut buf = [0u8; 2 * KEYSTREAM_BLOCK_BYTES];
        buf[..KEYSTREAM_BLOCK_BYTES].copy_from_slice(&self.stream.block(counter));
        if bits_before_x + self.k as usize > F1_BLOCK_SIZE_BITS as usize {
            buf[KEYSTREAM_BLOCK_BYTES..].copy_from_slice(&self.stream.block(counter + 1));
        }
        let f = read_bits(&buf, bits_before_x, self.k as usize);

        (f << EXTRA_BITS) | extra_bits(x, self.k)
    }

    /// y and the metadata (x itself) needed to evaluate table 2
    pub fn calculate_bucket(&mut self, x: u64) -> (u64, BitString) {
        (self.calculate_f(x), BitString::from_value(x, self.k as usize))
    }
}

/// Top EXTRA_BITS bits of a k-bit x, zero padded on the right when k is
/// shorter than that
fn extra_bits(x: u64, k: u8) -> u64 {
    if k >= EXTRA_BITS {
        x >> (k - EXTRA_BITS)
    } else {
        x << (EXTRA_BITS - k)
    }
}
