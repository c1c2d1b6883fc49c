//! Primitive layer: keyed keystream and hash functions
//!
//! The verifier only talks to these through [`Primitives`], so an
//! accelerated backend can stand in for [`Reference`] as long as it is
//! bit-exact with it.

#[cfg(not(feature = "std"))]
use alloc::format;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use crate::error::{Result, ValidationError};

/// ChaCha8 keystream block, in bytes
pub const KEYSTREAM_BLOCK_BYTES: usize = 64;

/// Key length of the keyed stream, in bytes
pub const STREAM_KEY_BYTES: usize = 32;

/// 32-byte digest
pub type Digest32 = [u8; 32];

/// A keyed pseudorandom stream addressable by block
pub trait KeyedStream {
    /// Keystream block number `counter`
    fn block(&mut self, counter: u64) -> [u8; KEYSTREAM_BLOCK_BYTES];
}

/// Primitive backend used by the verifier
pub trait Primitives: Send + Sync {
    type Stream: KeyedStream;

    /// Key a stream. The key must be [`STREAM_KEY_BYTES`] long.
    fn keyed_stream(&self, key: &[u8]) -> Result<Self::Stream>;

    /// Hash combining two table entries
    fn table_hash(&self, input: &[u8]) -> Digest32;

    /// Hash deriving the quality digest
    fn quality_hash(&self, input: &[u8]) -> Digest32;
}

/// Portable backend: ChaCha8 (rand_chacha), BLAKE3, SHA-256
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reference;

/// ChaCha8 with a zero nonce and a 64-bit block counter in state words
/// 12 and 13, output words serialised little-endian.
#[derive(Clone, Debug)]
pub struct ChaCha8Stream {
    rng: ChaCha8Rng,
}

impl ChaCha8Stream {
    pub fn new(key: [u8; STREAM_KEY_BYTES]) -> Self {
        Self {
            rng: ChaCha8Rng::from_seed(key),
        }
    }
}

impl KeyedStream for ChaCha8Stream {
    fn block(&mut self, counter: u64) -> [u8; KEYSTREAM_BLOCK_BYTES] {
        // one block is 16 words
        self.rng.set_word_pos(u128::from(counter) * 16);
        let mut out = [0u8; KEYSTREAM_BLOCK_BYTES];
        self.rng.fill_bytes(&mut out);
        out
    }
}

impl Primitives for Reference {
    type Stream = ChaCha8Stream;

    fn keyed_stream(&self, key: &[u8]) -> Result<ChaCha8Stream> {
        let key: [u8; STREAM_KEY_BYTES] = key.try_into().map_err(|_| {
            ValidationError::PrimitiveError(format!(
                "stream key must be {} bytes, got {}",
                STREAM_KEY_BYTES,
                key.len()
            ))
        })?;
        Ok(ChaCha8Stream::new(key))
    }

    fn table_hash(&self, input: &[u8]) -> Digest32 {
        *blake3::hash(input).as_bytes()
    }

    fn quality_hash(&self, input: &[u8]) -> Digest32 {
        let mut hasher = Sha256::new();
        hasher.update(input);
        hasher.finalize().into()
    }
}
