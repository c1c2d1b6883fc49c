//! Quality string derivation
//!
//! The quality of a valid proof is `SHA-256(challenge || x_a || x_b)`
//! where `x_a, x_b` are two adjacent leaves of the proof in plot ordering,
//! picked by the low 5 bits of the challenge.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt;

use crate::bits::BitString;
use crate::constants::{CHALLENGE_SIZE, PROOF_LEAVES, QUALITY_INDEX_BITS, QUALITY_SIZE};
use crate::error::{MalformedReason, Result};
use crate::primitives::{Primitives, Reference};
use crate::proof::Proof;

/// 32-byte quality digest of a valid proof
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality([u8; QUALITY_SIZE]);

impl Quality {
    pub fn from_bytes(bytes: [u8; QUALITY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; QUALITY_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; QUALITY_SIZE] {
        self.0
    }
}

impl From<Quality> for [u8; QUALITY_SIZE] {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl AsRef<[u8]> for Quality {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quality({})", self)
    }
}

/// Index of the first leaf of the quality pair: the low 5 bits of the
/// challenge, doubled
pub fn quality_index(challenge: &[u8; CHALLENGE_SIZE]) -> u16 {
    let mask = (1u8 << QUALITY_INDEX_BITS) - 1;
    u16::from(challenge[CHALLENGE_SIZE - 1] & mask) << 1
}

/// Quality string of a proof (given in proof ordering) for an explicit
/// quality index
pub fn quality_string_with<P: Primitives>(
    primitives: &P,
    proof: &Proof,
    quality_index: u16,
    challenge: &[u8; CHALLENGE_SIZE],
) -> Result<Quality> {
    let index = quality_index as usize;
    if index + 1 >= PROOF_LEAVES {
        return Err(MalformedReason::QualityIndex {
            index: quality_index,
        }
        .into());
    }

    let plot = proof.to_plot_ordering();
    let k = proof.k() as usize;

    let mut pair = BitString::from_value(plot.leaves()[index], k);
    pair.push_value(plot.leaves()[index + 1], k);

    let mut input = Vec::with_capacity(CHALLENGE_SIZE + pair.as_bytes().len());
    input.extend_from_slice(challenge);
    input.extend_from_slice(pair.as_bytes());

    Ok(Quality(primitives.quality_hash(&input)))
}

/// [`quality_string_with`] on the reference primitives
pub fn quality_string(
    proof: &Proof,
    quality_index: u16,
    challenge: &[u8; CHALLENGE_SIZE],
) -> Result<Quality> {
    quality_string_with(&Reference, proof, quality_index, challenge)
}
