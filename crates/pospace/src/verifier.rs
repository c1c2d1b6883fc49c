//! Proof validation
//!
//! A proof is validated bottom up: F1 over the 64 leaves, then six rounds
//! of pairwise matching (tables 2..7), then the table-7 root is bound to
//! the challenge and the quality string is derived. Any failing step
//! rejects the whole proof; there is no partial result.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use tracing::{debug, trace};

use crate::constants::{CHALLENGE_SIZE, EXTRA_BITS, NUM_TABLES, SEED_SIZE};
use crate::error::{Result, ValidationError};
use crate::f1::F1Calculator;
use crate::matching::{reduce_level, LevelEntry};
use crate::primitives::{Primitives, Reference};
use crate::proof::Proof;
use crate::quality::{quality_index, quality_string_with, Quality};

/// Stateless proof of space verifier over a primitive backend.
///
/// Holds no mutable state, so one value can be shared across threads and
/// called concurrently.
#[derive(Clone, Copy, Debug, Default)]
pub struct Verifier<P = Reference> {
    primitives: P,
}

impl Verifier<Reference> {
    pub fn new() -> Self {
        Self {
            primitives: Reference,
        }
    }
}

impl<P: Primitives> Verifier<P> {
    /// Verifier over a custom primitive backend
    pub fn with_primitives(primitives: P) -> Self {
        Self { primitives }
    }

    pub fn primitives(&self) -> &P {
        &self.primitives
    }

    /// Validate a packed proof and return its quality.
    pub fn validate(
        &self,
        seed: &[u8; SEED_SIZE],
        k: u8,
        challenge: &[u8; CHALLENGE_SIZE],
        proof_bytes: &[u8],
    ) -> Result<Quality> {
        let proof = Proof::from_bytes(k, proof_bytes).map_err(|e| {
            debug!(k, len = proof_bytes.len(), "rejected malformed proof: {}", e);
            e
        })?;
        self.validate_proof(seed, challenge, &proof)
    }

    /// Validate a proof given as leaf values in proof ordering.
    pub fn validate_leaves(
        &self,
        seed: &[u8; SEED_SIZE],
        k: u8,
        challenge: &[u8; CHALLENGE_SIZE],
        leaves: &[u64],
    ) -> Result<Quality> {
        let proof = Proof::from_leaves(k, leaves).map_err(|e| {
            debug!(k, leaves = leaves.len(), "rejected malformed proof: {}", e);
            e
        })?;
        self.validate_proof(seed, challenge, &proof)
    }

    /// Validate a decoded proof.
    pub fn validate_proof(
        &self,
        seed: &[u8; SEED_SIZE],
        challenge: &[u8; CHALLENGE_SIZE],
        proof: &Proof,
    ) -> Result<Quality> {
        let root = self.derive_root(seed, proof)?;

        // top k bits of the root y must equal the top k bits of the challenge
        let k = proof.k();
        let root_prefix = root.y >> EXTRA_BITS;
        let challenge_prefix = challenge_prefix(challenge, k);
        if root_prefix != challenge_prefix {
            debug!(k, root_prefix, challenge_prefix, "rejected proof: root does not match challenge");
            return Err(ValidationError::ChallengeMismatch);
        }

        quality_string_with(&self.primitives, proof, quality_index(challenge), challenge)
    }

    /// Run F1 and the six matching rounds, returning the table-7 entry.
    pub fn derive_root(&self, seed: &[u8; SEED_SIZE], proof: &Proof) -> Result<LevelEntry> {
        let k = proof.k();
        let mut f1 = F1Calculator::new(&self.primitives, k, seed).map_err(|e| {
            debug!(k, "rejected proof: keystream unavailable: {}", e);
            e
        })?;

        let mut entries: Vec<LevelEntry> = proof
            .leaves()
            .iter()
            .map(|&x| {
                let (y, metadata) = f1.calculate_bucket(x);
                LevelEntry { y, metadata }
            })
            .collect();

        for table in 2..=NUM_TABLES {
            entries = reduce_level(&self.primitives, k, table, &entries).map_err(|e| {
                if let ValidationError::InvalidMatch { table, index } = &e {
                    debug!(k, table, index, "rejected proof: sibling pair does not match");
                }
                e
            })?;
            trace!(k, table, entries = entries.len(), "table reduced");
        }

        debug_assert_eq!(entries.len(), 1);
        Ok(entries[0])
    }

    /// Validate many independent proofs in parallel.
    #[cfg(feature = "parallel")]
    pub fn validate_batch(&self, requests: &[ProofRequest]) -> Vec<Result<Quality>> {
        use rayon::prelude::*;

        requests
            .par_iter()
            .map(|req| self.validate(&req.seed, req.k, &req.challenge, &req.proof))
            .collect()
    }

    /// Validate many independent proofs one after another.
    pub fn validate_sequential(&self, requests: &[ProofRequest]) -> Vec<Result<Quality>> {
        requests
            .iter()
            .map(|req| self.validate(&req.seed, req.k, &req.challenge, &req.proof))
            .collect()
    }
}

/// Owned inputs of one validation call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofRequest {
    pub seed: [u8; SEED_SIZE],
    pub k: u8,
    pub challenge: [u8; CHALLENGE_SIZE],
    pub proof: Vec<u8>,
}

/// Top k bits of the challenge
fn challenge_prefix(challenge: &[u8; CHALLENGE_SIZE], k: u8) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&challenge[..8]);
    u64::from_be_bytes(head) >> (64 - u32::from(k))
}

/// Validate a packed proof on the reference primitives.
pub fn validate_proof(
    seed: &[u8; SEED_SIZE],
    k: u8,
    challenge: &[u8; CHALLENGE_SIZE],
    proof_bytes: &[u8],
) -> Result<Quality> {
    Verifier::new().validate(seed, k, challenge, proof_bytes)
}
