//! Proof codec and orderings
//!
//! Wire format: the 64 leaves as k-bit big-endian integers, packed MSB
//! first with no padding between them, so a proof is exactly `8 * k`
//! bytes.
//!
//! Leaves arrive in proof ordering: each sibling pair is (left, right) as
//! the matching engine sees them. Plot ordering instead sorts every pair
//! of sibling groups so the smaller group comes first, which is what the
//! quality string is read from.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::cmp::Ordering;

use crate::bits::{read_bits, write_bits};
use crate::constants::{MAX_K, MIN_K, NUM_TABLES, PROOF_LEAVES};
use crate::error::{MalformedReason, Result};

/// Reject k outside [MIN_K, MAX_K]
pub fn check_k(k: u8) -> Result<()> {
    if !(MIN_K..=MAX_K).contains(&k) {
        return Err(MalformedReason::KOutOfRange { k }.into());
    }
    Ok(())
}

/// Wire size of a proof for `k`, in bytes
pub const fn proof_size(k: u8) -> usize {
    k as usize * PROOF_LEAVES / 8
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    k: u8,
    leaves: [u64; PROOF_LEAVES],
}

impl Proof {
    /// Decode a packed proof
    pub fn from_bytes(k: u8, bytes: &[u8]) -> Result<Self> {
        check_k(k)?;
        let expected = proof_size(k);
        if bytes.len() != expected {
            return Err(MalformedReason::ProofLength {
                expected,
                actual: bytes.len(),
            }
            .into());
        }

        let width = k as usize;
        let mut leaves = [0u64; PROOF_LEAVES];
        for (i, leaf) in leaves.iter_mut().enumerate() {
            *leaf = read_bits(bytes, i * width, width);
        }
        Ok(Self { k, leaves })
    }

    /// Build a proof from leaf values, checking count and range
    pub fn from_leaves(k: u8, leaves: &[u64]) -> Result<Self> {
        check_k(k)?;
        if leaves.len() != PROOF_LEAVES {
            return Err(MalformedReason::LeafCount {
                expected: PROOF_LEAVES,
                actual: leaves.len(),
            }
            .into());
        }
        if let Some((index, &value)) = leaves.iter().enumerate().find(|(_, x)| **x >> k != 0) {
            return Err(MalformedReason::LeafOutOfRange { index, value, k }.into());
        }

        let mut packed = [0u64; PROOF_LEAVES];
        packed.copy_from_slice(leaves);
        Ok(Self { k, leaves: packed })
    }

    pub fn k(&self) -> u8 {
        self.k
    }

    pub fn leaves(&self) -> &[u64; PROOF_LEAVES] {
        &self.leaves
    }

    /// Encode to the packed wire format
    pub fn to_bytes(&self) -> Vec<u8> {
        let width = self.k as usize;
        let mut out = vec![0u8; proof_size(self.k)];
        for (i, &leaf) in self.leaves.iter().enumerate() {
            write_bits(&mut out, i * width, leaf, width);
        }
        out
    }

    /// Reorder from proof ordering to plot ordering.
    ///
    /// For tables 1..6, sibling groups of `2^(table - 1)` leaves are
    /// swapped when the left group compares greater than the right one.
    pub fn to_plot_ordering(&self) -> Proof {
        let mut leaves = self.leaves;
        for table in 1..NUM_TABLES {
            let size = 1usize << (table - 1);
            for pair in leaves.chunks_exact_mut(2 * size) {
                let (left, right) = pair.split_at_mut(size);
                if compare_groups(left, right) == Ordering::Greater {
                    left.swap_with_slice(right);
                }
            }
        }
        Proof { k: self.k, leaves }
    }
}

/// Compare two equally sized leaf groups: the last leaves decide first,
/// ties fall back to earlier ones
fn compare_groups(left: &[u64], right: &[u64]) -> Ordering {
    debug_assert_eq!(left.len(), right.len());
    left.iter()
        .rev()
        .zip(right.iter().rev())
        .map(|(l, r)| l.cmp(r))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn sequential(k: u8) -> Proof {
        let leaves: Vec<u64> = (0..64u64).map(|i| (i * 7919) % (1 << k)).collect();
        Proof::from_leaves(k, &leaves).unwrap()
    }

    #[test]
    fn test_wire_size() {
        assert_eq!(proof_size(20), 160);
        assert_eq!(proof_size(32), 256);
        assert_eq!(proof_size(1), 8);
    }

    #[test]
    fn test_packing_is_msb_first() {
        let mut leaves = vec![0u64; 64];
        leaves[0] = 1;
        leaves[63] = 0xff;
        let proof = Proof::from_leaves(8, &leaves).unwrap();
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), 64);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[63], 0xff);

        // k = 12: leaf 0 occupies the first byte and a half
        let mut leaves = vec![0u64; 64];
        leaves[0] = 0xabc;
        leaves[1] = 0xdef;
        let bytes = Proof::from_leaves(12, &leaves).unwrap().to_bytes();
        assert_eq!(&bytes[..3], &[0xab, 0xcd, 0xef]);
    }

    #[test]
    fn test_decode_matches_encode() {
        for k in [1u8, 7, 20, 33, 50] {
            let proof = sequential(k);
            let decoded = Proof::from_bytes(k, &proof.to_bytes()).unwrap();
            assert_eq!(decoded, proof);
        }
    }

    #[test]
    fn test_rejects_bad_k() {
        for k in [0u8, 51, 255] {
            let err = Proof::from_bytes(k, &[]).unwrap_err();
            assert_eq!(
                err,
                ValidationError::MalformedProof(MalformedReason::KOutOfRange { k })
            );
        }
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = Proof::from_bytes(20, &[0u8; 159]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedProof(MalformedReason::ProofLength {
                expected: 160,
                actual: 159
            })
        );
        assert!(Proof::from_bytes(20, &[]).is_err());
    }

    #[test]
    fn test_rejects_leaf_count_and_range() {
        let err = Proof::from_leaves(20, &[0u64; 63]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MalformedProof(MalformedReason::LeafCount { actual: 63, .. })
        ));

        let mut leaves = vec![0u64; 64];
        leaves[17] = 1 << 20;
        let err = Proof::from_leaves(20, &leaves).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedProof(MalformedReason::LeafOutOfRange {
                index: 17,
                value: 1 << 20,
                k: 20
            })
        );
    }

    #[test]
    fn test_compare_groups_uses_last_leaf_first() {
        assert_eq!(compare_groups(&[9, 1], &[0, 2]), Ordering::Less);
        assert_eq!(compare_groups(&[0, 3], &[9, 2]), Ordering::Greater);
        assert_eq!(compare_groups(&[5, 2], &[4, 2]), Ordering::Greater);
        assert_eq!(compare_groups(&[4, 2], &[4, 2]), Ordering::Equal);
    }

    #[test]
    fn test_plot_ordering_sorts_first_pairs() {
        let proof = sequential(20);
        let plot = proof.to_plot_ordering();
        for pair in plot.leaves().chunks_exact(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_plot_ordering_is_permutation_and_idempotent() {
        let proof = sequential(24);
        let plot = proof.to_plot_ordering();

        let mut a = proof.leaves().to_vec();
        let mut b = plot.leaves().to_vec();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);

        assert_eq!(plot.to_plot_ordering(), plot);
    }

    #[test]
    fn test_plot_ordering_swaps_groups() {
        // second half has the smaller tail leaf, so the halves swap at table 6
        let mut leaves: Vec<u64> = (0..64u64).collect();
        leaves[31] = 1000;
        let plot = Proof::from_leaves(12, &leaves).unwrap().to_plot_ordering();
        assert_eq!(plot.leaves()[0], 32);
        assert_eq!(plot.leaves()[63], 1000);
    }
}
