//! Matching engine for tables 2..7
//!
//! Two entries match iff, for some m in [0, 64):
//!
//! ```text
//! y_l / BC + 1 = y_r / BC
//! (y_r % BC) / C - (y_l % BC) / C = m                       (mod B)
//! (y_r % BC) % C - (y_l % BC) % C = (2m + (y_l / BC) % 2)^2 (mod C)
//! ```
//!
//! Matching entries are combined with BLAKE3 into the next table's y and
//! metadata.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::bits::BitString;
use crate::constants::{EXTRA_BITS, EXTRA_BITS_POW, PARAM_B, PARAM_BC, PARAM_C, VECTOR_LENS};
use crate::error::{Result, ValidationError};
use crate::primitives::Primitives;

/// One table entry: its y and the metadata needed by the next table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelEntry {
    pub y: u64,
    pub metadata: BitString,
}

/// BC bucket of a y value
#[inline]
pub fn bucket_id(y: u64) -> u64 {
    y / PARAM_BC
}

/// Position inside the right bucket that a left entry at `y_l % BC`
/// reaches with residue `m`
#[inline]
pub fn match_target(parity: u64, y_l_rem: u64, m: u64) -> u64 {
    let ind_j = y_l_rem / PARAM_C;
    let offset = 2 * m + parity;
    ((ind_j + m) % PARAM_B) * PARAM_C + ((offset * offset + y_l_rem) % PARAM_C)
}

/// Matching predicate between a left and a right entry
pub fn matches(y_l: u64, y_r: u64) -> bool {
    let bucket_l = bucket_id(y_l);
    if bucket_id(y_r) != bucket_l + 1 {
        return false;
    }
    let parity = bucket_l % 2;
    let y_l_rem = y_l % PARAM_BC;
    let y_r_rem = y_r % PARAM_BC;
    (0..u64::from(EXTRA_BITS_POW)).any(|m| match_target(parity, y_l_rem, m) == y_r_rem)
}

/// All matching `(left, right)` index pairs between two adjacent buckets
pub fn find_matches(bucket_l: &[u64], bucket_r: &[u64]) -> Vec<(usize, usize)> {
    let mut matches_found = Vec::new();
    for (pos_l, &y_l) in bucket_l.iter().enumerate() {
        for (pos_r, &y_r) in bucket_r.iter().enumerate() {
            if matches(y_l, y_r) {
                matches_found.push((pos_l, pos_r));
            }
        }
    }
    matches_found
}

/// Evaluates f_table for tables 2..=7
pub struct FxCalculator<'a, P> {
    primitives: &'a P,
    k: u8,
    table: u8,
}

impl<'a, P: Primitives> FxCalculator<'a, P> {
    pub fn new(primitives: &'a P, k: u8, table: u8) -> Self {
        debug_assert!((2..=7).contains(&table));
        Self {
            primitives,
            k,
            table,
        }
    }

    /// f_table(y_l, meta_l, meta_r): the new y and the metadata the next
    /// table needs
    pub fn calculate_fc(&self, y_l: u64, meta_l: &BitString, meta_r: &BitString) -> LevelEntry {
        let k = self.k as usize;
        let y_bits = k + EXTRA_BITS as usize;

        let mut input = BitString::from_value(y_l, y_bits);
        input.append(meta_l);
        input.append(meta_r);

        let digest = self.primitives.table_hash(input.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let y = u64::from_be_bytes(head) >> (64 - y_bits);

        let metadata = match self.table {
            2 | 3 => {
                let mut joined = *meta_l;
                joined.append(meta_r);
                joined
            }
            4..=6 => {
                let width = k * VECTOR_LENS[self.table as usize + 1] as usize;
                BitString::from_bytes(&digest, y_bits, width)
            }
            _ => BitString::new(),
        };

        LevelEntry { y, metadata }
    }
}

/// Reduce one level: combine entries `(2j, 2j + 1)` into table `table`.
/// The first pair failing the predicate rejects the whole proof.
pub fn reduce_level<P: Primitives>(
    primitives: &P,
    k: u8,
    table: u8,
    entries: &[LevelEntry],
) -> Result<Vec<LevelEntry>> {
    let fx = FxCalculator::new(primitives, k, table);
    entries
        .chunks_exact(2)
        .enumerate()
        .map(|(index, pair)| {
            let (left, right) = (&pair[0], &pair[1]);
            if !matches(left.y, right.y) {
                return Err(ValidationError::InvalidMatch { table, index });
            }
            Ok(fx.calculate_fc(left.y, &left.metadata, &right.metadata))
        })
        .collect()
}
