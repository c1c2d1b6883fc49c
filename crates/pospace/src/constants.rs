//! Proof of space construction constants
//!
//! These fix the shape of a proof and the matching rule between tables.
//! Changing any of them changes which proofs validate.

/// Number of tables in a plot. A proof holds one leaf per table-1 entry
/// under a single table-7 entry, so `2^(NUM_TABLES - 1)` leaves.
pub const NUM_TABLES: u8 = 7;

/// Leaves in a proof (x values)
pub const PROOF_LEAVES: usize = 1 << (NUM_TABLES - 1);

/// Smallest accepted space parameter
pub const MIN_K: u8 = 1;

/// Largest accepted space parameter
pub const MAX_K: u8 = 50;

/// Plot seed length (bytes)
pub const SEED_SIZE: usize = 32;

/// Challenge length (bytes)
pub const CHALLENGE_SIZE: usize = 32;

/// Quality digest length (bytes)
pub const QUALITY_SIZE: usize = 32;

/// ChaCha8 block size in bits. F1 outputs are packed back to back in the
/// keystream, so one block serves several consecutive x values.
pub const F1_BLOCK_SIZE_BITS: u64 = 512;

/// Extra output bits of the f functions: they map k bits to k + EXTRA_BITS
/// bits, which lowers the collision rate between matches.
pub const EXTRA_BITS: u8 = 6;

/// Number of residues tried per left entry
pub const EXTRA_BITS_POW: u16 = 1 << EXTRA_BITS;

/// B group size of a BC bucket
pub const PARAM_B: u64 = 119;

/// C group size of a BC bucket
pub const PARAM_C: u64 = 127;

/// Bucket width. Two entries can only match from adjacent buckets.
pub const PARAM_BC: u64 = PARAM_B * PARAM_C;

/// Metadata width per table, in multiples of k. Entry `t` is the width
/// of the metadata carried by table `t` entries (table 1 carries `x`).
pub const VECTOR_LENS: [u8; 8] = [0, 0, 1, 2, 4, 4, 3, 2];

/// Table index mixed into the F1 key
pub const F1_KEY_TABLE_INDEX: u8 = 1;

/// Low bits of the challenge that select the quality leaf pair
pub const QUALITY_INDEX_BITS: u8 = 5;
