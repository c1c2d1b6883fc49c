//! Proof of space verifier
//!
//! Checks that a 64-leaf proof of space corresponds to a genuine plot for
//! a given plot seed, space parameter `k` and challenge, without touching
//! the plot. A valid proof yields a 32-byte quality string that callers
//! compare against their difficulty target.
//!
//! # Construction
//!
//! - **F1** maps each leaf `x` to `y = ChaCha8(seed)[x*k .. x*k + k] || top6(x)`
//! - **Tables 2..7** pair sibling entries. Siblings must satisfy the BC
//!   bucket matching rule; a matching pair is combined with BLAKE3 into
//!   the next table's `y` and metadata
//! - **Challenge binding**: the top `k` bits of the table-7 `y` equal the
//!   top `k` bits of the challenge
//! - **Quality**: SHA-256 over the challenge and two leaves (in plot
//!   ordering) picked by the challenge's low 5 bits
//!
//! # Features
//!
//! - `std` (default): Enable standard library support
//! - `parallel` (default): Parallel batch validation with rayon
//!
//! # Example
//!
//! ```rust,ignore
//! use pospace::{validate_proof, ValidationError};
//!
//! match validate_proof(&seed, k, &challenge, &proof_bytes) {
//!     Ok(quality) => println!("quality {}", quality),
//!     Err(ValidationError::InvalidMatch { table, index }) => {
//!         println!("pair {} does not match at table {}", index, table)
//!     }
//!     Err(e) => println!("rejected: {}", e),
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod bits;
pub mod constants;
mod error;
pub mod f1;
pub mod matching;
pub mod primitives;
pub mod proof;
pub mod quality;
pub mod verifier;

pub use constants::{CHALLENGE_SIZE, MAX_K, MIN_K, PROOF_LEAVES, QUALITY_SIZE, SEED_SIZE};
pub use error::{MalformedReason, Result, ValidationError, STATUS_OK};
pub use primitives::{KeyedStream, Primitives, Reference};
pub use proof::{proof_size, Proof};
pub use quality::{quality_index, quality_string, quality_string_with, Quality};
pub use verifier::{validate_proof, ProofRequest, Verifier};
