//! Validation error types
//!
//! Every rejection is a value, never a panic. The C status code of each
//! variant is fixed and shared with `pospace-ffi`.

#[cfg(not(feature = "std"))]
use alloc::string::String;

/// Why a proof was rejected before any hashing
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[cfg_attr(feature = "std", error("k = {k} is outside the supported range"))]
    KOutOfRange { k: u8 },

    #[cfg_attr(feature = "std", error("proof is {actual} bytes, expected {expected}"))]
    ProofLength { expected: usize, actual: usize },

    #[cfg_attr(feature = "std", error("proof has {actual} leaves, expected {expected}"))]
    LeafCount { expected: usize, actual: usize },

    #[cfg_attr(feature = "std", error("leaf {index} = {value} does not fit in {k} bits"))]
    LeafOutOfRange { index: usize, value: u64, k: u8 },

    #[cfg_attr(feature = "std", error("quality index {index} is out of range"))]
    QualityIndex { index: u16 },
}

/// Error types for proof validation
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed proof: {0}")]
    MalformedProof(MalformedReason),

    /// Sibling pair `index` failed the matching predicate while building
    /// table `table` (2..=7)
    #[error("invalid match at table {table}, pair {index}")]
    InvalidMatch { table: u8, index: usize },

    #[error("root does not match the challenge")]
    ChallengeMismatch,

    #[error("primitive error: {0}")]
    PrimitiveError(String),
}

/// Error types for proof validation (no_std version)
#[cfg(not(feature = "std"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MalformedProof(MalformedReason),
    InvalidMatch { table: u8, index: usize },
    ChallengeMismatch,
    PrimitiveError(String),
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::KOutOfRange { k } => write!(f, "k = {} is outside the supported range", k),
            Self::ProofLength { expected, actual } => {
                write!(f, "proof is {} bytes, expected {}", actual, expected)
            }
            Self::LeafCount { expected, actual } => {
                write!(f, "proof has {} leaves, expected {}", actual, expected)
            }
            Self::LeafOutOfRange { index, value, k } => {
                write!(f, "leaf {} = {} does not fit in {} bits", index, value, k)
            }
            Self::QualityIndex { index } => write!(f, "quality index {} is out of range", index),
        }
    }
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MalformedProof(reason) => write!(f, "malformed proof: {}", reason),
            Self::InvalidMatch { table, index } => {
                write!(f, "invalid match at table {}, pair {}", table, index)
            }
            Self::ChallengeMismatch => write!(f, "root does not match the challenge"),
            Self::PrimitiveError(msg) => write!(f, "primitive error: {}", msg),
        }
    }
}

impl From<MalformedReason> for ValidationError {
    fn from(reason: MalformedReason) -> Self {
        ValidationError::MalformedProof(reason)
    }
}

/// Status code of a successful validation at the C boundary
pub const STATUS_OK: i32 = 0;

impl ValidationError {
    /// Stable status code used at the C boundary
    pub fn status_code(&self) -> i32 {
        match self {
            Self::MalformedProof(_) => 1,
            Self::InvalidMatch { .. } => 2,
            Self::ChallengeMismatch => 3,
            Self::PrimitiveError(_) => 4,
        }
    }
}

pub type Result<T> = core::result::Result<T, ValidationError>;

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_diagnostics() {
        let err = ValidationError::InvalidMatch { table: 4, index: 3 };
        assert_eq!(err.to_string(), "invalid match at table 4, pair 3");

        let err: ValidationError = MalformedReason::ProofLength {
            expected: 160,
            actual: 0,
        }
        .into();
        assert_eq!(err.to_string(), "malformed proof: proof is 0 bytes, expected 160");
    }

    #[test]
    fn test_status_codes_are_distinct() {
        let codes = [
            ValidationError::MalformedProof(MalformedReason::KOutOfRange { k: 0 }).status_code(),
            ValidationError::InvalidMatch { table: 2, index: 0 }.status_code(),
            ValidationError::ChallengeMismatch.status_code(),
            ValidationError::PrimitiveError("bad key".into()).status_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, STATUS_OK);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
