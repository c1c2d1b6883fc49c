//! C ABI exports for the proof of space verifier
//!
//! Everything here is a thin, stateless shim over [`pospace::Verifier`]:
//! there is no handle to create or free, and every call may run on any
//! thread concurrently.
//!
//! ## Buffers
//! - `seed`, `challenge`: 32 bytes each
//! - `proof`: `proof_len` bytes, the packed 64 k-bit leaves (`8 * k` bytes)
//! - `quality_buf`: 32 writable bytes, written only on success
//!
//! ## Status codes (`pospace_validate`)
//! | code | meaning |
//! |------|---------|
//! | 0    | valid, quality written |
//! | 1    | malformed proof (bad k, length or leaf) |
//! | 2    | a sibling pair failed to match |
//! | 3    | root does not match the challenge |
//! | 4    | primitive failure |
//! | -1   | null pointer argument |

use core::ffi::c_char;
use std::slice;

use pospace::{
    proof_size, ValidationError, Verifier, CHALLENGE_SIZE, MAX_K, MIN_K, QUALITY_SIZE, SEED_SIZE,
    STATUS_OK,
};
use tracing::warn;

/// Status returned for a null pointer argument
pub const STATUS_NULL_POINTER: i32 = -1;

/// Borrow the caller's input buffers, or None if a required pointer is null
unsafe fn borrow_inputs<'a>(
    seed: *const u8,
    challenge: *const u8,
    proof: *const u8,
    proof_len: u16,
) -> Option<(&'a [u8; SEED_SIZE], &'a [u8; CHALLENGE_SIZE], &'a [u8])> {
    if seed.is_null() || challenge.is_null() || (proof.is_null() && proof_len != 0) {
        warn!("null pointer passed to proof validation");
        return None;
    }
    let seed = &*(seed as *const [u8; SEED_SIZE]);
    let challenge = &*(challenge as *const [u8; CHALLENGE_SIZE]);
    let proof = if proof_len == 0 {
        &[][..]
    } else {
        slice::from_raw_parts(proof, proof_len as usize)
    };
    Some((seed, challenge, proof))
}

unsafe fn run_validation(
    seed: *const u8,
    k: u8,
    challenge: *const u8,
    proof: *const u8,
    proof_len: u16,
    quality_buf: *mut u8,
) -> i32 {
    if quality_buf.is_null() {
        warn!("null quality buffer passed to proof validation");
        return STATUS_NULL_POINTER;
    }
    let Some((seed, challenge, proof)) = borrow_inputs(seed, challenge, proof, proof_len) else {
        return STATUS_NULL_POINTER;
    };

    match Verifier::new().validate(seed, k, challenge, proof) {
        Ok(quality) => {
            let out = slice::from_raw_parts_mut(quality_buf, QUALITY_SIZE);
            out.copy_from_slice(quality.as_bytes());
            STATUS_OK
        }
        Err(e) => e.status_code(),
    }
}

/// Validate a proof and write its 32-byte quality string to `quality_buf`.
///
/// Returns false for any invalid proof or bad argument; `quality_buf` is
/// left untouched in that case.
///
/// # Safety
/// `seed` and `challenge` must point to 32 readable bytes, `proof` to
/// `proof_len` readable bytes and `quality_buf` to 32 writable bytes.
#[no_mangle]
pub unsafe extern "C" fn validate_proof(
    seed: *const u8,
    k: u8,
    challenge: *const u8,
    proof: *const u8,
    proof_len: u16,
    quality_buf: *mut u8,
) -> bool {
    run_validation(seed, k, challenge, proof, proof_len, quality_buf) == STATUS_OK
}

/// Same as [`validate_proof`] but reports why a proof was rejected.
///
/// # Safety
/// Same requirements as [`validate_proof`].
#[no_mangle]
pub unsafe extern "C" fn pospace_validate(
    seed: *const u8,
    k: u8,
    challenge: *const u8,
    proof: *const u8,
    proof_len: u16,
    quality_buf: *mut u8,
) -> i32 {
    run_validation(seed, k, challenge, proof, proof_len, quality_buf)
}

/// Static, NUL-terminated description of a status code
#[no_mangle]
pub extern "C" fn pospace_status_str(code: i32) -> *const c_char {
    let msg: &'static [u8] = match code {
        STATUS_OK => b"ok\0",
        1 => b"malformed proof\0",
        2 => b"invalid match\0",
        3 => b"challenge mismatch\0",
        4 => b"primitive error\0",
        STATUS_NULL_POINTER => b"null pointer\0",
        _ => b"unknown status\0",
    };
    msg.as_ptr() as *const c_char
}

/// Expected proof length in bytes for `k`, or 0 if `k` is unsupported
#[no_mangle]
pub extern "C" fn pospace_proof_size(k: u8) -> u32 {
    if (MIN_K..=MAX_K).contains(&k) {
        proof_size(k) as u32
    } else {
        0
    }
}

/// Status code of an error, for callers mixing the Rust and C APIs
pub fn status_of(result: &Result<pospace::Quality, ValidationError>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(e) => e.status_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    struct Vector {
        seed: Vec<u8>,
        k: u8,
        challenge: Vec<u8>,
        proof: Vec<u8>,
        quality: Vec<u8>,
    }

    fn vectors() -> Vec<Vector> {
        include_str!("../../pospace/tests/fixtures/proofs.txt")
            .lines()
            .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
            .map(|line| {
                let fields: Vec<&str> = line.split(',').map(str::trim).collect();
                Vector {
                    seed: hex::decode(fields[0]).unwrap(),
                    k: fields[1].parse().unwrap(),
                    challenge: hex::decode(fields[2]).unwrap(),
                    proof: hex::decode(fields[3]).unwrap(),
                    quality: hex::decode(fields[4]).unwrap(),
                }
            })
            .collect()
    }

    fn call(v: &Vector, proof: &[u8], quality: &mut [u8; 32]) -> i32 {
        unsafe {
            pospace_validate(
                v.seed.as_ptr(),
                v.k,
                v.challenge.as_ptr(),
                proof.as_ptr(),
                proof.len() as u16,
                quality.as_mut_ptr(),
            )
        }
    }

    #[test]
    fn test_valid_vectors() {
        for v in vectors() {
            let mut quality = [0u8; 32];
            let ok = unsafe {
                validate_proof(
                    v.seed.as_ptr(),
                    v.k,
                    v.challenge.as_ptr(),
                    v.proof.as_ptr(),
                    v.proof.len() as u16,
                    quality.as_mut_ptr(),
                )
            };
            assert!(ok);
            assert_eq!(quality.to_vec(), v.quality);
        }
    }

    #[test]
    fn test_failure_leaves_buffer_untouched() {
        let v = &vectors()[0];
        let mut proof = v.proof.clone();
        proof[0] = proof[0].wrapping_add(1);

        let mut quality = [0u8; 32];
        let status = call(v, &proof, &mut quality);
        assert_ne!(status, STATUS_OK);
        assert_eq!(quality, [0u8; 32]);

        let mut quality = [0xeeu8; 32];
        let status = call(v, &v.proof[..v.proof.len() - 1], &mut quality);
        assert_eq!(status, 1);
        assert_eq!(quality, [0xeeu8; 32]);
    }

    #[test]
    fn test_challenge_mismatch_status() {
        let mut v = vectors().remove(0);
        v.challenge[0] ^= 0x80;
        let mut quality = [0u8; 32];
        assert_eq!(call(&v, &v.proof.clone(), &mut quality), 3);
    }

    #[test]
    fn test_null_pointers() {
        let mut quality = [0u8; 32];
        let status = unsafe {
            pospace_validate(
                core::ptr::null(),
                20,
                [0u8; 32].as_ptr(),
                core::ptr::null(),
                0,
                quality.as_mut_ptr(),
            )
        };
        assert_eq!(status, STATUS_NULL_POINTER);

        let ok = unsafe {
            validate_proof(
                [0u8; 32].as_ptr(),
                20,
                [0u8; 32].as_ptr(),
                [0u8; 160].as_ptr(),
                160,
                core::ptr::null_mut(),
            )
        };
        assert!(!ok);
    }

    #[test]
    fn test_empty_proof_is_malformed() {
        let mut quality = [0u8; 32];
        let status = unsafe {
            pospace_validate(
                [1u8; 32].as_ptr(),
                20,
                [2u8; 32].as_ptr(),
                core::ptr::null(),
                0,
                quality.as_mut_ptr(),
            )
        };
        assert_eq!(status, 1);
    }

    #[test]
    fn test_status_strings() {
        for (code, text) in [
            (0, "ok"),
            (1, "malformed proof"),
            (2, "invalid match"),
            (3, "challenge mismatch"),
            (4, "primitive error"),
            (-1, "null pointer"),
            (99, "unknown status"),
        ] {
            let s = unsafe { CStr::from_ptr(pospace_status_str(code)) };
            assert_eq!(s.to_str().unwrap(), text);
        }
    }

    #[test]
    fn test_proof_size_export() {
        assert_eq!(pospace_proof_size(20), 160);
        assert_eq!(pospace_proof_size(0), 0);
        assert_eq!(pospace_proof_size(51), 0);
    }

    #[test]
    fn test_status_of_matches_export() {
        let v = &vectors()[0];
        let seed: [u8; 32] = v.seed.clone().try_into().unwrap();
        let challenge: [u8; 32] = v.challenge.clone().try_into().unwrap();
        let result = Verifier::new().validate(&seed, v.k, &challenge, &v.proof);
        let mut quality = [0u8; 32];
        assert_eq!(status_of(&result), call(v, &v.proof, &mut quality));
    }
}
