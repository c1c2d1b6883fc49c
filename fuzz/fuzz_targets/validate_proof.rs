//! Fuzz harness for proof validation.
//!
//! Arbitrary seed, k, challenge and proof bytes must never panic, the C
//! entry point must leave the quality buffer untouched on rejection, and
//! both entry points must agree.

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pospace::Verifier;

#[derive(Arbitrary, Debug)]
struct Input {
    seed: [u8; 32],
    k: u8,
    challenge: [u8; 32],
    proof: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let Ok(proof_len) = u16::try_from(input.proof.len()) else {
        return;
    };

    let mut quality = [0u8; 32];
    let status = unsafe {
        pospace_ffi::pospace_validate(
            input.seed.as_ptr(),
            input.k,
            input.challenge.as_ptr(),
            input.proof.as_ptr(),
            proof_len,
            quality.as_mut_ptr(),
        )
    };

    let result = Verifier::new().validate(&input.seed, input.k, &input.challenge, &input.proof);
    match result {
        Ok(q) => {
            assert_eq!(status, 0);
            assert_eq!(&quality, q.as_bytes());
        }
        Err(e) => {
            assert_eq!(status, e.status_code());
            assert_eq!(quality, [0u8; 32]);
        }
    }
});
