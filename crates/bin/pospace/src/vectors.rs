//! Proof list parsing
//!
//! One proof per line: `seed, k, challenge, proof[, quality]`, all byte
//! fields hex. Blank lines and lines starting with `#` are skipped.

use anyhow::{bail, Context, Result};
use pospace::{ProofRequest, QUALITY_SIZE};

/// A parsed line with its 1-based line number
#[derive(Clone, Debug)]
pub struct Entry {
    pub line: usize,
    pub request: ProofRequest,
    pub expected: Option<[u8; QUALITY_SIZE]>,
}

/// Decode a fixed-size hex argument
pub fn parse_hex_array<const N: usize>(name: &str, s: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(s.trim().trim_start_matches("0x"))
        .with_context(|| format!("{} is not valid hex", name))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("{} must be {} bytes, got {}", name, N, len))
}

/// Decode a variable-length hex argument
pub fn parse_hex(name: &str, s: &str) -> Result<Vec<u8>> {
    hex::decode(s.trim().trim_start_matches("0x"))
        .with_context(|| format!("{} is not valid hex", name))
}

fn parse_line(line: usize, text: &str) -> Result<Entry> {
    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    if fields.len() != 4 && fields.len() != 5 {
        bail!("expected 4 or 5 comma separated fields, got {}", fields.len());
    }

    let seed = parse_hex_array("seed", fields[0])?;
    let k = fields[1]
        .parse::<u8>()
        .with_context(|| format!("k '{}' is not a number", fields[1]))?;
    let challenge = parse_hex_array("challenge", fields[2])?;
    let proof = parse_hex("proof", fields[3])?;
    let expected = match fields.get(4) {
        Some(q) => Some(parse_hex_array("quality", q)?),
        None => None,
    };

    Ok(Entry {
        line,
        request: ProofRequest {
            seed,
            k,
            challenge,
            proof,
        },
        expected,
    })
}

/// Parse a whole proof list, failing on the first bad line
pub fn parse_entries(text: &str) -> Result<Vec<Entry>> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .map(|(i, l)| parse_line(i + 1, l).with_context(|| format!("line {}", i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "0101010101010101010101010101010101010101010101010101010101010101";
    const CHALLENGE: &str = "0202020202020202020202020202020202020202020202020202020202020202";

    #[test]
    fn test_parses_with_and_without_quality() {
        let text = format!(
            "# header\n\n{s}, 1, {c}, {p}\n{s}, 1, {c}, {p}, {q}\n",
            s = SEED,
            c = CHALLENGE,
            p = "ff".repeat(8),
            q = "03".repeat(32),
        );
        let entries = parse_entries(&text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].line, 3);
        assert_eq!(entries[0].request.k, 1);
        assert_eq!(entries[0].request.seed, [1u8; 32]);
        assert_eq!(entries[0].request.proof, vec![0xff; 8]);
        assert!(entries[0].expected.is_none());
        assert_eq!(entries[1].expected, Some([3u8; 32]));
    }

    #[test]
    fn test_reports_bad_line_number() {
        let text = format!("{s}, 1, {c}, ff\n{s}, x, {c}, ff\n", s = SEED, c = CHALLENGE);
        let err = parse_entries(&text).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_rejects_short_seed() {
        let err = parse_hex_array::<32>("seed", "abcd").unwrap_err();
        assert!(err.to_string().contains("32 bytes"));
        assert!(parse_hex("proof", "zz").is_err());
        assert_eq!(parse_hex("proof", "0xabcd").unwrap(), vec![0xab, 0xcd]);
    }
}
