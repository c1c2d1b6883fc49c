//! pospace CLI
//!
//! Validates proofs of space and prints their quality strings.
//!
//! ## Usage
//!
//! ```bash
//! # Validate one proof
//! pospace verify --seed <hex> --k 32 --challenge <hex> --proof <hex>
//!
//! # Validate a proof list in parallel (seed, k, challenge, proof[, quality])
//! pospace batch --file proofs.txt --output json
//!
//! # Quality string only, no matching
//! pospace quality --k 32 --challenge <hex> --proof <hex>
//! ```

mod vectors;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use pospace::{quality_index, quality_string, Proof, ProofRequest, Verifier};

use crate::vectors::{parse_entries, parse_hex, parse_hex_array};

#[derive(Parser)]
#[command(name = "pospace")]
#[command(about = "Proof of space verifier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (ignored when POSPACE_LOG is set)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single proof
    Verify {
        /// Plot seed (32 bytes hex)
        #[arg(long, env = "POSPACE_SEED")]
        seed: String,

        /// Space parameter
        #[arg(short, long)]
        k: u8,

        /// Challenge (32 bytes hex)
        #[arg(short, long)]
        challenge: String,

        /// Packed proof (8 * k bytes hex)
        #[arg(short, long)]
        proof: String,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Validate every proof in a file
    Batch {
        /// Proof list, one `seed, k, challenge, proof[, quality]` per line
        #[arg(short, long)]
        file: PathBuf,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Print the quality string of a proof without checking it
    Quality {
        /// Space parameter
        #[arg(short, long)]
        k: u8,

        /// Challenge (32 bytes hex)
        #[arg(short, long)]
        challenge: String,

        /// Packed proof (8 * k bytes hex)
        #[arg(short, long)]
        proof: String,
    },
}

/// Outcome of one proof
#[derive(Debug, Serialize)]
struct ProofReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    k: u8,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// exit status code shared with the C API
    status: i32,
}

#[derive(Debug, Serialize)]
struct BatchReport {
    total: usize,
    valid: usize,
    failed: usize,
    proofs: Vec<ProofReport>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Verify {
            seed,
            k,
            challenge,
            proof,
            output,
        } => run_verify(&seed, k, &challenge, &proof, &output),
        Commands::Batch { file, output } => run_batch(&file, &output),
        Commands::Quality {
            k,
            challenge,
            proof,
        } => run_quality(k, &challenge, &proof),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("POSPACE_LOG")
                .unwrap_or_else(|_| format!("pospace={}", level).into()),
        )
        .init();
}

fn check_format(output: &str) -> Result<()> {
    match output {
        "json" | "text" => Ok(()),
        other => bail!("unknown output format '{}', expected json or text", other),
    }
}

fn report_for(
    line: Option<usize>,
    request: &ProofRequest,
    result: pospace::Result<pospace::Quality>,
    expected: Option<[u8; 32]>,
) -> ProofReport {
    match result {
        Ok(quality) => {
            let mismatch = expected.filter(|q| q != quality.as_bytes());
            ProofReport {
                line,
                k: request.k,
                valid: mismatch.is_none(),
                quality: Some(quality.to_string()),
                error: mismatch.map(|q| format!("quality differs from expected {}", hex::encode(q))),
                status: 0,
            }
        }
        Err(e) => ProofReport {
            line,
            k: request.k,
            valid: false,
            quality: None,
            error: Some(e.to_string()),
            status: e.status_code(),
        },
    }
}

fn print_text(report: &ProofReport) {
    let label = match report.line {
        Some(line) => format!("line {}: ", line),
        None => String::new(),
    };
    match (&report.quality, &report.error) {
        (Some(q), None) => println!("{}VALID k={} quality={}", label, report.k, q),
        (_, Some(e)) => println!("{}INVALID k={} {}", label, report.k, e),
        (None, None) => println!("{}INVALID k={}", label, report.k),
    }
}

fn run_verify(seed: &str, k: u8, challenge: &str, proof: &str, output: &str) -> Result<()> {
    check_format(output)?;
    let request = ProofRequest {
        seed: parse_hex_array("seed", seed)?,
        k,
        challenge: parse_hex_array("challenge", challenge)?,
        proof: parse_hex("proof", proof)?,
    };

    info!("validating k={} proof of {} bytes", k, request.proof.len());
    let result = Verifier::new().validate(&request.seed, k, &request.challenge, &request.proof);
    let report = report_for(None, &request, result, None);

    if output == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }

    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn run_batch(file: &Path, output: &str) -> Result<()> {
    check_format(output)?;
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let entries = parse_entries(&text)?;
    let requests: Vec<ProofRequest> = entries.iter().map(|e| e.request.clone()).collect();

    info!("validating {} proofs from {}", requests.len(), file.display());
    let results = Verifier::new().validate_batch(&requests);

    let proofs: Vec<ProofReport> = entries
        .iter()
        .zip(results)
        .map(|(entry, result)| report_for(Some(entry.line), &entry.request, result, entry.expected))
        .collect();
    let valid = proofs.iter().filter(|r| r.valid).count();
    let report = BatchReport {
        total: proofs.len(),
        valid,
        failed: proofs.len() - valid,
        proofs,
    };
    debug!(total = report.total, failed = report.failed, "batch finished");

    if output == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for proof in &report.proofs {
            print_text(proof);
        }
        println!("{}/{} valid", report.valid, report.total);
    }

    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_quality(k: u8, challenge: &str, proof: &str) -> Result<()> {
    let challenge: [u8; 32] = parse_hex_array("challenge", challenge)?;
    let proof = Proof::from_bytes(k, &parse_hex("proof", proof)?)?;
    let quality = quality_string(&proof, quality_index(&challenge), &challenge)?;
    println!("{}", quality);
    Ok(())
}
