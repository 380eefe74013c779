//! Verify command - recheck a stored original against its hash.

use anyhow::{Context, Result};
use clap::Args;
use glowtrack_core::pipeline::recheck_hash;
use tracing::warn;
use uuid::Uuid;

use super::{Env, ExitCode};

#[derive(Args, Clone)]
pub struct VerifyArgs {
    /// Entry to check
    #[arg(long, value_name = "ID")]
    pub entry: Uuid,
}

/// Run the verify command.
///
/// Prints the certificate and the recheck result. Exits with
/// [`ExitCode::Mismatch`] when the stored original no longer hashes to the
/// recorded value.
pub fn run(args: &VerifyArgs, env: &Env) -> Result<ExitCode> {
    let tracker = env.tracker();
    let entry = tracker
        .repository()
        .entry(args.entry)?
        .with_context(|| format!("Entry not found: {}", args.entry))?;
    let verification = entry
        .verification()
        .with_context(|| format!("Entry {} has no verification record", args.entry))?;

    let intact = recheck_hash(entry.photo_original(), &verification.hash)?;

    println!("{}", verification.certificate());
    if intact {
        println!("Integrity: intact");
        Ok(ExitCode::Success)
    } else {
        warn!("Entry {} no longer matches its recorded hash", args.entry);
        println!("Integrity: MISMATCH");
        Ok(ExitCode::Mismatch)
    }
}
