//! Export command - HTML progress report for one procedure.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use glowtrack_core::pipeline::render_report;
use glowtrack_core::TrackerError;
use tracing::info;
use uuid::Uuid;

use super::{Env, ExitCode};

#[derive(Args, Clone)]
pub struct ExportArgs {
    /// Procedure to report on
    #[arg(long, value_name = "ID")]
    pub procedure: Uuid,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Run the export command.
pub fn run(args: &ExportArgs, env: &Env) -> Result<ExitCode> {
    let tracker = env.tracker();
    let repository = tracker.repository();
    let procedure = repository
        .procedure(args.procedure)?
        .ok_or(TrackerError::ProcedureNotFound(args.procedure))?;
    let entries = repository.entries()?;

    let report = render_report(&procedure, &entries, tracker.clock().now());

    match &args.output {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Wrote report for {} to {}", procedure.display_name(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(report.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(ExitCode::Success)
}
