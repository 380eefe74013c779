//! Timeline command - procedures with their entries, newest first.

use anyhow::Result;
use clap::Args;
use glowtrack_core::pipeline::reconstruct_timeline;
use uuid::Uuid;

use super::{Env, ExitCode};
use crate::config::AppConfig;
use crate::output::{JsonOutput, OutputFormat, TimelineSummary};

#[derive(Args, Clone)]
pub struct TimelineArgs {
    /// Only show this procedure
    #[arg(long, value_name = "ID")]
    pub procedure: Option<Uuid>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl TimelineArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        args
    }
}

/// Run the timeline command.
pub fn run(args: &TimelineArgs, env: &Env) -> Result<ExitCode> {
    let tracker = env.tracker();
    let repository = tracker.repository();
    let procedures = repository.procedures()?;
    let entries = repository.entries()?;

    if let Some(id) = args.procedure {
        if !procedures.iter().any(|p| p.id == id) {
            anyhow::bail!("Procedure not found: {id}");
        }
    }

    let summaries: Vec<TimelineSummary<'_>> = reconstruct_timeline(&procedures, &entries)
        .iter()
        .filter(|t| args.procedure.map_or(true, |id| t.procedure().id == id))
        .map(TimelineSummary::from)
        .collect();

    let output = JsonOutput::stdout();
    output.write_all(&summaries, args.format.unwrap_or_default(), args.pretty)?;
    output.flush()?;
    Ok(ExitCode::Success)
}
