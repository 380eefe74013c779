//! Procedure command - record and list treatments.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use glowtrack_core::{Procedure, ProcedureType};
use time::macros::format_description;
use time::Date;
use tracing::info;

use super::{Env, ExitCode};
use crate::output::JsonOutput;

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<Date, String> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|_| format!("'{s}' is not a YYYY-MM-DD date"))
}

#[derive(Args, Clone)]
pub struct ProcedureArgs {
    #[command(subcommand)]
    pub command: ProcedureCommand,
}

#[derive(Subcommand, Clone)]
pub enum ProcedureCommand {
    /// Record a new procedure
    Add(AddArgs),
    /// List recorded procedures, one JSON object per line
    List,
}

/// Arguments for `procedure add`.
#[derive(Args, Clone)]
pub struct AddArgs {
    /// Procedure type (botox, laser, chemical-peel, microneedling, filler, prp, hydrafacial, other)
    #[arg(long = "type", value_name = "TYPE")]
    pub procedure_type: ProcedureType,

    /// Free-text name, used with `--type other`
    #[arg(long)]
    pub custom_type: Option<String>,

    /// Date the procedure was performed (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: Date,

    #[arg(long)]
    pub provider: Option<String>,

    #[arg(long)]
    pub clinic: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl AddArgs {
    fn build(&self, created_at: time::OffsetDateTime) -> Procedure {
        let mut procedure = Procedure::new(self.procedure_type, self.date, created_at);
        if let Some(custom) = non_blank(self.custom_type.as_deref()) {
            procedure = procedure.with_custom_type(custom);
        }
        if let Some(provider) = non_blank(self.provider.as_deref()) {
            procedure = procedure.with_provider(provider);
        }
        if let Some(clinic) = non_blank(self.clinic.as_deref()) {
            procedure = procedure.with_clinic(clinic);
        }
        if let Some(notes) = non_blank(self.notes.as_deref()) {
            procedure = procedure.with_notes(notes);
        }
        procedure
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Run the procedure command.
pub fn run(args: &ProcedureArgs, env: &Env) -> Result<ExitCode> {
    let tracker = env.tracker();
    let repository = tracker.repository();
    let output = JsonOutput::stdout();

    match &args.command {
        ProcedureCommand::Add(add) => {
            let procedure = add.build(tracker.clock().now());
            repository
                .add_procedure(procedure.clone())
                .context("Failed to record procedure")?;
            info!(
                "Recorded {} ({}) in {}",
                procedure.display_name(),
                procedure.id,
                env.data_dir().display()
            );
            output.write_line(&procedure)?;
        }
        ProcedureCommand::List => {
            for procedure in repository.procedures()? {
                output.write_line(&procedure)?;
            }
        }
    }

    output.flush()?;
    Ok(ExitCode::Success)
}
