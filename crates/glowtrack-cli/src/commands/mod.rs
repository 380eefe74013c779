//! CLI command definitions and handlers.

pub mod capture;
pub mod export;
pub mod procedure;
pub mod timeline;
pub mod verify;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use glowtrack_adapters::{default_data_dir, FsKeyValueStore, SystemClock};
use glowtrack_core::TrackerContext;
use tracing::debug;

use crate::config::AppConfig;

/// Glowtrack - Track skincare procedures with verified progress photos
#[derive(Parser)]
#[command(name = "glowtrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the procedure and entry records
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Record and list procedures
    Procedure(procedure::ProcedureArgs),
    /// Capture a progress photo for a procedure
    Capture(capture::CaptureArgs),
    /// Show procedures with their progress entries
    Timeline(timeline::TimelineArgs),
    /// Write the HTML progress report for a procedure
    Export(export::ExportArgs),
    /// Recheck a stored photo against its recorded hash
    Verify(verify::VerifyArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed.
    Success = 0,
    /// A stored photo no longer matches its recorded hash.
    Mismatch = 1,
    /// Invalid input, missing records or I/O failure.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Env {
    data_dir: PathBuf,
    device: Option<String>,
}

impl Env {
    /// Resolves the data directory: CLI flag, then config, then the platform default.
    pub fn new(data_dir: Option<PathBuf>, config: &AppConfig) -> Self {
        let data_dir = data_dir
            .or_else(|| config.general.data_dir.clone())
            .unwrap_or_else(default_data_dir);
        debug!("Using data directory {}", data_dir.display());
        Self {
            data_dir,
            device: config.general.device.clone(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Device descriptor from the config file.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// Builds a tracker over the filesystem store and the system clock.
    pub fn tracker(&self) -> TrackerContext {
        TrackerContext::new(SystemClock, FsKeyValueStore::new(&self.data_dir))
    }
}
