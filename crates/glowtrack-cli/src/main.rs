//! Glowtrack CLI - Skincare procedure tracking with verified progress photos.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::capture::CaptureArgs;
use commands::timeline::TimelineArgs;
use commands::{Cli, Commands, Env, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();
    let env = Env::new(cli.data_dir.clone(), &config);

    let result = match cli.command {
        Commands::Procedure(ref args) => commands::procedure::run(args, &env),
        Commands::Capture(ref args) => {
            let args = CaptureArgs::with_config(args.clone(), &config);
            commands::capture::run(&args, &env)
        }
        Commands::Timeline(ref args) => {
            let args = TimelineArgs::with_config(args.clone(), &config);
            commands::timeline::run(&args, &env)
        }
        Commands::Export(ref args) => commands::export::run(args, &env),
        Commands::Verify(ref args) => commands::verify::run(args, &env),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    };

    exit_code.into()
}
