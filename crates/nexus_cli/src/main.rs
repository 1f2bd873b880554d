//! Command-line front end for Nexus.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration, and start file logging.
//! - Run one command against the local slot database.

mod args;
mod commands;

use args::Cli;
use clap::Parser;
use nexus_core::{init_logging, AppConfig};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.data_dir.clone(), cli.log_level.clone());

    if let Err(err) = init_logging(&config.log_level, &config.log_dir().to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = commands::run(&cli.command, &config, &mut out);
    let _ = out.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
