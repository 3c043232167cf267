#![deny(missing_docs)]

//! # CDD Client CLI
//!
//! Command Line Interface for the cdd-client resolution engine.
//!
//! Supported Commands:
//! - `resolve`: Swagger 2.0 documents -> normalized type graph (JSON).
//!
//! Logging goes to stderr through `tracing`. `RUST_LOG` is honoured unless
//! `-v` or `--quiet` is given.

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod resolve;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Swagger 2.0 type resolution CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[clap(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve documents and write the assembled type graph as JSON.
    Resolve(resolve::ResolveArgs),
}

fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => {
            return EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        }
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

fn main() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, cli.quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    match &cli.command {
        Commands::Resolve(args) => {
            let summary = resolve::execute(args)?;
            if summary.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_args() {
        let cli = Cli::parse_from([
            "cdd-client",
            "-vv",
            "resolve",
            "--spec",
            "a.yaml",
            "--spec",
            "b.json",
            "--service",
            "a",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Resolve(args) = cli.command;
        assert_eq!(args.specs.len(), 2);
        assert_eq!(args.services, vec!["a"]);
    }
}
