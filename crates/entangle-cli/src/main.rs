//! # check-entangled-specs entry point
//!
//! Parses the command line, sets up logging, and maps the check outcome to
//! a process exit code.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use entangle_cli::check::{run_check, CheckArgs};

/// Verify that entangled package specs agree on their Version and Release
/// tags.
///
/// Some packages must ship with matching tags because they are built,
/// signed, or consumed together (for example a kernel and its signed
/// variant). Exits 0 when every rule group agrees, 1 otherwise.
#[derive(Parser, Debug)]
#[command(name = "check-entangled-specs", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    check: CheckArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(repo_root = %cli.check.repo_root.display(), "starting entanglement check");

    let mut stdout = std::io::stdout().lock();
    match run_check(&cli.check, &mut stdout) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
