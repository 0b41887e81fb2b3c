//! resgal — default resource gallery reconciler.
//!
//! # Usage
//!
//! ```text
//! resgal run [--site <file>] [--prefix <path>] [--dry-run] [--json] [-v]
//! resgal status [--site <file>] [--prefix <path>] [--json] [-v]
//! ```

mod commands;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{run::RunArgs, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "resgal",
    version,
    about = "Set each channel's default resource gallery to its editor group's gallery",
    long_about = None,
)]
struct Cli {
    /// Log lookups and cache skips as well as changes.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk the whole site and update default resource galleries.
    Run(RunArgs),

    /// Show which channels point at the wrong gallery, without writing.
    Status(StatusArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Run(_) => "run",
            Commands::Status(_) => "status",
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.name();
    let result = match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Status(args) => args.run(),
    };

    // Publish, then still return the error so the exit status is non-zero.
    if let Err(err) = &result {
        report::publish(command, err);
    }
    result
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
