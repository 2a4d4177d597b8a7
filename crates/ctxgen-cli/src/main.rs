use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

/// Dispatch-table generator for C interface headers.
///
/// Reads one interface header and generates the dispatch-table declaration,
/// the static table value, inline trampolines and a foreign slot descriptor.
///
/// EXAMPLES:
///     ctxgen generate              Regenerate all artifacts
///     ctxgen check                 Fail if any artifact is out of date
///     ctxgen list --json           List interface entries as JSON
///
/// ENVIRONMENT VARIABLES:
///     CTXGEN_JSON          Set to 'true' for JSON diagnostics by default
///     CTXGEN_INPUT         Override the interface header path
///     CTXGEN_ABI_VERSION   Override the table version value
#[derive(Parser)]
#[command(name = "ctxgen")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all artifacts
    ///
    /// Writes the four generated files below the project root. Nothing is
    /// written if the header is malformed.
    ///
    /// EXAMPLES:
    ///     ctxgen generate                  Use ./ctxgen.toml or a parent's
    ///     ctxgen generate --root ../hpy    Generate for another project
    #[command(visible_alias = "g")]
    Generate(ProjectArgs),

    /// Check that generated files are up to date
    ///
    /// Exits non-zero and lists every missing or stale artifact.
    ///
    /// EXAMPLES:
    ///     ctxgen check                 Check for drift
    ///     ctxgen check --json          Report drift as JSON
    #[command(visible_alias = "c")]
    Check(ProjectArgs),

    /// List interface entries and their slot names
    ///
    /// EXAMPLES:
    ///     ctxgen list                  One entry per line
    ///     ctxgen list --json           Machine-readable listing
    #[command(visible_alias = "ls")]
    List(ProjectArgs),
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Directory to search for ctxgen.toml (default: current directory)
    #[arg(long)]
    root: Option<PathBuf>,
    /// Explicit ctxgen.toml; its directory becomes the project root
    #[arg(long, conflicts_with = "root")]
    config: Option<PathBuf>,
    /// Output in JSON format
    #[arg(long, env = "CTXGEN_JSON")]
    json: bool,
    /// Verbose output
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let success = match cli.command {
        Commands::Generate(args) => commands::generate::run(&args.into())?,
        Commands::Check(args) => commands::check::run(&args.into())?,
        Commands::List(args) => commands::list::run(&args.into())?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

impl From<ProjectArgs> for commands::Options {
    fn from(args: ProjectArgs) -> Self {
        Self {
            root: args.root,
            config: args.config,
            json: args.json,
            verbose: args.verbose,
        }
    }
}
