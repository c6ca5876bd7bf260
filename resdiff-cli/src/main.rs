//! resdiff CLI - declaration-level diffs for ReScript modules
//!
//! Reports which functions, types and externals were added, modified or
//! deleted between two versions of a module, ignoring formatting-only edits.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use resdiff_core::{ChangeMode, DiffError};

mod commands;
mod config;
mod output;

use commands::{compare, git, single, snapshot, Context};
use config::ResdiffConfig;
use output::{OutputConfig, OutputFormat};

/// Parse a single-version mode (`added` or `deleted`)
fn parse_mode(s: &str) -> Result<ChangeMode, String> {
    s.parse().map_err(|e: DiffError| e.to_string())
}

/// Declaration-level semantic diff for ReScript.
///
/// resdiff matches top-level declarations by name and compares their syntax
/// trees, so reformatting is never reported as a change.
#[derive(Parser)]
#[command(name = "resdiff")]
#[command(author, version)]
#[command(about = "Declaration-level semantic diff for ReScript modules")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  resdiff compare old/Math.res Math.res    Diff two versions of a module
  resdiff single Removed.res --mode deleted  Report a deleted module
  resdiff git main HEAD                    Diff every changed .res file
  resdiff snapshot Math.res -o Math.json   Store a syntax snapshot")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Compact output (single-line JSON, borderless tables)
    #[arg(long, global = true)]
    compact: bool,

    /// Compiled tree-sitter ReScript grammar (shared library)
    #[arg(long, global = true, value_name = "PATH")]
    grammar: Option<PathBuf>,

    /// Do not run the formatter on files before diffing
    #[arg(long, global = true)]
    no_format: bool,

    /// Show detailed version information
    #[arg(long = "version-verbose")]
    version_verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two versions of a module
    #[command(visible_alias = "c")]
    Compare {
        /// Old version (source file or .json syntax snapshot)
        before: PathBuf,

        /// New version (source file or .json syntax snapshot)
        after: PathBuf,

        /// Module name for the report (default: file stem of AFTER)
        #[arg(short, long)]
        module: Option<String>,
    },

    /// Report every declaration of one version as added or deleted
    #[command(visible_alias = "s")]
    Single {
        /// Source file or .json syntax snapshot
        file: PathBuf,

        /// Whether the module was created or removed
        #[arg(short = 'M', long, default_value = "deleted", value_parser = parse_mode)]
        mode: ChangeMode,

        /// Module name for the report (default: file stem)
        #[arg(short, long)]
        module: Option<String>,
    },

    /// Diff every changed .res file between two git refs
    Git {
        /// Base git ref (branch, commit, tag)
        base_ref: String,

        /// Head git ref (branch, commit, tag)
        head_ref: String,
    },

    /// Parse a source file and write its JSON syntax snapshot
    Snapshot {
        /// Source file to parse
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print verbose version information
fn print_verbose_version() {
    use colored::Colorize;

    let cli_version = env!("CARGO_PKG_VERSION");
    let platform = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    println!("resdiff {}", cli_version);
    println!("  {:<14} {}", "resdiff-cli:".cyan(), cli_version);
    println!("  {:<14} {}", "resdiff-core:".cyan(), resdiff_core::version());
    println!("  {:<14} {}", "Platform:".cyan(), platform);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Handle verbose version flag
    if cli.version_verbose {
        print_verbose_version();
        return Ok(());
    }

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .resdiffrc.toml
    let config = ResdiffConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    let output = OutputConfig::for_stdout(format, config.use_color(), cli.compact);
    if !output.color {
        colored::control::set_override(false);
    }

    // Handle case where no command is provided
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    let ctx = Context::new(config, output, cli.grammar, cli.no_format);

    match command {
        Commands::Compare {
            before,
            after,
            module,
        } => compare::run(&ctx, &before, &after, module.as_deref()),
        Commands::Single { file, mode, module } => {
            single::run(&ctx, &file, mode, module.as_deref())
        }
        Commands::Git { base_ref, head_ref } => git::run(&ctx, &base_ref, &head_ref),
        Commands::Snapshot { file, output } => snapshot::run(&ctx, &file, output.as_deref()),
    }
}
