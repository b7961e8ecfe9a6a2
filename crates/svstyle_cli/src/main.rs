//! svstyle CLI — the command-line driver for the SystemVerilog style checker.
//!
//! Provides `svstyle lint` for checking files and directories, `svstyle rules`
//! for listing the built-in rules, and `svstyle init` for writing a default
//! `svstyle.toml`.

#![warn(missing_docs)]

mod init;
mod lint;
mod pipeline;
mod rules;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use svstyle_diagnostics::Severity;
use tracing_subscriber::EnvFilter;

/// svstyle — a style-conformance checker for SystemVerilog.
#[derive(Parser, Debug)]
#[command(name = "svstyle", version, about = "SystemVerilog style checker")]
pub struct Cli {
    /// Suppress all output except diagnostics and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to an `svstyle.toml` file, or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default `svstyle.toml`.
    Init {
        /// Directory to write into. Defaults to the current directory.
        dir: Option<PathBuf>,
    },
    /// Check source files against the style rules.
    Lint(LintArgs),
    /// List the built-in rules.
    Rules,
}

/// Arguments for the `svstyle lint` subcommand.
#[derive(Parser, Debug)]
pub struct LintArgs {
    /// Files or directories to check. Defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Rule names or codes to suppress (e.g., `--allow line-length`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Rule names or codes to promote to errors (e.g., `--deny W104`).
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Lowest severity that is reported.
    #[arg(long, value_enum, default_value_t = MinSeverity::Warning)]
    pub min_severity: MinSeverity,

    /// Keep checking a file after lexical errors.
    #[arg(long)]
    pub best_effort: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Severity threshold for reported diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MinSeverity {
    /// Report warnings and errors.
    Warning,
    /// Report errors only.
    Error,
}

impl From<MinSeverity> for Severity {
    fn from(min: MinSeverity) -> Self {
        match min {
            MinSeverity::Warning => Severity::Warning,
            MinSeverity::Error => Severity::Error,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-diagnostic output.
    pub quiet: bool,
    /// Whether to log at debug level.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a configuration file or directory.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_logging(global.verbose);

    let result = match cli.command {
        Command::Init { ref dir } => init::run(dir.as_deref(), &global),
        Command::Lint(ref args) => lint::run(args, &global),
        Command::Rules => rules::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
