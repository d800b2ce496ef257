//! CLI argument definitions.
//!
//! All Clap derive structs for `pomod` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Pomodoro focus timer and TODO backend service.
#[derive(Parser, Debug)]
#[command(name = "pomod", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "POMOD_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "POMOD_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server.
    Serve(ServeArgs),

    /// Drive or watch a Pomodoro timer from the terminal.
    Timer(TimerCommand),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Serve Command
// ============================================================================

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "POMOD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind address, overriding the configuration file.
    #[arg(long, env = "POMOD_BIND")]
    pub bind: Option<String>,

    /// Expose Prometheus metrics on `127.0.0.1:<port>`.
    #[arg(long, env = "POMOD_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

// ============================================================================
// Timer Command
// ============================================================================

/// Timer driver commands.
#[derive(Args, Debug)]
pub struct TimerCommand {
    /// Timer subcommand.
    #[command(subcommand)]
    pub subcommand: TimerSubcommand,
}

/// Timer subcommands.
#[derive(Subcommand, Debug)]
pub enum TimerSubcommand {
    /// Run a timer in this terminal, ticking once per second.
    Run(TimerRunArgs),

    /// Poll a running server and render its timer state.
    Watch(TimerWatchArgs),
}

/// Arguments for `timer run`.
#[derive(Args, Debug)]
pub struct TimerRunArgs {
    /// Focus minutes.
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u64).range(1..))]
    pub focus: u64,

    /// Short break minutes.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub short: u64,

    /// Long break minutes.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    pub long: u64,

    /// Cycles before a long break.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u64).range(1..))]
    pub cycles: u64,
}

/// Arguments for `timer watch`.
#[derive(Args, Debug)]
pub struct TimerWatchArgs {
    /// Base URL of a running pomod server.
    #[arg(long, default_value = "http://127.0.0.1:8787", env = "POMOD_URL")]
    pub url: String,

    /// Poll interval (e.g. `1s`, `500ms`).
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    pub interval: Duration,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
