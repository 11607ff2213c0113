//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use lifespan_estimator::{DateStyle, EventMode};
use std::path::PathBuf;

/// Lifespan - estimate missing birth and death dates in a family tree.
#[derive(Debug, Parser)]
#[command(name = "lifespan")]
#[command(about = "Estimate missing birth and death dates from relatives' records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to ~/.lifespan/config.toml)
    #[arg(short, long, global = true, env = "LIFESPAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Person handles only
    Quiet,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show proposed estimates without changing the tree
    Estimate(EstimateArgs),

    /// Add estimated birth and death events to the tree
    Apply(ApplyArgs),

    /// Remove events added by an earlier apply
    Remove(RemoveArgs),
}

/// Arguments for the estimate command.
#[derive(Debug, Parser)]
pub struct EstimateArgs {
    /// Tree file (JSON)
    pub tree: PathBuf,

    /// Restrict to these person handles (repeatable)
    #[arg(short, long = "person")]
    pub people: Vec<String>,

    /// Birth events: skip, without-date or with-date
    #[arg(long, value_enum)]
    pub birth: Option<EventModeArg>,

    /// Death events: skip, without-date or with-date
    #[arg(long, value_enum)]
    pub death: Option<EventModeArg>,
}

/// Arguments for the apply command.
#[derive(Debug, Parser)]
pub struct ApplyArgs {
    /// Tree file (JSON)
    pub tree: PathBuf,

    /// Restrict to these person handles (repeatable)
    #[arg(short, long = "person")]
    pub people: Vec<String>,

    /// Write the updated tree here instead of over the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Title of the source cited by added events
    #[arg(short, long)]
    pub source_text: Option<String>,

    /// Birth events: skip, without-date or with-date
    #[arg(long, value_enum)]
    pub birth: Option<EventModeArg>,

    /// Death events: skip, without-date or with-date
    #[arg(long, value_enum)]
    pub death: Option<EventModeArg>,

    /// Date modifiers: about, or extremes (aft/bef)
    #[arg(long, value_enum)]
    pub dates: Option<DateStyleArg>,

    /// Keep events added by an earlier run
    #[arg(long)]
    pub keep_previous: bool,

    /// Plan and report without saving
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the remove command.
#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Tree file (JSON)
    pub tree: PathBuf,

    /// Restrict to these person handles (repeatable)
    #[arg(short, long = "person")]
    pub people: Vec<String>,

    /// Write the updated tree here instead of over the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Title of the source cited by added events
    #[arg(short, long)]
    pub source_text: Option<String>,
}

/// Event mode argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum EventModeArg {
    /// Do not add the event
    Skip,
    /// Add the event with an empty date
    WithoutDate,
    /// Add the event with the estimated date
    WithDate,
}

/// Date style argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DateStyleArg {
    /// "abt" on both dates
    About,
    /// "aft" on births, "bef" on deaths
    Extremes,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<EventModeArg> for EventMode {
    fn from(mode: EventModeArg) -> Self {
        match mode {
            EventModeArg::Skip => EventMode::Skip,
            EventModeArg::WithoutDate => EventMode::WithoutDate,
            EventModeArg::WithDate => EventMode::WithDate,
        }
    }
}

impl From<DateStyleArg> for DateStyle {
    fn from(style: DateStyleArg) -> Self {
        match style {
            DateStyleArg::About => DateStyle::About,
            DateStyleArg::Extremes => DateStyle::Extremes,
        }
    }
}
