//! Lifespan CLI - estimate missing birth and death dates in a family tree.

use clap::Parser;
use lifespan_cli::commands;
use lifespan_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> lifespan_cli::Result<()> {
    let cli = Cli::parse();

    // Log to stderr; RUST_LOG wins over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Estimate(args) => commands::execute_estimate(args, &config, &formatter)?,
        Command::Apply(args) => commands::execute_apply(args, &config, &formatter)?,
        Command::Remove(args) => commands::execute_remove(args, &config, &formatter)?,
    }

    Ok(())
}
