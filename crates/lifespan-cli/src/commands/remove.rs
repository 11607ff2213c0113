//! Remove command implementation.

use super::{save_tree, select_people};
use crate::cli::RemoveArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lifespan_estimator::remove_estimates;
use lifespan_store::MemoryStore;

/// Execute the remove command.
pub fn execute_remove(args: RemoveArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut store = MemoryStore::load(&args.tree)?;
    let people = select_people(&store, &args.people)?;
    let source_text = args
        .source_text
        .as_deref()
        .unwrap_or(&config.batch.source_text);

    let report = remove_estimates(&mut store, &people, source_text)?;
    if report.events_removed > 0 || report.source_removed {
        save_tree(&store, &args.tree, args.output.as_deref())?;
    }
    println!("{}", formatter.format_removal(&report)?);
    Ok(())
}
