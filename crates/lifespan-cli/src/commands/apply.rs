//! Apply command implementation.

use super::{save_tree, select_people, today};
use crate::cli::ApplyArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lifespan_estimator::{apply_rows, plan_batch, remove_estimates, BatchOptions, BatchPlan};
use lifespan_store::MemoryStore;

/// Execute the apply command.
pub fn execute_apply(args: ApplyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut store = MemoryStore::load(&args.tree)?;
    let plan = apply_estimates(&mut store, &args, config)?;

    if args.dry_run {
        if formatter.is_table() {
            println!("{}", formatter.info("Dry run: tree not saved"));
        }
    } else {
        save_tree(&store, &args.tree, args.output.as_deref())?;
    }

    println!("{}", formatter.format_plan(&plan)?);
    if formatter.is_table() && !args.dry_run {
        println!(
            "{}",
            formatter.success(&format!("Added {} estimated event(s)", plan.metrics.events_added))
        );
    }
    Ok(())
}

/// Resolve the batch options for `args` on top of the configured defaults.
pub fn batch_options(args: &ApplyArgs, config: &Config) -> BatchOptions {
    let defaults = &config.batch;
    BatchOptions {
        source_text: args
            .source_text
            .clone()
            .unwrap_or_else(|| defaults.source_text.clone()),
        add_birth: args.birth.map(Into::into).unwrap_or(defaults.add_birth),
        add_death: args.death.map(Into::into).unwrap_or(defaults.add_death),
        date_style: args.dates.map(Into::into).unwrap_or(defaults.date_style),
        remove_previous: defaults.remove_previous && !args.keep_previous,
    }
}

/// Remove earlier estimates if asked, then plan and add new ones in `store`.
pub fn apply_estimates(store: &mut MemoryStore, args: &ApplyArgs, config: &Config) -> Result<BatchPlan> {
    let options = batch_options(args, config);
    let people = select_people(store, &args.people)?;

    let mut removed = 0;
    if options.remove_previous {
        removed = remove_estimates(store, &people, &options.source_text)?.events_removed;
    }

    let mut plan = plan_batch(&*store, &people, &config.estimator, &options, &today())?;
    plan.metrics.events_removed = removed;
    plan.metrics.events_added = apply_rows(store, &plan.rows, &options)?;
    Ok(plan)
}
