//! Estimate command implementation.

use super::{select_people, today};
use crate::cli::EstimateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lifespan_estimator::{plan_batch, BatchOptions, BatchPlan};
use lifespan_store::MemoryStore;

/// Execute the estimate command.
pub fn execute_estimate(args: EstimateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = MemoryStore::load(&args.tree)?;
    let plan = plan_estimates(&store, &args, config)?;
    println!("{}", formatter.format_plan(&plan)?);
    Ok(())
}

/// Plan estimates for the selected people without touching the tree.
pub fn plan_estimates(store: &MemoryStore, args: &EstimateArgs, config: &Config) -> Result<BatchPlan> {
    let people = select_people(store, &args.people)?;
    let options = BatchOptions {
        add_birth: args.birth.map(Into::into).unwrap_or(config.batch.add_birth),
        add_death: args.death.map(Into::into).unwrap_or(config.batch.add_death),
        ..config.batch.clone()
    };
    Ok(plan_batch(store, &people, &config.estimator, &options, &today())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EventModeArg;
    use lifespan_domain::Date;
    use lifespan_estimator::Action;
    use lifespan_store::TreeBuilder;
    use std::path::PathBuf;

    fn args(people: &[&str]) -> EstimateArgs {
        EstimateArgs {
            tree: PathBuf::from("unused.json"),
            people: people.iter().map(|p| p.to_string()).collect(),
            birth: None,
            death: None,
        }
    }

    #[test]
    fn test_plan_for_selected_person() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        let bob = tree.person("Bob");
        tree.death(&ann, Date::from_year(1950));
        tree.death(&bob, Date::from_year(1960));
        let store = tree.build();

        let plan = plan_estimates(&store, &args(&["I0002"]), &Config::default()).unwrap();
        assert_eq!(plan.rows.len(), 1);
        assert_eq!(plan.rows[0].person, bob);
        assert_eq!(plan.rows[0].action, Action::AddBirth);
        assert_eq!(plan.rows[0].birth.year(), Some(1860));
    }

    #[test]
    fn test_flag_overrides_config() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        tree.death(&ann, Date::from_year(1950));
        let store = tree.build();

        let mut estimate = args(&[]);
        estimate.birth = Some(EventModeArg::Skip);
        let plan = plan_estimates(&store, &estimate, &Config::default()).unwrap();
        assert!(plan.rows.is_empty());
        assert_eq!(plan.metrics.people_examined, 1);
    }
}
