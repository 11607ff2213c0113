//! Command implementations.

pub mod apply;
pub mod estimate;
pub mod remove;

pub use self::apply::{apply_estimates, execute_apply};
pub use self::estimate::execute_estimate;
pub use self::remove::execute_remove;

use crate::error::{CliError, Result};
use chrono::Datelike;
use lifespan_domain::{Date, GraphAccessor, PersonId};
use lifespan_store::MemoryStore;
use std::path::Path;

/// Today's local date, the cut-off for proposed dates.
pub fn today() -> Date {
    let now = chrono::Local::now().date_naive();
    Date::from_ymd(now.year(), now.month() as u8, now.day() as u8)
}

/// The people a command works on: the given handles, or everyone.
///
/// Unknown handles are rejected.
pub fn select_people(store: &MemoryStore, handles: &[String]) -> Result<Vec<PersonId>> {
    if handles.is_empty() {
        return Ok(store.person_ids()?);
    }
    handles
        .iter()
        .map(|handle| -> Result<PersonId> {
            let id = PersonId::new(handle.as_str());
            match store.get_person(&id)? {
                Some(_) => Ok(id),
                None => Err(CliError::InvalidInput(format!("Unknown person '{}'", handle))),
            }
        })
        .collect()
}

/// Save `store` to `output`, or back over `input`.
pub fn save_tree(store: &MemoryStore, input: &Path, output: Option<&Path>) -> Result<()> {
    let target = output.unwrap_or(input);
    store.save(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifespan_store::TreeBuilder;

    #[test]
    fn test_select_everyone_by_default() {
        let mut tree = TreeBuilder::new();
        let a = tree.person("Alice");
        let b = tree.person("Bob");
        let store = tree.build();

        assert_eq!(select_people(&store, &[]).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_select_rejects_unknown_handle() {
        let mut tree = TreeBuilder::new();
        tree.person("Alice");
        let store = tree.build();

        let picked = select_people(&store, &["I0001".to_string()]).unwrap();
        assert_eq!(picked, vec![PersonId::new("I0001")]);
        let result = select_people(&store, &["I9999".to_string()]);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_today_is_complete() {
        let date = today();
        assert!(date.year().is_some_and(|y| y >= 2024));
        assert!(Date::from_year(1900).is_before(&date));
    }
}
