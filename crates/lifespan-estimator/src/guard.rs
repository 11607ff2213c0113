//! Cycle detection for the generational walks

use crate::EstimatorError;
use lifespan_domain::PersonId;
use std::collections::HashSet;

/// Outcome of entering a person during a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// First visit along this path; explore the person
    Explore,
    /// The person's subtree was already searched without result
    Exhausted,
}

/// Tracks one directional walk (ancestors or descendants)
///
/// A person on the current path being reached again is a cycle. A person
/// reached along a second, different path (pedigree collapse) is not; when
/// memoisation is enabled such a person is skipped if its first visit found
/// nothing.
#[derive(Debug, Clone)]
pub struct CycleGuard {
    on_path: HashSet<PersonId>,
    exhausted: HashSet<PersonId>,
    memoize: bool,
}

impl CycleGuard {
    /// Start a walk rooted at `root`
    ///
    /// Memoisation is only sound when the walk is not depth limited, since a
    /// truncated search says nothing about deeper generations.
    pub fn new(root: &PersonId, memoize: bool) -> Self {
        let mut on_path = HashSet::new();
        on_path.insert(root.clone());
        Self {
            on_path,
            exhausted: HashSet::new(),
            memoize,
        }
    }

    /// Step onto `person`
    pub fn enter(&mut self, person: &PersonId) -> Result<Visit, EstimatorError> {
        if self.on_path.contains(person) {
            tracing::warn!(person = %person, "person is their own ancestor");
            return Err(EstimatorError::GraphCycle {
                person: person.clone(),
            });
        }
        if self.exhausted.contains(person) {
            return Ok(Visit::Exhausted);
        }
        self.on_path.insert(person.clone());
        Ok(Visit::Explore)
    }

    /// Step back off `person`; `found_nothing` marks its subtree as searched
    pub fn leave(&mut self, person: &PersonId, found_nothing: bool) {
        self.on_path.remove(person);
        if found_nothing && self.memoize {
            self.exhausted.insert(person.clone());
        }
    }
}
