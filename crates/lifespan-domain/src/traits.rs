//! Trait definitions for repository access
//!
//! These traits define the boundary between the estimation logic and the
//! repository holding the tree. Implementations live in other crates.

use crate::{Event, EventId, Family, FamilyId, Person, PersonId, Source, SourceId};

/// Read-only lookup of tree records
///
/// Lookups should resolve in O(1) or O(log n); the estimator performs no
/// caching of its own. Implementations that are `Sync` can be shared by
/// estimations running on several threads.
pub trait GraphAccessor {
    /// Error type for lookups
    type Error;

    /// Get a person by handle
    fn get_person(&self, id: &PersonId) -> Result<Option<Person>, Self::Error>;

    /// Get a family by handle
    fn get_family(&self, id: &FamilyId) -> Result<Option<Family>, Self::Error>;

    /// Get an event by handle
    fn get_event(&self, id: &EventId) -> Result<Option<Event>, Self::Error>;

    /// Handles of all people, in a stable order
    fn person_ids(&self) -> Result<Vec<PersonId>, Self::Error>;
}

/// Mutation of tree records, grouped into batches
///
/// Writes between [`begin_batch`](Self::begin_batch) and
/// [`commit_batch`](Self::commit_batch) become visible together;
/// [`rollback_batch`](Self::rollback_batch) discards them.
pub trait GraphWriter: GraphAccessor {
    /// Start a batch
    fn begin_batch(&mut self) -> Result<(), Self::Error>;

    /// Make all writes of the current batch permanent
    fn commit_batch(&mut self) -> Result<(), Self::Error>;

    /// Discard all writes of the current batch
    fn rollback_batch(&mut self) -> Result<(), Self::Error>;

    /// Store a new event
    fn add_event(&mut self, event: Event) -> Result<EventId, Self::Error>;

    /// Delete an event
    fn remove_event(&mut self, id: &EventId) -> Result<(), Self::Error>;

    /// Replace a stored person
    fn commit_person(&mut self, person: Person) -> Result<(), Self::Error>;

    /// Number of stored events citing a source
    fn count_citations(&self, source: &SourceId) -> Result<usize, Self::Error>;

    /// Find a source by exact title
    fn find_source_by_title(&self, title: &str) -> Result<Option<Source>, Self::Error>;

    /// Store a new source
    fn add_source(&mut self, source: Source) -> Result<SourceId, Self::Error>;

    /// Delete a source
    fn remove_source(&mut self, id: &SourceId) -> Result<(), Self::Error>;
}
