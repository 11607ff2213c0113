//! Lifespan Storage Layer
//!
//! Implements the [`GraphAccessor`] and [`GraphWriter`] traits with an
//! in-memory repository.
//!
//! # Architecture
//!
//! - Hash maps keyed by handle for O(1) lookup, plus insertion order so that
//!   listings and snapshots are deterministic
//! - Batches are checkpoints: `begin_batch` saves the tables, `rollback_batch`
//!   restores them
//! - A JSON snapshot format (see [`snapshot`]) for loading and saving trees
//!
//! # Examples
//!
//! ```
//! use lifespan_domain::{Date, GraphAccessor};
//! use lifespan_store::TreeBuilder;
//!
//! let mut tree = TreeBuilder::new();
//! let ann = tree.person("Ann");
//! tree.birth(&ann, Date::from_year(1900));
//! let store = tree.build();
//! assert!(store.get_person(&ann).unwrap().unwrap().birth_ref.is_some());
//! ```

#![warn(missing_docs)]

mod builder;
pub mod snapshot;

pub use builder::TreeBuilder;

use lifespan_domain::{
    Event, EventId, Family, FamilyId, GraphAccessor, GraphWriter, Person, PersonId, Source,
    SourceId,
};
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A record with the same handle already exists
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Batch misuse (nested begin, commit without begin, ...)
    #[error("Batch error: {0}")]
    Batch(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Records of one kind, keyed by handle, remembering insertion order
#[derive(Debug, Clone)]
struct Table<K, V> {
    rows: HashMap<K, V>,
    order: Vec<K>,
}

impl<K: Clone + Eq + Hash, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + Hash + std::fmt::Display, V> Table<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.rows.get_mut(key)
    }

    fn insert(&mut self, key: K, value: V) -> Result<(), StoreError> {
        if self.rows.contains_key(&key) {
            return Err(StoreError::Duplicate(key.to_string()));
        }
        self.order.push(key.clone());
        self.rows.insert(key, value);
        Ok(())
    }

    fn replace(&mut self, key: &K, value: V) -> Result<(), StoreError> {
        match self.rows.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    fn remove(&mut self, key: &K) -> Result<V, StoreError> {
        let value = self
            .rows
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        self.order.retain(|k| k != key);
        Ok(value)
    }

    fn values(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|k| self.rows.get(k))
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    people: Table<PersonId, Person>,
    families: Table<FamilyId, Family>,
    events: Table<EventId, Event>,
    sources: Table<SourceId, Source>,
}

/// In-memory implementation of the repository traits
///
/// # Thread Safety
///
/// Reads take `&self` and the store is `Sync`, so one snapshot can be shared
/// by estimations running on several threads. Writes need `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
    checkpoint: Option<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new person
    pub fn insert_person(&mut self, person: Person) -> Result<(), StoreError> {
        self.tables.people.insert(person.id.clone(), person)
    }

    /// Insert a new family
    pub fn insert_family(&mut self, family: Family) -> Result<(), StoreError> {
        self.tables.families.insert(family.id.clone(), family)
    }

    /// Insert a new event
    pub fn insert_event(&mut self, event: Event) -> Result<(), StoreError> {
        self.tables.events.insert(event.id.clone(), event)
    }

    /// Insert a new source
    pub fn insert_source(&mut self, source: Source) -> Result<(), StoreError> {
        self.tables.sources.insert(source.id.clone(), source)
    }

    /// All people in insertion order
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.tables.people.values()
    }

    /// All families in insertion order
    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.tables.families.values()
    }

    /// All events in insertion order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.tables.events.values()
    }

    /// All sources in insertion order
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.tables.sources.values()
    }

    /// Number of people
    pub fn person_count(&self) -> usize {
        self.tables.people.len()
    }

    /// Number of events
    pub fn event_count(&self) -> usize {
        self.tables.events.len()
    }

    /// True while a batch is open
    pub fn in_batch(&self) -> bool {
        self.checkpoint.is_some()
    }

    pub(crate) fn person_mut(&mut self, id: &PersonId) -> Option<&mut Person> {
        self.tables.people.get_mut(id)
    }

    pub(crate) fn family_mut(&mut self, id: &FamilyId) -> Option<&mut Family> {
        self.tables.families.get_mut(id)
    }
}

impl GraphAccessor for MemoryStore {
    type Error = StoreError;

    fn get_person(&self, id: &PersonId) -> Result<Option<Person>, Self::Error> {
        Ok(self.tables.people.get(id).cloned())
    }

    fn get_family(&self, id: &FamilyId) -> Result<Option<Family>, Self::Error> {
        Ok(self.tables.families.get(id).cloned())
    }

    fn get_event(&self, id: &EventId) -> Result<Option<Event>, Self::Error> {
        Ok(self.tables.events.get(id).cloned())
    }

    fn person_ids(&self) -> Result<Vec<PersonId>, Self::Error> {
        Ok(self.tables.people.order.clone())
    }
}

impl GraphWriter for MemoryStore {
    fn begin_batch(&mut self) -> Result<(), Self::Error> {
        if self.checkpoint.is_some() {
            return Err(StoreError::Batch("a batch is already open".to_string()));
        }
        tracing::debug!("begin batch");
        self.checkpoint = Some(self.tables.clone());
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<(), Self::Error> {
        self.checkpoint
            .take()
            .ok_or_else(|| StoreError::Batch("commit without an open batch".to_string()))?;
        tracing::debug!("commit batch");
        Ok(())
    }

    fn rollback_batch(&mut self) -> Result<(), Self::Error> {
        let saved = self
            .checkpoint
            .take()
            .ok_or_else(|| StoreError::Batch("rollback without an open batch".to_string()))?;
        tracing::debug!("rollback batch");
        self.tables = saved;
        Ok(())
    }

    fn add_event(&mut self, event: Event) -> Result<EventId, Self::Error> {
        let id = event.id.clone();
        self.tables.events.insert(id.clone(), event)?;
        Ok(id)
    }

    fn remove_event(&mut self, id: &EventId) -> Result<(), Self::Error> {
        self.tables.events.remove(id).map(|_| ())
    }

    fn commit_person(&mut self, person: Person) -> Result<(), Self::Error> {
        let id = person.id.clone();
        self.tables.people.replace(&id, person)
    }

    fn count_citations(&self, source: &SourceId) -> Result<usize, Self::Error> {
        Ok(self.tables.events.values().filter(|e| e.cites(source)).count())
    }

    fn find_source_by_title(&self, title: &str) -> Result<Option<Source>, Self::Error> {
        Ok(self
            .tables
            .sources
            .values()
            .find(|s| s.title == title)
            .cloned())
    }

    fn add_source(&mut self, source: Source) -> Result<SourceId, Self::Error> {
        let id = source.id.clone();
        self.tables.sources.insert(id.clone(), source)?;
        Ok(id)
    }

    fn remove_source(&mut self, id: &SourceId) -> Result<(), Self::Error> {
        self.tables.sources.remove(id).map(|_| ())
    }
}
