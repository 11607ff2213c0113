//! Lifespan Domain Layer
//!
//! This crate defines the genealogical records that date estimation reads and
//! writes. Apart from `uuid` for handle generation it has no external
//! dependencies.
//!
//! ## Key Concepts
//!
//! - **Person**: an individual with optional birth/death references, other
//!   event references, and family memberships
//! - **Family**: an optional father, an optional mother and ordered children
//! - **Event**: a classified, dated occurrence; classification is queried
//!   through predicates such as [`EventType::is_birth_fallback`]
//! - **Date**: a possibly partial, possibly qualified point or range in time
//! - **Traits**: [`GraphAccessor`] for read-only lookup and [`GraphWriter`]
//!   for batched mutation, implemented by storage crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod date;
pub mod event;
pub mod ids;
pub mod person;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use date::{Date, DateValue, Modifier, Quality, MAX_YEAR};
pub use event::{Event, EventRef, EventRole, EventType};
pub use ids::{EventId, FamilyId, PersonId, SourceId};
pub use person::{Family, Person};
pub use source::Source;
pub use traits::{GraphAccessor, GraphWriter};
