//! People and families

use crate::{EventRef, FamilyId, PersonId};

/// An individual in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Handle
    pub id: PersonId,
    /// Display name
    pub name: String,
    /// Reference to the birth event
    pub birth_ref: Option<EventRef>,
    /// Reference to the death event
    pub death_ref: Option<EventRef>,
    /// All other event references, in recorded order
    pub event_refs: Vec<EventRef>,
    /// Families in which this person is a child; the first is the main one
    pub parent_families: Vec<FamilyId>,
    /// Families in which this person is a father or mother
    pub families: Vec<FamilyId>,
}

impl Person {
    /// Create a person without events or relationships
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            birth_ref: None,
            death_ref: None,
            event_refs: Vec::new(),
            parent_families: Vec::new(),
            families: Vec::new(),
        }
    }

    /// The family consulted when walking up the tree
    pub fn main_parent_family(&self) -> Option<&FamilyId> {
        self.parent_families.first()
    }

    /// Event references in which this person has the primary role
    pub fn primary_event_refs(&self) -> impl Iterator<Item = &EventRef> {
        self.event_refs.iter().filter(|r| r.role.is_primary())
    }
}

/// A couple and their children
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    /// Handle
    pub id: FamilyId,
    /// Father, if recorded
    pub father: Option<PersonId>,
    /// Mother, if recorded
    pub mother: Option<PersonId>,
    /// Children in stored order
    pub children: Vec<PersonId>,
}

impl Family {
    /// Create a family without members
    pub fn new(id: FamilyId) -> Self {
        Self {
            id,
            father: None,
            mother: None,
            children: Vec::new(),
        }
    }

    /// Parents, father first
    pub fn parents(&self) -> impl Iterator<Item = &PersonId> {
        self.father.iter().chain(self.mother.iter())
    }

    /// The other parent, when `person` is one of the parents
    pub fn spouse_of(&self, person: &PersonId) -> Option<&PersonId> {
        if self.father.as_ref() == Some(person) {
            self.mother.as_ref()
        } else if self.mother.as_ref() == Some(person) {
            self.father.as_ref()
        } else {
            None
        }
    }
}
