//! Fluent construction of small trees

use crate::MemoryStore;
use lifespan_domain::{
    Date, Event, EventId, EventRef, EventRole, EventType, Family, FamilyId, Person, PersonId,
};

/// Builds a [`MemoryStore`] one relationship at a time
///
/// Handles are sequential (`I0001`, `F0001`, `E0001`) so trees built the same
/// way always get the same handles.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    store: MemoryStore,
    people: usize,
    families: usize,
    events: usize,
}

impl TreeBuilder {
    /// Start an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a person without events
    pub fn person(&mut self, name: &str) -> PersonId {
        self.people += 1;
        let id = PersonId::new(format!("I{:04}", self.people));
        // Fresh sequential handles cannot collide
        let _ = self.store.insert_person(Person::new(id.clone(), name));
        id
    }

    /// Record a birth event in the primary role
    pub fn birth(&mut self, person: &PersonId, date: Date) -> EventId {
        self.birth_with_role(person, date, EventRole::Primary)
    }

    /// Record a birth event with an explicit role
    pub fn birth_with_role(&mut self, person: &PersonId, date: Date, role: EventRole) -> EventId {
        let id = self.new_event(EventType::Birth, date);
        if let Some(p) = self.store.person_mut(person) {
            p.birth_ref = Some(EventRef::with_role(id.clone(), role));
        }
        id
    }

    /// Record a death event in the primary role
    pub fn death(&mut self, person: &PersonId, date: Date) -> EventId {
        let id = self.new_event(EventType::Death, date);
        if let Some(p) = self.store.person_mut(person) {
            p.death_ref = Some(EventRef::primary(id.clone()));
        }
        id
    }

    /// Record any other event in the primary role
    pub fn event(&mut self, person: &PersonId, event_type: EventType, date: Date) -> EventId {
        let id = self.new_event(event_type, date);
        if let Some(p) = self.store.person_mut(person) {
            p.event_refs.push(EventRef::primary(id.clone()));
        }
        id
    }

    /// Add a family and wire it into its members
    pub fn family(
        &mut self,
        father: Option<&PersonId>,
        mother: Option<&PersonId>,
        children: &[&PersonId],
    ) -> FamilyId {
        self.families += 1;
        let id = FamilyId::new(format!("F{:04}", self.families));
        let mut family = Family::new(id.clone());
        family.father = father.cloned();
        family.mother = mother.cloned();
        let _ = self.store.insert_family(family);

        for parent in father.into_iter().chain(mother) {
            if let Some(p) = self.store.person_mut(parent) {
                p.families.push(id.clone());
            }
        }
        for child in children {
            self.add_child(&id, child);
        }
        id
    }

    /// Append a child to an existing family
    pub fn add_child(&mut self, family: &FamilyId, child: &PersonId) {
        if let Some(f) = self.store.family_mut(family) {
            f.children.push(child.clone());
        }
        if let Some(p) = self.store.person_mut(child) {
            p.parent_families.push(family.clone());
        }
    }

    /// Finish and hand over the store
    pub fn build(self) -> MemoryStore {
        self.store
    }

    fn new_event(&mut self, event_type: EventType, date: Date) -> EventId {
        self.events += 1;
        let id = EventId::new(format!("E{:04}", self.events));
        let _ = self.store.insert_event(Event::new(id.clone(), event_type, date));
        id
    }
}
