//! Directly attached temporal evidence for one person

use lifespan_domain::{Date, Event, EventId, Family, FamilyId, GraphAccessor, Person, PersonId};
use std::fmt::Display;

/// Strength of a piece of evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// An explicit birth or death event
    Primary,
    /// A baptism, burial or similar event
    Fallback,
}

impl Tier {
    /// Evidence phrase for a birth of this tier
    pub fn birth_label(self) -> &'static str {
        match self {
            Tier::Primary => "birth date",
            Tier::Fallback => "birth-related date",
        }
    }

    /// Evidence phrase for a death of this tier
    pub fn death_label(self) -> &'static str {
        match self {
            Tier::Primary => "death date",
            Tier::Fallback => "death-related date",
        }
    }
}

/// Read-only lookups with failed lookups folded into "no evidence"
///
/// Every lookup error or missing record is logged at debug level and
/// reported as `None`, since partial data is the normal case in a tree.
pub struct EvidenceCollector<'a, G> {
    graph: &'a G,
}

impl<'a, G> EvidenceCollector<'a, G>
where
    G: GraphAccessor,
    G::Error: Display,
{
    /// Create a collector over `graph`
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Resolve a person
    pub fn person(&self, id: &PersonId) -> Option<Person> {
        match self.graph.get_person(id) {
            Ok(Some(person)) => Some(person),
            Ok(None) => {
                tracing::debug!(person = %id, "missing person treated as no evidence");
                None
            }
            Err(e) => {
                tracing::debug!(person = %id, error = %e, "person lookup failed");
                None
            }
        }
    }

    /// Resolve a family
    pub fn family(&self, id: &FamilyId) -> Option<Family> {
        match self.graph.get_family(id) {
            Ok(Some(family)) => Some(family),
            Ok(None) => {
                tracing::debug!(family = %id, "missing family treated as no evidence");
                None
            }
            Err(e) => {
                tracing::debug!(family = %id, error = %e, "family lookup failed");
                None
            }
        }
    }

    fn event(&self, id: &EventId) -> Option<Event> {
        match self.graph.get_event(id) {
            Ok(Some(event)) => Some(event),
            Ok(None) => {
                tracing::debug!(event = %id, "missing event treated as no evidence");
                None
            }
            Err(e) => {
                tracing::debug!(event = %id, error = %e, "event lookup failed");
                None
            }
        }
    }

    /// Date of the primary-role birth event, if non-empty
    pub fn birth_primary(&self, person: &Person) -> Option<Date> {
        let event_ref = person.birth_ref.as_ref().filter(|r| r.role.is_primary())?;
        self.event(&event_ref.event)
            .map(|e| e.date)
            .filter(|d| !d.is_empty())
    }

    /// Date of the first baptism-like event with a non-empty date
    pub fn birth_fallback(&self, person: &Person) -> Option<Date> {
        person
            .primary_event_refs()
            .filter_map(|r| self.event(&r.event))
            .find(|e| e.event_type.is_birth_fallback() && !e.date.is_empty())
            .map(|e| e.date)
    }

    /// Date of the primary-role death event, if non-empty
    pub fn death_primary(&self, person: &Person) -> Option<Date> {
        let event_ref = person.death_ref.as_ref().filter(|r| r.role.is_primary())?;
        self.event(&event_ref.event)
            .map(|e| e.date)
            .filter(|d| !d.is_empty())
    }

    /// Date of the first burial-like event with a non-empty date
    pub fn death_fallback(&self, person: &Person) -> Option<Date> {
        person
            .primary_event_refs()
            .filter_map(|r| self.event(&r.event))
            .find(|e| e.event_type.is_death_fallback() && !e.date.is_empty())
            .map(|e| e.date)
    }

    /// Strongest birth evidence: the birth event, else a fallback event
    pub fn birth(&self, person: &Person) -> Option<(Date, Tier)> {
        self.birth_in(person, Tier::Primary)
            .map(|d| (d, Tier::Primary))
            .or_else(|| self.birth_in(person, Tier::Fallback).map(|d| (d, Tier::Fallback)))
    }

    /// Strongest death evidence: the death event, else a fallback event
    pub fn death(&self, person: &Person) -> Option<(Date, Tier)> {
        self.death_in(person, Tier::Primary)
            .map(|d| (d, Tier::Primary))
            .or_else(|| self.death_in(person, Tier::Fallback).map(|d| (d, Tier::Fallback)))
    }

    /// Birth evidence of exactly one tier
    pub fn birth_in(&self, person: &Person, tier: Tier) -> Option<Date> {
        match tier {
            Tier::Primary => self.birth_primary(person),
            Tier::Fallback => self.birth_fallback(person),
        }
    }

    /// Death evidence of exactly one tier
    pub fn death_in(&self, person: &Person, tier: Tier) -> Option<Date> {
        match tier {
            Tier::Primary => self.death_primary(person),
            Tier::Fallback => self.death_fallback(person),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifespan_domain::{EventRole, EventType};
    use lifespan_store::TreeBuilder;

    #[test]
    fn test_primary_birth_preferred() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        tree.birth(&ann, Date::from_year(1900));
        tree.event(&ann, EventType::Baptism, Date::from_year(1901));
        let store = tree.build();
        let collector = EvidenceCollector::new(&store);
        let ann = collector.person(&ann).unwrap();

        assert_eq!(collector.birth(&ann), Some((Date::from_year(1900), Tier::Primary)));
        assert_eq!(collector.death(&ann), None);
    }

    #[test]
    fn test_empty_birth_falls_through() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        tree.birth(&ann, Date::empty());
        tree.event(&ann, EventType::Christening, Date::from_year(1901));
        let store = tree.build();
        let collector = EvidenceCollector::new(&store);
        let ann = collector.person(&ann).unwrap();

        assert_eq!(collector.birth(&ann), Some((Date::from_year(1901), Tier::Fallback)));
    }

    #[test]
    fn test_non_primary_birth_ignored() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        tree.birth_with_role(&ann, Date::from_year(1900), EventRole::Witness);
        let store = tree.build();
        let collector = EvidenceCollector::new(&store);
        let ann = collector.person(&ann).unwrap();

        assert_eq!(collector.birth(&ann), None);
    }

    #[test]
    fn test_death_fallback() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        tree.event(&ann, EventType::Residence, Date::from_year(1950));
        tree.event(&ann, EventType::Burial, Date::empty());
        tree.event(&ann, EventType::Cremation, Date::from_year(1961));
        let store = tree.build();
        let collector = EvidenceCollector::new(&store);
        let ann = collector.person(&ann).unwrap();

        assert_eq!(collector.death(&ann), Some((Date::from_year(1961), Tier::Fallback)));
        assert_eq!(collector.birth(&ann), None);
    }

    #[test]
    fn test_dangling_reference_is_no_evidence() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        let store = tree.build();
        let collector = EvidenceCollector::new(&store);
        let mut ann = collector.person(&ann).unwrap();
        ann.birth_ref = Some(lifespan_domain::EventRef::primary(EventId::from("E404")));

        assert_eq!(collector.birth(&ann), None);
        assert!(collector.person(&PersonId::from("I404")).is_none());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Tier::Primary.birth_label(), "birth date");
        assert_eq!(Tier::Fallback.death_label(), "death-related date");
    }
}
