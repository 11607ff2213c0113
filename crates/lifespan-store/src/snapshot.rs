//! JSON snapshot format
//!
//! A tree on disk is one JSON document:
//!
//! ```json
//! {
//!   "people":   [{ "id": "I1", "name": "Ann", "birth": { "event": "E1" } }],
//!   "families": [{ "id": "F1", "father": "I2", "children": ["I1"] }],
//!   "events":   [{ "id": "E1", "type": "Birth", "date": "abt 1900" }],
//!   "sources":  []
//! }
//! ```
//!
//! Dates use the textual form accepted by [`Date`]'s `FromStr`; a date that
//! only exists as free text goes in `date_text` instead. References are not
//! checked for dangling handles, since estimation treats them as missing.

use crate::{MemoryStore, StoreError};
use lifespan_domain::{
    Date, Event, EventId, EventRef, EventRole, EventType, Family, FamilyId, Person, PersonId,
    Source, SourceId,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized form of a whole tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeFile {
    /// People
    #[serde(default)]
    pub people: Vec<PersonRecord>,
    /// Families
    #[serde(default)]
    pub families: Vec<FamilyRecord>,
    /// Events
    #[serde(default)]
    pub events: Vec<EventRecord>,
    /// Sources
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

/// Serialized person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Handle
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Birth reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<EventRefRecord>,
    /// Death reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<EventRefRecord>,
    /// Other event references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventRefRecord>,
    /// Families as a child
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_families: Vec<String>,
    /// Families as a parent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub families: Vec<String>,
}

/// Serialized event reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRefRecord {
    /// Event handle
    pub event: String,
    /// Role name
    #[serde(default = "default_role", skip_serializing_if = "is_primary_role")]
    pub role: String,
}

fn default_role() -> String {
    EventRole::Primary.as_str().to_string()
}

#[allow(clippy::ptr_arg)]
fn is_primary_role(role: &String) -> bool {
    role.parse::<EventRole>()
        .map(|r| r.is_primary())
        .unwrap_or(false)
}

/// Serialized family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyRecord {
    /// Handle
    pub id: String,
    /// Father handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<String>,
    /// Mother handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<String>,
    /// Child handles in order
    #[serde(default)]
    pub children: Vec<String>,
}

/// Serialized event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Handle
    pub id: String,
    /// Event type name
    #[serde(rename = "type")]
    pub event_type: String,
    /// Date in textual form; empty for unknown
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    /// Free-text date that could not be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_text: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Cited source handles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
    /// Notes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Serialized source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Handle
    pub id: String,
    /// Title
    pub title: String,
}

impl From<&EventRef> for EventRefRecord {
    fn from(r: &EventRef) -> Self {
        Self {
            event: r.event.to_string(),
            role: r.role.as_str().to_string(),
        }
    }
}

impl From<&EventRefRecord> for EventRef {
    fn from(r: &EventRefRecord) -> Self {
        // EventRole parsing is infallible
        let role = r.role.parse().unwrap_or_default();
        EventRef::with_role(EventId::from(r.event.as_str()), role)
    }
}

impl From<&Person> for PersonRecord {
    fn from(p: &Person) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            birth: p.birth_ref.as_ref().map(EventRefRecord::from),
            death: p.death_ref.as_ref().map(EventRefRecord::from),
            events: p.event_refs.iter().map(EventRefRecord::from).collect(),
            parent_families: p.parent_families.iter().map(|f| f.to_string()).collect(),
            families: p.families.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl From<&PersonRecord> for Person {
    fn from(r: &PersonRecord) -> Self {
        let mut person = Person::new(PersonId::from(r.id.as_str()), r.name.clone());
        person.birth_ref = r.birth.as_ref().map(EventRef::from);
        person.death_ref = r.death.as_ref().map(EventRef::from);
        person.event_refs = r.events.iter().map(EventRef::from).collect();
        person.parent_families = r
            .parent_families
            .iter()
            .map(|f| FamilyId::from(f.as_str()))
            .collect();
        person.families = r.families.iter().map(|f| FamilyId::from(f.as_str())).collect();
        person
    }
}

impl From<&Family> for FamilyRecord {
    fn from(f: &Family) -> Self {
        Self {
            id: f.id.to_string(),
            father: f.father.as_ref().map(|p| p.to_string()),
            mother: f.mother.as_ref().map(|p| p.to_string()),
            children: f.children.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl From<&FamilyRecord> for Family {
    fn from(r: &FamilyRecord) -> Self {
        let mut family = Family::new(FamilyId::from(r.id.as_str()));
        family.father = r.father.as_deref().map(PersonId::from);
        family.mother = r.mother.as_deref().map(PersonId::from);
        family.children = r.children.iter().map(|c| PersonId::from(c.as_str())).collect();
        family
    }
}

impl From<&Event> for EventRecord {
    fn from(e: &Event) -> Self {
        let (date, date_text) = match e.date.text() {
            Some(text) => (String::new(), Some(text.to_string())),
            None => (e.date.to_string(), None),
        };
        Self {
            id: e.id.to_string(),
            event_type: e.event_type.to_string(),
            date,
            date_text,
            description: e.description.clone(),
            citations: e.citations.iter().map(|s| s.to_string()).collect(),
            notes: e.notes.clone(),
        }
    }
}

impl TryFrom<&EventRecord> for Event {
    type Error = StoreError;

    fn try_from(r: &EventRecord) -> Result<Self, Self::Error> {
        let date = match &r.date_text {
            Some(text) if r.date.is_empty() => Date::text_only(text.clone()),
            _ => r
                .date
                .parse::<Date>()
                .map_err(|e| StoreError::InvalidData(format!("event {}: {}", r.id, e)))?,
        };
        let event_type: EventType = match r.event_type.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        };
        let mut event = Event::new(EventId::from(r.id.as_str()), event_type, date)
            .with_description(r.description.clone());
        event.citations = r.citations.iter().map(|s| SourceId::from(s.as_str())).collect();
        event.notes = r.notes.clone();
        Ok(event)
    }
}

impl TreeFile {
    /// Capture the contents of a store
    pub fn from_store(store: &MemoryStore) -> Self {
        Self {
            people: store.people().map(PersonRecord::from).collect(),
            families: store.families().map(FamilyRecord::from).collect(),
            events: store.events().map(EventRecord::from).collect(),
            sources: store
                .sources()
                .map(|s| SourceRecord {
                    id: s.id.to_string(),
                    title: s.title.clone(),
                })
                .collect(),
        }
    }

    /// Build a store from the records
    ///
    /// Fails on unparseable dates and duplicate handles.
    pub fn into_store(self) -> Result<MemoryStore, StoreError> {
        let mut store = MemoryStore::new();
        for record in &self.people {
            store.insert_person(Person::from(record))?;
        }
        for record in &self.families {
            store.insert_family(Family::from(record))?;
        }
        for record in &self.events {
            store.insert_event(Event::try_from(record)?)?;
        }
        for record in self.sources {
            store.insert_source(Source::new(SourceId::from(record.id), record.title))?;
        }
        Ok(store)
    }
}

impl MemoryStore {
    /// Parse a store from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let file: TreeFile = serde_json::from_str(json)?;
        file.into_store()
    }

    /// Render the store as a pretty-printed JSON document
    pub fn to_json_string(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&TreeFile::from_store(self))?)
    }

    /// Load a store from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            people = store.person_count(),
            events = store.event_count(),
            "loaded tree"
        );
        Ok(store)
    }

    /// Write the store to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)?;
        tracing::info!(path = %path.display(), "saved tree");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifespan_domain::{GraphAccessor, Modifier};

    const TREE: &str = r#"{
        "people": [
            { "id": "I1", "name": "Ann", "birth": { "event": "E1" },
              "events": [{ "event": "E2", "role": "witness" }],
              "parent_families": ["F1"] }
        ],
        "families": [{ "id": "F1", "children": ["I1"] }],
        "events": [
            { "id": "E1", "type": "Birth", "date": "abt 1900-04" },
            { "id": "E2", "type": "CHR", "date_text": "spring, the year of the flood" }
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let store = MemoryStore::from_json_str(TREE).unwrap();
        let ann = store.get_person(&PersonId::from("I1")).unwrap().unwrap();
        assert_eq!(ann.birth_ref.as_ref().unwrap().role, EventRole::Primary);
        assert_eq!(ann.event_refs[0].role, EventRole::Witness);

        let birth = store.get_event(&EventId::from("E1")).unwrap().unwrap();
        assert_eq!(birth.date.modifier(), Modifier::About);
        assert_eq!(birth.date.year(), Some(1900));

        let chr = store.get_event(&EventId::from("E2")).unwrap().unwrap();
        assert_eq!(chr.event_type, EventType::Christening);
        assert!(chr.date.is_empty());
        assert_eq!(chr.date.text(), Some("spring, the year of the flood"));
    }

    #[test]
    fn test_bad_date_is_invalid_data() {
        let json = r#"{ "events": [{ "id": "E1", "type": "Birth", "date": "yesterday" }] }"#;
        let result = MemoryStore::from_json_str(json);
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_out_of_range_year_is_invalid_data() {
        let json = r#"{ "events": [{ "id": "E1", "type": "Birth", "date": "2147483600" }] }"#;
        let result = MemoryStore::from_json_str(json);
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = MemoryStore::from_json_str("{ people: ");
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[test]
    fn test_render_keeps_text_dates() {
        let store = MemoryStore::from_json_str(TREE).unwrap();
        let json = store.to_json_string().unwrap();
        let again = MemoryStore::from_json_str(&json).unwrap();
        let chr = again.get_event(&EventId::from("E2")).unwrap().unwrap();
        assert_eq!(chr.date.text(), Some("spring, the year of the flood"));
        assert!(!json.contains("\"role\": \"Primary\""));
        assert!(json.contains("\"role\": \"Witness\""));
    }
}
