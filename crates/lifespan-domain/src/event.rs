//! Events and their classification

use crate::{Date, EventId, SourceId};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Kind of a recorded event
///
/// Estimation only ever asks the classification predicates
/// ([`is_birth`](Self::is_birth), [`is_birth_fallback`](Self::is_birth_fallback), ...),
/// never a literal type name, so imported labels and GEDCOM tags map onto
/// the same kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Birth
    Birth,
    /// Death
    Death,
    /// Baptism
    Baptism,
    /// Christening
    Christening,
    /// Christening as an adult
    AdultChristening,
    /// Burial
    Burial,
    /// Cremation
    Cremation,
    /// Recorded cause of death
    CauseOfDeath,
    /// Marriage
    Marriage,
    /// Residence
    Residence,
    /// Occupation
    Occupation,
    /// Anything else, by label
    Custom(String),
}

impl EventType {
    /// A birth
    pub fn is_birth(&self) -> bool {
        matches!(self, EventType::Birth)
    }

    /// A death
    pub fn is_death(&self) -> bool {
        matches!(self, EventType::Death)
    }

    /// An event conventionally held shortly after birth
    pub fn is_birth_fallback(&self) -> bool {
        matches!(
            self,
            EventType::Baptism | EventType::Christening | EventType::AdultChristening
        )
    }

    /// An event conventionally held shortly after death
    pub fn is_death_fallback(&self) -> bool {
        matches!(
            self,
            EventType::Burial | EventType::Cremation | EventType::CauseOfDeath
        )
    }

    /// Canonical label
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Birth => "Birth",
            EventType::Death => "Death",
            EventType::Baptism => "Baptism",
            EventType::Christening => "Christening",
            EventType::AdultChristening => "Adult Christening",
            EventType::Burial => "Burial",
            EventType::Cremation => "Cremation",
            EventType::CauseOfDeath => "Cause Of Death",
            EventType::Marriage => "Marriage",
            EventType::Residence => "Residence",
            EventType::Occupation => "Occupation",
            EventType::Custom(label) => label,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = Infallible;

    /// Case-insensitive; also accepts GEDCOM tags. Unknown labels become
    /// [`EventType::Custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "birth" | "birt" | "born" => EventType::Birth,
            "death" | "deat" | "died" => EventType::Death,
            "baptism" | "bapm" | "bapt" => EventType::Baptism,
            "christening" | "christen" | "chr" => EventType::Christening,
            "adultchristening" | "chra" => EventType::AdultChristening,
            "burial" | "buri" | "buried" => EventType::Burial,
            "cremation" | "crem" => EventType::Cremation,
            "causeofdeath" | "cause" => EventType::CauseOfDeath,
            "marriage" | "marr" => EventType::Marriage,
            "residence" | "resi" => EventType::Residence,
            "occupation" | "occu" => EventType::Occupation,
            _ => EventType::Custom(s.trim().to_string()),
        })
    }
}

/// The part a person played in an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EventRole {
    /// The person the event is about
    #[default]
    Primary,
    /// A secondary participant
    Secondary,
    /// A witness
    Witness,
    /// Anything else, by label
    Custom(String),
}

impl EventRole {
    /// True for the authoritative reference of an event
    pub fn is_primary(&self) -> bool {
        matches!(self, EventRole::Primary)
    }

    /// Canonical label
    pub fn as_str(&self) -> &str {
        match self {
            EventRole::Primary => "Primary",
            EventRole::Secondary => "Secondary",
            EventRole::Witness => "Witness",
            EventRole::Custom(label) => label,
        }
    }
}

impl FromStr for EventRole {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "primary" => EventRole::Primary,
            "secondary" => EventRole::Secondary,
            "witness" => EventRole::Witness,
            _ => EventRole::Custom(s.trim().to_string()),
        })
    }
}

/// A person's reference to an event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventRef {
    /// Referenced event
    pub event: EventId,
    /// Role of the referencing person
    pub role: EventRole,
}

impl EventRef {
    /// A primary-role reference
    pub fn primary(event: EventId) -> Self {
        Self {
            event,
            role: EventRole::Primary,
        }
    }

    /// A reference with an explicit role
    pub fn with_role(event: EventId, role: EventRole) -> Self {
        Self { event, role }
    }
}

/// A recorded event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Handle
    pub id: EventId,
    /// Classification
    pub event_type: EventType,
    /// When it happened (possibly empty)
    pub date: Date,
    /// Free-form description
    pub description: String,
    /// Sources cited for this event
    pub citations: Vec<SourceId>,
    /// Attached notes
    pub notes: Vec<String>,
}

impl Event {
    /// Create an event without description, citations or notes
    pub fn new(id: EventId, event_type: EventType, date: Date) -> Self {
        Self {
            id,
            event_type,
            date,
            description: String::new(),
            citations: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Cite a source
    pub fn cite(mut self, source: SourceId) -> Self {
        self.citations.push(source);
        self
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// True when the event cites the given source
    pub fn cites(&self, source: &SourceId) -> bool {
        self.citations.contains(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_predicates() {
        assert!(EventType::Baptism.is_birth_fallback());
        assert!(EventType::Christening.is_birth_fallback());
        assert!(!EventType::Birth.is_birth_fallback());
        assert!(EventType::Burial.is_death_fallback());
        assert!(EventType::Cremation.is_death_fallback());
        assert!(!EventType::Marriage.is_death_fallback());
    }

    #[test]
    fn test_labels_satisfy_predicates() {
        let parse = |s: &str| s.parse::<EventType>().unwrap();
        assert!(parse("BIRT").is_birth());
        assert!(parse("  death ").is_death());
        assert!(parse("CHR").is_birth_fallback());
        assert!(parse("Adult Christening").is_birth_fallback());
        assert!(parse("cause_of_death").is_death_fallback());
        assert_eq!(parse("Graduation"), EventType::Custom("Graduation".to_string()));
    }

    #[test]
    fn test_event_role() {
        assert!(EventRole::default().is_primary());
        assert_eq!("witness".parse::<EventRole>().unwrap(), EventRole::Witness);
        assert!(!"Godparent".parse::<EventRole>().unwrap().is_primary());
    }

    #[test]
    fn test_event_citations() {
        let source = SourceId::from("S1");
        let event = Event::new(EventId::from("E1"), EventType::Birth, Date::from_year(1900))
            .with_description("Birth of Ann")
            .cite(source.clone());
        assert!(event.cites(&source));
        assert!(!event.cites(&SourceId::from("S2")));
    }
}
