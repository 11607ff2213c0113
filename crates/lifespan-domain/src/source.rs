//! Source records cited by events

use crate::SourceId;

/// A source that events can cite
///
/// Generated estimates cite a source with a well-known title so that a later
/// run can find and remove them again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Handle
    pub id: SourceId,
    /// Title, used to recognise the source
    pub title: String,
}

impl Source {
    /// Create a new source
    pub fn new(id: SourceId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}
