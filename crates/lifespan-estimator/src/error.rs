//! Error types for estimation runs

use lifespan_domain::PersonId;
use thiserror::Error;

/// Errors that can occur while estimating or applying estimates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    /// A person is reachable from themself along parent/child links
    #[error("Graph cycle: {person} is recorded as their own ancestor")]
    GraphCycle {
        /// Person at which the walk re-entered its own path
        person: PersonId,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),
}
