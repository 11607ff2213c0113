//! Record handles
//!
//! Every record in the repository is addressed by an opaque string handle.
//! Handles of imported records are kept as given; new records get a
//! UUIDv7-based handle so they sort by creation time.

use std::fmt;

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing handle
            pub fn new(handle: impl Into<String>) -> Self {
                Self(handle.into())
            }

            /// Generate a fresh UUIDv7-based handle
            pub fn generate() -> Self {
                Self(uuid::Uuid::now_v7().simple().to_string())
            }

            /// The raw handle
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(handle: &str) -> Self {
                Self::new(handle)
            }
        }

        impl From<String> for $name {
            fn from(handle: String) -> Self {
                Self(handle)
            }
        }
    };
}

handle_type!(
    /// Handle of a [`crate::Person`]
    PersonId
);
handle_type!(
    /// Handle of a [`crate::Family`]
    FamilyId
);
handle_type!(
    /// Handle of an [`crate::Event`]
    EventId
);
handle_type!(
    /// Handle of a [`crate::Source`]
    SourceId
);
