//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for ingested values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A duration string could not be turned into whole minutes.
    #[error("invalid duration: {value:?}")]
    InvalidDuration { value: String },

    /// A rule was structurally unusable.
    #[error("invalid rule {key:?}: {reason}")]
    InvalidRule { key: String, reason: &'static str },
}

/// Generates a non-empty string key newtype that validates on
/// deserialization.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a key, rejecting the empty string.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_string_id!(
    /// Stable identifier of a log entry within one aggregation run.
    ///
    /// Assigned once at ingestion and never recomputed. Also identifies
    /// keyed dependencies when guarding traversal against cycles.
    LogKey, "log key"
);

define_string_id!(
    /// Identifier of a classification rule; becomes the bucket key segment
    /// for logs the rule claims.
    RuleKey, "rule key"
);
