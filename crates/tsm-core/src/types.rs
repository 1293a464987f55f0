//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
///
/// Every variant names the offending field so a failing row can be
/// diagnosed without re-running the import.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty after trimming.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A numeric field was outside its allowed range.
    #[error("{field} out of range: {value} ({constraint})")]
    OutOfRange {
        field: &'static str,
        value: String,
        constraint: &'static str,
    },

    /// An end value preceded its start value.
    #[error("{field} must not precede {start_field}")]
    EndBeforeStart {
        field: &'static str,
        start_field: &'static str,
    },

    /// The break exceeds the worked time span.
    #[error("break of {break_minutes} min exceeds worked span of {span_minutes} min")]
    BreakExceedsSpan {
        break_minutes: u32,
        span_minutes: u32,
    },
}

/// Generates a validated string newtype with common trait implementations.
///
/// Values are trimmed on construction and must be non-empty afterwards.
macro_rules! define_name_type {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new value after trimming and validation.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the value as a string slice.
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
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name_type!(
    /// A validated freelancer name.
    ///
    /// Freelancer names identify one timesheet source. They are matched
    /// exactly (after trimming) against billing terms.
    FreelancerName, "freelancer name"
);

define_name_type!(
    /// A validated project code.
    ///
    /// Project codes pair with freelancer names to select the applicable
    /// `ProjectTerms` for an entry.
    ProjectCode, "project code"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freelancer_name_rejects_empty() {
        assert!(FreelancerName::new("").is_err());
        assert!(FreelancerName::new("   ").is_err());
        assert!(FreelancerName::new("Alice Meier").is_ok());
    }

    #[test]
    fn freelancer_name_trims_whitespace() {
        let name = FreelancerName::new("  Alice Meier  ").unwrap();
        assert_eq!(name.as_str(), "Alice Meier");
    }

    #[test]
    fn project_code_rejects_empty() {
        assert!(ProjectCode::new("").is_err());
        assert!(ProjectCode::new("ACME-01").is_ok());
    }

    #[test]
    fn freelancer_name_serde_roundtrip() {
        let name = FreelancerName::new("Bob").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Bob\"");
        let parsed: FreelancerName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn freelancer_name_serde_rejects_empty() {
        let result: Result<FreelancerName, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn project_code_as_ref() {
        let code = ProjectCode::new("ACME-01").unwrap();
        let s: &str = code.as_ref();
        assert_eq!(s, "ACME-01");
    }

    #[test]
    fn validation_error_names_field() {
        let err = FreelancerName::new("").unwrap_err();
        assert_eq!(err.to_string(), "freelancer name cannot be empty");
    }
}
