//! Filter error types

use thiserror::Error;

use super::types::{Predicate, TypeClass};

/// Errors raised while compiling or evaluating a filter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Field name or comparand missing from the rule
    #[error("Invalid filter argument: {0}")]
    InvalidArgument(String),

    /// No field with this name, or its type cannot be filtered on
    #[error("Field '{field}' not found on {record_type}")]
    FieldNotFound {
        field: String,
        record_type: &'static str,
    },

    #[error("Predicate {predicate} is not supported for field '{field}' of type {type_class}")]
    UnsupportedPredicate {
        predicate: Predicate,
        field: String,
        type_class: TypeClass,
    },

    #[error("Comparand '{comparand}' cannot be parsed as {expected}")]
    InvalidComparand {
        comparand: String,
        expected: &'static str,
    },

    /// Raised per record, when the field's current value cannot be interpreted
    #[error("Value '{value}' of field '{field}' cannot be parsed as a number")]
    MalformedFieldValue { field: String, value: String },
}

impl FilterError {
    /// True for failures raised by `Filter::check` rather than by compilation
    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, Self::MalformedFieldValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_display() {
        let err = FilterError::FieldNotFound {
            field: "Bogus".to_string(),
            record_type: "RequestTelemetry",
        };
        assert_eq!(err.to_string(), "Field 'Bogus' not found on RequestTelemetry");
    }

    #[test]
    fn test_unsupported_predicate_display() {
        let err = FilterError::UnsupportedPredicate {
            predicate: Predicate::Contains,
            field: "Duration".to_string(),
            type_class: TypeClass::Duration,
        };
        assert_eq!(
            err.to_string(),
            "Predicate Contains is not supported for field 'Duration' of type Duration"
        );
    }

    #[test]
    fn test_invalid_comparand_display() {
        let err = FilterError::InvalidComparand {
            comparand: "garbage".to_string(),
            expected: "a number",
        };
        assert_eq!(
            err.to_string(),
            "Comparand 'garbage' cannot be parsed as a number"
        );
    }

    #[test]
    fn test_only_malformed_value_is_evaluation_error() {
        let malformed = FilterError::MalformedFieldValue {
            field: "StringField".to_string(),
            value: "abc".to_string(),
        };
        assert!(malformed.is_evaluation_error());
        assert!(!FilterError::InvalidArgument("x".to_string()).is_evaluation_error());
    }
}
