//! Filter rule definitions
//!
//! Defines the rule descriptor, predicate kinds and the semantic type classes
//! a field can be filtered as.

use std::fmt;

use serde::Deserialize;

/// Comparison a rule applies between a field value and its comparand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Predicate {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    DoesNotContain,
}

impl Predicate {
    pub const ALL: [Predicate; 8] = [
        Self::Equal,
        Self::NotEqual,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterThanOrEqual,
        Self::LessThanOrEqual,
        Self::Contains,
        Self::DoesNotContain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::GreaterThan => "GreaterThan",
            Self::LessThan => "LessThan",
            Self::GreaterThanOrEqual => "GreaterThanOrEqual",
            Self::LessThanOrEqual => "LessThanOrEqual",
            Self::Contains => "Contains",
            Self::DoesNotContain => "DoesNotContain",
        }
    }

    /// GreaterThan, LessThan and their inclusive forms
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::LessThan | Self::GreaterThanOrEqual | Self::LessThanOrEqual
        )
    }

    pub fn is_containment(&self) -> bool {
        matches!(self, Self::Contains | Self::DoesNotContain)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic type a field is filtered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Boolean,
    NullableBoolean,
    Integer,
    FloatingPoint,
    Duration,
    String,
}

impl TypeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::NullableBoolean => "NullableBoolean",
            Self::Integer => "Integer",
            Self::FloatingPoint => "FloatingPoint",
            Self::Duration => "Duration",
            Self::String => "String",
        }
    }

    /// Legality matrix of predicates per type class
    pub fn supports(&self, predicate: Predicate) -> bool {
        match self {
            Self::Boolean | Self::NullableBoolean => {
                matches!(predicate, Predicate::Equal | Predicate::NotEqual)
            }
            Self::Integer | Self::FloatingPoint | Self::String => true,
            Self::Duration => !predicate.is_containment(),
        }
    }

    pub fn supported_predicates(&self) -> Vec<Predicate> {
        Predicate::ALL
            .into_iter()
            .filter(|p| self.supports(*p))
            .collect()
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single filter rule: field name, predicate and raw comparand text.
///
/// The comparand is optional only so that a rule read from JSON without one
/// can be rejected with a precise error when it is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInfo {
    pub field_name: String,
    pub predicate: Predicate,
    #[serde(default)]
    pub comparand: Option<String>,
}

impl FilterInfo {
    pub fn new(
        field_name: impl Into<String>,
        predicate: Predicate,
        comparand: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            predicate,
            comparand: Some(comparand.into()),
        }
    }
}

impl fmt::Display for FilterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.comparand {
            Some(comparand) => write!(f, "{} {} {:?}", self.field_name, self.predicate, comparand),
            None => write!(f, "{} {} <none>", self.field_name, self.predicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_info_deserialize() {
        let json = r#"{"fieldName": "Name", "predicate": "Contains", "comparand": "api"}"#;
        let info: FilterInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info, FilterInfo::new("Name", Predicate::Contains, "api"));
    }

    #[test]
    fn test_filter_info_missing_comparand_deserializes_as_none() {
        let json = r#"{"fieldName": "Name", "predicate": "Equal"}"#;
        let info: FilterInfo = serde_json::from_str(json).unwrap();
        assert!(info.comparand.is_none());
    }

    #[test]
    fn test_predicate_unknown_rejected() {
        let result: Result<Predicate, _> = serde_json::from_str(r#""Matches""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_predicate_groups_partition() {
        let ordering: Vec<Predicate> = Predicate::ALL
            .into_iter()
            .filter(|p| p.is_ordering())
            .collect();
        assert_eq!(
            ordering,
            vec![
                Predicate::GreaterThan,
                Predicate::LessThan,
                Predicate::GreaterThanOrEqual,
                Predicate::LessThanOrEqual
            ]
        );
        for predicate in Predicate::ALL {
            assert!(!(predicate.is_ordering() && predicate.is_containment()));
        }
        assert!(!Predicate::Equal.is_ordering());
        assert!(!Predicate::NotEqual.is_containment());
    }

    #[test]
    fn test_legality_matrix() {
        assert_eq!(
            TypeClass::Boolean.supported_predicates(),
            vec![Predicate::Equal, Predicate::NotEqual]
        );
        assert_eq!(
            TypeClass::NullableBoolean.supported_predicates(),
            vec![Predicate::Equal, Predicate::NotEqual]
        );
        assert_eq!(TypeClass::Integer.supported_predicates().len(), 8);
        assert_eq!(TypeClass::FloatingPoint.supported_predicates().len(), 8);
        assert_eq!(TypeClass::String.supported_predicates().len(), 8);

        let duration = TypeClass::Duration.supported_predicates();
        assert_eq!(duration.len(), 6);
        assert!(!duration.contains(&Predicate::Contains));
        assert!(!duration.contains(&Predicate::DoesNotContain));
    }

    #[test]
    fn test_display() {
        let info = FilterInfo::new("IntField", Predicate::GreaterThanOrEqual, "5");
        assert_eq!(info.to_string(), r#"IntField GreaterThanOrEqual "5""#);
        assert_eq!(TypeClass::NullableBoolean.to_string(), "NullableBoolean");
    }
}
