//! Field introspection for telemetry record types
//!
//! A record type describes its filterable fields through a static registry of
//! typed accessors. The filter engine only ever reads records through this
//! registry.

use chrono::TimeDelta;

use super::types::TypeClass;

/// Typed reader for one field of `T`
pub enum FieldAccessor<T> {
    Boolean(fn(&T) -> bool),
    NullableBoolean(fn(&T) -> Option<bool>),
    Integer(fn(&T) -> i64),
    FloatingPoint(fn(&T) -> f64),
    Duration(fn(&T) -> TimeDelta),
    String(fn(&T) -> &str),
    /// Field exists but its declared type cannot be filtered on
    Unsupported(&'static str),
}

impl<T> FieldAccessor<T> {
    pub fn type_class(&self) -> Option<TypeClass> {
        match self {
            Self::Boolean(_) => Some(TypeClass::Boolean),
            Self::NullableBoolean(_) => Some(TypeClass::NullableBoolean),
            Self::Integer(_) => Some(TypeClass::Integer),
            Self::FloatingPoint(_) => Some(TypeClass::FloatingPoint),
            Self::Duration(_) => Some(TypeClass::Duration),
            Self::String(_) => Some(TypeClass::String),
            Self::Unsupported(_) => None,
        }
    }
}

// Manual impls: derives would require `T: Clone`.
impl<T> Clone for FieldAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldAccessor<T> {}

/// Named field of a record type
pub struct Field<T> {
    pub name: &'static str,
    pub accessor: FieldAccessor<T>,
}

impl<T> Field<T> {
    pub const fn new(name: &'static str, accessor: FieldAccessor<T>) -> Self {
        Self { name, accessor }
    }
}

/// A telemetry record shape that filters can be compiled against
pub trait TelemetryRecord: Sized + 'static {
    /// Type name used in error messages and logs
    fn record_type() -> &'static str;

    /// All fields of the record, filterable or not
    fn fields() -> &'static [Field<Self>];

    /// Case-sensitive exact lookup of a field by name
    fn resolve(name: &str) -> Option<&'static Field<Self>> {
        Self::fields().iter().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        count: i64,
        label: String,
    }

    static PROBE_FIELDS: [Field<Probe>; 3] = [
        Field::new("Count", FieldAccessor::Integer(|p| p.count)),
        Field::new("Label", FieldAccessor::String(|p| p.label.as_str())),
        Field::new("Tags", FieldAccessor::Unsupported("map")),
    ];

    impl TelemetryRecord for Probe {
        fn record_type() -> &'static str {
            "Probe"
        }

        fn fields() -> &'static [Field<Self>] {
            &PROBE_FIELDS
        }
    }

    #[test]
    fn test_resolve_exact_match() {
        let field = Probe::resolve("Count").unwrap();
        assert_eq!(field.name, "Count");
        assert_eq!(field.accessor.type_class(), Some(TypeClass::Integer));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        assert!(Probe::resolve("count").is_none());
        assert!(Probe::resolve("LABEL").is_none());
    }

    #[test]
    fn test_unsupported_has_no_type_class() {
        let field = Probe::resolve("Tags").unwrap();
        assert_eq!(field.accessor.type_class(), None);
    }

    #[test]
    fn test_accessors_read_values() {
        let probe = Probe {
            count: 7,
            label: "x".to_string(),
        };
        match Probe::resolve("Label").unwrap().accessor {
            FieldAccessor::String(read) => assert_eq!(read(&probe), "x"),
            _ => panic!("expected string accessor"),
        }
        match Probe::resolve("Count").unwrap().accessor {
            FieldAccessor::Integer(read) => assert_eq!(read(&probe), 7),
            _ => panic!("expected integer accessor"),
        }
    }
}
