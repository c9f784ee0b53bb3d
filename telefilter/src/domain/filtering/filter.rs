//! Compiled filters
//!
//! A [`Filter`] is built once from a [`FilterInfo`] for a record type. All
//! validation and comparand parsing happens in [`Filter::new`]; the comparison
//! strategy is chosen there too, so [`Filter::check`] only reads the field and
//! compares.

use chrono::TimeDelta;

use crate::utils::string::{contains_ignore_case, eq_ignore_case, parse_number, to_upper_invariant};
use crate::utils::time::parse_duration;

use super::error::FilterError;
use super::record::{FieldAccessor, TelemetryRecord};
use super::types::{FilterInfo, Predicate, TypeClass};

const NULL_COMPARAND: &str = "NULL";

/// A rule compiled against record type `T`
pub struct Filter<T> {
    field_name: &'static str,
    predicate: Predicate,
    type_class: TypeClass,
    matcher: Matcher<T>,
}

/// Equality and ordering predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl Comparison {
    fn from_predicate(predicate: Predicate) -> Option<Self> {
        match predicate {
            Predicate::Equal => Some(Self::Equal),
            Predicate::NotEqual => Some(Self::NotEqual),
            Predicate::GreaterThan => Some(Self::GreaterThan),
            Predicate::LessThan => Some(Self::LessThan),
            Predicate::GreaterThanOrEqual => Some(Self::GreaterThanOrEqual),
            Predicate::LessThanOrEqual => Some(Self::LessThanOrEqual),
            Predicate::Contains | Predicate::DoesNotContain => None,
        }
    }

    fn holds<V: PartialOrd>(self, value: V, comparand: V) -> bool {
        match self {
            Self::Equal => value == comparand,
            Self::NotEqual => value != comparand,
            Self::GreaterThan => value > comparand,
            Self::LessThan => value < comparand,
            Self::GreaterThanOrEqual => value >= comparand,
            Self::LessThanOrEqual => value <= comparand,
        }
    }
}

/// Reader for a numeric field, widened to `f64` for comparison
enum NumberReader<T> {
    Integer(fn(&T) -> i64),
    FloatingPoint(fn(&T) -> f64),
}

impl<T> NumberReader<T> {
    fn value(&self, record: &T) -> f64 {
        match self {
            Self::Integer(read) => read(record) as f64,
            Self::FloatingPoint(read) => read(record),
        }
    }

    /// Canonical decimal text of the field value
    fn render(&self, record: &T) -> String {
        match self {
            Self::Integer(read) => read(record).to_string(),
            Self::FloatingPoint(read) => read(record).to_string(),
        }
    }
}

enum NumberTest {
    Compare { op: Comparison, comparand: f64 },
    Contains { text: String, negate: bool },
}

/// Comparison strategy chosen at construction
enum Matcher<T> {
    Boolean {
        read: fn(&T) -> bool,
        expected: bool,
        negate: bool,
    },
    NullableBoolean {
        read: fn(&T) -> Option<bool>,
        /// `None` matches an absent value
        expected: Option<bool>,
        negate: bool,
    },
    Number {
        read: NumberReader<T>,
        test: NumberTest,
    },
    Duration {
        read: fn(&T) -> TimeDelta,
        op: Comparison,
        comparand: TimeDelta,
    },
    TextEquals {
        read: fn(&T) -> &str,
        comparand: String,
        negate: bool,
    },
    TextContains {
        read: fn(&T) -> &str,
        comparand: String,
        comparand_upper: String,
        negate: bool,
    },
    /// Ordering on a string field holding a number
    TextNumeric {
        read: fn(&T) -> &str,
        op: Comparison,
        comparand: f64,
    },
}

impl<T: TelemetryRecord> Filter<T> {
    /// Compile a rule against `T`.
    ///
    /// Checks run in a fixed order: argument presence, field lookup, type
    /// support, predicate legality, then comparand parsing.
    pub fn new(info: &FilterInfo) -> Result<Self, FilterError> {
        if info.field_name.is_empty() {
            return Err(FilterError::InvalidArgument(
                "field name must not be empty".to_string(),
            ));
        }
        let Some(comparand) = info.comparand.as_deref() else {
            return Err(FilterError::InvalidArgument(format!(
                "comparand is missing for field '{}'",
                info.field_name
            )));
        };

        let not_found = || FilterError::FieldNotFound {
            field: info.field_name.clone(),
            record_type: T::record_type(),
        };
        let field = T::resolve(&info.field_name).ok_or_else(not_found)?;
        let Some(type_class) = field.accessor.type_class() else {
            tracing::debug!(
                record_type = T::record_type(),
                field = field.name,
                "Field has an unsupported type"
            );
            return Err(not_found());
        };

        let predicate = info.predicate;
        if !type_class.supports(predicate) {
            return Err(FilterError::UnsupportedPredicate {
                predicate,
                field: info.field_name.clone(),
                type_class,
            });
        }

        let matcher = build_matcher::<T>(field.name, field.accessor, predicate, comparand)?;

        tracing::debug!(
            record_type = T::record_type(),
            field = field.name,
            predicate = %predicate,
            type_class = %type_class,
            "Compiled filter"
        );

        Ok(Self {
            field_name: field.name,
            predicate,
            type_class,
            matcher,
        })
    }
}

impl<T> Filter<T> {
    /// Test one record.
    ///
    /// Only ordering on a string field can fail, with
    /// [`FilterError::MalformedFieldValue`] when the value is not a number.
    pub fn check(&self, record: &T) -> Result<bool, FilterError> {
        let matched = match &self.matcher {
            Matcher::Boolean {
                read,
                expected,
                negate,
            } => (read(record) == *expected) != *negate,
            Matcher::NullableBoolean {
                read,
                expected,
                negate,
            } => (read(record) == *expected) != *negate,
            Matcher::Number { read, test } => match test {
                NumberTest::Compare { op, comparand } => op.holds(read.value(record), *comparand),
                NumberTest::Contains { text, negate } => {
                    read.render(record).contains(text.as_str()) != *negate
                }
            },
            Matcher::Duration {
                read,
                op,
                comparand,
            } => op.holds(read(record), *comparand),
            Matcher::TextEquals {
                read,
                comparand,
                negate,
            } => eq_ignore_case(read(record), comparand) != *negate,
            Matcher::TextContains {
                read,
                comparand,
                comparand_upper,
                negate,
            } => contains_ignore_case(read(record), comparand, comparand_upper) != *negate,
            Matcher::TextNumeric {
                read,
                op,
                comparand,
            } => {
                let raw = read(record);
                let value =
                    parse_number(raw).ok_or_else(|| FilterError::MalformedFieldValue {
                        field: self.field_name.to_string(),
                        value: raw.to_string(),
                    })?;
                op.holds(value, *comparand)
            }
        };
        Ok(matched)
    }

    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    pub fn type_class(&self) -> TypeClass {
        self.type_class
    }
}

fn build_matcher<T: TelemetryRecord>(
    field: &str,
    accessor: FieldAccessor<T>,
    predicate: Predicate,
    comparand: &str,
) -> Result<Matcher<T>, FilterError> {
    let negate = matches!(predicate, Predicate::NotEqual | Predicate::DoesNotContain);

    let matcher = match accessor {
        FieldAccessor::Boolean(read) => Matcher::Boolean {
            read,
            expected: parse_boolean(comparand)?,
            negate,
        },
        FieldAccessor::NullableBoolean(read) => Matcher::NullableBoolean {
            read,
            expected: parse_nullable_boolean(comparand)?,
            negate,
        },
        FieldAccessor::Integer(read) => Matcher::Number {
            read: NumberReader::Integer(read),
            test: number_test(predicate, comparand)?,
        },
        FieldAccessor::FloatingPoint(read) => Matcher::Number {
            read: NumberReader::FloatingPoint(read),
            test: number_test(predicate, comparand)?,
        },
        FieldAccessor::Duration(read) => Matcher::Duration {
            read,
            op: comparison(field, predicate, TypeClass::Duration)?,
            comparand: parse_duration(comparand).ok_or_else(|| {
                invalid_comparand(comparand, "a duration ([-][d.]hh:mm[:ss[.fffffff]])")
            })?,
        },
        FieldAccessor::String(read) if predicate.is_ordering() => Matcher::TextNumeric {
            read,
            op: comparison(field, predicate, TypeClass::String)?,
            comparand: parse_real(comparand)?,
        },
        FieldAccessor::String(read) if predicate.is_containment() => Matcher::TextContains {
            read,
            comparand: comparand.to_string(),
            comparand_upper: to_upper_invariant(comparand),
            negate,
        },
        FieldAccessor::String(read) => Matcher::TextEquals {
            read,
            comparand: comparand.to_string(),
            negate,
        },
        FieldAccessor::Unsupported(_) => {
            return Err(FilterError::FieldNotFound {
                field: field.to_string(),
                record_type: T::record_type(),
            });
        }
    };
    Ok(matcher)
}

fn number_test(predicate: Predicate, comparand: &str) -> Result<NumberTest, FilterError> {
    let value = parse_real(comparand)?;
    Ok(match Comparison::from_predicate(predicate) {
        Some(op) => NumberTest::Compare {
            op,
            comparand: value,
        },
        None => NumberTest::Contains {
            text: comparand.to_string(),
            negate: predicate == Predicate::DoesNotContain,
        },
    })
}

fn comparison(
    field: &str,
    predicate: Predicate,
    type_class: TypeClass,
) -> Result<Comparison, FilterError> {
    Comparison::from_predicate(predicate).ok_or_else(|| FilterError::UnsupportedPredicate {
        predicate,
        field: field.to_string(),
        type_class,
    })
}

fn parse_real(comparand: &str) -> Result<f64, FilterError> {
    parse_number(comparand).ok_or_else(|| invalid_comparand(comparand, "a number"))
}

fn parse_boolean(comparand: &str) -> Result<bool, FilterError> {
    match comparand.trim() {
        s if s.eq_ignore_ascii_case("true") => Ok(true),
        s if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(invalid_comparand(comparand, "a boolean")),
    }
}

fn parse_nullable_boolean(comparand: &str) -> Result<Option<bool>, FilterError> {
    if comparand.trim().eq_ignore_ascii_case(NULL_COMPARAND) {
        return Ok(None);
    }
    parse_boolean(comparand)
        .map(Some)
        .map_err(|_| invalid_comparand(comparand, "a boolean or NULL"))
}

fn invalid_comparand(comparand: &str, expected: &'static str) -> FilterError {
    FilterError::InvalidComparand {
        comparand: comparand.to_string(),
        expected,
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
