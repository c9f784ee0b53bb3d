//! Telemetry catalog
//!
//! The document types records can be filtered as, and a runtime selector for
//! them.

mod documents;

use std::fmt;

use serde::Deserialize;

use crate::domain::filtering::{FieldAccessor, Predicate, TelemetryRecord, TypeClass};

pub use documents::{
    DependencyTelemetry, EventTelemetry, ExceptionTelemetry, MetricTelemetry, RequestTelemetry,
    TraceTelemetry,
};

/// Telemetry document type selected at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryKind {
    Request,
    Dependency,
    Exception,
    Event,
    Trace,
    Metric,
}

impl TelemetryKind {
    pub const ALL: [TelemetryKind; 6] = [
        Self::Request,
        Self::Dependency,
        Self::Exception,
        Self::Event,
        Self::Trace,
        Self::Metric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Dependency => "dependency",
            Self::Exception => "exception",
            Self::Event => "event",
            Self::Trace => "trace",
            Self::Metric => "metric",
        }
    }

    pub fn record_type(&self) -> &'static str {
        match self {
            Self::Request => RequestTelemetry::record_type(),
            Self::Dependency => DependencyTelemetry::record_type(),
            Self::Exception => ExceptionTelemetry::record_type(),
            Self::Event => EventTelemetry::record_type(),
            Self::Trace => TraceTelemetry::record_type(),
            Self::Metric => MetricTelemetry::record_type(),
        }
    }

    /// Fields of the document type, in declaration order
    pub fn describe_fields(&self) -> Vec<FieldDescription> {
        match self {
            Self::Request => describe::<RequestTelemetry>(),
            Self::Dependency => describe::<DependencyTelemetry>(),
            Self::Exception => describe::<ExceptionTelemetry>(),
            Self::Event => describe::<EventTelemetry>(),
            Self::Trace => describe::<TraceTelemetry>(),
            Self::Metric => describe::<MetricTelemetry>(),
        }
    }
}

impl fmt::Display for TelemetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filterability of a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescription {
    pub name: &'static str,
    /// `None` when the declared type cannot be filtered on
    pub type_class: Option<TypeClass>,
    pub declared: &'static str,
}

impl FieldDescription {
    pub fn predicates(&self) -> Vec<Predicate> {
        self.type_class
            .map(|class| class.supported_predicates())
            .unwrap_or_default()
    }
}

impl fmt::Display for FieldDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_class {
            Some(class) => {
                let predicates: Vec<&str> = self.predicates().iter().map(|p| p.as_str()).collect();
                write!(
                    f,
                    "{:<16} {:<16} {}",
                    self.name,
                    class.as_str(),
                    predicates.join(", ")
                )
            }
            None => write!(f, "{:<16} unsupported ({})", self.name, self.declared),
        }
    }
}

pub fn describe<T: TelemetryRecord>() -> Vec<FieldDescription> {
    T::fields()
        .iter()
        .map(|field| {
            let type_class = field.accessor.type_class();
            let declared = match field.accessor {
                FieldAccessor::Unsupported(declared) => declared,
                _ => type_class.map(|c| c.as_str()).unwrap_or_default(),
            };
            FieldDescription {
                name: field.name,
                type_class,
                declared,
            }
        })
        .collect()
}
