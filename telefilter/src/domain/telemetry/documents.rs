//! Telemetry document types
//!
//! Each document deserializes from camelCase JSON and exposes its fields under
//! their PascalCase names for filtering.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::domain::filtering::{Field, FieldAccessor, TelemetryRecord};
use crate::utils::time::deserialize_duration;

const TIMESTAMP: &str = "DateTime<Utc>";
const PROPERTIES: &str = "HashMap<String, String>";

// ============================================================================
// Request
// ============================================================================

/// Incoming request handled by the monitored service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestTelemetry {
    pub id: String,
    pub name: String,
    pub url: String,
    pub response_code: String,
    pub success: Option<bool>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: TimeDelta,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub properties: HashMap<String, String>,
}

static REQUEST_FIELDS: [Field<RequestTelemetry>; 9] = [
    Field::new("Id", FieldAccessor::String(|r| r.id.as_str())),
    Field::new("Name", FieldAccessor::String(|r| r.name.as_str())),
    Field::new("Url", FieldAccessor::String(|r| r.url.as_str())),
    Field::new(
        "ResponseCode",
        FieldAccessor::String(|r| r.response_code.as_str()),
    ),
    Field::new("Success", FieldAccessor::NullableBoolean(|r| r.success)),
    Field::new("Duration", FieldAccessor::Duration(|r| r.duration)),
    Field::new("Source", FieldAccessor::String(|r| r.source.as_str())),
    Field::new("Timestamp", FieldAccessor::Unsupported(TIMESTAMP)),
    Field::new("Properties", FieldAccessor::Unsupported(PROPERTIES)),
];

impl TelemetryRecord for RequestTelemetry {
    fn record_type() -> &'static str {
        "RequestTelemetry"
    }

    fn fields() -> &'static [Field<Self>] {
        &REQUEST_FIELDS
    }
}

// ============================================================================
// Dependency
// ============================================================================

/// Outgoing call made by the monitored service (HTTP, SQL, queue, ...)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyTelemetry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    pub data: String,
    pub result_code: String,
    pub success: Option<bool>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: TimeDelta,
    pub timestamp: DateTime<Utc>,
    pub properties: HashMap<String, String>,
}

static DEPENDENCY_FIELDS: [Field<DependencyTelemetry>; 10] = [
    Field::new("Id", FieldAccessor::String(|d| d.id.as_str())),
    Field::new("Name", FieldAccessor::String(|d| d.name.as_str())),
    Field::new("Type", FieldAccessor::String(|d| d.kind.as_str())),
    Field::new("Target", FieldAccessor::String(|d| d.target.as_str())),
    Field::new("Data", FieldAccessor::String(|d| d.data.as_str())),
    Field::new("ResultCode", FieldAccessor::String(|d| d.result_code.as_str())),
    Field::new("Success", FieldAccessor::NullableBoolean(|d| d.success)),
    Field::new("Duration", FieldAccessor::Duration(|d| d.duration)),
    Field::new("Timestamp", FieldAccessor::Unsupported(TIMESTAMP)),
    Field::new("Properties", FieldAccessor::Unsupported(PROPERTIES)),
];

impl TelemetryRecord for DependencyTelemetry {
    fn record_type() -> &'static str {
        "DependencyTelemetry"
    }

    fn fields() -> &'static [Field<Self>] {
        &DEPENDENCY_FIELDS
    }
}

// ============================================================================
// Exception
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExceptionTelemetry {
    pub message: String,
    pub exception_type: String,
    pub problem_id: String,
    pub handled: bool,
    pub timestamp: DateTime<Utc>,
    pub properties: HashMap<String, String>,
}

static EXCEPTION_FIELDS: [Field<ExceptionTelemetry>; 6] = [
    Field::new("Message", FieldAccessor::String(|e| e.message.as_str())),
    Field::new(
        "ExceptionType",
        FieldAccessor::String(|e| e.exception_type.as_str()),
    ),
    Field::new("ProblemId", FieldAccessor::String(|e| e.problem_id.as_str())),
    Field::new("Handled", FieldAccessor::Boolean(|e| e.handled)),
    Field::new("Timestamp", FieldAccessor::Unsupported(TIMESTAMP)),
    Field::new("Properties", FieldAccessor::Unsupported(PROPERTIES)),
];

impl TelemetryRecord for ExceptionTelemetry {
    fn record_type() -> &'static str {
        "ExceptionTelemetry"
    }

    fn fields() -> &'static [Field<Self>] {
        &EXCEPTION_FIELDS
    }
}

// ============================================================================
// Event
// ============================================================================

/// Custom business event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventTelemetry {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub properties: HashMap<String, String>,
}

static EVENT_FIELDS: [Field<EventTelemetry>; 3] = [
    Field::new("Name", FieldAccessor::String(|e| e.name.as_str())),
    Field::new("Timestamp", FieldAccessor::Unsupported(TIMESTAMP)),
    Field::new("Properties", FieldAccessor::Unsupported(PROPERTIES)),
];

impl TelemetryRecord for EventTelemetry {
    fn record_type() -> &'static str {
        "EventTelemetry"
    }

    fn fields() -> &'static [Field<Self>] {
        &EVENT_FIELDS
    }
}

// ============================================================================
// Trace
// ============================================================================

/// Log line; severity runs 0 (verbose) to 4 (critical)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraceTelemetry {
    pub message: String,
    pub severity_level: i64,
    pub timestamp: DateTime<Utc>,
    pub properties: HashMap<String, String>,
}

static TRACE_FIELDS: [Field<TraceTelemetry>; 4] = [
    Field::new("Message", FieldAccessor::String(|t| t.message.as_str())),
    Field::new("SeverityLevel", FieldAccessor::Integer(|t| t.severity_level)),
    Field::new("Timestamp", FieldAccessor::Unsupported(TIMESTAMP)),
    Field::new("Properties", FieldAccessor::Unsupported(PROPERTIES)),
];

impl TelemetryRecord for TraceTelemetry {
    fn record_type() -> &'static str {
        "TraceTelemetry"
    }

    fn fields() -> &'static [Field<Self>] {
        &TRACE_FIELDS
    }
}

// ============================================================================
// Metric
// ============================================================================

/// Pre-aggregated metric sample
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricTelemetry {
    pub name: String,
    pub value: f64,
    pub count: i64,
    pub timestamp: DateTime<Utc>,
    pub properties: HashMap<String, String>,
}

static METRIC_FIELDS: [Field<MetricTelemetry>; 5] = [
    Field::new("Name", FieldAccessor::String(|m| m.name.as_str())),
    Field::new("Value", FieldAccessor::FloatingPoint(|m| m.value)),
    Field::new("Count", FieldAccessor::Integer(|m| m.count)),
    Field::new("Timestamp", FieldAccessor::Unsupported(TIMESTAMP)),
    Field::new("Properties", FieldAccessor::Unsupported(PROPERTIES)),
];

impl TelemetryRecord for MetricTelemetry {
    fn record_type() -> &'static str {
        "MetricTelemetry"
    }

    fn fields() -> &'static [Field<Self>] {
        &METRIC_FIELDS
    }
}
