//! JSON-lines record filtering
//!
//! Reads one telemetry document per line, evaluates a compiled filter against
//! it and echoes matching lines unchanged.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::core::config::MalformedPolicy;
use crate::domain::filtering::{Filter, FilterInfo, TelemetryRecord};
use crate::domain::telemetry::{
    DependencyTelemetry, EventTelemetry, ExceptionTelemetry, MetricTelemetry, RequestTelemetry,
    TelemetryKind, TraceTelemetry,
};

/// Counters for a single filtering run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Non-blank lines read
    pub total: usize,
    /// Lines written to the output
    pub matched: usize,
    /// Records whose field value could not be interpreted
    pub malformed: usize,
}

/// Compile `info` for the document type `kind` and filter `input` into `output`
pub fn filter_records<R: BufRead, W: Write>(
    kind: TelemetryKind,
    info: &FilterInfo,
    input: R,
    output: W,
    policy: MalformedPolicy,
) -> Result<FilterSummary> {
    match kind {
        TelemetryKind::Request => run::<RequestTelemetry, _, _>(info, input, output, policy),
        TelemetryKind::Dependency => run::<DependencyTelemetry, _, _>(info, input, output, policy),
        TelemetryKind::Exception => run::<ExceptionTelemetry, _, _>(info, input, output, policy),
        TelemetryKind::Event => run::<EventTelemetry, _, _>(info, input, output, policy),
        TelemetryKind::Trace => run::<TraceTelemetry, _, _>(info, input, output, policy),
        TelemetryKind::Metric => run::<MetricTelemetry, _, _>(info, input, output, policy),
    }
}

fn run<T, R, W>(
    info: &FilterInfo,
    input: R,
    output: W,
    policy: MalformedPolicy,
) -> Result<FilterSummary>
where
    T: TelemetryRecord + DeserializeOwned,
    R: BufRead,
    W: Write,
{
    let filter = Filter::<T>::new(info).context("Invalid filter rule")?;
    filter_lines(&filter, input, output, policy)
}

/// Filter JSON-lines `input` with an already compiled filter
pub fn filter_lines<T, R, W>(
    filter: &Filter<T>,
    input: R,
    mut output: W,
    policy: MalformedPolicy,
) -> Result<FilterSummary>
where
    T: TelemetryRecord + DeserializeOwned,
    R: BufRead,
    W: Write,
{
    let mut summary = FilterSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read input line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }
        summary.total += 1;

        let record: T = serde_json::from_str(&line).with_context(|| {
            format!("Line {}: not a valid {} document", line_no, T::record_type())
        })?;

        let keep = match filter.check(&record) {
            Ok(matched) => matched,
            Err(e) if e.is_evaluation_error() => {
                summary.malformed += 1;
                match policy {
                    MalformedPolicy::Fail => {
                        return Err(e).with_context(|| format!("Line {}", line_no));
                    }
                    MalformedPolicy::Skip => {
                        tracing::warn!(line = line_no, error = %e, "Skipping record");
                        false
                    }
                    MalformedPolicy::Keep => {
                        tracing::warn!(line = line_no, error = %e, "Keeping record");
                        true
                    }
                }
            }
            Err(e) => return Err(e.into()),
        };

        if keep {
            writeln!(output, "{}", line).context("Failed to write output")?;
            summary.matched += 1;
        }
    }

    output.flush().context("Failed to flush output")?;
    tracing::debug!(
        total = summary.total,
        matched = summary.matched,
        malformed = summary.malformed,
        "Filtering finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::domain::filtering::{FilterError, Predicate};

    const REQUESTS: &str = r#"{"name": "GET /api/users", "responseCode": "200", "success": true, "duration": "00:00:00.120"}
{"name": "GET /health", "responseCode": "200", "success": true}

{"name": "POST /api/orders", "responseCode": "503", "success": false, "duration": "00:00:02.5"}
{"name": "GET /legacy", "responseCode": "n/a"}
"#;

    fn run_filter(
        info: &FilterInfo,
        input: &str,
        policy: MalformedPolicy,
    ) -> Result<(FilterSummary, String)> {
        let mut output = Vec::new();
        let summary = filter_records(
            TelemetryKind::Request,
            info,
            Cursor::new(input),
            &mut output,
            policy,
        )?;
        Ok((summary, String::from_utf8(output).unwrap()))
    }

    #[test]
    fn test_contains_echoes_matching_lines() {
        let info = FilterInfo::new("Name", Predicate::Contains, "API");
        let (summary, output) = run_filter(&info, REQUESTS, MalformedPolicy::Fail).unwrap();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.matched, 2);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("GET /api/users"));
        assert!(lines[1].contains("POST /api/orders"));
    }

    #[test]
    fn test_duration_ordering() {
        let info = FilterInfo::new("Duration", Predicate::GreaterThan, "00:00:01");
        let (summary, output) = run_filter(&info, REQUESTS, MalformedPolicy::Fail).unwrap();
        assert_eq!(summary.matched, 1);
        assert!(output.contains("POST /api/orders"));
    }

    #[test]
    fn test_nullable_success_null_matches_absent() {
        let info = FilterInfo::new("Success", Predicate::Equal, "null");
        let (summary, output) = run_filter(&info, REQUESTS, MalformedPolicy::Fail).unwrap();
        assert_eq!(summary.matched, 1);
        assert!(output.contains("GET /legacy"));
    }

    #[test]
    fn test_malformed_value_fails_by_default() {
        let info = FilterInfo::new("ResponseCode", Predicate::GreaterThanOrEqual, "500");
        let err = run_filter(&info, REQUESTS, MalformedPolicy::Fail).unwrap_err();

        assert!(err.to_string().contains("Line 5"));
        let cause = err.downcast_ref::<FilterError>().unwrap();
        assert!(cause.is_evaluation_error());
    }

    #[test]
    fn test_malformed_value_skip_and_keep() {
        let info = FilterInfo::new("ResponseCode", Predicate::GreaterThanOrEqual, "500");

        let (skipped, output) = run_filter(&info, REQUESTS, MalformedPolicy::Skip).unwrap();
        assert_eq!(skipped.matched, 1);
        assert_eq!(skipped.malformed, 1);
        assert!(!output.contains("GET /legacy"));

        let (kept, output) = run_filter(&info, REQUESTS, MalformedPolicy::Keep).unwrap();
        assert_eq!(kept.matched, 2);
        assert_eq!(kept.malformed, 1);
        assert!(output.contains("GET /legacy"));
    }

    #[test]
    fn test_invalid_rule_rejected_before_reading() {
        let info = FilterInfo::new("Bogus", Predicate::Equal, "x");
        let err = run_filter(&info, "not json\n", MalformedPolicy::Fail).unwrap_err();

        assert!(err.to_string().contains("Invalid filter rule"));
        assert!(matches!(
            err.downcast_ref::<FilterError>(),
            Some(FilterError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_json_reports_line() {
        let info = FilterInfo::new("Name", Predicate::Equal, "x");
        let input = "{\"name\": \"x\"}\n{broken\n";
        let err = run_filter(&info, input, MalformedPolicy::Skip).unwrap_err();
        assert!(err.to_string().contains("Line 2: not a valid RequestTelemetry document"));
    }

    #[test]
    fn test_other_kinds_dispatch() {
        let info = FilterInfo::new("SeverityLevel", Predicate::GreaterThanOrEqual, "3");
        let input = "{\"message\": \"disk full\", \"severityLevel\": 4}\n{\"message\": \"ok\", \"severityLevel\": 1}\n";
        let mut output = Vec::new();
        let summary = filter_records(
            TelemetryKind::Trace,
            &info,
            Cursor::new(input),
            &mut output,
            MalformedPolicy::Fail,
        )
        .unwrap();
        assert_eq!(summary.matched, 1);
        assert!(String::from_utf8(output).unwrap().contains("disk full"));
    }
}
