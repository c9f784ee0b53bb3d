//! Domain logic: the filter engine, the telemetry catalog and record filtering

pub mod filtering;
pub mod pipeline;
pub mod telemetry;
