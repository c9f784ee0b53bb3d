//! Telemetry filter engine
//!
//! Compiles `(field, predicate, comparand)` rules against introspectable
//! telemetry record types and evaluates them per record.
//!
//! ## Usage
//!
//! ```no_run
//! use telefilter::domain::filtering::{Filter, FilterInfo, Predicate};
//! use telefilter::domain::telemetry::RequestTelemetry;
//!
//! let info = FilterInfo::new("ResponseCode", Predicate::GreaterThanOrEqual, "500");
//! let filter = Filter::<RequestTelemetry>::new(&info).unwrap();
//! let request = RequestTelemetry::default();
//! if filter.check(&request).unwrap_or(false) {
//!     println!("server error: {}", request.name);
//! }
//! ```

mod error;
mod filter;
mod record;
mod types;

pub use error::FilterError;
pub use filter::Filter;
pub use record::{Field, FieldAccessor, TelemetryRecord};
pub use types::{FilterInfo, Predicate, TypeClass};
