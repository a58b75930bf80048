//! Observability: structured logging, counters and step scopes
//!
//! Observability never changes request outcomes. A log write that fails is
//! dropped; metrics are plain atomics with no background threads.
//!
//! ```ignore
//! use formintake::observability::{Event, Logger, MetricsRegistry, ObservationScope};
//!
//! Logger::event(Event::SubmissionCreated).field("id", id).emit();
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_created();
//!
//! let scope = ObservationScope::new("SCHEMA_LOAD");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{LogLine, Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;
