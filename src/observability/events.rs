//! Observable events
//!
//! Every lifecycle and request outcome the service logs is a variant here,
//! so event names stay stable and greppable.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file read and checked
    ConfigLoaded,
    /// Form schema loaded and integrity-checked
    SchemaLoaded,
    /// Schema failed to load; the process exits
    SchemaLoadFailed,
    /// Submission store opened
    StoreOpened,
    /// Listener bound, serving requests
    ServerReady,
    /// Server stopped accepting requests
    ServerStopped,

    // Submissions
    /// Submission validated and stored
    SubmissionCreated,
    /// Submission data replaced
    SubmissionUpdated,
    /// Submission removed
    SubmissionDeleted,
    /// Payload failed validation; nothing stored
    SubmissionRejected,
    /// Repository fault while serving a request
    StoreFailed,
}

impl Event {
    /// Returns the event name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaLoadFailed => "SCHEMA_LOAD_FAILED",
            Event::StoreOpened => "STORE_OPENED",
            Event::ServerReady => "SERVER_READY",
            Event::ServerStopped => "SERVER_STOPPED",
            Event::SubmissionCreated => "SUBMISSION_CREATED",
            Event::SubmissionUpdated => "SUBMISSION_UPDATED",
            Event::SubmissionDeleted => "SUBMISSION_DELETED",
            Event::SubmissionRejected => "SUBMISSION_REJECTED",
            Event::StoreFailed => "STORE_FAILED",
        }
    }

    /// Returns the severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaLoadFailed => Severity::Fatal,
            Event::StoreFailed => Severity::Error,
            Event::SubmissionRejected => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
