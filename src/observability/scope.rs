//! Begin/complete logging around a unit of work
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` with `elapsed_ms` when completed
//! - `{name}_FAILED` when failed
//! - `{name}_INCOMPLETE` if dropped without either

use std::fmt;
use std::time::Instant;

use super::logger::{Logger, Severity};

/// Logs the lifecycle of a startup step such as loading the schema
///
/// ```ignore
/// let scope = ObservationScope::new("SCHEMA_LOAD").field("path", "schema.json");
/// let schema = loader.load()?;
/// scope.complete();
/// ```
pub struct ObservationScope {
    name: &'static str,
    started: Instant,
    completed: bool,
    fields: Vec<(&'static str, String)>,
}

impl ObservationScope {
    /// Open a scope. Logs `{name}_BEGIN` immediately.
    pub fn new(name: &'static str) -> Self {
        Logger::info(format!("{}_BEGIN", name)).emit();

        Self {
            name,
            started: Instant::now(),
            completed: false,
            fields: Vec::new(),
        }
    }

    /// Attach a field carried on the closing line
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn complete(mut self) {
        self.completed = true;
        self.close("COMPLETE", Severity::Info, None);
    }

    /// Logs `{name}_FAILED` at ERROR with the reason
    pub fn fail(mut self, reason: impl fmt::Display) {
        self.completed = true;
        self.close("FAILED", Severity::Error, Some(reason.to_string()));
    }

    /// Elapsed time since the scope opened, in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    fn close(&self, suffix: &str, severity: Severity, reason: Option<String>) {
        let mut line = Logger::line(severity, format!("{}_{}", self.name, suffix))
            .field("elapsed_ms", self.elapsed_ms());
        for (key, value) in &self.fields {
            line = line.field(*key, value);
        }
        if let Some(reason) = reason {
            line = line.field("reason", reason);
        }
        line.emit();
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.completed {
            self.close(
                "INCOMPLETE",
                Severity::Warn,
                Some("scope dropped without completion".to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::new("TEST").field("path", "/tmp/schema.json");
        scope.complete();
    }

    #[test]
    fn test_scope_fail() {
        let scope = ObservationScope::new("TEST");
        scope.fail("something went wrong");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        drop(scope);
    }

    #[test]
    fn test_elapsed() {
        let scope = ObservationScope::new("TEST");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(scope.elapsed_ms() >= 10);
        scope.complete();
    }
}
