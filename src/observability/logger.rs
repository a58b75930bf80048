//! Structured JSON logger
//!
//! - One log line = one JSON object = one event
//! - Key order: `ts`, `event`, `severity`, then fields sorted by key
//! - TRACE, INFO and WARN go to stdout, ERROR and FATAL to stderr
//! - Lines below the process-wide minimum severity are dropped
//!
//! Field values are rendered with `Display` and written as JSON strings.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{SecondsFormat, Utc};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// A log line under construction
#[must_use = "a LogLine does nothing until emitted"]
pub struct LogLine {
    severity: Severity,
    event: String,
    fields: Vec<(&'static str, String)>,
}

impl LogLine {
    /// Attach a field
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// Write the line to its stream
    pub fn emit(self) {
        if self.severity < Logger::min_severity() {
            return;
        }
        let line = self.render(&Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        if self.severity >= Severity::Error {
            write_line(&mut io::stderr().lock(), &line);
        } else {
            write_line(&mut io::stdout().lock(), &line);
        }
    }

    fn render(&self, ts: &str) -> String {
        let mut fields: Vec<&(&str, String)> = self.fields.iter().collect();
        fields.sort_by_key(|(k, _)| *k);

        let mut out = String::with_capacity(128);
        out.push('{');
        push_pair(&mut out, "ts", ts);
        out.push(',');
        push_pair(&mut out, "event", &self.event);
        out.push(',');
        push_pair(&mut out, "severity", self.severity.as_str());
        for (key, value) in fields {
            out.push(',');
            push_pair(&mut out, key, value);
        }
        out.push('}');
        out
    }
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(&json_string(key));
    out.push(':');
    out.push_str(&json_string(value));
}

fn json_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn write_line<W: Write>(writer: &mut W, line: &str) {
    // Logging must never take the process down.
    let _ = writeln!(writer, "{}", line);
    let _ = writer.flush();
}

/// Process-wide structured logger
pub struct Logger;

impl Logger {
    /// Set the minimum severity that is written
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    /// Returns the minimum severity that is written
    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Start a line for a lifecycle event at the event's own severity
    pub fn event(event: Event) -> LogLine {
        Self::line(event.severity(), event.as_str())
    }

    /// Start a line with an explicit severity
    pub fn line(severity: Severity, event: impl Into<String>) -> LogLine {
        LogLine {
            severity,
            event: event.into(),
            fields: Vec::new(),
        }
    }

    pub fn info(event: impl Into<String>) -> LogLine {
        Self::line(Severity::Info, event)
    }
}
