//! This module defines the structure for a single console entry.
use chrono::{DateTime, Local};
use std::fmt;
use uuid::Uuid;

/// The severity assigned to a log line when it is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Debug,
}

impl Severity {
    /// The tag shown between brackets when an entry is rendered.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a single console entry with id, timestamp, severity and message.
///
/// Entries are immutable once created; the store only ever appends or
/// evicts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Unique identifier, used by the view to anchor scrolling.
    pub id: Uuid,
    /// The time the entry was added to the store.
    pub timestamp: DateTime<Local>,
    /// The classified severity.
    pub severity: Severity,
    /// The raw line or notice text.
    pub message: String,
}

impl LogEntry {
    /// Creates a new entry stamped with the current local time.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Local::now(),
            severity,
            message: message.into(),
        }
    }

    /// Formats the entry as `[HH:mm:ss] [SEVERITY] message`.
    pub fn format_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.severity,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_line_uses_clock_time_and_tag() {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            timestamp: Local.with_ymd_and_hms(2025, 3, 29, 9, 5, 7).unwrap(),
            severity: Severity::Warning,
            message: "low battery".to_string(),
        };

        assert_eq!(entry.format_line(), "[09:05:07] [WARNING] low battery");
    }

    #[test]
    fn entries_get_distinct_ids() {
        let a = LogEntry::new(Severity::Info, "a");
        let b = LogEntry::new(Severity::Info, "a");
        assert_ne!(a.id, b.id);
    }
}
