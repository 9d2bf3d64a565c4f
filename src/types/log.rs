//! Diagnostic log feed for the shadow monitor

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::types::EventCode;

/// Capacity of the live subscriber channel
pub const LOG_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    Info,
    Warn,
    Critical,
    Analysis,
}

impl LogType {
    pub fn label(&self) -> &'static str {
        match self {
            LogType::Info => "INFO",
            LogType::Warn => "WARN",
            LogType::Critical => "CRITICAL",
            LogType::Analysis => "ANALYSIS",
        }
    }
}

impl std::fmt::Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: LogType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    pub fn new(kind: LogType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            kind,
            message: message.into(),
            details,
        }
    }

    /// Wall-clock time as shown on the monitor
    pub fn clock(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
    }

    pub fn to_parseable_string(&self) -> String {
        match &self.details {
            Some(details) => format!("[{}] {} {} | {}", self.clock(), self.kind, self.message, details),
            None => format!("[{}] {} {}", self.clock(), self.kind, self.message),
        }
    }
}

/// Append-only diagnostic trail with live subscribers
#[derive(Debug)]
pub struct DiagnosticLog {
    entries: Vec<LogEntry>,
    tx: broadcast::Sender<LogEntry>,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticLog {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(LOG_CHANNEL_CAPACITY);
        Self {
            entries: Vec::new(),
            tx,
        }
    }

    /// Append an entry and publish it to subscribers
    pub fn push(&mut self, kind: LogType, message: impl Into<String>, details: Option<String>) -> &LogEntry {
        let entry = LogEntry::new(kind, message, details);
        // No subscribers is the normal case
        let _ = self.tx.send(entry.clone());
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Append an event at its default severity
    pub fn event(&mut self, code: EventCode, details: Option<String>) -> &LogEntry {
        self.push(code.level(), code.code(), details)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: LogType) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }

    /// Drop all entries; subscribers stay connected
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
