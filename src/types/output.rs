//! Output structures for engine transitions and exchanges

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{EventCode, Message, Phase, Psychology};

/// Result of one psychology engine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub previous: Psychology,
    pub current: Psychology,
    pub reason: EventCode,
}

impl Transition {
    pub fn new(previous: Psychology, current: Psychology, reason: EventCode) -> Self {
        Self { previous, current, reason }
    }

    pub fn phase_shifted(&self) -> bool {
        self.previous.current_phase != self.current.current_phase
    }

    /// Details line for a phase shift entry, e.g. `2 -> 3`
    pub fn shift_details(&self) -> String {
        format!(
            "{} -> {}",
            self.previous.current_phase.number(),
            self.current.current_phase.number()
        )
    }
}

/// Output of one completed exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// The agent message appended to the log
    pub message: Message,
    /// Phase the reply was composed under
    pub phase: Phase,
    /// Psychology after the drift step
    pub psychology: Psychology,
    /// Drift outcome
    pub reason: EventCode,
    /// Was the local script used?
    pub fallback: bool,
}

impl ExchangeOutput {
    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let line = format!(
            "[{}] score={} -> {} | {}",
            self.phase,
            self.psychology.receptivity_score,
            self.psychology.current_phase,
            self.reason
        );
        self.phase.paint(&line).to_string()
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "phase={} | score={} | next={} | fallback={} | reason={}",
            self.phase,
            self.psychology.receptivity_score,
            self.psychology.current_phase,
            self.fallback,
            self.reason.code()
        )
    }
}
