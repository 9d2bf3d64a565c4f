//! Event codes for diagnostic entries and engine transitions

use serde::{Deserialize, Serialize};

use crate::types::LogType;

/// Event codes for every notable state change in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum EventCode {
    // =========================================================================
    // Session lifecycle
    // =========================================================================
    SYSTEM_ONLINE,
    SYSTEM_RESET_COMPLETE,

    // =========================================================================
    // Exchange
    // =========================================================================
    INCOMING_MESSAGE_RECEIVED,
    CONTEXT_LOCKED,
    DEEP_WEB_SCAN,
    GENERATION_COMPLETE,
    /// Generation service failed, local script used
    NEURAL_LINK_FAILURE,

    // =========================================================================
    // Psychology
    // =========================================================================
    /// Score drifted, phase unchanged
    SCORE_DRIFT,
    /// Score already at maximum, nothing changed
    SCORE_SATURATED,
    PHASE_SHIFT_DETECTED,
    MANUAL_OVERRIDE_EXECUTED,

    // =========================================================================
    // Access
    // =========================================================================
    SECURITY_OVERRIDE,
    AUTH_FAILURE,
}

impl EventCode {
    /// Code string as it appears in the diagnostic feed
    pub fn code(&self) -> &'static str {
        match self {
            Self::SYSTEM_ONLINE => "SYSTEM_ONLINE",
            Self::SYSTEM_RESET_COMPLETE => "SYSTEM_RESET_COMPLETE",
            Self::INCOMING_MESSAGE_RECEIVED => "INCOMING_MESSAGE_RECEIVED",
            Self::CONTEXT_LOCKED => "CONTEXT_LOCKED",
            Self::DEEP_WEB_SCAN => "INITIATING DEEP WEB SCAN",
            Self::GENERATION_COMPLETE => "GENERATION_COMPLETE",
            Self::NEURAL_LINK_FAILURE => "NEURAL_LINK_FAILURE",
            Self::SCORE_DRIFT => "SCORE_DRIFT",
            Self::SCORE_SATURATED => "SCORE_SATURATED",
            Self::PHASE_SHIFT_DETECTED => "PHASE SHIFT DETECTED",
            Self::MANUAL_OVERRIDE_EXECUTED => "MANUAL_OVERRIDE_EXECUTED",
            Self::SECURITY_OVERRIDE => "SECURITY_OVERRIDE",
            Self::AUTH_FAILURE => "AUTH_FAILURE",
        }
    }

    /// Severity the event is logged with
    pub fn level(&self) -> LogType {
        match self {
            Self::NEURAL_LINK_FAILURE
            | Self::PHASE_SHIFT_DETECTED
            | Self::MANUAL_OVERRIDE_EXECUTED
            | Self::AUTH_FAILURE => LogType::Critical,
            Self::SECURITY_OVERRIDE => LogType::Warn,
            Self::CONTEXT_LOCKED | Self::SCORE_DRIFT | Self::SCORE_SATURATED => LogType::Analysis,
            _ => LogType::Info,
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::SYSTEM_ONLINE => "Session started",
            Self::SYSTEM_RESET_COMPLETE => "Session reset",
            Self::INCOMING_MESSAGE_RECEIVED => "User message received",
            Self::CONTEXT_LOCKED => "Product context detected",
            Self::DEEP_WEB_SCAN => "Scan narration started",
            Self::GENERATION_COMPLETE => "Reply composed",
            Self::NEURAL_LINK_FAILURE => "Generation failed, local script used",
            Self::SCORE_DRIFT => "Receptivity increased",
            Self::SCORE_SATURATED => "Receptivity at maximum",
            Self::PHASE_SHIFT_DETECTED => "Persona phase changed",
            Self::MANUAL_OVERRIDE_EXECUTED => "Psychology overridden by operator",
            Self::SECURITY_OVERRIDE => "Shadow monitor unlocked",
            Self::AUTH_FAILURE => "Invalid passcode",
        }
    }
}

impl std::fmt::Display for EventCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
