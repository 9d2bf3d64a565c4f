//! Sovereign: phase-shifting shopping assistant engine
//!
//! Session → ResponseComposer → GenerationService → PsychologyEngine,
//! with a static fallback script when generation fails.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Result, SovereignError};

// =============================================================================
// PHASE THRESHOLDS - score strictly above the value enters the phase
// =============================================================================

/// Score threshold for SOVEREIGN
pub const SCORE_THRESHOLD_SOVEREIGN: u8 = 80;

/// Score threshold for REVEAL
pub const SCORE_THRESHOLD_REVEAL: u8 = 55;

/// Score threshold for FRICTION
pub const SCORE_THRESHOLD_FRICTION: u8 = 30;

/// Upper bound for receptivity and trust
pub const SCORE_MAX: u8 = 100;

// =============================================================================
// DRIFT
// =============================================================================

/// Score gained after every completed exchange
pub const DRIFT_STEP: u8 = 5;

/// Score gained by the "boost" operator preset
pub const BOOST_STEP: i16 = 10;

/// Initial psychology values
pub const INITIAL_SCORE: u8 = 10;
pub const INITIAL_TRUST: u8 = 50;

// =============================================================================
// RESPONSE CONTRACT
// =============================================================================

/// Separator between answer and follow-up suggestions
pub const SUGGESTION_SEPARATOR: &str = "___SUGGESTIONS___";

/// Maximum follow-up suggestions kept per reply
pub const MAX_SUGGESTIONS: usize = 3;

/// Maximum citation sources kept per reply
pub const MAX_SOURCES: usize = 4;

/// Suggestions used when the model omits the separator
pub const DEFAULT_SUGGESTIONS: [&str; 3] =
    ["Tell me more", "Check alternatives", "Why is this important?"];

/// Product key used when a product has no fallback profile
pub const DEFAULT_PRODUCT: &str = "default";

/// Shared secret for the shadow monitor
pub const DEFAULT_PASSCODE: &str = "6211047";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
