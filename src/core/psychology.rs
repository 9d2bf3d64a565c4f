//! Psychology Engine: receptivity score → persona phase
//!
//! Phase bands (score strictly above the threshold):
//! - CONSUMER:  0-30
//! - FRICTION:  31-55
//! - REVEAL:    56-80
//! - SOVEREIGN: 81-100
//!
//! The score drifts up by a fixed step after every completed exchange.
//! Manual override writes fields verbatim and may leave phase and score
//! out of step until the next drift.

use crate::{
    BOOST_STEP, DRIFT_STEP, SCORE_MAX,
    SCORE_THRESHOLD_FRICTION, SCORE_THRESHOLD_REVEAL, SCORE_THRESHOLD_SOVEREIGN,
};
use crate::types::{EventCode, Phase, Psychology, PsychologyPatch, Transition};

/// Derive the phase selected by a score
pub fn derive_phase(score: u8) -> Phase {
    if score > SCORE_THRESHOLD_SOVEREIGN {
        Phase::Sovereign
    } else if score > SCORE_THRESHOLD_REVEAL {
        Phase::Reveal
    } else if score > SCORE_THRESHOLD_FRICTION {
        Phase::Friction
    } else {
        Phase::Consumer
    }
}

/// Operator shortcuts exposed next to the raw override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// +10 score, clamped, phase derived from the new score
    Boost,
    /// REVEAL at score 60
    RedPill,
    /// SOVEREIGN at score 90
    Sovereign,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Preset> {
        match name.trim().to_ascii_lowercase().as_str() {
            "boost" | "+10" => Some(Preset::Boost),
            "red-pill" | "redpill" | "reveal" => Some(Preset::RedPill),
            "sovereign" => Some(Preset::Sovereign),
            _ => None,
        }
    }

    /// Patch this preset applies on top of the current psychology
    pub fn patch(&self, current: &Psychology) -> PsychologyPatch {
        match self {
            Preset::Boost => {
                let score = (current.receptivity_score as i16 + BOOST_STEP)
                    .clamp(0, SCORE_MAX as i16) as u8;
                PsychologyPatch::score_and_phase(score, derive_phase(score))
            }
            Preset::RedPill => PsychologyPatch::score_and_phase(60, Phase::Reveal),
            Preset::Sovereign => PsychologyPatch::score_and_phase(90, Phase::Sovereign),
        }
    }
}

/// Psychology state machine engine
#[derive(Debug, Default)]
pub struct PsychologyEngine {
    psychology: Psychology,
    /// Number of drift steps applied
    advance_count: u64,
}

impl PsychologyEngine {
    /// Create new engine at the initial psychology
    pub fn new() -> Self {
        Self {
            psychology: Psychology::INITIAL,
            advance_count: 0,
        }
    }

    /// Drift after a completed exchange
    pub fn advance(&mut self) -> Transition {
        let previous = self.psychology;

        if previous.receptivity_score >= SCORE_MAX {
            return Transition::new(previous, previous, EventCode::SCORE_SATURATED);
        }

        let score = previous.receptivity_score.saturating_add(DRIFT_STEP).min(SCORE_MAX);
        self.psychology = Psychology {
            receptivity_score: score,
            current_phase: derive_phase(score),
            ..previous
        };
        self.advance_count += 1;

        let reason = if self.psychology.current_phase != previous.current_phase {
            EventCode::PHASE_SHIFT_DETECTED
        } else {
            EventCode::SCORE_DRIFT
        };
        Transition::new(previous, self.psychology, reason)
    }

    /// Apply a manual patch without re-deriving the phase
    pub fn apply_override(&mut self, patch: &PsychologyPatch) -> Transition {
        let previous = self.psychology;
        self.psychology = previous.merged(patch);
        Transition::new(previous, self.psychology, EventCode::MANUAL_OVERRIDE_EXECUTED)
    }

    /// Apply an operator preset; returns the patch used and the transition
    pub fn apply_preset(&mut self, preset: Preset) -> (PsychologyPatch, Transition) {
        let patch = preset.patch(&self.psychology);
        let transition = self.apply_override(&patch);
        (patch, transition)
    }

    /// Get current psychology
    pub fn psychology(&self) -> Psychology {
        self.psychology
    }

    pub fn phase(&self) -> Phase {
        self.psychology.current_phase
    }

    pub fn score(&self) -> u8 {
        self.psychology.receptivity_score
    }

    pub fn advance_count(&self) -> u64 {
        self.advance_count
    }

    /// Reset engine to initial psychology
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TESTS
// =============================================================================
