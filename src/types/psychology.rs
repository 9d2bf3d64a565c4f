//! Per-session psychology profile

use serde::{Deserialize, Serialize};

use crate::types::Phase;
use crate::{INITIAL_SCORE, INITIAL_TRUST, SCORE_MAX};

/// Receptivity, trust and the phase they currently select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Psychology {
    /// 0-100, drives the phase
    pub receptivity_score: u8,
    /// 0-100, tracked but not used by any rule
    pub trust_level: u8,
    pub current_phase: Phase,
}

impl Psychology {
    pub const INITIAL: Psychology = Psychology {
        receptivity_score: INITIAL_SCORE,
        trust_level: INITIAL_TRUST,
        current_phase: Phase::Consumer,
    };

    /// Merge patch fields verbatim; the phase is not re-derived
    pub fn merged(&self, patch: &PsychologyPatch) -> Psychology {
        Psychology {
            receptivity_score: patch
                .receptivity_score
                .map(|s| s.min(SCORE_MAX))
                .unwrap_or(self.receptivity_score),
            trust_level: patch
                .trust_level
                .map(|t| t.min(SCORE_MAX))
                .unwrap_or(self.trust_level),
            current_phase: patch.current_phase.unwrap_or(self.current_phase),
        }
    }
}

impl Default for Psychology {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Partial psychology used by manual override
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychologyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receptivity_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<Phase>,
}

impl PsychologyPatch {
    pub fn score_and_phase(score: u8, phase: Phase) -> Self {
        Self {
            receptivity_score: Some(score),
            trust_level: None,
            current_phase: Some(phase),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.receptivity_score.is_none() && self.trust_level.is_none() && self.current_phase.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values() {
        let p = Psychology::default();
        assert_eq!(p.receptivity_score, 10);
        assert_eq!(p.trust_level, 50);
        assert_eq!(p.current_phase, Phase::Consumer);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let patch = PsychologyPatch {
            trust_level: Some(80),
            ..Default::default()
        };
        let merged = Psychology::INITIAL.merged(&patch);
        assert_eq!(merged.trust_level, 80);
        assert_eq!(merged.receptivity_score, 10);
        assert_eq!(merged.current_phase, Phase::Consumer);
    }

    #[test]
    fn test_merge_clamps_to_range() {
        let patch = PsychologyPatch {
            receptivity_score: Some(250),
            ..Default::default()
        };
        assert_eq!(Psychology::INITIAL.merged(&patch).receptivity_score, 100);
    }

    #[test]
    fn test_patch_json_omits_unset() {
        let patch = PsychologyPatch::score_and_phase(60, Phase::Reveal);
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"receptivity_score":60,"current_phase":"REVEAL"}"#);
    }
}
