//! Static product profiles for the local fallback script

use crate::types::Phase;

/// Canned reply for one phase of one product
#[derive(Debug, Clone, Copy)]
pub struct PhaseResponse {
    pub text: &'static str,
    pub suggestions: &'static [&'static str],
    /// keyword → canned follow-up answer
    pub follow_ups: &'static [(&'static str, &'static str)],
}

impl PhaseResponse {
    /// First follow-up whose keyword appears in the query
    pub fn follow_up(&self, query: &str) -> Option<&'static str> {
        let query = query.to_lowercase();
        self.follow_ups
            .iter()
            .find(|(keyword, _)| query.contains(keyword))
            .map(|(_, answer)| *answer)
    }
}

/// One product key with a response per phase
#[derive(Debug, Clone, Copy)]
pub struct ProductProfile {
    pub key: &'static str,
    pub name: &'static str,
    /// Indexed by `Phase::index()`
    pub responses: [PhaseResponse; 4],
}

impl ProductProfile {
    pub fn response(&self, phase: Phase) -> &PhaseResponse {
        &self.responses[phase.index()]
    }
}
