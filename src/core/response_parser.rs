//! Response parser: raw model text → answer, suggestions, sources
//!
//! The model is asked to answer first, then emit the separator line and up
//! to three follow-up questions. Identity leaks at the start of a line are
//! stripped from the answer.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use crate::{DEFAULT_SUGGESTIONS, MAX_SOURCES, MAX_SUGGESTIONS, SUGGESTION_SEPARATOR};
use crate::types::Source;

lazy_static! {
    // =========================================================================
    // Rule 1: "Phase 3: ..." / "phase 2 - ..."
    // =========================================================================
    static ref RE_PHASE_PREFIX: Regex = Regex::new(
        r"(?im)^Phase [0-9]\s?[-:]?\s?"
    ).unwrap();

    // =========================================================================
    // Rule 2: "Sovereign Agent - ..." / "The Sovereign Agent: ..."
    // =========================================================================
    static ref RE_IDENTITY_PREFIX: Regex = Regex::new(
        r"(?im)^(The )?Sovereign Agent\s?[-:]?\s?"
    ).unwrap();

    // =========================================================================
    // Rule 3: "Response: ..."
    // =========================================================================
    static ref RE_RESPONSE_PREFIX: Regex = Regex::new(
        r"(?im)^Response:\s?"
    ).unwrap();
}

/// Parsed model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub answer: String,
    pub suggestions: Vec<String>,
    pub sources: Vec<Source>,
}

/// Parser for raw generation output
#[derive(Debug, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Create new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse raw text and citation records
    pub fn parse(&self, raw: &str, citations: &[Source]) -> ParsedResponse {
        let mut parts = raw.split(SUGGESTION_SEPARATOR);
        let answer = parts.next().unwrap_or_default();
        let tail = parts.next();

        ParsedResponse {
            answer: self.strip_identity_leaks(answer.trim()),
            suggestions: self.extract_suggestions(tail),
            sources: self.dedupe_sources(citations),
        }
    }

    /// Remove leaked phase/identity/"Response:" prefixes
    pub fn strip_identity_leaks(&self, answer: &str) -> String {
        let text = RE_PHASE_PREFIX.replace(answer, "");
        let text = RE_IDENTITY_PREFIX.replace(&text, "");
        RE_RESPONSE_PREFIX.replace(&text, "").into_owned()
    }

    /// Follow-up lines after the separator, or the defaults
    pub fn extract_suggestions(&self, tail: Option<&str>) -> Vec<String> {
        match tail {
            Some(tail) if !tail.trim().is_empty() => tail
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .take(MAX_SUGGESTIONS)
                .map(String::from)
                .collect(),
            _ => default_suggestions(),
        }
    }

    /// Complete citations only, first occurrence per URI, capped
    pub fn dedupe_sources(&self, citations: &[Source]) -> Vec<Source> {
        let mut seen: HashSet<&str> = HashSet::new();
        citations
            .iter()
            .filter(|s| !s.title.is_empty() && !s.uri.is_empty())
            .filter(|s| seen.insert(s.uri.as_str()))
            .take(MAX_SOURCES)
            .cloned()
            .collect()
    }
}

pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// TESTS
// =============================================================================
