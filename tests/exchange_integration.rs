//! Integration tests for the exchange path
//!
//! Tests the full path: text → Session → ResponseComposer → service → drift

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use sovereign::core::{
    Generation, GenerationRequest, GenerationService, Preset, ResponseComposer, Session,
};
use sovereign::types::{LogType, Phase, ReplyOrigin, Sender, Source};
use sovereign::{Result, SovereignError, DEFAULT_SUGGESTIONS};

/// Always answers with the same text and citations
struct Scripted(&'static str, Vec<Source>);

#[async_trait]
impl GenerationService for Scripted {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Generation> {
        Ok(Generation {
            text: self.0.to_string(),
            citations: self.1.clone(),
        })
    }

    fn label(&self) -> String {
        "scripted".to_string()
    }
}

/// Always rejects with a server error
struct Failing;

#[async_trait]
impl GenerationService for Failing {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Generation> {
        Err(SovereignError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })
    }

    fn label(&self) -> String {
        "failing".to_string()
    }
}

fn scripted() -> ResponseComposer {
    ResponseComposer::new(Arc::new(Scripted(
        "Phase 1: The iPhone is a great buy!\n___SUGGESTIONS___\nBuy now\nCompare models\n",
        vec![
            Source::new("Apple", "https://apple.example"),
            Source::new("Apple again", "https://apple.example"),
            Source::new("Review", "https://review.example"),
        ],
    )))
}

fn messages(session: &Session) -> Vec<String> {
    session.log().entries().iter().map(|e| e.message.clone()).collect()
}

#[tokio::test]
async fn test_live_exchange_log_sequence() {
    let mut session = Session::default();
    let output = session.exchange(&scripted(), "Is the iPhone worth it?").await;

    assert_eq!(
        messages(&session),
        vec![
            "SYSTEM_ONLINE",
            "INCOMING_MESSAGE_RECEIVED",
            "CONTEXT_LOCKED",
            "INITIATING DEEP WEB SCAN",
            "Connecting to Global Neural Network...",
            "Scraping Real-Time Market Data...",
            "Tracing iphone Supply Chain...",
            "Synthesizing Truth Layer...",
            "GENERATION_COMPLETE",
        ]
    );
    let entries = session.log().entries();
    assert_eq!(entries[1].details.as_deref(), Some("Is the iPhone worth ..."));
    assert_eq!(entries[2].details.as_deref(), Some("Target: IPHONE"));
    assert_eq!(entries[8].details.as_deref(), Some("Model: scripted"));
    assert_eq!(session.log().count(LogType::Critical), 0);

    assert!(!output.fallback);
    assert_eq!(output.message.text, "The iPhone is a great buy!");
    assert_eq!(output.message.suggestions, vec!["Buy now", "Compare models"]);
    assert_eq!(
        output.message.sources,
        vec![
            Source::new("Apple", "https://apple.example"),
            Source::new("Review", "https://review.example"),
        ]
    );
    assert_eq!(output.psychology.receptivity_score, 15);
}

#[tokio::test]
async fn test_failed_generation_falls_back() {
    let composer = ResponseComposer::new(Arc::new(Failing));
    let mut session = Session::default();
    let output = session.exchange(&composer, "cheap shoes").await;

    assert!(output.fallback);
    assert_eq!(output.message.sender, Sender::Agent);
    assert_eq!(
        output.message.suggestions,
        vec!["Buy at Foot Locker", "Check size guide", "See colorways"]
    );

    let names = messages(&session);
    let failure = names.iter().position(|m| m == "NEURAL_LINK_FAILURE").unwrap();
    let complete = names.iter().position(|m| m == "GENERATION_COMPLETE").unwrap();
    assert!(failure < complete);
    assert_eq!(session.log().count(LogType::Critical), 1);
}

/// Replies are tagged with the phase they were composed under
#[tokio::test]
async fn test_phase_shift_after_fifth_exchange() {
    let composer = scripted();
    let mut session = Session::default();

    for _ in 0..5 {
        session.exchange(&composer, "tell me about apple").await;
    }
    assert_eq!(session.psychology().receptivity_score, 35);
    assert_eq!(session.psychology().current_phase, Phase::Friction);
    assert_eq!(session.last_agent_phase(), Some(Phase::Consumer));

    let last = session.log().last().unwrap();
    assert_eq!(last.message, "PHASE SHIFT DETECTED");
    assert_eq!(last.kind, LogType::Critical);
    assert_eq!(last.details.as_deref(), Some("1 -> 2"));

    let output = session.exchange(&composer, "and the price?").await;
    assert_eq!(output.message.phase, Some(Phase::Friction));
}

#[tokio::test]
async fn test_missing_separator_uses_default_suggestions() {
    let composer = ResponseComposer::new(Arc::new(Scripted("Sovereign Agent: Just water.", vec![])));
    let mut session = Session::default();
    let output = session.exchange(&composer, "soda?").await;

    assert_eq!(output.message.text, "Just water.");
    assert_eq!(output.message.suggestions, DEFAULT_SUGGESTIONS.to_vec());
    assert!(output.message.sources.is_empty());
}

#[tokio::test]
async fn test_reset_clears_session() {
    let mut session = Session::default();
    session.unlock(sovereign::DEFAULT_PASSCODE);
    session.apply_preset(Preset::Sovereign);
    session.exchange(&scripted(), "iphone").await;

    session.reset();

    assert!(session.messages().is_empty());
    assert_eq!(session.active_product(), None);
    assert_eq!(session.psychology().receptivity_score, 10);
    assert_eq!(session.psychology().current_phase, Phase::Consumer);
    assert_eq!(messages(&session), vec!["SYSTEM_RESET_COMPLETE"]);
    assert!(session.is_unlocked());
}

#[tokio::test]
async fn test_live_origin_carries_label() {
    let composer = scripted();
    let mut session = Session::default();
    session.exchange(&composer, "hello").await;

    let report = session.shadow_report();
    assert_eq!(report.phase_title, "PHASE 1: CONSUMER PROXY");
    assert_eq!(report.logic_gate, "RESTRICTED");
    assert_eq!(report.active_product, None);

    let reply = composer
        .compose(&sovereign::core::ComposeRequest {
            query: "hello".to_string(),
            product: None,
            phase: Phase::Consumer,
            score: 10,
        })
        .await
        .unwrap();
    assert_eq!(reply.origin, ReplyOrigin::Live { service: "scripted".to_string() });
}
