//! Response Composer: query + phase → answer, suggestions, sources
//!
//! `compose` returns the live result or the service error; `recover`
//! substitutes the canned script and records the failure.

use std::sync::Arc;

use tracing::{error, info};

use crate::core::fallback::canned_reply;
use crate::core::generation::{GenerationRequest, GenerationService};
use crate::core::prompt::system_instruction;
use crate::core::response_parser::ResponseParser;
use crate::types::{ComposedReply, DiagnosticLog, EventCode, Phase, ReplyOrigin};
use crate::{Result, SovereignError};

/// Inputs for one composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRequest {
    pub query: String,
    pub product: Option<String>,
    pub phase: Phase,
    pub score: u8,
}

pub struct ResponseComposer {
    service: Arc<dyn GenerationService>,
    parser: ResponseParser,
}

impl ResponseComposer {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            service,
            parser: ResponseParser::new(),
        }
    }

    pub fn service_label(&self) -> String {
        self.service.label()
    }

    /// Shape the service request for a phase
    pub fn build_request(&self, request: &ComposeRequest) -> GenerationRequest {
        GenerationRequest {
            system_instruction: system_instruction(request.phase, request.score),
            prompt: request.query.clone(),
            web_search: true,
        }
    }

    /// One attempt against the service, no fallback
    pub async fn compose(&self, request: &ComposeRequest) -> Result<ComposedReply> {
        let generation = self.service.generate(&self.build_request(request)).await?;
        let parsed = self.parser.parse(&generation.text, &generation.citations);
        info!(
            phase = %request.phase,
            suggestions = parsed.suggestions.len(),
            sources = parsed.sources.len(),
            "reply composed"
        );
        Ok(ComposedReply {
            answer: parsed.answer,
            suggestions: parsed.suggestions,
            sources: parsed.sources,
            origin: ReplyOrigin::Live {
                service: self.service.label(),
            },
        })
    }

    /// Compose, substituting the local script on failure
    pub async fn compose_or_fallback(&self, request: &ComposeRequest, log: &mut DiagnosticLog) -> ComposedReply {
        match self.compose(request).await {
            Ok(reply) => reply,
            Err(err) => recover(&err, request, log),
        }
    }
}

/// Record a generation failure and return the canned reply
pub fn recover(err: &SovereignError, request: &ComposeRequest, log: &mut DiagnosticLog) -> ComposedReply {
    error!(error = %err, "generation failed, using local script");
    log.event(
        EventCode::NEURAL_LINK_FAILURE,
        Some("Falling back to local cache".to_string()),
    );
    canned_reply(request.product.as_deref(), request.phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generation::{Generation, OfflineService};
    use crate::types::{LogType, Source};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Returns a fixed generation and remembers the last request
    struct Scripted {
        generation: Generation,
        seen: Mutex<Option<GenerationRequest>>,
    }

    #[async_trait]
    impl GenerationService for Scripted {
        async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(self.generation.clone())
        }

        fn label(&self) -> String {
            "scripted".to_string()
        }
    }

    fn request(product: Option<&str>, phase: Phase) -> ComposeRequest {
        ComposeRequest {
            query: "Is coke worth it?".to_string(),
            product: product.map(String::from),
            phase,
            score: 40,
        }
    }

    #[tokio::test]
    async fn test_live_reply_is_parsed() {
        let service = Arc::new(Scripted {
            generation: Generation {
                text: "Phase 2: Cheap but costly.\n___SUGGESTIONS___\nWhy?\n\nHow much?\n".to_string(),
                citations: vec![Source::new("A", "u1"), Source::new("B", "u1")],
            },
            seen: Mutex::new(None),
        });
        let composer = ResponseComposer::new(service.clone());
        let reply = composer.compose(&request(Some("coke"), Phase::Friction)).await.unwrap();

        assert_eq!(reply.answer, "Cheap but costly.");
        assert_eq!(reply.suggestions, vec!["Why?", "How much?"]);
        assert_eq!(reply.sources, vec![Source::new("A", "u1")]);
        assert_eq!(reply.origin, ReplyOrigin::Live { service: "scripted".into() });

        let seen = service.seen.lock().unwrap().clone().unwrap();
        assert!(seen.web_search);
        assert_eq!(seen.prompt, "Is coke worth it?");
        assert!(seen.system_instruction.contains("Role: Friction Engine"));
        assert!(seen.system_instruction.contains("Receptivity Score: 40/100"));
    }

    #[tokio::test]
    async fn test_compose_surfaces_error() {
        let composer = ResponseComposer::new(Arc::new(OfflineService));
        let result = composer.compose(&request(None, Phase::Consumer)).await;
        assert!(matches!(result, Err(SovereignError::Offline)));
    }

    #[tokio::test]
    async fn test_fallback_uses_canned_script() {
        let composer = ResponseComposer::new(Arc::new(OfflineService));
        let mut log = DiagnosticLog::new();
        let reply = composer
            .compose_or_fallback(&request(Some("coke"), Phase::Friction), &mut log)
            .await;

        assert_eq!(
            reply.answer,
            "It is cheap, but consider the biological tax. Aspartame spikes insulin response in 34% of subjects despite zero calories. Is the momentary fizz worth the metabolic confusion?"
        );
        assert_eq!(
            reply.suggestions,
            vec!["Show health studies", "Cost per year", "Water alternatives"]
        );
        assert!(reply.sources.is_empty());
        assert_eq!(log.len(), 1);
        assert_eq!(log.count(LogType::Critical), 1);
        assert_eq!(log.entries()[0].message, "NEURAL_LINK_FAILURE");
    }

    #[tokio::test]
    async fn test_fallback_unknown_product_uses_default() {
        let composer = ResponseComposer::new(Arc::new(OfflineService));
        let mut log = DiagnosticLog::new();
        let reply = composer
            .compose_or_fallback(&request(Some("kettle"), Phase::Reveal), &mut log)
            .await;
        assert!(reply.answer.starts_with("This product category is dominated"));
        assert_eq!(reply.origin, ReplyOrigin::Fallback { product: "default".into() });
    }
}
