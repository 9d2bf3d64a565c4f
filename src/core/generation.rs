//! Generation service boundary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Source;
use crate::{Result, SovereignError};

/// One request to a generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
    /// Ask the service to ground the answer with live web search
    pub web_search: bool,
}

/// Raw service output before parsing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    /// Grounding records as returned; may be incomplete or repeated
    pub citations: Vec<Source>,
}

/// A text generation backend
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation>;

    /// Label for logs, e.g. `gemini-3-pro-preview + search`
    fn label(&self) -> String;
}

/// Backend that always fails, forcing the local script
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineService;

#[async_trait]
impl GenerationService for OfflineService {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Generation> {
        Err(SovereignError::Offline)
    }

    fn label(&self) -> String {
        "offline".to_string()
    }
}
