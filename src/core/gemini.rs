//! Gemini `generateContent` client with Google Search grounding
//!
//! URL: `{base}/v1beta/models/{model}:generateContent`
//! Auth: `x-goog-api-key` header

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::core::generation::{Generation, GenerationRequest, GenerationService};
use crate::types::Source;
use crate::{Config, Result, SovereignError};

const API_VERSION: &str = "v1beta";

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    thinking_budget: u32,
}

impl GeminiClient {
    /// Build a client; fails without an API key
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            thinking_budget: config.thinking_budget,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}/models/{}:generateContent", self.base_url, API_VERSION, self.model)
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let body = request_body(request, self.thinking_budget);
        debug!(model = %self.model, "gemini generateContent");

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "gemini request rejected");
            return Err(SovereignError::Status {
                status: status.as_u16(),
                body: raw.trim().to_string(),
            });
        }

        parse_generate_response(&raw)
    }

    fn label(&self) -> String {
        format!("{} + Search", self.model)
    }
}

/// Compile a request into the Gemini JSON body
pub fn request_body(request: &GenerationRequest, thinking_budget: u32) -> Value {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }],
        "systemInstruction": {
            "parts": [{ "text": request.system_instruction }]
        },
        "generationConfig": {
            "thinkingConfig": { "thinkingBudget": thinking_budget }
        }
    });
    if request.web_search {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    body
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    /// Thought summaries are not part of the answer
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

/// Parse a `generateContent` response body
pub fn parse_generate_response(raw: &str) -> Result<Generation> {
    let resp: GenerateContentResponse = serde_json::from_str(raw)
        .map_err(|e| SovereignError::MalformedResponse(e.to_string()))?;

    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| SovereignError::MalformedResponse("no candidates".to_string()))?;

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let citations = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .map(|web| Source {
                    title: web.title.unwrap_or_default(),
                    uri: web.uri.unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Generation { text, citations })
}
