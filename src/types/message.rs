//! Chat messages and composed replies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// A web citation used to ground an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

impl Source {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

/// Where a reply came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyOrigin {
    /// Generated by the named service
    Live { service: String },
    /// Canned text from the fallback table
    Fallback { product: String },
}

/// Answer, follow-ups and citations for one exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedReply {
    pub answer: String,
    pub suggestions: Vec<String>,
    pub sources: Vec<Source>,
    pub origin: ReplyOrigin,
}

impl ComposedReply {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, ReplyOrigin::Fallback { .. })
    }
}

/// One entry in the chat log; never mutated after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Phase that produced an agent message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            phase: None,
            suggestions: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn agent(reply: ComposedReply, phase: Phase) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Agent,
            text: reply.answer,
            timestamp: Utc::now(),
            phase: Some(phase),
            suggestions: reply.suggestions,
            sources: reply.sources,
        }
    }
}
