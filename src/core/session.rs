//! Session: one conversation's messages, diagnostics and psychology
//!
//! Exchange order:
//! 1. user message appended, product context detected
//! 2. scan narration and composition run concurrently
//! 3. failure recovered with the local script
//! 4. agent message appended, tagged with the pre-drift phase
//! 5. psychology drifts
//!
//! `begin_exchange` covers step 1 and `finish_exchange` steps 3-5, so a
//! caller can compose without holding the session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::composer::{recover, ComposeRequest, ResponseComposer};
use crate::core::fallback::{detect_product, profile_or_default};
use crate::core::narrator::ScanNarrator;
use crate::core::psychology::{PsychologyEngine, Preset};
use crate::types::{
    ComposedReply, DiagnosticLog, EventCode, ExchangeOutput, LogEntry, LogType, Message, Phase,
    Psychology, PsychologyPatch, Sender, Transition,
};
use crate::{Result, DEFAULT_PASSCODE};

/// Characters of user text echoed into the diagnostic feed
const ECHO_CHARS: usize = 20;

/// What the shadow monitor shows
#[derive(Debug, Clone, Serialize)]
pub struct ShadowReport {
    pub session_id: String,
    pub psychology: Psychology,
    pub phase_title: String,
    pub logic_gate: String,
    pub active_product: Option<String>,
    pub logs: Vec<LogEntry>,
}

#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    messages: Vec<Message>,
    log: DiagnosticLog,
    engine: PsychologyEngine,
    active_product: Option<String>,
    shadow_unlocked: bool,
    passcode: String,
    narrator: ScanNarrator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PASSCODE)
    }
}

impl Session {
    /// Start a session guarded by `passcode`
    pub fn new(passcode: impl Into<String>) -> Self {
        let mut log = DiagnosticLog::new();
        log.event(EventCode::SYSTEM_ONLINE, Some("Connection Secure".to_string()));
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
            log,
            engine: PsychologyEngine::new(),
            active_product: None,
            shadow_unlocked: false,
            passcode: passcode.into(),
            narrator: ScanNarrator::instant(),
        }
    }

    pub fn with_narrator(mut self, narrator: ScanNarrator) -> Self {
        self.narrator = narrator;
        self
    }

    /// Run one full exchange; never fails
    pub async fn exchange(&mut self, composer: &ResponseComposer, text: &str) -> ExchangeOutput {
        let request = self.begin_exchange(text);
        let narrator = self.narrator;
        let (_, outcome) = tokio::join!(
            narrator.run(&mut self.log, &request.query, request.product.as_deref()),
            composer.compose(&request),
        );
        self.finish_exchange(&request, outcome, &composer.service_label())
    }

    /// Record the user message and fix the request under the current phase
    pub fn begin_exchange(&mut self, text: &str) -> ComposeRequest {
        self.messages.push(Message::user(text));

        if let Some(product) = detect_product(text) {
            self.active_product = Some(product.to_string());
        }

        let echo: String = text.chars().take(ECHO_CHARS).collect();
        self.log.event(EventCode::INCOMING_MESSAGE_RECEIVED, Some(format!("{}...", echo)));
        if let Some(product) = &self.active_product {
            self.log.event(
                EventCode::CONTEXT_LOCKED,
                Some(format!("Target: {}", product.to_uppercase())),
            );
        }

        let psychology = self.engine.psychology();
        ComposeRequest {
            query: text.to_string(),
            product: self.active_product.clone(),
            phase: psychology.current_phase,
            score: psychology.receptivity_score,
        }
    }

    /// Append the reply composed for `request`, then drift
    pub fn finish_exchange(
        &mut self,
        request: &ComposeRequest,
        outcome: Result<ComposedReply>,
        service_label: &str,
    ) -> ExchangeOutput {
        let reply = match outcome {
            Ok(reply) => reply,
            Err(err) => recover(&err, request, &mut self.log),
        };
        let fallback = reply.is_fallback();

        self.log.event(
            EventCode::GENERATION_COMPLETE,
            Some(format!("Model: {}", service_label)),
        );

        let message = Message::agent(reply, request.phase);
        self.messages.push(message.clone());

        let transition = self.engine.advance();
        if transition.phase_shifted() {
            warn!(
                session = %self.id,
                from = %transition.previous.current_phase,
                to = %transition.current.current_phase,
                "phase shift"
            );
            self.log.event(EventCode::PHASE_SHIFT_DETECTED, Some(transition.shift_details()));
        }

        ExchangeOutput {
            timestamp: Utc::now(),
            message,
            phase: request.phase,
            psychology: transition.current,
            reason: transition.reason,
            fallback,
        }
    }

    /// Append a diagnostic entry
    pub fn record(&mut self, kind: LogType, message: impl Into<String>, details: Option<String>) {
        self.log.push(kind, message, details);
    }

    /// Apply a patch verbatim
    pub fn apply_override(&mut self, patch: &PsychologyPatch) -> Transition {
        let transition = self.engine.apply_override(patch);
        self.log_override(patch);
        transition
    }

    pub fn apply_preset(&mut self, preset: Preset) -> Transition {
        let (patch, transition) = self.engine.apply_preset(preset);
        self.log_override(&patch);
        transition
    }

    fn log_override(&mut self, patch: &PsychologyPatch) {
        let details = serde_json::to_string(patch).unwrap_or_default();
        info!(session = %self.id, patch = %details, "manual override");
        self.log.event(EventCode::MANUAL_OVERRIDE_EXECUTED, Some(details));
    }

    /// Clear messages, diagnostics and psychology
    pub fn reset(&mut self) {
        self.messages.clear();
        self.log.clear();
        self.engine.reset();
        self.active_product = None;
        info!(session = %self.id, "session reset");
        self.log.event(EventCode::SYSTEM_RESET_COMPLETE, None);
    }

    /// Check the shadow passcode; logs either outcome
    pub fn unlock(&mut self, passcode: &str) -> bool {
        if passcode == self.passcode {
            self.shadow_unlocked = true;
            self.log.event(
                EventCode::SECURITY_OVERRIDE,
                Some("Shadow Monitor Access Granted".to_string()),
            );
            true
        } else {
            warn!(session = %self.id, "shadow access denied");
            self.log.event(EventCode::AUTH_FAILURE, Some("Invalid Access Attempt".to_string()));
            false
        }
    }

    pub fn lock(&mut self) {
        self.shadow_unlocked = false;
    }

    pub fn is_unlocked(&self) -> bool {
        self.shadow_unlocked
    }

    /// Canned answer for a follow-up in the current context
    pub fn follow_up(&self, query: &str) -> Option<&'static str> {
        let phase = self.last_agent_phase().unwrap_or(self.engine.phase());
        profile_or_default(self.active_product.as_deref())
            .response(phase)
            .follow_up(query)
    }

    pub fn shadow_report(&self) -> ShadowReport {
        let psychology = self.engine.psychology();
        ShadowReport {
            session_id: self.id.clone(),
            psychology,
            phase_title: psychology.current_phase.panel_title().to_string(),
            logic_gate: psychology.current_phase.logic_gate().to_string(),
            active_product: self.active_product.clone(),
            logs: self.log.entries().to_vec(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn psychology(&self) -> Psychology {
        self.engine.psychology()
    }

    pub fn active_product(&self) -> Option<&str> {
        self.active_product.as_deref()
    }

    pub fn set_active_product(&mut self, product: Option<String>) {
        self.active_product = product;
    }

    pub fn last_agent_phase(&self) -> Option<Phase> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Agent)
            .and_then(|m| m.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generation::OfflineService;
    use std::sync::Arc;

    fn offline() -> ResponseComposer {
        ResponseComposer::new(Arc::new(OfflineService))
    }

    #[test]
    fn test_new_session_logs_online() {
        let session = Session::default();
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().entries()[0].message, "SYSTEM_ONLINE");
        assert!(!session.is_unlocked());
    }

    #[tokio::test]
    async fn test_exchange_tags_pre_drift_phase() {
        let mut session = Session::default();
        session.apply_override(&PsychologyPatch::score_and_phase(30, Phase::Consumer));

        let output = session.exchange(&offline(), "cheap soda?").await;

        assert_eq!(output.phase, Phase::Consumer);
        assert_eq!(output.message.phase, Some(Phase::Consumer));
        assert_eq!(output.psychology.current_phase, Phase::Friction);
        assert_eq!(output.reason, EventCode::PHASE_SHIFT_DETECTED);
        assert!(output.fallback);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.active_product(), Some("coke"));
        assert_eq!(session.log().last().unwrap().details.as_deref(), Some("1 -> 2"));
    }

    #[tokio::test]
    async fn test_exchange_keeps_previous_product() {
        let mut session = Session::default();
        session.exchange(&offline(), "new iphone price").await;
        session.exchange(&offline(), "what about the battery").await;
        assert_eq!(session.active_product(), Some("iphone"));
    }

    #[test]
    fn test_unlock() {
        let mut session = Session::new("1234");
        assert!(!session.unlock("0000"));
        assert_eq!(session.log().last().unwrap().kind, LogType::Critical);
        assert!(!session.is_unlocked());

        assert!(session.unlock("1234"));
        assert_eq!(session.log().last().unwrap().kind, LogType::Warn);
        assert!(session.is_unlocked());

        session.lock();
        assert!(!session.is_unlocked());
    }

    #[test]
    fn test_override_logs_patch_json() {
        let mut session = Session::default();
        session.apply_preset(Preset::RedPill);
        let entry = session.log().last().unwrap();
        assert_eq!(entry.message, "MANUAL_OVERRIDE_EXECUTED");
        assert_eq!(
            entry.details.as_deref(),
            Some(r#"{"receptivity_score":60,"current_phase":"REVEAL"}"#)
        );
    }

    #[tokio::test]
    async fn test_follow_up_uses_context() {
        let mut session = Session::default();
        session.exchange(&offline(), "nike air max").await;
        assert_eq!(
            session.follow_up("Check size guide"),
            Some("Nike runs true to size. Order your normal fit.")
        );
    }
}
