//! HTTP + WebSocket API for the Sovereign agent
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /session/new - Create new session
//! - GET /session/:id - Public session status
//! - DELETE /session/:id - Drop a session
//! - GET /session/:id/messages - Message log
//! - POST /session/:id/message - Run one exchange (409 while one is running)
//! - POST /session/:id/unlock - Unlock the shadow monitor
//! - POST /session/:id/lock - Hide the shadow monitor
//! - GET /session/:id/shadow - Psychology + diagnostics (gated)
//! - POST /session/:id/override - Verbatim psychology patch (gated)
//! - POST /session/:id/preset/:name - Operator preset (gated)
//! - POST /session/:id/reset - Reset the session (gated)
//! - WS /ws/:id - Live diagnostic feed (gated)

use async_trait::async_trait;
use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message as WsMessage, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{info, warn};

use crate::core::composer::ResponseComposer;
use crate::core::narrator::{ScanNarrator, ScanSink};
use crate::core::psychology::Preset;
use crate::core::session::{Session, ShadowReport};
use crate::types::{LogEntry, LogType, Message, Phase, PsychologyPatch, Transition};

/// One session plus its in-flight flag
#[derive(Clone)]
pub struct SessionHandle {
    pub session: Arc<Mutex<Session>>,
    /// Set while an exchange is composing; readable without the session lock
    pub typing: Arc<AtomicBool>,
}

impl SessionHandle {
    fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            typing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::SeqCst)
    }
}

/// Clears the typing flag when the exchange ends, however it ends
struct TypingGuard(Arc<AtomicBool>);

impl TypingGuard {
    fn claim(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for TypingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Narration sink that takes the session lock per entry
struct SessionLog<'a>(&'a Mutex<Session>);

#[async_trait]
impl ScanSink for SessionLog<'_> {
    async fn record(&mut self, kind: LogType, message: String, details: Option<String>) {
        self.0.lock().await.record(kind, message, details);
    }
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, SessionHandle>>,
    pub composer: Arc<ResponseComposer>,
    pub passcode: String,
    pub narrator: ScanNarrator,
}

/// Create new session response
#[derive(Debug, Serialize, Deserialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Public session status; psychology stays behind the gate
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
    pub is_typing: bool,
    pub last_phase: Option<Phase>,
    pub shadow_unlocked: bool,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub passcode: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub granted: bool,
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
    pub generator: String,
}

/// Create the API router
pub fn create_router(composer: Arc<ResponseComposer>, passcode: String, narrator: ScanNarrator) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        composer,
        passcode,
        narrator,
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/messages", get(get_messages))
        .route("/session/:id/message", post(send_message))
        .route("/session/:id/unlock", post(unlock))
        .route("/session/:id/lock", post(lock))
        .route("/session/:id/shadow", get(get_shadow))
        .route("/session/:id/override", post(apply_override))
        .route("/session/:id/preset/:name", post(apply_preset))
        .route("/session/:id/reset", post(reset_session))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

async fn find_session(state: &AppState, id: &str) -> Result<SessionHandle, StatusCode> {
    let sessions = state.sessions.read().await;
    sessions.get(id).cloned().ok_or(StatusCode::NOT_FOUND)
}

fn require_unlocked(session: &Session) -> Result<(), StatusCode> {
    if session.is_unlocked() {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
        generator: state.composer.service_label(),
    })
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let session = Session::new(state.passcode.clone()).with_narrator(state.narrator);
    let session_id = session.id().to_string();

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), SessionHandle::new(session));
    info!(session = %session_id, "session created");

    Json(NewSessionResponse {
        websocket_url: format!("/ws/{}", session_id),
        session_id,
    })
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let handle = find_session(&state, &id).await?;
    let is_typing = handle.is_typing();
    let session = handle.session.lock().await;

    Ok(Json(SessionStatusResponse {
        session_id: id,
        created_at: session.created_at(),
        message_count: session.messages().len(),
        is_typing,
        last_phase: session.last_agent_phase(),
        shadow_unlocked: session.is_unlocked(),
    }))
}

async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, StatusCode> {
    let handle = find_session(&state, &id).await?;
    let session = handle.session.lock().await;
    Ok(Json(session.messages().to_vec()))
}

/// Drop a session; an exchange already running finishes on its own handle
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    let mut sessions = state.sessions.write().await;
    match sessions.remove(&id) {
        Some(_) => {
            info!(session = %id, "session deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Run one exchange; the session lock is only held around bookkeeping
async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<Message>, StatusCode> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let handle = find_session(&state, &id).await?;
    let _typing = TypingGuard::claim(&handle.typing).ok_or(StatusCode::CONFLICT)?;

    let request = handle.session.lock().await.begin_exchange(text);
    let mut sink = SessionLog(&handle.session);
    let (_, outcome) = tokio::join!(
        state.narrator.run(&mut sink, &request.query, request.product.as_deref()),
        state.composer.compose(&request),
    );
    let output = handle
        .session
        .lock()
        .await
        .finish_exchange(&request, outcome, &state.composer.service_label());
    Ok(Json(output.message))
}

async fn unlock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UnlockRequest>,
) -> Result<Json<UnlockResponse>, StatusCode> {
    let handle = find_session(&state, &id).await?;
    let mut session = handle.session.lock().await;
    if session.unlock(&req.passcode) {
        Ok(Json(UnlockResponse { granted: true }))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn lock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let handle = find_session(&state, &id).await?;
    handle.session.lock().await.lock();
    Ok(StatusCode::NO_CONTENT)
}

async fn get_shadow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ShadowReport>, StatusCode> {
    let handle = find_session(&state, &id).await?;
    let session = handle.session.lock().await;
    require_unlocked(&session)?;
    Ok(Json(session.shadow_report()))
}

async fn apply_override(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<PsychologyPatch>,
) -> Result<Json<Transition>, StatusCode> {
    let handle = find_session(&state, &id).await?;
    let mut session = handle.session.lock().await;
    require_unlocked(&session)?;
    Ok(Json(session.apply_override(&patch)))
}

async fn apply_preset(
    State(state): State<Arc<AppState>>,
    Path((id, name)): Path<(String, String)>,
) -> Result<Json<Transition>, StatusCode> {
    let handle = find_session(&state, &id).await?;
    let mut session = handle.session.lock().await;
    require_unlocked(&session)?;
    let preset = Preset::from_name(&name).ok_or(StatusCode::BAD_REQUEST)?;
    Ok(Json(session.apply_preset(preset)))
}

async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ShadowReport>, StatusCode> {
    let handle = find_session(&state, &id).await?;
    let mut session = handle.session.lock().await;
    require_unlocked(&session)?;
    session.reset();
    Ok(Json(session.shadow_report()))
}

/// WebSocket handler for the live diagnostic feed
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let handle = find_session(&state, &id).await?;
    let session = handle.session.lock().await;
    require_unlocked(&session)?;
    let backlog = session.log().entries().to_vec();
    let rx = session.log().subscribe();
    drop(session);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, backlog, rx).await;
    }))
}

/// Replay the backlog, then forward new entries until either side closes
async fn handle_websocket(
    mut socket: WebSocket,
    backlog: Vec<LogEntry>,
    mut rx: broadcast::Receiver<LogEntry>,
) {
    for entry in backlog {
        let json = serde_json::to_string(&entry).unwrap_or_default();
        if socket.send(WsMessage::Text(json)).await.is_err() {
            return;
        }
    }
    loop {
        match rx.recv().await {
            Ok(entry) => {
                let json = serde_json::to_string(&entry).unwrap_or_default();
                if socket.send(WsMessage::Text(json)).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "diagnostic subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    composer: Arc<ResponseComposer>,
    passcode: String,
    narrator: ScanNarrator,
) -> crate::Result<()> {
    let router = create_router(composer, passcode, narrator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "sovereign API listening");
    axum::serve(listener, router).await?;
    Ok(())
}
