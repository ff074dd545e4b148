//! HTTP + WebSocket API for ExoQuest
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /archetypes - Catalog in declared order
//! - GET /archetypes/:id/visual - Visual config for an archetype
//! - POST /session/new - Create new session
//! - GET /session/:id - Session status
//! - DELETE /session/:id - Drop a session and close its live updates
//! - PUT /session/:id/guess - Update guess dimensions
//! - POST /session/:id/classify - Run one attempt
//! - POST /session/:id/restart - New target, reset session
//! - WS /ws/:id - Live attempt updates

use axum::{
    extract::{ws::{Message, WebSocket}, Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::core::{ArchetypeCatalog, FallbackOrchestrator, GameSession, RandomSource, RngSource};
use crate::error::{ClassifyError, SessionError};
use crate::types::{AttemptOutput, Classification, Dimension, GameState, ParameterVector, VisualConfig};

/// A session plus its live-update channel
pub struct SessionEntry {
    pub session: GameSession,
    pub update_tx: broadcast::Sender<AttemptOutput>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, SessionEntry>>,
    pub orchestrator: FallbackOrchestrator,
    pub config: EngineConfig,
}

impl AppState {
    pub fn new(orchestrator: FallbackOrchestrator, config: EngineConfig) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            orchestrator,
            config,
        })
    }

    /// Build the orchestrator described by the config
    pub fn from_config(config: EngineConfig) -> Result<Arc<Self>, ClassifyError> {
        let orchestrator = FallbackOrchestrator::from_config(&config, ArchetypeCatalog::builtin())?;
        Ok(Self::new(orchestrator, config))
    }

    fn catalog(&self) -> &Arc<ArchetypeCatalog> {
        self.orchestrator.catalog()
    }
}

/// Create new session request
#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    /// Seed for a reproducible target draw
    pub seed: Option<u64>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub target_id: String,
    pub target_description_key: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub generation: u64,
    pub state: GameState,
    pub won: bool,
    pub attempts: u64,
    pub in_flight: bool,
    pub target_id: String,
    pub target_name_key: String,
    pub target_description_key: String,
    pub current_guess: ParameterVector,
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_visual: Option<VisualConfig>,
}

impl SessionStatusResponse {
    fn from_session(id: &str, session: &GameSession) -> Self {
        let target = session.target_archetype();
        let last = session.last_classification().cloned();
        let top_visual = last
            .as_ref()
            .and_then(|c| session.catalog().top_visual_config(&c.results))
            .cloned();
        Self {
            session_id: id.to_string(),
            generation: session.generation(),
            state: session.state(),
            won: session.won(),
            attempts: session.attempts(),
            in_flight: session.in_flight(),
            target_id: session.target_id().to_string(),
            target_name_key: target.name_key.clone(),
            target_description_key: target.description_key.clone(),
            current_guess: *session.current_guess(),
            similarity: session.similarity(),
            last_classification: last,
            top_visual,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
    pub remote_enabled: bool,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error rendered as `{"error": ...}` with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match err {
            SessionError::AttemptInFlight(_) | SessionError::StaleAttempt { .. } => StatusCode::CONFLICT,
            SessionError::UnknownDimension(_) | SessionError::InvalidValue { .. } => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

fn session_not_found(id: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, format!("session not found: {}", id))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/archetypes", get(list_archetypes))
        .route("/archetypes/:id/visual", get(archetype_visual))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/guess", put(update_guess))
        .route("/session/:id/classify", post(classify))
        .route("/session/:id/restart", post(restart_session))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
        remote_enabled: state.orchestrator.has_remote(),
    })
}

async fn list_archetypes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.catalog().enumerate().to_vec())
}

async fn archetype_visual(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VisualConfig>, ApiError> {
    state
        .catalog()
        .get_archetype_visual_config(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("unknown archetype: {}", id)))
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> Json<NewSessionResponse> {
    let random: Box<dyn RandomSource> = match req.seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_entropy()),
    };
    let session = GameSession::new(
        Arc::clone(state.catalog()),
        state.config.win,
        state.config.feedback,
        random,
    );
    let session_id = generate_session_id();
    let (tx, _) = broadcast::channel(100);

    let response = NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
        target_id: session.target_id().to_string(),
        target_description_key: session.target_archetype().description_key.clone(),
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id, SessionEntry { session, update_tx: tx });
    Json(response)
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let entry = sessions.get(&id).ok_or_else(|| session_not_found(&id))?;
    Ok(Json(SessionStatusResponse::from_session(&id, &entry.session)))
}

/// Remove a session; in-flight attempts for it complete against nothing
async fn delete_session(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions.write().await;
    sessions.remove(&id).ok_or_else(|| session_not_found(&id))?;
    info!(session = %id, remaining = sessions.len(), "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Update one or more guess dimensions, e.g. `{"mass": 2.5, "orbitalDistance": 0.9}`
async fn update_guess(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<HashMap<String, f64>>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let parsed = update
        .iter()
        .map(|(key, value)| key.parse::<Dimension>().map(|dim| (dim, *value)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut sessions = state.sessions.write().await;
    let entry = sessions.get_mut(&id).ok_or_else(|| session_not_found(&id))?;
    // Validate everything before touching the guess
    let mut guess = *entry.session.current_guess();
    for (dim, value) in parsed {
        guess.set(dim, value)?;
    }
    entry.session.replace_guess(guess);
    Ok(Json(SessionStatusResponse::from_session(&id, &entry.session)))
}

/// Run one classification attempt
async fn classify(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AttemptOutput>, ApiError> {
    let ticket = {
        let mut sessions = state.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| session_not_found(&id))?;
        entry.session.begin_attempt()?
    };

    // Detached so a dropped request cannot leave the attempt pending forever
    let worker = Arc::clone(&state);
    let task = tokio::spawn(async move {
        let classification = worker.orchestrator.classify(ticket.guess()).await;
        let mut sessions = worker.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| session_not_found(&id))?;
        let output = entry.session.complete_attempt(ticket, classification)?;
        let _ = entry.update_tx.send(output.clone());
        Ok::<_, ApiError>(output)
    });

    match task.await {
        Ok(result) => result.map(Json),
        Err(e) => {
            warn!(error = %e, "classification task failed");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "classification task failed"))
        }
    }
}

/// Restart a session with a fresh target
async fn restart_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let entry = sessions.get_mut(&id).ok_or_else(|| session_not_found(&id))?;
    entry.session.restart();
    Ok(Json(SessionStatusResponse::from_session(&id, &entry.session)))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.sessions.read().await;
    let entry = sessions.get(&id).ok_or_else(|| session_not_found(&id))?;
    let rx = entry.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Forward attempt outputs to the socket until either side closes
async fn handle_websocket(mut socket: WebSocket, mut rx: broadcast::Receiver<AttemptOutput>) {
    while let Ok(update) = rx.recv().await {
        let json = match serde_json::to_string(&update) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode update");
                continue;
            }
        };
        if socket.send(Message::Text(json)).await.is_err() {
            break;
        }
    }
}

/// Generate session ID
fn generate_session_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}{:04x}", nanos, n & 0xffff)
}

/// Run the API server
pub async fn run_server(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "ExoQuest API running");
    info!("  GET  /health                 - Health check");
    info!("  GET  /archetypes             - Catalog");
    info!("  GET  /archetypes/:id/visual  - Visual config");
    info!("  POST /session/new            - Create session");
    info!("  GET  /session/:id            - Session status");
    info!("  DEL  /session/:id            - Delete session");
    info!("  PUT  /session/:id/guess      - Update guess");
    info!("  POST /session/:id/classify   - Classify guess");
    info!("  POST /session/:id/restart    - Restart session");
    info!("  WS   /ws/:id                 - Live updates");
    axum::serve(listener, router).await?;
    Ok(())
}
