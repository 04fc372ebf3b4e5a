//! HTTP + WebSocket API for Veado
//!
//! Endpoints:
//! - POST /session/new - Create new session
//! - GET /session/{id} - Get session status
//! - POST /session/{id}/frame - Classify one snapshot
//! - DELETE /session/{id} - Close session
//! - GET|PUT /session/{id}/config - Read or merge into the config
//! - WS /ws/{id} - Action changes
//! - GET /health - Health check

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::core::{merge_config, ExpressionDetector, HandSupport};
use crate::types::{ActionUpdate, CapabilityReason, ConfigReason, ControllerConfig, Gesture, Snapshot};

/// Session state
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub detector: ExpressionDetector,
    pub config: ControllerConfig,
    /// Clock origin for frames without a timestamp
    pub started: Instant,
    pub update_tx: broadcast::Sender<ActionUpdate>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    /// Hand support for new sessions unless the request turns it off
    pub hands: HandSupport,
    /// Base config for new sessions (from --config when serving)
    pub default_config: ControllerConfig,
    next_id: AtomicU64,
}

/// Create new session request
#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    pub hand_support: Option<bool>,
    /// Partial config document merged over the server default
    pub config: Option<Value>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub warnings: Vec<ConfigReason>,
}

/// Config after a merge, with the entries that fell back
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config: ControllerConfig,
    pub warnings: Vec<ConfigReason>,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub action: Gesture,
    pub frames_processed: u64,
    pub hand_support: String,
}

/// Frame classification response
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    pub physical: Gesture,
    pub action: Gesture,
    pub changed: bool,
    pub locked_until: Option<f64>,
    pub key: Option<String>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Create the API router
pub fn create_router(hands: HandSupport, default_config: ControllerConfig) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        hands,
        default_config,
        next_id: AtomicU64::new(0),
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/frame", post(add_frame))
        .route("/session/:id/config", get(get_config).put(put_config))
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
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<NewSessionRequest>>,
) -> Result<Json<NewSessionResponse>, StatusCode> {
    let req = body.map(|Json(r)| r).unwrap_or_default();

    let (config, warnings) = match req.config {
        None => (state.default_config.clone(), Vec::new()),
        Some(Value::Object(doc)) => {
            let load = merge_config(state.default_config.clone(), &doc);
            (load.config, load.warnings)
        }
        Some(_) => return Err(StatusCode::UNPROCESSABLE_ENTITY),
    };

    let session_id = generate_session_id(&state.next_id);
    let (tx, _) = broadcast::channel(100);

    let hands = match req.hand_support {
        Some(false) => HandSupport::Unavailable {
            reason: CapabilityReason::R301_HAND_SUPPORT_DISABLED,
            detail: "disabled for session".to_string(),
        },
        _ => state.hands.clone(),
    };

    let session = Session {
        id: session_id.clone(),
        detector: ExpressionDetector::new(hands),
        config,
        started: Instant::now(),
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!("session {} created", session_id);

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
        warnings,
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        action: session.detector.current_action(),
        frames_processed: session.detector.frames_processed(),
        hand_support: session.detector.hand_support().to_string(),
    }))
}

/// Close a session; open websockets end with it
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    let mut sessions = state.sessions.write().await;
    match sessions.remove(&id) {
        Some(_) => {
            info!("session {} closed", id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Classify one frame
async fn add_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(snapshot): Json<Snapshot>,
) -> Result<Json<FrameResponse>, StatusCode> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    let now = snapshot
        .timestamp
        .unwrap_or_else(|| session.started.elapsed().as_secs_f64());

    let output = session
        .detector
        .process(&snapshot, &session.config, now)
        .map_err(|reason| {
            warn!("session {}: frame rejected: {}", id, reason);
            StatusCode::UNPROCESSABLE_ENTITY
        })?;

    let key = session.config.key_for(output.action).map(|k| k.to_string());

    if output.changed {
        let update = ActionUpdate {
            action: output.action,
            physical: output.physical,
            now: output.now,
            key: key.clone(),
            frames_processed: session.detector.frames_processed(),
        };
        // no subscribers is fine
        let _ = session.update_tx.send(update);
    }

    Ok(Json(FrameResponse {
        physical: output.physical,
        action: output.action,
        changed: output.changed,
        locked_until: output.locked_until,
        key,
    }))
}

/// Get session config
async fn get_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ControllerConfig>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(session.config.clone()))
}

/// Merge a partial config over the session's; takes effect on the next frame
///
/// Bad entries fall back the same way they do in the config file.
async fn put_config(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(doc): Json<Value>,
) -> Result<Json<ConfigResponse>, StatusCode> {
    let doc = match doc {
        Value::Object(map) => map,
        _ => return Err(StatusCode::UNPROCESSABLE_ENTITY),
    };

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    let load = merge_config(session.config.clone(), &doc);
    session.config = load.config;
    debug!("session {}: config updated, {} warnings", id, load.warnings.len());

    Ok(Json(ConfigResponse {
        config: session.config.clone(),
        warnings: load.warnings,
    }))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Forward action changes until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<ActionUpdate>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = rx.recv() => {
                let update = match update {
                    Ok(u) => u,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("websocket lagged, {} updates dropped", n);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let json = serde_json::to_string(&update).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Generate session ID; the counter keeps same-instant IDs apart
fn generate_session_id(counter: &AtomicU64) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = counter.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}_{}", nanos as u64, seq)
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    hands: HandSupport,
    config: ControllerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(hands, config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Veado API running on {}", addr);
    println!("Veado API running on {}", addr);
    println!("  POST /session/new         - Create session");
    println!("  GET  /session/:id         - Get status");
    println!("  POST /session/:id/frame   - Classify frame");
    println!("  DEL  /session/:id         - Close session");
    println!("  GET  /session/:id/config  - Get config");
    println!("  PUT  /session/:id/config  - Merge config");
    println!("  WS   /ws/:id              - Action changes");
    println!("  GET  /health              - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
