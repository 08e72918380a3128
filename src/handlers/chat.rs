use crate::chat::prompts::{CAPABILITIES, GREETING, SUGGESTED_PROMPTS, WIDGET_TITLE};
use crate::chat::{SessionManager, SessionSnapshot, Turn};
use crate::error::{api_error, ApiError};
use crate::middleware::rate_limit::chat_rate_limit_middleware;
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, Router},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

pub fn chat_routes() -> Router {
    let messages = Router::new()
        .route("/api/chat/sessions/:id/messages", post(send_message))
        .route_layer(middleware::from_fn(chat_rate_limit_middleware));

    Router::new()
        .route("/api/chat/sessions", post(create_session))
        .route("/api/chat/sessions/:id", get(get_session).delete(delete_session))
        .merge(messages)
}

#[derive(Debug, Serialize)]
pub struct WidgetIntro {
    pub title: &'static str,
    pub greeting: &'static str,
    pub capabilities: &'static [&'static str],
    pub suggestions: &'static [&'static str],
}

static INTRO: WidgetIntro = WidgetIntro {
    title: WIDGET_TITLE,
    greeting: GREETING,
    capabilities: &CAPABILITIES,
    suggestions: &SUGGESTED_PROMPTS,
};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: SessionSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<&'static WidgetIntro>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
    /// The assistant turn this message produced, when it was accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<Turn>,
    pub session: SessionSnapshot,
}

fn chat_manager(state: &AppState) -> Result<&SessionManager, ApiError> {
    state.chat.as_ref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "The campus assistant is currently unavailable",
        )
    })
}

fn session_not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Chat session not found")
}

async fn create_session(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let manager = chat_manager(&state)?;
    let session = manager.create().await;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            success: true,
            session,
            intro: Some(&INTRO),
        }),
    ))
}

async fn get_session(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let manager = chat_manager(&state)?;
    let session = manager.snapshot(id).await.ok_or_else(session_not_found)?;
    Ok(Json(SessionResponse {
        success: true,
        session,
        intro: None,
    }))
}

async fn delete_session(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let manager = chat_manager(&state)?;
    if !manager.destroy(id).await {
        return Err(session_not_found());
    }
    Ok(Json(json!({ "success": true })))
}

/// Blocks until the assistant has answered, or returns immediately when the
/// message is ignored (blank, or a reply is still pending).
async fn send_message(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let manager = chat_manager(&state)?;
    let result = manager
        .submit(id, &payload.message)
        .await
        .ok_or_else(session_not_found)?;

    let reply = if result.accepted {
        result.session.transcript.last().cloned()
    } else {
        None
    };

    Ok(Json(SendMessageResponse {
        success: true,
        accepted: result.accepted,
        rejection: result.rejection,
        reply,
        session: result.session,
    }))
}
