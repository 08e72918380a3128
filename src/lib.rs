// lib.rs - Application state and router for the AIverse campus portal
pub mod auth;
pub mod campus;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod gemini_client;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod utils;
pub mod views;

use axum::{response::Json, routing::get, Extension, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::{IdentityContext, UserStore};
use crate::campus::MapViewController;
use crate::chat::SessionManager;
use crate::config::PortalConfig;
use crate::events::EventsController;

// AppState holds the database pool, the identity context, and one controller per page area
pub struct AppState {
    pub config: PortalConfig,
    pub db_pool: sqlx::PgPool,
    pub identity: IdentityContext,
    pub users: Arc<dyn UserStore>,
    pub chat: Option<SessionManager>, // None when GEMINI_API_KEY is missing
    pub map: MapViewController,
    pub events: EventsController,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handlers::ui::ui_routes())
        .merge(handlers::auth::auth_routes())
        .merge(handlers::chat::chat_routes())
        .merge(handlers::campus::campus_routes())
        .merge(handlers::events::events_routes())
        .merge(handlers::info::info_routes())
        .route("/api/status", get(api_status))
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}

async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<serde_json::Value> {
    let database = sqlx::query("SELECT 1").execute(&state.db_pool).await.is_ok();
    let chat_sessions = match &state.chat {
        Some(manager) => manager.len().await,
        None => 0,
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": database,
            "chat": state.chat.as_ref().map(|manager| manager.model_name()),
            "maps": state.config.google_maps_api_key.is_some(),
        },
        "chat_sessions": chat_sessions,
    }))
}

#[cfg(test)]
mod tests;
