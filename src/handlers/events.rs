use crate::auth::{Identity, MaybeIdentity};
use crate::error::{api_error, ApiError};
use crate::events::RegistrationError;
use crate::middleware::auth::auth_middleware;
use crate::models::event::{EventsResponse, RegistrationResponse};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, Router},
};
use std::sync::Arc;

pub fn events_routes() -> Router {
    let registrations = Router::new()
        .route("/api/events/registrations", get(my_registrations))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/:id/register", post(register))
        .merge(registrations)
}

fn registration_status(err: &RegistrationError) -> StatusCode {
    match err {
        RegistrationError::LoginRequired => StatusCode::UNAUTHORIZED,
        RegistrationError::AlreadyRegistered | RegistrationError::InProgress => StatusCode::CONFLICT,
        RegistrationError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn list_events(
    Extension(state): Extension<Arc<AppState>>,
    identity: MaybeIdentity,
) -> Json<EventsResponse> {
    Json(state.events.overview(identity.user_id()).await)
}

async fn my_registrations(
    Extension(state): Extension<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Json<RegistrationResponse> {
    let registrations = state.events.registrations_for(identity.user_id).await;
    Json(RegistrationResponse {
        success: true,
        message: format!("{} registration(s)", registrations.len()),
        registrations,
    })
}

async fn register(
    Extension(state): Extension<Arc<AppState>>,
    identity: MaybeIdentity,
    Path(event_id): Path<String>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    match state.events.register(identity.user_id(), &event_id).await {
        Ok(registrations) => Ok(Json(RegistrationResponse {
            success: true,
            message: "Successfully registered for the event!".to_string(),
            registrations,
        })),
        Err(e) => Err(api_error(registration_status(&e), e.to_string())),
    }
}
