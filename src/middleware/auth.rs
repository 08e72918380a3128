use crate::auth::bearer_or_cookie_token;
use crate::error::api_error;
use crate::AppState;
use axum::{
    extract::{Extension, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Rejects requests without a valid session token and makes the caller's
/// `Identity` available to the handler behind it.
pub async fn auth_middleware(
    Extension(state): Extension<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let Some(token) = bearer_or_cookie_token(request.headers()) else {
        return Err(api_error(StatusCode::UNAUTHORIZED, "Missing session token"));
    };

    let identity = match state.identity.resolve(&token) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Session token rejected: {}", e);
            return Err(api_error(StatusCode::UNAUTHORIZED, "Invalid or expired token"));
        }
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
