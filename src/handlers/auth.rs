use crate::auth::{Identity, IdentityContext, MaybeIdentity, UserStoreError, TOKEN_COOKIE};
use crate::error::{api_error, internal_error, ApiError};
use crate::middleware::auth::auth_middleware;
use crate::middleware::rate_limit::auth_rate_limit_middleware;
use crate::models::auth::*;
use crate::AppState;
use axum::{
    extract::Extension,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post, Router},
};
use bcrypt::{hash, verify};
use serde_json::json;
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 6;

#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;
// bcrypt's minimum, so tests don't spend seconds hashing.
#[cfg(test)]
const HASH_COST: u32 = 4;

pub fn auth_routes() -> Router {
    let credentials = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route_layer(middleware::from_fn(auth_rate_limit_middleware));

    let session = Router::new()
        .route("/api/auth/me", get(me))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .merge(credentials)
        .merge(session)
        .route("/api/auth/logout", post(logout))
}

fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        TOKEN_COOKIE,
        token,
        IdentityContext::token_ttl_seconds()
    )
}

fn cleared_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", TOKEN_COOKIE)
}

fn already_exists() -> ApiError {
    api_error(
        StatusCode::CONFLICT,
        "User with this email or username already exists",
    )
}

fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    state.identity.issue(user).map_err(|e| {
        tracing::error!("Error signing session token: {}", e);
        internal_error()
    })
}

async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let username = payload.username.trim().to_string();

    if email.is_empty() || username.is_empty() || payload.password.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Email, username, and password are required",
        ));
    }
    if !email.contains('@') {
        return Err(api_error(StatusCode::BAD_REQUEST, "Please enter a valid email address"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters long",
        ));
    }

    match state.users.exists(&email, &username).await {
        Ok(false) => {}
        Ok(true) => return Err(already_exists()),
        Err(e) => {
            tracing::error!("Database error checking existing user: {}", e);
            return Err(internal_error());
        }
    }

    let password_hash = hash(&payload.password, HASH_COST).map_err(|e| {
        tracing::error!("Error hashing password: {}", e);
        internal_error()
    })?;

    let user = match state.users.insert(&email, &username, &password_hash).await {
        Ok(user) => user,
        Err(UserStoreError::Duplicate) => {
            tracing::warn!("Concurrent sign-up lost the race for {} / {}", email, username);
            return Err(already_exists());
        }
        Err(e) => {
            tracing::error!("Error creating user: {}", e);
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user"));
        }
    };

    let token = issue_token(&state, &user)?;
    tracing::info!("New user registered: {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user: UserResponse::from(user),
            token,
        }),
    ))
}

async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Email and password are required"));
    }

    let user = state.users.find_by_email(&email).await.map_err(|e| {
        tracing::error!("Database error during login: {}", e);
        internal_error()
    })?;

    let Some(user) = user else {
        return Err(api_error(StatusCode::UNAUTHORIZED, "Invalid email or password"));
    };

    match verify(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Failed login attempt for {}", email);
            return Err(api_error(StatusCode::UNAUTHORIZED, "Invalid email or password"));
        }
        Err(e) => {
            tracing::error!("Error verifying password: {}", e);
            return Err(internal_error());
        }
    }

    let token = issue_token(&state, &user)?;
    tracing::info!("User logged in: {}", user.username);

    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(AuthResponse {
            success: true,
            message: "Login successful".to_string(),
            user: UserResponse::from(user),
            token,
        }),
    ))
}

async fn me(Extension(identity): Extension<Identity>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "user": {
            "id": identity.user_id,
            "email": identity.email,
            "username": identity.username,
        },
        "expires_at": identity.expires_at,
    }))
}

/// Always clears the cookie; a still-valid token is also revoked.
async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
) -> impl IntoResponse {
    if let Some(identity) = identity {
        state.identity.sign_out(&identity);
    }
    (
        [(header::SET_COOKIE, cleared_cookie())],
        Json(json!({ "success": true, "message": "Signed out" })),
    )
}
