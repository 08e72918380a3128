// src/auth/identity.rs
//! Who is asking. Issues and checks the portal's session tokens and
//! remembers tokens that were signed out before they expired.

use crate::models::auth::{Claims, User};
use crate::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use uuid::Uuid;

pub const TOKEN_COOKIE: &str = "portal_token";
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("token has been signed out")]
    SignedOut,
    #[error("token subject is not a user id")]
    InvalidSubject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub token_id: String,
    pub expires_at: usize,
}

impl TryFrom<Claims> for Identity {
    type Error = IdentityError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| IdentityError::InvalidSubject)?;
        Ok(Self {
            user_id,
            email: claims.email,
            username: claims.username,
            token_id: claims.jti,
            expires_at: claims.exp,
        })
    }
}

pub struct IdentityContext {
    secret: String,
    // token id -> expiry (unix seconds)
    signed_out: RwLock<HashMap<String, usize>>,
}

impl IdentityContext {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            signed_out: RwLock::new(HashMap::new()),
        }
    }

    pub fn token_ttl_seconds() -> i64 {
        Duration::hours(TOKEN_TTL_HOURS).num_seconds()
    }

    /// Sign a fresh 24-hour token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, IdentityError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;

        let signed_out = self.signed_out.read().unwrap_or_else(PoisonError::into_inner);
        if signed_out.contains_key(&claims.jti) {
            return Err(IdentityError::SignedOut);
        }
        drop(signed_out);

        Identity::try_from(claims)
    }

    /// Invalidate the token behind `identity` for the rest of its lifetime.
    pub fn sign_out(&self, identity: &Identity) {
        let now = Utc::now().timestamp() as usize;
        let mut signed_out = self.signed_out.write().unwrap_or_else(PoisonError::into_inner);
        signed_out.retain(|_, expires_at| *expires_at > now);
        signed_out.insert(identity.token_id.clone(), identity.expires_at);
        tracing::info!("User {} signed out", identity.user_id);
    }
}

/// Token from `Authorization: Bearer ...`, falling back to the session cookie.
pub fn bearer_or_cookie_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        return Some(token.trim().to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// The caller's identity, if they presented a valid token.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(MaybeIdentity(Some(identity.clone())));
        }

        let Some(state) = parts.extensions.get::<Arc<AppState>>() else {
            return Ok(MaybeIdentity(None));
        };
        let Some(token) = bearer_or_cookie_token(&parts.headers) else {
            return Ok(MaybeIdentity(None));
        };

        match state.identity.resolve(&token) {
            Ok(identity) => Ok(MaybeIdentity(Some(identity))),
            Err(e) => {
                tracing::debug!("Ignoring unusable session token: {}", e);
                Ok(MaybeIdentity(None))
            }
        }
    }
}
