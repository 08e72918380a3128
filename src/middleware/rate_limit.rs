use crate::error::api_error;
use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

/// Fixed-window request counter per client address.
pub struct RateLimiter {
    clients: Mutex<HashMap<IpAddr, (u32, Instant)>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            max_requests,
            window: Duration::from_secs(window_seconds),
        }
    }

    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        let (count, window_start) = clients.entry(client).or_insert((0, now));

        if now.duration_since(*window_start) > self.window {
            *count = 0;
            *window_start = now;
        }
        if *count >= self.max_requests {
            return false;
        }
        *count += 1;
        true
    }

    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, (_, window_start)| now.duration_since(*window_start) <= self.window);
    }
}

fn limited(limiter: &RateLimiter, addr: SocketAddr, scope: &str) -> Option<Response> {
    let client = addr.ip();
    if limiter.check(client) {
        // Occasionally drop stale windows.
        if rand::random::<u8>() < 10 {
            limiter.cleanup_expired();
        }
        return None;
    }
    tracing::warn!("{} rate limit exceeded for IP: {}", scope, client);
    Some(
        api_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again later.",
        )
        .into_response(),
    )
}

/// 20 chat messages per minute per address. Each one costs a call to the
/// language service.
pub async fn chat_rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    static CHAT_LIMITER: OnceLock<RateLimiter> = OnceLock::new();
    let limiter = CHAT_LIMITER.get_or_init(|| RateLimiter::new(20, 60));

    match limited(limiter, addr, "Chat") {
        Some(rejection) => rejection,
        None => next.run(request).await,
    }
}

/// 10 attempts per minute per address for sign-up and sign-in.
pub async fn auth_rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    static AUTH_LIMITER: OnceLock<RateLimiter> = OnceLock::new();
    let limiter = AUTH_LIMITER.get_or_init(|| RateLimiter::new(10, 60));

    match limited(limiter, addr, "Auth") {
        Some(rejection) => rejection,
        None => next.run(request).await,
    }
}
