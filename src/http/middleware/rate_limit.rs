use crate::error::PortalError;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Fixed-window request counter keyed by client IP. Windows reset lazily on
/// the first request after expiry.
#[derive(Clone)]
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    counters: Arc<Mutex<HashMap<String, (Instant, u32)>>>,
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            counters: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn try_acquire(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        let entry = counters.entry(client.to_string()).or_insert((now, 0));
        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }
        entry.1 += 1;
        entry.1 <= self.max_per_window
    }
}

pub async fn enforce(
    State(limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .split(',')
        .next()
        .unwrap_or("unknown")
        .trim()
        .to_string();

    if !limiter.try_acquire(&ip) {
        tracing::warn!(%ip, "rate limit exceeded");
        return PortalError::RateLimited.into_response();
    }

    next.run(request).await
}
