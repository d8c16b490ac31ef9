use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug)]
struct Window {
    start: Instant,
    count: u32,
}

/// Fixed one-second window limiter, shared per route group.
#[derive(Clone, Debug)]
pub struct RpsLimiter {
    rps: u32,
    window: Arc<Mutex<Window>>,
}

impl RpsLimiter {
    pub fn new(rps: u32) -> Self {
        Self {
            rps: rps.max(1),
            window: Arc::new(Mutex::new(Window {
                start: Instant::now(),
                count: 0,
            })),
        }
    }

    fn allow(&self) -> bool {
        let mut guard = self.window.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        if now.duration_since(guard.start) >= Duration::from_secs(1) {
            guard.start = now;
            guard.count = 0;
        }
        if guard.count < self.rps {
            guard.count += 1;
            true
        } else {
            false
        }
    }
}

pub fn new_rps_state(rps: u32) -> RpsLimiter {
    RpsLimiter::new(rps)
}

pub async fn rps_middleware(
    State(limiter): State<RpsLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.allow() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "rate_limit_exceeded" })),
        )
            .into_response();
    }
    next.run(req).await
}
