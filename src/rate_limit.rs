//! Fixed-window request limit per client address.

use crate::extractors::ClientIp;
use crate::response::Envelope;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const RATE_LIMITED: &str = "Too many requests, please try again later.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Counts requests per key in windows of fixed length. A window starts at a key's first request.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        FixedWindowLimiter {
            max,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if windows.len() > 10_000 {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }
        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        if entry.count >= self.max {
            return RateLimitDecision::Limited;
        }
        entry.count += 1;
        RateLimitDecision::Allowed
    }
}

/// Middleware: 429 once the client exceeds its window.
pub async fn limit_requests(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    client: ClientIp,
    req: Request,
    next: Next,
) -> Response {
    match limiter.check(&client.0) {
        RateLimitDecision::Allowed => next.run(req).await,
        RateLimitDecision::Limited => {
            tracing::warn!(client = %client.0, path = %req.uri().path(), "rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(Envelope::failure(RATE_LIMITED)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_within_window_and_resets_after() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert_eq!(limiter.check_at("a", t0), RateLimitDecision::Allowed);
        assert_eq!(limiter.check_at("a", t0), RateLimitDecision::Allowed);
        assert_eq!(limiter.check_at("a", t0), RateLimitDecision::Limited);
        assert_eq!(limiter.check_at("b", t0), RateLimitDecision::Allowed);
        let later = t0 + Duration::from_secs(61);
        assert_eq!(limiter.check_at("a", later), RateLimitDecision::Allowed);
    }

    #[test]
    fn zero_max_blocks_everything() {
        let limiter = FixedWindowLimiter::new(0, Duration::from_secs(1));
        assert_eq!(limiter.check("x"), RateLimitDecision::Limited);
    }
}
