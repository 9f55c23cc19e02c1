use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};
use tracing::{debug, warn};

use crate::error::error_response;

pub const WINDOW_SECONDS: i64 = 60;

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Fixed-window request counter per client IP.
#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<String, RateLimitData>>,
    max_requests: u32,
    window_seconds: i64,
    // Unix seconds of the last expired-window sweep.
    last_sweep: Arc<AtomicI64>,
}

#[derive(Debug, Clone)]
struct RateLimitData {
    count: u32,
    window_start: DateTime<Utc>,
}

/// Result of counting one request against a client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the client's window resets.
    pub retry_after: i64,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_requests,
            window_seconds,
            last_sweep: Arc::new(AtomicI64::new(i64::MIN)),
        }
    }

    /// `max_requests` per minute.
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, WINDOW_SECONDS)
    }

    /// Count one request from `client`.
    pub fn check(&self, client: &str, now: DateTime<Utc>) -> Decision {
        self.sweep_if_due(now);

        let window = Duration::seconds(self.window_seconds);
        let mut entry = self
            .store
            .entry(client.to_string())
            .or_insert_with(|| RateLimitData {
                count: 0,
                window_start: now,
            });

        let data = entry.value_mut();

        // Check if we need to reset the window
        if now.signed_duration_since(data.window_start) >= window {
            data.count = 0;
            data.window_start = now;
        }

        data.count = data.count.saturating_add(1);
        let elapsed = now.signed_duration_since(data.window_start).num_seconds();
        Decision {
            allowed: data.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(data.count),
            retry_after: (self.window_seconds - elapsed).max(1),
        }
    }

    /// Drop every client whose window has expired.
    pub fn sweep(&self, now: DateTime<Utc>) {
        let window = Duration::seconds(self.window_seconds);
        let before = self.store.len();
        self.store
            .retain(|_, data| now.signed_duration_since(data.window_start) < window);
        let evicted = before.saturating_sub(self.store.len());
        if evicted > 0 {
            debug!(evicted, "expired rate limit windows dropped");
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.store.len()
    }

    // At most one sweep per window; the caller that wins the swap does it.
    fn sweep_if_due(&self, now: DateTime<Utc>) {
        let now_secs = now.timestamp();
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now_secs.saturating_sub(last) < self.window_seconds {
            return;
        }
        if self
            .last_sweep
            .compare_exchange(last, now_secs, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.sweep(now);
        }
    }
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the
/// peer address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// IP-based rate limiting middleware. Every response carries
/// `X-RateLimit-Limit`/`X-RateLimit-Remaining`; a 429 also carries
/// `Retry-After`.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(req.headers(), peer);

    let decision = rate_limit.check(&ip, Utc::now());
    if !decision.allowed {
        warn!(
            client = %ip,
            path = %req.uri().path(),
            retry_after = decision.retry_after,
            "rate limit exceeded"
        );
        let mut response = error_response(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded");
        let headers = response.headers_mut();
        headers.insert(header::RETRY_AFTER, HeaderValue::from(decision.retry_after));
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));
        return response;
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    response
}
