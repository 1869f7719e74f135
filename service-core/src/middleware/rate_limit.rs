use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::keyed::DashMapStateStore,
};
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

/// Fixed rejection body text, returned verbatim to over-quota clients.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

/// Per-IP rate limiter: `max_requests` per `window_seconds` fixed window,
/// keyed by source IP with DashMap-backed state.
#[derive(Clone)]
pub struct IpRateLimit {
    limiter: Arc<RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>>,
    max_requests: u32,
}

impl IpRateLimit {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        let max_requests = max_requests.max(1);
        let period = Duration::from_millis((window_seconds * 1000) / max_requests as u64)
            .max(Duration::from_millis(1));
        let quota = Quota::with_period(period)
            .expect("period is non-zero")
            .allow_burst(NonZeroU32::new(max_requests).expect("max_requests is non-zero"));

        Self {
            limiter: Arc::new(RateLimiter::dashmap(quota)),
            max_requests,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Returns the suggested retry delay in seconds when the quota is spent.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        self.limiter.check_key(&ip).map_err(|negative| {
            negative
                .wait_time_from(DefaultClock::default().now())
                .as_secs()
        })
    }
}

pub async fn ip_rate_limit_middleware(
    State(limit): State<IpRateLimit>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match client_ip(&request) {
        Some(ip) => match limit.check(ip) {
            Ok(()) => Ok(next.run(request).await),
            Err(retry_after) => Err(AppError::TooManyRequests {
                message: RATE_LIMIT_MESSAGE.to_string(),
                retry_after: Some(retry_after),
                limit: limit.max_requests(),
            }),
        },
        None => {
            tracing::warn!("could not determine client IP for rate limiting");
            Ok(next.run(request).await)
        }
    }
}

fn client_ip(request: &Request) -> Option<IpAddr> {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());

    forwarded.or_else(|| {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}
