//! Per-client request rate limiting.

use crate::api::common::service_error_to_http;
use crate::errors::ServiceError;
use crate::server::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How often idle client entries are dropped from the limiter.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Keyed limiter allowing a fixed number of requests per minute per IP.
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl ClientRateLimiter {
    pub fn per_minute(requests: u32) -> Self {
        let requests = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        Self::with_quota(Quota::per_minute(requests))
    }

    fn with_quota(quota: Quota) -> Self {
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    pub fn check(&self, client: IpAddr) -> Result<(), ServiceError> {
        self.limiter
            .check_key(&client)
            .map_err(|_| ServiceError::RateLimited)
    }

    /// Forgets clients whose quota has fully replenished.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }
}

/// Periodically drops idle clients so the key table tracks active callers only.
pub fn spawn_cleanup(limiter: Arc<ClientRateLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            let before = limiter.limiter.len();
            limiter.cleanup();
            tracing::debug!(
                "Rate limiter cleanup kept {} of {} clients",
                limiter.limiter.len(),
                before
            );
        }
    })
}

pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    // Requests served without connection info (e.g. in-process) share one bucket.
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if let Err(e) = state.rate_limiter.check(client) {
        tracing::warn!("Rate limit exceeded for {}", client);
        return Err(service_error_to_http(e));
    }

    Ok(next.run(req).await)
}
