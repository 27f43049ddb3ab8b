use std::sync::Arc;

use super::KvStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u64 },
    Limited { retry_after: u64 },
}

/// Fixed-window counter per client key. Fails open when the store errors.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KvStore>,
    max_requests: u64,
    window_secs: u64,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KvStore>, max_requests: u64, window_secs: u64) -> Self {
        Self {
            store,
            max_requests,
            window_secs: window_secs.max(1),
        }
    }

    pub async fn check(&self, client: &str) -> RateDecision {
        let key = format!("ratelimit:{client}");
        match self.store.incr_window(&key, self.window_secs).await {
            Ok((count, _)) if count <= self.max_requests => RateDecision::Allowed {
                remaining: self.max_requests - count,
            },
            Ok((_, ttl)) => RateDecision::Limited {
                retry_after: ttl.clamp(1, self.window_secs),
            },
            Err(err) => {
                tracing::warn!(error = %err, client, "rate limit store unavailable, allowing request");
                RateDecision::Allowed {
                    remaining: self.max_requests,
                }
            }
        }
    }
}
