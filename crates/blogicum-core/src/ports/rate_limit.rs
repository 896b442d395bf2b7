//! Throttling of the sign-up and sign-in pages.

use std::time::Duration;

use async_trait::async_trait;

/// Counts requests per client and decides whether the next one may pass.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record one request from `client` and decide on it.
    async fn check(&self, client: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// The decision for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Requests the client may still make right away.
    pub remaining: u32,
    /// Time until the client's allowance is refilled (allowed) or until the
    /// next request would be accepted (rejected).
    pub reset_after: Duration,
}

impl RateLimitResult {
    pub fn allow(remaining: u32, reset_after: Duration) -> Self {
        Self {
            allowed: true,
            remaining,
            reset_after,
        }
    }

    pub fn deny(retry_in: Duration) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            reset_after: retry_in,
        }
    }

    /// Value for a `Retry-After` header: whole seconds, never zero.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs.max(1)
        }
    }
}

/// The limiter could not reach a decision.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(RateLimitResult::deny(Duration::from_millis(1500)).retry_after_secs(), 2);
        assert_eq!(RateLimitResult::deny(Duration::from_secs(3)).retry_after_secs(), 3);
        assert_eq!(RateLimitResult::deny(Duration::ZERO).retry_after_secs(), 1);
    }

    #[test]
    fn test_denied_has_nothing_remaining() {
        let denied = RateLimitResult::deny(Duration::from_secs(5));
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
    }
}
