//! Shared model-call rate budget

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Cloneable handle over one per-run model request budget
///
/// Every model invocation awaits readiness first, so the pipeline as a
/// whole stays under the provider's request ceiling no matter how many
/// steps run concurrently.
#[derive(Clone)]
pub struct RateBudget {
    limiter: SharedRateLimiter,
}

impl RateBudget {
    /// Create a budget of `requests_per_minute` model calls
    pub fn new(requests_per_minute: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::new(30).unwrap()),
        );
        let limiter = Arc::new(RateLimiter::direct(quota));
        Self { limiter }
    }

    /// Wait until one request is allowed
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateBudget").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let budget = RateBudget::new(30);
        budget.acquire().await;
    }

    #[tokio::test]
    async fn test_clones_share_one_budget() {
        let budget = RateBudget::new(60);
        let clone = budget.clone();
        assert!(Arc::ptr_eq(&budget.limiter, &clone.limiter));
    }
}
