//! Background housekeeping for the rate limiter.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::interval;
use tracing::debug;

use crate::state::AppState;

/// Periodically drop expired rate limit records, once per limiter window.
pub fn start_rate_limit_purge(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(state.rate_limiter.window());
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = state.rate_limiter.purge_expired(Instant::now());
            if removed > 0 {
                debug!("Purged {} expired rate limit records", removed);
            }
        }
    })
}
