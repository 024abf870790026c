use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

/// Soft per-minute request cap shared by the HTTP sources, plus server-requested back-off.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
    requests_per_minute: u32,
}

struct RateLimitState {
    blocked_until: Option<Instant>,
    requests_this_minute: u32,
    minute_start: Instant,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState {
                blocked_until: None,
                requests_this_minute: 0,
                minute_start: Instant::now(),
            })),
            requests_per_minute: requests_per_minute.max(1),
        }
    }

    pub async fn wait(&self) {
        let mut state = self.state.lock().await;

        if let Some(until) = state.blocked_until.take() {
            let now = Instant::now();
            if until > now {
                let wait_duration = until - now;
                drop(state);
                tracing::info!("Rate limited, waiting {:?}", wait_duration);
                sleep(wait_duration).await;
                state = self.state.lock().await;
            }
        }

        let minute_elapsed = state.minute_start.elapsed();
        if minute_elapsed < Duration::from_secs(60) {
            if state.requests_this_minute >= self.requests_per_minute {
                let wait_time = Duration::from_secs(60) - minute_elapsed;
                drop(state);
                tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
                sleep(wait_time).await;
                state = self.state.lock().await;
                state.requests_this_minute = 0;
                state.minute_start = Instant::now();
            }
        } else {
            state.requests_this_minute = 0;
            state.minute_start = Instant::now();
        }

        state.requests_this_minute += 1;
    }

    /// Blocks the next `wait` until `secs` from now, e.g. after a 429 with Retry-After.
    pub async fn back_off(&self, secs: u64) {
        let mut state = self.state.lock().await;
        let until = Instant::now() + Duration::from_secs(secs);
        state.blocked_until = Some(state.blocked_until.map_or(until, |current| current.max(until)));
    }

    pub async fn requests_this_minute(&self) -> u32 {
        self.state.lock().await.requests_this_minute
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(30)
    }
}
