// Global admission control for outbound API calls.
//
// Sliding-window log: the timestamps of the last `limit` admissions are
// kept in a deque. A caller is admitted once fewer than `limit` of them
// fall inside the trailing `period`; otherwise it sleeps until the oldest
// one ages out. The window lock is a fair (FIFO) tokio mutex held across
// that sleep, so callers are admitted in arrival order and nobody waits
// behind a later arrival.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Calls per window the Odin API tolerates.
pub const DEFAULT_LIMIT: usize = 5;
/// Length of the Odin API rate window.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

/// Rate-limit settings: at most `limit` calls per trailing `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub enabled: bool,
    pub limit: usize,
    pub period: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: DEFAULT_LIMIT,
            period: DEFAULT_PERIOD,
        }
    }
}

impl RateLimitPolicy {
    /// A policy that never delays anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Point-in-time view of the limiter's window.
#[derive(Debug, Clone, Copy)]
pub struct RateWindow {
    /// Admission time of the oldest call still inside the window.
    pub window_start: Option<Instant>,
    pub calls_in_window: usize,
    pub limit: usize,
    pub period: Duration,
}

/// Admits at most `limit` operations per rolling `period` across all callers.
///
/// Callers over the limit are suspended, never rejected.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    period: Duration,
    enabled: AtomicBool,
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        let limit = policy.limit.max(1);
        Self {
            limit,
            period: policy.period,
            enabled: AtomicBool::new(policy.enabled),
            window: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Toggle limiting at runtime. Callers already waiting keep waiting.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for an admission slot. A no-op while limiting is disabled.
    pub async fn acquire(&self) {
        if !self.is_enabled() {
            return;
        }

        let mut window = self.window.lock().await;
        loop {
            let now = Instant::now();
            while window
                .front()
                .is_some_and(|admitted| now.duration_since(*admitted) >= self.period)
            {
                window.pop_front();
            }

            if window.len() < self.limit {
                window.push_back(now);
                return;
            }

            let Some(oldest) = window.front().copied() else {
                continue;
            };
            let ready_at = oldest + self.period;
            trace!(wait = ?ready_at.duration_since(now), "rate window full");
            tokio::time::sleep_until(ready_at).await;
        }
    }

    /// Snapshot the current window (expired admissions excluded).
    pub async fn window(&self) -> RateWindow {
        let window = self.window.lock().await;
        let now = Instant::now();
        let live: Vec<Instant> = window
            .iter()
            .copied()
            .filter(|admitted| now.duration_since(*admitted) < self.period)
            .collect();
        RateWindow {
            window_start: live.first().copied(),
            calls_in_window: live.len(),
            limit: self.limit,
            period: self.period,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn policy(limit: usize, period_ms: u64) -> RateLimitPolicy {
        RateLimitPolicy {
            enabled: true,
            limit,
            period: Duration::from_millis(period_ms),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn admits_up_to_limit_without_waiting() {
        let limiter = RateLimiter::new(policy(5, 1000));
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert_eq!(Instant::now(), start);
        assert_eq!(limiter.window().await.calls_in_window, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn sixth_call_waits_for_the_window_to_roll() {
        let limiter = RateLimiter::new(policy(5, 1000));
        let start = Instant::now();
        for _ in 0..6 {
            limiter.acquire().await;
        }
        assert_eq!(Instant::now().duration_since(start), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn no_trailing_window_exceeds_the_limit() {
        let limiter = Arc::new(RateLimiter::new(policy(5, 1000)));
        let handles: Vec<_> = (0..23)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire().await;
                    Instant::now()
                })
            })
            .collect();

        let mut admitted = Vec::new();
        for handle in handles {
            admitted.push(handle.await.unwrap());
        }
        admitted.sort();

        for pair in admitted.windows(6) {
            let (first, sixth) = (pair[0], pair[5]);
            assert!(
                sixth.duration_since(first) >= Duration::from_secs(1),
                "six admissions inside one period: {first:?} .. {sixth:?}"
            );
        }
        // 23 callers at 5 per second: the last one gets in during the fifth second.
        let span = admitted[22].duration_since(admitted[0]);
        assert_eq!(span, Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_limiter_never_waits() {
        let limiter = RateLimiter::new(RateLimitPolicy::disabled());
        let start = Instant::now();
        for _ in 0..50 {
            limiter.acquire().await;
        }
        assert_eq!(Instant::now(), start);
        assert_eq!(limiter.window().await.calls_in_window, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_takes_effect_for_new_callers() {
        let limiter = RateLimiter::new(policy(1, 1000));
        limiter.acquire().await;
        limiter.set_enabled(false);
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(Instant::now(), start);

        limiter.set_enabled(true);
        limiter.acquire().await;
        assert_eq!(Instant::now().duration_since(start), Duration::from_secs(1));
    }

    #[test]
    fn zero_limit_is_clamped() {
        let limiter = RateLimiter::new(policy(0, 1000));
        assert_eq!(limiter.limit(), 1);
    }
}
