//! Time-windowed request gate
//!
//! Approximates a requests-per-second limit with a fixed permit pool: every
//! permit returns to the pool a fixed hold after it was handed out,
//! independent of how long the guarded request takes or whether it fails.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Sliding-window concurrency gate: at most `permits` acquisitions can
/// complete within any window of one hold length.
pub struct RateGate {
    pool: Arc<Semaphore>,
    hold: Duration,
}

impl RateGate {
    /// Gate allowing `per_second` acquisitions per rolling second.
    pub fn new(per_second: u32) -> Self {
        Self::with_hold(per_second, Duration::from_secs(1))
    }

    /// Gate with a custom window length.
    pub fn with_hold(permits: u32, hold: Duration) -> Self {
        Self {
            pool: Arc::new(Semaphore::new(permits as usize)),
            hold,
        }
    }

    /// Suspends until a permit is free, then schedules its return one hold
    /// later.
    ///
    /// The release task is detached: it outlives the acquiring caller and
    /// fires whether or not the guarded request is still running, so the
    /// window is decoupled from request latency.
    pub async fn acquire(&self) {
        let permit = Arc::clone(&self.pool)
            .acquire_owned()
            .await
            .expect("gate permit pool is never closed");

        let hold = self.hold;
        tokio::spawn(async move {
            tokio::time::sleep(hold).await;
            drop(permit);
        });
    }
}
