use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::traits::Clock;

/// Clock backed by Tokio's timer, used by every tracker unless a test injects
/// a fake.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_advances_paused_time() {
        let clock = TokioClock;
        let started = tokio::time::Instant::now();

        clock.sleep(Duration::from_secs(5)).await;

        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
