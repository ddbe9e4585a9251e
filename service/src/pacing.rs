use std::{ops::RangeInclusive, time::Duration};

use async_trait::async_trait;
use rand::Rng;

/// Seconds between consecutive bridge attempts.
pub const PACING_SECS: RangeInclusive<f64> = 20.0..=30.0;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Draws randomized delays so submissions do not land on a fixed cadence.
#[derive(Debug, Clone)]
pub struct Pacer {
    secs: RangeInclusive<f64>,
}

impl Pacer {
    pub fn new(secs: RangeInclusive<f64>) -> Self {
        Self { secs }
    }

    pub fn next_delay(&self) -> Duration {
        let secs = rand::rng().random_range(self.secs.clone());
        Duration::from_secs_f64(secs)
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(PACING_SECS)
    }
}
