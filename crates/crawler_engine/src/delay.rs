use std::time::Duration;

use rand::Rng;

/// Source of the randomized pauses inserted between automated actions.
///
/// Randomizing the spacing of scrolls and login polls makes the session's
/// timing profile look less mechanical. Suspension itself is
/// `tokio::time::sleep`, so a pause never blocks unrelated work.
pub trait DelaySource: Send + Sync {
    /// A duration drawn uniformly from `[min, max)`.
    fn delay(&self, min: Duration, max: Duration) -> Duration;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformDelay;

impl DelaySource for UniformDelay {
    fn delay(&self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        let span = (max - min).as_millis() as u64;
        min + Duration::from_millis(rand::rng().random_range(0..span))
    }
}

/// Deterministic source for tests: always returns the configured duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl DelaySource for FixedDelay {
    fn delay(&self, _min: Duration, _max: Duration) -> Duration {
        self.0
    }
}
