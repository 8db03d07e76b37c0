#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Monotonic time source of a window or engine loop.
///
/// `tick` samples the clock once per frame. Between ticks, [`delta`](Self::delta)
/// and [`elapsed`](Self::elapsed) hold the sampled values while
/// [`now_seconds`](Self::now_seconds) reads the live time.
#[derive(Debug, Clone)]
pub struct Clock {
    origin: Instant,
    previous: Instant,
    delta: Duration,
    elapsed: Duration,
    frames: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            origin,
            previous: origin,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    /// Moves the origin to now and forgets all samples.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Samples the clock for a new frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now.saturating_duration_since(self.previous);
        self.elapsed = now.saturating_duration_since(self.origin);
        self.previous = now;
        self.frames += 1;
    }

    /// Time between the last two ticks.
    #[must_use]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time from the origin to the last tick.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Ticks since the origin.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_sample_delta_within_elapsed() {
        let mut clock = Clock::new();
        assert_eq!(clock.frames(), 0);
        assert_eq!(clock.delta(), Duration::ZERO);

        clock.tick();
        clock.tick();
        assert_eq!(clock.frames(), 2);
        assert!(clock.delta() <= clock.elapsed());
        assert!(clock.now_seconds() >= clock.elapsed().as_secs_f64());
    }

    #[test]
    fn reset_forgets_samples() {
        let mut clock = Clock::new();
        clock.tick();
        clock.reset();
        assert_eq!(clock.frames(), 0);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }
}
