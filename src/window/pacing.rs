//! Frame pacing for dispatcher-driven windows.
//!
//! The simulation thread enqueues frame callbacks onto the presentation
//! thread's dispatcher queue. To keep that queue from growing without bound
//! when the presentation thread drains slower than frames are produced, a
//! frame is only submitted while fewer than [`MAX_FRAMES_IN_FLIGHT`] are
//! outstanding. Otherwise the loop spins without enqueuing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::FrameCallback;
use super::dispatcher::DispatcherQueue;
use crate::errors::{MoteurError, Result};

/// Maximum number of submitted but not yet executed frames.
pub const MAX_FRAMES_IN_FLIGHT: u64 = 5;

/// Submitted/executed frame counts shared between the two threads.
#[derive(Debug, Default)]
pub struct FrameCounter {
    submitted: AtomicU64,
    executed: AtomicU64,
}

impl FrameCounter {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Acquire)
    }

    /// Frames submitted but not yet executed.
    #[must_use]
    pub fn in_flight(&self) -> u64 {
        // Read `executed` first: it never exceeds `submitted`.
        let executed = self.executed();
        self.submitted().saturating_sub(executed)
    }

    pub fn reset(&self) {
        self.submitted.store(0, Ordering::Release);
        self.executed.store(0, Ordering::Release);
    }

    pub fn mark_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::AcqRel);
    }

    pub fn mark_executed(&self) {
        self.executed.fetch_add(1, Ordering::AcqRel);
    }
}

/// Extra arguments to [`Window::run`](super::Window::run).
#[derive(Debug, Clone, Default)]
pub struct FrameArgs {
    /// Counter the run loop resets and updates; readable by the caller.
    pub counter: Arc<FrameCounter>,
}

impl FrameArgs {
    #[must_use]
    pub fn new(counter: Arc<FrameCounter>) -> Self {
        Self { counter }
    }
}

/// Outcome of one pacing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceStep {
    /// A frame was enqueued.
    Submitted,
    /// The lookahead is full; nothing was enqueued.
    Throttled,
}

/// Backpressure loop between the simulation thread and a dispatcher queue.
pub struct FramePacer {
    queue: DispatcherQueue,
    counter: Arc<FrameCounter>,
}

impl FramePacer {
    /// Creates a pacer and resets `counter`.
    #[must_use]
    pub fn new(queue: DispatcherQueue, counter: Arc<FrameCounter>) -> Self {
        counter.reset();
        Self { queue, counter }
    }

    #[must_use]
    pub fn counter(&self) -> &Arc<FrameCounter> {
        &self.counter
    }

    /// Enqueues one frame if the lookahead allows it.
    pub fn step(&self, on_frame: &FrameCallback) -> Result<PaceStep> {
        if self.counter.in_flight() >= MAX_FRAMES_IN_FLIGHT {
            return Ok(PaceStep::Throttled);
        }

        // Count before enqueuing so `executed` can never overtake `submitted`.
        self.counter.mark_submitted();
        let counter = self.counter.clone();
        let on_frame = on_frame.clone();
        let accepted = self.queue.try_enqueue(move || {
            on_frame();
            counter.mark_executed();
        });

        if accepted {
            Ok(PaceStep::Submitted)
        } else {
            Err(MoteurError::DispatcherClosed)
        }
    }

    /// Runs [`step`](Self::step) until `is_closing` returns true.
    pub fn run(&self, on_frame: &FrameCallback, is_closing: impl Fn() -> bool) -> Result<()> {
        while !is_closing() {
            if self.step(on_frame)? == PaceStep::Throttled {
                std::hint::spin_loop();
                std::thread::yield_now();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::dispatcher::DispatcherQueueController;

    #[test]
    fn step_throttles_at_lookahead() {
        let controller = DispatcherQueueController::new();
        let pacer = FramePacer::new(controller.queue(), FrameCounter::new());
        let on_frame: FrameCallback = Arc::new(|| {});

        for _ in 0..MAX_FRAMES_IN_FLIGHT {
            assert_eq!(pacer.step(&on_frame).unwrap(), PaceStep::Submitted);
        }
        assert_eq!(pacer.step(&on_frame).unwrap(), PaceStep::Throttled);

        assert!(controller.pump_one());
        assert_eq!(pacer.step(&on_frame).unwrap(), PaceStep::Submitted);
    }

    #[test]
    fn closed_queue_is_reported() {
        let controller = DispatcherQueueController::new();
        let pacer = FramePacer::new(controller.queue(), FrameCounter::new());
        controller.shutdown();

        let on_frame: FrameCallback = Arc::new(|| {});
        assert!(matches!(
            pacer.step(&on_frame),
            Err(MoteurError::DispatcherClosed)
        ));
    }
}
