//! Dispatcher queue of a retained-UI thread.
//!
//! The presentation thread owns a [`DispatcherQueueController`] and drains it;
//! any thread may hold a [`DispatcherQueue`] and enqueue closures that will run
//! serialized on the presentation thread.

use std::time::Duration;

/// Unit of work executed on the presentation thread.
pub type DispatcherJob = Box<dyn FnOnce() + Send>;

/// Sending half of the dispatcher. Cheap to clone.
#[derive(Clone)]
pub struct DispatcherQueue {
    sender: flume::Sender<DispatcherJob>,
}

impl DispatcherQueue {
    /// Enqueues `job`. Returns `false` if the presentation thread has shut its queue down.
    pub fn try_enqueue(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.sender.send(Box::new(job)).is_ok()
    }

    /// Number of jobs waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.sender.len()
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.sender.is_disconnected()
    }
}

impl std::fmt::Debug for DispatcherQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Receiving half, owned by the presentation thread.
pub struct DispatcherQueueController {
    receiver: flume::Receiver<DispatcherJob>,
    queue: DispatcherQueue,
}

impl Default for DispatcherQueueController {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherQueueController {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            receiver,
            queue: DispatcherQueue { sender },
        }
    }

    #[must_use]
    pub fn queue(&self) -> DispatcherQueue {
        self.queue.clone()
    }

    /// Runs at most one queued job. Returns whether one ran.
    pub fn pump_one(&self) -> bool {
        match self.receiver.try_recv() {
            Ok(job) => {
                job();
                true
            }
            Err(_) => false,
        }
    }

    /// Runs every job queued at the time of the call and returns how many ran.
    pub fn pump(&self) -> usize {
        let mut ran = 0;
        let budget = self.receiver.len();
        while ran < budget && self.pump_one() {
            ran += 1;
        }
        ran
    }

    /// Drains the queue until `stop` returns true, sleeping up to `poll` between jobs.
    pub fn run_until(&self, poll: Duration, stop: impl Fn() -> bool) {
        while !stop() {
            if let Ok(job) = self.receiver.recv_timeout(poll) {
                job();
            }
        }
    }

    /// Drains the queue until `shutdown` is set, then shuts the queue down.
    pub fn run_until_shutdown(self, poll: Duration, shutdown: &std::sync::atomic::AtomicBool) {
        self.run_until(poll, || shutdown.load(std::sync::atomic::Ordering::Acquire));
        self.shutdown();
    }

    /// Stops accepting work. Pending jobs are dropped without running.
    pub fn shutdown(self) {
        let pending = self.receiver.len();
        if pending > 0 {
            log::debug!("Dispatcher shut down with {pending} pending job(s)");
        }
        drop(self.receiver);
    }
}
