//! Progress reporting and cooperative cancellation for long transforms.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives `(done, total)` updates, once per completed octave.
pub trait ProgressSink {
    /// Called after a unit of work completes.
    fn report(&mut self, done: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn report(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}

/// A sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _done: usize, _total: usize) {}
}

/// Shared flag that asks a running transform to stop.
///
/// Clones observe the same flag, so one handle can be moved into a signal
/// handler while another is passed to the transform.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
