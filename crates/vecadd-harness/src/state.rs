//! Cross-thread run flags

use std::sync::atomic::{AtomicBool, Ordering};

/// Flags shared by every worker of one run
///
/// Both flags only ever go from `false` to `true` and are polled once per
/// outer iteration with relaxed ordering.
#[derive(Debug, Default)]
pub struct RunState {
    stop_requested: AtomicBool,
    error_occurred: AtomicBool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every worker to stop at its next iteration boundary.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Relaxed)
    }

    /// Records that some worker saw a kernel disagree with the ground truth.
    pub fn flag_error(&self) {
        self.error_occurred.store(true, Ordering::Relaxed);
    }

    pub fn error_occurred(&self) -> bool {
        self.error_occurred.load(Ordering::Relaxed)
    }
}
