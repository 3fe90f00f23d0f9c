//! Harness error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that make the measurement environment untrustworthy.
///
/// All of these are fatal for the whole run. A kernel disagreeing with the
/// ground truth is not an error here; it is reported as a worker outcome.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("monotonic clock read failed: {0}")]
    Clock(String),

    #[error("monotonic clock violation: {delta_ns} ns between checkpoints")]
    NonPositiveInterval { delta_ns: i128 },

    #[error("timer recorded before begin()")]
    NotStarted,

    #[error("failed to determine processor core count")]
    CoreCount(#[source] std::io::Error),

    #[error("failed to spawn worker thread {index}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write console output")]
    Console(#[source] std::io::Error),

        #[error("worker thread {index} panicked")]
    WorkerPanicked { index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
