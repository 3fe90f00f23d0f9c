//! Multi-core benchmark harness for interchangeable vector-add kernels
//!
//! The harness runs every kernel of a [`KernelSet`](vecadd_kernels::KernelSet)
//! on one thread per core, times each trial with a warmup-aware [`Timer`],
//! checks every trial's output against the first kernel (the ground truth),
//! and merges the per-thread timers once all threads have joined.
//!
//! ```no_run
//! use std::sync::Arc;
//! use vecadd_harness::{Harness, HarnessConfig, RunState};
//! use vecadd_kernels::KernelSet;
//!
//! # fn main() -> vecadd_harness::Result<()> {
//! let config = HarnessConfig::builder().iteration_limit(2).build()?;
//! let summary = Harness::new(config, KernelSet::detect()).run(Arc::new(RunState::new()))?;
//! print!("{summary}");
//! assert!(!summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod compare;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod output;
pub mod registry;
pub mod state;
pub mod timer;
pub mod worker;

pub use compare::{cross_check, Mismatch};
pub use config::{HarnessConfig, HarnessConfigBuilder};
pub use controller::{Harness, KernelSummary, RunSummary, WorkerSummary};
pub use error::{HarnessError, Result};
pub use registry::{KernelDescriptor, KernelRegistry};
pub use state::RunState;
pub use timer::{Clock, MonotonicClock, Timer, TimerReport};
pub use worker::{Worker, WorkerOutcome, WorkerReport};
