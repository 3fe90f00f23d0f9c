//! Per-thread benchmark loop
//!
//! Each outer iteration draws fresh inputs, clears every output buffer, then
//! runs each kernel in registry order for `repeat_count` timed trials. After
//! every trial the kernel's output is checked against the ground truth's
//! output from the same iteration, so all kernels are compared on identical
//! input. Nothing inside a timed interval blocks.

use crate::compare::{cross_check, Mismatch};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::input::InputGenerator;
use crate::output;
use crate::registry::{KernelDescriptor, KernelRegistry};
use crate::state::RunState;
use crate::timer::Timer;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, error, warn};
use vecadd_kernels::KernelSet;

/// Why a worker stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Reached the configured iteration limit.
    Limit,
    /// A stop was requested from outside.
    Signal,
    /// Another worker reported a kernel mismatch.
    PeerFailure,
    /// A kernel in this worker disagreed with the ground truth.
    Failed {
        kernel: &'static str,
        iteration: u64,
        mismatch: Mismatch,
    },
}

impl WorkerOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, WorkerOutcome::Failed { .. })
    }
}

/// What a worker hands back to the controller after it finishes
#[derive(Debug)]
pub struct WorkerReport {
    pub index: usize,
    /// Outer iterations whose full kernel sweep completed.
    pub iterations: u64,
    pub outcome: WorkerOutcome,
    /// Per-kernel timers in registry order.
    pub timers: Vec<(&'static str, Timer)>,
}

/// One thread's benchmark program
pub struct Worker {
    index: usize,
    config: HarnessConfig,
    registry: KernelRegistry,
    input: InputGenerator,
    state: Arc<RunState>,
    console: Box<dyn Write + Send>,
}

impl Worker {
    pub fn new(index: usize, kernels: &KernelSet, config: &HarnessConfig, state: Arc<RunState>) -> Self {
        Self {
            index,
            config: config.clone(),
            registry: KernelRegistry::new(kernels, config),
            input: InputGenerator::new(config.seed, index),
            state,
            console: Box::new(io::stdout()),
        }
    }

    /// Sends the progress, failure and stop lines to `console` instead of stdout.
    pub fn with_console(mut self, console: impl Write + Send + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Runs until a stop condition and returns this worker's timers.
    ///
    /// A fatal timing error asks the other workers to stop before it is
    /// returned.
    pub fn run(mut self) -> Result<WorkerReport> {
        debug!(worker = self.index, kernels = self.registry.len(), "worker started");

        let (iterations, outcome) = match self.run_loop() {
            Ok(done) => done,
            Err(e) => {
                error!(worker = self.index, error = %e, "fatal timing error, stopping run");
                self.state.request_stop();
                return Err(e);
            }
        };

        match &outcome {
            WorkerOutcome::Failed { kernel, iteration, mismatch } => {
                warn!(worker = self.index, kernel, iteration, %mismatch, "kernel diverged from ground truth");
            }
            other => debug!(worker = self.index, iterations, outcome = ?other, "worker finished"),
        }

        Ok(WorkerReport {
            index: self.index,
            iterations,
            outcome,
            timers: self.registry.into_timers(),
        })
    }

    fn run_loop(&mut self) -> Result<(u64, WorkerOutcome)> {
        let len = self.config.vector_len;
        let mut a = vec![0i32; len];
        let mut b = vec![0i32; len];
        let mut iteration = 0u64;

        loop {
            writeln!(self.console, "{}", output::progress_line(self.index, iteration))
                .map_err(HarnessError::Console)?;

            self.input.fill(&mut a);
            self.input.fill(&mut b);
            self.registry.zero_outputs();

            for kernel in 0..self.registry.len() {
                if let Some(failed) = self.sweep_kernel(kernel, &a, &b, iteration)? {
                    self.state.flag_error();
                    return Ok((iteration, failed));
                }
            }

            if let Some(outcome) = self.stop_condition(iteration) {
                if let Some(line) = output::stop_line(self.index, &outcome) {
                    writeln!(self.console, "{line}").map_err(HarnessError::Console)?;
                }
                return Ok((iteration + 1, outcome));
            }

            iteration += 1;
        }
    }

    /// Times `repeat_count` trials of one kernel, checking each against the
    /// ground truth. Returns the failure outcome on the first mismatch.
    fn sweep_kernel(
        &mut self,
        kernel: usize,
        a: &[i32],
        b: &[i32],
        iteration: u64,
    ) -> Result<Option<WorkerOutcome>> {
        let elements = a.len() as u64;
        let repeat = self.config.repeat_count;
        let (reference, candidate) = self.registry.split_at_candidate(kernel);

        candidate.timer.begin()?;
        for _ in 0..repeat {
            candidate.apply(a, b);
            candidate.timer.record(elements)?;

            let Some(reference) = reference else { continue };
            if let Err(mismatch) = cross_check(&candidate.output, &reference.output) {
                report_failure(&mut self.console, self.index, candidate, reference, iteration)
                    .map_err(HarnessError::Console)?;
                return Ok(Some(WorkerOutcome::Failed {
                    kernel: candidate.name(),
                    iteration,
                    mismatch,
                }));
            }
        }
        Ok(None)
    }

    /// Checked after the sweep of `iteration`, before the counter moves on:
    /// limit, then external stop, then a peer's failure. The counter starts
    /// at 0, so a limit of `n` ends after iteration `n`.
    fn stop_condition(&self, iteration: u64) -> Option<WorkerOutcome> {
        if self.config.iteration_limit.is_some_and(|limit| iteration >= limit) {
            return Some(WorkerOutcome::Limit);
        }
        if self.state.stop_requested() {
            return Some(WorkerOutcome::Signal);
        }
        if self.state.error_occurred() {
            return Some(WorkerOutcome::PeerFailure);
        }
        None
    }
}

/// Failure line followed by dumps of the candidate and ground-truth buffers.
fn report_failure(
    console: &mut dyn Write,
    thread: usize,
    candidate: &KernelDescriptor,
    reference: &KernelDescriptor,
    iteration: u64,
) -> io::Result<()> {
    writeln!(console, "{}", output::failure_line(thread, candidate.name(), iteration))?;
    writeln!(console, "{}", output::buffer_dump(thread, candidate.name(), candidate.output()))?;
    writeln!(console, "{}", output::buffer_dump(thread, reference.name(), reference.output()))
}
