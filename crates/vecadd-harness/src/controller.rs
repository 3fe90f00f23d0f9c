//! Harness controller: fan out one worker per core, join, merge timers

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::state::RunState;
use crate::timer::{Timer, TimerReport};
use crate::worker::{Worker, WorkerOutcome, WorkerReport};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};
use vecadd_kernels::KernelSet;

/// Runs one independent [`Worker`] per thread over the same kernel set
pub struct Harness {
    config: HarnessConfig,
    kernels: KernelSet,
}

impl Harness {
    pub fn new(config: HarnessConfig, kernels: KernelSet) -> Self {
        Self { config, kernels }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn kernels(&self) -> &KernelSet {
        &self.kernels
    }

    /// Configured worker count, or one per available core.
    pub fn worker_count(&self) -> Result<usize> {
        match self.config.workers {
            Some(workers) => Ok(workers.get()),
            None => thread::available_parallelism()
                .map(|n| n.get())
                .map_err(HarnessError::CoreCount),
        }
    }

    /// Runs every worker to completion and merges their timers.
    ///
    /// Returns an error only for fatal conditions; kernel mismatches are
    /// reported through [`RunSummary::failed`].
    pub fn run(&self, state: Arc<RunState>) -> Result<RunSummary> {
        self.config.validate()?;
        let worker_count = self.worker_count()?;
        info!(workers = worker_count, kernels = ?self.kernels, "starting run");

        let workers: Vec<Worker> = (0..worker_count)
            .map(|index| Worker::new(index, &self.kernels, &self.config, Arc::clone(&state)))
            .collect();

        println!("creating {worker_count} threads");
        let mut handles: Vec<(usize, JoinHandle<Result<WorkerReport>>)> = Vec::with_capacity(worker_count);
        for worker in workers {
            let index = worker.index();
            let spawned = thread::Builder::new()
                .name(format!("vecadd-worker-{index}"))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(source) => {
                    state.request_stop();
                    let _ = join_all(handles);
                    return Err(HarnessError::Spawn { index, source });
                }
            }
        }

        let reports = join_all(handles)?;
        debug!(workers = reports.len(), "all workers joined");
        Ok(RunSummary::merge(&self.kernels, self.config.warmup_count, reports))
    }
}

/// Joins every handle before reporting the first fatal error.
fn join_all(handles: Vec<(usize, JoinHandle<Result<WorkerReport>>)>) -> Result<Vec<WorkerReport>> {
    let mut reports = Vec::with_capacity(handles.len());
    let mut first_error = None;

    for (index, handle) in handles {
        let result = handle
            .join()
            .unwrap_or_else(|_| Err(HarnessError::WorkerPanicked { index }));
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(reports),
    }
}

/// Aggregate timer for one kernel name across all workers
#[derive(Debug, Clone)]
pub struct KernelSummary {
    pub name: &'static str,
    pub timer: Timer,
}

impl KernelSummary {
    pub fn report(&self) -> TimerReport {
        self.timer.report()
    }
}

impl fmt::Display for KernelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.report())
    }
}

/// How one worker ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSummary {
    pub index: usize,
    pub iterations: u64,
    pub outcome: WorkerOutcome,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// One entry per kernel, in registry order.
    pub kernels: Vec<KernelSummary>,
    /// One entry per worker, in thread index order.
    pub workers: Vec<WorkerSummary>,
}

impl RunSummary {
    /// Folds every worker's timer for the same kernel into one.
    fn merge(kernels: &KernelSet, warmup: u64, reports: Vec<WorkerReport>) -> Self {
        let mut merged: Vec<KernelSummary> = kernels
            .iter()
            .map(|kernel| KernelSummary {
                name: kernel.name(),
                timer: Timer::new(warmup),
            })
            .collect();

        let mut workers = Vec::with_capacity(reports.len());
        for report in reports {
            for (summary, (name, timer)) in merged.iter_mut().zip(&report.timers) {
                debug_assert_eq!(summary.name, *name);
                summary.timer.add(timer);
            }
            workers.push(WorkerSummary {
                index: report.index,
                iterations: report.iterations,
                outcome: report.outcome,
            });
        }

        Self { kernels: merged, workers }
    }

    /// `true` if any worker saw a kernel disagree with the ground truth.
    pub fn failed(&self) -> bool {
        self.workers.iter().any(|w| w.outcome.is_failure())
    }

    pub fn kernel(&self, name: &str) -> Option<&KernelSummary> {
        self.kernels.iter().find(|k| k.name == name)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run times per element:")?;
        for kernel in &self.kernels {
            writeln!(f, "{kernel}")?;
        }
        Ok(())
    }
}
