//! Harness configuration

use crate::error::{HarnessError, Result};
use std::num::NonZeroUsize;

/// Elements per input vector.
pub const DEFAULT_VECTOR_LEN: usize = 1024 * 1024;
/// Timed trials per kernel per outer iteration.
pub const DEFAULT_REPEAT_COUNT: usize = 100;
/// Leading trials per kernel per outer iteration whose timings are discarded.
pub const DEFAULT_WARMUP_COUNT: u64 = 10;

/// Settings shared by every worker of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub vector_len: usize,
    pub repeat_count: usize,
    pub warmup_count: u64,
    /// Outer iterations per worker; `None` runs until a stop is requested.
    pub iteration_limit: Option<u64>,
    /// Worker thread count; `None` uses one per available core.
    pub workers: Option<NonZeroUsize>,
    /// Base seed for input generation; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            vector_len: DEFAULT_VECTOR_LEN,
            repeat_count: DEFAULT_REPEAT_COUNT,
            warmup_count: DEFAULT_WARMUP_COUNT,
            iteration_limit: None,
            workers: None,
            seed: None,
        }
    }
}

impl HarnessConfig {
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.vector_len == 0 {
            return Err(HarnessError::InvalidConfig("vector length must be non-zero".into()));
        }
        if self.repeat_count == 0 {
            return Err(HarnessError::InvalidConfig("repeat count must be non-zero".into()));
        }
        if self.warmup_count >= self.repeat_count as u64 {
            return Err(HarnessError::InvalidConfig(format!(
                "warmup count {} leaves no measured trials out of {}",
                self.warmup_count, self.repeat_count
            )));
        }
        Ok(())
    }
}

/// Builder for [`HarnessConfig`]
#[derive(Debug, Default)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    pub fn vector_len(mut self, len: usize) -> Self {
        self.config.vector_len = len;
        self
    }

    pub fn repeat_count(mut self, count: usize) -> Self {
        self.config.repeat_count = count;
        self
    }

    pub fn warmup_count(mut self, count: u64) -> Self {
        self.config.warmup_count = count;
        self
    }

    /// A limit of zero or less means "run until interrupted".
    pub fn iteration_limit(mut self, limit: i64) -> Self {
        self.config.iteration_limit = u64::try_from(limit).ok().filter(|&l| l > 0);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = NonZeroUsize::new(workers);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<HarnessConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
