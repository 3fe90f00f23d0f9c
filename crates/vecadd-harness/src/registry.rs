//! Per-thread kernel registry
//!
//! Each worker owns one registry. Every descriptor pairs a kernel with its own
//! [`Timer`] and output buffer, so nothing is shared while measuring.

use crate::config::HarnessConfig;
use crate::timer::Timer;
use std::sync::Arc;
use vecadd_kernels::{AddKernel, KernelSet};

/// One candidate kernel with its private timer and output buffer
pub struct KernelDescriptor {
    pub(crate) kernel: Arc<dyn AddKernel>,
    pub(crate) timer: Timer,
    pub(crate) output: Vec<i32>,
}

impl KernelDescriptor {
    fn new(kernel: Arc<dyn AddKernel>, config: &HarnessConfig) -> Self {
        Self {
            kernel,
            timer: Timer::new(config.warmup_count),
            output: vec![0; config.vector_len],
        }
    }

    pub fn name(&self) -> &'static str {
        self.kernel.name()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn output(&self) -> &[i32] {
        &self.output
    }

    /// Runs the kernel once into this descriptor's output buffer.
    #[inline]
    pub(crate) fn apply(&mut self, a: &[i32], b: &[i32]) {
        self.kernel.apply(&mut self.output, a, b);
    }
}

/// Ordered descriptors; index 0 is the ground truth
pub struct KernelRegistry {
    descriptors: Vec<KernelDescriptor>,
}

impl KernelRegistry {
    /// Builds a registry with freshly allocated, pre-sized output buffers.
    pub fn new(kernels: &KernelSet, config: &HarnessConfig) -> Self {
        let descriptors = kernels
            .iter()
            .map(|kernel| KernelDescriptor::new(Arc::clone(kernel), config))
            .collect();
        Self { descriptors }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn descriptors(&self) -> &[KernelDescriptor] {
        &self.descriptors
    }

    pub fn ground_truth(&self) -> &KernelDescriptor {
        &self.descriptors[0]
    }

    /// Clears every output buffer so a kernel cannot pass on stale data.
    pub fn zero_outputs(&mut self) {
        for descriptor in &mut self.descriptors {
            descriptor.output.fill(0);
        }
    }

    /// Mutable access to descriptor `index` alongside the ground truth.
    ///
    /// The reference is `None` for index 0, which is its own ground truth.
    pub(crate) fn split_at_candidate(
        &mut self,
        index: usize,
    ) -> (Option<&KernelDescriptor>, &mut KernelDescriptor) {
        let (head, tail) = self.descriptors.split_at_mut(index);
        (head.first(), &mut tail[0])
    }

    pub fn into_timers(self) -> Vec<(&'static str, Timer)> {
        self.descriptors.into_iter().map(|d| (d.kernel.name(), d.timer)).collect()
    }
}
