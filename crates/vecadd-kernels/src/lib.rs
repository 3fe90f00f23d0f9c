//! Candidate implementations of elementwise `i32` vector addition
//!
//! Every candidate implements [`AddKernel`] and computes
//! `out[i] = a[i].wrapping_add(b[i])`. The scalar kernel is always available
//! and is the reference the others are validated against.

use std::sync::Arc;

pub mod cpu;
pub mod error;

pub use cpu::{PrefetchKernel, ScalarKernel};
#[cfg(target_arch = "x86_64")]
pub use cpu::{Avx2Kernel, Avx2PrefetchKernel};
#[cfg(target_arch = "aarch64")]
pub use cpu::{NeonAsmKernel, NeonKernel};
pub use error::{KernelError, Result};

/// Elementwise add kernel contract
///
/// `apply` must write every position of `out` with the wrapping sum of the
/// matching positions of `a` and `b`. When the three slices disagree in
/// length the call is a silent no-op: `out` is left untouched.
pub trait AddKernel: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_available(&self) -> bool;
    fn apply(&self, out: &mut [i32], a: &[i32], b: &[i32]);
}

/// Returns `true` when `out`, `a` and `b` all have the same length.
#[inline]
pub fn same_len(out: &[i32], a: &[i32], b: &[i32]) -> bool {
    out.len() == a.len() && out.len() == b.len()
}

/// Ordered set of kernels under test
///
/// Index 0 is the ground truth. Names are unique within a set.
#[derive(Clone)]
pub struct KernelSet {
    kernels: Vec<Arc<dyn AddKernel>>,
}

impl KernelSet {
    /// Creates a set whose ground truth is `reference`.
    pub fn new(reference: Arc<dyn AddKernel>) -> Self {
        Self { kernels: vec![reference] }
    }

    /// Scalar ground truth followed by every variant the running CPU supports.
    pub fn detect() -> Self {
        let mut candidates: Vec<Arc<dyn AddKernel>> = vec![Arc::new(PrefetchKernel)];

        #[cfg(target_arch = "x86_64")]
        {
            candidates.push(Arc::new(Avx2Kernel));
            candidates.push(Arc::new(Avx2PrefetchKernel));
        }

        #[cfg(target_arch = "aarch64")]
        {
            candidates.push(Arc::new(NeonKernel));
            candidates.push(Arc::new(NeonAsmKernel));
        }

        let mut set = Self::new(Arc::new(ScalarKernel));
        for kernel in candidates {
            if kernel.is_available() {
                tracing::debug!(kernel = kernel.name(), "kernel available");
                set.kernels.push(kernel);
            } else {
                tracing::debug!(kernel = kernel.name(), "kernel not supported on this CPU");
            }
        }
        set
    }

    /// Appends a kernel, rejecting names already present.
    pub fn with(mut self, kernel: Arc<dyn AddKernel>) -> Result<Self> {
        if self.kernels.iter().any(|k| k.name() == kernel.name()) {
            return Err(KernelError::DuplicateName(kernel.name()));
        }
        if !kernel.is_available() {
            return Err(KernelError::Unavailable(kernel.name()));
        }
        self.kernels.push(kernel);
        Ok(self)
    }

    pub fn ground_truth(&self) -> &Arc<dyn AddKernel> {
        &self.kernels[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn AddKernel>> {
        self.kernels.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.kernels.iter().map(|k| k.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Always `false`; a set is built around its ground truth.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

impl Default for KernelSet {
    fn default() -> Self {
        Self::detect()
    }
}

impl std::fmt::Debug for KernelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
