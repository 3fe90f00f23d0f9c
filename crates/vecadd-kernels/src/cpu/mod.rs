//! CPU kernel implementations

pub mod fallback;
pub mod prefetch;

#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod arm;

pub use fallback::ScalarKernel;
pub use prefetch::PrefetchKernel;

#[cfg(target_arch = "x86_64")]
pub use x86::{Avx2Kernel, Avx2PrefetchKernel};

#[cfg(target_arch = "aarch64")]
pub use arm::{NeonAsmKernel, NeonKernel};
