//! Scalar kernel with software prefetch hints
//!
//! Same loop as the scalar kernel, but before each element it issues a
//! non-temporal read hint for the next element of both inputs.

use crate::{same_len, AddKernel};

/// Issues a streaming read-prefetch hint for `ptr`.
///
/// Prefetch never faults, so `ptr` may point one past the end of a slice.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub(crate) fn prefetch_read(ptr: *const i32) {
    use std::arch::x86_64::{_mm_prefetch, _MM_HINT_NTA};
    // SAFETY: SSE is part of the x86_64 baseline and prefetch does not dereference.
    unsafe { _mm_prefetch::<_MM_HINT_NTA>(ptr.cast::<i8>()) }
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
pub(crate) fn prefetch_read(ptr: *const i32) {
    // SAFETY: PRFM is a hint and does not access memory architecturally.
    unsafe {
        std::arch::asm!(
            "prfm pldl1strm, [{0}]",
            in(reg) ptr,
            options(nostack, readonly, preserves_flags)
        );
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
pub(crate) fn prefetch_read(_ptr: *const i32) {}

/// Scalar kernel that prefetches one element ahead
pub struct PrefetchKernel;

impl AddKernel for PrefetchKernel {
    fn name(&self) -> &'static str {
        "c_prefetch"
    }

    fn is_available(&self) -> bool {
        true
    }

    #[inline(never)]
    fn apply(&self, out: &mut [i32], a: &[i32], b: &[i32]) {
        if !same_len(out, a, b) {
            return;
        }

        let a_ptr = a.as_ptr();
        let b_ptr = b.as_ptr();
        prefetch_read(a_ptr);
        prefetch_read(b_ptr);

        for (i, (o, (&x, &y))) in out.iter_mut().zip(a.iter().zip(b)).enumerate() {
            prefetch_read(a_ptr.wrapping_add(i + 1));
            prefetch_read(b_ptr.wrapping_add(i + 1));
            *o = x.wrapping_add(y);
        }
    }
}
