//! x86_64 CPU kernels with AVX2 optimizations
#![allow(unsafe_op_in_unsafe_fn)]

use crate::cpu::{fallback::ScalarKernel, prefetch::prefetch_read};
use crate::{same_len, AddKernel};
use std::arch::x86_64::*;

/// Lanes per 256-bit register.
const LANES: usize = 8;

/// Prefetch distance in registers for [`Avx2PrefetchKernel`].
const PREFETCH_AHEAD: usize = 3;

/// AVX2 kernel for x86_64
///
/// Adds eight lanes per instruction with unaligned loads and stores and
/// finishes the remainder with a scalar tail.
pub struct Avx2Kernel;

impl AddKernel for Avx2Kernel {
    fn name(&self) -> &'static str {
        "avx2"
    }

    fn is_available(&self) -> bool {
        is_x86_feature_detected!("avx2")
    }

    #[inline(never)]
    fn apply(&self, out: &mut [i32], a: &[i32], b: &[i32]) {
        if !same_len(out, a, b) {
            return;
        }
        if !self.is_available() {
            return ScalarKernel.apply(out, a, b);
        }

        // Safety: AVX2 availability checked above, lengths checked equal
        unsafe { add_avx2(out, a, b) }
    }
}

/// AVX2 kernel that prefetches three registers ahead of the load stream
pub struct Avx2PrefetchKernel;

impl AddKernel for Avx2PrefetchKernel {
    fn name(&self) -> &'static str {
        "avx2_prefetch"
    }

    fn is_available(&self) -> bool {
        is_x86_feature_detected!("avx2")
    }

    #[inline(never)]
    fn apply(&self, out: &mut [i32], a: &[i32], b: &[i32]) {
        if !same_len(out, a, b) {
            return;
        }
        if !self.is_available() {
            return ScalarKernel.apply(out, a, b);
        }

        // Safety: AVX2 availability checked above, lengths checked equal
        unsafe { add_avx2_prefetch(out, a, b) }
    }
}

#[target_feature(enable = "avx2")]
unsafe fn add_avx2(out: &mut [i32], a: &[i32], b: &[i32]) {
    let len = out.len();
    let chunks = len / LANES;
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();
    let out_ptr = out.as_mut_ptr();

    for chunk in 0..chunks {
        let offset = chunk * LANES;
        let va = _mm256_loadu_si256(a_ptr.add(offset).cast::<__m256i>());
        let vb = _mm256_loadu_si256(b_ptr.add(offset).cast::<__m256i>());
        _mm256_storeu_si256(out_ptr.add(offset).cast::<__m256i>(), _mm256_add_epi32(va, vb));
    }

    for i in chunks * LANES..len {
        out[i] = a[i].wrapping_add(b[i]);
    }
}

#[target_feature(enable = "avx2")]
unsafe fn add_avx2_prefetch(out: &mut [i32], a: &[i32], b: &[i32]) {
    let len = out.len();
    let chunks = len / LANES;
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();
    let out_ptr = out.as_mut_ptr();

    for step in 0..PREFETCH_AHEAD {
        prefetch_read(a_ptr.wrapping_add(step * LANES));
        prefetch_read(b_ptr.wrapping_add(step * LANES));
    }

    for chunk in 0..chunks {
        let offset = chunk * LANES;
        prefetch_read(a_ptr.wrapping_add(offset + PREFETCH_AHEAD * LANES));
        prefetch_read(b_ptr.wrapping_add(offset + PREFETCH_AHEAD * LANES));

        let va = _mm256_loadu_si256(a_ptr.add(offset).cast::<__m256i>());
        let vb = _mm256_loadu_si256(b_ptr.add(offset).cast::<__m256i>());
        _mm256_storeu_si256(out_ptr.add(offset).cast::<__m256i>(), _mm256_add_epi32(va, vb));
    }

    for i in chunks * LANES..len {
        out[i] = a[i].wrapping_add(b[i]);
    }
}
