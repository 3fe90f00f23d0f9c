//! ARM NEON kernel implementations
//!
//! Two variants: one written with NEON intrinsics and one written as an
//! inline-assembly loop, both processing four lanes per step with a scalar
//! tail.
#![allow(unsafe_op_in_unsafe_fn)]

use crate::cpu::fallback::ScalarKernel;
use crate::{same_len, AddKernel};
use std::arch::aarch64::*;

/// Lanes per 128-bit register.
const LANES: usize = 4;

/// NEON intrinsics kernel for ARM64
pub struct NeonKernel;

impl AddKernel for NeonKernel {
    fn name(&self) -> &'static str {
        "neon"
    }

    fn is_available(&self) -> bool {
        // NEON is mandatory on ARM64, but check for safety
        std::arch::is_aarch64_feature_detected!("neon")
    }

    #[inline(never)]
    fn apply(&self, out: &mut [i32], a: &[i32], b: &[i32]) {
        if !same_len(out, a, b) {
            return;
        }
        if !self.is_available() {
            return ScalarKernel.apply(out, a, b);
        }

        // Safety: NEON availability checked above, lengths checked equal
        unsafe { add_neon(out, a, b) }
    }
}

/// Inline-assembly NEON kernel for ARM64
pub struct NeonAsmKernel;

impl AddKernel for NeonAsmKernel {
    fn name(&self) -> &'static str {
        "neon_asm"
    }

    fn is_available(&self) -> bool {
        std::arch::is_aarch64_feature_detected!("neon")
    }

    #[inline(never)]
    fn apply(&self, out: &mut [i32], a: &[i32], b: &[i32]) {
        if !same_len(out, a, b) {
            return;
        }
        if !self.is_available() {
            return ScalarKernel.apply(out, a, b);
        }

        let chunks = out.len() / LANES;
        // Safety: NEON availability checked above; the loop touches exactly
        // `chunks * 4` elements of each slice, all in bounds.
        unsafe { add_neon_asm(out.as_mut_ptr(), a.as_ptr(), b.as_ptr(), chunks) }

        for i in chunks * LANES..out.len() {
            out[i] = a[i].wrapping_add(b[i]);
        }
    }
}

#[target_feature(enable = "neon")]
unsafe fn add_neon(out: &mut [i32], a: &[i32], b: &[i32]) {
    let len = out.len();
    let chunks = len / LANES;
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();
    let out_ptr = out.as_mut_ptr();

    for chunk in 0..chunks {
        let offset = chunk * LANES;
        let va = vld1q_s32(a_ptr.add(offset));
        let vb = vld1q_s32(b_ptr.add(offset));
        vst1q_s32(out_ptr.add(offset), vaddq_s32(va, vb));
    }

    for i in chunks * LANES..len {
        out[i] = a[i].wrapping_add(b[i]);
    }
}

/// Adds `chunks` groups of four lanes. Pointers advance by post-increment.
unsafe fn add_neon_asm(dst: *mut i32, lhs: *const i32, rhs: *const i32, chunks: usize) {
    if chunks == 0 {
        return;
    }

    std::arch::asm!(
        "2:",
        "ld1 {{v0.4s}}, [{lhs}], #16",
        "ld1 {{v1.4s}}, [{rhs}], #16",
        "add v0.4s, v0.4s, v1.4s",
        "st1 {{v0.4s}}, [{dst}], #16",
        "subs {n}, {n}, #1",
        "b.ne 2b",
        lhs = inout(reg) lhs => _,
        rhs = inout(reg) rhs => _,
        dst = inout(reg) dst => _,
        n = inout(reg) chunks => _,
        out("v0") _,
        out("v1") _,
        options(nostack),
    );
}
