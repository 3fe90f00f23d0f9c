//! Scalar reference kernel
//!
//! A plain indexed loop with no vectorization hints. It works on any
//! architecture and is the ground truth every other kernel is checked against.

use crate::{same_len, AddKernel};

/// Scalar kernel that works on any architecture
///
/// Always available. Registered first so that its output is the reference
/// for correctness validation.
pub struct ScalarKernel;

impl AddKernel for ScalarKernel {
    fn name(&self) -> &'static str {
        "c"
    }

    fn is_available(&self) -> bool {
        true
    }

    #[inline(never)]
    #[allow(clippy::needless_range_loop)]
    fn apply(&self, out: &mut [i32], a: &[i32], b: &[i32]) {
        if !same_len(out, a, b) {
            return;
        }

        for i in 0..out.len() {
            out[i] = a[i].wrapping_add(b[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_basic() {
        let a = [1, 2, 3, -4];
        let b = [10, 20, 30, 40];
        let mut out = [0; 4];
        ScalarKernel.apply(&mut out, &a, &b);
        assert_eq!(out, [11, 22, 33, 36]);
    }

    #[test]
    fn test_scalar_wraps_on_overflow() {
        let a = [i32::MAX, i32::MIN, -1];
        let b = [1, -1, i32::MIN];
        let mut out = [0; 3];
        ScalarKernel.apply(&mut out, &a, &b);
        assert_eq!(out, [i32::MIN, i32::MAX, i32::MAX]);
    }

    #[test]
    fn test_scalar_length_mismatch_is_noop() {
        let a = [1, 2, 3];
        let b = [1, 2];
        let mut out = [7; 3];
        ScalarKernel.apply(&mut out, &a, &b);
        assert_eq!(out, [7, 7, 7]);
    }

    #[test]
    fn test_scalar_empty() {
        let mut out: [i32; 0] = [];
        ScalarKernel.apply(&mut out, &[], &[]);
    }
}
