//! Correctness cross-check against the ground-truth output

use std::fmt;

/// How a candidate buffer differs from the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// The buffers have different lengths.
    Length { candidate: usize, reference: usize },
    /// First index whose values differ.
    Value { index: usize, candidate: i32, reference: i32 },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Length { candidate, reference } => {
                write!(f, "length {candidate} != reference length {reference}")
            }
            Mismatch::Value { index, candidate, reference } => {
                write!(f, "element {index}: {candidate} != reference {reference}")
            }
        }
    }
}

/// Requires equal length and equal values at every index.
pub fn cross_check(candidate: &[i32], reference: &[i32]) -> Result<(), Mismatch> {
    if candidate.len() != reference.len() {
        return Err(Mismatch::Length {
            candidate: candidate.len(),
            reference: reference.len(),
        });
    }

    match candidate.iter().zip(reference).position(|(c, r)| c != r) {
        None => Ok(()),
        Some(index) => Err(Mismatch::Value {
            index,
            candidate: candidate[index],
            reference: reference[index],
        }),
    }
}
