//! vecadd-bench CLI library
//!
//! Exposes the exit codes and interrupt handling for testing.

pub mod exit;
pub mod signal;
