// Exit codes reported on the final `exitCode=` line and to the shell
use vecadd_harness::RunSummary;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_KERNEL_MISMATCH: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 130;

/// Exit code for a run that completed without a fatal error.
pub fn code_for(summary: &RunSummary) -> i32 {
    if summary.failed() {
        EXIT_KERNEL_MISMATCH
    } else {
        EXIT_SUCCESS
    }
}
