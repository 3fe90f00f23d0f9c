//! Console line formatting for progress, failure dumps and stop reasons

use crate::worker::WorkerOutcome;
use std::fmt::Write;

/// Elements shown per buffer in a failure dump.
pub const DUMP_LIMIT: usize = 50;

pub fn progress_line(thread: usize, iteration: u64) -> String {
    format!("[t={thread}] i={iteration}")
}

pub fn failure_line(thread: usize, kernel: &str, iteration: u64) -> String {
    format!("[t={thread}] {kernel} fail on i={iteration}!")
}

/// `[t=<thread>] <name>[<len>]={v0,v1,...,}` with `...` when truncated.
pub fn buffer_dump(thread: usize, name: &str, buf: &[i32]) -> String {
    let mut line = format!("[t={thread}] {name}[{}]={{", buf.len());
    for value in buf.iter().take(DUMP_LIMIT) {
        let _ = write!(line, "{value},");
    }
    if buf.len() > DUMP_LIMIT {
        line.push_str("...");
    }
    line.push('}');
    line
}

/// `None` for outcomes that end with a failure dump instead.
pub fn stop_line(thread: usize, outcome: &WorkerOutcome) -> Option<String> {
    let reason = match outcome {
        WorkerOutcome::Limit => "limit",
        WorkerOutcome::Signal => "signal",
        WorkerOutcome::PeerFailure => "peer failure",
        WorkerOutcome::Failed { .. } => return None,
    };
    Some(format!("[t={thread}] stop on {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Mismatch;

    #[test]
    fn progress_and_failure_lines() {
        assert_eq!(progress_line(3, 17), "[t=3] i=17");
        assert_eq!(failure_line(0, "avx2", 2), "[t=0] avx2 fail on i=2!");
    }

    #[test]
    fn short_buffer_dump_is_complete() {
        assert_eq!(buffer_dump(1, "c", &[1, -2, 3]), "[t=1] c[3]={1,-2,3,}");
        assert_eq!(buffer_dump(1, "c", &[]), "[t=1] c[0]={}");
    }

    #[test]
    fn long_buffer_dump_is_truncated() {
        let buf: Vec<i32> = (0..1000).collect();
        let line = buffer_dump(0, "neon", &buf);
        assert!(line.starts_with("[t=0] neon[1000]={0,1,2,"));
        assert!(line.ends_with("48,49,...}"));
        assert!(!line.contains(",50,"));
    }

    #[test]
    fn exactly_limit_elements_has_no_ellipsis() {
        let buf = vec![0; DUMP_LIMIT];
        assert!(!buffer_dump(0, "c", &buf).contains("..."));
    }

    #[test]
    fn stop_lines() {
        assert_eq!(stop_line(2, &WorkerOutcome::Limit).as_deref(), Some("[t=2] stop on limit"));
        assert_eq!(stop_line(2, &WorkerOutcome::Signal).as_deref(), Some("[t=2] stop on signal"));
        assert_eq!(
            stop_line(2, &WorkerOutcome::PeerFailure).as_deref(),
            Some("[t=2] stop on peer failure")
        );
        let failed = WorkerOutcome::Failed {
            kernel: "x",
            iteration: 0,
            mismatch: Mismatch::Length { candidate: 0, reference: 1 },
        };
        assert_eq!(stop_line(2, &failed), None);
    }
}
