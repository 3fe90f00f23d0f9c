//! Kernel set errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KernelError>;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("kernel name `{0}` is already registered")]
    DuplicateName(&'static str),

    #[error("kernel `{0}` is not supported on this CPU")]
    Unavailable(&'static str),
}
