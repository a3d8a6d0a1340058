//! Error types for kernel launch contracts.

use thiserror::Error;

/// Errors raised when a kernel's buffer contract is violated.
///
/// The kernels themselves perform no per-index bounds checking; every
/// failure mode is caught up front by validating buffer lengths against the
/// layout before any element is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// A buffer does not match the length implied by its layout.
    #[error("buffer `{buffer}` has length {actual}, layout requires {expected}")]
    SizeMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The RK work buffer is narrower than the solution it accumulates.
    #[error("work buffer carries {n_work} variable slots, solution requires {n_var}")]
    WorkWidthTooSmall { n_work: usize, n_var: usize },
}

impl KernelError {
    /// Create a size-mismatch error for a named buffer.
    pub fn size_mismatch(buffer: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            buffer,
            expected,
            actual,
        }
    }
}

/// Check a buffer length against its layout-implied length.
pub(crate) fn check_len(
    buffer: &'static str,
    actual: usize,
    expected: usize,
) -> Result<(), KernelError> {
    if actual == expected {
        Ok(())
    } else {
        Err(KernelError::size_mismatch(buffer, expected, actual))
    }
}
