//! Error kinds and the typed non-raising mutation signal.

use core::fmt;

/// Errors reported by container operations.
///
/// All are returned synchronously at the call that violates the contract;
/// nothing is retried or recovered internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Lookup or deletion of a key that is not present. Carries the
    /// rendered key.
    KeyNotFound(String),
    /// Keys/values count disagreement at construction or ranged assignment.
    LengthMismatch { expected: usize, got: usize },
    /// Input the container cannot accept: unordered or non-sequence
    /// arguments, a zero selector step, or the reserved `[...]` marker used
    /// as key or value content.
    TypeMismatch(String),
    /// Structural mutation attempted on a frozen container.
    ImmutableViolation,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound(key) => write!(f, "key {key} not found"),
            Error::LengthMismatch { expected, got } => {
                write!(f, "length mismatch: expected {expected} elements, got {got}")
            }
            Error::TypeMismatch(msg) => f.write_str(msg),
            Error::ImmutableViolation => f.write_str("container is frozen"),
        }
    }
}

impl std::error::Error for Error {}

/// Outcome of an in-place mutation.
///
/// `Skipped` is only produced on a frozen container when the process-wide
/// [`frozen_is_error`](crate::Policy::frozen_is_error) flag is cleared;
/// under the default policy frozen mutation is an
/// [`Error::ImmutableViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The container was modified.
    Applied,
    /// The container was frozen and left untouched.
    Skipped,
}
