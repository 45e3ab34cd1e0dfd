//! Process-wide behavior flags.
//!
//! Stored thread-locally, in line with the crate's single-threaded design.
//! Defaults are fixed at init time; library code reads the flags at the
//! operations they gate and never mutates them.

use core::cell::RefCell;

use crate::value::Value;

/// Global knobs gating frozen-mutation handling, equality strictness and
/// string rendering. Global means per-thread here, not per-instance.
#[derive(Debug, Clone)]
pub struct Policy {
    /// When set (default), structural mutation of a frozen container is an
    /// [`Error::ImmutableViolation`](crate::Error); when cleared, such
    /// operations no-op and report [`Mutation::Skipped`](crate::Mutation).
    pub frozen_is_error: bool,
    /// When set (default), container equality also requires matching
    /// mutability states.
    pub eq_includes_mutability: bool,
    /// Values rendered in their natural string form instead of the quoted
    /// debug form.
    pub display_verbatim: Vec<Value>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            frozen_is_error: true,
            eq_includes_mutability: true,
            display_verbatim: Vec::new(),
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Policy> = RefCell::new(Policy::default());
}

pub(crate) fn with<R>(f: impl FnOnce(&Policy) -> R) -> R {
    CURRENT.with(|p| f(&p.borrow()))
}

/// Copy of the current policy.
pub fn snapshot() -> Policy {
    CURRENT.with(|p| p.borrow().clone())
}

/// Install a new policy, returning the previous one.
pub fn replace(policy: Policy) -> Policy {
    CURRENT.with(|p| core::mem::replace(&mut *p.borrow_mut(), policy))
}

/// Adjust the current policy in place.
pub fn configure(f: impl FnOnce(&mut Policy)) {
    CURRENT.with(|p| f(&mut *p.borrow_mut()));
}
