//! ord-dict: an insertion-ordered key/value container with an explicit
//! mutable/frozen state and cycle-safe display.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep each concern in a small layer that can be reasoned about
//!   independently.
//! - Layers:
//!   - `Value`: dynamic key/value model; scalars inline, compound values
//!     behind shared `Rc` handles so aliasing and cycles are expressible.
//!   - `Source`/`Builder`: one-time input classification and validation at
//!     the construction boundary; everything past it trusts the length and
//!     uniqueness invariants.
//!   - `OrdDict`: parallel key/value sequences behind a two-state storage
//!     machine: growable vectors while mutable, fixed shared slices once
//!     frozen.
//!   - `display`: guarded renderer tracking the compound identities open
//!     on the recursion path; cycles render as the reserved `[...]` token.
//!   - `export`: hash-based mapping view; non-hashable keys ride behind an
//!     identity wrapper.
//!
//! Constraints
//! - Single-threaded: `Rc`/`RefCell` values and thread-local policy make
//!   the types `!Send`/`!Sync` by construction.
//! - Lookup is a linear scan: keys need only equality, not hashing, and
//!   insertion order is the iteration order.
//! - Key uniqueness holds after every operation: duplicates collapse to
//!   the first occurrence's position carrying the last occurrence's value,
//!   including after key/value swaps.
//! - Frozen containers never mutate in place. Operations either fail with
//!   `ImmutableViolation`, report the typed `Mutation::Skipped` signal
//!   (lenient policy), or produce a new container (`swap_all`, `swap_at`,
//!   `reversed`, the state conversions).
//!
//! Notes and non-goals
//! - No hashing-based lookup, no thread-safety, no persistence or wire
//!   format.
//! - The reserved marker `[...]` denotes cycles in rendered output and is
//!   rejected as stored content.
//! - Policy flags (frozen handling, equality strictness, verbatim strings)
//!   are process-wide (thread-local), not per-instance; see [`policy`].
//! - Shallow copies share compound values on purpose: mutating a nested
//!   value reachable from two containers is visible in both.

mod builder;
mod dict;
mod display;
mod error;
mod export;
pub mod policy;
mod selector;
mod unique;
mod value;

// Public surface
pub use builder::{Builder, Source};
pub use dict::{Info, InfoShape, OrdDict, PairSource};
pub use display::RECURSION_MARKER;
pub use error::{Error, Mutation};
pub use export::{ExportKey, Wrapper};
pub use policy::Policy;
pub use selector::{Place, Selector};
pub use value::Value;
