//! Hash-based export and the identity wrapper for non-hashable keys.

use core::fmt;
use std::cell::Cell;
use std::hash::{Hash, Hasher};

use hashbrown::HashMap;

use crate::dict::OrdDict;
use crate::value::Value;

thread_local! {
    // Monotonic source of wrapper identity tags.
    static NEXT_TAG: Cell<u64> = const { Cell::new(0) };
}

/// Adapter making a non-hashable value usable as a key in a hash-based
/// mapping.
///
/// Equality compares wrapped values (a wrapper never equals a plain key);
/// the identity tag serves purely as the hash surrogate, so two wrappers
/// with equal contents may still land in different buckets. Clones share
/// the tag and therefore find the original entry.
#[derive(Debug, Clone)]
pub struct Wrapper {
    value: Value,
    tag: u64,
}

impl Wrapper {
    pub fn new(value: Value) -> Self {
        let tag = NEXT_TAG.with(|t| {
            let n = t.get();
            t.set(n + 1);
            n
        });
        Self { value, tag }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// Structural hash of the wrapped value, when it is hashable.
    pub fn content_hash(&self) -> Option<u64> {
        if !self.value.is_hashable() {
            return None;
        }
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.value.write_hash(&mut hasher);
        Some(hasher.finish())
    }
}

impl PartialEq for Wrapper {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Hash for Wrapper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.tag);
    }
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">({})<", self.value)
    }
}

/// Key of the exported hash mapping: a hashable value as-is, or a wrapped
/// non-hashable one.
///
/// `Eq` is a promise that `Float` NaN keys technically break; they stay
/// distinct entries in the exported map.
#[derive(Debug, Clone)]
pub enum ExportKey {
    Value(Value),
    Wrapped(Wrapper),
}

impl ExportKey {
    /// Classify a key: hashable values export as themselves, the rest get
    /// an identity wrapper.
    pub fn from_value(value: Value) -> Self {
        if value.is_hashable() {
            ExportKey::Value(value)
        } else {
            ExportKey::Wrapped(Wrapper::new(value))
        }
    }
}

impl PartialEq for ExportKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ExportKey::Value(a), ExportKey::Value(b)) => a == b,
            (ExportKey::Wrapped(a), ExportKey::Wrapped(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ExportKey {}

impl Hash for ExportKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ExportKey::Value(v) => v.write_hash(state),
            ExportKey::Wrapped(w) => w.hash(state),
        }
    }
}

impl OrdDict {
    /// Build a standard hash-based mapping from the pairs. Non-hashable
    /// keys are transparently wrapped so insertion still succeeds.
    pub fn to_plain_mapping(&self) -> HashMap<ExportKey, Value> {
        let mut out = HashMap::with_capacity(self.len());
        for (key, value) in self.iter() {
            out.insert(ExportKey::from_value(key.clone()), value.clone());
        }
        out
    }
}
