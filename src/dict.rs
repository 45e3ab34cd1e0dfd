//! The ordered key/value container.

use std::ops::Add;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::builder::{reject_marker, Builder, Source};
use crate::error::{Error, Mutation};
use crate::export::ExportKey;
use crate::policy;
use crate::selector::{Place, Selector};
use crate::unique;
use crate::value::Value;

/// Storage for the two mutability states. `Open` is growable; `Fixed` is
/// fixed-length and structurally shared on copy.
#[derive(Clone)]
enum Store {
    Open { keys: Vec<Value>, values: Vec<Value> },
    Fixed { keys: Rc<[Value]>, values: Rc<[Value]> },
}

/// Insertion-ordered key/value container with an explicit mutable/frozen
/// state.
///
/// Keys are unique under equality and looked up by linear scan, trading
/// constant-time access for preserved order and non-hashable keys. Shallow
/// copies (`Clone`) share compound values: mutating a nested value
/// reachable from two containers is visible in both.
#[derive(Clone)]
pub struct OrdDict {
    store: Store,
}

thread_local! {
    // Canonical empty-frozen instance; handed-out clones share its storage.
    static EMPTY_FROZEN: OrdDict = OrdDict {
        store: Store::Fixed {
            keys: Rc::from(Vec::new()),
            values: Rc::from(Vec::new()),
        },
    };
}

impl OrdDict {
    /// New empty mutable container.
    pub fn new() -> Self {
        Self {
            store: Store::Open {
                keys: Vec::new(),
                values: Vec::new(),
            },
        }
    }

    /// The canonical empty-frozen instance. Construction that nets out to
    /// an empty frozen container returns this instead of allocating.
    pub fn empty_frozen() -> Self {
        EMPTY_FROZEN.with(Self::clone)
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Build from explicit pairs; duplicate keys collapse, later entries
    /// winning.
    pub fn from_pairs(entries: Vec<(Value, Value)>) -> Result<Self, Error> {
        Self::builder().keys(Source::pairs(entries)).build()
    }

    /// Build from keys all mapped to one repeated default value.
    pub fn from_keys(keys: Vec<Value>, default: Value) -> Result<Self, Error> {
        let values = vec![default; keys.len()];
        Self::builder()
            .keys(Source::seq(keys))
            .values(Source::seq(values))
            .build()
    }

    /// Low-level factory trusting already-unique, already-length-matched
    /// sequences; skips validation. Callers are responsible for the key
    /// uniqueness and length invariants.
    pub fn from_raw_parts(keys: Vec<Value>, values: Vec<Value>, mutable: bool) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        if mutable {
            return Self {
                store: Store::Open { keys, values },
            };
        }
        if keys.is_empty() {
            return Self::empty_frozen();
        }
        Self {
            store: Store::Fixed {
                keys: keys.into(),
                values: values.into(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self.store, Store::Open { .. })
    }

    pub fn is_frozen(&self) -> bool {
        !self.is_mutable()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> &[Value] {
        match &self.store {
            Store::Open { keys, .. } => keys,
            Store::Fixed { keys, .. } => keys,
        }
    }

    /// Values in key order.
    pub fn values(&self) -> &[Value] {
        match &self.store {
            Store::Open { values, .. } => values,
            Store::Fixed { values, .. } => values,
        }
    }

    /// Ordered `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.keys().iter().zip(self.values().iter())
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.keys().iter().position(|k| k == key)
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &Value) -> Result<&Value, Error> {
        match self.position(key) {
            Some(i) => Ok(&self.values()[i]),
            None => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    /// Value stored under `key`, or the supplied default when absent.
    pub fn get_or<'a>(&'a self, key: &Value, default: &'a Value) -> &'a Value {
        self.position(key)
            .map(|i| &self.values()[i])
            .unwrap_or(default)
    }

    /// Values at the selected positions.
    pub fn values_at(&self, selector: Selector) -> Result<Vec<Value>, Error> {
        let positions = selector.positions(self.len())?;
        Ok(positions
            .into_iter()
            .map(|i| self.values()[i].clone())
            .collect())
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    pub fn contains_value(&self, value: &Value) -> bool {
        self.values().iter().any(|v| v == value)
    }

    /// Every key whose value equals `value`, in order.
    pub fn keys_with(&self, value: &Value) -> Vec<&Value> {
        self.iter()
            .filter(|(_, v)| *v == value)
            .map(|(k, _)| k)
            .collect()
    }

    /// Single chokepoint for in-place mutation: open storage, the frozen
    /// error, or `None` for the lenient skip signal.
    fn open_mut(&mut self) -> Result<Option<(&mut Vec<Value>, &mut Vec<Value>)>, Error> {
        match &mut self.store {
            Store::Open { keys, values } => Ok(Some((keys, values))),
            Store::Fixed { .. } => {
                if policy::with(|p| p.frozen_is_error) {
                    Err(Error::ImmutableViolation)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Overwrite the value under an existing key, or append a new pair.
    pub fn set(&mut self, key: Value, value: Value) -> Result<Mutation, Error> {
        let Some((keys, values)) = self.open_mut()? else {
            return Ok(Mutation::Skipped);
        };
        reject_marker(&key)?;
        reject_marker(&value)?;
        match keys.iter().position(|k| *k == key) {
            Some(i) => values[i] = value,
            None => {
                keys.push(key);
                values.push(value);
            }
        }
        Ok(Mutation::Applied)
    }

    /// Replace the values at the selected positions. The replacement must
    /// have exactly as many elements as the selection.
    pub fn set_range(&mut self, selector: Selector, replacement: &[Value]) -> Result<Mutation, Error> {
        let len = self.len();
        let Some((_, values)) = self.open_mut()? else {
            return Ok(Mutation::Skipped);
        };
        let positions = selector.positions(len)?;
        if positions.len() != replacement.len() {
            return Err(Error::LengthMismatch {
                expected: positions.len(),
                got: replacement.len(),
            });
        }
        for value in replacement {
            reject_marker(value)?;
        }
        for (i, value) in positions.into_iter().zip(replacement) {
            values[i] = value.clone();
        }
        Ok(Mutation::Applied)
    }

    /// Remove the pair under `key`, returning its value. `Ok(None)` is the
    /// skipped signal on a frozen container under the lenient policy.
    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, Error> {
        let Some((keys, values)) = self.open_mut()? else {
            return Ok(None);
        };
        match keys.iter().position(|k| k == key) {
            Some(i) => {
                keys.remove(i);
                Ok(Some(values.remove(i)))
            }
            None => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    /// Remove like [`remove`](Self::remove), but a missing key yields the
    /// supplied default instead of an error.
    pub fn remove_or(&mut self, key: &Value, default: Value) -> Result<Option<Value>, Error> {
        match self.remove(key) {
            Err(Error::KeyNotFound(_)) => Ok(Some(default)),
            other => other,
        }
    }

    /// Drop the pairs at the selected positions.
    pub fn remove_range(&mut self, selector: Selector) -> Result<Mutation, Error> {
        let len = self.len();
        let Some((keys, values)) = self.open_mut()? else {
            return Ok(Mutation::Skipped);
        };
        let mut positions = selector.positions(len)?;
        // Remove back to front so earlier positions stay valid.
        positions.sort_unstable_by(|a, b| b.cmp(a));
        for i in positions {
            keys.remove(i);
            values.remove(i);
        }
        Ok(Mutation::Applied)
    }

    /// Value under `key`, inserting `(key, default)` first when absent.
    ///
    /// Unconditionally an error on a frozen container; this operation never
    /// degrades to a skip signal.
    pub fn setdefault(&mut self, key: Value, default: Value) -> Result<Value, Error> {
        let Store::Open { keys, values } = &mut self.store else {
            return Err(Error::ImmutableViolation);
        };
        reject_marker(&key)?;
        reject_marker(&default)?;
        match keys.iter().position(|k| *k == key) {
            Some(i) => Ok(values[i].clone()),
            None => {
                let out = default.clone();
                keys.push(key);
                values.push(default);
                Ok(out)
            }
        }
    }

    /// Remove all pairs.
    pub fn clear(&mut self) -> Result<Mutation, Error> {
        let Some((keys, values)) = self.open_mut()? else {
            return Ok(Mutation::Skipped);
        };
        keys.clear();
        values.clear();
        Ok(Mutation::Applied)
    }

    /// Freeze in place; idempotent.
    pub fn freeze(&mut self) {
        if let Store::Open { keys, values } = &mut self.store {
            let keys = std::mem::take(keys);
            let values = std::mem::take(values);
            *self = Self::from_raw_parts(keys, values, false);
        }
    }

    /// Mutable form: self when already mutable, otherwise a thawed copy.
    pub fn into_mutable(self) -> Self {
        match self.store {
            Store::Open { .. } => self,
            Store::Fixed { keys, values } => Self {
                store: Store::Open {
                    keys: keys.to_vec(),
                    values: values.to_vec(),
                },
            },
        }
    }

    /// Frozen form: self when already frozen, otherwise a frozen copy.
    pub fn into_frozen(mut self) -> Self {
        self.freeze();
        self
    }

    /// Fully independent recursive duplicate; preserves internal aliasing
    /// and cycles, and keeps the mutability state.
    pub fn deep_copy(&self) -> Self {
        let mut memo = HashMap::new();
        self.deep_copy_with(&mut memo)
    }

    pub(crate) fn deep_copy_with(&self, memo: &mut HashMap<usize, Value>) -> Self {
        let keys: Vec<Value> = self.keys().iter().map(|k| k.deep_copy(memo)).collect();
        let values: Vec<Value> = self.values().iter().map(|v| v.deep_copy(memo)).collect();
        Self::from_raw_parts(keys, values, self.is_mutable())
    }

    /// Drop allocator overallocation on a mutable container; no-op when
    /// frozen.
    pub fn shrink(&mut self) {
        if let Store::Open { keys, values } = &mut self.store {
            keys.shrink_to_fit();
            values.shrink_to_fit();
        }
    }

    /// Non-destructive merge: the pairs of `self` then the pairs of
    /// `other`, later entries winning on key collision. An empty receiver
    /// returns the other operand unchanged (state included); otherwise the
    /// result is mutable.
    pub fn merge(&self, other: &OrdDict) -> OrdDict {
        if self.is_empty() {
            return other.clone();
        }
        let mut keys = self.keys().to_vec();
        let mut values = self.values().to_vec();
        keys.extend(other.keys().iter().cloned());
        values.extend(other.values().iter().cloned());
        let (keys, values) = unique::collapse_duplicates(keys, values);
        OrdDict::from_raw_parts(keys, values, true)
    }

    /// Destructive merge; later entries win on key collision.
    pub fn extend(&mut self, source: impl Into<PairSource>) -> Result<Mutation, Error> {
        let pairs = source.into().into_pairs()?;
        let Some((keys, values)) = self.open_mut()? else {
            return Ok(Mutation::Skipped);
        };
        for (key, value) in &pairs {
            reject_marker(key)?;
            reject_marker(value)?;
        }
        for (key, value) in pairs {
            keys.push(key);
            values.push(value);
        }
        let (new_keys, new_values) =
            unique::collapse_duplicates(std::mem::take(keys), std::mem::take(values));
        *keys = new_keys;
        *values = new_values;
        Ok(Mutation::Applied)
    }

    /// Reverse the pair order in place.
    pub fn reverse(&mut self) -> Result<Mutation, Error> {
        let Some((keys, values)) = self.open_mut()? else {
            return Ok(Mutation::Skipped);
        };
        keys.reverse();
        values.reverse();
        Ok(Mutation::Applied)
    }

    /// A frozen copy with reversed pair order; works on either state and
    /// leaves the receiver untouched.
    pub fn reversed(&self) -> OrdDict {
        let keys: Vec<Value> = self.keys().iter().rev().cloned().collect();
        let values: Vec<Value> = self.values().iter().rev().cloned().collect();
        OrdDict::from_raw_parts(keys, values, false)
    }

    fn into_parts(self) -> (Vec<Value>, Vec<Value>) {
        match self.store {
            Store::Open { keys, values } => (keys, values),
            Store::Fixed { keys, values } => (keys.to_vec(), values.to_vec()),
        }
    }

    /// Exchange the roles of keys and values wholesale. A frozen receiver
    /// yields a new frozen container with the swap applied. Former values
    /// need not be unique, so colliding keys collapse (later entries win).
    pub fn swap_all(self) -> OrdDict {
        let mutable = self.is_mutable();
        let (keys, values) = self.into_parts();
        let (keys, values) = unique::collapse_duplicates(values, keys);
        OrdDict::from_raw_parts(keys, values, mutable)
    }

    /// Exchange key and value at one position or across a span; same
    /// frozen fallback and collision handling as [`swap_all`](Self::swap_all).
    pub fn swap_at(self, place: impl Into<Place>) -> Result<OrdDict, Error> {
        let len = self.len();
        let positions = match place.into() {
            Place::At(i) => {
                if i >= len {
                    return Err(Error::KeyNotFound(format!("position {i}")));
                }
                vec![i]
            }
            Place::Span(selector) => selector.positions(len)?,
        };
        let mutable = self.is_mutable();
        let (mut keys, mut values) = self.into_parts();
        for i in positions {
            std::mem::swap(&mut keys[i], &mut values[i]);
        }
        let (keys, values) = unique::collapse_duplicates(keys, values);
        Ok(OrdDict::from_raw_parts(keys, values, mutable))
    }

    /// Diagnostic snapshot (size estimate, identity token, keys, values,
    /// length) in the caller-selected shape.
    pub fn info(&self, shape: InfoShape) -> Info {
        let size = self.estimated_size();
        let id = self as *const OrdDict as usize;
        match shape {
            InfoShape::Text => Info::Text(format!(
                "size = {size} bytes, id = {id}, keys = {keys}, values = {values}, len = {len}",
                keys = Value::list(self.keys().to_vec()),
                values = Value::list(self.values().to_vec()),
                len = self.len(),
            )),
            InfoShape::Mapping | InfoShape::Dict => {
                let keys = vec![
                    Value::str("size"),
                    Value::str("id"),
                    Value::str("keys"),
                    Value::str("values"),
                    Value::str("length"),
                ];
                let values = vec![
                    Value::Int(size as i64),
                    Value::Int(id as i64),
                    Value::list(self.keys().to_vec()),
                    Value::list(self.values().to_vec()),
                    Value::Int(self.len() as i64),
                ];
                let snapshot = OrdDict::from_raw_parts(keys, values, false);
                if shape == InfoShape::Mapping {
                    Info::Mapping(snapshot.to_plain_mapping())
                } else {
                    Info::Dict(snapshot)
                }
            }
        }
    }

    /// Shallow byte estimate: the container, spare slot capacity, and the
    /// inline footprint of each entry. Shared children are not attributed.
    pub fn estimated_size(&self) -> usize {
        let spare = match &self.store {
            Store::Open { keys, values } => {
                (keys.capacity() - keys.len() + values.capacity() - values.len())
                    * core::mem::size_of::<Value>()
            }
            Store::Fixed { .. } => 0,
        };
        let entries: usize = self
            .iter()
            .map(|(k, v)| k.estimated_size() + v.estimated_size())
            .sum();
        core::mem::size_of::<Self>() + spare + entries
    }
}

impl Default for OrdDict {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for OrdDict {
    /// Key sequences equal, value sequences equal, and (when the
    /// process-wide `eq_includes_mutability` flag is set, the default)
    /// matching mutability states.
    fn eq(&self, other: &Self) -> bool {
        if self.keys() != other.keys() || self.values() != other.values() {
            return false;
        }
        !policy::with(|p| p.eq_includes_mutability) || self.is_mutable() == other.is_mutable()
    }
}

impl Add<&OrdDict> for &OrdDict {
    type Output = OrdDict;

    fn add(self, other: &OrdDict) -> OrdDict {
        self.merge(other)
    }
}

impl<'a> IntoIterator for &'a OrdDict {
    type Item = (&'a Value, &'a Value);
    type IntoIter = std::iter::Zip<std::slice::Iter<'a, Value>, std::slice::Iter<'a, Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys().iter().zip(self.values().iter())
    }
}

/// Sources accepted by [`OrdDict::extend`].
#[derive(Debug, Clone)]
pub enum PairSource {
    Dict(OrdDict),
    /// Parallel key and value sequences.
    Parallel(Vec<Value>, Vec<Value>),
    /// Pre-zipped pairs.
    Zipped(Vec<(Value, Value)>),
}

impl PairSource {
    fn into_pairs(self) -> Result<Vec<(Value, Value)>, Error> {
        match self {
            PairSource::Dict(dict) => Ok(dict
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()),
            PairSource::Parallel(keys, values) => {
                if keys.len() != values.len() {
                    return Err(Error::LengthMismatch {
                        expected: keys.len(),
                        got: values.len(),
                    });
                }
                Ok(keys.into_iter().zip(values).collect())
            }
            PairSource::Zipped(pairs) => Ok(pairs),
        }
    }
}

impl From<OrdDict> for PairSource {
    fn from(dict: OrdDict) -> Self {
        PairSource::Dict(dict)
    }
}

impl From<&OrdDict> for PairSource {
    fn from(dict: &OrdDict) -> Self {
        PairSource::Dict(dict.clone())
    }
}

impl From<(Vec<Value>, Vec<Value>)> for PairSource {
    fn from((keys, values): (Vec<Value>, Vec<Value>)) -> Self {
        PairSource::Parallel(keys, values)
    }
}

impl From<Vec<(Value, Value)>> for PairSource {
    fn from(pairs: Vec<(Value, Value)>) -> Self {
        PairSource::Zipped(pairs)
    }
}

/// Shapes accepted by [`OrdDict::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoShape {
    Text,
    Mapping,
    Dict,
}

/// Diagnostic snapshot in the caller-selected shape.
#[derive(Debug)]
pub enum Info {
    Text(String),
    Mapping(HashMap<ExportKey, Value>),
    Dict(OrdDict),
}
