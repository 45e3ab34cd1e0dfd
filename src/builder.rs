//! Construction boundary: input-shape classification and validation.
//!
//! Every accepted input shape is resolved into a [`Source`] once, at the
//! boundary; everything past [`Builder::build`] trusts the length and
//! uniqueness invariants.

use crate::dict::OrdDict;
use crate::display::RECURSION_MARKER;
use crate::error::Error;
use crate::unique;
use crate::value::Value;

/// Accepted shapes for the positional key/value arguments.
#[derive(Debug, Clone, Default)]
pub enum Source {
    #[default]
    Empty,
    /// An ordered sequence of elements.
    Seq(Vec<Value>),
    /// Key/value pairs from a mapping-shaped input.
    Pairs(Vec<(Value, Value)>),
}

impl Source {
    pub fn seq(items: Vec<Value>) -> Self {
        Source::Seq(items)
    }

    pub fn pairs(entries: Vec<(Value, Value)>) -> Self {
        Source::Pairs(entries)
    }
}

impl TryFrom<Value> for Source {
    type Error = Error;

    /// Capability check at the boundary: ordered sequences and mappings are
    /// accepted, unordered sets are not, and scalars are not sequences.
    /// Strings iterate as their character sequence.
    fn try_from(value: Value) -> Result<Self, Error> {
        match value {
            Value::List(rc) => Ok(Source::Seq(rc.borrow().clone())),
            Value::Tuple(items) => Ok(Source::Seq(items.as_ref().clone())),
            Value::Dict(rc) => {
                let dict = rc.borrow();
                Ok(Source::Pairs(
                    dict.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                ))
            }
            Value::Str(s) => Ok(Source::Seq(
                s.chars().map(|c| Value::Str(c.to_string())).collect(),
            )),
            Value::Set(_) => Err(Error::TypeMismatch(
                "set input is unordered and cannot seed an ordered container".into(),
            )),
            other => Err(Error::TypeMismatch(format!("{other} is not a sequence"))),
        }
    }
}

/// Staged construction of an [`OrdDict`].
///
/// Positional keys and values come first; named entries are appended after
/// them. Duplicate keys collapse to the first occurrence's position with
/// the last occurrence's value.
#[derive(Debug, Clone)]
pub struct Builder {
    keys: Source,
    values: Source,
    named: Vec<(String, Value)>,
    mutable: bool,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            keys: Source::Empty,
            values: Source::Empty,
            named: Vec::new(),
            mutable: true,
        }
    }

    pub fn keys(mut self, keys: Source) -> Self {
        self.keys = keys;
        self
    }

    pub fn values(mut self, values: Source) -> Self {
        self.values = values;
        self
    }

    /// Append a named entry after the positional ones.
    pub fn pair(mut self, name: impl Into<String>, value: Value) -> Self {
        self.named.push((name.into(), value));
        self
    }

    pub fn mutable(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
    }

    pub fn build(self) -> Result<OrdDict, Error> {
        let Builder {
            keys,
            values,
            named,
            mutable,
        } = self;

        let (mut out_keys, mut out_values) = match keys {
            Source::Pairs(entries) => {
                let (mut k, mut v): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
                match values {
                    // A second mapping appends its entries.
                    Source::Pairs(extra) => {
                        for (key, value) in extra {
                            k.push(key);
                            v.push(value);
                        }
                    }
                    // Mapping keys already carry their values; stray
                    // positional values cannot be aligned.
                    Source::Seq(items) if !items.is_empty() => {
                        return Err(Error::LengthMismatch {
                            expected: 0,
                            got: items.len(),
                        });
                    }
                    _ => {}
                }
                (k, v)
            }
            keys => {
                let k = match keys {
                    Source::Seq(items) => items,
                    _ => Vec::new(),
                };
                let v = match values {
                    // A mapping cannot align positionally with plain keys.
                    Source::Pairs(entries) => {
                        return Err(Error::LengthMismatch {
                            expected: k.len(),
                            got: entries.len(),
                        });
                    }
                    Source::Seq(items) => items,
                    Source::Empty => Vec::new(),
                };
                (k, v)
            }
        };

        for (name, value) in named {
            out_keys.push(Value::Str(name));
            out_values.push(value);
        }

        if out_keys.len() != out_values.len() {
            return Err(Error::LengthMismatch {
                expected: out_keys.len(),
                got: out_values.len(),
            });
        }

        for value in out_keys.iter().chain(out_values.iter()) {
            reject_marker(value)?;
        }

        let (out_keys, out_values) = unique::collapse_duplicates(out_keys, out_values);
        Ok(OrdDict::from_raw_parts(out_keys, out_values, mutable))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// The reserved marker denotes cycles in rendered output and cannot be
/// stored.
pub(crate) fn reject_marker(value: &Value) -> Result<(), Error> {
    if matches!(value, Value::Str(s) if s == RECURSION_MARKER) {
        return Err(Error::TypeMismatch(format!(
            "string {RECURSION_MARKER:?} is reserved for cyclic references"
        )));
    }
    Ok(())
}
