//! Key-uniqueness resolution for parallel key/value sequences.

use crate::value::Value;

/// Collapse duplicate keys in parallel sequences. Each distinct key keeps
/// the position of its first occurrence; the value slot takes the companion
/// element of its last occurrence.
///
/// Both sequences must have the same length.
pub(crate) fn collapse_duplicates(
    keys: Vec<Value>,
    values: Vec<Value>,
) -> (Vec<Value>, Vec<Value>) {
    debug_assert_eq!(keys.len(), values.len());
    let mut kept_keys: Vec<Value> = Vec::with_capacity(keys.len());
    let mut kept_values: Vec<Value> = Vec::with_capacity(values.len());
    for (key, value) in keys.into_iter().zip(values) {
        // Linear scan: keys need equality, not hashing.
        match kept_keys.iter().position(|seen| *seen == key) {
            Some(slot) => kept_values[slot] = value,
            None => {
                kept_keys.push(key);
                kept_values.push(value);
            }
        }
    }
    (kept_keys, kept_values)
}
