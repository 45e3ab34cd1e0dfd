//! Cycle-safe textual representation.
//!
//! Rendering tracks the chain of compound identities currently open on the
//! recursion path. A compound value is replaced by the reserved marker
//! token when its identity is already open, when it is the container being
//! rendered, or when it deeply contains that container. This guarantees
//! termination on any cyclic structure, so `Debug` is routed through the
//! same path (a derived impl would recurse forever).

use core::fmt::{self, Write};
use std::rc::Rc;

use hashbrown::HashSet;

use crate::dict::OrdDict;
use crate::policy;
use crate::value::Value;

/// Reserved marker substituted for cyclic references. Rejected as key or
/// value content so rendered output stays unambiguous.
pub const RECURSION_MARKER: &str = "[...]";

/// True if `target` is reachable inside `value`, including through nested
/// compounds. `seen` guards against cycles in the searched structure.
pub(crate) fn deep_contains(
    value: &Value,
    target: *const OrdDict,
    seen: &mut HashSet<usize>,
) -> bool {
    match value {
        Value::List(rc) | Value::Set(rc) => {
            if !seen.insert(Rc::as_ptr(rc) as usize) {
                return false;
            }
            rc.borrow().iter().any(|item| deep_contains(item, target, seen))
        }
        Value::Tuple(rc) => {
            if !seen.insert(Rc::as_ptr(rc) as usize) {
                return false;
            }
            rc.iter().any(|item| deep_contains(item, target, seen))
        }
        Value::Dict(rc) => {
            if !seen.insert(Rc::as_ptr(rc) as usize) {
                return false;
            }
            let dict = rc.borrow();
            if core::ptr::eq(&*dict, target) {
                return true;
            }
            dict.keys()
                .iter()
                .chain(dict.values().iter())
                .any(|item| deep_contains(item, target, seen))
        }
        _ => false,
    }
}

fn points_to(value: &Value, outer: *const OrdDict) -> bool {
    match value {
        Value::Dict(rc) => core::ptr::eq(&*rc.borrow(), outer),
        _ => false,
    }
}

/// Render a compound unless it would reopen an identity or reach back to
/// the container being rendered; substitute the marker in that case.
fn guarded(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    open_ids: &mut HashSet<usize>,
    outer: *const OrdDict,
    body: impl FnOnce(&mut fmt::Formatter<'_>, &mut HashSet<usize>) -> fmt::Result,
) -> fmt::Result {
    let id = value.ref_id().unwrap_or(0);
    if open_ids.contains(&id)
        || points_to(value, outer)
        || deep_contains(value, outer, &mut HashSet::new())
    {
        return f.write_str(RECURSION_MARKER);
    }
    open_ids.insert(id);
    let rendered = body(f, open_ids);
    open_ids.remove(&id);
    rendered
}

fn fmt_items(
    items: &[Value],
    f: &mut fmt::Formatter<'_>,
    open_ids: &mut HashSet<usize>,
    outer: *const OrdDict,
    lead: char,
    trail: char,
) -> fmt::Result {
    f.write_char(lead)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_value(item, f, open_ids, outer)?;
    }
    f.write_char(trail)
}

pub(crate) fn fmt_value(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    open_ids: &mut HashSet<usize>,
    outer: *const OrdDict,
) -> fmt::Result {
    match value {
        Value::None => f.write_str("None"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(i) => write!(f, "{i}"),
        Value::Float(x) => write!(f, "{x}"),
        Value::Str(s) => {
            if policy::with(|p| p.display_verbatim.iter().any(|v| v == value)) {
                f.write_str(s)
            } else {
                write!(f, "{s:?}")
            }
        }
        Value::List(rc) => guarded(value, f, open_ids, outer, |f, ids| {
            fmt_items(rc.borrow().as_slice(), f, ids, outer, '[', ']')
        }),
        Value::Tuple(items) => guarded(value, f, open_ids, outer, |f, ids| {
            fmt_items(items.as_slice(), f, ids, outer, '(', ')')
        }),
        Value::Set(rc) => guarded(value, f, open_ids, outer, |f, ids| {
            fmt_items(rc.borrow().as_slice(), f, ids, outer, '{', '}')
        }),
        Value::Dict(rc) => guarded(value, f, open_ids, outer, |f, ids| {
            fmt_dict(&rc.borrow(), f, ids)
        }),
    }
}

pub(crate) fn fmt_dict(
    dict: &OrdDict,
    f: &mut fmt::Formatter<'_>,
    open_ids: &mut HashSet<usize>,
) -> fmt::Result {
    let outer = dict as *const OrdDict;
    let (lead, trail) = if dict.is_mutable() { ('[', ']') } else { ('(', ')') };
    f.write_char(lead)?;
    let mut first = true;
    for (key, value) in dict.iter() {
        if !first {
            f.write_str("; ")?;
        }
        first = false;
        fmt_value(key, f, open_ids, outer)?;
        f.write_str(": ")?;
        fmt_value(value, f, open_ids, outer)?;
    }
    f.write_char(trail)
}

impl fmt::Display for OrdDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_dict(self, f, &mut HashSet::new())
    }
}

impl fmt::Debug for OrdDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_dict(self, f, &mut HashSet::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_value(self, f, &mut HashSet::new(), core::ptr::null())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_value(self, f, &mut HashSet::new(), core::ptr::null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Invariant: scalars and flat compounds are not "contained" anywhere.
    #[test]
    fn deep_contains_misses_unrelated() {
        let dict = OrdDict::new();
        let target = &dict as *const OrdDict;
        let value = Value::list(vec![Value::Int(1), Value::str("a")]);
        assert!(!deep_contains(&value, target, &mut HashSet::new()));
    }

    /// Invariant: the target is found through arbitrary nesting.
    #[test]
    fn deep_contains_finds_nested_target() {
        let rc = Rc::new(RefCell::new(OrdDict::new()));
        let target = {
            let borrowed = rc.borrow();
            &*borrowed as *const OrdDict
        };
        let value = Value::list(vec![Value::tuple(vec![Value::Dict(rc.clone())])]);
        assert!(deep_contains(&value, target, &mut HashSet::new()));
    }

    /// Invariant: a cyclic structure that never reaches the target reports
    /// false instead of looping.
    #[test]
    fn deep_contains_survives_foreign_cycles() {
        let cyclic = Value::list(vec![]);
        let Value::List(rc) = &cyclic else {
            unreachable!()
        };
        rc.borrow_mut().push(cyclic.clone());

        let dict = OrdDict::new();
        let target = &dict as *const OrdDict;
        assert!(!deep_contains(&cyclic, target, &mut HashSet::new()));
    }
}
