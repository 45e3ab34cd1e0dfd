use std::cell::RefCell;
use std::rc::Rc;

use ord_dict::{OrdDict, Value};

fn sample() -> OrdDict {
    OrdDict::from_pairs(vec![
        (Value::str("a"), Value::Int(1)),
        (Value::str("b"), Value::Int(2)),
    ])
    .unwrap()
}

#[test]
fn brackets_mirror_mutability() {
    let d = sample();
    assert_eq!(d.to_string(), r#"["a": 1; "b": 2]"#);
    assert_eq!(d.into_frozen().to_string(), r#"("a": 1; "b": 2)"#);
}

#[test]
fn empty_containers() {
    assert_eq!(OrdDict::new().to_string(), "[]");
    assert_eq!(OrdDict::empty_frozen().to_string(), "()");
}

#[test]
fn nested_compounds_render_recursively() {
    let mut d = OrdDict::new();
    d.set(
        Value::str("seq"),
        Value::list(vec![Value::Int(1), Value::str("x")]),
    )
    .unwrap();
    d.set(
        Value::str("tup"),
        Value::tuple(vec![Value::Bool(true), Value::None]),
    )
    .unwrap();
    d.set(Value::str("set"), Value::set(vec![Value::Int(7)]))
        .unwrap();
    d.set(Value::str("sub"), Value::dict(sample())).unwrap();
    assert_eq!(
        d.to_string(),
        r#"["seq": [1, "x"]; "tup": (true, None); "set": {7}; "sub": ["a": 1; "b": 2]]"#
    );
}

#[test]
fn verbatim_allow_list_drops_quoting() {
    let mut d = OrdDict::new();
    d.set(Value::str("k"), Value::str("plain")).unwrap();
    assert_eq!(d.to_string(), r#"["k": "plain"]"#);

    let old = ord_dict::policy::replace(ord_dict::Policy {
        display_verbatim: vec![Value::str("plain")],
        ..ord_dict::Policy::default()
    });
    assert_eq!(d.to_string(), r#"["k": plain]"#);
    ord_dict::policy::replace(old);
}

#[test]
fn self_reference_renders_marker() {
    let rc = Rc::new(RefCell::new(OrdDict::new()));
    rc.borrow_mut()
        .set(Value::str("me"), Value::Dict(rc.clone()))
        .unwrap();
    assert_eq!(rc.borrow().to_string(), r#"["me": [...]]"#);
}

#[test]
fn nested_list_back_reference_renders_marker_and_terminates() {
    let rc = Rc::new(RefCell::new(OrdDict::new()));
    let holder = Value::list(vec![Value::Int(1), Value::Dict(rc.clone())]);
    rc.borrow_mut().set(Value::str("loop"), holder).unwrap();
    // The list position that leads back to the container renders as the
    // marker token.
    assert_eq!(rc.borrow().to_string(), r#"["loop": [...]]"#);
}

#[test]
fn mutual_cycle_terminates() {
    let d1 = Rc::new(RefCell::new(OrdDict::new()));
    let d2 = Rc::new(RefCell::new(OrdDict::new()));
    d1.borrow_mut()
        .set(Value::str("next"), Value::Dict(d2.clone()))
        .unwrap();
    d2.borrow_mut()
        .set(Value::str("back"), Value::Dict(d1.clone()))
        .unwrap();
    assert_eq!(d1.borrow().to_string(), r#"["next": [...]]"#);
    assert_eq!(d2.borrow().to_string(), r#"["back": [...]]"#);
}

#[test]
fn cyclic_list_value_terminates() {
    let cyclic = Value::list(vec![Value::Int(1)]);
    let Value::List(rc) = &cyclic else {
        unreachable!()
    };
    rc.borrow_mut().push(cyclic.clone());

    let mut d = OrdDict::new();
    d.set(Value::str("l"), cyclic.clone()).unwrap();
    assert_eq!(d.to_string(), r#"["l": [1, [...]]]"#);
}

#[test]
fn shared_but_acyclic_values_render_fully() {
    let shared = Value::list(vec![Value::Int(1)]);
    let mut d = OrdDict::new();
    d.set(Value::str("x"), shared.clone()).unwrap();
    d.set(Value::str("y"), shared).unwrap();
    // Two sibling references to the same list are not a cycle.
    assert_eq!(d.to_string(), r#"["x": [1]; "y": [1]]"#);
}

#[test]
fn debug_matches_display_and_is_cycle_safe() {
    let rc = Rc::new(RefCell::new(OrdDict::new()));
    rc.borrow_mut()
        .set(Value::str("me"), Value::Dict(rc.clone()))
        .unwrap();
    let shown = format!("{:?}", rc.borrow());
    assert_eq!(shown, rc.borrow().to_string());
}

#[test]
fn standalone_value_rendering() {
    assert_eq!(Value::None.to_string(), "None");
    assert_eq!(Value::Bool(false).to_string(), "false");
    assert_eq!(Value::Float(1.5).to_string(), "1.5");
    assert_eq!(Value::str("s").to_string(), "\"s\"");
    assert_eq!(
        Value::list(vec![Value::Int(1), Value::Int(2)]).to_string(),
        "[1, 2]"
    );
}
