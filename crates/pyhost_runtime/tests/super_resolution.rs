mod common;

use std::rc::Rc;

use pyhost_diagnostics::ExceptionClass;
use pyhost_runtime::{Function, MemberTable, Runtime, TypeDescriptor, Value};

fn tagged(name: &str, tag: &'static str) -> (String, Value) {
    (
        name.to_string(),
        Value::function(Function::from_fn(name, move |_, _| Ok(Value::str(tag)))),
    )
}

fn class(rt: &mut Runtime, name: &str, bases: Vec<Rc<TypeDescriptor>>, members: Vec<(String, Value)>) -> Rc<TypeDescriptor> {
    rt.define_class(name, bases, MemberTable::from_entries(members))
}

#[test]
fn super_resolves_through_the_last_base() {
    let mut rt = Runtime::new();
    let b1 = class(&mut rt, "B1", vec![], vec![]);
    let b2 = class(&mut rt, "B2", vec![], vec![tagged("m", "from B2")]);
    let t = class(&mut rt, "T", vec![b1, b2], vec![tagged("m", "from T")]);
    let o = rt.call(&Value::Type(t.clone()), &[]).unwrap();

    let proxy = common::call_builtin(&mut rt, "super", &[Value::Type(t), o]).unwrap();
    let m = rt.get_attr(&proxy, "m").unwrap();
    assert_eq!(rt.call(&m, &[]).unwrap(), Value::str("from B2"));
}

#[test]
fn last_base_wins_even_when_an_earlier_base_defines_the_member() {
    let mut rt = Runtime::new();
    let b1 = class(&mut rt, "B1", vec![], vec![tagged("m", "from B1")]);
    let b2 = class(&mut rt, "B2", vec![], vec![tagged("m", "from B2")]);
    let t = class(&mut rt, "T", vec![b1, b2], vec![]);
    let o = rt.call(&Value::Type(t.clone()), &[]).unwrap();

    // Flattening gives the earlier base priority on the class itself.
    let direct = rt.get_attr(&o, "m").unwrap();
    assert_eq!(rt.call(&direct, &[]).unwrap(), Value::str("from B1"));

    let proxy = rt.super_proxy(Some(&t), &o).unwrap();
    let via_super = rt.get_attr(&proxy, "m").unwrap();
    assert_eq!(rt.call(&via_super, &[]).unwrap(), Value::str("from B2"));
}

#[test]
fn writes_through_the_proxy_land_on_the_instance() {
    let mut rt = Runtime::new();
    let base = class(&mut rt, "Base", vec![], vec![]);
    let child = class(&mut rt, "Child", vec![base], vec![]);
    let o = rt.call(&Value::Type(child), &[]).unwrap();

    let proxy = common::call_builtin(&mut rt, "super", &[o.clone()]).unwrap();
    rt.set_attr(&proxy, "size", Value::Int(4)).unwrap();
    assert_eq!(rt.get_attr(&o, "size").unwrap(), Value::Int(4));

    let again = common::call_builtin(&mut rt, "super", &[o]).unwrap();
    let (Value::Instance(a), Value::Instance(b)) = (&proxy, &again) else {
        panic!("super() returns instance proxies");
    };
    assert!(!Rc::ptr_eq(a, b));
}

#[test]
fn super_of_a_non_instance_is_a_type_error() {
    let mut rt = Runtime::new();
    let err = common::call_builtin(&mut rt, "super", &[Value::Int(3)]).unwrap_err();
    assert_eq!(err.class, ExceptionClass::TypeError);
}

#[test]
fn super_first_argument_must_be_a_class_or_none() {
    let mut rt = Runtime::new();
    let b = class(&mut rt, "B", vec![], vec![tagged("m", "from B")]);
    let t = class(&mut rt, "T", vec![b], vec![]);
    let o = rt.call(&Value::Type(t), &[]).unwrap();

    let err = common::call_builtin(&mut rt, "super", &[Value::Int(1), o.clone()]).unwrap_err();
    assert_eq!(err.class, ExceptionClass::TypeError);

    let proxy = common::call_builtin(&mut rt, "super", &[Value::None, o]).unwrap();
    let m = rt.get_attr(&proxy, "m").unwrap();
    assert_eq!(rt.call(&m, &[]).unwrap(), Value::str("from B"));
}
