mod common;

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use pyhost_diagnostics::ExceptionClass;
use pyhost_runtime::{Function, MemberTable, Runtime, Value};

fn class_with(rt: &mut Runtime, name: &str, members: Vec<(&str, Value)>) -> Value {
    let table = MemberTable::from_entries(members.into_iter().map(|(k, v)| (k.to_string(), v)));
    Value::Type(rt.define_class(name, vec![], table))
}

fn method<F>(name: &str, f: F) -> Value
where
    F: Fn(&mut Runtime, &[Value]) -> Result<Value, pyhost_runtime::RuntimeError> + 'static,
{
    Value::function(Function::from_fn(name, f))
}

#[test]
fn instance_write_shadows_type_member() {
    let mut rt = Runtime::new();
    let cls = class_with(&mut rt, "Point", vec![("x", Value::Int(0))]);
    let p = rt.call(&cls, &[]).unwrap();
    assert_eq!(rt.get_attr(&p, "x").unwrap(), Value::Int(0));
    rt.set_attr(&p, "x", Value::Int(5)).unwrap();
    assert_eq!(rt.get_attr(&p, "x").unwrap(), Value::Int(5));
    assert_eq!(rt.get_attr(&cls, "x").unwrap(), Value::Int(0));
}

#[test]
fn each_lookup_builds_a_fresh_bound_method() {
    let mut rt = Runtime::new();
    let get_x = method("get_x", |rt, args| rt.get_attr(&args[0], "x"));
    let cls = class_with(&mut rt, "Point", vec![("get_x", get_x)]);
    let p = rt.call(&cls, &[]).unwrap();
    rt.set_attr(&p, "x", Value::Int(3)).unwrap();

    let a = rt.get_attr(&p, "get_x").unwrap();
    let b = rt.get_attr(&p, "get_x").unwrap();
    let (Value::BoundMethod(ma), Value::BoundMethod(mb)) = (&a, &b) else {
        panic!("expected bound methods, got {a:?} and {b:?}");
    };
    assert!(!Rc::ptr_eq(ma, mb));
    assert_eq!(rt.call(&a, &[]).unwrap(), Value::Int(3));
    assert_eq!(rt.call(&b, &[]).unwrap(), Value::Int(3));
}

#[test]
fn static_functions_are_not_bound() {
    let mut rt = Runtime::new();
    let f = method("make", |_, args| Ok(Value::Int(args.len() as i64)));
    common::call_builtin(&mut rt, "staticmethod", &[f.clone()]).unwrap();
    let cls = class_with(&mut rt, "Factory", vec![("make", f)]);
    let obj = rt.call(&cls, &[]).unwrap();
    let m = rt.get_attr(&obj, "make").unwrap();
    assert!(matches!(m, Value::Function(_)));
    assert_eq!(rt.call(&m, &[]).unwrap(), Value::Int(0));
}

#[test]
fn getattr_hook_runs_once_per_miss_and_can_be_removed() {
    let mut rt = Runtime::new();
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    let hook = method("__getattr__", move |_, args| {
        seen.set(seen.get() + 1);
        Ok(args[1].clone())
    });
    let cls = class_with(&mut rt, "Dyn", vec![("__getattr__", hook)]);
    let obj = rt.call(&cls, &[]).unwrap();

    assert_eq!(rt.get_attr(&obj, "color").unwrap(), Value::str("color"));
    assert_eq!(calls.get(), 1);

    rt.del_attr(&cls, "__getattr__").unwrap();
    let err = rt.get_attr(&obj, "color").unwrap_err();
    assert_eq!(err.class, ExceptionClass::AttributeError);
    assert_eq!(calls.get(), 1);
}

#[test]
fn missing_attribute_suggests_a_close_name() {
    let mut rt = Runtime::new();
    let cls = class_with(&mut rt, "Point", vec![]);
    let p = rt.call(&cls, &[]).unwrap();
    rt.set_attr(&p, "width", Value::Int(1)).unwrap();
    let err = rt.get_attr(&p, "widht").unwrap_err();
    assert_eq!(
        err.to_string(),
        "AttributeError: object 'Point' has no attribute 'widht'; did you mean 'width'?"
    );
}

#[test]
fn type_attribute_miss_is_a_lookup_error() {
    let mut rt = Runtime::new();
    let cls = class_with(&mut rt, "Point", vec![]);
    let err = rt.get_attr(&cls, "nope").unwrap_err();
    assert_eq!(err.class, ExceptionClass::LookupError);
    let has = common::call_builtin(&mut rt, "hasattr", &[cls, Value::str("nope")]).unwrap();
    assert_eq!(has, Value::Bool(false));
}

#[test]
fn overridden_setattr_replaces_the_default_write() {
    let mut rt = Runtime::new();
    let hook = method("__setattr__", |_, args| {
        let Value::Instance(inst) = &args[0] else {
            unreachable!()
        };
        let name = format!("_{}", args[1].as_str().unwrap_or_default());
        inst.members.borrow_mut().insert(name, args[2].clone());
        Ok(Value::None)
    });
    let cls = class_with(&mut rt, "Guarded", vec![("__setattr__", hook)]);
    let obj = rt.call(&cls, &[]).unwrap();
    rt.set_attr(&obj, "x", Value::Int(1)).unwrap();
    assert_eq!(rt.get_attr(&obj, "_x").unwrap(), Value::Int(1));
    assert!(!rt.has_attr(&obj, "x").unwrap());
}

#[test]
fn deleting_a_missing_attribute_is_a_no_op() {
    let mut rt = Runtime::new();
    let cls = class_with(&mut rt, "Point", vec![]);
    let p = rt.call(&cls, &[]).unwrap();
    rt.del_attr(&p, "ghost").unwrap();
}

#[test]
fn instances_render_through_str_hook() {
    let mut rt = Runtime::new();
    let plain = class_with(&mut rt, "Plain", vec![]);
    let obj = rt.call(&plain, &[]).unwrap();
    assert_eq!(rt.to_str(&obj).unwrap(), "object 'Plain'");
    assert_eq!(rt.to_str(&plain).unwrap(), "class 'Plain'");

    let custom = method("__str__", |_, _| Ok(Value::str("<pretty>")));
    let pretty = class_with(&mut rt, "Pretty", vec![("__str__", custom)]);
    let obj = rt.call(&pretty, &[]).unwrap();
    let s = common::call_builtin(&mut rt, "str", &[obj]).unwrap();
    assert_eq!(s, Value::str("<pretty>"));
}

#[test]
fn writing_class_retargets_type_lookup() {
    let mut rt = Runtime::new();
    let a = class_with(&mut rt, "A", vec![]);
    let b = class_with(&mut rt, "B", vec![("tag", Value::str("b"))]);
    let obj = rt.call(&a, &[]).unwrap();
    assert!(rt.get_attr(&obj, "tag").is_err());

    rt.set_attr(&obj, "__class__", b.clone()).unwrap();
    assert_eq!(rt.get_attr(&obj, "tag").unwrap(), Value::str("b"));
    assert_eq!(rt.get_attr(&obj, "__class__").unwrap(), b);
    assert_eq!(common::call_builtin(&mut rt, "type", &[obj.clone()]).unwrap(), b);
    assert_eq!(
        common::call_builtin(&mut rt, "isinstance", &[obj.clone(), b.clone()]).unwrap(),
        Value::Bool(true)
    );

    let err = rt.set_attr(&obj, "__class__", Value::Int(1)).unwrap_err();
    assert_eq!(err.class, ExceptionClass::TypeError);
    assert_eq!(rt.get_attr(&obj, "__class__").unwrap(), b);
}

proptest! {
    #[test]
    fn set_then_get_round_trips(name in "[a-z][a-z0-9_]{0,8}", value in any::<i64>()) {
        let mut rt = Runtime::new();
        let cls = class_with(&mut rt, "Bag", vec![]);
        let obj = rt.call(&cls, &[]).unwrap();
        rt.set_attr(&obj, &name, Value::Int(value)).unwrap();
        prop_assert_eq!(rt.get_attr(&obj, &name).unwrap(), Value::Int(value));
    }
}
