use std::rc::Rc;

use pyhost_core::{HostTypeId, fast_index_map_new};
use pyhost_diagnostics::DiagnosticKind;

use super::common::{check_arity, expect_str};
use crate::core::{DictKey, Function, Value};
use crate::errors::{RuntimeError, messages};
use crate::modules::Selective;
use crate::object::attr::is_attribute_miss;
use crate::runtime::Runtime;

pub fn builtin_print(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    let mut line = String::new();
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&rt.to_str(a)?);
    }
    line.push('\n');
    rt.write_output(&line);
    Ok(Value::None)
}

/// Snapshot of the current context's globals as a dict.
pub fn builtin_globals(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "globals", args, 0, 0)?;
    let globals = rt.globals();
    let mut map = fast_index_map_new();
    for (k, v) in globals.borrow().iter() {
        map.insert(DictKey::Str(Rc::from(k)), v.clone());
    }
    Ok(Value::dict(map))
}

fn expect_function<'a>(rt: &Runtime, v: &'a Value) -> Result<&'a Rc<Function>, RuntimeError> {
    match v {
        Value::Function(f) => Ok(f),
        _ => Err(rt.error(DiagnosticKind::Raw(messages::NOT_A_FUNCTION.into()))),
    }
}

pub fn builtin_staticmethod(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "staticmethod", args, 1, 1)?;
    expect_function(rt, &args[0])?.mark_static();
    Ok(args[0].clone())
}

/// `extension(T, name)` returns a decorator that registers its argument as
/// method `name` of the host type `T`.
pub fn builtin_extension(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "extension", args, 2, 2)?;
    let ty: HostTypeId = match &args[0] {
        Value::NativeType(t) => t.id.clone(),
        other => {
            return Err(rt.error(DiagnosticKind::TypeMismatch {
                expected: "native type".into(),
                actual: other.type_name(),
            }));
        }
    };
    let name = expect_str(rt, "extension", &args[1])?.to_string();
    let decorator = Function::from_fn("extension_decorator", move |rt, args| {
        check_arity(rt, "extension_decorator", args, 1, 1)?;
        let f = expect_function(rt, &args[0])?.clone();
        rt.extensions.register(ty.clone(), &name, f);
        Ok(args[0].clone())
    });
    Ok(Value::function(decorator))
}

/// `super(instance)` or `super(T, instance)`.
pub fn builtin_super(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "super", args, 1, 2)?;
    let (explicit, instance) = args.split_at(args.len() - 1);
    match explicit.first() {
        None | Some(Value::None) => rt.super_proxy(None, &instance[0]),
        Some(Value::Type(t)) => rt.super_proxy(Some(t), &instance[0]),
        Some(other) => Err(rt.error(DiagnosticKind::TypeMismatch {
            expected: "type as first argument to super()".into(),
            actual: other.type_name(),
        })),
    }
}

pub fn builtin_getattr(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "getattr", args, 2, 3)?;
    let name = expect_str(rt, "getattr", &args[1])?.to_string();
    match rt.get_attr(&args[0], &name) {
        Err(e) if is_attribute_miss(&e) && args.len() == 3 => Ok(args[2].clone()),
        other => other,
    }
}

pub fn builtin_setattr(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "setattr", args, 3, 3)?;
    let name = expect_str(rt, "setattr", &args[1])?.to_string();
    rt.set_attr(&args[0], &name, args[2].clone())?;
    Ok(Value::None)
}

pub fn builtin_delattr(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "delattr", args, 2, 2)?;
    let name = expect_str(rt, "delattr", &args[1])?.to_string();
    rt.del_attr(&args[0], &name)?;
    Ok(Value::None)
}

pub fn builtin_hasattr(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "hasattr", args, 2, 2)?;
    let name = expect_str(rt, "hasattr", &args[1])?.to_string();
    Ok(Value::Bool(rt.has_attr(&args[0], &name)?))
}

/// Copies every member of a namespace (or module) into the current globals.
pub fn builtin_using(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "using", args, 1, 1)?;
    let entries = match &args[0] {
        Value::Namespace(ns) => ns.members.borrow().entries(),
        Value::Module(m) => m.globals.borrow().entries(),
        other => {
            return Err(rt.error(DiagnosticKind::TypeMismatch {
                expected: "namespace".into(),
                actual: other.type_name(),
            }));
        }
    };
    let globals = rt.globals();
    let mut g = globals.borrow_mut();
    for (k, v) in entries {
        g.insert(k, v);
    }
    Ok(Value::None)
}

/// Host type identity of a native type, or of a host value's type.
pub fn builtin_typeof(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "typeof", args, 1, 1)?;
    let id = match &args[0] {
        Value::NativeType(t) => Some(t.id.clone()),
        other => rt.host_type_id(other),
    };
    match id {
        Some(id) => Ok(Value::str(id.as_str())),
        None => Err(rt.error(DiagnosticKind::TypeMismatch {
            expected: "native type or host value".into(),
            actual: args[0].type_name(),
        })),
    }
}

pub fn builtin_isinstance(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "isinstance", args, 2, 2)?;
    Ok(Value::Bool(rt.is_instance(&args[0], &args[1])?))
}

pub fn builtin_issubclass(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "issubclass", args, 2, 2)?;
    Ok(Value::Bool(rt.is_subclass(&args[0], &args[1])?))
}

/// `__import__(name, fromlist=None)`; what a compiled `import` statement
/// calls. Returns the bound module for a plain source import.
pub fn builtin_import(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "__import__", args, 1, 2)?;
    let name = expect_str(rt, "__import__", &args[0])?.to_string();
    let selective = match args.get(1) {
        None | Some(Value::None) => None,
        Some(list) => {
            let mut names = Vec::new();
            for item in rt.collect(list)? {
                names.push(expect_str(rt, "__import__", &item)?.to_string());
            }
            if names.is_empty() {
                None
            } else {
                Some(Selective::from_list(names))
            }
        }
    };
    let plain = selective.is_none();
    rt.import(&name, selective)?;
    Ok(if plain {
        match rt.get_global(&name) {
            Some(m @ Value::Module(_)) => m,
            _ => Value::None,
        }
    } else {
        Value::None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_joins_with_spaces() {
        let mut rt = Runtime::new();
        builtin_print(&mut rt, &[Value::Int(1), Value::str("a"), Value::None]).unwrap();
        assert_eq!(rt.take_output(), "1 a None\n");
    }

    #[test]
    fn getattr_default_only_covers_misses() {
        let mut rt = Runtime::new();
        let obj = Value::Instance(Rc::new(crate::core::Instance::new(rt.object_type())));
        let v = builtin_getattr(&mut rt, &[obj.clone(), Value::str("nope"), Value::Int(7)]).unwrap();
        assert_eq!(v, Value::Int(7));
        let err = builtin_getattr(&mut rt, &[obj, Value::Int(3)]).unwrap_err();
        assert!(err.message.contains("str argument"));
    }

    #[test]
    fn typeof_reports_host_identity() {
        let mut rt = Runtime::new();
        let v = builtin_typeof(&mut rt, &[Value::list(vec![])]).unwrap();
        assert_eq!(v, Value::str("builtins.list"));
    }
}
