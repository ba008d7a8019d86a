//! The root types every runtime starts with and their default protocol
//! methods.

use std::rc::Rc;

use crate::core::{Function, Instance, MemberTable, TypeDescriptor, Value};
use crate::errors::{RuntimeError, messages};
use crate::runtime::Runtime;

pub(crate) struct CoreTypes {
    pub object: Rc<TypeDescriptor>,
    pub type_: Rc<TypeDescriptor>,
    pub function: Rc<TypeDescriptor>,
    pub namespace: Rc<TypeDescriptor>,
}

/// The default attribute hooks. A class whose table holds one of these
/// exact functions uses the built-in protocol without a call round-trip.
pub(crate) struct DefaultHooks {
    pub getattribute: Rc<Function>,
    pub setattr: Rc<Function>,
    pub delattr: Rc<Function>,
}

impl DefaultHooks {
    pub(crate) fn is_default(&self, hook: &Rc<Function>) -> bool {
        Rc::ptr_eq(hook, &self.getattribute)
            || Rc::ptr_eq(hook, &self.setattr)
            || Rc::ptr_eq(hook, &self.delattr)
    }
}

fn func(name: &str, f: fn(&mut Runtime, &[Value]) -> Result<Value, RuntimeError>) -> Rc<Function> {
    Rc::new(Function::new(name, Rc::new(f)))
}

fn expect_instance<'a>(
    rt: &Runtime,
    func: &str,
    args: &'a [Value],
) -> Result<&'a Rc<Instance>, RuntimeError> {
    match args.first() {
        Some(Value::Instance(inst)) => Ok(inst),
        Some(other) => Err(rt.error(pyhost_diagnostics::DiagnosticKind::TypeMismatch {
            expected: format!("object instance for {}", func),
            actual: other.type_name(),
        })),
        None => Err(rt.error(pyhost_diagnostics::DiagnosticKind::ArgumentCountMismatch {
            name: func.to_string(),
            expected_min: 1,
            expected_max: 1,
            actual: 0,
        })),
    }
}

fn expect_name<'a>(rt: &Runtime, args: &'a [Value], idx: usize) -> Result<&'a str, RuntimeError> {
    match args.get(idx) {
        Some(Value::Str(s)) => Ok(s),
        _ => Err(rt.error(pyhost_diagnostics::DiagnosticKind::Raw(
            messages::ATTR_NAME_NOT_STRING.into(),
        ))),
    }
}

fn object_new(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    match args.first() {
        Some(Value::Type(cls)) => Ok(Value::Instance(Rc::new(Instance::new(cls.clone())))),
        _ => Err(rt.error(pyhost_diagnostics::DiagnosticKind::Raw(
            messages::NOT_A_TYPE.into(),
        ))),
    }
}

fn object_init(_rt: &mut Runtime, _args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::None)
}

fn object_getattribute(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    let inst = expect_instance(rt, "__getattribute__", args)?.clone();
    let name = expect_name(rt, args, 1)?;
    rt.default_getattribute(&inst, name)
}

fn object_setattr(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    let inst = expect_instance(rt, "__setattr__", args)?;
    let name = expect_name(rt, args, 1)?;
    let value = args.get(2).cloned().unwrap_or(Value::None);
    rt.store_instance_attr(inst, name, value)?;
    Ok(Value::None)
}

fn object_delattr(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    let inst = expect_instance(rt, "__delattr__", args)?;
    let name = expect_name(rt, args, 1)?;
    inst.members.borrow_mut().remove(name);
    Ok(Value::None)
}

fn object_str(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    let inst = expect_instance(rt, "__str__", args)?;
    Ok(Value::str(&format!("object '{}'", inst.type_name())))
}

fn type_str(_rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    let name = match args.first() {
        Some(Value::Type(t)) => t.name.clone(),
        Some(Value::NativeType(t)) => t.path.clone(),
        Some(other) => other.type_name(),
        None => "type".into(),
    };
    Ok(Value::str(&format!("class '{}'", name)))
}

fn function_str(_rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    let name = match args.first() {
        Some(Value::Function(f)) => f.name.clone(),
        Some(Value::BoundMethod(m)) => m.function.name.clone(),
        _ => String::new(),
    };
    Ok(Value::str(&format!("function '{}'", name)))
}

fn finish(ty: &Rc<TypeDescriptor>, class: &Rc<TypeDescriptor>) {
    let mut members = ty.members.borrow_mut();
    members.insert("__name__", Value::str(&ty.name));
    members.insert(
        "__bases__",
        Value::tuple(ty.bases.iter().map(|b| Value::Type(b.clone())).collect()),
    );
    members.insert("__module__", Value::str("builtins"));
    members.insert("__class__", Value::Type(class.clone()));
}

pub(crate) fn bootstrap_types() -> (CoreTypes, DefaultHooks) {
    let hooks = DefaultHooks {
        getattribute: func("__getattribute__", object_getattribute),
        setattr: func("__setattr__", object_setattr),
        delattr: func("__delattr__", object_delattr),
    };

    let mut object_members = MemberTable::new();
    object_members.insert("__new__", Value::Function(func("__new__", object_new)));
    object_members.insert("__init__", Value::Function(func("__init__", object_init)));
    object_members.insert(
        "__getattribute__",
        Value::Function(hooks.getattribute.clone()),
    );
    object_members.insert("__setattr__", Value::Function(hooks.setattr.clone()));
    object_members.insert("__delattr__", Value::Function(hooks.delattr.clone()));
    object_members.insert("__str__", Value::Function(func("__str__", object_str)));
    object_members.insert("__doc__", Value::None);
    let object = Rc::new(TypeDescriptor::new("object", Vec::new(), object_members));

    let mut type_members = MemberTable::new();
    type_members.insert("__str__", Value::Function(func("__str__", type_str)));
    let type_ = Rc::new(TypeDescriptor::new("type", vec![object.clone()], type_members));

    let mut function_members = MemberTable::new();
    function_members.insert("__str__", Value::Function(func("__str__", function_str)));
    let function = Rc::new(TypeDescriptor::new(
        "function",
        vec![object.clone()],
        function_members,
    ));

    let namespace = Rc::new(TypeDescriptor::new(
        "Namespace",
        vec![object.clone()],
        MemberTable::new(),
    ));

    for ty in [&object, &type_, &function, &namespace] {
        finish(ty, &type_);
    }

    (
        CoreTypes {
            object,
            type_,
            function,
            namespace,
        },
        hooks,
    )
}
