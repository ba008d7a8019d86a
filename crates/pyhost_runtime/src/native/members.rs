//! Host member access, construction and generic instantiation for native
//! values and types.

use std::cell::RefCell;
use std::rc::Rc;

use pyhost_core::{HostTypeId, NativeTypeInfo, builtin_types, fast_index_map_new};
use pyhost_diagnostics::DiagnosticKind;
use smallvec::SmallVec;

use crate::core::{
    BoundMethod, DictKey, MemberTable, NativeMethod, NativeObject, NativeType, NativeTypeKind, Value,
};
use crate::errors::RuntimeError;
use crate::methods::MethodKind;
use crate::runtime::Runtime;

/// Host types backing the built-in value kinds.
pub struct HostTypes {
    pub none: Rc<NativeType>,
    pub bool: Rc<NativeType>,
    pub int: Rc<NativeType>,
    pub float: Rc<NativeType>,
    pub str: Rc<NativeType>,
    pub list: Rc<NativeType>,
    pub tuple: Rc<NativeType>,
    pub dict: Rc<NativeType>,
    pub set: Rc<NativeType>,
    pub range: Rc<NativeType>,
    pub iterator: Rc<NativeType>,
}

impl HostTypes {
    pub fn new() -> Self {
        let t = |id: &str, name: &str| Rc::new(NativeType::builtin(id, name));
        Self {
            none: t(builtin_types::NONE, "NoneType"),
            bool: t(builtin_types::BOOL, "bool"),
            int: t(builtin_types::INT, "int"),
            float: t(builtin_types::FLOAT, "float"),
            str: t(builtin_types::STR, "str"),
            list: t(builtin_types::LIST, "list"),
            tuple: t(builtin_types::TUPLE, "tuple"),
            dict: t(builtin_types::DICT, "dict"),
            set: t(builtin_types::SET, "set"),
            range: t(builtin_types::RANGE, "range"),
            iterator: t(builtin_types::ITERATOR, "iterator"),
        }
    }

    /// Types bound by name in every global scope.
    pub fn named(&self) -> [&Rc<NativeType>; 9] {
        [
            &self.int,
            &self.float,
            &self.str,
            &self.bool,
            &self.list,
            &self.tuple,
            &self.dict,
            &self.set,
            &self.range,
        ]
    }
}

impl Default for HostTypes {
    fn default() -> Self {
        Self::new()
    }
}

pub fn json_to_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::None,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::str(s),
        serde_json::Value::Array(items) => Value::list(items.iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => {
            let mut out = fast_index_map_new();
            for (k, v) in map {
                out.insert(DictKey::Str(Rc::from(k.as_str())), json_to_value(v));
            }
            Value::dict(out)
        }
    }
}

fn arg_type_id(v: &Value) -> String {
    match v {
        Value::NativeType(t) => t.id.to_string(),
        Value::Type(t) => t.name.clone(),
        other => other.type_name(),
    }
}

impl Runtime {
    /// The host type a value belongs to, if it is a host value.
    pub fn native_type_of(&self, value: &Value) -> Option<Rc<NativeType>> {
        let h = &self.host_types;
        Some(match value {
            Value::None => h.none.clone(),
            Value::Bool(_) => h.bool.clone(),
            Value::Int(_) => h.int.clone(),
            Value::Float(_) => h.float.clone(),
            Value::Str(_) => h.str.clone(),
            Value::List(_) => h.list.clone(),
            Value::Tuple(_) => h.tuple.clone(),
            Value::Dict(_) => h.dict.clone(),
            Value::Set(_) => h.set.clone(),
            Value::Range(_) => h.range.clone(),
            Value::Iterator(_) => h.iterator.clone(),
            Value::NativeObject(o) => o.ty.clone(),
            _ => return None,
        })
    }

    pub fn host_type_id(&self, value: &Value) -> Option<HostTypeId> {
        self.native_type_of(value).map(|t| t.id.clone())
    }

    /// Intrinsic members first, then the extension registry.
    pub(crate) fn host_get_attr(&mut self, target: &Value, name: &str) -> Result<Value, RuntimeError> {
        if let Some(v) = intrinsic_member(target, name) {
            return Ok(v);
        }
        if let Some(ty) = self.native_type_of(target) {
            if let Some(f) = self.extensions.lookup(&ty.id, name) {
                return Ok(Value::BoundMethod(Rc::new(BoundMethod {
                    receiver: target.clone(),
                    function: f,
                })));
            }
        }
        Err(self.error(DiagnosticKind::NativeMissingAttribute {
            ty: target.type_name(),
            name: name.to_string(),
        }))
    }

    pub(crate) fn native_type_get_attr(
        &mut self,
        ty: &Rc<NativeType>,
        name: &str,
    ) -> Result<Value, RuntimeError> {
        match name {
            "__name__" => Ok(Value::str(&ty.name)),
            "__qualname__" => Ok(Value::str(&ty.path)),
            "__id__" => Ok(Value::str(ty.id.as_str())),
            _ => match self.extensions.lookup(&ty.id, name) {
                Some(f) => Ok(Value::Function(f)),
                None => Err(self.error(DiagnosticKind::NativeMissingAttribute {
                    ty: ty.path.clone(),
                    name: name.to_string(),
                })),
            },
        }
    }

    /// Extension `__new__`, then the host constructor.
    pub(crate) fn construct_native(
        &mut self,
        ty: &Rc<NativeType>,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        if let Some(new) = self.extensions.lookup(&ty.id, "__new__") {
            let mut full: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len() + 1);
            full.push(Value::NativeType(ty.clone()));
            full.extend(args.iter().cloned());
            return self.call_function(&new, &full);
        }
        let built = match &ty.kind {
            NativeTypeKind::Builtin => crate::builtins::conversion::construct_builtin(self, ty, args)?,
            NativeTypeKind::Declared => match ty.info() {
                Some(info) => construct_declared(ty, &info, args),
                None => None,
            },
            NativeTypeKind::Instantiated { generic, .. } => construct_declared(ty, generic, args),
            NativeTypeKind::Array { .. } => self.construct_array(args)?,
        };
        built.ok_or_else(|| self.error(DiagnosticKind::NoConstructor(ty.path.clone())))
    }

    fn construct_array(&mut self, args: &[Value]) -> Result<Option<Value>, RuntimeError> {
        Ok(match args {
            [] => Some(Value::list(Vec::new())),
            [Value::Int(n)] if *n >= 0 => Some(Value::list(vec![Value::None; *n as usize])),
            [Value::Int(_)] => None,
            [items] => Some(Value::list(self.collect(items)?)),
            _ => None,
        })
    }

    /// `T[A, B]` selects the arity-2 generic registration; `T[()]` is the
    /// array type of `T`.
    pub fn instantiate_generic(
        &mut self,
        ty: &Rc<NativeType>,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        if args.is_empty() {
            let id = format!("{}[]", ty.id);
            return Ok(Value::NativeType(Rc::new(NativeType::new(
                HostTypeId::new(&id),
                &format!("{}[]", ty.name),
                &format!("{}[]", ty.path),
                NativeTypeKind::Array { element: ty.clone() },
            ))));
        }
        let Some(generic) = ty.generic(args.len()) else {
            return Err(self.error(DiagnosticKind::NoGenericArity {
                ty: ty.path.clone(),
                arity: args.len(),
            }));
        };
        let arg_ids: Vec<String> = args.iter().map(arg_type_id).collect();
        let id = format!("{}[{}]", generic.full_name(), arg_ids.join(","));
        let name = format!("{}[{}]", ty.name, arg_ids.join(","));
        let path = format!("{}[{}]", ty.path, arg_ids.join(","));
        Ok(Value::NativeType(Rc::new(NativeType::new(
            HostTypeId::new(&id),
            &name,
            &path,
            NativeTypeKind::Instantiated {
                generic,
                args: args.to_vec(),
            },
        ))))
    }
}

/// Field defaults from the metadata, overridden positionally by `args`.
fn construct_declared(
    ty: &Rc<NativeType>,
    info: &NativeTypeInfo,
    args: &[Value],
) -> Option<Value> {
    if !info.constructible || args.len() > info.fields.len() {
        return None;
    }
    let mut fields = MemberTable::new();
    for (i, spec) in info.fields.iter().enumerate() {
        let value = match args.get(i) {
            Some(v) => v.clone(),
            None => json_to_value(&spec.default),
        };
        fields.insert(spec.name.clone(), value);
    }
    Some(Value::NativeObject(Rc::new(NativeObject {
        ty: ty.clone(),
        fields: RefCell::new(fields),
    })))
}

fn intrinsic_member(target: &Value, name: &str) -> Option<Value> {
    match target {
        Value::NativeObject(obj) => {
            if let Some(v) = obj.fields.borrow().get(name) {
                return Some(v.clone());
            }
        }
        Value::Range(r) => match name {
            "start" => return Some(Value::Int(r.start)),
            "end" | "stop" => return Some(Value::Int(r.end)),
            "step" => return Some(Value::Int(r.step)),
            _ => {}
        },
        _ => {}
    }
    MethodKind::lookup(target, name).map(|kind| {
        Value::NativeMethod(Rc::new(NativeMethod {
            receiver: target.clone(),
            kind,
        }))
    })
}
