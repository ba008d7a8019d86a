use pyhost_diagnostics::DiagnosticKind;

use super::MethodKind;
use super::common::*;
use crate::core::value::DictRef;
use crate::core::{DictKey, Value};
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

pub(super) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Keys
            | MethodKind::Values
            | MethodKind::Items
            | MethodKind::Get
            | MethodKind::Pop
            | MethodKind::Update
            | MethodKind::Contains
            | MethodKind::Clear
    )
}

pub(super) fn dispatch(
    rt: &mut Runtime,
    dict: &DictRef,
    kind: MethodKind,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match kind {
        MethodKind::Keys => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            let keys = dict.borrow().keys().map(DictKey::to_value).collect();
            Ok(Value::list(keys))
        }
        MethodKind::Values => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            let values = dict.borrow().values().cloned().collect();
            Ok(Value::list(values))
        }
        MethodKind::Items => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            let items = dict
                .borrow()
                .iter()
                .map(|(k, v)| Value::tuple(vec![k.to_value(), v.clone()]))
                .collect();
            Ok(Value::list(items))
        }
        MethodKind::Get => {
            validate_arity(rt, kind, args.len(), 1, 2)?;
            let key = rt.hash_key(&args[0])?;
            let found = dict.borrow().get(&key).cloned();
            Ok(found.unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
        }
        MethodKind::Pop => {
            validate_arity(rt, kind, args.len(), 1, 2)?;
            let key = rt.hash_key(&args[0])?;
            let removed = dict.borrow_mut().shift_remove(&key);
            match (removed, args.get(1)) {
                (Some(v), _) => Ok(v),
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => {
                    let shown = rt.repr(&args[0])?;
                    Err(rt.error(DiagnosticKind::KeyNotFound(shown)))
                }
            }
        }
        MethodKind::Update => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let Value::Dict(other) = &args[0] else {
                return Err(rt.error(DiagnosticKind::TypeMismatch {
                    expected: "dict".into(),
                    actual: args[0].type_name(),
                }));
            };
            let entries: Vec<(DictKey, Value)> = other
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            dict.borrow_mut().extend(entries);
            Ok(Value::None)
        }
        MethodKind::Contains => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let found = match DictKey::from_value(&args[0]) {
                Some(k) => dict.borrow().contains_key(&k),
                None => false,
            };
            Ok(Value::Bool(found))
        }
        MethodKind::Clear => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            dict.borrow_mut().clear();
            Ok(Value::None)
        }
        _ => Err(unsupported(rt, &Value::Dict(dict.clone()), kind)),
    }
}
