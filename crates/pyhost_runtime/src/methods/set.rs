use pyhost_diagnostics::DiagnosticKind;

use super::MethodKind;
use super::common::*;
use crate::core::Value;
use crate::core::value::SetRef;
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

pub(super) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Add
            | MethodKind::Discard
            | MethodKind::Remove
            | MethodKind::Contains
            | MethodKind::Clear
    )
}

pub(super) fn dispatch(
    rt: &mut Runtime,
    set: &SetRef,
    kind: MethodKind,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match kind {
        MethodKind::Add => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let key = rt.hash_key(&args[0])?;
            set.borrow_mut().insert(key);
            Ok(Value::None)
        }
        MethodKind::Discard => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let key = rt.hash_key(&args[0])?;
            set.borrow_mut().shift_remove(&key);
            Ok(Value::None)
        }
        MethodKind::Remove => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let key = rt.hash_key(&args[0])?;
            let removed = set.borrow_mut().shift_remove(&key);
            if !removed {
                let shown = rt.repr(&args[0])?;
                return Err(rt.error(DiagnosticKind::KeyNotFound(shown)));
            }
            Ok(Value::None)
        }
        MethodKind::Contains => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let key = rt.hash_key(&args[0])?;
            Ok(Value::Bool(set.borrow().contains(&key)))
        }
        MethodKind::Clear => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            set.borrow_mut().clear();
            Ok(Value::None)
        }
        _ => Err(unsupported(rt, &Value::Set(set.clone()), kind)),
    }
}
