use std::rc::Rc;

use pyhost_diagnostics::DiagnosticKind;

use super::MethodKind;
use super::common::*;
use crate::core::Value;
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

pub(super) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Index | MethodKind::Count | MethodKind::Contains
    )
}

pub(super) fn dispatch(
    rt: &mut Runtime,
    tuple: &Rc<[Value]>,
    kind: MethodKind,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match kind {
        MethodKind::Index => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            match position_equal(rt, tuple, &args[0])? {
                Some(i) => Ok(Value::Int(i as i64)),
                None => Err(rt.error(DiagnosticKind::NotInList("tuple.index"))),
            }
        }
        MethodKind::Count => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            Ok(Value::Int(count_equal(rt, tuple, &args[0])?))
        }
        MethodKind::Contains => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            Ok(Value::Bool(position_equal(rt, tuple, &args[0])?.is_some()))
        }
        _ => Err(unsupported(rt, &Value::Tuple(tuple.clone()), kind)),
    }
}
