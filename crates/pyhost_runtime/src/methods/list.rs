use std::cmp::Ordering;

use pyhost_diagnostics::DiagnosticKind;

use super::MethodKind;
use super::common::*;
use crate::core::Value;
use crate::core::value::ListRef;
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

pub(super) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Push
            | MethodKind::Pop
            | MethodKind::Insert
            | MethodKind::Extend
            | MethodKind::Reverse
            | MethodKind::Sort
            | MethodKind::Index
            | MethodKind::Count
            | MethodKind::Contains
            | MethodKind::Clear
            | MethodKind::Remove
    )
}

pub(super) fn dispatch(
    rt: &mut Runtime,
    list: &ListRef,
    kind: MethodKind,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match kind {
        MethodKind::Push => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            list.borrow_mut().push(args[0].clone());
            Ok(Value::None)
        }
        MethodKind::Pop => {
            validate_arity(rt, kind, args.len(), 0, 1)?;
            let len = list.borrow().len();
            if len == 0 {
                return Err(rt.error(DiagnosticKind::IndexOutOfRange));
            }
            let i = match args.first() {
                Some(v) => expect_int(rt, v)?,
                None => -1,
            };
            let idx = if i < 0 { i + len as i64 } else { i };
            if idx < 0 || idx >= len as i64 {
                return Err(rt.error(DiagnosticKind::IndexOutOfRange));
            }
            Ok(list.borrow_mut().remove(idx as usize))
        }
        MethodKind::Insert => {
            validate_arity(rt, kind, args.len(), 2, 2)?;
            let i = expect_int(rt, &args[0])?;
            let mut l = list.borrow_mut();
            let at = clamp_index(i, l.len());
            l.insert(at, args[1].clone());
            Ok(Value::None)
        }
        MethodKind::Extend => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let items = rt.collect(&args[0])?;
            list.borrow_mut().extend(items);
            Ok(Value::None)
        }
        MethodKind::Reverse => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            list.borrow_mut().reverse();
            Ok(Value::None)
        }
        MethodKind::Sort => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            let mut items = list.borrow().clone();
            let mut failure = None;
            items.sort_by(|a, b| {
                if failure.is_some() {
                    return Ordering::Equal;
                }
                match rt.compare(a, b, "<") {
                    Ok(o) => o,
                    Err(e) => {
                        failure = Some(e);
                        Ordering::Equal
                    }
                }
            });
            if let Some(e) = failure {
                return Err(e);
            }
            *list.borrow_mut() = items;
            Ok(Value::None)
        }
        MethodKind::Index => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let items = list.borrow().clone();
            match position_equal(rt, &items, &args[0])? {
                Some(i) => Ok(Value::Int(i as i64)),
                None => Err(rt.error(DiagnosticKind::NotInList("list.index"))),
            }
        }
        MethodKind::Count => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let items = list.borrow().clone();
            Ok(Value::Int(count_equal(rt, &items, &args[0])?))
        }
        MethodKind::Contains => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let items = list.borrow().clone();
            Ok(Value::Bool(position_equal(rt, &items, &args[0])?.is_some()))
        }
        MethodKind::Clear => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            list.borrow_mut().clear();
            Ok(Value::None)
        }
        MethodKind::Remove => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let items = list.borrow().clone();
            match position_equal(rt, &items, &args[0])? {
                Some(i) => {
                    list.borrow_mut().remove(i);
                    Ok(Value::None)
                }
                None => Err(rt.error(DiagnosticKind::NotInList("list.remove"))),
            }
        }
        _ => Err(unsupported(rt, &Value::List(list.clone()), kind)),
    }
}
