use std::rc::Rc;

use super::MethodKind;
use super::common::*;
use crate::core::Value;
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

pub(super) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Upper
            | MethodKind::Lower
            | MethodKind::Strip
            | MethodKind::StartsWith
            | MethodKind::EndsWith
            | MethodKind::Find
            | MethodKind::Count
            | MethodKind::Contains
    )
}

pub(super) fn dispatch(
    rt: &mut Runtime,
    s: &Rc<str>,
    kind: MethodKind,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match kind {
        MethodKind::Upper => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            Ok(Value::str(&s.to_uppercase()))
        }
        MethodKind::Lower => {
            validate_arity(rt, kind, args.len(), 0, 0)?;
            Ok(Value::str(&s.to_lowercase()))
        }
        MethodKind::Strip => {
            validate_arity(rt, kind, args.len(), 0, 1)?;
            match args.first() {
                Some(chars) => {
                    let chars = expect_str(rt, chars)?;
                    Ok(Value::str(s.trim_matches(|c: char| chars.contains(c))))
                }
                None => Ok(Value::str(s.trim())),
            }
        }
        MethodKind::StartsWith => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let prefix = expect_str(rt, &args[0])?;
            Ok(Value::Bool(s.starts_with(prefix)))
        }
        MethodKind::EndsWith => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let suffix = expect_str(rt, &args[0])?;
            Ok(Value::Bool(s.ends_with(suffix)))
        }
        MethodKind::Find => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let needle = expect_str(rt, &args[0])?;
            // Character index, -1 when absent.
            let found = s
                .find(needle)
                .map(|byte| s[..byte].chars().count() as i64)
                .unwrap_or(-1);
            Ok(Value::Int(found))
        }
        MethodKind::Count => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let needle = expect_str(rt, &args[0])?;
            let n = if needle.is_empty() {
                s.chars().count() + 1
            } else {
                s.matches(needle).count()
            };
            Ok(Value::Int(n as i64))
        }
        MethodKind::Contains => {
            validate_arity(rt, kind, args.len(), 1, 1)?;
            let needle = expect_str(rt, &args[0])?;
            Ok(Value::Bool(s.contains(needle)))
        }
        _ => Err(unsupported(rt, &Value::Str(s.clone()), kind)),
    }
}
