use pyhost_diagnostics::DiagnosticKind;

use crate::core::Value;
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

pub fn check_arity(
    rt: &Runtime,
    name: &str,
    args: &[Value],
    min: usize,
    max: usize,
) -> Result<(), RuntimeError> {
    if args.len() < min || args.len() > max {
        return Err(rt.error(DiagnosticKind::ArgumentCountMismatch {
            name: name.to_string(),
            expected_min: min,
            expected_max: max,
            actual: args.len(),
        }));
    }
    Ok(())
}

pub fn expect_str<'a>(rt: &Runtime, name: &str, v: &'a Value) -> Result<&'a str, RuntimeError> {
    v.as_str().ok_or_else(|| {
        rt.error(DiagnosticKind::TypeMismatch {
            expected: format!("str argument to {}()", name),
            actual: v.type_name(),
        })
    })
}

pub fn expect_int(rt: &Runtime, name: &str, v: &Value) -> Result<i64, RuntimeError> {
    v.as_int().ok_or_else(|| {
        rt.error(DiagnosticKind::TypeMismatch {
            expected: format!("int argument to {}()", name),
            actual: v.type_name(),
        })
    })
}

/// `None` or absent reads as "not given".
pub fn optional_int(rt: &Runtime, name: &str, v: Option<&Value>) -> Result<Option<i64>, RuntimeError> {
    match v {
        None | Some(Value::None) => Ok(None),
        Some(v) => expect_int(rt, name, v).map(Some),
    }
}
