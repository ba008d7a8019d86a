use pyhost_diagnostics::DiagnosticKind;

use super::MethodKind;
use crate::core::Value;
use crate::errors::{RuntimeError, messages};
use crate::runtime::Runtime;

pub fn validate_arity(
    rt: &Runtime,
    kind: MethodKind,
    args_len: usize,
    min: usize,
    max: usize,
) -> Result<(), RuntimeError> {
    if args_len < min || args_len > max {
        return Err(rt.error(DiagnosticKind::ArgumentCountMismatch {
            name: kind.name().to_string(),
            expected_min: min,
            expected_max: max,
            actual: args_len,
        }));
    }
    Ok(())
}

pub fn unsupported(rt: &Runtime, recv: &Value, kind: MethodKind) -> RuntimeError {
    rt.error(DiagnosticKind::NativeMissingAttribute {
        ty: recv.type_name(),
        name: kind.name().to_string(),
    })
}

pub fn expect_str<'a>(rt: &Runtime, v: &'a Value) -> Result<&'a str, RuntimeError> {
    v.as_str()
        .ok_or_else(|| rt.error(DiagnosticKind::Raw(messages::NOT_A_STRING.into())))
}

pub fn expect_int(rt: &Runtime, v: &Value) -> Result<i64, RuntimeError> {
    v.as_int()
        .ok_or_else(|| rt.error(DiagnosticKind::Raw(messages::NOT_AN_INT.into())))
}

/// Clamps a possibly negative index into `0..=len`.
pub fn clamp_index(i: i64, len: usize) -> usize {
    let len = len as i64;
    let i = if i < 0 { (i + len).max(0) } else { i.min(len) };
    i as usize
}

/// Occurrences of `needle` in `items` under runtime equality.
pub fn count_equal(rt: &mut Runtime, items: &[Value], needle: &Value) -> Result<i64, RuntimeError> {
    let mut n = 0;
    for v in items {
        if rt.values_equal(v, needle)? {
            n += 1;
        }
    }
    Ok(n)
}

pub fn position_equal(
    rt: &mut Runtime,
    items: &[Value],
    needle: &Value,
) -> Result<Option<usize>, RuntimeError> {
    for (i, v) in items.iter().enumerate() {
        if rt.values_equal(v, needle)? {
            return Ok(Some(i));
        }
    }
    Ok(None)
}
