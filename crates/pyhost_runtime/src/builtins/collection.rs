use std::cmp::Ordering;

use pyhost_diagnostics::DiagnosticKind;

use super::common::{check_arity, optional_int};
use crate::core::Value;
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

pub fn builtin_len(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "len", args, 1, 1)?;
    Ok(Value::Int(rt.len(&args[0])? as i64))
}

/// `max(a, b, ...)` or `max(iterable)`; the items themselves are compared
/// and the winning item is returned.
pub fn builtin_max(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    extreme(rt, "max", ">", Ordering::Greater, args)
}

pub fn builtin_min(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    extreme(rt, "min", "<", Ordering::Less, args)
}

fn extreme(
    rt: &mut Runtime,
    name: &'static str,
    op: &'static str,
    wins: Ordering,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let items = match args {
        [] => return Err(rt.error(DiagnosticKind::EmptySequence(name))),
        [single] => rt.collect(single)?,
        many => many.to_vec(),
    };
    let mut iter = items.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(rt.error(DiagnosticKind::EmptySequence(name)));
    };
    for item in iter {
        if rt.compare(&item, &best, op)? == wins {
            best = item;
        }
    }
    Ok(best)
}

/// Clamped `(start, stop)` for a slice of a sequence of `len` items.
fn slice_bounds(len: i64, start: Option<i64>, stop: Option<i64>, step: i64) -> (i64, i64) {
    let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
    let adjust = |given: Option<i64>, default: i64| match given {
        None => default,
        Some(i) => {
            let i = if i < 0 { i + len } else { i };
            i.clamp(lower, upper)
        }
    };
    let start = adjust(start, if step > 0 { lower } else { upper });
    let stop = adjust(stop, if step > 0 { upper } else { lower });
    (start, stop)
}

fn slice_indices(len: usize, start: Option<i64>, stop: Option<i64>, step: i64) -> Vec<usize> {
    let (mut i, stop) = slice_bounds(len as i64, start, stop, step);
    let mut out = Vec::new();
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        out.push(i as usize);
        i += step;
    }
    out
}

/// `slice(seq, start=None, stop=None, step=1)`. Lists, tuples and strings
/// keep their kind; any other iterable yields a list.
pub fn builtin_slice(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "slice", args, 1, 4)?;
    let start = optional_int(rt, "slice", args.get(1))?;
    let stop = optional_int(rt, "slice", args.get(2))?;
    let step = optional_int(rt, "slice", args.get(3))?.unwrap_or(1);
    if step == 0 {
        return Err(rt.error(DiagnosticKind::ZeroStep("slice")));
    }
    Ok(match &args[0] {
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let picked: String = slice_indices(chars.len(), start, stop, step)
                .into_iter()
                .map(|i| chars[i])
                .collect();
            Value::str(&picked)
        }
        Value::Tuple(t) => Value::tuple(
            slice_indices(t.len(), start, stop, step)
                .into_iter()
                .map(|i| t[i].clone())
                .collect(),
        ),
        other => {
            let items = rt.collect(other)?;
            Value::list(
                slice_indices(items.len(), start, stop, step)
                    .into_iter()
                    .map(|i| items[i].clone())
                    .collect(),
            )
        }
    })
}

pub fn builtin_iter(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "iter", args, 1, 1)?;
    rt.iter(&args[0])
}

/// `next(it[, default])`; an exhausted iterator without a default raises
/// StopIteration.
pub fn builtin_next(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "next", args, 1, 2)?;
    match rt.next(&args[0])? {
        Some(v) => Ok(v),
        None => match args.get(1) {
            Some(default) => Ok(default.clone()),
            None => Err(rt.error(DiagnosticKind::IterationFinished)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(v: &[i64]) -> Value {
        Value::list(v.iter().map(|i| Value::Int(*i)).collect())
    }

    #[test]
    fn slice_follows_python_bounds() {
        assert_eq!(slice_indices(5, None, None, -1), vec![4, 3, 2, 1, 0]);
        assert_eq!(slice_indices(5, Some(-2), None, 1), vec![3, 4]);
        assert_eq!(slice_indices(5, Some(1), Some(100), 2), vec![1, 3]);
        assert_eq!(slice_indices(5, Some(-100), Some(2), 1), vec![0, 1]);
        assert!(slice_indices(5, Some(3), Some(1), 1).is_empty());
    }

    #[test]
    fn slice_keeps_strings_and_rejects_zero_step() {
        let mut rt = Runtime::new();
        let s = builtin_slice(&mut rt, &[Value::str("hello"), Value::Int(1), Value::Int(4)]).unwrap();
        assert_eq!(s, Value::str("ell"));
        let err = builtin_slice(
            &mut rt,
            &[ints(&[1, 2]), Value::None, Value::None, Value::Int(0)],
        )
        .unwrap_err();
        assert_eq!(err.message, "slice step cannot be zero");
    }

    #[test]
    fn max_and_min_return_items() {
        let mut rt = Runtime::new();
        assert_eq!(builtin_max(&mut rt, &[ints(&[3, 9, 2])]).unwrap(), Value::Int(9));
        assert_eq!(
            builtin_min(&mut rt, &[Value::Int(4), Value::Float(1.5)]).unwrap(),
            Value::Float(1.5)
        );
        let err = builtin_max(&mut rt, &[ints(&[])]).unwrap_err();
        assert_eq!(err.message, "max() arg is an empty sequence");
    }

    #[test]
    fn next_falls_back_to_default() {
        let mut rt = Runtime::new();
        let it = builtin_iter(&mut rt, &[ints(&[1])]).unwrap();
        assert_eq!(builtin_next(&mut rt, &[it.clone()]).unwrap(), Value::Int(1));
        assert_eq!(builtin_next(&mut rt, &[it.clone(), Value::None]).unwrap(), Value::None);
        let err = builtin_next(&mut rt, &[it]).unwrap_err();
        assert!(err.is_a(pyhost_diagnostics::ExceptionClass::StopIteration));
    }
}
