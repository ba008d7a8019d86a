//! String conversion, the built-in constructors and the extension methods
//! installed on `str`, `list`, `tuple`, `dict` and `set` at start-up.

use std::rc::Rc;

use pyhost_core::{builtin_types, fast_index_map_new, fast_index_set_new};
use pyhost_diagnostics::DiagnosticKind;

use super::common::{check_arity, expect_int, expect_str};
use crate::core::{DictKey, NativeType, RangeValue, Value};
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

fn int_to_text(i: i64) -> String {
    let mut buf = itoa::Buffer::new();
    buf.format(i).to_string()
}

fn float_to_text(f: f64) -> String {
    if f.is_nan() {
        return "nan".into();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let mut buf = ryu::Buffer::new();
    buf.format_finite(f).to_string()
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

impl Runtime {
    /// `str(x)`.
    pub fn to_str(&mut self, value: &Value) -> Result<String, RuntimeError> {
        match value {
            Value::None => Ok("None".into()),
            Value::Bool(true) => Ok("True".into()),
            Value::Bool(false) => Ok("False".into()),
            Value::Int(i) => Ok(int_to_text(*i)),
            Value::Float(f) => Ok(float_to_text(*f)),
            Value::Str(s) => Ok(s.to_string()),
            Value::List(_) | Value::Tuple(_) | Value::Dict(_) | Value::Set(_) => {
                if let Some(s) = self.extension_str(value)? {
                    return Ok(s);
                }
                self.render_container(value)
            }
            Value::Range(r) => Ok(if r.step == 1 {
                format!("range({}, {})", r.start, r.end)
            } else {
                format!("range({}, {}, {})", r.start, r.end, r.step)
            }),
            Value::Iterator(_) => Ok("<iterator>".into()),
            Value::Instance(_) => {
                let hook = self.get_attr(value, "__str__")?;
                let out = self.call(&hook, &[])?;
                match out {
                    Value::Str(s) => Ok(s.to_string()),
                    other => Err(self.error(DiagnosticKind::TypeMismatch {
                        expected: "str from __str__".into(),
                        actual: other.type_name(),
                    })),
                }
            }
            Value::Type(t) => Ok(format!("class '{}'", t.name)),
            Value::NativeType(t) => Ok(format!("class '{}'", t.path)),
            Value::Function(f) => Ok(format!("function '{}'", f.name)),
            Value::BoundMethod(m) => Ok(format!("function '{}'", m.function.name)),
            Value::NativeMethod(m) => Ok(format!("function '{}'", m.kind.name())),
            Value::Module(m) => Ok(format!("module '{}'", m.name)),
            Value::Namespace(ns) => Ok(format!("namespace '{}'", ns.path)),
            Value::NativeObject(o) => {
                if let Some(s) = self.extension_str(value)? {
                    return Ok(s);
                }
                Ok(format!("object '{}'", o.ty.name))
            }
        }
    }

    /// `repr(x)`: strings quoted, instances through `__repr__` when their
    /// class defines one.
    pub fn repr(&mut self, value: &Value) -> Result<String, RuntimeError> {
        match value {
            Value::Str(s) => Ok(quote(s)),
            Value::Instance(inst) if inst.ty().has("__repr__") => {
                let hook = self.get_attr(value, "__repr__")?;
                let out = self.call(&hook, &[])?;
                self.to_str(&out)
            }
            other => self.to_str(other),
        }
    }

    fn extension_str(&mut self, value: &Value) -> Result<Option<String>, RuntimeError> {
        let Some(ty) = self.native_type_of(value) else {
            return Ok(None);
        };
        let Some(hook) = self.extensions.lookup(&ty.id, "__str__") else {
            return Ok(None);
        };
        let out = self.call_function(&hook, std::slice::from_ref(value))?;
        match out {
            Value::Str(s) => Ok(Some(s.to_string())),
            other => self.to_str(&other).map(Some),
        }
    }

    /// `[a, b]`, `(a, b)`, `{k: v}`, `{a, b}` or `set()`, items shown by
    /// `repr`.
    pub(crate) fn render_container(&mut self, value: &Value) -> Result<String, RuntimeError> {
        let (ptr, ellipsis) = match value {
            Value::List(l) => (Rc::as_ptr(l) as *const (), "[...]"),
            Value::Dict(d) => (Rc::as_ptr(d) as *const (), "{...}"),
            _ => return self.render_items(value),
        };
        if self.rendering.contains(&ptr) {
            return Ok(ellipsis.into());
        }
        self.rendering.push(ptr);
        let rendered = self.render_items(value);
        self.rendering.pop();
        rendered
    }

    fn render_items(&mut self, value: &Value) -> Result<String, RuntimeError> {
        let (open, close, items) = match value {
            Value::List(l) => {
                let items = l.borrow().clone();
                ("[", "]", self.repr_all(&items)?)
            }
            Value::Tuple(t) => ("(", ")", self.repr_all(t)?),
            Value::Set(s) => {
                let keys: Vec<Value> = s.borrow().iter().map(DictKey::to_value).collect();
                if keys.is_empty() {
                    return Ok("set()".into());
                }
                ("{", "}", self.repr_all(&keys)?)
            }
            Value::Dict(d) => {
                let pairs: Vec<(Value, Value)> = d
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.to_value(), v.clone()))
                    .collect();
                let mut items = Vec::with_capacity(pairs.len());
                for (k, v) in &pairs {
                    items.push(format!("{}: {}", self.repr(k)?, self.repr(v)?));
                }
                ("{", "}", items)
            }
            other => return self.to_str(other),
        };
        Ok(format!("{}{}{}", open, items.join(", "), close))
    }

    fn repr_all(&mut self, items: &[Value]) -> Result<Vec<String>, RuntimeError> {
        items.iter().map(|v| self.repr(v)).collect()
    }
}

pub fn builtin_repr(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "repr", args, 1, 1)?;
    Ok(Value::str(&rt.repr(&args[0])?))
}

/// Host constructor for the built-in value kinds. `None` means no
/// constructor accepts `args`.
pub(crate) fn construct_builtin(
    rt: &mut Runtime,
    ty: &Rc<NativeType>,
    args: &[Value],
) -> Result<Option<Value>, RuntimeError> {
    let value = match ty.id.as_str() {
        builtin_types::NONE => match args {
            [] => Value::None,
            _ => return Ok(None),
        },
        builtin_types::BOOL => match args {
            [] => Value::Bool(false),
            [v] => Value::Bool(rt.truthy(v)?),
            _ => return Ok(None),
        },
        builtin_types::INT => match args {
            [] => Value::Int(0),
            [v] => Value::Int(to_int(rt, v)?),
            _ => return Ok(None),
        },
        builtin_types::FLOAT => match args {
            [] => Value::Float(0.0),
            [v] => Value::Float(to_float(rt, v)?),
            _ => return Ok(None),
        },
        builtin_types::STR => match args {
            [] => Value::str(""),
            [v] => Value::str(&rt.to_str(v)?),
            _ => return Ok(None),
        },
        builtin_types::LIST => match args {
            [] => Value::list(Vec::new()),
            [v] => Value::list(rt.collect(v)?),
            _ => return Ok(None),
        },
        builtin_types::TUPLE => match args {
            [] => Value::tuple(Vec::new()),
            [v] => Value::tuple(rt.collect(v)?),
            _ => return Ok(None),
        },
        builtin_types::SET => match args {
            [] => Value::set(fast_index_set_new()),
            [v] => {
                let mut set = fast_index_set_new();
                for item in rt.collect(v)? {
                    set.insert(rt.hash_key(&item)?);
                }
                Value::set(set)
            }
            _ => return Ok(None),
        },
        builtin_types::DICT => match args {
            [] => Value::dict(fast_index_map_new()),
            [Value::Dict(d)] => Value::dict(d.borrow().clone()),
            [v] => {
                let mut map = fast_index_map_new();
                for pair in rt.collect(v)? {
                    let kv = rt.collect(&pair)?;
                    let [k, v] = kv.as_slice() else {
                        return Err(rt.error(DiagnosticKind::TypeMismatch {
                            expected: "key/value pair".into(),
                            actual: format!("sequence of length {}", kv.len()),
                        }));
                    };
                    map.insert(rt.hash_key(k)?, v.clone());
                }
                Value::dict(map)
            }
            _ => return Ok(None),
        },
        builtin_types::RANGE => build_range(rt, args)?,
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn to_int(rt: &Runtime, v: &Value) -> Result<i64, RuntimeError> {
    match v {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(*b as i64),
        Value::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        Value::Str(s) => s.trim().parse::<i64>().map_err(|_| {
            rt.error(DiagnosticKind::InvalidLiteral {
                ty: "int",
                text: s.to_string(),
            })
        }),
        other => Err(rt.error(DiagnosticKind::TypeMismatch {
            expected: "str or number for int()".into(),
            actual: other.type_name(),
        })),
    }
}

fn to_float(rt: &Runtime, v: &Value) -> Result<f64, RuntimeError> {
    match v {
        Value::Str(s) => s.trim().parse::<f64>().map_err(|_| {
            rt.error(DiagnosticKind::InvalidLiteral {
                ty: "float",
                text: s.to_string(),
            })
        }),
        other => other.as_float().ok_or_else(|| {
            rt.error(DiagnosticKind::TypeMismatch {
                expected: "str or number for float()".into(),
                actual: other.type_name(),
            })
        }),
    }
}

/// `range(end)`, `range(start, end)`, `range(start, end, step)`.
fn build_range(rt: &Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    let ints = args
        .iter()
        .map(|a| expect_int(rt, "range", a))
        .collect::<Result<Vec<_>, _>>()?;
    let (start, end, step) = match ints.as_slice() {
        [end] => (0, *end, 1),
        [start, end] => (*start, *end, 1),
        [start, end, step] => (*start, *end, *step),
        _ => {
            return Err(rt.error(DiagnosticKind::ArgumentCountMismatch {
                name: "range".into(),
                expected_min: 1,
                expected_max: 3,
                actual: args.len(),
            }));
        }
    };
    if step == 0 {
        return Err(rt.error(DiagnosticKind::ZeroStep("range")));
    }
    Ok(Value::Range(Rc::new(RangeValue { start, end, step })))
}

// Extensions registered on the built-in host types. The receiver arrives
// first.

pub fn str_replace(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "replace", args, 3, 3)?;
    let s = expect_str(rt, "replace", &args[0])?;
    let from = expect_str(rt, "replace", &args[1])?;
    let to = expect_str(rt, "replace", &args[2])?;
    Ok(Value::str(&s.replace(from, to)))
}

pub fn str_join(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "join", args, 2, 2)?;
    let sep = expect_str(rt, "join", &args[0])?.to_string();
    let items = rt.collect(&args[1])?;
    let mut parts = Vec::with_capacity(items.len());
    for item in &items {
        parts.push(expect_str(rt, "join", item)?.to_string());
    }
    Ok(Value::str(&parts.join(&sep)))
}

/// Splits on runs of whitespace without a separator, otherwise on every
/// occurrence of it.
pub fn str_split(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "split", args, 1, 2)?;
    let s = expect_str(rt, "split", &args[0])?;
    let parts: Vec<Value> = match args.get(1) {
        None | Some(Value::None) => s.split_whitespace().map(Value::str).collect(),
        Some(sep) => {
            let sep = expect_str(rt, "split", sep)?;
            if sep.is_empty() {
                return Err(rt.error(DiagnosticKind::EmptySeparator));
            }
            s.split(sep).map(Value::str).collect()
        }
    };
    Ok(Value::list(parts))
}

/// `str(x)`; the first argument is the `str` type itself.
pub fn str_new(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "str", args, 1, 2)?;
    match args.get(1) {
        Some(v) => Ok(Value::str(&rt.to_str(v)?)),
        None => Ok(Value::str("")),
    }
}

pub fn list_append(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "append", args, 2, 2)?;
    match &args[0] {
        Value::List(l) => {
            l.borrow_mut().push(args[1].clone());
            Ok(Value::None)
        }
        other => Err(rt.error(DiagnosticKind::TypeMismatch {
            expected: "list".into(),
            actual: other.type_name(),
        })),
    }
}

/// `__str__` for list, tuple, dict and set.
pub fn container_str(rt: &mut Runtime, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity(rt, "__str__", args, 1, 1)?;
    Ok(Value::str(&rt.render_container(&args[0])?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_like_python() {
        let mut rt = Runtime::new();
        assert_eq!(rt.to_str(&Value::Int(-42)).unwrap(), "-42");
        assert_eq!(rt.to_str(&Value::Float(1.5)).unwrap(), "1.5");
        assert_eq!(rt.to_str(&Value::Float(f64::NEG_INFINITY)).unwrap(), "-inf");
        assert_eq!(rt.to_str(&Value::Bool(true)).unwrap(), "True");
        assert_eq!(rt.to_str(&Value::None).unwrap(), "None");
        assert_eq!(rt.repr(&Value::str("it's")).unwrap(), "'it\\'s'");
    }

    #[test]
    fn containers_render_items_with_repr() {
        let mut rt = Runtime::new();
        let list = Value::list(vec![Value::Int(1), Value::str("a")]);
        assert_eq!(rt.to_str(&list).unwrap(), "[1, 'a']");
        assert_eq!(rt.to_str(&Value::tuple(vec![])).unwrap(), "()");
        assert_eq!(rt.to_str(&Value::set(fast_index_set_new())).unwrap(), "set()");
        let mut map = fast_index_map_new();
        map.insert(DictKey::Str(Rc::from("k")), Value::Int(2));
        assert_eq!(rt.to_str(&Value::dict(map)).unwrap(), "{'k': 2}");
    }

    #[test]
    fn self_referencing_containers_render_an_ellipsis() {
        let mut rt = Runtime::new();
        let list = Value::list(vec![Value::Int(1)]);
        if let Value::List(l) = &list {
            l.borrow_mut().push(list.clone());
        }
        assert_eq!(rt.to_str(&list).unwrap(), "[1, [...]]");
        assert!(rt.rendering.is_empty());

        let dict = Value::dict(fast_index_map_new());
        if let Value::Dict(d) = &dict {
            d.borrow_mut().insert(DictKey::Str(Rc::from("me")), dict.clone());
        }
        assert_eq!(rt.to_str(&dict).unwrap(), "{'me': {...}}");
    }

    #[test]
    fn range_rejects_zero_step() {
        let rt = Runtime::new();
        let err = build_range(&rt, &[Value::Int(0), Value::Int(3), Value::Int(0)]).unwrap_err();
        assert_eq!(err.message, "range step cannot be zero");
    }

    #[test]
    fn int_parses_trimmed_text() {
        let rt = Runtime::new();
        assert_eq!(to_int(&rt, &Value::str(" 17 ")).unwrap(), 17);
        let err = to_int(&rt, &Value::str("x1")).unwrap_err();
        assert_eq!(err.message, "invalid literal for int(): 'x1'");
    }
}
