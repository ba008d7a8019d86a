//! Value protocols the builtins rely on: truthiness, comparison, item
//! access, membership, iteration and type tests.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use pyhost_diagnostics::{DiagnosticKind, ExceptionClass};
use smallvec::SmallVec;

use crate::core::{DictKey, IterState, TypeDescriptor, Value};
use crate::errors::RuntimeError;
use crate::runtime::Runtime;

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let i = if index < 0 { index + len } else { index };
    if i < 0 || i >= len { None } else { Some(i as usize) }
}

impl Runtime {
    /// Looks `name` up on an instance's type, for special methods.
    fn special_method(&self, value: &Value, name: &str) -> Option<Value> {
        match value {
            Value::Instance(inst) => inst.ty().get(name),
            _ => None,
        }
    }

    fn call_special(
        &mut self,
        hook: &Value,
        receiver: &Value,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let mut full: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len() + 1);
        full.push(receiver.clone());
        full.extend(args.iter().cloned());
        self.call(hook, &full)
    }

    pub fn hash_key(&self, value: &Value) -> Result<DictKey, RuntimeError> {
        DictKey::from_value(value)
            .ok_or_else(|| self.error(DiagnosticKind::Unhashable(value.type_name())))
    }

    pub fn truthy(&mut self, value: &Value) -> Result<bool, RuntimeError> {
        Ok(match value {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.borrow().is_empty(),
            Value::Tuple(t) => !t.is_empty(),
            Value::Dict(d) => !d.borrow().is_empty(),
            Value::Set(s) => !s.borrow().is_empty(),
            Value::Range(r) => !r.is_empty(),
            Value::Instance(_) => {
                if let Some(hook) = self.special_method(value, "__bool__") {
                    let r = self.call_special(&hook, value, &[])?;
                    return self.truthy(&r);
                }
                if self.special_method(value, "__len__").is_some() {
                    return Ok(self.len(value)? != 0);
                }
                true
            }
            _ => true,
        })
    }

    pub fn values_equal(&mut self, a: &Value, b: &Value) -> Result<bool, RuntimeError> {
        if let Some(hook) = self.special_method(a, "__eq__") {
            let r = self.call_special(&hook, a, std::slice::from_ref(b))?;
            return self.truthy(&r);
        }
        Ok(a == b)
    }

    pub fn compare(&mut self, a: &Value, b: &Value, op: &'static str) -> Result<Ordering, RuntimeError> {
        let ord = match (a, b) {
            (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
            (Value::Bool(_) | Value::Int(_) | Value::Float(_), Value::Bool(_) | Value::Int(_) | Value::Float(_)) => {
                match (a.as_float(), b.as_float()) {
                    (Some(x), Some(y)) => x.partial_cmp(&y),
                    _ => None,
                }
            }
            (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
            (Value::Tuple(x), Value::Tuple(y)) => return self.compare_seq(&x[..], &y[..], op),
            (Value::List(x), Value::List(y)) => {
                let (x, y) = (x.borrow().clone(), y.borrow().clone());
                return self.compare_seq(&x, &y, op);
            }
            (Value::Instance(_), _) => {
                if let Some(hook) = self.special_method(a, "__lt__") {
                    let lt = self.call_special(&hook, a, std::slice::from_ref(b))?;
                    if self.truthy(&lt)? {
                        return Ok(Ordering::Less);
                    }
                    return Ok(if self.values_equal(a, b)? {
                        Ordering::Equal
                    } else {
                        Ordering::Greater
                    });
                }
                None
            }
            _ => None,
        };
        ord.ok_or_else(|| {
            self.error(DiagnosticKind::Unorderable {
                op,
                left: a.type_name(),
                right: b.type_name(),
            })
        })
    }

    fn compare_seq(&mut self, x: &[Value], y: &[Value], op: &'static str) -> Result<Ordering, RuntimeError> {
        for (a, b) in x.iter().zip(y.iter()) {
            let o = self.compare(a, b, op)?;
            if o != Ordering::Equal {
                return Ok(o);
            }
        }
        Ok(x.len().cmp(&y.len()))
    }

    pub fn len(&mut self, value: &Value) -> Result<usize, RuntimeError> {
        Ok(match value {
            Value::Str(s) => s.chars().count(),
            Value::List(l) => l.borrow().len(),
            Value::Tuple(t) => t.len(),
            Value::Dict(d) => d.borrow().len(),
            Value::Set(s) => s.borrow().len(),
            Value::Range(r) => r.len(),
            Value::Instance(_) => {
                let Some(hook) = self.special_method(value, "__len__") else {
                    return Err(self.error(DiagnosticKind::NoLength(value.type_name())));
                };
                match self.call_special(&hook, value, &[])? {
                    Value::Int(n) if n >= 0 => n as usize,
                    other => {
                        return Err(self.error(DiagnosticKind::TypeMismatch {
                            expected: "non-negative int from __len__".into(),
                            actual: other.type_name(),
                        }));
                    }
                }
            }
            _ => return Err(self.error(DiagnosticKind::NoLength(value.type_name()))),
        })
    }

    pub fn get_item(&mut self, target: &Value, key: &Value) -> Result<Value, RuntimeError> {
        match target {
            Value::List(l) => {
                let i = self.index_arg(key)?;
                let l = l.borrow();
                normalize_index(i, l.len())
                    .map(|i| l[i].clone())
                    .ok_or_else(|| self.error(DiagnosticKind::IndexOutOfRange))
            }
            Value::Tuple(t) => {
                let i = self.index_arg(key)?;
                normalize_index(i, t.len())
                    .map(|i| t[i].clone())
                    .ok_or_else(|| self.error(DiagnosticKind::IndexOutOfRange))
            }
            Value::Str(s) => {
                let i = self.index_arg(key)?;
                let len = s.chars().count();
                normalize_index(i, len)
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::str(c.encode_utf8(&mut [0; 4])))
                    .ok_or_else(|| self.error(DiagnosticKind::IndexOutOfRange))
            }
            Value::Range(r) => {
                let i = self.index_arg(key)?;
                r.get(i)
                    .map(Value::Int)
                    .ok_or_else(|| self.error(DiagnosticKind::IndexOutOfRange))
            }
            Value::Dict(d) => {
                let k = self.hash_key(key)?;
                let found = d.borrow().get(&k).cloned();
                match found {
                    Some(v) => Ok(v),
                    None => {
                        let shown = self.repr(key)?;
                        Err(self.error(DiagnosticKind::KeyNotFound(shown)))
                    }
                }
            }
            Value::NativeType(ty) => {
                let args: Vec<Value> = match key {
                    Value::Tuple(items) => items.to_vec(),
                    other => vec![other.clone()],
                };
                self.instantiate_generic(ty, &args)
            }
            Value::Instance(_) => match self.special_method(target, "__getitem__") {
                Some(hook) => self.call_special(&hook, target, std::slice::from_ref(key)),
                None => Err(self.error(DiagnosticKind::NotSubscriptable(target.type_name()))),
            },
            _ => Err(self.error(DiagnosticKind::NotSubscriptable(target.type_name()))),
        }
    }

    pub fn set_item(&mut self, target: &Value, key: &Value, value: Value) -> Result<(), RuntimeError> {
        match target {
            Value::List(l) => {
                let i = self.index_arg(key)?;
                let mut l = l.borrow_mut();
                let Some(i) = normalize_index(i, l.len()) else {
                    return Err(self.error(DiagnosticKind::IndexOutOfRange));
                };
                l[i] = value;
                Ok(())
            }
            Value::Dict(d) => {
                let k = self.hash_key(key)?;
                d.borrow_mut().insert(k, value);
                Ok(())
            }
            Value::Instance(_) => match self.special_method(target, "__setitem__") {
                Some(hook) => {
                    self.call_special(&hook, target, &[key.clone(), value])?;
                    Ok(())
                }
                None => Err(self.error(DiagnosticKind::NotSubscriptable(target.type_name()))),
            },
            _ => Err(self.error(DiagnosticKind::NotSubscriptable(target.type_name()))),
        }
    }

    pub fn del_item(&mut self, target: &Value, key: &Value) -> Result<(), RuntimeError> {
        match target {
            Value::List(l) => {
                let i = self.index_arg(key)?;
                let mut l = l.borrow_mut();
                let Some(i) = normalize_index(i, l.len()) else {
                    return Err(self.error(DiagnosticKind::IndexOutOfRange));
                };
                l.remove(i);
                Ok(())
            }
            Value::Dict(d) => {
                let k = self.hash_key(key)?;
                let removed = d.borrow_mut().shift_remove(&k);
                if removed.is_none() {
                    let shown = self.repr(key)?;
                    return Err(self.error(DiagnosticKind::KeyNotFound(shown)));
                }
                Ok(())
            }
            Value::Instance(_) => match self.special_method(target, "__delitem__") {
                Some(hook) => {
                    self.call_special(&hook, target, std::slice::from_ref(key))?;
                    Ok(())
                }
                None => Err(self.error(DiagnosticKind::NotSubscriptable(target.type_name()))),
            },
            _ => Err(self.error(DiagnosticKind::NotSubscriptable(target.type_name()))),
        }
    }

    fn index_arg(&self, key: &Value) -> Result<i64, RuntimeError> {
        key.as_int().ok_or_else(|| {
            self.error(DiagnosticKind::TypeMismatch {
                expected: "int index".into(),
                actual: key.type_name(),
            })
        })
    }

    /// `item in container`.
    pub fn contains(&mut self, container: &Value, item: &Value) -> Result<bool, RuntimeError> {
        match container {
            Value::Str(s) => match item {
                Value::Str(sub) => Ok(s.contains(&**sub)),
                other => Err(self.error(DiagnosticKind::TypeMismatch {
                    expected: "str".into(),
                    actual: other.type_name(),
                })),
            },
            Value::List(l) => {
                let items = l.borrow().clone();
                self.any_equal(&items, item)
            }
            Value::Tuple(t) => {
                let items = t.clone();
                self.any_equal(&items, item)
            }
            Value::Dict(d) => Ok(match DictKey::from_value(item) {
                Some(k) => d.borrow().contains_key(&k),
                None => false,
            }),
            Value::Set(s) => Ok(match DictKey::from_value(item) {
                Some(k) => s.borrow().contains(&k),
                None => false,
            }),
            Value::Range(r) => Ok(item.as_int().is_some_and(|n| r.contains(n))),
            Value::Instance(_) => {
                if let Some(hook) = self.special_method(container, "__contains__") {
                    let r = self.call_special(&hook, container, std::slice::from_ref(item))?;
                    return self.truthy(&r);
                }
                let items = self.collect(container)?;
                self.any_equal(&items, item)
            }
            _ => Err(self.error(DiagnosticKind::NotIterable(container.type_name()))),
        }
    }

    fn any_equal(&mut self, items: &[Value], item: &Value) -> Result<bool, RuntimeError> {
        for v in items {
            if self.values_equal(v, item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn iter(&mut self, value: &Value) -> Result<Value, RuntimeError> {
        let state = match value {
            Value::List(l) => IterState::Seq {
                items: l.borrow().clone(),
                pos: 0,
            },
            Value::Tuple(t) => IterState::Seq {
                items: t.to_vec(),
                pos: 0,
            },
            Value::Str(s) => IterState::Seq {
                items: s
                    .chars()
                    .map(|c| Value::str(c.encode_utf8(&mut [0; 4])))
                    .collect(),
                pos: 0,
            },
            Value::Dict(d) => IterState::Seq {
                items: d.borrow().keys().map(DictKey::to_value).collect(),
                pos: 0,
            },
            Value::Set(s) => IterState::Seq {
                items: s.borrow().iter().map(DictKey::to_value).collect(),
                pos: 0,
            },
            Value::Range(r) => IterState::Range {
                next: Some(r.start),
                end: r.end,
                step: r.step,
            },
            Value::Iterator(_) => return Ok(value.clone()),
            Value::Instance(_) => {
                let Some(hook) = self.special_method(value, "__iter__") else {
                    return Err(self.error(DiagnosticKind::NotIterable(value.type_name())));
                };
                let it = self.call_special(&hook, value, &[])?;
                return match it {
                    Value::Instance(_) => Ok(Value::Iterator(Rc::new(RefCell::new(
                        IterState::Protocol(it),
                    )))),
                    other => self.iter(&other),
                };
            }
            _ => return Err(self.error(DiagnosticKind::NotIterable(value.type_name()))),
        };
        Ok(Value::Iterator(Rc::new(RefCell::new(state))))
    }

    /// Advances an iterator; `None` once it is exhausted.
    pub fn next(&mut self, iterator: &Value) -> Result<Option<Value>, RuntimeError> {
        let Value::Iterator(state) = iterator else {
            return Err(self.error(DiagnosticKind::TypeMismatch {
                expected: "iterator".into(),
                actual: iterator.type_name(),
            }));
        };
        let protocol = {
            let mut st = state.borrow_mut();
            match &mut *st {
                IterState::Seq { items, pos } => {
                    let v = items.get(*pos).cloned();
                    if v.is_some() {
                        *pos += 1;
                    }
                    return Ok(v);
                }
                IterState::Range { next, end, step } => {
                    let Some(v) = *next else {
                        return Ok(None);
                    };
                    let done = if *step > 0 { v >= *end } else { v <= *end };
                    if done {
                        *next = None;
                        return Ok(None);
                    }
                    *next = v.checked_add(*step);
                    return Ok(Some(Value::Int(v)));
                }
                IterState::Protocol(obj) => obj.clone(),
            }
        };
        let Some(hook) = self.special_method(&protocol, "__next__") else {
            return Err(self.error(DiagnosticKind::NotIterable(protocol.type_name())));
        };
        match self.call_special(&hook, &protocol, &[]) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_a(ExceptionClass::StopIteration) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Drains the iteration of `value` into a vector.
    pub fn collect(&mut self, value: &Value) -> Result<Vec<Value>, RuntimeError> {
        match value {
            Value::List(l) => return Ok(l.borrow().clone()),
            Value::Tuple(t) => return Ok(t.to_vec()),
            _ => {}
        }
        let it = self.iter(value)?;
        let mut out = Vec::new();
        while let Some(v) = self.next(&it)? {
            out.push(v);
        }
        Ok(out)
    }

    /// Subclass-aware for language types, exact for host types.
    pub fn is_instance(&mut self, value: &Value, class: &Value) -> Result<bool, RuntimeError> {
        match class {
            Value::Type(cls) => Ok(self.is_instance_of_type(value, cls)),
            Value::NativeType(cls) => Ok(match self.native_type_of(value) {
                Some(t) => t.id == cls.id,
                None => false,
            }),
            Value::Tuple(classes) => {
                for c in classes.iter() {
                    if self.is_instance(value, c)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            other => Err(self.error(DiagnosticKind::TypeMismatch {
                expected: "type or tuple of types".into(),
                actual: other.type_name(),
            })),
        }
    }

    fn is_instance_of_type(&self, value: &Value, cls: &Rc<TypeDescriptor>) -> bool {
        if Rc::ptr_eq(cls, &self.types.object) {
            return true;
        }
        match value {
            Value::Instance(inst) => inst.ty().is_subclass_of(cls),
            Value::Type(_) | Value::NativeType(_) => Rc::ptr_eq(cls, &self.types.type_),
            Value::Function(_) | Value::BoundMethod(_) => Rc::ptr_eq(cls, &self.types.function),
            Value::Namespace(_) => Rc::ptr_eq(cls, &self.types.namespace),
            _ => false,
        }
    }

    pub fn is_subclass(&self, class: &Value, base: &Value) -> Result<bool, RuntimeError> {
        match (class, base) {
            (Value::Type(c), Value::Type(b)) => Ok(c.is_subclass_of(b)),
            (Value::NativeType(c), Value::NativeType(b)) => Ok(c.id == b.id),
            (Value::NativeType(_), Value::Type(b)) => Ok(Rc::ptr_eq(b, &self.types.object)),
            (Value::Type(_) | Value::NativeType(_), other) | (other, _) => {
                Err(self.error(DiagnosticKind::TypeMismatch {
                    expected: "type".into(),
                    actual: other.type_name(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_indices_count_from_the_end() {
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-4, 3), None);
        assert_eq!(normalize_index(3, 3), None);
    }

    #[test]
    fn range_membership_respects_step() {
        let mut rt = Runtime::new();
        let r = Value::Range(Rc::new(crate::core::RangeValue {
            start: 10,
            end: 0,
            step: -3,
        }));
        assert!(rt.contains(&r, &Value::Int(4)).unwrap());
        assert!(!rt.contains(&r, &Value::Int(5)).unwrap());
        assert!(!rt.contains(&r, &Value::Int(0)).unwrap());
    }

    #[test]
    fn range_iteration_stops_at_i64_bounds() {
        let mut rt = Runtime::new();
        let up = Value::Range(Rc::new(crate::core::RangeValue {
            start: i64::MAX - 1,
            end: i64::MAX,
            step: 5,
        }));
        let it = rt.iter(&up).unwrap();
        assert_eq!(rt.next(&it).unwrap(), Some(Value::Int(i64::MAX - 1)));
        assert_eq!(rt.next(&it).unwrap(), None);
        assert_eq!(rt.next(&it).unwrap(), None);

        let down = Value::Range(Rc::new(crate::core::RangeValue {
            start: i64::MIN + 1,
            end: i64::MIN,
            step: -3,
        }));
        let it = rt.iter(&down).unwrap();
        assert_eq!(rt.next(&it).unwrap(), Some(Value::Int(i64::MIN + 1)));
        assert_eq!(rt.next(&it).unwrap(), None);
        assert!(rt.contains(&down, &Value::Int(i64::MIN + 1)).unwrap());
    }

    #[test]
    fn list_iteration_snapshots_items() {
        let mut rt = Runtime::new();
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let it = rt.iter(&list).unwrap();
        if let Value::List(l) = &list {
            l.borrow_mut().push(Value::Int(3));
        }
        assert_eq!(rt.next(&it).unwrap(), Some(Value::Int(1)));
        assert_eq!(rt.next(&it).unwrap(), Some(Value::Int(2)));
        assert_eq!(rt.next(&it).unwrap(), None);
    }
}
