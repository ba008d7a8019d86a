//! Namespace trees built from native type metadata.
//!
//! Every dotted namespace path maps to one [`Namespace`] container, memoised
//! by its normalised path, and every demangled type path maps to one
//! placeholder [`NativeType`]. Generic entries (``Name`N``) register their
//! arity on the placeholder. Inserting the same metadata again, in any
//! order, changes nothing.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::Rc;

use pyhost_core::{FastHashMap, HostTypeId, Mangled, NativeTypeInfo, fast_map_new};

use crate::core::{Namespace, NativeType, NativeTypeKind, Value};

pub struct NamespaceTree {
    root: Rc<Namespace>,
    containers: FastHashMap<String, Rc<Namespace>>,
    placeholders: FastHashMap<String, Rc<NativeType>>,
}

/// Order-independent view of a tree, for comparing two builds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceSnapshot {
    /// Container path to its sorted member names; namespaces carry a
    /// trailing `.`.
    pub containers: BTreeMap<String, Vec<String>>,
    /// Placeholder path to `(arity, mangled full name)` registrations.
    pub arities: BTreeMap<String, Vec<(usize, String)>>,
}

fn segments(namespace: &str) -> impl Iterator<Item = &str> {
    namespace.split('.').filter(|s| !s.is_empty())
}

pub fn normalize_path(namespace: &str) -> String {
    segments(namespace).collect::<Vec<_>>().join(".")
}

impl NamespaceTree {
    pub fn new() -> Self {
        Self {
            root: Rc::new(Namespace::new("")),
            containers: fast_map_new(),
            placeholders: fast_map_new(),
        }
    }

    /// Container for `namespace`, created along with its parents if needed.
    pub fn container_for(&mut self, namespace: &str) -> Rc<Namespace> {
        let mut parent = self.root.clone();
        let mut path = String::new();
        for seg in segments(namespace) {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(seg);
            let child = match self.containers.get(&path) {
                Some(c) => c.clone(),
                None => {
                    let c = Rc::new(Namespace::new(&path));
                    self.containers.insert(path.clone(), c.clone());
                    c
                }
            };
            // A namespace segment takes the name over from a same-named type.
            parent
                .members
                .borrow_mut()
                .insert(seg, Value::Namespace(child.clone()));
            parent = child;
        }
        parent
    }

    pub fn insert(&mut self, info: &Rc<NativeTypeInfo>) -> Rc<NativeType> {
        let container = self.container_for(&info.namespace);
        let simple = info.simple_name();
        let path = if container.path.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{}", container.path, simple)
        };
        let placeholder = match self.placeholders.get(&path) {
            Some(p) => p.clone(),
            None => {
                let p = Rc::new(NativeType::new(
                    HostTypeId::new(&path),
                    simple,
                    &path,
                    NativeTypeKind::Declared,
                ));
                self.placeholders.insert(path.clone(), p.clone());
                p
            }
        };
        {
            let mut members = container.members.borrow_mut();
            let is_namespace = matches!(members.get(simple), Some(Value::Namespace(_)));
            if !is_namespace {
                members.insert(simple, Value::NativeType(placeholder.clone()));
            }
        }
        match info.mangled() {
            Mangled::Generic(_, arity) => placeholder.register_generic(arity, info),
            Mangled::Plain(_) | Mangled::Malformed(_) => placeholder.set_info_if_absent(info),
        }
        placeholder
    }

    pub fn insert_all<'a, I>(&mut self, infos: I)
    where
        I: IntoIterator<Item = &'a Rc<NativeTypeInfo>>,
    {
        for info in infos {
            self.insert(info);
        }
    }

    pub fn container(&self, namespace: &str) -> Option<Rc<Namespace>> {
        let path = normalize_path(namespace);
        if path.is_empty() {
            return Some(self.root.clone());
        }
        self.containers.get(&path).cloned()
    }

    pub fn placeholder(&self, path: &str) -> Option<Rc<NativeType>> {
        self.placeholders.get(path).cloned()
    }

    pub fn root(&self) -> Rc<Namespace> {
        self.root.clone()
    }

    pub fn snapshot(&self) -> NamespaceSnapshot {
        let mut containers = BTreeMap::new();
        let all = std::iter::once(&self.root).chain(self.containers.values());
        for ns in all {
            let mut names: Vec<String> = ns
                .members
                .borrow()
                .iter()
                .map(|(k, v)| match v {
                    Value::Namespace(_) => format!("{}.", k),
                    _ => k.to_string(),
                })
                .collect();
            names.sort();
            containers.insert(ns.path.clone(), names);
        }
        let mut arities = BTreeMap::new();
        for (path, p) in &self.placeholders {
            let regs: Vec<(usize, String)> = p
                .arities()
                .into_iter()
                .filter_map(|a| p.generic(a).map(|g| (a, g.full_name())))
                .collect();
            arities.insert(path.clone(), regs);
        }
        NamespaceSnapshot {
            containers,
            arities,
        }
    }

    /// Indented listing, children sorted by name.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_into(&mut out, &self.root, 0);
        out
    }
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

fn render_into(out: &mut String, ns: &Rc<Namespace>, depth: usize) {
    let mut entries = ns.members.borrow().entries();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in entries {
        let indent = "  ".repeat(depth);
        match value {
            Value::Namespace(child) => {
                let _ = writeln!(out, "{}{}/", indent, name);
                render_into(out, &child, depth + 1);
            }
            Value::NativeType(t) => {
                let arities = t.arities();
                if arities.is_empty() {
                    let _ = writeln!(out, "{}{}", indent, name);
                } else {
                    let list: Vec<String> = arities.iter().map(|a| a.to_string()).collect();
                    let _ = writeln!(out, "{}{} [{}]", indent, name, list.join(", "));
                }
            }
            _ => {
                let _ = writeln!(out, "{}{}", indent, name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(ns: &str, name: &str) -> Rc<NativeTypeInfo> {
        Rc::new(NativeTypeInfo::new(ns, name))
    }

    #[test]
    fn containers_are_memoised_by_path() {
        let mut tree = NamespaceTree::new();
        let a = tree.container_for("Geo.Shapes");
        let b = tree.container_for(".Geo..Shapes.");
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.path, "Geo.Shapes");
        assert!(matches!(tree.root().get("Geo"), Some(Value::Namespace(_))));
    }

    #[test]
    fn generic_entries_share_one_placeholder() {
        let mut tree = NamespaceTree::new();
        let plain = tree.insert(&info("Coll", "Bag"));
        let one = tree.insert(&info("Coll", "Bag`1"));
        let two = tree.insert(&info("Coll", "Bag`2"));
        assert!(Rc::ptr_eq(&plain, &one) && Rc::ptr_eq(&one, &two));
        assert_eq!(plain.arities(), vec![1, 2]);
        assert_eq!(plain.info().map(|i| i.name.clone()), Some("Bag".to_string()));
        assert_eq!(plain.id.as_str(), "Coll.Bag");
    }

    #[test]
    fn namespace_wins_over_same_named_type() {
        let mut first = NamespaceTree::new();
        first.insert(&info("", "Geo"));
        first.insert(&info("Geo", "Point"));
        let mut second = NamespaceTree::new();
        second.insert(&info("Geo", "Point"));
        second.insert(&info("", "Geo"));
        assert_eq!(first.snapshot(), second.snapshot());
        assert!(matches!(first.root().get("Geo"), Some(Value::Namespace(_))));
    }

    #[test]
    fn render_lists_arities() {
        let mut tree = NamespaceTree::new();
        tree.insert(&info("Coll", "Bag`1"));
        tree.insert(&info("Coll", "Stack"));
        assert_eq!(tree.render(), "Coll/\n  Bag [1]\n  Stack\n");
    }
}
