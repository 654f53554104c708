//! Class hierarchy oracle
//!
//! The subtyping engine never loads classes itself. Named-class relations
//! are answered by a [`ClassHierarchy`] supplied by the surrounding symbol
//! table; [`ClassTable`] is a self-contained implementation.

use crate::ty::ClassName;
use rustc_hash::{FxHashMap, FxHashSet};

/// Answers questions about declared classes and interfaces
pub trait ClassHierarchy {
    /// Whether `sub` extends or implements `sup` (directly or transitively)
    fn is_class_subtype(&self, sub: &ClassName, sup: &ClassName) -> bool;

    /// Whether the class or interface is known
    fn class_exists(&self, name: &ClassName) -> bool;
}

/// Class context used to resolve `self` and `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassScope {
    /// Class that `self` refers to
    pub self_class: ClassName,
    /// Class that `parent` refers to, if any
    pub parent_class: Option<ClassName>,
}

impl ClassScope {
    /// Create a scope for `self_class` with an optional parent
    pub fn new(self_class: impl AsRef<str>, parent_class: Option<&str>) -> Self {
        ClassScope {
            self_class: ClassName::new(self_class),
            parent_class: parent_class.map(ClassName::new),
        }
    }
}

#[derive(Debug, Clone)]
struct ClassEntry {
    parent: Option<ClassName>,
    interfaces: Vec<ClassName>,
}

/// In-memory class hierarchy
#[derive(Debug, Clone)]
pub struct ClassTable {
    classes: FxHashMap<ClassName, ClassEntry>,
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassTable {
    /// Create a table preloaded with the builtin interfaces and classes
    pub fn new() -> Self {
        let mut table = Self::empty();
        table
            .add_interface("Traversable", &[])
            .add_interface("Iterator", &["Traversable"])
            .add_interface("IteratorAggregate", &["Traversable"])
            .add_interface("ArrayAccess", &[])
            .add_interface("Countable", &[])
            .add_interface("Stringable", &[])
            .add_class("Closure", None, &[]);
        table
    }

    /// Create a table without any builtins
    pub fn empty() -> Self {
        ClassTable {
            classes: FxHashMap::default(),
        }
    }

    /// Declare a class with an optional parent and implemented interfaces
    pub fn add_class(&mut self, name: &str, parent: Option<&str>, interfaces: &[&str]) -> &mut Self {
        self.classes.insert(
            ClassName::new(name),
            ClassEntry {
                parent: parent.map(ClassName::new),
                interfaces: interfaces.iter().map(ClassName::new).collect(),
            },
        );
        self
    }

    /// Declare an interface extending other interfaces
    pub fn add_interface(&mut self, name: &str, extends: &[&str]) -> &mut Self {
        self.add_class(name, None, extends)
    }

    /// Number of declared classes and interfaces
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn supertypes<'a>(&'a self, name: &ClassName) -> impl Iterator<Item = &'a ClassName> {
        self.classes
            .get(name)
            .into_iter()
            .flat_map(|entry| entry.parent.iter().chain(entry.interfaces.iter()))
    }
}

impl ClassHierarchy for ClassTable {
    fn is_class_subtype(&self, sub: &ClassName, sup: &ClassName) -> bool {
        if sub == sup {
            return true;
        }

        // Walk the graph; malformed (cyclic) input must still terminate.
        let mut visited: FxHashSet<&ClassName> = FxHashSet::default();
        let mut pending: Vec<&ClassName> = vec![sub];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            for next in self.supertypes(current) {
                if next == sup {
                    return true;
                }
                pending.push(next);
            }
        }
        false
    }

    fn class_exists(&self, name: &ClassName) -> bool {
        self.classes.contains_key(name)
    }
}
