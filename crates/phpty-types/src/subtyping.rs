//! Subtyping rules for declared types
//!
//! Implements the subtyping relation T <: U (T is a subtype of U).
//!
//! Both sides are flattened into atoms first: `?T` becomes `T` and `null`,
//! and `iterable` becomes `array` and `Traversable`. A type is then a
//! subtype of another iff every atom on the left is a subtype of some atom
//! on the right.

use crate::hierarchy::{ClassHierarchy, ClassScope};
use crate::ty::{ClassName, PseudoType, SimpleType, Type};
use tracing::trace;

/// Context for checking subtyping relationships
///
/// Holds the class hierarchy oracle and, optionally, the class scope used
/// to resolve `self` and `parent`.
#[derive(Clone, Copy)]
pub struct SubtypingContext<'a> {
    /// Oracle for named-class relations
    hierarchy: &'a dyn ClassHierarchy,

    /// Class scope for `self` / `parent`
    scope: Option<&'a ClassScope>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    Simple(SimpleType),
    False,
    Null,
}

impl<'a> SubtypingContext<'a> {
    /// Create a new subtyping context
    pub fn new(hierarchy: &'a dyn ClassHierarchy) -> Self {
        SubtypingContext {
            hierarchy,
            scope: None,
        }
    }

    /// Resolve `self` and `parent` against the given class scope
    pub fn with_scope(mut self, scope: &'a ClassScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Check if `sub` is a subtype of `sup` (sub <: sup)
    ///
    /// Returns true if every value of type `sub` is also a value of `sup`.
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        // Reflexivity: T <: T
        if sub == sup {
            return true;
        }

        let sup_atoms = self.atoms(sup);
        let result = self
            .atoms(sub)
            .iter()
            .all(|s| sup_atoms.iter().any(|t| self.is_atom_subtype(s, t)));

        trace!(%sub, %sup, result, "subtype check");
        result
    }

    /// Check if two types are equivalent (mutually subtypes)
    pub fn is_equivalent(&self, left: &Type, right: &Type) -> bool {
        self.is_subtype(left, right) && self.is_subtype(right, left)
    }

    /// Constituents of `sub` that are not subtypes of `sup`
    ///
    /// Empty exactly when `sub <: sup`.
    pub fn uncovered_members(&self, sub: &Type, sup: &Type) -> Vec<Type> {
        sub.constituents()
            .into_iter()
            .filter(|member| !self.is_subtype(member, sup))
            .collect()
    }

    fn atoms(&self, ty: &Type) -> Vec<Atom> {
        let mut atoms = Vec::new();
        for member in ty.constituents() {
            match member {
                Type::Simple(simple) => self.push_simple(&mut atoms, simple),
                Type::Pseudo(PseudoType::False) => atoms.push(Atom::False),
                Type::NullLiteral => atoms.push(Atom::Null),
                // constituents() never yields composite types
                Type::Nullable(_) | Type::Union(_) => {}
            }
        }
        atoms
    }

    fn push_simple(&self, atoms: &mut Vec<Atom>, simple: SimpleType) {
        match simple {
            // iterable ≡ array|Traversable
            SimpleType::Iterable => {
                atoms.push(Atom::Simple(SimpleType::Array));
                atoms.push(Atom::Simple(SimpleType::class("Traversable")));
            }
            SimpleType::SelfType => match self.scope {
                Some(scope) => atoms.push(Atom::Simple(SimpleType::Class(scope.self_class.clone()))),
                None => atoms.push(Atom::Simple(SimpleType::SelfType)),
            },
            SimpleType::Parent => match self.scope.and_then(|s| s.parent_class.as_ref()) {
                Some(parent) => atoms.push(Atom::Simple(SimpleType::Class(parent.clone()))),
                None => atoms.push(Atom::Simple(SimpleType::Parent)),
            },
            other => atoms.push(Atom::Simple(other)),
        }
    }

    fn is_atom_subtype(&self, sub: &Atom, sup: &Atom) -> bool {
        match (sub, sup) {
            (a, b) if a == b => true,

            // false <: bool, never the reverse
            (Atom::False, Atom::Simple(SimpleType::Bool)) => true,

            (Atom::Simple(SimpleType::Class(a)), Atom::Simple(SimpleType::Class(b))) => {
                self.is_class_subtype(a, b)
            }

            // Every class type is an object
            (Atom::Simple(SimpleType::Class(_)), Atom::Simple(SimpleType::Object)) => true,

            // Closures are callable
            (Atom::Simple(SimpleType::Class(a)), Atom::Simple(SimpleType::Callable)) => {
                self.is_class_subtype(a, &ClassName::new("Closure"))
            }

            _ => false,
        }
    }

    fn is_class_subtype(&self, sub: &ClassName, sup: &ClassName) -> bool {
        if sub == sup {
            return true;
        }
        let result = self.hierarchy.is_class_subtype(sub, sup);
        trace!(%sub, %sup, result, "class relation from hierarchy");
        result
    }
}

impl std::fmt::Debug for SubtypingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtypingContext")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::ClassTable;

    fn union(members: Vec<Type>) -> Type {
        Type::union(members).unwrap()
    }

    fn table() -> ClassTable {
        let mut table = ClassTable::new();
        table
            .add_class("A", None, &[])
            .add_class("B", Some("A"), &[])
            .add_class("Coll", None, &["IteratorAggregate"])
            .add_class("Handler", Some("Closure"), &[]);
        table
    }

    #[test]
    fn test_reflexivity() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        for ty in [
            Type::int(),
            Type::Nullable(SimpleType::String),
            union(vec![Type::int(), Type::false_type(), Type::NullLiteral]),
            Type::Simple(SimpleType::Iterable),
            Type::class("Unknown"),
        ] {
            assert!(ctx.is_subtype(&ty, &ty), "{} should be a subtype of itself", ty);
        }
    }

    #[test]
    fn test_false_is_subtype_of_bool() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        assert!(ctx.is_subtype(&Type::false_type(), &Type::bool()));
        assert!(!ctx.is_subtype(&Type::bool(), &Type::false_type()));
    }

    #[test]
    fn test_member_is_subtype_of_union() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        let int_string = union(vec![Type::int(), Type::string()]);

        assert!(ctx.is_subtype(&Type::int(), &int_string));
        assert!(ctx.is_subtype(&Type::string(), &int_string));
        assert!(!ctx.is_subtype(&int_string, &Type::int()));
        assert!(!ctx.is_subtype(&Type::float(), &int_string));
    }

    #[test]
    fn test_union_is_subtype_when_every_member_is_covered() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        let narrow = union(vec![Type::class("B"), Type::false_type()]);
        let wide = union(vec![Type::class("A"), Type::bool(), Type::NullLiteral]);

        assert!(ctx.is_subtype(&narrow, &wide));
        assert!(!ctx.is_subtype(&wide, &narrow));
    }

    #[test]
    fn test_union_collapses_when_member_is_redundant() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        let a_or_b = union(vec![Type::class("A"), Type::class("B")]);

        // B <: A, so A|B <: A
        assert!(ctx.is_subtype(&a_or_b, &Type::class("A")));
        assert!(ctx.is_equivalent(&a_or_b, &Type::class("A")));
    }

    #[test]
    fn test_iterable_is_array_or_traversable() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        let iterable = Type::Simple(SimpleType::Iterable);
        let expanded = union(vec![Type::Simple(SimpleType::Array), Type::class("Traversable")]);

        assert!(ctx.is_subtype(&iterable, &expanded));
        assert!(ctx.is_subtype(&expanded, &iterable));
        assert!(ctx.is_subtype(&Type::class("Coll"), &iterable));
        assert!(!ctx.is_subtype(&iterable, &Type::Simple(SimpleType::Array)));
    }

    #[test]
    fn test_nullable_equals_union_with_null() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        let nullable = Type::Nullable(SimpleType::Int);
        let explicit = union(vec![Type::int(), Type::NullLiteral]);

        assert!(ctx.is_equivalent(&nullable, &explicit));
        assert!(ctx.is_subtype(&Type::NullLiteral, &nullable));
    }

    #[test]
    fn test_class_is_object_and_closure_is_callable() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        let object = Type::Simple(SimpleType::Object);
        let callable = Type::Simple(SimpleType::Callable);

        assert!(ctx.is_subtype(&Type::class("A"), &object));
        assert!(!ctx.is_subtype(&object, &Type::class("A")));
        assert!(ctx.is_subtype(&Type::class("Handler"), &callable));
        assert!(!ctx.is_subtype(&Type::class("A"), &callable));
    }

    #[test]
    fn test_unknown_classes_relate_only_to_themselves() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        assert!(ctx.is_subtype(&Type::class("Ghost"), &Type::class("ghost")));
        assert!(!ctx.is_subtype(&Type::class("Ghost"), &Type::class("A")));
    }

    /// Answers from rules alone, without ever declaring a class
    struct LazyHierarchy;

    impl ClassHierarchy for LazyHierarchy {
        fn is_class_subtype(&self, sub: &ClassName, sup: &ClassName) -> bool {
            sub.is("Dog") && sup.is("Animal")
        }

        fn class_exists(&self, _name: &ClassName) -> bool {
            false
        }
    }

    #[test]
    fn test_class_relation_is_delegated_to_hierarchy() {
        let ctx = SubtypingContext::new(&LazyHierarchy);
        assert!(ctx.is_subtype(&Type::class("Dog"), &Type::class("Animal")));
        assert!(ctx.is_subtype(
            &Type::Nullable(SimpleType::class("Dog")),
            &union(vec![Type::class("Animal"), Type::NullLiteral])
        ));
        assert!(!ctx.is_subtype(&Type::class("Animal"), &Type::class("Dog")));
    }

    #[test]
    fn test_self_and_parent_resolve_through_scope() {
        let table = table();
        let scope = ClassScope::new("B", Some("A"));
        let scoped = SubtypingContext::new(&table).with_scope(&scope);
        let unscoped = SubtypingContext::new(&table);
        let self_ty = Type::Simple(SimpleType::SelfType);
        let parent_ty = Type::Simple(SimpleType::Parent);

        assert!(scoped.is_subtype(&self_ty, &Type::class("A")));
        assert!(scoped.is_subtype(&self_ty, &parent_ty));
        assert!(!unscoped.is_subtype(&self_ty, &Type::class("A")));
    }

    #[test]
    fn test_uncovered_members() {
        let table = table();
        let ctx = SubtypingContext::new(&table);
        let sub = union(vec![Type::int(), Type::float(), Type::NullLiteral]);
        let sup = Type::Nullable(SimpleType::Int);

        assert_eq!(ctx.uncovered_members(&sub, &sup), vec![Type::float()]);
        assert!(ctx.uncovered_members(&sup, &sub).is_empty());
    }
}
