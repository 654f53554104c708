//! Read-only reflection view of declared types

use crate::ty::{SimpleType, Type};
use serde::Serialize;
use std::fmt;

/// A single named type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflectionNamedType {
    name: String,
    builtin: bool,
    allows_null: bool,
    /// The `null` type itself, as opposed to a nullable type
    #[serde(skip)]
    null: bool,
}

impl ReflectionNamedType {
    fn simple(simple: &SimpleType, allows_null: bool) -> Self {
        ReflectionNamedType {
            name: simple.name().to_string(),
            builtin: simple.is_builtin(),
            allows_null,
            null: false,
        }
    }

    fn keyword(name: &str, allows_null: bool) -> Self {
        ReflectionNamedType {
            name: name.to_string(),
            builtin: true,
            allows_null,
            null: false,
        }
    }

    fn null() -> Self {
        ReflectionNamedType {
            name: "null".to_string(),
            builtin: true,
            allows_null: true,
            null: true,
        }
    }

    /// Type name without the nullable marker
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is a builtin type rather than a class
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Whether `null` is accepted
    pub fn allows_null(&self) -> bool {
        self.allows_null
    }
}

impl fmt::Display for ReflectionNamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.allows_null && !self.null {
            write!(f, "?{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A union of two or more named types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflectionUnionType {
    types: Vec<ReflectionNamedType>,
    allows_null: bool,
}

impl ReflectionUnionType {
    /// Member types, in declaration order
    pub fn types(&self) -> &[ReflectionNamedType] {
        &self.types
    }

    /// Whether `null` is one of the members
    pub fn allows_null(&self) -> bool {
        self.allows_null
    }
}

impl fmt::Display for ReflectionUnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", ty)?;
        }
        Ok(())
    }
}

/// Reflection descriptor for a declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReflectionType {
    /// A single (possibly nullable) type
    Named(ReflectionNamedType),
    /// A union that is not just `T|null`
    Union(ReflectionUnionType),
}

impl ReflectionType {
    /// Whether `null` is accepted
    pub fn allows_null(&self) -> bool {
        match self {
            ReflectionType::Named(named) => named.allows_null(),
            ReflectionType::Union(union) => union.allows_null(),
        }
    }

    /// The named descriptor, if this is not a union
    pub fn as_named(&self) -> Option<&ReflectionNamedType> {
        match self {
            ReflectionType::Named(named) => Some(named),
            ReflectionType::Union(_) => None,
        }
    }

    /// The union descriptor, if this is a union
    pub fn as_union(&self) -> Option<&ReflectionUnionType> {
        match self {
            ReflectionType::Named(_) => None,
            ReflectionType::Union(union) => Some(union),
        }
    }
}

impl fmt::Display for ReflectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectionType::Named(named) => write!(f, "{}", named),
            ReflectionType::Union(union) => write!(f, "{}", union),
        }
    }
}

/// Project a declared type into its reflection descriptor
///
/// `T|null` and `null|T` for a single simple `T` project as the named type
/// `?T`, the same as `?T` itself.
pub fn reflect(ty: &Type) -> ReflectionType {
    match ty {
        Type::Union(union) => {
            if let [a, b] = union.members() {
                match (a, b) {
                    (Type::Simple(simple), Type::NullLiteral)
                    | (Type::NullLiteral, Type::Simple(simple)) => {
                        return ReflectionType::Named(ReflectionNamedType::simple(simple, true));
                    }
                    _ => {}
                }
            }
            ReflectionType::Union(ReflectionUnionType {
                types: union.members().iter().map(member).collect(),
                allows_null: union.contains_null(),
            })
        }
        other => ReflectionType::Named(member(other)),
    }
}

fn member(ty: &Type) -> ReflectionNamedType {
    match ty {
        Type::Simple(simple) => ReflectionNamedType::simple(simple, false),
        Type::Nullable(simple) => ReflectionNamedType::simple(simple, true),
        Type::Pseudo(pseudo) => ReflectionNamedType::keyword(&pseudo.to_string(), false),
        Type::NullLiteral => ReflectionNamedType::null(),
        // Unions never nest
        Type::Union(_) => ReflectionNamedType::keyword(&ty.to_string(), ty.allows_null()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn union(members: Vec<Type>) -> Type {
        Type::union(members).unwrap()
    }

    #[test]
    fn test_int_or_null_is_named() {
        let reflected = reflect(&union(vec![Type::int(), Type::NullLiteral]));
        let named = reflected.as_named().unwrap();
        assert_eq!(named.name(), "int");
        assert!(named.is_builtin());
        assert!(reflected.allows_null());
        assert_eq!(reflected.to_string(), "?int");
    }

    #[test]
    fn test_nullable_matches_explicit_union() {
        let explicit = reflect(&union(vec![Type::NullLiteral, Type::class("Foo")]));
        let nullable = reflect(&Type::Nullable(SimpleType::class("Foo")));
        assert_eq!(explicit, nullable);
        assert!(!explicit.as_named().unwrap().is_builtin());
    }

    #[test]
    fn test_multi_member_union() {
        let reflected = reflect(&union(vec![Type::int(), Type::float(), Type::NullLiteral]));
        let union = reflected.as_union().unwrap();
        let names: Vec<&str> = union.types().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["int", "float", "null"]);
        assert!(reflected.allows_null());
        assert_eq!(reflected.to_string(), "int|float|null");
    }

    #[test]
    fn test_false_member() {
        let reflected = reflect(&union(vec![Type::string(), Type::false_type()]));
        assert!(!reflected.allows_null());
        assert_eq!(reflected.to_string(), "string|false");
        assert!(reflected.as_union().unwrap().types()[1].is_builtin());
    }

    #[test]
    fn test_union_nullability_comes_from_null_member() {
        let reflected = reflect(&union(vec![Type::string(), Type::class("Nullable")]));
        assert!(!reflected.allows_null());

        let reflected = reflect(&union(vec![Type::string(), Type::int(), Type::NullLiteral]));
        let null = &reflected.as_union().unwrap().types()[2];
        assert!(null.allows_null());
        assert_eq!(null.to_string(), "null");
    }

    #[test]
    fn test_simple_type() {
        let reflected = reflect(&Type::Simple(SimpleType::SelfType));
        assert_eq!(reflected.to_string(), "self");
        assert!(!reflected.as_named().unwrap().is_builtin());
        assert!(!reflected.allows_null());
    }
}
