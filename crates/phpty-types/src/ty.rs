//! Core type definitions for declared parameter, return and property types

use crate::error::DeclarationError;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A class or interface name as written in a declaration.
///
/// Identity is case-insensitive and ignores a leading namespace separator,
/// so `Foo`, `foo` and `\Foo` name the same class. The spelling is kept
/// for display.
#[derive(Debug, Clone)]
pub struct ClassName {
    name: String,
    key: String,
    qualified: bool,
}

impl ClassName {
    /// Create a class name from its written form
    pub fn new(name: impl AsRef<str>) -> Self {
        let raw = name.as_ref();
        let (qualified, name) = match raw.strip_prefix('\\') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        ClassName {
            name: name.to_string(),
            key: name.to_ascii_lowercase(),
            qualified,
        }
    }

    /// Create a fully qualified class name (name resolution already applied)
    pub fn qualified(name: impl AsRef<str>) -> Self {
        let mut class = Self::new(name);
        class.qualified = true;
        class
    }

    /// The name as written, without a leading separator
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Lowercased identity used for comparisons
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the name was written (or resolved) fully qualified
    pub fn is_qualified(&self) -> bool {
        self.qualified
    }

    /// Whether this is an unqualified reserved type name (`int`, `null`, ...)
    ///
    /// Such a name never refers to a class.
    pub fn is_reserved(&self) -> bool {
        !self.qualified
            && !self.name.contains('\\')
            && (SimpleType::from_keyword(&self.name).is_some() || self.is("false") || self.is("null"))
    }

    /// Check whether this name identifies `other` (case-insensitive)
    pub fn is(&self, other: &str) -> bool {
        let other = other.strip_prefix('\\').unwrap_or(other);
        self.key.eq_ignore_ascii_case(other)
    }
}

impl PartialEq for ClassName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ClassName {}

impl Hash for ClassName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for ClassName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for ClassName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// Simple (non-composite) types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimpleType {
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `string`
    String,
    /// `array`
    Array,
    /// `object`
    Object,
    /// `iterable` (interchangeable with `array|Traversable` when relating types)
    Iterable,
    /// `callable`
    Callable,
    /// `self`
    SelfType,
    /// `parent`
    Parent,
    /// `void` (standalone return types only)
    Void,
    /// Reference to a class or interface
    Class(ClassName),
}

impl SimpleType {
    /// Look up a builtin type keyword (case-insensitive).
    ///
    /// Returns `None` for anything that should be treated as a class name,
    /// including the `false` and `null` pseudo-types.
    pub fn from_keyword(word: &str) -> Option<SimpleType> {
        let ty = match word.to_ascii_lowercase().as_str() {
            "bool" => SimpleType::Bool,
            "int" => SimpleType::Int,
            "float" => SimpleType::Float,
            "string" => SimpleType::String,
            "array" => SimpleType::Array,
            "object" => SimpleType::Object,
            "iterable" => SimpleType::Iterable,
            "callable" => SimpleType::Callable,
            "self" => SimpleType::SelfType,
            "parent" => SimpleType::Parent,
            "void" => SimpleType::Void,
            _ => return None,
        };
        Some(ty)
    }

    /// Create a class reference; unqualified builtin keywords yield the builtin
    pub fn class(name: impl AsRef<str>) -> SimpleType {
        let name = ClassName::new(name);
        if !name.is_qualified() && !name.as_str().contains('\\') {
            if let Some(builtin) = SimpleType::from_keyword(name.as_str()) {
                return builtin;
            }
        }
        SimpleType::Class(name)
    }

    /// Source-level name of this type
    pub fn name(&self) -> &str {
        match self {
            SimpleType::Bool => "bool",
            SimpleType::Int => "int",
            SimpleType::Float => "float",
            SimpleType::String => "string",
            SimpleType::Array => "array",
            SimpleType::Object => "object",
            SimpleType::Iterable => "iterable",
            SimpleType::Callable => "callable",
            SimpleType::SelfType => "self",
            SimpleType::Parent => "parent",
            SimpleType::Void => "void",
            SimpleType::Class(name) => name.as_str(),
        }
    }

    /// Whether this is a builtin type rather than a class-like name.
    ///
    /// `self` and `parent` refer to classes and are not builtin.
    pub fn is_builtin(&self) -> bool {
        !matches!(
            self,
            SimpleType::Class(_) | SimpleType::SelfType | SimpleType::Parent
        )
    }

    /// Get the class name if this is a class reference
    pub fn as_class(&self) -> Option<&ClassName> {
        match self {
            SimpleType::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Position in the canonical member order
    pub(crate) fn rank(&self) -> u8 {
        match self {
            SimpleType::Class(_) => 0,
            SimpleType::SelfType => 1,
            SimpleType::Parent => 2,
            SimpleType::Callable => 3,
            SimpleType::Iterable => 4,
            SimpleType::Object => 5,
            SimpleType::Array => 6,
            SimpleType::String => 7,
            SimpleType::Int => 8,
            SimpleType::Float => 9,
            SimpleType::Bool => 10,
            SimpleType::Void => 12,
        }
    }
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pseudo-types that are only legal as union members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoType {
    /// `false`
    False,
}

impl fmt::Display for PseudoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoType::False => write!(f, "false"),
        }
    }
}

/// Union type: T1|T2|...|Tn
///
/// Members are simple types, the `false` pseudo-type or `null`. A union
/// always has at least two members and never contains `void`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionType {
    members: Vec<Type>,
}

impl UnionType {
    /// Build a union, checking the structural invariants.
    ///
    /// Duplicate detection is left to the normalizer because it requires
    /// name resolution.
    pub fn new(members: Vec<Type>) -> Result<Self, DeclarationError> {
        if members.len() < 2 {
            return Err(DeclarationError::invalid(
                "a union type requires at least two member types",
            ));
        }

        for member in &members {
            match member {
                Type::Simple(SimpleType::Void) => {
                    return Err(DeclarationError::invalid(
                        "void can not be part of a union type",
                    ));
                }
                Type::Nullable(_) => {
                    return Err(DeclarationError::invalid(
                        "nullable types can not be union members, use T|null instead",
                    ));
                }
                Type::Union(_) => {
                    return Err(DeclarationError::invalid("union types can not be nested"));
                }
                Type::Simple(_) | Type::Pseudo(_) | Type::NullLiteral => {}
            }
        }

        if members
            .iter()
            .all(|m| matches!(m, Type::Pseudo(_) | Type::NullLiteral))
        {
            return Err(DeclarationError::invalid(
                "false and null can not form a union on their own",
            ));
        }

        Ok(UnionType { members })
    }

    /// Members in their stored order
    pub fn members(&self) -> &[Type] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a constructed union; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check whether the union contains `null`
    pub fn contains_null(&self) -> bool {
        self.members.iter().any(|m| matches!(m, Type::NullLiteral))
    }
}

/// A declared type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Builtin type or class reference
    Simple(SimpleType),

    /// The `false` pseudo-type (union member only)
    Pseudo(PseudoType),

    /// The `null` type (union member only)
    NullLiteral,

    /// `?T`, equivalent to `T|null`
    Nullable(SimpleType),

    /// `T1|T2|...|Tn`
    Union(UnionType),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Simple(s) => write!(f, "{}", s),
            Type::Pseudo(p) => write!(f, "{}", p),
            Type::NullLiteral => write!(f, "null"),
            Type::Nullable(s) => write!(f, "?{}", s),
            Type::Union(u) => {
                for (i, member) in u.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
        }
    }
}

impl From<SimpleType> for Type {
    fn from(simple: SimpleType) -> Self {
        Type::Simple(simple)
    }
}

impl Type {
    /// `int`
    pub fn int() -> Type {
        Type::Simple(SimpleType::Int)
    }

    /// `float`
    pub fn float() -> Type {
        Type::Simple(SimpleType::Float)
    }

    /// `string`
    pub fn string() -> Type {
        Type::Simple(SimpleType::String)
    }

    /// `bool`
    pub fn bool() -> Type {
        Type::Simple(SimpleType::Bool)
    }

    /// `false`
    pub fn false_type() -> Type {
        Type::Pseudo(PseudoType::False)
    }

    /// A class reference; reserved names yield the type they name
    pub fn class(name: impl AsRef<str>) -> Type {
        Type::from_name(name)
    }

    /// Classify a written type name
    ///
    /// Builtin keywords, `false` and `null` are recognized case-insensitively
    /// unless the name is namespaced; everything else is a class reference.
    pub fn from_name(name: impl AsRef<str>) -> Type {
        let raw = name.as_ref();
        let class = ClassName::new(raw);
        if class.is_reserved() {
            if class.is("false") {
                return Type::false_type();
            }
            if class.is("null") {
                return Type::NullLiteral;
            }
        }
        Type::Simple(SimpleType::class(raw))
    }

    /// `?T`; fails for `?void`
    pub fn nullable(inner: SimpleType) -> Result<Type, DeclarationError> {
        if inner == SimpleType::Void {
            return Err(DeclarationError::invalid("void can not be nullable"));
        }
        Ok(Type::Nullable(inner))
    }

    /// `T1|...|Tn`, see [`UnionType::new`]
    pub fn union(members: Vec<Type>) -> Result<Type, DeclarationError> {
        UnionType::new(members).map(Type::Union)
    }

    /// Check the structural invariants that apply to a standalone type.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        match self {
            Type::Simple(_) => Ok(()),
            Type::Pseudo(PseudoType::False) => Err(DeclarationError::invalid(
                "false can not be used as a standalone type",
            )),
            Type::NullLiteral => Err(DeclarationError::invalid(
                "null can not be used as a standalone type",
            )),
            Type::Nullable(inner) => Type::nullable(inner.clone()).map(|_| ()),
            Type::Union(u) => UnionType::new(u.members.clone()).map(|_| ()),
        }
    }

    /// Check if this type is a union type
    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union(_))
    }

    /// Get the union type if this is a union
    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            Type::Union(u) => Some(u),
            _ => None,
        }
    }

    /// Get the simple type if this is a simple type
    pub fn as_simple(&self) -> Option<&SimpleType> {
        match self {
            Type::Simple(s) => Some(s),
            _ => None,
        }
    }

    /// Whether `null` is accepted (`?T` or a union containing `null`)
    pub fn allows_null(&self) -> bool {
        match self {
            Type::NullLiteral | Type::Nullable(_) => true,
            Type::Union(u) => u.contains_null(),
            Type::Simple(_) | Type::Pseudo(_) => false,
        }
    }

    /// Constituent types, with `?T` expanded to `T` and `null`
    pub fn constituents(&self) -> Vec<Type> {
        match self {
            Type::Nullable(inner) => vec![Type::Simple(inner.clone()), Type::NullLiteral],
            Type::Union(u) => u.members.clone(),
            other => vec![other.clone()],
        }
    }

    /// Check whether any constituent is the given simple type
    pub fn contains_simple(&self, simple: &SimpleType) -> bool {
        match self {
            Type::Simple(s) | Type::Nullable(s) => s == simple,
            Type::Union(u) => u
                .members
                .iter()
                .any(|m| matches!(m, Type::Simple(s) if s == simple)),
            Type::Pseudo(_) | Type::NullLiteral => false,
        }
    }

    /// Sort key for the canonical member order
    pub(crate) fn order_key(&self) -> (u8, &str) {
        match self {
            Type::Simple(SimpleType::Class(name)) => (0, name.key()),
            Type::Simple(s) | Type::Nullable(s) => (s.rank(), ""),
            Type::Pseudo(PseudoType::False) => (11, ""),
            Type::NullLiteral => (13, ""),
            Type::Union(_) => (14, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_identity_is_case_insensitive() {
        assert_eq!(ClassName::new("Foo"), ClassName::new("FOO"));
        assert_eq!(ClassName::new("\\Foo\\Bar"), ClassName::new("foo\\bar"));
        assert!(ClassName::new("\\Foo").is_qualified());
        assert_eq!(ClassName::new("\\Foo").as_str(), "Foo");
        assert!(ClassName::new("Traversable").is("\\traversable"));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(SimpleType::from_keyword("INT"), Some(SimpleType::Int));
        assert_eq!(SimpleType::from_keyword("Iterable"), Some(SimpleType::Iterable));
        assert_eq!(SimpleType::from_keyword("false"), None);
        assert_eq!(SimpleType::from_keyword("Foo"), None);
    }

    #[test]
    fn test_display_round_trips_source_syntax() {
        let union = Type::union(vec![Type::int(), Type::class("Foo"), Type::NullLiteral]).unwrap();
        assert_eq!(union.to_string(), "int|Foo|null");
        assert_eq!(Type::Nullable(SimpleType::String).to_string(), "?string");
        assert_eq!(Type::false_type().to_string(), "false");
    }

    #[test]
    fn test_union_rejects_void() {
        let err = Type::union(vec![Type::int(), Type::Simple(SimpleType::Void)]).unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidType { .. }));
    }

    #[test]
    fn test_union_requires_two_members() {
        assert!(Type::union(vec![Type::int()]).is_err());
        assert!(Type::union(vec![]).is_err());
    }

    #[test]
    fn test_false_null_union_is_invalid() {
        assert!(Type::union(vec![Type::false_type(), Type::NullLiteral]).is_err());
        assert!(Type::union(vec![Type::false_type(), Type::int()]).is_ok());
    }

    #[test]
    fn test_nullable_void_is_invalid() {
        assert!(Type::nullable(SimpleType::Void).is_err());
        assert!(Type::nullable(SimpleType::Int).is_ok());
    }

    #[test]
    fn test_standalone_pseudo_types_are_invalid() {
        assert!(Type::false_type().validate().is_err());
        assert!(Type::NullLiteral.validate().is_err());
        assert!(Type::int().validate().is_ok());
    }

    #[test]
    fn test_allows_null() {
        assert!(Type::Nullable(SimpleType::Int).allows_null());
        assert!(Type::union(vec![Type::int(), Type::NullLiteral]).unwrap().allows_null());
        assert!(!Type::union(vec![Type::int(), Type::float()]).unwrap().allows_null());
        assert!(!Type::int().allows_null());
    }

    #[test]
    fn test_constituents_expand_nullable() {
        let nullable = Type::Nullable(SimpleType::Int);
        assert_eq!(nullable.constituents(), vec![Type::int(), Type::NullLiteral]);
        assert_eq!(Type::int().constituents(), vec![Type::int()]);
    }

    #[test]
    fn test_reserved_names_are_not_classes() {
        assert_eq!(Type::class("INT"), Type::int());
        assert_eq!(Type::class("null"), Type::NullLiteral);
        assert_eq!(Type::class("False"), Type::false_type());
        assert_eq!(SimpleType::class("self"), SimpleType::SelfType);
        assert!(ClassName::new("iterable").is_reserved());
        assert!(!ClassName::new("\\int").is_reserved());
        assert!(!ClassName::new("App\\Int").is_reserved());
        assert!(matches!(Type::class("App\\Int"), Type::Simple(SimpleType::Class(_))));
    }

    #[test]
    fn test_builtin_classification() {
        assert!(SimpleType::Int.is_builtin());
        assert!(!SimpleType::SelfType.is_builtin());
        assert!(!SimpleType::class("Foo").is_builtin());
    }
}
