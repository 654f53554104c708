//! Type normalization
//!
//! Resolves class names and brings unions into a canonical member order,
//! rejecting redundancy that can be detected without loading classes.

use crate::error::{DeclarationError, Redundancy};
use crate::names::NameResolver;
use crate::ty::{SimpleType, Type, UnionType};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Normalize a declared type to its canonical form
///
/// Normalization includes:
/// - Resolving class names through `resolver`
/// - Rejecting duplicate members (after name resolution)
/// - Rejecting `bool` with `false`, `object` with a class type and
///   `iterable` with `array` or `Traversable`
/// - Sorting union members into a fixed order
///
/// Normalizing an already canonical type returns an equal type.
pub fn normalize_type(ty: &Type, resolver: &dyn NameResolver) -> Result<Type, DeclarationError> {
    let normalized = match ty {
        Type::Simple(simple) => {
            let member = resolve_member(simple, resolver);
            member.validate()?;
            member
        }
        Type::Nullable(simple) => match resolve_member(simple, resolver) {
            Type::Simple(inner) => Type::nullable(inner)?,
            other => {
                return Err(DeclarationError::invalid(format!(
                    "{} can not be marked nullable",
                    other
                )))
            }
        },
        Type::Pseudo(_) | Type::NullLiteral => ty.clone(),
        Type::Union(union) => normalize_union(union, resolver)?,
    };
    debug!(input = %ty, output = %normalized, "normalized type");
    Ok(normalized)
}

/// Resolve a class name, or reclassify a reserved name held as a class
fn resolve_member(simple: &SimpleType, resolver: &dyn NameResolver) -> Type {
    match simple {
        SimpleType::Class(name) if name.is_reserved() => Type::from_name(name.as_str()),
        SimpleType::Class(name) => Type::Simple(SimpleType::Class(resolver.resolve_class(name))),
        other => Type::Simple(other.clone()),
    }
}

fn normalize_union(union: &UnionType, resolver: &dyn NameResolver) -> Result<Type, DeclarationError> {
    let mut members: Vec<Type> = union
        .members()
        .iter()
        .map(|member| match member {
            Type::Simple(simple) => resolve_member(simple, resolver),
            other => other.clone(),
        })
        .collect();

    check_redundancy(&members, union)?;

    members.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
    UnionType::new(members).map(Type::Union)
}

fn check_redundancy(members: &[Type], original: &UnionType) -> Result<(), DeclarationError> {
    let redundant = |redundancy| DeclarationError::Redundant {
        ty: Type::Union(original.clone()).to_string(),
        redundancy,
    };

    let mut seen: FxHashSet<&Type> = FxHashSet::default();
    for member in members {
        if !seen.insert(member) {
            return Err(redundant(Redundancy::Duplicate(member.to_string())));
        }
    }

    let has = |simple: SimpleType| members.contains(&Type::Simple(simple));
    let classes = || {
        members
            .iter()
            .filter_map(|m| m.as_simple().and_then(SimpleType::as_class))
    };

    if has(SimpleType::Bool) && members.contains(&Type::false_type()) {
        return Err(redundant(Redundancy::BoolWithFalse));
    }

    if has(SimpleType::Object) {
        if let Some(class) = classes().next() {
            return Err(redundant(Redundancy::ObjectWithClass(class.to_string())));
        }
    }

    if has(SimpleType::Iterable) {
        if has(SimpleType::Array) {
            return Err(redundant(Redundancy::IterableWith("array".to_string())));
        }
        if let Some(class) = classes().find(|c| c.is("Traversable")) {
            return Err(redundant(Redundancy::IterableWith(class.to_string())));
        }
    }

    Ok(())
}
