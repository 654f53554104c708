//! Declaration sites and their per-kind restrictions

use crate::error::DeclarationError;
use crate::ty::{SimpleType, Type};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Where a type is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// Function or method return type (covariant)
    Return,
    /// Function or method parameter type (contravariant)
    Parameter,
    /// Property type (invariant)
    Property,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Return => write!(f, "return"),
            DeclarationKind::Parameter => write!(f, "parameter"),
            DeclarationKind::Property => write!(f, "property"),
        }
    }
}

impl FromStr for DeclarationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "return" => Ok(DeclarationKind::Return),
            "parameter" | "param" => Ok(DeclarationKind::Parameter),
            "property" | "prop" => Ok(DeclarationKind::Property),
            other => Err(format!("unknown declaration kind '{}'", other)),
        }
    }
}

/// Check a declared type against the rules for its declaration site
///
/// - the type must be structurally valid on its own
/// - `void` is only allowed as a return type
/// - `callable` is not allowed in property types
pub fn validate_declaration(kind: DeclarationKind, ty: &Type) -> Result<(), DeclarationError> {
    ty.validate()?;

    if kind != DeclarationKind::Return && ty.contains_simple(&SimpleType::Void) {
        return Err(DeclarationError::invalid(format!(
            "void can only be used as a return type, not as a {} type",
            kind
        )));
    }

    if kind == DeclarationKind::Property && ty.contains_simple(&SimpleType::Callable) {
        return Err(DeclarationError::invalid(format!(
            "property cannot have type {}",
            ty
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_only_as_return() {
        let void = Type::Simple(SimpleType::Void);
        assert!(validate_declaration(DeclarationKind::Return, &void).is_ok());
        assert!(validate_declaration(DeclarationKind::Parameter, &void).is_err());
        assert!(validate_declaration(DeclarationKind::Property, &void).is_err());
    }

    #[test]
    fn test_callable_property_is_rejected() {
        let callable = Type::union(vec![Type::Simple(SimpleType::Callable), Type::NullLiteral]).unwrap();
        assert!(validate_declaration(DeclarationKind::Property, &callable).is_err());
        assert!(validate_declaration(DeclarationKind::Parameter, &callable).is_ok());

        let nullable = Type::Nullable(SimpleType::Callable);
        assert!(validate_declaration(DeclarationKind::Property, &nullable).is_err());
    }

    #[test]
    fn test_standalone_false_is_rejected_everywhere() {
        let ty = Type::false_type();
        assert!(validate_declaration(DeclarationKind::Return, &ty).is_err());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("param".parse::<DeclarationKind>(), Ok(DeclarationKind::Parameter));
        assert_eq!("return".parse::<DeclarationKind>(), Ok(DeclarationKind::Return));
        assert!("field".parse::<DeclarationKind>().is_err());
        assert_eq!(DeclarationKind::Property.to_string(), "property");
    }
}
