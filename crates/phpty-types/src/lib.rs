//! phpty Type System
//!
//! Union type representation, normalization, subtyping, variance checking,
//! weak-mode coercion and reflection for PHP-style type declarations.

#![warn(missing_docs)]

pub mod ty;
pub mod error;
pub mod hierarchy;
pub mod names;
pub mod normalize;
pub mod subtyping;
pub mod declaration;
pub mod variance;
pub mod value;
pub mod numeric;
pub mod coercion;
pub mod reference;
pub mod reflection;

pub use ty::{ClassName, PseudoType, SimpleType, Type, UnionType};
pub use error::{DeclarationError, Redundancy, TypeError};
pub use hierarchy::{ClassHierarchy, ClassScope, ClassTable};
pub use names::{Imports, NameResolver, NoImports};
pub use normalize::normalize_type;
pub use subtyping::SubtypingContext;
pub use declaration::{validate_declaration, DeclarationKind};
pub use variance::{MethodSignature, Parameter, VarianceChecker};
pub use value::{ObjectValue, Value};
pub use numeric::{classify, NumericClass, NumericString};
pub use coercion::{Coerced, CoercionMode, CoercionResolver, Notice};
pub use reference::{ReferenceSet, ReferenceSlot};
pub use reflection::{reflect, ReflectionNamedType, ReflectionType, ReflectionUnionType};
