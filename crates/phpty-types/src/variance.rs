//! Inheritance variance checks
//!
//! An overriding declaration must stay compatible with the declaration it
//! replaces:
//! - return types are covariant (members may be removed or narrowed)
//! - parameter types are contravariant (members may be added or widened)
//! - property types are invariant (mutual subtypes)
//!
//! All subtyping decisions come from [`SubtypingContext`].

use crate::declaration::DeclarationKind;
use crate::error::DeclarationError;
use crate::subtyping::SubtypingContext;
use crate::ty::Type;
use tracing::debug;

/// Method parameter (`None` type means untyped)
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name without `$`
    pub name: String,
    /// Declared type
    pub ty: Option<Type>,
    /// Whether the parameter has a default value
    pub optional: bool,
}

impl Parameter {
    /// A required parameter
    pub fn new(name: impl Into<String>, ty: Option<Type>) -> Self {
        Parameter {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// An optional parameter
    pub fn optional(name: impl Into<String>, ty: Option<Type>) -> Self {
        Parameter {
            optional: true,
            ..Self::new(name, ty)
        }
    }
}

/// Method signature as far as variance is concerned
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    /// Method name
    pub name: String,
    /// Parameters in order
    pub params: Vec<Parameter>,
    /// Declared return type
    pub return_type: Option<Type>,
}

/// Applies variance rules to overriding declarations
#[derive(Debug, Clone, Copy)]
pub struct VarianceChecker<'a> {
    subtyping: SubtypingContext<'a>,
}

impl<'a> VarianceChecker<'a> {
    /// Create a checker on top of a subtyping context
    pub fn new(subtyping: SubtypingContext<'a>) -> Self {
        VarianceChecker { subtyping }
    }

    /// Check that `overriding` may replace `base` for the given declaration kind
    pub fn check(
        &self,
        kind: DeclarationKind,
        base: &Type,
        overriding: &Type,
    ) -> Result<(), DeclarationError> {
        let result = match kind {
            DeclarationKind::Return => self.check_covariant(base, overriding),
            DeclarationKind::Parameter => self.check_contravariant(base, overriding),
            DeclarationKind::Property => self.check_invariant(base, overriding),
        };
        debug!(%kind, %base, %overriding, ok = result.is_ok(), "variance check");
        result
    }

    /// Like [`check`](Self::check), with untyped declarations treated as `mixed`
    ///
    /// A parameter may drop its type and a return may gain one; the reverse
    /// directions are errors, and properties must agree on being typed.
    pub fn check_declaration(
        &self,
        kind: DeclarationKind,
        base: Option<&Type>,
        overriding: Option<&Type>,
    ) -> Result<(), DeclarationError> {
        match (kind, base, overriding) {
            (_, Some(base), Some(overriding)) => self.check(kind, base, overriding),
            (_, None, None) => Ok(()),
            (DeclarationKind::Parameter, Some(_), None) => Ok(()),
            (DeclarationKind::Return, None, Some(_)) => Ok(()),
            (DeclarationKind::Parameter, None, Some(overriding)) => Err(variance(
                kind,
                format!("{} must accept mixed, the parent parameter is untyped", overriding),
            )),
            (DeclarationKind::Return, Some(base), None) => Err(variance(
                kind,
                format!("the return type must not be removed, expected a subtype of {}", base),
            )),
            (DeclarationKind::Property, base, overriding) => Err(variance(
                kind,
                format!(
                    "typed and untyped properties are incompatible ({} vs {})",
                    describe(base),
                    describe(overriding)
                ),
            )),
        }
    }

    /// Check an overriding method signature against its parent
    pub fn check_method(
        &self,
        base: &MethodSignature,
        overriding: &MethodSignature,
    ) -> Result<(), DeclarationError> {
        if overriding.params.len() < base.params.len() {
            return Err(variance(
                DeclarationKind::Parameter,
                format!(
                    "{}() must accept {} parameters, found {}",
                    overriding.name,
                    base.params.len(),
                    overriding.params.len()
                ),
            ));
        }

        for (index, param) in overriding.params.iter().enumerate() {
            match base.params.get(index) {
                Some(base_param) => {
                    if param_is_required_beyond(base_param, param) {
                        return Err(variance(
                            DeclarationKind::Parameter,
                            format!(
                                "{}(): parameter #{} ${} must stay optional",
                                overriding.name,
                                index + 1,
                                param.name
                            ),
                        ));
                    }
                    self.check_declaration(
                        DeclarationKind::Parameter,
                        base_param.ty.as_ref(),
                        param.ty.as_ref(),
                    )
                    .map_err(|err| {
                        prefix(err, format!("{}(): parameter #{} ${}", overriding.name, index + 1, param.name))
                    })?;
                }
                None if !param.optional => {
                    return Err(variance(
                        DeclarationKind::Parameter,
                        format!(
                            "{}(): additional parameter #{} ${} must be optional",
                            overriding.name,
                            index + 1,
                            param.name
                        ),
                    ));
                }
                None => {}
            }
        }

        self.check_declaration(
            DeclarationKind::Return,
            base.return_type.as_ref(),
            overriding.return_type.as_ref(),
        )
        .map_err(|err| prefix(err, format!("{}()", overriding.name)))
    }

    fn check_covariant(&self, base: &Type, overriding: &Type) -> Result<(), DeclarationError> {
        let extra = self.subtyping.uncovered_members(overriding, base);
        if extra.is_empty() {
            return Ok(());
        }
        Err(variance(
            DeclarationKind::Return,
            format!(
                "{} must be a subtype of {} ({} not allowed)",
                overriding,
                base,
                join(&extra)
            ),
        ))
    }

    fn check_contravariant(&self, base: &Type, overriding: &Type) -> Result<(), DeclarationError> {
        let missing = self.subtyping.uncovered_members(base, overriding);
        if missing.is_empty() {
            return Ok(());
        }
        Err(variance(
            DeclarationKind::Parameter,
            format!(
                "{} must be a supertype of {} ({} no longer accepted)",
                overriding,
                base,
                join(&missing)
            ),
        ))
    }

    fn check_invariant(&self, base: &Type, overriding: &Type) -> Result<(), DeclarationError> {
        if self.subtyping.is_equivalent(base, overriding) {
            return Ok(());
        }
        Err(variance(
            DeclarationKind::Property,
            format!("{} must be equivalent to {}", overriding, base),
        ))
    }
}

fn variance(kind: DeclarationKind, detail: String) -> DeclarationError {
    DeclarationError::Variance { kind, detail }
}

fn prefix(err: DeclarationError, context: String) -> DeclarationError {
    match err {
        DeclarationError::Variance { kind, detail } => DeclarationError::Variance {
            kind,
            detail: format!("{}: {}", context, detail),
        },
        other => other,
    }
}

fn param_is_required_beyond(base: &Parameter, overriding: &Parameter) -> bool {
    base.optional && !overriding.optional
}

fn describe(ty: Option<&Type>) -> String {
    ty.map(Type::to_string).unwrap_or_else(|| "untyped".to_string())
}

fn join(types: &[Type]) -> String {
    types
        .iter()
        .map(Type::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
