//! Type system errors

use crate::declaration::DeclarationKind;
use std::fmt;
use thiserror::Error;

/// Errors raised while declaring or inheriting a type
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeclarationError {
    /// Structurally disallowed type (e.g. `void` in a union)
    #[error("Invalid type: {reason}")]
    InvalidType {
        /// Reason for invalidity
        reason: String,
    },

    /// Statically detectable redundant union member
    #[error("Redundant type {ty}: {redundancy}")]
    Redundant {
        /// The offending type as written
        ty: String,
        /// Which redundancy rule fired
        redundancy: Redundancy,
    },

    /// Override violates covariance, contravariance or invariance
    #[error("Incompatible {kind} type: {detail}")]
    Variance {
        /// Kind of declaration being overridden
        kind: DeclarationKind,
        /// Human-readable explanation
        detail: String,
    },
}

impl DeclarationError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        DeclarationError::InvalidType {
            reason: reason.into(),
        }
    }
}

/// Redundancy rules applied at declaration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redundancy {
    /// The same name-resolved type occurs twice
    Duplicate(String),
    /// Both `bool` and `false`
    BoolWithFalse,
    /// `object` together with a class type
    ObjectWithClass(String),
    /// `iterable` together with `array` or `Traversable`
    IterableWith(String),
}

impl fmt::Display for Redundancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redundancy::Duplicate(name) => write!(f, "duplicate type {} is redundant", name),
            Redundancy::BoolWithFalse => {
                write!(f, "contains both bool and false, which is redundant")
            }
            Redundancy::ObjectWithClass(name) => write!(
                f,
                "contains both object and a class type ({}), which is redundant",
                name
            ),
            Redundancy::IterableWith(name) => write!(
                f,
                "contains both iterable and {}, which is redundant",
                name
            ),
        }
    }
}

/// Runtime type errors raised when a value reaches a typed location
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// Strict mode: the value's type is not part of the declared type
    #[error("Value of type {actual} is not accepted by {expected} in strict mode")]
    Mismatch {
        /// Declared type
        expected: String,
        /// Type of the value
        actual: String,
    },

    /// Weak mode: no coercion candidate succeeded
    #[error("Cannot coerce value of type {actual} to {expected}")]
    NotCoercible {
        /// Declared type
        expected: String,
        /// Type of the value
        actual: String,
    },

    /// Aliased typed locations disagree on the coerced value
    #[error("Reference assignment to ${slot} conflicts: {reason}")]
    ReferenceConflict {
        /// Location whose coercion disagreed
        slot: String,
        /// Description of the conflict
        reason: String,
    },
}
