//! Passing values to typed locations
//!
//! In strict mode a value must already inhabit the declared type. In weak
//! mode a value that does not is converted to the first scalar member that
//! accepts it, trying `int`, `float`, `string` and `bool` in that order.

use crate::error::TypeError;
use crate::numeric::{classify, NumericString};
use crate::subtyping::SubtypingContext;
use crate::ty::{SimpleType, Type};
use crate::value::{format_float, Value};
use std::fmt;
use tracing::{debug, trace};

/// Lower bound of the float range that converts to `int` (inclusive)
const INT_RANGE_MIN: f64 = -9.223_372_036_854_775_808e18;
/// Upper bound of the float range that converts to `int` (exclusive)
const INT_RANGE_MAX: f64 = 9.223_372_036_854_775_808e18;

/// Typing mode of the calling scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// `declare(strict_types=1)`
    Strict,
    /// Weak scalar typing
    #[default]
    Weak,
}

/// Non-fatal diagnostic raised by a successful coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A leading-numeric string was truncated to its numeric prefix
    NonWellFormedNumeric {
        /// The original string
        input: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NonWellFormedNumeric { .. } => {
                write!(f, "A non well formed numeric value encountered")
            }
        }
    }
}

/// Value accepted by a typed location
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    /// The (possibly converted) value
    pub value: Value,
    /// Notice raised during conversion
    pub notice: Option<Notice>,
}

impl Coerced {
    fn unchanged(value: &Value) -> Self {
        Coerced {
            value: value.clone(),
            notice: None,
        }
    }
}

/// Scalar conversion targets, in weak-mode preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    Int,
    Float,
    String,
    Bool,
}

impl Scalar {
    const PREFERENCE: [Scalar; 4] = [Scalar::Int, Scalar::Float, Scalar::String, Scalar::Bool];

    fn simple(self) -> SimpleType {
        match self {
            Scalar::Int => SimpleType::Int,
            Scalar::Float => SimpleType::Float,
            Scalar::String => SimpleType::String,
            Scalar::Bool => SimpleType::Bool,
        }
    }
}

/// Checks and converts values for typed parameters, returns and properties
#[derive(Debug, Clone, Copy)]
pub struct CoercionResolver<'a> {
    subtyping: SubtypingContext<'a>,
    mode: CoercionMode,
}

impl<'a> CoercionResolver<'a> {
    /// Create a resolver for the given mode
    pub fn new(subtyping: SubtypingContext<'a>, mode: CoercionMode) -> Self {
        CoercionResolver { subtyping, mode }
    }

    /// Typing mode
    pub fn mode(&self) -> CoercionMode {
        self.mode
    }

    /// Whether the value inhabits `target` without conversion
    pub fn accepts(&self, value: &Value, target: &Type) -> bool {
        self.subtyping.is_subtype(&value.runtime_type(), target)
    }

    /// Pass `value` to a location declared as `target`
    pub fn coerce(&self, value: &Value, target: &Type) -> Result<Coerced, TypeError> {
        if self.accepts(value, target) {
            trace!(%value, %target, "exact match");
            return Ok(Coerced::unchanged(value));
        }

        let result = match self.mode {
            CoercionMode::Strict => self.coerce_strict(value, target),
            CoercionMode::Weak => self.coerce_weak(value, target),
        };

        match &result {
            Ok(coerced) => debug!(%value, %target, result = %coerced.value, "coerced"),
            Err(err) => debug!(%value, %target, %err, "coercion failed"),
        }
        result
    }

    fn coerce_strict(&self, value: &Value, target: &Type) -> Result<Coerced, TypeError> {
        // The one conversion strict mode performs: int widens to float
        if let Value::Int(i) = value {
            if target.contains_simple(&SimpleType::Float) {
                return Ok(Coerced {
                    value: Value::Float(*i as f64),
                    notice: None,
                });
            }
        }

        Err(TypeError::Mismatch {
            expected: target.to_string(),
            actual: value.type_name(),
        })
    }

    fn coerce_weak(&self, value: &Value, target: &Type) -> Result<Coerced, TypeError> {
        let not_coercible = || TypeError::NotCoercible {
            expected: target.to_string(),
            actual: value.type_name(),
        };

        // null and arrays never convert
        if matches!(value, Value::Null | Value::Array(_)) {
            return Err(not_coercible());
        }

        let present = |scalar: Scalar| target.contains_simple(&scalar.simple());
        let mut candidates: Vec<Scalar> = Scalar::PREFERENCE
            .into_iter()
            .filter(|&scalar| present(scalar))
            .collect();

        // A string choosing between int and float follows its own shape
        if let Value::String(s) = value {
            if present(Scalar::Int) && present(Scalar::Float) {
                let keep = match classify(s).value {
                    NumericString::Integer(_) => Some(Scalar::Int),
                    NumericString::Float(_) => Some(Scalar::Float),
                    NumericString::NonNumeric => None,
                };
                candidates.retain(|&scalar| {
                    !matches!(scalar, Scalar::Int | Scalar::Float) || Some(scalar) == keep
                });
            }
        }

        for scalar in candidates {
            trace!(%value, candidate = ?scalar, "trying coercion candidate");
            if let Some(coerced) = convert(value, scalar) {
                return Ok(coerced);
            }
        }

        Err(not_coercible())
    }
}

fn convert(value: &Value, target: Scalar) -> Option<Coerced> {
    match target {
        Scalar::Int => to_int(value),
        Scalar::Float => to_float(value),
        Scalar::String => to_string(value).map(|s| Coerced {
            value: Value::String(s),
            notice: None,
        }),
        Scalar::Bool => to_bool(value).map(|b| Coerced {
            value: Value::Bool(b),
            notice: None,
        }),
    }
}

fn notice_for(input: &str, well_formed: bool) -> Option<Notice> {
    (!well_formed).then(|| Notice::NonWellFormedNumeric {
        input: input.to_string(),
    })
}

fn float_to_int(f: f64) -> Option<i64> {
    (f.is_finite() && (INT_RANGE_MIN..INT_RANGE_MAX).contains(&f)).then(|| f.trunc() as i64)
}

fn to_int(value: &Value) -> Option<Coerced> {
    let (int, notice) = match value {
        Value::Int(i) => (*i, None),
        Value::Bool(b) => (i64::from(*b), None),
        Value::Float(f) => (float_to_int(*f)?, None),
        Value::String(s) => {
            let class = classify(s);
            let int = match class.value {
                NumericString::Integer(i) => i,
                NumericString::Float(f) => float_to_int(f)?,
                NumericString::NonNumeric => return None,
            };
            (int, notice_for(s, class.well_formed))
        }
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    Some(Coerced {
        value: Value::Int(int),
        notice,
    })
}

fn to_float(value: &Value) -> Option<Coerced> {
    let (float, notice) = match value {
        Value::Float(f) => (*f, None),
        Value::Int(i) => (*i as f64, None),
        Value::Bool(b) => (if *b { 1.0 } else { 0.0 }, None),
        Value::String(s) => {
            let class = classify(s);
            let float = match class.value {
                NumericString::Integer(i) => i as f64,
                NumericString::Float(f) => f,
                NumericString::NonNumeric => return None,
            };
            (float, notice_for(s, class.well_formed))
        }
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    Some(Coerced {
        value: Value::Float(float),
        notice,
    })
}

fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(format_float(*f)),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Object(object) => object.to_string.clone(),
        Value::Null | Value::Array(_) => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(i) => Some(*i != 0),
        Value::Float(f) => Some(*f != 0.0),
        Value::String(s) => Some(!(s.is_empty() || s == "0")),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
