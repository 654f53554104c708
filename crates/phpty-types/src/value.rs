//! Runtime values that reach typed locations

use crate::ty::{ClassName, SimpleType, Type};
use serde::{Serialize, Serializer};
use std::fmt;

/// Significant digits used when a float is converted to a string
const FLOAT_PRECISION: i32 = 14;

/// An object instance as far as type checks are concerned
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectValue {
    /// Runtime class of the object
    pub class: ClassName,
    /// Result of `__toString()`, if the class implements it
    pub to_string: Option<String>,
}

impl ObjectValue {
    /// An object without `__toString()`
    pub fn new(class: impl AsRef<str>) -> Self {
        ObjectValue {
            class: ClassName::new(class),
            to_string: None,
        }
    }

    /// An object whose `__toString()` returns `text`
    pub fn stringable(class: impl AsRef<str>, text: impl Into<String>) -> Self {
        ObjectValue {
            class: ClassName::new(class),
            to_string: Some(text.into()),
        }
    }
}

/// A runtime value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer
    Int(i64),
    /// Double-precision float
    #[serde(serialize_with = "serialize_float")]
    Float(f64),
    /// Byte string
    String(String),
    /// List of values
    Array(Vec<Value>),
    /// Object instance
    Object(ObjectValue),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    /// The most specific declared type this value inhabits
    ///
    /// `false` inhabits the `false` pseudo-type and `null` the null type, so
    /// both are accepted by unions that list them.
    pub fn runtime_type(&self) -> Type {
        match self {
            Value::Null => Type::NullLiteral,
            Value::Bool(false) => Type::false_type(),
            Value::Bool(true) => Type::bool(),
            Value::Int(_) => Type::int(),
            Value::Float(_) => Type::float(),
            Value::String(_) => Type::string(),
            Value::Array(_) => Type::Simple(SimpleType::Array),
            Value::Object(object) => Type::Simple(SimpleType::Class(object.class.clone())),
        }
    }

    /// Type name used in error messages
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Object(object) => object.class.to_string(),
        }
    }

    /// Identity of representation: same variant and same payload
    ///
    /// `1` and `1.0` differ, as do `"1"` and `1`. Floats compare bitwise so
    /// `NAN` matches itself.
    pub fn same_representation(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_representation(y))
            }
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "bool({})", b),
            Value::Int(i) => write!(f, "int({})", i),
            Value::Float(x) => {
                let text = format_float(*x);
                if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
                    write!(f, "float({}.0)", text)
                } else {
                    write!(f, "float({})", text)
                }
            }
            Value::String(s) => write!(f, "string({:?})", s),
            Value::Array(items) => {
                write!(f, "array(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Object(object) => write!(f, "object({})", object.class),
        }
    }
}

/// Finite floats serialize as numbers, `INF`/`-INF`/`NAN` as their string form
fn serialize_float<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_str(&format_float(*value))
    }
}

/// Convert a float to a string the way weak-mode coercion does
///
/// Uses 14 significant digits, switching to exponent notation for large and
/// small magnitudes (`1.0E+100`, `1.0E-5`). Non-finite values render as
/// `INF`, `-INF` and `NAN`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // d.ddddddddddddde<exp>, correctly rounded to 14 significant digits
    let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    // Position of the decimal point relative to the first digit
    let decpt = exponent + 1;
    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }

    if decpt > FLOAT_PRECISION || decpt < -3 {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        out.push('.');
        out.push_str(if rest.is_empty() { "0" } else { rest });
        out.push('E');
        out.push(if exponent < 0 { '-' } else { '+' });
        out.push_str(&exponent.abs().to_string());
    } else if decpt <= 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat((-decpt) as usize));
        out.push_str(digits);
    } else {
        let decpt = decpt as usize;
        if digits.len() <= decpt {
            out.push_str(digits);
            out.push_str(&"0".repeat(decpt - digits.len()));
        } else {
            out.push_str(&digits[..decpt]);
            out.push('.');
            out.push_str(&digits[decpt..]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1e100), "1.0E+100");
        assert_eq!(format_float(45.0), "45");
        assert_eq!(format_float(-1.5), "-1.5");
        assert_eq!(format_float(0.1 + 0.2), "0.3");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1.0E-5");
        assert_eq!(format_float(1e14), "1.0E+14");
        assert_eq!(format_float(1.5e15), "1.5E+15");
        assert_eq!(format_float(12345.678), "12345.678");
        assert_eq!(format_float(1.5e-7), "1.5E-7");
        assert_eq!(format_float(f64::INFINITY), "INF");
        assert_eq!(format_float(f64::NEG_INFINITY), "-INF");
        assert_eq!(format_float(f64::NAN), "NAN");
        assert_eq!(format_float(-0.0), "-0");
    }

    #[test]
    fn test_runtime_type() {
        assert_eq!(Value::Bool(false).runtime_type(), Type::false_type());
        assert_eq!(Value::Bool(true).runtime_type(), Type::bool());
        assert_eq!(Value::Null.runtime_type(), Type::NullLiteral);
        assert_eq!(
            Value::Object(ObjectValue::new("Foo")).runtime_type(),
            Type::class("foo")
        );
    }

    #[test]
    fn test_same_representation() {
        assert!(!Value::Int(1).same_representation(&Value::Float(1.0)));
        assert!(!Value::Int(1).same_representation(&Value::string("1")));
        assert!(Value::Float(f64::NAN).same_representation(&Value::Float(f64::NAN)));
        assert!(!Value::Float(0.0).same_representation(&Value::Float(-0.0)));
        assert!(Value::Array(vec![Value::Int(1)]).same_representation(&Value::Array(vec![Value::Int(1)])));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(42).to_string(), "int(42)");
        assert_eq!(Value::Float(45.0).to_string(), "float(45.0)");
        assert_eq!(Value::Float(1e100).to_string(), "float(1.0E+100)");
        assert_eq!(Value::string("42").to_string(), "string(\"42\")");
        assert_eq!(Value::Bool(true).to_string(), "bool(true)");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_serialize_non_finite_floats() {
        let json = |value: Value| serde_json::to_value(&value).unwrap();
        assert_eq!(json(Value::Float(f64::INFINITY)), serde_json::json!({"type": "float", "value": "INF"}));
        assert_eq!(json(Value::Float(f64::NEG_INFINITY))["value"], "-INF");
        assert_eq!(json(Value::Float(f64::NAN))["value"], "NAN");
        assert_eq!(json(Value::Float(2.5))["value"], 2.5);
        assert_eq!(json(Value::Array(vec![Value::Float(f64::INFINITY)]))["value"][0]["value"], "INF");
    }
}
