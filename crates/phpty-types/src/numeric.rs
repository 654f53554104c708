//! Numeric string classification
//!
//! A numeric string is optional whitespace, an optional sign, decimal
//! digits with an optional fraction and exponent, then optional trailing
//! whitespace. A string that only starts with such a number is
//! leading-numeric: it still yields a value, but is not well formed.

/// Numeric value of a string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericString {
    /// Integer literal that fits in `i64`
    Integer(i64),
    /// Float literal, or an integer literal that overflows `i64`
    Float(f64),
    /// No leading number at all
    NonNumeric,
}

/// Result of classifying a string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericClass {
    /// Value of the numeric prefix
    pub value: NumericString,
    /// Whether the whole string was consumed
    pub well_formed: bool,
}

impl NumericClass {
    /// Fully numeric (`"45"`, `" 1.5e3 "`)
    pub fn is_numeric(&self) -> bool {
        self.well_formed && self.value != NumericString::NonNumeric
    }

    /// At least leading-numeric (`"45X"`)
    pub fn is_leading_numeric(&self) -> bool {
        self.value != NumericString::NonNumeric
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Classify `s` as an integer, float or non-numeric string
pub fn classify(s: &str) -> NumericClass {
    let bytes = s.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() && is_whitespace(bytes[pos]) {
        pos += 1;
    }
    let start = pos;

    if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;
    let mut is_float = false;

    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if digits > 0 || end > frac_start {
            digits += end - frac_start;
            pos = end;
            is_float = true;
        }
    }

    if digits == 0 {
        return NumericClass {
            value: NumericString::NonNumeric,
            well_formed: false,
        };
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
            end += 1;
        }
        let exp_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > exp_start {
            pos = end;
            is_float = true;
        }
    }

    let literal = &s[start..pos];
    let well_formed = bytes[pos..].iter().all(|&b| is_whitespace(b));

    let value = if is_float {
        parse_float(literal)
    } else {
        match literal.parse::<i64>() {
            Ok(i) => NumericString::Integer(i),
            Err(_) => parse_float(literal),
        }
    };

    NumericClass { value, well_formed }
}

fn parse_float(literal: &str) -> NumericString {
    match literal.parse::<f64>() {
        Ok(f) => NumericString::Float(f),
        Err(_) => NumericString::NonNumeric,
    }
}
