//! Loose value comparison
//!
//! Numeric strings compare equal to the numbers they spell ("0" == 0),
//! null/bool compare by truthiness, containers compare element-wise.

use serde_json::{Number, Value};

/// Parsed numeric form of a JSON number or numeric string
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    fn from_number(n: &Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            Some(Numeric::Int(i))
        } else {
            n.as_f64().map(Numeric::Float)
        }
    }
}

fn numeric_eq(a: Numeric, b: Numeric) -> bool {
    match (a, b) {
        (Numeric::Int(x), Numeric::Int(y)) => x == y,
        _ => a.as_f64() == b.as_f64(),
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Validate the shape `[+-]digits[.digits][(e|E)[+-]digits]`
///
/// Returns whether the literal is integral (no fraction, no exponent).
fn scan_number(s: &str) -> Option<bool> {
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut integral = true;
    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        integral = false;
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits + frac_digits == 0 {
        return None;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        integral = false;
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }

    (i == bytes.len()).then_some(integral)
}

fn parse_numeric(s: &str) -> Option<Numeric> {
    let trimmed = s.trim_matches(is_space);
    let integral = scan_number(trimmed)?;

    if integral {
        if let Ok(i) = trimmed.parse::<i64>() {
            return Some(Numeric::Int(i));
        }
    }
    trimmed.parse::<f64>().ok().map(Numeric::Float)
}

/// True if `s` is a numeric string (surrounding whitespace allowed)
pub fn is_numeric_str(s: &str) -> bool {
    parse_numeric(s).is_some()
}

/// Truthiness of a JSON value
///
/// Falsy: `null`, `false`, `0`, `0.0`, `""`, `"0"`, `[]`, `{}`.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => Numeric::from_number(n).map_or(false, |x| x.as_f64() != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn number_eq_str(n: &Number, s: &str) -> bool {
    match (Numeric::from_number(n), parse_numeric(s)) {
        (Some(a), Some(b)) => numeric_eq(a, b),
        _ => n.to_string() == s,
    }
}

/// Loose equality between two JSON values
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => {
            truthy(a) == truthy(b)
        }

        (Value::Number(x), Value::Number(y)) => {
            match (Numeric::from_number(x), Numeric::from_number(y)) {
                (Some(x), Some(y)) => numeric_eq(x, y),
                _ => x == y,
            }
        }
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            number_eq_str(n, s)
        }
        (Value::String(x), Value::String(y)) => match (parse_numeric(x), parse_numeric(y)) {
            (Some(x), Some(y)) => numeric_eq(x, y),
            _ => x == y,
        },

        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| loose_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).map_or(false, |w| loose_eq(v, w)))
        }

        _ => false,
    }
}
