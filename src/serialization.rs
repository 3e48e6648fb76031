//! Encoding of JSON values as TypeScript source literals.

use serde_json::{Number, Value};

/// How integer literals are spelled for a given integer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerEncoding {
    /// `5`
    Plain,
    /// `5n`
    BigIntSuffix,
    /// `BigInt(5)`
    BigIntCall,
}

/// Renders a number the way JavaScript prints it: integral values carry no fraction.
pub fn number_literal(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(float_literal).unwrap_or_else(|| n.to_string())
}

pub fn float_literal(f: f64) -> String {
    // `Display` for f64 already drops a trailing `.0`.
    format!("{f}")
}

/// Spells `n` for an integer width. Fractional values cannot be BigInts and keep the
/// plain numeral.
pub fn encode_integer(n: &Number, encoding: IntegerEncoding) -> String {
    let digits = number_literal(n);
    let integral = n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0);
    if !integral {
        return digits;
    }
    match encoding {
        IntegerEncoding::Plain => digits,
        IntegerEncoding::BigIntSuffix => format!("{digits}n"),
        IntegerEncoding::BigIntCall => format!("BigInt({digits})"),
    }
}

/// A JSON string literal, `"like this"`.
pub fn double_quoted(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

/// A single-quoted string literal, `'like this'`.
pub fn single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// JSON text of any value, with numbers normalised through [`number_literal`].
pub fn json_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_literal(n),
        Value::String(s) => double_quoted(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(json_literal).collect();
            format!("[{}]", parts.join(","))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}:{}", double_quoted(k), json_literal(v)))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

/// An enum/const member as written inside `z.literal(...)`: strings single-quoted.
pub fn enum_literal(value: &Value) -> String {
    match value {
        Value::String(s) => single_quoted(s),
        other => json_literal(other),
    }
}
