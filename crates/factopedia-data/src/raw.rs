//! Accessors over loosely-typed raw prototype JSON.
//!
//! Prototype dumps come out of a Lua runtime, so fields are frequently
//! missing, `false` where a table was expected, or an empty array where an
//! empty object was expected. These helpers read a field with a fallback
//! instead of failing.

use serde_json::{Map, Value};

/// JavaScript-style truthiness: `null`, `false`, `0`, `NaN` and `""` are
/// falsy; everything else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a JSON number the way a JavaScript `String(n)` would: integers
/// without a fractional part, everything else in shortest form.
pub fn number_to_string(value: &serde_json::Number) -> String {
    if let Some(i) = value.as_i64() {
        i.to_string()
    } else if let Some(u) = value.as_u64() {
        u.to_string()
    } else {
        format_number(value.as_f64().unwrap_or(0.0))
    }
}

/// Format an `f64` without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Read-only view over one raw prototype record.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawRecord<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// A string field, or `None` if absent or not a string.
    pub fn str(&self, field: &str) -> Option<&'a str> {
        self.get(field).and_then(Value::as_str)
    }

    /// A field rendered as a string. Strings are returned as-is, numbers are
    /// stringified; any other shape yields `None`.
    pub fn string_like(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(number_to_string(n)),
            _ => None,
        }
    }

    /// A string field defaulting to `""`.
    pub fn str_or_empty(&self, field: &str) -> String {
        self.str(field).unwrap_or_default().to_string()
    }

    /// A numeric field. Numeric strings are accepted.
    pub fn f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(value_as_f64)
    }

    /// A numeric field treated like `raw.field || default`: missing, zero and
    /// non-numeric values all produce the default.
    pub fn f64_or(&self, field: &str, default: f64) -> f64 {
        match self.f64(field) {
            Some(v) if v != 0.0 && !v.is_nan() => v,
            _ => default,
        }
    }

    /// A boolean field, `false` unless the field is truthy.
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).is_some_and(is_truthy)
    }

    /// A list of strings. A bare string is treated as a one-element list;
    /// non-string entries are skipped.
    pub fn string_list(&self, field: &str) -> Vec<String> {
        match self.get(field) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// A nested object field.
    pub fn object(&self, field: &str) -> Option<RawRecord<'a>> {
        self.get(field).and_then(Value::as_object).map(RawRecord::new)
    }

    /// A list field. Missing fields and empty objects (an empty Lua table
    /// serialized as `{}`) are both an empty list.
    pub fn list(&self, field: &str) -> Option<&'a [Value]> {
        match self.get(field)? {
            Value::Array(values) => Some(values.as_slice()),
            Value::Object(map) if map.is_empty() => Some(&[]),
            _ => None,
        }
    }
}

/// Interpret a JSON value as a number, accepting numeric strings.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
