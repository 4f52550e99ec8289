//! Helpers for reading typed overrides out of a `serde_json::Value` object.
//!
//! Missing keys and wrong types fall back to the supplied default, so a
//! partial override object such as `{"relax_rate": 0.1}` is always usable.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`. Integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a non-negative integer from `params[name]` as `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}
