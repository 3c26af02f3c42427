//! Template filters registered on top of the MiniJinja builtins

use base64::Engine as _;
use minijinja::Value;
use minijinja::value::ValueKind;

/// Base64 encode a string
///
/// Usage: {{ '{"auths":{}}' | b64encode }}
#[must_use]
pub fn b64encode(value: String) -> String {
    base64::engine::general_purpose::STANDARD.encode(value.as_bytes())
}

/// Quote a string with double quotes
///
/// Booleans are written the way YAML spells them (`true`, `false`).
///
/// Usage: {{ imageTag | quote }}
#[must_use]
pub fn quote(value: Value) -> String {
    let s = match (value.kind(), value.as_str()) {
        (_, Some(str_val)) => str_val.to_string(),
        (ValueKind::Bool, None) => value.is_true().to_string(),
        (_, None) => value.to_string(),
    };
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
