//! Output formatting utilities.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

/// Re-indents serialized JSON when `pretty` is set.
pub fn format_json(serialized: String, pretty: bool) -> String {
    if !pretty {
        return serialized;
    }
    match serde_json::from_str::<Value>(&serialized) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(serialized),
        Err(_) => serialized,
    }
}

/// Decodes a base64url protected header for display, or `null` if it is not JSON.
pub fn decode_protected(protected: &str) -> Value {
    URL_SAFE_NO_PAD
        .decode(protected.trim_end_matches('='))
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or(Value::Null)
}
