//! Typed adapters for raw form-field input.
//!
//! Select inputs hand back the strings "true"/"false" and numeric inputs
//! hand back "" when untouched; each decoder below is the one place that
//! coercion happens before a draft reaches its schema.

/// Decode a boolean-valued select input
pub fn decode_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("Expected true or false, got '{}'", other)),
    }
}

/// Decode a numeric input; empty string means "not provided", never NaN
pub fn decode_opt_u32(raw: &str) -> Result<Option<u32>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| format!("Expected a number, got '{}'", trimmed))
}

/// Decode an optional text input; empty string means "not provided"
pub fn decode_opt_string(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
