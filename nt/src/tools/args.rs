//! Argument extraction for tool inputs

use serde_json::Value;

use super::ToolError;

/// Required non-empty string argument
pub fn required_str<'a>(input: &'a Value, name: &'static str) -> Result<&'a str, ToolError> {
    match input.get(name).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ToolError::MissingArgument { name }),
    }
}

/// Required string argument that may be empty (file contents, lesson text)
pub fn required_text<'a>(input: &'a Value, name: &'static str) -> Result<&'a str, ToolError> {
    input
        .get(name)
        .and_then(Value::as_str)
        .ok_or(ToolError::MissingArgument { name })
}

/// Optional string argument; empty strings count as absent
pub fn optional_str<'a>(input: &'a Value, name: &str) -> Option<&'a str> {
    input.get(name).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Optional boolean argument (also accepts "true"/"false" strings)
pub fn optional_bool(input: &Value, name: &str, default: bool) -> bool {
    match input.get(name) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.parse().unwrap_or(default),
        _ => default,
    }
}

/// Required non-negative integer argument
///
/// Models sometimes send `1.0` or `"1"` for integers; both are accepted.
pub fn required_u32(input: &Value, name: &'static str) -> Result<u32, ToolError> {
    let value = input.get(name).ok_or(ToolError::MissingArgument { name })?;
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ToolError::InvalidArgument {
            name,
            reason: format!("expected a non-negative integer, got {}", value),
        })
}
