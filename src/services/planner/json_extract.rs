//! JSON extraction from model output.

use serde_json::Value;

/// Parse model output as JSON.
///
/// Tries a strict parse of the trimmed text first. When that fails, parses
/// the slice from the first `{` to the last `}` (models like to wrap JSON in
/// prose or markdown fences). Returns the parse error text on failure.
pub fn parse_model_json(text: &str) -> Result<Value, String> {
    let trimmed = text.trim();
    let strict_err = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    match extract_json_object(trimmed) {
        Some(candidate) => serde_json::from_str(candidate).map_err(|e| e.to_string()),
        None => Err(strict_err.to_string()),
    }
}

/// Slice from the first `{` to the last `}`, if they are in order.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
