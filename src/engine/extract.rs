//! Recovery of a single well-formed JSON object from noisy model output.
//!
//! Model responses routinely arrive wrapped in prose and Markdown fences.
//! The slice between the first `{` and the last `}` is parsed structurally;
//! anything outside is discarded. Idempotent for fenced and unfenced
//! renderings of the same payload.

use serde_json::Value;

use crate::error::EngineError;

/// Recover a JSON object from raw model text. Fails with `Extraction` when
/// no `{`/`}` pair exists, the slice does not parse, or the parsed value is
/// not an object.
pub fn extract_json_object(raw: &str) -> Result<Value, EngineError> {
    let start = raw
        .find('{')
        .ok_or_else(|| EngineError::Extraction("no '{' found in model output".to_string()))?;
    let end = raw
        .rfind('}')
        .ok_or_else(|| EngineError::Extraction("no '}' found in model output".to_string()))?;
    if end < start {
        return Err(EngineError::Extraction(
            "'}' precedes '{' in model output".to_string(),
        ));
    }

    let candidate = &raw[start..=end];
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| EngineError::Extraction(format!("invalid JSON in model output: {}", e)))?;

    if !value.is_object() {
        return Err(EngineError::Extraction(
            "model output parsed to a non-object JSON value".to_string(),
        ));
    }
    Ok(value)
}
