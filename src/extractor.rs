use crate::errors::AppError;
use serde_json::Value;

/// Extracts the JSON object embedded in a free-text model response.
///
/// The model is instructed to reply with bare JSON but routinely wraps it
/// in code fences or prose. The strategy is a greedy scan from the first
/// `{` to the last `}` followed by a strict parse; it is kept as-is
/// rather than trusting the formatting instruction. Fails with
/// [`AppError::MalformedResponse`] when no brace-delimited span exists or
/// the span is not valid JSON.
pub fn extract_json(raw: &str) -> Result<Value, AppError> {
    let start = raw.find('{').ok_or_else(|| {
        AppError::MalformedResponse("no JSON object found in model response".to_string())
    })?;
    let end = raw.rfind('}').filter(|end| *end > start).ok_or_else(|| {
        AppError::MalformedResponse("unterminated JSON object in model response".to_string())
    })?;

    serde_json::from_str(&raw[start..=end]).map_err(|e| {
        AppError::MalformedResponse(format!("extracted span is not valid JSON: {}", e))
    })
}
