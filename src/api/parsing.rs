use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::errors::BotError;

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Pull the raw request body out of an API Gateway / Function URL proxy
/// payload, decoding it when the gateway base64-encoded it.
///
/// # Errors
///
/// Returns a `ParseError` if the body is missing, not a string, or not valid
/// base64/UTF-8 when flagged as encoded.
pub fn extract_body(payload: &Value) -> Result<String, BotError> {
    let body = payload
        .get("body")
        .ok_or_else(|| BotError::ParseError("Missing body".to_string()))?
        .as_str()
        .ok_or_else(|| BotError::ParseError("Invalid body format".to_string()))?;

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !encoded {
        return Ok(body.to_string());
    }

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| BotError::ParseError(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes).map_err(|e| BotError::ParseError(format!("Body is not UTF-8: {e}")))
}
