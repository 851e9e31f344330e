//! JSON body parsing for the dispatcher.
//!
//! Only POST/PUT/PATCH requests that declare a JSON content type are read.
//! The body is buffered in full (up to `max_body_bytes`) and decoded
//! tolerantly: anything that is not a JSON object becomes an empty map, and
//! handlers report missing fields with their own 400 messages.

use axum::body::Body;
use axum::http::{HeaderMap, Method, header};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::{Map, Value};

use crate::error::AppError;

pub fn carries_json(method: &Method, headers: &HeaderMap) -> bool {
    let body_method = matches!(*method, Method::POST | Method::PUT | Method::PATCH);
    body_method
        && headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

/// Malformed JSON, a non-object top level, or invalid UTF-8 all yield `{}`.
pub fn parse_object(bytes: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Buffers the whole body, then parses it.
///
/// - over `limit` bytes => `AppError::PayloadTooLarge` (413)
/// - stream error (client went away) => empty map; there is nobody left to answer
pub async fn read_object(body: Body, limit: usize) -> Result<Map<String, Value>, AppError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(parse_object(&collected.to_bytes())),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            tracing::warn!(limit, "request body over limit");
            Err(AppError::PayloadTooLarge)
        }
        Err(err) => {
            tracing::debug!(error = %err, "request body stream ended with an error");
            Ok(Map::new())
        }
    }
}
