//! Maps HTTP error responses onto [`IptuApiError`] variants.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::{Map, Value as JsonValue};

use crate::{error::FieldErrors, IptuApiError};

const REQUEST_ID_HEADER: &str = "x-request-id";

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const UNKNOWN_ERROR: &str = "unknown error";

/// Classifies a received error response (status >= 400).
///
/// Never fails: a body that is not a JSON object is treated as an empty
/// detail map and its raw text becomes the message.
pub fn classify_response(status: u16, headers: &HeaderMap, body: &str) -> IptuApiError {
    let request_id = request_id(headers);
    let detail = match serde_json::from_str::<JsonValue>(body) {
        Ok(JsonValue::Object(map)) => map,
        _ => Map::new(),
    };
    let message = resolve_message(&detail, body);

    match status {
        401 => IptuApiError::Authentication {
            message,
            request_id,
        },
        403 => IptuApiError::Forbidden {
            message,
            required_plan: string_field(&detail, "required_plan"),
            request_id,
        },
        404 => IptuApiError::NotFound {
            message,
            resource: string_field(&detail, "resource"),
            request_id,
        },
        429 => IptuApiError::RateLimit {
            message,
            retry_after: retry_after(headers),
            request_id,
        },
        400 | 422 => IptuApiError::Validation {
            message,
            errors: field_errors(detail.get("errors")),
            status,
            request_id,
        },
        500.. => IptuApiError::Server {
            message,
            status,
            request_id,
        },
        _ => IptuApiError::Api {
            message,
            status,
            request_id,
        },
    }
}

pub(crate) fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// `detail`, then `message`, then the raw body, then a fixed fallback.
fn resolve_message(detail: &Map<String, JsonValue>, body: &str) -> String {
    ["detail", "message"]
        .iter()
        .find_map(|key| match detail.get(*key) {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some(render(value)),
        })
        .or_else(|| {
            let raw = body.trim();
            (!raw.is_empty()).then(|| raw.to_owned())
        })
        .unwrap_or_else(|| UNKNOWN_ERROR.to_owned())
}

fn string_field(detail: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match detail.get(key)? {
        JsonValue::Null => None,
        value => Some(render(value)),
    }
}

fn field_errors(value: Option<&JsonValue>) -> FieldErrors {
    let Some(JsonValue::Object(fields)) = value else {
        return FieldErrors::new();
    };

    fields
        .iter()
        .map(|(field, messages)| {
            let messages = match messages {
                JsonValue::Array(items) => items.iter().map(render).collect(),
                JsonValue::Null => Vec::new(),
                other => vec![render(other)],
            };
            (field.clone(), messages)
        })
        .collect()
}

fn render(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}
