//! Maps HTTP statuses and transport failures onto the error taxonomy.
//!
//! The mapping is fixed: 400 becomes a validation error (with field
//! errors parsed from the body when present), 401 authentication, 403
//! authorization, 408 and 504 timeouts, the remaining 5xx server
//! errors, and everything else unknown.

use reqwest::StatusCode;
use serde::Deserialize;
use wayfarer_common::{ApiError, FieldError};

/// Message fragments that identify a transport-level network failure
/// when the error source gives no structured signal.
const NETWORK_ERROR_SIGNATURES: [&str; 4] =
    ["connection", "dns", "network", "failed to lookup"];

/// Lenient view of the backend's error body. Fields the backend omits
/// simply stay empty.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    #[serde(default)]
    errors: Vec<WireFieldError>,
}

#[derive(Debug, Deserialize)]
struct WireFieldError {
    field: String,
    message: String,
}

/// Classifies a non-2xx response into an [`ApiError`].
///
/// `body` is the raw response text; it is parsed for a structured error
/// payload but never required to contain one.
pub fn classify_status(status: StatusCode, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.unwrap_or_else(|| status.as_u16().to_string());

    let error = match status.as_u16() {
        400 => {
            let fields = parsed
                .errors
                .into_iter()
                .map(|e| FieldError { field: e.field, message: e.message })
                .collect();
            ApiError::validation(
                parsed.message.unwrap_or_else(|| "Request validation failed".to_string()),
                fields,
            )
        }
        401 => ApiError::authentication(
            parsed.message.unwrap_or_else(|| "Authentication required".to_string()),
        ),
        403 => ApiError::authorization(
            parsed.message.unwrap_or_else(|| "Access denied".to_string()),
        ),
        408 | 504 => ApiError::timeout(
            parsed.message.unwrap_or_else(|| "Request timed out".to_string()),
        ),
        500..=599 => ApiError::server(
            parsed.message.unwrap_or_else(|| "Server error".to_string()),
        ),
        _ => ApiError::unknown(
            parsed.message.unwrap_or_else(|| format!("Unexpected status {status}")),
        ),
    };

    error.with_code(code)
}

/// Classifies a transport failure (the request never produced a
/// response) into an [`ApiError`].
pub fn classify_transport(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        return ApiError::timeout("Request timed out").with_source(error);
    }
    if error.is_connect() {
        return ApiError::network("Failed to reach the server").with_source(error);
    }

    let message = error.to_string().to_lowercase();
    if NETWORK_ERROR_SIGNATURES.iter().any(|sig| message.contains(sig)) {
        return ApiError::network("Network request failed").with_source(error);
    }

    ApiError::unknown("Request failed before a response was received").with_source(error)
}
