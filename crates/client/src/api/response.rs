//! Uniform response envelope returned by every client operation.

use wayfarer_common::ApiError;

/// Result of an API operation. Exactly one of `data` or `error` is
/// populated, matching the `success` flag.
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// Whether the operation completed successfully.
    pub success: bool,
    /// Decoded payload, present on success.
    pub data: Option<T>,
    /// Classified error, present on failure.
    pub error: Option<ApiError>,
    /// Optional human-readable note, e.g. a backend status message.
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Builds a successful response wrapping the decoded payload.
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, message: None }
    }

    /// Builds a failed response wrapping a classified error.
    pub fn fail(error: ApiError) -> Self {
        Self { success: false, data: None, error: Some(error), message: None }
    }

    /// Attaches a human-readable note to the envelope.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Converts the envelope into a `Result`, for callers that prefer
    /// `?` over inspecting the flag.
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err(ApiError::unknown("Response carried neither data nor error")),
        }
    }
}
