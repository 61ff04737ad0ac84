//! Queue entry types and the replay ticket handed back to callers.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::api::response::ApiResponse;

/// Queue errors
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Offline queue is full (capacity {capacity})")]
    Full { capacity: usize },
}

/// Body captured for later replay.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON payload, sent with `Content-Type: application/json`.
    Json(Value),
    /// In-memory multipart upload.
    Multipart(MultipartPayload),
}

/// File upload captured while offline. The bytes are held in memory
/// until replay.
#[derive(Debug, Clone)]
pub struct MultipartPayload {
    pub field_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// A mutating request buffered while offline.
pub struct QueuedRequest {
    /// Stable identifier, for logging and diagnostics.
    pub id: Uuid,
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/trips`.
    pub endpoint: String,
    pub body: Option<RequestBody>,
    pub queued_at: DateTime<Utc>,
    pub(crate) responder: oneshot::Sender<ApiResponse<Value>>,
}

impl std::fmt::Debug for QueuedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedRequest")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .field("queued_at", &self.queued_at)
            .finish_non_exhaustive()
    }
}

/// Handle resolving to the eventual outcome of a queued request.
///
/// Dropping the ticket is allowed; the request is still replayed and
/// its outcome reported, only the per-caller delivery is skipped.
#[derive(Debug)]
pub struct ReplayTicket {
    pub(crate) id: Uuid,
    pub(crate) receiver: oneshot::Receiver<ApiResponse<Value>>,
}

impl ReplayTicket {
    /// Identifier of the queued request this ticket tracks.
    pub fn request_id(&self) -> Uuid {
        self.id
    }

    /// Waits for the replay outcome. Returns `None` when the client was
    /// dropped before the queue was flushed.
    pub async fn outcome(self) -> Option<ApiResponse<Value>> {
        self.receiver.await.ok()
    }
}
