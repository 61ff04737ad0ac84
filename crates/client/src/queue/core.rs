//! Bounded FIFO queue for mutating requests issued while offline.
//!
//! The queue only stores entries; replay goes through the orchestrator
//! (`ApiClient::flush`), so replayed requests get the same auth, retry,
//! and classification treatment as live ones.

use std::collections::VecDeque;

use chrono::Utc;
use reqwest::Method;
use tokio::sync::{oneshot, Mutex};
use tracing::debug;
use uuid::Uuid;

use super::types::{QueueError, QueuedRequest, ReplayTicket, RequestBody};

/// FIFO buffer of mutating requests awaiting connectivity.
pub struct OfflineQueue {
    entries: Mutex<VecDeque<QueuedRequest>>,
    capacity: usize,
}

impl OfflineQueue {
    /// Creates an empty queue holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { entries: Mutex::new(VecDeque::new()), capacity }
    }

    /// Buffers a request for replay, preserving submission order.
    ///
    /// Returns a [`ReplayTicket`] resolving to the replay outcome, or
    /// [`QueueError::Full`] when the capacity bound is reached (the
    /// request is rejected, not evicted in favor of older entries).
    pub async fn enqueue(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
    ) -> Result<ReplayTicket, QueueError> {
        let mut entries = self.entries.lock().await;
        if entries.len() >= self.capacity {
            return Err(QueueError::Full { capacity: self.capacity });
        }

        let id = Uuid::new_v4();
        let (responder, receiver) = oneshot::channel();
        entries.push_back(QueuedRequest {
            id,
            method,
            endpoint: endpoint.to_string(),
            body,
            queued_at: Utc::now(),
            responder,
        });
        debug!(%id, endpoint, depth = entries.len(), "Request queued for offline replay");

        Ok(ReplayTicket { id, receiver })
    }

    /// Removes and returns all entries in submission order.
    pub async fn drain(&self) -> Vec<QueuedRequest> {
        self.entries.lock().await.drain(..).collect()
    }

    /// Number of buffered entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the queue holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
