// Offline queue: bounded FIFO buffering of mutating requests while the
// device has no connectivity

pub mod core;
pub mod types;

pub use core::OfflineQueue;
pub use types::{MultipartPayload, QueueError, QueuedRequest, ReplayTicket, RequestBody};
