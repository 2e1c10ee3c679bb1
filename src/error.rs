use std::collections::TryReserveError;

use thiserror::Error;

/// Failure reasons of the fallible [`Queue`](crate::queue::Queue) operations.
///
/// Every operation returning one of these leaves the queue exactly as it was before the call.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The operation needs at least one element.
    #[error("queue is empty")]
    Empty,

    /// A node slot or the copy of the payload could not be allocated.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// No live queue was supplied.
    #[error("invalid queue handle")]
    InvalidHandle,
}

impl QueueError {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, QueueError::Empty)
    }
}
