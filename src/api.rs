//! Handle based surface for drivers that track queues as possibly absent handles.
//!
//! Every function accepts `None` where a queue is expected and then does nothing, returning
//! `false`, `None` or `0`. Errors are collapsed the same way: an empty queue and a failed
//! allocation look identical here. Use the [`Queue`] methods directly to tell them apart.

use crate::error::QueueError;
use crate::merge;
use crate::queue::{Element, Queue};

pub fn new() -> Option<Queue> {
    Queue::new().ok()
}

pub fn free(queue: Option<Queue>) {
    drop(queue);
}

pub fn insert_head(queue: Option<&mut Queue>, s: &str) -> bool {
    queue.map_or(false, |queue| queue.insert_head(s).is_ok())
}

pub fn insert_tail(queue: Option<&mut Queue>, s: &str) -> bool {
    queue.map_or(false, |queue| queue.insert_tail(s).is_ok())
}

pub fn remove_head(queue: Option<&mut Queue>, sp: Option<&mut [u8]>) -> Option<Element> {
    queue?.remove_head(sp).ok()
}

pub fn remove_tail(queue: Option<&mut Queue>, sp: Option<&mut [u8]>) -> Option<Element> {
    queue?.remove_tail(sp).ok()
}

pub fn release(element: Option<Element>) {
    if let Some(element) = element {
        element.release();
    }
}

pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::size)
}

pub fn delete_mid(queue: Option<&mut Queue>) -> bool {
    queue.map_or(false, |queue| queue.delete_mid().is_ok())
}

pub fn delete_dup(queue: Option<&mut Queue>) -> bool {
    queue.map_or(false, |queue| queue.delete_dup().is_ok())
}

pub fn swap(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.swap();
    }
}

pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

/// `k` below 2 leaves the queue as it is.
pub fn reverse_k(queue: Option<&mut Queue>, k: i32) {
    let (Some(queue), Ok(k)) = (queue, usize::try_from(k)) else {
        return;
    };
    // Failing to allocate the temporary sentinels leaves the queue untouched.
    let _ = queue.reverse_k(k);
}

pub fn sort(queue: Option<&mut Queue>, descend: bool) {
    if let Some(queue) = queue {
        queue.sort(descend);
    }
}

/// Returns the number of remaining elements.
pub fn ascend(queue: Option<&mut Queue>) -> usize {
    queue.map_or(0, Queue::ascend)
}

/// Returns the number of remaining elements.
pub fn descend(queue: Option<&mut Queue>) -> usize {
    queue.map_or(0, Queue::descend)
}

/// Returns the size of the merged queue, which is the only one left in `queues`.
pub fn merge(queues: &mut Vec<Queue>, descend: bool) -> usize {
    merge::merge(queues, descend).unwrap_or(0)
}

/// Turns a possibly absent handle into a `Result` for callers that prefer `?`.
pub fn handle(queue: Option<&mut Queue>) -> Result<&mut Queue, QueueError> {
    queue.ok_or(QueueError::InvalidHandle)
}
