//! Merging several sorted queues into one.

use std::cmp::Ordering;

use log::trace;

use crate::error::QueueError;
use crate::list::NIL;
use crate::queue::Queue;
use crate::sort::{close_chain, merge as merge_runs, merge_final, open_chain};

/// Merges all `queues` into the first one and drops the others, leaving exactly one queue in
/// `queues`. Every input must already be sorted in the requested direction. Returns the size of
/// the merged queue.
///
/// Equal values keep their order within a queue, and values from an earlier queue come before
/// equal values from a later one. On allocation failure `queues` is left untouched.
pub fn merge(queues: &mut Vec<Queue>, descend: bool) -> Result<usize, QueueError> {
    if queues.is_empty() {
        return Err(QueueError::Empty);
    }

    let incoming: usize = queues[1..].iter().map(Queue::size).sum();
    let mut runs: Vec<usize> = Vec::new();
    runs.try_reserve_exact(queues.len())?;
    queues[0].ring.try_reserve(incoming)?;

    let mut rest = queues.split_off(1);
    let target = &mut queues[0];

    let first = open_chain(&mut target.ring, target.head);
    if first != NIL {
        runs.push(first);
    }
    for other in rest.iter_mut() {
        let chain = adopt(target, other)?;
        if chain != NIL {
            runs.push(chain);
        }
    }
    drop(rest);

    let mut compare = |a: &String, b: &String| {
        if descend {
            b.cmp(a)
        } else {
            a.cmp(b)
        }
    };

    // Merge neighbouring runs in rounds, keeping earlier queues on the left.
    while runs.len() > 2 {
        trace!("merge: folding {} runs", runs.len());
        let len = runs.len();
        for i in (0..len).step_by(2) {
            runs[i / 2] = if i + 1 < len {
                merge_runs(&mut target.ring, runs[i], runs[i + 1], &mut compare)
            } else {
                runs[i]
            };
        }
        runs.truncate((len + 1) / 2);
    }

    match runs[..] {
        [] => {}
        [only] => close_chain(&mut target.ring, target.head, target.head, only),
        [a, b] => merge_final(&mut target.ring, target.head, a, b, &mut compare),
        _ => unreachable!(),
    }

    Ok(target.size())
}

/// Moves every value of `other` into a `NIL` terminated chain inside `target`'s arena. Slots for
/// the values must have been reserved.
fn adopt(target: &mut Queue, other: &mut Queue) -> Result<usize, QueueError> {
    let mut first = NIL;
    let mut tail = NIL;

    while let Ok(element) = other.remove_head(None) {
        let node = target.ring.alloc(element.into_value())?;
        target.ring.set_next(node, NIL);
        if tail == NIL {
            first = node;
        } else {
            target.ring.set_next(tail, node);
        }
        tail = node;
    }

    Ok(first)
}

/// Checks that `queue` is ordered the way [`merge`] expects its inputs to be.
pub fn is_sorted(queue: &Queue, descend: bool) -> bool {
    let mut values = queue.iter();
    let Some(mut prev) = values.next() else {
        return true;
    };
    let wrong = if descend {
        Ordering::Less
    } else {
        Ordering::Greater
    };
    for value in values {
        if prev.cmp(value) == wrong {
            return false;
        }
        prev = value;
    }
    true
}
