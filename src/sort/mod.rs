//! Merge sorts over rings of a [`Ring`] arena.
//!
//! Both sorters break the ring open into a `NIL` terminated chain linked through `next`, sort
//! that chain, and close it again on the original sentinel, rebuilding every `prev` link on the
//! way. No node is allocated or released while sorting.

use std::cmp::Ordering;

use crate::list::{Ring, NIL};

pub mod list_sort;
pub mod top_down;

pub trait ListSort {
    fn name() -> String;

    /// Sorts the ring anchored at `head`. Must be stable.
    fn sort_by<T, F>(ring: &mut Ring<T>, head: usize, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering;
}

/// Breaks the ring of `head` open. Returns the first node of the resulting chain, or `NIL` if the
/// ring was empty, and leaves `head` as an empty ring.
pub(crate) fn open_chain<T>(ring: &mut Ring<T>, head: usize) -> usize {
    if ring.is_empty(head) {
        return NIL;
    }
    let first = ring.next(head);
    let last = ring.prev(head);
    ring.set_next(last, NIL);
    ring.init(head);
    first
}

/// Merges two non-empty sorted chains into one, using only `next`. On ties the node from `a` goes
/// first, which keeps the merge stable as long as `a` holds the earlier elements.
pub(crate) fn merge<T, F>(ring: &mut Ring<T>, mut a: usize, mut b: usize, compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    debug_assert!(a != NIL && b != NIL);

    let mut head = NIL;
    let mut tail = NIL;

    loop {
        let take_a = compare(ring.payload(a), ring.payload(b)) != Ordering::Greater;
        let node = if take_a { a } else { b };

        if tail == NIL {
            head = node;
        } else {
            ring.set_next(tail, node);
        }
        tail = node;

        if take_a {
            a = ring.next(a);
            if a == NIL {
                ring.set_next(tail, b);
                break;
            }
        } else {
            b = ring.next(b);
            if b == NIL {
                ring.set_next(tail, a);
                break;
            }
        }
    }

    head
}

/// Last merge of a sort. Links the merged result behind `head` with valid `prev` links and closes
/// the ring.
pub(crate) fn merge_final<T, F>(
    ring: &mut Ring<T>,
    head: usize,
    mut a: usize,
    mut b: usize,
    compare: &mut F,
) where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut tail = head;

    loop {
        if compare(ring.payload(a), ring.payload(b)) != Ordering::Greater {
            ring.set_next(tail, a);
            ring.set_prev(a, tail);
            tail = a;
            a = ring.next(a);
            if a == NIL {
                break;
            }
        } else {
            ring.set_next(tail, b);
            ring.set_prev(b, tail);
            tail = b;
            b = ring.next(b);
            if b == NIL {
                b = a;
                break;
            }
        }
    }

    // Whatever is left over is already in order, only the back links are missing.
    close_chain(ring, head, tail, b);
}

/// Appends the chain starting at `chain` behind `tail`, fixing up every `prev`, and closes the
/// ring on `head`.
pub(crate) fn close_chain<T>(ring: &mut Ring<T>, head: usize, mut tail: usize, mut chain: usize) {
    while chain != NIL {
        ring.set_next(tail, chain);
        ring.set_prev(chain, tail);
        tail = chain;
        chain = ring.next(chain);
    }

    ring.set_next(tail, head);
    ring.set_prev(head, tail);
}
