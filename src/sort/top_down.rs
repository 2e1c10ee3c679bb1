//! Recursive top-down merge sort. Kept as an alternative to [`list_sort`](super::list_sort), it
//! walks every level of the recursion to find the middle and therefore does noticeably more
//! pointer chasing.

use std::cmp::Ordering;

use crate::list::{Ring, NIL};
use crate::sort::{close_chain, merge, open_chain};

sort_impl!("top_down_recursive");

pub fn sort_by<T, F>(ring: &mut Ring<T>, head: usize, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if ring.next(head) == ring.prev(head) {
        return;
    }

    let chain = open_chain(ring, head);
    let sorted = msort(ring, chain, &mut compare);
    close_chain(ring, head, head, sorted);
}

fn msort<T, F>(ring: &mut Ring<T>, list: usize, compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    if list == NIL || ring.next(list) == NIL {
        return list;
    }

    // `slow` stops at the last node of the left half.
    let mut slow = list;
    let mut fast = ring.next(list);
    while fast != NIL && ring.next(fast) != NIL {
        slow = ring.next(slow);
        fast = ring.next(ring.next(fast));
    }

    let mid = ring.next(slow);
    ring.set_next(slow, NIL);

    let left = msort(ring, list, compare);
    let right = msort(ring, mid, compare);
    merge(ring, left, right, compare)
}
