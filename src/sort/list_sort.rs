//! Bottom-up merge sort driven by a binary counter, the production sorter.
//!
//! Sorted runs waiting to be merged ("pending") are kept in a stack linked through `prev`, each run
//! itself being a `NIL` terminated chain linked through `next`. Before a node is pushed, two equally
//! sized runs may be merged, chosen by the low bits of `count`:
//!
//! ```text
//! count  pending run sizes (top first)
//!   1    1
//!   2    1 1
//!   3    1 2       <- the two 1s were merged before pushing the third node
//!   4    1 1 2
//!   5    1 2 2
//!   6    1 1 4
//!   7    1 2 4
//! ```
//!
//! Runs therefore stay powers of two, only equally sized runs are merged while consuming input
//! and the stack never holds more than log2(n) + 1 runs. This is the scheme the Linux kernel
//! uses for `list_sort`.

use std::cmp::Ordering;

use log::trace;

use crate::list::{Ring, NIL};
use crate::sort::{merge, merge_final, open_chain};

sort_impl!("list_sort_bottom_up");

pub fn sort_by<T, F>(ring: &mut Ring<T>, head: usize, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if ring.next(head) == ring.prev(head) {
        // Zero or one element.
        return;
    }

    let mut list = open_chain(ring, head);
    let mut pending = NIL;
    let mut count: usize = 0;

    loop {
        // Find the slot holding the run that is merged with the one below it. `owner` is the node
        // whose `prev` refers to that slot, `None` means the `pending` variable itself.
        let mut bits = count;
        let mut owner = None;
        let mut slot = pending;
        while bits & 1 == 1 {
            owner = Some(slot);
            slot = ring.prev(slot);
            bits >>= 1;
        }

        if bits != 0 {
            let a = slot;
            let b = ring.prev(a);
            let below = ring.prev(b);

            let merged = merge(ring, b, a, &mut compare);
            ring.set_prev(merged, below);
            match owner {
                Some(owner) => ring.set_prev(owner, merged),
                None => pending = merged,
            }
        }

        // Push the next node as a run of one.
        let next = ring.next(list);
        ring.set_prev(list, pending);
        ring.set_next(list, NIL);
        pending = list;
        list = next;
        count += 1;

        if list == NIL {
            break;
        }
    }

    trace!("list_sort: {count} nodes consumed, merging pending runs");

    // Merge all remaining runs, from the newest (smallest) to the oldest.
    let mut list = pending;
    let mut pending = ring.prev(pending);
    loop {
        let next = ring.prev(pending);
        if next == NIL {
            break;
        }
        list = merge(ring, pending, list, &mut compare);
        pending = next;
    }

    merge_final(ring, head, pending, list, &mut compare);
}
