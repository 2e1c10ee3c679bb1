//! Circular doubly linked rings stored in an index arena.
//!
//! Every node, sentinels included, is a slot in one table. A slot carries a [`Link`] made of two
//! slot indices and an optional payload. A ring is identified by its sentinel: an empty ring is a
//! sentinel whose `next` and `prev` are itself. Sentinels never carry a payload.
//!
//! While a ring is broken open into a plain chain (sorting, merging) the end of the chain is
//! marked with [`NIL`].

use std::collections::TryReserveError;

use thiserror::Error;

/// End-of-chain marker used while a ring is temporarily not circular.
pub const NIL: usize = usize::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub next: usize,
    pub prev: usize,
}

impl Link {
    #[inline]
    fn to_self(id: usize) -> Self {
        Link { next: id, prev: id }
    }
}

#[derive(Debug)]
struct Slot<T> {
    link: Link,
    value: Option<T>,
    live: bool,
}

/// Reported by [`Ring::validate`] for the first broken invariant found.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingError {
    #[error("node {0} is out of bounds or was released")]
    Dangling(usize),

    #[error("node {node}: next {next} points back to {back}")]
    BrokenNext { node: usize, next: usize, back: usize },

    #[error("node {node}: prev {prev} points forward to {forward}")]
    BrokenPrev {
        node: usize,
        prev: usize,
        forward: usize,
    },

    #[error("node {0} is reachable twice")]
    Aliased(usize),

    #[error("element {0} has no payload")]
    MissingValue(usize),

    #[error("sentinel {0} carries a payload")]
    SentinelValue(usize),
}

#[derive(Debug)]
pub struct Ring<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Ring<T> {
    pub fn new() -> Self {
        Ring {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Makes sure the next `additional` allocations can not fail.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let reusable = self.free.len();
        if additional > reusable {
            self.slots.try_reserve(additional - reusable)?;
        }
        Ok(())
    }

    fn take_slot(&mut self, value: Option<T>) -> Result<usize, TryReserveError> {
        if let Some(id) = self.free.pop() {
            let slot = &mut self.slots[id];
            slot.link = Link::to_self(id);
            slot.value = value;
            slot.live = true;
            return Ok(id);
        }

        self.slots.try_reserve(1)?;
        let id = self.slots.len();
        self.slots.push(Slot {
            link: Link::to_self(id),
            value,
            live: true,
        });
        Ok(id)
    }

    /// Allocates a sentinel, already initialized as an empty ring.
    pub fn alloc_head(&mut self) -> Result<usize, TryReserveError> {
        self.take_slot(None)
    }

    /// Allocates a free element node. It links to itself until it is inserted somewhere.
    pub fn alloc(&mut self, value: T) -> Result<usize, TryReserveError> {
        self.take_slot(Some(value))
    }

    /// Returns the slot to the free list and hands back its payload.
    ///
    /// The node must not be part of any ring anymore.
    pub fn release(&mut self, id: usize) -> Option<T> {
        let slot = &mut self.slots[id];
        debug_assert!(slot.live, "double release of node {id}");
        slot.live = false;
        self.free.push(id);
        slot.value.take()
    }

    #[inline]
    pub fn value(&self, id: usize) -> Option<&T> {
        self.slots[id].value.as_ref()
    }

    /// Payload of an element node. Sentinels have none, asking for it is a logic error.
    #[inline]
    pub fn payload(&self, id: usize) -> &T {
        match self.slots[id].value.as_ref() {
            Some(value) => value,
            None => unreachable!("node {id} has no payload"),
        }
    }

    #[inline]
    pub fn link(&self, id: usize) -> Link {
        self.slots[id].link
    }

    #[inline]
    pub fn set_link(&mut self, id: usize, link: Link) {
        self.slots[id].link = link;
    }

    #[inline]
    pub fn next(&self, id: usize) -> usize {
        self.slots[id].link.next
    }

    #[inline]
    pub fn prev(&self, id: usize) -> usize {
        self.slots[id].link.prev
    }

    #[inline]
    pub fn set_next(&mut self, id: usize, next: usize) {
        self.slots[id].link.next = next;
    }

    #[inline]
    pub fn set_prev(&mut self, id: usize, prev: usize) {
        self.slots[id].link.prev = prev;
    }

    pub fn init(&mut self, head: usize) {
        self.set_link(head, Link::to_self(head));
    }

    #[inline]
    pub fn is_empty(&self, head: usize) -> bool {
        self.next(head) == head
    }

    /// Exactly one element.
    #[inline]
    pub fn is_singular(&self, head: usize) -> bool {
        !self.is_empty(head) && self.next(head) == self.prev(head)
    }

    #[inline]
    fn link_between(&mut self, node: usize, prev: usize, next: usize) {
        self.set_prev(next, node);
        self.set_link(node, Link { next, prev });
        self.set_next(prev, node);
    }

    pub fn insert_after(&mut self, pos: usize, node: usize) {
        let next = self.next(pos);
        self.link_between(node, pos, next);
    }

    pub fn insert_before(&mut self, pos: usize, node: usize) {
        let prev = self.prev(pos);
        self.link_between(node, prev, pos);
    }

    /// Takes `node` out of its ring. Its own link is left stale.
    pub fn unlink(&mut self, node: usize) {
        let Link { next, prev } = self.link(node);
        self.set_next(prev, next);
        self.set_prev(next, prev);
    }

    pub fn move_after(&mut self, node: usize, pos: usize) {
        self.unlink(node);
        self.insert_after(pos, node);
    }

    pub fn move_before(&mut self, node: usize, pos: usize) {
        self.unlink(node);
        self.insert_before(pos, node);
    }

    fn splice_between(&mut self, src: usize, prev: usize, next: usize) {
        let first = self.next(src);
        let last = self.prev(src);

        self.set_prev(first, prev);
        self.set_next(prev, first);

        self.set_next(last, next);
        self.set_prev(next, last);
    }

    /// Moves the whole body of `src` right behind `pos`. `src` is left empty.
    pub fn splice_after(&mut self, src: usize, pos: usize) {
        if self.is_empty(src) {
            return;
        }
        let next = self.next(pos);
        self.splice_between(src, pos, next);
        self.init(src);
    }

    /// Moves the whole body of `src` right before `pos`. `src` is left empty.
    pub fn splice_before(&mut self, src: usize, pos: usize) {
        if self.is_empty(src) {
            return;
        }
        let prev = self.prev(pos);
        self.splice_between(src, prev, pos);
        self.init(src);
    }

    /// Moves the prefix of `src` that ends with `node` into `dst`, replacing whatever `dst`
    /// held. `node == src` cuts nothing and only re-initializes `dst`.
    pub fn cut_position(&mut self, dst: usize, src: usize, node: usize) {
        if self.is_empty(src) {
            return;
        }
        if self.is_singular(src) && self.next(src) != node && node != src {
            return;
        }
        if node == src {
            self.init(dst);
            return;
        }

        let first = self.next(src);
        let rest = self.next(node);

        self.set_link(dst, Link { next: first, prev: node });
        self.set_prev(first, dst);
        self.set_next(node, dst);

        self.set_next(src, rest);
        self.set_prev(rest, src);
    }

    pub fn iter(&self, head: usize) -> Iter<'_, T> {
        Iter {
            ring: self,
            head,
            cur: self.next(head),
            rev: false,
        }
    }

    pub fn iter_rev(&self, head: usize) -> Iter<'_, T> {
        Iter {
            ring: self,
            head,
            cur: self.prev(head),
            rev: true,
        }
    }

    /// Walks the ring of `head` and checks mutual link agreement, payload presence and that no
    /// node shows up twice. Returns the element count.
    pub fn validate(&self, head: usize) -> Result<usize, RingError> {
        let mut seen = vec![false; self.slots.len()];
        let mut len = 0;
        let mut node = head;

        loop {
            let slot = self.slots.get(node).filter(|slot| slot.live);
            let Some(slot) = slot else {
                return Err(RingError::Dangling(node));
            };
            if std::mem::replace(&mut seen[node], true) {
                return Err(RingError::Aliased(node));
            }

            match (node == head, slot.value.is_some()) {
                (true, true) => return Err(RingError::SentinelValue(node)),
                (false, false) => return Err(RingError::MissingValue(node)),
                _ => {}
            }

            let Link { next, prev } = slot.link;
            for id in [next, prev] {
                if !self.slots.get(id).map_or(false, |slot| slot.live) {
                    return Err(RingError::Dangling(id));
                }
            }

            let back = self.prev(next);
            if back != node {
                return Err(RingError::BrokenNext { node, next, back });
            }
            let forward = self.next(prev);
            if forward != node {
                return Err(RingError::BrokenPrev {
                    node,
                    prev,
                    forward,
                });
            }

            if next == head {
                return Ok(len);
            }
            len += 1;
            node = next;
        }
    }
}

/// Lazy traversal of one ring, from the sentinel back to itself. Yields node ids.
pub struct Iter<'a, T> {
    ring: &'a Ring<T>,
    head: usize,
    cur: usize,
    rev: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cur == self.head {
            return None;
        }
        let node = self.cur;
        self.cur = if self.rev {
            self.ring.prev(node)
        } else {
            self.ring.next(node)
        };
        Some(node)
    }
}

/// Forward traversal that does not borrow the ring.
///
/// The successor is captured before a node is yielded, so the yielded node may be unlinked or
/// released before asking for the next one. Anything else must stay untouched.
#[derive(Debug, Clone, Copy)]
pub struct SafeCursor {
    head: usize,
    next: usize,
}

impl SafeCursor {
    pub fn new<T>(ring: &Ring<T>, head: usize) -> Self {
        SafeCursor {
            head,
            next: ring.next(head),
        }
    }

    pub fn next<T>(&mut self, ring: &Ring<T>) -> Option<usize> {
        if self.next == self.head {
            return None;
        }
        let node = self.next;
        self.next = ring.next(node);
        Some(node)
    }

    /// The captured successor of the last yielded node, `None` at the end of the ring.
    pub fn peek(&self) -> Option<usize> {
        (self.next != self.head).then_some(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_of(values: &[u32]) -> (Ring<u32>, usize) {
        let mut ring = Ring::new();
        let head = ring.alloc_head().unwrap();
        for &val in values {
            let node = ring.alloc(val).unwrap();
            ring.insert_before(head, node);
        }
        (ring, head)
    }

    fn collect(ring: &Ring<u32>, head: usize) -> Vec<u32> {
        ring.iter(head).map(|node| *ring.payload(node)).collect()
    }

    #[test]
    fn empty_ring() {
        let (ring, head) = ring_of(&[]);
        assert!(ring.is_empty(head));
        assert!(!ring.is_singular(head));
        assert_eq!(ring.validate(head), Ok(0));
        assert_eq!(ring.iter(head).count(), 0);
    }

    #[test]
    fn insert_unlink() {
        let (mut ring, head) = ring_of(&[1, 2, 3]);
        assert_eq!(collect(&ring, head), [1, 2, 3]);

        let second = ring.iter(head).nth(1).unwrap();
        ring.unlink(second);
        assert_eq!(ring.release(second), Some(2));
        assert_eq!(collect(&ring, head), [1, 3]);
        assert_eq!(ring.validate(head), Ok(2));

        // The released slot is reused.
        let node = ring.alloc(7).unwrap();
        assert_eq!(node, second);
        ring.insert_after(head, node);
        assert_eq!(collect(&ring, head), [7, 1, 3]);
        let rev: Vec<u32> = ring.iter_rev(head).map(|n| *ring.payload(n)).collect();
        assert_eq!(rev, [3, 1, 7]);
    }

    #[test]
    fn cut_and_splice() {
        let (mut ring, head) = ring_of(&[1, 2, 3, 4, 5]);
        let side = ring.alloc_head().unwrap();

        let third = ring.iter(head).nth(2).unwrap();
        ring.cut_position(side, head, third);
        assert_eq!(collect(&ring, side), [1, 2, 3]);
        assert_eq!(collect(&ring, head), [4, 5]);
        assert_eq!(ring.validate(side), Ok(3));
        assert_eq!(ring.validate(head), Ok(2));

        ring.splice_before(side, head);
        assert_eq!(collect(&ring, head), [4, 5, 1, 2, 3]);
        assert!(ring.is_empty(side));

        let first = ring.next(head);
        ring.cut_position(side, head, first);
        ring.splice_after(side, ring.prev(head));
        assert_eq!(collect(&ring, head), [5, 1, 2, 3, 4]);
        assert_eq!(ring.validate(head), Ok(5));
    }

    #[test]
    fn safe_cursor_allows_release() {
        let (mut ring, head) = ring_of(&[1, 2, 3, 4]);
        let mut cursor = SafeCursor::new(&ring, head);
        while let Some(node) = cursor.next(&ring) {
            if ring.payload(node) % 2 == 0 {
                ring.unlink(node);
                ring.release(node);
            }
        }
        assert_eq!(collect(&ring, head), [1, 3]);
        assert_eq!(ring.validate(head), Ok(2));
    }

    #[test]
    fn validate_detects_broken_links() {
        let (mut ring, head) = ring_of(&[1, 2, 3]);
        let first = ring.next(head);
        ring.set_prev(first, first);
        assert!(matches!(
            ring.validate(head),
            Err(RingError::BrokenNext { .. })
        ));

        let (mut ring, head) = ring_of(&[1, 2, 3]);
        let first = ring.next(head);
        let last = ring.prev(head);
        // Route the last node back into the first one, leaving the sentinel out of the loop.
        ring.set_next(last, first);
        assert!(ring.validate(head).is_err());
    }
}
