use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};

use crate::error::QueueError;
use crate::list::{Link, Ring, RingError, SafeCursor};
use crate::sort::{self, ListSort};

/// A double-ended queue of owned strings on top of a circular doubly linked ring.
///
/// Slot 0 of the arena is the sentinel. Removing an element hands its string to the caller as an
/// [`Element`]; dropping the queue releases everything still in it.
pub struct Queue {
    pub(crate) ring: Ring<String>,
    pub(crate) head: usize,
}

/// An element removed from a queue. It owns the string that was stored in the queue.
#[must_use = "a removed element owns its value, release or consume it"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    value: String,
}

impl Element {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> String {
        self.value
    }

    pub fn release(self) {}
}

impl Queue {
    pub fn new() -> Result<Self, QueueError> {
        let mut ring = Ring::new();
        let head = ring.alloc_head()?;
        Ok(Queue { ring, head })
    }

    /// Builds a queue holding `values` in iteration order.
    pub fn from_values<I, S>(values: I) -> Result<Self, QueueError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut queue = Queue::new()?;
        for value in values {
            queue.insert_tail(value.as_ref())?;
        }
        Ok(queue)
    }

    /// Copies `s` into a fresh, still unlinked element node. Nothing is changed on failure.
    fn new_element(&mut self, s: &str) -> Result<usize, QueueError> {
        let mut value = String::new();
        if let Err(err) = value.try_reserve_exact(s.len()) {
            debug!("failed to copy a {} byte value: {err}", s.len());
            return Err(err.into());
        }
        value.push_str(s);

        let node = self.ring.alloc(value).map_err(|err| {
            debug!("failed to allocate an element node: {err}");
            err
        })?;
        Ok(node)
    }

    pub fn insert_head(&mut self, s: &str) -> Result<(), QueueError> {
        let node = self.new_element(s)?;
        self.ring.insert_after(self.head, node);
        Ok(())
    }

    pub fn insert_tail(&mut self, s: &str) -> Result<(), QueueError> {
        let node = self.new_element(s)?;
        self.ring.insert_before(self.head, node);
        Ok(())
    }

    fn detach(&mut self, node: usize, sp: Option<&mut [u8]>) -> Element {
        self.ring.unlink(node);
        let Some(value) = self.ring.release(node) else {
            unreachable!("element {node} without a value");
        };
        if let Some(sp) = sp {
            copy_value(&value, sp);
        }
        Element { value }
    }

    /// Removes the first element. If `sp` is given, up to `sp.len() - 1` bytes of the value are
    /// copied into it followed by a NUL byte.
    pub fn remove_head(&mut self, sp: Option<&mut [u8]>) -> Result<Element, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        let node = self.ring.next(self.head);
        Ok(self.detach(node, sp))
    }

    /// Same as [`Queue::remove_head`] for the last element.
    pub fn remove_tail(&mut self, sp: Option<&mut [u8]>) -> Result<Element, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        let node = self.ring.prev(self.head);
        Ok(self.detach(node, sp))
    }

    fn delete(&mut self, node: usize) {
        self.ring.unlink(node);
        self.ring.release(node);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty(self.head)
    }

    /// Counts the elements. There is no cached length, this walks the whole ring.
    pub fn size(&self) -> usize {
        self.ring.iter(self.head).count()
    }

    pub fn iter(&self) -> Values<'_> {
        Values {
            ring: &self.ring,
            nodes: self.ring.iter(self.head),
        }
    }

    pub fn iter_rev(&self) -> Values<'_> {
        Values {
            ring: &self.ring,
            nodes: self.ring.iter_rev(self.head),
        }
    }

    pub fn validate(&self) -> Result<usize, RingError> {
        self.ring.validate(self.head)
    }

    /// Deletes the element at index `size / 2`.
    pub fn delete_mid(&mut self) -> Result<(), QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }

        let mut fwd = self.ring.next(self.head);
        let mut bwd = self.ring.prev(self.head);
        while fwd != bwd && self.ring.next(fwd) != bwd {
            fwd = self.ring.next(fwd);
            bwd = self.ring.prev(bwd);
        }

        // For even lengths the pointers end up adjacent, `bwd` is the upper middle.
        self.delete(bwd);
        Ok(())
    }

    /// Removes every run of equal values entirely, not keeping a single copy. The queue must be
    /// sorted.
    pub fn delete_dup(&mut self) -> Result<(), QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }

        let mut cursor = SafeCursor::new(&self.ring, self.head);
        let mut in_run = false;
        while let Some(node) = cursor.next(&self.ring) {
            let same_as_next = cursor
                .peek()
                .map_or(false, |next| self.ring.payload(node) == self.ring.payload(next));

            if same_as_next {
                self.delete(node);
                in_run = true;
            } else if in_run {
                // Last member of the run.
                self.delete(node);
                in_run = false;
            }
        }

        Ok(())
    }

    /// Swaps every two adjacent elements. An odd last element stays where it is.
    pub fn swap(&mut self) {
        let mut node = self.ring.next(self.head);
        while node != self.head && self.ring.next(node) != self.head {
            let partner = self.ring.next(node);
            self.ring.move_after(node, partner);
            node = self.ring.next(node);
        }
    }

    pub fn reverse(&mut self) {
        let mut node = self.head;
        loop {
            let Link { next, prev } = self.ring.link(node);
            self.ring.set_link(node, Link { next: prev, prev: next });
            node = next;
            if node == self.head {
                break;
            }
        }
    }

    /// Reverses every full group of `k` elements. A shorter trailing group keeps its order.
    pub fn reverse_k(&mut self, k: usize) -> Result<(), QueueError> {
        if k <= 1 || self.is_empty() {
            return Ok(());
        }

        let groups = self.size() / k;
        if groups == 0 {
            return Ok(());
        }
        trace!("reverse_k: {groups} groups of {k}");

        self.ring.try_reserve(3)?;
        let out = self.ring.alloc_head()?;
        let cut = self.ring.alloc_head()?;
        let group = self.ring.alloc_head()?;

        for _ in 0..groups {
            // Cutting one node at a time off the front and splicing it to the front of `group`
            // builds the group in reverse.
            for _ in 0..k {
                let first = self.ring.next(self.head);
                self.ring.cut_position(cut, self.head, first);
                self.ring.splice_after(cut, group);
            }
            self.ring.splice_before(group, out);
        }
        self.ring.splice_after(out, self.head);

        for side in [out, cut, group] {
            self.ring.release(side);
        }
        Ok(())
    }

    /// Stable ascending sort, reversed afterwards if `descend` is set. With `descend`, equal values
    /// end up in the reverse of their original order.
    pub fn sort(&mut self, descend: bool) {
        self.sort_with::<sort::list_sort::SortImpl>(descend);
    }

    pub fn sort_with<S: ListSort>(&mut self, descend: bool) {
        S::sort_by(&mut self.ring, self.head, |a: &String, b: &String| a.cmp(b));
        if descend {
            self.reverse();
        }
    }

    /// Removes every element that has a strictly smaller one anywhere to its right. Returns the
    /// remaining size, the survivors are in non-decreasing order.
    pub fn ascend(&mut self) -> usize {
        self.retain_monotonic(Ordering::Greater)
    }

    /// Removes every element that has a strictly greater one anywhere to its right. Returns the
    /// remaining size, the survivors are in non-increasing order.
    pub fn descend(&mut self) -> usize {
        self.retain_monotonic(Ordering::Less)
    }

    // The survivors left of the cursor act as a stack with its top right before the current
    // node. The top is popped as long as it compares as `dominated` against the incoming node.
    fn retain_monotonic(&mut self, dominated: Ordering) -> usize {
        let mut len = 0;
        let mut cursor = SafeCursor::new(&self.ring, self.head);
        while let Some(node) = cursor.next(&self.ring) {
            loop {
                let top = self.ring.prev(node);
                if top == self.head {
                    break;
                }
                if self.ring.payload(top).cmp(self.ring.payload(node)) != dominated {
                    break;
                }
                self.delete(top);
                len -= 1;
            }
            len += 1;
        }
        len
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowed traversal over the values of a queue.
pub struct Values<'a> {
    ring: &'a Ring<String>,
    nodes: crate::list::Iter<'a, String>,
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let ring = self.ring;
        self.nodes.next().map(|node| ring.payload(node).as_str())
    }
}

// Same contract as strncpy followed by explicit termination.
fn copy_value(value: &str, sp: &mut [u8]) {
    let Some(max) = sp.len().checked_sub(1) else {
        return;
    };
    let len = value.len().min(max);
    sp[..len].copy_from_slice(&value.as_bytes()[..len]);
    sp[len..].fill(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    #[test]
    fn copy_value_truncates_and_terminates() {
        let mut buf = [0xffu8; 4];
        copy_value("abcdef", &mut buf);
        assert_eq!(&buf, b"abc\0");

        let mut buf = [0xffu8; 6];
        copy_value("ab", &mut buf);
        assert_eq!(&buf, b"ab\0\0\0\0");

        let mut buf = [0u8; 0];
        copy_value("ab", &mut buf);
    }

    #[test]
    fn ascend_descend_keep_monotonic_survivors() {
        let mut queue = Queue::from_values(["5", "2", "13", "3", "8"]).unwrap();
        // Lexicographic order: "13" < "2" < "3" < "5" < "8".
        assert_eq!(queue.ascend(), 3);
        assert_eq!(values(&queue), ["13", "3", "8"]);

        let mut queue = Queue::from_values(["5", "2", "13", "3", "8"]).unwrap();
        assert_eq!(queue.descend(), 1);
        assert_eq!(values(&queue), ["8"]);

        let mut queue = Queue::from_values(["a", "b", "b", "a"]).unwrap();
        assert_eq!(queue.ascend(), 2);
        assert_eq!(values(&queue), ["a", "a"]);
        assert_eq!(queue.validate(), Ok(2));
    }

    #[test]
    fn reverse_k_releases_side_rings() {
        let mut queue = Queue::from_values(["1", "2", "3", "4"]).unwrap();
        queue.reverse_k(2).unwrap();
        assert_eq!(values(&queue), ["2", "1", "4", "3"]);

        // The temporary sentinels went back to the free list, the next element reuses one.
        queue.insert_tail("5").unwrap();
        assert!(queue.ring.value(queue.ring.prev(queue.head)).is_some());
        assert_eq!(queue.validate(), Ok(5));
        assert_eq!(values(&queue), ["2", "1", "4", "3", "5"]);
    }

    #[test]
    fn debug_lists_values() {
        let queue = Queue::from_values(["x", "y"]).unwrap();
        assert_eq!(format!("{queue:?}"), r#"["x", "y"]"#);
    }
}
