//! Circular doubly linked list of caret offsets.
//!
//! Nodes live in an arena and link to each other by index. Freed slots are
//! kept on a free list and reused by later inserts. Because the list is a
//! true cycle, every full traversal starts from a captured node and stops
//! when it comes back around to it.

use tracing::debug;

use crate::error::{Error, Result, Source};

#[derive(Debug, Clone)]
struct Node {
    offset: usize,
    next: usize,
    prev: usize,
}

/// Ring of caret offsets with a movable cursor.
#[derive(Debug, Clone, Default)]
pub struct CaretRing {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    current: Option<usize>,
    len: usize,
}

impl CaretRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ring with one node per offset, in order.
    ///
    /// `next` walks forward through `offsets` and wraps from the last back to
    /// the first. The cursor is left on the last offset, so the first
    /// [`move_next`](Self::move_next) lands on the first one.
    pub fn rebuild(&mut self, offsets: &[usize]) {
        self.clear();
        for &offset in offsets {
            self.push_back(offset);
        }
        self.current = self.tail();
        debug!(len = self.len, "caret ring rebuilt");
    }

    /// Like [`rebuild`](Self::rebuild), but rejects any offset past `limit`.
    /// On error the existing ring is left as it was.
    pub fn rebuild_within(&mut self, offsets: &[usize], limit: usize) -> Result<()> {
        if let Some(&offset) = offsets.iter().find(|&&o| o > limit) {
            return Err(Error::InvalidOffset { offset, len: limit });
        }
        self.rebuild(offsets);
        Ok(())
    }

    /// Advance the cursor and return its offset.
    pub fn move_next(&mut self) -> Result<usize> {
        let cur = self.current.ok_or(Error::Empty(Source::Ring))?;
        let next = self.node(cur).next;
        self.current = Some(next);
        Ok(self.node(next).offset)
    }

    /// Step the cursor back and return its offset.
    pub fn move_prev(&mut self) -> Result<usize> {
        let cur = self.current.ok_or(Error::Empty(Source::Ring))?;
        let prev = self.node(cur).prev;
        self.current = Some(prev);
        Ok(self.node(prev).offset)
    }

    /// Offset under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.current.map(|idx| self.node(idx).offset)
    }

    /// Insert `offset` before the head and make it the new head.
    pub fn push_front(&mut self, offset: usize) {
        let idx = self.link_before_head(offset);
        self.head = Some(idx);
    }

    /// Insert `offset` after the last node.
    pub fn push_back(&mut self, offset: usize) {
        self.link_before_head(offset);
    }

    /// Insert `offset` right after the first node holding `key`.
    /// Returns `false` if no node holds `key`.
    pub fn insert_after(&mut self, key: usize, offset: usize) -> bool {
        let Some(at) = self.find(key) else {
            return false;
        };
        let next = self.node(at).next;
        let idx = self.alloc(Node {
            offset,
            next,
            prev: at,
        });
        self.node_mut(at).next = idx;
        self.node_mut(next).prev = idx;
        true
    }

    /// Unlink the first node holding `key` and return its offset.
    ///
    /// If the cursor or head sat on the removed node they move to its
    /// successor.
    pub fn remove(&mut self, key: usize) -> Option<usize> {
        let idx = self.find(key)?;
        self.unlink(idx)
    }

    /// Remove the head node and return its offset. Its successor becomes the
    /// new head.
    pub fn pop_front(&mut self) -> Option<usize> {
        let head = self.head?;
        self.unlink(head)
    }

    /// Remove the last node and return its offset.
    pub fn pop_back(&mut self) -> Option<usize> {
        let tail = self.tail()?;
        self.unlink(tail)
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.current = None;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One lap around the ring starting at the head.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ring: self,
            start: self.head,
            next: self.head,
        }
    }

    fn find(&self, key: usize) -> Option<usize> {
        let start = self.head?;
        let mut idx = start;
        loop {
            if self.node(idx).offset == key {
                return Some(idx);
            }
            idx = self.node(idx).next;
            if idx == start {
                return None;
            }
        }
    }

    fn unlink(&mut self, idx: usize) -> Option<usize> {
        let Node { offset, next, prev } = self.nodes[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        if self.len == 0 {
            self.head = None;
            self.current = None;
            return Some(offset);
        }
        self.node_mut(prev).next = next;
        self.node_mut(next).prev = prev;
        if self.head == Some(idx) {
            self.head = Some(next);
        }
        if self.current == Some(idx) {
            self.current = Some(next);
        }
        Some(offset)
    }

    fn tail(&self) -> Option<usize> {
        self.head.map(|h| self.node(h).prev)
    }

    // Links a new node between the tail and the head. Sets the head when the
    // ring was empty; callers decide whether the new node becomes the head.
    fn link_before_head(&mut self, offset: usize) -> usize {
        match self.head {
            None => {
                let idx = self.alloc(Node {
                    offset,
                    next: 0,
                    prev: 0,
                });
                let node = self.node_mut(idx);
                node.next = idx;
                node.prev = idx;
                self.head = Some(idx);
                self.current = Some(idx);
                idx
            }
            Some(head) => {
                let tail = self.node(head).prev;
                let idx = self.alloc(Node {
                    offset,
                    next: head,
                    prev: tail,
                });
                self.node_mut(tail).next = idx;
                self.node_mut(head).prev = idx;
                idx
            }
        }
    }

    fn alloc(&mut self, node: Node) -> usize {
        self.len += 1;
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn node(&self, idx: usize) -> &Node {
        self.nodes[idx].as_ref().expect("ring links point at live nodes")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node {
        self.nodes[idx].as_mut().expect("ring links point at live nodes")
    }
}

/// Iterator over one lap of a [`CaretRing`].
pub struct Iter<'a> {
    ring: &'a CaretRing,
    start: Option<usize>,
    next: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let idx = self.next?;
        let node = self.ring.node(idx);
        self.next = Some(node.next).filter(|n| Some(*n) != self.start);
        Some(node.offset)
    }
}
