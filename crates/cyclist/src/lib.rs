//! Cyclic doubly-linked rings, many per pool, backed by one arena.
//!
//! # Structure
//!
//! A [`RingPool`] owns every node of every ring it manages.  Nodes live in a
//! flat `Vec` and are addressed by [`NodeIx`]; rings are addressed by
//! [`RingIx`].  A node index plays the role an iterator plays in a
//! pointer-based list: it stays valid while the node is linked into *some*
//! ring, even if a splice has moved it to a different ring than the one it
//! was created in.
//!
//! # Donating splice
//!
//! [`RingPool::splice`] moves the open arc `(first, last)` out of a source
//! ring and into a destination ring.  Two fresh nodes carrying copies of
//! `first`'s and `last`'s values bracket the relocated arc, the donor ring
//! re-closes from `first` directly to `last`, and the donor's head is reset
//! to `first`.  Both endpoints therefore remain addressable in the donor
//! *and* appear (as copies) in the recipient, which is exactly what a
//! rotation-system surgery needs when the endpoints identify the corners of
//! the cut on both sides.
//!
//! # Head and traversal
//!
//! Every non-empty ring has a distinguished *head* node.  Iteration starts
//! at the head and stops after coming back around to it; there is no
//! separate end sentinel.  Callers that want a linear list with an explicit
//! end position (the usual `std::list` shape) allocate one sentinel node
//! themselves and never remove it.

use std::fmt;

/// Index of a ring within a [`RingPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RingIx(pub usize);

impl fmt::Display for RingIx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RingIx({})", self.0)
    }
}

/// Index of a node within a [`RingPool`]; the stable analogue of a
/// list iterator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIx(pub usize);

impl fmt::Display for NodeIx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeIx({})", self.0)
    }
}

#[derive(Clone, Debug)]
struct Node<T> {
    prev: usize,
    next: usize,
    value: T,
}

/// An arena of cyclic doubly-linked rings.
///
/// Unlinked nodes are not reclaimed; a pool is sized for one algorithm run
/// and dropped whole.
#[derive(Clone, Debug, Default)]
pub struct RingPool<T> {
    nodes: Vec<Node<T>>,
    heads: Vec<Option<usize>>,
}

impl<T> RingPool<T> {
    /// Create an empty pool with no rings.
    pub fn new() -> Self {
        Self { nodes: Vec::new(), heads: Vec::new() }
    }

    /// Create an empty pool with room for `nodes` nodes and `rings` rings.
    pub fn with_capacity(rings: usize, nodes: usize) -> Self {
        Self { nodes: Vec::with_capacity(nodes), heads: Vec::with_capacity(rings) }
    }

    /// Number of rings ever created (rings are never destroyed).
    #[inline] pub fn num_rings(&self) -> usize { self.heads.len() }

    /// Create a new empty ring.
    pub fn ring(&mut self) -> RingIx {
        let id = RingIx(self.heads.len());
        self.heads.push(None);
        id
    }

    /// Create a new ring holding `values` in order.
    pub fn ring_from_iter<I: IntoIterator<Item = T>>(&mut self, values: I) -> RingIx {
        let ring = self.ring();
        for value in values {
            self.push_back(ring, value);
        }
        ring
    }

    #[inline]
    fn alloc(&mut self, value: T) -> usize {
        let ix = self.nodes.len();
        self.nodes.push(Node { prev: ix, next: ix, value });
        ix
    }

    /// True if `ring` has no linked nodes.
    #[inline] pub fn is_empty(&self, ring: RingIx) -> bool { self.heads[ring.0].is_none() }

    /// The head node of `ring`, if any.
    #[inline] pub fn head(&self, ring: RingIx) -> Option<NodeIx> { self.heads[ring.0].map(NodeIx) }

    /// The node just before the head (the "back" of the ring), if any.
    #[inline]
    pub fn back(&self, ring: RingIx) -> Option<NodeIx> {
        self.heads[ring.0].map(|h| NodeIx(self.nodes[h].prev))
    }

    /// Number of linked nodes in `ring`.  O(len).
    pub fn len(&self, ring: RingIx) -> usize {
        self.iter_nodes(ring).count()
    }

    /// Value stored at `node`.
    #[inline] pub fn value(&self, node: NodeIx) -> &T { &self.nodes[node.0].value }

    /// Mutable value stored at `node`.
    #[inline] pub fn value_mut(&mut self, node: NodeIx) -> &mut T { &mut self.nodes[node.0].value }

    /// Node after `node` in its ring (wraps around).
    #[inline] pub fn next(&self, node: NodeIx) -> NodeIx { NodeIx(self.nodes[node.0].next) }

    /// Node before `node` in its ring (wraps around).
    #[inline] pub fn prev(&self, node: NodeIx) -> NodeIx { NodeIx(self.nodes[node.0].prev) }

    /// Append `value` at the back of `ring` (just before the head).
    /// A first push makes the new node the head.
    pub fn push_back(&mut self, ring: RingIx, value: T) -> NodeIx {
        let new = self.alloc(value);
        match self.heads[ring.0] {
            None => self.heads[ring.0] = Some(new),
            Some(head) => {
                let back = self.nodes[head].prev;
                self.nodes[new].prev = back;
                self.nodes[new].next = head;
                self.nodes[back].next = new;
                self.nodes[head].prev = new;
            }
        }
        NodeIx(new)
    }

    /// Prepend `value` to `ring`; the new node becomes the head.
    pub fn push_front(&mut self, ring: RingIx, value: T) -> NodeIx {
        let new = self.push_back(ring, value);
        self.heads[ring.0] = Some(new.0);
        new
    }

    /// Insert `value` immediately before `pos`.  Inserting before the head
    /// places the new node at the back; the head does not change.
    pub fn insert_before(&mut self, ring: RingIx, pos: NodeIx, value: T) -> NodeIx {
        if self.heads[ring.0].is_none() {
            return self.push_back(ring, value);
        }
        let new = self.alloc(value);
        let next = pos.0;
        let prev = self.nodes[next].prev;
        self.nodes[prev].next = new;
        self.nodes[new].prev = prev;
        self.nodes[new].next = next;
        self.nodes[next].prev = new;
        NodeIx(new)
    }

    /// Make `node` the head of `ring` without relinking anything.
    #[inline]
    pub fn set_head(&mut self, ring: RingIx, node: NodeIx) {
        self.heads[ring.0] = Some(node.0);
    }

    /// Unlink `node` from `ring`.  If it was the head, its successor
    /// becomes the head (or the ring becomes empty).
    pub fn remove(&mut self, ring: RingIx, node: NodeIx) {
        let Node { prev, next, .. } = self.nodes[node.0];
        if next == node.0 {
            self.heads[ring.0] = None;
        } else {
            self.nodes[prev].next = next;
            self.nodes[next].prev = prev;
            if self.heads[ring.0] == Some(node.0) {
                self.heads[ring.0] = Some(next);
            }
        }
    }

    /// Unlink every node of `ring`.  The nodes stay in the arena.
    #[inline]
    pub fn clear(&mut self, ring: RingIx) {
        self.heads[ring.0] = None;
    }

    /// Iterate the node indices of `ring`, head first, one full cycle.
    pub fn iter_nodes(&self, ring: RingIx) -> NodeIter<'_, T> {
        NodeIter { pool: self, head: self.heads[ring.0], cursor: self.heads[ring.0] }
    }

    /// Iterate the values of `ring`, head first, one full cycle.
    pub fn iter(&self, ring: RingIx) -> impl Iterator<Item = &T> {
        self.iter_nodes(ring).map(move |n| self.value(n))
    }
}

impl<T: Clone> RingPool<T> {
    /// Move the open arc `(first, last)` out of `src` and into `dst`
    /// immediately before `pos` (`None`: `dst` is empty and the arc becomes
    /// the whole ring).
    ///
    /// Two new nodes carrying copies of `first`'s and `last`'s values are
    /// linked around the relocated arc, so the recipient receives
    /// `[first', …arc…, last']` while `first` and `last` themselves stay in
    /// `src`, which re-closes directly from `first` to `last` and gets
    /// `first` as its new head.
    ///
    /// The arc must be non-empty (`first.next != last`), and the caller must
    /// not keep using interior arc nodes as positions in `src` afterwards.
    pub fn splice(
        &mut self,
        dst: RingIx,
        pos: Option<NodeIx>,
        src: RingIx,
        first: NodeIx,
        last: NodeIx,
    ) {
        let first = first.0;
        let last = last.0;
        let after_first = self.nodes[first].next;
        let before_last = self.nodes[last].prev;
        debug_assert!(first != last, "splice endpoints must be distinct");
        debug_assert!(after_first != last, "splice arc must be non-empty");

        let first_copy = self.alloc(self.nodes[first].value.clone());
        let last_copy = self.alloc(self.nodes[last].value.clone());

        match pos {
            None => {
                self.nodes[first_copy].prev = last_copy;
                self.nodes[last_copy].next = first_copy;
                self.heads[dst.0] = Some(first_copy);
            }
            Some(pos) => {
                let before_pos = self.nodes[pos.0].prev;
                self.nodes[before_pos].next = first_copy;
                self.nodes[first_copy].prev = before_pos;
                self.nodes[last_copy].next = pos.0;
                self.nodes[pos.0].prev = last_copy;
            }
        }

        self.nodes[first_copy].next = after_first;
        self.nodes[after_first].prev = first_copy;
        self.nodes[before_last].next = last_copy;
        self.nodes[last_copy].prev = before_last;

        self.nodes[first].next = last;
        self.nodes[last].prev = first;
        self.heads[src.0] = Some(first);
    }
}

/// Iterator over the node indices of one ring; see [`RingPool::iter_nodes`].
pub struct NodeIter<'a, T> {
    pool: &'a RingPool<T>,
    head: Option<usize>,
    cursor: Option<usize>,
}

impl<T> Iterator for NodeIter<'_, T> {
    type Item = NodeIx;

    fn next(&mut self) -> Option<NodeIx> {
        let current = self.cursor?;
        let next = self.pool.nodes[current].next;
        // Coming back around to the head ends the cycle.
        self.cursor = if Some(next) == self.head { None } else { Some(next) };
        Some(NodeIx(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(pool: &RingPool<u32>, ring: RingIx) -> Vec<u32> {
        pool.iter(ring).copied().collect()
    }

    #[test]
    fn push_front_becomes_head() {
        let mut pool = RingPool::new();
        let r = pool.ring_from_iter([1, 2, 3]);
        pool.push_front(r, 0);
        assert_eq!(collect(&pool, r), vec![0, 1, 2, 3]);
    }

    #[test]
    fn insert_before_head_lands_at_back() {
        let mut pool = RingPool::new();
        let r = pool.ring_from_iter([1, 2]);
        let head = pool.head(r).unwrap();
        pool.insert_before(r, head, 9);
        assert_eq!(collect(&pool, r), vec![1, 2, 9]);
    }

    #[test]
    fn remove_head_moves_head_forward() {
        let mut pool = RingPool::new();
        let r = pool.ring_from_iter([1, 2, 3]);
        let head = pool.head(r).unwrap();
        pool.remove(r, head);
        assert_eq!(collect(&pool, r), vec![2, 3]);
        assert_eq!(pool.len(r), 2);
    }

    #[test]
    fn set_head_rotates_iteration() {
        let mut pool = RingPool::new();
        let r = pool.ring_from_iter([1, 2, 3, 4]);
        let second = pool.next(pool.head(r).unwrap());
        pool.set_head(r, second);
        assert_eq!(collect(&pool, r), vec![2, 3, 4, 1]);
    }
}
