use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;
use slab::Slab;

use crate::error::RingError;
use crate::ring::cursor::{Cursor, CursorMut, Position};
use crate::{IntoIter, Iter, IterMut};

pub mod cursor;
pub mod iterator;

mod algorithms;

pub use algorithms::shuffle;

/// The `Ring` is a circular doubly-linked list of key/info pairs with owned
/// nodes. It allows inserting and removing entries at any given position in
/// constant time. In compromise, searching by key takes *O*(*n*) time.
///
/// A ring has no first or last node. One node is designated as the *anchor*:
/// forward iteration, rendering and comparison start there, and [`push`]
/// inserts right before it (so pushed entries come out in pushing order).
///
/// The `Ring` contains:
/// - an arena `nodes` owning every node, where links are slot indices;
/// - the slot index of the anchor, or `None` if the ring is empty.
///
/// The length of the ring is the number of occupied slots.
///
/// [`push`]: Ring::push
pub struct Ring<K, I> {
    pub(crate) nodes: Slab<Node<K, I>>,
    pub(crate) anchor: Option<usize>,
}

pub(crate) struct Node<K, I> {
    pub(crate) next: usize,
    pub(crate) prev: usize,
    /// Unique among all nodes ever attached in this process, so a position
    /// never matches a node of another ring or a later occupant of its slot.
    pub(crate) stamp: u64,
    pub(crate) key: K,
    pub(crate) info: I,
}

static NEXT_STAMP: AtomicU64 = AtomicU64::new(0);

fn next_stamp() -> u64 {
    NEXT_STAMP.fetch_add(1, Ordering::Relaxed)
}

// private methods
impl<K, I> Ring<K, I> {
    /// Resolve a position to a live slot of this ring, or `None`.
    ///
    /// The slot must be occupied by the very node the position was taken
    /// from: a vacant slot, a reused slot and a slot of another ring all
    /// resolve to `None`.
    pub(crate) fn resolve(&self, at: Position) -> Option<usize> {
        let (node, stamp) = at.node?;
        self.nodes
            .get(node)
            .filter(|n| n.stamp == stamp)
            .map(|_| node)
    }

    /// The position of a live slot, or the invalid position.
    pub(crate) fn position_of(&self, node: Option<usize>) -> Position {
        Position::new(node.map(|node| (node, self.nodes[node].stamp)))
    }

    pub(crate) fn back_node(&self) -> Option<usize> {
        self.anchor.map(|anchor| self.nodes[anchor].prev)
    }

    /// Slot indices of all nodes, one forward cycle from the anchor.
    pub(crate) fn node_order(&self) -> impl Iterator<Item = usize> + '_ {
        let mut current = self.anchor;
        (0..self.len()).filter_map(move |_| {
            let node = current?;
            current = Some(self.nodes[node].next);
            Some(node)
        })
    }

    fn connect(&mut self, prev: usize, next: usize) {
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Attach a new node to the ring, between `prev` and `next`, and return
    /// its slot.
    ///
    /// `prev` and `next` must be adjacent live nodes of this ring (checked
    /// only in `#[cfg(debug_assertions)]`).
    pub(crate) fn attach_node(&mut self, prev: usize, next: usize, key: K, info: I) -> usize {
        #[cfg(debug_assertions)]
        self.assert_adjacent(prev, next);
        let node = self.nodes.insert(Node {
            next,
            prev,
            stamp: next_stamp(),
            key,
            info,
        });
        self.connect(prev, node);
        self.connect(node, next);
        #[cfg(debug_assertions)]
        {
            self.assert_adjacent(prev, node);
            self.assert_adjacent(node, next);
        }
        node
    }

    /// Attach the first node of an empty ring. It links to itself in both
    /// directions and becomes the anchor.
    fn attach_first(&mut self, key: K, info: I) -> usize {
        debug_assert!(self.is_empty());
        let entry = self.nodes.vacant_entry();
        let node = entry.key();
        entry.insert(Node {
            next: node,
            prev: node,
            stamp: next_stamp(),
            key,
            info,
        });
        self.anchor = Some(node);
        node
    }

    /// Detach the live node `node` from the ring and return it together with
    /// the slot of its former successor.
    ///
    /// Removing the sole node leaves the ring empty and returns no successor.
    /// Removing the anchor moves the anchor to the successor.
    pub(crate) fn detach_node(&mut self, node: usize) -> (Node<K, I>, Option<usize>) {
        let detached = self.nodes.remove(node);
        if detached.next == node {
            trace!("detached the last node {}, ring is now empty", node);
            self.anchor = None;
            return (detached, None);
        }
        let successor = detached.next;
        self.connect(detached.prev, successor);
        if self.anchor == Some(node) {
            trace!("anchor {} detached, moved to {}", node, successor);
            self.anchor = Some(successor);
        }
        (detached, Some(successor))
    }

    fn find_node(&self, key: &K, n: usize) -> Result<usize, RingError>
    where
        K: PartialEq,
    {
        if n < 1 {
            return Err(RingError::InvalidOccurrence);
        }
        self.node_order()
            .filter(|&node| self.nodes[node].key == *key)
            .nth(n - 1)
            .ok_or(RingError::KeyNotFound)
    }

    #[cfg(debug_assertions)]
    fn assert_adjacent(&self, prev: usize, next: usize) {
        assert_eq!(self.nodes[prev].next, next);
        assert_eq!(self.nodes[next].prev, prev);
    }

    /// Walk the ring in both directions and check every link invariant.
    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self) {
        let Some(anchor) = self.anchor else {
            assert!(self.nodes.is_empty(), "empty ring still owns nodes");
            return;
        };
        assert!(self.nodes.contains(anchor), "anchor is not a live node");
        let (mut forward, mut backward) = (anchor, anchor);
        for step in 1..=self.len() {
            let node = &self.nodes[forward];
            assert_eq!(self.nodes[node.next].prev, forward);
            assert_eq!(self.nodes[node.prev].next, forward);
            forward = node.next;
            backward = self.nodes[backward].prev;
            if step < self.len() {
                assert_ne!(forward, anchor, "forward cycle shorter than the length");
                assert_ne!(backward, anchor, "backward cycle shorter than the length");
            }
        }
        assert_eq!(forward, anchor, "forward cycle does not close");
        assert_eq!(backward, anchor, "backward cycle does not close");
    }
}

impl<K, I> Ring<K, I> {
    /// Create an empty `Ring`.
    ///
    /// # Examples
    /// ```
    /// use keyed_ring::Ring;
    /// let ring: Ring<u32, &str> = Ring::new();
    /// assert!(ring.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            anchor: None,
        }
    }

    /// Create a `Ring` holding a single entry, which is also the anchor.
    ///
    /// # Examples
    /// ```
    /// use keyed_ring::Ring;
    /// let ring = Ring::with_entry(0, "zero");
    /// assert_eq!(ring.len(), 1);
    /// assert_eq!(ring.begin(), ring.end());
    /// ```
    pub fn with_entry(key: K, info: I) -> Self {
        let mut ring = Self::new();
        ring.push(key, info);
        ring
    }

    /// Returns `true` if the `Ring` is empty.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchor.is_none()
    }

    /// Returns the number of entries in the `Ring`.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the position of the anchor, which is invalid if the ring is
    /// empty.
    #[inline]
    pub fn anchor(&self) -> Position {
        self.position_of(self.anchor)
    }

    /// Inserts an entry right before the anchor, i.e. at the logical end of
    /// the ring. The entry becomes the anchor only if the ring was empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// let first = ring.push(1, 'a');
    /// ring.push(2, 'b');
    ///
    /// assert_eq!(ring.anchor(), first);
    /// assert_eq!(ring.end().key(), Ok(&2));
    /// ```
    pub fn push(&mut self, key: K, info: I) -> Position {
        let node = match self.anchor {
            None => self.attach_first(key, info),
            Some(anchor) => {
                let back = self.nodes[anchor].prev;
                self.attach_node(back, anchor, key, info)
            }
        };
        self.position_of(Some(node))
    }

    /// Inserts an entry right after `at` and returns its position. The anchor
    /// is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::InvalidIterator`] if `at` references no node.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::{Position, Ring, RingError};
    ///
    /// let mut ring = Ring::with_entry(1, 9);
    /// let anchor = ring.anchor();
    /// let inserted = ring.insert_after(5, 6, anchor).unwrap();
    ///
    /// let mut cursor = ring.cursor(inserted);
    /// assert_eq!(cursor.entry(), Ok((&5, &6)));
    /// cursor.move_prev().unwrap();
    /// assert_eq!(cursor.entry(), Ok((&1, &9)));
    ///
    /// assert_eq!(
    ///     ring.insert_after(0, 0, Position::invalid()),
    ///     Err(RingError::InvalidIterator)
    /// );
    /// ```
    pub fn insert_after(&mut self, key: K, info: I, at: Position) -> Result<Position, RingError> {
        self.cursor_mut(at).insert_after(key, info)
    }

    /// Inserts an entry right before `at` and returns its position. The
    /// anchor is unchanged, even when `at` is the anchor.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::InvalidIterator`] if `at` references no node.
    pub fn insert_before(&mut self, key: K, info: I, at: Position) -> Result<Position, RingError> {
        self.cursor_mut(at).insert_before(key, info)
    }

    /// Overwrites the entry at `at` in place. Returns `false`, and does
    /// nothing, if `at` references no node.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::{Position, Ring};
    ///
    /// let mut ring = Ring::with_entry(5, 6);
    /// assert!(ring.replace(60, 70, ring.anchor()));
    /// assert_eq!(ring.begin().entry(), Ok((&60, &70)));
    /// assert!(!ring.replace(1, 1, Position::invalid()));
    /// ```
    pub fn replace(&mut self, key: K, info: I, at: Position) -> bool {
        match self.cursor_mut(at).entry_mut() {
            Ok((k, i)) => {
                *k = key;
                *i = info;
                true
            }
            Err(_) => false,
        }
    }

    /// Removes every entry. Returns `false` if the ring was already empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::Ring;
    ///
    /// let mut ring = Ring::from_iter([(1, 'a'), (2, 'b')]);
    /// assert!(ring.purge());
    /// assert!(ring.is_empty());
    /// assert!(!ring.purge());
    /// ```
    pub fn purge(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        trace!("purging {} nodes", self.len());
        self.nodes.clear();
        self.anchor = None;
        true
    }

    /// Removes the entry at `at` and returns the position of its successor.
    ///
    /// If the entry was the anchor, its successor becomes the anchor. If it
    /// was the only entry, the ring becomes empty and the returned position
    /// is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::InvalidIterator`] if `at` references no node.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::Ring;
    ///
    /// let mut ring = Ring::from_iter([(0, 'a'), (1, 'b'), (2, 'c')]);
    /// let at = ring.find(&1, 1).unwrap().position();
    /// let next = ring.remove(at).unwrap();
    /// assert_eq!(ring.cursor(next).key(), Ok(&2));
    ///
    /// let mut single = Ring::with_entry(5, 'x');
    /// let next = single.remove(single.anchor()).unwrap();
    /// assert!(!next.is_valid());
    /// assert!(single.is_empty());
    /// ```
    pub fn remove(&mut self, at: Position) -> Result<Position, RingError> {
        let mut cursor = self.cursor_mut(at);
        cursor.remove()?;
        Ok(cursor.position())
    }

    /// Removes the entry after `at` and returns the position of the entry
    /// that now follows `at`.
    ///
    /// In a single-entry ring the entry after `at` is `at` itself, so the
    /// ring becomes empty and the returned position is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::InvalidIterator`] if `at` references no node.
    pub fn remove_after(&mut self, at: Position) -> Result<Position, RingError> {
        let mut cursor = self.cursor_mut(at);
        if !cursor.is_valid() {
            return Err(RingError::InvalidIterator);
        }
        cursor.move_next()?;
        cursor.remove()?;
        Ok(cursor.position())
    }

    /// Removes the entry before `at` and returns the position of the entry
    /// that followed it, which is `at` unless the ring became empty.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::InvalidIterator`] if `at` references no node.
    pub fn remove_before(&mut self, at: Position) -> Result<Position, RingError> {
        let mut cursor = self.cursor_mut(at);
        if !cursor.is_valid() {
            return Err(RingError::InvalidIterator);
        }
        cursor.move_prev()?;
        cursor.remove()?;
        Ok(cursor.position())
    }

    /// Returns the info of the `n`-th (1-based) entry whose key equals
    /// `key`, scanning one full cycle forward from the anchor.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::InvalidOccurrence`] if `n` is 0, and
    /// [`RingError::KeyNotFound`] if fewer than `n` entries match.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::{Ring, RingError};
    ///
    /// let ring = Ring::from_iter([(7, "first"), (1, "other"), (7, "second")]);
    /// assert_eq!(ring.get_info(&7, 1), Ok(&"first"));
    /// assert_eq!(ring.get_info(&7, 2), Ok(&"second"));
    /// assert_eq!(ring.get_info(&7, 3), Err(RingError::KeyNotFound));
    /// assert_eq!(ring.get_info(&7, 0), Err(RingError::InvalidOccurrence));
    /// ```
    pub fn get_info(&self, key: &K, n: usize) -> Result<&I, RingError>
    where
        K: PartialEq,
    {
        self.find(key, n)?.info()
    }

    /// Provides a cursor at the `n`-th (1-based) entry whose key equals
    /// `key`, scanning one full cycle forward from the anchor.
    ///
    /// # Errors
    ///
    /// Same as [`Ring::get_info`].
    pub fn find(&self, key: &K, n: usize) -> Result<Cursor<'_, K, I>, RingError>
    where
        K: PartialEq,
    {
        let node = self.find_node(key, n)?;
        Ok(Cursor::new(self, Some(node)))
    }

    /// Like [`Ring::find`], but provides a cursor with editing operations.
    pub fn find_mut(&mut self, key: &K, n: usize) -> Result<CursorMut<'_, K, I>, RingError>
    where
        K: PartialEq,
    {
        let node = self.find_node(key, n)?;
        Ok(CursorMut::new(self, Some(node)))
    }

    /// Returns `true` if any entry has the given key.
    pub fn contains_key(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.iter().any(|(k, _)| k == key)
    }

    /// Overwrites the info of every entry with a clone of `filler`. Returns
    /// `false` if the ring is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::Ring;
    ///
    /// let mut ring = Ring::from_iter([(1, 10), (2, 20)]);
    /// assert!(ring.clear_info(0));
    /// assert!(ring.iter().all(|(_, info)| *info == 0));
    /// ```
    pub fn clear_info(&mut self, filler: I) -> bool
    where
        I: Clone,
    {
        if self.is_empty() {
            return false;
        }
        self.nodes
            .iter_mut()
            .for_each(|(_, node)| node.info.clone_from(&filler));
        true
    }

    /// Exchanges the entries at `a` and `b` without relinking any node.
    /// Returns `false`, and does nothing, if either position references no
    /// node.
    ///
    /// Both positions are resolved against this ring. To exchange entries
    /// between two rings, use [`CursorMut::swap_with`].
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::{Position, Ring};
    ///
    /// let mut ring = Ring::from_iter([(0, 1), (1, 2), (2, 3)]);
    /// let a = ring.anchor();
    /// let b = ring.find(&1, 1).unwrap().position();
    /// assert!(ring.swap(a, b));
    /// assert_eq!(ring.to_string(), "[1] 2\n[0] 1\n[2] 3\n");
    /// assert!(!ring.swap(a, Position::invalid()));
    /// ```
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        let (Some(a), Some(b)) = (self.resolve(a), self.resolve(b)) else {
            return false;
        };
        if a == b {
            return true;
        }
        if let Some((first, second)) = self.nodes.get2_mut(a, b) {
            first.swap_payload(second);
        }
        true
    }

    /// Provides a cursor at the anchor. It is invalid if the ring is empty.
    pub fn begin(&self) -> Cursor<'_, K, I> {
        Cursor::new(self, self.anchor)
    }

    /// Provides a cursor at the predecessor of the anchor, i.e. the last
    /// entry visited by a forward cycle. It is invalid if the ring is empty.
    ///
    /// The ring has no off-the-end node: `end()` is meant to be compared
    /// against a moving cursor as a stop condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::{Ring, RingError};
    ///
    /// let ring = Ring::from_iter([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// let mut keys = Vec::new();
    /// let mut cursor = ring.begin();
    /// let end = ring.end();
    /// loop {
    ///     keys.push(*cursor.key()?);
    ///     if cursor == end {
    ///         break;
    ///     }
    ///     cursor.move_next()?;
    /// }
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// # Ok::<(), RingError>(())
    /// ```
    pub fn end(&self) -> Cursor<'_, K, I> {
        Cursor::new(self, self.back_node())
    }

    /// Provides a cursor with editing operations at the anchor.
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, I> {
        let anchor = self.anchor;
        CursorMut::new(self, anchor)
    }

    /// Provides a cursor at `at`. The cursor is invalid if `at` references
    /// no live node of this ring.
    pub fn cursor(&self, at: Position) -> Cursor<'_, K, I> {
        Cursor::new(self, self.resolve(at))
    }

    /// Provides a cursor with editing operations at `at`. The cursor is
    /// invalid if `at` references no live node of this ring.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::Ring;
    ///
    /// let mut ring = Ring::from_iter([(1, 2), (3, 4)]);
    /// let at = ring.anchor();
    /// *ring.cursor_mut(at).info_mut().unwrap() *= 10;
    /// assert_eq!(ring.get_info(&1, 1), Ok(&20));
    /// ```
    pub fn cursor_mut(&mut self, at: Position) -> CursorMut<'_, K, I> {
        let current = self.resolve(at);
        CursorMut::new(self, current)
    }

    /// Provides an iterator over one forward cycle, starting at the anchor.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::Ring;
    ///
    /// let ring = Ring::from_iter([(0, 'a'), (1, 'b')]);
    /// let mut iter = ring.iter();
    /// assert_eq!(iter.next(), Some((&0, &'a')));
    /// assert_eq!(iter.next(), Some((&1, &'b')));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, I> {
        Iter::new(self)
    }

    /// Provides an iterator over one forward cycle, starting at the anchor,
    /// with mutable references to the infos.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::Ring;
    ///
    /// let mut ring = Ring::from_iter([(0, 1), (1, 2)]);
    /// for (key, info) in ring.iter_mut() {
    ///     *info += key * 10;
    /// }
    /// assert_eq!(ring.to_string(), "[0] 1\n[1] 12\n");
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, I> {
        IterMut::new(self)
    }
}

impl<K: Debug, I: Debug> Debug for Ring<K, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, I> Default for Ring<K, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, I> Node<K, I> {
    pub(crate) fn into_entry(self) -> (K, I) {
        (self.key, self.info)
    }

    pub(crate) fn swap_payload(&mut self, other: &mut Self) {
        mem::swap(&mut self.key, &mut other.key);
        mem::swap(&mut self.info, &mut other.info);
    }
}

/// Nodes are equal when their entries are; links do not take part.
impl<K: PartialEq, I: PartialEq> PartialEq for Node<K, I> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.info == other.info
    }
}

// Ensure that `Ring` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: Ring<&'static str, &'static str>) -> Ring<&'a str, &'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str, u8>) -> Iter<'i, &'a str, u8> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str, u8>) -> IntoIter<&'a str, u8> {
        x
    }
}

#[cfg(test)]
mod tests {
    use crate::ring::cursor::Position;
    use crate::ring::Ring;
    use crate::RingError;
    use std::cell::RefCell;

    /// Keys 0..=9 with info `key + 1`, pushed in order.
    fn ten() -> Ring<i32, i32> {
        let mut ring = Ring::with_entry(0, 1);
        for i in 0..9 {
            ring.push(i + 1, i + 2);
        }
        ring
    }

    fn at(ring: &Ring<i32, i32>, key: i32) -> Position {
        ring.find(&key, 1).unwrap().position()
    }

    #[test]
    fn ring_create() {
        let mut ring = Ring::<i32, i32>::new();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert!(!ring.anchor().is_valid());
        ring.push(1, 5);
        assert!(!ring.is_empty());
        assert_eq!(ring.get_info(&1, 1), Ok(&5));
        ring.assert_well_formed();
    }

    #[test]
    fn ring_push_keeps_anchor() {
        let ring = ten();
        ring.assert_well_formed();
        assert_eq!(ring.len(), 10);
        assert_eq!(ring.begin().key(), Ok(&0));
        assert_eq!(ring.end().key(), Ok(&9));
        assert_eq!(ring.get_info(&8, 1), Ok(&9));
        assert_eq!(ring.to_string().lines().next(), Some("[0] 1"));
    }

    #[test]
    fn ring_cyclic_closure() {
        let ring = ten();
        let start = ring.begin();
        let mut cursor = start;
        for _ in 0..ring.len() {
            cursor.move_next().unwrap();
        }
        assert_eq!(cursor, start);
        for _ in 0..ring.len() {
            cursor.move_prev().unwrap();
        }
        assert_eq!(cursor, start);
    }

    #[test]
    fn ring_drop() {
        #[derive(Debug)]
        struct DropChecker<'a, T: Copy> {
            value: T,
            dropped: &'a RefCell<Vec<T>>,
        }
        impl<'a, T: Copy> DropChecker<'a, T> {
            fn new(value: T, dropped: &'a RefCell<Vec<T>>) -> Self {
                Self { value, dropped }
            }
        }
        impl<'a, T: Copy> Drop for DropChecker<'a, T> {
            fn drop(&mut self) {
                self.dropped.borrow_mut().push(self.value);
            }
        }
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut ring = Ring::new();
        ring.push(1, DropChecker::new(1, &dropped));
        ring.push(2, DropChecker::new(2, &dropped));
        assert!(ring.purge());
        let mut sorted = dropped.borrow().clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2]);

        ring.push(3, DropChecker::new(3, &dropped));
        let next = ring.remove(ring.anchor()).unwrap();
        assert!(!next.is_valid());
        assert_eq!(dropped.borrow().len(), 3);

        ring.push(4, DropChecker::new(4, &dropped));
        drop(ring);
        assert_eq!(dropped.borrow().len(), 4);
    }

    #[test]
    fn ring_insert_after_and_before() {
        let mut single = Ring::with_entry(1, 9);
        let inserted = single.insert_after(5, 6, single.anchor()).unwrap();
        single.assert_well_formed();
        let mut cursor = single.cursor(inserted);
        assert_eq!(cursor.entry(), Ok((&5, &6)));
        cursor.move_prev().unwrap();
        assert_eq!(cursor.entry(), Ok((&1, &9)));

        let mut ring = ten();
        let inserted = ring.insert_after(5, 6, at(&ring, 1)).unwrap();
        let mut cursor = ring.cursor(inserted);
        cursor.move_prev().unwrap();
        assert_eq!(cursor.entry(), Ok((&1, &2)));

        let inserted = ring.insert_before(54, 49, at(&ring, 1)).unwrap();
        let mut cursor = ring.cursor(inserted);
        assert_eq!(cursor.entry(), Ok((&54, &49)));
        cursor.move_next().unwrap();
        assert_eq!(cursor.key(), Ok(&1));
        ring.assert_well_formed();
        assert_eq!(ring.len(), 12);

        // Inserting before the anchor does not move the anchor.
        ring.insert_before(-1, 0, ring.anchor()).unwrap();
        assert_eq!(ring.begin().key(), Ok(&0));
        assert_eq!(ring.end().key(), Ok(&-1));

        let invalid = Position::invalid();
        assert_eq!(
            ring.insert_after(5, 6, invalid),
            Err(RingError::InvalidIterator)
        );
        assert_eq!(
            ring.insert_before(5, 6, invalid),
            Err(RingError::InvalidIterator)
        );
        assert_eq!(ring.len(), 13);
    }

    #[test]
    fn ring_replace() {
        let mut ring = ten();
        let five = at(&ring, 5);
        assert!(ring.replace(60, 70, five));
        assert_eq!(ring.cursor(five).entry(), Ok((&60, &70)));
        assert!(!ring.replace(5, 6, Position::invalid()));
        assert_eq!(ring.len(), 10);
    }

    #[test]
    fn ring_purge_and_rebuild() {
        let mut ring = ten();
        assert!(ring.purge());
        assert_eq!(ring.len(), 0);
        assert!(!ring.anchor().is_valid());
        ring.assert_well_formed();
        assert!(!ring.purge());

        ring.push(0, 1);
        for i in 0..9 {
            ring.push(i + 1, i + 2);
        }
        ring.assert_well_formed();
        assert_eq!(ring, ten());
    }

    #[test]
    fn ring_remove_after() {
        let mut ring = ten();
        let next = ring.remove_after(at(&ring, 0)).unwrap();
        assert_eq!(ring.cursor(next).key(), Ok(&2));
        ring.assert_well_formed();

        // Removing the anchor through its predecessor moves the anchor.
        let next = ring.remove_after(at(&ring, 9)).unwrap();
        assert!(next.is_valid());
        assert_eq!(ring.anchor(), next);
        assert_eq!(ring.begin().key(), Ok(&2));
        ring.assert_well_formed();
        assert_eq!(
            ring.to_string(),
            "[2] 3\n[3] 4\n[4] 5\n[5] 6\n[6] 7\n[7] 8\n[8] 9\n[9] 10\n"
        );
        assert_eq!(ring.iter().count(), ring.len());

        let mut single = Ring::with_entry(5, 7);
        let next = single.remove_after(single.anchor()).unwrap();
        assert!(!next.is_valid());
        assert!(single.is_empty());
        single.assert_well_formed();

        assert_eq!(
            ring.remove_after(Position::invalid()),
            Err(RingError::InvalidIterator)
        );
        assert_eq!(ring.len(), 8);
    }

    #[test]
    fn ring_remove_before() {
        let mut ring = ten();
        let six = at(&ring, 6);
        let next = ring.remove_before(six).unwrap();
        assert_eq!(next, six);
        assert_eq!(ring.cursor(next).key(), Ok(&6));

        let next = ring.remove_before(at(&ring, 1)).unwrap();
        assert!(next.is_valid());
        assert_eq!(ring.begin().key(), Ok(&1));
        ring.assert_well_formed();
        assert_eq!(
            ring.to_string(),
            "[1] 2\n[2] 3\n[3] 4\n[4] 5\n[6] 7\n[7] 8\n[8] 9\n[9] 10\n"
        );

        let mut single = Ring::with_entry(5, 7);
        let next = single.remove_before(single.anchor()).unwrap();
        assert!(!next.is_valid());
        assert!(single.is_empty());

        assert_eq!(
            ring.remove_before(Position::invalid()),
            Err(RingError::InvalidIterator)
        );
    }

    #[test]
    fn ring_remove() {
        let mut ring = ten();
        let next = ring.remove(at(&ring, 6)).unwrap();
        assert_eq!(ring.cursor(next).key(), Ok(&7));

        let next = ring.remove(ring.anchor()).unwrap();
        assert_eq!(ring.anchor(), next);
        ring.assert_well_formed();
        assert_eq!(
            ring.to_string(),
            "[1] 2\n[2] 3\n[3] 4\n[4] 5\n[5] 6\n[7] 8\n[8] 9\n[9] 10\n"
        );

        let mut pair = Ring::from_iter([(1, 1), (2, 2)]);
        let next = pair.remove(pair.anchor()).unwrap();
        pair.assert_well_formed();
        assert_eq!(pair.cursor(next).key(), Ok(&2));
        assert_eq!(pair.begin(), pair.end());

        let mut single = Ring::with_entry(5, 7);
        let next = single.remove(single.anchor()).unwrap();
        assert!(!next.is_valid());
        assert!(single.is_empty());
        single.assert_well_formed();

        assert_eq!(
            ring.remove(Position::invalid()),
            Err(RingError::InvalidIterator)
        );
    }

    #[test]
    fn ring_stale_position_is_rejected() {
        let mut ring = ten();
        let three = at(&ring, 3);
        ring.remove(three).unwrap();
        assert!(!ring.cursor(three).is_valid());
        assert_eq!(ring.remove(three), Err(RingError::InvalidIterator));
        assert!(!ring.replace(0, 0, three));
        assert_eq!(ring.len(), 9);
    }

    #[test]
    fn ring_stale_position_survives_slot_reuse() {
        let mut ring = Ring::from_iter([(1, 'a'), (2, 'b'), (3, 'c')]);
        let two = ring.find(&2, 1).unwrap().position();
        ring.remove(two).unwrap();
        let new = ring.push(99, 'z');
        assert_ne!(two, new);
        assert!(!ring.cursor(two).is_valid());
        assert_eq!(ring.remove(two), Err(RingError::InvalidIterator));
        assert_eq!(ring.insert_after(0, 'x', two), Err(RingError::InvalidIterator));
        assert!(!ring.replace(0, 'x', two));
        assert!(!ring.swap(two, new));
        assert_eq!(ring.to_string(), "[1] a\n[3] c\n[99] z\n");
        ring.assert_well_formed();
    }

    #[test]
    fn ring_positions_are_ring_specific() {
        let mut a = Ring::new();
        let mut b = Ring::new();
        let pa = a.push(1, "a");
        let pb = b.push(2, "b");
        assert_ne!(pa, pb);
        assert_eq!(pa, a.anchor());
        assert!(!b.cursor(pa).is_valid());
        assert_eq!(b.remove(pa), Err(RingError::InvalidIterator));
        assert!(!a.replace(0, "x", pb));

        // A clone owns new entries; positions of the source do not carry over.
        let copy = a.clone();
        assert_ne!(copy.anchor(), pa);
        assert!(!copy.cursor(pa).is_valid());

        // A move keeps the entries, so their positions stay valid.
        let moved = std::mem::take(&mut a);
        assert_eq!(moved.cursor(pa).key(), Ok(&1));
        assert!(!a.cursor(pa).is_valid());
    }

    #[test]
    fn ring_positions_survive_mutation_elsewhere() {
        let mut ring = ten();
        let seven = at(&ring, 7);
        ring.remove(at(&ring, 2)).unwrap();
        ring.insert_after(100, 100, at(&ring, 6)).unwrap();
        ring.push(11, 12);
        assert_eq!(ring.cursor(seven).entry(), Ok((&7, &8)));
    }

    #[test]
    fn ring_get_info() {
        let empty = Ring::<i32, i32>::new();
        assert_eq!(empty.get_info(&0, 1), Err(RingError::KeyNotFound));
        assert_eq!(empty.get_info(&0, 0), Err(RingError::InvalidOccurrence));

        let mut ring = ten();
        assert_eq!(ring.get_info(&9, 1), Ok(&10));
        assert_eq!(ring.get_info(&2, 2), Err(RingError::KeyNotFound));
        ring.push(2, 5);
        assert_eq!(ring.get_info(&2, 1), Ok(&3));
        assert_eq!(ring.get_info(&2, 2), Ok(&5));
        assert_eq!(ring.get_info(&2, 3), Err(RingError::KeyNotFound));
        assert!(ring.contains_key(&9));
        assert!(!ring.contains_key(&42));
    }

    #[test]
    fn ring_clear_info() {
        let mut ring = ten();
        assert!(ring.clear_info(0));
        assert!(ring.iter().all(|(_, info)| *info == 0));
        assert!(!Ring::<i32, i32>::new().clear_info(0));
    }

    #[test]
    fn ring_swap() {
        let mut ring = ten();
        assert!(!ring.swap(ring.anchor(), Position::invalid()));
        let (zero, one) = (at(&ring, 0), at(&ring, 1));
        assert!(ring.swap(zero, one));
        assert_eq!(
            ring.to_string(),
            "[1] 2\n[0] 1\n[2] 3\n[3] 4\n[4] 5\n[5] 6\n[6] 7\n[7] 8\n[8] 9\n[9] 10\n"
        );
        assert!(ring.swap(zero, zero));
        assert_eq!(ring.begin().key(), Ok(&1));
        ring.assert_well_formed();
    }
}
