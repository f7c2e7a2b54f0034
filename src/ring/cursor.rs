use crate::error::RingError;
use crate::ring::{Node, Ring};
use std::fmt;
use std::fmt::Formatter;
use std::ptr;

/// A handle to one entry of a `Ring`, or to none.
///
/// A `Position` does not borrow the ring, so it stays usable while other
/// entries are inserted or removed. It is what [`Ring::push`], the insertion
/// and the removal methods return, and what they accept to designate an
/// entry. Bind it to a ring with [`Ring::cursor`] or [`Ring::cursor_mut`] to
/// read or move.
///
/// Two positions are equal if they reference the same entry, or if both are
/// invalid. Every inserted entry gets an identity of its own, so positions
/// taken from different rings never compare equal.
///
/// A position outlives its entry without dangling: once the entry has been
/// removed, the position resolves to no entry in every ring, even after its
/// storage slot has been reused, and every operation treats it as invalid.
///
/// # Examples
///
/// ```
/// use keyed_ring::{Position, Ring, RingError};
///
/// let mut ring = Ring::new();
/// let a = ring.push('a', 1);
/// let b = ring.push('b', 2);
///
/// // Removing `a` leaves `b` untouched.
/// assert_eq!(ring.remove(a), Ok(b));
/// assert_eq!(ring.cursor(b).key(), Ok(&'b'));
///
/// // `a` stays invalid, even once a new entry takes its place.
/// ring.push('c', 3);
/// assert_eq!(ring.remove(a), Err(RingError::InvalidIterator));
///
/// // The position of the last entry becomes invalid once removed.
/// ring.remove(b).unwrap();
/// assert_eq!(ring.len(), 1);
/// assert_eq!(ring.remove(ring.anchor()), Ok(Position::invalid()));
/// assert!(ring.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Slot index and stamp of the node.
    pub(crate) node: Option<(usize, u64)>,
}

impl Position {
    /// A position that references no entry.
    pub const fn invalid() -> Self {
        Self { node: None }
    }

    pub(crate) fn new(node: Option<(usize, u64)>) -> Self {
        Self { node }
    }

    /// Returns `true` unless this is the invalid position.
    ///
    /// A position whose entry has been removed still reports `true`; bind it
    /// with [`Ring::cursor`] to find out whether its entry is alive.
    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }
}

/// A cursor over a `Ring`.
///
/// A `Cursor` references a single entry of the ring, or no entry at all
/// (invalid). Since the ring is cyclic, moving a valid cursor always lands on
/// another entry; moving or reading through an invalid cursor fails with
/// [`RingError::Dereference`].
///
/// # Examples
///
/// ```
/// use keyed_ring::{Ring, RingError};
///
/// let ring = Ring::from_iter([('A', 1), ('B', 2), ('C', 3)]);
///
/// let mut cursor = ring.begin();
/// assert_eq!(cursor.key(), Ok(&'A'));
///
/// cursor.move_prev().unwrap();
/// assert_eq!(cursor.key(), Ok(&'C'));
/// assert_eq!(cursor, ring.end());
///
/// cursor.seek_forward(4).unwrap();
/// assert_eq!(cursor.entry(), Ok((&'A', &1)));
///
/// let empty: Ring<char, i32> = Ring::new();
/// let mut invalid = empty.begin();
/// assert_eq!(invalid.move_next(), Err(RingError::Dereference));
/// assert_eq!(invalid.info(), Err(RingError::Dereference));
/// ```
pub struct Cursor<'a, K: 'a, I: 'a> {
    pub(crate) current: Option<usize>,
    pub(crate) ring: &'a Ring<K, I>,
}

impl<'a, K: 'a, I: 'a> Clone for Cursor<'a, K, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K: 'a, I: 'a> Copy for Cursor<'a, K, I> {}

/// Compare cursors by the entry they reference.
///
/// Cursors are equal if they belong to the same ring and reference the same
/// entry, or if both are invalid.
///
/// # Examples
/// ```
/// use keyed_ring::Ring;
///
/// let ring = Ring::from_iter([(1, ()), (2, ()), (3, ())]);
/// let cursor1 = ring.begin();
/// let mut cursor2 = cursor1;
/// assert_eq!(cursor1, cursor2);
///
/// cursor2.move_next().unwrap();
/// assert_ne!(cursor1, cursor2);
///
/// let another = ring.clone();
/// assert_ne!(cursor1, another.begin());
/// ```
impl<'a, K: 'a, I: 'a> PartialEq for Cursor<'a, K, I> {
    fn eq(&self, other: &Self) -> bool {
        match (self.current, other.current) {
            (None, None) => true,
            (current, other_current) => self.same_ring_with(other) && current == other_current,
        }
    }
}

impl<'a, K: 'a, I: 'a> Eq for Cursor<'a, K, I> {}

/// A cursor over a `Ring` with editing operations.
///
/// Besides the moves of [`Cursor`], a `CursorMut` can overwrite the key and
/// the info of its entry. Since it borrows the ring mutably, no other cursor
/// or iterator can observe the ring meanwhile; use [`CursorMut::view`] or
/// [`CursorMut::as_cursor`] to read through it.
///
/// # Examples
///
/// ```compile_fail
/// use keyed_ring::Ring;
///
/// let mut ring = Ring::from_iter([(1, 2), (3, 4)]);
/// let mut cursor = ring.begin_mut();
/// println!("{}", ring.len());
/// println!("{:?}", cursor.key());
/// ```
pub struct CursorMut<'a, K: 'a, I: 'a> {
    pub(crate) current: Option<usize>,
    pub(crate) ring: &'a mut Ring<K, I>,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        // Private methods
        impl<'a, K: 'a, I: 'a> $CURSOR<'a, K, I> {
            fn current_node(&self) -> Result<usize, RingError> {
                self.current.ok_or(RingError::Dereference)
            }
            fn next_node(&self) -> Result<usize, RingError> {
                Ok(self.ring.nodes[self.current_node()?].next)
            }
            fn prev_node(&self) -> Result<usize, RingError> {
                Ok(self.ring.nodes[self.current_node()?].prev)
            }
        }

        impl<'a, K: 'a, I: 'a> $CURSOR<'a, K, I> {
            /// Returns `true` if the cursor references an entry.
            #[inline]
            pub fn is_valid(&self) -> bool {
                self.current.is_some()
            }

            /// Returns `true` if the cursor references the anchor of the ring.
            pub fn is_anchor(&self) -> bool {
                self.current.is_some() && self.current == self.ring.anchor
            }

            /// Returns `true` if the `Ring` is empty. See [`Ring::is_empty`].
            pub fn is_empty(&self) -> bool {
                self.ring.is_empty()
            }

            /// Returns the position of the cursor, detached from the borrow of
            /// the ring.
            #[inline]
            pub fn position(&self) -> Position {
                self.ring.position_of(self.current)
            }

            /// Move the cursor to the next entry.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Errors
            ///
            /// Returns [`RingError::Dereference`] if the cursor is invalid.
            pub fn move_next(&mut self) -> Result<(), RingError> {
                self.current = Some(self.next_node()?);
                Ok(())
            }

            /// Move the cursor to the previous entry.
            ///
            /// This operation should compute in *O*(*1*) time.
            ///
            /// # Errors
            ///
            /// Returns [`RingError::Dereference`] if the cursor is invalid.
            pub fn move_prev(&mut self) -> Result<(), RingError> {
                self.current = Some(self.prev_node()?);
                Ok(())
            }

            /// Move the cursor forward by given steps, wrapping around the
            /// ring as many times as needed.
            ///
            /// This operation should compute in *O*(min(*steps*, *n*)) time.
            ///
            /// # Errors
            ///
            /// Returns [`RingError::Dereference`] if the cursor is invalid,
            /// even for zero steps.
            pub fn seek_forward(&mut self, steps: usize) -> Result<(), RingError> {
                self.current_node()?;
                (0..steps % self.ring.len()).try_for_each(|_| self.move_next())
            }

            /// Move the cursor backward by given steps, wrapping around the
            /// ring as many times as needed.
            ///
            /// This operation should compute in *O*(min(*steps*, *n*)) time.
            ///
            /// # Errors
            ///
            /// Returns [`RingError::Dereference`] if the cursor is invalid,
            /// even for zero steps.
            pub fn seek_backward(&mut self, steps: usize) -> Result<(), RingError> {
                self.current_node()?;
                (0..steps % self.ring.len()).try_for_each(|_| self.move_prev())
            }

            /// Move the cursor to the anchor. The cursor becomes invalid if
            /// the ring is empty.
            #[inline]
            pub fn move_to_anchor(&mut self) {
                self.current = self.ring.anchor;
            }
        }
    };
}

impl_cursor!(CursorMut);
impl_cursor!(Cursor);

impl<'a, K: 'a, I: 'a> Cursor<'a, K, I> {
    pub(crate) fn new(ring: &'a Ring<K, I>, current: Option<usize>) -> Self {
        Self { current, ring }
    }

    fn same_ring_with(&self, other: &Self) -> bool {
        ptr::eq(self.ring, other.ring)
    }

    fn node(&self) -> Result<&'a Node<K, I>, RingError> {
        let ring = self.ring;
        self.current
            .map(|current| &ring.nodes[current])
            .ok_or(RingError::Dereference)
    }

    /// Returns the key of the current entry.
    pub fn key(&self) -> Result<&'a K, RingError> {
        self.node().map(|node| &node.key)
    }

    /// Returns the info of the current entry.
    pub fn info(&self) -> Result<&'a I, RingError> {
        self.node().map(|node| &node.info)
    }

    /// Returns the key and the info of the current entry.
    pub fn entry(&self) -> Result<(&'a K, &'a I), RingError> {
        self.node().map(|node| (&node.key, &node.info))
    }

    /// The ring this cursor moves over.
    pub fn view(&self) -> &'a Ring<K, I> {
        self.ring
    }
}

impl<'a, K: fmt::Debug + 'a, I: fmt::Debug + 'a> fmt::Debug for Cursor<'a, K, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("ring", &self.ring)
            .field("current", &self.entry().ok())
            .finish()
    }
}

impl<'a, K: 'a, I: 'a> CursorMut<'a, K, I> {
    pub(crate) fn new(ring: &'a mut Ring<K, I>, current: Option<usize>) -> Self {
        Self { current, ring }
    }

    fn node(&self) -> Result<&Node<K, I>, RingError> {
        Ok(&self.ring.nodes[self.current_node()?])
    }

    fn node_mut(&mut self) -> Result<&mut Node<K, I>, RingError> {
        let current = self.current_node()?;
        Ok(&mut self.ring.nodes[current])
    }
}

// Methods that do not change the linking structure of the ring.
impl<'a, K: 'a, I: 'a> CursorMut<'a, K, I> {
    /// Returns the key of the current entry.
    pub fn key(&self) -> Result<&K, RingError> {
        self.node().map(|node| &node.key)
    }

    /// Returns the info of the current entry.
    pub fn info(&self) -> Result<&I, RingError> {
        self.node().map(|node| &node.info)
    }

    /// Returns a mutable reference to the key of the current entry.
    pub fn key_mut(&mut self) -> Result<&mut K, RingError> {
        self.node_mut().map(|node| &mut node.key)
    }

    /// Returns a mutable reference to the info of the current entry.
    pub fn info_mut(&mut self) -> Result<&mut I, RingError> {
        self.node_mut().map(|node| &mut node.info)
    }

    /// Returns mutable references to the key and the info of the current
    /// entry.
    pub fn entry_mut(&mut self) -> Result<(&mut K, &mut I), RingError> {
        self.node_mut().map(|node| (&mut node.key, &mut node.info))
    }

    /// Exchanges the entry under this cursor with the entry under `other`,
    /// which may belong to another ring. No node is relinked.
    ///
    /// Returns `false`, and does nothing, if either cursor is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_ring::Ring;
    ///
    /// let mut left = Ring::from_iter([(1, 'a'), (2, 'b')]);
    /// let mut right = Ring::with_entry(9, 'z');
    ///
    /// let mut cursor = left.begin_mut();
    /// cursor.move_next().unwrap();
    /// assert!(cursor.swap_with(&mut right.begin_mut()));
    ///
    /// assert_eq!(left.to_string(), "[1] a\n[9] z\n");
    /// assert_eq!(right.to_string(), "[2] b\n");
    /// ```
    pub fn swap_with(&mut self, other: &mut CursorMut<'_, K, I>) -> bool {
        match (self.node_mut(), other.node_mut()) {
            (Ok(this), Ok(that)) => {
                this.swap_payload(that);
                true
            }
            _ => false,
        }
    }

    pub fn as_cursor(&self) -> Cursor<'_, K, I> {
        Cursor::new(self.ring, self.current)
    }

    pub fn into_cursor(self) -> Cursor<'a, K, I> {
        Cursor::new(self.ring, self.current)
    }

    pub fn view(&self) -> &Ring<K, I> {
        self.ring
    }
}

// Methods that change the linking structure of the ring. They are reached
// only through the methods of `Ring`.
impl<'a, K: 'a, I: 'a> CursorMut<'a, K, I> {
    /// Insert an entry right after the cursor and return its position. The
    /// cursor does not move.
    pub(crate) fn insert_after(&mut self, key: K, info: I) -> Result<Position, RingError> {
        let current = self.current.ok_or(RingError::InvalidIterator)?;
        let next = self.ring.nodes[current].next;
        let node = self.ring.attach_node(current, next, key, info);
        Ok(self.ring.position_of(Some(node)))
    }

    /// Insert an entry right before the cursor and return its position. The
    /// cursor does not move.
    pub(crate) fn insert_before(&mut self, key: K, info: I) -> Result<Position, RingError> {
        let current = self.current.ok_or(RingError::InvalidIterator)?;
        let prev = self.ring.nodes[current].prev;
        let node = self.ring.attach_node(prev, current, key, info);
        Ok(self.ring.position_of(Some(node)))
    }

    /// Remove the current entry and move the cursor to its successor, or
    /// invalidate the cursor if the ring became empty.
    pub(crate) fn remove(&mut self) -> Result<(K, I), RingError> {
        let current = self.current.ok_or(RingError::InvalidIterator)?;
        let (node, successor) = self.ring.detach_node(current);
        self.current = successor;
        Ok(node.into_entry())
    }
}

impl<'a, K: fmt::Debug + 'a, I: fmt::Debug + 'a> fmt::Debug for CursorMut<'a, K, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("ring", &self.ring)
            .field("current", &self.node().ok().map(|node| (&node.key, &node.info)))
            .finish()
    }
}

/// A cyclic, non-fused iterator moving a [`Cursor`] forward.
///
/// It yields the entry under the cursor and then moves on, wrapping around
/// the ring forever. It yields nothing if the cursor is invalid.
pub struct CursorIter<'a, K: 'a, I: 'a> {
    pub(crate) cursor: Cursor<'a, K, I>,
}

/// A cyclic, non-fused iterator moving a [`Cursor`] backward.
pub struct CursorBackIter<'a, K: 'a, I: 'a> {
    pub(crate) cursor: Cursor<'a, K, I>,
}

impl<'a, K: 'a, I: 'a> CursorIter<'a, K, I> {
    pub fn into_cursor(self) -> Cursor<'a, K, I> {
        self.cursor
    }
    pub fn rev(self) -> CursorBackIter<'a, K, I> {
        CursorBackIter {
            cursor: self.cursor,
        }
    }
    pub fn peek(&self) -> Option<(&'a K, &'a I)> {
        self.cursor.entry().ok()
    }
}

impl<'a, K: 'a, I: 'a> CursorBackIter<'a, K, I> {
    pub fn into_cursor(self) -> Cursor<'a, K, I> {
        self.cursor
    }
    pub fn rev(self) -> CursorIter<'a, K, I> {
        CursorIter {
            cursor: self.cursor,
        }
    }
    pub fn peek(&self) -> Option<(&'a K, &'a I)> {
        self.cursor.entry().ok()
    }
}

impl<'a, K: 'a, I: 'a> From<CursorIter<'a, K, I>> for Cursor<'a, K, I> {
    fn from(cursor_iter: CursorIter<'a, K, I>) -> Self {
        cursor_iter.into_cursor()
    }
}

impl<'a, K: 'a, I: 'a> From<CursorMut<'a, K, I>> for Cursor<'a, K, I> {
    fn from(cursor: CursorMut<'a, K, I>) -> Self {
        cursor.into_cursor()
    }
}

#[cfg(test)]
mod tests {
    use crate::ring::cursor::Position;
    use crate::ring::Ring;
    use crate::RingError;

    fn ten() -> Ring<i32, i32> {
        (0..10).map(|i| (i, i + 1)).collect()
    }

    #[test]
    fn cursor_invalid() {
        let ring = ten();
        let mut invalid = ring.cursor(Position::invalid());
        assert!(!invalid.is_valid());
        assert!(!invalid.is_anchor());
        assert_eq!(invalid.key(), Err(RingError::Dereference));
        assert_eq!(invalid.info(), Err(RingError::Dereference));
        assert_eq!(invalid.move_next(), Err(RingError::Dereference));
        assert_eq!(invalid.move_prev(), Err(RingError::Dereference));
        assert_eq!(invalid.seek_forward(0), Err(RingError::Dereference));
        assert_eq!(invalid.seek_backward(3), Err(RingError::Dereference));
        assert!(!invalid.is_valid());

        let other = Ring::<i32, i32>::new();
        assert_eq!(invalid, other.begin());
        assert_eq!(other.begin(), other.end());
    }

    #[test]
    fn cursor_move_and_read() {
        let ring = ten();
        let mut cursor = ring.begin();
        assert!(cursor.is_anchor());
        for i in 0..10 {
            assert_eq!(cursor.entry(), Ok((&i, &(i + 1))));
            cursor.move_next().unwrap();
        }
        assert_eq!(cursor, ring.begin());

        cursor.move_prev().unwrap();
        assert_eq!(cursor, ring.end());
        assert_eq!(cursor.key(), Ok(&9));

        cursor.seek_forward(23).unwrap();
        assert_eq!(cursor.key(), Ok(&2));
        cursor.seek_backward(5).unwrap();
        assert_eq!(cursor.key(), Ok(&7));
        cursor.move_to_anchor();
        assert_eq!(cursor.key(), Ok(&0));
    }

    #[test]
    fn cursor_backward_walk_until_anchor() {
        let ring = ten();
        let mut cursor = ring.begin();
        let mut infos = Vec::new();
        loop {
            cursor.move_prev().unwrap();
            infos.push(*cursor.info().unwrap());
            if cursor == ring.begin() {
                break;
            }
        }
        assert_eq!(infos, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn cursor_equality_needs_same_ring() {
        let ring = ten();
        let copy = ring.clone();
        assert_eq!(ring.begin(), ring.begin());
        assert_ne!(ring.begin(), copy.begin());
        assert_ne!(ring.begin(), ring.end());
    }

    #[test]
    fn cursor_mut_writes_in_place() {
        let mut ring = ten();
        let mut cursor = ring.find_mut(&5, 1).unwrap();
        assert_eq!(cursor.key(), Ok(&5));
        *cursor.key_mut().unwrap() = 10;
        *cursor.info_mut().unwrap() = 20;
        assert_eq!(cursor.as_cursor().entry(), Ok((&10, &20)));
        cursor.move_next().unwrap();
        assert_eq!(cursor.key(), Ok(&6));
        assert_eq!(cursor.view().len(), 10);
        let cursor = cursor.into_cursor();
        assert_eq!(cursor.key(), Ok(&6));
        assert_eq!(ring.get_info(&10, 1), Ok(&20));
        ring.assert_well_formed();

        let mut empty = Ring::<i32, i32>::new();
        let mut invalid = empty.begin_mut();
        assert_eq!(invalid.key_mut(), Err(RingError::Dereference));
        assert_eq!(invalid.entry_mut(), Err(RingError::Dereference));
    }

    #[test]
    fn cursor_mut_swap_with() {
        let mut left = ten();
        let mut right = Ring::from_iter([(100, 200)]);
        let mut empty = Ring::<i32, i32>::new();

        let mut cursor = left.begin_mut();
        assert!(!cursor.swap_with(&mut empty.begin_mut()));
        assert!(cursor.swap_with(&mut right.begin_mut()));
        assert_eq!(left.begin().entry(), Ok((&100, &200)));
        assert_eq!(right.begin().entry(), Ok((&0, &1)));
    }

    #[test]
    fn cursor_iter_is_cyclic() {
        let ring = Ring::from_iter([(1, 'a'), (2, 'b'), (3, 'c')]);
        let mut iter = ring.begin().into_iter();
        let keys: Vec<_> = iter.by_ref().take(7).map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 2, 3, 1, 2, 3, 1]);
        assert_eq!(iter.peek(), Some((&2, &'b')));

        let mut back = iter.rev();
        let keys: Vec<_> = back.by_ref().take(4).map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![2, 1, 3, 2]);
        assert_eq!(back.into_cursor().key(), Ok(&1));

        let empty = Ring::<i32, char>::new();
        assert_eq!(empty.begin().into_iter().next(), None);
    }
}
