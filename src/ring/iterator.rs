use crate::ring::cursor::{Cursor, CursorBackIter, CursorIter};
use crate::ring::{Node, Ring};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};

/// An iterator over the entries of a `Ring`.
///
/// It visits one forward cycle, starting at the anchor. `front` and `back`
/// are the next entries to yield from each end, and `len` counts the
/// entries left between them.
///
/// # Examples
///
/// ```compile_fail
/// use keyed_ring::Ring;
///
/// let mut ring = Ring::from_iter([(1, 'a'), (2, 'b')]);
/// let mut iter = ring.iter();
///
/// // Won't compile, because the ring is already borrowed immutably.
/// ring.push(3, 'c');
/// println!("{:?}", iter.next());
/// ```
pub struct Iter<'a, K: 'a, I: 'a> {
    ring: &'a Ring<K, I>,
    front: Option<usize>,
    back: Option<usize>,
    len: usize,
}

impl<'a, K: 'a, I: 'a> Iter<'a, K, I> {
    pub(crate) fn new(ring: &'a Ring<K, I>) -> Self {
        Self {
            ring,
            front: ring.anchor,
            back: ring.back_node(),
            len: ring.len(),
        }
    }

    fn entry(&self, node: usize) -> (&'a K, &'a I) {
        let ring = self.ring;
        let node = &ring.nodes[node];
        (&node.key, &node.info)
    }
}

impl<'a, K: 'a, I: 'a> Clone for Iter<'a, K, I> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K: fmt::Debug + 'a, I: fmt::Debug + 'a> fmt::Debug for Iter<'a, K, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.len).finish()
    }
}

impl<'a, K: 'a, I: 'a> Iterator for Iter<'a, K, I> {
    type Item = (&'a K, &'a I);

    /// Return the entry at `front` and advance `front` to its successor, or
    /// return `None` if the cycle is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.front?;
        self.front = Some(self.ring.nodes[node].next);
        self.len -= 1;
        Some(self.entry(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, K: 'a, I: 'a> DoubleEndedIterator for Iter<'a, K, I> {
    /// Return the entry at `back` and retreat `back` to its predecessor, or
    /// return `None` if the cycle is exhausted.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.back?;
        self.back = Some(self.ring.nodes[node].prev);
        self.len -= 1;
        Some(self.entry(node))
    }
}

impl<'a, K: 'a, I: 'a> ExactSizeIterator for Iter<'a, K, I> {}

impl<'a, K: 'a, I: 'a> FusedIterator for Iter<'a, K, I> {}

/// A mutable iterator over the entries of a `Ring`.
///
/// It visits one forward cycle from the anchor and hands out mutable
/// references to the infos; the keys stay shared, so the linking structure
/// and the keys are protected while it is alive. Use a [`CursorMut`] to
/// rewrite a key.
///
/// Creating it splits the arena into one borrow per slot, which allocates a
/// vector as long as the highest occupied slot index. The walk itself is
/// lazy and follows the links through those borrows.
///
/// [`CursorMut`]: crate::ring::cursor::CursorMut
///
/// # Examples
///
/// The ring is not readable while an `IterMut` is alive.
/// ```compile_fail
/// use keyed_ring::Ring;
///
/// let mut ring = Ring::from_iter([(1, 2), (3, 4)]);
/// let mut iter = ring.iter_mut();
/// println!("{}", ring.len());
/// println!("{:?}", iter.next());
/// ```
pub struct IterMut<'a, K: 'a, I: 'a> {
    slots: Vec<Option<&'a mut Node<K, I>>>,
    front: Option<usize>,
    back: Option<usize>,
    len: usize,
}

impl<'a, K: 'a, I: 'a> IterMut<'a, K, I> {
    pub(crate) fn new(ring: &'a mut Ring<K, I>) -> Self {
        let (front, back, len) = (ring.anchor, ring.back_node(), ring.len());
        let mut slots: Vec<Option<&'a mut Node<K, I>>> = Vec::new();
        for (slot, node) in ring.nodes.iter_mut() {
            if slots.len() <= slot {
                slots.resize_with(slot + 1, || None);
            }
            slots[slot] = Some(node);
        }
        Self {
            slots,
            front,
            back,
            len,
        }
    }

    /// Take the borrow of `slot`. Each slot is handed out at most once, as
    /// `len` stops both ends before they cross.
    fn take(&mut self, slot: usize) -> Option<&'a mut Node<K, I>> {
        self.slots.get_mut(slot)?.take()
    }

    fn entry(node: &'a mut Node<K, I>) -> (&'a K, &'a mut I) {
        let Node { key, info, .. } = node;
        (&*key, info)
    }
}

impl<'a, K: fmt::Debug + 'a, I: fmt::Debug + 'a> fmt::Debug for IterMut<'a, K, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IterMut").field(&self.len).finish()
    }
}

impl<'a, K: 'a, I: 'a> Iterator for IterMut<'a, K, I> {
    type Item = (&'a K, &'a mut I);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.take(self.front?)?;
        self.front = Some(node.next);
        self.len -= 1;
        Some(Self::entry(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, K: 'a, I: 'a> DoubleEndedIterator for IterMut<'a, K, I> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.take(self.back?)?;
        self.back = Some(node.prev);
        self.len -= 1;
        Some(Self::entry(node))
    }
}

impl<'a, K: 'a, I: 'a> ExactSizeIterator for IterMut<'a, K, I> {}

impl<'a, K: 'a, I: 'a> FusedIterator for IterMut<'a, K, I> {}

/// An owning iterator over the entries of a `Ring`.
///
/// This `struct` is created by the [`into_iter`] method on [`Ring`]
/// (provided by the `IntoIterator` trait). It drains the ring from the
/// anchor forward, or from the anchor's predecessor backward.
///
/// [`into_iter`]: Ring::into_iter
pub struct IntoIter<K, I> {
    ring: Ring<K, I>,
}

impl<K: fmt::Debug, I: fmt::Debug> fmt::Debug for IntoIter<K, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("ring", &self.ring)
            .finish()
    }
}

impl<K, I> Iterator for IntoIter<K, I> {
    type Item = (K, I);

    fn next(&mut self) -> Option<Self::Item> {
        let anchor = self.ring.anchor?;
        let (node, _) = self.ring.detach_node(anchor);
        Some(node.into_entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.ring.len();
        (len, Some(len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<K, I> DoubleEndedIterator for IntoIter<K, I> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let back = self.ring.back_node()?;
        let (node, _) = self.ring.detach_node(back);
        Some(node.into_entry())
    }
}

impl<K, I> ExactSizeIterator for IntoIter<K, I> {}

impl<K, I> FusedIterator for IntoIter<K, I> {}

impl<K, I> IntoIterator for Ring<K, I> {
    type Item = (K, I);
    type IntoIter = IntoIter<K, I>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { ring: self }
    }
}

impl<'a, K, I> IntoIterator for &'a Ring<K, I> {
    type Item = (&'a K, &'a I);
    type IntoIter = Iter<'a, K, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, I> IntoIterator for &'a mut Ring<K, I> {
    type Item = (&'a K, &'a mut I);
    type IntoIter = IterMut<'a, K, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Collect entries into a ring, in order; the first entry becomes the
/// anchor.
impl<K, I> FromIterator<(K, I)> for Ring<K, I> {
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut ring = Ring::new();
        ring.extend(iter);
        ring
    }
}

/// Push every entry, in order, right before the anchor.
impl<K, I> Extend<(K, I)> for Ring<K, I> {
    fn extend<T: IntoIterator<Item = (K, I)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(key, info)| {
            self.push(key, info);
        });
    }
}

impl<'a, K: 'a + Clone, I: 'a + Clone> Extend<(&'a K, &'a I)> for Ring<K, I> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a I)>>(&mut self, iter: T) {
        self.extend(
            iter.into_iter()
                .map(|(key, info)| (key.clone(), info.clone())),
        )
    }
}

impl<'a, K: 'a, I: 'a> Iterator for CursorIter<'a, K, I> {
    type Item = (&'a K, &'a I);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.entry().ok()?;
        self.cursor.move_next().ok()?;
        Some(entry)
    }
}

impl<'a, K: 'a, I: 'a> Iterator for CursorBackIter<'a, K, I> {
    type Item = (&'a K, &'a I);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.entry().ok()?;
        self.cursor.move_prev().ok()?;
        Some(entry)
    }
}

/// Convert the cursor to an iterator, which is cyclic and not fused.
impl<'a, K: 'a, I: 'a> IntoIterator for Cursor<'a, K, I> {
    type Item = (&'a K, &'a I);
    type IntoIter = CursorIter<'a, K, I>;

    fn into_iter(self) -> Self::IntoIter {
        CursorIter { cursor: self }
    }
}
