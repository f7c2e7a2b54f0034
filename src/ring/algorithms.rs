use crate::error::RingError;
use crate::ring::Ring;
use log::trace;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign};
use std::ptr;

/// Rings are equal if they have the same length and their entries match
/// pairwise, each side walking one forward cycle from its own anchor.
impl<K: PartialEq, I: PartialEq> PartialEq for Ring<K, I> {
    fn eq(&self, other: &Self) -> bool {
        if ptr::eq(self, other) {
            return true;
        }
        self.len() == other.len()
            && self
                .node_order()
                .zip(other.node_order())
                .all(|(a, b)| self.nodes[a] == other.nodes[b])
    }
}

impl<K: Eq, I: Eq> Eq for Ring<K, I> {}

impl<K: Clone, I: Clone> Clone for Ring<K, I> {
    fn clone(&self) -> Self {
        self.iter()
            .map(|(key, info)| (key.clone(), info.clone()))
            .collect()
    }

    /// Reuses the nodes of `self` for the leading entries of `source`, drops
    /// the surplus, and pushes whatever `source` has left.
    fn clone_from(&mut self, source: &Self) {
        let order: Vec<usize> = self.node_order().collect();
        for (&slot, (key, info)) in order.iter().zip(source.iter()) {
            let node = &mut self.nodes[slot];
            node.key.clone_from(key);
            node.info.clone_from(info);
        }
        for &slot in order.iter().skip(source.len()) {
            self.detach_node(slot);
        }
        self.extend(source.iter().skip(order.len()));
    }
}

impl<K: Hash, I: Hash> Hash for Ring<K, I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for entry in self {
            entry.hash(state);
        }
    }
}

/// Concatenate two rings into a new one: the entries of `self` followed by
/// clones of the entries of `rhs`, both in forward order from their anchors.
///
/// # Examples
///
/// ```
/// use keyed_ring::Ring;
///
/// let left = Ring::from_iter([(0, 'a'), (1, 'b')]);
/// let right = Ring::from_iter([(2, 'c')]);
/// let sum = &left + &right;
/// assert_eq!(sum.to_string(), "[0] a\n[1] b\n[2] c\n");
/// assert_eq!(&left + &Ring::new(), left);
/// ```
impl<K: Clone, I: Clone> Add<&Ring<K, I>> for &Ring<K, I> {
    type Output = Ring<K, I>;

    fn add(self, rhs: &Ring<K, I>) -> Ring<K, I> {
        let mut sum = self.clone();
        sum += rhs;
        sum
    }
}

impl<K: Clone, I: Clone> Add<&Ring<K, I>> for Ring<K, I> {
    type Output = Ring<K, I>;

    fn add(mut self, rhs: &Ring<K, I>) -> Ring<K, I> {
        self += rhs;
        self
    }
}

/// Push clones of the entries of `rhs`, in its forward order, before the
/// anchor of `self`.
impl<K: Clone, I: Clone> AddAssign<&Ring<K, I>> for Ring<K, I> {
    fn add_assign(&mut self, rhs: &Ring<K, I>) {
        self.extend(rhs);
    }
}

/// Render one `[key] info` line per entry, forward from the anchor.
impl<K: fmt::Display, I: fmt::Display> fmt::Display for Ring<K, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter()
            .try_for_each(|(key, info)| writeln!(f, "[{}] {}", key, info))
    }
}

/// Build a new ring by taking `fcnt` consecutive entries from `first`, then
/// `scnt` from `second`, `reps` times over.
///
/// Each source is read by its own cursor starting at its anchor. The cursors
/// keep their place between repetitions and wrap around their ring, so a
/// run longer than the remaining entries continues from the anchor again.
///
/// # Errors
///
/// Returns [`RingError::EmptyRing`] if either source is empty, and
/// [`RingError::ZeroCount`] if `fcnt`, `scnt` or `reps` is zero.
///
/// # Examples
///
/// ```
/// use keyed_ring::{shuffle, Ring, RingError};
///
/// let first = Ring::from_iter([(1, 'a'), (2, 'b'), (3, 'c')]);
/// let second = Ring::from_iter([(10, 'x'), (20, 'y')]);
///
/// let shuffled = shuffle(&first, 2, &second, 1, 3)?;
/// let keys: Vec<_> = shuffled.iter().map(|(key, _)| *key).collect();
/// assert_eq!(keys, vec![1, 2, 10, 3, 1, 20, 2, 3, 10]);
///
/// assert_eq!(
///     shuffle(&first, 0, &second, 1, 1),
///     Err(RingError::ZeroCount)
/// );
/// # Ok::<(), RingError>(())
/// ```
pub fn shuffle<K: Clone, I: Clone>(
    first: &Ring<K, I>,
    fcnt: usize,
    second: &Ring<K, I>,
    scnt: usize,
    reps: usize,
) -> Result<Ring<K, I>, RingError> {
    if first.is_empty() || second.is_empty() {
        return Err(RingError::EmptyRing);
    }
    if fcnt == 0 || scnt == 0 || reps == 0 {
        return Err(RingError::ZeroCount);
    }
    trace!(
        "shuffling {} x ({} + {}) entries from rings of {} and {}",
        reps,
        fcnt,
        scnt,
        first.len(),
        second.len()
    );
    let mut shuffled = Ring::new();
    let mut from_first = first.begin().into_iter();
    let mut from_second = second.begin().into_iter();
    for _ in 0..reps {
        shuffled.extend(from_first.by_ref().take(fcnt));
        shuffled.extend(from_second.by_ref().take(scnt));
    }
    Ok(shuffled)
}
