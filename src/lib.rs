//! This crate provides a circular doubly-linked ring of key/info pairs with
//! owned nodes.
//!
//! The [`Ring`] allows inserting and removing entries at any given position in
//! constant time. In compromise, looking up an entry by key takes *O*(*n*)
//! time. Keys need not be unique: lookups take a 1-based occurrence number.
//!
//! Here is a quick example showing how the ring works.
//!
//! ```
//! use keyed_ring::{Ring, RingError};
//!
//! let mut ring = Ring::from_iter([(1, "one"), (2, "two"), (3, "three")]);
//!
//! let two = ring.find(&2, 1)?.position();
//! let four = ring.insert_after(4, "four", two)?; // insert right after 2
//! assert_eq!(ring.to_string(), "[1] one\n[2] two\n[4] four\n[3] three\n");
//!
//! ring.remove(ring.anchor())?; // remove 1, and 2 becomes the anchor
//! assert_eq!(ring.begin().key(), Ok(&2));
//! assert_eq!(ring.cursor(four).info(), Ok(&"four")); // positions survive
//! # Ok::<(), RingError>(())
//! ```
//!
//! # Memory Layout
//!
//! Every node lives in one slot of an arena owned by the ring, and links are
//! slot indices:
//! ```text
//!       ┌──────────────────────────────────────────────────────────────┐
//!       ↓                                                              │
//! ╔═══════════╗           ╔═══════════╗                        ╔═══════════╗
//! ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ ║   next    ║
//! ╟───────────╢           ╟───────────╢                        ╟───────────╢
//! ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── ║   prev    ║
//! ╟───────────╢           ╟───────────╢                        ╟───────────╢
//! ║   stamp   ║           ║   stamp   ║                        ║   stamp   ║
//! ╟───────────╢           ╟───────────╢                        ╟───────────╢
//! ║  key  K   ║           ║  key  K   ║                        ║  key  K   ║
//! ║  info I   ║           ║  info I   ║                        ║  info I   ║
//! ╚═══════════╝           ╚═══════════╝                        ╚═══════════╝
//!   (Anchor)                                                        │
//!       ↑ │                                                         ↑
//!       │ └─────────────────────────────────────────────────────────┘
//! ╔═══════════╗
//! ║  anchor   ║
//! ╟───────────╢
//! ║   nodes   ║
//! ╚═══════════╝
//!     Ring
//! ```
//! The `Ring` contains:
//! - the arena `nodes`, whose number of occupied slots is the length;
//! - the slot of the anchor, or nothing if the ring is empty.
//!
//! A single node links to itself in both directions. There is no sentinel:
//! the anchor's predecessor is the last entry of a forward cycle.
//!
//! # Positions
//!
//! A [`Position`] names an entry without borrowing the ring. It is what the
//! mutating methods of [`Ring`] take and return, so the caller can keep
//! positions around while the ring changes elsewhere.
//!
//! Every node carries a stamp drawn from a process-wide counter, and a
//! position records the slot and the stamp of its node. Positions of
//! different entries, in the same ring or not, therefore never compare
//! equal. A position whose entry was removed keeps being rejected with
//! [`RingError::InvalidIterator`] by every mutation, even after a new node
//! took over its slot.
//!
//! # Iteration
//!
//! Iterating over a ring is by the [`Iter`] and [`IterMut`] iterators. These
//! are double-ended iterators and visit one forward cycle from the anchor
//! (fused and non-cyclic). [`IterMut`] provides mutability of the infos (but
//! not of the keys or the linked structure).
//!
//! ## Examples
//!
//! ```
//! use keyed_ring::Ring;
//!
//! let mut ring = Ring::from_iter([(1, 10), (2, 20)]);
//! let mut iter = ring.iter();
//! assert_eq!(iter.next(), Some((&1, &10)));
//! assert_eq!(iter.next(), Some((&2, &20)));
//! assert_eq!(iter.next(), None); // Fused and non-cyclic
//!
//! ring.iter_mut().for_each(|(_, info)| *info += 1);
//! assert_eq!(Vec::from_iter(ring), vec![(1, 11), (2, 21)]);
//! ```
//!
//! # Cursor Views
//!
//! Beside iteration, the cursors [`Cursor`] and [`CursorMut`] move forward or
//! backward over the ring, wrapping around it. A cursor is either at an
//! entry or invalid; moving or reading through an invalid cursor fails with
//! [`RingError::Dereference`].
//!
//! Cursors can also be used as iterators, which are cyclic and not fused.
//!
//! **Warning**: Though cursor iterators have methods `rev`, they **DO NOT**
//! behave as double-ended iterators. Instead, they create a new iterator that
//! reverses the moving direction of the cursor.
//!
//! ## Examples
//!
//! ```
//! use keyed_ring::Ring;
//!
//! let ring = Ring::from_iter([(1, 'a'), (2, 'b')]);
//! let mut cursor_iter = ring.begin().into_iter();
//! assert_eq!(cursor_iter.next(), Some((&1, &'a')));
//! assert_eq!(cursor_iter.next(), Some((&2, &'b')));
//! assert_eq!(cursor_iter.next(), Some((&1, &'a'))); // Not fused and cyclic
//!
//! let mut cursor_iter = cursor_iter.rev();
//! assert_eq!(cursor_iter.next(), Some((&2, &'b')));
//! assert_eq!(cursor_iter.next(), Some((&1, &'a')));
//! ```
//!
//! # Algorithms
//!
//! Rings compare, hash and render entry by entry from their anchors. `+` and
//! `+=` concatenate, and [`shuffle`] interleaves runs of two rings:
//!
//! ```
//! use keyed_ring::{shuffle, Ring, RingError};
//!
//! let left = Ring::from_iter([(1, 'a'), (2, 'b')]);
//! let right = Ring::from_iter([(3, 'c')]);
//! assert_eq!((&left + &right).to_string(), "[1] a\n[2] b\n[3] c\n");
//!
//! let shuffled = shuffle(&left, 1, &right, 2, 2)?;
//! assert_eq!(shuffled.to_string(), "[1] a\n[3] c\n[3] c\n[2] b\n[3] c\n[3] c\n");
//! # Ok::<(), RingError>(())
//! ```
//!
//! [`Ring`]: crate::Ring
//! [`Position`]: crate::Position
//! [`Iter`]: crate::Iter
//! [`IterMut`]: crate::IterMut
//! [`Cursor`]: crate::ring::cursor::Cursor
//! [`CursorMut`]: crate::ring::cursor::CursorMut
//! [`shuffle`]: crate::shuffle
//! [`RingError::InvalidIterator`]: crate::RingError::InvalidIterator
//! [`RingError::Dereference`]: crate::RingError::Dereference

#[doc(inline)]
pub use error::RingError;
#[doc(inline)]
pub use ring::cursor::{Cursor, CursorMut, Position};
#[doc(inline)]
pub use ring::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use ring::{shuffle, Ring};

pub mod error;
pub mod ring;
