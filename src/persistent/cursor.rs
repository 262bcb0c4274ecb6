//! Random-access cursors over the leaves of a persistent array.
//!
//! A [`Cursor`] remembers the chain of nodes from the root down to its leaf
//! together with a packed path: `BITS` bits per level recording which child
//! was taken. Moving by `n` climbs only as far as the first ancestor whose
//! range contains the target and then descends again, so `+= 1` and `-= 1`
//! are O(1) amortized and any jump is O(log N). The distance between two
//! cursors is computed below their lowest common ancestor, without going back
//! to the root.
//!
//! A cursor whose position falls outside `0..len` is *detached*: it keeps its
//! logical position (so `end() - 1` and `begin() + len` behave as expected) but
//! cannot be dereferenced until moved back into range.
//!
//! # Examples
//!
//! ```rust
//! use lambars_array::persistent::PersistentArray;
//!
//! let array: PersistentArray<char> = "persistent".chars().collect();
//!
//! let mut cursor = array.begin();
//! cursor += 3;
//! assert_eq!(cursor.get(), Ok(&'s'));
//!
//! let end = array.end();
//! assert_eq!(&end - &cursor, 7);
//! assert!(end.get().is_err());
//! assert_eq!((end - 1).get(), Ok(&'t'));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr;

use arrayvec::ArrayVec;

use super::node::{Node, child_size, which};
use super::{ArrayError, DefaultOwnership, Ownership};

/// Upper bound on the number of nodes on a root-to-leaf path.
///
/// Every branch has at least two children, so a tree over at most
/// `usize::MAX` leaves has at most `usize::BITS` branch levels.
const STACK_CAPACITY: usize = usize::BITS as usize + 1;

#[inline]
fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

// =============================================================================
// Cursor Definition
// =============================================================================

/// A random-access position in a [`PersistentArray`](super::PersistentArray).
///
/// Cursors borrow the array they were created from and never modify it.
///
/// # Time Complexity
///
/// | Operation            | Complexity                      |
/// |----------------------|---------------------------------|
/// | `get`                | O(1)                            |
/// | `increment`          | O(1) amortized, O(log N) worst  |
/// | `advance(n)`         | O(log N)                        |
/// | `distance`           | O(log N)                        |
/// | `position`           | O(log N)                        |
/// | `==` (same version)  | O(1)                            |
pub struct Cursor<'a, T, const BITS: u32 = 1, S: Ownership = DefaultOwnership> {
    /// Nodes from the root to the current leaf; only the root when detached.
    stack: ArrayVec<&'a Node<T, BITS, S>, STACK_CAPACITY>,
    /// Child index taken below `stack[level]`, at bits `level * BITS..`.
    path: u128,
    /// Logical position when outside `0..len`.
    detached: Option<isize>,
}

impl<'a, T, const BITS: u32, S: Ownership> Cursor<'a, T, BITS, S> {
    const SLOT_MASK: u128 = (1 << BITS) - 1;

    /// Creates a cursor at `position`, descending from `root`.
    pub(crate) fn new(root: Option<&'a Node<T, BITS, S>>, position: usize) -> Self {
        let mut cursor = Self {
            stack: ArrayVec::new(),
            path: 0,
            detached: None,
        };
        match root {
            Some(root) => {
                cursor.stack.push(root);
                if position < root.size() {
                    cursor.descend(position);
                } else {
                    cursor.detached = Some(signed(position));
                }
            }
            None => cursor.detached = Some(signed(position)),
        }
        cursor
    }

    #[inline]
    const fn shift(level: usize) -> usize {
        level * BITS as usize
    }

    /// Child index taken below `stack[level]`.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn slot_at(&self, level: usize) -> usize {
        ((self.path >> Self::shift(level)) & Self::SLOT_MASK) as usize
    }

    /// Descends from the top of the stack to the leaf at `offset` within it.
    fn descend(&mut self, mut offset: usize) {
        while let Some(Node::Branch(branch)) = self.stack.last().copied() {
            let level = self.stack.len() - 1;
            let slot = which::<BITS>(offset, branch.size());
            offset -= child_size::<BITS>(branch.size()) * slot;
            self.path |= (slot as u128) << Self::shift(level);
            self.stack.push(branch.child(slot));
        }
    }

    /// Sum of the offsets contributed by the levels from `depth` down to the leaf.
    fn offset_below(&self, depth: usize) -> usize {
        (depth..self.stack.len().saturating_sub(1))
            .map(|level| child_size::<BITS>(self.stack[level].size()) * self.slot_at(level))
            .sum()
    }

    /// Returns the element under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidAccess`] if the cursor is detached.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::{ArrayError, PersistentArray};
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// assert_eq!(array.begin().get(), Ok(&1));
    /// assert_eq!(
    ///     array.end().get(),
    ///     Err(ArrayError::InvalidAccess { position: 3 })
    /// );
    /// ```
    pub fn get(&self) -> Result<&'a T, ArrayError> {
        match (self.detached, self.stack.last().copied()) {
            (None, Some(Node::Leaf(value))) => Ok(value),
            _ => Err(ArrayError::InvalidAccess {
                position: self.position(),
            }),
        }
    }

    /// Returns the element `offset` positions away, like `it[n]`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidAccess`] if that position is outside the array.
    pub fn at(&self, offset: isize) -> Result<&'a T, ArrayError> {
        (self.clone() + offset).get()
    }

    /// Returns `true` if the cursor is outside `0..len`.
    #[inline]
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.detached.is_some()
    }

    /// Logical position of the cursor; `len` for `end()`.
    #[must_use]
    pub fn position(&self) -> isize {
        self.detached.unwrap_or_else(|| signed(self.offset_below(0)))
    }

    /// Moves the cursor by `delta` positions (`+=`).
    ///
    /// Only the ancestors whose ranges do not contain the target are left;
    /// the cursor then descends again from the nearest one that does.
    /// A cursor moved outside the array becomes detached, and a detached
    /// cursor moved back inside reattaches.
    pub fn advance(&mut self, delta: isize) -> &mut Self {
        let Some(&root) = self.stack.first() else {
            let position = self.detached.unwrap_or(0);
            self.detached = Some(position.saturating_add(delta));
            return self;
        };

        // Target offset relative to the start of the node on top of the stack.
        let mut target = match self.detached.take() {
            Some(position) => position.saturating_add(delta),
            None => delta,
        };

        while self.stack.len() > 1 && !Self::covers(self.top(), target) {
            let level = self.stack.len() - 2;
            let parent = self.stack[level];
            let skipped = child_size::<BITS>(parent.size()) * self.slot_at(level);
            target = target.saturating_add(signed(skipped));
            self.path &= !(Self::SLOT_MASK << Self::shift(level));
            self.stack.pop();
        }

        match usize::try_from(target) {
            Ok(offset) if offset < self.top().size() => self.descend(offset),
            _ => {
                debug_assert!(self.stack.len() == 1 && ptr::eq(self.top(), root));
                self.detached = Some(target);
            }
        }
        self
    }

    /// Moves the cursor back by `delta` positions (`-=`).
    #[inline]
    pub fn retreat(&mut self, delta: isize) -> &mut Self {
        self.advance(delta.saturating_neg())
    }

    /// Moves to the next position (`++it`).
    #[inline]
    pub fn increment(&mut self) -> &mut Self {
        self.advance(1)
    }

    /// Moves to the previous position (`--it`).
    #[inline]
    pub fn decrement(&mut self) -> &mut Self {
        self.advance(-1)
    }

    /// Moves to the next position and returns the cursor as it was (`it++`).
    #[must_use]
    pub fn post_increment(&mut self) -> Self {
        let previous = self.clone();
        self.advance(1);
        previous
    }

    /// Moves to the previous position and returns the cursor as it was (`it--`).
    #[must_use]
    pub fn post_decrement(&mut self) -> Self {
        let previous = self.clone();
        self.advance(-1);
        previous
    }

    /// Signed number of positions from `other` to `self` (`self - other`).
    ///
    /// For cursors over the same array only the levels below the lowest
    /// common ancestor of the two leaves are visited.
    #[must_use]
    pub fn distance(&self, other: &Self) -> isize {
        let attached = self.detached.is_none() && other.detached.is_none();
        let shared_root = match (self.stack.first(), other.stack.first()) {
            (Some(left), Some(right)) => ptr::eq(*left, *right),
            _ => false,
        };
        if !(attached && shared_root) {
            return self.position().saturating_sub(other.position());
        }

        let mut depth = self.stack.len().min(other.stack.len()) - 1;
        while !ptr::eq(self.stack[depth], other.stack[depth]) {
            depth -= 1;
        }
        signed(self.offset_below(depth)) - signed(other.offset_below(depth))
    }

    #[inline]
    fn top(&self) -> &'a Node<T, BITS, S> {
        self.stack[self.stack.len() - 1]
    }

    #[inline]
    fn covers(node: &Node<T, BITS, S>, offset: isize) -> bool {
        usize::try_from(offset).is_ok_and(|offset| offset < node.size())
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, const BITS: u32, S: Ownership> Clone for Cursor<'_, T, BITS, S> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            path: self.path,
            detached: self.detached,
        }
    }
}

impl<T, const BITS: u32, S: Ownership> fmt::Debug for Cursor<'_, T, BITS, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Cursor")
            .field("position", &self.position())
            .field("depth", &self.stack.len())
            .field("detached", &self.is_detached())
            .finish_non_exhaustive()
    }
}

/// Two cursors are equal when they are at the same position.
///
/// Attached cursors over the same root compare their leaves directly; any
/// other pair (different versions, or a detached side) compares positions,
/// which keeps `==` in agreement with [`Ord`].
impl<T, const BITS: u32, S: Ownership> PartialEq for Cursor<'_, T, BITS, S> {
    fn eq(&self, other: &Self) -> bool {
        let attached = self.detached.is_none() && other.detached.is_none();
        match (self.stack.first(), other.stack.first()) {
            (Some(left), Some(right)) if attached && ptr::eq(*left, *right) => {
                ptr::eq(self.top(), other.top())
            }
            _ => self.position() == other.position(),
        }
    }
}

impl<T, const BITS: u32, S: Ownership> Eq for Cursor<'_, T, BITS, S> {}

impl<T, const BITS: u32, S: Ownership> PartialOrd for Cursor<'_, T, BITS, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cursors are ordered by position.
impl<T, const BITS: u32, S: Ownership> Ord for Cursor<'_, T, BITS, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.distance(other).cmp(&0)
    }
}

impl<T, const BITS: u32, S: Ownership> AddAssign<isize> for Cursor<'_, T, BITS, S> {
    #[inline]
    fn add_assign(&mut self, delta: isize) {
        self.advance(delta);
    }
}

impl<T, const BITS: u32, S: Ownership> SubAssign<isize> for Cursor<'_, T, BITS, S> {
    #[inline]
    fn sub_assign(&mut self, delta: isize) {
        self.retreat(delta);
    }
}

impl<T, const BITS: u32, S: Ownership> Add<isize> for Cursor<'_, T, BITS, S> {
    type Output = Self;

    #[inline]
    fn add(mut self, delta: isize) -> Self {
        self.advance(delta);
        self
    }
}

impl<'a, T, const BITS: u32, S: Ownership> Add<isize> for &Cursor<'a, T, BITS, S> {
    type Output = Cursor<'a, T, BITS, S>;

    #[inline]
    fn add(self, delta: isize) -> Cursor<'a, T, BITS, S> {
        self.clone() + delta
    }
}

impl<'a, T, const BITS: u32, S: Ownership> Add<Cursor<'a, T, BITS, S>> for isize {
    type Output = Cursor<'a, T, BITS, S>;

    #[inline]
    fn add(self, cursor: Cursor<'a, T, BITS, S>) -> Cursor<'a, T, BITS, S> {
        cursor + self
    }
}

impl<T, const BITS: u32, S: Ownership> Sub<isize> for Cursor<'_, T, BITS, S> {
    type Output = Self;

    #[inline]
    fn sub(mut self, delta: isize) -> Self {
        self.retreat(delta);
        self
    }
}

impl<'a, T, const BITS: u32, S: Ownership> Sub<isize> for &Cursor<'a, T, BITS, S> {
    type Output = Cursor<'a, T, BITS, S>;

    #[inline]
    fn sub(self, delta: isize) -> Cursor<'a, T, BITS, S> {
        self.clone() - delta
    }
}

impl<T, const BITS: u32, S: Ownership> Sub for &Cursor<'_, T, BITS, S> {
    type Output = isize;

    #[inline]
    fn sub(self, other: Self) -> isize {
        self.distance(other)
    }
}

impl<T, const BITS: u32, S: Ownership> Sub for Cursor<'_, T, BITS, S> {
    type Output = isize;

    #[inline]
    fn sub(self, other: Self) -> isize {
        self.distance(&other)
    }
}

// =============================================================================
// ReverseCursor Definition
// =============================================================================

/// A cursor that walks an array from back to front (`rbegin()`/`rend()`).
///
/// Wraps a forward cursor `base` and refers to the element just before it,
/// so `rbegin()` wraps `end()` and reads the last element. Moving forward
/// moves `base` backward.
///
/// # Examples
///
/// ```rust
/// use lambars_array::persistent::PersistentArray;
///
/// let array: PersistentArray<i32> = (1..=4).collect();
/// let mut cursor = array.rbegin();
/// let mut reversed = Vec::new();
/// while cursor != array.rend() {
///     reversed.push(*cursor.get().unwrap());
///     cursor.increment();
/// }
/// assert_eq!(reversed, vec![4, 3, 2, 1]);
/// ```
pub struct ReverseCursor<'a, T, const BITS: u32 = 1, S: Ownership = DefaultOwnership> {
    base: Cursor<'a, T, BITS, S>,
}

impl<'a, T, const BITS: u32, S: Ownership> ReverseCursor<'a, T, BITS, S> {
    /// Wraps a forward cursor.
    #[inline]
    #[must_use]
    pub const fn new(base: Cursor<'a, T, BITS, S>) -> Self {
        Self { base }
    }

    /// The underlying forward cursor, one past the element this cursor reads.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> &Cursor<'a, T, BITS, S> {
        &self.base
    }

    /// Unwraps the underlying forward cursor.
    #[inline]
    #[must_use]
    pub fn into_base(self) -> Cursor<'a, T, BITS, S> {
        self.base
    }

    /// Returns the element under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidAccess`] if the cursor is at or past `rend()`
    /// or before `rbegin()`.
    pub fn get(&self) -> Result<&'a T, ArrayError> {
        self.base.at(-1)
    }

    /// Returns the element `offset` positions further along the reverse order.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::InvalidAccess`] if that position is outside the array.
    pub fn at(&self, offset: isize) -> Result<&'a T, ArrayError> {
        self.base.at((-1_isize).saturating_sub(offset))
    }

    /// Moves `delta` positions along the reverse order.
    #[inline]
    pub fn advance(&mut self, delta: isize) -> &mut Self {
        self.base.retreat(delta);
        self
    }

    /// Moves `delta` positions back along the reverse order.
    #[inline]
    pub fn retreat(&mut self, delta: isize) -> &mut Self {
        self.base.advance(delta);
        self
    }

    /// Moves to the next position in reverse order.
    #[inline]
    pub fn increment(&mut self) -> &mut Self {
        self.advance(1)
    }

    /// Moves to the previous position in reverse order.
    #[inline]
    pub fn decrement(&mut self) -> &mut Self {
        self.advance(-1)
    }

    /// Signed number of reverse positions from `other` to `self`.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> isize {
        other.base.distance(&self.base)
    }
}

impl<T, const BITS: u32, S: Ownership> Clone for ReverseCursor<'_, T, BITS, S> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
        }
    }
}

impl<T, const BITS: u32, S: Ownership> fmt::Debug for ReverseCursor<'_, T, BITS, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ReverseCursor")
            .field("base", &self.base)
            .finish()
    }
}

impl<T, const BITS: u32, S: Ownership> PartialEq for ReverseCursor<'_, T, BITS, S> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<T, const BITS: u32, S: Ownership> Eq for ReverseCursor<'_, T, BITS, S> {}

impl<T, const BITS: u32, S: Ownership> PartialOrd for ReverseCursor<'_, T, BITS, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, const BITS: u32, S: Ownership> Ord for ReverseCursor<'_, T, BITS, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.base.cmp(&self.base)
    }
}

impl<T, const BITS: u32, S: Ownership> AddAssign<isize> for ReverseCursor<'_, T, BITS, S> {
    #[inline]
    fn add_assign(&mut self, delta: isize) {
        self.advance(delta);
    }
}

impl<T, const BITS: u32, S: Ownership> SubAssign<isize> for ReverseCursor<'_, T, BITS, S> {
    #[inline]
    fn sub_assign(&mut self, delta: isize) {
        self.retreat(delta);
    }
}

impl<T, const BITS: u32, S: Ownership> Add<isize> for ReverseCursor<'_, T, BITS, S> {
    type Output = Self;

    #[inline]
    fn add(mut self, delta: isize) -> Self {
        self.advance(delta);
        self
    }
}

impl<T, const BITS: u32, S: Ownership> Sub<isize> for ReverseCursor<'_, T, BITS, S> {
    type Output = Self;

    #[inline]
    fn sub(mut self, delta: isize) -> Self {
        self.retreat(delta);
        self
    }
}

impl<T, const BITS: u32, S: Ownership> Sub for &ReverseCursor<'_, T, BITS, S> {
    type Output = isize;

    #[inline]
    fn sub(self, other: Self) -> isize {
        self.distance(other)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::persistent::{FourFoldArray, PersistentArray};
    use rstest::rstest;

    #[rstest]
    fn test_path_records_child_indices() {
        // K = 4, 7 leaves: root children cover [0, 2), [2, 4), [4, 6), [6, 7)
        let array: FourFoldArray<i32> = (1..=7).collect();
        let cursor = array.cursor_at(5);
        assert_eq!(cursor.slot_at(0), 2);
        assert_eq!(cursor.slot_at(1), 1);
        assert_eq!(cursor.position(), 5);
    }

    #[rstest]
    fn test_advance_clears_popped_levels() {
        let array: PersistentArray<i32> = (0..16).collect();
        let mut cursor = array.cursor_at(15);
        cursor.advance(-15);
        assert_eq!(cursor.path, 0);
        assert_eq!(cursor.get(), Ok(&0));
    }

    #[rstest]
    fn test_detached_cursor_keeps_only_root() {
        let array: PersistentArray<i32> = (0..10).collect();
        let mut cursor = array.begin();
        cursor.advance(12);
        assert!(cursor.is_detached());
        assert_eq!(cursor.stack.len(), 1);
        assert_eq!(cursor.path, 0);
        assert_eq!(cursor.position(), 12);
    }

    #[rstest]
    fn test_local_step_stays_below_common_ancestor() {
        let array: PersistentArray<i32> = (0..1024).collect();
        let mut cursor = array.cursor_at(512);
        let depth = cursor.stack.len();
        cursor.increment();
        // 512 -> 513 shares every ancestor but the leaf's parent level.
        assert_eq!(cursor.stack.len(), depth);
        assert_eq!(cursor.get(), Ok(&513));
    }

    #[rstest]
    fn test_empty_array_cursors_are_detached() {
        let array: PersistentArray<i32> = PersistentArray::filled(0, 0);
        let mut cursor = array.begin();
        assert!(cursor.is_detached());
        assert_eq!(cursor, array.end());
        cursor.advance(3);
        assert_eq!(cursor.position(), 3);
        assert_eq!(&cursor - &array.begin(), 3);
    }
}
