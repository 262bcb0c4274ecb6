//! Persistent (immutable) fixed-size array based on a balanced K-ary tree.
//!
//! This module provides [`PersistentArray`], an immutable array whose
//! `update` returns a new version in O(log N) while every earlier version
//! stays valid and readable.
//!
//! # Overview
//!
//! The elements are the leaves of a balanced tree with `K = 1 << BITS`
//! children per branch. Updating an element copies only the root-to-leaf path
//! and shares every other subtree with the previous version, so keeping many
//! versions alive costs O(log N) memory per version.
//!
//! - `O(log_K N)` random access
//! - `O(log_K N)` update
//! - O(N) construction
//! - O(1) clone
//! - Random-access [`Cursor`]s with O(log N) arithmetic
//!
//! The logical size is fixed when the array is built; there is no push or
//! pop.
//!
//! # Examples
//!
//! ```rust
//! use lambars_array::persistent::PersistentArray;
//!
//! let array: PersistentArray<i32> = PersistentArray::from([1, 2, 3, 4, 5]);
//! let updated = array.update(4, -6).unwrap();
//!
//! assert_eq!(array.to_vec(), vec![1, 2, 3, 4, 5]);    // Original unchanged
//! assert_eq!(updated.to_vec(), vec![1, 2, 3, 4, -6]); // New version
//! ```

use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Index;

use super::builder::{build_from_iter, build_with};
use super::node::{MAX_BITS, Node, NodeHandle};
use super::updater::update_node;
use super::{ArrayError, Cursor, DefaultOwnership, Iter, Ownership, ReverseCursor};
use crate::tracing_helpers::{debug_log, trace_log};

// =============================================================================
// PersistentArray Definition
// =============================================================================

/// A persistent (immutable) array of fixed length.
///
/// `BITS` selects the branching factor `K = 1 << BITS` (binary by default)
/// and `S` the [`Ownership`] strategy that shares nodes between versions.
///
/// Indexing is bounds-checked: [`get`](Self::get) returns `None`,
/// [`update`](Self::update) returns [`ArrayError::OutOfRange`] and the `[]`
/// operator panics.
///
/// # Time Complexity
///
/// | Operation      | Complexity                      |
/// |----------------|---------------------------------|
/// | `filled`       | O(N)                            |
/// | `get`          | `O(log_K N)`                    |
/// | `update`       | `O(log_K N)`                    |
/// | `begin`/`end`  | `O(log_K N)`                    |
/// | `len`          | O(1)                            |
/// | `clone`        | O(1)                            |
/// | `iter`         | O(log N) to create, O(N) to iterate |
/// | `to_vec`       | O(N)                            |
///
/// # Examples
///
/// ```rust
/// use lambars_array::persistent::PersistentArray;
///
/// let array: PersistentArray<i32> = (0..100).collect();
/// assert_eq!(array.len(), 100);
/// assert_eq!(array.get(50), Some(&50));
/// assert_eq!(array[99], 99);
/// ```
pub struct PersistentArray<T, const BITS: u32 = 1, S: Ownership = DefaultOwnership> {
    /// Logical size, fixed for every version
    length: usize,
    /// Root of the tree; `None` only when `length == 0`
    root: Option<NodeHandle<T, BITS, S>>,
}

/// A persistent array with two children per branch.
pub type BinaryArray<T, S = DefaultOwnership> = PersistentArray<T, 1, S>;

/// A persistent array with four children per branch.
pub type FourFoldArray<T, S = DefaultOwnership> = PersistentArray<T, 2, S>;

/// A persistent array with eight children per branch.
pub type EightFoldArray<T, S = DefaultOwnership> = PersistentArray<T, 3, S>;

impl<T, const BITS: u32, S: Ownership> PersistentArray<T, BITS, S> {
    const fn from_root(root: Option<NodeHandle<T, BITS, S>>, length: usize) -> Self {
        const {
            assert!(
                BITS >= 1 && BITS <= MAX_BITS,
                "the branching exponent must be between 1 and MAX_BITS"
            );
        }
        Self { length, root }
    }

    #[inline]
    fn root_node(&self) -> Option<&Node<T, BITS, S>> {
        self.root.as_deref()
    }

    /// Creates an array of `length` elements pulled lazily from `source`.
    ///
    /// Exactly `length` elements are taken. To keep whatever follows them,
    /// pass the iterator by reference (`iter.by_ref()`).
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::LengthMismatch`] if `source` yields fewer than
    /// `length` elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::{ArrayError, PersistentArray};
    ///
    /// let mut source = 1..=10;
    /// let array: PersistentArray<i32> =
    ///     PersistentArray::from_iter_exact(3, source.by_ref()).unwrap();
    /// assert_eq!(array.to_vec(), vec![1, 2, 3]);
    /// assert_eq!(source.next(), Some(4));
    ///
    /// let short: Result<PersistentArray<i32>, _> = PersistentArray::from_iter_exact(5, 0..2);
    /// assert_eq!(
    ///     short.unwrap_err(),
    ///     ArrayError::LengthMismatch { expected: 5, actual: 2 }
    /// );
    /// ```
    pub fn from_iter_exact<I>(length: usize, source: I) -> Result<Self, ArrayError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut source = source.into_iter();
        let root = build_from_iter::<T, _, BITS, S>(length, &mut source)?;
        Ok(Self::from_root(root, length))
    }

    /// Returns the number of elements in the array.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns a reference to the element at the given index.
    ///
    /// Returns `None` if the index is out of bounds.
    ///
    /// # Complexity
    ///
    /// `O(log_K N)`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=5).collect();
    /// assert_eq!(array.get(0), Some(&1));
    /// assert_eq!(array.get(4), Some(&5));
    /// assert_eq!(array.get(10), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.root_node()
            .filter(|_| index < self.length)
            .map(|root| root.find(index))
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfRange`] if `index >= len()`.
    pub fn try_get(&self, index: usize) -> Result<&T, ArrayError> {
        self.get(index).ok_or(ArrayError::OutOfRange {
            index,
            length: self.length,
        })
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a reference to the last element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.length.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns a new array with the element at `index` replaced.
    ///
    /// The original array is unchanged. Only the `O(log_K N)` nodes on the path
    /// to `index` are allocated; everything else is shared.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfRange`] if `index >= len()`.
    ///
    /// # Complexity
    ///
    /// `O(log_K N)`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=5).collect();
    /// let updated = array.update(2, 100).unwrap();
    ///
    /// assert_eq!(updated.get(2), Some(&100));
    /// assert_eq!(array.get(2), Some(&3)); // Original unchanged
    /// ```
    pub fn update(&self, index: usize, element: T) -> Result<Self, ArrayError> {
        self.update_with(index, move |_| element)
    }

    /// Returns a new array with the element at `index` replaced by
    /// `function(&old)`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfRange`] if `index >= len()`; `function` is
    /// not called in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=3).collect();
    /// let doubled = array.update_with(1, |value| value * 2).unwrap();
    /// assert_eq!(doubled.to_vec(), vec![1, 4, 3]);
    /// ```
    pub fn update_with<F>(&self, index: usize, function: F) -> Result<Self, ArrayError>
    where
        F: FnOnce(&T) -> T,
    {
        match self.root_node() {
            Some(root) if index < self.length => {
                trace_log!(index, length = self.length, bits = BITS, "path-copying update");
                let root = update_node(root, index, function);
                Ok(Self::from_root(Some(root), self.length))
            }
            _ => {
                debug_log!(index, length = self.length, "update out of range");
                Err(ArrayError::OutOfRange {
                    index,
                    length: self.length,
                })
            }
        }
    }

    /// Returns a cursor at the first element (`end()` when empty).
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, T, BITS, S> {
        Cursor::new(self.root_node(), 0)
    }

    /// Returns a cursor one past the last element.
    #[must_use]
    pub fn end(&self) -> Cursor<'_, T, BITS, S> {
        Cursor::new(self.root_node(), self.length)
    }

    /// Returns a cursor at `position`, descending once from the root.
    ///
    /// Positions at or beyond `len()` give a detached cursor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (0..10).collect();
    /// assert_eq!(array.cursor_at(7), array.begin() + 7);
    /// assert_eq!(array.cursor_at(10), array.end());
    /// ```
    #[must_use]
    pub fn cursor_at(&self, position: usize) -> Cursor<'_, T, BITS, S> {
        Cursor::new(self.root_node(), position)
    }

    /// Returns a reverse cursor at the last element.
    #[must_use]
    pub fn rbegin(&self) -> ReverseCursor<'_, T, BITS, S> {
        ReverseCursor::new(self.end())
    }

    /// Returns a reverse cursor one before the first element.
    #[must_use]
    pub fn rend(&self) -> ReverseCursor<'_, T, BITS, S> {
        ReverseCursor::new(self.begin())
    }

    /// Returns an iterator over references to the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<i32> = (1..=5).collect();
    /// let collected: Vec<&i32> = array.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3, &4, &5]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T, BITS, S> {
        Iter::new(self.begin(), self.end(), self.length)
    }

    /// Number of branch levels above the leftmost leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root_node().map_or(0, Node::depth)
    }

    /// Returns `true` if both arrays are the same version (share their root).
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(left), Some(right)) => S::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns `true` if versions of this array can be shared between threads.
    #[must_use]
    pub fn is_thread_safe(&self) -> bool {
        S::is_thread_safe()
    }
}

impl<T: Clone, const BITS: u32, S: Ownership> PersistentArray<T, BITS, S> {
    /// Creates an array of `length` copies of `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::PersistentArray;
    ///
    /// let array: PersistentArray<char> = PersistentArray::filled(3, 'x');
    /// assert_eq!(array.to_vec(), vec!['x', 'x', 'x']);
    /// ```
    #[must_use]
    pub fn filled(length: usize, value: T) -> Self {
        let Ok(root) =
            build_with::<T, Infallible, _, BITS, S>(length, &mut |_| Ok(value.clone()));
        Self::from_root(root, length)
    }

    /// Copies the elements, in order, into a `Vec`.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Default, const BITS: u32, S: Ownership> PersistentArray<T, BITS, S> {
    /// Creates an array of `length` default values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_array::persistent::FourFoldArray;
    ///
    /// let array: FourFoldArray<i32> = FourFoldArray::new(4);
    /// assert_eq!(array.to_vec(), vec![0, 0, 0, 0]);
    /// ```
    #[must_use]
    pub fn new(length: usize) -> Self {
        let Ok(root) = build_with::<T, Infallible, _, BITS, S>(length, &mut |_| Ok(T::default()));
        Self::from_root(root, length)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, const BITS: u32, S: Ownership> Clone for PersistentArray<T, BITS, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            root: self.root.clone(),
        }
    }
}

impl<T, const BITS: u32, S: Ownership> Default for PersistentArray<T, BITS, S> {
    fn default() -> Self {
        Self::from_root(None, 0)
    }
}

impl<T, const BITS: u32, S: Ownership> Index<usize> for PersistentArray<T, BITS, S> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(element) => element,
            None => panic!(
                "{}",
                ArrayError::OutOfRange {
                    index,
                    length: self.length
                }
            ),
        }
    }
}

impl<T, const BITS: u32, S: Ownership> From<Vec<T>> for PersistentArray<T, BITS, S> {
    fn from(elements: Vec<T>) -> Self {
        let length = elements.len();
        match Self::from_iter_exact(length, elements) {
            Ok(array) => array,
            Err(error) => unreachable!("a vector yields exactly its length: {error}"),
        }
    }
}

impl<T, const BITS: u32, S: Ownership, const M: usize> From<[T; M]> for PersistentArray<T, BITS, S> {
    fn from(elements: [T; M]) -> Self {
        Self::from(Vec::from(elements))
    }
}

impl<T, const BITS: u32, S: Ownership> FromIterator<T> for PersistentArray<T, BITS, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<T> = iter.into_iter().collect();
        Self::from(elements)
    }
}

impl<'a, T, const BITS: u32, S: Ownership> IntoIterator for &'a PersistentArray<T, BITS, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, BITS, S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone, const BITS: u32, S: Ownership> IntoIterator for PersistentArray<T, BITS, S> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.to_vec().into_iter()
    }
}

impl<T: PartialEq, const BITS: u32, S: Ownership> PartialEq for PersistentArray<T, BITS, S> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        self.ptr_eq(other) || self.iter().eq(other.iter())
    }
}

impl<T: Eq, const BITS: u32, S: Ownership> Eq for PersistentArray<T, BITS, S> {}

impl<T: Hash, const BITS: u32, S: Ownership> Hash for PersistentArray<T, BITS, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug, const BITS: u32, S: Ownership> fmt::Debug for PersistentArray<T, BITS, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, const BITS: u32, S: Ownership> fmt::Display for PersistentArray<T, BITS, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, const BITS: u32, S: Ownership> serde::Serialize
    for PersistentArray<T, BITS, S>
{
    fn serialize<Z>(&self, serializer: Z) -> Result<Z::Ok, Z::Error>
    where
        Z: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentArrayVisitor<T, const BITS: u32, S> {
    marker: std::marker::PhantomData<(T, S)>,
}

#[cfg(feature = "serde")]
impl<T, const BITS: u32, S> PersistentArrayVisitor<T, BITS, S> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, const BITS: u32, S> serde::de::Visitor<'de> for PersistentArrayVisitor<T, BITS, S>
where
    T: serde::Deserialize<'de>,
    S: Ownership,
{
    type Value = PersistentArray<T, BITS, S>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut elements = Vec::with_capacity(capacity);
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(PersistentArray::from(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T, const BITS: u32, S> serde::Deserialize<'de> for PersistentArray<T, BITS, S>
where
    T: serde::Deserialize<'de>,
    S: Ownership,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentArrayVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
