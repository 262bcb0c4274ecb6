//! Sequential iteration over a persistent array.
//!
//! [`Iter`] is a pair of cursors closing in on each other, so it walks the
//! array in O(N) from either end and skips ahead in O(log N) with `nth`.

use std::iter::FusedIterator;

use super::{Cursor, DefaultOwnership, Ownership};

/// An iterator over references to the elements of a
/// [`PersistentArray`](super::PersistentArray).
///
/// # Examples
///
/// ```rust
/// use lambars_array::persistent::PersistentArray;
///
/// let array: PersistentArray<i32> = (1..=5).collect();
///
/// let forward: Vec<&i32> = array.iter().collect();
/// assert_eq!(forward, vec![&1, &2, &3, &4, &5]);
///
/// let backward: Vec<&i32> = array.iter().rev().collect();
/// assert_eq!(backward, vec![&5, &4, &3, &2, &1]);
/// ```
pub struct Iter<'a, T, const BITS: u32 = 1, S: Ownership = DefaultOwnership> {
    front: Cursor<'a, T, BITS, S>,
    back: Cursor<'a, T, BITS, S>,
    remaining: usize,
}

impl<'a, T, const BITS: u32, S: Ownership> Iter<'a, T, BITS, S> {
    /// Iterates over `[front, back)`.
    pub(crate) const fn new(
        front: Cursor<'a, T, BITS, S>,
        back: Cursor<'a, T, BITS, S>,
        remaining: usize,
    ) -> Self {
        Self {
            front,
            back,
            remaining,
        }
    }
}

impl<'a, T, const BITS: u32, S: Ownership> Iterator for Iter<'a, T, BITS, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let element = self.front.get().ok()?;
        self.front.increment();
        self.remaining -= 1;
        Some(element)
    }

    fn nth(&mut self, skip: usize) -> Option<Self::Item> {
        if skip >= self.remaining {
            self.front = self.back.clone();
            self.remaining = 0;
            return None;
        }
        self.front.advance(isize::try_from(skip).ok()?);
        self.remaining -= skip;
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, const BITS: u32, S: Ownership> DoubleEndedIterator for Iter<'_, T, BITS, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back.decrement();
        self.remaining -= 1;
        self.back.get().ok()
    }
}

impl<T, const BITS: u32, S: Ownership> ExactSizeIterator for Iter<'_, T, BITS, S> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, const BITS: u32, S: Ownership> FusedIterator for Iter<'_, T, BITS, S> {}

impl<T, const BITS: u32, S: Ownership> Clone for Iter<'_, T, BITS, S> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::persistent::{EightFoldArray, PersistentArray};
    use rstest::rstest;

    #[rstest]
    fn test_meets_in_the_middle() {
        let array: PersistentArray<i32> = (0..6).collect();
        let mut iter = array.iter();
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.len(), 4);
        let middle: Vec<&i32> = iter.by_ref().collect();
        assert_eq!(middle, vec![&1, &2, &3, &4]);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[rstest]
    fn test_nth_skips_ahead() {
        let array: EightFoldArray<i32> = (0..100).collect();
        let mut iter = array.iter();
        assert_eq!(iter.nth(40), Some(&40));
        assert_eq!(iter.next(), Some(&41));
        assert_eq!(iter.len(), 58);
        assert_eq!(iter.nth(100), None);
        assert_eq!(iter.next(), None);
    }

    #[rstest]
    fn test_empty_iterator() {
        let array: PersistentArray<i32> = PersistentArray::filled(0, 7);
        assert_eq!(array.iter().next(), None);
        assert_eq!(array.iter().len(), 0);
    }
}
