//! Bottom-up construction of balanced trees.
//!
//! A range of `n > 1` leaves is cut into at most `K` consecutive sub-ranges of
//! `child_size(n)` leaves (the last one shorter), each built recursively and
//! then joined under one branch. Leaves are produced left to right, so a
//! source sequence is consumed in order and exactly once per leaf.
//!
//! Construction is O(N) and allocates one node per tree node.

use super::node::{Children, Node, NodeHandle, child_sizes};
use super::{ArrayError, Ownership};
use crate::tracing_helpers::{debug_log, trace_log};

/// Builds a tree of `length` leaves whose values come from `next`.
///
/// `next` is called once per leaf, in index order, with that leaf's index.
/// The first error it returns aborts the build. Returns `Ok(None)` for an
/// empty tree.
pub(crate) fn build_with<T, E, F, const BITS: u32, S>(
    length: usize,
    next: &mut F,
) -> Result<Option<NodeHandle<T, BITS, S>>, E>
where
    F: FnMut(usize) -> Result<T, E>,
    S: Ownership,
{
    trace_log!(length, bits = BITS, "building tree");
    if length == 0 {
        return Ok(None);
    }
    let mut produced = 0;
    build_range::<T, E, F, BITS, S>(length, next, &mut produced).map(Some)
}

fn build_range<T, E, F, const BITS: u32, S>(
    size: usize,
    next: &mut F,
    produced: &mut usize,
) -> Result<NodeHandle<T, BITS, S>, E>
where
    F: FnMut(usize) -> Result<T, E>,
    S: Ownership,
{
    if size == 1 {
        let value = next(*produced)?;
        *produced += 1;
        return Ok(Node::<T, BITS, S>::leaf(value));
    }

    let children = child_sizes::<BITS>(size)
        .map(|child| build_range::<T, E, F, BITS, S>(child, next, produced))
        .collect::<Result<Children<T, BITS, S>, E>>()?;
    Ok(Node::<T, BITS, S>::branch(children))
}

/// Builds a tree of `length` leaves, pulling elements lazily from `source`.
///
/// Exactly `length` elements are taken; anything after them stays in the
/// iterator. Fails with [`ArrayError::LengthMismatch`] if `source` runs dry
/// first.
pub(crate) fn build_from_iter<T, I, const BITS: u32, S>(
    length: usize,
    source: &mut I,
) -> Result<Option<NodeHandle<T, BITS, S>>, ArrayError>
where
    I: Iterator<Item = T>,
    S: Ownership,
{
    build_with::<T, ArrayError, _, BITS, S>(length, &mut |index| {
        source.next().ok_or_else(|| {
            debug_log!(expected = length, actual = index, "source exhausted");
            ArrayError::LengthMismatch {
                expected: length,
                actual: index,
            }
        })
    })
}
