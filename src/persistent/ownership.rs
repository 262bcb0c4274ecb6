//! Ownership strategies for tree nodes shared between array versions.
//!
//! Every version of a [`PersistentArray`](super::PersistentArray) owns its
//! root through a reference-counted handle. Unchanged subtrees are shared
//! between versions by cloning handles, never by copying nodes, and a node is
//! released when its last handle is dropped.
//!
//! The handle type is supplied by an [`Ownership`] strategy:
//!
//! - [`RcOwnership`]: `std::rc::Rc`, non-atomic count, single-threaded
//! - [`ArcOwnership`]: `std::sync::Arc`, atomic count, versions can be sent
//!   to and shared with other threads
//!
//! [`DefaultOwnership`] is `RcOwnership` unless the `arc` feature is enabled.
//!
//! Trees never contain cycles (parents point down, children never point up),
//! so plain strong counts are enough to reclaim every node.
//!
//! # Examples
//!
//! ```rust
//! use lambars_array::persistent::{ArcOwnership, PersistentArray};
//!
//! let array: PersistentArray<i32, 1, ArcOwnership> = (0..8).collect();
//! let shared = std::sync::Arc::new(array);
//!
//! let worker = {
//!     let shared = std::sync::Arc::clone(&shared);
//!     std::thread::spawn(move || shared.get(3).copied())
//! };
//! assert_eq!(worker.join().unwrap(), Some(3));
//! ```

use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

/// A strategy for allocating and sharing tree nodes.
///
/// Cloning a handle increments a reference count and yields a handle to the
/// same node. Dropping a handle decrements the count and frees the node, and
/// transitively its children, once the count reaches zero.
pub trait Ownership: 'static {
    /// Shared, read-only handle to a node.
    type Handle<N>: Clone + Deref<Target = N>;

    /// Moves `node` into a freshly allocated handle with a count of one.
    #[must_use]
    fn allocate<N>(node: N) -> Self::Handle<N>;

    /// Returns `true` if both handles point to the same allocation.
    #[must_use]
    fn ptr_eq<N>(left: &Self::Handle<N>, right: &Self::Handle<N>) -> bool;

    /// Returns the number of live handles to the node.
    #[must_use]
    fn strong_count<N>(handle: &Self::Handle<N>) -> usize;

    /// Returns `true` if handles can be cloned and dropped from several threads.
    #[must_use]
    fn is_thread_safe() -> bool;
}

/// Single-threaded ownership backed by [`std::rc::Rc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RcOwnership;

impl Ownership for RcOwnership {
    type Handle<N> = Rc<N>;

    #[inline]
    fn allocate<N>(node: N) -> Rc<N> {
        Rc::new(node)
    }

    #[inline]
    fn ptr_eq<N>(left: &Rc<N>, right: &Rc<N>) -> bool {
        Rc::ptr_eq(left, right)
    }

    #[inline]
    fn strong_count<N>(handle: &Rc<N>) -> usize {
        Rc::strong_count(handle)
    }

    #[inline]
    fn is_thread_safe() -> bool {
        false
    }
}

/// Thread-safe ownership backed by [`std::sync::Arc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ArcOwnership;

impl Ownership for ArcOwnership {
    type Handle<N> = Arc<N>;

    #[inline]
    fn allocate<N>(node: N) -> Arc<N> {
        Arc::new(node)
    }

    #[inline]
    fn ptr_eq<N>(left: &Arc<N>, right: &Arc<N>) -> bool {
        Arc::ptr_eq(left, right)
    }

    #[inline]
    fn strong_count<N>(handle: &Arc<N>) -> usize {
        Arc::strong_count(handle)
    }

    #[inline]
    fn is_thread_safe() -> bool {
        true
    }
}

/// Ownership strategy used when none is named.
///
/// When the `arc` feature is enabled, this is [`ArcOwnership`],
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is [`RcOwnership`],
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub type DefaultOwnership = ArcOwnership;

/// Ownership strategy used when none is named.
///
/// When the `arc` feature is enabled, this is [`ArcOwnership`],
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is [`RcOwnership`],
/// which is faster but not thread-safe.
#[cfg(not(feature = "arc"))]
pub type DefaultOwnership = RcOwnership;
