//! Tree nodes and the child-selection arithmetic.
//!
//! A tree over `[0, N)` is a balanced `K`-ary tree with `K = 1 << BITS`.
//! A branch covering `n` leaves splits its range into children of
//! `child_size(n) = ceil(n / K)` leaves each; the last child may be shorter
//! and trailing children that would be empty are not stored.

use smallvec::SmallVec;

use super::Ownership;

/// Largest supported branching exponent (`K = 64`).
pub const MAX_BITS: u32 = 6;

/// Children kept inline before `SmallVec` spills to the heap (covers `K <= 8`).
const INLINE_CHILDREN: usize = 8;

/// Shared handle to a node under ownership strategy `S`.
pub(crate) type NodeHandle<T, const BITS: u32, S> = <S as Ownership>::Handle<Node<T, BITS, S>>;

/// Ordered child handles of a branch.
pub(crate) type Children<T, const BITS: u32, S> = SmallVec<[NodeHandle<T, BITS, S>; INLINE_CHILDREN]>;

// =============================================================================
// Arithmetic
// =============================================================================

/// Branching factor `K` for an exponent.
#[inline]
pub(crate) const fn branching<const BITS: u32>() -> usize {
    1 << BITS
}

/// Number of leaves in a full child of a subtree with `size` leaves.
#[inline]
pub(crate) const fn child_size<const BITS: u32>(size: usize) -> usize {
    size.div_ceil(branching::<BITS>())
}

/// Index of the child whose range contains `index` in a subtree of `size` leaves.
#[inline]
pub(crate) const fn which<const BITS: u32>(index: usize, size: usize) -> usize {
    index / child_size::<BITS>(size)
}

/// Sizes of the non-empty children of a subtree with `size > 1` leaves, in order.
pub(crate) fn child_sizes<const BITS: u32>(size: usize) -> impl Iterator<Item = usize> {
    let step = child_size::<BITS>(size);
    (0..size).step_by(step).map(move |start| step.min(size - start))
}

// =============================================================================
// Node Definition
// =============================================================================

/// A tree node. Never mutated after construction.
pub(crate) enum Node<T, const BITS: u32, S: Ownership> {
    /// A single element.
    Leaf(T),
    /// Internal node with a cached leaf count.
    Branch(Branch<T, BITS, S>),
}

/// Internal node: between 2 and `K` non-empty children.
pub(crate) struct Branch<T, const BITS: u32, S: Ownership> {
    size: usize,
    children: Children<T, BITS, S>,
}

impl<T, const BITS: u32, S: Ownership> Branch<T, BITS, S> {
    /// Number of leaves below this branch.
    #[inline]
    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) const fn children(&self) -> &Children<T, BITS, S> {
        &self.children
    }

    /// The child at `slot`, which must be less than the number of children.
    #[inline]
    pub(crate) fn child(&self, slot: usize) -> &Node<T, BITS, S> {
        &self.children[slot]
    }
}

impl<T, const BITS: u32, S: Ownership> Node<T, BITS, S> {
    /// Allocates a leaf holding `value`.
    #[inline]
    pub(crate) fn leaf(value: T) -> NodeHandle<T, BITS, S> {
        S::allocate(Self::Leaf(value))
    }

    /// Allocates a branch over already-owned children, summing their sizes.
    pub(crate) fn branch(children: Children<T, BITS, S>) -> NodeHandle<T, BITS, S> {
        let size = children.iter().map(|child| child.size()).sum();
        Self::branch_with_size(size, children)
    }

    /// Allocates a branch whose size is already known.
    pub(crate) fn branch_with_size(
        size: usize,
        children: Children<T, BITS, S>,
    ) -> NodeHandle<T, BITS, S> {
        debug_assert!(children.len() >= 2 && children.len() <= branching::<BITS>());
        debug_assert_eq!(size, children.iter().map(|child| child.size()).sum::<usize>());
        S::allocate(Self::Branch(Branch { size, children }))
    }

    /// Number of leaves below this node.
    #[inline]
    pub(crate) const fn size(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Branch(branch) => branch.size,
        }
    }

    /// Returns the element at `index`, descending from this node.
    ///
    /// `index` must be less than `self.size()`.
    pub(crate) fn find(&self, mut index: usize) -> &T {
        let mut node = self;
        loop {
            match node {
                Self::Leaf(value) => return value,
                Self::Branch(branch) => {
                    let slot = which::<BITS>(index, branch.size);
                    index -= child_size::<BITS>(branch.size) * slot;
                    node = branch.child(slot);
                }
            }
        }
    }

    /// Number of branch levels on the path to the leftmost leaf.
    pub(crate) fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Self::Branch(branch) = node {
            depth += 1;
            node = branch.child(0);
        }
        depth
    }
}
