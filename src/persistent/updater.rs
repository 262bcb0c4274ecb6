//! Path copying.
//!
//! Replacing one element allocates a new leaf and one new branch per level on
//! the root-to-leaf path. Each new branch copies the handles of its
//! predecessor's children and swaps in the rebuilt child; every off-path
//! subtree is shared with the previous version. `O(log_K N)` allocations.

use super::Ownership;
use super::node::{Node, NodeHandle, child_size, which};

/// Returns a new subtree equal to `node` except that the leaf at `index`
/// holds `replace(&old)`.
///
/// `index` must be less than `node.size()`. The branch sizes are copied
/// unchanged.
pub(crate) fn update_node<T, F, const BITS: u32, S>(
    node: &Node<T, BITS, S>,
    index: usize,
    replace: F,
) -> NodeHandle<T, BITS, S>
where
    F: FnOnce(&T) -> T,
    S: Ownership,
{
    match node {
        Node::Leaf(value) => Node::<T, BITS, S>::leaf(replace(value)),
        Node::Branch(branch) => {
            let size = branch.size();
            let slot = which::<BITS>(index, size);
            let offset = index - child_size::<BITS>(size) * slot;

            let replacement = update_node(branch.child(slot), offset, replace);
            let mut children = branch.children().clone();
            children[slot] = replacement;
            Node::<T, BITS, S>::branch_with_size(size, children)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::builder::build_with;
    use crate::persistent::{ArcOwnership, RcOwnership};
    use rstest::rstest;
    use std::convert::Infallible;
    use std::rc::Rc;

    type BinaryNode = Node<usize, 1, RcOwnership>;

    fn build(length: usize) -> Rc<BinaryNode> {
        let Ok(Some(root)) =
            build_with::<usize, Infallible, _, 1, RcOwnership>(length, &mut |index| Ok(index))
        else {
            panic!("non-empty build must yield a root");
        };
        root
    }

    fn children(node: &BinaryNode) -> Vec<Rc<BinaryNode>> {
        match node {
            Node::Leaf(_) => Vec::new(),
            Node::Branch(branch) => branch.children().iter().cloned().collect(),
        }
    }

    #[rstest]
    fn test_update_replaces_only_target_leaf() {
        let root = build(5);
        let updated = update_node(&*root, 4, |_| 100);

        assert_eq!(updated.size(), 5);
        assert_eq!(*updated.find(4), 100);
        for index in 0..4 {
            assert_eq!(*updated.find(index), index);
        }
        assert_eq!(*root.find(4), 4);
    }

    #[rstest]
    fn test_update_shares_off_path_siblings() {
        let root = build(8);
        let updated = update_node(&*root, 0, |old| old + 10);

        let old_children = children(&root);
        let new_children = children(&updated);
        // Left half rebuilt, right half shared.
        assert!(!Rc::ptr_eq(&old_children[0], &new_children[0]));
        assert!(Rc::ptr_eq(&old_children[1], &new_children[1]));
        assert_eq!(*updated.find(0), 10);
    }

    #[rstest]
    fn test_update_allocates_one_node_per_level() {
        let root = build(16);
        let updated = update_node(&*root, 9, |_| 0);

        let mut fresh = 1;
        let mut old = root;
        let mut new = updated;
        loop {
            let old_children = children(&old);
            let new_children = children(&new);
            if old_children.is_empty() {
                break;
            }
            let differing: Vec<usize> = (0..old_children.len())
                .filter(|&slot| !Rc::ptr_eq(&old_children[slot], &new_children[slot]))
                .collect();
            assert_eq!(differing.len(), 1);
            fresh += 1;
            old = Rc::clone(&old_children[differing[0]]);
            new = Rc::clone(&new_children[differing[0]]);
        }
        // 16 leaves: four branch levels plus the leaf.
        assert_eq!(fresh, 5);
    }
    fn build_and_update<const BITS: u32, S: Ownership>(length: usize, index: usize) {
        let Ok(Some(root)) =
            build_with::<usize, Infallible, _, BITS, S>(length, &mut |leaf| Ok(leaf))
        else {
            panic!("non-empty build must yield a root");
        };
        let updated = update_node::<usize, _, BITS, S>(&*root, index, |old| old * 10);

        assert_eq!(updated.size(), length);
        for position in 0..length {
            let expected = if position == index { index * 10 } else { position };
            assert_eq!(*updated.find(position), expected);
            assert_eq!(*root.find(position), position);
        }
    }

    #[rstest]
    #[case(1, 0)]
    #[case(9, 8)]
    #[case(70, 33)]
    fn test_update_under_every_ownership_and_width(#[case] length: usize, #[case] index: usize) {
        build_and_update::<1, RcOwnership>(length, index);
        build_and_update::<3, RcOwnership>(length, index);
        build_and_update::<3, ArcOwnership>(length, index);
        build_and_update::<6, ArcOwnership>(length, index);
    }
}
