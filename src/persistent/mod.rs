//! Persistent (immutable) fixed-size arrays.
//!
//! This module provides [`PersistentArray`], an array whose `update` returns a
//! new version while every older version stays valid, together with the
//! pieces it is built from:
//!
//! - [`PersistentArray`]: the array value (`BinaryArray`, `FourFoldArray` and
//!   `EightFoldArray` fix the branching factor)
//! - [`Cursor`] / [`ReverseCursor`]: random-access positions with O(log N)
//!   arithmetic
//! - [`Iter`]: double-ended iteration over a version
//! - [`Ownership`]: how nodes are shared between versions ([`RcOwnership`],
//!   [`ArcOwnership`])
//!
//! # Structural Sharing
//!
//! Updating an element copies the root-to-leaf path and nothing else. Every
//! subtree off that path is shared by reference count with the version it
//! came from, so `k` updates of an array of `N` elements cost
//! O(N + k log N) memory in total.
//!
//! # Examples
//!
//! ```rust
//! use lambars_array::persistent::PersistentArray;
//!
//! let versions = {
//!     let first: PersistentArray<i32> = PersistentArray::from([1, 2, 3]);
//!     let second = first.update(0, 8).unwrap();
//!     let third = second.update(2, 5).unwrap();
//!     let fourth = first.update(1, 7).unwrap();
//!     [first, second, third, fourth]
//! };
//!
//! assert_eq!(versions[0].to_vec(), vec![1, 2, 3]);
//! assert_eq!(versions[1].to_vec(), vec![8, 2, 3]);
//! assert_eq!(versions[2].to_vec(), vec![8, 2, 5]);
//! assert_eq!(versions[3].to_vec(), vec![1, 7, 3]);
//! ```
//!
//! ## Cursors
//!
//! ```rust
//! use lambars_array::persistent::PersistentArray;
//!
//! let array: PersistentArray<i32> = (0..10).collect();
//! let first = array.begin() + 2;
//! let second = array.begin() + 7;
//!
//! assert_eq!(&second - &first, 5);
//! assert!(first < second);
//! assert_eq!(first.clone() + 5, second);
//! assert_eq!(second.get(), Ok(&7));
//! ```

mod array;
mod builder;
mod cursor;
mod error;
mod iter;
mod node;
mod ownership;
mod updater;

pub use array::BinaryArray;
pub use array::EightFoldArray;
pub use array::FourFoldArray;
pub use array::PersistentArray;
pub use cursor::Cursor;
pub use cursor::ReverseCursor;
pub use error::ArrayError;
pub use iter::Iter;
pub use node::MAX_BITS;
pub use ownership::ArcOwnership;
pub use ownership::DefaultOwnership;
pub use ownership::Ownership;
pub use ownership::RcOwnership;
