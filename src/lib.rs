//! # lambars-array
//!
//! A persistent (immutable, versioned) fixed-size array for Rust.
//!
//! ## Overview
//!
//! [`PersistentArray`](persistent::PersistentArray) stores its elements in the
//! leaves of a balanced K-ary tree. `update` copies the path to one leaf and
//! shares everything else, so it runs in O(log N) and never disturbs older
//! versions:
//!
//! - **Persistent arrays**: fixed length, O(log N) `get` and `update`
//! - **Branching factor**: binary by default, 4-way and 8-way variants
//! - **Cursors**: random access with O(log N) seek, step and distance
//! - **Ownership strategies**: `Rc` for single-threaded use, `Arc` for
//!   sharing versions across threads
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` instead of `Rc` by default
//! - `serde`: `Serialize`/`Deserialize` as a sequence
//! - `tracing`: emit `tracing` events from construction and updates
//!
//! ## Example
//!
//! ```rust
//! use lambars_array::prelude::*;
//!
//! let array: PersistentArray<i32> = PersistentArray::from([1, 2, 3, 4, 5]);
//! let updated = array.update(4, -6).unwrap();
//!
//! assert_eq!(array[4], 5);
//! assert_eq!(updated[4], -6);
//! assert_eq!(*(updated.begin() + 4).get().unwrap(), -6);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use lambars_array::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;

mod tracing_helpers;
