//! Error types for persistent arrays.
//!
//! Every failure is a logic error in the caller: an index outside the array,
//! a dereference of a cursor that does not point at an element, or a source
//! sequence that is too short. None of them depend on external state, so
//! nothing is retried and nothing is swallowed.

/// Errors reported by [`PersistentArray`](super::PersistentArray) and its cursors.
///
/// # Examples
///
/// ```rust
/// use lambars_array::persistent::{ArrayError, PersistentArray};
///
/// let array: PersistentArray<i32> = PersistentArray::filled(3, 0);
/// assert_eq!(
///     array.update(5, 1).unwrap_err(),
///     ArrayError::OutOfRange { index: 5, length: 3 }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// The index is not in `0..length`.
    OutOfRange {
        /// The rejected index.
        index: usize,
        /// Logical size of the array.
        length: usize,
    },
    /// A cursor was dereferenced while not pointing at an element.
    InvalidAccess {
        /// Logical position of the cursor.
        position: isize,
    },
    /// The source sequence ended before the requested length was reached.
    LengthMismatch {
        /// Number of elements requested.
        expected: usize,
        /// Number of elements the source produced.
        actual: usize,
    },
}

impl std::fmt::Display for ArrayError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { index, length } => write!(
                formatter,
                "index out of range: the length is {length} but the index is {index}"
            ),
            Self::InvalidAccess { position } => write!(
                formatter,
                "invalid access: cursor at position {position} does not point at an element"
            ),
            Self::LengthMismatch { expected, actual } => write!(
                formatter,
                "length mismatch: expected {expected} elements but the source produced {actual}"
            ),
        }
    }
}

impl std::error::Error for ArrayError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        ArrayError::OutOfRange { index: 7, length: 5 },
        "index out of range: the length is 5 but the index is 7"
    )]
    #[case(
        ArrayError::InvalidAccess { position: -1 },
        "invalid access: cursor at position -1 does not point at an element"
    )]
    #[case(
        ArrayError::LengthMismatch { expected: 4, actual: 2 },
        "length mismatch: expected 4 elements but the source produced 2"
    )]
    fn test_display(#[case] error: ArrayError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(ArrayError::InvalidAccess { position: 3 });
        assert!(error.source().is_none());
    }
}
