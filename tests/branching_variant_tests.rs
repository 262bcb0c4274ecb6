//! Tests shared by every branching factor.
//!
//! The same suite is instantiated for binary, four-fold and eight-fold trees
//! with both ownership strategies.

use lambars_array::persistent::{ArcOwnership, PersistentArray, RcOwnership};
use paste::paste;
use rstest::rstest;

macro_rules! branching_suite {
    ($name:ident, $bits:literal, $ownership:ty) => {
        paste! {
            mod [<$name _suite>] {
                use super::*;

                type Array<T> = PersistentArray<T, $bits, $ownership>;

                #[rstest]
                #[case(1)]
                #[case(7)]
                #[case(8)]
                #[case(65)]
                #[case(513)]
                fn [<test_ $name _create>](#[case] length: usize) {
                    let array: Array<usize> = (0..length).collect();
                    assert_eq!(array.len(), length);
                    assert_eq!(array.to_vec(), (0..length).collect::<Vec<_>>());
                }

                #[rstest]
                fn [<test_ $name _traverse>]() {
                    let source = vec![3, 1, 4, 1, 5, 9, 2];
                    let array: Array<i32> = PersistentArray::from(source.clone());
                    for (index, element) in source.iter().enumerate() {
                        assert_eq!(&array[index], element);
                    }
                }

                #[rstest]
                fn [<test_ $name _simple_update>]() {
                    let array: Array<i32> = PersistentArray::from([1, 2, 3, 4, 5]);
                    let updated = array.update(4, -6).unwrap();
                    assert_eq!(updated.to_vec(), vec![1, 2, 3, 4, -6]);
                    assert_eq!(array.to_vec(), vec![1, 2, 3, 4, 5]);
                }

                #[rstest]
                fn [<test_ $name _unchanged>]() {
                    let mut versions: Vec<Array<i32>> = vec![PersistentArray::from([1, 2, 3])];
                    versions.push(versions[0].update(0, 8).unwrap());
                    versions.push(versions[1].update(2, 5).unwrap());
                    versions.push(versions[0].update(1, 7).unwrap());

                    let expected = [[1, 2, 3], [8, 2, 3], [8, 2, 5], [1, 7, 3]];
                    for (version, expected) in versions.iter().zip(expected) {
                        assert!(version.iter().eq(expected.iter()));
                    }
                }

                #[rstest]
                fn [<test_ $name _cursor_addition>]() {
                    const N: isize = 10;
                    let array: Array<isize> = (0..N).collect();
                    assert_eq!(array.begin() + N, array.end());

                    for first in 0..N {
                        assert_eq!((array.begin() + first).get(), Ok(&first));
                        assert_eq!((array.end() - (N - first)).get(), Ok(&first));
                        for offset in -first..(N - first) {
                            assert_eq!(
                                (array.begin() + first) + offset,
                                array.begin() + (first + offset)
                            );
                        }
                    }
                }

                #[rstest]
                fn [<test_ $name _cursor_difference>]() {
                    const N: isize = 10;
                    let array: Array<i32> = PersistentArray::new(10);
                    assert_eq!(array.end() - array.begin(), N);

                    for first in 0..N {
                        assert_eq!((array.begin() + first) - array.begin(), first);
                        assert_eq!(array.end() - (array.begin() + first), N - first);
                        for second in 0..N {
                            assert_eq!(
                                (array.begin() + first) - (array.begin() + second),
                                first - second
                            );
                        }
                    }
                }

                #[rstest]
                fn [<test_ $name _iterator_both_ends>]() {
                    let array: Array<u32> = (0..100).collect();
                    assert!(array.iter().rev().copied().eq((0..100).rev()));
                    assert_eq!(array.iter().nth(57), Some(&57));
                    assert_eq!(array.iter().len(), 100);
                }
            }
        }
    };
}

branching_suite!(binary_rc, 1, RcOwnership);
branching_suite!(four_fold_rc, 2, RcOwnership);
branching_suite!(eight_fold_rc, 3, RcOwnership);
branching_suite!(binary_arc, 1, ArcOwnership);
branching_suite!(four_fold_arc, 2, ArcOwnership);
branching_suite!(eight_fold_arc, 3, ArcOwnership);
branching_suite!(sixty_four_fold_rc, 6, RcOwnership);
