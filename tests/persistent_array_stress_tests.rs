//! Stress tests for PersistentArray.
//!
//! Every version produced by a random sequence of updates is mirrored by a
//! plain `Vec`, and all versions are checked against their mirrors at the
//! end. Older versions must never observe later updates.

use lambars_array::persistent::{
    ArcOwnership, DefaultOwnership, FourFoldArray, Ownership, PersistentArray, RcOwnership,
};
use proptest::prelude::*;
use rstest::rstest;

/// One step of a version history.
#[derive(Clone, Debug)]
enum Operation {
    /// Derive a new version from `version` by writing `value` at `index`.
    Update {
        version: usize,
        index: usize,
        value: i64,
    },
    /// Read `index` from `version`.
    Read { version: usize, index: usize },
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (any::<usize>(), any::<usize>(), any::<i64>())
            .prop_map(|(version, index, value)| Operation::Update { version, index, value }),
        1 => (any::<usize>(), any::<usize>())
            .prop_map(|(version, index)| Operation::Read { version, index }),
    ]
}

/// Replays `operations` against both structures and checks every version.
fn replay<const BITS: u32, S: Ownership>(length: usize, operations: &[Operation]) {
    let initial: Vec<i64> = (0..length).map(|value| value as i64).collect();
    let mut versions: Vec<PersistentArray<i64, BITS, S>> = vec![initial.iter().copied().collect()];
    let mut mirrors: Vec<Vec<i64>> = vec![initial];

    for operation in operations {
        match *operation {
            Operation::Update {
                version,
                index,
                value,
            } => {
                let version = version % versions.len();
                let index = index % length;
                let updated = versions[version].update(index, value).unwrap();
                let mut mirror = mirrors[version].clone();
                mirror[index] = value;
                versions.push(updated);
                mirrors.push(mirror);
            }
            Operation::Read { version, index } => {
                let version = version % versions.len();
                let index = index % length;
                assert_eq!(versions[version].get(index), Some(&mirrors[version][index]));
            }
        }
    }

    for (array, mirror) in versions.iter().zip(&mirrors) {
        assert_eq!(&array.to_vec(), mirror);
        assert_eq!(array.iter().rev().count(), mirror.len());
    }
}

// =============================================================================
// Property-Based Histories
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_binary_history_matches_oracle(
        length in 1usize..80,
        operations in prop::collection::vec(operation_strategy(), 0..120)
    ) {
        replay::<1, DefaultOwnership>(length, &operations);
    }

    #[test]
    fn prop_four_fold_history_matches_oracle(
        length in 1usize..80,
        operations in prop::collection::vec(operation_strategy(), 0..120)
    ) {
        replay::<2, RcOwnership>(length, &operations);
    }

    #[test]
    fn prop_eight_fold_arc_history_matches_oracle(
        length in 1usize..80,
        operations in prop::collection::vec(operation_strategy(), 0..120)
    ) {
        replay::<3, ArcOwnership>(length, &operations);
    }
}

// =============================================================================
// Deterministic Long Run
// =============================================================================

/// Linear congruential generator so the long run is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_value(&mut self) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as usize
    }
}

#[rstest]
#[case(1)]
#[case(1000)]
#[case(4099)]
fn test_long_random_history(#[case] length: usize) {
    let mut generator = Lcg(length as u64);
    let operations: Vec<Operation> = (0..2000)
        .map(|step| {
            if step % 4 == 3 {
                Operation::Read {
                    version: generator.next_value(),
                    index: generator.next_value(),
                }
            } else {
                Operation::Update {
                    version: generator.next_value(),
                    index: generator.next_value(),
                    value: generator.next_value() as i64,
                }
            }
        })
        .collect();

    replay::<1, DefaultOwnership>(length, &operations);
    replay::<2, DefaultOwnership>(length, &operations);
}

#[rstest]
fn test_sweeping_updates_preserve_every_version() {
    let base: FourFoldArray<usize> = FourFoldArray::filled(257, 0);
    let versions: Vec<FourFoldArray<usize>> = (0..257)
        .scan(base.clone(), |current, index| {
            *current = current.update(index, index + 1).unwrap();
            Some(current.clone())
        })
        .collect();

    for (step, version) in versions.iter().enumerate() {
        for (index, element) in version.iter().enumerate() {
            let expected = if index <= step { index + 1 } else { 0 };
            assert_eq!(*element, expected, "version {step} index {index}");
        }
    }
    assert!(base.iter().all(|element| *element == 0));
}
