#![cfg(test)]

// Property tests for QuadMap kept inside the crate so they can reach the
// prime helpers without exporting them.

use crate::hashers::{self, KeyHasher};
use crate::prime::is_prime;
use crate::quad_map::QuadMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i64),
    Remove(usize),
    Get(usize),
    Contains(String),
    Resize(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i64>()).prop_map(|(i, v)| OpI::Put(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            3 => idx.clone().prop_map(OpI::Get),
            2 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => (0usize..80).prop_map(OpI::Resize),
            1 => Just(OpI::Clear),
            2 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap, plus the
// table's own structural invariants after every operation:
// - capacity is prime at all times;
// - load factor is strictly below 0.5 after every put;
// - empty_buckets() + len() == capacity() (tombstones count as empty);
// - resize below the live count leaves capacity untouched, otherwise the
//   adopted capacity is a prime >= the request;
// - get/contains/remove/iteration all agree with the model.
fn run_scenario<H: KeyHasher>(
    hasher: H,
    pool: &[String],
    ops: &[OpI],
) -> Result<(), TestCaseError> {
    let mut sut: QuadMap<i64, H> = QuadMap::new(11, hasher);
    let mut model: HashMap<String, i64> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[*i];
                sut.put(k, *v);
                model.insert(k.clone(), *v);
                prop_assert!(
                    sut.table_load() < 0.5,
                    "load {} not strictly below 0.5 after put",
                    sut.table_load()
                );
            }
            OpI::Remove(i) => {
                let k = &pool[*i];
                let removed = sut.remove(k);
                let expected = model.remove(k);
                prop_assert_eq!(removed, expected);
                // Double removal is a silent no-op.
                prop_assert_eq!(sut.remove(k), None);
            }
            OpI::Get(i) => {
                let k = &pool[*i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s), model.contains_key(s));
            }
            OpI::Resize(n) => {
                let cap_before = sut.capacity();
                sut.resize(*n);
                if *n < model.len() {
                    prop_assert_eq!(sut.capacity(), cap_before, "shrink guard must not touch capacity");
                } else {
                    prop_assert!(sut.capacity() >= *n);
                }
            }
            OpI::Clear => {
                let cap_before = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), cap_before);
                prop_assert_eq!(sut.empty_buckets(), cap_before);
            }
            OpI::Iterate => {
                let seen: BTreeMap<String, i64> =
                    sut.iter().map(|(k, v)| (k.to_owned(), *v)).collect();
                let expected: BTreeMap<String, i64> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(is_prime(sut.capacity()), "capacity {} not prime", sut.capacity());
        prop_assert_eq!(sut.empty_buckets() + sut.len(), sut.capacity());
    }

    // Final sweep: every model entry is retrievable with its last value.
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(v));
        prop_assert!(sut.contains_key(k));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(hashers::fnv1a, &pool, &ops).unwrap();
    }

    // Same invariants under the weak additive hash, which collides on
    // anagrams and short keys, to exercise longer probe chains.
    #[test]
    fn prop_state_machine_weak_hash((pool, ops) in arb_scenario()) {
        run_scenario(hashers::additive, &pool, &ops).unwrap();
    }

    // Worst case: every key on one probe chain. Stresses tombstone
    // traversal, resurrection and the saturation purge in put.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(|_: &str| 0, &pool, &ops).unwrap();
    }
}
