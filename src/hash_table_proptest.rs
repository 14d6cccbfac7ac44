#![cfg(test)]

// Property tests for HashTable kept inside the crate so the checks can
// read bucket-level state alongside the public API.

use crate::cursor::Cursor;
use crate::error::Error;
use crate::hash_table::HashTable;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrInsertDefault(usize, i32),
    Remove(usize),
    Find(usize),
    Get(String),
    SetLoadFactor(usize),
    Rehash,
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let get_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::GetOrInsertDefault(i, d)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![get_pool.prop_map(|s: String| s), "[a-z]{0,5}".prop_map(|s| s)]
                .prop_map(OpI::Get),
            1 => (0usize..=4).prop_map(OpI::SetLoadFactor),
            1 => Just(OpI::Rehash),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_state_machine<S: BuildHasher>(
    mut sut: HashTable<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    // Last cursor handed out by `find`, and whether the table has been
    // structurally mutated since.
    let mut held: Option<(Cursor, Key, bool)> = None;

    for op in ops {
        let len_before = sut.len();
        let buckets_before = sut.bucket_count();
        let mut structural = false;

        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            OpI::GetOrInsertDefault(i, d) => {
                let k = key_from(pool, i);
                let sv = sut.get_or_insert_default(k.clone());
                *sv = sv.wrapping_add(d);
                let mv = model.entry(k).or_default();
                *mv = mv.wrapping_add(d);
                prop_assert_eq!(*sv, *mv);
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                let c = sut.find(&k);
                prop_assert_eq!(c.is_some(), model.contains_key(&k));
                // Lookup without mutation is idempotent.
                prop_assert_eq!(sut.find(&k), c);
                prop_assert_eq!(sut.bucket_count(), buckets_before);
                if let Some(c) = c {
                    prop_assert_eq!(c.key(&sut), Ok(&k));
                    prop_assert_eq!(c.value(&sut).ok(), model.get(&k));
                    held = Some((c, k, true));
                }
            }
            OpI::Get(s) => {
                let expected = model.get(s.as_str());
                prop_assert_eq!(sut.get(s.as_str()), expected);
                prop_assert_eq!(sut.contains_key(s.as_str()), expected.is_some());
                match sut.at(s.as_str()) {
                    Ok(v) => prop_assert_eq!(Some(v), expected),
                    Err(e) => {
                        prop_assert_eq!(e, Error::KeyNotFound);
                        prop_assert!(expected.is_none());
                    }
                }
            }
            OpI::SetLoadFactor(n) => {
                let factor_before = sut.max_load_factor();
                match sut.set_load_factor(n) {
                    Ok(()) => prop_assert_eq!(sut.max_load_factor(), n),
                    Err(e) => {
                        prop_assert_eq!(n, 0);
                        prop_assert_eq!(e, Error::InvalidLoadFactor);
                        prop_assert_eq!(sut.max_load_factor(), factor_before);
                    }
                }
            }
            OpI::Rehash => {
                sut.rehash();
                prop_assert_eq!(sut.bucket_count(), 2 * buckets_before + 1);
                structural = true;
            }
            OpI::Iterate => {
                let s_pairs: BTreeMap<_, _> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m_pairs: BTreeMap<_, _> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s_pairs, m_pairs);

                let mut walked = 0;
                let mut c = sut.begin();
                while !c.is_end(&sut)? {
                    walked += 1;
                    c = c.next(&sut)?;
                }
                prop_assert_eq!(walked, model.len());
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), 1);
                structural = true;
            }
        }

        if sut.len() != len_before || sut.bucket_count() != buckets_before {
            structural = true;
        }
        if let Some((c, k, valid)) = held.as_mut() {
            *valid &= !structural;
            if *valid {
                prop_assert_eq!(c.key(&sut), Ok(&*k));
            } else {
                prop_assert_eq!(c.key(&sut), Err(Error::StaleCursor));
                prop_assert_eq!(c.is_end(&sut), Err(Error::StaleCursor));
            }
        }

        // Post-conditions after each op
        // 1) Size parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // 2) Load factor holds
        prop_assert!(sut.len() <= sut.bucket_count() * sut.max_load_factor());
        // 3) Chains account for every entry
        let chained: usize = (0..sut.bucket_count())
            .map(|b| sut.bucket_len(b).unwrap_or(0))
            .sum();
        prop_assert_eq!(chained, sut.len());
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `insert` returns the replaced value exactly when the model had one.
// - `get_or_insert_default` inserts on a miss and never duplicates a key.
// - `remove` of an absent key is a no-op; `len` never drifts.
// - `find` is idempotent; its cursor resolves until the next structural
//   mutation and reports `StaleCursor` afterwards.
// - `len <= bucket_count * max_load_factor` after every op; chains sum to `len`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(HashTable::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, with every key in one
// chain. This stresses chain scanning and removal from the middle and end.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(HashTable::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
