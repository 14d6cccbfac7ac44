//! HashTable: separate chaining over a growable bucket array.
//!
//! Layout: `GrowableArray<ForwardList<Entry>>`. An entry lives in bucket
//! `hash mod bucket_count`; its chain is scanned linearly for lookups.
//!
//! Load-factor policy: a single check against the size the table has once a
//! new entry is filed. While `len > bucket_count * max_load_factor` the
//! table rehashes into `2 * bucket_count + 1` buckets. Overwrites and
//! removals never rehash, so `bucket_count` only shrinks through `clear`.
//!
//! Each entry keeps the `u64` hash computed at insertion; rehash files
//! entries by that stored hash and never calls `K: Hash` again.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;

use crate::array::GrowableArray;
use crate::builder::HashTableBuilder;
use crate::container::Container;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::forward_list::ForwardList;
use crate::hasher::PositionalState;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// Entries allowed per bucket before a rehash when nothing else is configured.
pub const DEFAULT_MAX_LOAD_FACTOR: usize = 1;

#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

pub(crate) type Bucket<K, V> = ForwardList<Entry<K, V>>;

/// Associative container with separate chaining and eager rehashing.
pub struct HashTable<K, V, S = PositionalState> {
    buckets: GrowableArray<Bucket<K, V>>,
    len: usize,
    max_load_factor: usize,
    hasher: S,
    // Bumped by every structural mutation; cursors compare against it.
    generation: u64,
}

#[inline]
fn address_for(hash: u64, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0);
    (hash % bucket_count as u64) as usize
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty table with no buckets. Does not allocate.
    pub fn new() -> Self {
        Self::with_hasher(PositionalState)
    }

    pub fn with_bucket_count(bucket_count: usize) -> Self {
        Self::with_bucket_count_and_hasher(bucket_count, PositionalState)
    }

    pub fn builder() -> HashTableBuilder<Self> {
        HashTableBuilder::new()
    }
}

impl<K, V, S> HashTable<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_bucket_count_and_hasher(0, hasher)
    }

    pub fn with_bucket_count_and_hasher(bucket_count: usize, hasher: S) -> Self {
        Self::from_parts(bucket_count, DEFAULT_MAX_LOAD_FACTOR, hasher)
    }

    pub(crate) fn from_parts(bucket_count: usize, max_load_factor: usize, hasher: S) -> Self {
        debug_assert!(max_load_factor > 0);
        let mut buckets = GrowableArray::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, ForwardList::new);
        Self {
            buckets,
            len: 0,
            max_load_factor,
            hasher,
            generation: 0,
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries allowed per bucket on average before the table grows.
    #[inline]
    pub fn max_load_factor(&self) -> usize {
        self.max_load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Length of the chain in bucket `index`.
    pub fn bucket_len(&self, index: usize) -> Result<usize> {
        self.buckets.at(index).map(ForwardList::len)
    }

    /// Sets the maximum load factor and rehashes immediately if the current
    /// size already violates it.
    pub fn set_load_factor(&mut self, max_load_factor: usize) -> Result<()> {
        if max_load_factor == 0 {
            return Err(Error::InvalidLoadFactor);
        }
        #[cfg(feature = "logging")]
        log::trace!(
            "max load factor {} -> {} ({} entries, {} buckets)",
            self.max_load_factor,
            max_load_factor,
            self.len,
            self.bucket_count()
        );
        self.max_load_factor = max_load_factor;
        self.grow_for(self.len);
        Ok(())
    }

    /// Rebuilds the bucket array with `2 * bucket_count + 1` buckets and
    /// re-files every entry. Never changes `len`.
    pub fn rehash(&mut self) {
        let old_count = self.buckets.len();
        let new_count = 2 * old_count + 1;

        let mut fresh = GrowableArray::with_capacity(new_count);
        fresh.resize_with(new_count, ForwardList::new);
        let old = mem::replace(&mut self.buckets, fresh);

        for chain in old {
            for entry in chain {
                let address = address_for(entry.hash, new_count);
                self.buckets[address].push_back(entry);
            }
        }
        self.bump_generation();

        #[cfg(feature = "logging")]
        log::debug!(
            "rehashed {} entries: {} -> {} buckets",
            self.len,
            old_count,
            new_count
        );
    }

    /// Drops every entry and resets to a single empty bucket.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.buckets.push(ForwardList::new());
        self.len = 0;
        self.bump_generation();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.buckets, self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Cursor at the first entry in bucket-then-chain order, or the end
    /// cursor when the table is empty.
    pub fn begin(&self) -> Cursor {
        self.first_occupied_from(0)
    }

    /// Cursor one past the last entry.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.bucket_count(), 0, self.generation)
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn entry_at(&self, bucket: usize, slot: usize) -> Option<&Entry<K, V>> {
        self.buckets.as_slice().get(bucket)?.get(slot)
    }

    pub(crate) fn entry_at_mut(&mut self, bucket: usize, slot: usize) -> Option<&mut Entry<K, V>> {
        self.buckets.as_mut_slice().get_mut(bucket)?.get_mut(slot)
    }

    /// Cursor at slot 0 of the first non-empty bucket at or after `bucket`.
    pub(crate) fn first_occupied_from(&self, bucket: usize) -> Cursor {
        let found = self
            .buckets
            .as_slice()
            .iter()
            .enumerate()
            .skip(bucket)
            .find(|(_, chain)| !chain.is_empty());
        match found {
            Some((b, _)) => Cursor::new(b, 0, self.generation),
            None => self.end(),
        }
    }

    fn exceeds_load(&self, len: usize) -> bool {
        len > self.bucket_count().saturating_mul(self.max_load_factor)
    }

    /// Rehashes until `len` entries fit the load factor. An empty bucket
    /// array always grows to one bucket first.
    fn grow_for(&mut self, len: usize) {
        while self.exceeds_load(len) {
            self.rehash();
        }
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// `(bucket, slot)` of the entry matching `q`.
    fn locate<Q>(&self, hash: u64, q: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let bucket = address_for(hash, self.bucket_count());
        self.buckets[bucket]
            .iter()
            .position(|e| e.hash == hash && e.key.borrow() == q)
            .map(|slot| (bucket, slot))
    }

    fn find_entry<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let hash = self.make_hash(q);
        let bucket = address_for(hash, self.bucket_count());
        self.buckets[bucket]
            .iter()
            .find(|e| e.hash == hash && e.key.borrow() == q)
    }

    fn find_entry_mut<Q>(&mut self, q: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.hashed_entry_mut(hash, q)
    }

    /// Chain scan for `q` given its precomputed hash.
    fn hashed_entry_mut<Q>(&mut self, hash: u64, q: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let bucket = address_for(hash, self.bucket_count());
        self.buckets[bucket]
            .iter_mut()
            .find(|e| e.hash == hash && e.key.borrow() == q)
    }

    /// Files a key known to be absent, growing first if the table would
    /// otherwise exceed its load factor.
    fn file_new(&mut self, hash: u64, key: K, value: V) -> &mut V {
        self.grow_for(self.len + 1);
        self.len += 1;
        self.bump_generation();
        let address = address_for(hash, self.bucket_count());
        &mut self.buckets[address]
            .push_back(Entry { key, value, hash })
            .value
    }

    /// Inserts or overwrites. Returns the replaced value on overwrite.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        if let Some(entry) = self.hashed_entry_mut(hash, &key) {
            return Some(mem::replace(&mut entry.value, value));
        }
        self.file_new(hash, key, value);
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry(key).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry_mut(key).map(|e| &mut e.value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry(key).map(|e| (&e.key, &e.value))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry(key).is_some()
    }

    /// Read-only lookup that reports a miss as [`Error::KeyNotFound`].
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the value for `key`, inserting `default()` first on a miss.
    /// `default` only runs on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        match self.locate(hash, &key) {
            Some((bucket, slot)) => {
                &mut self
                    .entry_at_mut(bucket, slot)
                    .expect("located entry must still be linked")
                    .value
            }
            None => self.file_new(hash, key, default()),
        }
    }

    /// Map-style indexing that inserts `V::default()` on a miss.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Removes `key`, returning its value. An absent key is a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let hash = self.make_hash(key);
        let address = address_for(hash, self.bucket_count());

        // Walk with the cursor one node behind the candidate so the match
        // can be unlinked from its predecessor.
        let mut cursor = self.buckets[address].cursor_mut();
        loop {
            let hit = match cursor.peek_next() {
                Some(e) => e.hash == hash && e.key.borrow() == key,
                None => return None,
            };
            if hit {
                break;
            }
            cursor.move_next();
        }
        let entry = cursor.remove_after()?;

        self.len -= 1;
        self.bump_generation();
        Some((entry.key, entry.value))
    }

    /// Cursor at the entry for `key`, valid until the next structural
    /// mutation.
    pub fn find<Q>(&self, key: &Q) -> Option<Cursor>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(key);
        self.locate(hash, key)
            .map(|(bucket, slot)| Cursor::new(bucket, slot, self.generation))
    }
}

impl<K, V, S> Container for HashTable<K, V, S> {
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        HashTable::clear(self);
    }
}

impl<K, V, S> Default for HashTable<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Clone for HashTable<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
            max_load_factor: self.max_load_factor,
            hasher: self.hasher.clone(),
            generation: self.generation,
        }
    }
}

impl<K, V, S> fmt::Debug for HashTable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Map equality: same size and every key maps to an equal value in the
/// other table. Bucket layout and insertion order are irrelevant.
impl<K, V, S> PartialEq for HashTable<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for HashTable<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for HashTable<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Read-only indexing; panics when `key` is absent and never inserts.
    fn index(&self, key: &Q) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V, S> IntoIterator for HashTable<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.buckets, self.len)
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashTable<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::hash::Hasher;

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
        } // every key lands in bucket 0
    }

    fn chain_lengths<K, V, S>(t: &HashTable<K, V, S>) -> Vec<usize> {
        (0..t.bucket_count())
            .map(|i| t.bucket_len(i).unwrap())
            .collect()
    }

    /// Invariant: a fresh table owns no buckets; the first insert grows it to
    /// exactly one.
    #[test]
    fn first_insert_allocates_one_bucket() {
        let mut t: HashTable<u32, &str> = HashTable::new();
        assert_eq!(t.bucket_count(), 0);
        assert_eq!(t.get(&1), None);
        assert!(t.find(&1).is_none());
        assert_eq!(t.remove(&1), None);

        t.insert(1, "one");
        assert_eq!(t.bucket_count(), 1);
        assert_eq!(t.len(), 1);
    }

    /// Invariant: last write wins and overwrites neither change `len` nor
    /// trigger a rehash.
    #[test]
    fn overwrite_keeps_size_and_buckets() {
        let mut t: HashTable<&str, i32> = HashTable::new();
        assert_eq!(t.insert("k", 1), None);
        let buckets = t.bucket_count();
        assert_eq!(t.insert("k", 2), Some(1));
        assert_eq!(t.insert("k", 3), Some(2));
        assert_eq!(t.len(), 1);
        assert_eq!(t.bucket_count(), buckets);
        assert_eq!(t.get("k"), Some(&3));
    }

    /// Invariant: growth follows `2n + 1` and keeps `len <= buckets * factor`
    /// after every insert.
    #[test]
    fn growth_follows_two_n_plus_one() {
        let mut t: HashTable<u64, u64> = HashTable::new();
        let mut seen = vec![t.bucket_count()];
        for i in 0..100 {
            t.insert(i, i * i);
            assert!(t.len() <= t.bucket_count() * t.max_load_factor());
            if *seen.last().unwrap() != t.bucket_count() {
                seen.push(t.bucket_count());
            }
        }
        assert_eq!(seen, vec![0, 1, 3, 7, 15, 31, 63, 127]);
        assert_eq!(chain_lengths(&t).iter().sum::<usize>(), 100);
    }

    /// Invariant: removing an absent key leaves `len` untouched.
    #[test]
    fn remove_absent_key_is_noop() {
        let mut t: HashTable<i32, i32> = (0..5).map(|i| (i, i)).collect();
        assert_eq!(t.remove(&42), None);
        assert_eq!(t.len(), 5);
        assert_eq!(t.remove(&3), Some(3));
        assert_eq!(t.remove(&3), None);
        assert_eq!(t.len(), 4);
        t.insert(3, 30);
        assert_eq!(t.len(), 5);
        assert_eq!(t[&3], 30);
    }

    /// Invariant: removal from the middle and end of a collision chain keeps
    /// the rest of the chain reachable.
    #[test]
    fn removal_within_collision_chain() {
        let mut t: HashTable<String, i32, ConstBuildHasher> =
            HashTable::builder().max_load_factor(16).build_with_hasher(ConstBuildHasher).unwrap();
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            t.insert(k.to_string(), i as i32);
        }
        assert_eq!(t.bucket_len(0), Ok(4));

        assert_eq!(t.remove("b"), Some(1));
        assert_eq!(t.remove("d"), Some(3));
        assert_eq!(t.remove_entry("a"), Some(("a".to_string(), 0)));
        assert_eq!(t.get("c"), Some(&2));
        assert_eq!(t.len(), 1);

        t.insert("e".to_string(), 4);
        let keys: Vec<_> = t.keys().cloned().collect();
        assert_eq!(keys, vec!["c".to_string(), "e".to_string()]);
    }

    /// Invariant: overwriting a key deep in a collision chain replaces it in
    /// place; the chain never gains a duplicate.
    #[test]
    fn overwrite_within_collision_chain() {
        let mut t: HashTable<&str, i32, ConstBuildHasher> = HashTable::builder()
            .max_load_factor(8)
            .build_with_hasher(ConstBuildHasher)
            .unwrap();
        for (i, k) in ["a", "b", "c"].into_iter().enumerate() {
            assert_eq!(t.insert(k, i as i32), None);
        }
        assert_eq!(t.insert("c", 30), Some(2));
        assert_eq!(t.insert("b", 10), Some(1));
        assert_eq!(t.len(), 3);
        assert_eq!(chain_lengths(&t), vec![3]);
        let pairs: Vec<_> = t.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![("a", 0), ("b", 10), ("c", 30)]);
    }

    #[test]
    fn hasher_is_the_configured_one() {
        let t: HashTable<u8, u8> = HashTable::new();
        assert_eq!(*t.hasher(), PositionalState);
        assert_eq!(t.hasher().hash_one(42u64), 42);
    }

    /// Invariant: lowering the load factor rehashes immediately until the
    /// table fits; entries and `len` are preserved.
    #[test]
    fn set_load_factor_forces_rehash() {
        let mut t: HashTable<u32, u32> = HashTable::with_bucket_count(1);
        t.set_load_factor(8).unwrap();
        for i in 0..8 {
            t.insert(i, i + 100);
        }
        assert_eq!(t.bucket_count(), 1);

        t.set_load_factor(1).unwrap();
        assert_eq!(t.bucket_count(), 15);
        assert_eq!(t.len(), 8);
        for i in 0..8 {
            assert_eq!(t.get(&i), Some(&(i + 100)));
        }
        assert_eq!(t.set_load_factor(0), Err(Error::InvalidLoadFactor));
        assert_eq!(t.max_load_factor(), 1);
    }

    #[test]
    fn rehash_preserves_pairs() {
        let mut t: HashTable<String, usize> = (0..40).map(|i| (format!("k{i}"), i)).collect();
        let before: BTreeMap<String, usize> = t.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let buckets = t.bucket_count();
        t.rehash();
        assert_eq!(t.bucket_count(), 2 * buckets + 1);
        let after: BTreeMap<String, usize> = t.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(before, after);
        assert_eq!(t.len(), 40);
    }

    /// Invariant: `get_or_insert_default` inserts on a miss; `get` and
    /// `Index` never do.
    #[test]
    fn auto_vivification_is_mutable_only() {
        let mut t: HashTable<&str, i32> = HashTable::new();
        assert_eq!(t.get("missing"), None);
        assert_eq!(t.at("missing"), Err(Error::KeyNotFound));
        assert!(t.is_empty());

        *t.get_or_insert_default("missing") += 5;
        assert_eq!(t.get("missing"), Some(&5));
        *t.get_or_insert_default("missing") += 5;
        assert_eq!(t["missing"], 10);
        assert_eq!(t.len(), 1);

        let calls = std::cell::Cell::new(0);
        t.get_or_insert_with("missing", || {
            calls.set(calls.get() + 1);
            0
        });
        assert_eq!(calls.get(), 0);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_on_absent_key_panics() {
        let t: HashTable<u8, u8> = HashTable::new();
        let _ = t[&1];
    }

    #[test]
    fn clear_resets_to_one_bucket() {
        let mut t: HashTable<u16, u16> = (0..50).map(|i| (i, i)).collect();
        assert!(t.bucket_count() > 1);
        t.clear();
        assert_eq!(t.bucket_count(), 1);
        assert_eq!(t.len(), 0);
        assert_eq!(t.iter().count(), 0);
        t.insert(7, 7);
        assert_eq!(t.get(&7), Some(&7));
    }

    /// Invariant: equality ignores bucket layout and insertion order.
    #[test]
    fn equality_is_map_equality() {
        let a: HashTable<i32, &str> = HashTable::from([(1, "a"), (2, "b"), (3, "c")]);
        let mut b: HashTable<i32, &str> = HashTable::with_bucket_count(11);
        for (k, v) in [(3, "c"), (1, "a"), (2, "b")] {
            b.insert(k, v);
        }
        assert_ne!(a.bucket_count(), b.bucket_count());
        assert_eq!(a, b);

        b.insert(2, "z");
        assert_ne!(a, b);
        b.insert(2, "b");
        b.insert(4, "d");
        assert_ne!(a, b);
    }

    #[test]
    fn clone_is_independent() {
        let mut a: HashTable<String, Vec<u8>> = HashTable::new();
        a.insert("x".into(), vec![1]);
        let mut b = a.clone();
        b.get_mut("x").unwrap().push(2);
        assert_eq!(a.get("x"), Some(&vec![1]));
        assert_eq!(b.get("x"), Some(&vec![1, 2]));
        assert_eq!(a.bucket_count(), b.bucket_count());
    }

    #[test]
    fn moving_out_leaves_default() {
        let mut a: HashTable<i32, i32> = (0..3).map(|i| (i, i)).collect();
        let b = mem::take(&mut a);
        assert_eq!(b.len(), 3);
        assert_eq!(a.len(), 0);
        assert_eq!(a.bucket_count(), 0);
    }

    #[test]
    fn debug_formats_as_map() {
        let t: HashTable<i32, i32> = HashTable::from([(1, 10)]);
        assert_eq!(format!("{t:?}"), "{1: 10}");
    }

    #[test]
    fn bucket_len_out_of_range() {
        let t: HashTable<i32, i32> = HashTable::with_bucket_count(3);
        assert_eq!(t.bucket_len(2), Ok(0));
        assert_eq!(
            t.bucket_len(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
    }
}
