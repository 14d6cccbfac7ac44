use crate::error::{Error, Result};
use crate::hash_table::{HashTable, DEFAULT_MAX_LOAD_FACTOR};
use crate::hasher::PositionalState;

use std::{
    hash::{BuildHasher, Hash},
    marker::PhantomData,
};

/// Builds a [`HashTable`] with an initial bucket count and load factor.
///
/// # Examples
///
/// ```rust
/// use chained_hashmap::HashTableBuilder;
///
/// let mut table = HashTableBuilder::new()
///     // Start with 7 buckets instead of none.
///     .bucket_count(7)
///     // Allow chains to average 4 entries before growing.
///     .max_load_factor(4)
///     .build()
///     .unwrap();
///
/// table.insert("k", 1);
/// assert_eq!(table.bucket_count(), 7);
/// ```
pub struct HashTableBuilder<C> {
    bucket_count: usize,
    max_load_factor: usize,
    table_type: PhantomData<C>,
}

impl<K, V> HashTableBuilder<HashTable<K, V, PositionalState>>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            bucket_count: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            table_type: PhantomData,
        }
    }

    /// Builds a `HashTable<K, V>` with the default hasher.
    ///
    /// Fails with [`Error::InvalidLoadFactor`] if the load factor is zero.
    pub fn build(self) -> Result<HashTable<K, V, PositionalState>> {
        self.build_with_hasher(PositionalState)
    }

    /// Builds a `HashTable<K, V, S>` with the given `hasher`.
    pub fn build_with_hasher<S>(self, hasher: S) -> Result<HashTable<K, V, S>>
    where
        S: BuildHasher,
    {
        if self.max_load_factor == 0 {
            return Err(Error::InvalidLoadFactor);
        }
        Ok(HashTable::from_parts(
            self.bucket_count,
            self.max_load_factor,
            hasher,
        ))
    }
}

impl<K, V> Default for HashTableBuilder<HashTable<K, V, PositionalState>>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> HashTableBuilder<C> {
    /// Sets the number of buckets allocated up front.
    pub fn bucket_count(self, bucket_count: usize) -> Self {
        Self {
            bucket_count,
            ..self
        }
    }

    /// Sets how many entries per bucket the table tolerates on average
    /// before it rehashes.
    pub fn max_load_factor(self, max_load_factor: usize) -> Self {
        Self {
            max_load_factor,
            ..self
        }
    }
}
