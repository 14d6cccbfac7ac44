//! Cursor: a detached position inside a [`HashTable`].
//!
//! A cursor borrows nothing. It records `(bucket, slot)` plus the table's
//! generation at the time it was made; any structural mutation (a new key,
//! a removal, a rehash, `clear`) moves the generation on, and resolving an
//! older cursor fails with [`Error::StaleCursor`] instead of reading
//! whatever now occupies that position.

use crate::error::{Error, Result};
use crate::hash_table::HashTable;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    bucket: usize,
    slot: usize,
    generation: u64,
}

impl Cursor {
    pub(crate) fn new(bucket: usize, slot: usize, generation: u64) -> Self {
        Self {
            bucket,
            slot,
            generation,
        }
    }

    /// Bucket index this cursor points into.
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    /// True for the cursor one past the last entry of its table. A stale
    /// cursor is never reported as the end; it fails with `StaleCursor`.
    pub fn is_end<K, V, S>(&self, table: &HashTable<K, V, S>) -> Result<bool> {
        self.check(table)?;
        Ok(self.bucket >= table.bucket_count())
    }

    pub fn key<'a, K, V, S>(&self, table: &'a HashTable<K, V, S>) -> Result<&'a K> {
        self.entry(table).map(|(k, _)| k)
    }

    pub fn value<'a, K, V, S>(&self, table: &'a HashTable<K, V, S>) -> Result<&'a V> {
        self.entry(table).map(|(_, v)| v)
    }

    pub fn entry<'a, K, V, S>(&self, table: &'a HashTable<K, V, S>) -> Result<(&'a K, &'a V)> {
        self.check(table)?;
        table
            .entry_at(self.bucket, self.slot)
            .map(|e| (&e.key, &e.value))
            .ok_or(Error::EndOfTable)
    }

    pub fn value_mut<'a, K, V, S>(&self, table: &'a mut HashTable<K, V, S>) -> Result<&'a mut V> {
        self.check(table)?;
        table
            .entry_at_mut(self.bucket, self.slot)
            .map(|e| &mut e.value)
            .ok_or(Error::EndOfTable)
    }

    /// The following position in bucket-then-chain order; the end cursor
    /// after the last entry.
    pub fn next<K, V, S>(&self, table: &HashTable<K, V, S>) -> Result<Cursor> {
        if self.is_end(table)? {
            return Err(Error::EndOfTable);
        }
        let chain_len = table.bucket_len(self.bucket)?;
        if self.slot + 1 < chain_len {
            return Ok(Cursor::new(self.bucket, self.slot + 1, self.generation));
        }
        Ok(table.first_occupied_from(self.bucket + 1))
    }

    fn check<K, V, S>(&self, table: &HashTable<K, V, S>) -> Result<()> {
        if self.generation == table.generation() {
            Ok(())
        } else {
            Err(Error::StaleCursor)
        }
    }
}
