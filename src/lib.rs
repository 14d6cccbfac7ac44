//! chained-hashmap: a separate-chaining hash table with eager `2n + 1`
//! rehashing, built on its own growable array and singly-linked list.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an associative container whose every layer is small enough to
//!   audit on its own, with no storage borrowed from `std::collections`.
//! - Layers:
//!   - GrowableArray<T>: contiguous, amortized-doubling buffer over raw
//!     allocations; the bucket array.
//!   - ForwardList<T>: singly-linked list with O(1) front/back insertion
//!     and insert/remove-after; one list per bucket.
//!   - HashTable<K, V, S>: `GrowableArray<ForwardList<Entry>>`, lookups by
//!     `hash mod bucket_count`, chains scanned linearly.
//!   - Iter / Cursor: composite iteration (bucket array outer, chain inner)
//!     and detached, generation-checked positions.
//!
//! Load-factor policy
//! - `max_load_factor` is a positive integer, 1 by default.
//! - After a new key is filed, while `len > bucket_count * max_load_factor`
//!   the table rebuilds with `2 * bucket_count + 1` buckets. A table made
//!   with `new()` has zero buckets and grows 0, 1, 3, 7, 15, ...
//! - Overwrites and removals never rehash; only `clear()` shrinks, back to
//!   a single bucket.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its precomputed `u64` hash. Rehash files entries by
//!   the stored hash; `K: Hash` is never invoked after insertion.
//! - The default [`PositionalState`] maps integers to themselves and folds
//!   byte strings positionally. Any `BuildHasher` can replace it.
//!
//! Cursor invalidation
//! - A [`Cursor`] remembers `(bucket, slot)` and the table generation it was
//!   made at. Inserting a new key, removing, rehashing and clearing all
//!   advance the generation; a stale cursor resolves to
//!   [`Error::StaleCursor`] rather than to another entry.
//! - Overwriting an existing key's value does not invalidate cursors.
//!
//! Notes and non-goals
//! - Single-threaded; no internal synchronization.
//! - Not DoS resistant with the default hasher.
//! - No incremental rehash and no shrink-to-fit.
//!
//! Features
//! - `logging`: emit `log` records on rehash and load-factor changes.

pub mod array;
mod builder;
mod container;
mod cursor;
mod error;
pub mod forward_list;
mod hash_table;
mod hash_table_proptest;
mod hasher;
pub mod iter;

// Public surface
pub use array::GrowableArray;
pub use builder::HashTableBuilder;
pub use container::Container;
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use forward_list::{CursorMut, ForwardList};
pub use hash_table::{HashTable, DEFAULT_MAX_LOAD_FACTOR};
pub use hasher::{PositionalHasher, PositionalState};
