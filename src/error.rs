//! Error type shared by every container in the crate.

/// Failures surfaced by positional access, cursor resolution and table
/// configuration.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A positional access or insertion was outside the container's bounds.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A checked lookup did not find the key.
    #[error("key not found")]
    KeyNotFound,

    /// The cursor was taken before a structural change to its table
    /// (insert of a new key, removal, rehash or clear).
    #[error("cursor was invalidated by a structural change to the table")]
    StaleCursor,

    /// The end cursor has no entry to read and nothing to advance to.
    #[error("cursor is past the last entry")]
    EndOfTable,

    /// A maximum load factor of zero entries per bucket can never be met.
    #[error("maximum load factor must be at least 1")]
    InvalidLoadFactor,
}

pub type Result<T> = core::result::Result<T, Error>;
