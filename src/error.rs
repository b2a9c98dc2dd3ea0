//! Error taxonomy shared by every map operation.
//!
//! All errors are returned synchronously and nothing is retried
//! internally; a failed operation leaves the map in its last-known-good
//! state. Allocation failure is a returnable condition, not an abort.

/// Errors produced by [`StrMap`](crate::StrMap) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// A required argument was malformed, for example a key containing an
    /// interior NUL byte or a slot index outside the table.
    #[error("invalid argument")]
    InvalidArgument,

    /// The requested initial capacity was zero.
    #[error("map capacity must be non-zero")]
    InvalidSize,

    /// The key, including its terminator byte, exceeds the 64-byte bound.
    #[error("key length {len} exceeds the maximum of 63 bytes")]
    InvalidKeyLength { len: usize },

    /// The insert would exceed the absolute maximum capacity, or no free
    /// slot exists to probe into.
    #[error("map is at maximum occupancy")]
    Overflow,

    /// An allocation or reallocation could not be satisfied.
    #[error("memory allocation failed")]
    OutOfMemory,

    /// Lookup or deletion named a key or slot with no live entry.
    #[error("item not found")]
    ItemNotFound,

    /// Guard for internal misuse of the resize machinery. The resize
    /// direction is a typed enum, which makes this unreachable through
    /// the public API; it remains part of the declared taxonomy.
    #[error("invalid resize direction")]
    InvalidResizeDirection,
}
