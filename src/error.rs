use thiserror::Error;

/// Errors returned by fallible [`RingBuffer`](crate::RingBuffer) and cursor operations.
///
/// None of these are transient: each one reports a violated precondition of the call that returned it,
/// and the buffer is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingBufferError {
    /// A ring buffer was requested with a capacity of zero.
    #[error("ring buffer capacity must be greater than zero")]
    ZeroCapacity,

    /// An operation needed at least one item, but the ring buffer is empty.
    #[error("ring buffer is empty")]
    Empty,

    /// A logical index was not below the number of items in the ring buffer.
    #[error("index {index} is out of range for ring buffer of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A cursor offset did not point at a live item.
    #[error("cursor offset {offset} is out of range for ring buffer of length {len}")]
    CursorOutOfRange { offset: isize, len: usize },

    /// A non-overwriting push was attempted on a full ring buffer.
    #[error("ring buffer is full")]
    Full,
}
