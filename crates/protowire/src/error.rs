//! Wire-format and builder error type.

use protowire_buffers::BufferError;
use thiserror::Error;

/// Error type for wire-format parsing and builder operations.
///
/// Two kinds of failure share this enum: contract violations on the builder
/// surface ([`InvalidFieldNumber`](WireError::InvalidFieldNumber)) and
/// malformed input encountered while decoding a byte stream (everything
/// else). Query operations never fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// A mutating builder operation was given a non-positive field number.
    #[error("{0} is not a valid field number.")]
    InvalidFieldNumber(i32),
    /// The input ended in the middle of a tag or value.
    #[error("unexpected end of input")]
    Eof,
    /// A tag carried field number zero.
    #[error("tag had field number zero")]
    ZeroFieldNumber,
    /// The 3-bit wire type code is not one of the six defined values.
    #[error("invalid wire type {0}")]
    InvalidWireType(u8),
    /// A varint ran past the 10-byte maximum without terminating.
    #[error("varint is too long")]
    MalformedVarint,
    /// An end-group tag appeared with no matching start-group tag.
    #[error("unexpected end-group tag")]
    UnexpectedEndGroup,
    /// The input ended inside a group, before its end-group tag.
    #[error("group missing end-group tag")]
    UnterminatedGroup,
    /// Group nesting exceeded the recursion limit.
    #[error("recursion limit exceeded")]
    RecursionLimit,
}

impl From<BufferError> for WireError {
    fn from(_: BufferError) -> Self {
        WireError::Eof
    }
}
