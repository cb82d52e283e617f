//! Error types for blobtree

use crate::node::Kind;
use thiserror::Error;

/// Errors surfaced by tree construction, encoding, and decoding.
///
/// Every failure is terminal for the operation that raised it: no partial
/// buffer or partial tree is valid once one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlobTreeError {
    /// An accessor incompatible with the node's committed kind was used,
    /// e.g. keyed access on a node that is already an array.
    #[error("{wanted:?} access on a node already committed to {actual:?}")]
    KindConflict { actual: Kind, wanted: Kind },

    /// The destination buffer ran out of space mid-encode.
    #[error("destination buffer too small: {needed} more bytes needed at offset {offset}")]
    BufferTooSmall { offset: usize, needed: usize },

    /// The source buffer ended before the encoding it claims to hold.
    #[error("source buffer truncated: {needed} more bytes needed at offset {offset}")]
    TruncatedBuffer { offset: usize, needed: usize },

    /// An object key longer than the u16 key-length field can carry.
    #[error("object key of {0} bytes exceeds the u16 wire field")]
    KeyTooLong(usize),

    /// A payload length or child count larger than the u32 wire field can carry.
    #[error("length {0} exceeds the u32 wire field")]
    LengthOverflow(usize),

    /// A tag byte that names none of the three node kinds.
    #[error("invalid node tag: 0x{0:02X}")]
    InvalidTag(u8),

    /// An object key in the wire that is not valid UTF-8.
    #[error("object key is not valid UTF-8")]
    InvalidUtf8,
}
