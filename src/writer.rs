//! Serialization of blobtree nodes
//!
//! Depth-first pre-order emission into a caller-sized buffer, with a
//! remaining-space check before every write. All multi-byte integers are
//! big-endian.

use crate::error::BlobTreeError;
use crate::node::{Node, TAG_ARRAY, TAG_LEAF, TAG_OBJECT};

/// Exact encoded length of the tree body rooted at `node`, excluding the
/// 4-byte version envelope.
///
/// Every node costs one tag byte plus one u32 word (the child count for
/// objects and arrays, the payload length for leaves). Object entries add
/// two key-length bytes and the key itself; leaves add their payload.
pub fn encoded_size(node: &Node) -> usize {
    let mut sum = 1 + 4;
    match node {
        Node::Object(children) => {
            for (key, child) in children {
                sum += 2 + key.len() + encoded_size(child);
            }
        }
        Node::Array(children) => {
            for child in children {
                sum += encoded_size(child);
            }
        }
        Node::Leaf(payload) => sum += payload.len(),
        Node::Empty => {}
    }
    sum
}

/// Serializes a tree with its version envelope into an owned buffer of
/// exactly `4 + encoded_size(node)` bytes.
pub fn serialize(node: &Node, version: u32) -> Result<Vec<u8>, BlobTreeError> {
    let mut buf = vec![0u8; 4 + encoded_size(node)];
    let written = serialize_into(node, version, &mut buf)?;
    debug_assert_eq!(written, buf.len());
    Ok(buf)
}

/// Serializes a tree with its version envelope into a caller-provided
/// buffer, returning the number of bytes written.
///
/// Fails with [`BlobTreeError::BufferTooSmall`] if the buffer cannot hold
/// the whole encoding; nothing written before the failure is valid.
pub fn serialize_into(
    node: &Node,
    version: u32,
    buf: &mut [u8],
) -> Result<usize, BlobTreeError> {
    let mut out = Dst::new(buf);
    out.put_u32(version)?;
    write_node(node, &mut out)?;
    Ok(out.pos)
}

fn write_node(node: &Node, out: &mut Dst<'_>) -> Result<(), BlobTreeError> {
    match node {
        Node::Object(children) => {
            out.put_u8(TAG_OBJECT)?;
            out.put_u32(wire_len(children.len())?)?;
            // BTreeMap iterates in ascending byte-wise key order, which is
            // the canonical wire order.
            for (key, child) in children {
                let keylen = u16::try_from(key.len())
                    .map_err(|_| BlobTreeError::KeyTooLong(key.len()))?;
                out.put_u16(keylen)?;
                out.put_bytes(key.as_bytes())?;
                write_node(child, out)?;
            }
        }
        Node::Array(children) => {
            out.put_u8(TAG_ARRAY)?;
            out.put_u32(wire_len(children.len())?)?;
            for child in children {
                write_node(child, out)?;
            }
        }
        Node::Empty | Node::Leaf(_) => {
            let payload = node.payload();
            out.put_u8(TAG_LEAF)?;
            out.put_u32(wire_len(payload.len())?)?;
            out.put_bytes(payload)?;
        }
    }
    Ok(())
}

fn wire_len(len: usize) -> Result<u32, BlobTreeError> {
    u32::try_from(len).map_err(|_| BlobTreeError::LengthOverflow(len))
}

/// Bounds-checked destination cursor. Never grows the buffer; running out
/// of space is an error, not a reallocation.
struct Dst<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> Dst<'b> {
    fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn check(&self, n: usize) -> Result<(), BlobTreeError> {
        let remaining = self.buf.len() - self.pos;
        if remaining < n {
            Err(BlobTreeError::BufferTooSmall {
                offset: self.pos,
                needed: n - remaining,
            })
        } else {
            Ok(())
        }
    }

    fn put_u8(&mut self, v: u8) -> Result<(), BlobTreeError> {
        self.check(1)?;
        self.buf[self.pos] = v;
        self.pos += 1;
        Ok(())
    }

    fn put_u16(&mut self, v: u16) -> Result<(), BlobTreeError> {
        self.put_bytes(&v.to_be_bytes())
    }

    fn put_u32(&mut self, v: u32) -> Result<(), BlobTreeError> {
        self.put_bytes(&v.to_be_bytes())
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), BlobTreeError> {
        self.check(bytes.len())?;
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}
