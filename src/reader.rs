//! Zero-copy decoding of blobtree buffers
//!
//! Mirrors the writer field for field. Leaf payloads are handed out as
//! borrowed subslices of the input buffer; nothing is copied, so the
//! decoded tree cannot outlive the bytes it was parsed from.

use crate::error::BlobTreeError;
use crate::node::{Node, TAG_ARRAY, TAG_LEAF, TAG_OBJECT};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Parses a version envelope and tree body from `bytes`.
///
/// Returns the root node, whose leaf payloads borrow from `bytes`, together
/// with the version word. Fails with [`BlobTreeError::TruncatedBuffer`] as
/// soon as any field would run past the end of the input; no partial tree is
/// ever returned. Bytes beyond the encoded body are ignored.
pub fn deserialize(bytes: &[u8]) -> Result<(Node<'_>, u32), BlobTreeError> {
    let mut src = Src::new(bytes);
    let version = src.u32()?;
    let root = read_node(&mut src)?;
    Ok((root, version))
}

fn read_node<'a>(src: &mut Src<'a>) -> Result<Node<'a>, BlobTreeError> {
    match src.u8()? {
        TAG_OBJECT => {
            let count = src.u32()?;
            let mut children = BTreeMap::new();
            for _ in 0..count {
                let keylen = src.u16()? as usize;
                let key = std::str::from_utf8(src.bytes(keylen)?)
                    .map_err(|_| BlobTreeError::InvalidUtf8)?;
                let child = read_node(src)?;
                children.insert(key.to_string(), child);
            }
            Ok(Node::Object(children))
        }
        TAG_ARRAY => {
            let count = src.u32()?;
            // The count is untrusted input; push until the bounds checks
            // stop us instead of preallocating count slots.
            let mut children = Vec::new();
            for _ in 0..count {
                children.push(read_node(src)?);
            }
            Ok(Node::Array(children))
        }
        TAG_LEAF => {
            let paylen = src.u32()? as usize;
            Ok(Node::Leaf(Cow::Borrowed(src.bytes(paylen)?)))
        }
        tag => Err(BlobTreeError::InvalidTag(tag)),
    }
}

/// Bounds-checked source cursor. Every read verifies the remaining length
/// first; reads of byte blocks return subslices of the original buffer.
struct Src<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Src<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn check(&self, n: usize) -> Result<(), BlobTreeError> {
        let remaining = self.buf.len() - self.pos;
        if remaining < n {
            Err(BlobTreeError::TruncatedBuffer {
                offset: self.pos,
                needed: n - remaining,
            })
        } else {
            Ok(())
        }
    }

    fn u8(&mut self) -> Result<u8, BlobTreeError> {
        self.check(1)?;
        let v = self.buf[self.pos];
        self.pos += 1;
        Ok(v)
    }

    fn u16(&mut self) -> Result<u16, BlobTreeError> {
        self.check(2)?;
        let v = u16::from_be_bytes([self.buf[self.pos], self.buf[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    fn u32(&mut self) -> Result<u32, BlobTreeError> {
        self.check(4)?;
        let b = &self.buf[self.pos..self.pos + 4];
        let v = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
        self.pos += 4;
        Ok(v)
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8], BlobTreeError> {
        self.check(n)?;
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}
