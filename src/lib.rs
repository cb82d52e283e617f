//! blobtree - versioned binary tree format with zero-copy decoding
//!
//! A compact, self-describing wire format for nested records without a
//! schema compiler. A tree of object, array, and leaf nodes is built
//! incrementally through accessors, serialized to a deterministic byte
//! encoding behind a 4-byte version word, and decoded back with leaf
//! payloads borrowing the input buffer.
//!
//! # Features
//!
//! - Three node kinds: keyed objects, indexed arrays, opaque byte leaves
//! - Canonical encoding: object keys always emitted in ascending byte order
//! - Zero-copy decoding: leaf payloads are views into the source buffer,
//!   enforced by lifetimes
//! - Big-endian wire integers, portable across architectures
//! - Strict bounds checking on both encode and decode, no partial results
//!
//! # Example
//!
//! ```rust
//! use blobtree::{Node, deserialize, serialize};
//!
//! // Build a tree
//! let mut root = Node::new();
//! root.object_entry("name").unwrap().set_payload(b"Alice".as_slice()).unwrap();
//! root.object_entry("age").unwrap().set_payload(30u32.to_be_bytes().to_vec()).unwrap();
//!
//! // Serialize with a caller-interpreted version word
//! let bytes = serialize(&root, 1).unwrap();
//!
//! // Decode; leaf payloads borrow `bytes`
//! let (decoded, version) = deserialize(&bytes).unwrap();
//! assert_eq!(version, 1);
//! assert_eq!(decoded.child("name").unwrap().payload(), b"Alice");
//! assert_eq!(decoded, root);
//! ```

pub mod error;
pub mod node;
pub mod reader;
pub mod writer;

// Re-export common types at crate root
pub use error::BlobTreeError;
pub use node::{Kind, Node};
pub use reader::deserialize;
pub use writer::{encoded_size, serialize, serialize_into};
