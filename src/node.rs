//! Tree node model and accessor API

use crate::error::BlobTreeError;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// The three kinds a node can commit to.
///
/// Used in [`BlobTreeError::KindConflict`] to report which kind a node holds
/// and which kind an accessor asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    Leaf,
}

/// Wire tags, one per kind.
pub(crate) const TAG_OBJECT: u8 = 0;
pub(crate) const TAG_ARRAY: u8 = 1;
pub(crate) const TAG_LEAF: u8 = 2;

/// One element of a blobtree.
///
/// A node starts out [`Node::Empty`] and commits to a kind on first use:
/// keyed access makes it an `Object`, indexed access makes it an `Array`,
/// and a payload assignment makes it a `Leaf`. Once committed, accessors of
/// another kind fail with [`BlobTreeError::KindConflict`]; the kind never
/// changes again.
///
/// Object children are keyed by a `BTreeMap`, so iteration (and therefore
/// encoding) always visits keys in ascending byte order regardless of
/// insertion order. That ordering is part of the wire contract.
///
/// Leaf payloads are [`Cow`] slices: trees produced by
/// [`deserialize`](crate::deserialize) hold `Cow::Borrowed` views into the
/// input buffer and are bound to its lifetime, while trees built by hand may
/// mix borrowed and owned payloads. Cloning a node duplicates structure, but
/// borrowed payloads still alias the same backing bytes.
#[derive(Debug, Clone, Default)]
pub enum Node<'a> {
    /// Uncommitted; behaves as a leaf with an empty payload.
    #[default]
    Empty,
    Object(BTreeMap<String, Node<'a>>),
    Array(Vec<Node<'a>>),
    Leaf(Cow<'a, [u8]>),
}

impl<'a> Node<'a> {
    /// Creates an uncommitted node.
    pub fn new() -> Self {
        Node::Empty
    }

    /// The kind this node would encode as. `Empty` encodes as an empty leaf.
    pub fn kind(&self) -> Kind {
        match self {
            Node::Object(_) => Kind::Object,
            Node::Array(_) => Kind::Array,
            Node::Empty | Node::Leaf(_) => Kind::Leaf,
        }
    }

    fn conflict(&self, wanted: Kind) -> BlobTreeError {
        BlobTreeError::KindConflict {
            actual: self.kind(),
            wanted,
        }
    }

    /// Returns the child at `key`, creating it (as `Empty`) if absent.
    ///
    /// Commits an `Empty` node to `Object`. Fails with `KindConflict` if the
    /// node already committed to `Array` or `Leaf`.
    pub fn object_entry(&mut self, key: &str) -> Result<&mut Node<'a>, BlobTreeError> {
        if matches!(self, Node::Empty) {
            *self = Node::Object(BTreeMap::new());
        }
        match self {
            Node::Object(children) => Ok(children.entry(key.to_string()).or_default()),
            _ => Err(self.conflict(Kind::Object)),
        }
    }

    /// Returns the child at `index`, extending the array if needed.
    ///
    /// Commits an `Empty` node to `Array`. Extending fills any new slots
    /// below `index` with `Empty` placeholders, which encode as empty
    /// leaves. Fails with `KindConflict` if the node already committed to
    /// `Object` or `Leaf`.
    pub fn array_entry(&mut self, index: usize) -> Result<&mut Node<'a>, BlobTreeError> {
        if matches!(self, Node::Empty) {
            *self = Node::Array(Vec::new());
        }
        match self {
            Node::Array(children) => {
                if children.len() <= index {
                    children.resize_with(index + 1, Node::default);
                }
                Ok(&mut children[index])
            }
            _ => Err(self.conflict(Kind::Array)),
        }
    }

    /// Number of array children. Zero for `Empty` and `Leaf` nodes; fails
    /// with `KindConflict` on an `Object`.
    pub fn len(&self) -> Result<usize, BlobTreeError> {
        match self {
            Node::Array(children) => Ok(children.len()),
            Node::Empty | Node::Leaf(_) => Ok(0),
            Node::Object(_) => Err(self.conflict(Kind::Array)),
        }
    }

    /// Assigns a leaf payload, committing an `Empty` node to `Leaf` or
    /// replacing the payload of an existing one.
    ///
    /// Fails with `KindConflict` if the node already committed to `Object`
    /// or `Array`; children are never silently dropped in favor of a
    /// payload.
    pub fn set_payload(
        &mut self,
        payload: impl Into<Cow<'a, [u8]>>,
    ) -> Result<(), BlobTreeError> {
        match self {
            Node::Empty | Node::Leaf(_) => {
                *self = Node::Leaf(payload.into());
                Ok(())
            }
            _ => Err(self.conflict(Kind::Leaf)),
        }
    }

    /// The leaf payload. Empty for `Empty` nodes and for `Object`/`Array`
    /// nodes, which carry no payload of their own.
    pub fn payload(&self) -> &[u8] {
        match self {
            Node::Leaf(bytes) => bytes,
            _ => &[],
        }
    }

    /// Looks up an object child without creating it.
    pub fn child(&self, key: &str) -> Option<&Node<'a>> {
        match self {
            Node::Object(children) => children.get(key),
            _ => None,
        }
    }

    /// Looks up an array child without extending the array.
    pub fn at(&self, index: usize) -> Option<&Node<'a>> {
        match self {
            Node::Array(children) => children.get(index),
            _ => None,
        }
    }
}

/// Structural equality. `Empty` compares equal to a leaf with an empty
/// payload, so a freshly built tree with placeholder slots equals its own
/// decoded encoding.
impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Object(a), Node::Object(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => a == b,
            (Node::Leaf(a), Node::Leaf(b)) => a == b,
            (Node::Empty, Node::Empty) => true,
            (Node::Empty, Node::Leaf(b)) => b.is_empty(),
            (Node::Leaf(a), Node::Empty) => a.is_empty(),
            _ => false,
        }
    }
}

impl Eq for Node<'_> {}
