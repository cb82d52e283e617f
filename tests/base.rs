//! Integration tests for blobtree
//!
//! These tests exercise the public API end to end: building trees through
//! the accessors, the envelope codec, and the failure modes.

use blobtree::{BlobTreeError, Kind, Node, deserialize, encoded_size, serialize, serialize_into};

// =============================================================================
// Envelope and canonical encoding
// =============================================================================

#[test]
fn envelope_starts_with_version_then_sorted_object() {
    let mut root = Node::new();
    root.object_entry("name")
        .unwrap()
        .set_payload(b"Alice".as_slice())
        .unwrap();
    root.object_entry("age")
        .unwrap()
        .set_payload(30u32.to_be_bytes().to_vec())
        .unwrap();

    let bytes = serialize(&root, 1).unwrap();

    // version word, object tag, two children
    assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x00, 0x01]);
    assert_eq!(bytes[4], 0x00);
    assert_eq!(&bytes[5..9], &[0x00, 0x00, 0x00, 0x02]);
    // "age" is emitted before "name" regardless of insertion order
    assert_eq!(&bytes[9..11], &[0x00, 0x03]);
    assert_eq!(&bytes[11..14], b"age");
}

#[test]
fn serialization_is_deterministic() {
    let mut root = Node::new();
    root.object_entry("zz").unwrap().set_payload(b"1".as_slice()).unwrap();
    root.object_entry("aa").unwrap().set_payload(b"2".as_slice()).unwrap();
    root.object_entry("mm").unwrap().array_entry(3).unwrap();

    assert_eq!(serialize(&root, 7).unwrap(), serialize(&root, 7).unwrap());
}

#[test]
fn version_word_roundtrips_at_extremes() {
    for version in [0, 1, u32::MAX] {
        let bytes = serialize(&Node::Empty, version).unwrap();
        let (_, v) = deserialize(&bytes).unwrap();
        assert_eq!(v, version);
    }
}

// =============================================================================
// Building and round trips
// =============================================================================

#[test]
fn sparse_array_has_empty_placeholders() {
    let mut root = Node::new();
    root.array_entry(2).unwrap().set_payload(b"x".as_slice()).unwrap();

    assert_eq!(root.len().unwrap(), 3);
    assert_eq!(root.at(0).unwrap().payload(), b"");
    assert_eq!(root.at(1).unwrap().payload(), b"");

    let bytes = serialize(&root, 1).unwrap();
    let (decoded, _) = deserialize(&bytes).unwrap();
    assert_eq!(decoded.len().unwrap(), 3);
    assert_eq!(decoded.at(2).unwrap().payload(), b"x");
}

#[test]
fn nested_object_array_leaf_roundtrips_exactly() {
    let payload: Vec<u8> = (0..=255).collect();

    let mut root = Node::new();
    root.object_entry("outer")
        .unwrap()
        .array_entry(0)
        .unwrap()
        .set_payload(payload.clone())
        .unwrap();

    let bytes = serialize(&root, 12).unwrap();
    let (decoded, version) = deserialize(&bytes).unwrap();

    assert_eq!(version, 12);
    assert_eq!(decoded, root);
    let leaf = decoded.child("outer").unwrap().at(0).unwrap();
    assert_eq!(leaf.payload(), payload.as_slice());
}

#[test]
fn construction_order_does_not_change_equality_or_bytes() {
    let mut a = Node::new();
    a.object_entry("x").unwrap().set_payload(b"1".as_slice()).unwrap();
    a.object_entry("y").unwrap().set_payload(b"2".as_slice()).unwrap();

    let mut b = Node::new();
    b.object_entry("y").unwrap().set_payload(b"2".as_slice()).unwrap();
    b.object_entry("x").unwrap().set_payload(b"1".as_slice()).unwrap();

    assert_eq!(a, b);
    assert_eq!(serialize(&a, 0).unwrap(), serialize(&b, 0).unwrap());
}

#[test]
fn empty_root_roundtrips() {
    let bytes = serialize(&Node::new(), 2).unwrap();
    assert_eq!(bytes.len(), 4 + encoded_size(&Node::Empty));

    let (decoded, version) = deserialize(&bytes).unwrap();
    assert_eq!(version, 2);
    assert_eq!(decoded, Node::Empty);
}

// =============================================================================
// Failure modes
// =============================================================================

#[test]
fn keyed_then_indexed_access_conflicts() {
    let mut root = Node::new();
    root.object_entry("a").unwrap();

    let err = root.array_entry(0).unwrap_err();
    assert_eq!(
        err,
        BlobTreeError::KindConflict {
            actual: Kind::Object,
            wanted: Kind::Array,
        }
    );
}

#[test]
fn undersized_destination_buffer_fails() {
    let mut root = Node::new();
    root.object_entry("key").unwrap().set_payload(b"value".as_slice()).unwrap();

    let size = 4 + encoded_size(&root);
    let mut buf = vec![0u8; size - 1];
    let err = serialize_into(&root, 1, &mut buf).unwrap_err();
    assert!(matches!(err, BlobTreeError::BufferTooSmall { .. }));

    let mut buf = vec![0u8; size];
    let written = serialize_into(&root, 1, &mut buf).unwrap();
    assert_eq!(written, size);
}

#[test]
fn three_byte_buffer_is_below_the_version_minimum() {
    let err = deserialize(&[0x00, 0x00, 0x00]).unwrap_err();
    assert!(matches!(err, BlobTreeError::TruncatedBuffer { .. }));
}

// =============================================================================
// Zero-copy decoding
// =============================================================================

#[test]
fn decoded_payloads_point_into_the_source_buffer() {
    let mut root = Node::new();
    root.array_entry(0).unwrap().set_payload(b"abc".as_slice()).unwrap();
    root.array_entry(1).unwrap().set_payload(vec![9u8; 100]).unwrap();

    let bytes = serialize(&root, 1).unwrap();
    let (decoded, _) = deserialize(&bytes).unwrap();

    let range = bytes.as_ptr() as usize..bytes.as_ptr() as usize + bytes.len();
    for index in 0..decoded.len().unwrap() {
        let payload = decoded.at(index).unwrap().payload();
        assert!(range.contains(&(payload.as_ptr() as usize)));
    }
}

#[test]
fn decoded_tree_shares_the_buffer_lifetime() {
    let bytes = serialize(&Node::Empty, 1).unwrap();
    let (decoded, _) = deserialize(&bytes).unwrap();
    // `decoded` borrows `bytes`; this compiling at all is the contract.
    assert_eq!(decoded.payload().len(), 0);
    drop(decoded);
    drop(bytes);
}
