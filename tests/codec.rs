//! Per-node binary records

use std::collections::HashSet;
use std::io::{Cursor, ErrorKind};

use augmented_octree::{AugmentedNode, OccupancyNode, OctreeNode};
use blake3::hash;

fn encode<N: OctreeNode>(node: &N) -> Vec<u8> {
    let mut out = Vec::new();
    node.write_data(&mut out).expect("writing to a Vec succeeds");
    out
}

#[test]
fn augmented_record_round_trips_bit_exact() {
    let node = AugmentedNode::new(0.75).with_auxiliary(-3.5);
    let bytes = encode(&node);
    assert_eq!(bytes.len(), 12, "f32 occupancy followed by f64 auxiliary");

    let mut decoded = AugmentedNode::default();
    decoded.read_data(&mut bytes.as_slice()).expect("record decodes");
    assert_eq!(decoded.log_odds().to_bits(), 0.75f32.to_bits());
    assert_eq!(decoded.auxiliary().to_bits(), (-3.5f64).to_bits());
    assert_eq!(decoded, node);
}

#[test]
fn explicit_zero_survives_round_trip_as_equal_node() {
    let node = AugmentedNode::new(0.5).with_auxiliary(0.0);
    let bytes = encode(&node);

    let mut decoded = AugmentedNode::new(-1.0).with_auxiliary(3.0);
    decoded.read_data(&mut bytes.as_slice()).expect("record decodes");
    assert_eq!(decoded, node);
    assert_eq!(decoded.auxiliary(), 0.0);
    assert_eq!(encode(&decoded), bytes);
}

#[test]
fn record_field_order_is_occupancy_then_auxiliary() {
    let bytes = encode(&AugmentedNode::new(-1.25).with_auxiliary(6.0));
    assert_eq!(bytes[..4], (-1.25f32).to_ne_bytes());
    assert_eq!(bytes[4..], 6.0f64.to_ne_bytes());
}

#[test]
fn unset_auxiliary_encodes_as_zero() {
    let bytes = encode(&AugmentedNode::new(0.4));
    assert_eq!(bytes[4..], 0.0f64.to_ne_bytes());

    let mut decoded = AugmentedNode::new(9.0).with_auxiliary(1.0);
    decoded.read_data(&mut bytes.as_slice()).unwrap();
    assert!(!decoded.is_auxiliary_set());
    assert_eq!(decoded.log_odds(), 0.4);
}

#[test]
fn records_stream_back_to_back() {
    let nodes = [
        AugmentedNode::new(0.1).with_auxiliary(1.0),
        AugmentedNode::new(-0.2),
        AugmentedNode::new(0.3).with_auxiliary(-7.25),
    ];
    let mut stream = Vec::new();
    for node in &nodes {
        node.write_data(&mut stream).unwrap();
    }

    let mut cursor = Cursor::new(stream);
    for expected in &nodes {
        let mut decoded = AugmentedNode::default();
        decoded.read_data(&mut cursor).unwrap();
        assert_eq!(&decoded, expected);
    }
}

#[test]
fn truncated_record_is_an_error() {
    let bytes = encode(&AugmentedNode::new(0.5).with_auxiliary(2.0));
    let mut decoded = AugmentedNode::default();
    let err = decoded
        .read_data(&mut &bytes[..7])
        .expect_err("a 7-byte record is incomplete");
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn occupancy_record_has_no_auxiliary() {
    let bytes = encode(&OccupancyNode::new(0.9));
    assert_eq!(bytes, 0.9f32.to_ne_bytes());
}

#[test]
fn encoding_is_deterministic() {
    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let node = AugmentedNode::new(0.333).with_auxiliary(1.0 / 3.0);
        fingerprints.insert(hash(&encode(&node)));
    }
    assert_eq!(fingerprints.len(), 1, "encodings diverged across runs");
}
