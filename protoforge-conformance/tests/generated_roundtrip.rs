//! Round-trips over the generated modules, with the recursive (boxed)
//! shapes front and center.

use std::collections::BTreeMap;

use protoforge::{DecodeOptions, Message};
use protoforge_conformance::conformance::{Mode, Node, NodeContent, Tree};
use protoforge_conformance::extras::Wrapper;

#[test]
fn test_recursive_tree_roundtrip() {
    let tree = Tree {
        value: 1,
        left: Some(Box::new(Tree {
            value: 2,
            ..Default::default()
        })),
        right: Some(Box::new(Tree {
            value: 3,
            mode: Mode::ModeOn,
            ..Default::default()
        })),
        tags: vec![7, 300],
        ..Default::default()
    };

    let encoded = tree.to_vec();
    assert_eq!(encoded.len(), tree.encoded_len());

    let decoded = Tree::decode(&encoded, DecodeOptions::default()).unwrap();
    assert_eq!(decoded, tree);
    assert_eq!(decoded.to_vec(), encoded);
}

#[test]
fn test_empty_boxed_subtree_elided() {
    // A singular child at all-defaults has an empty body and is skipped.
    let tree = Tree {
        right: Some(Box::new(Tree::default())),
        ..Default::default()
    };
    assert_eq!(tree.to_vec(), Vec::<u8>::new());
    assert_eq!(tree.encoded_len(), 0);

    // An optional child is presence-tracked: written even when empty.
    let tree = Tree {
        left: Some(Box::new(Tree::default())),
        ..Default::default()
    };
    assert_eq!(tree.to_vec(), [0x12, 0x00]);

    let decoded = Tree::decode(&[0x12, 0x00], DecodeOptions::default()).unwrap();
    assert_eq!(decoded.left, Some(Box::new(Tree::default())));
    assert_eq!(decoded.right, None);
}

#[test]
fn test_deep_tree_roundtrip() {
    let mut tree = Tree {
        value: 0,
        ..Default::default()
    };
    for value in 1..=16 {
        tree = Tree {
            value,
            left: Some(Box::new(tree)),
            ..Default::default()
        };
    }

    let encoded = tree.to_vec();
    let decoded = Tree::decode(&encoded, DecodeOptions::default()).unwrap();
    assert_eq!(decoded, tree);
}

#[test]
fn test_recursive_oneof_roundtrip() {
    let node = Node {
        content: NodeContent::Child(Box::new(Node {
            content: NodeContent::Leaf(5),
            ..Default::default()
        })),
        ..Default::default()
    };

    let encoded = node.to_vec();
    assert_eq!(encoded, [0x12, 0x02, 0x08, 0x05]);
    assert_eq!(encoded.len(), node.encoded_len());

    let decoded = Node::decode(&encoded, DecodeOptions::default()).unwrap();
    assert_eq!(decoded, node);

    // The default member (leaf at zero) is elided entirely.
    assert_eq!(Node::default().to_vec(), Vec::<u8>::new());

    // A child holding an all-default node has an empty body and is elided
    // the way a singular submessage would be.
    let node = Node {
        content: NodeContent::Child(Box::new(Node::default())),
        ..Default::default()
    };
    assert_eq!(node.to_vec(), Vec::<u8>::new());
}

#[test]
fn test_cross_module_wrapper_roundtrip() {
    let wrapper = Wrapper {
        tree: Some(Tree {
            value: 4,
            tags: vec![1],
            ..Default::default()
        }),
        labels: BTreeMap::from([("k".to_string(), "v".to_string())]),
        ..Default::default()
    };

    let encoded = wrapper.to_vec();
    assert_eq!(encoded.len(), wrapper.encoded_len());

    let decoded = Wrapper::decode(&encoded, DecodeOptions::default()).unwrap();
    assert_eq!(decoded, wrapper);
}

#[test]
fn test_generated_unknown_retention() {
    // Tree value plus an unrecognized field 15.
    let data = [0x08, 0x01, 0x78, 0x2A];
    let tree = Tree::decode(&data, DecodeOptions::default()).unwrap();
    assert!(tree.has_unknown_fields());
    assert_eq!(tree.to_vec(), data);
}
