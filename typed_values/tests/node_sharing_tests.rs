//! Structural sharing of node children and annotations.

mod common;

use common::{pair_constructor, sample_store};
use pretty_assertions::assert_eq;
use typed_values::values::{Annotations, NodeValue};
use typed_values::{FactErrorKind, Value, ValueFactory};

#[test]
fn test_child_update_shares_annotation_map() {
    let store = sample_store();
    let vf = ValueFactory::new(&store);

    let n = NodeValue::new("call", vec![vf.string("f"), vf.integer(1)])
        .set_annotation(&store, "line", vf.integer(7))
        .unwrap();
    let m = n.set(0, vf.string("g")).unwrap();

    assert_eq!(m.annotations(), n.annotations());
    assert!(m.shares_annotations_with(&n));
    assert!(!m.shares_children_with(&n));
    assert_eq!(m.get(1), n.get(1));
}

#[test]
fn test_annotation_update_shares_children() {
    let store = sample_store();
    let vf = ValueFactory::new(&store);

    let n = NodeValue::new("call", vec![vf.string("f"), vf.integer(1)])
        .set_annotation(&store, "line", vf.integer(7))
        .unwrap();
    let m = n.set_annotation(&store, "line", vf.integer(8)).unwrap();

    assert_eq!(m.children(), n.children());
    assert!(m.shares_children_with(&n));
    assert!(!m.shares_annotations_with(&n));
    assert_eq!(n.annotations().get("line"), Some(&vf.integer(7)));
    assert_ne!(Value::from(m), Value::from(n));
}

#[test]
fn test_annotation_clone_does_not_leak_to_siblings() {
    let store = sample_store();
    let vf = ValueFactory::new(&store);

    let base = NodeValue::new("x", vec![vf.integer(0)])
        .set_annotation(&store, "line", vf.integer(1))
        .unwrap();
    let siblings: Vec<NodeValue> = (1..4)
        .map(|i| base.set(0, vf.integer(i)).unwrap())
        .collect();
    let relabeled = siblings[0].set_annotation(&store, "line", vf.integer(99)).unwrap();

    for sibling in &siblings {
        assert_eq!(sibling.annotations().get("line"), Some(&vf.integer(1)));
        assert!(sibling.shares_annotations_with(&base));
    }
    assert_eq!(relabeled.annotations().get("line"), Some(&vf.integer(99)));
}

#[test]
fn test_constructor_annotations() {
    let store = sample_store();
    let vf = ValueFactory::new(&store);
    let ctor = pair_constructor(&store);

    let mut annotations = Annotations::new();
    annotations.insert("line".into(), vf.integer(3));
    let v = vf
        .constructor_with_annotations(&ctor, vec![vf.integer(1), vf.integer(2)], annotations)
        .unwrap();
    let node = v.as_node().unwrap();
    assert_eq!(node.get_annotation(&store, "line"), Ok(Some(&vf.integer(3))));
    assert_eq!(v.to_string(), "pair(1,2)[@line=3]");

    let err = node.has_annotation(&store, "color").unwrap_err();
    assert_eq!(err.kind(), FactErrorKind::UndeclaredAnnotation);
}

#[test]
fn test_equality_ignores_which_map_is_the_clone() {
    let store = sample_store();
    let vf = ValueFactory::new(&store);

    let plain = NodeValue::new("x", vec![vf.integer(0)]);
    let a = plain
        .set_annotation(&store, "line", vf.integer(1))
        .unwrap()
        .set(0, vf.integer(5))
        .unwrap();
    let b = plain
        .set(0, vf.integer(5))
        .unwrap()
        .set_annotation(&store, "line", vf.integer(1))
        .unwrap();
    assert!(!a.shares_annotations_with(&b));
    assert_eq!(a, b);
}
