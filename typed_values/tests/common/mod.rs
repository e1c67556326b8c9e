//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use typed_values::types::TypeStore;
use typed_values::values::TupleValue;
use typed_values::{Type, Value};

/// Tuple of integers, typed by its elements.
pub fn int_tuple(values: &[i64]) -> Value {
    Value::Tuple(TupleValue::new(values.iter().map(|&i| Value::from(i)).collect()))
}

/// `<int, str>` tuple.
pub fn pair(i: i64, s: &str) -> Value {
    Value::Tuple(TupleValue::new(vec![Value::from(i), Value::from(s)]))
}

/// Store declaring `Pair = pair(int, int)` and a `Tree[&T]` family with
/// `leaf(&T)` and `branch(Tree[&T] left, Tree[&T] right)`.
/// Every node may carry an integer `line` annotation.
pub fn sample_store() -> TypeStore {
    let mut store = TypeStore::new();
    let pair = store.declare_adt("Pair", vec![]).expect("declare Pair");
    store
        .declare_constructor(&pair, "pair", vec![Type::Integer, Type::Integer], None)
        .expect("declare pair");

    let t = Type::parameter("T");
    let tree = store
        .declare_adt("Tree", vec![t.clone()])
        .expect("declare Tree");
    store
        .declare_constructor(&tree, "leaf", vec![t], None)
        .expect("declare leaf");
    store
        .declare_constructor(
            &tree,
            "branch",
            vec![tree.clone(), tree.clone()],
            Some(vec!["left".into(), "right".into()]),
        )
        .expect("declare branch");

    store
        .declare_annotation(&Type::Node, "line", Type::Integer)
        .expect("declare line");
    store
}

/// The `Pair.pair` constructor type of [`sample_store`].
pub fn pair_constructor(store: &TypeStore) -> Type {
    store
        .lookup_constructor("Pair", "pair")
        .expect("pair is declared")
}
