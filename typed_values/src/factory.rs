//! Construction facade.
//!
//! `ValueFactory` borrows a [`TypeStore`] and builds values against its
//! declarations. Leaf constructors cannot fail; anything checked against a
//! type returns a [`FactResult`].

use num_bigint::BigInt;
use std::collections::HashSet;

use crate::error::{FactError, FactResult};
use crate::types::{Bindings, TupleType, Type, TypeStore};
use crate::values::{
    collection_value, Annotations, ListValue, MapValue, NodeValue, RelationValue, SourceLocation,
    SourceRange, TupleValue, Value,
};
use crate::writers::{ListWriter, MapWriter, RelationWriter, SetWriter, TupleWriter};

#[derive(Debug, Clone, Copy)]
pub struct ValueFactory<'s> {
    store: &'s TypeStore,
}

impl<'s> ValueFactory<'s> {
    pub fn new(store: &'s TypeStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'s TypeStore {
        self.store
    }

    // ==================== Leaves ====================

    pub fn bool(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    pub fn integer(&self, value: impl Into<BigInt>) -> Value {
        Value::Integer(value.into())
    }

    pub fn double(&self, value: f64) -> Value {
        Value::Double(value)
    }

    pub fn string(&self, value: impl Into<String>) -> Value {
        Value::String(value.into())
    }

    pub fn source_range(
        &self,
        offset: usize,
        length: usize,
        start: (usize, usize),
        end: (usize, usize),
    ) -> Value {
        Value::SourceRange(SourceRange::new(offset, length, start, end))
    }

    pub fn source_location(&self, path: impl Into<String>, range: SourceRange) -> Value {
        Value::SourceLocation(SourceLocation::new(path, range))
    }

    // ==================== Tuples and nodes ====================

    pub fn tuple(&self, elements: Vec<Value>) -> Value {
        Value::Tuple(TupleValue::new(elements))
    }

    /// Tuple of a declared, possibly labeled, tuple type.
    pub fn typed_tuple(&self, ty: &Type, elements: Vec<Value>) -> FactResult<Value> {
        TupleValue::with_type(ty, elements).map(Value::Tuple)
    }

    pub fn node(&self, name: &str, children: Vec<Value>) -> Value {
        Value::Node(NodeValue::new(name, children))
    }

    /// Plain node with annotations, each checked against the store.
    pub fn node_with_annotations(
        &self,
        name: &str,
        children: Vec<Value>,
        annotations: Annotations,
    ) -> FactResult<Value> {
        NodeValue::new(name, children)
            .set_annotations(self.store, annotations)
            .map(Value::Node)
    }

    /// Value of constructor type `ctor`.
    ///
    /// A parameterized constructor is first instantiated: each ADT parameter
    /// is bound to the lub of the child types it matches, and to `void` when
    /// it matches none.
    pub fn constructor(&self, ctor: &Type, children: Vec<Value>) -> FactResult<Value> {
        let declared = match ctor.strip_aliases() {
            Type::Constructor(c) => c,
            other => return Err(FactError::type_mismatch("a constructor type", other)),
        };
        if !ctor.is_open() {
            return NodeValue::from_constructor(ctor, children).map(Value::Constructor);
        }

        let mut bindings: Bindings = declared
            .adt
            .parameters
            .iter()
            .filter_map(|p| match p {
                Type::Parameter(name) => Some((name.clone(), Type::Void)),
                _ => None,
            })
            .collect();
        let actual = Type::tuple(children.iter().map(Value::get_type).collect());
        Type::Tuple(declared.fields.clone()).match_parameters(&actual, &mut bindings)?;

        let instantiated = ctor.instantiate_with(&bindings);
        NodeValue::from_constructor(&instantiated, children).map(Value::Constructor)
    }

    /// Constructor value looked up by ADT and constructor name.
    pub fn constructor_named(
        &self,
        adt: &str,
        name: &str,
        children: Vec<Value>,
    ) -> FactResult<Value> {
        let ctor = self
            .store
            .lookup_constructor(adt, name)
            .ok_or_else(|| FactError::UndeclaredType(format!("{}.{}", adt, name)))?;
        self.constructor(&ctor, children)
    }

    pub fn constructor_with_annotations(
        &self,
        ctor: &Type,
        children: Vec<Value>,
        annotations: Annotations,
    ) -> FactResult<Value> {
        let value = self.constructor(ctor, children)?;
        match value.as_node() {
            Some(node) => node
                .set_annotations(self.store, annotations)
                .map(Value::Constructor),
            None => Ok(value),
        }
    }

    // ==================== Collections ====================

    /// Set with an inferred element type; a relation when that type is a
    /// tuple type.
    pub fn set(&self, elements: impl IntoIterator<Item = Value>) -> Value {
        let mut element_type = Type::Void;
        let mut table = HashSet::new();
        for element in elements {
            element_type = element_type.lub(&element.get_type());
            table.insert(element);
        }
        collection_value(element_type, table)
    }

    /// Relation over `tuples`. Fails unless their lub is a tuple type.
    pub fn relation(&self, tuples: impl IntoIterator<Item = Value>) -> FactResult<Value> {
        RelationValue::from_values(tuples).map(Value::Relation)
    }

    pub fn list(&self, elements: impl IntoIterator<Item = Value>) -> Value {
        Value::List(ListValue::from_values(elements))
    }

    pub fn map(&self, entries: impl IntoIterator<Item = (Value, Value)>) -> Value {
        Value::Map(MapValue::from_entries(entries))
    }

    // ==================== Writers ====================

    pub fn set_writer(&self) -> SetWriter {
        SetWriter::new()
    }

    /// Set writer with a declared element type. A tuple element type makes
    /// it finalize to a relation.
    pub fn set_writer_of(&self, element_type: Type) -> SetWriter {
        SetWriter::with_element_type(element_type)
    }

    pub fn relation_writer(&self) -> RelationWriter {
        RelationWriter::new()
    }

    pub fn relation_writer_of(&self, tuple_type: TupleType) -> RelationWriter {
        RelationWriter::with_tuple_type(tuple_type)
    }

    pub fn list_writer(&self) -> ListWriter {
        ListWriter::new()
    }

    pub fn list_writer_of(&self, element_type: Type) -> ListWriter {
        ListWriter::with_element_type(element_type)
    }

    pub fn map_writer(&self) -> MapWriter {
        MapWriter::new()
    }

    pub fn map_writer_of(&self, key_type: Type, value_type: Type) -> MapWriter {
        MapWriter::with_types(key_type, value_type)
    }

    pub fn tuple_writer(&self) -> TupleWriter {
        TupleWriter::new()
    }

    pub fn tuple_writer_of(&self, tuple_type: Type) -> FactResult<TupleWriter> {
        TupleWriter::with_type(tuple_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FactErrorKind;

    fn boxes() -> (TypeStore, Type) {
        let mut store = TypeStore::new();
        let boxed = store.declare_adt("Box", vec![Type::parameter("T")]).unwrap();
        let ctor = store
            .declare_constructor(&boxed, "box", vec![Type::parameter("T")], None)
            .unwrap();
        (store, ctor)
    }

    #[test]
    fn test_parameterized_constructor_is_instantiated() {
        let (store, ctor) = boxes();
        let vf = ValueFactory::new(&store);
        let v = vf.constructor(&ctor, vec![vf.integer(3)]).unwrap();
        assert_eq!(v.get_type().to_string(), "Box[int].box(int)");

        // The instantiated field type now rejects other kinds.
        let node = v.as_node().unwrap();
        let err = node.set(0, vf.string("s")).unwrap_err();
        assert_eq!(err.kind(), FactErrorKind::TypeMismatch);
    }

    #[test]
    fn test_constructor_arity_mismatch() {
        let (store, ctor) = boxes();
        let vf = ValueFactory::new(&store);
        let err = vf.constructor(&ctor, vec![]).unwrap_err();
        assert_eq!(err.kind(), FactErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_constructor_named_lookup() {
        let (store, _) = boxes();
        let vf = ValueFactory::new(&store);
        assert!(vf.constructor_named("Box", "box", vec![vf.bool(true)]).is_ok());
        let err = vf.constructor_named("Box", "crate", vec![]).unwrap_err();
        assert_eq!(err, FactError::UndeclaredType("Box.crate".into()));
    }

    #[test]
    fn test_set_of_tuples_is_relation() {
        let store = TypeStore::new();
        let vf = ValueFactory::new(&store);
        let v = vf.set([vf.tuple(vec![vf.integer(1), vf.integer(2)])]);
        assert!(v.as_relation().is_some());
        assert!(vf.set([vf.integer(1)]).as_set().is_some());
    }

    #[test]
    fn test_relation_requires_tuples() {
        let store = TypeStore::new();
        let vf = ValueFactory::new(&store);
        assert!(vf.relation([vf.integer(1)]).is_err());
        assert!(vf.relation(Vec::new()).is_err());
    }

    #[test]
    fn test_node_with_annotations_is_checked() {
        let mut store = TypeStore::new();
        store.declare_annotation(&Type::Node, "line", Type::Integer).unwrap();
        let vf = ValueFactory::new(&store);

        let mut ok = Annotations::new();
        ok.insert("line".into(), vf.integer(4));
        let node = vf.node_with_annotations("stmt", vec![], ok).unwrap();
        assert_eq!(node.to_string(), "stmt()[@line=4]");

        let mut bad = Annotations::new();
        bad.insert("column".into(), vf.integer(4));
        assert!(vf.node_with_annotations("stmt", vec![], bad).is_err());
    }
}
