//! Labeled nodes and ADT constructor values.
//!
//! A `NodeValue` owns two shared structures: its children and its annotation
//! map. The update operations treat them differently:
//!
//! - child replacement (`set`, `set_by_label`) builds a new children array and
//!   shares the annotation map as is;
//! - annotation updates (`set_annotation`, `set_annotations`,
//!   `remove_annotation`) share the children array and clone the annotation
//!   map before writing to it.
//!
//! Neither path ever writes into a structure another value can see.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{FactError, FactResult};
use crate::types::{Type, TypeStore};

use super::Value;

/// Annotation label to value.
pub type Annotations = BTreeMap<String, Value>;

static EMPTY_ANNOTATIONS: Lazy<Arc<Annotations>> = Lazy::new(|| Arc::new(BTreeMap::new()));

/// A node: a name, ordered children and typed annotations.
///
/// The type is `node` for plain nodes or a constructor type for ADT values.
#[derive(Debug, Clone)]
pub struct NodeValue {
    ty: Type,
    name: Arc<str>,
    children: Arc<[Value]>,
    annotations: Arc<Annotations>,
}

impl NodeValue {
    /// Plain node of type `node`. Any child is accepted.
    pub fn new(name: impl Into<Arc<str>>, children: Vec<Value>) -> Self {
        Self {
            ty: Type::Node,
            name: name.into(),
            children: children.into(),
            annotations: Arc::clone(&EMPTY_ANNOTATIONS),
        }
    }

    /// Value of constructor type `ty`.
    ///
    /// The children must match the constructor's fields in number and each
    /// must be a subtype of its field type. Parameterized constructors should
    /// be instantiated first, see `ValueFactory::constructor`.
    pub fn from_constructor(ty: &Type, children: Vec<Value>) -> FactResult<Self> {
        let ctor = match ty.strip_aliases() {
            Type::Constructor(c) => c,
            other => return Err(FactError::type_mismatch("a constructor type", other)),
        };
        if ctor.fields.arity() != children.len() {
            return Err(FactError::shape_mismatch(
                format!("construction of {}", ctor.name),
                format!("{} children", ctor.fields.arity()),
                format!("{} children", children.len()),
            ));
        }
        for (field, child) in ctor.fields.fields().iter().zip(&children) {
            let actual = child.get_type();
            if !actual.is_subtype_of(field) {
                return Err(FactError::type_mismatch(field, actual));
            }
        }
        Ok(Self {
            name: ctor.name.as_str().into(),
            ty: Type::Constructor(ctor.clone()),
            children: children.into(),
            annotations: Arc::clone(&EMPTY_ANNOTATIONS),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> Type {
        self.ty.clone()
    }

    pub fn node_type(&self) -> &Type {
        &self.ty
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.ty, Type::Constructor(_))
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> &[Value] {
        &self.children
    }

    pub fn get(&self, index: usize) -> FactResult<&Value> {
        self.children
            .get(index)
            .ok_or_else(|| FactError::index_out_of_bounds(index, self.arity()))
    }

    pub fn get_by_label(&self, label: &str) -> FactResult<&Value> {
        self.get(self.ty.field_index(label)?)
    }

    /// Wrap as `Value::Constructor` or `Value::Node` according to the type.
    pub fn into_value(self) -> Value {
        if self.is_constructor() {
            Value::Constructor(self)
        } else {
            Value::Node(self)
        }
    }

    /// New node with `child` at `index`, sharing this node's annotations.
    pub fn set(&self, index: usize, child: Value) -> FactResult<NodeValue> {
        if index >= self.arity() {
            return Err(FactError::index_out_of_bounds(index, self.arity()));
        }
        let declared = self.ty.field_type(index)?;
        let actual = child.get_type();
        if !actual.is_subtype_of(&declared) {
            return Err(FactError::type_mismatch(declared, actual));
        }

        let mut children = self.children.to_vec();
        children[index] = child;
        Ok(Self {
            ty: self.ty.clone(),
            name: Arc::clone(&self.name),
            children: children.into(),
            annotations: self.share_annotations(),
        })
    }

    pub fn set_by_label(&self, label: &str, child: Value) -> FactResult<NodeValue> {
        self.set(self.ty.field_index(label)?, child)
    }

    fn share_annotations(&self) -> Arc<Annotations> {
        Arc::clone(&self.annotations)
    }

    /// Clone the annotation map, apply `update`, and pair the result with
    /// this node's children.
    fn with_cloned_annotations(&self, update: impl FnOnce(&mut Annotations)) -> NodeValue {
        let mut annotations = (*self.annotations).clone();
        update(&mut annotations);
        Self {
            ty: self.ty.clone(),
            name: Arc::clone(&self.name),
            children: Arc::clone(&self.children),
            annotations: Arc::new(annotations),
        }
    }

    fn check_annotation(&self, store: &TypeStore, label: &str, value: &Value) -> FactResult<()> {
        let declared = store
            .annotation_type(&self.ty, label)
            .ok_or_else(|| FactError::undeclared_annotation(label, &self.ty))?;
        let actual = value.get_type();
        if !actual.is_subtype_of(declared) {
            return Err(FactError::type_mismatch(declared, actual));
        }
        Ok(())
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn has_annotations(&self) -> bool {
        !self.annotations.is_empty()
    }

    /// Whether this instance carries annotation `label`.
    ///
    /// Fails only when the label is neither declared for the node's type nor
    /// present on the instance.
    pub fn has_annotation(&self, store: &TypeStore, label: &str) -> FactResult<bool> {
        if self.annotations.contains_key(label) {
            return Ok(true);
        }
        if store.declares_annotation(&self.ty, label) {
            Ok(false)
        } else {
            Err(FactError::undeclared_annotation(label, &self.ty))
        }
    }

    pub fn declares_annotation(&self, store: &TypeStore, label: &str) -> bool {
        store.declares_annotation(&self.ty, label)
    }

    /// Value of annotation `label`, `None` when declared but unset.
    pub fn get_annotation(&self, store: &TypeStore, label: &str) -> FactResult<Option<&Value>> {
        if !store.declares_annotation(&self.ty, label) {
            return Err(FactError::undeclared_annotation(label, &self.ty));
        }
        Ok(self.annotations.get(label))
    }

    /// New node with `label` set to `value`, sharing this node's children.
    pub fn set_annotation(
        &self,
        store: &TypeStore,
        label: &str,
        value: Value,
    ) -> FactResult<NodeValue> {
        self.check_annotation(store, label, &value)?;
        Ok(self.with_cloned_annotations(|annotations| {
            annotations.insert(label.to_string(), value);
        }))
    }

    /// New node with every entry of `updates` set. All entries are checked
    /// before anything is copied.
    pub fn set_annotations(&self, store: &TypeStore, updates: Annotations) -> FactResult<NodeValue> {
        for (label, value) in &updates {
            self.check_annotation(store, label, value)?;
        }
        Ok(self.with_cloned_annotations(|annotations| annotations.extend(updates)))
    }

    /// New node without annotation `label`. Removing an absent label still
    /// yields a node equal to this one.
    pub fn remove_annotation(&self, label: &str) -> NodeValue {
        self.with_cloned_annotations(|annotations| {
            annotations.remove(label);
        })
    }

    /// New node without any annotations.
    pub fn remove_annotations(&self) -> NodeValue {
        Self {
            annotations: Arc::clone(&EMPTY_ANNOTATIONS),
            ..self.clone()
        }
    }

    pub fn shares_children_with(&self, other: &NodeValue) -> bool {
        Arc::ptr_eq(&self.children, &other.children)
    }

    pub fn shares_annotations_with(&self, other: &NodeValue) -> bool {
        Arc::ptr_eq(&self.annotations, &other.annotations)
    }
}

impl PartialEq for NodeValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.ty.comparable(&other.ty)
            && self.children == other.children
            && self.annotations == other.annotations
    }
}

impl Eq for NodeValue {}

impl std::hash::Hash for NodeValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.children.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FactErrorKind;

    fn annotated_store() -> TypeStore {
        let mut store = TypeStore::new();
        store.declare_annotation(&Type::Node, "pos", Type::Integer).unwrap();
        store
    }

    #[test]
    fn test_set_shares_annotations() {
        let store = annotated_store();
        let n = NodeValue::new("f", vec![Value::from(1), Value::from(2)])
            .set_annotation(&store, "pos", Value::from(10))
            .unwrap();
        let m = n.set(0, Value::from("one")).unwrap();

        assert!(m.shares_annotations_with(&n));
        assert_eq!(m.annotations(), n.annotations());
        assert_eq!(m.children()[0], Value::from("one"));
        assert_eq!(n.children()[0], Value::from(1));
    }

    #[test]
    fn test_set_annotation_clones_map_and_shares_children() {
        let store = annotated_store();
        let n = NodeValue::new("f", vec![Value::from(1)])
            .set_annotation(&store, "pos", Value::from(1))
            .unwrap();
        let sibling = n.set(0, Value::from(2)).unwrap();
        let m = n.set_annotation(&store, "pos", Value::from(2)).unwrap();

        assert!(m.shares_children_with(&n));
        assert!(!m.shares_annotations_with(&n));
        // The sibling still sees the original mapping.
        assert_eq!(sibling.annotations().get("pos"), Some(&Value::from(1)));
        assert_eq!(n.annotations().get("pos"), Some(&Value::from(1)));
        assert_eq!(m.annotations().get("pos"), Some(&Value::from(2)));
    }

    #[test]
    fn test_undeclared_and_mistyped_annotations() {
        let store = annotated_store();
        let n = NodeValue::new("f", vec![]);

        let err = n.set_annotation(&store, "color", Value::from("red")).unwrap_err();
        assert_eq!(err.kind(), FactErrorKind::UndeclaredAnnotation);

        let err = n.set_annotation(&store, "pos", Value::from("x")).unwrap_err();
        assert_eq!(err.kind(), FactErrorKind::TypeMismatch);

        assert!(n.get_annotation(&store, "color").is_err());
        assert_eq!(n.get_annotation(&store, "pos"), Ok(None));
    }

    #[test]
    fn test_has_annotation_distinguishes_undeclared_from_unset() {
        let store = annotated_store();
        let n = NodeValue::new("f", vec![]);
        assert_eq!(n.has_annotation(&store, "pos"), Ok(false));
        assert!(n.has_annotation(&store, "color").is_err());

        let set = n.set_annotation(&store, "pos", Value::from(3)).unwrap();
        assert_eq!(set.has_annotation(&store, "pos"), Ok(true));
        // Present on the instance answers true even against a store that
        // does not declare it.
        assert_eq!(set.has_annotation(&TypeStore::new(), "pos"), Ok(true));
    }

    #[test]
    fn test_equality_compares_annotations() {
        let store = annotated_store();
        let n = NodeValue::new("f", vec![Value::from(1)]);
        let a = n.set_annotation(&store, "pos", Value::from(1)).unwrap();
        let b = n.set_annotation(&store, "pos", Value::from(1)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, n);
        assert_eq!(a.remove_annotation("pos"), n);
        assert_eq!(a.remove_annotations(), n);
    }

    #[test]
    fn test_from_constructor_checks_fields() {
        let mut store = TypeStore::new();
        let adt = store.declare_adt("Pair", vec![]).unwrap();
        let pair = store
            .declare_constructor(&adt, "pair", vec![Type::Integer, Type::Integer], None)
            .unwrap();

        let ok = NodeValue::from_constructor(&pair, vec![Value::from(1), Value::from(2)]).unwrap();
        assert!(ok.is_constructor());
        assert_eq!(ok.name(), "pair");

        let err = NodeValue::from_constructor(&pair, vec![Value::from(1)]).unwrap_err();
        assert_eq!(err.kind(), FactErrorKind::ShapeMismatch);
        let err = NodeValue::from_constructor(&Type::Node, vec![]).unwrap_err();
        assert_eq!(err.kind(), FactErrorKind::TypeMismatch);
    }
}
