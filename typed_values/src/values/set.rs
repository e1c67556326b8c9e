//! Persistent sets.

use std::collections::HashSet;
use std::sync::Arc;

use crate::types::Type;

use super::{unordered_hash, RelationValue, Value};

/// An immutable set with an element type that bounds its elements.
///
/// Updates return new sets; the receiver is never touched.
#[derive(Debug, Clone)]
pub struct SetValue {
    element_type: Type,
    elements: Arc<HashSet<Value>>,
}

impl SetValue {
    /// Set over an already accumulated element table.
    ///
    /// `element_type` must bound every element; writers and the factory
    /// guarantee this.
    pub fn new(element_type: Type, elements: HashSet<Value>) -> Self {
        Self {
            element_type,
            elements: Arc::new(elements),
        }
    }

    pub fn empty(element_type: Type) -> Self {
        Self::new(element_type, HashSet::new())
    }

    /// Set whose element type is the lub of the given values' types.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut element_type = Type::Void;
        let mut elements = HashSet::new();
        for value in values {
            element_type = element_type.lub(&value.get_type());
            elements.insert(value);
        }
        Self::new(element_type, elements)
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    pub fn get_type(&self) -> Type {
        Type::set(self.element_type.clone())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, Value> {
        self.elements.iter()
    }

    /// New set with `value` added. The element type widens to include it.
    pub fn insert(&self, value: Value) -> SetValue {
        let element_type = self.element_type.lub(&value.get_type());
        if self.contains(&value) {
            return Self {
                element_type,
                elements: Arc::clone(&self.elements),
            };
        }
        let mut elements = (*self.elements).clone();
        elements.insert(value);
        Self::new(element_type, elements)
    }

    /// New set without `value`. The element type is kept.
    pub fn delete(&self, value: &Value) -> SetValue {
        if !self.contains(value) {
            return self.clone();
        }
        let mut elements = (*self.elements).clone();
        elements.remove(value);
        Self::new(self.element_type.clone(), elements)
    }

    pub fn union(&self, other: &SetValue) -> SetValue {
        let elements = self.elements.union(&other.elements).cloned().collect();
        Self::new(self.element_type.lub(&other.element_type), elements)
    }

    pub fn intersect(&self, other: &SetValue) -> SetValue {
        let elements = self.elements.intersection(&other.elements).cloned().collect();
        Self::new(self.element_type.lub(&other.element_type), elements)
    }

    pub fn subtract(&self, other: &SetValue) -> SetValue {
        let elements = self.elements.difference(&other.elements).cloned().collect();
        Self::new(self.element_type.clone(), elements)
    }

    pub fn is_subset_of(&self, other: &SetValue) -> bool {
        self.elements.is_subset(&other.elements)
    }
}

impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        self.element_type.comparable(&other.element_type) && self.elements == other.elements
    }
}

impl Eq for SetValue {}

impl std::hash::Hash for SetValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(unordered_hash(self.elements.iter()));
    }
}

impl<'a> IntoIterator for &'a SetValue {
    type Item = &'a Value;
    type IntoIter = std::collections::hash_set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<RelationValue> for SetValue {
    fn from(relation: RelationValue) -> Self {
        relation.as_set()
    }
}

/// A relation when the element type is a tuple type, otherwise a set.
pub(crate) fn collection_value(element_type: Type, elements: HashSet<Value>) -> Value {
    match element_type.strip_aliases() {
        Type::Tuple(t) => Value::Relation(RelationValue::new(t.clone(), elements)),
        _ => Value::Set(SetValue::new(element_type, elements)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ints(values: &[i64]) -> SetValue {
        SetValue::from_values(values.iter().map(|&i| Value::from(i)))
    }

    #[test]
    fn test_insert_is_persistent() {
        let s = ints(&[1, 2]);
        let t = s.insert(Value::from(3));
        assert_eq!(s.len(), 2);
        assert_eq!(t.len(), 3);
        assert!(!s.contains(&Value::from(3)));
    }

    #[test]
    fn test_insert_widens_element_type() {
        let s = ints(&[1]).insert(Value::from("a"));
        assert_eq!(s.element_type(), &Type::Value);
    }

    #[test]
    fn test_delete_keeps_element_type() {
        let s = SetValue::from_values([Value::from(1), Value::from("a")]);
        let t = s.delete(&Value::from("a"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.element_type(), &Type::Value);
    }

    #[test]
    fn test_set_algebra() {
        let a = ints(&[1, 2, 3]);
        let b = ints(&[2, 3, 4]);
        assert_eq!(a.union(&b), ints(&[1, 2, 3, 4]));
        assert_eq!(a.intersect(&b), ints(&[2, 3]));
        assert_eq!(a.subtract(&b), ints(&[1]));
        assert!(ints(&[2]).is_subset_of(&a));
        assert!(!a.is_subset_of(&b));
    }

    #[test]
    fn test_empty_sets_of_unrelated_types_differ() {
        assert_ne!(SetValue::empty(Type::Integer), SetValue::empty(Type::String));
        assert_eq!(SetValue::empty(Type::Integer), SetValue::empty(Type::Value));
    }
}
