//! Persistent lists.

use std::sync::Arc;

use crate::error::{FactError, FactResult};
use crate::types::Type;

use super::Value;

#[derive(Debug, Clone)]
pub struct ListValue {
    element_type: Type,
    elements: Arc<Vec<Value>>,
}

impl ListValue {
    pub fn new(element_type: Type, elements: Vec<Value>) -> Self {
        Self {
            element_type,
            elements: Arc::new(elements),
        }
    }

    pub fn empty(element_type: Type) -> Self {
        Self::new(element_type, Vec::new())
    }

    /// List whose element type is the lub of the given values' types.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let elements: Vec<Value> = values.into_iter().collect();
        let element_type = elements
            .iter()
            .fold(Type::Void, |acc, v| acc.lub(&v.get_type()));
        Self::new(element_type, elements)
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    pub fn get_type(&self) -> Type {
        Type::list(self.element_type.clone())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub fn get(&self, index: usize) -> FactResult<&Value> {
        self.elements
            .get(index)
            .ok_or_else(|| FactError::index_out_of_bounds(index, self.len()))
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    fn derive(&self, element_type: Type, update: impl FnOnce(&mut Vec<Value>)) -> ListValue {
        let mut elements = (*self.elements).clone();
        update(&mut elements);
        Self::new(element_type, elements)
    }

    pub fn append(&self, value: Value) -> ListValue {
        let element_type = self.element_type.lub(&value.get_type());
        self.derive(element_type, |elements| elements.push(value))
    }

    pub fn prepend(&self, value: Value) -> ListValue {
        let element_type = self.element_type.lub(&value.get_type());
        self.derive(element_type, |elements| elements.insert(0, value))
    }

    pub fn concat(&self, other: &ListValue) -> ListValue {
        let element_type = self.element_type.lub(&other.element_type);
        self.derive(element_type, |elements| {
            elements.extend(other.elements.iter().cloned())
        })
    }

    pub fn reverse(&self) -> ListValue {
        self.derive(self.element_type.clone(), |elements| elements.reverse())
    }

    /// `length` elements starting at `offset`.
    pub fn sublist(&self, offset: usize, length: usize) -> FactResult<ListValue> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= self.len())
            .ok_or_else(|| FactError::index_out_of_bounds(offset.saturating_add(length), self.len()))?;
        Ok(Self::new(
            self.element_type.clone(),
            self.elements[offset..end].to_vec(),
        ))
    }
}

impl PartialEq for ListValue {
    fn eq(&self, other: &Self) -> bool {
        self.element_type.comparable(&other.element_type) && self.elements == other.elements
    }
}

impl Eq for ListValue {}

impl std::hash::Hash for ListValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.elements.hash(state);
    }
}

impl<'a> IntoIterator for &'a ListValue {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
