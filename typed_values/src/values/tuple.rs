//! Fixed-arity tuple values.

use std::sync::Arc;

use crate::error::{FactError, FactResult};
use crate::types::{TupleType, Type};

use super::Value;

/// An immutable tuple. The type keeps any field names it was built with.
#[derive(Debug, Clone)]
pub struct TupleValue {
    ty: TupleType,
    elements: Arc<[Value]>,
}

impl TupleValue {
    /// Tuple typed by its elements.
    pub fn new(elements: Vec<Value>) -> Self {
        let ty = TupleType::new(elements.iter().map(Value::get_type).collect());
        Self {
            ty,
            elements: elements.into(),
        }
    }

    /// Tuple carrying a declared (possibly labeled) tuple type.
    ///
    /// Every element must be a subtype of the field type at its position.
    pub fn with_type(ty: &Type, elements: Vec<Value>) -> FactResult<Self> {
        let declared = match ty.strip_aliases() {
            Type::Tuple(t) => t,
            other => return Err(FactError::type_mismatch("a tuple type", other)),
        };
        if declared.arity() != elements.len() {
            return Err(FactError::shape_mismatch(
                "tuple construction",
                format!("{} fields", declared.arity()),
                format!("{} fields", elements.len()),
            ));
        }
        for (field, element) in declared.fields().iter().zip(&elements) {
            let actual = element.get_type();
            if !actual.is_subtype_of(field) {
                return Err(FactError::type_mismatch(field, actual));
            }
        }
        Ok(Self {
            ty: declared.clone(),
            elements: elements.into(),
        })
    }

    /// Tuple whose elements the caller has already checked against `ty`.
    pub(crate) fn from_checked(ty: TupleType, elements: Vec<Value>) -> Self {
        Self {
            ty,
            elements: elements.into(),
        }
    }

    pub fn tuple_type(&self) -> &TupleType {
        &self.ty
    }

    pub fn get_type(&self) -> Type {
        Type::Tuple(self.ty.clone())
    }

    pub fn arity(&self) -> usize {
        self.elements.len()
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
            .ok_or_else(|| FactError::index_out_of_bounds(index, self.arity()))
    }

    pub fn get_by_label(&self, label: &str) -> FactResult<&Value> {
        let index = self
            .ty
            .field_index(label)
            .ok_or_else(|| FactError::unknown_field(label, self.get_type()))?;
        self.get(index)
    }

    /// New tuple with `element` at `index`.
    ///
    /// The field type at `index` becomes the new element's type; field names
    /// are kept.
    pub fn set(&self, index: usize, element: Value) -> FactResult<TupleValue> {
        if index >= self.arity() {
            return Err(FactError::index_out_of_bounds(index, self.arity()));
        }
        let mut fields = self.ty.fields().to_vec();
        fields[index] = element.get_type();
        let mut elements = self.elements.to_vec();
        elements[index] = element;
        Ok(Self {
            ty: TupleType::from_parts(fields, self.ty.names().map(<[String]>::to_vec)),
            elements: elements.into(),
        })
    }

    pub fn set_by_label(&self, label: &str, element: Value) -> FactResult<TupleValue> {
        let index = self
            .ty
            .field_index(label)
            .ok_or_else(|| FactError::unknown_field(label, self.get_type()))?;
        self.set(index, element)
    }

    /// Projection onto the given field positions, in the given order.
    pub fn select(&self, indices: &[usize]) -> FactResult<TupleValue> {
        let ty = self.ty.select(indices)?;
        let elements: Vec<Value> = indices.iter().map(|&i| self.elements[i].clone()).collect();
        Ok(Self {
            ty,
            elements: elements.into(),
        })
    }
}

impl PartialEq for TupleValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty.arity() == other.ty.arity()
            && (self.ty.is_subtype_of(&other.ty) || other.ty.is_subtype_of(&self.ty))
            && self.elements == other.elements
    }
}

impl Eq for TupleValue {}

impl std::hash::Hash for TupleValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.elements.hash(state);
    }
}

impl<'a> IntoIterator for &'a TupleValue {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
