//! Relations: sets of equal-arity tuples with relational operators.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{FactError, FactResult};
use crate::types::{TupleType, Type};

use super::set::collection_value;
use super::{unordered_hash, SetValue, TupleValue, Value};

/// An immutable relation. Every element is a `Value::Tuple` whose type is a
/// subtype of the relation's tuple type.
#[derive(Debug, Clone)]
pub struct RelationValue {
    tuple_type: TupleType,
    elements: Arc<HashSet<Value>>,
}

impl RelationValue {
    pub fn new(tuple_type: TupleType, elements: HashSet<Value>) -> Self {
        Self {
            tuple_type,
            elements: Arc::new(elements),
        }
    }

    pub fn empty(tuple_type: TupleType) -> Self {
        Self::new(tuple_type, HashSet::new())
    }

    /// Relation over `tuples`; the tuple type is their lub.
    ///
    /// Fails on a non-tuple element or on tuples of differing arity. An empty
    /// input has no tuple type to infer and fails as well.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> FactResult<Self> {
        let mut tuple_type: Option<TupleType> = None;
        let mut elements = HashSet::new();
        for value in values {
            let t = tuple_type_of(&value)?;
            tuple_type = Some(match tuple_type {
                None => t,
                Some(current) => lub_same_arity(&current, &t)?,
            });
            elements.insert(value);
        }
        let tuple_type =
            tuple_type.ok_or_else(|| FactError::type_mismatch("a tuple type", Type::Void))?;
        Ok(Self::new(tuple_type, elements))
    }

    pub fn tuple_type(&self) -> &TupleType {
        &self.tuple_type
    }

    pub fn get_type(&self) -> Type {
        Type::Relation(self.tuple_type.clone())
    }

    pub fn arity(&self) -> usize {
        self.tuple_type.arity()
    }

    pub fn field_types(&self) -> &[Type] {
        self.tuple_type.fields()
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

    fn tuples(&self) -> impl Iterator<Item = &TupleValue> {
        self.elements.iter().filter_map(Value::as_tuple)
    }

    /// The same elements viewed as a plain set of tuples.
    pub fn as_set(&self) -> SetValue {
        SetValue::new(Type::Tuple(self.tuple_type.clone()), (*self.elements).clone())
    }

    /// New relation with `tuple` added.
    pub fn insert(&self, tuple: Value) -> FactResult<RelationValue> {
        let tuple_type = lub_same_arity(&self.tuple_type, &tuple_type_of(&tuple)?)?;
        let mut elements = (*self.elements).clone();
        elements.insert(tuple);
        Ok(Self::new(tuple_type, elements))
    }

    /// New relation without `tuple`. The tuple type is kept.
    pub fn delete(&self, tuple: &Value) -> RelationValue {
        if !self.contains(tuple) {
            return self.clone();
        }
        let mut elements = (*self.elements).clone();
        elements.remove(tuple);
        Self::new(self.tuple_type.clone(), elements)
    }

    pub fn union(&self, other: &RelationValue) -> FactResult<RelationValue> {
        let tuple_type = lub_same_arity(&self.tuple_type, &other.tuple_type)?;
        let elements = self.elements.union(&other.elements).cloned().collect();
        Ok(Self::new(tuple_type, elements))
    }

    pub fn intersect(&self, other: &RelationValue) -> FactResult<RelationValue> {
        let tuple_type = lub_same_arity(&self.tuple_type, &other.tuple_type)?;
        let elements = self.elements.intersection(&other.elements).cloned().collect();
        Ok(Self::new(tuple_type, elements))
    }

    pub fn subtract(&self, other: &RelationValue) -> RelationValue {
        let elements = self.elements.difference(&other.elements).cloned().collect();
        Self::new(self.tuple_type.clone(), elements)
    }

    pub fn is_subset_of(&self, other: &RelationValue) -> bool {
        self.elements.is_subset(&other.elements)
    }

    /// Values of the first field.
    pub fn domain(&self) -> FactResult<Value> {
        self.project(&[0])
    }

    /// Values of the last field.
    pub fn range(&self) -> FactResult<Value> {
        match self.arity() {
            0 => Err(FactError::index_out_of_bounds(0, 0)),
            n => self.project(&[n - 1]),
        }
    }

    /// Values of every field, as one set.
    pub fn carrier(&self) -> Value {
        let element_type = self
            .field_types()
            .iter()
            .fold(Type::Void, |acc, field| acc.lub(field));
        let elements = self
            .tuples()
            .flat_map(|t| t.elements().iter().cloned())
            .collect();
        collection_value(element_type, elements)
    }

    /// Projection onto `fields`. One field gives a set of that field's
    /// values, several give a relation.
    pub fn project(&self, fields: &[usize]) -> FactResult<Value> {
        if let [field] = fields {
            let element_type = self.tuple_type.field_type(*field)?.clone();
            let elements = self
                .tuples()
                .filter_map(|t| t.elements().get(*field).cloned())
                .collect();
            return Ok(collection_value(element_type, elements));
        }
        let tuple_type = self.tuple_type.select(fields)?;
        let elements = self
            .tuples()
            .map(|t| t.select(fields).map(Value::Tuple))
            .collect::<FactResult<HashSet<_>>>()?;
        Ok(Value::Relation(Self::new(tuple_type, elements)))
    }

    /// Relational composition: `(a, b)` and `(b, c)` give `(a, c)`.
    pub fn compose(&self, other: &RelationValue) -> FactResult<RelationValue> {
        self.require_binary("composition")?;
        other.require_binary("composition")?;
        let (left, middle) = (&self.field_types()[0], &self.field_types()[1]);
        let (other_middle, right) = (&other.field_types()[0], &other.field_types()[1]);
        if !middle.comparable(other_middle) {
            return Err(FactError::type_mismatch(middle, other_middle));
        }

        let successors = other.successors();
        let mut elements = HashSet::new();
        for (a, b) in self.pairs() {
            for c in successors.get(b).into_iter().flatten() {
                elements.insert(pair(a.clone(), (*c).clone()));
            }
        }
        Ok(Self::new(
            TupleType::new(vec![left.clone(), right.clone()]),
            elements,
        ))
    }

    /// Transitive closure of a binary relation.
    pub fn closure(&self) -> FactResult<RelationValue> {
        self.require_binary("closure")?;
        let (from, to) = (&self.field_types()[0], &self.field_types()[1]);
        if !from.comparable(to) {
            return Err(FactError::type_mismatch(from, to));
        }

        let successors = self.successors();
        let mut closed: HashSet<(Value, Value)> = self
            .pairs()
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect();
        let mut pending: Vec<(Value, Value)> = closed.iter().cloned().collect();
        while let Some((a, b)) = pending.pop() {
            for c in successors.get(&b).into_iter().flatten() {
                let candidate = (a.clone(), (*c).clone());
                if closed.insert(candidate.clone()) {
                    pending.push(candidate);
                }
            }
        }

        let field = from.lub(to);
        let elements = closed.into_iter().map(|(a, b)| pair(a, b)).collect();
        Ok(Self::new(TupleType::new(vec![field.clone(), field]), elements))
    }

    fn require_binary(&self, operation: &str) -> FactResult<()> {
        if self.arity() != 2 {
            return Err(FactError::shape_mismatch(
                operation,
                "a binary relation",
                format!("arity {}", self.arity()),
            ));
        }
        Ok(())
    }

    fn pairs(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.tuples().filter_map(|t| match t.elements() {
            [a, b] => Some((a, b)),
            _ => None,
        })
    }

    fn successors(&self) -> HashMap<&Value, Vec<&Value>> {
        let mut successors: HashMap<&Value, Vec<&Value>> = HashMap::new();
        for (a, b) in self.pairs() {
            successors.entry(a).or_default().push(b);
        }
        successors
    }
}

fn pair(a: Value, b: Value) -> Value {
    Value::Tuple(TupleValue::new(vec![a, b]))
}

fn tuple_type_of(value: &Value) -> FactResult<TupleType> {
    match value {
        Value::Tuple(t) => Ok(t.tuple_type().clone()),
        other => Err(FactError::type_mismatch("a tuple", other.get_type())),
    }
}

fn lub_same_arity(left: &TupleType, right: &TupleType) -> FactResult<TupleType> {
    left.lub(right).ok_or_else(|| {
        FactError::shape_mismatch(
            "relation",
            format!("arity {}", left.arity()),
            format!("arity {}", right.arity()),
        )
    })
}

impl PartialEq for RelationValue {
    fn eq(&self, other: &Self) -> bool {
        self.tuple_type.arity() == other.tuple_type.arity()
            && (self.tuple_type.is_subtype_of(&other.tuple_type)
                || other.tuple_type.is_subtype_of(&self.tuple_type))
            && self.elements == other.elements
    }
}

impl Eq for RelationValue {}

impl std::hash::Hash for RelationValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(unordered_hash(self.elements.iter()));
    }
}

impl<'a> IntoIterator for &'a RelationValue {
    type Item = &'a Value;
    type IntoIter = std::collections::hash_set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
