use std::collections::HashSet;

use crate::error::{FactError, FactResult};
use crate::types::{TupleType, Type};
use crate::values::{RelationValue, Value};

use super::{ElementType, Writer, WriterState};

/// Builds a relation. Every element must be a tuple of one arity.
#[derive(Debug)]
pub struct RelationWriter {
    element: ElementType,
    state: WriterState<HashSet<Value>>,
}

impl RelationWriter {
    pub fn new() -> Self {
        Self {
            element: ElementType::inferred(),
            state: WriterState::default(),
        }
    }

    /// Writer for tuples that are subtypes of `tuple_type`.
    pub fn with_tuple_type(tuple_type: TupleType) -> Self {
        Self {
            element: ElementType::Declared(Type::Tuple(tuple_type)),
            state: WriterState::default(),
        }
    }

    pub fn element_type(&self) -> &Type {
        self.element.current()
    }
}

impl Default for RelationWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for RelationWriter {
    fn kind(&self) -> &'static str {
        "relation"
    }

    fn insert(&mut self, value: Value) -> FactResult<()> {
        let elements = self.state.open_mut("relation")?;
        let tuple = value
            .as_tuple()
            .ok_or_else(|| FactError::type_mismatch("a tuple", value.get_type()))?;
        // A declared type reports a wrong arity as a type mismatch in `admit`.
        if let ElementType::Inferred(Type::Tuple(expected)) = &self.element {
            if expected.arity() != tuple.arity() {
                return Err(FactError::shape_mismatch(
                    "relation insert",
                    format!("arity {}", expected.arity()),
                    format!("arity {}", tuple.arity()),
                ));
            }
        }
        self.element.admit("relation", &tuple.get_type())?;
        elements.insert(value);
        Ok(())
    }

    fn delete(&mut self, value: &Value) -> FactResult<()> {
        self.state.open_mut("relation")?.remove(value);
        Ok(())
    }

    /// An inferred writer that saw no tuples produces an empty nullary
    /// relation.
    fn done(&mut self) -> FactResult<Value> {
        let tuple_type = match self.element.current() {
            Type::Tuple(t) => t.clone(),
            _ => TupleType::new(Vec::new()),
        };
        Ok(self
            .state
            .close_with(|elements| Value::Relation(RelationValue::new(tuple_type, elements))))
    }

    fn size(&self) -> usize {
        self.state.size(HashSet::len)
    }

    fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}
