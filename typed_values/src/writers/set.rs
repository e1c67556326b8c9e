use std::collections::HashSet;

use crate::diagnostics;
use crate::error::FactResult;
use crate::types::Type;
use crate::values::{collection_value, Value};

use super::{ElementType, Writer, WriterState};

/// Builds a set, or a relation when the element type is a tuple type.
///
/// With a declared element type the result is a relation exactly when the
/// declared type is a tuple type. In inferred mode it is a relation when the
/// lub of all inserted elements is a tuple type.
#[derive(Debug)]
pub struct SetWriter {
    element: ElementType,
    state: WriterState<HashSet<Value>>,
}

impl SetWriter {
    /// Writer that infers its element type.
    pub fn new() -> Self {
        Self {
            element: ElementType::inferred(),
            state: WriterState::default(),
        }
    }

    /// Writer whose elements must be subtypes of `element_type`.
    pub fn with_element_type(element_type: Type) -> Self {
        Self {
            element: ElementType::Declared(element_type),
            state: WriterState::default(),
        }
    }

    /// The declared type, or the lub of everything inserted so far.
    pub fn element_type(&self) -> &Type {
        self.element.current()
    }
}

impl Default for SetWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for SetWriter {
    fn kind(&self) -> &'static str {
        "set"
    }

    fn insert(&mut self, value: Value) -> FactResult<()> {
        let elements = self.state.open_mut("set")?;
        self.element.admit("set", &value.get_type())?;
        elements.insert(value);
        Ok(())
    }

    fn delete(&mut self, value: &Value) -> FactResult<()> {
        self.state.open_mut("set")?.remove(value);
        Ok(())
    }

    fn done(&mut self) -> FactResult<Value> {
        let element = &self.element;
        Ok(self.state.close_with(|elements| {
            let element_type = element.current().clone();
            if element.is_inferred() && element_type.is_tuple() {
                diagnostics::emit_inferred_relation(&element_type);
            }
            collection_value(element_type, elements)
        }))
    }

    fn size(&self) -> usize {
        self.state.size(HashSet::len)
    }

    fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FactError;
    use crate::values::TupleValue;

    fn pair(a: i64, b: &str) -> Value {
        Value::Tuple(TupleValue::new(vec![Value::from(a), Value::from(b)]))
    }

    #[test]
    fn test_inferred_tuples_become_relation() {
        let mut w = SetWriter::new();
        w.insert(pair(1, "x")).unwrap();
        w.insert(pair(2, "y")).unwrap();
        let v = w.done().unwrap();
        let r = v.as_relation().expect("relation");
        assert_eq!(r.len(), 2);
        assert_eq!(v.get_type(), Type::relation(vec![Type::Integer, Type::String]));
    }

    #[test]
    fn test_inferred_mixed_elements_stay_a_set() {
        let mut w = SetWriter::new();
        w.insert_all([pair(1, "x"), Value::from(3)]).unwrap();
        let v = w.done().unwrap();
        assert_eq!(v.get_type(), Type::set(Type::Value));
    }

    #[test]
    fn test_declared_non_tuple_rejects_tuples() {
        let mut w = SetWriter::with_element_type(Type::Integer);
        w.insert(Value::from(1)).unwrap();
        let err = w.insert(pair(1, "x")).unwrap_err();
        assert!(matches!(err, FactError::TypeMismatch { .. }), "got {:?}", err);
        assert_eq!(w.size(), 1);
        assert!(w.done().unwrap().as_set().is_some());
    }

    #[test]
    fn test_declared_value_never_becomes_relation() {
        let mut w = SetWriter::with_element_type(Type::Value);
        w.insert(pair(1, "x")).unwrap();
        assert_eq!(w.done().unwrap().get_type(), Type::set(Type::Value));
    }

    #[test]
    fn test_empty_inferred_set_is_void() {
        let v = SetWriter::new().finish().unwrap();
        assert_eq!(v.get_type(), Type::set(Type::Void));
    }

    #[test]
    fn test_finalized_writer_rejects_mutation() {
        let mut w = SetWriter::new();
        w.insert(Value::from(1)).unwrap();
        let first = w.done().unwrap();
        assert_eq!(w.done().unwrap(), first);
        assert_eq!(
            w.insert(Value::from(2)),
            Err(FactError::FinalizedMutation { writer: "set" })
        );
        assert!(w.delete(&Value::from(1)).is_err());
        assert!(w.insert_all([Value::from(3)]).is_err());
        assert_eq!(w.size(), 1);
    }
}
