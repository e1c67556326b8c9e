use crate::error::{FactError, FactResult};
use crate::types::{TupleType, Type};
use crate::values::{TupleValue, Value};

use super::{Writer, WriterState};

/// Builds a tuple field by field.
///
/// With a declared tuple type each field is checked against its position
/// as it is inserted, and `done` fails with a shape mismatch until every
/// field is present. A failed `done` leaves the writer open.
#[derive(Debug)]
pub struct TupleWriter {
    declared: Option<TupleType>,
    state: WriterState<Vec<Value>>,
}

impl TupleWriter {
    pub fn new() -> Self {
        Self {
            declared: None,
            state: WriterState::default(),
        }
    }

    /// Writer for a tuple of type `tuple_type`, which must be a tuple type.
    pub fn with_type(tuple_type: Type) -> FactResult<Self> {
        let declared = match tuple_type.strip_aliases() {
            Type::Tuple(t) => t.clone(),
            other => return Err(FactError::type_mismatch("a tuple type", other)),
        };
        Ok(Self {
            declared: Some(declared),
            state: WriterState::default(),
        })
    }
}

impl Default for TupleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for TupleWriter {
    fn kind(&self) -> &'static str {
        "tuple"
    }

    fn insert(&mut self, value: Value) -> FactResult<()> {
        let fields = self.state.open_mut("tuple")?;
        if let Some(declared) = &self.declared {
            let position = fields.len();
            if position >= declared.arity() {
                return Err(FactError::shape_mismatch(
                    "tuple writer",
                    format!("{} fields", declared.arity()),
                    format!("{} fields", position + 1),
                ));
            }
            let field = declared.field_type(position)?;
            let actual = value.get_type();
            if !actual.is_subtype_of(field) {
                return Err(FactError::type_mismatch(field, actual));
            }
        }
        fields.push(value);
        Ok(())
    }

    /// Removes the last equal field.
    fn delete(&mut self, value: &Value) -> FactResult<()> {
        let fields = self.state.open_mut("tuple")?;
        if let Some(position) = fields.iter().rposition(|v| v == value) {
            fields.remove(position);
        }
        Ok(())
    }

    fn done(&mut self) -> FactResult<Value> {
        if let (WriterState::Open(fields), Some(declared)) = (&self.state, &self.declared) {
            if fields.len() != declared.arity() {
                return Err(FactError::shape_mismatch(
                    "tuple writer",
                    format!("{} fields", declared.arity()),
                    format!("{} fields", fields.len()),
                ));
            }
        }
        let declared = &self.declared;
        Ok(self.state.close_with(|fields| {
            let tuple = match declared {
                Some(ty) => TupleValue::from_checked(ty.clone(), fields),
                None => TupleValue::new(fields),
            };
            Value::Tuple(tuple)
        }))
    }

    fn size(&self) -> usize {
        self.state.size(Vec::len)
    }

    fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FactErrorKind;

    fn point_type() -> Type {
        Type::labeled_tuple(vec![Type::Integer, Type::Integer], vec!["x".into(), "y".into()])
            .unwrap()
    }

    #[test]
    fn test_declared_tuple_keeps_labels() {
        let mut w = TupleWriter::with_type(point_type()).unwrap();
        w.insert_all([Value::from(1), Value::from(2)]).unwrap();
        let v = w.done().unwrap();
        let t = v.as_tuple().unwrap();
        assert_eq!(t.get_by_label("y"), Ok(&Value::from(2)));
        assert_eq!(v.get_type(), point_type());
    }

    #[test]
    fn test_short_tuple_fails_and_stays_open() {
        let mut w = TupleWriter::with_type(point_type()).unwrap();
        w.insert(Value::from(1)).unwrap();
        let err = w.done().unwrap_err();
        assert_eq!(err.kind(), FactErrorKind::ShapeMismatch);
        assert!(!w.is_closed());

        w.insert(Value::from(2)).unwrap();
        assert!(w.done().is_ok());
    }

    #[test]
    fn test_field_types_and_arity_checked_on_insert() {
        let mut w = TupleWriter::with_type(point_type()).unwrap();
        assert_eq!(
            w.insert(Value::from("a")).unwrap_err().kind(),
            FactErrorKind::TypeMismatch
        );
        w.insert_all([Value::from(1), Value::from(2)]).unwrap();
        assert_eq!(
            w.insert(Value::from(3)).unwrap_err().kind(),
            FactErrorKind::ShapeMismatch
        );
    }

    #[test]
    fn test_untyped_tuple_writer() {
        let mut w = TupleWriter::new();
        w.insert_all([Value::from(1), Value::from("a"), Value::from(1)]).unwrap();
        w.delete(&Value::from(1)).unwrap();
        let v = w.done().unwrap();
        assert_eq!(v.get_type(), Type::tuple(vec![Type::Integer, Type::String]));
        assert!(TupleWriter::with_type(Type::Integer).is_err());
    }
}
