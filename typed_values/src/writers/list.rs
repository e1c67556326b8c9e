use crate::error::{FactError, FactResult};
use crate::types::Type;
use crate::values::{ListValue, Value};

use super::{ElementType, Writer, WriterState};

/// Builds a list. `insert` appends.
#[derive(Debug)]
pub struct ListWriter {
    element: ElementType,
    state: WriterState<Vec<Value>>,
}

impl ListWriter {
    pub fn new() -> Self {
        Self {
            element: ElementType::inferred(),
            state: WriterState::default(),
        }
    }

    pub fn with_element_type(element_type: Type) -> Self {
        Self {
            element: ElementType::Declared(element_type),
            state: WriterState::default(),
        }
    }

    pub fn element_type(&self) -> &Type {
        self.element.current()
    }

    pub fn append(&mut self, value: Value) -> FactResult<()> {
        self.insert(value)
    }

    /// Insert `value` before position `index`; `index == size()` appends.
    pub fn insert_at(&mut self, index: usize, value: Value) -> FactResult<()> {
        let elements = self.state.open_mut("list")?;
        if index > elements.len() {
            return Err(FactError::index_out_of_bounds(index, elements.len()));
        }
        self.element.admit("list", &value.get_type())?;
        elements.insert(index, value);
        Ok(())
    }

    /// Overwrite the element at `index`.
    pub fn replace_at(&mut self, index: usize, value: Value) -> FactResult<()> {
        let elements = self.state.open_mut("list")?;
        if index >= elements.len() {
            return Err(FactError::index_out_of_bounds(index, elements.len()));
        }
        self.element.admit("list", &value.get_type())?;
        elements[index] = value;
        Ok(())
    }
}

impl Default for ListWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for ListWriter {
    fn kind(&self) -> &'static str {
        "list"
    }

    fn insert(&mut self, value: Value) -> FactResult<()> {
        let elements = self.state.open_mut("list")?;
        self.element.admit("list", &value.get_type())?;
        elements.push(value);
        Ok(())
    }

    /// Removes the first equal element.
    fn delete(&mut self, value: &Value) -> FactResult<()> {
        let elements = self.state.open_mut("list")?;
        if let Some(position) = elements.iter().position(|v| v == value) {
            elements.remove(position);
        }
        Ok(())
    }

    fn done(&mut self) -> FactResult<Value> {
        let element_type = self.element.current().clone();
        Ok(self
            .state
            .close_with(|elements| Value::List(ListValue::new(element_type, elements))))
    }

    fn size(&self) -> usize {
        self.state.size(Vec::len)
    }

    fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}
