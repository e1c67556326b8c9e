use std::collections::HashMap;

use crate::error::{FactError, FactResult};
use crate::types::Type;
use crate::values::{MapValue, Value};

use super::{ElementType, Writer, WriterState};

/// Builds a map. `insert` takes `<key, value>` tuples; `delete` takes a key.
#[derive(Debug)]
pub struct MapWriter {
    key: ElementType,
    value: ElementType,
    state: WriterState<HashMap<Value, Value>>,
}

impl MapWriter {
    pub fn new() -> Self {
        Self {
            key: ElementType::inferred(),
            value: ElementType::inferred(),
            state: WriterState::default(),
        }
    }

    pub fn with_types(key_type: Type, value_type: Type) -> Self {
        Self {
            key: ElementType::Declared(key_type),
            value: ElementType::Declared(value_type),
            state: WriterState::default(),
        }
    }

    pub fn key_type(&self) -> &Type {
        self.key.current()
    }

    pub fn value_type(&self) -> &Type {
        self.value.current()
    }

    /// Bind `key` to `value`, replacing an earlier binding.
    pub fn put(&mut self, key: Value, value: Value) -> FactResult<()> {
        let entries = self.state.open_mut("map")?;
        let (key_type, value_type) = (key.get_type(), value.get_type());
        // Both checks run before either type widens.
        self.key.check(&key_type)?;
        self.value.check(&value_type)?;
        self.key.admit("map", &key_type)?;
        self.value.admit("map", &value_type)?;
        entries.insert(key, value);
        Ok(())
    }
}

impl Default for MapWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for MapWriter {
    fn kind(&self) -> &'static str {
        "map"
    }

    fn insert(&mut self, entry: Value) -> FactResult<()> {
        if self.is_closed() {
            return Err(FactError::FinalizedMutation { writer: "map" });
        }
        match entry.as_tuple().map(|t| t.elements()) {
            Some([key, value]) => self.put(key.clone(), value.clone()),
            _ => Err(FactError::type_mismatch("a <key, value> tuple", entry.get_type())),
        }
    }

    fn delete(&mut self, key: &Value) -> FactResult<()> {
        self.state.open_mut("map")?.remove(key);
        Ok(())
    }

    fn done(&mut self) -> FactResult<Value> {
        let (key_type, value_type) = (self.key.current().clone(), self.value.current().clone());
        Ok(self
            .state
            .close_with(|entries| Value::Map(MapValue::new(key_type, value_type, entries))))
    }

    fn size(&self) -> usize {
        self.state.size(HashMap::len)
    }

    fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}
