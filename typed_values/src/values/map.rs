//! Persistent maps.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Type;

use super::{unordered_hash, Value};

#[derive(Debug, Clone)]
pub struct MapValue {
    key_type: Type,
    value_type: Type,
    entries: Arc<HashMap<Value, Value>>,
}

impl MapValue {
    pub fn new(key_type: Type, value_type: Type, entries: HashMap<Value, Value>) -> Self {
        Self {
            key_type,
            value_type,
            entries: Arc::new(entries),
        }
    }

    pub fn empty(key_type: Type, value_type: Type) -> Self {
        Self::new(key_type, value_type, HashMap::new())
    }

    /// Map typed by the lub of its keys and the lub of its values. Later
    /// entries replace earlier ones with an equal key.
    pub fn from_entries(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut key_type = Type::Void;
        let mut value_type = Type::Void;
        let mut table = HashMap::new();
        for (key, value) in entries {
            key_type = key_type.lub(&key.get_type());
            value_type = value_type.lub(&value.get_type());
            table.insert(key, value);
        }
        Self::new(key_type, value_type, table)
    }

    pub fn key_type(&self) -> &Type {
        &self.key_type
    }

    pub fn value_type(&self) -> &Type {
        &self.value_type
    }

    pub fn get_type(&self) -> Type {
        Type::map(self.key_type.clone(), self.value_type.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, Value, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// New map with `key` bound to `value`.
    pub fn put(&self, key: Value, value: Value) -> MapValue {
        let key_type = self.key_type.lub(&key.get_type());
        let value_type = self.value_type.lub(&value.get_type());
        let mut entries = (*self.entries).clone();
        entries.insert(key, value);
        Self::new(key_type, value_type, entries)
    }

    /// New map without `key`. Key and value types are kept.
    pub fn remove(&self, key: &Value) -> MapValue {
        if !self.contains_key(key) {
            return self.clone();
        }
        let mut entries = (*self.entries).clone();
        entries.remove(key);
        Self::new(self.key_type.clone(), self.value_type.clone(), entries)
    }

    /// Union of both maps; on a shared key `other` wins.
    pub fn join(&self, other: &MapValue) -> MapValue {
        let mut entries = (*self.entries).clone();
        entries.extend(other.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self::new(
            self.key_type.lub(&other.key_type),
            self.value_type.lub(&other.value_type),
            entries,
        )
    }

    /// Entries present with equal values in both maps.
    pub fn common(&self, other: &MapValue) -> MapValue {
        let entries = self
            .iter()
            .filter(|(k, v)| other.get(*k) == Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self::new(
            self.key_type.lub(&other.key_type),
            self.value_type.lub(&other.value_type),
            entries,
        )
    }

    /// Whether every entry of this map is an entry of `other`.
    pub fn is_submap_of(&self, other: &MapValue) -> bool {
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.key_type.comparable(&other.key_type)
            && self.value_type.comparable(&other.value_type)
            && self.entries == other.entries
    }
}

impl Eq for MapValue {}

impl std::hash::Hash for MapValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(unordered_hash(self.entries.iter()));
    }
}
