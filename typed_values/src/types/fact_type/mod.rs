//! The structural type hierarchy.
//!
//! ```text
//! Value
//!  ├── Bool, Integer, Double, String, SourceLocation, SourceRange
//!  ├── List[T], Set[T] ── Relation[T1, ..., Tn]
//!  ├── Map[K, V]
//!  ├── Tuple[T1, ..., Tn]
//!  ├── Node
//!  │    └── AbstractDataType
//!  │         └── Constructor
//!  └── Parameter
//! Void (below everything)
//! ```
//!
//! `Named` aliases are transparent: they stand wherever their aliased type does.
//!
//! # Sub-modules
//!
//! - `comparison`: Subtype checking and comparability
//! - `lub`: Least upper bound
//! - `display`: fmt::Display implementation

mod comparison;
mod display;
mod lub;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{FactError, FactResult};

/// Field types of a tuple, with optional unique field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTupleType")]
pub struct TupleType {
    fields: Vec<Type>,
    names: Option<Vec<String>>,
}

/// Unchecked serialized form of a `TupleType`.
#[derive(Deserialize)]
struct RawTupleType {
    fields: Vec<Type>,
    names: Option<Vec<String>>,
}

impl TryFrom<RawTupleType> for TupleType {
    type Error = FactError;

    fn try_from(raw: RawTupleType) -> FactResult<Self> {
        match raw.names {
            Some(names) => TupleType::with_names(raw.fields, names),
            None => Ok(TupleType::new(raw.fields)),
        }
    }
}

impl TupleType {
    /// Create an unlabeled tuple type.
    pub fn new(fields: Vec<Type>) -> Self {
        Self {
            fields,
            names: None,
        }
    }

    /// Create a labeled tuple type.
    ///
    /// The number of names must match the number of field types and names
    /// must be unique.
    pub fn with_names(fields: Vec<Type>, names: Vec<String>) -> FactResult<Self> {
        if fields.len() != names.len() {
            return Err(FactError::shape_mismatch(
                "tuple field names",
                format!("{} names", fields.len()),
                format!("{} names", names.len()),
            ));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(FactError::DuplicateFieldName(name.clone()));
            }
        }
        Ok(Self {
            fields,
            names: Some(names),
        })
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[Type] {
        &self.fields
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    pub fn has_field_names(&self) -> bool {
        self.names.is_some()
    }

    pub fn field_type(&self, index: usize) -> FactResult<&Type> {
        self.fields
            .get(index)
            .ok_or_else(|| FactError::index_out_of_bounds(index, self.fields.len()))
    }

    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(String::as_str)
    }

    /// Position of the field with the given label.
    pub fn field_index(&self, label: &str) -> Option<usize> {
        self.names
            .as_ref()
            .and_then(|names| names.iter().position(|n| n == label))
    }

    /// Rebuild with new field types, keeping the names.
    pub(crate) fn map_fields<E>(
        &self,
        mut f: impl FnMut(&Type) -> Result<Type, E>,
    ) -> Result<TupleType, E> {
        let fields = self.fields.iter().map(&mut f).collect::<Result<Vec<_>, E>>()?;
        Ok(TupleType {
            fields,
            names: self.names.clone(),
        })
    }

    pub(crate) fn from_parts(fields: Vec<Type>, names: Option<Vec<String>>) -> Self {
        Self { fields, names }
    }

    /// Field types at `indices`, in that order.
    ///
    /// Labels carry over unless a position is selected twice.
    pub fn select(&self, indices: &[usize]) -> FactResult<TupleType> {
        let fields = indices
            .iter()
            .map(|&i| self.field_type(i).cloned())
            .collect::<FactResult<Vec<_>>>()?;
        let names = self.names.as_ref().and_then(|names| {
            let selected = indices
                .iter()
                .map(|&i| names.get(i).cloned())
                .collect::<Option<Vec<String>>>()?;
            let unique: HashSet<&String> = selected.iter().collect();
            (unique.len() == selected.len()).then_some(selected)
        });
        Ok(TupleType { fields, names })
    }
}

/// A named abstract data type with its type parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdtType {
    pub name: String,
    pub parameters: Vec<Type>,
}

impl AdtType {
    pub fn new(name: impl Into<String>, parameters: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// A node shape bound to an abstract data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructorType {
    pub name: String,
    pub adt: AdtType,
    pub fields: TupleType,
}

/// Structural type of a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// Bottom: subtype of every type, no values.
    Void,
    /// Top: supertype of every type.
    Value,
    Bool,
    Integer,
    Double,
    String,
    SourceLocation,
    SourceRange,
    /// Supertype of all untyped nodes, ADTs and constructors.
    Node,
    List(Box<Type>),
    Set(Box<Type>),
    /// A set specialized to tuple elements.
    Relation(TupleType),
    Map(Box<Type>, Box<Type>),
    Tuple(TupleType),
    /// Transparent alias for another type.
    Named { alias: String, aliased: Box<Type> },
    AbstractData(AdtType),
    Constructor(ConstructorType),
    /// Type variable, bound only during instantiation.
    Parameter(String),
}

impl Type {
    pub fn list(element: Type) -> Type {
        Type::List(Box::new(element))
    }

    pub fn set(element: Type) -> Type {
        Type::Set(Box::new(element))
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn tuple(fields: Vec<Type>) -> Type {
        Type::Tuple(TupleType::new(fields))
    }

    pub fn labeled_tuple(fields: Vec<Type>, names: Vec<String>) -> FactResult<Type> {
        Ok(Type::Tuple(TupleType::with_names(fields, names)?))
    }

    pub fn relation(fields: Vec<Type>) -> Type {
        Type::Relation(TupleType::new(fields))
    }

    /// Relation over the fields of `tuple`; fails unless `tuple` is a tuple type.
    pub fn relation_of(tuple: &Type) -> FactResult<Type> {
        match tuple.strip_aliases() {
            Type::Tuple(t) => Ok(Type::Relation(t.clone())),
            other => Err(FactError::type_mismatch("tuple[...]", other)),
        }
    }

    pub fn named(alias: impl Into<String>, aliased: Type) -> Type {
        Type::Named {
            alias: alias.into(),
            aliased: Box::new(aliased),
        }
    }

    pub fn parameter(name: impl Into<String>) -> Type {
        Type::Parameter(name.into())
    }

    pub fn adt(name: impl Into<String>, parameters: Vec<Type>) -> Type {
        Type::AbstractData(AdtType::new(name, parameters))
    }

    pub fn constructor(adt: AdtType, name: impl Into<String>, fields: TupleType) -> Type {
        Type::Constructor(ConstructorType {
            name: name.into(),
            adt,
            fields,
        })
    }

    /// Follow `Named` aliases down to the first non-alias type.
    pub fn strip_aliases(&self) -> &Type {
        let mut ty = self;
        while let Type::Named { aliased, .. } = ty {
            ty = aliased;
        }
        ty
    }

    pub fn is_void(&self) -> bool {
        matches!(self.strip_aliases(), Type::Void)
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self.strip_aliases(), Type::Tuple(_))
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.strip_aliases(), Type::Relation(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self.strip_aliases(), Type::Set(_))
    }

    pub fn is_node_like(&self) -> bool {
        matches!(
            self.strip_aliases(),
            Type::Node | Type::AbstractData(_) | Type::Constructor(_)
        )
    }

    /// Tuple structure of a tuple, relation or constructor type.
    pub fn tuple_type(&self) -> Option<&TupleType> {
        match self.strip_aliases() {
            Type::Tuple(t) | Type::Relation(t) => Some(t),
            Type::Constructor(c) => Some(&c.fields),
            _ => None,
        }
    }

    /// Element type of a list, set or relation.
    pub fn element_type(&self) -> Option<Type> {
        match self.strip_aliases() {
            Type::List(e) | Type::Set(e) => Some((**e).clone()),
            Type::Relation(t) => Some(Type::Tuple(t.clone())),
            _ => None,
        }
    }

    pub fn arity(&self) -> usize {
        self.tuple_type().map_or(0, TupleType::arity)
    }

    /// Declared type of the child at `index`.
    ///
    /// Plain nodes accept any value at any position.
    pub fn field_type(&self, index: usize) -> FactResult<Type> {
        match self.strip_aliases() {
            Type::Node => Ok(Type::Value),
            other => match other.tuple_type() {
                Some(t) => t.field_type(index).cloned(),
                None => Err(FactError::index_out_of_bounds(index, 0)),
            },
        }
    }

    pub fn field_index(&self, label: &str) -> FactResult<usize> {
        self.tuple_type()
            .and_then(|t| t.field_index(label))
            .ok_or_else(|| FactError::unknown_field(label, self))
    }

    /// Whether any `Parameter` occurs inside this type.
    pub fn is_open(&self) -> bool {
        match self {
            Type::Parameter(_) => true,
            Type::List(e) | Type::Set(e) => e.is_open(),
            Type::Map(k, v) => k.is_open() || v.is_open(),
            Type::Tuple(t) | Type::Relation(t) => t.fields().iter().any(Type::is_open),
            Type::Named { aliased, .. } => aliased.is_open(),
            Type::AbstractData(adt) => adt.parameters.iter().any(Type::is_open),
            Type::Constructor(c) => {
                c.adt.parameters.iter().any(Type::is_open)
                    || c.fields.fields().iter().any(Type::is_open)
            }
            Type::Void
            | Type::Value
            | Type::Bool
            | Type::Integer
            | Type::Double
            | Type::String
            | Type::SourceLocation
            | Type::SourceRange
            | Type::Node => false,
        }
    }
}
