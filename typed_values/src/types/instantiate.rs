//! Substitution of type parameters.
//!
//! Two flavours are provided:
//!
//! - [`TypeInstantiator`] binds parameters positionally: the first time a
//!   parameter is met during the traversal it takes the next unconsumed actual,
//!   and every later occurrence of the same parameter resolves to that binding.
//! - [`Type::match_parameters`] + [`Type::instantiate_with`] bind parameters by
//!   matching the parameterized type against an actual type.

use std::collections::HashMap;

use super::{AdtType, ConstructorType, TupleType, Type};
use crate::error::{FactError, FactResult};

/// Parameter name to bound type.
pub type Bindings = HashMap<String, Type>;

/// Positional parameter instantiation, memoized by first occurrence.
#[derive(Debug)]
pub struct TypeInstantiator<'a> {
    actuals: &'a [Type],
    next_actual: usize,
    bindings: Bindings,
}

impl<'a> TypeInstantiator<'a> {
    pub fn new(actuals: &'a [Type]) -> Self {
        Self {
            actuals,
            next_actual: 0,
            bindings: HashMap::new(),
        }
    }

    /// Bindings made so far.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Rewrite every parameter reachable in `ty`.
    ///
    /// Fails with [`FactError::Instantiation`] when a new parameter is met after
    /// all actuals have been consumed.
    pub fn instantiate(&mut self, ty: &Type) -> FactResult<Type> {
        match ty {
            Type::Parameter(name) => self.bind(name),
            Type::List(e) => Ok(Type::list(self.instantiate(e)?)),
            Type::Set(e) => Ok(Type::set(self.instantiate(e)?)),
            Type::Relation(t) => Ok(Type::Relation(self.instantiate_tuple(t)?)),
            Type::Map(k, v) => {
                let key = self.instantiate(k)?;
                let value = self.instantiate(v)?;
                Ok(Type::map(key, value))
            }
            Type::Tuple(t) => Ok(Type::Tuple(self.instantiate_tuple(t)?)),
            Type::Named { alias, aliased } => Ok(Type::named(alias.clone(), self.instantiate(aliased)?)),
            Type::AbstractData(adt) => Ok(Type::AbstractData(self.instantiate_adt(adt)?)),
            Type::Constructor(c) => {
                // ADT first, so its parameters bind in declaration order
                let adt = self.instantiate_adt(&c.adt)?;
                let fields = self.instantiate_tuple(&c.fields)?;
                Ok(Type::Constructor(ConstructorType {
                    name: c.name.clone(),
                    adt,
                    fields,
                }))
            }
            Type::Void
            | Type::Value
            | Type::Bool
            | Type::Integer
            | Type::Double
            | Type::String
            | Type::SourceLocation
            | Type::SourceRange
            | Type::Node => Ok(ty.clone()),
        }
    }

    fn bind(&mut self, name: &str) -> FactResult<Type> {
        if let Some(bound) = self.bindings.get(name) {
            return Ok(bound.clone());
        }
        let actual = self
            .actuals
            .get(self.next_actual)
            .ok_or_else(|| FactError::Instantiation {
                parameter: name.to_string(),
            })?
            .clone();
        self.next_actual += 1;
        self.bindings.insert(name.to_string(), actual.clone());
        Ok(actual)
    }

    fn instantiate_tuple(&mut self, tuple: &TupleType) -> FactResult<TupleType> {
        tuple.map_fields(|field| self.instantiate(field))
    }

    fn instantiate_adt(&mut self, adt: &AdtType) -> FactResult<AdtType> {
        let parameters = adt
            .parameters
            .iter()
            .map(|p| self.instantiate(p))
            .collect::<FactResult<Vec<_>>>()?;
        Ok(AdtType::new(adt.name.clone(), parameters))
    }
}

impl Type {
    /// Instantiate parameters positionally with `actuals`.
    ///
    /// # Examples
    /// ```
    /// use typed_values::types::Type;
    ///
    /// let t = Type::map(Type::parameter("K"), Type::list(Type::parameter("K")));
    /// let concrete = t.instantiate(&[Type::String]).unwrap();
    /// assert_eq!(concrete, Type::map(Type::String, Type::list(Type::String)));
    /// ```
    pub fn instantiate(&self, actuals: &[Type]) -> FactResult<Type> {
        TypeInstantiator::new(actuals).instantiate(self)
    }

    /// Substitute parameters from a binding map; unbound parameters stay.
    pub fn instantiate_with(&self, bindings: &Bindings) -> Type {
        match self {
            Type::Parameter(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            Type::List(e) => Type::list(e.instantiate_with(bindings)),
            Type::Set(e) => Type::set(e.instantiate_with(bindings)),
            Type::Relation(t) => Type::Relation(tuple_with(t, bindings)),
            Type::Map(k, v) => Type::map(k.instantiate_with(bindings), v.instantiate_with(bindings)),
            Type::Tuple(t) => Type::Tuple(tuple_with(t, bindings)),
            Type::Named { alias, aliased } => {
                Type::named(alias.clone(), aliased.instantiate_with(bindings))
            }
            Type::AbstractData(adt) => Type::AbstractData(adt_with(adt, bindings)),
            Type::Constructor(c) => Type::Constructor(ConstructorType {
                name: c.name.clone(),
                adt: adt_with(&c.adt, bindings),
                fields: tuple_with(&c.fields, bindings),
            }),
            _ => self.clone(),
        }
    }

    /// Match this (possibly parameterized) type against `actual`, recording
    /// for each parameter the lub of every type it was matched with.
    ///
    /// Tuples of different arity fail with [`FactError::ShapeMismatch`]; any
    /// other structural disagreement fails with [`FactError::TypeMismatch`].
    pub fn match_parameters(&self, actual: &Type, bindings: &mut Bindings) -> FactResult<()> {
        if actual.is_void() {
            return Ok(());
        }
        match (self, actual.strip_aliases()) {
            (Type::Parameter(name), _) => {
                let widened = match bindings.get(name) {
                    Some(earlier) => earlier.lub(actual),
                    None => actual.clone(),
                };
                bindings.insert(name.clone(), widened);
                Ok(())
            }
            (Type::Named { aliased, .. }, _) => aliased.match_parameters(actual, bindings),
            (Type::List(e), Type::List(a)) | (Type::Set(e), Type::Set(a)) => {
                e.match_parameters(a, bindings)
            }
            (Type::Set(e), Type::Relation(t)) => {
                e.match_parameters(&Type::Tuple(t.clone()), bindings)
            }
            (Type::Map(k, v), Type::Map(ak, av)) => {
                k.match_parameters(ak, bindings)?;
                v.match_parameters(av, bindings)
            }
            (Type::Tuple(t), Type::Tuple(a)) | (Type::Relation(t), Type::Relation(a)) => {
                match_tuple(t, a, bindings)
            }
            (Type::AbstractData(adt), Type::AbstractData(a)) if adt.name == a.name => {
                match_all(&adt.parameters, &a.parameters, bindings)
            }
            (Type::AbstractData(adt), Type::Constructor(c)) if adt.name == c.adt.name => {
                match_all(&adt.parameters, &c.adt.parameters, bindings)
            }
            (Type::Constructor(c), Type::Constructor(a)) if c.name == a.name => {
                match_all(&c.adt.parameters, &a.adt.parameters, bindings)?;
                match_tuple(&c.fields, &a.fields, bindings)
            }
            (expected, _) if !expected.is_open() && actual.is_subtype_of(expected) => Ok(()),
            (expected, _) => Err(FactError::type_mismatch(expected, actual)),
        }
    }
}

fn tuple_with(tuple: &TupleType, bindings: &Bindings) -> TupleType {
    let fields = tuple
        .fields()
        .iter()
        .map(|f| f.instantiate_with(bindings))
        .collect();
    TupleType::from_parts(fields, tuple.names().map(<[String]>::to_vec))
}

fn adt_with(adt: &AdtType, bindings: &Bindings) -> AdtType {
    AdtType::new(
        adt.name.clone(),
        adt.parameters
            .iter()
            .map(|p| p.instantiate_with(bindings))
            .collect(),
    )
}

fn match_tuple(expected: &TupleType, actual: &TupleType, bindings: &mut Bindings) -> FactResult<()> {
    if expected.arity() != actual.arity() {
        return Err(FactError::shape_mismatch(
            "field types",
            format!("arity {}", expected.arity()),
            format!("arity {}", actual.arity()),
        ));
    }
    match_all(expected.fields(), actual.fields(), bindings)
}

fn match_all(expected: &[Type], actual: &[Type], bindings: &mut Bindings) -> FactResult<()> {
    if expected.len() != actual.len() {
        return Err(FactError::shape_mismatch(
            "type parameters",
            expected.len(),
            actual.len(),
        ));
    }
    for (e, a) in expected.iter().zip(actual) {
        e.match_parameters(a, bindings)?;
    }
    Ok(())
}
