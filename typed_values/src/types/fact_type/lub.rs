//! Least upper bound (⊔) over the structural type lattice.

use super::{AdtType, ConstructorType, TupleType, Type};
use crate::diagnostics::emit_lub_fell_to_top;

impl Type {
    /// Compute the least upper bound of two types.
    ///
    /// # Examples
    /// ```text
    /// lub(Void, T)                    = T
    /// lub(int, int)                   = int
    /// lub(int, str)                   = value
    /// lub(list[int], list[str])       = list[value]
    /// lub(rel[int], set[tuple[str]])  = set[tuple[value]]
    /// lub(Pair.pair(int), Pair)       = Pair
    /// lub(Pair, Tree)                 = node
    /// ```
    pub fn lub(&self, other: &Type) -> Type {
        if self == other {
            return self.clone();
        }
        match (self.is_subtype_of(other), other.is_subtype_of(self)) {
            (true, false) => other.clone(),
            (false, true) => self.clone(),
            // Either unrelated, or equivalent without being equal (aliases,
            // differing field names): rebuild from the structure.
            _ => self.structural_lub(other),
        }
    }

    fn structural_lub(&self, other: &Type) -> Type {
        let (a, b) = (self.strip_aliases(), other.strip_aliases());
        if a == b {
            return a.clone();
        }
        match (a, b) {
            (Type::List(x), Type::List(y)) => Type::list(x.lub(y)),
            (Type::Set(x), Type::Set(y)) => Type::set(x.lub(y)),
            (Type::Relation(x), Type::Relation(y)) => match x.lub(y) {
                Some(fields) => Type::Relation(fields),
                None => Type::set(Type::Tuple(x.clone()).lub(&Type::Tuple(y.clone()))),
            },
            (Type::Relation(x), Type::Set(elem)) | (Type::Set(elem), Type::Relation(x)) => {
                Type::set(Type::Tuple(x.clone()).lub(elem))
            }
            (Type::Map(k1, v1), Type::Map(k2, v2)) => Type::map(k1.lub(k2), v1.lub(v2)),
            (Type::Tuple(x), Type::Tuple(y)) => match x.lub(y) {
                Some(fields) => Type::Tuple(fields),
                None => a.top_fallback(b),
            },

            (Type::AbstractData(x), Type::AbstractData(y)) => match x.lub(y) {
                Some(adt) => Type::AbstractData(adt),
                None => Type::Node,
            },
            (Type::Constructor(x), Type::Constructor(y)) => match x.lub(y) {
                Some(ctor) => Type::Constructor(ctor),
                None => Type::AbstractData(x.adt.clone()).lub(&Type::AbstractData(y.adt.clone())),
            },
            (Type::Constructor(c), adt @ Type::AbstractData(_))
            | (adt @ Type::AbstractData(_), Type::Constructor(c)) => {
                Type::AbstractData(c.adt.clone()).lub(adt)
            }

            _ => a.top_fallback(b),
        }
    }

    fn top_fallback(&self, other: &Type) -> Type {
        emit_lub_fell_to_top(self, other);
        Type::Value
    }
}

impl TupleType {
    /// Field-wise lub of equal-arity tuples.
    ///
    /// Field names survive only when both sides carry identical names.
    pub fn lub(&self, other: &TupleType) -> Option<TupleType> {
        if self.arity() != other.arity() {
            return None;
        }
        let fields = self
            .fields()
            .iter()
            .zip(other.fields())
            .map(|(a, b)| a.lub(b))
            .collect();
        let names = match (self.names(), other.names()) {
            (Some(x), Some(y)) if x == y => Some(x.to_vec()),
            _ => None,
        };
        Some(TupleType::from_parts(fields, names))
    }
}

impl AdtType {
    /// Parameter-wise lub of two instances of the same ADT.
    pub fn lub(&self, other: &AdtType) -> Option<AdtType> {
        if self.name != other.name || self.parameters.len() != other.parameters.len() {
            return None;
        }
        let parameters = self
            .parameters
            .iter()
            .zip(&other.parameters)
            .map(|(a, b)| a.lub(b))
            .collect();
        Some(AdtType::new(self.name.clone(), parameters))
    }
}

impl ConstructorType {
    /// Lub of two instances of the same constructor.
    pub fn lub(&self, other: &ConstructorType) -> Option<ConstructorType> {
        if self.name != other.name {
            return None;
        }
        let adt = self.adt.lub(&other.adt)?;
        let fields = self.fields.lub(&other.fields)?;
        Some(ConstructorType {
            name: self.name.clone(),
            adt,
            fields,
        })
    }
}
