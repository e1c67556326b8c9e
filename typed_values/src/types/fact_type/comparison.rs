//! Subtype checking and comparability for Type.

use super::{AdtType, ConstructorType, TupleType, Type};

impl Type {
    /// Check if `self` is a subtype of `other` (`self <: other`).
    ///
    /// # Examples
    /// ```
    /// use typed_values::types::Type;
    ///
    /// assert!(Type::Integer.is_subtype_of(&Type::Value));
    /// assert!(Type::Void.is_subtype_of(&Type::Integer));
    /// assert!(Type::list(Type::Integer).is_subtype_of(&Type::list(Type::Value)));
    /// assert!(!Type::Integer.is_subtype_of(&Type::Double));
    /// ```
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (Type::Void, _) | (_, Type::Value) => true,
            (Type::Named { aliased, .. }, _) => aliased.is_subtype_of(other),
            (_, Type::Named { aliased, .. }) => self.is_subtype_of(aliased),

            (Type::List(a), Type::List(b)) | (Type::Set(a), Type::Set(b)) => a.is_subtype_of(b),
            (Type::Relation(a), Type::Relation(b)) => a.is_subtype_of(b),
            // Every relation is a set of its tuples
            (Type::Relation(a), Type::Set(elem)) => {
                Type::Tuple(a.clone()).is_subtype_of(elem)
            }
            (Type::Map(k1, v1), Type::Map(k2, v2)) => k1.is_subtype_of(k2) && v1.is_subtype_of(v2),
            (Type::Tuple(a), Type::Tuple(b)) => a.is_subtype_of(b),

            (Type::AbstractData(_) | Type::Constructor(_), Type::Node) => true,
            (Type::AbstractData(a), Type::AbstractData(b)) => a.is_subtype_of(b),
            (Type::Constructor(c), Type::AbstractData(adt)) => c.adt.is_subtype_of(adt),
            (Type::Constructor(a), Type::Constructor(b)) => a.is_subtype_of(b),

            _ => false,
        }
    }

    /// Two types are comparable when one is a subtype of the other.
    pub fn comparable(&self, other: &Type) -> bool {
        self.is_subtype_of(other) || other.is_subtype_of(self)
    }

    /// Check mutual subtyping (`self <: other` and `other <: self`).
    pub fn is_equivalent(&self, other: &Type) -> bool {
        self.is_subtype_of(other) && other.is_subtype_of(self)
    }
}

impl TupleType {
    /// Covariant, equal arity. Field names do not take part in subtyping.
    pub fn is_subtype_of(&self, other: &TupleType) -> bool {
        self.arity() == other.arity()
            && self
                .fields()
                .iter()
                .zip(other.fields())
                .all(|(a, b)| a.is_subtype_of(b))
    }
}

impl AdtType {
    /// Same name, parameters covariant.
    pub fn is_subtype_of(&self, other: &AdtType) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.is_subtype_of(b))
    }
}

impl ConstructorType {
    /// Same constructor of a covariant ADT with covariant fields.
    ///
    /// Constructors with different names are never subtypes of each other,
    /// even within one ADT; their common supertype is the ADT.
    pub fn is_subtype_of(&self, other: &ConstructorType) -> bool {
        self.name == other.name
            && self.adt.is_subtype_of(&other.adt)
            && self.fields.is_subtype_of(&other.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_ctor(field: Type) -> Type {
        Type::constructor(
            AdtType::new("Pair", vec![]),
            "pair",
            TupleType::new(vec![field.clone(), field]),
        )
    }

    #[test]
    fn test_primitive_leaves_only_related_to_themselves() {
        let leaves = [
            Type::Bool,
            Type::Integer,
            Type::Double,
            Type::String,
            Type::SourceLocation,
            Type::SourceRange,
        ];
        for a in &leaves {
            assert!(Type::Void.is_subtype_of(a));
            assert!(a.is_subtype_of(&Type::Value));
            for b in &leaves {
                assert_eq!(a.is_subtype_of(b), a == b, "{} <: {}", a, b);
            }
        }
    }

    #[test]
    fn test_relation_is_subtype_of_set_of_its_tuples() {
        let rel = Type::relation(vec![Type::Integer, Type::String]);
        let set = Type::set(Type::tuple(vec![Type::Integer, Type::String]));
        assert!(rel.is_subtype_of(&set));
        assert!(!set.is_subtype_of(&rel));
        assert!(rel.is_subtype_of(&Type::set(Type::Value)));
    }

    #[test]
    fn test_tuple_arity_must_match() {
        let short = Type::tuple(vec![Type::Integer]);
        let long = Type::tuple(vec![Type::Integer, Type::Integer]);
        assert!(!short.is_subtype_of(&long));
        assert!(!long.is_subtype_of(&short));
    }

    #[test]
    fn test_field_names_ignored_for_subtyping() {
        let named = Type::labeled_tuple(vec![Type::Integer], vec!["x".into()]).unwrap();
        let plain = Type::tuple(vec![Type::Value]);
        assert!(named.is_subtype_of(&plain));
    }

    #[test]
    fn test_constructor_below_adt_and_node() {
        let ctor = pair_ctor(Type::Integer);
        assert!(ctor.is_subtype_of(&Type::adt("Pair", vec![])));
        assert!(ctor.is_subtype_of(&Type::Node));
        assert!(!ctor.is_subtype_of(&Type::adt("Other", vec![])));
        assert!(ctor.is_subtype_of(&pair_ctor(Type::Value)));
        assert!(!pair_ctor(Type::Value).is_subtype_of(&ctor));
    }

    #[test]
    fn test_sibling_constructors_are_unrelated() {
        let pair = pair_ctor(Type::Integer);
        let swap = Type::constructor(
            AdtType::new("Pair", vec![]),
            "swap",
            TupleType::new(vec![Type::Integer, Type::Integer]),
        );
        assert!(!pair.is_subtype_of(&swap));
        assert!(!swap.is_subtype_of(&pair));
        assert_eq!(pair.lub(&swap), Type::adt("Pair", vec![]));
    }

    #[test]
    fn test_named_is_transparent() {
        let age = Type::named("Age", Type::Integer);
        assert!(age.is_subtype_of(&Type::Integer));
        assert!(Type::Integer.is_subtype_of(&age));
        assert!(age.comparable(&Type::Integer));
        assert!(!age.is_subtype_of(&Type::String));
    }
}
