//! Immutable values.
//!
//! Every value carries enough to recover its [`Type`] via `get_type()`.
//! Composite values hold their contents behind `Arc`, so cloning a value is
//! cheap and updates share whatever they leave unchanged.
//!
//! # Equality
//!
//! Two values are equal when they are the same variant, their types are
//! comparable and their contents are equal. Nodes and constructors also
//! compare names and annotation maps. Hashing looks at contents only, so
//! equal values always hash alike.
//!
//! Comparability is not transitive, so neither is this equality:
//! `set[int]{} == set[value]{}` and `set[value]{} == set[str]{}`, yet
//! `set[int]{} != set[str]{}`. A hashed container holding such values keeps
//! whichever of them was inserted first.
//!
//! # Sub-modules
//!
//! - `leaf`: source locations and ranges
//! - `tuple`, `node`, `set`, `relation`, `list`, `map`: composite values
//! - `visitor`: exhaustive dispatch over variants

mod leaf;
mod list;
mod map;
mod node;
mod relation;
mod set;
mod tuple;
mod visitor;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::Type;

pub use leaf::{SourceLocation, SourceRange};
pub use list::ListValue;
pub use map::MapValue;
pub use node::{Annotations, NodeValue};
pub use relation::RelationValue;
pub use set::SetValue;
pub use tuple::TupleValue;
pub use visitor::ValueVisitor;

pub(crate) use set::collection_value;

#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Integer(BigInt),
    Double(f64),
    String(String),
    SourceLocation(SourceLocation),
    SourceRange(SourceRange),
    Tuple(TupleValue),
    /// A plain node of type `node`.
    Node(NodeValue),
    /// A node whose type is a constructor type.
    Constructor(NodeValue),
    Set(SetValue),
    Relation(RelationValue),
    List(ListValue),
    Map(MapValue),
}

impl Value {
    pub fn get_type(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::Integer(_) => Type::Integer,
            Value::Double(_) => Type::Double,
            Value::String(_) => Type::String,
            Value::SourceLocation(_) => Type::SourceLocation,
            Value::SourceRange(_) => Type::SourceRange,
            Value::Tuple(t) => t.get_type(),
            Value::Node(n) | Value::Constructor(n) => n.get_type(),
            Value::Set(s) => s.get_type(),
            Value::Relation(r) => r.get_type(),
            Value::List(l) => l.get_type(),
            Value::Map(m) => m.get_type(),
        }
    }

    pub fn accept<V: ValueVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Integer(i) => visitor.visit_integer(i),
            Value::Double(d) => visitor.visit_double(*d),
            Value::String(s) => visitor.visit_string(s),
            Value::SourceLocation(l) => visitor.visit_source_location(l),
            Value::SourceRange(r) => visitor.visit_source_range(r),
            Value::Tuple(t) => visitor.visit_tuple(t),
            Value::Node(n) => visitor.visit_node(n),
            Value::Constructor(n) => visitor.visit_constructor(n),
            Value::Set(s) => visitor.visit_set(s),
            Value::Relation(r) => visitor.visit_relation(r),
            Value::List(l) => visitor.visit_list(l),
            Value::Map(m) => visitor.visit_map(m),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// The integer, if it is one and fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(ToPrimitive::to_i64)
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&TupleValue> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }

    /// The node behind a `Node` or `Constructor` value.
    pub fn as_node(&self) -> Option<&NodeValue> {
        match self {
            Value::Node(n) | Value::Constructor(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetValue> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationValue> {
        match self {
            Value::Relation(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::SourceLocation(a), Value::SourceLocation(b)) => a == b,
            (Value::SourceRange(a), Value::SourceRange(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::Constructor(a), Value::Constructor(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Relation(a), Value::Relation(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Double(d) => canonical_bits(*d).hash(state),
            Value::String(s) => s.hash(state),
            Value::SourceLocation(l) => l.hash(state),
            Value::SourceRange(r) => r.hash(state),
            Value::Tuple(t) => t.hash(state),
            Value::Node(n) | Value::Constructor(n) => n.hash(state),
            Value::Set(s) => s.hash(state),
            Value::Relation(r) => r.hash(state),
            Value::List(l) => l.hash(state),
            Value::Map(m) => m.hash(state),
        }
    }
}

/// Bits of `d` with both zeros and all NaNs collapsed, matching `Value` equality.
fn canonical_bits(d: f64) -> u64 {
    if d == 0.0 {
        0.0f64.to_bits()
    } else if d.is_nan() {
        f64::NAN.to_bits()
    } else {
        d.to_bits()
    }
}

/// Hash of a collection that does not depend on iteration order.
pub(crate) fn unordered_hash<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
    items.fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}

/// Writes the textual form of a value. Unordered collections are printed
/// in sorted order of their elements' text so output is stable.
struct ValuePrinter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl ValuePrinter<'_, '_> {
    fn sequence<'v>(
        &mut self,
        open: &str,
        items: impl Iterator<Item = &'v Value>,
        close: &str,
    ) -> fmt::Result {
        write!(self.f, "{}", open)?;
        for (i, item) in items.enumerate() {
            if i > 0 {
                write!(self.f, ",")?;
            }
            item.accept(self)?;
        }
        write!(self.f, "{}", close)
    }

    fn sorted(&mut self, open: &str, mut rendered: Vec<String>, close: &str) -> fmt::Result {
        rendered.sort();
        write!(self.f, "{}{}{}", open, rendered.join(","), close)
    }

    fn node(&mut self, node: &NodeValue) -> fmt::Result {
        write!(self.f, "{}", node.name())?;
        self.sequence("(", node.children().iter(), ")")?;
        if node.has_annotations() {
            let entries: Vec<String> = node
                .annotations()
                .iter()
                .map(|(label, value)| format!("@{}={}", label, value))
                .collect();
            write!(self.f, "[{}]", entries.join(","))?;
        }
        Ok(())
    }
}

impl ValueVisitor for ValuePrinter<'_, '_> {
    type Output = fmt::Result;

    fn visit_bool(&mut self, value: bool) -> fmt::Result {
        write!(self.f, "{}", value)
    }

    fn visit_integer(&mut self, value: &BigInt) -> fmt::Result {
        write!(self.f, "{}", value)
    }

    fn visit_double(&mut self, value: f64) -> fmt::Result {
        write!(self.f, "{:?}", value)
    }

    fn visit_string(&mut self, value: &str) -> fmt::Result {
        write!(self.f, "{:?}", value)
    }

    fn visit_source_location(&mut self, value: &SourceLocation) -> fmt::Result {
        write!(self.f, "{}", value)
    }

    fn visit_source_range(&mut self, value: &SourceRange) -> fmt::Result {
        write!(self.f, "{}", value)
    }

    fn visit_tuple(&mut self, value: &TupleValue) -> fmt::Result {
        self.sequence("<", value.iter(), ">")
    }

    fn visit_node(&mut self, value: &NodeValue) -> fmt::Result {
        self.node(value)
    }

    fn visit_constructor(&mut self, value: &NodeValue) -> fmt::Result {
        self.node(value)
    }

    fn visit_set(&mut self, value: &SetValue) -> fmt::Result {
        self.sorted("{", value.iter().map(Value::to_string).collect(), "}")
    }

    fn visit_relation(&mut self, value: &RelationValue) -> fmt::Result {
        self.sorted("{", value.iter().map(Value::to_string).collect(), "}")
    }

    fn visit_list(&mut self, value: &ListValue) -> fmt::Result {
        self.sequence("[", value.iter(), "]")
    }

    fn visit_map(&mut self, value: &MapValue) -> fmt::Result {
        let entries = value.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
        self.sorted("(", entries, ")")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&mut ValuePrinter { f })
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(BigInt::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(BigInt::from(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<SourceLocation> for Value {
    fn from(value: SourceLocation) -> Self {
        Value::SourceLocation(value)
    }
}

impl From<SourceRange> for Value {
    fn from(value: SourceRange) -> Self {
        Value::SourceRange(value)
    }
}

impl From<TupleValue> for Value {
    fn from(value: TupleValue) -> Self {
        Value::Tuple(value)
    }
}

impl From<NodeValue> for Value {
    fn from(value: NodeValue) -> Self {
        value.into_value()
    }
}

impl From<SetValue> for Value {
    fn from(value: SetValue) -> Self {
        Value::Set(value)
    }
}

impl From<RelationValue> for Value {
    fn from(value: RelationValue) -> Self {
        Value::Relation(value)
    }
}

impl From<ListValue> for Value {
    fn from(value: ListValue) -> Self {
        Value::List(value)
    }
}

impl From<MapValue> for Value {
    fn from(value: MapValue) -> Self {
        Value::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_set_equality_is_not_transitive() {
        let ints = Value::Set(SetValue::empty(Type::Integer));
        let values = Value::Set(SetValue::empty(Type::Value));
        let strs = Value::Set(SetValue::empty(Type::String));
        assert_eq!(ints, values);
        assert_eq!(values, strs);
        assert_ne!(ints, strs);
    }

    #[test]
    fn test_leaf_types() {
        assert_eq!(Value::from(true).get_type(), Type::Bool);
        assert_eq!(Value::from(1).get_type(), Type::Integer);
        assert_eq!(Value::from(1.5).get_type(), Type::Double);
        assert_eq!(Value::from("s").get_type(), Type::String);
    }

    #[test]
    fn test_variants_never_equal_across_kinds() {
        assert_ne!(Value::from(1), Value::from(1.0));
        let node = NodeValue::new("f", vec![]);
        assert_ne!(Value::Node(node.clone()), Value::Constructor(node));
    }

    #[test]
    fn test_double_zero_and_nan_hash_consistently() {
        let mut set = HashSet::new();
        set.insert(Value::from(0.0));
        set.insert(Value::from(-0.0));
        set.insert(Value::from(f64::NAN));
        set.insert(Value::from(f64::NAN));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_big_integers() {
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        let v = Value::from(big.clone());
        assert_eq!(v.as_integer(), Some(&big));
        assert_eq!(v.as_i64(), None);
        assert_eq!(Value::from(42).as_i64(), Some(42));
    }

    #[test]
    fn test_display() {
        let tuple = Value::from(TupleValue::new(vec![Value::from(1), Value::from("a")]));
        insta::assert_snapshot!(tuple, @r#"<1,"a">"#);

        let set = Value::from(SetValue::from_values([Value::from(3), Value::from(1), Value::from(2)]));
        insta::assert_snapshot!(set, @"{1,2,3}");

        let node = Value::from(NodeValue::new("f", vec![Value::from(1.0), Value::from(true)]));
        insta::assert_snapshot!(node, @"f(1.0,true)");

        let list = Value::from(ListValue::from_values([Value::from(2), Value::from(1)]));
        insta::assert_snapshot!(list, @"[2,1]");

        let map = Value::from(MapValue::from_entries([(Value::from("k"), Value::from(1))]));
        insta::assert_snapshot!(map, @r#"("k":1)"#);

        let loc = Value::from(SourceLocation::new("a.txt", SourceRange::new(0, 4, (1, 0), (1, 4))));
        insta::assert_snapshot!(loc, @"|a.txt|(0,4,<1,0>,<1,4>)");
    }

    struct Depth;

    impl ValueVisitor for Depth {
        type Output = usize;

        fn visit_bool(&mut self, _: bool) -> usize {
            0
        }
        fn visit_integer(&mut self, _: &BigInt) -> usize {
            0
        }
        fn visit_double(&mut self, _: f64) -> usize {
            0
        }
        fn visit_string(&mut self, _: &str) -> usize {
            0
        }
        fn visit_source_location(&mut self, _: &SourceLocation) -> usize {
            0
        }
        fn visit_source_range(&mut self, _: &SourceRange) -> usize {
            0
        }
        fn visit_tuple(&mut self, value: &TupleValue) -> usize {
            1 + value.iter().map(|v| v.accept(self)).max().unwrap_or(0)
        }
        fn visit_node(&mut self, value: &NodeValue) -> usize {
            1 + value.children().iter().map(|v| v.accept(self)).max().unwrap_or(0)
        }
        fn visit_constructor(&mut self, value: &NodeValue) -> usize {
            self.visit_node(value)
        }
        fn visit_set(&mut self, value: &SetValue) -> usize {
            1 + value.iter().map(|v| v.accept(self)).max().unwrap_or(0)
        }
        fn visit_relation(&mut self, value: &RelationValue) -> usize {
            1 + value.iter().map(|v| v.accept(self)).max().unwrap_or(0)
        }
        fn visit_list(&mut self, value: &ListValue) -> usize {
            1 + value.iter().map(|v| v.accept(self)).max().unwrap_or(0)
        }
        fn visit_map(&mut self, value: &MapValue) -> usize {
            1 + value.values().map(|v| v.accept(self)).max().unwrap_or(0)
        }
    }

    #[test]
    fn test_visitor_dispatch() {
        let inner = Value::from(ListValue::from_values([Value::from(1)]));
        let outer = Value::from(NodeValue::new("f", vec![inner, Value::from("x")]));
        assert_eq!(outer.accept(&mut Depth), 2);
        assert_eq!(Value::from(1).accept(&mut Depth), 0);
    }
}
