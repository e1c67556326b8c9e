//! Exhaustive dispatch over value variants.

use num_bigint::BigInt;

use super::{ListValue, MapValue, NodeValue, RelationValue, SetValue, SourceLocation, SourceRange, TupleValue};

/// One method per value variant; see [`Value::accept`](super::Value::accept).
pub trait ValueVisitor {
    type Output;

    fn visit_bool(&mut self, value: bool) -> Self::Output;
    fn visit_integer(&mut self, value: &BigInt) -> Self::Output;
    fn visit_double(&mut self, value: f64) -> Self::Output;
    fn visit_string(&mut self, value: &str) -> Self::Output;
    fn visit_source_location(&mut self, value: &SourceLocation) -> Self::Output;
    fn visit_source_range(&mut self, value: &SourceRange) -> Self::Output;
    fn visit_tuple(&mut self, value: &TupleValue) -> Self::Output;
    fn visit_node(&mut self, value: &NodeValue) -> Self::Output;
    fn visit_constructor(&mut self, value: &NodeValue) -> Self::Output;
    fn visit_set(&mut self, value: &SetValue) -> Self::Output;
    fn visit_relation(&mut self, value: &RelationValue) -> Self::Output;
    fn visit_list(&mut self, value: &ListValue) -> Self::Output;
    fn visit_map(&mut self, value: &MapValue) -> Self::Output;
}
