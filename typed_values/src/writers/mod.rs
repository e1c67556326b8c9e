//! One-shot writers.
//!
//! A writer accumulates elements while open and produces one immutable value
//! on its first `done()`. From then on it is closed: `done()` hands back the
//! same value and every mutating call fails with
//! [`FactError::FinalizedMutation`].
//!
//! Writers either check elements against a declared element type or infer
//! one, starting from `void` and widening with `lub` once per inserted
//! element, in insertion order. Deleting never narrows the element type.
//!
//! A writer is a single-owner resource. It holds no locks; sharing one
//! across threads is the caller's problem.
//!
//! # Sub-modules
//!
//! - `set`: sets, finalizing to a relation when the element type is a tuple
//! - `relation`: relations only
//! - `list`, `map`, `tuple`: the remaining collection kinds

mod list;
mod map;
mod relation;
mod set;
mod tuple;

use crate::diagnostics;
use crate::error::{FactError, FactResult};
use crate::types::Type;
use crate::values::Value;

pub use list::ListWriter;
pub use map::MapWriter;
pub use relation::RelationWriter;
pub use set::SetWriter;
pub use tuple::TupleWriter;

/// Common protocol of all writers.
pub trait Writer {
    /// Short name of the collection kind, used in errors.
    fn kind(&self) -> &'static str;

    /// Add one element. Fails when closed or when the element does not fit
    /// the declared type; a failed insert leaves the writer unchanged.
    fn insert(&mut self, value: Value) -> FactResult<()>;

    /// Add every element in order, stopping at the first failure.
    fn insert_all<I>(&mut self, values: I) -> FactResult<()>
    where
        I: IntoIterator<Item = Value>,
        Self: Sized,
    {
        if self.is_closed() {
            return Err(FactError::FinalizedMutation {
                writer: self.kind(),
            });
        }
        values.into_iter().try_for_each(|value| self.insert(value))
    }

    /// Remove a matching element if present.
    fn delete(&mut self, value: &Value) -> FactResult<()>;

    /// Produce the value, building it on the first call only.
    fn done(&mut self) -> FactResult<Value>;

    /// Number of elements accumulated, or held by the produced value.
    fn size(&self) -> usize;

    fn is_closed(&self) -> bool;

    /// Consume the writer and return its value.
    fn finish(mut self) -> FactResult<Value>
    where
        Self: Sized,
    {
        self.done()
    }
}

/// Open with an accumulator, or closed holding the produced value.
#[derive(Debug)]
pub(crate) enum WriterState<A> {
    Open(A),
    Closed(Value),
}

impl<A: Default> Default for WriterState<A> {
    fn default() -> Self {
        WriterState::Open(A::default())
    }
}

impl<A: Default> WriterState<A> {
    pub(crate) fn is_closed(&self) -> bool {
        matches!(self, WriterState::Closed(_))
    }

    /// The accumulator, or `FinalizedMutation` once closed.
    pub(crate) fn open_mut(&mut self, writer: &'static str) -> FactResult<&mut A> {
        match self {
            WriterState::Open(acc) => Ok(acc),
            WriterState::Closed(_) => Err(FactError::FinalizedMutation { writer }),
        }
    }

    /// Move the accumulator into `build` on the first call; afterwards
    /// return the stored value.
    pub(crate) fn close_with(&mut self, build: impl FnOnce(A) -> Value) -> Value {
        let value = match std::mem::take(self) {
            WriterState::Open(acc) => build(acc),
            WriterState::Closed(value) => value,
        };
        *self = WriterState::Closed(value.clone());
        value
    }

    pub(crate) fn size(&self, open_size: impl FnOnce(&A) -> usize) -> usize {
        match self {
            WriterState::Open(acc) => open_size(acc),
            WriterState::Closed(value) => element_count(value),
        }
    }
}

fn element_count(value: &Value) -> usize {
    match value {
        Value::Set(s) => s.len(),
        Value::Relation(r) => r.len(),
        Value::List(l) => l.len(),
        Value::Map(m) => m.len(),
        Value::Tuple(t) => t.arity(),
        Value::Node(n) | Value::Constructor(n) => n.arity(),
        _ => 1,
    }
}

/// How a writer types its elements.
#[derive(Debug, Clone)]
pub(crate) enum ElementType {
    /// Every element must be a subtype of this.
    Declared(Type),
    /// Lub of every element admitted so far.
    Inferred(Type),
}

impl ElementType {
    pub(crate) fn inferred() -> Self {
        ElementType::Inferred(Type::Void)
    }

    pub(crate) fn current(&self) -> &Type {
        match self {
            ElementType::Declared(ty) | ElementType::Inferred(ty) => ty,
        }
    }

    pub(crate) fn is_inferred(&self) -> bool {
        matches!(self, ElementType::Inferred(_))
    }

    /// Check against the declared type, or widen the inferred one.
    pub(crate) fn admit(&mut self, writer: &'static str, actual: &Type) -> FactResult<()> {
        match self {
            ElementType::Declared(declared) => {
                if actual.is_subtype_of(declared) {
                    Ok(())
                } else {
                    Err(FactError::type_mismatch(&*declared, actual))
                }
            }
            ElementType::Inferred(running) => {
                let widened = running.lub(actual);
                if widened != *running {
                    diagnostics::emit_element_type_widened(writer, running, &widened);
                    *running = widened;
                }
                Ok(())
            }
        }
    }

    /// Like `admit`, without widening.
    pub(crate) fn check(&self, actual: &Type) -> FactResult<()> {
        match self {
            ElementType::Declared(declared) if !actual.is_subtype_of(declared) => {
                Err(FactError::type_mismatch(declared, actual))
            }
            _ => Ok(()),
        }
    }
}
