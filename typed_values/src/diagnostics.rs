//! Diagnostics for type widening.
//!
//! Lub computations and writers in inferred mode may widen types, sometimes
//! all the way to `value`. This collector records those events so callers can
//! see where element types became less precise.
//!
//! # Usage
//!
//! Diagnostics are disabled by default. Enable them via:
//! - `DiagnosticsCollector::enable()` - enable diagnostics collection
//! - `DiagnosticsCollector::disable()` - disable diagnostics collection
//! - `DiagnosticsCollector::take()` - retrieve and clear collected diagnostics
//!
//! Collection is per thread. Events are recorded in the order they happen,
//! so a writer's widening steps appear in insertion order.

use std::cell::RefCell;

use crate::types::Type;

/// What caused a type to widen.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticReason {
    /// Lub of two types with no structural correspondence fell to `value`.
    LubFellToTop { left: String, right: String },

    /// An inferred writer's running element type changed.
    ElementTypeWidened {
        writer: &'static str,
        from: String,
        to: String,
    },

    /// An inferred set writer finalized into a relation.
    InferredRelation { element: String },
}

impl std::fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticReason::LubFellToTop { left, right } => {
                write!(f, "no common structure between {} and {}", left, right)
            }
            DiagnosticReason::ElementTypeWidened { writer, from, to } => {
                write!(f, "{} writer element type widened from {} to {}", writer, from, to)
            }
            DiagnosticReason::InferredRelation { element } => {
                write!(f, "inferred set of {} finalized as a relation", element)
            }
        }
    }
}

/// A single widening diagnostic.
#[derive(Clone, Debug)]
pub struct TypeDiagnostic {
    pub reason: DiagnosticReason,
    /// The resulting type.
    pub widened_to: String,
}

impl TypeDiagnostic {
    pub fn new(reason: DiagnosticReason, widened_to: impl Into<String>) -> Self {
        Self {
            reason,
            widened_to: widened_to.into(),
        }
    }
}

impl std::fmt::Display for TypeDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type widening: {} -> {}", self.reason, self.widened_to)
    }
}

thread_local! {
    static DIAGNOSTICS_ENABLED: RefCell<bool> = const { RefCell::new(false) };
    static DIAGNOSTICS: RefCell<Vec<TypeDiagnostic>> = const { RefCell::new(Vec::new()) };
}

/// Collector for widening diagnostics.
#[derive(Debug)]
pub struct DiagnosticsCollector;

impl DiagnosticsCollector {
    pub fn enable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = true;
        });
    }

    pub fn disable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = false;
        });
    }

    pub fn is_enabled() -> bool {
        DIAGNOSTICS_ENABLED.with(|enabled| *enabled.borrow())
    }

    /// Record a diagnostic (if enabled).
    pub fn emit(diagnostic: TypeDiagnostic) {
        if Self::is_enabled() {
            DIAGNOSTICS.with(|diags| {
                diags.borrow_mut().push(diagnostic);
            });
        }
    }

    /// Take all collected diagnostics, clearing the collection.
    pub fn take() -> Vec<TypeDiagnostic> {
        DIAGNOSTICS.with(|diags| std::mem::take(&mut *diags.borrow_mut()))
    }

    pub fn clear() {
        DIAGNOSTICS.with(|diags| {
            diags.borrow_mut().clear();
        });
    }

    pub fn count() -> usize {
        DIAGNOSTICS.with(|diags| diags.borrow().len())
    }
}

pub(crate) fn emit_lub_fell_to_top(left: &Type, right: &Type) {
    if !DiagnosticsCollector::is_enabled() {
        return;
    }
    DiagnosticsCollector::emit(TypeDiagnostic::new(
        DiagnosticReason::LubFellToTop {
            left: left.to_string(),
            right: right.to_string(),
        },
        Type::Value.to_string(),
    ));
}

pub(crate) fn emit_element_type_widened(writer: &'static str, from: &Type, to: &Type) {
    if !DiagnosticsCollector::is_enabled() {
        return;
    }
    DiagnosticsCollector::emit(TypeDiagnostic::new(
        DiagnosticReason::ElementTypeWidened {
            writer,
            from: from.to_string(),
            to: to.to_string(),
        },
        to.to_string(),
    ));
}

pub(crate) fn emit_inferred_relation(element: &Type) {
    if !DiagnosticsCollector::is_enabled() {
        return;
    }
    DiagnosticsCollector::emit(TypeDiagnostic::new(
        DiagnosticReason::InferredRelation {
            element: element.to_string(),
        },
        format!("rel[{}]", element.tuple_type().map(|t| t.to_string()).unwrap_or_default()),
    ));
}
