//! Error types for type construction, value updates and writers.
//!
//! Every error is raised at the call that detects the violation. Nothing in
//! this crate recovers from or retries a failed operation.

use thiserror::Error;

/// Coarse classification of a [`FactError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactErrorKind {
    TypeMismatch,
    UndeclaredAnnotation,
    Instantiation,
    FinalizedMutation,
    ShapeMismatch,
    Lookup,
}

/// Errors raised by the type lattice, the value model and the writers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactError {
    /// A value's type is not a subtype of the required type.
    #[error("type mismatch: expected a subtype of {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// The label has no annotation declaration for the value's type.
    #[error("no annotation named '{label}' is declared for {on}")]
    UndeclaredAnnotation { label: String, on: String },

    /// Parameter instantiation ran out of actual types.
    #[error("not enough actual types to instantiate parameter &{parameter}")]
    Instantiation { parameter: String },

    /// Mutation reached a writer that has already produced its value.
    #[error("mutation of a finalized {writer} writer is not supported")]
    FinalizedMutation { writer: &'static str },

    /// Structurally incompatible shapes (arity, field name counts).
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        expected: String,
        actual: String,
        context: String,
    },

    /// A field name occurs twice in one tuple type.
    #[error("duplicate field name '{0}'")]
    DuplicateFieldName(String),

    /// No field with this label exists on the type.
    #[error("type {on} has no field named '{label}'")]
    UnknownField { label: String, on: String },

    /// Positional access outside the children/fields of a value or type.
    #[error("index {index} out of bounds for arity {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// A type name was referenced that the store does not declare.
    #[error("undeclared type '{0}'")]
    UndeclaredType(String),
}

impl FactError {
    /// Create a type mismatch error from any two displayable types.
    pub fn type_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        FactError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an undeclared annotation error.
    pub fn undeclared_annotation(label: impl Into<String>, on: impl ToString) -> Self {
        FactError::UndeclaredAnnotation {
            label: label.into(),
            on: on.to_string(),
        }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(
        context: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        FactError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
            context: context.into(),
        }
    }

    /// Create an unknown field error.
    pub fn unknown_field(label: impl Into<String>, on: impl ToString) -> Self {
        FactError::UnknownField {
            label: label.into(),
            on: on.to_string(),
        }
    }

    /// Create an index error.
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        FactError::IndexOutOfBounds { index, length }
    }

    /// Classify this error.
    pub fn kind(&self) -> FactErrorKind {
        match self {
            FactError::TypeMismatch { .. } => FactErrorKind::TypeMismatch,
            FactError::UndeclaredAnnotation { .. } => FactErrorKind::UndeclaredAnnotation,
            FactError::Instantiation { .. } => FactErrorKind::Instantiation,
            FactError::FinalizedMutation { .. } => FactErrorKind::FinalizedMutation,
            FactError::ShapeMismatch { .. } | FactError::DuplicateFieldName(_) => {
                FactErrorKind::ShapeMismatch
            }
            FactError::UnknownField { .. }
            | FactError::IndexOutOfBounds { .. }
            | FactError::UndeclaredType(_) => FactErrorKind::Lookup,
        }
    }
}

/// Result alias used throughout the crate.
pub type FactResult<T> = Result<T, FactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FactError::type_mismatch("int", "str");
        assert_eq!(
            err.to_string(),
            "type mismatch: expected a subtype of int, got str"
        );

        let err = FactError::FinalizedMutation { writer: "set" };
        assert_eq!(
            err.to_string(),
            "mutation of a finalized set writer is not supported"
        );

        let err = FactError::index_out_of_bounds(4, 2);
        assert_eq!(err.to_string(), "index 4 out of bounds for arity 2");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            FactError::DuplicateFieldName("x".into()).kind(),
            FactErrorKind::ShapeMismatch
        );
        assert_eq!(
            FactError::Instantiation {
                parameter: "T".into()
            }
            .kind(),
            FactErrorKind::Instantiation
        );
        assert_eq!(
            FactError::UndeclaredType("Tree".into()).kind(),
            FactErrorKind::Lookup
        );
    }
}
