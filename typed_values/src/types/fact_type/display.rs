//! Display formatting for Type.

use super::{AdtType, TupleType, Type};
use std::fmt;

impl Type {
    /// Short name of the type's kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Type::Void => "void",
            Type::Value => "value",
            Type::Bool => "bool",
            Type::Integer => "int",
            Type::Double => "double",
            Type::String => "str",
            Type::SourceLocation => "loc",
            Type::SourceRange => "range",
            Type::Node => "node",
            Type::List(_) => "list",
            Type::Set(_) => "set",
            Type::Relation(_) => "rel",
            Type::Map(_, _) => "map",
            Type::Tuple(_) => "tuple",
            Type::Named { .. } => "alias",
            Type::AbstractData(_) => "adt",
            Type::Constructor(_) => "constructor",
            Type::Parameter(_) => "parameter",
        }
    }
}

impl fmt::Display for TupleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
            if let Some(name) = self.field_name(i) {
                write!(f, " {}", name)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for AdtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
            write!(f, "[{}]", params.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::List(e) => write!(f, "list[{}]", e),
            Type::Set(e) => write!(f, "set[{}]", e),
            Type::Relation(t) => write!(f, "rel[{}]", t),
            Type::Map(k, v) => write!(f, "map[{}, {}]", k, v),
            Type::Tuple(t) => write!(f, "tuple[{}]", t),
            Type::Named { alias, .. } => write!(f, "{}", alias),
            Type::AbstractData(adt) => write!(f, "{}", adt),
            Type::Constructor(c) => write!(f, "{}.{}({})", c.adt, c.name, c.fields),
            Type::Parameter(name) => write!(f, "&{}", name),
            leaf => write!(f, "{}", leaf.kind_name()),
        }
    }
}
