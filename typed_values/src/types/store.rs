//! Registry of declared ADTs, constructors, aliases and annotations.
//!
//! A `TypeStore` is an ordinary value: callers create one, declare their
//! types in it and hand it to the operations that need declarations. Tests
//! build isolated stores.

use std::collections::{BTreeMap, HashMap};

use super::{AdtType, ConstructorType, TupleType, Type};
use crate::error::{FactError, FactResult};

/// Who an annotation declaration applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationOwner {
    /// Every node, ADT and constructor value.
    AnyNode,
    /// Every constructor of the named ADT.
    Adt(String),
    /// One constructor of one ADT.
    Constructor { adt: String, name: String },
}

impl AnnotationOwner {
    /// Owner keyed by `ty`, if annotations can be declared on it.
    pub fn of(ty: &Type) -> Option<AnnotationOwner> {
        match ty.strip_aliases() {
            Type::Node => Some(AnnotationOwner::AnyNode),
            Type::AbstractData(adt) => Some(AnnotationOwner::Adt(adt.name.clone())),
            Type::Constructor(c) => Some(AnnotationOwner::Constructor {
                adt: c.adt.name.clone(),
                name: c.name.clone(),
            }),
            _ => None,
        }
    }
}

/// Declarations for one family of types.
#[derive(Debug, Default, Clone)]
pub struct TypeStore {
    adts: HashMap<String, AdtType>,
    constructors: HashMap<String, Vec<ConstructorType>>,
    aliases: HashMap<String, Type>,
    annotations: HashMap<AnnotationOwner, BTreeMap<String, Type>>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an abstract data type.
    ///
    /// Redeclaring with the same parameter count returns the existing type.
    pub fn declare_adt(&mut self, name: &str, parameters: Vec<Type>) -> FactResult<Type> {
        if let Some(existing) = self.adts.get(name) {
            if existing.parameters.len() != parameters.len() {
                return Err(FactError::shape_mismatch(
                    format!("redeclaration of {}", name),
                    format!("{} parameters", existing.parameters.len()),
                    format!("{} parameters", parameters.len()),
                ));
            }
            return Ok(Type::AbstractData(existing.clone()));
        }
        let adt = AdtType::new(name, parameters);
        self.adts.insert(name.to_string(), adt.clone());
        Ok(Type::AbstractData(adt))
    }

    /// Declare a constructor of an already declared ADT.
    pub fn declare_constructor(
        &mut self,
        adt: &Type,
        name: &str,
        field_types: Vec<Type>,
        field_names: Option<Vec<String>>,
    ) -> FactResult<Type> {
        let adt = match adt.strip_aliases() {
            Type::AbstractData(adt) => adt,
            other => return Err(FactError::type_mismatch("an abstract data type", other)),
        };
        let declared = self
            .adts
            .get(&adt.name)
            .ok_or_else(|| FactError::UndeclaredType(adt.name.clone()))?
            .clone();
        let fields = match field_names {
            Some(names) => TupleType::with_names(field_types, names)?,
            None => TupleType::new(field_types),
        };
        let ctor = ConstructorType {
            name: name.to_string(),
            adt: declared,
            fields,
        };

        let family = self.constructors.entry(adt.name.clone()).or_default();
        match family.iter().position(|c| c.name == ctor.name) {
            Some(i) => family[i] = ctor.clone(),
            None => family.push(ctor.clone()),
        }
        Ok(Type::Constructor(ctor))
    }

    /// Declare a transparent alias.
    pub fn declare_alias(&mut self, name: &str, aliased: Type) -> Type {
        self.aliases.insert(name.to_string(), aliased.clone());
        Type::named(name, aliased)
    }

    /// Declare that values of `on` may carry annotation `label` of type `ty`.
    pub fn declare_annotation(&mut self, on: &Type, label: &str, ty: Type) -> FactResult<()> {
        let owner = AnnotationOwner::of(on)
            .ok_or_else(|| FactError::type_mismatch("a node, ADT or constructor type", on))?;
        self.annotations
            .entry(owner)
            .or_default()
            .insert(label.to_string(), ty);
        Ok(())
    }

    /// Declared type of annotation `label` on values of type `on`.
    ///
    /// Consults the exact owner, then the constructor's ADT, then the
    /// declarations that apply to every node.
    pub fn annotation_type(&self, on: &Type, label: &str) -> Option<&Type> {
        let mut owners = Vec::with_capacity(3);
        if let Some(owner) = AnnotationOwner::of(on) {
            owners.push(owner);
        }
        if let Type::Constructor(c) = on.strip_aliases() {
            owners.push(AnnotationOwner::Adt(c.adt.name.clone()));
        }
        owners.push(AnnotationOwner::AnyNode);

        owners
            .iter()
            .filter_map(|owner| self.annotations.get(owner))
            .find_map(|declared| declared.get(label))
    }

    pub fn declares_annotation(&self, on: &Type, label: &str) -> bool {
        self.annotation_type(on, label).is_some()
    }

    pub fn lookup_adt(&self, name: &str) -> Option<Type> {
        self.adts.get(name).cloned().map(Type::AbstractData)
    }

    pub fn lookup_alias(&self, name: &str) -> Option<Type> {
        self.aliases
            .get(name)
            .map(|aliased| Type::named(name, aliased.clone()))
    }

    pub fn lookup_constructor(&self, adt: &str, name: &str) -> Option<Type> {
        self.constructors
            .get(adt)?
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .map(Type::Constructor)
    }

    /// All constructors of `adt`, in declaration order.
    pub fn constructors_of(&self, adt: &str) -> Vec<Type> {
        self.constructors
            .get(adt)
            .map(|family| family.iter().cloned().map(Type::Constructor).collect())
            .unwrap_or_default()
    }
}
