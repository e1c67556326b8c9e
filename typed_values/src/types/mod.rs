//! Structural type lattice.
//!
//! # Module Organization
//!
//! - `fact_type/`: Type enum, subtyping, least upper bound, display
//! - `instantiate.rs`: Parameter instantiation and parameter matching
//! - `store.rs`: TypeStore registry for ADTs, constructors, aliases and annotations

mod fact_type;
mod instantiate;
mod store;


pub use fact_type::{AdtType, ConstructorType, TupleType, Type};
pub use instantiate::{Bindings, TypeInstantiator};
pub use store::{AnnotationOwner, TypeStore};
