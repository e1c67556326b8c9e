// Library code never writes to stdout/stderr; widening events go through
// the diagnostics collector instead.
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]

// Type lattice: subtyping, lub, instantiation, declarations
pub mod types;

// Immutable values
pub mod values;

// One-shot writers
pub mod writers;

// Construction facade
pub mod factory;

pub mod diagnostics;
pub mod error;

pub use diagnostics::{DiagnosticReason, DiagnosticsCollector, TypeDiagnostic};
pub use error::{FactError, FactErrorKind, FactResult};
pub use factory::ValueFactory;
pub use types::{Type, TypeStore};
pub use values::Value;
pub use writers::Writer;
