//! ctxgen core
//!
//! Generates a dispatch table and its dependent views from one C interface
//! header: the table struct declaration, the static table value, inline
//! trampolines that forward through the table, and a slot descriptor for a
//! second runtime.
//!
//! The pipeline runs source, classifier, namer, table, generators, and is
//! driven by [`AutoGen`]:
//!
//! ```
//! use ctxgen_core::{AutoGen, Conventions, HeaderSource};
//!
//! let source = HeaderSource::new(
//!     "tools/public_api.h",
//!     "HPy h_None;\nHPy HPy_Dup(HPyContext ctx, HPy h);\n",
//! );
//! let autogen = AutoGen::new(Conventions::hpy().unwrap());
//! let mut warnings = Vec::new();
//! let generated = autogen.run(&source, &mut warnings).unwrap();
//! assert_eq!(generated.table().field_names(), vec!["ctx_version", "h_None", "ctx_Dup"]);
//! ```

pub mod classify;
pub mod conventions;
pub mod decl;
pub mod diagnostic;
pub mod driver;
pub mod emit;
pub mod entry;
pub mod error;
pub mod generators;
pub mod lexer;
pub mod naming;
pub mod parser;
pub mod source;
pub mod span;
pub mod table;
pub mod token;

#[cfg(test)]
mod testing;

pub use conventions::Conventions;
pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use driver::{Artifact, AutoGen, Drift, DriftState, Generated};
pub use entry::Entry;
pub use error::{GenError, GenResult};
pub use generators::ArtifactKind;
pub use source::{DeclarationSource, HeaderSource};
pub use table::{DispatchTable, Slot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
