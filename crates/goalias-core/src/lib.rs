//! goalias core - alias synthesis engine
//!
//! Given a parsed Go package, this crate produces an *alias package*: a new
//! package that re-exports the original's public types and constants through
//! a single import bound to [`ORIGINAL_IMPORT_ALIAS`].
//!
//! - [`classify`]: pick the exported declarations out of a [`Module`]
//! - [`synthesize`]: build a forwarding declaration for each of them
//! - [`assemble`]: collect the forwarding declarations into an [`AliasModule`]
//! - [`path`]: map a versioned package path onto a profile path
//! - [`printer`]: render an [`AliasModule`] as Go source
//!
//! [`generate`] runs classification, synthesis and assembly in one pass.

pub mod assemble;
pub mod classify;
pub mod engine;
pub mod error;
pub mod model;
pub mod path;
pub mod printer;
pub mod sink;
pub mod synthesize;

pub use assemble::{AliasModule, ImportSpec, assemble};
pub use classify::{Classified, classify};
pub use engine::{AliasOutcome, AliasWarning, generate};
pub use error::{AliasError, Result};
pub use model::{
    ConstBlock, Declaration, DeclarationKind, FunctionDecl, Ident, Module, OtherDecl, OtherKind,
    Param, Signature, SymbolKind, TypeBlock, TypeExpr, TypeParam, TypeSpec, ValueExpr, ValueSpec,
};
pub use path::PathMapper;
pub use printer::{FunctionPolicy, PrintOptions, render_module};
pub use sink::{EngineEvent, EventSink, MemorySink, NullSink, TracingSink};
pub use synthesize::{
    AliasConstant, AliasConstantGroup, AliasType, FunctionStub, Reference, synthesize_constant,
    synthesize_function, synthesize_type,
};

/// Identifier the original package is imported under in every alias package.
pub const ORIGINAL_IMPORT_ALIAS: &str = "original";
