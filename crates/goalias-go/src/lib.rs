//! Go front end for goalias
//!
//! Reads the top-level declarations of a Go package into the
//! [`goalias_core::Module`] model:
//! - [`lexer`]: tokens, with Go's automatic semicolon insertion
//! - [`parse_file`]: declarations of one source file
//! - [`load_package`]: all files of one package directory, merged
//!
//! Function bodies are skipped and type or value expressions are kept as
//! source text; nothing here type-checks.

pub mod error;
pub mod lexer;
pub mod loader;
mod parser;
pub mod vfs;

pub use error::{LoadError, ParseError};
pub use loader::{go_source_files, is_go_source, load_package};
pub use parser::{SourceFile, parse_file};
pub use vfs::{MemoryVfs, OsVfs, Vfs};
