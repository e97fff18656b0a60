//! Error types for alias synthesis and path mapping

use thiserror::Error;

use crate::model::SymbolKind;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AliasError>;

/// Errors raised while building an alias package or mapping its path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    /// A type declaration is not a single name bound to a single type.
    /// Recoverable: the declaration is skipped and reported as a warning.
    #[error("unsupported declaration shape for `{name}`: {reason}")]
    UnsupportedDeclarationShape { name: String, reason: String },

    /// A constant spec lists a different number of names and values
    #[error("constant spec `{names}` declares {name_count} name(s) but {value_count} value(s)")]
    ArityMismatch {
        names: String,
        name_count: usize,
        value_count: usize,
    },

    /// The source path does not follow the versioned package layout
    #[error("path `{path}` does not match the expected package layout")]
    PathShapeMismatch { path: String },

    /// Two retained declarations claim the same exported name
    #[error("duplicate symbol `{name}`: {duplicate} clashes with an earlier {existing}")]
    DuplicateSymbol {
        name: String,
        existing: SymbolKind,
        duplicate: SymbolKind,
    },

    #[error("invalid profile name `{0}`")]
    InvalidProfileName(String),

    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    #[error("failed to render alias package: {0}")]
    Render(String),
}
