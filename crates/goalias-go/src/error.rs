//! Parse and load errors

use std::path::PathBuf;
use thiserror::Error;

/// Syntax error with a 1-based source position
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{file}:{line}:{column}: invalid token")]
    InvalidToken { file: String, line: u32, column: u32 },

    #[error("{file}:{line}:{column}: expected {expected}, found {found}")]
    Unexpected {
        file: String,
        line: u32,
        column: u32,
        expected: String,
        found: String,
    },

    #[error("{file}: unexpected end of file, expected {expected}")]
    UnexpectedEof { file: String, expected: String },
}

impl ParseError {
    pub(crate) fn invalid_token(file: &str, source: &str, offset: usize) -> Self {
        let (line, column) = span_to_line_column(source, offset);
        ParseError::InvalidToken {
            file: file.to_string(),
            line,
            column,
        }
    }
}

/// Errors while reading a package directory
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("no Go package found in {0}")]
    NoPackage(PathBuf),

    #[error("{dir} contains more than one package: {names}")]
    MultiplePackages { dir: PathBuf, names: String },
}

/// Convert byte offset to line/column
pub(crate) fn span_to_line_column(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 1;
    let mut col = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}
