//! CLI error type, reported through `miette`

use std::path::PathBuf;

use goalias_core::AliasError;
use goalias_go::LoadError;
use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::discovery::DiscoveryError;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("no Go package found at {path}")]
    #[diagnostic(
        code(goalias::package_not_found),
        help("pass a package directory, or a package name relative to $GOPATH/src")
    )]
    PackageNotFound { path: PathBuf },

    #[error("cannot derive an import path for {path}")]
    #[diagnostic(
        code(goalias::import_path),
        help("pass --import-path, or place the package under $GOPATH/src")
    )]
    ImportPath { path: PathBuf },

    #[error("no GOPATH available")]
    #[diagnostic(
        code(goalias::gopath),
        help("set GOPATH, add `gopath` to goalias.toml, or pass --output-root")
    )]
    NoGopath,

    #[error("nothing to do")]
    #[diagnostic(
        code(goalias::no_packages),
        help("list package directories, or pass --discover <root>")
    )]
    NoPackages,

    #[error("failed to write {path}")]
    #[diagnostic(code(goalias::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(goalias::alias))]
    Alias(#[from] AliasError),

    #[error(transparent)]
    #[diagnostic(code(goalias::load))]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(code(goalias::config))]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(code(goalias::discovery))]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    #[diagnostic(code(goalias::internal))]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Print the error with its diagnostic decoration to stderr
    pub fn report(self) {
        eprintln!("{:?}", miette::Report::new(self));
    }
}
