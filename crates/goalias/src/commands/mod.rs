pub mod generate;
pub mod map_path;
pub mod profile;

pub use generate::*;
pub use map_path::*;
pub use profile::*;

use std::path::{Path, PathBuf};

use anyhow::Context;
use goalias_core::{AliasOutcome, PrintOptions, TracingSink, generate, render_module};
use goalias_go::{Vfs, load_package};
use tracing::info;

use crate::config::{GoaliasConfig, load_config};
use crate::error::CliError;

/// An alias package ready to be written
#[derive(Debug, Clone)]
pub struct GeneratedPackage {
    pub outcome: AliasOutcome,
    pub source: String,
}

/// Load the package in `dir` and build its alias package, importing the
/// original from `import_path`.
pub fn alias_package(
    vfs: &dyn Vfs,
    dir: &Path,
    import_path: &str,
    options: &PrintOptions,
) -> Result<GeneratedPackage, CliError> {
    if !vfs.is_dir(dir) {
        return Err(CliError::PackageNotFound {
            path: dir.to_path_buf(),
        });
    }
    let module = load_package(vfs, dir)?;
    info!(package = %module.name, dir = %dir.display(), "loaded package");

    let outcome = generate(&module, import_path, &TracingSink)?;
    let source = render_module(&outcome.module, options)?;
    Ok(GeneratedPackage { outcome, source })
}

/// Write generated source to `<dir>/<file_name>`, creating `dir`
pub fn write_package(
    vfs: &dyn Vfs,
    dir: &Path,
    file_name: &str,
    source: &str,
) -> Result<PathBuf, CliError> {
    let path = dir.join(file_name);
    vfs.write_from_string(&path, source)
        .map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
    info!(file = %path.display(), "wrote alias package");
    Ok(path)
}

/// Configuration for a command run from the current directory
pub fn command_config(explicit: Option<&Path>) -> Result<GoaliasConfig, CliError> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let (config, _) = load_config(explicit, &cwd)?;
    Ok(config)
}
