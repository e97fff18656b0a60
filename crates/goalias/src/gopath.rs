//! GOPATH helpers
//!
//! Package names given on the command line are resolved against
//! `<gopath>/src`, and a package directory's import path is its location
//! relative to that directory.

use std::env;
use std::path::{Component, Path, PathBuf};

/// GOPATH from configuration, then `$GOPATH` (first entry), then `~/go`
pub fn resolve_gopath(configured: Option<&Path>) -> Option<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .or_else(|| {
            env::var_os("GOPATH")
                .and_then(|value| env::split_paths(&value).next())
                .filter(|path| !path.as_os_str().is_empty())
        })
        .or_else(|| dirs::home_dir().map(|home| home.join("go")))
}

/// `<gopath>/src/<name>`
pub fn expand_package_name(name: &str, gopath: &Path) -> PathBuf {
    gopath.join("src").join(name)
}

/// Import path of `dir`: its location under `<gopath>/src`, `/`-separated
pub fn import_path_for(dir: &Path, gopath: &Path) -> Option<String> {
    let relative = dir.strip_prefix(gopath.join("src")).ok()?;
    let segments: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

/// Directory for a package argument: an existing directory as given,
/// otherwise the argument expanded under the GOPATH.
pub fn resolve_package_dir(argument: &str, gopath: Option<&Path>) -> PathBuf {
    let direct = PathBuf::from(argument);
    match gopath {
        Some(gopath) if !direct.is_dir() => expand_package_name(argument, gopath),
        _ => direct,
    }
}
