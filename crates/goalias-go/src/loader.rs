//! Package loader
//!
//! A package is the set of non-test `.go` files directly inside one
//! directory. Files are parsed in name order and merged into a single
//! [`Module`]; external test packages (`package foo_test`) are ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use goalias_core::Module;
use tracing::debug;

use crate::error::LoadError;
use crate::parser::{SourceFile, parse_file};
use crate::vfs::Vfs;

/// Whether `path` names a Go source file that belongs to the package build
pub fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go")
        && !name.ends_with("_test.go")
        && !name.starts_with('.')
        && !name.starts_with('_')
}

/// Non-test Go source files directly inside `dir`, sorted by name
pub fn go_source_files(vfs: &dyn Vfs, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let pattern = format!("{}/*.go", Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = vfs
        .glob(&pattern)
        .map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .into_iter()
        .filter(|path| is_go_source(path) && !vfs.is_dir(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Load the package in `dir` into a single module.
pub fn load_package(vfs: &dyn Vfs, dir: &Path) -> Result<Module, LoadError> {
    let mut packages: BTreeMap<String, Module> = BTreeMap::new();

    for path in go_source_files(vfs, dir)? {
        let source = vfs.read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let SourceFile {
            package,
            declarations,
        } = parse_file(&path.to_string_lossy(), &source)?;

        if package.ends_with("_test") {
            debug!(file = %path.display(), "skipping external test package");
            continue;
        }
        debug!(
            file = %path.display(),
            package = %package,
            declarations = declarations.len(),
            "parsed Go source"
        );

        let module = packages
            .entry(package.clone())
            .or_insert_with(|| Module::new(package.as_str()));
        module.merge(Module::with_declarations(package, declarations));
    }

    let mut packages = packages.into_values();
    match (packages.next(), packages.next()) {
        (None, _) => Err(LoadError::NoPackage(dir.to_path_buf())),
        (Some(module), None) => Ok(module),
        (Some(first), Some(second)) => {
            let names = [first.name, second.name]
                .into_iter()
                .chain(packages.map(|m| m.name))
                .collect::<Vec<_>>()
                .join(", ");
            Err(LoadError::MultiplePackages {
                dir: dir.to_path_buf(),
                names,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryVfs;
    use goalias_core::{Declaration, DeclarationKind};
    use rstest::rstest;

    #[rstest]
    #[case("models.go", true)]
    #[case("models_test.go", false)]
    #[case("_generated.go", false)]
    #[case(".hidden.go", false)]
    #[case("README.md", false)]
    fn test_is_go_source(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_go_source(Path::new(name)), expected);
    }

    #[test]
    fn test_files_are_merged_in_name_order() {
        let vfs = MemoryVfs::new()
            .with_file("/sdk/storage/zz.go", "package storage\n\ntype Z int\n")
            .with_file("/sdk/storage/aa.go", "package storage\n\nconst A = 1\n")
            .with_file("/sdk/storage/aa_test.go", "package storage\n\nfunc TestA() {}\n")
            .with_file("/sdk/storage/nested/x.go", "package nested\n");

        let module = load_package(&vfs, Path::new("/sdk/storage")).unwrap();
        assert_eq!(module.name, "storage");
        let kinds: Vec<_> = module.declarations.iter().map(Declaration::kind).collect();
        assert_eq!(kinds, vec![DeclarationKind::Constant, DeclarationKind::Type]);
    }

    #[test]
    fn test_external_test_package_is_ignored() {
        let vfs = MemoryVfs::new()
            .with_file("/p/a.go", "package p\n")
            .with_file("/p/example.go", "package p_test\n");
        assert_eq!(load_package(&vfs, Path::new("/p")).unwrap().name, "p");
    }

    #[test]
    fn test_directory_without_sources() {
        let vfs = MemoryVfs::new().with_file("/p/README.md", "# p\n");
        assert!(matches!(
            load_package(&vfs, Path::new("/p")),
            Err(LoadError::NoPackage(_))
        ));
    }

    #[test]
    fn test_conflicting_packages() {
        let vfs = MemoryVfs::new()
            .with_file("/p/a.go", "package alpha\n")
            .with_file("/p/b.go", "package beta\n");
        match load_package(&vfs, Path::new("/p")) {
            Err(LoadError::MultiplePackages { names, .. }) => assert_eq!(names, "alpha, beta"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors_propagate() {
        let vfs = MemoryVfs::new().with_file("/p/a.go", "package p\n\nfunc (\n");
        assert!(matches!(
            load_package(&vfs, Path::new("/p")),
            Err(LoadError::Parse(_))
        ));
    }
}
