use std::collections::HashMap;
use std::fs;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glob::{MatchOptions, Pattern};

/// Virtual File System trait
///
/// Abstraction over the file operations the loader and the CLI need, so
/// package discovery and alias generation can run against:
/// - the OS file system
/// - an in-memory file system (tests)
pub trait Vfs: Send + Sync {
    /// Read a file to a string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write a string to a file, creating parent directories
    fn write_from_string(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Resolve a glob pattern to a list of paths; `*` does not cross `/`
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// OS File System implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct OsVfs;

impl Vfs for OsVfs {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
    }

    fn write_from_string(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in glob::glob_with(pattern, separator_aware()).map_err(|e| Error::new(ErrorKind::InvalidInput, e))? {
            paths.push(entry.map_err(|e| Error::other(e.to_string()))?);
        }
        Ok(paths)
    }
}

/// In-Memory File System implementation (for testing)
#[derive(Clone, Default, Debug)]
pub struct MemoryVfs {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryVfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.lock().insert(path.into(), content.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Vfs for MemoryVfs {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.lock()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("{} not found", path.display())))
    }

    fn write_from_string(&self, path: &Path, content: &str) -> Result<()> {
        self.lock().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().keys().any(|k| k.starts_with(path) && k != path)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = Pattern::new(pattern).map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
        let mut matches: Vec<_> = self
            .lock()
            .keys()
            .filter(|path| pattern.matches_path_with(path, separator_aware()))
            .cloned()
            .collect();
        matches.sort();
        Ok(matches)
    }
}

fn separator_aware() -> MatchOptions {
    MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    }
}
