//! Package discovery
//!
//! [`PackageFinder`] walks a directory tree on a blocking thread and streams
//! every directory holding a non-test `.go` file through a bounded channel.
//! The consumer pulls directories with [`Discovery::next`] and generates as
//! they arrive.
//!
//! Cancellation closes a shared channel; the walk notices before visiting
//! the next entry and ends with [`DiscoveryError::Cancelled`], so a cut-short
//! run is never mistaken for a complete one.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use goalias_go::{OsVfs, go_source_files};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("package discovery under {root} was cancelled")]
    Cancelled { root: PathBuf },

    #[error("package discovery task failed: {0}")]
    Task(String),
}

/// Closes the cancellation channel shared with a running discovery
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<Mutex<Option<mpsc::Sender<()>>>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let closed = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if closed.is_some() {
            debug!("package discovery cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Receiving end of the cancellation channel, polled by the walk
struct CancelSignal {
    receiver: mpsc::Receiver<()>,
}

impl CancelSignal {
    fn is_cancelled(&mut self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }
}

fn cancellation() -> (CancelHandle, CancelSignal) {
    let (sender, receiver) = mpsc::channel(1);
    (
        CancelHandle {
            sender: Arc::new(Mutex::new(Some(sender))),
        },
        CancelSignal { receiver },
    )
}

/// Finds Go package directories under a root
#[derive(Debug, Clone)]
pub struct PackageFinder {
    root: PathBuf,
    skip_dirs: Vec<String>,
    capacity: usize,
}

impl PackageFinder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skip_dirs: Vec::new(),
            capacity: 64,
        }
    }

    /// Directory names never descended into. Hidden directories and those
    /// starting with `_` are always skipped.
    pub fn with_skip_dirs(mut self, skip_dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.skip_dirs = skip_dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Start walking on a blocking thread.
    pub fn spawn(self) -> Discovery {
        let (packages_tx, packages_rx) = mpsc::channel(self.capacity);
        let (cancel, signal) = cancellation();
        let task = tokio::task::spawn_blocking(move || self.walk(packages_tx, signal));

        Discovery {
            packages: packages_rx,
            task,
            cancel,
        }
    }

    /// Walk to completion and collect every package directory.
    pub async fn collect(self) -> Result<Vec<PathBuf>, DiscoveryError> {
        let mut discovery = self.spawn();
        let mut found = Vec::new();
        while let Some(dir) = discovery.next().await {
            found.push(dir);
        }
        discovery.finish().await?;
        Ok(found)
    }

    fn walk(self, packages: mpsc::Sender<PathBuf>, mut signal: CancelSignal) -> Result<usize, DiscoveryError> {
        let mut found = 0;
        let entries = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped(entry));

        for entry in entries {
            if signal.is_cancelled() {
                return Err(DiscoveryError::Cancelled { root: self.root.clone() });
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() || !contains_package(entry.path()) {
                continue;
            }

            debug!(dir = %entry.path().display(), "found package");
            if packages.blocking_send(entry.into_path()).is_err() {
                // Receiver dropped before the walk finished
                return Err(DiscoveryError::Cancelled { root: self.root.clone() });
            }
            found += 1;
        }

        Ok(found)
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || name.starts_with('_') || self.skip_dirs.iter().any(|skip| *skip == name)
    }
}

fn contains_package(dir: &Path) -> bool {
    go_source_files(&OsVfs, dir).is_ok_and(|files| !files.is_empty())
}

/// A running discovery
pub struct Discovery {
    packages: mpsc::Receiver<PathBuf>,
    task: JoinHandle<Result<usize, DiscoveryError>>,
    cancel: CancelHandle,
}

impl Discovery {
    /// Next package directory, or `None` once the walk has ended
    pub async fn next(&mut self) -> Option<PathBuf> {
        self.packages.recv().await
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Wait for the walk to end and return the number of packages found.
    ///
    /// Call once [`Discovery::next`] returns `None`; directories still
    /// buffered are dropped and the walk reports `Cancelled`.
    pub async fn finish(self) -> Result<usize, DiscoveryError> {
        drop(self.packages);
        self.task
            .await
            .map_err(|err| DiscoveryError::Task(err.to_string()))?
    }
}
