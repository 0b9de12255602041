//! A reloadable search handle.
//!
//! Queries take a snapshot `Arc<SearchHandle>` and run without holding
//! any lock. A reload builds a complete new handle first and only then
//! swaps the pointer, so in-flight queries finish on the old snapshot.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{
    builder,
    error::Result,
    search::{SearchHandle, SearchOptions},
};

pub struct LiveIndex {
    path: PathBuf,
    options: SearchOptions,
    current: RwLock<Arc<SearchHandle>>,
}

impl LiveIndex {
    /// Load the index file at `path`.
    ///
    /// A missing, unreadable, or corrupt file is not fatal: the index
    /// starts empty and every query returns no results until a reload
    /// succeeds.
    pub fn open(path: &Path, options: SearchOptions) -> Self {
        let handle = match builder::load_index(path) {
            Ok(records) => {
                tracing::info!(path = %path.display(), records = records.len(), "index loaded");
                SearchHandle::new(records, options)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "starting with an empty index: {e}");
                SearchHandle::empty(options)
            }
        };

        Self {
            path: path.to_path_buf(),
            options,
            current: RwLock::new(Arc::new(handle)),
        }
    }

    /// Wrap an already built handle. `reload` reads from `path`.
    pub fn from_handle(path: &Path, handle: SearchHandle) -> Self {
        Self {
            path: path.to_path_buf(),
            options: *handle.options(),
            current: RwLock::new(Arc::new(handle)),
        }
    }

    /// The handle queries should run against.
    pub fn current(&self) -> Arc<SearchHandle> {
        self.current.read().clone()
    }

    /// Re-read the index file and swap in a fresh handle.
    ///
    /// On error the previous handle stays in place. Returns the new
    /// record count.
    pub fn reload(&self) -> Result<usize> {
        let records = builder::load_index(&self.path)?;
        let handle = Arc::new(SearchHandle::new(records, self.options));
        let count = handle.len();
        *self.current.write() = handle;
        tracing::info!(path = %self.path.display(), records = count, "index reloaded");
        Ok(count)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for LiveIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveIndex")
            .field("path", &self.path)
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}
