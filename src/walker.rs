use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// A discovered content document.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the content root directory.
    pub relative_path: PathBuf,
    /// Path as reached during the walk (symlinks not resolved).
    pub absolute_path: PathBuf,
}

/// Supported file extensions for document discovery.
const SUPPORTED_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Directory names that are never descended into.
static EXCLUDED_DIRS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "node_modules",
        "target",
        "dist",
        ".next",
        ".turbo",
        ".cache",
        ".git",
        ".svn",
        ".hg",
        "coverage",
        "__pycache__",
    ]
    .into_iter()
    .collect()
});

/// Returns true if a directory with this name is pruned from the walk.
pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(name) || name.starts_with('.')
}

/// Recursively walk a content root and discover document files.
///
/// Entries are visited depth-first in name order, so the result is
/// deterministic for a given tree. A missing root yields an empty list.
/// Unreadable subdirectories are logged and skipped. Symlinked
/// directories are followed at most once per canonical target, and only
/// after the real tree has been walked, so a page reachable both ways
/// keeps the route of its real location.
pub fn discover_files(root: &Path) -> Vec<DiscoveredFile> {
    let canonical_root = match root.canonicalize() {
        Ok(p) if p.is_dir() => p,
        Ok(_) => {
            tracing::warn!(root = %root.display(), "content root is not a directory");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "content root not found");
            return Vec::new();
        }
    };

    let mut visited = HashSet::new();
    visited.insert(canonical_root.clone());

    let mut walk = Walk {
        root: &canonical_root,
        visited,
        linked: Vec::new(),
        results: Vec::new(),
    };
    walk.dir(&canonical_root);
    // Links found inside linked trees are queued behind the current batch.
    while !walk.linked.is_empty() {
        let batch = std::mem::take(&mut walk.linked);
        for dir in batch {
            walk.descend(&dir);
        }
    }
    walk.results
}

struct Walk<'a> {
    root: &'a Path,
    visited: HashSet<PathBuf>,
    /// Symlinked directories, deferred until the real tree is done.
    linked: Vec<PathBuf>,
    results: Vec<DiscoveredFile>,
}

impl Walk<'_> {
    fn dir(&mut self, current: &Path) {
        let mut entries: Vec<_> = match std::fs::read_dir(current) {
            Ok(iter) => iter.filter_map(|e| e.ok()).collect(),
            Err(e) => {
                tracing::warn!(dir = %current.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            let path = entry.path();

            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if is_excluded_dir(&name) {
                    log_pruned(&name, &path);
                    continue;
                }
                self.descend(&path);
            } else if file_type.is_symlink() {
                // Broken symlinks fail to resolve and are skipped.
                let Ok(resolved) = path.canonicalize() else {
                    continue;
                };
                if resolved.is_dir() {
                    if is_excluded_dir(&name) {
                        log_pruned(&name, &path);
                        continue;
                    }
                    self.linked.push(path);
                } else if resolved.is_file()
                    && !name.starts_with('.')
                    && is_supported(&path)
                {
                    self.results.push(make_discovered(self.root, &path));
                }
            } else if file_type.is_file()
                && !name.starts_with('.')
                && is_supported(&path)
            {
                self.results.push(make_discovered(self.root, &path));
            }
        }
    }

    fn descend(&mut self, dir: &Path) {
        let canonical = match dir.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unresolvable directory");
                return;
            }
        };
        if !self.visited.insert(canonical) {
            tracing::debug!(dir = %dir.display(), "directory already visited");
            return;
        }
        self.dir(dir);
    }
}

fn log_pruned(name: &str, path: &Path) {
    if name.starts_with('.') {
        tracing::trace!(dir = %path.display(), "pruned");
    } else {
        tracing::debug!(dir = %path.display(), "pruned excluded directory");
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

fn make_discovered(root: &Path, path: &Path) -> DiscoveredFile {
    let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();

    DiscoveredFile {
        relative_path,
        absolute_path: path.to_path_buf(),
    }
}
