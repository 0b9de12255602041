use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name of the index inside the data directory.
pub const INDEX_FILE_NAME: &str = "search-index.json";

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "DOCFIND_DATA_DIR";

/// Where docfind keeps its built search index.
///
/// `build` writes `search-index.json` here by default and `search`,
/// `status` and `mcp` read it back, unless a command is given an
/// explicit index path.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Resolve and create the data directory. The first of these wins:
    /// `--data-dir`, `$DOCFIND_DATA_DIR`, then `$XDG_DATA_HOME/docfind`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = match explicit {
            Some(path) => path.to_path_buf(),
            None => locate()?,
        };
        std::fs::create_dir_all(&root)
            .map_err(|_| Error::DataDir(root.clone()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Default location of the search index.
    pub fn index_file(&self) -> PathBuf {
        self.root.join(INDEX_FILE_NAME)
    }

    /// The index path to use: `explicit` if given, else the default.
    pub fn index_file_or(&self, explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(|| self.index_file(), Path::to_path_buf)
    }
}

fn locate() -> Result<PathBuf> {
    if let Some(val) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(val));
    }
    xdg::BaseDirectories::with_prefix("docfind")
        .get_data_home()
        .ok_or_else(|| {
            Error::Config("could not determine XDG data home directory".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_with_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = DataDir::resolve(Some(tmp.path())).unwrap();

        assert_eq!(dir.root(), tmp.path());
        assert_eq!(dir.index_file(), tmp.path().join("search-index.json"));
    }

    #[test]
    fn resolve_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        let dir = DataDir::resolve(Some(&nested)).unwrap();
        assert!(dir.root().is_dir());
    }

    #[test]
    fn explicit_index_overrides_default() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = DataDir::resolve(Some(tmp.path())).unwrap();
        let custom = tmp.path().join("custom.json");

        assert_eq!(dir.index_file_or(Some(&custom)), custom);
        assert_eq!(dir.index_file_or(None), dir.index_file());
    }
}
