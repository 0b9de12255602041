use std::path::{Component, Path};

/// A stable document identifier derived from a path relative to the
/// content root.
///
/// The primary form drops the file extension (`guides/setup.md` becomes
/// `guides/setup`). When two sources collapse onto the same primary id,
/// the full relative path is used instead, which is unique on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate the primary id for a relative path.
    pub fn new(relative_path: &Path) -> Self {
        let mut segments = path_segments(relative_path);
        if let Some(last) = segments.last_mut() {
            *last = strip_extension(last).to_string();
        }
        Self(segments.join("/"))
    }

    /// Generate the collision fallback id, keeping the extension.
    pub fn with_extension(relative_path: &Path) -> Self {
        Self(path_segments(relative_path).join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the navigable route for a relative path.
///
/// The extension is stripped, a trailing `index` segment collapses to its
/// parent, and the result is prefixed with `/`.
pub fn derive_route(relative_path: &Path) -> String {
    let mut segments = path_segments(relative_path);
    if let Some(last) = segments.last_mut() {
        *last = strip_extension(last).to_string();
    }
    if segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }
    format!("/{}", segments.join("/"))
}

fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
