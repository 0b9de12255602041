use std::{
    collections::HashSet,
    io::Write,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::{
    doc_id::{DocumentId, derive_route},
    error::{Error, Result},
    frontmatter,
    markup,
    record::IndexRecord,
    walker::{self, DiscoveredFile},
};

/// Counts from one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Documents with a supported extension found by the walk.
    pub discovered: usize,
    /// Documents that became records.
    pub indexed: usize,
    /// Documents dropped for read, front matter, or validation errors.
    pub skipped: usize,
}

/// Build index records for every valid document under `content_root`.
///
/// A missing root yields an empty collection. Per-document failures are
/// logged and skipped.
pub fn build_index(content_root: &Path) -> Vec<IndexRecord> {
    build_index_with_report(content_root).0
}

/// Like [`build_index`], also returning build counts.
pub fn build_index_with_report(
    content_root: &Path,
) -> (Vec<IndexRecord>, BuildReport) {
    let files = walker::discover_files(content_root);

    // Read and parse in parallel; collect keeps traversal order.
    let parsed: Vec<Option<IndexRecord>> = files
        .par_iter()
        .map(|file| match load_record(file) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(path = %file.relative_path.display(), "skipping document: {e}");
                None
            }
        })
        .collect();

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(parsed.len());
    for (file, record) in files.iter().zip(parsed) {
        let Some(mut record) = record else { continue };
        if !seen.insert(record.id.clone()) {
            let fallback = unique_fallback(&mut seen, &file.relative_path);
            tracing::debug!(
                id = %record.id,
                fallback = %fallback,
                "id already taken, using full path"
            );
            record.id = fallback;
        }
        records.push(record);
    }

    let report = BuildReport {
        discovered: files.len(),
        indexed: records.len(),
        skipped: files.len() - records.len(),
    };
    tracing::info!(
        root = %content_root.display(),
        discovered = report.discovered,
        indexed = report.indexed,
        skipped = report.skipped,
        "index built"
    );
    (records, report)
}

/// The full-path id for a document whose primary id is taken. Lossy
/// file names can still collide, so a `~N` suffix is added until the id
/// is free.
fn unique_fallback(seen: &mut HashSet<String>, relative_path: &Path) -> String {
    let base = DocumentId::with_extension(relative_path).into_string();
    let mut candidate = base.clone();
    let mut n = 2;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{base}~{n}");
        n += 1;
    }
    candidate
}

/// Turn one discovered file into a record.
fn load_record(file: &DiscoveredFile) -> Result<IndexRecord> {
    let source = std::fs::read_to_string(&file.absolute_path)?;
    parse_document(&file.relative_path, &source)
}

/// Parse a document's source into a record.
pub fn parse_document(
    relative_path: &Path,
    source: &str,
) -> Result<IndexRecord> {
    let invalid = |reason: String| Error::invalid_document(relative_path, reason);

    let (block, body) = frontmatter::split(source).ok_or_else(|| {
        invalid(frontmatter::FrontMatterError::Missing.to_string())
    })?;
    let meta = frontmatter::parse(block).map_err(|e| invalid(e.to_string()))?;

    Ok(IndexRecord {
        id: DocumentId::new(relative_path).into_string(),
        title: meta.title,
        description: meta.description,
        content: markup::strip_markup(body),
        route: derive_route(relative_path),
        audience: meta.audience,
        category: meta.category,
        doc_type: meta.doc_type,
    })
}

/// Write `records` to `output_path` as a JSON array.
///
/// The file is written next to its destination and renamed into place,
/// so a failed write leaves any previous index untouched.
pub fn save_index(records: &[IndexRecord], output_path: &Path) -> Result<()> {
    let dir = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    serde_json::to_writer_pretty(&mut tmp, records)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(output_path)?;

    tracing::info!(path = %output_path.display(), records = records.len(), "index saved");
    Ok(())
}

/// Read an index file written by [`save_index`].
pub fn load_index(path: &Path) -> Result<Vec<IndexRecord>> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// What is on disk at an index path, for status reporting.
#[derive(Debug, Default)]
pub struct IndexStatus {
    pub exists: bool,
    pub records: Vec<IndexRecord>,
    /// Set when the file exists but could not be read or parsed.
    pub error: Option<String>,
}

/// Inspect an index file without failing on a missing or corrupt one.
pub fn inspect_index(path: &Path) -> IndexStatus {
    if !path.exists() {
        return IndexStatus::default();
    }
    match load_index(path) {
        Ok(records) => IndexStatus {
            exists: true,
            records,
            error: None,
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), "index unreadable: {e}");
            IndexStatus {
                exists: true,
                records: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
