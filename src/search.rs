use serde::Serialize;

use crate::{
    fuzzy::{FuzzyMatcher, MatchBackend, MatchConfig, SearchField},
    record::{Audience, DocType, IndexRecord},
};

/// Default number of results returned by a query.
pub const DEFAULT_LIMIT: usize = 10;

/// Query engine settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Match tolerance: 0.0 exact only, 1.0 anything.
    pub threshold: f64,
    /// Queries shorter than this return nothing.
    pub min_match_char_length: usize,
    /// Maximum number of results.
    pub limit: usize,
    /// Attach scores to results.
    pub include_score: bool,
    /// Attach per-field match ranges to results.
    pub include_matches: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        let config = MatchConfig::default();
        Self {
            threshold: config.threshold,
            min_match_char_length: config.min_match_char_length,
            limit: DEFAULT_LIMIT,
            include_score: true,
            include_matches: false,
        }
    }
}

impl SearchOptions {
    fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.threshold,
            min_match_char_length: self.min_match_char_length,
        }
    }
}

/// An immutable, queryable snapshot of a record collection.
///
/// Built once per load; share it behind an `Arc` and replace it wholesale
/// to pick up new content.
pub struct SearchHandle {
    records: Vec<IndexRecord>,
    backend: Box<dyn MatchBackend>,
    options: SearchOptions,
}

impl SearchHandle {
    /// Build a handle with the default fuzzy backend.
    pub fn new(records: Vec<IndexRecord>, options: SearchOptions) -> Self {
        let backend = FuzzyMatcher::build(&records, options.match_config());
        Self::with_backend(records, Box::new(backend), options)
    }

    /// Build a handle around a backend that was built over `records`.
    pub fn with_backend(
        records: Vec<IndexRecord>,
        backend: Box<dyn MatchBackend>,
        options: SearchOptions,
    ) -> Self {
        debug_assert_eq!(records.len(), backend.len());
        Self {
            records,
            backend,
            options,
        }
    }

    /// An empty handle; every query returns nothing.
    pub fn empty(options: SearchOptions) -> Self {
        Self::new(Vec::new(), options)
    }

    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Search with the options the handle was built with.
    pub fn search(&self, query: &str) -> Vec<SearchResult<'_>> {
        self.search_with(query, None)
    }

    /// Search, overriding the result limit.
    pub fn search_with(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Vec<SearchResult<'_>> {
        let query = query.trim();
        if query.is_empty() || self.records.is_empty() {
            return Vec::new();
        }

        let mut hits = self.backend.find(query);
        // Stable: equal scores keep record order.
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits.truncate(limit.unwrap_or(self.options.limit));

        hits.into_iter()
            .filter_map(|hit| {
                let record = self.records.get(hit.record)?;
                let matches = self.options.include_matches.then(|| {
                    hit.fields
                        .into_iter()
                        .filter_map(|f| {
                            let value = f.field.value(record)?;
                            Some(FieldMatch {
                                field: f.field,
                                value: value.to_string(),
                                indices: f.indices,
                            })
                        })
                        .collect()
                });
                Some(SearchResult {
                    record,
                    score: self.options.include_score.then_some(hit.score),
                    matches,
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for SearchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHandle")
            .field("records", &self.records.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A query match, borrowing its record from the handle.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<'a> {
    pub record: &'a IndexRecord,
    /// Lower is better; `None` when scoring is disabled.
    pub score: Option<f64>,
    /// Per-field highlight ranges; `None` unless requested.
    pub matches: Option<Vec<FieldMatch>>,
}

/// Which part of a field matched, for highlighting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMatch {
    pub field: SearchField,
    pub value: String,
    /// Inclusive char ranges into `value`.
    pub indices: Vec<(usize, usize)>,
}

/// Build a handle over `records` with default options.
pub fn create_index(records: Vec<IndexRecord>) -> SearchHandle {
    SearchHandle::new(records, SearchOptions::default())
}

/// Query a handle, optionally overriding its result limit.
pub fn search<'a>(
    handle: &'a SearchHandle,
    query: &str,
    limit: Option<usize>,
) -> Vec<SearchResult<'a>> {
    handle.search_with(query, limit)
}

/// The caller-facing shape of a result, as returned by the CLI and MCP
/// surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub route: String,
    pub audience: Audience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<FieldMatch>>,
}

impl From<&SearchResult<'_>> for ResultSummary {
    fn from(result: &SearchResult<'_>) -> Self {
        let r = result.record;
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            description: r.description.clone(),
            route: r.route.clone(),
            audience: r.audience,
            category: r.category.clone(),
            doc_type: r.doc_type,
            score: result.score,
            matches: result.matches.clone(),
        }
    }
}

/// Format results for human-readable terminal output.
pub fn format_human(results: &[SearchResult<'_>]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    for (i, r) in results.iter().enumerate() {
        let score = r
            .score
            .map(|s| format!("{s:.3}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. [{score}] {} ({})",
            i + 1,
            r.record.route,
            r.record.audience
        );
        println!("     {}", r.record.title);
        if let Some(ref desc) = r.record.description {
            println!("     {desc}");
        }
    }
    println!("\n{} result(s)", results.len());
}

/// Format results as JSON output.
pub fn format_json(
    results: &[SearchResult<'_>],
    query: &str,
) -> serde_json::Result<()> {
    let summaries: Vec<ResultSummary> =
        results.iter().map(ResultSummary::from).collect();
    let out = serde_json::json!({
        "query": query,
        "resultCount": summaries.len(),
        "results": summaries,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
