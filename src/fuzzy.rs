//! Approximate substring matching over weighted record fields.
//!
//! Each field is matched with a semi-global edit distance: the best
//! distance between the query and *any* substring of the field, so a
//! match deep inside a long body costs the same as one at the start.
//! A field score is `distance / query_len` in `[0, 1]`; the record score
//! multiplies `field_score ^ weight` over the fields that matched, which
//! keeps a heavier field ahead of a lighter one at equal distance.

use crate::record::IndexRecord;

/// A searchable record field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Description,
    Content,
    Category,
}

impl SearchField {
    /// All fields, heaviest first.
    pub const ALL: [SearchField; 4] = [
        SearchField::Title,
        SearchField::Description,
        SearchField::Content,
        SearchField::Category,
    ];

    /// Relative weight. Title > description > content > category.
    pub fn weight(self) -> f64 {
        match self {
            SearchField::Title => 1.0,
            SearchField::Description => 0.75,
            SearchField::Content => 0.5,
            SearchField::Category => 0.25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Description => "description",
            SearchField::Content => "content",
            SearchField::Category => "category",
        }
    }

    /// The field's value on a record, if present.
    pub fn value(self, record: &IndexRecord) -> Option<&str> {
        match self {
            SearchField::Title => Some(record.title.as_str()),
            SearchField::Description => record.description.as_deref(),
            SearchField::Content => Some(record.content.as_str()),
            SearchField::Category => record.category.as_deref(),
        }
    }
}

/// Matching tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// 0.0 accepts exact substrings only, 1.0 accepts anything.
    pub threshold: f64,
    /// Shortest query, and shortest highlighted range, that counts.
    pub min_match_char_length: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            min_match_char_length: 2,
        }
    }
}

/// One field's contribution to a hit.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHit {
    pub field: SearchField,
    pub score: f64,
    /// Inclusive char ranges into the field value.
    pub indices: Vec<(usize, usize)>,
}

/// A record that matched a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Position of the record in the collection the backend was built on.
    pub record: usize,
    /// Combined score in `[0, 1]`, lower is better.
    pub score: f64,
    pub fields: Vec<FieldHit>,
}

/// A matching structure built once over a record collection.
///
/// Implementations must be immutable after construction so one instance
/// can serve concurrent queries.
pub trait MatchBackend: Send + Sync {
    /// Match `query` against every record. Hits are returned in record
    /// order; ranking is the caller's job.
    fn find(&self, query: &str) -> Vec<Hit>;

    /// Number of records the backend was built over.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The default backend: case-insensitive edit-distance matching over
/// pre-folded field text.
#[derive(Debug)]
pub struct FuzzyMatcher {
    config: MatchConfig,
    /// Folded chars per record, indexed like `SearchField::ALL`.
    entries: Vec<[Option<Vec<char>>; 4]>,
}

impl FuzzyMatcher {
    pub fn build(records: &[IndexRecord], config: MatchConfig) -> Self {
        let config = MatchConfig {
            threshold: config.threshold.clamp(0.0, 1.0),
            ..config
        };
        let entries = records
            .iter()
            .map(|record| {
                SearchField::ALL.map(|field| {
                    field
                        .value(record)
                        .filter(|v| !v.is_empty())
                        .map(fold)
                })
            })
            .collect();
        Self { config, entries }
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }
}

impl MatchBackend for FuzzyMatcher {
    fn find(&self, query: &str) -> Vec<Hit> {
        let pattern = fold(query.trim());
        if pattern.is_empty()
            || pattern.len() < self.config.min_match_char_length
        {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for (idx, fields) in self.entries.iter().enumerate() {
            let mut score = 1.0;
            let mut field_hits = Vec::new();

            for (field, text) in SearchField::ALL.iter().zip(fields) {
                let Some(text) = text else { continue };
                let Some(m) = match_field(&pattern, text, &self.config)
                else {
                    continue;
                };
                score *= m.score.max(f64::EPSILON).powf(field.weight());
                field_hits.push(FieldHit {
                    field: *field,
                    score: m.score,
                    indices: m.indices,
                });
            }

            if !field_hits.is_empty() {
                hits.push(Hit {
                    record: idx,
                    score,
                    fields: field_hits,
                });
            }
        }
        hits
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Result of matching one pattern against one text.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    pub distance: usize,
    pub score: f64,
    pub indices: Vec<(usize, usize)>,
}

/// Match `pattern` against every substring of `text`.
///
/// Returns `None` when the best distance exceeds the threshold.
pub fn match_field(
    pattern: &[char],
    text: &[char],
    config: &MatchConfig,
) -> Option<FieldMatch> {
    let m = pattern.len();
    if m == 0 {
        return None;
    }
    let max_errors = (config.threshold * m as f64).floor() as usize;

    // cost[i]: best distance of pattern[..i] against a substring ending
    // at the current text position; start[i]: where that substring begins.
    let mut cost: Vec<usize> = (0..=m).collect();
    let mut start: Vec<usize> = vec![0; m + 1];
    let mut next_cost = vec![0; m + 1];
    let mut next_start = vec![0; m + 1];

    let mut best = m;
    // (distance, begin, end) for every alignment within the allowance.
    let mut candidates: Vec<(usize, usize, usize)> = Vec::new();

    for (j, &t) in text.iter().enumerate() {
        next_cost[0] = 0;
        next_start[0] = j + 1;

        for i in 1..=m {
            let sub = cost[i - 1] + usize::from(pattern[i - 1] != t);
            let skip_text = cost[i] + 1;
            let skip_pattern = next_cost[i - 1] + 1;

            if sub <= skip_text && sub <= skip_pattern {
                next_cost[i] = sub;
                next_start[i] = start[i - 1];
            } else if skip_text <= skip_pattern {
                next_cost[i] = skip_text;
                next_start[i] = start[i];
            } else {
                next_cost[i] = skip_pattern;
                next_start[i] = next_start[i - 1];
            }
        }

        std::mem::swap(&mut cost, &mut next_cost);
        std::mem::swap(&mut start, &mut next_start);

        if cost[m] <= max_errors {
            best = best.min(cost[m]);
            candidates.push((cost[m], start[m], j));
        }
    }

    let score = best as f64 / m as f64;
    if best > max_errors || score > config.threshold {
        return None;
    }

    // Highlight only the alignments that achieve the best distance.
    let mut indices = Vec::new();
    for (distance, begin, end) in candidates {
        // An all-deletion alignment covers no text.
        if distance == best
            && begin <= end
            && end + 1 - begin >= config.min_match_char_length
        {
            push_range(&mut indices, (begin, end));
        }
    }

    Some(FieldMatch {
        distance: best,
        score,
        indices,
    })
}

/// Append a range, merging it into earlier ranges it overlaps or touches.
fn push_range(ranges: &mut Vec<(usize, usize)>, mut range: (usize, usize)) {
    // Ends arrive in increasing order, but starts can move backwards.
    while let Some(&(start, end)) = ranges.last() {
        if range.0 > end + 1 {
            break;
        }
        ranges.pop();
        range = (start.min(range.0), end.max(range.1));
    }
    ranges.push(range);
}

/// Case-fold text one char at a time so indices line up with the
/// original string's chars.
pub fn fold(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Audience;

    fn chars(s: &str) -> Vec<char> {
        fold(s)
    }

    fn record(id: &str, title: &str, content: &str) -> IndexRecord {
        IndexRecord {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            content: content.to_string(),
            route: format!("/{id}"),
            audience: Audience::Users,
            category: None,
            doc_type: None,
        }
    }

    #[test]
    fn exact_substring_scores_zero() {
        let m = match_field(
            &chars("start"),
            &chars("Getting Started"),
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(m.distance, 0);
        assert_eq!(m.score, 0.0);
        assert_eq!(m.indices, vec![(8, 12)]);
    }

    #[test]
    fn one_typo_within_threshold() {
        let m = match_field(
            &chars("gettnig"),
            &chars("getting started"),
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(m.distance, 2);
        assert!(m.score <= 0.3);
    }

    #[test]
    fn too_many_errors_rejected() {
        let result = match_field(
            &chars("kubernetes"),
            &chars("getting started"),
            &MatchConfig::default(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn zero_threshold_is_exact_only() {
        let config = MatchConfig {
            threshold: 0.0,
            ..MatchConfig::default()
        };
        assert!(match_field(&chars("setup"), &chars("the setup"), &config)
            .is_some());
        assert!(match_field(&chars("setpu"), &chars("the setup"), &config)
            .is_none());
    }

    #[test]
    fn full_threshold_matches_anything() {
        let config = MatchConfig {
            threshold: 1.0,
            ..MatchConfig::default()
        };
        assert!(match_field(&chars("zz"), &chars("abc"), &config).is_some());
    }

    #[test]
    fn location_does_not_matter() {
        let config = MatchConfig::default();
        let near = match_field(&chars("deploy"), &chars("deploy now"), &config)
            .unwrap();
        let far_text = format!("{} deploy", "filler ".repeat(500));
        let far =
            match_field(&chars("deploy"), &chars(&far_text), &config).unwrap();
        assert_eq!(near.score, far.score);
    }

    #[test]
    fn case_insensitive() {
        let m = match_field(
            &chars("GETTING"),
            &chars("getting started"),
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(m.distance, 0);
    }

    #[test]
    fn push_range_merges_overlaps() {
        let mut ranges = Vec::new();
        push_range(&mut ranges, (2, 4));
        push_range(&mut ranges, (3, 5));
        push_range(&mut ranges, (9, 10));
        push_range(&mut ranges, (1, 11));
        assert_eq!(ranges, vec![(1, 11)]);
    }

    #[test]
    fn short_query_matches_nothing() {
        let records = vec![record("a", "A guide", "a b c")];
        let matcher = FuzzyMatcher::build(&records, MatchConfig::default());
        assert!(matcher.find("a").is_empty());
        assert!(matcher.find("   ").is_empty());
    }

    #[test]
    fn title_outranks_content_at_equal_distance() {
        let records = vec![
            record("body", "Overview", "learn about deployment here"),
            record("head", "Deployment", "nothing relevant"),
        ];
        let matcher = FuzzyMatcher::build(&records, MatchConfig::default());
        let hits = matcher.find("deployment");
        assert_eq!(hits.len(), 2);
        let body = hits.iter().find(|h| h.record == 0).unwrap();
        let head = hits.iter().find(|h| h.record == 1).unwrap();
        assert!(head.score < body.score);
    }

    #[test]
    fn hits_report_matching_fields() {
        let records = vec![record("a", "Install", "how to install things")];
        let matcher = FuzzyMatcher::build(&records, MatchConfig::default());
        let hits = matcher.find("install");
        assert_eq!(hits.len(), 1);
        let fields: Vec<_> = hits[0].fields.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec![SearchField::Title, SearchField::Content]);
    }

    #[test]
    fn empty_collection_has_no_hits() {
        let matcher = FuzzyMatcher::build(&[], MatchConfig::default());
        assert!(matcher.is_empty());
        assert!(matcher.find("anything").is_empty());
    }

    #[test]
    fn threshold_is_clamped() {
        let matcher = FuzzyMatcher::build(
            &[],
            MatchConfig {
                threshold: 7.0,
                min_match_char_length: 2,
            },
        );
        assert_eq!(matcher.config().threshold, 1.0);
    }
}
