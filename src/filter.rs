//! Facet filters applied after ranking.
//!
//! Each filter is a predicate over one record field. `None` passes the
//! list through unchanged; otherwise only matching results are kept, in
//! their original order. Because the predicates touch independent fields
//! they can be chained in any order with the same outcome.

use crate::{
    record::{Audience, DocType},
    search::SearchResult,
};

pub fn filter_by_audience<'a>(
    results: Vec<SearchResult<'a>>,
    audience: Option<Audience>,
) -> Vec<SearchResult<'a>> {
    match audience {
        None => results,
        Some(a) => results
            .into_iter()
            .filter(|r| r.record.audience == a)
            .collect(),
    }
}

pub fn filter_by_category<'a>(
    results: Vec<SearchResult<'a>>,
    category: Option<&str>,
) -> Vec<SearchResult<'a>> {
    match category {
        None => results,
        Some(c) => results
            .into_iter()
            .filter(|r| r.record.category.as_deref() == Some(c))
            .collect(),
    }
}

pub fn filter_by_type<'a>(
    results: Vec<SearchResult<'a>>,
    doc_type: Option<DocType>,
) -> Vec<SearchResult<'a>> {
    match doc_type {
        None => results,
        Some(t) => results
            .into_iter()
            .filter(|r| r.record.doc_type == Some(t))
            .collect(),
    }
}

/// A set of facet values to filter by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub audience: Option<Audience>,
    pub category: Option<String>,
    pub doc_type: Option<DocType>,
}

impl Facets {
    pub fn is_empty(&self) -> bool {
        self.audience.is_none()
            && self.category.is_none()
            && self.doc_type.is_none()
    }

    /// Apply every set facet.
    pub fn apply<'a>(
        &self,
        results: Vec<SearchResult<'a>>,
    ) -> Vec<SearchResult<'a>> {
        let results = filter_by_audience(results, self.audience);
        let results = filter_by_category(results, self.category.as_deref());
        filter_by_type(results, self.doc_type)
    }
}
