//! docfind - build-time search indexing and fuzzy querying for
//! documentation sites.
//!
//! The [`builder`] walks a content tree of Markdown/MDX files with YAML
//! front matter and produces a flat list of [`IndexRecord`]s, saved as a
//! JSON file. The query side loads that file into a [`SearchHandle`],
//! which answers weighted fuzzy queries over title, description, body
//! and category; [`filter`] narrows results by audience, category and
//! document type.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use docfind::{builder, filter, search, record::Audience};
//!
//! let records = builder::build_index(Path::new("content"));
//! builder::save_index(&records, Path::new("search-index.json")).unwrap();
//!
//! let records = builder::load_index(Path::new("search-index.json")).unwrap();
//! let handle = search::create_index(records);
//! let results = search::search(&handle, "getting started", None);
//! let results = filter::filter_by_audience(results, Some(Audience::Users));
//! for r in &results {
//!     println!("{} {:?}", r.record.route, r.score);
//! }
//! ```

pub mod builder;
pub mod cli;
pub mod data_dir;
pub mod doc_id;
pub mod error;
pub mod filter;
pub mod frontmatter;
pub mod fuzzy;
pub mod live;
pub mod markup;
pub mod mcp;
pub mod record;
pub mod search;
pub mod walker;

pub use data_dir::DataDir;
pub use doc_id::DocumentId;
pub use error::{Error, Result};
pub use live::LiveIndex;
pub use record::{Audience, DocType, IndexRecord};
pub use search::{SearchHandle, SearchOptions, SearchResult};
