//! Front matter extraction and validation.
//!
//! A content document starts with a YAML block fenced by `---` lines,
//! followed by the Markdown body:
//!
//! ```text
//! ---
//! title: Getting Started
//! audience: users
//! category: onboarding
//! ---
//! # Welcome
//! ```

use serde::Deserialize;
use serde_yaml::Value;

use crate::record::{Audience, DocType};

/// Validated document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub description: Option<String>,
    pub audience: Audience,
    pub category: Option<String>,
    pub doc_type: Option<DocType>,
}

/// Why a document's metadata was rejected.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("no front matter block")]
    Missing,

    #[error("malformed front matter: {0}")]
    Malformed(#[from] serde_yaml::Error),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be a scalar value")]
    NotScalar { field: &'static str },

    #[error("{0}")]
    Invalid(String),
}

/// Metadata keys as they appear in the file. `module` and `surface`
/// are older names for `category`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontMatter {
    title: Option<Value>,
    description: Option<Value>,
    audience: Option<Value>,
    category: Option<Value>,
    module: Option<Value>,
    surface: Option<Value>,
    #[serde(rename = "type")]
    doc_type: Option<Value>,
}

/// Split a document into its front matter block and body.
///
/// Returns `None` if the document does not open with a `---` fence or
/// the fence is never closed.
pub fn split(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let first_end = source.find('\n').unwrap_or(source.len());
    if source[..first_end].trim_end() != "---" {
        return None;
    }

    let block_start = (first_end + 1).min(source.len());
    let mut offset = block_start;
    for line in source[block_start..].split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let block = &source[block_start..offset];
            let body = &source[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

/// Parse and validate a front matter block.
pub fn parse(block: &str) -> Result<FrontMatter, FrontMatterError> {
    // An empty block deserializes as YAML null.
    let raw: RawFrontMatter = if block.trim().is_empty() {
        RawFrontMatter::default()
    } else {
        serde_yaml::from_str(block)?
    };

    let title = scalar("title", raw.title.as_ref())?
        .ok_or(FrontMatterError::MissingField("title"))?;

    let audience = scalar("audience", raw.audience.as_ref())?
        .ok_or(FrontMatterError::MissingField("audience"))?
        .parse::<Audience>()
        .map_err(FrontMatterError::Invalid)?;

    let description = scalar("description", raw.description.as_ref())?;

    let category = match scalar("category", raw.category.as_ref())? {
        Some(c) => Some(c),
        None => match scalar("module", raw.module.as_ref())? {
            Some(m) => Some(m),
            None => scalar("surface", raw.surface.as_ref())?,
        },
    };

    let doc_type = scalar("type", raw.doc_type.as_ref())?
        .map(|t| t.parse::<DocType>())
        .transpose()
        .map_err(FrontMatterError::Invalid)?;

    Ok(FrontMatter {
        title,
        description,
        audience,
        category,
        doc_type,
    })
}

/// Extract a non-blank scalar as a trimmed string. Nulls and blank
/// strings count as absent.
fn scalar(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<String>, FrontMatterError> {
    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(_) => return Err(FrontMatterError::NotScalar { field }),
    };
    Ok((!text.is_empty()).then_some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_basic() {
        let doc = "---\ntitle: A\naudience: users\n---\n# Body\ntext\n";
        let (block, body) = split(doc).unwrap();
        assert_eq!(block, "title: A\naudience: users\n");
        assert_eq!(body, "# Body\ntext\n");
    }

    #[test]
    fn split_handles_crlf_and_bom() {
        let doc = "\u{feff}---\r\ntitle: A\r\n---\r\nbody";
        let (block, body) = split(doc).unwrap();
        assert_eq!(block, "title: A\r\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn split_without_fence() {
        assert!(split("# Just markdown\n").is_none());
        assert!(split("").is_none());
    }

    #[test]
    fn split_unterminated_fence() {
        assert!(split("---\ntitle: A\n# no closing fence\n").is_none());
    }

    #[test]
    fn split_empty_body() {
        let (block, body) = split("---\ntitle: A\n---").unwrap();
        assert_eq!(block, "title: A\n");
        assert_eq!(body, "");
    }

    #[test]
    fn parse_minimal() {
        let fm = parse("title: Getting Started\naudience: users\n").unwrap();
        assert_eq!(fm.title, "Getting Started");
        assert_eq!(fm.audience, Audience::Users);
        assert_eq!(fm.description, None);
        assert_eq!(fm.category, None);
        assert_eq!(fm.doc_type, None);
    }

    #[test]
    fn parse_full() {
        let fm = parse(
            "title: Deploy\ndescription: Ship it\naudience: operators\n\
             category: platform\ntype: how-to\n",
        )
        .unwrap();
        assert_eq!(fm.description.as_deref(), Some("Ship it"));
        assert_eq!(fm.category.as_deref(), Some("platform"));
        assert_eq!(fm.doc_type, Some(DocType::HowTo));
    }

    #[test]
    fn module_and_surface_alias_category() {
        let fm = parse("title: A\naudience: users\nmodule: billing\n").unwrap();
        assert_eq!(fm.category.as_deref(), Some("billing"));

        let fm = parse("title: A\naudience: users\nsurface: console\n").unwrap();
        assert_eq!(fm.category.as_deref(), Some("console"));

        let fm = parse(
            "title: A\naudience: users\ncategory: main\nmodule: legacy\n",
        )
        .unwrap();
        assert_eq!(fm.category.as_deref(), Some("main"));
    }

    #[test]
    fn missing_audience_rejected() {
        let err = parse("title: A\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField("audience")));
    }

    #[test]
    fn blank_title_rejected() {
        let err = parse("title: '  '\naudience: users\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField("title")));
    }

    #[test]
    fn unknown_audience_rejected() {
        let err = parse("title: A\naudience: aliens\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Invalid(_)));
    }

    #[test]
    fn unknown_type_rejected() {
        let err = parse("title: A\naudience: users\ntype: cookbook\n")
            .unwrap_err();
        assert!(matches!(err, FrontMatterError::Invalid(_)));
    }

    #[test]
    fn malformed_yaml_rejected() {
        let err = parse("title: [unclosed\naudience: users\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Malformed(_)));
    }

    #[test]
    fn non_scalar_rejected() {
        let err = parse("title:\n  nested: true\naudience: users\n")
            .unwrap_err();
        assert!(matches!(err, FrontMatterError::NotScalar { field: "title" }));
    }

    #[test]
    fn numeric_title_is_accepted() {
        let fm = parse("title: 2024\naudience: users\n").unwrap();
        assert_eq!(fm.title, "2024");
    }

    #[test]
    fn extra_keys_are_ignored() {
        let fm = parse("title: A\naudience: users\ntags: [a, b]\n").unwrap();
        assert_eq!(fm.title, "A");
    }
}
