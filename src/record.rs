//! The searchable unit emitted by the index builder and consumed by the
//! query engine.
//!
//! Records are serialized as a flat JSON array. Optional fields are
//! omitted when absent and unknown fields are ignored on read, so older
//! readers keep working against newer index files.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Stable identifier derived from the document's relative path.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Plain text body with markup stripped. Only used for matching.
    #[serde(default)]
    pub content: String,
    /// Navigable path for the document, always starting with `/`.
    pub route: String,
    pub audience: Audience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub doc_type: Option<DocType>,
}

/// The intended reader of a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[serde(alias = "user")]
    Users,
    #[serde(alias = "developer")]
    Developers,
    #[serde(alias = "operator")]
    Operators,
    #[serde(alias = "contributor")]
    Contributors,
}

impl Audience {
    pub const ALL: [Audience; 4] = [
        Audience::Users,
        Audience::Developers,
        Audience::Operators,
        Audience::Contributors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Audience::Users => "users",
            Audience::Developers => "developers",
            Audience::Operators => "operators",
            Audience::Contributors => "contributors",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users" | "user" => Ok(Audience::Users),
            "developers" | "developer" => Ok(Audience::Developers),
            "operators" | "operator" => Ok(Audience::Operators),
            "contributors" | "contributor" => Ok(Audience::Contributors),
            other => {
                let known: Vec<_> =
                    Audience::ALL.iter().map(|a| a.as_str()).collect();
                Err(format!(
                    "unrecognized audience '{other}' (expected one of: {})",
                    known.join(", ")
                ))
            }
        }
    }
}

/// The kind of document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DocType {
    Tutorial,
    #[serde(alias = "howto", alias = "how_to", alias = "guide")]
    HowTo,
    Reference,
    Explanation,
}

impl DocType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Tutorial => "tutorial",
            DocType::HowTo => "how-to",
            DocType::Reference => "reference",
            DocType::Explanation => "explanation",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tutorial" => Ok(DocType::Tutorial),
            "how-to" | "howto" | "how_to" | "guide" => Ok(DocType::HowTo),
            "reference" => Ok(DocType::Reference),
            "explanation" => Ok(DocType::Explanation),
            other => Err(format!("unrecognized document type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndexRecord {
        IndexRecord {
            id: "guides/setup".to_string(),
            title: "Setup".to_string(),
            description: None,
            content: "Install the tools.".to_string(),
            route: "/guides/setup".to_string(),
            audience: Audience::Developers,
            category: None,
            doc_type: Some(DocType::HowTo),
        }
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("category"));
        assert_eq!(obj["type"], "how-to");
        assert_eq!(obj["audience"], "developers");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "id": "a",
            "title": "A",
            "route": "/a",
            "audience": "users",
            "lastModified": "2024-01-01"
        }"#;
        let record: IndexRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "a");
        assert_eq!(record.description, None);
        assert_eq!(record.doc_type, None);
        assert!(record.content.is_empty());
    }

    #[test]
    fn audience_parses_aliases() {
        assert_eq!("Users".parse::<Audience>(), Ok(Audience::Users));
        assert_eq!("developer".parse::<Audience>(), Ok(Audience::Developers));
        assert!("managers".parse::<Audience>().is_err());
    }

    #[test]
    fn doc_type_parses_aliases() {
        assert_eq!("howto".parse::<DocType>(), Ok(DocType::HowTo));
        assert_eq!("how-to".parse::<DocType>(), Ok(DocType::HowTo));
        assert_eq!(" Reference ".parse::<DocType>(), Ok(DocType::Reference));
        assert!("cookbook".parse::<DocType>().is_err());
    }
}
