//! Regex-based Markdown/MDX stripping.
//!
//! This is not a Markdown parser. It removes enough structure that the
//! remaining text is useful for fuzzy matching.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*(```|~~~).*?^[ \t]*(```|~~~)[ \t]*$")
        .expect("valid regex")
});
static MDX_ESM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(import|export)\s.*$").expect("valid regex")
});
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9.\-]*(\s[^<>]*)?/?>")
        .expect("valid regex")
});
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("valid regex")
});
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex")
});
static REFERENCE_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\[[^\]]+\]:\s+\S.*$").expect("valid regex")
});
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]*)`").expect("valid regex"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").expect("valid regex")
});
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*>+[ \t]?").expect("valid regex"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*([-*+]|\d+[.)])[ \t]+").expect("valid regex")
});
static RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*([-*_][ \t]*){3,}$").expect("valid regex")
});
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\*{1,3}|_{2,3}|~~)").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Reduce a Markdown/MDX body to plain text.
pub fn strip_markup(body: &str) -> String {
    let text = FENCED_CODE.replace_all(body, " ");
    let text = MDX_ESM.replace_all(&text, " ");
    let text = HTML_COMMENT.replace_all(&text, " ");
    let text = HTML_TAG.replace_all(&text, " ");
    let text = IMAGE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = REFERENCE_DEF.replace_all(&text, " ");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = RULE.replace_all(&text, " ");
    let text = HEADING.replace_all(&text, "");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = LIST_MARKER.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_headings_and_emphasis() {
        let text = strip_markup("# Title\n\nSome **bold** and *italic* text.");
        assert_eq!(text, "Title Some bold and italic text.");
    }

    #[test]
    fn links_become_text() {
        let text = strip_markup("Read the [setup guide](/guides/setup).");
        assert_eq!(text, "Read the setup guide.");
    }

    #[test]
    fn images_become_alt_text() {
        let text = strip_markup("![Architecture diagram](./arch.png)");
        assert_eq!(text, "Architecture diagram");
    }

    #[test]
    fn removes_fenced_code() {
        let text = strip_markup(
            "Before\n\n```rust\nfn main() {}\n```\n\nAfter",
        );
        assert_eq!(text, "Before After");
    }

    #[test]
    fn unwraps_inline_code() {
        let text = strip_markup("Run `cargo build` first.");
        assert_eq!(text, "Run cargo build first.");
    }

    #[test]
    fn removes_lists_and_quotes() {
        let text = strip_markup("- one\n- two\n1. three\n> quoted");
        assert_eq!(text, "one two three quoted");
    }

    #[test]
    fn removes_jsx_and_imports() {
        let text = strip_markup(
            "import { Callout } from '../components'\n\n\
             <Callout type=\"warning\">Be careful</Callout>",
        );
        assert_eq!(text, "Be careful");
    }

    #[test]
    fn keeps_snake_case_words() {
        let text = strip_markup("Set max_connections to 10.");
        assert_eq!(text, "Set max_connections to 10.");
    }

    #[test]
    fn empty_body() {
        assert_eq!(strip_markup(""), "");
    }
}
