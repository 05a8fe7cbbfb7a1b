//! Frontmatter block parsing and rendering.
//!
//! Accepted shape:
//!
//! ```text
//! ---
//! title: "Models"
//! section: project-files
//! tags: ['rill', 'reference']
//! ---
//! <body>
//! ```
//!
//! Each metadata line is split on its first `:`. A value wrapped in `[...]`
//! is a list of comma-separated items; anything else is a scalar. One layer
//! of matching `'` or `"` quotes is stripped from scalars and list items.
//! Lines without a colon are ignored.

use agentsdoc_shared::{FrontmatterError, MetaValue, Metadata, ParsedDocument};

const OPENING: &str = "---\n";
const CLOSING: &str = "\n---\n";

/// Split raw rule text into its metadata block and body.
///
/// The body is returned verbatim (not trimmed).
pub fn parse_frontmatter(raw: &str) -> Result<ParsedDocument, FrontmatterError> {
    let rest = raw
        .strip_prefix(OPENING)
        .ok_or(FrontmatterError::MissingOpeningDelimiter)?;

    let end = rest
        .find(CLOSING)
        .ok_or(FrontmatterError::MissingClosingDelimiter)?;

    let block = &rest[..end];
    let body = &rest[end + CLOSING.len()..];

    let mut metadata = Metadata::new();
    for line in block.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        metadata.insert(key.trim(), parse_value(value));
    }

    Ok(ParsedDocument {
        metadata,
        body: body.to_string(),
    })
}

/// Lenient variant for upstream documents that may carry no frontmatter:
/// a missing or unterminated block yields empty metadata and the whole text
/// as body.
pub fn split_frontmatter_lenient(raw: &str) -> ParsedDocument {
    parse_frontmatter(raw).unwrap_or_else(|_| ParsedDocument {
        metadata: Metadata::new(),
        body: raw.to_string(),
    })
}

fn parse_value(raw: &str) -> MetaValue {
    let value = raw.trim();

    if let Some(inside) = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
    {
        let inside = inside.trim();
        if inside.is_empty() {
            return MetaValue::List(Vec::new());
        }
        return MetaValue::List(
            inside
                .split(',')
                .map(|item| strip_quotes(item.trim()).to_string())
                .collect(),
        );
    }

    MetaValue::Scalar(strip_quotes(value).to_string())
}

/// Remove one layer of matching surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render metadata as a frontmatter block, delimiters included.
///
/// Scalars are written bare when they contain only path/URL-safe characters
/// and double-quoted otherwise; list items are single-quoted. The result
/// re-parses to the same metadata as long as no value contains a line break
/// and no list item contains a comma.
pub fn render_frontmatter(metadata: &Metadata) -> String {
    let mut out = String::from(OPENING);
    if metadata.is_empty() {
        // The closing delimiter needs its own leading line break.
        out.push('\n');
    }
    for (key, value) in metadata.iter() {
        out.push_str(key);
        out.push_str(": ");
        match value {
            MetaValue::Scalar(s) => out.push_str(&render_scalar(s)),
            MetaValue::List(items) => {
                let joined = items
                    .iter()
                    .map(|item| format!("'{item}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push('[');
                out.push_str(&joined);
                out.push(']');
            }
        }
        out.push('\n');
    }
    out.push_str("---\n");
    out
}

fn render_scalar(value: &str) -> String {
    if is_bare_safe(value) {
        value.to_string()
    } else {
        format!("\"{value}\"")
    }
}

fn is_bare_safe(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | ':' | '~' | '%' | '?' | '&' | '=' | '+' | '-')
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> MetaValue {
        MetaValue::List(items.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn parses_scalars_lists_and_body() {
        let raw = "---\ntitle: \"Models\"\nsection: project-files\ntags: ['rill', 'reference']\n---\n\n# Models\n\nText.\n";
        let doc = parse_frontmatter(raw).unwrap();

        assert_eq!(doc.metadata.get_str("title"), Some("Models"));
        assert_eq!(doc.metadata.get_str("section"), Some("project-files"));
        assert_eq!(doc.metadata.get("tags"), Some(&list(&["rill", "reference"])));
        assert_eq!(doc.body, "\n# Models\n\nText.\n");
    }

    #[test]
    fn mixed_quote_list() {
        let doc = parse_frontmatter("---\nk: [a, 'b', \"c\"]\n---\n").unwrap();
        assert_eq!(doc.metadata.get("k"), Some(&list(&["a", "b", "c"])));
    }

    #[test]
    fn empty_brackets_are_empty_list() {
        let doc = parse_frontmatter("---\ntags: [ ]\n---\nbody").unwrap();
        assert_eq!(doc.metadata.get("tags"), Some(&MetaValue::List(vec![])));
    }

    #[test]
    fn value_keeps_everything_after_first_colon() {
        let doc = parse_frontmatter("---\nsourceUrl: https://docs.rilldata.com/x\n---\n").unwrap();
        assert_eq!(
            doc.metadata.get_str("sourceUrl"),
            Some("https://docs.rilldata.com/x")
        );
    }

    #[test]
    fn only_matching_quotes_are_stripped() {
        let doc = parse_frontmatter("---\na: 'x\"\nb: \"'y'\"\n---\n").unwrap();
        assert_eq!(doc.metadata.get_str("a"), Some("'x\""));
        assert_eq!(doc.metadata.get_str("b"), Some("'y'"));
    }

    #[test]
    fn lines_without_colon_and_blank_lines_are_ignored() {
        let doc = parse_frontmatter("---\n\njust text\ntitle: T\n   \n---\nbody").unwrap();
        assert_eq!(doc.metadata.len(), 1);
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn arbitrary_keys_are_preserved() {
        let doc = parse_frontmatter("---\nowner: data-team\npriority: 3\n---\n").unwrap();
        assert_eq!(doc.metadata.get_str("owner"), Some("data-team"));
        assert_eq!(doc.metadata.get_str("priority"), Some("3"));
    }

    #[test]
    fn missing_opening_delimiter() {
        for raw in ["title: x\n---\n", "", "--- \ntitle: x\n---\n", "\n---\ntitle: x\n---\n", "---"] {
            assert_eq!(
                parse_frontmatter(raw),
                Err(FrontmatterError::MissingOpeningDelimiter),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn missing_closing_delimiter() {
        assert_eq!(
            parse_frontmatter("---\ntitle: x\nbody without end"),
            Err(FrontmatterError::MissingClosingDelimiter)
        );
        // Closing marker must be followed by a line break.
        assert_eq!(
            parse_frontmatter("---\ntitle: x\n---"),
            Err(FrontmatterError::MissingClosingDelimiter)
        );
    }

    #[test]
    fn closing_delimiter_is_first_occurrence() {
        let doc = parse_frontmatter("---\na: 1\n---\nbody\n---\nmore\n").unwrap();
        assert_eq!(doc.body, "body\n---\nmore\n");
    }

    #[test]
    fn lenient_split_keeps_whole_text() {
        let doc = split_frontmatter_lenient("# Heading\n\nText.\n");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "# Heading\n\nText.\n");
    }

    #[test]
    fn render_then_parse_preserves_metadata() {
        let mut meta = Metadata::new();
        meta.insert("title", "Metrics View YAML: \"Reference\"");
        meta.insert("section", "project-files");
        meta.insert("sourcePath", "docs/docs/reference/project-files/model.md");
        meta.insert("sourceUrl", "https://docs.rilldata.com/reference/project-files/model");
        meta.insert("padded", "  spaced  ");
        meta.insert("empty", "");
        meta.insert("bracketed", "[not a list]");
        meta.insert("tags", vec!["rill".to_string(), "it's".to_string(), " x ".to_string()]);
        meta.insert("none", Vec::<String>::new());

        let rendered = render_frontmatter(&meta);
        let reparsed = parse_frontmatter(&rendered).unwrap();
        assert_eq!(reparsed.metadata, meta);
        assert_eq!(reparsed.body, "");
    }

    #[test]
    fn empty_block_survives_render_and_parse() {
        let parsed = parse_frontmatter("---\n\n---\nbody").unwrap();
        assert!(parsed.metadata.is_empty());

        let rendered = render_frontmatter(&parsed.metadata);
        assert_eq!(rendered, "---\n\n---\n");
        let reparsed = parse_frontmatter(&rendered).unwrap();
        assert_eq!(reparsed.metadata, parsed.metadata);
    }

    #[test]
    fn parsed_text_round_trips_through_render() {
        let raw = "---\ntitle: 'Metrics: views'\nsection: project-files\ntags: [rill, \"yaml\"]\n---\nBody.\n";
        let parsed = parse_frontmatter(raw).unwrap();

        let rendered = render_frontmatter(&parsed.metadata);
        let reparsed = parse_frontmatter(&format!("{rendered}{}", parsed.body)).unwrap();
        assert_eq!(reparsed, parsed);
    }

    #[test]
    fn render_quotes_only_when_needed() {
        let mut meta = Metadata::new();
        meta.insert("title", "Models");
        meta.insert("heading", "Metrics View");
        meta.insert("tags", vec!["a".to_string(), "b".to_string()]);

        assert_eq!(
            render_frontmatter(&meta),
            "---\ntitle: Models\nheading: \"Metrics View\"\ntags: ['a', 'b']\n---\n"
        );
    }
}
