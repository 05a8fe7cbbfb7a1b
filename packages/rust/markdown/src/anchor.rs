//! Heading anchors.
//!
//! Mirrors the GitHub-style slug used by markdown renderers, so table of
//! contents links written as `#anchor` resolve to the rendered heading.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is not a lowercase letter, digit, whitespace or hyphen.
static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("anchor strip regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("anchor whitespace regex"));

/// Compute the link anchor for a heading's literal text.
///
/// `"1.2 Metrics View (YAML)"` → `"12-metrics-view-yaml"`.
pub fn anchor_from_heading(heading: &str) -> String {
    let lowered = heading.to_lowercase();
    let stripped = STRIP_RE.replace_all(&lowered, "");
    WHITESPACE_RE
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_and_rule_headings() {
        assert_eq!(anchor_from_heading("1. Setup"), "1-setup");
        assert_eq!(
            anchor_from_heading("2.3 Metrics View (YAML)"),
            "23-metrics-view-yaml"
        );
    }

    #[test]
    fn keeps_hyphens_and_collapses_whitespace() {
        assert_eq!(anchor_from_heading("  Project  -  Files\t"), "project---files");
        assert_eq!(anchor_from_heading("rill.yaml & theme"), "rillyaml-theme");
    }

    #[test]
    fn idempotent_on_heading_text() {
        let heading = "3.1 Connector: `s3` / GCS";
        assert_eq!(anchor_from_heading(heading), anchor_from_heading(heading));
    }

    #[test]
    fn case_and_punctuation_do_not_matter() {
        assert_eq!(
            anchor_from_heading("1.1 Getting Started!"),
            anchor_from_heading("1.1 getting started?")
        );
        assert_eq!(
            anchor_from_heading("Models (SQL)"),
            anchor_from_heading("MODELS SQL")
        );
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(anchor_from_heading("Café Guide"), "caf-guide");
    }
}
