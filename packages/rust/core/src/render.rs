//! Composed document renderer.
//!
//! Output layout, in order: title, version block, notice, abstract, table of
//! contents, one body section per grouped section, and an optional
//! references list. Rule bodies are embedded with only surrounding whitespace
//! trimmed. The same inputs always produce byte-identical output.

use tracing::{debug, instrument};

use agentsdoc_shared::{DocumentMetadata, RenderConfig};

use crate::grouping::GroupedSection;

/// Render the composed document.
///
/// `options` supplies the fixed title, the notice lines, and the abstract
/// used when `metadata` has none.
#[instrument(skip_all, fields(sections = grouped.len()))]
pub fn render_document(
    metadata: &DocumentMetadata,
    grouped: &[GroupedSection<'_>],
    options: &RenderConfig,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    push_header(&mut lines, metadata, options);
    push_toc(&mut lines, grouped);
    push_body(&mut lines, grouped);
    push_references(&mut lines, &metadata.references);

    let mut out = lines.join("\n");
    out.push('\n');

    debug!(bytes = out.len(), "document rendered");
    out
}

fn push_header(lines: &mut Vec<String>, metadata: &DocumentMetadata, options: &RenderConfig) {
    lines.push(format!("# {}", options.title));
    lines.push(String::new());
    lines.push(format!("**Version {}**  ", metadata.version));
    lines.push(format!("{}  ", metadata.organization));
    lines.push(metadata.date.clone());
    lines.push(String::new());

    if !options.notice.is_empty() {
        for line in &options.notice {
            lines.push(format!("> {line}"));
        }
        lines.push(String::new());
    }

    lines.push("---".into());
    lines.push(String::new());
    lines.push("## Abstract".into());
    lines.push(String::new());

    let abstract_text = metadata
        .abstract_text
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(options.default_abstract.as_str());
    lines.push(abstract_text.to_string());
    lines.push(String::new());
    lines.push("---".into());
    lines.push(String::new());
}

fn push_toc(lines: &mut Vec<String>, grouped: &[GroupedSection<'_>]) {
    lines.push("## Table of Contents".into());
    lines.push(String::new());

    for group in grouped {
        let section = group.section;
        lines.push(format!(
            "{}. [{}](#{}) - **{}**",
            section.number, section.title, group.anchor, section.impact
        ));

        for (i, entry) in group.rules.iter().enumerate() {
            lines.push(format!(
                "   - {}.{} [{}](#{})",
                section.number,
                i + 1,
                entry.rule.display_title(),
                entry.anchor
            ));
        }
    }

    lines.push(String::new());
    lines.push("---".into());
    lines.push(String::new());
}

fn push_body(lines: &mut Vec<String>, grouped: &[GroupedSection<'_>]) {
    for group in grouped {
        let section = group.section;

        lines.push(format!("## {}", group.heading));
        lines.push(String::new());
        lines.push(format!("**Impact: {}**", section.impact));
        lines.push(String::new());

        if !section.description.is_empty() {
            lines.push(section.description.clone());
            lines.push(String::new());
        }

        for entry in &group.rules {
            let meta = &entry.rule.metadata;
            lines.push(format!("### {}", entry.heading));
            lines.push(String::new());
            lines.push(format!(
                "Source: [{}]({})",
                meta.get_str("sourcePath").unwrap_or_default(),
                meta.get_str("sourceUrl").unwrap_or_default()
            ));
            lines.push(String::new());
            lines.push(entry.rule.body.trim().to_string());
            lines.push(String::new());
        }

        lines.push("---".into());
        lines.push(String::new());
    }
}

fn push_references(lines: &mut Vec<String>, references: &[String]) {
    if references.is_empty() {
        return;
    }

    lines.push("## References".into());
    lines.push(String::new());
    for (i, reference) in references.iter().enumerate() {
        lines.push(format!("{}. [{reference}]({reference})", i + 1));
    }
    lines.push(String::new());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
