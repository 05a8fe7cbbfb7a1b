//! Section index parser.
//!
//! The index (`rules/_sections.md`) declares sections as level-2 headings:
//!
//! ```text
//! ## 1. Project Files (project-files)
//!
//! **Impact:** HIGH
//!
//! **Description:** Reference for every project file type.
//! ```
//!
//! The document is cut into blocks at every `## <n>. ` line. A block whose
//! first line is not a full `## <n>. <title> (<id>)` header is skipped.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use agentsdoc_shared::SectionDescriptor;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Start of a section block.
static BLOCK_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s+\d+\.\s+").expect("block start regex"));

/// Full header line: `## <number>. <title> (<id>)`.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+(\d+)\.\s+(.+?)\s+\(([^)]+)\)\s*$").expect("section header regex")
});

/// `**Impact:** <rest of line>`.
static IMPACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\*\*Impact:\*\*[ \t]+(.+)$").expect("impact regex"));

/// `**Description:** <rest of block>`.
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\*\*Description:\*\*\s+(.+)$").expect("description regex")
});

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse the section index into descriptors sorted by `number`.
///
/// `default_impact` is used for sections without an `**Impact:**` line.
/// Sections sharing a number keep their document order.
pub fn parse_sections(raw: &str, default_impact: &str) -> Vec<SectionDescriptor> {
    let starts: Vec<usize> = BLOCK_START_RE.find_iter(raw).map(|m| m.start()).collect();

    let mut sections = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(raw.len());
        let block = &raw[start..end];

        match parse_block(block, default_impact) {
            Some(section) => {
                debug!(number = section.number, id = %section.id, "parsed section");
                sections.push(section);
            }
            None => {
                let header = block.lines().next().unwrap_or_default();
                warn!(header, "skipping section block with malformed header");
            }
        }
    }

    sections.sort_by_key(|s| s.number);
    sections
}

fn parse_block(block: &str, default_impact: &str) -> Option<SectionDescriptor> {
    let header = block.lines().next()?;
    let caps = HEADER_RE.captures(header)?;
    let number = caps[1].parse::<u32>().ok()?;

    let impact = IMPACT_RE
        .captures(block)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_impact.to_string());

    let description = DESCRIPTION_RE
        .captures(block)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    Some(SectionDescriptor {
        number,
        title: caps[2].trim().to_string(),
        id: caps[3].trim().to_string(),
        impact,
        description,
    })
}
