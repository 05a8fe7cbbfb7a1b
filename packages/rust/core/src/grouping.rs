//! Grouping and ordering of rules into sections.
//!
//! Sections keep the order they were given in (the index parser already
//! sorts them by number). Rules join their section through the `section`
//! metadata key; a rule naming an unknown section is left out here and is
//! reported by the validator instead.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use agentsdoc_markdown::anchor_from_heading;
use agentsdoc_shared::{RuleDocument, SectionDescriptor, collate};

/// A rule placed at a fixed position within its section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRule<'a> {
    pub rule: &'a RuleDocument,
    /// `<section>.<position> <title>`, positions starting at 1.
    pub heading: String,
    pub anchor: String,
}

/// A section with its ordered member rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedSection<'a> {
    pub section: &'a SectionDescriptor,
    /// `<number>. <title>`.
    pub heading: String,
    pub anchor: String,
    pub rules: Vec<GroupedRule<'a>>,
}

/// Group `rules` under `sections`, ordering each section's rules by title.
///
/// Every section appears in the output, including ones with no rules.
/// Title ties fall back to the file name so the result does not depend on
/// the order rules were passed in.
#[instrument(skip_all, fields(rules = rules.len(), sections = sections.len()))]
pub fn group_by_section<'a>(
    rules: &'a [RuleDocument],
    sections: &'a [SectionDescriptor],
) -> Vec<GroupedSection<'a>> {
    let mut buckets: HashMap<&str, Vec<&RuleDocument>> = HashMap::new();
    for rule in rules {
        if let Some(section) = rule.section() {
            buckets.entry(section).or_default().push(rule);
        }
    }

    let mut grouped = Vec::with_capacity(sections.len());
    for section in sections {
        let mut members = buckets.get(section.id.as_str()).cloned().unwrap_or_default();
        members.sort_by(|a, b| {
            collate(a.display_title(), b.display_title())
                .then_with(|| collate(a.identifier(), b.identifier()))
        });

        let rules = members
            .into_iter()
            .enumerate()
            .map(|(i, rule)| {
                let heading = format!("{}.{} {}", section.number, i + 1, rule.display_title());
                GroupedRule {
                    anchor: anchor_from_heading(&heading),
                    heading,
                    rule,
                }
            })
            .collect::<Vec<_>>();

        debug!(section = %section.id, rules = rules.len(), "grouped section");

        let heading = section.heading();
        grouped.push(GroupedSection {
            anchor: anchor_from_heading(&heading),
            heading,
            section,
            rules,
        });
    }

    for rule in rules {
        let known = rule
            .section()
            .is_some_and(|id| sections.iter().any(|s| s.id == id));
        if !known {
            warn!(
                file = %rule.identifier(),
                section = rule.section().unwrap_or_default(),
                "rule has no declared section, leaving it out"
            );
        }
    }

    grouped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
