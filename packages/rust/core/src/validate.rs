//! Repository validator.
//!
//! Checks the loaded rules and sections for structural and cross-reference
//! problems. Every check runs independently and all findings are collected;
//! nothing here fails early.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use agentsdoc_shared::{RuleDocument, SectionDescriptor};

/// Frontmatter keys every rule must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["title", "section", "sourcePath", "sourceUrl"];

/// Absolute secure URL.
static SECURE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://").expect("secure url regex"));

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("No sections found in {index}")]
    NoSections { index: String },

    #[error("No rule files found in {rules_dir}/")]
    NoRules { rules_dir: String },

    #[error("{file}: missing '{key}' in frontmatter")]
    MissingField { file: String, key: &'static str },

    #[error("{file}: '{key}' must be a single value")]
    NotScalar { file: String, key: &'static str },

    #[error("{file}: empty body")]
    EmptyBody { file: String },

    #[error("{file}: section '{section}' not declared in {index}")]
    UndeclaredSection {
        file: String,
        section: String,
        index: String,
    },

    #[error("{file}: sourceUrl must be an absolute https URL")]
    InsecureSourceUrl { file: String },

    #[error("section number {number} declared by both '{first}' and '{second}'")]
    DuplicateSectionNumber {
        number: u32,
        first: String,
        second: String,
    },

    #[error("section id '{id}' declared more than once")]
    DuplicateSectionId { id: String },
}

/// Outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub rule_count: usize,
    pub section_count: usize,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// One-line summary for a passing run.
    pub fn summary(&self) -> String {
        format!(
            "Validation passed: {} rules across {} sections.",
            self.rule_count, self.section_count
        )
    }
}

/// Check rules and sections.
///
/// `index` and `rules_dir` are display labels used in messages
/// (e.g. `rules/_sections.md` and `rules`).
#[instrument(skip_all, fields(rules = rules.len(), sections = sections.len()))]
pub fn validate(
    rules: &[RuleDocument],
    sections: &[SectionDescriptor],
    index: &str,
    rules_dir: &str,
) -> ValidationReport {
    let mut violations = Vec::new();

    if sections.is_empty() {
        violations.push(Violation::NoSections {
            index: index.to_string(),
        });
    }
    if rules.is_empty() {
        violations.push(Violation::NoRules {
            rules_dir: rules_dir.to_string(),
        });
    }

    check_sections(sections, &mut violations);

    for rule in rules {
        check_rule(rule, sections, index, &mut violations);
    }

    debug!(violations = violations.len(), "validation finished");

    ValidationReport {
        violations,
        rule_count: rules.len(),
        section_count: sections.len(),
    }
}

fn check_sections(sections: &[SectionDescriptor], violations: &mut Vec<Violation>) {
    let mut numbers: HashMap<u32, &str> = HashMap::new();
    let mut ids: HashMap<&str, usize> = HashMap::new();

    for section in sections {
        if let Some(first) = numbers.get(&section.number) {
            violations.push(Violation::DuplicateSectionNumber {
                number: section.number,
                first: (*first).to_string(),
                second: section.id.clone(),
            });
        } else {
            numbers.insert(section.number, &section.id);
        }

        let seen = ids.entry(section.id.as_str()).or_default();
        *seen += 1;
        if *seen == 2 {
            violations.push(Violation::DuplicateSectionId {
                id: section.id.clone(),
            });
        }
    }
}

fn check_rule(
    rule: &RuleDocument,
    sections: &[SectionDescriptor],
    index: &str,
    violations: &mut Vec<Violation>,
) {
    let file = rule.identifier();
    let meta = &rule.metadata;

    for key in REQUIRED_KEYS {
        let missing = match meta.get(key) {
            None => true,
            Some(value) => value.as_str().is_some_and(str::is_empty),
        };
        if missing {
            violations.push(Violation::MissingField {
                file: file.to_string(),
                key,
            });
        }
    }

    if rule.body.trim().is_empty() {
        violations.push(Violation::EmptyBody {
            file: file.to_string(),
        });
    }

    if let Some(value) = meta.get("section") {
        match value.as_str() {
            Some("") => {}
            Some(section) => {
                if !sections.iter().any(|s| s.id == section) {
                    violations.push(Violation::UndeclaredSection {
                        file: file.to_string(),
                        section: section.to_string(),
                        index: index.to_string(),
                    });
                }
            }
            None => violations.push(Violation::NotScalar {
                file: file.to_string(),
                key: "section",
            }),
        }
    }

    if let Some(value) = meta.get("sourceUrl") {
        match value.as_str() {
            Some("") => {}
            Some(url) => {
                if !SECURE_URL_RE.is_match(url) {
                    violations.push(Violation::InsecureSourceUrl {
                        file: file.to_string(),
                    });
                }
            }
            None => violations.push(Violation::NotScalar {
                file: file.to_string(),
                key: "sourceUrl",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
