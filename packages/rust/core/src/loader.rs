//! Rule repository loader.
//!
//! Reads the section index, the rule documents, and the top-level metadata
//! file of a skill directory. Any unreadable or malformed rule aborts the
//! whole load; there are no partial results.

use std::path::{Path, PathBuf};

use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

use agentsdoc_markdown::{parse_frontmatter, parse_sections};
use agentsdoc_shared::{
    AgentsDocError, DocumentMetadata, Result, RuleDocument, SectionDescriptor, collate,
};

/// Keep markdown files not reserved for control documents, in collation order.
pub fn rule_file_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = names
        .into_iter()
        .map(Into::into)
        .filter(|name| name.ends_with(".md") && !name.starts_with('_'))
        .collect();
    names.sort_by(|a, b| collate(a, b));
    names
}

/// Load and parse every rule document in `rules_dir`.
///
/// Files are read concurrently, then parsed in collation order so the first
/// failure reported is deterministic.
#[instrument(skip_all, fields(rules_dir = %rules_dir.display()))]
pub async fn load_rules(rules_dir: &Path) -> Result<Vec<RuleDocument>> {
    let names = rule_file_names(list_file_names(rules_dir).await?);

    let mut reads = JoinSet::new();
    for (index, name) in names.iter().enumerate() {
        let path = rules_dir.join(name);
        reads.spawn(async move {
            let content = tokio::fs::read_to_string(&path).await;
            (index, path, content)
        });
    }

    let mut contents: Vec<Option<(PathBuf, std::io::Result<String>)>> =
        (0..names.len()).map(|_| None).collect();
    while let Some(joined) = reads.join_next().await {
        let (index, path, content) = joined
            .map_err(|e| AgentsDocError::io(rules_dir, std::io::Error::other(e)))?;
        contents[index] = Some((path, content));
    }

    let mut rules = Vec::with_capacity(names.len());
    for (name, slot) in names.into_iter().zip(contents) {
        let Some((path, content)) = slot else {
            continue;
        };
        let raw = content.map_err(|e| AgentsDocError::io(&path, e))?;
        let parsed =
            parse_frontmatter(&raw).map_err(|e| AgentsDocError::frontmatter(&path, e))?;

        debug!(file = %name, keys = parsed.metadata.len(), "loaded rule");
        rules.push(RuleDocument {
            file_name: name,
            path,
            metadata: parsed.metadata,
            body: parsed.body,
        });
    }

    info!(count = rules.len(), "rules loaded");
    Ok(rules)
}

/// Read and parse the section index.
#[instrument(skip_all, fields(path = %sections_path.display()))]
pub async fn load_sections(
    sections_path: &Path,
    default_impact: &str,
) -> Result<Vec<SectionDescriptor>> {
    let raw = tokio::fs::read_to_string(sections_path)
        .await
        .map_err(|e| AgentsDocError::io(sections_path, e))?;

    let sections = parse_sections(&raw, default_impact);
    info!(count = sections.len(), "sections loaded");
    Ok(sections)
}

/// Read the top-level document metadata (`metadata.json`).
pub async fn load_metadata(metadata_path: &Path) -> Result<DocumentMetadata> {
    let raw = tokio::fs::read_to_string(metadata_path)
        .await
        .map_err(|e| AgentsDocError::io(metadata_path, e))?;

    serde_json::from_str(&raw).map_err(|e| {
        AgentsDocError::parse(format!("invalid {}: {e}", metadata_path.display()))
    })
}

async fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AgentsDocError::io(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AgentsDocError::io(dir, e))?
    {
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{rule_doc, setup_usage_skill, temp_dir, write};
    use agentsdoc_shared::FrontmatterError;

    #[test]
    fn filters_and_sorts_names() {
        let names = rule_file_names([
            "usage-run.md",
            "_sections.md",
            "README.txt",
            "Setup-install.md",
            "setup-configure.md",
        ]);
        assert_eq!(
            names,
            vec!["setup-configure.md", "Setup-install.md", "usage-run.md"]
        );
    }

    #[tokio::test]
    async fn loads_rules_in_collation_order() {
        let root = setup_usage_skill();
        let rules = load_rules(&root.join("rules")).await.unwrap();

        let names: Vec<&str> = rules.iter().map(|r| r.identifier()).collect();
        assert_eq!(
            names,
            vec!["setup-configure.md", "setup-install.md", "usage-run.md"]
        );
        assert_eq!(rules[0].title(), Some("Configure"));
        assert_eq!(rules[0].section(), Some("setup"));
        assert_eq!(rules[0].body, "\nEdit the config.\n");

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn malformed_rule_aborts_load() {
        let root = temp_dir("loader");
        write(&root, "rules/a.md", &rule_doc("A", "setup", "Fine."));
        write(&root, "rules/b.md", "---\ntitle: B\nno closing delimiter\n");

        let err = load_rules(&root.join("rules")).await.unwrap_err();
        match err {
            AgentsDocError::Frontmatter { path, source } => {
                assert!(path.ends_with("b.md"));
                assert_eq!(source, FrontmatterError::MissingClosingDelimiter);
            }
            other => panic!("unexpected error: {other}"),
        }

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn empty_rules_dir_loads_nothing() {
        let root = temp_dir("loader");
        write(&root, "rules/_sections.md", "## 1. Setup (setup)\n");

        let rules = load_rules(&root.join("rules")).await.unwrap();
        assert!(rules.is_empty());

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn missing_rules_dir_is_io_error() {
        let root = temp_dir("loader");
        let err = load_rules(&root.join("rules")).await.unwrap_err();
        assert!(matches!(err, AgentsDocError::Io { .. }));
        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn loads_sections_and_metadata() {
        let root = setup_usage_skill();

        let sections = load_sections(&root.join("rules/_sections.md"), "UNSPECIFIED")
            .await
            .unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, "setup");

        let metadata = load_metadata(&root.join("metadata.json")).await.unwrap();
        assert_eq!(metadata.version, "1.0.0");
        assert_eq!(metadata.references, vec!["https://docs.example.com"]);

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn invalid_metadata_json_is_parse_error() {
        let root = temp_dir("loader");
        write(&root, "metadata.json", "{ not json");
        let err = load_metadata(&root.join("metadata.json")).await.unwrap_err();
        assert!(matches!(err, AgentsDocError::Parse { .. }));
        std::fs::remove_dir_all(&root).ok();
    }
}
