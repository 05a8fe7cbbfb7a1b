//! Build and validate pipelines over a skill directory.
//!
//! Section index and rules are loaded independently; `build` groups and
//! renders them into the output document, `check` runs the validator over
//! the same loaded data.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use agentsdoc_shared::{AgentsDocError, RenderConfig, Result};

use crate::grouping::group_by_section;
use crate::layout::SkillLayout;
use crate::loader::{load_metadata, load_rules, load_sections};
use crate::render::render_document;
use crate::validate::{ValidationReport, validate};

/// Output from a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub output_path: PathBuf,
    pub rule_count: usize,
    pub section_count: usize,
    /// Rules left out because their section is not declared.
    pub orphan_count: usize,
}

/// Build the composed document and write it to `layout.output_path`.
///
/// Nothing is written if any input fails to load.
#[instrument(skip_all, fields(skill_dir = %layout.skill_dir.display()))]
pub async fn build(layout: &SkillLayout, options: &RenderConfig) -> Result<BuildResult> {
    let (sections, rules) = tokio::try_join!(
        load_sections(&layout.sections_path, &options.default_impact),
        load_rules(&layout.rules_dir),
    )?;
    let metadata = load_metadata(&layout.metadata_path).await?;

    let grouped = group_by_section(&rules, &sections);
    let placed: usize = grouped.iter().map(|g| g.rules.len()).sum();
    let orphan_count = rules
        .iter()
        .filter(|r| {
            r.section()
                .is_none_or(|id| !sections.iter().any(|s| s.id == id))
        })
        .count();

    let output = render_document(&metadata, &grouped, options);
    write_atomic(&layout.output_path, &output).await?;

    info!(
        rules = rules.len(),
        placed,
        sections = sections.len(),
        path = %layout.output_path.display(),
        "document built"
    );

    Ok(BuildResult {
        output_path: layout.output_path.clone(),
        rule_count: rules.len(),
        section_count: sections.len(),
        orphan_count,
    })
}

/// Load the skill directory and validate it.
///
/// Structural failures (unreadable files, broken frontmatter) are returned
/// as errors; content problems are collected in the report.
#[instrument(skip_all, fields(skill_dir = %layout.skill_dir.display()))]
pub async fn check(layout: &SkillLayout, default_impact: &str) -> Result<ValidationReport> {
    let (sections, rules) = tokio::try_join!(
        load_sections(&layout.sections_path, default_impact),
        load_rules(&layout.rules_dir),
    )?;

    let index = layout.display_relative(&layout.sections_path);
    let rules_dir = layout.display_relative(&layout.rules_dir);
    let report = validate(&rules, &sections, &index, &rules_dir);

    info!(violations = report.violations.len(), "validation complete");
    Ok(report)
}

/// Write to a temp file beside `target`, then rename over it.
async fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AgentsDocError::config(format!("invalid output path {target:?}")))?;
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    tokio::fs::write(&temp, content)
        .await
        .map_err(|e| AgentsDocError::io(&temp, e))?;
    tokio::fs::rename(&temp, target)
        .await
        .map_err(|e| AgentsDocError::io(target, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
