//! Skill directory layout.

use std::path::{Path, PathBuf};

use agentsdoc_shared::DefaultsConfig;

/// Resolved paths for one skill directory.
///
/// ```text
/// <skill_dir>/
/// ├── metadata.json
/// ├── AGENTS.md          (written by `build`)
/// └── rules/
///     ├── _sections.md
///     └── *.md
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLayout {
    pub skill_dir: PathBuf,
    pub rules_dir: PathBuf,
    pub sections_path: PathBuf,
    pub metadata_path: PathBuf,
    pub output_path: PathBuf,
}

impl SkillLayout {
    pub fn new(skill_dir: impl Into<PathBuf>, defaults: &DefaultsConfig) -> Self {
        let skill_dir = skill_dir.into();
        let rules_dir = skill_dir.join(&defaults.rules_dir);
        Self {
            sections_path: rules_dir.join(&defaults.sections_file),
            metadata_path: skill_dir.join(&defaults.metadata_file),
            output_path: skill_dir.join(&defaults.output_file),
            rules_dir,
            skill_dir,
        }
    }

    /// Path shown in diagnostics, relative to the skill directory when possible.
    pub fn display_relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.skill_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let layout = SkillLayout::new("/work/skills/rilldata", &DefaultsConfig::default());
        assert_eq!(layout.rules_dir, PathBuf::from("/work/skills/rilldata/rules"));
        assert_eq!(
            layout.sections_path,
            PathBuf::from("/work/skills/rilldata/rules/_sections.md")
        );
        assert_eq!(
            layout.output_path,
            PathBuf::from("/work/skills/rilldata/AGENTS.md")
        );
        assert_eq!(
            layout.display_relative(&layout.sections_path),
            "rules/_sections.md"
        );
    }
}
