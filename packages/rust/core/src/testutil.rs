//! Fixtures shared by filesystem tests.

use std::path::{Path, PathBuf};

/// Fresh, unique directory under the system temp dir.
pub(crate) fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "agentsdoc-{label}-test-{}",
        uuid::Uuid::now_v7()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write `content` to `root/relative`, creating parent directories.
pub(crate) fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// A well-formed rule document.
pub(crate) fn rule_doc(title: &str, section: &str, body: &str) -> String {
    format!(
        "---\ntitle: \"{title}\"\nsection: {section}\nsourcePath: docs/{section}.md\nsourceUrl: https://docs.example.com/{section}\ntags: ['example']\n---\n\n{body}\n"
    )
}

pub(crate) const SETUP_USAGE_INDEX: &str = "\
# Sections

## 1. Setup (setup)

**Impact:** HIGH

**Description:** Installing and configuring the tool.

## 2. Usage (usage)

**Impact:** MEDIUM
";

pub(crate) const METADATA_JSON: &str = r#"{
  "version": "1.0.0",
  "organization": "Example Org",
  "date": "October 2026",
  "abstract": "How to use the example tool.",
  "references": ["https://docs.example.com"]
}"#;

/// Skill directory with two sections and three rules (two in `setup`).
pub(crate) fn setup_usage_skill() -> PathBuf {
    let root = temp_dir("skill");
    write(&root, "metadata.json", METADATA_JSON);
    write(&root, "rules/_sections.md", SETUP_USAGE_INDEX);
    write(&root, "rules/setup-install.md", &rule_doc("Install", "setup", "Run the installer."));
    write(&root, "rules/setup-configure.md", &rule_doc("Configure", "setup", "Edit the config."));
    write(&root, "rules/usage-run.md", &rule_doc("Run", "usage", "Start it."));
    root
}
