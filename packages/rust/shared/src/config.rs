//! Application configuration for agentsdoc.
//!
//! User config lives at `~/.agentsdoc/agentsdoc.toml`.
//! CLI flags override environment variables, which override config file
//! values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AgentsDocError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "agentsdoc.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".agentsdoc";

// ---------------------------------------------------------------------------
// Config structs (matching agentsdoc.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory layout defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Fixed text and fallbacks used when composing the document.
    #[serde(default)]
    pub render: RenderConfig,

    /// Upstream sources for `agentsdoc sync`.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Skill directory holding `rules/`, the metadata file and the output.
    #[serde(default = "default_skill_dir")]
    pub skill_dir: String,

    /// Rules subdirectory name.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,

    /// Section index file name inside the rules directory.
    #[serde(default = "default_sections_file")]
    pub sections_file: String,

    /// Top-level metadata file name inside the skill directory.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Composed output file name inside the skill directory.
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            skill_dir: default_skill_dir(),
            rules_dir: default_rules_dir(),
            sections_file: default_sections_file(),
            metadata_file: default_metadata_file(),
            output_file: default_output_file(),
        }
    }
}

fn default_skill_dir() -> String {
    "skills/rilldata".into()
}
fn default_rules_dir() -> String {
    "rules".into()
}
fn default_sections_file() -> String {
    "_sections.md".into()
}
fn default_metadata_file() -> String {
    "metadata.json".into()
}
fn default_output_file() -> String {
    "AGENTS.md".into()
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Document title line (without the leading `#`).
    #[serde(default = "default_title")]
    pub title: String,

    /// Blockquote lines emitted after the version block.
    #[serde(default = "default_notice")]
    pub notice: Vec<String>,

    /// Abstract used when the metadata file has none.
    #[serde(default = "default_abstract")]
    pub default_abstract: String,

    /// Impact label for sections whose index entry has no `**Impact:**` line.
    #[serde(default = "default_impact")]
    pub default_impact: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            notice: default_notice(),
            default_abstract: default_abstract(),
            default_impact: default_impact(),
        }
    }
}

fn default_title() -> String {
    "Rill - Compiled Agent Guide".into()
}
fn default_notice() -> Vec<String> {
    vec![
        "This document is generated from modular rule files for AI agents.".into(),
        "It focuses on Rill project file authoring and operational workflows.".into(),
    ]
}
fn default_abstract() -> String {
    "Rill reference for AI agents.".into()
}
fn default_impact() -> String {
    "UNSPECIFIED".into()
}

/// `[sync]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Local checkout of the upstream documentation repository.
    #[serde(default = "default_source_repo")]
    pub source_repo: String,

    /// Source groups, processed in order.
    #[serde(default = "default_sources")]
    pub sources: Vec<SyncSource>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_repo: default_source_repo(),
            sources: default_sources(),
        }
    }
}

fn default_source_repo() -> String {
    "/tmp/rill-repo".into()
}

/// `[[sync.sources]]` entry: one group of upstream markdown files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSource {
    /// Section id written into every generated rule.
    pub section: String,

    /// Prefix for generated rule file names.
    #[serde(default)]
    pub stem_prefix: String,

    /// Replace `_` with `-` in generated file stems.
    #[serde(default)]
    pub hyphenate: bool,

    /// Explicit repo-relative files to import.
    #[serde(default)]
    pub files: Vec<String>,

    /// Repo-relative directory whose `.md` files are imported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Source URL template; `{path}` is the repo-relative path and `{slug}`
    /// is empty for `index` files and `/<stem>` otherwise.
    pub url_template: String,

    /// Tags written into every generated rule.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_sources() -> Vec<SyncSource> {
    let runtime_files = [
        "development.md",
        "resources/canvas.md",
        "resources/connector.md",
        "resources/explore.md",
        "resources/metrics_view.md",
        "resources/model.md",
        "resources/rillyaml.md",
        "resources/theme.md",
    ];

    vec![
        SyncSource {
            section: "runtime".into(),
            stem_prefix: "runtime-".into(),
            hyphenate: true,
            files: runtime_files
                .iter()
                .map(|f| format!("runtime/ai/instructions/data/{f}"))
                .collect(),
            dir: None,
            url_template: "https://github.com/rilldata/rill/blob/main/{path}".into(),
            tags: tags(&["rill", "runtime", "instructions", "product-usage"]),
        },
        SyncSource {
            section: "project-files".into(),
            stem_prefix: "project-files-".into(),
            hyphenate: false,
            files: Vec::new(),
            dir: Some("docs/docs/reference/project-files".into()),
            url_template: "https://docs.rilldata.com/reference/project-files{slug}".into(),
            tags: tags(&["rill", "project-files", "reference", "product-usage"]),
        },
    ]
}

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.agentsdoc/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AgentsDocError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.agentsdoc/agentsdoc.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AgentsDocError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        AgentsDocError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| AgentsDocError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AgentsDocError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AgentsDocError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("skill_dir"));
        assert!(toml_str.contains("UNSPECIFIED"));
        assert!(toml_str.contains("url_template"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.output_file, "AGENTS.md");
        assert_eq!(parsed.render.default_impact, "UNSPECIFIED");
        assert_eq!(parsed.sync.sources.len(), 2);
        assert_eq!(parsed.sync.sources[0].files.len(), 8);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
skill_dir = "/tmp/skill"

[render]
title = "Custom Guide"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.skill_dir, "/tmp/skill");
        assert_eq!(config.defaults.rules_dir, "rules");
        assert_eq!(config.render.title, "Custom Guide");
        assert_eq!(config.render.default_abstract, "Rill reference for AI agents.");
        assert_eq!(config.sync.source_repo, "/tmp/rill-repo");
    }

    #[test]
    fn custom_sync_sources_replace_defaults() {
        let toml_str = r#"
[sync]
source_repo = "/src/docs"

[[sync.sources]]
section = "guides"
dir = "guides"
url_template = "https://example.com/guides{slug}"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.sync.sources.len(), 1);
        let source = &config.sync.sources[0];
        assert_eq!(source.section, "guides");
        assert!(source.files.is_empty());
        assert!(!source.hyphenate);
        assert!(source.tags.is_empty());
    }

    #[test]
    fn load_config_from_reports_bad_toml() {
        let path = std::env::temp_dir().join(format!(
            "agentsdoc-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[defaults\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
        std::fs::remove_file(&path).ok();
    }
}
