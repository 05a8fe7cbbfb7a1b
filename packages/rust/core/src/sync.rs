//! Rule synchronization from a local upstream checkout.
//!
//! Each configured source group names upstream markdown files (explicitly or
//! by directory). Every file is rewrapped as a rule document: a generated
//! frontmatter block, a provenance blockquote, then the upstream body.
//! Files whose content hash is unchanged are not rewritten.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};
use url::Url;

use agentsdoc_markdown::frontmatter::split_frontmatter_lenient;
use agentsdoc_markdown::render_frontmatter;
use agentsdoc_shared::{AgentsDocError, Metadata, Result, SyncSource, collate};

/// First level-1 heading.
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("H1 regex"));

/// Outcome for one source group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSyncResult {
    pub section: String,
    /// Rule files created or rewritten.
    pub written: Vec<String>,
    /// Rule files whose content already matched.
    pub unchanged: Vec<String>,
}

/// Outcome of a full sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    pub sources: Vec<SourceSyncResult>,
}

impl SyncResult {
    pub fn written_count(&self) -> usize {
        self.sources.iter().map(|s| s.written.len()).sum()
    }

    pub fn unchanged_count(&self) -> usize {
        self.sources.iter().map(|s| s.unchanged.len()).sum()
    }
}

/// A generated rule ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRule {
    pub file_name: String,
    pub content: String,
}

/// Sync every source group from `source_repo` into `rules_dir`.
#[instrument(skip_all, fields(source_repo = %source_repo.display(), rules_dir = %rules_dir.display()))]
pub async fn sync_rules(
    source_repo: &Path,
    rules_dir: &Path,
    sources: &[SyncSource],
) -> Result<SyncResult> {
    tokio::fs::create_dir_all(rules_dir)
        .await
        .map_err(|e| AgentsDocError::io(rules_dir, e))?;

    let mut result = SyncResult::default();
    for source in sources {
        let source_result = sync_source(source_repo, rules_dir, source).await?;
        info!(
            section = %source.section,
            written = source_result.written.len(),
            unchanged = source_result.unchanged.len(),
            "source synced"
        );
        result.sources.push(source_result);
    }

    Ok(result)
}

async fn sync_source(
    source_repo: &Path,
    rules_dir: &Path,
    source: &SyncSource,
) -> Result<SourceSyncResult> {
    let mut result = SourceSyncResult {
        section: source.section.clone(),
        ..SourceSyncResult::default()
    };

    for source_path in source_paths(source_repo, source).await? {
        let abs = source_repo.join(&source_path);
        let raw = tokio::fs::read_to_string(&abs)
            .await
            .map_err(|e| AgentsDocError::io(&abs, e))?;

        let rule = generate_rule(source, &source_path, &raw)?;
        let target = rules_dir.join(&rule.file_name);

        if content_matches(&target, &rule.content).await {
            debug!(file = %rule.file_name, "unchanged");
            result.unchanged.push(rule.file_name);
            continue;
        }

        tokio::fs::write(&target, &rule.content)
            .await
            .map_err(|e| AgentsDocError::io(&target, e))?;
        debug!(file = %rule.file_name, source = %source_path, "wrote rule");
        result.written.push(rule.file_name);
    }

    Ok(result)
}

/// Repo-relative paths for a source group: explicit files first, then the
/// directory's `.md` files in collation order.
async fn source_paths(source_repo: &Path, source: &SyncSource) -> Result<Vec<String>> {
    let mut paths = source.files.clone();

    if let Some(dir) = &source.dir {
        let abs = source_repo.join(dir);
        let mut entries = tokio::fs::read_dir(&abs)
            .await
            .map_err(|e| AgentsDocError::io(&abs, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AgentsDocError::io(&abs, e))?
        {
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".md") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort_by(|a, b| collate(a, b));

        let dir = dir.trim_end_matches('/');
        paths.extend(names.into_iter().map(|name| format!("{dir}/{name}")));
    }

    Ok(paths)
}

/// Build the rule document for one upstream file.
pub fn generate_rule(source: &SyncSource, source_path: &str, raw: &str) -> Result<GeneratedRule> {
    let upstream = split_frontmatter_lenient(raw);

    let base_name = Path::new(source_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AgentsDocError::parse(format!("invalid source path '{source_path}'")))?;

    let stem = if source.hyphenate {
        base_name.replace('_', "-")
    } else {
        base_name.to_string()
    };
    let file_name = format!("{}{stem}.md", source.stem_prefix);

    let title = upstream
        .metadata
        .get_str("title")
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| first_heading(&upstream.body))
        .unwrap_or_else(|| title_from_stem(base_name));

    let source_url = source_url(&source.url_template, source_path, base_name)?;

    let mut metadata = Metadata::new();
    metadata.insert("title", title);
    metadata.insert("section", source.section.as_str());
    metadata.insert("sourcePath", source_path);
    metadata.insert("sourceUrl", source_url.as_str());
    metadata.insert("tags", source.tags.clone());

    let content = format!(
        "{}\n> Canonical source: `{source_path}`\n> Source URL: <{source_url}>\n> Extraction: Original markdown body preserved verbatim after this header.\n\n{}",
        render_frontmatter(&metadata),
        upstream.body.trim_start_matches('\n'),
    );

    Ok(GeneratedRule { file_name, content })
}

/// Expand a URL template and check the result is an absolute URL.
fn source_url(template: &str, source_path: &str, base_name: &str) -> Result<String> {
    let slug = if base_name == "index" {
        String::new()
    } else {
        format!("/{base_name}")
    };
    let expanded = template
        .replace("{path}", source_path)
        .replace("{slug}", &slug);

    Url::parse(&expanded)
        .map_err(|e| AgentsDocError::parse(format!("invalid source URL '{expanded}': {e}")))?;
    Ok(expanded)
}

fn first_heading(body: &str) -> Option<String> {
    H1_RE.captures(body).map(|c| c[1].trim().to_string())
}

/// `metrics-view` → `Metrics View`.
fn title_from_stem(stem: &str) -> String {
    stem.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn content_matches(path: &Path, content: &str) -> bool {
    match tokio::fs::read(path).await {
        Ok(existing) => sha256_hex(&existing) == sha256_hex(content.as_bytes()),
        Err(_) => false,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
