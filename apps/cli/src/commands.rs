//! CLI command definitions, routing, and tracing setup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use agentsdoc_core::SkillLayout;
use agentsdoc_core::sync::sync_rules;
use agentsdoc_shared::{AppConfig, init_config, load_config, load_config_from};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Compile modular rule files into one agent reference document.
#[derive(Parser)]
#[command(
    name = "agentsdoc",
    version,
    about = "Compile, validate, and sync modular agent rule files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.agentsdoc/agentsdoc.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skill directory containing `rules/` and the metadata file.
    #[arg(long, env = "SKILL_DIR", global = true)]
    pub skill_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the composed document from the rule files.
    Build,

    /// Check rules and sections; exits non-zero on any violation.
    Validate,

    /// Regenerate rule files from a local upstream documentation checkout.
    Sync {
        /// Path to the upstream repository checkout (`RILL_REPO` is also read).
        #[arg(long, env = "SOURCE_REPO")]
        source_repo: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "agentsdoc=info",
        1 => "agentsdoc=debug",
        _ => "agentsdoc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        skill_dir,
        command,
        ..
    } = cli;

    match command {
        Command::Build => {
            let config = resolve_config(config_path.as_deref())?;
            let layout = skill_layout(skill_dir, &config)?;
            cmd_build(&layout, &config).await
        }
        Command::Validate => {
            let config = resolve_config(config_path.as_deref())?;
            let layout = skill_layout(skill_dir, &config)?;
            cmd_validate(&layout, &config).await
        }
        Command::Sync { source_repo } => {
            let config = resolve_config(config_path.as_deref())?;
            let layout = skill_layout(skill_dir, &config)?;
            let source_repo =
                source_repo_path(source_repo, std::env::var_os(LEGACY_SOURCE_REPO_ENV), &config);
            cmd_sync(&layout, &source_repo, &config).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

/// Older name of `SOURCE_REPO`, still honored.
const LEGACY_SOURCE_REPO_ENV: &str = "RILL_REPO";

/// `--source-repo`/`SOURCE_REPO`, then `RILL_REPO`, then config.
fn source_repo_path(
    flag: Option<PathBuf>,
    legacy_env: Option<OsString>,
    config: &AppConfig,
) -> PathBuf {
    flag.or_else(|| legacy_env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(&config.sync.source_repo))
}

/// Skill directory from flag/env, else config, made absolute.
fn skill_layout(skill_dir: Option<PathBuf>, config: &AppConfig) -> Result<SkillLayout> {
    let skill_dir = skill_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.skill_dir));
    Ok(SkillLayout::new(absolute(&skill_dir)?, &config.defaults))
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    Ok(cwd.join(path))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(layout: &SkillLayout, config: &AppConfig) -> Result<()> {
    info!(skill_dir = %layout.skill_dir.display(), "building document");

    let result = agentsdoc_core::build(layout, &config.render).await?;

    println!(
        "Built {} from {} rules in {} sections.",
        result.output_path.display(),
        result.rule_count,
        result.section_count
    );
    if result.orphan_count > 0 {
        println!(
            "  {} rule(s) reference undeclared sections and were left out; run `agentsdoc validate`.",
            result.orphan_count
        );
    }

    Ok(())
}

async fn cmd_validate(layout: &SkillLayout, config: &AppConfig) -> Result<()> {
    info!(skill_dir = %layout.skill_dir.display(), "validating rules");

    let report = agentsdoc_core::build::check(layout, &config.render.default_impact).await?;

    if !report.is_ok() {
        eprintln!("Validation failed:\n");
        for violation in &report.violations {
            eprintln!("- {violation}");
        }
        return Err(eyre!(
            "{} validation error(s) in {}",
            report.violations.len(),
            layout.skill_dir.display()
        ));
    }

    println!("{}", report.summary());
    Ok(())
}

async fn cmd_sync(layout: &SkillLayout, source_repo: &Path, config: &AppConfig) -> Result<()> {
    let source_repo = absolute(source_repo)?;
    if !source_repo.is_dir() {
        return Err(eyre!(
            "source repository '{}' is not a directory",
            source_repo.display()
        ));
    }

    info!(source_repo = %source_repo.display(), "syncing rules");

    let result = sync_rules(&source_repo, &layout.rules_dir, &config.sync.sources).await?;

    for source in &result.sources {
        println!(
            "  {:<16} written: {:>3}  unchanged: {:>3}",
            source.section,
            source.written.len(),
            source.unchanged.len()
        );
    }
    println!(
        "Synced {} rules into {} ({} written, {} unchanged).",
        result.written_count() + result.unchanged_count(),
        layout.rules_dir.display(),
        result.written_count(),
        result.unchanged_count()
    );

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
