//! Error types for agentsdoc.
//!
//! Library crates use [`AgentsDocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Content problems found by the validator are not errors: they are collected
//! as violations and reported together. Only structural failures live here.

use std::path::PathBuf;

/// Structural failure of the frontmatter block at the top of a rule document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrontmatterError {
    /// The text does not begin with `---` followed by a line break.
    #[error("missing frontmatter opening delimiter")]
    MissingOpeningDelimiter,

    /// No `\n---\n` follows the opening delimiter.
    #[error("missing frontmatter closing delimiter")]
    MissingClosingDelimiter,
}

/// Top-level error type for all agentsdoc operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentsDocError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed input document (metadata JSON, upstream sources, etc.).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A rule document with a broken frontmatter block.
    #[error("{}: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        source: FrontmatterError,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AgentsDocError>;

impl AgentsDocError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the offending file to a frontmatter failure.
    pub fn frontmatter(path: impl Into<PathBuf>, source: FrontmatterError) -> Self {
        Self::Frontmatter {
            path: path.into(),
            source,
        }
    }
}
