//! Shared types, error model, and configuration for agentsdoc.
//!
//! This crate is the foundation depended on by all other agentsdoc crates.
//! It provides:
//! - [`AgentsDocError`]: the unified error type
//! - Domain types ([`RuleDocument`], [`SectionDescriptor`], [`Metadata`], [`DocumentMetadata`])
//! - Configuration ([`AppConfig`], [`RenderConfig`], [`SyncConfig`], config loading)
//! - The fixed-locale string ordering used for every sort ([`collate`])

pub mod collate;
pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use collate::collate;
pub use config::{
    AppConfig, DefaultsConfig, RenderConfig, SyncConfig, SyncSource, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{AgentsDocError, FrontmatterError, Result};
pub use types::{
    DocumentMetadata, MetaValue, Metadata, ParsedDocument, RuleDocument, SectionDescriptor,
};
