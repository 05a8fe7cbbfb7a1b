//! Rule repository pipeline for agentsdoc.
//!
//! Ties the markdown parsers to the filesystem: loading a skill directory,
//! grouping rules into sections, rendering the composed document,
//! validating the repository, and syncing rules from an upstream checkout.

pub mod build;
pub mod grouping;
pub mod layout;
pub mod loader;
pub mod render;
pub mod sync;
pub mod validate;

pub use build::{BuildResult, build};
pub use grouping::{GroupedRule, GroupedSection, group_by_section};
pub use layout::SkillLayout;
pub use render::render_document;
pub use validate::{ValidationReport, Violation, validate};

#[cfg(test)]
pub(crate) mod testutil;
