//! Markdown sub-language parsers for rule repositories.
//!
//! Three narrow grammars, each a small dedicated matcher rather than a
//! general markdown or YAML parser:
//! - [`frontmatter`]: the `---` delimited metadata block of a rule document
//!   (flat scalars and bracketed string lists only)
//! - [`sections`]: `## <n>. <title> (<id>)` blocks of the section index
//! - [`anchor`]: heading text → in-document link target

pub mod anchor;
pub mod frontmatter;
pub mod sections;

pub use anchor::anchor_from_heading;
pub use frontmatter::{parse_frontmatter, render_frontmatter};
pub use sections::parse_sections;
