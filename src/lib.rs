//! # NullTrace HTML Builder
//!
//! Builds HTML trees from untrusted, dictionary-shaped data (YAML or JSON)
//! and renders them back to markup.
//!
//! ## Features
//! - Tag names checked against a naming pattern and a catalog of HTML elements
//! - Event handler attributes and `javascript:`/`data:`/`vbscript:`/`file:` values stripped
//! - Inline styles kept in a separate, filtered declaration set
//! - All text and attribute values entity-escaped at construction
//! - Recursion depth limit against deeply nested input, checked while parsing text too
//! - Non-fatal problems reported through an injectable [`WarningSink`]
//!
//! ## Example
//! ```ignore
//! use nulltrace_html::{parse_node, to_html};
//!
//! let yaml = r#"
//! tag_name: div
//! attributes:
//!   class: container
//! children:
//!   - tag_name: p
//!     attributes: { id: paragraph }
//!     children: ["Some text content"]
//! "#;
//!
//! let node = parse_node(yaml).expect("Failed to build tree");
//! assert_eq!(
//!     to_html(&node),
//!     "<div class='container'><p id='paragraph'>Some text content</p></div>"
//! );
//! ```

pub mod attributes;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod node;
pub mod policy;
pub mod render;
pub mod resolver;
pub mod style;
pub mod warning;

// --- Core types ---
pub use attributes::{AttributeVerdict, Attributes};
pub use builder::NodeBuilder;
pub use catalog::{Catalog, HtmlCatalog, TagSpec};
pub use config::BuildConfig;
pub use error::{ErrorKind, HtmlError, HtmlResult};
pub use node::{Child, Children, HtmlNode, Text};
pub use render::{save_html, to_html, write_html};
pub use resolver::{AttributeMap, AttributeResolver};
pub use style::{InlineStyles, StyleVerdict};
pub use warning::{CollectingSink, NullSink, TracingSink, Warning, WarningSink};

use serde_yaml::Value;

/// Build a tree with the built-in catalog and default settings.
pub fn build_node(data: &Value) -> HtmlResult<HtmlNode> {
    NodeBuilder::new(&HtmlCatalog).build(data)
}

/// Parse YAML (or JSON) text and build a tree from it.
pub fn parse_node(source: &str) -> HtmlResult<HtmlNode> {
    NodeBuilder::new(&HtmlCatalog).parse(source)
}
