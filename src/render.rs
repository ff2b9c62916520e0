//! Serializes validated trees to HTML.
//!
//! Every value stored in a tree is already entity-escaped, so nothing is
//! escaped here.

use crate::error::HtmlResult;
use crate::node::{Child, HtmlNode};
use std::fmt::{self, Write};
use std::io;
use std::path::Path;

/// The part between the tag name and `>`: style first, then attributes,
/// each preceded by one space and omitted when empty.
fn opening_attributes(node: &HtmlNode) -> String {
    let mut out = String::new();
    let style = node.inline_styles().to_attribute_string();
    if !style.is_empty() {
        out.push(' ');
        out.push_str(&style);
    }
    let attrs = node.attributes().to_html_string();
    if !attrs.is_empty() {
        out.push(' ');
        out.push_str(&attrs);
    }
    out
}

pub fn write_node<W: Write>(node: &HtmlNode, out: &mut W) -> fmt::Result {
    let attrs = opening_attributes(node);
    if node.is_self_closing() {
        return write!(out, "<{}{}/>", node.tag_name(), attrs);
    }

    write!(out, "<{}{}>", node.tag_name(), attrs)?;
    for child in node.children() {
        match child {
            Child::Node(inner) => write_node(inner, out)?,
            Child::Text(text) => out.write_str(text.as_str())?,
        }
    }
    write!(out, "</{}>", node.tag_name())
}

impl fmt::Display for HtmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(self, f)
    }
}

pub fn to_html(node: &HtmlNode) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_node(node, &mut out);
    out
}

/// Write rendered markup to `writer`.
pub fn write_html<W: io::Write>(node: &HtmlNode, mut writer: W) -> HtmlResult<()> {
    writer.write_all(to_html(node).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Persist rendered markup to `path`, replacing any existing file.
pub fn save_html(html: &str, path: impl AsRef<Path>) -> HtmlResult<()> {
    let path = path.as_ref();
    std::fs::write(path, html)?;
    tracing::info!(path = %path.display(), bytes = html.len(), "saved html");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::catalog::HtmlCatalog;
    use crate::style::InlineStyles;
    use pretty_assertions::assert_eq;

    fn node(tag: &str, attrs: &[(&str, &str)]) -> HtmlNode {
        HtmlNode::new(tag, &HtmlCatalog)
            .unwrap()
            .with_attributes(Attributes::from_pairs(attrs.iter().copied()))
    }

    #[test]
    fn test_self_closing_with_attributes() {
        let img = node("img", &[("src", "test.jpg"), ("alt", "test image")]);
        assert_eq!(to_html(&img), "<img src='test.jpg' alt='test image'/>");
    }

    #[test]
    fn test_bare_elements() {
        assert_eq!(to_html(&node("br", &[])), "<br/>");
        assert_eq!(to_html(&node("div", &[])), "<div></div>");
    }

    #[test]
    fn test_nested_with_text() {
        let mut p = node("p", &[("id", "paragraph")]);
        p.add_child(Child::text("Some text content")).unwrap();
        let mut div = node("div", &[("class", "container")]);
        div.add_child(p).unwrap();

        assert_eq!(
            to_html(&div),
            "<div class='container'><p id='paragraph'>Some text content</p></div>"
        );
    }

    #[test]
    fn test_style_precedes_attributes() {
        let div = node("div", &[("class", "x")]).with_styles(InlineStyles::from_pairs([("color", "red")]));
        assert_eq!(to_html(&div), "<div style='color: red;' class='x'></div>");

        let styled_only = node("span", &[]).with_styles(InlineStyles::from_pairs([("margin", "0")]));
        assert_eq!(to_html(&styled_only), "<span style='margin: 0;'></span>");
    }

    #[test]
    fn test_display_matches_to_html() {
        let mut ul = node("ul", &[]);
        ul.add_child(node("li", &[])).unwrap();
        assert_eq!(ul.to_string(), to_html(&ul));
        assert_eq!(format!("{}", ul), "<ul><li></li></ul>");
    }

    #[test]
    fn test_write_html_to_buffer() {
        let mut buffer = Vec::new();
        write_html(&node("hr", &[]), &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "<hr/>");
    }

    #[test]
    fn test_save_html() {
        let path = std::env::temp_dir().join(format!("nulltrace-html-{}.html", uuid::Uuid::new_v4()));
        save_html("<p>saved</p>", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>saved</p>");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_html_reports_io_errors() {
        let missing_dir = std::env::temp_dir()
            .join(uuid::Uuid::new_v4().to_string())
            .join("out.html");
        assert!(matches!(
            save_html("<p></p>", &missing_dir),
            Err(crate::error::HtmlError::Io(_))
        ));
    }
}
