use crate::attributes::Attributes;
use crate::catalog::Catalog;
use crate::error::{HtmlError, HtmlResult};
use crate::policy;
use crate::style::InlineStyles;
use uuid::Uuid;

/// Entity-escaped text. Only [`Child::text`] creates one, so the serializer
/// can emit it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(String);

impl Text {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One entry of a node's children.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(HtmlNode),
    Text(Text),
}

impl Child {
    /// Text child; `<`, `>`, `&` and quotes are entity-escaped.
    pub fn text(raw: &str) -> Self {
        Child::Text(Text(policy::escape_html(raw)))
    }

    pub fn as_node(&self) -> Option<&HtmlNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Text(_) => None,
        }
    }

    /// The escaped text, as it is rendered
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Node(_) => None,
            Child::Text(text) => Some(text.as_str()),
        }
    }
}

impl From<HtmlNode> for Child {
    fn from(node: HtmlNode) -> Self {
        Child::Node(node)
    }
}

/// Ordered children of a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Children {
    items: Vec<Child>,
}

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: Child) {
        self.items.push(child);
    }

    pub fn extend<I>(&mut self, children: I)
    where
        I: IntoIterator<Item = Child>,
    {
        self.items.extend(children);
    }

    /// Remove the first node child whose [`HtmlNode::node_id`] is `node_id`.
    /// Ids compare by logical value (`"a&b"`, not `"a&amp;b"`). Text children
    /// are never matched. Returns whether a child was removed.
    pub fn remove_by_id(&mut self, node_id: &str) -> bool {
        let position = self.items.iter().position(|child| {
            child
                .as_node()
                .is_some_and(|node| node.node_id() == node_id)
        });
        match position {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Child> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Child> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Child] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a Child;
    type IntoIter = std::slice::Iter<'a, Child>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Child> for Children {
    fn from_iter<I: IntoIterator<Item = Child>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// One element of the document tree.
///
/// The tag name and the self-closing flag are fixed at creation. The node's
/// identity ([`node_id`](Self::node_id)) always reflects the current `id`
/// attribute; nodes without one fall back to a UUID assigned at creation.
#[derive(Debug, Clone)]
pub struct HtmlNode {
    tag_name: String,
    self_closing: bool,
    attributes: Attributes,
    inline_styles: InlineStyles,
    children: Children,
    fallback_id: String,
    attrs_map_identifier: Option<String>,
}

impl HtmlNode {
    /// Create an empty node for `tag`, validated and looked up in `catalog`.
    pub fn new(tag: &str, catalog: &dyn Catalog) -> HtmlResult<Self> {
        let tag_name = policy::validate_tag_name(tag)?;
        let spec = catalog
            .lookup(&tag_name)
            .ok_or_else(|| HtmlError::UnsupportedTag { tag: tag_name.clone() })?;
        Ok(Self::from_parts(
            tag_name,
            spec.self_closing,
            Attributes::new(),
            InlineStyles::new(),
            Children::new(),
        ))
    }

    pub(crate) fn from_parts(
        tag_name: String,
        self_closing: bool,
        attributes: Attributes,
        inline_styles: InlineStyles,
        children: Children,
    ) -> Self {
        Self {
            tag_name,
            self_closing,
            attributes,
            inline_styles,
            children,
            fallback_id: Uuid::new_v4().to_string(),
            attrs_map_identifier: None,
        }
    }

    pub(crate) fn set_attrs_map_identifier(&mut self, identifier: Option<String>) {
        self.attrs_map_identifier = identifier;
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_styles(mut self, inline_styles: InlineStyles) -> Self {
        self.inline_styles = inline_styles;
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// The logical `id` attribute when present, otherwise the creation-time UUID.
    pub fn node_id(&self) -> &str {
        self.attributes.unique_id().unwrap_or(self.fallback_id.as_str())
    }

    /// Re-read the identity after attribute changes. [`node_id`](Self::node_id)
    /// is always current, so this only returns it.
    pub fn update_node_id(&self) -> &str {
        self.node_id()
    }

    /// Identifier used to resolve this node's attributes from an external map
    pub fn attrs_map_identifier(&self) -> Option<&str> {
        self.attrs_map_identifier.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn inline_styles(&self) -> &InlineStyles {
        &self.inline_styles
    }

    pub fn inline_styles_mut(&mut self) -> &mut InlineStyles {
        &mut self.inline_styles
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn add_child(&mut self, child: impl Into<Child>) -> HtmlResult<()> {
        self.ensure_accepts_children()?;
        self.children.push(child.into());
        Ok(())
    }

    /// Append several children in order. Nothing is added on error.
    pub fn add_children<I>(&mut self, children: I) -> HtmlResult<()>
    where
        I: IntoIterator<Item = Child>,
    {
        self.ensure_accepts_children()?;
        self.children.extend(children);
        Ok(())
    }

    /// Remove the first child node with the given id; no-op when none matches.
    pub fn remove_child(&mut self, node_id: &str) -> bool {
        self.children.remove_by_id(node_id)
    }

    pub fn remove_children(&mut self) {
        self.children.clear();
    }

    fn ensure_accepts_children(&self) -> HtmlResult<()> {
        if self.self_closing {
            return Err(HtmlError::VoidElementChildren {
                tag: self.tag_name.clone(),
            });
        }
        Ok(())
    }
}

/// Structural equality: the fallback UUID is not compared.
impl PartialEq for HtmlNode {
    fn eq(&self, other: &Self) -> bool {
        self.tag_name == other.tag_name
            && self.self_closing == other.self_closing
            && self.attributes == other.attributes
            && self.inline_styles == other.inline_styles
            && self.children == other.children
            && self.attrs_map_identifier == other.attrs_map_identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HtmlCatalog;

    fn node(tag: &str, attrs: &[(&str, &str)]) -> HtmlNode {
        HtmlNode::new(tag, &HtmlCatalog)
            .unwrap()
            .with_attributes(Attributes::from_pairs(attrs.iter().copied()))
    }

    #[test]
    fn test_new_node_flags() {
        let img = HtmlNode::new("img", &HtmlCatalog).unwrap();
        assert!(img.is_self_closing());
        let div = HtmlNode::new(" DIV ", &HtmlCatalog).unwrap();
        assert_eq!(div.tag_name(), "div");
        assert!(!div.is_self_closing());
        assert!(div.children().is_empty());
    }

    #[test]
    fn test_new_node_rejects_unknown_tag() {
        assert!(matches!(
            HtmlNode::new("customtag", &HtmlCatalog),
            Err(HtmlError::UnsupportedTag { .. })
        ));
    }

    #[test]
    fn test_node_id_follows_id_attribute() {
        let mut div = node("div", &[("id", "initial-id")]);
        assert_eq!(div.node_id(), "initial-id");

        div.attributes_mut().update_attribute("id", "updated-id", true);
        assert_eq!(div.node_id(), "updated-id");

        div.attributes_mut().remove_attribute("id");
        assert_eq!(div.node_id().len(), 36);
    }

    #[test]
    fn test_fallback_ids_are_unique_and_stable() {
        let a = HtmlNode::new("div", &HtmlCatalog).unwrap();
        let b = HtmlNode::new("div", &HtmlCatalog).unwrap();
        assert_ne!(a.node_id(), b.node_id());
        assert_eq!(a.node_id(), a.node_id());
    }

    #[test]
    fn test_add_and_remove_children() {
        let mut parent = node("div", &[("id", "parent")]);
        let first = node("p", &[("id", "first")]);
        let second = node("span", &[("class", "second")]);
        let second_id = second.node_id().to_string();
        let third = node("h1", &[("title", "third")]);

        parent.add_child(first).unwrap();
        parent.add_child(Child::text("between")).unwrap();
        parent.add_children([Child::from(second), Child::from(third)]).unwrap();
        assert_eq!(parent.children().len(), 4);

        assert!(parent.remove_child(&second_id));
        assert_eq!(parent.children().len(), 3);
        assert_eq!(parent.children().get(0).and_then(Child::as_node).map(HtmlNode::tag_name), Some("p"));
        assert_eq!(parent.children().get(1).and_then(Child::as_text), Some("between"));
        assert_eq!(parent.children().get(2).and_then(Child::as_node).map(HtmlNode::tag_name), Some("h1"));

        assert!(!parent.remove_child("does-not-exist"));
        assert!(!parent.remove_child("between"));
        assert_eq!(parent.children().len(), 3);

        parent.remove_children();
        assert!(parent.children().is_empty());
    }

    #[test]
    fn test_remove_child_only_removes_first_match() {
        let mut parent = node("ul", &[]);
        parent.add_child(node("li", &[("id", "dup")])).unwrap();
        parent.add_child(node("li", &[("id", "dup")])).unwrap();

        parent.remove_child("dup");
        assert_eq!(parent.children().len(), 1);
    }

    #[test]
    fn test_self_closing_node_rejects_children() {
        let mut img = node("img", &[("src", "a.png")]);
        assert!(matches!(
            img.add_child(Child::text("caption")),
            Err(HtmlError::VoidElementChildren { .. })
        ));
        assert!(img.add_children(vec![Child::text("x")]).is_err());
        assert!(img.children().is_empty());
    }

    #[test]
    fn test_text_children_are_escaped() {
        assert_eq!(Child::text("a < b & c").as_text(), Some("a &lt; b &amp; c"));
    }

    #[test]
    fn test_raw_markup_cannot_reach_output() {
        let mut p = node("p", &[]);
        p.add_child(Child::text("<script>alert(1)</script>")).unwrap();
        assert_eq!(
            p.to_string(),
            "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn test_ids_with_markup_characters() {
        let mut parent = node("div", &[]);
        for id in ["a&b", "it's", "<x>"] {
            parent.add_child(node("span", &[("id", id)])).unwrap();
        }
        let child = parent.children().get(0).and_then(Child::as_node).unwrap();
        assert_eq!(child.node_id(), "a&b");
        assert_eq!(child.attributes().get_escaped("id"), Some("a&amp;b"));

        assert!(parent.remove_child("a&b"));
        assert!(parent.remove_child("it's"));
        assert!(parent.remove_child("<x>"));
        assert!(parent.children().is_empty());
    }
}
