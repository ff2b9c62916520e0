//! Tag and attribute catalog.
//!
//! The construction pipeline only asks the catalog two questions: does this
//! tag exist, and is it self-closing. The attribute lists are used by the
//! looser [`introspect_attributes`] helper.

use crate::attributes::Attributes;
use crate::warning::{Warning, WarningSink};
use std::collections::HashMap;
use std::sync::OnceLock;

/// What the catalog knows about one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec<'a> {
    /// Tag-specific attribute names (globals and events excluded)
    pub attributes: &'a [&'a str],
    /// Void element: no closing tag, no children
    pub self_closing: bool,
}

impl TagSpec<'_> {
    pub fn allows(&self, attribute: &str) -> bool {
        self.attributes.contains(&attribute)
    }
}

/// Lookup table of legal tags and attributes.
pub trait Catalog: Send + Sync {
    fn lookup(&self, tag: &str) -> Option<TagSpec<'_>>;

    /// Attributes legal on every tag
    fn global_attributes(&self) -> &[&str];

    /// Event handler attribute names
    fn event_attributes(&self) -> &[&str];

    fn contains(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }
}

/// Every attribute name legal on `tag`: tag-specific, global and event names.
pub fn allowed_attributes<'c>(catalog: &'c dyn Catalog, tag: &str) -> Option<Vec<&'c str>> {
    let spec = catalog.lookup(tag)?;
    let mut names: Vec<&str> = Vec::with_capacity(
        spec.attributes.len() + catalog.global_attributes().len() + catalog.event_attributes().len(),
    );
    names.extend_from_slice(spec.attributes);
    names.extend_from_slice(catalog.global_attributes());
    names.extend_from_slice(catalog.event_attributes());
    Some(names)
}

/// Copy of `attributes` keeping only names the catalog lists for `tag`.
///
/// Unknown tags keep nothing. `data-*` attributes are not in the catalog and
/// are therefore dropped too.
pub fn introspect_attributes(
    catalog: &dyn Catalog,
    tag: &str,
    attributes: &Attributes,
    sink: &mut dyn WarningSink,
) -> Attributes {
    let Some(allowed) = allowed_attributes(catalog, tag) else {
        sink.warn(Warning::UnknownTag { tag: tag.to_string() });
        return Attributes::new();
    };

    let mut filtered = attributes.clone();
    filtered.retain(|name, _| {
        let known = allowed.contains(&name);
        if !known {
            sink.warn(Warning::UnknownAttribute {
                tag: tag.to_string(),
                attribute: name.to_string(),
            });
        }
        known
    });
    filtered
}

pub const GLOBAL_ATTRIBUTES: &[&str] = &[
    "accesskey",
    "autocapitalize",
    "autofocus",
    "class",
    "contenteditable",
    "dir",
    "draggable",
    "enterkeyhint",
    "hidden",
    "id",
    "inert",
    "inputmode",
    "is",
    "itemid",
    "itemprop",
    "itemref",
    "itemscope",
    "itemtype",
    "lang",
    "nonce",
    "part",
    "popover",
    "role",
    "slot",
    "spellcheck",
    "style",
    "tabindex",
    "title",
    "translate",
];

pub const EVENT_ATTRIBUTES: &[&str] = &[
    "onabort",
    "onblur",
    "oncanplay",
    "onchange",
    "onclick",
    "oncontextmenu",
    "oncopy",
    "oncut",
    "ondblclick",
    "ondrag",
    "ondragend",
    "ondragstart",
    "ondrop",
    "onerror",
    "onfocus",
    "oninput",
    "oninvalid",
    "onkeydown",
    "onkeypress",
    "onkeyup",
    "onload",
    "onmousedown",
    "onmouseout",
    "onmouseover",
    "onmouseup",
    "onpaste",
    "onreset",
    "onresize",
    "onscroll",
    "onselect",
    "onsubmit",
    "onwheel",
];

const NONE: &[&str] = &[];
const CITE: &[&str] = &["cite"];
const CELL: &[&str] = &["colspan", "rowspan", "headers"];
const MEDIA: &[&str] = &[
    "src", "autoplay", "controls", "crossorigin", "loop", "muted", "preload",
];

/// (tag, tag-specific attributes, self-closing)
const HTML_TAGS: &[(&str, &[&str], bool)] = &[
    ("a", &["href", "target", "download", "rel", "hreflang", "type", "referrerpolicy", "ping"], false),
    ("abbr", NONE, false),
    ("address", NONE, false),
    ("area", &["alt", "coords", "shape", "href", "target", "download", "rel", "referrerpolicy"], true),
    ("article", NONE, false),
    ("aside", NONE, false),
    ("audio", MEDIA, false),
    ("b", NONE, false),
    ("base", &["href", "target"], true),
    ("bdi", NONE, false),
    ("bdo", NONE, false),
    ("blockquote", CITE, false),
    ("body", NONE, false),
    ("br", NONE, true),
    ("button", &["type", "name", "value", "disabled", "form", "formaction", "formmethod", "formtarget"], false),
    ("canvas", &["width", "height"], false),
    ("caption", NONE, false),
    ("cite", NONE, false),
    ("code", NONE, false),
    ("col", &["span"], true),
    ("colgroup", &["span"], false),
    ("data", &["value"], false),
    ("datalist", NONE, false),
    ("dd", NONE, false),
    ("del", &["cite", "datetime"], false),
    ("details", &["open", "name"], false),
    ("dfn", NONE, false),
    ("dialog", &["open"], false),
    ("div", NONE, false),
    ("dl", NONE, false),
    ("dt", NONE, false),
    ("em", NONE, false),
    ("embed", &["src", "type", "width", "height"], true),
    ("fieldset", &["disabled", "form", "name"], false),
    ("figcaption", NONE, false),
    ("figure", NONE, false),
    ("footer", NONE, false),
    ("form", &["action", "method", "enctype", "autocomplete", "novalidate", "target", "name", "accept-charset", "rel"], false),
    ("h1", NONE, false),
    ("h2", NONE, false),
    ("h3", NONE, false),
    ("h4", NONE, false),
    ("h5", NONE, false),
    ("h6", NONE, false),
    ("head", NONE, false),
    ("header", NONE, false),
    ("hgroup", NONE, false),
    ("hr", NONE, true),
    ("html", &["lang", "xmlns"], false),
    ("i", NONE, false),
    ("iframe", &["src", "srcdoc", "name", "sandbox", "allow", "width", "height", "loading", "referrerpolicy"], false),
    ("img", &["src", "alt", "width", "height", "srcset", "sizes", "loading", "decoding", "crossorigin", "usemap", "ismap", "referrerpolicy"], true),
    ("input", &[
        "type", "name", "value", "placeholder", "required", "disabled", "readonly", "checked",
        "min", "max", "step", "minlength", "maxlength", "pattern", "size", "multiple", "accept",
        "autocomplete", "list", "form", "src", "alt", "width", "height",
    ], true),
    ("ins", &["cite", "datetime"], false),
    ("kbd", NONE, false),
    ("label", &["for", "form"], false),
    ("legend", NONE, false),
    ("li", &["value"], false),
    ("link", &["href", "rel", "type", "media", "sizes", "crossorigin", "integrity", "hreflang", "as"], true),
    ("main", NONE, false),
    ("map", &["name"], false),
    ("mark", NONE, false),
    ("menu", NONE, false),
    ("meta", &["name", "content", "charset", "http-equiv", "media"], true),
    ("meter", &["value", "min", "max", "low", "high", "optimum", "form"], false),
    ("nav", NONE, false),
    ("noscript", NONE, false),
    ("object", &["data", "type", "name", "width", "height", "form"], false),
    ("ol", &["reversed", "start", "type"], false),
    ("optgroup", &["label", "disabled"], false),
    ("option", &["value", "label", "selected", "disabled"], false),
    ("output", &["for", "form", "name"], false),
    ("p", NONE, false),
    ("param", &["name", "value"], true),
    ("picture", NONE, false),
    ("pre", NONE, false),
    ("progress", &["value", "max"], false),
    ("q", CITE, false),
    ("rp", NONE, false),
    ("rt", NONE, false),
    ("ruby", NONE, false),
    ("s", NONE, false),
    ("samp", NONE, false),
    ("search", NONE, false),
    ("section", NONE, false),
    ("select", &["name", "multiple", "required", "disabled", "size", "form", "autocomplete"], false),
    ("slot", &["name"], false),
    ("small", NONE, false),
    ("source", &["src", "type", "srcset", "sizes", "media", "width", "height"], true),
    ("span", NONE, false),
    ("strong", NONE, false),
    ("sub", NONE, false),
    ("summary", NONE, false),
    ("sup", NONE, false),
    ("table", NONE, false),
    ("tbody", NONE, false),
    ("td", CELL, false),
    ("template", NONE, false),
    ("textarea", &["name", "rows", "cols", "placeholder", "required", "disabled", "readonly", "maxlength", "minlength", "wrap", "form", "autocomplete"], false),
    ("tfoot", NONE, false),
    ("th", &["colspan", "rowspan", "headers", "scope", "abbr"], false),
    ("thead", NONE, false),
    ("time", &["datetime"], false),
    ("title", NONE, false),
    ("tr", NONE, false),
    ("track", &["src", "kind", "srclang", "label", "default"], true),
    ("u", NONE, false),
    ("ul", NONE, false),
    ("var", NONE, false),
    ("video", &["src", "autoplay", "controls", "crossorigin", "loop", "muted", "preload", "poster", "width", "height", "playsinline"], false),
    ("wbr", NONE, true),
];

/// The built-in HTML5 catalog. `script` is deliberately absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCatalog;

impl HtmlCatalog {
    fn table() -> &'static HashMap<&'static str, TagSpec<'static>> {
        static TABLE: OnceLock<HashMap<&'static str, TagSpec<'static>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            HTML_TAGS
                .iter()
                .map(|&(tag, attributes, self_closing)| {
                    (tag, TagSpec { attributes, self_closing })
                })
                .collect()
        })
    }

    /// Number of tags in the table
    pub fn len(&self) -> usize {
        Self::table().len()
    }

    pub fn is_empty(&self) -> bool {
        Self::table().is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> {
        HTML_TAGS.iter().map(|&(tag, _, _)| tag)
    }
}

impl Catalog for HtmlCatalog {
    fn lookup(&self, tag: &str) -> Option<TagSpec<'_>> {
        Self::table().get(tag).copied()
    }

    fn global_attributes(&self) -> &[&str] {
        GLOBAL_ATTRIBUTES
    }

    fn event_attributes(&self) -> &[&str] {
        EVENT_ATTRIBUTES
    }
}
