//! Security policy shared by the construction pipeline and the mutation APIs.
//!
//! Everything that decides whether a tag name, attribute or style declaration
//! is allowed lives here, so [`crate::builder`] and the
//! [`Attributes`](crate::attributes::Attributes) /
//! [`InlineStyles`](crate::style::InlineStyles) setters can never disagree.

use crate::error::{HtmlError, HtmlResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const MAX_RECURSION_DEPTH: usize = 100;
pub const MAX_TAG_NAME_LENGTH: usize = 50;
pub const MAX_ATTRIBUTE_VALUE_LENGTH: usize = 1000;

/// Event handler attributes that are always stripped.
pub const DANGEROUS_ATTRIBUTES: &[&str] = &[
    "onclick",
    "onload",
    "onerror",
    "onmouseover",
    "onmouseout",
    "onkeydown",
    "onkeyup",
    "onkeypress",
    "onfocus",
    "onblur",
    "onchange",
    "onsubmit",
    "onreset",
    "ondblclick",
    "oncontextmenu",
    "oninput",
    "onselect",
    "ondrag",
    "ondrop",
    "onscroll",
];

/// URI schemes an attribute value may not start with.
pub const DANGEROUS_PROTOCOLS: &[&str] = &["javascript:", "data:", "vbscript:", "file:"];

/// Substrings that disqualify an inline style value.
pub const DANGEROUS_STYLE_PATTERNS: &[&str] = &["javascript:", "expression(", "<script"];

fn tag_name_regex() -> &'static Regex {
    static TAG_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_NAME_REGEX.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").unwrap())
}

fn attribute_name_regex() -> &'static Regex {
    static ATTRIBUTE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE_NAME_REGEX.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap())
}

fn style_property_regex() -> &'static Regex {
    static STYLE_PROPERTY_REGEX: OnceLock<Regex> = OnceLock::new();
    STYLE_PROPERTY_REGEX.get_or_init(|| Regex::new(r"^-{0,2}[a-z][a-z0-9-]*$").unwrap())
}

/// Trim and lowercase a tag, attribute or style property name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalize a raw tag name and check it against the naming rules.
///
/// Returns the normalized name. The Catalog lookup is a separate step.
pub fn validate_tag_name(raw: &str) -> HtmlResult<String> {
    let tag = normalize_name(raw);

    if !tag_name_regex().is_match(&tag) {
        return Err(HtmlError::InvalidTagName { tag });
    }

    let length = tag.chars().count();
    if length > MAX_TAG_NAME_LENGTH {
        return Err(HtmlError::TagNameTooLong { tag, length });
    }

    Ok(tag)
}

/// Why an attribute was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// An `on*` event handler
    DangerousAttribute,
    /// Name does not match `^[a-z][a-z0-9_-]*$`
    InvalidName,
    /// `style` must go through the inline style set
    ReservedName,
    /// Value starts with one of [`DANGEROUS_PROTOCOLS`]
    DangerousProtocol(&'static str),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::DangerousAttribute => f.write_str("event handler attributes are not allowed"),
            Rejection::InvalidName => f.write_str("attribute name contains invalid characters"),
            Rejection::ReservedName => f.write_str("'style' must be set through inline styles"),
            Rejection::DangerousProtocol(protocol) => {
                write!(f, "value uses the forbidden '{}' scheme", protocol)
            }
        }
    }
}

pub fn is_dangerous_attribute(name: &str) -> bool {
    if DANGEROUS_ATTRIBUTES.contains(&name) {
        return true;
    }
    // Catch the rest of the on* family (onanimationstart, onpointerdown, ...)
    name.strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_lowercase())
}

/// Check an already-normalized attribute name.
pub fn check_attribute_name(name: &str) -> Result<(), Rejection> {
    if is_dangerous_attribute(name) {
        return Err(Rejection::DangerousAttribute);
    }
    if !attribute_name_regex().is_match(name) {
        return Err(Rejection::InvalidName);
    }
    if name == "style" {
        return Err(Rejection::ReservedName);
    }
    Ok(())
}

/// Find a forbidden scheme at the start of `value`.
///
/// Whitespace and control characters are ignored the way browsers ignore
/// them when resolving a URL, so `" java\tscript:"` is caught as well.
pub fn dangerous_protocol(value: &str) -> Option<&'static str> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    DANGEROUS_PROTOCOLS
        .iter()
        .copied()
        .find(|protocol| compact.starts_with(protocol))
}

/// An attribute value that passed the policy.
///
/// `value` is the logical value, at most [`MAX_ATTRIBUTE_VALUE_LENGTH`]
/// characters. `escaped` is the same text entity-escaped for markup and may
/// be longer, since one character can become a six-character entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanValue {
    pub value: String,
    pub escaped: String,
    /// Character count before truncation, when the value was cut
    pub truncated_from: Option<usize>,
}

impl CleanValue {
    fn new(value: String, truncated_from: Option<usize>) -> Self {
        let escaped = escape_html(&value);
        Self {
            value,
            escaped,
            truncated_from,
        }
    }
}

/// Check an attribute value: forbidden schemes reject it, oversize values
/// are cut to [`MAX_ATTRIBUTE_VALUE_LENGTH`] characters, and the escaped
/// markup form is computed once here.
pub fn check_attribute_value(value: &str) -> Result<CleanValue, Rejection> {
    if let Some(protocol) = dangerous_protocol(value) {
        return Err(Rejection::DangerousProtocol(protocol));
    }

    let length = value.chars().count();
    if length > MAX_ATTRIBUTE_VALUE_LENGTH {
        let cut: String = value.chars().take(MAX_ATTRIBUTE_VALUE_LENGTH).collect();
        return Ok(CleanValue::new(cut, Some(length)));
    }

    Ok(CleanValue::new(value.to_string(), None))
}

/// Why a style declaration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleRejection {
    InvalidProperty,
    DangerousValue(&'static str),
    EmptyValue,
}

impl fmt::Display for StyleRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleRejection::InvalidProperty => f.write_str("property name contains invalid characters"),
            StyleRejection::DangerousValue(pattern) => {
                write!(f, "value contains the forbidden pattern '{}'", pattern)
            }
            StyleRejection::EmptyValue => f.write_str("value is empty"),
        }
    }
}

pub fn check_style_property(property: &str) -> Result<(), StyleRejection> {
    if style_property_regex().is_match(property) {
        Ok(())
    } else {
        Err(StyleRejection::InvalidProperty)
    }
}

/// Trim a style value and refuse it when it carries script.
pub fn clean_style_value(value: &str) -> Result<String, StyleRejection> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StyleRejection::EmptyValue);
    }

    let lower = trimmed.to_lowercase();
    if let Some(pattern) = DANGEROUS_STYLE_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.contains(pattern))
    {
        return Err(StyleRejection::DangerousValue(pattern));
    }

    Ok(escape_html(trimmed))
}

/// Entity-escape text so it can be emitted verbatim inside an element or a
/// single- or double-quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
