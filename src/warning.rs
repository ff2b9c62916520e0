//! Non-fatal reports from the construction pipeline.
//!
//! Attribute- and style-level problems never abort a build; they are handed
//! to the [`WarningSink`] the caller passed in.

use crate::policy::{Rejection, StyleRejection};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Event handler attribute stripped
    DangerousAttribute { tag: String, attribute: String },
    /// Attribute key was not a string or had invalid characters
    InvalidAttributeName { tag: String, attribute: String },
    NonStringAttributeValue {
        tag: String,
        attribute: String,
        found: &'static str,
    },
    /// Value started with a forbidden URI scheme; attribute dropped
    DangerousProtocol {
        tag: String,
        attribute: String,
        protocol: &'static str,
    },
    ValueTruncated {
        tag: String,
        attribute: String,
        length: usize,
    },
    InvalidStyleProperty { tag: String, property: String },
    DangerousStyleValue {
        tag: String,
        property: String,
        pattern: &'static str,
    },
    /// Null, nested or empty style value
    UnusableStyleValue {
        tag: String,
        property: String,
        found: &'static str,
    },
    /// A resolver was configured but the node named no attribute map
    MissingAttrsMapIdentifier { tag: String },
    /// Children supplied for a void element were dropped
    VoidChildrenDiscarded { tag: String, count: usize },
    /// Attribute not listed for the tag in the catalog (introspection only)
    UnknownAttribute { tag: String, attribute: String },
    /// Tag missing from the catalog (introspection only)
    UnknownTag { tag: String },
}

impl Warning {
    pub(crate) fn from_rejection(tag: &str, attribute: &str, reason: Rejection) -> Self {
        let tag = tag.to_string();
        let attribute = attribute.to_string();
        match reason {
            Rejection::DangerousAttribute => Warning::DangerousAttribute { tag, attribute },
            Rejection::InvalidName | Rejection::ReservedName => {
                Warning::InvalidAttributeName { tag, attribute }
            }
            Rejection::DangerousProtocol(protocol) => Warning::DangerousProtocol {
                tag,
                attribute,
                protocol,
            },
        }
    }

    pub(crate) fn from_style_rejection(tag: &str, property: &str, reason: StyleRejection) -> Self {
        let tag = tag.to_string();
        let property = property.to_string();
        match reason {
            StyleRejection::InvalidProperty => Warning::InvalidStyleProperty { tag, property },
            StyleRejection::DangerousValue(pattern) => Warning::DangerousStyleValue {
                tag,
                property,
                pattern,
            },
            StyleRejection::EmptyValue => Warning::UnusableStyleValue {
                tag,
                property,
                found: "empty string",
            },
        }
    }

    /// Tag of the node the warning was raised for
    pub fn tag(&self) -> &str {
        match self {
            Warning::DangerousAttribute { tag, .. }
            | Warning::InvalidAttributeName { tag, .. }
            | Warning::NonStringAttributeValue { tag, .. }
            | Warning::DangerousProtocol { tag, .. }
            | Warning::ValueTruncated { tag, .. }
            | Warning::InvalidStyleProperty { tag, .. }
            | Warning::DangerousStyleValue { tag, .. }
            | Warning::UnusableStyleValue { tag, .. }
            | Warning::MissingAttrsMapIdentifier { tag }
            | Warning::VoidChildrenDiscarded { tag, .. }
            | Warning::UnknownAttribute { tag, .. }
            | Warning::UnknownTag { tag } => tag,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DangerousAttribute { tag, attribute } => {
                write!(f, "dangerous attribute '{}' blocked for tag '{}'", attribute, tag)
            }
            Warning::InvalidAttributeName { tag, attribute } => {
                write!(f, "invalid attribute name '{}' skipped on tag '{}'", attribute, tag)
            }
            Warning::NonStringAttributeValue { tag, attribute, found } => write!(
                f,
                "attribute '{}' of tag '{}' has a {} value, skipping",
                attribute, tag, found
            ),
            Warning::DangerousProtocol { tag, attribute, protocol } => write!(
                f,
                "dangerous protocol '{}' found in attribute '{}' of tag '{}'",
                protocol, attribute, tag
            ),
            Warning::ValueTruncated { tag, attribute, length } => write!(
                f,
                "attribute '{}' of tag '{}' too long ({} chars), truncated",
                attribute, tag, length
            ),
            Warning::InvalidStyleProperty { tag, property } => {
                write!(f, "invalid style property '{}' skipped on tag '{}'", property, tag)
            }
            Warning::DangerousStyleValue { tag, property, pattern } => write!(
                f,
                "style '{}' of tag '{}' contains '{}', rejected",
                property, tag, pattern
            ),
            Warning::UnusableStyleValue { tag, property, found } => write!(
                f,
                "style '{}' of tag '{}' has a {} value, skipping",
                property, tag, found
            ),
            Warning::MissingAttrsMapIdentifier { tag } => write!(
                f,
                "attrs_map_identifier not found for tag '{}', using 'default'",
                tag
            ),
            Warning::VoidChildrenDiscarded { tag, count } => write!(
                f,
                "self-closing tag '{}' cannot have children, {} discarded",
                tag, count
            ),
            Warning::UnknownAttribute { tag, attribute } => {
                write!(f, "unknown attribute '{}' for tag '{}'", attribute, tag)
            }
            Warning::UnknownTag { tag } => write!(f, "tag '{}' is not in the catalog", tag),
        }
    }
}

/// Receiver for [`Warning`]s raised while building a tree.
pub trait WarningSink {
    fn warn(&mut self, warning: Warning);
}

/// Forwards every warning to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!(tag = warning.tag(), "{}", warning);
    }
}

/// Keeps warnings in memory for later inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub warnings: Vec<Warning>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

impl WarningSink for CollectingSink {
    fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn warn(&mut self, _warning: Warning) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        sink.warn(Warning::MissingAttrsMapIdentifier { tag: "div".to_string() });
        sink.warn(Warning::from_rejection("a", "onclick", Rejection::DangerousAttribute));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.warnings[1].tag(), "a");
        assert!(matches!(sink.warnings[1], Warning::DangerousAttribute { .. }));
    }

    #[test]
    fn test_null_sink_discards() {
        let mut sink = NullSink;
        sink.warn(Warning::VoidChildrenDiscarded { tag: "br".to_string(), count: 1 });
    }

    #[test]
    fn test_display() {
        let warning = Warning::from_style_rejection("p", "width", StyleRejection::DangerousValue("expression("));
        assert_eq!(warning.to_string(), "style 'width' of tag 'p' contains 'expression(', rejected");
        assert_eq!(
            Warning::from_rejection("a", "href", Rejection::DangerousProtocol("javascript:")).to_string(),
            "dangerous protocol 'javascript:' found in attribute 'href' of tag 'a'"
        );
    }
}
