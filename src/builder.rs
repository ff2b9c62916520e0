//! Construction pipeline: untrusted nested mappings → validated [`HtmlNode`] trees.
//!
//! Structural problems (wrong shapes, bad or unknown tags, runaway nesting)
//! abort the build. Attribute and style problems only degrade the node and
//! are reported through a [`WarningSink`].

use crate::attributes::Attributes;
use crate::catalog::Catalog;
use crate::config::BuildConfig;
use crate::error::{HtmlError, HtmlResult};
use crate::input;
use crate::node::{Child, Children, HtmlNode};
use crate::policy;
use crate::resolver::{AttributeResolver, DEFAULT_ATTRS_MAP_IDENTIFIER};
use crate::style::InlineStyles;
use crate::warning::{TracingSink, Warning, WarningSink};
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;

const TAG_NAME_KEY: &str = "tag_name";
const ATTRIBUTES_KEY: &str = "attributes";
const CHILDREN_KEY: &str = "children";
const ATTRS_MAP_IDENTIFIER_KEY: &str = "attrs_map_identifier";
const STYLE_KEY: &str = "style";

/// Human-readable name of a value's type, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Builds validated trees from `{tag_name, attributes?, children?}` mappings.
///
/// ```ignore
/// use nulltrace_html::{HtmlCatalog, NodeBuilder};
///
/// let data: serde_yaml::Value = serde_yaml::from_str(r#"
/// tag_name: div
/// attributes: { class: container }
/// children: ["Hello"]
/// "#)?;
/// let node = NodeBuilder::new(&HtmlCatalog).with_max_depth(10).build(&data)?;
/// ```
pub struct NodeBuilder<'a> {
    catalog: &'a dyn Catalog,
    resolver: Option<&'a dyn AttributeResolver>,
    config: BuildConfig,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self {
            catalog,
            resolver: None,
            config: BuildConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Take attributes from `resolver` (keyed by `attrs_map_identifier`)
    /// instead of the inline `attributes` field.
    pub fn with_resolver(mut self, resolver: &'a dyn AttributeResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build a tree, logging warnings through `tracing`.
    pub fn build(&self, data: &Value) -> HtmlResult<HtmlNode> {
        self.build_with_sink(data, &mut TracingSink)
    }

    pub fn build_with_sink(&self, data: &Value, sink: &mut dyn WarningSink) -> HtmlResult<HtmlNode> {
        self.build_at_depth(data, 0, sink)
    }

    /// Parse YAML or JSON text and build it, logging warnings through `tracing`.
    pub fn parse(&self, source: &str) -> HtmlResult<HtmlNode> {
        self.parse_with_sink(source, &mut TracingSink)
    }

    /// Parse YAML or JSON text within this builder's depth ceiling, then build it.
    pub fn parse_with_sink(&self, source: &str, sink: &mut dyn WarningSink) -> HtmlResult<HtmlNode> {
        let data = input::parse_value(source, self.config.max_depth)?;
        self.build_with_sink(&data, sink)
    }

    /// Turn a dynamic value into a child: a mapping becomes a node, a string
    /// becomes escaped text.
    pub fn child_from_value(&self, value: &Value, sink: &mut dyn WarningSink) -> HtmlResult<Child> {
        match value {
            Value::Mapping(_) => self.build_with_sink(value, sink).map(Child::Node),
            Value::String(text) => Ok(Child::text(text)),
            other => Err(HtmlError::InvalidChildType {
                found: value_kind(other).to_string(),
            }),
        }
    }

    fn build_at_depth(&self, data: &Value, depth: usize, sink: &mut dyn WarningSink) -> HtmlResult<HtmlNode> {
        if depth > self.config.max_depth {
            return Err(HtmlError::RecursionLimitExceeded {
                max_depth: self.config.max_depth,
            });
        }

        let map = data.as_mapping().ok_or_else(|| HtmlError::InvalidInputType {
            field: "node".to_string(),
            expected: "mapping".to_string(),
            found: value_kind(data).to_string(),
        })?;

        let raw_tag = match map.get(TAG_NAME_KEY) {
            Some(Value::String(tag)) => tag,
            other => {
                return Err(HtmlError::InvalidInputType {
                    field: TAG_NAME_KEY.to_string(),
                    expected: "string".to_string(),
                    found: other.map(value_kind).unwrap_or("nothing").to_string(),
                })
            }
        };

        let tag = policy::validate_tag_name(raw_tag)?;
        let spec = self
            .catalog
            .lookup(&tag)
            .ok_or_else(|| HtmlError::UnsupportedTag { tag: tag.clone() })?;

        let (raw_attrs, identifier) = self.raw_attributes(map, &tag, sink)?;
        let (attributes, inline_styles) = validate_attributes(&tag, &raw_attrs, sink)?;

        let mut children = self.build_children(map.get(CHILDREN_KEY), depth, sink)?;
        if spec.self_closing && !children.is_empty() {
            sink.warn(Warning::VoidChildrenDiscarded {
                tag: tag.clone(),
                count: children.len(),
            });
            children.clear();
        }

        tracing::debug!(
            tag = %tag,
            depth,
            attributes = attributes.len(),
            children = children.len(),
            "built node"
        );

        let mut node = HtmlNode::from_parts(tag, spec.self_closing, attributes, inline_styles, children);
        node.set_attrs_map_identifier(identifier);
        Ok(node)
    }

    /// Pick the raw attribute mapping: inline, or from the resolver.
    fn raw_attributes<'m>(
        &self,
        map: &'m Mapping,
        tag: &str,
        sink: &mut dyn WarningSink,
    ) -> HtmlResult<(Cow<'m, Mapping>, Option<String>)> {
        let Some(resolver) = self.resolver else {
            let attrs = match map.get(ATTRIBUTES_KEY) {
                None | Some(Value::Null) => Cow::Owned(Mapping::new()),
                Some(Value::Mapping(attrs)) => Cow::Borrowed(attrs),
                Some(other) => {
                    return Err(HtmlError::InvalidInputType {
                        field: ATTRIBUTES_KEY.to_string(),
                        expected: "mapping".to_string(),
                        found: value_kind(other).to_string(),
                    })
                }
            };
            return Ok((attrs, None));
        };

        let identifier = match map.get(ATTRS_MAP_IDENTIFIER_KEY) {
            Some(Value::String(identifier)) => identifier.clone(),
            None | Some(Value::Null) => {
                sink.warn(Warning::MissingAttrsMapIdentifier { tag: tag.to_string() });
                DEFAULT_ATTRS_MAP_IDENTIFIER.to_string()
            }
            Some(other) => {
                return Err(HtmlError::InvalidInputType {
                    field: ATTRS_MAP_IDENTIFIER_KEY.to_string(),
                    expected: "string".to_string(),
                    found: value_kind(other).to_string(),
                })
            }
        };

        let attrs = resolver.resolve(&identifier).unwrap_or_default();
        Ok((Cow::Owned(attrs), Some(identifier)))
    }

    fn build_children(
        &self,
        raw: Option<&Value>,
        depth: usize,
        sink: &mut dyn WarningSink,
    ) -> HtmlResult<Children> {
        let items = match raw {
            None | Some(Value::Null) => return Ok(Children::new()),
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                return Err(HtmlError::InvalidChildrenType {
                    found: value_kind(other).to_string(),
                })
            }
        };

        let mut children = Children::new();
        for (index, item) in items.iter().enumerate() {
            let child = match item {
                Value::Mapping(_) => Child::Node(self.build_at_depth(item, depth + 1, sink)?),
                Value::String(text) => Child::text(text),
                other => {
                    return Err(HtmlError::InvalidInputType {
                        field: format!("{}[{}]", CHILDREN_KEY, index),
                        expected: "node mapping or text".to_string(),
                        found: value_kind(other).to_string(),
                    })
                }
            };
            children.push(child);
        }
        Ok(children)
    }
}

/// Split the raw mapping into validated attributes and inline styles.
///
/// `style` is diverted first and must be a mapping; every other entry goes
/// through the attribute policy and is dropped with a warning on failure.
fn validate_attributes(
    tag: &str,
    raw: &Mapping,
    sink: &mut dyn WarningSink,
) -> HtmlResult<(Attributes, InlineStyles)> {
    let mut inline_styles = InlineStyles::new();
    for (key, value) in raw {
        let is_style = key
            .as_str()
            .is_some_and(|name| policy::normalize_name(name) == STYLE_KEY);
        if !is_style {
            continue;
        }
        match value {
            Value::Mapping(styles) => build_styles(tag, styles, &mut inline_styles, sink),
            other => {
                return Err(HtmlError::InvalidStyleValue {
                    found: value_kind(other).to_string(),
                })
            }
        }
    }

    let mut attributes = Attributes::new();
    for (key, value) in raw {
        let Some(raw_name) = key.as_str() else {
            sink.warn(Warning::InvalidAttributeName {
                tag: tag.to_string(),
                attribute: format!("<{} key>", value_kind(key)),
            });
            continue;
        };

        let name = policy::normalize_name(raw_name);
        if name == STYLE_KEY {
            continue;
        }

        if let Err(reason) = policy::check_attribute_name(&name) {
            sink.warn(Warning::from_rejection(tag, &name, reason));
            continue;
        }

        let Some(text) = value.as_str() else {
            sink.warn(Warning::NonStringAttributeValue {
                tag: tag.to_string(),
                attribute: name,
                found: value_kind(value),
            });
            continue;
        };

        match policy::check_attribute_value(text) {
            Ok(clean) => {
                if let Some(length) = clean.truncated_from {
                    sink.warn(Warning::ValueTruncated {
                        tag: tag.to_string(),
                        attribute: name.clone(),
                        length,
                    });
                }
                attributes.insert_clean(name, clean);
            }
            Err(reason) => sink.warn(Warning::from_rejection(tag, &name, reason)),
        }
    }

    Ok((attributes, inline_styles))
}

fn build_styles(tag: &str, raw: &Mapping, styles: &mut InlineStyles, sink: &mut dyn WarningSink) {
    for (key, value) in raw {
        let Some(raw_property) = key.as_str() else {
            sink.warn(Warning::InvalidStyleProperty {
                tag: tag.to_string(),
                property: format!("<{} key>", value_kind(key)),
            });
            continue;
        };
        let property = policy::normalize_name(raw_property);

        if let Err(reason) = policy::check_style_property(&property) {
            sink.warn(Warning::from_style_rejection(tag, &property, reason));
            continue;
        }

        let text = match value {
            Value::String(text) => Cow::Borrowed(text.as_str()),
            Value::Number(number) => Cow::Owned(number.to_string()),
            Value::Bool(flag) => Cow::Owned(flag.to_string()),
            other => {
                sink.warn(Warning::UnusableStyleValue {
                    tag: tag.to_string(),
                    property,
                    found: value_kind(other),
                });
                continue;
            }
        };

        match policy::clean_style_value(&text) {
            Ok(clean) => styles.insert_clean(property, clean),
            Err(reason) => sink.warn(Warning::from_style_rejection(tag, &property, reason)),
        }
    }
}
