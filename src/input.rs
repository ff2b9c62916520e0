//! Text front end: YAML or JSON source into a `serde_yaml::Value`.
//!
//! Every node level costs two collection levels (the node mapping and its
//! `children` sequence). The deepest node can add two more (`attributes`
//! and its `style` mapping). Nesting beyond that is refused as
//! [`HtmlError::RecursionLimitExceeded`] before the builder runs.
//!
//! JSON text is parsed without serde_json's own recursion limit, after a
//! non-recursive scan has bounded its bracket depth. YAML text goes through
//! serde_yaml, whose collection limit is fixed, so YAML documents nest at
//! most [`YAML_MAX_NODE_DEPTH`] levels regardless of the configured ceiling.

use crate::error::{HtmlError, HtmlResult};
use serde::Deserialize;
use serde_yaml::Value;

/// Collections serde_yaml will nest before giving up.
pub const YAML_MAX_COLLECTION_DEPTH: usize = 128;

/// Deepest node level a YAML document can reach with attributes and styles.
pub const YAML_MAX_NODE_DEPTH: usize = (YAML_MAX_COLLECTION_DEPTH - 4) / 2;

/// Bracket depth a document with nodes down to `max_depth` may use.
pub fn collection_depth_limit(max_depth: usize) -> usize {
    max_depth.saturating_mul(2).saturating_add(3)
}

/// Parse YAML or JSON text for a builder whose ceiling is `max_depth`.
pub fn parse_value(source: &str, max_depth: usize) -> HtmlResult<Value> {
    if looks_like_json(source) {
        if bracket_depth(source) > collection_depth_limit(max_depth) {
            return Err(HtmlError::RecursionLimitExceeded { max_depth });
        }
        match parse_json(source) {
            Ok(value) => return Ok(value),
            // Flow-style YAML also starts with a bracket
            Err(err) => tracing::debug!(%err, "not JSON, reading as YAML"),
        }
    }
    parse_yaml(source, max_depth)
}

fn looks_like_json(source: &str) -> bool {
    matches!(source.trim_start().as_bytes().first(), Some(b'{') | Some(b'['))
}

/// Deepest `{`/`[` nesting outside double-quoted strings.
fn bracket_depth(source: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in source.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn parse_json(source: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(source);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

fn parse_yaml(source: &str, max_depth: usize) -> HtmlResult<Value> {
    serde_yaml::from_str(source).map_err(|err| {
        if err.to_string().contains("recursion limit exceeded") {
            HtmlError::RecursionLimitExceeded {
                max_depth: max_depth.min(YAML_MAX_NODE_DEPTH),
            }
        } else {
            HtmlError::from(err)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_depth_ignores_strings() {
        assert_eq!(bracket_depth(r#"{"a": [1, {"b": "[[[{"}]}"#), 3);
        assert_eq!(bracket_depth(r#"{"a": "quote \" [ inside"}"#), 1);
        assert_eq!(bracket_depth("tag_name: div"), 0);
    }

    #[test]
    fn test_yaml_node_depth() {
        assert_eq!(YAML_MAX_NODE_DEPTH, 62);
        assert_eq!(collection_depth_limit(100), 203);
        assert_eq!(collection_depth_limit(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let json = parse_value(r#"{"tag_name": "p", "children": ["hi"]}"#, 10).unwrap();
        let yaml = parse_value("tag_name: p\nchildren: [hi]\n", 10).unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_flow_yaml_falls_back() {
        let value = parse_value("{tag_name: div, children: [text]}", 10).unwrap();
        assert_eq!(value["tag_name"], Value::from("div"));
    }

    #[test]
    fn test_runaway_json_refused_before_parsing() {
        let source = "[".repeat(100_000);
        assert!(matches!(
            parse_value(&source, 100),
            Err(HtmlError::RecursionLimitExceeded { max_depth: 100 })
        ));
    }

    #[test]
    fn test_yaml_limit_reported_as_recursion() {
        let mut source = String::from("a:\n");
        for level in 1..200 {
            source.push_str(&" ".repeat(level * 2));
            source.push_str("a:\n");
        }
        assert!(matches!(
            parse_value(&source, 100),
            Err(HtmlError::RecursionLimitExceeded { max_depth: 62 })
        ));
    }

    #[test]
    fn test_syntax_errors_stay_yaml_errors() {
        assert!(matches!(parse_value("tag_name: [unclosed", 10), Err(HtmlError::Yaml(_))));
    }
}
