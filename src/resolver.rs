//! External attribute maps.
//!
//! A node may carry an `attrs_map_identifier` instead of inline attributes.
//! When the builder is given an [`AttributeResolver`], the identifier is
//! looked up there and the inline `attributes` field is ignored.

use crate::error::HtmlResult;
use serde_yaml::Mapping;
use std::collections::HashMap;

pub const DEFAULT_ATTRS_MAP_IDENTIFIER: &str = "default";

pub trait AttributeResolver: Send + Sync {
    fn resolve(&self, identifier: &str) -> Option<Mapping>;
}

impl<F> AttributeResolver for F
where
    F: Fn(&str) -> Option<Mapping> + Send + Sync,
{
    fn resolve(&self, identifier: &str) -> Option<Mapping> {
        self(identifier)
    }
}

/// Identifier → raw attribute mapping table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    maps: HashMap<String, Mapping>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table shaped like `{identifier: {attribute: value, ...}, ...}`
    pub fn from_yaml(yaml: &str) -> HtmlResult<Self> {
        let maps: HashMap<String, Mapping> = serde_yaml::from_str(yaml)?;
        Ok(Self { maps })
    }

    pub fn insert(&mut self, identifier: impl Into<String>, attributes: Mapping) {
        self.maps.insert(identifier.into(), attributes);
    }

    pub fn get(&self, identifier: &str) -> Option<&Mapping> {
        self.maps.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl AttributeResolver for AttributeMap {
    fn resolve(&self, identifier: &str) -> Option<Mapping> {
        self.maps.get(identifier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn test_attribute_map_from_yaml() {
        let map = AttributeMap::from_yaml(
            "default:\n  class: plain\ncard:\n  class: card\n  style:\n    padding: 8px\n",
        )
        .unwrap();

        assert_eq!(map.len(), 2);
        let card = map.resolve("card").unwrap();
        assert_eq!(card.get("class"), Some(&Value::String("card".to_string())));
        assert!(card.get("style").unwrap().is_mapping());
        assert!(map.resolve("missing").is_none());
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |identifier: &str| {
            let mut mapping = Mapping::new();
            mapping.insert(Value::from("class"), Value::from(identifier));
            Some(mapping)
        };
        let resolved = AttributeResolver::resolve(&resolver, "hero").unwrap();
        assert_eq!(resolved.get("class"), Some(&Value::from("hero")));
    }
}
