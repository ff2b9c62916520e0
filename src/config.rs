use crate::error::HtmlResult;
use crate::policy::MAX_RECURSION_DEPTH;
use serde::{Deserialize, Serialize};

/// Settings for [`NodeBuilder`](crate::builder::NodeBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Deepest nesting level accepted; the root is level 0
    pub max_depth: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_RECURSION_DEPTH,
        }
    }
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Read a config document; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> HtmlResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth() {
        assert_eq!(BuildConfig::default().max_depth, 100);
    }

    #[test]
    fn test_from_yaml() {
        assert_eq!(BuildConfig::from_yaml("max_depth: 12").unwrap().max_depth, 12);
        assert_eq!(BuildConfig::from_yaml("").unwrap(), BuildConfig::default());
        assert_eq!(BuildConfig::from_yaml("{}").unwrap(), BuildConfig::default());
        assert!(BuildConfig::from_yaml("max_depth: deep").is_err());
    }
}
