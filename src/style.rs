use crate::policy::{self, StyleRejection};

/// Result of offering one declaration to an [`InlineStyles`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleVerdict {
    Accepted,
    Rejected(StyleRejection),
    /// `create_new` was false and the property did not exist
    NotPresent,
}

/// Inline CSS declarations of one node, serialized into its `style` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyles {
    declarations: Vec<(String, String)>,
}

impl InlineStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw property/value pairs; unsafe declarations are skipped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::from_pairs_checked(pairs).0
    }

    /// Like [`from_pairs`](Self::from_pairs), also returning each skipped
    /// property with the reason.
    pub fn from_pairs_checked<I, K, V>(pairs: I) -> (Self, Vec<(String, StyleRejection)>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut styles = Self::new();
        let mut skipped = Vec::new();
        for (property, value) in pairs {
            if let StyleVerdict::Rejected(reason) = styles.update(property.as_ref(), value.as_ref(), true) {
                skipped.push((property.as_ref().to_string(), reason));
            }
        }
        (styles, skipped)
    }

    pub fn update(&mut self, property: &str, value: &str, create_new: bool) -> StyleVerdict {
        let property = policy::normalize_name(property);

        if !create_new && self.get(&property).is_none() {
            return StyleVerdict::NotPresent;
        }
        if let Err(reason) = policy::check_style_property(&property) {
            return StyleVerdict::Rejected(reason);
        }

        match policy::clean_style_value(value) {
            Ok(value) => {
                self.insert_clean(property, value);
                StyleVerdict::Accepted
            }
            Err(reason) => StyleVerdict::Rejected(reason),
        }
    }

    pub(crate) fn insert_clean(&mut self, property: String, value: String) {
        match self.declarations.iter_mut().find(|(key, _)| *key == property) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        let property = policy::normalize_name(property);
        self.declarations
            .iter()
            .find(|(key, _)| *key == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let property = policy::normalize_name(property);
        let index = self.declarations.iter().position(|(key, _)| *key == property)?;
        Some(self.declarations.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.declarations.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(property, value)| (property.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// `style='p1: v1; p2: v2;'`, or an empty string when there are no declarations.
    pub fn to_attribute_string(&self) -> String {
        if self.declarations.is_empty() {
            return String::new();
        }

        let body = self
            .declarations
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect::<Vec<_>>()
            .join("; ");
        format!("style='{};'", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_styles_serialize_to_nothing() {
        assert_eq!(InlineStyles::new().to_attribute_string(), "");
    }

    #[test]
    fn test_serialization_format() {
        let styles = InlineStyles::from_pairs([("color", "blue"), ("font-size", "16px"), ("margin", "10px")]);
        assert_eq!(
            styles.to_attribute_string(),
            "style='color: blue; font-size: 16px; margin: 10px;'"
        );

        let single = InlineStyles::from_pairs([("color", "red")]);
        assert_eq!(single.to_attribute_string(), "style='color: red;'");
    }

    #[test]
    fn test_properties_normalized_and_values_trimmed() {
        let styles = InlineStyles::from_pairs([(" Font-Weight ", "  bold  ")]);
        assert_eq!(styles.get("font-weight"), Some("bold"));
    }

    #[test]
    fn test_dangerous_values_dropped() {
        let styles = InlineStyles::from_pairs([
            ("background", "url(javascript:alert(1))"),
            ("width", "Expression(document.body.clientWidth)"),
            ("content", "<script>alert(1)</script>"),
            ("color", "green"),
        ]);
        assert_eq!(styles.len(), 1);
        assert_eq!(styles.to_attribute_string(), "style='color: green;'");
    }

    #[test]
    fn test_from_pairs_checked_reports_skipped() {
        let (styles, skipped) = InlineStyles::from_pairs_checked([("color", "red"), ("width", "expression(1)"), ("margin", " ")]);
        assert_eq!(styles.to_attribute_string(), "style='color: red;'");
        assert_eq!(
            skipped,
            vec![
                ("width".to_string(), StyleRejection::DangerousValue("expression(")),
                ("margin".to_string(), StyleRejection::EmptyValue),
            ]
        );
    }

    #[test]
    fn test_update_and_remove() {
        let mut styles = InlineStyles::from_pairs([("color", "red")]);

        assert_eq!(styles.update("margin", "0", false), StyleVerdict::NotPresent);
        assert_eq!(styles.update("color", "blue", false), StyleVerdict::Accepted);
        assert_eq!(styles.get("COLOR"), Some("blue"));
        assert_eq!(
            styles.update("color", "javascript:x", true),
            StyleVerdict::Rejected(StyleRejection::DangerousValue("javascript:"))
        );
        assert_eq!(styles.get("color"), Some("blue"));

        assert_eq!(styles.remove("color"), Some("blue".to_string()));
        assert!(styles.is_empty());
    }

    #[test]
    fn test_quotes_in_values_cannot_break_out() {
        let styles = InlineStyles::from_pairs([("font-family", "'Arial', sans-serif")]);
        assert_eq!(
            styles.to_attribute_string(),
            "style='font-family: &#x27;Arial&#x27;, sans-serif;'"
        );
    }
}
