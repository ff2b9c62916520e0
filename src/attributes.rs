use crate::policy::{self, CleanValue, Rejection};

/// Result of offering one attribute to an [`Attributes`] set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeVerdict {
    /// Stored as given (after escaping)
    Accepted,
    /// Stored, but cut to the length limit
    Truncated { original_len: usize },
    /// Refused by the security policy; the set is unchanged
    Rejected(Rejection),
    /// `create_new` was false and the attribute did not exist
    NotPresent,
}

impl AttributeVerdict {
    pub fn is_stored(&self) -> bool {
        matches!(self, AttributeVerdict::Accepted | AttributeVerdict::Truncated { .. })
    }
}

/// Validated attribute set of one node.
///
/// Keys are unique and kept in insertion order so serialization is
/// deterministic. Each value is kept twice: the logical value returned by
/// [`get`](Self::get), and its entity-escaped form computed on insertion and
/// emitted by [`to_html_string`](Self::to_html_string).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    value: String,
    escaped: String,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw pairs. Pairs refused by the policy are skipped;
    /// use [`from_pairs_checked`](Self::from_pairs_checked) to see which.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::from_pairs_checked(pairs).0
    }

    /// Like [`from_pairs`](Self::from_pairs), also returning every pair that
    /// was not stored as given (rejected or truncated) with its verdict.
    pub fn from_pairs_checked<I, K, V>(pairs: I) -> (Self, Vec<(String, AttributeVerdict)>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut attributes = Self::new();
        let mut refused = Vec::new();
        for (name, value) in pairs {
            let verdict = attributes.update_attribute(name.as_ref(), value.as_ref(), true);
            if verdict != AttributeVerdict::Accepted {
                refused.push((name.as_ref().to_string(), verdict));
            }
        }
        (attributes, refused)
    }

    /// Set `name` to `value`, running the attribute policy first.
    ///
    /// With `create_new == false` only an existing attribute is updated.
    pub fn update_attribute(&mut self, name: &str, value: &str, create_new: bool) -> AttributeVerdict {
        let name = policy::normalize_name(name);

        if !create_new && !self.contains(&name) {
            return AttributeVerdict::NotPresent;
        }
        if let Err(reason) = policy::check_attribute_name(&name) {
            return AttributeVerdict::Rejected(reason);
        }

        match policy::check_attribute_value(value) {
            Ok(clean) => {
                let verdict = match clean.truncated_from {
                    Some(original_len) => AttributeVerdict::Truncated { original_len },
                    None => AttributeVerdict::Accepted,
                };
                self.insert_clean(name, clean);
                verdict
            }
            Err(reason) => AttributeVerdict::Rejected(reason),
        }
    }

    /// Store a pair that already went through [`policy`].
    pub(crate) fn insert_clean(&mut self, name: String, clean: CleanValue) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.value = clean.value;
                entry.escaped = clean.escaped;
            }
            None => self.entries.push(Entry {
                name,
                value: clean.value,
                escaped: clean.escaped,
            }),
        }
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        let name = policy::normalize_name(name);
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Logical (unescaped) value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|entry| entry.value.as_str())
    }

    /// Value of `name` as it appears in markup
    pub fn get_escaped(&self, name: &str) -> Option<&str> {
        self.find(name).map(|entry| entry.escaped.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let name = policy::normalize_name(name);
        let index = self.entries.iter().position(|entry| entry.name == name)?;
        Some(self.entries.remove(index).value)
    }

    /// Remove every attribute
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keep the attributes for which `keep(name, value)` holds.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.entries.retain(|entry| keep(&entry.name, &entry.value));
    }

    /// `(name, logical value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The identity attribute (`id`), if set
    pub fn unique_id(&self) -> Option<&str> {
        self.get("id")
    }

    /// `name='value'` pairs separated by single spaces; empty when the set is empty.
    pub fn to_html_string(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}='{}'", entry.name, entry.escaped))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_string_empty() {
        assert_eq!(Attributes::new().to_html_string(), "");
    }

    #[test]
    fn test_to_html_string_keeps_order() {
        let attrs = Attributes::from_pairs([("class", "container"), ("id", "main"), ("data-value", "test")]);
        assert_eq!(
            attrs.to_html_string(),
            "class='container' id='main' data-value='test'"
        );
    }

    #[test]
    fn test_clear() {
        let mut attrs = Attributes::from_pairs([("class", "container"), ("id", "main")]);
        attrs.clear();
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_update_attribute_create_new() {
        let mut attrs = Attributes::from_pairs([("class", "container")]);
        assert_eq!(attrs.update_attribute("data-test", "value", true), AttributeVerdict::Accepted);
        assert_eq!(attrs.get("data-test"), Some("value"));
    }

    #[test]
    fn test_update_attribute_without_create_new() {
        let mut attrs = Attributes::from_pairs([("id", "test-id"), ("class", "old-value")]);

        assert_eq!(
            attrs.update_attribute("data-custom", "value", false),
            AttributeVerdict::NotPresent
        );
        assert!(!attrs.contains("data-custom"));

        assert_eq!(attrs.update_attribute("class", "new-value", false), AttributeVerdict::Accepted);
        assert_eq!(attrs.get("class"), Some("new-value"));
        assert_eq!(attrs.to_html_string(), "id='test-id' class='new-value'");
    }

    #[test]
    fn test_update_attribute_applies_policy() {
        let mut attrs = Attributes::new();
        assert_eq!(
            attrs.update_attribute("onclick", "alert(1)", true),
            AttributeVerdict::Rejected(Rejection::DangerousAttribute)
        );
        assert_eq!(
            attrs.update_attribute("href", "JAVASCRIPT:alert(1)", true),
            AttributeVerdict::Rejected(Rejection::DangerousProtocol("javascript:"))
        );
        assert_eq!(
            attrs.update_attribute("style", "color: red", true),
            AttributeVerdict::Rejected(Rejection::ReservedName)
        );
        assert!(attrs.is_empty());

        let verdict = attrs.update_attribute("title", &"t".repeat(1200), true);
        assert_eq!(verdict, AttributeVerdict::Truncated { original_len: 1200 });
        assert_eq!(attrs.get("title").map(str::len), Some(1000));
    }

    #[test]
    fn test_names_are_normalized() {
        let mut attrs = Attributes::new();
        attrs.update_attribute("  CLASS ", "a", true);
        attrs.update_attribute("class", "b", true);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("Class"), Some("b"));
    }

    #[test]
    fn test_values_kept_logical_and_escaped() {
        let mut attrs = Attributes::new();
        attrs.update_attribute("title", "Tom & 'Jerry' <3", true);
        assert_eq!(attrs.get("title"), Some("Tom & 'Jerry' <3"));
        assert_eq!(attrs.get_escaped("title"), Some("Tom &amp; &#x27;Jerry&#x27; &lt;3"));
        assert_eq!(attrs.to_html_string(), "title='Tom &amp; &#x27;Jerry&#x27; &lt;3'");
    }

    #[test]
    fn test_length_limit_applies_to_logical_value() {
        let mut attrs = Attributes::new();
        let verdict = attrs.update_attribute("title", &"&".repeat(1200), true);
        assert_eq!(verdict, AttributeVerdict::Truncated { original_len: 1200 });
        assert_eq!(attrs.get("title").map(|v| v.chars().count()), Some(1000));
        assert!(attrs.get_escaped("title").unwrap().starts_with("&amp;&amp;"));
    }

    #[test]
    fn test_from_pairs_checked_reports_refusals() {
        let (attrs, refused) = Attributes::from_pairs_checked([
            ("class", "ok"),
            ("onclick", "alert(1)"),
            ("href", "javascript:void(0)"),
        ]);
        assert_eq!(attrs.to_html_string(), "class='ok'");
        assert_eq!(
            refused,
            vec![
                ("onclick".to_string(), AttributeVerdict::Rejected(Rejection::DangerousAttribute)),
                (
                    "href".to_string(),
                    AttributeVerdict::Rejected(Rejection::DangerousProtocol("javascript:"))
                ),
            ]
        );
    }

    #[test]
    fn test_remove_attribute_and_unique_id() {
        let mut attrs = Attributes::from_pairs([("id", "main"), ("class", "x")]);
        assert_eq!(attrs.unique_id(), Some("main"));
        assert_eq!(attrs.remove_attribute("id"), Some("main".to_string()));
        assert_eq!(attrs.unique_id(), None);
        assert_eq!(attrs.remove_attribute("id"), None);
    }
}
