use thiserror::Error;

pub type HtmlResult<T> = Result<T, HtmlError>;

/// Broad class of an [`HtmlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Adversarial or out-of-policy structure: bad tag names, unknown tags, runaway nesting
    SecurityViolation,
    /// A field had the wrong shape (tag name not a string, children not a list, ...)
    InvalidInputType,
    /// `style` was present but not a mapping
    InvalidStyleValue,
    /// A mutation broke a tree invariant
    ContractViolation,
    /// The input text could not be read as YAML/JSON
    Input,
    /// Writing rendered markup failed
    Io,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HtmlError {
    // --- security violations ---

    #[error("Security violation: maximum recursion depth ({max_depth}) exceeded. Possible DoS attack or malformed data")]
    RecursionLimitExceeded { max_depth: usize },

    #[error("Security violation: tag name contains invalid characters: '{tag}'. Only lowercase alphanumeric characters and hyphens are allowed")]
    InvalidTagName { tag: String },

    #[error("Security violation: tag name too long: {length} characters (tag '{tag}')")]
    TagNameTooLong { tag: String, length: usize },

    #[error("Security violation: invalid or unsupported tag name: '{tag}'")]
    UnsupportedTag { tag: String },

    // --- shape errors ---

    #[error("Invalid type for '{field}': expected {expected}, got {found}")]
    InvalidInputType {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Children must be a sequence, got {found}")]
    InvalidChildrenType { found: String },

    #[error("Child must be a node mapping or text, got {found}")]
    InvalidChildType { found: String },

    #[error("Style attribute must be a mapping of CSS properties, got {found}")]
    InvalidStyleValue { found: String },

    // --- mutation contract ---

    #[error("Cannot add children to self-closing element <{tag}>")]
    VoidElementChildren { tag: String },

    // --- outer surfaces ---

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl HtmlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HtmlError::RecursionLimitExceeded { .. }
            | HtmlError::InvalidTagName { .. }
            | HtmlError::TagNameTooLong { .. }
            | HtmlError::UnsupportedTag { .. } => ErrorKind::SecurityViolation,
            HtmlError::InvalidInputType { .. }
            | HtmlError::InvalidChildrenType { .. }
            | HtmlError::InvalidChildType { .. } => ErrorKind::InvalidInputType,
            HtmlError::InvalidStyleValue { .. } => ErrorKind::InvalidStyleValue,
            HtmlError::VoidElementChildren { .. } => ErrorKind::ContractViolation,
            HtmlError::Yaml(_) => ErrorKind::Input,
            HtmlError::Io(_) => ErrorKind::Io,
        }
    }

    pub fn is_security_violation(&self) -> bool {
        self.kind() == ErrorKind::SecurityViolation
    }
}

impl From<serde_yaml::Error> for HtmlError {
    fn from(err: serde_yaml::Error) -> Self {
        HtmlError::Yaml(err.to_string())
    }
}

impl From<std::io::Error> for HtmlError {
    fn from(err: std::io::Error) -> Self {
        HtmlError::Io(err.to_string())
    }
}
