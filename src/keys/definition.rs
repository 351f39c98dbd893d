//! Declared configuration keys

use crate::config::KeySettings;
use std::fmt;

/// Declaration of a configuration key
///
/// Declared keys seed eager resolution, carry the static default applied
/// when no source has a value, and drive masking.
///
/// ```rust
/// use keystone::keys::KeyDefinition;
///
/// let key = KeyDefinition::new("db.password")
///     .sensitive()
///     .required()
///     .with_description("Database password");
/// assert!(key.is_sensitive());
/// assert_eq!(key.default_value(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    name: String,
    default: Option<String>,
    sensitive: bool,
    required: bool,
    description: Option<String>,
}

impl KeyDefinition {
    /// Declares a key with no default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            sensitive: false,
            required: false,
            description: None,
        }
    }

    /// Sets the static default
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Marks the key as sensitive
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Marks the key as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Key name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static default, if any
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Whether the declaration itself flags the key as sensitive
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Whether the key must resolve
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for KeyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&KeySettings> for KeyDefinition {
    fn from(settings: &KeySettings) -> Self {
        Self {
            name: settings.name.clone(),
            default: settings.default.clone(),
            sensitive: settings.sensitive,
            required: settings.required,
            description: settings.description.clone(),
        }
    }
}
