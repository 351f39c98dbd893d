//! Typed accessor methods on [`ConfigEngine`]

use super::coerce::{parse_list, FromConfigValue};
use super::mask::mask_value;
use super::NOT_SET;
use crate::config::{secret_string, SecretString};
use crate::core::ConfigEngine;
use crate::domain::{KeystoneError, Result};
use std::time::Duration;

impl ConfigEngine {
    /// Value for `key`, falling back to the declared default
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| self.default_for(key))
    }

    /// Value for `key` converted to `T`
    ///
    /// Returns `Ok(None)` when the key has neither a value nor a default.
    ///
    /// # Errors
    ///
    /// Returns [`KeystoneError::Coercion`] when the value does not parse.
    pub fn get_as<T: FromConfigValue>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_string(key) else {
            return Ok(None);
        };
        match T::parse_value(&raw) {
            Some(value) => Ok(Some(value)),
            None => Err(self.coercion_error(key, T::TYPE_NAME, &raw)),
        }
    }

    /// Like [`get_as`](Self::get_as) but a missing value is an error
    ///
    /// # Errors
    ///
    /// Returns [`KeystoneError::MissingRequired`] or
    /// [`KeystoneError::Coercion`].
    pub fn require_as<T: FromConfigValue>(&self, key: &str) -> Result<T> {
        self.get_as(key)?
            .ok_or_else(|| KeystoneError::MissingRequired(key.to_string()))
    }

    /// String value that must be present
    ///
    /// # Errors
    ///
    /// Returns [`KeystoneError::MissingRequired`] when absent.
    pub fn require_string(&self, key: &str) -> Result<String> {
        self.get_string(key)
            .ok_or_else(|| KeystoneError::MissingRequired(key.to_string()))
    }

    /// 32-bit integer value
    pub fn get_int(&self, key: &str) -> Result<Option<i32>> {
        self.get_as(key)
    }

    /// 64-bit integer value
    pub fn get_long(&self, key: &str) -> Result<Option<i64>> {
        self.get_as(key)
    }

    /// Floating point value
    pub fn get_double(&self, key: &str) -> Result<Option<f64>> {
        self.get_as(key)
    }

    /// Boolean value
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get_as(key)
    }

    /// Duration value, see [`parse_duration`](super::parse_duration)
    pub fn get_duration(&self, key: &str) -> Result<Option<Duration>> {
        self.get_as(key)
    }

    /// List value split on the configured delimiter
    ///
    /// A present but empty value yields `Some(vec![])`.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get_list_with(key, &self.options().list_delimiter)
    }

    /// List value split on `delimiter`
    pub fn get_list_with(&self, key: &str, delimiter: &str) -> Option<Vec<String>> {
        self.get_string(key).map(|raw| parse_list(&raw, delimiter))
    }

    /// Value suitable for logs and listings
    ///
    /// Sensitive keys always display the redaction token, whether or not
    /// they resolve.
    pub fn display(&self, key: &str) -> String {
        if self.is_sensitive(key) {
            return self.options().redaction_token.clone();
        }
        self.get_string(key)
            .unwrap_or_else(|| NOT_SET.to_string())
    }

    /// Value wrapped so it cannot leak through `Debug` output
    pub fn get_secret(&self, key: &str) -> Option<SecretString> {
        self.get_string(key).map(secret_string)
    }

    /// Checks that every key declared `required` has a value or default
    ///
    /// # Errors
    ///
    /// Returns [`KeystoneError::MissingRequired`] for a single missing key,
    /// or a validation error naming all of them.
    pub fn check_required(&self) -> Result<()> {
        let mut missing: Vec<String> = self
            .required_keys()
            .into_iter()
            .filter(|name| self.get_string(name).is_none())
            .collect();

        match missing.len() {
            0 => Ok(()),
            1 => Err(KeystoneError::MissingRequired(missing.remove(0))),
            _ => Err(KeystoneError::Validation(format!(
                "Required configuration keys have no value: {}",
                missing.join(", ")
            ))),
        }
    }

    fn coercion_error(&self, key: &str, target: &'static str, raw: &str) -> KeystoneError {
        KeystoneError::Coercion {
            key: key.to_string(),
            target,
            value: mask_value(raw, self.is_sensitive(key), &self.options().redaction_token),
        }
    }
}
