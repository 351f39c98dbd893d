//! Result type alias for Keystone

use super::errors::KeystoneError;

/// Result type alias for Keystone operations
///
/// # Examples
///
/// ```
/// use keystone::domain::result::Result;
/// use keystone::domain::errors::KeystoneError;
///
/// fn lookup_port() -> Result<u16> {
///     Ok(8080)
/// }
///
/// fn failing_lookup() -> Result<()> {
///     Err(KeystoneError::MissingRequired("db.url".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, KeystoneError>;
