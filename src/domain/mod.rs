//! Domain types shared across Keystone.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, KeystoneError>`]:
//!
//! ```rust
//! use keystone::domain::{KeystoneError, Result};
//!
//! fn port(raw: &str) -> Result<u16> {
//!     raw.parse().map_err(|_| KeystoneError::Coercion {
//!         key: "http.port".to_string(),
//!         target: "int",
//!         value: raw.to_string(),
//!     })
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::KeystoneError;
pub use result::Result;
