//! Typed accessors
//!
//! String values resolved by the engine are converted on demand. Absent
//! values fall back to the key's declared default; conversion failures
//! become [`KeystoneError::Coercion`](crate::domain::KeystoneError::Coercion)
//! errors whose message never contains the raw value of a sensitive key.
//!
//! # Accepted Forms
//!
//! | Accessor       | Accepts                                               |
//! |----------------|-------------------------------------------------------|
//! | `get_int`      | 32-bit signed integer                                 |
//! | `get_long`     | 64-bit signed integer                                 |
//! | `get_double`   | floating point                                        |
//! | `get_bool`     | `true/false/yes/no/on/off/1/0`, any case              |
//! | `get_duration` | `500ms`, `30s`, `5m`, `2h`, `1d`, `1.5h`, `PT1M30S`, bare seconds |
//! | `get_list`     | delimiter-separated items, trimmed, empties dropped   |

pub mod accessor;
pub mod coerce;
pub mod mask;

pub use coerce::{parse_bool, parse_duration, parse_list, FromConfigValue};
pub use mask::mask_value;

/// Token displayed instead of a sensitive value
pub const REDACTION_TOKEN: &str = "[REDACTED]";

/// Text displayed for a key with no value and no default
pub const NOT_SET: &str = "<unset>";
