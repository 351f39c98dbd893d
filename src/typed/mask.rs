//! Redaction of sensitive values

/// Returns `value`, or `token` when the value belongs to a sensitive key
pub fn mask_value(value: &str, sensitive: bool, token: &str) -> String {
    if sensitive {
        token.to_string()
    } else {
        value.to_string()
    }
}
