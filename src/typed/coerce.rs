//! String to typed value conversions

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .expect("Invalid ISO duration regex")
});

/// Types a resolved string can be converted into
pub trait FromConfigValue: Sized {
    /// Human-readable type name used in coercion errors
    const TYPE_NAME: &'static str;

    /// Parses `raw`, returning `None` when it is not a valid value
    fn parse_value(raw: &str) -> Option<Self>;
}

macro_rules! impl_from_str_value {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn parse_value(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

impl_from_str_value! {
    i32 => "int",
    i64 => "long",
    u32 => "unsigned int",
    u64 => "unsigned long",
}

impl FromConfigValue for f64 {
    const TYPE_NAME: &'static str = "double";

    fn parse_value(raw: &str) -> Option<Self> {
        raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl FromConfigValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn parse_value(raw: &str) -> Option<Self> {
        parse_bool(raw)
    }
}

impl FromConfigValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_value(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FromConfigValue for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn parse_value(raw: &str) -> Option<Self> {
        parse_duration(raw)
    }
}

/// Parses a boolean
///
/// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, ignoring case and
/// surrounding whitespace.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parses a duration
///
/// Accepted forms, tried in order:
///
/// - an amount with a unit suffix: `ms`, `s`, `m`, `h` or `d`
///   (`500ms`, `30s`, `1.5h`)
/// - a bare amount, read as seconds
/// - ISO-8601 `PnDTnHnMnS` (`PT1M30S`, `P1D`)
///
/// Negative amounts are rejected.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    const UNITS: [(&str, u64); 5] = [
        ("ms", 1),
        ("s", 1_000),
        ("m", 60_000),
        ("h", 3_600_000),
        ("d", 86_400_000),
    ];

    let lower = text.to_ascii_lowercase();
    for (suffix, millis_per_unit) in UNITS {
        if let Some(amount) = lower.strip_suffix(suffix) {
            if let Some(duration) = scaled(amount.trim(), millis_per_unit) {
                return Some(duration);
            }
        }
    }

    scaled(text, 1_000).or_else(|| parse_iso_duration(text))
}

/// `amount` units of `millis_per_unit` milliseconds each
fn scaled(amount: &str, millis_per_unit: u64) -> Option<Duration> {
    if amount.is_empty() {
        return None;
    }
    if let Ok(whole) = amount.parse::<u64>() {
        return whole.checked_mul(millis_per_unit).map(Duration::from_millis);
    }
    let fractional = amount.parse::<f64>().ok()?;
    if !fractional.is_finite() || fractional < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(fractional * millis_per_unit as f64 / 1_000.0).ok()
}

fn parse_iso_duration(text: &str) -> Option<Duration> {
    let captures = ISO_DURATION.captures(text)?;
    if captures.iter().skip(1).all(|c| c.is_none()) {
        return None;
    }

    let whole = |index: usize| -> Option<u64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    let days = whole(1)?;
    let hours = whole(2)?;
    let minutes = whole(3)?;
    let seconds = match captures.get(4) {
        Some(m) => m.as_str().parse::<f64>().ok()?,
        None => 0.0,
    };

    let whole_secs = days
        .checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes.checked_mul(60)?)?;
    Duration::from_secs(whole_secs).checked_add(Duration::try_from_secs_f64(seconds).ok()?)
}

/// Splits a list value
///
/// Items are trimmed and empty items dropped, so `"a, ,b,"` yields
/// `["a", "b"]` and an empty string yields an empty list.
pub fn parse_list(raw: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        let item = raw.trim();
        return if item.is_empty() {
            Vec::new()
        } else {
            vec![item.to_string()]
        };
    }
    raw.split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
