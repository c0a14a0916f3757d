//! Human-readable durations ("5 min", "1h", "2 days").

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)?\s*([a-zA-Z]+)?\s*$").expect("valid duration regex")
});

/// A duration string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid duration: {0:?}")]
pub struct InvalidDuration(pub String);

/// Parse a duration such as `"30s"`, `"5 min"`, `"1 hour"`, `"hour"` or `"900"`.
///
/// A bare number is seconds; a bare unit means one of that unit.
pub fn parse_duration(input: &str) -> Result<Duration, InvalidDuration> {
    let invalid = || InvalidDuration(input.to_string());

    let caps = DURATION_RE.captures(input).ok_or_else(invalid)?;
    let amount = caps.get(1).map(|m| m.as_str());
    let unit = caps.get(2).map(|m| m.as_str().to_lowercase());

    if amount.is_none() && unit.is_none() {
        return Err(invalid());
    }

    let amount: f64 = match amount {
        Some(a) => a.parse().map_err(|_| invalid())?,
        None => 1.0,
    };

    let unit_secs: f64 = match unit.as_deref() {
        None | Some("s" | "sec" | "secs" | "second" | "seconds") => 1.0,
        Some("m" | "min" | "mins" | "minute" | "minutes") => 60.0,
        Some("h" | "hr" | "hrs" | "hour" | "hours") => 3600.0,
        Some("d" | "day" | "days") => 86_400.0,
        Some("w" | "wk" | "week" | "weeks") => 604_800.0,
        Some(_) => return Err(invalid()),
    };

    Duration::try_from_secs_f64(amount * unit_secs).map_err(|_| invalid())
}
