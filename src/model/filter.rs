//! Time, traffic and legacy filters attached to report criteria.

use std::sync::LazyLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::duration::parse_duration;
use crate::error::{ReportError, ReportResult};

static LAST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*last\s+(.+?)\s*$").expect("valid range regex"));

/// Time window of a report, in absolute epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeFilter {
    start: i64,
    end: i64,
}

impl TimeFilter {
    /// Create a window from epoch seconds. `start` must not be after `end`.
    pub fn new(start: i64, end: i64) -> ReportResult<Self> {
        if start > end {
            return Err(ReportError::invalid(format!(
                "time filter start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The window of length `span` ending at `end`.
    pub fn ending_at(end: i64, span: Duration) -> ReportResult<Self> {
        let start = i64::try_from(span.as_secs())
            .ok()
            .and_then(|secs| end.checked_sub(secs))
            .ok_or_else(|| {
                ReportError::invalid(format!("time span of {}s is out of range", span.as_secs()))
            })?;
        Ok(Self { start, end })
    }

    /// The window of length `span` ending now.
    pub fn last(span: Duration) -> ReportResult<Self> {
        Self::ending_at(now_epoch_secs(), span)
    }

    /// Parse a relative range such as `"last 5 min"` or `"last hour"`.
    pub fn parse_range(range: &str) -> ReportResult<Self> {
        let caps = LAST_RE.captures(range).ok_or_else(|| {
            ReportError::invalid(format!("unsupported time range {range:?}, expected \"last <duration>\""))
        })?;
        let span = parse_duration(&caps[1])
            .map_err(|e| ReportError::invalid(format!("time range {range:?}: {e}")))?;
        Self::last(span)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn span(&self) -> Duration {
        Duration::from_secs(self.end.abs_diff(self.start))
    }
}

fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Appliance traffic expression (e.g. `"host 10.0.0.0/8"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrafficFilter(String);

impl TrafficFilter {
    pub fn new(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    pub fn expression(&self) -> &str {
        &self.0
    }
}

/// Deprecated scalar filter sent as `deprecated: {key: value}`.
///
/// Kept for older appliance features that have no traffic-expression form
/// (interface scoping, identity subject). New callers should prefer
/// [`TrafficFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LegacyFilter {
    pub key: String,
    pub value: String,
}

impl LegacyFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
