//! Report data resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::duration::parse_duration;
use crate::error::ReportError;

/// Granularity the appliance buckets report data into.
///
/// Only the enumerated names are accepted. Durations such as `"3600"` or
/// `"1h"` are rejected rather than translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "hour")]
    Hour,
    #[serde(rename = "6hour")]
    SixHours,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
}

/// Bucket widths in seconds for the fixed-width resolutions.
///
/// Reference data only: used to hint at the intended name when a caller
/// passes a duration, never to accept one.
pub const RESOLUTION_SECONDS: [(u64, Resolution); 6] = [
    (60, Resolution::OneMinute),
    (60 * 15, Resolution::FifteenMinutes),
    (60 * 60, Resolution::Hour),
    (60 * 60 * 6, Resolution::SixHours),
    (60 * 60 * 24, Resolution::Day),
    (60 * 60 * 24 * 7, Resolution::Week),
];

impl Resolution {
    pub const ALL: [Resolution; 8] = [
        Resolution::Auto,
        Resolution::OneMinute,
        Resolution::FifteenMinutes,
        Resolution::Hour,
        Resolution::SixHours,
        Resolution::Day,
        Resolution::Week,
        Resolution::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Auto => "auto",
            Resolution::OneMinute => "1min",
            Resolution::FifteenMinutes => "15min",
            Resolution::Hour => "hour",
            Resolution::SixHours => "6hour",
            Resolution::Day => "day",
            Resolution::Week => "week",
            Resolution::Month => "month",
        }
    }

    /// Bucket width in seconds, for the fixed-width resolutions.
    pub fn seconds(&self) -> Option<u64> {
        RESOLUTION_SECONDS
            .iter()
            .find(|(_, r)| r == self)
            .map(|(secs, _)| *secs)
    }

    fn hint_for(input: &str) -> Option<Resolution> {
        let secs = parse_duration(input).ok()?.as_secs();
        RESOLUTION_SECONDS
            .iter()
            .find(|(s, _)| *s == secs)
            .map(|(_, r)| *r)
    }
}

impl FromStr for Resolution {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(resolution) = Resolution::ALL.iter().find(|r| r.as_str() == s) {
            return Ok(*resolution);
        }

        let names: Vec<&str> = Resolution::ALL.iter().map(|r| r.as_str()).collect();
        let mut message = format!(
            "resolution \"{}\" invalid, must be one of: {}",
            s,
            names.join(", ")
        );
        if let Some(hint) = Resolution::hint_for(s) {
            message.push_str(&format!(" (durations are not accepted, use \"{hint}\")"));
        }
        Err(ReportError::InvalidArgument(message))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
