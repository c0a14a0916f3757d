//! Request and response documents exchanged with the appliance.
//!
//! The shapes mirror the appliance reporting API; serialization to the wire
//! is left to the [`ReportingApi`](super::ReportingApi) implementation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Resolution, Value};

/// Status string the appliance reports for a finished report.
pub const STATUS_COMPLETED: &str = "completed";

static REPORT_LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/reports/([0-9]+)/?$").expect("valid location regex"));

// ============================================================================
// Report submission
// ============================================================================

/// Document posted to create a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub template_id: u32,
    pub criteria: Criteria,
}

/// Report criteria: time window, query and filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub time_frame: TimeFrame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QuerySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_expression: Option<String>,
    /// Legacy scalar filters, `{key: value}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<BTreeMap<String, String>>,
}

/// Time window in epoch seconds. `resolution` is omitted for `auto`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFrame {
    pub start: i64,
    pub end: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

/// The query section of the criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub realm: String,
    pub centricity: String,
    pub group_by: String,
    pub columns: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_group_type: Option<String>,
}

/// Extract the report id from the resource location returned on creation.
///
/// Accepts locations ending in `.../reports/<id>`.
pub fn parse_report_location(location: &str) -> Option<u64> {
    REPORT_LOCATION_RE
        .captures(location.trim())
        .and_then(|caps| caps[1].parse().ok())
}

// ============================================================================
// Report status
// ============================================================================

/// Progress of a running report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStatus {
    pub status: String,
    #[serde(default)]
    pub percent: f64,
    #[serde(default)]
    pub remaining_seconds: i64,
}

impl ReportStatus {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

// ============================================================================
// Queries
// ============================================================================

/// A query spawned by a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInfo {
    pub id: String,
    pub actual_t0: i64,
    pub actual_t1: i64,
    #[serde(default)]
    pub columns: Vec<QueryColumn>,
}

/// A column entry in a query description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryColumn {
    #[serde(default)]
    pub id: Option<u32>,
    /// Whether the column was computed for this query.
    #[serde(default)]
    pub available: bool,
}

/// Rows and totals of a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryData {
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
    #[serde(default)]
    pub totals: Vec<Value>,
}
