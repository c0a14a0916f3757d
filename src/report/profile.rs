//! Report kinds as configuration.
//!
//! Every kind of report the appliance supports is the same lifecycle with a
//! different fixed configuration. A [`ReportProfile`] captures that
//! configuration: the realm, which of groupby, centricity and resolution are
//! fixed or left to the caller, which optional parameters are exposed, and
//! for some kinds a fixed column list.
//!
//! | kind | realm | groupby | centricity | resolution |
//! |---|---|---|---|---|
//! | traffic summary | traffic_summary | caller (hos) | caller (hos) | caller (auto) |
//! | overall time series | traffic_overall_time_series | tim | caller (hos) | caller (auto) |
//! | flow list | traffic_flow_list | hos | hos | 1min |
//! | identity | identity_list | thu | hos | auto |
//! | WAN summary | traffic_summary | caller (ifc) | int | caller (15min) |

use std::fmt;

use crate::error::{ReportError, ReportResult};
use crate::model::{ColumnRef, LegacyFilter, Resolution, TimeFilter, TrafficFilter};

/// Groupbys that aggregate by host group and need a host group type.
pub const HOST_GROUP_GROUPBYS: [&str; 3] = ["gro", "gpp", "gpr"];

/// Columns of every identity report.
pub static IDENTITY_COLUMNS: [&str; 9] = [
    "time",
    "username",
    "full_username",
    "login_ok",
    "host_ip",
    "host_dns",
    "host_switch",
    "host_switch_dns",
    "domain",
];

/// Legacy filter key identity reports are scoped by.
pub const IDENTITY_SUBJECT_KEY: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    TrafficSummary,
    TrafficOverallTimeSeries,
    TrafficFlowList,
    Identity,
    WanSummary,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::TrafficSummary => "traffic summary",
            ReportKind::TrafficOverallTimeSeries => "traffic overall time series",
            ReportKind::TrafficFlowList => "traffic flow list",
            ReportKind::Identity => "identity",
            ReportKind::WanSummary => "WAN summary",
        };
        f.write_str(name)
    }
}

/// A profile setting that is either fixed or chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    Fixed(T),
    Caller { default: T },
}

impl<T: Copy> Choice<T> {
    pub fn default_value(&self) -> T {
        match *self {
            Choice::Fixed(value) | Choice::Caller { default: value } => value,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Choice::Fixed(_))
    }
}

/// Optional parameters a profile exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Allowed {
    pub sort: bool,
    pub host_group_type: bool,
    pub area: bool,
}

/// Fixed configuration of one report kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportProfile {
    pub kind: ReportKind,
    pub realm: &'static str,
    pub groupby: Choice<&'static str>,
    pub centricity: Choice<&'static str>,
    pub resolution: Choice<Resolution>,
    pub allows: Allowed,
    pub fixed_columns: Option<&'static [&'static str]>,
}

impl ReportProfile {
    pub fn traffic_summary() -> Self {
        Self {
            kind: ReportKind::TrafficSummary,
            realm: "traffic_summary",
            groupby: Choice::Caller { default: "hos" },
            centricity: Choice::Caller { default: "hos" },
            resolution: Choice::Caller {
                default: Resolution::Auto,
            },
            allows: Allowed {
                sort: true,
                host_group_type: true,
                area: true,
            },
            fixed_columns: None,
        }
    }

    pub fn traffic_overall_time_series() -> Self {
        Self {
            kind: ReportKind::TrafficOverallTimeSeries,
            realm: "traffic_overall_time_series",
            groupby: Choice::Fixed("tim"),
            centricity: Choice::Caller { default: "hos" },
            resolution: Choice::Caller {
                default: Resolution::Auto,
            },
            allows: Allowed::default(),
            fixed_columns: None,
        }
    }

    pub fn traffic_flow_list() -> Self {
        Self {
            kind: ReportKind::TrafficFlowList,
            realm: "traffic_flow_list",
            groupby: Choice::Fixed("hos"),
            centricity: Choice::Fixed("hos"),
            resolution: Choice::Fixed(Resolution::OneMinute),
            allows: Allowed {
                sort: true,
                ..Allowed::default()
            },
            fixed_columns: None,
        }
    }

    pub fn identity() -> Self {
        Self {
            kind: ReportKind::Identity,
            realm: "identity_list",
            groupby: Choice::Fixed("thu"),
            centricity: Choice::Fixed("hos"),
            resolution: Choice::Fixed(Resolution::Auto),
            allows: Allowed::default(),
            fixed_columns: Some(IDENTITY_COLUMNS.as_slice()),
        }
    }

    pub fn wan_summary() -> Self {
        Self {
            kind: ReportKind::WanSummary,
            realm: "traffic_summary",
            groupby: Choice::Caller { default: "ifc" },
            centricity: Choice::Fixed("int"),
            resolution: Choice::Caller {
                default: Resolution::FifteenMinutes,
            },
            allows: Allowed::default(),
            fixed_columns: None,
        }
    }

    /// Check `params` against this profile and fill in its defaults.
    pub fn apply(&self, params: &ReportParams) -> ReportResult<ResolvedParams> {
        let groupby = self.choose("groupby", self.groupby, params.groupby.as_deref())?;
        let centricity = self.choose("centricity", self.centricity, params.centricity.as_deref())?;

        let resolution = match (&params.resolution, self.resolution) {
            (None, choice) => choice.default_value().as_str().to_string(),
            (Some(given), Choice::Caller { .. }) => given.clone(),
            (Some(given), Choice::Fixed(fixed)) if given == fixed.as_str() => given.clone(),
            (Some(_), Choice::Fixed(fixed)) => {
                return Err(self.fixed_error("resolution", fixed.as_str()))
            }
        };

        if params.sort_col.is_some() && !self.allows.sort {
            return Err(self.unsupported("sort column"));
        }
        if params.host_group_type.is_some() && !self.allows.host_group_type {
            return Err(self.unsupported("host group type"));
        }
        if params.area.is_some() && !self.allows.area {
            return Err(self.unsupported("area"));
        }

        let columns = match self.fixed_columns {
            Some(_) if !params.columns.is_empty() => {
                return Err(ReportError::invalid(format!(
                    "{} reports have a fixed column list",
                    self.kind
                )))
            }
            Some(fixed) => fixed.iter().map(|&key| ColumnRef::from(key)).collect(),
            None if params.columns.is_empty() => {
                return Err(ReportError::invalid(format!(
                    "{} reports need at least one column",
                    self.kind
                )))
            }
            None => params.columns.clone(),
        };

        Ok(ResolvedParams {
            groupby,
            centricity,
            resolution,
            columns,
        })
    }

    fn choose(
        &self,
        name: &str,
        choice: Choice<&'static str>,
        given: Option<&str>,
    ) -> ReportResult<String> {
        match (given, choice) {
            (None, choice) => Ok(choice.default_value().to_string()),
            (Some(given), Choice::Caller { .. }) => Ok(given.to_string()),
            (Some(given), Choice::Fixed(fixed)) if given == fixed => Ok(given.to_string()),
            (Some(_), Choice::Fixed(fixed)) => Err(self.fixed_error(name, fixed)),
        }
    }

    fn fixed_error(&self, name: &str, fixed: &str) -> ReportError {
        ReportError::invalid(format!("{} reports always use {name} {fixed:?}", self.kind))
    }

    fn unsupported(&self, name: &str) -> ReportError {
        ReportError::invalid(format!("{} reports do not accept a {name}", self.kind))
    }
}

/// Parameters after a profile filled in its fixed values and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    pub groupby: String,
    pub centricity: String,
    pub resolution: String,
    pub columns: Vec<ColumnRef>,
}

/// Caller parameters of a profiled report run.
#[derive(Debug, Clone)]
pub struct ReportParams {
    pub groupby: Option<String>,
    pub columns: Vec<ColumnRef>,
    pub sort_col: Option<ColumnRef>,
    pub timefilter: Option<TimeFilter>,
    pub traffic_filter: Option<TrafficFilter>,
    pub host_group_type: Option<String>,
    pub resolution: Option<String>,
    pub centricity: Option<String>,
    pub area: Option<String>,
    pub legacy_filter: Option<LegacyFilter>,
    pub sync: bool,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            groupby: None,
            columns: Vec::new(),
            sort_col: None,
            timefilter: None,
            traffic_filter: None,
            host_group_type: None,
            resolution: None,
            centricity: None,
            area: None,
            legacy_filter: None,
            sync: true,
        }
    }
}

impl ReportParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groupby(mut self, groupby: impl Into<String>) -> Self {
        self.groupby = Some(groupby.into());
        self
    }

    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort_col(mut self, column: impl Into<ColumnRef>) -> Self {
        self.sort_col = Some(column.into());
        self
    }

    pub fn timefilter(mut self, timefilter: TimeFilter) -> Self {
        self.timefilter = Some(timefilter);
        self
    }

    pub fn traffic_filter(mut self, filter: TrafficFilter) -> Self {
        self.traffic_filter = Some(filter);
        self
    }

    pub fn host_group_type(mut self, host_group_type: impl Into<String>) -> Self {
        self.host_group_type = Some(host_group_type.into());
        self
    }

    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn centricity(mut self, centricity: impl Into<String>) -> Self {
        self.centricity = Some(centricity.into());
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Attach a deprecated scalar filter.
    pub fn legacy_filter(mut self, filter: LegacyFilter) -> Self {
        self.legacy_filter = Some(filter);
        self
    }

    /// Restrict an identity report to one user.
    pub fn subject(self, username: impl Into<String>) -> Self {
        self.legacy_filter(LegacyFilter::new(IDENTITY_SUBJECT_KEY, username))
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}
