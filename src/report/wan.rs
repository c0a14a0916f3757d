//! WAN summary: one directional table from two interface reports.
//!
//! The appliance reports traffic per interface with `in_*` and `out_*`
//! columns. A WAN summary runs the same traffic summary twice, once scoped to
//! the WAN-side interface and once to the LAN-side interface, and joins the
//! two on their key columns. The direction decides which half of each side is
//! kept:
//!
//! ```text
//!              LAN report                      WAN report
//!   ┌─────────────────────────────┐  ┌─────────────────────────────┐
//!   │ key | in_x | out_x | other  │  │ key | in_x | out_x | other  │
//!   └─────────────────────────────┘  └─────────────────────────────┘
//!   inbound:  key, other, out_x→LAN_x        in_x→WAN_x
//!   outbound: key, other, in_x →LAN_x        out_x→WAN_x
//!                          │                       │
//!                          └──── inner join ───────┘
//!                                on key values
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::appliance::Appliance;
use crate::catalog::ColumnCatalogExt;
use crate::error::{ReportError, ReportResult};
use crate::model::{
    ColumnDescriptor, ColumnRef, LegacyFilter, Resolution, TimeFilter, TrafficFilter, Value,
};

use super::guard::{finish, require_completed};
use super::profile::{ReportParams, ReportProfile};
use super::profiled::ProfiledReport;

/// Legacy filter key scoping a traffic summary to one interface.
pub const INTERFACE_FILTER_KEY: &str = "interfaces_a";

const IN_PREFIX: &str = "in_";
const OUT_PREFIX: &str = "out_";
const LAN_PREFIX: &str = "LAN_";
const WAN_PREFIX: &str = "WAN_";

/// Traffic direction of a WAN summary, seen from the LAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl FromStr for Direction {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Direction::Inbound),
            "outbound" => Ok(Direction::Outbound),
            other => Err(ReportError::Domain(format!(
                "invalid direction {other:?}, must be \"inbound\" or \"outbound\""
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => f.write_str("inbound"),
            Direction::Outbound => f.write_str("outbound"),
        }
    }
}

/// Arguments of a WAN summary run.
#[derive(Debug, Clone)]
pub struct WanRequest {
    pub lan_interface: String,
    pub wan_interface: String,
    /// `"inbound"` or `"outbound"`.
    pub direction: String,
    pub columns: Vec<ColumnRef>,
    /// Defaults to the configured WAN span ending now.
    pub timefilter: Option<TimeFilter>,
    pub traffic_filter: Option<TrafficFilter>,
    /// Defaults to the configured WAN groupby.
    pub groupby: Option<String>,
    /// Defaults to the configured WAN resolution.
    pub resolution: Option<String>,
}

impl WanRequest {
    pub fn new(
        lan_interface: impl Into<String>,
        wan_interface: impl Into<String>,
        direction: impl Into<String>,
    ) -> Self {
        Self {
            lan_interface: lan_interface.into(),
            wan_interface: wan_interface.into(),
            direction: direction.into(),
            columns: Vec::new(),
            timefilter: None,
            traffic_filter: None,
            groupby: None,
            resolution: None,
        }
    }

    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
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

    pub fn groupby(mut self, groupby: impl Into<String>) -> Self {
        self.groupby = Some(groupby.into());
        self
    }

    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }
}

/// One row of a [`WanTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct WanRow {
    /// Key column values.
    pub index: Vec<Value>,
    /// LAN values followed by WAN values.
    pub values: Vec<Value>,
}

/// Result of a WAN summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WanTable {
    pub index_names: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<WanRow>,
}

impl WanTable {
    /// Key column names followed by the value column names.
    pub fn legend(&self) -> Vec<String> {
        self.index_names
            .iter()
            .chain(&self.columns)
            .cloned()
            .collect()
    }

    /// Every row as strings, index values first, without a header.
    pub fn string_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.index
                    .iter()
                    .chain(&row.values)
                    .map(ToString::to_string)
                    .collect()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Coerced data of one interface report.
#[derive(Debug, Clone, PartialEq)]
struct SideData {
    legend: Vec<ColumnDescriptor>,
    rows: Vec<Vec<Value>>,
}

/// Parameters that produced the stored side data.
#[derive(Debug, Clone, PartialEq)]
struct SideKey {
    /// The window as requested; `None` is the configured span ending at
    /// the time the interface reports run.
    timefilter: Option<TimeFilter>,
    column_ids: Vec<u32>,
    lan_interface: String,
    wan_interface: String,
    groupby: String,
    resolution: Resolution,
    traffic_filter: Option<TrafficFilter>,
}

#[derive(Debug, Clone)]
struct SideCache {
    key: SideKey,
    lan: SideData,
    wan: SideData,
}

/// Runs WAN summaries and keeps the last result.
///
/// Repeating a run with the same window, columns and interfaces reuses the
/// stored interface data; only the directional merge is redone.
///
/// # Example
///
/// ```ignore
/// let mut wan = WanSummaryReport::new(&appliance);
/// let table = wan.run(
///     WanRequest::new("10.99.16.252:1", "10.99.16.252:2", "inbound")
///         .columns(["interface_dns", "avg_bytes", "avg_util"]),
/// )?;
/// println!("{:?}", table.legend());
/// ```
#[derive(Debug)]
pub struct WanSummaryReport {
    appliance: Appliance,
    cache: Option<SideCache>,
    table: Option<WanTable>,
    runs: usize,
}

impl WanSummaryReport {
    pub fn new(appliance: &Appliance) -> Self {
        Self {
            appliance: appliance.clone(),
            cache: None,
            table: None,
            runs: 0,
        }
    }

    /// Number of interface reports submitted so far.
    pub fn report_runs(&self) -> usize {
        self.runs
    }

    /// Run (or reuse) both interface reports and merge them.
    pub fn run(&mut self, request: WanRequest) -> ReportResult<&WanTable> {
        let direction: Direction = request.direction.parse()?;

        let defaults = self.appliance.defaults();
        let groupby = request
            .groupby
            .clone()
            .unwrap_or_else(|| defaults.wan_groupby.clone());
        let resolution = match &request.resolution {
            Some(name) => name.parse()?,
            None => defaults.wan_resolution,
        };
        let wan_span = defaults.wan_span;

        let columns = self.normalize_columns(&request.columns, &groupby)?;
        let key = SideKey {
            timefilter: request.timefilter,
            column_ids: columns.iter().map(|c| c.id).collect(),
            lan_interface: request.lan_interface.clone(),
            wan_interface: request.wan_interface.clone(),
            groupby,
            resolution,
            traffic_filter: request.traffic_filter.clone(),
        };

        let cache = match self.cache.take() {
            Some(cache) if cache.key == key => cache,
            _ => {
                let timefilter = match key.timefilter {
                    Some(timefilter) => timefilter,
                    None => TimeFilter::last(wan_span)?,
                };
                let wan = self.run_side(&key, timefilter, &key.wan_interface)?;
                let lan = self.run_side(&key, timefilter, &key.lan_interface)?;
                SideCache { key, lan, wan }
            }
        };

        let table = merge(&cache.lan, &cache.wan, direction)?;
        info!(
            direction = %direction,
            rows = table.len(),
            "merged WAN summary"
        );
        self.cache = Some(cache);
        Ok(&*self.table.insert(table))
    }

    /// The merged table of the last run.
    pub fn table(&self) -> ReportResult<&WanTable> {
        self.table
            .as_ref()
            .ok_or_else(|| ReportError::invalid("WAN summary has not been run"))
    }

    pub fn legend(&self) -> ReportResult<Vec<String>> {
        Ok(self.table()?.legend())
    }

    /// Rows of the last run, stringified, index values first.
    pub fn rows(&self) -> ReportResult<Vec<Vec<String>>> {
        Ok(self.table()?.string_rows())
    }

    /// Expand each requested column into its `in_`/`out_` pair when the
    /// appliance has both, keeping the request order.
    fn normalize_columns(
        &self,
        columns: &[ColumnRef],
        groupby: &str,
    ) -> ReportResult<Vec<ColumnDescriptor>> {
        let profile = ReportProfile::wan_summary();
        let catalog = self.appliance.catalog();
        let available = catalog.available_keys(
            profile.realm,
            profile.centricity.default_value(),
            groupby,
        )?;

        let mut seen = HashSet::new();
        let mut refs: Vec<ColumnRef> = Vec::new();
        for column in columns {
            let key = match column {
                ColumnRef::Key(key) => key.clone(),
                ColumnRef::Id(_) => catalog.resolve_column(column, Some(groupby))?.key,
            };
            let canonical = key
                .strip_prefix(IN_PREFIX)
                .or_else(|| key.strip_prefix(OUT_PREFIX))
                .unwrap_or(&key)
                .to_string();
            if !seen.insert(canonical.clone()) {
                continue;
            }

            let inbound = format!("{IN_PREFIX}{canonical}");
            let outbound = format!("{OUT_PREFIX}{canonical}");
            if available.contains(&inbound) && available.contains(&outbound) {
                refs.push(inbound.into());
                refs.push(outbound.into());
            } else {
                refs.push(column.clone());
            }
        }

        Ok(catalog.resolve_columns(&refs, Some(groupby))?)
    }

    fn run_side(
        &mut self,
        key: &SideKey,
        timefilter: TimeFilter,
        interface: &str,
    ) -> ReportResult<SideData> {
        let mut params = ReportParams::new()
            .groupby(key.groupby.clone())
            .columns(key.column_ids.iter().copied())
            .timefilter(timefilter)
            .resolution(key.resolution.as_str())
            .legacy_filter(LegacyFilter::new(INTERFACE_FILTER_KEY, interface))
            .sync(true);
        params.traffic_filter = key.traffic_filter.clone();

        let mut report = ProfiledReport::new(&self.appliance, ReportProfile::wan_summary());
        self.runs += 1;
        let result = fetch_side(&mut report, params);
        finish(result, report.report_mut())
    }
}

fn fetch_side(report: &mut ProfiledReport, params: ReportParams) -> ReportResult<SideData> {
    let outcome = report.run(params)?;
    require_completed(report.report(), outcome)?;
    Ok(SideData {
        legend: report.legend(None)?,
        rows: report.data(None)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    Index,
    In,
    Out,
    Neutral,
}

fn role(column: &ColumnDescriptor) -> ColumnRole {
    if column.is_key {
        ColumnRole::Index
    } else if column.key.starts_with(IN_PREFIX) {
        ColumnRole::In
    } else if column.key.starts_with(OUT_PREFIX) {
        ColumnRole::Out
    } else {
        ColumnRole::Neutral
    }
}

/// A kept value column: its position in the side's rows and its new name.
struct Kept {
    position: usize,
    name: String,
}

fn renamed(key: &str, from: &str, to: &str) -> String {
    format!("{to}{}", key.strip_prefix(from).unwrap_or(key))
}

/// Pick and rename the value columns one side contributes.
fn select(side: &SideData, lan_side: bool, direction: Direction) -> Vec<Kept> {
    let (lan_role, lan_from, wan_role, wan_from) = match direction {
        Direction::Inbound => (ColumnRole::Out, OUT_PREFIX, ColumnRole::In, IN_PREFIX),
        Direction::Outbound => (ColumnRole::In, IN_PREFIX, ColumnRole::Out, OUT_PREFIX),
    };

    side.legend
        .iter()
        .enumerate()
        .filter_map(|(position, column)| {
            let name = match (role(column), lan_side) {
                (ColumnRole::Neutral, true) => column.key.clone(),
                (r, true) if r == lan_role => renamed(&column.key, lan_from, LAN_PREFIX),
                (r, false) if r == wan_role => renamed(&column.key, wan_from, WAN_PREFIX),
                _ => return None,
            };
            Some(Kept { position, name })
        })
        .collect()
}

fn index_positions(side: &SideData, names: &[String]) -> ReportResult<Vec<usize>> {
    names
        .iter()
        .map(|name| {
            side.legend
                .iter()
                .position(|c| c.is_key && &c.key == name)
                .ok_or_else(|| {
                    ReportError::Protocol(format!("interface data is missing key column {name:?}"))
                })
        })
        .collect()
}

fn key_tuple(row: &[Value], positions: &[usize]) -> Vec<String> {
    positions
        .iter()
        .map(|&p| row.get(p).map(ToString::to_string).unwrap_or_default())
        .collect()
}

fn cell(row: &[Value], position: usize) -> Value {
    row.get(position).cloned().unwrap_or(Value::Null)
}

/// Inner join of the reduced LAN and WAN tables on their key columns.
///
/// Rows come out in LAN order; a key present several times on both sides
/// yields every pairing.
fn merge(lan: &SideData, wan: &SideData, direction: Direction) -> ReportResult<WanTable> {
    let index_names: Vec<String> = lan
        .legend
        .iter()
        .filter(|c| c.is_key)
        .map(|c| c.key.clone())
        .collect();
    let lan_index = index_positions(lan, &index_names)?;
    let wan_index = index_positions(wan, &index_names)?;

    let lan_kept = select(lan, true, direction);
    let wan_kept = select(wan, false, direction);

    let mut wan_rows: HashMap<Vec<String>, Vec<&Vec<Value>>> = HashMap::new();
    for row in &wan.rows {
        wan_rows.entry(key_tuple(row, &wan_index)).or_default().push(row);
    }

    let mut rows = Vec::new();
    for lan_row in &lan.rows {
        let Some(matches) = wan_rows.get(&key_tuple(lan_row, &lan_index)) else {
            continue;
        };
        for wan_row in matches {
            let values = lan_kept
                .iter()
                .map(|k| cell(lan_row, k.position))
                .chain(wan_kept.iter().map(|k| cell(wan_row, k.position)))
                .collect();
            rows.push(WanRow {
                index: lan_index.iter().map(|&p| cell(lan_row, p)).collect(),
                values,
            });
        }
    }

    Ok(WanTable {
        index_names,
        columns: lan_kept
            .into_iter()
            .chain(wan_kept)
            .map(|k| k.name)
            .collect(),
        rows,
    })
}
