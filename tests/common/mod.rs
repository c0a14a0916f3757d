//! Shared fixtures: an in-memory appliance and a small column catalog.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use netprofiler::appliance::protocol::{
    QueryColumn, QueryData, QueryInfo, ReportRequest, ReportStatus,
};
use netprofiler::appliance::{Appliance, ApplianceError, ApplianceResult, ReportingApi};
use netprofiler::catalog::StaticCatalog;
use netprofiler::config::PollPolicy;
use netprofiler::model::Value;
use tracing_subscriber::fmt::MakeWriter;

pub const CATALOG: &str = r#"[
    {"id": 6, "key": "host", "type": "string", "iskey": true, "groupbys": ["hos"]},
    {"id": 98, "key": "interface", "type": "string", "iskey": true, "groupbys": ["ifc"]},
    {"id": 33, "key": "in_bytes", "type": "int",
     "realms": ["traffic_summary"], "centricities": ["int"]},
    {"id": 34, "key": "out_bytes", "type": "int",
     "realms": ["traffic_summary"], "centricities": ["int"]},
    {"id": 40, "key": "avg_util", "type": "float"},
    {"id": 41, "key": "time", "type": "int", "iskey": true, "groupbys": ["tim"]},
    {"id": 42, "key": "time", "type": "int", "iskey": true, "groupbys": ["thu"]},
    {"id": 201, "key": "username", "type": "string", "realms": ["identity_list"]},
    {"id": 202, "key": "full_username", "type": "string", "realms": ["identity_list"]},
    {"id": 203, "key": "login_ok", "type": "string", "realms": ["identity_list"]},
    {"id": 204, "key": "host_ip", "type": "string"},
    {"id": 205, "key": "host_dns", "type": "string"},
    {"id": 206, "key": "host_switch", "type": "string"},
    {"id": 207, "key": "host_switch_dns", "type": "string"},
    {"id": 208, "key": "domain", "type": "string", "realms": ["identity_list"]}
]"#;

/// Column id to cell, one map per row.
pub type FakeRow = Vec<(u32, Value)>;

#[derive(Debug)]
struct State {
    next_id: u64,
    statuses: VecDeque<ReportStatus>,
    idle_status: ReportStatus,
    location_override: Option<String>,
    reports: HashMap<u64, ReportRequest>,
    created: Vec<ReportRequest>,
    deleted: Vec<u64>,
    status_calls: usize,
    fetches: Vec<(u64, Option<Vec<u32>>)>,
    failing_fetches: usize,
    rows: HashMap<String, Vec<FakeRow>>,
    totals: HashMap<String, FakeRow>,
}

/// Appliance stand-in that keeps reports in memory.
///
/// Rows are registered per scope: the value of the report's legacy filter,
/// or `""` when it has none.
#[derive(Debug)]
pub struct FakeApi {
    state: Mutex<State>,
}

pub fn status(status: &str, percent: f64) -> ReportStatus {
    ReportStatus {
        status: status.to_string(),
        percent,
        remaining_seconds: 0,
    }
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                next_id: 1000,
                statuses: VecDeque::new(),
                idle_status: status("completed", 100.0),
                location_override: None,
                reports: HashMap::new(),
                created: Vec::new(),
                deleted: Vec::new(),
                status_calls: 0,
                fetches: Vec::new(),
                failing_fetches: 0,
                rows: HashMap::new(),
                totals: HashMap::new(),
            }),
        })
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Statuses returned by the next polls, in order.
    pub fn script_statuses(&self, statuses: &[(&str, f64)]) {
        self.state().statuses = statuses.iter().map(|&(s, p)| status(s, p)).collect();
    }

    /// Status returned once the script is exhausted.
    pub fn stay_at(&self, state: &str, percent: f64) {
        self.state().idle_status = status(state, percent);
    }

    pub fn answer_location(&self, location: &str) {
        self.state().location_override = Some(location.to_string());
    }

    pub fn add_rows(&self, scope: &str, rows: Vec<FakeRow>) {
        self.state().rows.insert(scope.to_string(), rows);
    }

    pub fn set_totals(&self, scope: &str, totals: FakeRow) {
        self.state().totals.insert(scope.to_string(), totals);
    }

    pub fn created(&self) -> Vec<ReportRequest> {
        self.state().created.clone()
    }

    pub fn deleted(&self) -> Vec<u64> {
        self.state().deleted.clone()
    }

    pub fn live_reports(&self) -> usize {
        self.state().reports.len()
    }

    pub fn status_calls(&self) -> usize {
        self.state().status_calls
    }

    pub fn fetches(&self) -> Vec<(u64, Option<Vec<u32>>)> {
        self.state().fetches.clone()
    }

    /// Make the next `count` data fetches fail with a transport error.
    pub fn fail_fetches(&self, count: usize) {
        self.state().failing_fetches = count;
    }
}

fn scope(request: &ReportRequest) -> String {
    request
        .criteria
        .deprecated
        .as_ref()
        .and_then(|d| d.values().next().cloned())
        .unwrap_or_default()
}

fn project(row: &FakeRow, ids: &[u32]) -> Vec<Value> {
    ids.iter()
        .map(|id| {
            row.iter()
                .find(|(cid, _)| cid == id)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Null)
        })
        .collect()
}

impl ReportingApi for FakeApi {
    fn create_report(&self, request: &ReportRequest) -> ApplianceResult<String> {
        let mut state = self.state();
        state.created.push(request.clone());
        if let Some(location) = state.location_override.clone() {
            return Ok(location);
        }
        let id = state.next_id;
        state.next_id += 1;
        state.reports.insert(id, request.clone());
        Ok(format!(
            "https://profiler.example.com/api/profiler/1.0/reporting/reports/{id}"
        ))
    }

    fn report_status(&self, report_id: u64) -> ApplianceResult<ReportStatus> {
        let mut state = self.state();
        state.status_calls += 1;
        if !state.reports.contains_key(&report_id) {
            return Err(ApplianceError::NotFound(format!("report {report_id}")));
        }
        let idle = state.idle_status.clone();
        Ok(state.statuses.pop_front().unwrap_or(idle))
    }

    fn delete_report(&self, report_id: u64) -> ApplianceResult<()> {
        let mut state = self.state();
        if state.reports.remove(&report_id).is_none() {
            return Err(ApplianceError::NotFound(format!("report {report_id}")));
        }
        state.deleted.push(report_id);
        Ok(())
    }

    fn list_queries(&self, report_id: u64) -> ApplianceResult<Vec<QueryInfo>> {
        let state = self.state();
        let request = state
            .reports
            .get(&report_id)
            .ok_or_else(|| ApplianceError::NotFound(format!("report {report_id}")))?;

        let mut columns: Vec<QueryColumn> = request
            .criteria
            .query
            .iter()
            .flat_map(|q| q.columns.iter())
            .map(|&id| QueryColumn {
                id: Some(id),
                available: true,
            })
            .collect();
        columns.push(QueryColumn {
            id: Some(9999),
            available: false,
        });
        columns.push(QueryColumn {
            id: None,
            available: true,
        });

        Ok(vec![QueryInfo {
            id: format!("{report_id}_0"),
            actual_t0: request.criteria.time_frame.start,
            actual_t1: request.criteria.time_frame.end,
            columns,
        }])
    }

    fn query_data(
        &self,
        report_id: u64,
        query_id: &str,
        column_ids: Option<&[u32]>,
    ) -> ApplianceResult<QueryData> {
        let mut state = self.state();
        let request = state
            .reports
            .get(&report_id)
            .cloned()
            .ok_or_else(|| ApplianceError::NotFound(format!("report {report_id}")))?;
        if query_id != format!("{report_id}_0") {
            return Err(ApplianceError::NotFound(format!("query {query_id}")));
        }
        state
            .fetches
            .push((report_id, column_ids.map(|ids| ids.to_vec())));
        if state.failing_fetches > 0 {
            state.failing_fetches -= 1;
            return Err(ApplianceError::Transport("connection reset".to_string()));
        }

        let ids: Vec<u32> = match column_ids {
            Some(ids) => ids.to_vec(),
            None => request
                .criteria
                .query
                .as_ref()
                .map(|q| q.columns.clone())
                .unwrap_or_default(),
        };
        let scope = scope(&request);
        let data = state
            .rows
            .get(&scope)
            .map(|rows| rows.iter().map(|row| project(row, &ids)).collect())
            .unwrap_or_default();
        let totals = state
            .totals
            .get(&scope)
            .map(|row| project(row, &ids))
            .unwrap_or_default();
        Ok(QueryData { data, totals })
    }
}

pub fn catalog() -> StaticCatalog {
    StaticCatalog::from_json(CATALOG).unwrap()
}

/// An appliance over `api` that polls fast.
pub fn appliance(api: &Arc<FakeApi>) -> Appliance {
    Appliance::new(api.clone(), Arc::new(catalog())).with_poll_policy(PollPolicy {
        interval: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
    })
}

/// Log output captured from a `tracing` subscriber.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber installed and return what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}
