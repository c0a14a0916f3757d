//! Report lifecycle state machine.
//!
//! ```text
//!                 run()                 status == completed
//!  Unsubmitted ──────────► Running ────────────────────────► Completed
//!                             │
//!                             │ polling budget exhausted
//!                             ▼
//!                          TimedOut
//!
//!  any state ── delete() ──► Deleted
//! ```
//!
//! A [`Report`] submits at most one remote report at a time. Criteria are
//! frozen into an owned [`ReportRequest`] on submission, so nothing the
//! caller does afterwards can alter an in-flight report.

use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::appliance::protocol::{
    parse_report_location, Criteria, QuerySpec, ReportRequest, ReportStatus, TimeFrame,
};
use crate::appliance::Appliance;
use crate::error::{ReportError, ReportResult};
use crate::model::{ColumnDescriptor, ColumnRef, LegacyFilter, Resolution, TimeFilter, TrafficFilter, Value};

use super::query::{Query, RowIter};

/// Where a report is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportState {
    Unsubmitted,
    Running,
    Completed,
    TimedOut,
    Deleted,
}

/// What [`Report::run`] observed before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Submitted without waiting.
    Submitted,
    /// The appliance finished computing the report.
    Completed,
    /// Polling gave up; the report may still complete remotely.
    TimedOut,
}

/// Arguments of a report run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub template_id: u32,
    /// Defaults to the configured span ending now.
    pub timefilter: Option<TimeFilter>,
    /// Resolution name, validated on run.
    pub resolution: String,
    pub query: Option<QuerySpec>,
    pub traffic_filter: Option<TrafficFilter>,
    pub legacy_filter: Option<LegacyFilter>,
    /// Block until the report completes or the polling budget runs out.
    pub sync: bool,
}

impl RunRequest {
    pub fn new(template_id: u32) -> Self {
        Self {
            template_id,
            timefilter: None,
            resolution: Resolution::Auto.as_str().to_string(),
            query: None,
            traffic_filter: None,
            legacy_filter: None,
            sync: true,
        }
    }

    pub fn timefilter(mut self, timefilter: TimeFilter) -> Self {
        self.timefilter = Some(timefilter);
        self
    }

    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }

    pub fn query(mut self, query: QuerySpec) -> Self {
        self.query = Some(query);
        self
    }

    pub fn traffic_filter(mut self, filter: TrafficFilter) -> Self {
        self.traffic_filter = Some(filter);
        self
    }

    pub fn legacy_filter(mut self, filter: LegacyFilter) -> Self {
        self.legacy_filter = Some(filter);
        self
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// A report on the appliance.
#[derive(Debug)]
pub struct Report {
    appliance: Appliance,
    id: Option<u64>,
    state: ReportState,
    time_filter: Option<TimeFilter>,
    resolution: Resolution,
    request: Option<ReportRequest>,
    last_status: Option<ReportStatus>,
    queries: Option<Vec<Query>>,
    query_columns: Option<Vec<u32>>,
}

impl Report {
    pub fn new(appliance: &Appliance) -> Self {
        Self {
            appliance: appliance.clone(),
            id: None,
            state: ReportState::Unsubmitted,
            time_filter: None,
            resolution: Resolution::Auto,
            request: None,
            last_status: None,
            queries: None,
            query_columns: None,
        }
    }

    /// Bind to a report that already exists on the appliance.
    pub fn attach(appliance: &Appliance, id: u64) -> Self {
        Self {
            id: Some(id),
            state: ReportState::Running,
            ..Self::new(appliance)
        }
    }

    pub fn appliance(&self) -> &Appliance {
        &self.appliance
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn state(&self) -> ReportState {
        self.state
    }

    pub fn last_status(&self) -> Option<&ReportStatus> {
        self.last_status.as_ref()
    }

    pub fn template_id(&self) -> Option<u32> {
        self.request.as_ref().map(|r| r.template_id)
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn time_filter(&self) -> Option<TimeFilter> {
        self.time_filter
    }

    /// The document submitted by the last run.
    pub fn request(&self) -> Option<&ReportRequest> {
        self.request.as_ref()
    }

    /// Queries loaded so far, empty until [`load_queries`](Self::load_queries)
    /// or a query accessor runs.
    pub fn queries(&self) -> &[Query] {
        self.queries.as_deref().unwrap_or_default()
    }

    /// Column ids lazily loaded queries select by default.
    pub fn select_query_columns(&mut self, column_ids: Option<Vec<u32>>) {
        self.query_columns = column_ids;
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Submit the report, and wait for it when `request.sync` is set.
    pub fn run(&mut self, request: RunRequest) -> ReportResult<RunOutcome> {
        let resolution: Resolution = request.resolution.parse()?;

        if self.id.is_some() && self.state != ReportState::Deleted {
            self.delete()?;
        }

        let timefilter = match request.timefilter {
            Some(timefilter) => timefilter,
            None => TimeFilter::last(self.appliance.defaults().default_span)?,
        };

        let document = ReportRequest {
            template_id: request.template_id,
            criteria: Criteria {
                time_frame: TimeFrame {
                    start: timefilter.start(),
                    end: timefilter.end(),
                    resolution: (resolution != Resolution::Auto).then_some(resolution),
                },
                query: request.query,
                traffic_expression: request
                    .traffic_filter
                    .map(|f| f.expression().to_string()),
                deprecated: request
                    .legacy_filter
                    .map(|f| BTreeMap::from([(f.key, f.value)])),
            },
        };

        if let Ok(json) = serde_json::to_string(&document) {
            debug!(template_id = document.template_id, criteria = %json, "posting report");
        }

        let location = self.appliance.api().create_report(&document)?;
        let id = parse_report_location(&location).ok_or_else(|| {
            ReportError::Protocol(format!(
                "failed to parse report id from location {location:?}"
            ))
        })?;

        info!(report_id = id, template_id = document.template_id, "created report");

        self.id = Some(id);
        self.state = ReportState::Running;
        self.time_filter = Some(timefilter);
        self.resolution = resolution;
        self.request = Some(document);
        self.last_status = None;
        self.queries = None;

        if !request.sync {
            return Ok(RunOutcome::Submitted);
        }

        let polling = self.appliance.polling();
        if self.wait_for_complete(polling.interval, polling.timeout)? {
            Ok(RunOutcome::Completed)
        } else {
            Ok(RunOutcome::TimedOut)
        }
    }

    /// Poll the appliance for progress. `None` if the report was never submitted.
    pub fn status(&mut self) -> ReportResult<Option<ReportStatus>> {
        let Some(id) = self.id else {
            return Ok(None);
        };

        let status = self.appliance.api().report_status(id)?;
        if status.is_completed() && self.state != ReportState::Deleted {
            self.state = ReportState::Completed;
        }
        self.last_status = Some(status.clone());
        Ok(Some(status))
    }

    /// Block until the report completes or `timeout` elapses.
    ///
    /// Returns `false` on timeout; the report stays on the appliance and may
    /// still complete.
    pub fn wait_for_complete(
        &mut self,
        poll_interval: Duration,
        timeout: Duration,
    ) -> ReportResult<bool> {
        let id = self.id.ok_or_else(ReportError::missing_id)?;
        let started = Instant::now();
        let mut last_percent: Option<f64> = None;

        loop {
            let status = self.status()?.ok_or_else(ReportError::missing_id)?;

            if last_percent != Some(status.percent) {
                info!(
                    report_id = id,
                    percent = status.percent,
                    remaining_seconds = status.remaining_seconds,
                    "report progress"
                );
                last_percent = Some(status.percent);
            }

            if status.is_completed() {
                info!(report_id = id, "report completed");
                return Ok(true);
            }

            if started.elapsed() > timeout {
                warn!(
                    report_id = id,
                    percent = status.percent,
                    "timed out waiting for report to complete"
                );
                self.state = ReportState::TimedOut;
                return Ok(false);
            }

            thread::sleep(poll_interval);
        }
    }

    /// Remove the report from the appliance.
    ///
    /// A report that was never submitted, was already deleted, or is gone
    /// remotely counts as deleted.
    pub fn delete(&mut self) -> ReportResult<()> {
        let Some(id) = self.id else {
            return Ok(());
        };
        if self.state == ReportState::Deleted {
            return Ok(());
        }

        match self.appliance.api().delete_report(id) {
            Ok(()) => info!(report_id = id, "deleted report"),
            Err(e) if e.is_not_found() => debug!(report_id = id, "report already gone"),
            Err(e) => return Err(e.into()),
        }

        self.queries = None;
        self.state = ReportState::Deleted;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Fetch the query list, selecting `column_ids` by default.
    pub fn load_queries(&mut self, column_ids: Option<&[u32]>) -> ReportResult<&mut [Query]> {
        let id = self.id.ok_or_else(ReportError::missing_id)?;

        let queries = self
            .appliance
            .api()
            .list_queries(id)?
            .into_iter()
            .map(|info| Query::new(&self.appliance, id, info, column_ids))
            .collect::<ReportResult<Vec<_>>>()?;

        debug!(report_id = id, count = queries.len(), "loaded queries");
        Ok(self.queries.insert(queries).as_mut_slice())
    }

    /// The query at `index`, loading queries on first use.
    pub fn query_by_index(&mut self, index: usize) -> ReportResult<&mut Query> {
        if self.queries.is_none() {
            let columns = self.query_columns.clone();
            self.load_queries(columns.as_deref())?;
        }

        let queries = self.queries.as_deref_mut().unwrap_or_default();
        let count = queries.len();
        queries.get_mut(index).ok_or_else(|| {
            ReportError::invalid(format!(
                "query index {index} out of range, report has {count} queries"
            ))
        })
    }

    pub fn legend(
        &mut self,
        index: usize,
        columns: Option<&[ColumnRef]>,
    ) -> ReportResult<Vec<ColumnDescriptor>> {
        self.query_by_index(index)?.legend(columns)
    }

    pub fn iter_data(
        &mut self,
        index: usize,
        columns: Option<&[ColumnRef]>,
    ) -> ReportResult<RowIter<'_>> {
        self.query_by_index(index)?.iter_data(columns)
    }

    pub fn data(
        &mut self,
        index: usize,
        columns: Option<&[ColumnRef]>,
    ) -> ReportResult<Vec<Vec<Value>>> {
        self.query_by_index(index)?.data(columns)
    }

    pub fn totals(&mut self, index: usize, columns: Option<&[ColumnRef]>) -> ReportResult<Vec<Value>> {
        self.query_by_index(index)?.totals(columns)
    }
}
