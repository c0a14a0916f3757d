//! One report engine driven by a [`ReportProfile`].

use tracing::debug;

use crate::appliance::protocol::QuerySpec;
use crate::appliance::Appliance;
use crate::catalog::ColumnCatalogExt;
use crate::error::ReportResult;
use crate::model::{ColumnDescriptor, ColumnRef, Resolution, Value};

use super::engine::{Report, RunOutcome, RunRequest};
use super::profile::{ReportParams, ReportProfile, HOST_GROUP_GROUPBYS};
use super::query::RowIter;

/// A single-query report of one kind.
///
/// Columns are resolved to ids once per run; queries are then loaded with
/// those ids selected, so the data accessors return the requested columns in
/// the requested order unless told otherwise.
///
/// # Example
///
/// ```ignore
/// let mut report = ProfiledReport::traffic_summary(&appliance);
/// report.run(
///     ReportParams::new()
///         .groupby("hos")
///         .columns(["host_ip", "avg_bytes"])
///         .sort_col("avg_bytes")
///         .timefilter(TimeFilter::parse_range("last 15 min")?),
/// )?;
/// for row in report.iter_data(None)? {
///     println!("{row:?}");
/// }
/// report.delete()?;
/// ```
#[derive(Debug)]
pub struct ProfiledReport {
    profile: ReportProfile,
    report: Report,
    columns: Vec<ColumnDescriptor>,
}

impl ProfiledReport {
    pub fn new(appliance: &Appliance, profile: ReportProfile) -> Self {
        Self {
            profile,
            report: Report::new(appliance),
            columns: Vec::new(),
        }
    }

    pub fn traffic_summary(appliance: &Appliance) -> Self {
        Self::new(appliance, ReportProfile::traffic_summary())
    }

    pub fn traffic_overall_time_series(appliance: &Appliance) -> Self {
        Self::new(appliance, ReportProfile::traffic_overall_time_series())
    }

    pub fn traffic_flow_list(appliance: &Appliance) -> Self {
        Self::new(appliance, ReportProfile::traffic_flow_list())
    }

    pub fn identity(appliance: &Appliance) -> Self {
        Self::new(appliance, ReportProfile::identity())
    }

    pub fn profile(&self) -> &ReportProfile {
        &self.profile
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }

    pub fn into_report(self) -> Report {
        self.report
    }

    /// Columns resolved by the last run.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Submit the report with this profile's configuration applied.
    pub fn run(&mut self, params: ReportParams) -> ReportResult<RunOutcome> {
        let resolved = self.profile.apply(&params)?;
        resolved.resolution.parse::<Resolution>()?;

        let appliance = self.report.appliance().clone();
        let catalog = appliance.catalog();
        let defaults = appliance.defaults();

        let columns = catalog.resolve_columns(&resolved.columns, Some(resolved.groupby.as_str()))?;
        let column_ids: Vec<u32> = columns.iter().map(|c| c.id).collect();
        let sort_column = params
            .sort_col
            .as_ref()
            .map(|c| catalog.resolve_column(c, Some(resolved.groupby.as_str())))
            .transpose()?
            .map(|c| c.id);
        let host_group_type = HOST_GROUP_GROUPBYS
            .contains(&resolved.groupby.as_str())
            .then(|| {
                params
                    .host_group_type
                    .clone()
                    .unwrap_or_else(|| defaults.host_group_type.clone())
            });

        debug!(
            kind = %self.profile.kind,
            groupby = %resolved.groupby,
            columns = ?column_ids,
            "resolved report columns"
        );

        let query = QuerySpec {
            realm: self.profile.realm.to_string(),
            centricity: resolved.centricity,
            group_by: resolved.groupby,
            columns: column_ids.clone(),
            sort_column,
            area: params.area,
            host_group_type,
        };

        let mut request = RunRequest::new(defaults.template_id)
            .resolution(resolved.resolution)
            .query(query)
            .sync(params.sync);
        request.timefilter = params.timefilter;
        request.traffic_filter = params.traffic_filter;
        request.legacy_filter = params.legacy_filter;

        self.columns = columns;
        self.report.select_query_columns(Some(column_ids));
        self.report.run(request)
    }

    /// Legend of the first query; defaults to the requested columns.
    pub fn legend(&mut self, columns: Option<&[ColumnRef]>) -> ReportResult<Vec<ColumnDescriptor>> {
        self.report.legend(0, columns)
    }

    pub fn iter_data(&mut self, columns: Option<&[ColumnRef]>) -> ReportResult<RowIter<'_>> {
        self.report.iter_data(0, columns)
    }

    pub fn data(&mut self, columns: Option<&[ColumnRef]>) -> ReportResult<Vec<Vec<Value>>> {
        self.report.data(0, columns)
    }

    pub fn totals(&mut self, columns: Option<&[ColumnRef]>) -> ReportResult<Vec<Value>> {
        self.report.totals(0, columns)
    }

    pub fn delete(&mut self) -> ReportResult<()> {
        self.report.delete()
    }
}
