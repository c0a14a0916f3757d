//! ReportingApi trait definition.
//!
//! The ReportingApi trait abstracts over the transport used to reach the
//! appliance's reporting endpoints. Implementations own authentication,
//! HTTP and JSON encoding; the report engine only sees typed documents.

use super::error::ApplianceResult;
use super::protocol::{QueryData, QueryInfo, ReportRequest, ReportStatus};

/// Trait for the appliance reporting endpoints.
///
/// All calls are blocking. Errors are propagated by the report engine
/// unchanged, except [`ApplianceError::NotFound`] from
/// [`delete_report`](Self::delete_report), which the engine treats as
/// "already released".
///
/// [`ApplianceError::NotFound`]: super::ApplianceError::NotFound
///
/// # Example
///
/// ```ignore
/// use netprofiler::appliance::ReportingApi;
///
/// fn progress(api: &dyn ReportingApi, id: u64) -> ApplianceResult<f64> {
///     Ok(api.report_status(id)?.percent)
/// }
/// ```
pub trait ReportingApi: Send + Sync {
    // =========================================================================
    // Report lifecycle
    // =========================================================================

    /// Submit a report. Returns the resource location of the created report,
    /// ending in `.../reports/<id>`.
    fn create_report(&self, request: &ReportRequest) -> ApplianceResult<String>;

    /// Fetch the progress of a report.
    fn report_status(&self, report_id: u64) -> ApplianceResult<ReportStatus>;

    /// Remove a report from the appliance.
    ///
    /// Returns [`ApplianceError::NotFound`](super::ApplianceError::NotFound)
    /// when the report does not exist.
    fn delete_report(&self, report_id: u64) -> ApplianceResult<()>;

    // =========================================================================
    // Query results
    // =========================================================================

    /// List the queries a report spawned.
    fn list_queries(&self, report_id: u64) -> ApplianceResult<Vec<QueryInfo>>;

    /// Fetch the rows and totals of a query.
    ///
    /// When `column_ids` is given, rows contain exactly those columns in that
    /// order; otherwise every available column is returned.
    fn query_data(
        &self,
        report_id: u64,
        query_id: &str,
        column_ids: Option<&[u32]>,
    ) -> ApplianceResult<QueryData>;
}
