//! Scoped release of remote reports.
//!
//! The appliance keeps every report materialized until it is deleted.
//! [`ReportGuard`] and [`with_report`] tie that remote resource to a Rust
//! scope: leaving the scope deletes the report on every exit path.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::appliance::Appliance;
use crate::error::{ReportError, ReportResult};

use super::engine::{Report, RunOutcome};

/// Owns a [`Report`] and deletes it when dropped.
///
/// # Example
///
/// ```ignore
/// let mut report = ReportGuard::new(Report::new(&appliance));
/// report.run(RunRequest::new(184))?;
/// let rows = report.data(0, None)?;
/// // deleted here, even if `data` failed
/// ```
#[derive(Debug)]
pub struct ReportGuard {
    report: Report,
}

impl ReportGuard {
    pub fn new(report: Report) -> Self {
        Self { report }
    }

    /// Delete the report now and surface any failure.
    pub fn release(mut self) -> ReportResult<()> {
        self.report.delete()
    }
}

impl Deref for ReportGuard {
    type Target = Report;

    fn deref(&self) -> &Report {
        &self.report
    }
}

impl DerefMut for ReportGuard {
    fn deref_mut(&mut self) -> &mut Report {
        &mut self.report
    }
}

impl Drop for ReportGuard {
    fn drop(&mut self) {
        if let Err(e) = self.report.delete() {
            warn!(report_id = ?self.report.id(), error = %e, "failed to delete report");
        }
    }
}

/// Run `f` against a fresh report and delete the report afterwards.
///
/// A failed delete is returned only when `f` itself succeeded; otherwise the
/// error from `f` wins.
pub fn with_report<T, F>(appliance: &Appliance, f: F) -> ReportResult<T>
where
    F: FnOnce(&mut Report) -> ReportResult<T>,
{
    let mut report = Report::new(appliance);
    let result = f(&mut report);
    finish(result, &mut report)
}

/// Delete `report`, keeping the outcome of the work done with it first.
pub(crate) fn finish<T>(result: ReportResult<T>, report: &mut Report) -> ReportResult<T> {
    match (result, report.delete()) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(delete_error)) => {
            warn!(report_id = ?report.id(), error = %delete_error, "failed to delete report");
            Err(e)
        }
    }
}

/// Treat a polling timeout as fatal.
pub(crate) fn require_completed(report: &Report, outcome: RunOutcome) -> ReportResult<()> {
    if outcome != RunOutcome::TimedOut {
        return Ok(());
    }
    Err(ReportError::TimedOut {
        report_id: report.id().unwrap_or_default(),
        percent: report.last_status().map(|s| s.percent).unwrap_or_default(),
    })
}
