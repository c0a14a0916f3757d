//! Report-level error types.

use thiserror::Error;

use crate::appliance::ApplianceError;
use crate::catalog::CatalogError;

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors surfaced by report orchestration.
///
/// Polling timeouts are not represented here for [`Report::wait_for_complete`],
/// which reports them through its boolean return value. Only callers that need a
/// finished report (the WAN merge) turn a timeout into [`ReportError::TimedOut`].
///
/// [`Report::wait_for_complete`]: crate::report::Report::wait_for_complete
#[derive(Error, Debug)]
pub enum ReportError {
    /// A caller-supplied argument is not acceptable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The appliance answered in a shape we cannot interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A domain rule was violated (e.g. an unknown WAN direction).
    #[error("{0}")]
    Domain(String),

    /// A report did not complete within its polling budget.
    #[error("timed out waiting for report {report_id} to complete, last {percent}% complete")]
    TimedOut {
        /// Appliance report id.
        report_id: u64,
        /// Last reported completion percentage.
        percent: f64,
    },

    /// Failure reported by the appliance transport.
    #[error(transparent)]
    Appliance(#[from] ApplianceError),

    /// Column lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ReportError {
    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Error for operations that need a submitted (or attached) report.
    pub(crate) fn missing_id() -> Self {
        Self::invalid("no report id set, run a report or attach to an existing report first")
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}
