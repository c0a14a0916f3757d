//! Report orchestration.
//!
//! - [`engine`]: the [`Report`] lifecycle (submit, poll, delete) and query access
//! - [`guard`]: scoped deletion of remote reports
//! - [`query`]: cached, type-coerced query results
//! - [`profile`]: report kinds as configuration values
//! - [`profiled`]: the engine driven by a profile
//! - [`wan`]: the LAN/WAN directional merge
//!
//! ```text
//!   ReportProfile ──► ProfiledReport ──► Report ──► ReportingApi
//!                          ▲                │
//!   WanSummaryReport ──────┘ (×2)           ▼
//!                                         Query ──► ColumnCatalog
//! ```

pub mod engine;
pub mod guard;
pub mod profile;
pub mod profiled;
pub mod query;
pub mod wan;

pub use engine::{Report, ReportState, RunOutcome, RunRequest};
pub use guard::{with_report, ReportGuard};
pub use profile::{Allowed, Choice, ReportKind, ReportParams, ReportProfile, ResolvedParams};
pub use profiled::ProfiledReport;
pub use query::{Query, RowIter};
pub use wan::{Direction, WanRequest, WanRow, WanSummaryReport, WanTable};
