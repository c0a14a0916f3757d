//! # NetProfiler reports
//!
//! Client-side orchestration of analytics reports on a network traffic
//! profiler appliance.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Report kinds (ReportProfile / WanSummaryReport)   │
//! │  (summary, time series, flow list, identity, WAN)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [criteria]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Report lifecycle (submit → poll → delete)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [queries]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Query (legend, cached rows, type coercion)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │   Appliance: ReportingApi (transport) + ColumnCatalog    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Transport, authentication and logging output are supplied by the caller:
//! implement [`appliance::ReportingApi`] and install a `tracing` subscriber.

pub mod appliance;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod report;

pub use error::{ReportError, ReportResult};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::appliance::{Appliance, ApplianceError, ReportingApi};
    pub use crate::catalog::{ColumnCatalog, ColumnCatalogExt, StaticCatalog};
    pub use crate::config::Settings;
    pub use crate::error::{ReportError, ReportResult};
    pub use crate::model::{
        ColumnDescriptor, ColumnRef, ColumnType, LegacyFilter, Resolution, TimeFilter,
        TrafficFilter, Value,
    };
    pub use crate::report::{
        with_report, Direction, ProfiledReport, Report, ReportGuard, ReportParams, ReportProfile,
        RunOutcome, RunRequest, WanRequest, WanSummaryReport, WanTable,
    };
}
