//! Appliance collaborator module.
//!
//! This module defines the boundary between the report engine and the remote
//! appliance. Transport and authentication live behind [`ReportingApi`];
//! column metadata lives behind [`ColumnCatalog`]. Both are bundled, together
//! with resolved settings, in the cloneable [`Appliance`] handle every report
//! is bound to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Appliance                              │
//! │  ┌───────────────────────────┐  ┌───────────────────────────┐   │
//! │  │   ReportingApi (remote)   │  │  ColumnCatalog (metadata) │   │
//! │  │  - create_report()        │  │  - resolve_columns()      │   │
//! │  │  - report_status()        │  │  - search_columns()       │   │
//! │  │  - list_queries()         │  │                           │   │
//! │  │  - query_data()           │  │                           │   │
//! │  │  - delete_report()        │  │                           │   │
//! │  └───────────────────────────┘  └───────────────────────────┘   │
//! │           PollPolicy + ReportDefaults (from Settings)           │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!          Report / ProfiledReport / WanSummaryReport
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use netprofiler::appliance::Appliance;
//! use netprofiler::catalog::StaticCatalog;
//! use netprofiler::config::Settings;
//!
//! let catalog = StaticCatalog::from_file("columns.json")?;
//! let appliance = Appliance::new(Arc::new(my_transport), Arc::new(catalog))
//!     .with_settings(&Settings::load()?)?;
//! ```

mod api;
mod error;
pub mod protocol;

use std::fmt;
use std::sync::Arc;

pub use api::ReportingApi;
pub use error::{ApplianceError, ApplianceResult};

use crate::catalog::ColumnCatalog;
use crate::config::{PollPolicy, ReportDefaults, Settings, SettingsError};

/// Handle to an appliance: transport, column catalog and resolved settings.
///
/// Cloning is cheap; clones share the same transport and catalog.
#[derive(Clone)]
pub struct Appliance {
    api: Arc<dyn ReportingApi>,
    catalog: Arc<dyn ColumnCatalog>,
    polling: PollPolicy,
    defaults: Arc<ReportDefaults>,
}

impl Appliance {
    /// Create a handle with default polling and report settings.
    pub fn new(api: Arc<dyn ReportingApi>, catalog: Arc<dyn ColumnCatalog>) -> Self {
        Self {
            api,
            catalog,
            polling: PollPolicy::default(),
            defaults: Arc::new(ReportDefaults::default()),
        }
    }

    /// Apply polling and report defaults from configuration.
    pub fn with_settings(mut self, settings: &Settings) -> Result<Self, SettingsError> {
        self.polling = settings.poll_policy()?;
        self.defaults = Arc::new(settings.report_defaults()?);
        Ok(self)
    }

    /// Override the polling policy used by synchronous runs.
    pub fn with_poll_policy(mut self, polling: PollPolicy) -> Self {
        self.polling = polling;
        self
    }

    pub fn api(&self) -> &dyn ReportingApi {
        self.api.as_ref()
    }

    pub fn catalog(&self) -> &dyn ColumnCatalog {
        self.catalog.as_ref()
    }

    pub fn polling(&self) -> PollPolicy {
        self.polling
    }

    pub fn defaults(&self) -> &ReportDefaults {
        &self.defaults
    }
}

impl fmt::Debug for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Appliance")
            .field("polling", &self.polling)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
