//! Column catalog module.
//!
//! This module provides the abstraction used to turn human-readable column
//! requests into appliance column ids, plus a data-driven implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        ColumnCatalog                            │
//! │  - resolve_columns(refs, groupby)  -> [ColumnDescriptor]        │
//! │  - search_columns(realms, centricities, groupbys)               │
//! │                                                                 │
//! │  ColumnCatalogExt (blanket)                                     │
//! │  - resolve_column() / column_ids() / resolve_ids()              │
//! │  - available_keys()                                             │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                StaticCatalog (JSON column list)                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use netprofiler::catalog::{ColumnCatalogExt, StaticCatalog};
//!
//! let catalog = StaticCatalog::from_file("columns.json")?;
//! let ids = catalog.column_ids(&["host_ip".into(), "in_avg_bytes".into()], Some("hos"))?;
//! ```

mod error;
mod provider;
mod static_catalog;

pub use error::{CatalogError, CatalogResult};
pub use provider::{ColumnCatalog, ColumnCatalogExt};
pub use static_catalog::{CatalogEntry, StaticCatalog};
