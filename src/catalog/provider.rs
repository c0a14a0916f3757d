//! ColumnCatalog trait definition.
//!
//! The ColumnCatalog trait abstracts over where column metadata comes from.
//! Appliances publish their column list per realm, centricity and groupby;
//! the catalog answers name/id lookups against that list.

use std::collections::HashSet;

use super::error::CatalogResult;
use crate::model::{ColumnDescriptor, ColumnRef};

/// Trait for resolving appliance columns.
///
/// # Example
///
/// ```ignore
/// use netprofiler::catalog::{ColumnCatalog, ColumnCatalogExt};
///
/// fn ids(catalog: &dyn ColumnCatalog) -> CatalogResult<Vec<u32>> {
///     catalog.column_ids(&["host_ip".into(), "in_bytes".into()], Some("hos"))
/// }
/// ```
pub trait ColumnCatalog: Send + Sync {
    /// Resolve names or ids to descriptors, preserving order.
    ///
    /// `groupby` disambiguates keys that exist once per groupby (key columns
    /// such as the host or interface identifier).
    fn resolve_columns(
        &self,
        columns: &[ColumnRef],
        groupby: Option<&str>,
    ) -> CatalogResult<Vec<ColumnDescriptor>>;

    /// List the columns valid for any of the given realms, centricities and
    /// groupbys.
    fn search_columns(
        &self,
        realms: &[&str],
        centricities: &[&str],
        groupbys: &[&str],
    ) -> CatalogResult<Vec<ColumnDescriptor>>;
}

/// Extension trait for ColumnCatalog with convenience lookups.
pub trait ColumnCatalogExt: ColumnCatalog {
    /// Resolve a single column.
    fn resolve_column(
        &self,
        column: &ColumnRef,
        groupby: Option<&str>,
    ) -> CatalogResult<ColumnDescriptor> {
        let mut resolved = self.resolve_columns(std::slice::from_ref(column), groupby)?;
        match resolved.pop() {
            Some(descriptor) => Ok(descriptor),
            None => Err(super::CatalogError::UnknownColumn(column.to_string())),
        }
    }

    /// Resolve columns straight to their ids.
    fn column_ids(&self, columns: &[ColumnRef], groupby: Option<&str>) -> CatalogResult<Vec<u32>> {
        Ok(self
            .resolve_columns(columns, groupby)?
            .into_iter()
            .map(|c| c.id)
            .collect())
    }

    /// Resolve a list of ids.
    fn resolve_ids(&self, ids: &[u32]) -> CatalogResult<Vec<ColumnDescriptor>> {
        let refs: Vec<ColumnRef> = ids.iter().copied().map(ColumnRef::Id).collect();
        self.resolve_columns(&refs, None)
    }

    /// Keys of every column available for one realm/centricity/groupby.
    fn available_keys(
        &self,
        realm: &str,
        centricity: &str,
        groupby: &str,
    ) -> CatalogResult<HashSet<String>> {
        Ok(self
            .search_columns(&[realm], &[centricity], &[groupby])?
            .into_iter()
            .map(|c| c.key)
            .collect())
    }
}

// Blanket implementation for all ColumnCatalog implementations
impl<T: ColumnCatalog + ?Sized> ColumnCatalogExt for T {}
