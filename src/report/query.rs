//! A single appliance-side result set.
//!
//! A [`Query`] is created from the description the appliance returns for a
//! completed report. Rows are fetched lazily and cached against the column
//! selection used to fetch them: asking again with the same columns never
//! reaches the appliance, asking with different columns re-fetches.

use std::slice;

use tracing::debug;

use crate::appliance::protocol::QueryInfo;
use crate::appliance::Appliance;
use crate::catalog::ColumnCatalogExt;
use crate::error::ReportResult;
use crate::model::{coerce_row, ColumnDescriptor, ColumnRef, Value};

/// Rows and totals of the last fetch, with the legend they were fetched with.
#[derive(Debug, Clone)]
struct QueryCache {
    /// Requested column ids, `None` for "every available column".
    key: Option<Vec<u32>>,
    legend: Vec<ColumnDescriptor>,
    rows: Vec<Vec<Value>>,
    totals: Vec<Value>,
}

/// One query spawned by a report.
#[derive(Debug)]
pub struct Query {
    appliance: Appliance,
    report_id: u64,
    id: String,
    actual_t0: i64,
    actual_t1: i64,
    available: Vec<ColumnDescriptor>,
    selected: Option<Vec<ColumnDescriptor>>,
    cache: Option<QueryCache>,
}

impl Query {
    /// Build a query from its appliance description.
    ///
    /// Only columns the appliance marks as available (and that carry an id)
    /// are kept. `column_ids` selects the default legend.
    pub fn new(
        appliance: &Appliance,
        report_id: u64,
        info: QueryInfo,
        column_ids: Option<&[u32]>,
    ) -> ReportResult<Self> {
        let available_ids: Vec<u32> = info
            .columns
            .iter()
            .filter(|c| c.available)
            .filter_map(|c| c.id)
            .collect();
        let catalog = appliance.catalog();
        let available = catalog.resolve_ids(&available_ids)?;
        let selected = column_ids.map(|ids| catalog.resolve_ids(ids)).transpose()?;

        Ok(Self {
            appliance: appliance.clone(),
            report_id,
            id: info.id,
            actual_t0: info.actual_t0,
            actual_t1: info.actual_t1,
            available,
            selected,
            cache: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn report_id(&self) -> u64 {
        self.report_id
    }

    /// The time window the appliance actually covered, in epoch seconds.
    pub fn actual_range(&self) -> (i64, i64) {
        (self.actual_t0, self.actual_t1)
    }

    /// Every available column, regardless of selection.
    pub fn all_columns(&self) -> &[ColumnDescriptor] {
        &self.available
    }

    pub fn selected_columns(&self) -> Option<&[ColumnDescriptor]> {
        self.selected.as_deref()
    }

    /// Describe the values of each row.
    ///
    /// Explicit columns are resolved through the catalog; otherwise the
    /// selected columns, else every available column.
    pub fn legend(&self, columns: Option<&[ColumnRef]>) -> ReportResult<Vec<ColumnDescriptor>> {
        Ok(self
            .requested(columns)?
            .unwrap_or_else(|| self.available.clone()))
    }

    /// Coerced rows, produced lazily from the cache.
    pub fn iter_data(&mut self, columns: Option<&[ColumnRef]>) -> ReportResult<RowIter<'_>> {
        let cache = self.fetch(columns)?;
        Ok(RowIter {
            legend: &cache.legend,
            rows: cache.rows.iter(),
        })
    }

    /// Coerced rows.
    pub fn data(&mut self, columns: Option<&[ColumnRef]>) -> ReportResult<Vec<Vec<Value>>> {
        Ok(self.iter_data(columns)?.collect())
    }

    /// The coerced totals row.
    pub fn totals(&mut self, columns: Option<&[ColumnRef]>) -> ReportResult<Vec<Value>> {
        let cache = self.fetch(columns)?;
        Ok(coerce_row(&cache.legend, cache.totals.clone()))
    }

    fn requested(
        &self,
        columns: Option<&[ColumnRef]>,
    ) -> ReportResult<Option<Vec<ColumnDescriptor>>> {
        match columns {
            Some(columns) => Ok(Some(self.appliance.catalog().resolve_columns(columns, None)?)),
            None => Ok(self.selected.clone()),
        }
    }

    fn fetch(&mut self, columns: Option<&[ColumnRef]>) -> ReportResult<&QueryCache> {
        let requested = self.requested(columns)?;
        let key: Option<Vec<u32>> = requested
            .as_ref()
            .map(|cols| cols.iter().map(|c| c.id).collect());

        let hit = matches!(&self.cache, Some(cache) if cache.key == key);
        match hit {
            true => Ok(self.cache.as_ref().expect("cache checked above")),
            false => {
                debug!(
                    report_id = self.report_id,
                    query_id = %self.id,
                    columns = ?key,
                    "fetching query data"
                );
                let data = self
                    .appliance
                    .api()
                    .query_data(self.report_id, &self.id, key.as_deref())?;
                Ok(&*self.cache.insert(QueryCache {
                    key,
                    legend: requested.unwrap_or_else(|| self.available.clone()),
                    rows: data.data,
                    totals: data.totals,
                }))
            }
        }
    }
}

/// Iterator over coerced rows borrowed from a query's cache.
#[derive(Debug, Clone)]
pub struct RowIter<'a> {
    legend: &'a [ColumnDescriptor],
    rows: slice::Iter<'a, Vec<Value>>,
}

impl RowIter<'_> {
    /// The legend rows are coerced with.
    pub fn legend(&self) -> &[ColumnDescriptor] {
        self.legend
    }
}

impl Iterator for RowIter<'_> {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows
            .next()
            .map(|row| coerce_row(self.legend, row.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for RowIter<'_> {}
