//! StaticCatalog implementation.
//!
//! A ColumnCatalog backed by a column list supplied as data, typically the
//! appliance's published column metadata saved as JSON:
//!
//! ```json
//! [
//!   {"id": 6, "key": "host_ip", "type": "string", "iskey": true, "groupbys": ["hos"]},
//!   {"id": 33, "key": "in_avg_bytes", "type": "float", "realms": ["traffic_summary"]}
//! ]
//! ```
//!
//! Empty (or missing) `realms`, `centricities` and `groupbys` lists mean the
//! column applies everywhere.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{CatalogError, CatalogResult};
use super::provider::ColumnCatalog;
use crate::model::{ColumnDescriptor, ColumnRef};

/// One column of the catalog and where it applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub column: ColumnDescriptor,
    #[serde(default)]
    pub realms: Vec<String>,
    #[serde(default)]
    pub centricities: Vec<String>,
    #[serde(default)]
    pub groupbys: Vec<String>,
}

impl CatalogEntry {
    /// An entry valid in every realm, centricity and groupby.
    pub fn anywhere(column: ColumnDescriptor) -> Self {
        Self {
            column,
            realms: Vec::new(),
            centricities: Vec::new(),
            groupbys: Vec::new(),
        }
    }

    pub fn in_realms<I, S>(mut self, realms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.realms = realms.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_centricities<I, S>(mut self, centricities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.centricities = centricities.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_groupbys<I, S>(mut self, groupbys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groupbys = groupbys.into_iter().map(Into::into).collect();
        self
    }

    fn matches(&self, realms: &[&str], centricities: &[&str], groupbys: &[&str]) -> bool {
        scope_matches(&self.realms, realms)
            && scope_matches(&self.centricities, centricities)
            && scope_matches(&self.groupbys, groupbys)
    }
}

fn scope_matches(scope: &[String], wanted: &[&str]) -> bool {
    scope.is_empty() || wanted.is_empty() || scope.iter().any(|s| wanted.contains(&s.as_str()))
}

/// In-memory column catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<u32, usize>,
    by_key: HashMap<String, Vec<usize>>,
}

impl StaticCatalog {
    /// Build a catalog from entries. Later entries with a duplicate id are ignored.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = StaticCatalog::default();
        for entry in entries {
            if catalog.by_id.contains_key(&entry.column.id) {
                continue;
            }
            let index = catalog.entries.len();
            catalog.by_id.insert(entry.column.id, index);
            catalog
                .by_key
                .entry(entry.column.key.clone())
                .or_default()
                .push(index);
            catalog.entries.push(entry);
        }
        catalog
    }

    /// Parse a catalog from a JSON array of entries.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Load a catalog from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup_key(&self, key: &str, groupby: Option<&str>) -> Option<&CatalogEntry> {
        let candidates = self.by_key.get(key)?;
        let preferred = groupby.and_then(|g| {
            candidates
                .iter()
                .find(|&&i| self.entries[i].groupbys.iter().any(|eg| eg == g))
        });
        preferred
            .or_else(|| candidates.first())
            .map(|&i| &self.entries[i])
    }
}

impl ColumnCatalog for StaticCatalog {
    fn resolve_columns(
        &self,
        columns: &[ColumnRef],
        groupby: Option<&str>,
    ) -> CatalogResult<Vec<ColumnDescriptor>> {
        columns
            .iter()
            .map(|column| match column {
                ColumnRef::Id(id) => self
                    .by_id
                    .get(id)
                    .map(|&i| self.entries[i].column.clone())
                    .ok_or(CatalogError::UnknownColumnId(*id)),
                ColumnRef::Key(key) => self
                    .lookup_key(key, groupby)
                    .map(|entry| entry.column.clone())
                    .ok_or_else(|| CatalogError::UnknownColumn(key.clone())),
            })
            .collect()
    }

    fn search_columns(
        &self,
        realms: &[&str],
        centricities: &[&str],
        groupbys: &[&str],
    ) -> CatalogResult<Vec<ColumnDescriptor>> {
        let mut seen = HashSet::new();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.matches(realms, centricities, groupbys))
            .filter(|entry| seen.insert(entry.column.id))
            .map(|entry| entry.column.clone())
            .collect())
    }
}
