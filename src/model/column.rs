//! Column descriptors and column references.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Data type the appliance reports for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    /// Relative time, transported as seconds.
    Reltime,
    String,
}

impl ColumnType {
    /// Coerce a raw cell to this column's native type.
    ///
    /// Cells that do not parse are returned unchanged; the appliance uses
    /// sentinel strings (empty cells, "N/A") in numeric columns.
    pub fn coerce(self, value: Value) -> Value {
        match self {
            ColumnType::Int => value.into_int(),
            ColumnType::Float | ColumnType::Reltime => value.into_float(),
            ColumnType::String => value,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Reltime => "reltime",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column known to the appliance.
///
/// Identity is the numeric `id`: two descriptors with the same id are the
/// same column regardless of the other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub id: u32,
    pub key: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether the column identifies a row (join/index column).
    #[serde(default, alias = "iskey")]
    pub is_key: bool,
}

impl ColumnDescriptor {
    pub fn new(id: u32, key: impl Into<String>, column_type: ColumnType, is_key: bool) -> Self {
        Self {
            id,
            key: key.into(),
            column_type,
            is_key,
        }
    }
}

impl PartialEq for ColumnDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ColumnDescriptor {}

impl Hash for ColumnDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// How a caller names a column: by appliance id or by key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    Id(u32),
    Key(String),
}

impl ColumnRef {
    /// The key, when the reference is by key.
    pub fn key(&self) -> Option<&str> {
        match self {
            ColumnRef::Key(key) => Some(key),
            ColumnRef::Id(_) => None,
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Id(id) => write!(f, "#{id}"),
            ColumnRef::Key(key) => f.write_str(key),
        }
    }
}

impl From<u32> for ColumnRef {
    fn from(id: u32) -> Self {
        ColumnRef::Id(id)
    }
}

impl From<&str> for ColumnRef {
    fn from(key: &str) -> Self {
        ColumnRef::Key(key.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(key: String) -> Self {
        ColumnRef::Key(key)
    }
}

impl From<&ColumnDescriptor> for ColumnRef {
    fn from(column: &ColumnDescriptor) -> Self {
        ColumnRef::Id(column.id)
    }
}

/// Build a list of column references from anything convertible.
pub fn column_refs<I, C>(columns: I) -> Vec<ColumnRef>
where
    I: IntoIterator<Item = C>,
    C: Into<ColumnRef>,
{
    columns.into_iter().map(Into::into).collect()
}
