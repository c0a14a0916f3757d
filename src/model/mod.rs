//! Data model shared by reports, queries and the catalog.
//!
//! - [`column`]: column descriptors, types and references
//! - [`value`]: cell values and native-type coercion
//! - [`resolution`]: the enumerated report resolutions
//! - [`filter`]: time, traffic and legacy filters
//! - [`duration`]: human-readable durations

pub mod column;
pub mod duration;
pub mod filter;
pub mod resolution;
pub mod value;

pub use column::{column_refs, ColumnDescriptor, ColumnRef, ColumnType};
pub use duration::{parse_duration, InvalidDuration};
pub use filter::{LegacyFilter, TimeFilter, TrafficFilter};
pub use resolution::{Resolution, RESOLUTION_SECONDS};
pub use value::Value;

/// Coerce a row according to its legend.
///
/// Values beyond the legend's length are left as they are.
pub fn coerce_row(legend: &[ColumnDescriptor], row: Vec<Value>) -> Vec<Value> {
    row.into_iter()
        .enumerate()
        .map(|(i, value)| match legend.get(i) {
            Some(column) => column.column_type.coerce(value),
            None => value,
        })
        .collect()
}
