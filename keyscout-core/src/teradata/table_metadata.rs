//! Live column metadata for one table, taken from a zero-row probe.

use super::queries::CatalogQueries;
use super::type_mapping::map_reported_type;
use crate::connection::CatalogConnection;
use crate::error::KeyScoutError;
use crate::models::{ColumnOrdinal, QueryResult, TableRef, UnifiedDataType};
use crate::Result;

/// Result metadata of `SELECT * FROM <table> WHERE 1=2`.
///
/// Owned by a single strategy invocation and dropped when it returns.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    target: TableRef,
    probe: QueryResult,
}

impl TableMetadata {
    /// Runs the probe. A failure here aborts the calling strategy: without
    /// live metadata no column can be classified.
    pub async fn probe(
        conn: &dyn CatalogConnection,
        queries: &CatalogQueries,
        target: &TableRef,
    ) -> Result<Self> {
        let sql = queries.table_probe(target);
        let probe = conn.query(&sql).await?;
        tracing::trace!(
            "Probed {} and found {} columns",
            target,
            probe.column_count()
        );
        Ok(Self::from_result(target.clone(), probe))
    }

    /// Wraps an already executed probe result.
    pub const fn from_result(target: TableRef, probe: QueryResult) -> Self {
        Self { target, probe }
    }

    /// Number of columns the table exposes
    pub fn column_count(&self) -> usize {
        self.probe.column_count()
    }

    /// Position of `column_name` in the probe, or `None` when the table
    /// does not expose such a column.
    pub fn ordinal(&self, column_name: &str) -> Option<ColumnOrdinal> {
        self.probe
            .find_column(column_name)
            .and_then(ColumnOrdinal::from_index)
    }

    /// Semantic type of the column at `ordinal`, or `Unknown` when the
    /// ordinal or its type name cannot be resolved.
    pub fn column_type(&self, ordinal: ColumnOrdinal) -> UnifiedDataType {
        self.probe
            .columns
            .get(ordinal.index())
            .map_or(UnifiedDataType::Unknown, |c| {
                map_reported_type(c.type_name.as_deref())
            })
    }

    /// Whether the driver flags the column at `ordinal` as auto-increment.
    pub fn is_auto_increment(&self, ordinal: ColumnOrdinal) -> Result<bool> {
        self.probe
            .columns
            .get(ordinal.index())
            .map(|c| c.auto_increment)
            .ok_or_else(|| KeyScoutError::OrdinalOutOfRange {
                ordinal: ordinal.index().saturating_add(1),
                column_count: self.column_count(),
                table: self.target.to_string(),
            })
    }
}
