//! Unique indices as a substitute key.

use crate::connection::{CatalogConnection, RowExt};
use crate::error::{FieldError, KeyScoutError};
use crate::finder::{KeyStrategy, StrategyKind};
use crate::models::{PrimaryKeyColumn, TableRef};
use crate::teradata::queries::{COLUMN_NAME, COLUMN_POSITION, CatalogQueries, INDEX_NUMBER};
use crate::teradata::table_metadata::TableMetadata;
use crate::Result;
use async_trait::async_trait;

/// Uses the lowest-numbered unique index on the table.
///
/// Columns are ordered by the index catalog's `ColumnPosition`, not by
/// name or row order. Every column must be visible in the live probe; if
/// any catalog value fails to parse or any column cannot be resolved, the
/// whole result is discarded.
#[derive(Debug, Clone, Copy)]
pub struct UniqueIndexStrategy {
    queries: CatalogQueries,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexColumn {
    index_number: Option<u32>,
    name: String,
    position: u32,
}

impl UniqueIndexStrategy {
    /// Creates the strategy over the given dictionary queries.
    pub const fn new(queries: CatalogQueries) -> Self {
        Self { queries }
    }
}

#[async_trait]
impl KeyStrategy for UniqueIndexStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::UniqueIndex
    }

    async fn find_columns(
        &self,
        conn: &dyn CatalogConnection,
        target: &TableRef,
    ) -> Result<Vec<PrimaryKeyColumn>> {
        let sql = self.queries.unique_index_columns(target);
        let result = conn.query(&sql).await?;
        if result.is_empty() {
            return Ok(Vec::new());
        }

        let context = Some(target.table.as_str());
        let entries = result
            .rows()
            .map(|row| {
                Ok(IndexColumn {
                    index_number: row.get_optional_position(INDEX_NUMBER, context)?,
                    name: row.get_text(COLUMN_NAME, context)?,
                    position: row.get_position(COLUMN_POSITION, context)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let metadata = TableMetadata::probe(conn, &self.queries, target).await?;

        select_index(entries)
            .into_iter()
            .map(|entry| {
                let ordinal = metadata.ordinal(&entry.name).ok_or_else(|| {
                    KeyScoutError::parse_field(
                        COLUMN_NAME,
                        context,
                        FieldError(format!(
                            "unique index column '{}' is not visible in the table probe",
                            entry.name
                        )),
                    )
                })?;
                Ok(PrimaryKeyColumn::classify(
                    entry.name,
                    metadata.column_type(ordinal),
                    metadata.is_auto_increment(ordinal)?,
                ))
            })
            .collect()
    }
}

/// Keeps the columns of the lowest-numbered index, sorted by position.
///
/// Rows without an index number are treated as one index.
fn select_index(mut entries: Vec<IndexColumn>) -> Vec<IndexColumn> {
    let Some(chosen) = entries.iter().map(|e| e.index_number).min() else {
        return Vec::new();
    };
    entries.retain(|e| e.index_number == chosen);
    entries.sort_by_key(|e| e.position);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index_number: Option<u32>, name: &str, position: u32) -> IndexColumn {
        IndexColumn {
            index_number,
            name: name.to_string(),
            position,
        }
    }

    #[test]
    fn test_orders_by_position_not_name() {
        let chosen = select_index(vec![
            entry(Some(4), "ZONE", 1),
            entry(Some(4), "ACCOUNT", 2),
        ]);
        let names: Vec<_> = chosen.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ZONE", "ACCOUNT"]);
    }

    #[test]
    fn test_orders_by_position_not_row_order() {
        let chosen = select_index(vec![
            entry(Some(1), "LINE_NO", 2),
            entry(Some(1), "ORDER_ID", 1),
        ]);
        let names: Vec<_> = chosen.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ORDER_ID", "LINE_NO"]);
    }

    #[test]
    fn test_lowest_index_number_wins() {
        let chosen = select_index(vec![
            entry(Some(8), "EMAIL", 1),
            entry(Some(2), "ORDER_ID", 1),
            entry(Some(2), "LINE_NO", 2),
        ]);
        let names: Vec<_> = chosen.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ORDER_ID", "LINE_NO"]);
    }

    #[test]
    fn test_rows_without_index_number_form_one_index() {
        let chosen = select_index(vec![entry(None, "B", 2), entry(None, "A", 1)]);
        assert_eq!(chosen.len(), 2);
        assert_eq!(chosen[0].name, "A");
        assert!(select_index(Vec::new()).is_empty());
    }
}
