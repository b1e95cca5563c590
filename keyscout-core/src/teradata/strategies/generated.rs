//! Identity columns as a substitute key.

use crate::connection::{CatalogConnection, RowExt};
use crate::finder::{KeyStrategy, StrategyKind};
use crate::models::{PrimaryKeyColumn, TableRef};
use crate::teradata::queries::{COLUMN_NAME, CatalogQueries};
use crate::teradata::table_metadata::TableMetadata;
use crate::Result;
use async_trait::async_trait;

/// Reports identity columns (`GENERATED ALWAYS` or `GENERATED BY DEFAULT`)
/// that the live probe also flags as auto-increment.
///
/// A dictionary flag alone is not enough: columns the probe does not
/// expose, or does not flag, are left out.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedColumnStrategy {
    queries: CatalogQueries,
}

impl GeneratedColumnStrategy {
    /// Creates the strategy over the given dictionary queries.
    pub const fn new(queries: CatalogQueries) -> Self {
        Self { queries }
    }
}

#[async_trait]
impl KeyStrategy for GeneratedColumnStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::GeneratedColumn
    }

    async fn find_columns(
        &self,
        conn: &dyn CatalogConnection,
        target: &TableRef,
    ) -> Result<Vec<PrimaryKeyColumn>> {
        let sql = self.queries.generated_columns(target);
        let result = conn.query(&sql).await?;
        if result.is_empty() {
            return Ok(Vec::new());
        }

        let context = Some(target.table.as_str());
        let names = result
            .rows()
            .map(|row| row.get_text(COLUMN_NAME, context))
            .collect::<Result<Vec<_>>>()?;

        let metadata = TableMetadata::probe(conn, &self.queries, target).await?;
        let mut columns = Vec::new();

        for name in names {
            let Some(ordinal) = metadata.ordinal(&name) else {
                tracing::debug!(
                    "Identity column '{}' of {} is not visible in the table probe",
                    name,
                    target
                );
                continue;
            };
            if !metadata.is_auto_increment(ordinal)? {
                tracing::debug!(
                    "Identity column '{}' of {} is not flagged auto-increment by the driver, excluding",
                    name,
                    target
                );
                continue;
            }
            let data_type = metadata.column_type(ordinal);
            columns.push(PrimaryKeyColumn::AutoGenerated { name, data_type });
        }

        Ok(columns)
    }
}
