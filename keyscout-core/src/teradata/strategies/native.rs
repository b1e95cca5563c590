//! Declared primary keys, as reported by the driver's catalog.

use crate::connection::CatalogConnection;
use crate::finder::{KeyStrategy, StrategyKind};
use crate::models::{PrimaryKeyColumn, TableRef};
use crate::teradata::queries::CatalogQueries;
use crate::teradata::table_metadata::TableMetadata;
use crate::Result;
use async_trait::async_trait;

/// Reads the declared key through the driver's primary-key catalog and
/// classifies each column with the live probe.
///
/// Columns the catalog reports but the probe does not expose (stale
/// dictionary rows) are skipped; the remaining columns keep catalog order.
#[derive(Debug, Clone, Copy)]
pub struct NativeMetadataStrategy {
    queries: CatalogQueries,
}

impl NativeMetadataStrategy {
    /// Creates the strategy; `queries` supplies the table probe.
    pub const fn new(queries: CatalogQueries) -> Self {
        Self { queries }
    }
}

#[async_trait]
impl KeyStrategy for NativeMetadataStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NativeMetadata
    }

    async fn find_columns(
        &self,
        conn: &dyn CatalogConnection,
        target: &TableRef,
    ) -> Result<Vec<PrimaryKeyColumn>> {
        let names = conn
            .primary_key_columns(target.schema.as_deref(), &target.table)
            .await?;
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let metadata = TableMetadata::probe(conn, &self.queries, target).await?;
        let mut columns = Vec::with_capacity(names.len());

        for name in names.iter().map(|n| n.trim()) {
            let Some(ordinal) = metadata.ordinal(name) else {
                tracing::debug!(
                    "Declared key column '{}' of {} is not visible in the table probe, skipping",
                    name,
                    target
                );
                continue;
            };
            let generated = metadata.is_auto_increment(ordinal)?;
            columns.push(PrimaryKeyColumn::classify(
                name,
                metadata.column_type(ordinal),
                generated,
            ));
        }

        Ok(columns)
    }
}
