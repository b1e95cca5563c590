//! Key inference for views.
//!
//! A view has no key of its own, but callers still need a stable column to
//! address rows. This strategy re-runs the view's defining query and
//! reports every result column the driver flags as auto-increment, i.e.
//! identity columns passed through from a base table.

use crate::connection::{CatalogConnection, RowExt};
use crate::error::KeyScoutError;
use crate::finder::{KeyStrategy, StrategyKind};
use crate::models::{PrimaryKeyColumn, TableRef};
use crate::teradata::queries::{CatalogQueries, REQUEST_TEXT};
use crate::teradata::type_mapping::map_reported_type;
use crate::teradata::view_sql::extract_view_select;
use crate::Result;
use async_trait::async_trait;

/// Infers key columns from a view's defining query.
///
/// Every non-fatal failure (definition lookup, splitting, re-execution) is
/// logged at warn level with the offending SQL and yields no columns.
#[derive(Debug, Clone, Copy)]
pub struct ViewBackedStrategy {
    queries: CatalogQueries,
}

impl ViewBackedStrategy {
    /// Creates the strategy over the given dictionary queries.
    pub const fn new(queries: CatalogQueries) -> Self {
        Self { queries }
    }
}

#[async_trait]
impl KeyStrategy for ViewBackedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ViewBacked
    }

    async fn find_columns(
        &self,
        conn: &dyn CatalogConnection,
        target: &TableRef,
    ) -> Result<Vec<PrimaryKeyColumn>> {
        let sql = self.queries.view_definition(target);
        let Some(result) = or_skip(conn.query(&sql).await, target, &sql, "read definition of")?
        else {
            return Ok(Vec::new());
        };
        // No row: the target is not a view.
        let Some(row) = result.rows().next() else {
            return Ok(Vec::new());
        };

        let definition = row.get_text(REQUEST_TEXT, Some(target.table.as_str()));
        let Some(definition) = or_skip(definition, target, &sql, "read definition of")? else {
            return Ok(Vec::new());
        };

        let select = extract_view_select(&definition).map_err(|source| {
            KeyScoutError::ViewDefinition {
                table: target.to_string(),
                source,
            }
        });
        let Some(select) = or_skip(select, target, &definition, "parse definition of")? else {
            return Ok(Vec::new());
        };

        let executed = conn.query(select).await;
        let Some(view_result) = or_skip(
            executed,
            target,
            select,
            "perform select used to create view",
        )?
        else {
            return Ok(Vec::new());
        };

        Ok(view_result
            .columns
            .iter()
            .filter(|column| column.auto_increment)
            .map(|column| PrimaryKeyColumn::AutoGenerated {
                name: column.label.trim().to_string(),
                data_type: map_reported_type(column.type_name.as_deref()),
            })
            .collect())
    }
}

/// Passes fatal errors through; logs anything else and turns it into
/// `None`.
fn or_skip<T>(result: Result<T>, target: &TableRef, sql: &str, action: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::warn!(
                "Unable to {} {}: {}\nSQL: {}",
                action,
                target,
                e,
                sql
            );
            Ok(None)
        }
    }
}
