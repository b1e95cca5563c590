//! The discovery contract exposed to the surrounding framework, and the
//! per-strategy capability dialects implement it with.

use crate::connection::CatalogConnection;
use crate::models::{PrimaryKey, PrimaryKeyColumn, TableRef};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Finds the columns that act as a table's key.
///
/// # Outcomes
/// - `Ok(Some(key))`: a non-empty key was found
/// - `Ok(None)`: nothing identifies rows of this table; not an error
/// - `Err(e)`: the connection itself failed ([`KeyScoutError::is_fatal`])
///
/// [`KeyScoutError::is_fatal`]: crate::error::KeyScoutError::is_fatal
#[async_trait]
pub trait PrimaryKeyFinder: Send + Sync {
    /// Discovers the key of `table`, optionally qualified by `schema`.
    async fn primary_key(
        &self,
        conn: &dyn CatalogConnection,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Option<PrimaryKey>>;
}

/// The discovery strategies, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Driver's standard primary-key catalog
    NativeMetadata,
    /// Unique indices from the vendor index catalog
    UniqueIndex,
    /// Identity columns flagged in the vendor column catalog
    GeneratedColumn,
    /// Auto-increment columns of a view's defining query
    ViewBacked,
}

impl StrategyKind {
    /// All strategies in the order they are tried.
    pub const PRIORITY: [Self; 4] = [
        Self::NativeMetadata,
        Self::UniqueIndex,
        Self::GeneratedColumn,
        Self::ViewBacked,
    ];

    /// Stable snake_case name, as used in configuration files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NativeMetadata => "native_metadata",
            Self::UniqueIndex => "unique_index",
            Self::GeneratedColumn => "generated_column",
            Self::ViewBacked => "view_backed",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One way of finding key columns.
///
/// A strategy is a one-shot function of (connection, target) to a column
/// list. It acquires whatever statements it needs and releases them before
/// returning. An `Err` that is not fatal is read by the coordinator as
/// "found nothing"; a strategy never returns a partial list.
#[async_trait]
pub trait KeyStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Key columns of `target` in key order; empty when this strategy
    /// finds nothing.
    async fn find_columns(
        &self,
        conn: &dyn CatalogConnection,
        target: &TableRef,
    ) -> Result<Vec<PrimaryKeyColumn>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_matches_ord() {
        let mut sorted = StrategyKind::PRIORITY;
        sorted.sort();
        assert_eq!(sorted, StrategyKind::PRIORITY);
    }

    #[test]
    fn test_strategy_kind_names() {
        assert_eq!(StrategyKind::UniqueIndex.to_string(), "unique_index");
        let parsed: StrategyKind = serde_json::from_str("\"view_backed\"").unwrap();
        assert_eq!(parsed, StrategyKind::ViewBacked);
    }
}
