//! Teradata primary-key discovery.
//!
//! # Module Structure
//! - `queries`: SQL text for the `DBC` data dictionary
//! - `type_mapping`: Teradata to unified data type conversion
//! - `table_metadata`: live column metadata from a zero-row probe
//! - `view_sql`: recovery of a view's defining query
//! - `strategies`: the four discovery strategies
//!
//! # Discovery Chain
//! Strategies run in fixed order and the first non-empty answer wins:
//! 1. declared primary key (driver catalog)
//! 2. unique index (`DBC.Indices`)
//! 3. identity columns (`DBC.Columns`)
//! 4. auto-increment columns of a view's defining query (`DBC.Tables`)
//!
//! A strategy that errors is treated as having found nothing, unless the
//! error is a failure of the connection itself, which ends discovery.

pub mod queries;
pub mod strategies;
pub mod table_metadata;
pub mod type_mapping;
pub mod view_sql;


use crate::config::DiscoveryConfig;
use crate::connection::CatalogConnection;
use crate::finder::{KeyStrategy, PrimaryKeyFinder, StrategyKind};
use crate::models::{PrimaryKey, TableRef};
use crate::Result;
use async_trait::async_trait;
use queries::CatalogQueries;

pub use type_mapping::map_teradata_type;
pub use view_sql::{ViewSqlError, extract_view_select};

/// Primary-key finder for Teradata tables and views.
///
/// Holds no per-table state: one finder can serve any number of discovery
/// calls, each on the connection the caller passes in.
///
/// # Example
/// ```rust
/// use keyscout_core::connection::{ReplayConnection, ReplayScript};
/// use keyscout_core::models::{QueryResult, ResultColumn};
/// use keyscout_core::teradata::TeradataKeyFinder;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> keyscout_core::Result<()> {
/// let conn = ReplayConnection::new(
///     ReplayScript::new()
///         .primary_key(None, "ORDERS", &["ORDER_ID"])
///         .respond(
///             "SELECT * FROM \"ORDERS\" WHERE 1=2",
///             QueryResult::new(vec![
///                 ResultColumn::new("ORDER_ID").with_type("INTEGER").auto_increment(),
///             ]),
///         ),
/// );
///
/// let key = TeradataKeyFinder::new().discover(&conn, None, "ORDERS").await?;
/// assert_eq!(key.unwrap().column_names(), vec!["ORDER_ID"]);
/// # Ok(())
/// # }
/// ```
pub struct TeradataKeyFinder {
    config: DiscoveryConfig,
    strategies: Vec<Box<dyn KeyStrategy>>,
}

impl std::fmt::Debug for TeradataKeyFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeradataKeyFinder")
            .field("catalog", &self.config.catalog)
            .field("strategies", &self.strategy_kinds())
            .finish()
    }
}

impl Default for TeradataKeyFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl TeradataKeyFinder {
    /// Creates a finder running the full chain against the legacy
    /// dictionary views.
    pub fn new() -> Self {
        Self::build(DiscoveryConfig::default())
    }

    /// Creates a finder from a configuration.
    ///
    /// # Errors
    /// Returns error if the configuration fails validation
    pub fn with_config(config: DiscoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: DiscoveryConfig) -> Self {
        let queries = CatalogQueries::new(config.catalog);
        let strategies = config
            .enabled_strategies()
            .into_iter()
            .map(|kind| strategies::build_strategy(kind, queries))
            .collect();
        Self { config, strategies }
    }

    /// Configuration the finder was built from
    pub const fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Strategies this finder runs, in the order it runs them.
    pub fn strategy_kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Discovers the key of `table`, optionally qualified by `schema`.
    ///
    /// # Returns
    /// `Ok(None)` when no strategy finds a key.
    ///
    /// # Errors
    /// Only fatal connection errors; every other failure is absorbed by the
    /// strategy that hit it.
    pub async fn discover(
        &self,
        conn: &dyn CatalogConnection,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Option<PrimaryKey>> {
        let target = TableRef::new(schema, table);
        let start_time = std::time::Instant::now();
        tracing::debug!("Starting primary key discovery for {}", target);

        for strategy in &self.strategies {
            let kind = strategy.kind();
            match strategy.find_columns(conn, &target).await {
                Ok(columns) => {
                    if let Some(key) = PrimaryKey::new(table, columns) {
                        tracing::info!(
                            "Discovered key ({}) for {} via {} in {:.2}s",
                            key.column_names().join(", "),
                            target,
                            kind,
                            start_time.elapsed().as_secs_f64()
                        );
                        return Ok(Some(key));
                    }
                    tracing::debug!("Strategy {} found no key columns for {}", kind, target);
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!(
                        "Primary key discovery for {} aborted during {}: {}",
                        target,
                        kind,
                        e
                    );
                    return Err(e);
                }
                Err(e) => {
                    tracing::debug!("Strategy {} failed for {}: {}", kind, target, e);
                }
            }
        }

        tracing::info!(
            "No primary key discovered for {} after {} strategies",
            target,
            self.strategies.len()
        );
        Ok(None)
    }
}

#[async_trait]
impl PrimaryKeyFinder for TeradataKeyFinder {
    async fn primary_key(
        &self,
        conn: &dyn CatalogConnection,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Option<PrimaryKey>> {
        self.discover(conn, schema, table).await
    }
}

/// Discovers a key with the default configuration.
pub async fn discover_primary_key(
    conn: &dyn CatalogConnection,
    schema: Option<&str>,
    table: &str,
) -> Result<Option<PrimaryKey>> {
    TeradataKeyFinder::new().discover(conn, schema, table).await
}
