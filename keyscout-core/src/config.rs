//! Discovery configuration.
//!
//! The defaults reproduce the full four-step chain against the legacy
//! dictionary views. Configuration can narrow the chain but never reorder
//! it.

use crate::error::KeyScoutError;
use crate::finder::StrategyKind;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which family of Teradata dictionary views to query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogNaming {
    /// `DBC.Tables`, `DBC.Columns`, `DBC.Indices`
    #[default]
    Legacy,
    /// `DBC.TablesV`, `DBC.ColumnsV`, `DBC.IndicesV` (Unicode-capable)
    Unicode,
}

impl CatalogNaming {
    /// Table dictionary view (`RequestText`, `TableKind`)
    pub const fn tables(self) -> &'static str {
        match self {
            Self::Legacy => "DBC.Tables",
            Self::Unicode => "DBC.TablesV",
        }
    }

    /// Column dictionary view (`IdColType`)
    pub const fn columns(self) -> &'static str {
        match self {
            Self::Legacy => "DBC.Columns",
            Self::Unicode => "DBC.ColumnsV",
        }
    }

    /// Index dictionary view (`UniqueFlag`, `ColumnPosition`)
    pub const fn indices(self) -> &'static str {
        match self {
            Self::Legacy => "DBC.Indices",
            Self::Unicode => "DBC.IndicesV",
        }
    }
}

/// Configuration for a key finder.
///
/// # Example
/// ```rust
/// use keyscout_core::config::{CatalogNaming, DiscoveryConfig};
/// use keyscout_core::finder::StrategyKind;
///
/// let config = DiscoveryConfig::default()
///     .with_catalog(CatalogNaming::Unicode)
///     .with_strategies(vec![StrategyKind::ViewBacked, StrategyKind::NativeMetadata]);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(
///     config.enabled_strategies(),
///     vec![StrategyKind::NativeMetadata, StrategyKind::ViewBacked]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Dictionary view family
    pub catalog: CatalogNaming,
    /// Strategies allowed to run. Listing order is ignored.
    pub strategies: Vec<StrategyKind>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogNaming::Legacy,
            strategies: StrategyKind::PRIORITY.to_vec(),
        }
    }
}

impl DiscoveryConfig {
    /// Sets the dictionary view family.
    #[must_use]
    pub const fn with_catalog(mut self, catalog: CatalogNaming) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the enabled strategies.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<StrategyKind>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Enabled strategies in priority order, without duplicates.
    pub fn enabled_strategies(&self) -> Vec<StrategyKind> {
        StrategyKind::PRIORITY
            .into_iter()
            .filter(|kind| self.strategies.contains(kind))
            .collect()
    }

    /// Validates configuration parameters.
    ///
    /// # Errors
    /// Returns error if no strategy is enabled
    pub fn validate(&self) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(KeyScoutError::configuration(
                "at least one discovery strategy must be enabled",
            ));
        }
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file. Missing fields
    /// take their default values.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| KeyScoutError::Io {
                context: format!("Failed to read configuration {}", path.display()),
                source,
            })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| KeyScoutError::Serialization {
                context: format!("Failed to parse configuration {}", path.display()),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_enables_full_chain() {
        let config = DiscoveryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enabled_strategies(), StrategyKind::PRIORITY.to_vec());
        assert_eq!(config.catalog, CatalogNaming::Legacy);
    }

    #[test]
    fn test_empty_strategy_list_is_rejected() {
        let config = DiscoveryConfig::default().with_strategies(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enabled_strategies_are_ordered_and_deduplicated() {
        let config = DiscoveryConfig::default().with_strategies(vec![
            StrategyKind::GeneratedColumn,
            StrategyKind::UniqueIndex,
            StrategyKind::GeneratedColumn,
        ]);
        assert_eq!(
            config.enabled_strategies(),
            vec![StrategyKind::UniqueIndex, StrategyKind::GeneratedColumn]
        );
    }

    #[test]
    fn test_catalog_view_names() {
        assert_eq!(CatalogNaming::Legacy.indices(), "DBC.Indices");
        assert_eq!(CatalogNaming::Unicode.tables(), "DBC.TablesV");
        assert_eq!(CatalogNaming::Unicode.columns(), "DBC.ColumnsV");
    }

    #[tokio::test]
    async fn test_from_path_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "catalog": "unicode" }}"#).unwrap();

        let config = DiscoveryConfig::from_path(file.path()).await.unwrap();
        assert_eq!(config.catalog, CatalogNaming::Unicode);
        assert_eq!(config.strategies.len(), 4);
    }

    #[tokio::test]
    async fn test_from_path_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "strategies": [] }}"#).unwrap();

        let err = DiscoveryConfig::from_path(file.path()).await.unwrap_err();
        assert!(matches!(err, KeyScoutError::Configuration { .. }));
    }
}
