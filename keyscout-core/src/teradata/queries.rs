//! SQL text for the Teradata data dictionary.
//!
//! Names supplied by the caller are embedded as escaped literals (catalog
//! predicates) or quoted identifiers (the table probe), never spliced raw.

use crate::config::CatalogNaming;
use crate::models::TableRef;

/// `IdColType` value for `GENERATED ALWAYS AS IDENTITY`
pub const IDENTITY_GENERATED_ALWAYS: &str = "GA";
/// `IdColType` value for `GENERATED BY DEFAULT AS IDENTITY`
pub const IDENTITY_GENERATED_BY_DEFAULT: &str = "GD";
/// `TableKind` value for views
pub const TABLE_KIND_VIEW: &str = "V";

/// Column name label in `DBC.Indices` and `DBC.Columns`
pub const COLUMN_NAME: &str = "ColumnName";
/// Position of a column within its index (not within the table)
pub const COLUMN_POSITION: &str = "ColumnPosition";
/// Index identifier label in `DBC.Indices`
pub const INDEX_NUMBER: &str = "IndexNumber";
/// Stored DDL label in `DBC.Tables`
pub const REQUEST_TEXT: &str = "RequestText";

/// Builds the dictionary queries for one catalog naming scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogQueries {
    catalog: CatalogNaming,
}

impl CatalogQueries {
    /// Creates a builder for the given dictionary views.
    pub const fn new(catalog: CatalogNaming) -> Self {
        Self { catalog }
    }

    /// Dictionary view family in use
    pub const fn catalog(&self) -> CatalogNaming {
        self.catalog
    }

    /// Columns of every unique index on the target, with their positions.
    ///
    /// # Example
    /// ```rust
    /// use keyscout_core::config::CatalogNaming;
    /// use keyscout_core::models::TableRef;
    /// use keyscout_core::teradata::queries::CatalogQueries;
    ///
    /// let sql = CatalogQueries::new(CatalogNaming::Legacy)
    ///     .unique_index_columns(&TableRef::new(Some("SALES"), "LINE_ITEMS"));
    /// assert_eq!(
    ///     sql,
    ///     "SELECT IndexNumber, ColumnName, ColumnPosition FROM DBC.Indices \
    ///      WHERE DatabaseName = 'SALES' AND TableName = 'LINE_ITEMS' AND UniqueFlag = 'Y'"
    /// );
    /// ```
    pub fn unique_index_columns(&self, target: &TableRef) -> String {
        format!(
            "SELECT {}, {}, {} FROM {} WHERE {} AND UniqueFlag = 'Y'",
            INDEX_NUMBER,
            COLUMN_NAME,
            COLUMN_POSITION,
            self.catalog.indices(),
            target_predicate(target)
        )
    }

    /// Identity columns of the target, either identity flavour.
    pub fn generated_columns(&self, target: &TableRef) -> String {
        format!(
            "SELECT DISTINCT {} FROM {} WHERE {} AND IdColType IN ({}, {})",
            COLUMN_NAME,
            self.catalog.columns(),
            target_predicate(target),
            quote_literal(IDENTITY_GENERATED_ALWAYS),
            quote_literal(IDENTITY_GENERATED_BY_DEFAULT)
        )
    }

    /// Stored definition of the target, only if it is a view.
    pub fn view_definition(&self, target: &TableRef) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} AND TableKind = {}",
            REQUEST_TEXT,
            self.catalog.tables(),
            target_predicate(target),
            quote_literal(TABLE_KIND_VIEW)
        )
    }

    /// Zero-row selection whose result metadata describes every column.
    pub fn table_probe(&self, target: &TableRef) -> String {
        format!("SELECT * FROM {} WHERE 1=2", qualified_name(target))
    }
}

/// `DatabaseName = '...' AND TableName = '...'`, omitting the database
/// predicate when no schema is given.
fn target_predicate(target: &TableRef) -> String {
    match &target.schema {
        Some(schema) => format!(
            "DatabaseName = {} AND TableName = {}",
            quote_literal(schema),
            quote_literal(&target.table)
        ),
        None => format!("TableName = {}", quote_literal(&target.table)),
    }
}

/// `"schema"."table"` or `"table"`
pub fn qualified_name(target: &TableRef) -> String {
    match &target.schema {
        Some(schema) => format!(
            "{}.{}",
            quote_identifier(schema),
            quote_identifier(&target.table)
        ),
        None => quote_identifier(&target.table),
    }
}

/// Quotes a string literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quotes an identifier, doubling embedded double quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy() -> CatalogQueries {
        CatalogQueries::new(CatalogNaming::Legacy)
    }

    #[test]
    fn test_schema_predicate_is_optional() {
        let sql = legacy().view_definition(&TableRef::new(None, "ORDERS_V"));
        assert_eq!(
            sql,
            "SELECT RequestText FROM DBC.Tables WHERE TableName = 'ORDERS_V' AND TableKind = 'V'"
        );
        assert!(!sql.contains("DatabaseName"));
    }

    #[test]
    fn test_generated_columns_query() {
        let sql = legacy().generated_columns(&TableRef::new(Some("SALES"), "ORDERS"));
        assert_eq!(
            sql,
            "SELECT DISTINCT ColumnName FROM DBC.Columns WHERE DatabaseName = 'SALES' \
             AND TableName = 'ORDERS' AND IdColType IN ('GA', 'GD')"
        );
    }

    #[test]
    fn test_unicode_catalog_views() {
        let queries = CatalogQueries::new(CatalogNaming::Unicode);
        let target = TableRef::new(None, "T");
        assert!(queries.unique_index_columns(&target).contains("FROM DBC.IndicesV "));
        assert!(queries.generated_columns(&target).contains("FROM DBC.ColumnsV "));
        assert!(queries.view_definition(&target).contains("FROM DBC.TablesV "));
    }

    #[test]
    fn test_table_probe_quotes_identifiers() {
        assert_eq!(
            legacy().table_probe(&TableRef::new(Some("SALES"), "ORDERS")),
            "SELECT * FROM \"SALES\".\"ORDERS\" WHERE 1=2"
        );
        assert_eq!(
            legacy().table_probe(&TableRef::new(None, "odd\"name")),
            "SELECT * FROM \"odd\"\"name\" WHERE 1=2"
        );
    }

    #[test]
    fn test_literals_cannot_break_out() {
        let sql = legacy().view_definition(&TableRef::new(Some("x' OR '1'='1"), "T"));
        assert!(sql.contains("DatabaseName = 'x'' OR ''1''=''1'"));
    }
}
