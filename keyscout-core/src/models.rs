//! Core data models for primary-key discovery.
//!
//! This module defines the key types returned to callers and the result-set
//! shapes consumed from a [`CatalogConnection`](crate::connection::CatalogConnection).
//! Every value here is built fresh per discovery call; nothing is cached.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A table (or view) addressed by discovery, optionally schema-qualified.
///
/// In Teradata the schema is the owning database (`DatabaseName`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    /// Owning database, if qualified
    pub schema: Option<String>,
    /// Table or view name
    pub table: String,
}

impl TableRef {
    /// Creates a reference to `table`, qualified by `schema` when given.
    pub fn new(schema: Option<&str>, table: &str) -> Self {
        Self {
            schema: schema.map(str::to_string),
            table: table.to_string(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "'{}'.'{}'", schema, self.table),
            None => write!(f, "'{}'", self.table),
        }
    }
}

/// 1-based column position inside a probed result set.
///
/// Ordinals are resolved per query and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnOrdinal(u32);

impl ColumnOrdinal {
    /// Returns `None` for zero, which is not a valid position.
    pub const fn new(position: u32) -> Option<Self> {
        if position == 0 { None } else { Some(Self(position)) }
    }

    /// The 1-based position
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based index into a column list
    pub(crate) fn index(self) -> usize {
        usize::try_from(self.0.saturating_sub(1)).unwrap_or(usize::MAX)
    }

    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(Self::new)
    }
}

impl fmt::Display for ColumnOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Semantic value type of a key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnifiedDataType {
    /// Character types with optional length
    String { max_length: Option<u32> },
    /// Integer types with bit width
    Integer { bits: u8, signed: bool },
    /// Exact numerics
    Decimal {
        precision: Option<u8>,
        scale: Option<u8>,
    },
    /// Approximate numerics
    Float { precision: Option<u8> },
    /// `BOOLEAN`
    Boolean,
    /// `TIMESTAMP`, optionally `WITH TIME ZONE`
    DateTime { with_timezone: bool },
    /// `DATE`
    Date,
    /// `TIME`, optionally `WITH TIME ZONE`
    Time { with_timezone: bool },
    /// `INTERVAL <qualifier>`
    Interval { qualifier: String },
    /// `PERIOD(<element>)`
    Period { element: String },
    /// Byte strings with optional length
    Binary { max_length: Option<u32> },
    /// `JSON`
    Json,
    /// `XML`
    Xml,
    /// Recognized dialect-specific type without a closer mapping
    Custom { type_name: String },
    /// The type name could not be resolved
    Unknown,
}

impl UnifiedDataType {
    /// Returns true for the opaque fallback type.
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// One column of a discovered key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "generation", rename_all = "snake_case")]
pub enum PrimaryKeyColumn {
    /// Values are assigned by the database (identity, sequence,
    /// generated always/by default)
    AutoGenerated {
        name: String,
        data_type: UnifiedDataType,
    },
    /// Values are supplied by the writer and must be provided on insert
    NonIncrementing {
        name: String,
        data_type: UnifiedDataType,
    },
}

impl PrimaryKeyColumn {
    /// Builds the variant matching the live auto-increment flag.
    pub fn classify(name: impl Into<String>, data_type: UnifiedDataType, generated: bool) -> Self {
        let name = name.into();
        if generated {
            Self::AutoGenerated { name, data_type }
        } else {
            Self::NonIncrementing { name, data_type }
        }
    }

    /// Column name as reported by the catalog, trimmed
    pub fn name(&self) -> &str {
        match self {
            Self::AutoGenerated { name, .. } | Self::NonIncrementing { name, .. } => name,
        }
    }

    /// Semantic type of the column's values
    pub fn data_type(&self) -> &UnifiedDataType {
        match self {
            Self::AutoGenerated { data_type, .. } | Self::NonIncrementing { data_type, .. } => {
                data_type
            }
        }
    }

    /// Whether the database assigns this column's values
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::AutoGenerated { .. })
    }
}

/// The columns that identify rows of a table.
///
/// Never empty: "no key" is expressed as `Option::None` by the finder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PrimaryKeyRepr")]
pub struct PrimaryKey {
    table: String,
    columns: Vec<PrimaryKeyColumn>,
}

#[derive(Deserialize)]
struct PrimaryKeyRepr {
    table: String,
    columns: Vec<PrimaryKeyColumn>,
}

impl TryFrom<PrimaryKeyRepr> for PrimaryKey {
    type Error = String;

    fn try_from(repr: PrimaryKeyRepr) -> std::result::Result<Self, Self::Error> {
        let table = repr.table.clone();
        Self::new(repr.table, repr.columns)
            .ok_or_else(|| format!("primary key for '{}' has no columns", table))
    }
}

impl PrimaryKey {
    /// Builds a key from columns in reported order.
    ///
    /// Columns whose name repeats an earlier one (ignoring ASCII case) are
    /// dropped. Returns `None` when no columns remain.
    pub fn new(table: impl Into<String>, columns: Vec<PrimaryKeyColumn>) -> Option<Self> {
        let mut unique: Vec<PrimaryKeyColumn> = Vec::with_capacity(columns.len());
        for column in columns {
            if !unique
                .iter()
                .any(|c| c.name().eq_ignore_ascii_case(column.name()))
            {
                unique.push(column);
            }
        }

        if unique.is_empty() {
            return None;
        }
        Some(Self {
            table: table.into(),
            columns: unique,
        })
    }

    /// Name of the table the key belongs to
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Key columns in key order; never empty
    pub fn columns(&self) -> &[PrimaryKeyColumn] {
        &self.columns
    }

    /// Column names in key order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(PrimaryKeyColumn::name).collect()
    }

    /// True when any key column is database-assigned
    pub fn has_generated_column(&self) -> bool {
        self.columns.iter().any(PrimaryKeyColumn::is_generated)
    }
}

/// Metadata for one column of an executed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultColumn {
    /// Column label as reported by the driver
    pub label: String,
    /// Database-reported type name, if the driver supplied one
    #[serde(default)]
    pub type_name: Option<String>,
    /// Whether the driver flags the column as auto-increment
    #[serde(default)]
    pub auto_increment: bool,
}

impl ResultColumn {
    /// Creates an untyped, non-generated column.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            type_name: None,
            auto_increment: false,
        }
    }

    /// Sets the reported type name.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Flags the column as auto-increment.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// A fully materialized result set.
///
/// Rows hold dynamic values; catalog columns are usually strings, but
/// numeric columns such as `ColumnPosition` may arrive as numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Result metadata, one entry per column in select order
    pub columns: Vec<ResultColumn>,
    /// Row values, positionally matching `columns`
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    /// Creates an empty result with the given columns.
    pub const fn new(columns: Vec<ResultColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row; values are matched to columns by position.
    #[must_use]
    pub fn with_row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// Number of result columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the result has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Zero-based index of the column labelled `label`, ignoring ASCII case
    /// and surrounding blanks.
    pub fn find_column(&self, label: &str) -> Option<usize> {
        let wanted = label.trim();
        self.columns
            .iter()
            .position(|c| c.label.trim().eq_ignore_ascii_case(wanted))
    }

    /// Iterates rows with label-based access.
    pub fn rows(&self) -> impl Iterator<Item = CatalogRow<'_>> {
        self.rows.iter().map(move |values| CatalogRow {
            result: self,
            values,
        })
    }
}

/// Borrowed view of one row with lookup by column label.
#[derive(Debug, Clone, Copy)]
pub struct CatalogRow<'a> {
    result: &'a QueryResult,
    values: &'a [serde_json::Value],
}

impl<'a> CatalogRow<'a> {
    /// Value of the column labelled `label`; `None` when the column is not
    /// part of the result or the row is short.
    pub fn get(&self, label: &str) -> Option<&'a serde_json::Value> {
        self.result
            .find_column(label)
            .and_then(|index| self.values.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn integer() -> UnifiedDataType {
        UnifiedDataType::Integer {
            bits: 32,
            signed: true,
        }
    }

    #[test]
    fn test_empty_primary_key_is_unrepresentable() {
        assert!(PrimaryKey::new("ORDERS", Vec::new()).is_none());
    }

    #[test]
    fn test_primary_key_drops_duplicate_names() {
        let key = PrimaryKey::new(
            "LINE_ITEMS",
            vec![
                PrimaryKeyColumn::classify("ORDER_ID", integer(), false),
                PrimaryKeyColumn::classify("order_id", integer(), true),
                PrimaryKeyColumn::classify("LINE_NO", integer(), false),
            ],
        )
        .unwrap();

        assert_eq!(key.table(), "LINE_ITEMS");
        assert_eq!(key.column_names(), vec!["ORDER_ID", "LINE_NO"]);
        assert!(!key.has_generated_column());
    }

    #[test]
    fn test_classify_follows_generated_flag() {
        let generated = PrimaryKeyColumn::classify("ORDER_ID", integer(), true);
        assert!(generated.is_generated());
        assert!(matches!(generated, PrimaryKeyColumn::AutoGenerated { .. }));

        let supplied = PrimaryKeyColumn::classify("SKU", UnifiedDataType::Unknown, false);
        assert!(!supplied.is_generated());
        assert!(supplied.data_type().is_unknown());
    }

    #[test]
    fn test_primary_key_serde() {
        let key = PrimaryKey::new(
            "ORDERS",
            vec![PrimaryKeyColumn::classify("ORDER_ID", integer(), true)],
        )
        .unwrap();

        let value = serde_json::to_value(&key).unwrap();
        assert_eq!(value["table"], "ORDERS");
        assert_eq!(value["columns"][0]["generation"], "auto_generated");
        assert_eq!(value["columns"][0]["name"], "ORDER_ID");

        let back: PrimaryKey = serde_json::from_value(value).unwrap();
        assert_eq!(back, key);

        let empty = json!({ "table": "T", "columns": [] });
        assert!(serde_json::from_value::<PrimaryKey>(empty).is_err());
    }

    #[test]
    fn test_table_ref_display() {
        assert_eq!(TableRef::new(Some("SALES"), "ORDERS").to_string(), "'SALES'.'ORDERS'");
        assert_eq!(TableRef::new(None, "ORDERS").to_string(), "'ORDERS'");
    }

    #[test]
    fn test_column_ordinal_is_one_based() {
        assert!(ColumnOrdinal::new(0).is_none());
        let ordinal = ColumnOrdinal::new(3).unwrap();
        assert_eq!(ordinal.get(), 3);
        assert_eq!(ordinal.index(), 2);
        assert_eq!(ColumnOrdinal::from_index(0), ColumnOrdinal::new(1));
    }

    #[test]
    fn test_catalog_row_lookup_ignores_case_and_padding() {
        let result = QueryResult::new(vec![
            ResultColumn::new("ColumnName"),
            ResultColumn::new("ColumnPosition "),
        ])
        .with_row([json!("ORDER_ID  "), json!(1)]);

        let row = result.rows().next().unwrap();
        assert_eq!(row.get("COLUMNNAME"), Some(&json!("ORDER_ID  ")));
        assert_eq!(row.get("columnposition"), Some(&json!(1)));
        assert!(row.get("IndexNumber").is_none());
    }
}
