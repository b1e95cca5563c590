//! Helper utilities for reading catalog rows.
//!
//! Teradata's dictionary tables store names in fixed-width `CHAR` columns,
//! so every text value is trimmed before use.

use crate::error::{FieldError, KeyScoutError};
use crate::models::CatalogRow;
use crate::Result;
use serde_json::Value;

/// Extension trait for extracting typed catalog values from a row with
/// consistent error handling.
///
/// # Example
/// ```rust
/// use keyscout_core::connection::RowExt;
/// use keyscout_core::models::{QueryResult, ResultColumn};
///
/// let result = QueryResult::new(vec![ResultColumn::new("ColumnName")])
///     .with_row(["ORDER_ID   "]);
/// let row = result.rows().next().unwrap();
/// assert_eq!(row.get_text("ColumnName", Some("ORDERS")).unwrap(), "ORDER_ID");
/// ```
pub trait RowExt {
    /// Extracts a required, non-blank text field, trimmed.
    fn get_text(&self, field_name: &str, table_context: Option<&str>) -> Result<String>;

    /// Extracts an optional text field, trimmed; blank and null read as
    /// `None`.
    fn get_optional_text(&self, field_name: &str, table_context: Option<&str>)
    -> Result<Option<String>>;

    /// Extracts a required positive integer. Numeric values and numeric
    /// text (with padding) are both accepted.
    fn get_position(&self, field_name: &str, table_context: Option<&str>) -> Result<u32>;

    /// Like [`RowExt::get_position`] but absent or null reads as `None`.
    fn get_optional_position(
        &self,
        field_name: &str,
        table_context: Option<&str>,
    ) -> Result<Option<u32>>;
}

impl RowExt for CatalogRow<'_> {
    fn get_text(&self, field_name: &str, table_context: Option<&str>) -> Result<String> {
        self.get_optional_text(field_name, table_context)?
            .ok_or_else(|| {
                KeyScoutError::parse_field(
                    field_name,
                    table_context,
                    FieldError("value is missing or blank".to_string()),
                )
            })
    }

    fn get_optional_text(
        &self,
        field_name: &str,
        table_context: Option<&str>,
    ) -> Result<Option<String>> {
        match self.get(field_name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(KeyScoutError::parse_field(
                field_name,
                table_context,
                FieldError(format!("expected text, found {}", other)),
            )),
        }
    }

    fn get_position(&self, field_name: &str, table_context: Option<&str>) -> Result<u32> {
        self.get_optional_position(field_name, table_context)?
            .ok_or_else(|| {
                KeyScoutError::parse_field(
                    field_name,
                    table_context,
                    FieldError("value is missing".to_string()),
                )
            })
    }

    fn get_optional_position(
        &self,
        field_name: &str,
        table_context: Option<&str>,
    ) -> Result<Option<u32>> {
        let invalid = |detail: String| {
            KeyScoutError::parse_field(field_name, table_context, FieldError(detail))
        };

        let position = match self.get(field_name) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| invalid(format!("'{}' is not a valid position", n)))?,
            Some(Value::String(s)) => s
                .trim()
                .parse::<u32>()
                .map_err(|e| KeyScoutError::parse_field(field_name, table_context, e))?,
            Some(other) => return Err(invalid(format!("expected a number, found {}", other))),
        };

        if position == 0 {
            return Err(invalid("positions are 1-based".to_string()));
        }
        Ok(Some(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QueryResult, ResultColumn};
    use serde_json::json;

    fn single(label: &str, value: Value) -> QueryResult {
        QueryResult::new(vec![ResultColumn::new(label)]).with_row([value])
    }

    #[test]
    fn test_get_text_trims_char_padding() {
        let result = single("ColumnName", json!("LINE_NO     "));
        let row = result.rows().next().unwrap();
        assert_eq!(row.get_text("ColumnName", None).unwrap(), "LINE_NO");
    }

    #[test]
    fn test_get_text_rejects_blank_and_null() {
        let result = single("ColumnName", json!("   "));
        let row = result.rows().next().unwrap();
        assert!(row.get_text("ColumnName", Some("T")).is_err());
        assert_eq!(row.get_optional_text("ColumnName", None).unwrap(), None);

        let result = single("ColumnName", Value::Null);
        let row = result.rows().next().unwrap();
        assert!(row.get_text("ColumnName", None).is_err());
    }

    #[test]
    fn test_get_position_accepts_numbers_and_padded_text() {
        let result = single("ColumnPosition", json!(2));
        let row = result.rows().next().unwrap();
        assert_eq!(row.get_position("ColumnPosition", None).unwrap(), 2);

        let result = single("ColumnPosition", json!("  7 "));
        let row = result.rows().next().unwrap();
        assert_eq!(row.get_position("ColumnPosition", None).unwrap(), 7);
    }

    #[test]
    fn test_get_position_rejects_garbage() {
        for bad in [json!("two"), json!(0), json!(-1), json!(1.5), json!(true)] {
            let result = single("ColumnPosition", bad.clone());
            let row = result.rows().next().unwrap();
            assert!(
                row.get_position("ColumnPosition", Some("LINE_ITEMS")).is_err(),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_missing_optional_position() {
        let result = single("ColumnName", json!("A"));
        let row = result.rows().next().unwrap();
        assert_eq!(row.get_optional_position("IndexNumber", None).unwrap(), None);
        assert!(row.get_position("IndexNumber", None).is_err());
    }
}
