//! Extraction of the defining query from a stored view definition.
//!
//! Teradata keeps the full DDL of a view in `DBC.Tables.RequestText`, e.g.
//! `REPLACE VIEW SALES.ORDERS_V (ID, TOTAL) AS LOCKING ROW FOR ACCESS SEL ...`.
//! The query is recovered by splitting on the first `AS` keyword and then
//! skipping to the first `SELECT` (or its `SEL` abbreviation).
//!
//! This is a heuristic, not a parser. Known failure modes:
//! - an `AS` or `SEL`/`SELECT` word inside a quoted identifier, a string
//!   literal or a comment before the real keyword produces a wrong split;
//! - definitions that are not shaped `<name clause> AS <query>` (for
//!   example a leading comment block containing `as`) are rejected or
//!   mis-split.
//!
//! Callers must treat a failed or wrong split as "no key", never as an
//! error worth surfacing.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a definition could not be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewSqlError {
    /// The definition is blank
    #[error("view definition is empty")]
    Empty,
    /// No `AS` keyword was found
    #[error("no AS keyword separating the view name from its query")]
    MissingAs,
    /// No select keyword follows `AS`
    #[error("no SELECT or SEL keyword after AS")]
    MissingSelect,
}

/// Pre-compiled keyword patterns.
///
/// Uses `OnceLock` for thread-safe lazy initialization.
struct ViewSqlPatterns {
    as_keyword: Regex,
    select_keyword: Regex,
}

impl ViewSqlPatterns {
    fn instance() -> &'static Self {
        static PATTERNS: OnceLock<ViewSqlPatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::compile)
    }

    fn compile() -> Self {
        Self {
            as_keyword: Regex::new(r"(?i)\bAS\b").expect("Invalid AS pattern"),
            select_keyword: Regex::new(r"(?i)\bSEL(?:ECT)?\b").expect("Invalid SELECT pattern"),
        }
    }
}

/// Splits a definition at its first `AS` keyword into the name clause and
/// the body that follows the keyword.
///
/// # Example
/// ```rust
/// use keyscout_core::teradata::view_sql::split_view_definition;
///
/// let (name, body) = split_view_definition("CREATE VIEW v AS SELECT 1").unwrap();
/// assert_eq!(name, "CREATE VIEW v ");
/// assert_eq!(body, " SELECT 1");
/// ```
pub fn split_view_definition(definition: &str) -> Result<(&str, &str), ViewSqlError> {
    if definition.trim().is_empty() {
        return Err(ViewSqlError::Empty);
    }
    let keyword = ViewSqlPatterns::instance()
        .as_keyword
        .find(definition)
        .ok_or(ViewSqlError::MissingAs)?;
    Ok((&definition[..keyword.start()], &definition[keyword.end()..]))
}

/// Returns the query a view definition selects from.
///
/// Trailing semicolons are removed, as is a closing parenthesis left over
/// from a parenthesized body (`AS (SELECT ...)`).
///
/// # Example
/// ```rust
/// use keyscout_core::teradata::view_sql::extract_view_select;
///
/// let select = extract_view_select(
///     "REPLACE VIEW SALES.ORDERS_V AS LOCKING ROW FOR ACCESS SEL ORDER_ID FROM SALES.ORDERS;",
/// )
/// .unwrap();
/// assert_eq!(select, "SEL ORDER_ID FROM SALES.ORDERS");
/// ```
pub fn extract_view_select(definition: &str) -> Result<&str, ViewSqlError> {
    let (_, body) = split_view_definition(definition)?;
    let marker = ViewSqlPatterns::instance()
        .select_keyword
        .find(body)
        .ok_or(ViewSqlError::MissingSelect)?;

    let mut select = body[marker.start()..].trim_end();
    loop {
        let before = select.len();
        select = select.trim_end_matches(';').trim_end();
        if select.ends_with(')') && unbalanced_closing(select) {
            select = select[..select.len().saturating_sub(1)].trim_end();
        }
        if select.len() == before {
            break;
        }
    }
    Ok(select)
}

fn unbalanced_closing(sql: &str) -> bool {
    let opens = sql.matches('(').count();
    let closes = sql.matches(')').count();
    closes > opens
}
