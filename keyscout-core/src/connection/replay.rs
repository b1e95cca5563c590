//! Offline connection that answers from a recorded catalog session.
//!
//! A [`ReplayScript`] lists the replies a Teradata session gave to the
//! primary-key catalog call and to individual SQL statements. Replaying it
//! lets discovery run without network access, which is how the `keyscout`
//! binary analyzes captured sessions and how the test-suite drives every
//! strategy.
//!
//! # Matching
//! Statements are matched on their text after collapsing whitespace,
//! ignoring ASCII case. The first matching entry wins. A statement with no
//! entry fails like a server-side error would; a primary-key lookup with no
//! entry reports "no declared key".

use super::CatalogConnection;
use crate::error::KeyScoutError;
use crate::models::{QueryResult, ResultColumn, TableRef};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Label of the column carrying names in a primary-key catalog reply.
pub const PRIMARY_KEY_COLUMN_LABEL: &str = "COLUMN_NAME";

/// Recorded outcome of one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Reply {
    /// The call succeeded with this result set
    Rows(QueryResult),
    /// The statement failed on the server
    Error { message: String },
    /// The session died while serving the call
    ConnectionLost { message: String },
}

/// Reply to the driver's primary-key catalog call for one table.
///
/// A `rows` reply lists key column names under `COLUMN_NAME`, one row per
/// column in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyReply {
    /// Owning database, or `None` for unqualified lookups
    #[serde(default)]
    pub schema: Option<String>,
    /// Table name, matched ignoring ASCII case
    pub table: String,
    /// Recorded outcome
    pub reply: Reply,
}

/// Reply to one SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryReply {
    /// Statement text, matched after whitespace normalization
    pub sql: String,
    /// Recorded outcome
    pub reply: Reply,
}

/// A recorded catalog session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Replies to primary-key catalog calls
    #[serde(default)]
    pub primary_keys: Vec<PrimaryKeyReply>,
    /// Replies to SQL statements
    #[serde(default)]
    pub queries: Vec<QueryReply>,
}

impl ReplayScript {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a script from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| KeyScoutError::Serialization {
            context: "Failed to parse replay script".to_string(),
            source,
        })
    }

    /// Loads a script from a JSON file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| KeyScoutError::Io {
                context: format!("Failed to read replay script {}", path.display()),
                source,
            })?;
        Self::from_json(&text)
    }

    /// Records the declared key columns of a table, in catalog order.
    #[must_use]
    pub fn primary_key(mut self, schema: Option<&str>, table: &str, columns: &[&str]) -> Self {
        let result = columns.iter().fold(
            QueryResult::new(vec![ResultColumn::new(PRIMARY_KEY_COLUMN_LABEL)]),
            |result, name| result.with_row([*name]),
        );
        self.primary_keys.push(PrimaryKeyReply {
            schema: schema.map(str::to_string),
            table: table.to_string(),
            reply: Reply::Rows(result),
        });
        self
    }

    /// Records an arbitrary reply to the primary-key catalog call.
    #[must_use]
    pub fn primary_key_reply(mut self, schema: Option<&str>, table: &str, reply: Reply) -> Self {
        self.primary_keys.push(PrimaryKeyReply {
            schema: schema.map(str::to_string),
            table: table.to_string(),
            reply,
        });
        self
    }

    /// Records a successful result for `sql`.
    #[must_use]
    pub fn respond(self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.reply(sql, Reply::Rows(result))
    }

    /// Records a server-side failure for `sql`.
    #[must_use]
    pub fn fail(self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.reply(
            sql,
            Reply::Error {
                message: message.into(),
            },
        )
    }

    /// Records a lost session while `sql` was being served.
    #[must_use]
    pub fn lose_connection(self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.reply(
            sql,
            Reply::ConnectionLost {
                message: message.into(),
            },
        )
    }

    /// Records any reply for `sql`.
    #[must_use]
    pub fn reply(mut self, sql: impl Into<String>, reply: Reply) -> Self {
        self.queries.push(QueryReply {
            sql: sql.into(),
            reply,
        });
        self
    }

    fn find_query(&self, sql: &str) -> Option<&Reply> {
        let wanted = normalize_sql(sql);
        self.queries
            .iter()
            .find(|q| normalize_sql(&q.sql).eq_ignore_ascii_case(&wanted))
            .map(|q| &q.reply)
    }

    fn find_primary_key(&self, schema: Option<&str>, table: &str) -> Option<&Reply> {
        self.primary_keys
            .iter()
            .find(|pk| {
                let schema_matches = match (pk.schema.as_deref(), schema) {
                    (Some(recorded), Some(asked)) => recorded.eq_ignore_ascii_case(asked),
                    (None, None) => true,
                    _ => false,
                };
                schema_matches && pk.table.eq_ignore_ascii_case(table)
            })
            .map(|pk| &pk.reply)
    }
}

/// One call observed by a [`ReplayConnection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayCall {
    /// A primary-key catalog lookup
    PrimaryKeys(TableRef),
    /// A SQL statement, as sent
    Query(String),
}

/// [`CatalogConnection`] backed by a [`ReplayScript`].
#[derive(Debug)]
pub struct ReplayConnection {
    script: ReplayScript,
    closed: AtomicBool,
    calls: Mutex<Vec<ReplayCall>>,
}

impl ReplayConnection {
    /// Opens a session over `script`.
    pub fn new(script: ReplayScript) -> Self {
        Self {
            script,
            closed: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Closes the session; every later call fails with a fatal error.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// True once [`ReplayConnection::close`] was called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Every call received so far, in order.
    pub async fn executed(&self) -> Vec<ReplayCall> {
        self.calls.lock().await.clone()
    }

    /// SQL text of every statement received so far, in order.
    pub async fn executed_sql(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                ReplayCall::Query(sql) => Some(sql.clone()),
                ReplayCall::PrimaryKeys(_) => None,
            })
            .collect()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(KeyScoutError::connection_closed());
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogConnection for ReplayConnection {
    async fn query(&self, sql: &str) -> Result<QueryResult> {
        self.ensure_open()?;
        self.calls.lock().await.push(ReplayCall::Query(sql.to_string()));

        match self.script.find_query(sql) {
            Some(reply) => into_result(reply),
            None => Err(KeyScoutError::query_failed(format!(
                "no recorded reply for statement: {}",
                normalize_sql(sql)
            ))),
        }
    }

    async fn primary_key_columns(
        &self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<String>> {
        self.ensure_open()?;
        self.calls
            .lock()
            .await
            .push(ReplayCall::PrimaryKeys(TableRef::new(schema, table)));

        let Some(reply) = self.script.find_primary_key(schema, table) else {
            return Ok(Vec::new());
        };
        let result = into_result(reply)?;

        let index = result.find_column(PRIMARY_KEY_COLUMN_LABEL).ok_or_else(|| {
            KeyScoutError::query_failed(format!(
                "primary-key catalog reply lacks {}",
                PRIMARY_KEY_COLUMN_LABEL
            ))
        })?;
        Ok(result
            .rows
            .iter()
            .filter_map(|row| row.get(index))
            .filter_map(|value| value.as_str())
            .map(str::to_string)
            .collect())
    }
}

fn into_result(reply: &Reply) -> Result<QueryResult> {
    match reply {
        Reply::Rows(result) => Ok(result.clone()),
        Reply::Error { message } => Err(KeyScoutError::query_failed(message.clone())),
        Reply::ConnectionLost { message } => Err(KeyScoutError::Connection {
            context: message.clone(),
            source: None,
        }),
    }
}

fn normalize_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_query_matching_ignores_whitespace_and_case() {
        let result = QueryResult::new(vec![ResultColumn::new("RequestText")])
            .with_row(["REPLACE VIEW V AS SELECT 1 AS X;"]);
        let conn = ReplayConnection::new(
            ReplayScript::new().respond("SELECT RequestText\n  FROM DBC.Tables", result.clone()),
        );

        let got = conn.query("select requesttext from dbc.tables").await.unwrap();
        assert_eq!(got, result);
        assert_eq!(
            conn.executed_sql().await,
            vec!["select requesttext from dbc.tables".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unscripted_query_is_not_fatal() {
        let conn = ReplayConnection::new(ReplayScript::new());
        let err = conn.query("SELECT 1").await.unwrap_err();
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_failures_and_lost_connections() {
        let conn = ReplayConnection::new(
            ReplayScript::new()
                .fail("SELECT a FROM t", "3807: Object 't' does not exist.")
                .lose_connection("SELECT b FROM t", "socket closed"),
        );

        let err = conn.query("SELECT a FROM t").await.unwrap_err();
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("3807"));

        let err = conn.query("SELECT b FROM t").await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_closed_connection_is_fatal() {
        let conn = ReplayConnection::new(ReplayScript::new().primary_key(None, "T", &["ID"]));
        conn.close();

        assert!(conn.primary_key_columns(None, "T").await.unwrap_err().is_fatal());
        assert!(conn.query("SELECT 1").await.unwrap_err().is_fatal());
        assert!(conn.executed().await.is_empty());
    }

    #[tokio::test]
    async fn test_executed_records_calls_in_order() {
        let conn = ReplayConnection::new(
            ReplayScript::new()
                .primary_key(Some("SALES"), "ORDERS", &["ORDER_ID"])
                .respond("SELECT 1", QueryResult::new(vec![ResultColumn::new("X")])),
        );

        conn.primary_key_columns(Some("SALES"), "ORDERS").await.unwrap();
        conn.query("SELECT 1").await.unwrap();

        assert_eq!(
            conn.executed().await,
            vec![
                ReplayCall::PrimaryKeys(TableRef::new(Some("SALES"), "ORDERS")),
                ReplayCall::Query("SELECT 1".to_string()),
            ]
        );
        assert!(!conn.is_closed());
    }

    #[tokio::test]
    async fn test_primary_key_lookup_matches_schema() {
        let conn = ReplayConnection::new(
            ReplayScript::new()
                .primary_key(Some("SALES"), "ORDERS", &["ORDER_ID"])
                .primary_key(None, "ORDERS", &["LEGACY_ID"]),
        );

        assert_eq!(
            conn.primary_key_columns(Some("sales"), "orders").await.unwrap(),
            vec!["ORDER_ID".to_string()]
        );
        assert_eq!(
            conn.primary_key_columns(None, "ORDERS").await.unwrap(),
            vec!["LEGACY_ID".to_string()]
        );
        assert!(
            conn.primary_key_columns(Some("HR"), "ORDERS")
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(conn.executed().await.len(), 3);
    }

    #[test]
    fn test_script_json_format() {
        let script = ReplayScript::from_json(
            &json!({
                "primary_keys": [
                    { "table": "ORDERS", "reply": {
                        "outcome": "rows",
                        "columns": [{ "label": "COLUMN_NAME" }],
                        "rows": [["ORDER_ID"]]
                    }}
                ],
                "queries": [
                    { "sql": "SELECT 1", "reply": { "outcome": "error", "message": "boom" } }
                ]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(script.primary_keys.len(), 1);
        assert!(matches!(script.queries[0].reply, Reply::Error { .. }));
        assert!(ReplayScript::from_json("{ not json").is_err());
    }

    #[tokio::test]
    async fn test_from_path_reports_missing_file() {
        let err = ReplayScript::from_path("/nonexistent/keyscout/session.json")
            .await
            .unwrap_err();
        assert!(matches!(err, KeyScoutError::Io { .. }));
    }
}
