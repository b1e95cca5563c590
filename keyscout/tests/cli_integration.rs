//! Integration tests for the keyscout binary.
//!
//! These tests run the compiled binary against session files written to a
//! temporary directory and check its output and exit status.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::uninlined_format_args)]

use serde_json::{Value, json};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn session_json() -> Value {
    json!({
        "primary_keys": [
            { "schema": "SALES", "table": "ORDERS", "reply": {
                "outcome": "rows",
                "columns": [{ "label": "COLUMN_NAME" }],
                "rows": [["ORDER_ID"]]
            }}
        ],
        "queries": [
            { "sql": "SELECT * FROM \"SALES\".\"ORDERS\" WHERE 1=2", "reply": {
                "outcome": "rows",
                "columns": [
                    { "label": "ORDER_ID", "type_name": "INTEGER", "auto_increment": true },
                    { "label": "CUSTOMER", "type_name": "VARCHAR(40)" }
                ],
                "rows": []
            }},
            { "sql": "SELECT IndexNumber, ColumnName, ColumnPosition FROM DBC.Indices WHERE DatabaseName = 'SALES' AND TableName = 'BROKEN' AND UniqueFlag = 'Y'",
              "reply": { "outcome": "connection_lost", "message": "socket closed" } }
        ]
    })
}

fn write_session(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("session.json");
    std::fs::write(&path, session_json().to_string()).expect("Failed to write session");
    path
}

fn keyscout(session: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_keyscout"))
        .arg("--session")
        .arg(session)
        .arg("--quiet")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run keyscout")
}

#[test]
fn test_integration_text_output() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir);

    let output = keyscout(&session, &["--schema", "SALES", "ORDERS"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "ORDER_ID\tint32\tauto-generated"
    );
}

#[test]
fn test_integration_json_output() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir);

    let output = keyscout(&session, &["--schema", "SALES", "--format", "json", "ORDERS"]);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["table"], "ORDERS");
    assert_eq!(report["primary_key"]["columns"][0]["name"], "ORDER_ID");
}

#[test]
fn test_integration_missing_key() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir);

    let output = keyscout(&session, &["HEAP_TABLE"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "no key");

    let output = keyscout(&session, &["--format", "json", "HEAP_TABLE"]);
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["primary_key"].is_null());
}

#[test]
fn test_integration_fatal_error_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir);

    let output = keyscout(&session, &["--schema", "SALES", "BROKEN"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
