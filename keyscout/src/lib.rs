//! Library module for keyscout
//!
//! This module exposes the command-line surface and output rendering for
//! testing purposes. The binary entry point is in main.rs.

use anyhow::Context;
use clap::{Args, Parser, ValueEnum};
use keyscout_core::{
    DiscoveryConfig, PrimaryKey, PrimaryKeyColumn, ReplayConnection, ReplayScript, TableRef,
    TeradataKeyFinder, UnifiedDataType,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// CLI argument structure
#[derive(Parser, Debug)]
#[command(name = "keyscout")]
#[command(about = "Primary-key discovery for Teradata tables and views")]
#[command(version)]
#[command(long_about = "
keyscout - Primary-key discovery for Teradata

Works out which columns identify rows of a table or view by trying, in order:
- the declared primary key
- the lowest-numbered unique index (DBC.Indices)
- identity columns (DBC.Columns)
- auto-increment columns of a view's defining query (DBC.Tables)

Discovery runs against a recorded catalog session (a replay script), so no
network access is needed.

EXAMPLES:
  keyscout --session sales.json --schema SALES ORDERS
  keyscout --session sales.json --format json LINE_ITEMS
  keyscout --session sales.json --config unicode.json -vv ORDERS_V
")]
pub struct Cli {
    /// Logging flags
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Recorded catalog session
    #[arg(
        long,
        env = "KEYSCOUT_SESSION",
        value_name = "FILE",
        help = "Replay script (JSON) recorded from a Teradata session"
    )]
    pub session: PathBuf,

    /// Owning database of the table
    #[arg(long, help = "Database (schema) owning the table")]
    pub schema: Option<String>,

    /// Table or view name
    #[arg(help = "Table or view to discover the key of")]
    pub table: String,

    /// Discovery configuration file
    #[arg(long, value_name = "FILE", help = "Discovery configuration (JSON)")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Flags controlling log output
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,

    /// Log as JSON lines
    #[arg(long, help = "Emit log events as JSON objects on stderr")]
    pub log_json: bool,
}

/// Available output formats
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per key column
    #[default]
    Text,
    /// JSON structured output
    Json,
}

/// JSON document printed for one discovery.
#[derive(Debug, Serialize)]
pub struct DiscoveryReport<'a> {
    /// Owning database, if given
    pub schema: Option<&'a str>,
    /// Table or view name
    pub table: &'a str,
    /// Discovered key; `null` when none was found
    pub primary_key: Option<&'a PrimaryKey>,
}

/// Loads the discovery configuration, or the default one when no file is
/// given.
pub async fn load_config(path: Option<&Path>) -> anyhow::Result<DiscoveryConfig> {
    match path {
        Some(path) => DiscoveryConfig::from_path(path)
            .await
            .with_context(|| format!("Unable to load configuration {}", path.display())),
        None => Ok(DiscoveryConfig::default()),
    }
}

/// Runs discovery for the table named on the command line.
///
/// # Errors
/// Fails when the session or configuration cannot be loaded, or when the
/// recorded connection fails fatally.
pub async fn run(cli: &Cli) -> anyhow::Result<Option<PrimaryKey>> {
    let config = load_config(cli.config.as_deref()).await?;
    let script = ReplayScript::from_path(&cli.session)
        .await
        .with_context(|| format!("Unable to load session {}", cli.session.display()))?;
    tracing::debug!(
        "Loaded session with {} primary-key replies and {} statement replies",
        script.primary_keys.len(),
        script.queries.len()
    );

    let finder = TeradataKeyFinder::with_config(config)?;
    let conn = ReplayConnection::new(script);
    let key = finder
        .discover(&conn, cli.schema.as_deref(), &cli.table)
        .await?;
    Ok(key)
}

/// Renders a discovery outcome for standard output.
pub fn render(
    target: &TableRef,
    key: Option<&PrimaryKey>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let report = DiscoveryReport {
                schema: target.schema.as_deref(),
                table: &target.table,
                primary_key: key,
            };
            serde_json::to_string_pretty(&report).context("Unable to serialize report")
        }
        OutputFormat::Text => Ok(render_text(key)),
    }
}

fn render_text(key: Option<&PrimaryKey>) -> String {
    let Some(key) = key else {
        return "no key".to_string();
    };
    key.columns()
        .iter()
        .map(|column| {
            let generation = match column {
                PrimaryKeyColumn::AutoGenerated { .. } => "auto-generated",
                PrimaryKeyColumn::NonIncrementing { .. } => "supplied",
            };
            format!(
                "{}\t{}\t{}",
                column.name(),
                type_label(column.data_type()),
                generation
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short human readable form of a unified type.
pub fn type_label(data_type: &UnifiedDataType) -> String {
    match data_type {
        UnifiedDataType::String { max_length: Some(n) } => format!("string({})", n),
        UnifiedDataType::String { max_length: None } => "string".to_string(),
        UnifiedDataType::Integer { bits, signed: true } => format!("int{}", bits),
        UnifiedDataType::Integer { bits, signed: false } => format!("uint{}", bits),
        UnifiedDataType::Decimal {
            precision: Some(p),
            scale,
        } => format!("decimal({},{})", p, scale.unwrap_or(0)),
        UnifiedDataType::Decimal { .. } => "decimal".to_string(),
        UnifiedDataType::Float { .. } => "float".to_string(),
        UnifiedDataType::Boolean => "boolean".to_string(),
        UnifiedDataType::DateTime { with_timezone: true } => "timestamp with time zone".to_string(),
        UnifiedDataType::DateTime { with_timezone: false } => "timestamp".to_string(),
        UnifiedDataType::Date => "date".to_string(),
        UnifiedDataType::Time { with_timezone: true } => "time with time zone".to_string(),
        UnifiedDataType::Time { with_timezone: false } => "time".to_string(),
        UnifiedDataType::Interval { qualifier } => format!("interval {}", qualifier.to_lowercase()),
        UnifiedDataType::Period { element } => format!("period({})", element.to_lowercase()),
        UnifiedDataType::Binary { max_length: Some(n) } => format!("binary({})", n),
        UnifiedDataType::Binary { max_length: None } => "binary".to_string(),
        UnifiedDataType::Json => "json".to_string(),
        UnifiedDataType::Xml => "xml".to_string(),
        UnifiedDataType::Custom { type_name } => type_name.to_lowercase(),
        UnifiedDataType::Unknown => "unknown".to_string(),
    }
}
