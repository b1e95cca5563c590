//! Primary-key discovery tool.
//!
//! Replays a recorded Teradata catalog session and prints the columns that
//! identify rows of one table or view.
//!
//! # Guarantees
//! - Read-only: only `SELECT` statements are issued
//! - Offline: every reply comes from the session file

use clap::Parser;
use keyscout::{Cli, render, run};
use keyscout_core::{LogFormat, TableRef, init_logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_format = if cli.global.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_logging(cli.global.verbose, cli.global.quiet, log_format)?;

    let target = TableRef::new(cli.schema.as_deref(), &cli.table);
    info!("Discovering primary key of {}", target);

    let key = run(&cli).await.map_err(|e| {
        error!("Primary key discovery failed: {:#}", e);
        e
    })?;

    println!("{}", render(&target, key.as_ref(), cli.format)?);
    Ok(())
}
