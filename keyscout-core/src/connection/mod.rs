//! The database capability consumed by discovery.
//!
//! Discovery never owns a connection. The caller hands in something that
//! can run SQL and answer the driver's primary-key catalog question; the
//! finder borrows it for the duration of one call.
//!
//! # Module Structure
//! - `helpers`: typed extraction of catalog values from result rows
//! - `replay`: an offline connection answering from a recorded session

use crate::{Result, models::QueryResult};
use async_trait::async_trait;

pub mod helpers;
pub mod replay;

pub use helpers::RowExt;
pub use replay::{QueryReply, ReplayConnection, ReplayScript, Reply};

/// An open session against the target database.
///
/// # Error contract
/// Implementations must report failures of the session itself (closed
/// connection, lost socket, no statement handle available) as
/// [`KeyScoutError::Connection`](crate::error::KeyScoutError::Connection).
/// Those are fatal to discovery. Any other error returned from a call is
/// treated as local to the statement that produced it.
///
/// # Resources
/// Each call acquires and releases its own statement. The returned
/// [`QueryResult`] is fully materialized, so no server-side cursor outlives
/// the call.
///
/// # Object Safety
/// The trait is object-safe; the finder takes `&dyn CatalogConnection`.
#[async_trait]
pub trait CatalogConnection: Send + Sync {
    /// Executes `sql` and returns its result metadata and rows.
    async fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Returns the declared primary-key column names of `table`, in the
    /// order the driver's catalog reports them.
    ///
    /// An empty list means the table has no declared key.
    async fn primary_key_columns(&self, schema: Option<&str>, table: &str)
    -> Result<Vec<String>>;
}
